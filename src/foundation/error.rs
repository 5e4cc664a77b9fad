/// Convenience result type used across memeoid.
pub type MemeResult<T> = Result<T, MemeError>;

/// Who is responsible for a failure, as seen from a request boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorClass {
    /// The request itself was unusable (bad parameters, caption cannot fit).
    Client,
    /// The requested source image or directory does not exist.
    NotFound,
    /// Store, codec, font or rendering failure on our side.
    Server,
}

impl ErrorClass {
    /// HTTP status code an HTTP layer should answer with.
    pub fn status_code(self) -> u16 {
        match self {
            Self::Client => 400,
            Self::NotFound => 404,
            Self::Server => 500,
        }
    }
}

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum MemeError {
    /// A text box has a non-positive dimension.
    #[error("text box too small: {width}x{height}")]
    BoxTooSmall {
        /// Box width in pixels.
        width: i32,
        /// Box height in pixels.
        height: i32,
    },

    /// The font could not be loaded or shaped at a candidate size.
    #[error("font '{font}' could not be loaded at font size {size}")]
    FontUnavailable {
        /// Font display name.
        font: String,
        /// Candidate size that failed.
        size: f32,
    },

    /// No candidate size in the configured range fits the caption.
    #[error("text can't fit in a {width}x{height} box: {text:?}")]
    TextDoesNotFit {
        /// Caption that was being fitted.
        text: String,
        /// Box width in pixels.
        width: i32,
        /// Box height in pixels.
        height: i32,
    },

    /// The number of captions differs from the number of boxes.
    #[error("{got} text pieces were given, but {expected} expected")]
    CaptionCountMismatch {
        /// Boxes in the template.
        expected: usize,
        /// Captions supplied.
        got: usize,
    },

    /// The source image is not a decodable GIF.
    #[error("corrupt image data: {0}")]
    CorruptData(String),

    /// No font on the host matches the requested name.
    #[error("font not found: {0}")]
    FontNotFound(String),

    /// Writing the generated artifact failed.
    #[error("failed to store artifact: {0}")]
    StoreWriteFailed(String),

    /// Malformed request parameters.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The requested source image does not exist.
    #[error("image not found: {0}")]
    ImageNotFound(String),

    /// Rasterization failure inside the compositor.
    #[error("render error: {0}")]
    Render(String),

    /// Invalid configuration values.
    #[error("config error: {0}")]
    Config(String),

    /// Failure reported by another caller's in-flight generation of the same artifact.
    #[error("{message}")]
    InFlight {
        /// Class of the original failure.
        class: ErrorClass,
        /// Display text of the original failure.
        message: String,
    },

    /// Filesystem error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MemeError {
    /// Build a [`MemeError::CorruptData`] value.
    pub fn corrupt(msg: impl Into<String>) -> Self {
        Self::CorruptData(msg.into())
    }

    /// Build a [`MemeError::StoreWriteFailed`] value.
    pub fn store(msg: impl Into<String>) -> Self {
        Self::StoreWriteFailed(msg.into())
    }

    /// Build a [`MemeError::InvalidRequest`] value.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Build a [`MemeError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`MemeError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Classify the failure for the request boundary.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::BoxTooSmall { .. }
            | Self::TextDoesNotFit { .. }
            | Self::CaptionCountMismatch { .. }
            | Self::InvalidRequest(_) => ErrorClass::Client,
            Self::ImageNotFound(_) => ErrorClass::NotFound,
            Self::Io(e) if e.kind() == std::io::ErrorKind::NotFound => ErrorClass::NotFound,
            Self::InFlight { class, .. } => *class,
            Self::FontUnavailable { .. }
            | Self::CorruptData(_)
            | Self::FontNotFound(_)
            | Self::StoreWriteFailed(_)
            | Self::Render(_)
            | Self::Config(_)
            | Self::Io(_)
            | Self::Other(_) => ErrorClass::Server,
        }
    }

    /// Shorthand for `self.class().status_code()`.
    pub fn status_code(&self) -> u16 {
        self.class().status_code()
    }

    /// Copy of this error that can be handed to other waiters on the same generation.
    pub(crate) fn to_shared(&self) -> Self {
        Self::InFlight {
            class: self.class(),
            message: self.to_string(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
