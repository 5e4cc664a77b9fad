//! Parsing of meme requests from URL query strings.

use crate::assets::path::normalize_rel_path;
use crate::cache::Fingerprint;
use crate::foundation::error::{MemeError, MemeResult};
use crate::layout::BoxSpec;

/// How the captions of a request are laid out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RequestLayout {
    /// Top and bottom boxes derived from the image size.
    Default {
        /// Caption of the top box.
        top: String,
        /// Caption of the bottom box.
        bottom: String,
    },
    /// Caller-placed boxes, captioned in order.
    Explicit {
        /// Box geometry from the `box` parameters.
        boxes: Vec<BoxSpec>,
        /// Captions from the `box-text` parameters.
        texts: Vec<String>,
    },
}

impl RequestLayout {
    /// Captions in box order.
    pub fn captions(&self) -> Vec<&str> {
        match self {
            Self::Default { top, bottom } => vec![top.as_str(), bottom.as_str()],
            Self::Explicit { texts, .. } => texts.iter().map(String::as_str).collect(),
        }
    }
}

/// A decoded meme request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemeRequest {
    /// Source gif, relative to the image directory.
    pub from: String,
    /// Caption placement.
    pub layout: RequestLayout,
    /// Content address of the request.
    pub fingerprint: Fingerprint,
}

impl MemeRequest {
    /// Parse `from`, `top`/`bottom` or `box`/`box-text` parameters.
    ///
    /// Any `box` or `box-text` parameter selects explicit mode.
    pub fn from_query(query: &str) -> MemeResult<Self> {
        let query = query.trim_start_matches('?');
        let pairs = url::form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect::<Vec<_>>();

        let mut from = None;
        let mut top = None;
        let mut bottom = None;
        let mut boxes = Vec::new();
        let mut texts = Vec::new();
        for (key, value) in &pairs {
            match key.as_str() {
                "from" if from.is_none() => from = Some(value.as_str()),
                "top" if top.is_none() => top = Some(value.clone()),
                "bottom" if bottom.is_none() => bottom = Some(value.clone()),
                "box" => boxes.push(BoxSpec::from_query(value)?),
                "box-text" => texts.push(value.clone()),
                _ => {}
            }
        }

        let from = normalize_rel_path(from.unwrap_or_default())?;
        let layout = if !boxes.is_empty() || !texts.is_empty() {
            RequestLayout::Explicit { boxes, texts }
        } else if top.is_some() || bottom.is_some() {
            RequestLayout::Default {
                top: top.unwrap_or_default(),
                bottom: bottom.unwrap_or_default(),
            }
        } else {
            return Err(MemeError::invalid("no captions"));
        };

        Ok(Self {
            from,
            layout,
            fingerprint: Fingerprint::from_pairs(&pairs),
        })
    }
}

#[cfg(test)]
#[path = "../tests/unit/request.rs"]
mod tests;
