use std::path::Path;
use std::sync::Arc;

use usvg::fontdb;

use crate::foundation::error::{MemeError, MemeResult};

/// A loadable font resource: shared bytes plus face index.
#[derive(Clone)]
pub struct FontRef {
    name: String,
    bytes: Arc<Vec<u8>>,
    index: u32,
}

impl std::fmt::Debug for FontRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontRef")
            .field("name", &self.name)
            .field("bytes_len", &self.bytes.len())
            .field("index", &self.index)
            .finish()
    }
}

impl PartialEq for FontRef {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
            && (Arc::ptr_eq(&self.bytes, &other.bytes) || self.bytes == other.bytes)
    }
}

impl FontRef {
    /// Wrap raw font bytes.
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>, index: u32) -> Self {
        Self {
            name: name.into(),
            bytes: Arc::new(bytes),
            index,
        }
    }

    /// Read a font file from disk (face 0).
    pub fn from_file(path: impl AsRef<Path>) -> MemeResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            MemeError::FontNotFound(format!("failed to read font '{}': {e}", path.display()))
        })?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::from_bytes(name, bytes, 0))
    }

    /// Name the font was resolved under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw font file bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Face index inside the font file (non-zero for collections).
    pub fn index(&self) -> u32 {
        self.index
    }
}

/// Host font database used to resolve human font names.
pub struct FontCatalog {
    db: fontdb::Database,
}

impl FontCatalog {
    /// Catalog of every font installed on the host.
    pub fn system() -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        tracing::debug!(faces = db.len(), "loaded system fonts");
        Self { db }
    }

    /// Catalog of the fonts stored in `dir` only.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let mut db = fontdb::Database::new();
        db.load_fonts_dir(dir.as_ref());
        Self { db }
    }

    /// Number of faces known to the catalog.
    pub fn len(&self) -> usize {
        self.db.len()
    }

    /// Return `true` when no face is known.
    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }

    /// Resolve `name` against family names, PostScript names and font file stems.
    ///
    /// Matching ignores case, spaces, dashes and underscores, so `"DejaVuSans"` and
    /// `"DejaVu Sans"` name the same face. Upright regular faces win over other styles.
    #[tracing::instrument(skip(self))]
    pub fn resolve(&self, name: &str) -> MemeResult<FontRef> {
        let wanted = fold_name(name);
        if wanted.is_empty() {
            return Err(MemeError::FontNotFound(name.to_string()));
        }

        let best = self
            .db
            .faces()
            .filter(|face| face_matches(face, &wanted))
            .min_by_key(|face| face_rank(face))
            .map(|face| face.id)
            .ok_or_else(|| MemeError::FontNotFound(name.to_string()))?;

        let (bytes, index) = self
            .db
            .with_face_data(best, |data, index| (data.to_vec(), index))
            .ok_or_else(|| MemeError::FontNotFound(format!("{name}: face data unavailable")))?;
        Ok(FontRef::from_bytes(name, bytes, index))
    }
}

fn fold_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

fn face_matches(face: &fontdb::FaceInfo, wanted: &str) -> bool {
    if face.families.iter().any(|(family, _)| fold_name(family) == wanted) {
        return true;
    }
    if fold_name(&face.post_script_name) == wanted {
        return true;
    }
    match &face.source {
        fontdb::Source::File(path) | fontdb::Source::SharedFile(path, _) => path
            .file_stem()
            .is_some_and(|stem| fold_name(&stem.to_string_lossy()) == wanted),
        fontdb::Source::Binary(_) => false,
    }
}

fn face_rank(face: &fontdb::FaceInfo) -> (u8, u16) {
    let style = u8::from(face.style != fontdb::Style::Normal);
    let weight = face.weight.0.abs_diff(fontdb::Weight::NORMAL.0);
    (style, weight)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/font.rs"]
mod tests;
