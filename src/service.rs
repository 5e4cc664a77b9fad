//! Request-level entry points shared by the CLI and any HTTP front end.

use std::path::PathBuf;

use serde::Serialize;

use crate::assets::font::{FontCatalog, FontRef};
use crate::assets::gif_codec;
use crate::assets::path::normalize_rel_path;
use crate::cache::{Fingerprint, FingerprintCache};
use crate::config::MemeConfig;
use crate::foundation::core::Bounds;
use crate::foundation::error::{MemeError, MemeResult};
use crate::layout::{BoxSpec, LayoutTemplate, default_boxes};
use crate::meme::preview_animation;
use crate::request::{MemeRequest, RequestLayout};

/// Where a generated meme was stored and how it is addressed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Generated {
    /// Hex fingerprint of the request.
    pub fingerprint: String,
    /// Artifact location on disk.
    pub path: PathBuf,
    /// Public URL path of the artifact.
    pub url: String,
}

/// Image directory, font and artifact cache behind meme requests.
pub struct MemeService {
    config: MemeConfig,
    font: FontRef,
    cache: FingerprintCache,
}

impl MemeService {
    /// Service using the configured font from the host font database.
    pub fn new(config: MemeConfig) -> MemeResult<Self> {
        config.validate()?;
        let font = FontCatalog::system().resolve(&config.font)?;
        Ok(Self::with_font(config, font))
    }

    /// Service using an already loaded font.
    pub fn with_font(config: MemeConfig, font: FontRef) -> Self {
        let cache = FingerprintCache::new(config.meme_dir.clone());
        Self {
            config,
            font,
            cache,
        }
    }

    /// Effective configuration.
    pub fn config(&self) -> &MemeConfig {
        &self.config
    }

    /// Artifact cache.
    pub fn cache(&self) -> &FingerprintCache {
        &self.cache
    }

    /// Sorted names of the `.gif` files in the image directory.
    pub fn list_gifs(&self) -> MemeResult<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.config.image_dir)? {
            let path = entry?.path();
            let is_gif = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("gif"));
            if !is_gif || !path.is_file() {
                continue;
            }
            if let Some(name) = path.file_name() {
                names.push(name.to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Parse `query`, then return the stored meme for it, generating it on first use.
    #[tracing::instrument(skip(self))]
    pub fn generate(&self, query: &str) -> MemeResult<Generated> {
        let req = MemeRequest::from_query(query)?;
        let source = self.source_path(&req.from)?;
        let fp = req.fingerprint;

        let path = self.cache.get_or_generate(fp, || {
            let template = match &req.layout {
                RequestLayout::Default { .. } => {
                    LayoutTemplate::simple(&source, self.font.clone(), self.config.fit)?
                }
                RequestLayout::Explicit { boxes, .. } => {
                    LayoutTemplate::explicit(&source, self.font.clone(), boxes, self.config.fit)?
                }
            };
            let mut meme = template.meme(&req.layout.captions())?;
            meme.generate(self.config.threads)?;
            Ok(meme)
        });
        let path = path.inspect_err(|e| {
            tracing::warn!(status = e.status_code(), error = %e, "meme request failed");
        })?;

        Ok(Generated {
            fingerprint: fp.to_hex(),
            url: self.url_for(&fp),
            path,
        })
    }

    /// Thumbnail of the first frame of the named source gif.
    pub fn preview(&self, name: &str, width: u32, height: u32) -> MemeResult<image::RgbaImage> {
        let source = self.source_path(name)?;
        let anim = gif_codec::decode_file(&source)?;
        preview_animation(&anim, width, height)
    }

    /// Canvas bounds of the named source gif and its default top and bottom boxes.
    pub fn template_for(&self, name: &str) -> MemeResult<(Bounds, [BoxSpec; 2])> {
        let source = self.source_path(name)?;
        let bounds = gif_codec::decode_file(&source)?.canvas_bounds();
        let boxes = default_boxes(
            u32::from(bounds.width),
            u32::from(bounds.height),
            self.config.fit.border,
        );
        Ok((bounds, boxes))
    }

    /// Public URL path of the artifact for `fp`.
    pub fn url_for(&self, fp: &Fingerprint) -> String {
        let prefix = self.config.meme_url.trim_matches('/');
        if prefix.is_empty() {
            format!("/{fp}.gif")
        } else {
            format!("/{prefix}/{fp}.gif")
        }
    }

    fn source_path(&self, name: &str) -> MemeResult<PathBuf> {
        let rel = normalize_rel_path(name)?;
        let path = self.config.image_dir.join(&rel);
        if !path.is_file() {
            return Err(MemeError::ImageNotFound(rel));
        }
        Ok(path)
    }
}

#[cfg(test)]
#[path = "../tests/unit/service.rs"]
mod tests;
