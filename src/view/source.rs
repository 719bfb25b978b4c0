//! Sprite image locators and broken-image detection.

use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
enum SourceKind {
    /// http(s) URL or protocol-relative path; assumed loadable.
    Remote,
    /// Already-inlined `data:` URI.
    Data,
    /// File on disk, resolved against the scene directory.
    Local(PathBuf),
}

/// Where a sprite sheet image comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteSource {
    locator: String,
    kind: SourceKind,
}

impl SpriteSource {
    /// Classify `locator`. Relative paths resolve against `base_dir`.
    pub fn parse(locator: &str, base_dir: &Path) -> Self {
        let locator = locator.trim().to_string();
        let lower = locator.to_ascii_lowercase();
        let kind = if lower.starts_with("data:") {
            SourceKind::Data
        } else if lower.starts_with("http://")
            || lower.starts_with("https://")
            || locator.starts_with("//")
        {
            SourceKind::Remote
        } else {
            let path = Path::new(&locator);
            let resolved = if path.is_absolute() {
                path.to_path_buf()
            } else {
                base_dir.join(path)
            };
            SourceKind::Local(resolved)
        };
        Self { locator, kind }
    }

    /// The locator as written, for use in CSS.
    pub fn locator(&self) -> &str {
        &self.locator
    }

    pub fn local_path(&self) -> Option<&Path> {
        match &self.kind {
            SourceKind::Local(path) => Some(path),
            _ => None,
        }
    }

    /// False when the image can't possibly load: empty locator or missing file.
    pub fn is_available(&self) -> bool {
        if self.locator.is_empty() {
            return false;
        }
        match &self.kind {
            SourceKind::Local(path) => path.is_file(),
            SourceKind::Remote | SourceKind::Data => true,
        }
    }

    /// Encode a local file as a `data:` URI. Other sources are returned unchanged.
    pub fn to_inline(&self) -> Result<SpriteSource> {
        let SourceKind::Local(path) = &self.kind else {
            return Ok(self.clone());
        };
        let bytes = fs::read(path)
            .with_context(|| format!("Failed to read sprite: {}", path.display()))?;
        Ok(SpriteSource {
            locator: format!("data:{};base64,{}", mime_type(path), STANDARD.encode(bytes)),
            kind: SourceKind::Data,
        })
    }
}

fn mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "jpg" | "jpeg" => "image/jpeg",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_remote_and_data() {
        let base = Path::new("/scene");
        let remote = SpriteSource::parse("https://cdn.example.com/mayor.png", base);
        assert!(remote.is_available());
        assert!(remote.local_path().is_none());

        let data = SpriteSource::parse("data:image/png;base64,AAAA", base);
        assert!(data.is_available());
    }

    #[test]
    fn test_relative_path_resolves_against_base() {
        let source = SpriteSource::parse("sprites/mayor.png", Path::new("/scene"));
        assert_eq!(
            source.local_path(),
            Some(Path::new("/scene/sprites/mayor.png"))
        );
        assert_eq!(source.locator(), "sprites/mayor.png");
    }

    #[test]
    fn test_missing_local_file_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let source = SpriteSource::parse("nope.png", dir.path());
        assert!(!source.is_available());
    }

    #[test]
    fn test_empty_locator_is_unavailable() {
        let source = SpriteSource::parse("   ", Path::new("/scene"));
        assert!(!source.is_available());
    }

    #[test]
    fn test_to_inline_encodes_local_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.png"), [0x89, b'P', b'N', b'G']).unwrap();
        let source = SpriteSource::parse("a.png", dir.path());
        assert!(source.is_available());

        let inline = source.to_inline().unwrap();
        assert_eq!(inline.locator(), "data:image/png;base64,iVBORw==");
        assert!(inline.is_available());
    }

    #[test]
    fn test_to_inline_keeps_remote() {
        let source = SpriteSource::parse("https://x/y.gif", Path::new("/"));
        assert_eq!(source.to_inline().unwrap(), source);
    }
}
