use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use std::fmt;

use super::address::format_percent;
use super::geometry::SheetGeometry;

/// Characters that would terminate or break an unquoted CSS `url(...)` token.
const CSS_URL_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'\'')
    .add(b'(')
    .add(b')')
    .add(b'\\');

const DROP_SHADOW: &str = "drop-shadow(0px 4px 4px rgba(0,0,0,0.3))";

/// An ordered list of inline CSS declarations.
///
/// Setting a property that already exists replaces its value in place, so
/// declaration order stays stable across frames.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    decls: Vec<(&'static str, String)>,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, property: &'static str, value: impl Into<String>) -> Self {
        self.insert(property, value);
        self
    }

    pub fn insert(&mut self, property: &'static str, value: impl Into<String>) {
        let value = value.into();
        match self.decls.iter_mut().find(|(p, _)| *p == property) {
            Some(existing) => existing.1 = value,
            None => self.decls.push((property, value)),
        }
    }

    #[cfg(test)]
    pub fn get(&self, property: &str) -> Option<&str> {
        self.decls
            .iter()
            .find(|(p, _)| *p == property)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.decls.iter().map(|(p, v)| (*p, v.as_str()))
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (property, value)) in self.decls.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}: {};", property, value)?;
        }
        Ok(())
    }
}

/// Presentation knobs that don't depend on the frame being shown.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetLook {
    /// Uniform scale applied as a transform (pixel mode only).
    pub scale: f64,
    /// Drop shadow under the sprite (pixel mode only).
    pub shadow: bool,
    /// Blend mode used to knock out a flat background color (grid mode only).
    pub blend_mode: Option<String>,
}

impl Default for SheetLook {
    fn default() -> Self {
        Self {
            scale: 1.0,
            shadow: false,
            blend_mode: Some("multiply".to_string()),
        }
    }
}

/// Wrap an image locator in a CSS `url(...)` token.
pub fn css_url(src: &str) -> String {
    format!("url({})", utf8_percent_encode(src, CSS_URL_ENCODE_SET))
}

/// Build the viewport style that shows `(frame, row)` of `geometry` from `src`.
pub fn sheet_style(
    geometry: &SheetGeometry,
    frame: usize,
    row: usize,
    src: &str,
    look: &SheetLook,
) -> Style {
    let mut style = Style::new();

    match geometry {
        SheetGeometry::Pixel(sheet) => {
            let offset = sheet.offset(frame, row);
            style.insert("width", format!("{}px", sheet.frame_width()));
            style.insert("height", format!("{}px", sheet.frame_height()));
            style.insert("background-image", css_url(src));
            style.insert("background-position", format!("{}px {}px", offset.x, offset.y));
            style.insert("background-repeat", "no-repeat");
            style.insert("image-rendering", "pixelated");
            style.insert("overflow", "hidden");
            style.insert("transform", format!("scale({})", look.scale));
            // Anchor at the feet so scaled sprites share a baseline
            style.insert("transform-origin", "bottom center");
            if look.shadow {
                style.insert("filter", DROP_SHADOW);
            }
        }
        SheetGeometry::Grid(sheet) => {
            let pos = sheet.position(frame, row);
            style.insert("width", "100%");
            style.insert("height", "100%");
            style.insert("background-image", css_url(src));
            style.insert(
                "background-size",
                format!("{} {}", format_percent(pos.size_x), format_percent(pos.size_y)),
            );
            style.insert(
                "background-position",
                format!("{} {}", format_percent(pos.pos_x), format_percent(pos.pos_y)),
            );
            style.insert("background-repeat", "no-repeat");
            style.insert("image-rendering", "pixelated");
            style.insert("overflow", "hidden");
            if let Some(mode) = &look.blend_mode {
                style.insert("mix-blend-mode", mode.clone());
            }
        }
    }

    style
}
