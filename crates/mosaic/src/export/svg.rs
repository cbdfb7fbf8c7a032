//! SVG preview of a placed layout.
//!
//! Each tile becomes one `<rect>`. Wide tiles use their own fill so spans are
//! easy to spot, and tiles whose dimension was never resolved are drawn with
//! a dashed outline.

use std::{fs::File, io::Write};

use log::{debug, error, info};
use svg::{Document, node::element::Rectangle};

use mosaic_core::color::Color;

use crate::{
    config::StyleConfig,
    export::{self, Exporter},
    layout::{Layout, LayoutItem},
};

/// Blank space around the container, in pixels.
const MARGIN: f64 = 16.0;

const DEFAULT_BACKGROUND: &str = "#ffffff";
const DEFAULT_TILE: &str = "#c9d4df";
const DEFAULT_WIDE_TILE: &str = "#8fb3d9";
const PLACEHOLDER_STROKE: &str = "#6b7785";

/// Builder for [`Svg`] exporters.
#[derive(Debug, Default)]
pub struct SvgBuilder {
    file_name: Option<String>,
    style: StyleConfig,
}

impl SvgBuilder {
    /// Creates a builder for an exporter writing to `file_name`.
    pub fn new(file_name: &str) -> Self {
        Self {
            file_name: Some(file_name.to_string()),
            style: StyleConfig::default(),
        }
    }

    /// Creates a builder for an exporter that only renders in memory.
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn with_style(mut self, style: &StyleConfig) -> Self {
        self.style = style.clone();
        self
    }

    /// Resolves the style colors.
    ///
    /// # Errors
    ///
    /// Returns [`export::Error::Render`] if a configured color is invalid.
    pub fn build(self) -> Result<Svg, export::Error> {
        let background = resolve(self.style.background_color(), DEFAULT_BACKGROUND)?;
        let tile = resolve(self.style.tile_color(), DEFAULT_TILE)?;
        let wide_tile = resolve(self.style.wide_tile_color(), DEFAULT_WIDE_TILE)?;
        let placeholder = Color::new(PLACEHOLDER_STROKE).map_err(export::Error::Render)?;

        Ok(Svg {
            file_name: self.file_name,
            background,
            tile,
            wide_tile,
            placeholder,
        })
    }
}

fn resolve(
    configured: Result<Option<Color>, String>,
    default: &str,
) -> Result<Color, export::Error> {
    match configured.map_err(export::Error::Render)? {
        Some(color) => Ok(color),
        None => Color::new(default).map_err(export::Error::Render),
    }
}

/// SVG exporter for layouts.
#[derive(Debug)]
pub struct Svg {
    file_name: Option<String>,
    background: Color,
    tile: Color,
    wide_tile: Color,
    placeholder: Color,
}

impl Svg {
    /// Renders `layout` into an SVG document.
    pub fn render_layout(&self, layout: &Layout) -> Document {
        let width = layout.container_width() + 2.0 * MARGIN;
        let height = layout.container_height() + 2.0 * MARGIN;

        let background = Rectangle::new()
            .set("x", 0)
            .set("y", 0)
            .set("width", width)
            .set("height", height)
            .set("fill", &self.background);

        let mut doc = Document::new()
            .set("viewBox", format!("0 0 {width} {height}"))
            .set("width", width)
            .set("height", height)
            .add(background);

        for item in layout.items() {
            doc = doc.add(self.render_tile(item));
        }

        debug!(
            tiles = layout.len(),
            width,
            height;
            "SVG document rendered"
        );
        doc
    }

    fn render_tile(&self, item: &LayoutItem) -> Rectangle {
        let fill = if item.is_wide() {
            &self.wide_tile
        } else {
            &self.tile
        };

        let tile = Rectangle::new()
            .set("id", format!("item-{}", item.id()))
            .set("x", item.x() + MARGIN)
            .set("y", item.y() + MARGIN)
            .set("width", item.width())
            .set("height", item.height())
            .set("fill", fill);

        if item.is_loaded() {
            tile
        } else {
            tile.set("stroke", &self.placeholder)
                .set("stroke-width", 1)
                .set("stroke-dasharray", "4 4")
        }
    }

    /// Writes an SVG document to the configured file.
    ///
    /// # Errors
    ///
    /// Returns [`export::Error::Render`] for an in-memory exporter and
    /// [`export::Error::Io`] if the file cannot be written.
    pub fn write_document(&self, doc: &Document) -> Result<(), export::Error> {
        let Some(file_name) = self.file_name.as_deref() else {
            return Err(export::Error::Render(
                "exporter has no output file".to_string(),
            ));
        };

        info!(file_name; "Creating SVG file");
        let mut file = File::create(file_name).map_err(|err| {
            error!(file_name, err:%; "Failed to create SVG file");
            export::Error::Io(err)
        })?;

        write!(file, "{doc}").map_err(|err| {
            error!(file_name, err:%; "Failed to write SVG content");
            export::Error::Io(err)
        })
    }
}

impl Exporter for Svg {
    fn export_layout(&mut self, layout: &Layout) -> Result<(), export::Error> {
        let doc = self.render_layout(layout);
        self.write_document(&doc)
    }
}

#[cfg(test)]
mod tests {
    use mosaic_core::{dimension::Dimension, identifier::ItemId};

    use super::*;
    use crate::layout::{ColumnSpec, LayoutInput, SkylineEngine};

    fn layout() -> Layout {
        let spec = ColumnSpec::new(2, 100.0, 8.0).unwrap();
        let inputs = [
            LayoutInput::new(ItemId::new(1), Dimension::loaded(200.0, 100.0).unwrap()),
            LayoutInput::new(ItemId::new(2), Dimension::unloaded()),
        ];
        SkylineEngine::new().layout(&inputs, &spec)
    }

    #[test]
    fn test_renders_one_rect_per_tile() {
        let svg = SvgBuilder::in_memory().build().unwrap();

        let rendered = svg.render_layout(&layout()).to_string();

        // Background plus two tiles.
        assert_eq!(rendered.matches("<rect").count(), 3);
        assert!(rendered.contains("id=\"item-1\""));
        assert!(rendered.contains("stroke-dasharray"));
    }

    #[test]
    fn test_invalid_style_color_fails_build() {
        let style: StyleConfig = style_with_background("nope");
        assert!(matches!(
            SvgBuilder::in_memory().with_style(&style).build(),
            Err(export::Error::Render(_))
        ));
    }

    #[test]
    fn test_in_memory_exporter_cannot_write() {
        let mut svg = SvgBuilder::in_memory().build().unwrap();
        assert!(svg.export_layout(&layout()).is_err());
    }

    fn style_with_background(background: &str) -> StyleConfig {
        serde_json::from_value(serde_json::json!({ "background_color": background })).unwrap()
    }
}
