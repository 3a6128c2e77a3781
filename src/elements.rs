//! Drawing-surface elements built on top of `genpdf` primitives.
//!
//! The booklet needs a few capabilities the upstream crate does not ship with:
//! single lines of text with underline strokes, explicit vertical cursor
//! movement measured in points, and images decoded with descriptive errors.

use std::path::Path;

use image::GenericImageView;

use genpdf::elements::Image;
use genpdf::error::{Context as _, Error};
use genpdf::style::{Style, StyledString};
use genpdf::{render, Alignment, Element, Mm, Position, RenderResult, Size};

use crate::richtext::StyledSpan;

const DEFAULT_IMAGE_DPI: f64 = 300.0;
const MM_PER_INCH: f64 = 25.4;
const POINTS_PER_INCH: f64 = 72.0;
const DEFAULT_UNDERLINE_OFFSET_MM: f64 = 0.4;

/// Converts a plain `f64` millimetre value into a `genpdf` length.
pub fn mm_from_f64(value: f64) -> Mm {
    Mm::from(printpdf::Mm(value))
}

/// Converts a `genpdf` length back into a plain `f64` millimetre value.
pub fn mm_to_f64(value: Mm) -> f64 {
    let mm: printpdf::Mm = value.into();
    mm.0
}

/// Converts a PostScript point offset into millimetres.
pub fn mm_from_points(points: f64) -> Mm {
    mm_from_f64(points * MM_PER_INCH / POINTS_PER_INCH)
}

/// Converts inches into millimetres.
pub fn mm_from_inches(inches: f64) -> Mm {
    mm_from_f64(inches * MM_PER_INCH)
}

/// Natural size of a decoded image at the default placement resolution.
pub fn estimated_image_size(image: &image::DynamicImage) -> Size {
    let (px_width, px_height) = image.dimensions();
    let width_mm = MM_PER_INCH * (px_width as f64) / DEFAULT_IMAGE_DPI;
    let height_mm = MM_PER_INCH * (px_height as f64) / DEFAULT_IMAGE_DPI;
    Size::new(mm_from_f64(width_mm), mm_from_f64(height_mm))
}

/// Loads an image from the given path using the [`image`] crate.
pub fn decode_image_from_path(path: impl AsRef<Path>) -> Result<image::DynamicImage, Error> {
    let path = path.as_ref();
    let reader = image::io::Reader::open(path)
        .with_context(|| format!("Failed to open image file {}", path.display()))?;
    reader
        .with_guessed_format()
        .context("Unable to determine image format")?
        .decode()
        .with_context(|| format!("Failed to decode image file {}", path.display()))
}

/// Converts a decoded image into a `genpdf` image plus its natural size.
pub fn image_from_dynamic(image: image::DynamicImage) -> Result<(Image, Size), Error> {
    let size = estimated_image_size(&image);
    let image = Image::from_dynamic_image(image)?;
    Ok((image, size))
}

/// An element that advances the vertical cursor by a fixed amount.
///
/// The advance is clamped to the space left on the current page; it never
/// forces a page break on its own.
pub struct VerticalSpace {
    height: Mm,
}

impl VerticalSpace {
    /// Creates a spacer with the given height.
    pub fn new(height: Mm) -> Self {
        Self { height }
    }

    /// Creates a spacer measured in PostScript points.
    pub fn from_points(points: f64) -> Self {
        Self::new(mm_from_points(points))
    }
}

impl Element for VerticalSpace {
    fn render(
        &mut self,
        _context: &genpdf::Context,
        area: render::Area<'_>,
        _style: Style,
    ) -> Result<RenderResult, Error> {
        let available = area.size().height;
        let height = if self.height > available {
            available
        } else {
            self.height
        };
        let mut result = RenderResult::default();
        result.size = Size::new(0, height);
        Ok(result)
    }
}

/// A single line of styled text that draws underline strokes itself.
///
/// `genpdf` paragraphs cannot underline, so spans flagged as underlined are
/// printed normally and then a thin line is drawn under their extent.  Lines
/// do not wrap; the booklet only underlines short headings and email
/// addresses.
pub struct StyledLine {
    spans: Vec<StyledSpan>,
    alignment: Alignment,
    underline_offset: Mm,
}

impl StyledLine {
    /// Creates a new line from the provided spans.
    pub fn new(spans: Vec<StyledSpan>) -> Self {
        Self {
            spans,
            alignment: Alignment::Left,
            underline_offset: mm_from_f64(DEFAULT_UNDERLINE_OFFSET_MM),
        }
    }

    /// Sets the alignment and returns the updated element.
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }
}

impl Element for StyledLine {
    fn render(
        &mut self,
        context: &genpdf::Context,
        mut area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        let mut prepared: Vec<(StyledString, bool, Mm)> = Vec::with_capacity(self.spans.len());
        let mut total_width = Mm::default();
        let mut max_line_height = style.line_height(&context.font_cache);
        let mut max_glyph_height = Mm::default();

        for span in &self.spans {
            let mut string = span.string.clone();
            string.style = style.and(string.style);
            let width = string.width(&context.font_cache);
            total_width += width;
            max_line_height = max_line_height.max(string.style.line_height(&context.font_cache));
            let glyph_height = string
                .style
                .font(&context.font_cache)
                .glyph_height(string.style.font_size());
            max_glyph_height = max_glyph_height.max(glyph_height);
            prepared.push((string, span.underline, width));
        }

        let available_width = area.size().width;
        let x_offset = match self.alignment {
            Alignment::Left => Mm::default(),
            Alignment::Center => (available_width - total_width) / 2.0,
            Alignment::Right => available_width - total_width,
        };

        let mut result = RenderResult::default();
        if max_line_height > area.size().height {
            result.has_more = true;
            return Ok(result);
        }

        if let Some(mut section) =
            area.text_section(&context.font_cache, Position::new(x_offset, 0), style)
        {
            for (string, _, _) in &prepared {
                section.print_str(&string.s, string.style)?;
            }
        } else {
            result.has_more = true;
            return Ok(result);
        }

        let baseline = max_glyph_height + self.underline_offset;
        let mut cursor = x_offset;
        for (string, underline, width) in &prepared {
            if *underline {
                let mut line_style = Style::new();
                if let Some(color) = string.style.color().or(style.color()) {
                    line_style = line_style.with_color(color);
                }
                area.draw_line(
                    vec![
                        Position::new(cursor, baseline),
                        Position::new(cursor + *width, baseline),
                    ],
                    line_style,
                );
            }
            cursor += *width;
        }

        result.size = Size::new(total_width, max_line_height);
        area.add_offset(Position::new(0, max_line_height));

        Ok(result)
    }
}
