//! Stateful booklet document builder wrapping the `genpdf` drawing surface.
//!
//! The renderer records placement operations (styled text, images, vertical
//! cursor movement, page breaks, table blocks) and performs the actual layout
//! when asked.  Recording and layout are separated because the notes-padding
//! rule needs the page count of the in-progress document: table blocks may
//! span pages, so the count is only known after a real layout pass.
//! [`BookletRenderer::page_count`] runs that pass and counts pages with
//! `lopdf`; [`BookletRenderer::into_bytes`] performs the final, one-shot
//! serialization.

use std::path::{Path, PathBuf};

use genpdf::elements::{PageBreak, Paragraph};
use genpdf::style::Style;
use genpdf::{Alignment, Document, Element, Margins, Scale, SimplePageDecorator, Size};

use crate::elements::{
    estimated_image_size, image_from_dynamic, mm_from_f64, mm_to_f64, StyledLine, VerticalSpace,
};
use crate::error::BookletError;
use crate::fonts;
use crate::richtext::{parse_markup_lossy, spans_to_styled_strings, Span};
use crate::table::TableSpec;

/// Legal paper, the booklet's fixed page size.
const PAGE_WIDTH_MM: f64 = 215.9;
const PAGE_HEIGHT_MM: f64 = 355.6;

/// Half-inch margins leave exactly 7.5 inches of content width.
const MARGIN_MM: f64 = 12.7;

/// Width available to content between the margins.
pub const CONTENT_WIDTH_MM: f64 = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;

const DEFAULT_FONT_SIZE: u8 = 12;

/// Horizontal padding that centers a table narrower than the content area.
///
/// `genpdf` treats column widths as relative weights over the full available
/// width; shrinking the area keeps the declared widths absolute.
fn table_side_padding_mm(spec: &TableSpec) -> f64 {
    ((CONTENT_WIDTH_MM - spec.total_width_mm()) / 2.0).max(0.0)
}

/// One recorded placement operation.
pub(crate) enum Op {
    Text {
        spans: Vec<Span>,
        size: u8,
        alignment: Alignment,
    },
    Image {
        image: image::DynamicImage,
        alignment: Alignment,
        fit_width: bool,
    },
    Space {
        points: f64,
    },
    PageBreak,
    Table(TableSpec),
}

/// Append-only document builder for one booklet generation.
///
/// Not re-entrant: one renderer belongs to exactly one `render_booklet` call.
pub struct BookletRenderer {
    ops: Vec<Op>,
    fonts_dir: Option<PathBuf>,
}

impl BookletRenderer {
    /// Creates an empty renderer; `fonts_dir` overrides the bundled fonts.
    pub fn new(fonts_dir: Option<PathBuf>) -> Self {
        Self {
            ops: Vec::new(),
            fonts_dir,
        }
    }

    /// Places a line or paragraph of marked-up text.
    pub fn text(&mut self, markup: &str, size: u8, alignment: Alignment) {
        self.ops.push(Op::Text {
            spans: parse_markup_lossy(markup),
            size,
            alignment,
        });
    }

    /// Places the image at `path`, optionally resized to the content width.
    pub fn image(
        &mut self,
        path: &Path,
        alignment: Alignment,
        fit_width: bool,
    ) -> Result<(), BookletError> {
        let image = crate::elements::decode_image_from_path(path).map_err(|err| {
            BookletError::Image {
                path: path.display().to_string(),
                message: err.to_string(),
            }
        })?;
        self.ops.push(Op::Image {
            image,
            alignment,
            fit_width,
        });
        Ok(())
    }

    /// Advances the vertical cursor by a point offset.
    pub fn move_down(&mut self, points: f64) {
        self.ops.push(Op::Space { points });
    }

    /// Starts a new page.
    pub fn new_page(&mut self) {
        self.ops.push(Op::PageBreak);
    }

    /// Places a tabular block.
    pub fn table(&mut self, spec: TableSpec) {
        self.ops.push(Op::Table(spec));
    }

    /// Page count of the document recorded so far, via a full layout pass.
    pub fn page_count(&self) -> Result<usize, BookletError> {
        let bytes = self.render_bytes()?;
        let document = lopdf::Document::load_mem(&bytes)?;
        Ok(document.get_pages().len())
    }

    /// Serializes the finished document to PDF bytes.
    pub fn into_bytes(self) -> Result<Vec<u8>, BookletError> {
        self.render_bytes()
    }

    #[cfg(test)]
    pub(crate) fn ops(&self) -> &[Op] {
        &self.ops
    }

    fn render_bytes(&self) -> Result<Vec<u8>, BookletError> {
        let document = self.build_document()?;
        let mut bytes = Vec::new();
        document.render(&mut bytes)?;
        Ok(bytes)
    }

    fn build_document(&self) -> Result<Document, BookletError> {
        let family = fonts::booklet_font_family(self.fonts_dir.as_deref())?;
        let mut document = Document::new(family);
        document.set_title("Show Booklet");
        document.set_paper_size(Size::new(
            mm_from_f64(PAGE_WIDTH_MM),
            mm_from_f64(PAGE_HEIGHT_MM),
        ));
        document.set_font_size(DEFAULT_FONT_SIZE);

        let mut decorator = SimplePageDecorator::new();
        decorator.set_margins(Margins::all(mm_from_f64(MARGIN_MM)));
        document.set_page_decorator(decorator);

        for op in &self.ops {
            match op {
                Op::Text {
                    spans,
                    size,
                    alignment,
                } => {
                    let mut sized = Style::new();
                    sized.set_font_size(*size);
                    if spans.iter().any(Span::is_underlined) {
                        let line = StyledLine::new(spans_to_styled_strings(spans))
                            .with_alignment(*alignment);
                        document.push(line.styled(sized));
                    } else {
                        let mut paragraph = Paragraph::default();
                        for span in spans {
                            let styled = span.to_styled_string();
                            paragraph.push_styled(styled.s, styled.style);
                        }
                        paragraph.set_alignment(*alignment);
                        document.push(paragraph.styled(sized));
                    }
                }
                Op::Image {
                    image,
                    alignment,
                    fit_width,
                } => {
                    let natural = estimated_image_size(image);
                    let (mut element, _) = image_from_dynamic(image.clone())?;
                    element.set_alignment(*alignment);
                    if *fit_width {
                        let natural_width = mm_to_f64(natural.width);
                        if natural_width > f64::EPSILON {
                            let scale = CONTENT_WIDTH_MM / natural_width;
                            element.set_scale(Scale::new(scale, scale));
                        }
                    }
                    document.push(element);
                }
                Op::Space { points } => {
                    document.push(VerticalSpace::from_points(*points));
                }
                Op::PageBreak => {
                    document.push(PageBreak::new());
                }
                Op::Table(spec) => {
                    let mut sized = Style::new();
                    sized.set_font_size(spec.font_size());
                    let side = mm_from_f64(table_side_padding_mm(spec));
                    document.push(
                        spec.to_element()?
                            .padded(Margins::trbl(0, side, 0, side))
                            .styled(sized),
                    );
                }
            }
        }

        Ok(document)
    }
}
