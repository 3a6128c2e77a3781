//! Tabular page blocks.
//!
//! The booklet's tables are described declaratively as a [`TableSpec`]: column
//! definitions (width, justification, optional heading) plus rows of cell text
//! carrying the inline markup from [`crate::richtext`].  The spec is turned
//! into a [`genpdf::elements::TableLayout`] at layout time; cells may hold
//! multiple lines separated by `\n`.  No grid lines and no row shading are
//! drawn, matching the booklet's plain table look.

use genpdf::elements::{LinearLayout, Paragraph, TableLayout};
use genpdf::error::Error;
use genpdf::style::Style;
use genpdf::{render, Alignment, Element, Margins, RenderResult};

use crate::elements::{mm_from_f64, StyledLine};
use crate::richtext::{parse_markup_lossy, spans_to_styled_strings, Span};

/// Default font size for booklet tables.
pub const TABLE_FONT_SIZE: u8 = 15;

/// One column of a table block.
#[derive(Clone, Debug)]
pub struct ColumnSpec {
    width_mm: f64,
    alignment: Alignment,
    heading: Option<String>,
}

impl ColumnSpec {
    /// Creates a left-aligned column of the given width.
    pub fn new(width_mm: f64) -> Self {
        Self {
            width_mm,
            alignment: Alignment::Left,
            heading: None,
        }
    }

    /// Sets the cell justification and returns the updated column.
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Sets a heading rendered in bold above the data rows.
    pub fn with_heading(mut self, heading: impl Into<String>) -> Self {
        self.heading = Some(heading.into());
        self
    }
}

/// A complete table block ready to be laid out.
#[derive(Clone, Debug)]
pub struct TableSpec {
    columns: Vec<ColumnSpec>,
    rows: Vec<Vec<String>>,
    font_size: u8,
    row_gap_mm: f64,
}

impl TableSpec {
    /// Creates an empty table with the given columns.
    pub fn new(columns: Vec<ColumnSpec>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            font_size: TABLE_FONT_SIZE,
            row_gap_mm: 0.0,
        }
    }

    /// Sets the vertical gap appended below every data row.
    pub fn with_row_gap_mm(mut self, row_gap_mm: f64) -> Self {
        self.row_gap_mm = row_gap_mm;
        self
    }

    /// Appends a data row, padding or truncating it to the column count.
    pub fn push_row(&mut self, mut cells: Vec<String>) {
        cells.resize(self.columns.len(), String::new());
        self.rows.push(cells);
    }

    /// Returns the data rows accumulated so far.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Font size applied to every cell.
    pub fn font_size(&self) -> u8 {
        self.font_size
    }

    /// Sum of the declared column widths.
    ///
    /// Column widths are absolute dimensions; the renderer centers a table
    /// narrower than the content area instead of stretching it.
    pub fn total_width_mm(&self) -> f64 {
        self.columns.iter().map(|column| column.width_mm).sum()
    }

    fn column_weights(&self) -> Vec<usize> {
        self.columns
            .iter()
            .map(|column| ((column.width_mm * 10.0).round() as usize).max(1))
            .collect()
    }

    /// Builds the `genpdf` table for this spec.
    pub(crate) fn to_element(&self) -> Result<TableLayout, Error> {
        let mut table = TableLayout::new(self.column_weights());

        if self.columns.iter().any(|column| column.heading.is_some()) {
            let mut row = table.row();
            for column in &self.columns {
                let text = column.heading.clone().unwrap_or_default();
                row = row.element(cell_line(
                    vec![Span::new(text).bold()],
                    column.alignment,
                ));
            }
            row.push()?;
        }

        for cells in &self.rows {
            let mut row = table.row();
            for (column, text) in self.columns.iter().zip(cells) {
                row = row.element(cell_element(text, column.alignment).padded(Margins::trbl(
                    0,
                    0,
                    mm_from_f64(self.row_gap_mm),
                    0,
                )));
            }
            row.push()?;
        }

        Ok(table)
    }
}

/// A single cell line: a plain paragraph or an underline-capable line.
enum CellLine {
    Plain(Paragraph),
    Underlined(StyledLine),
}

impl Element for CellLine {
    fn render(
        &mut self,
        context: &genpdf::Context,
        area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        match self {
            CellLine::Plain(paragraph) => paragraph.render(context, area, style),
            CellLine::Underlined(line) => line.render(context, area, style),
        }
    }
}

fn cell_line(spans: Vec<Span>, alignment: Alignment) -> CellLine {
    if spans.iter().any(Span::is_underlined) {
        CellLine::Underlined(StyledLine::new(spans_to_styled_strings(&spans)).with_alignment(alignment))
    } else {
        let mut paragraph = Paragraph::default();
        for span in &spans {
            let styled = span.to_styled_string();
            paragraph.push_styled(styled.s, styled.style);
        }
        paragraph.set_alignment(alignment);
        CellLine::Plain(paragraph)
    }
}

fn cell_element(text: &str, alignment: Alignment) -> LinearLayout {
    let mut layout = LinearLayout::vertical();
    for line in text.split('\n') {
        layout.push(cell_line(parse_markup_lossy(line), alignment));
    }
    layout
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_padded_to_the_column_count() {
        let mut spec = TableSpec::new(vec![ColumnSpec::new(82.55), ColumnSpec::new(82.55)]);
        spec.push_row(vec!["only one cell".to_string()]);
        assert_eq!(spec.rows(), [["only one cell".to_string(), String::new()]]);
    }

    #[test]
    fn column_weights_follow_relative_widths() {
        let spec = TableSpec::new(vec![
            ColumnSpec::new(76.2),
            ColumnSpec::new(38.1),
            ColumnSpec::new(76.2),
        ]);
        assert_eq!(spec.column_weights(), [762, 381, 762]);
    }

    #[test]
    fn total_width_is_the_sum_of_column_widths() {
        let spec = TableSpec::new(vec![ColumnSpec::new(82.55), ColumnSpec::new(82.55)]);
        assert!((spec.total_width_mm() - 165.1).abs() < 1e-9);
    }

    #[test]
    fn empty_table_still_builds() {
        let spec = TableSpec::new(vec![ColumnSpec::new(95.25), ColumnSpec::new(95.25)]);
        assert!(spec.to_element().is_ok());
    }
}
