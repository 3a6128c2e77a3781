//! Inline-styled text spans for booklet content.
//!
//! Page text and table cells carry a small markup syntax for the two inline
//! decorations the booklet uses: `**bold**` and `__underline__`.  The types
//! here parse that syntax into [`Span`] values which are later turned into
//! `genpdf` styled strings.  Underline is not natively supported by
//! [`genpdf::style::StyledString`], so the conversion keeps the flag separate
//! and the element layer draws the stroke itself.

use std::fmt;

use genpdf::style::{Style, StyledString};

/// A slice of text together with its inline decorations.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Span {
    text: String,
    bold: bool,
    underline: bool,
}

impl Span {
    /// Creates a new span with no decorations applied.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Returns the raw text contained in this span.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns whether the span should be rendered in bold.
    pub fn is_bold(&self) -> bool {
        self.bold
    }

    /// Returns whether the span is marked as underlined.
    pub fn is_underlined(&self) -> bool {
        self.underline
    }

    /// Marks the span as bold.
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Marks the span as underlined.
    pub fn underline(mut self) -> Self {
        self.underline = true;
        self
    }

    fn to_style(&self) -> Style {
        let mut style = Style::new();
        if self.bold {
            style.set_bold();
        }
        style
    }

    /// Converts the span to a [`StyledString`], dropping the underline flag.
    ///
    /// Consumers that render underlines should go through [`StyledSpan`] so
    /// the flag survives to the element layer.
    pub fn to_styled_string(&self) -> StyledString {
        StyledString::new(self.text.clone(), self.to_style())
    }
}

impl From<&Span> for StyledString {
    fn from(span: &Span) -> Self {
        span.to_styled_string()
    }
}

/// A styled string plus the underline flag, ready for the element layer.
#[derive(Clone, Debug)]
pub struct StyledSpan {
    /// The styled text fragment.
    pub string: StyledString,
    /// Whether the fragment should be rendered with an underline stroke.
    pub underline: bool,
}

impl From<&Span> for StyledSpan {
    fn from(span: &Span) -> Self {
        StyledSpan {
            string: span.to_styled_string(),
            underline: span.underline,
        }
    }
}

/// Converts spans into styled strings while keeping their underline flags.
pub fn spans_to_styled_strings<'a, I>(spans: I) -> Vec<StyledSpan>
where
    I: IntoIterator<Item = &'a Span>,
{
    spans.into_iter().map(StyledSpan::from).collect()
}

/// Parse errors produced by [`parse_markup`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    index: usize,
    message: String,
}

impl ParseError {
    fn new(index: usize, message: impl Into<String>) -> Self {
        Self {
            index,
            message: message.into(),
        }
    }

    /// Byte index in the input where the error was detected.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Human-readable description of the parsing error.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at byte {})", self.message, self.index)
    }
}

impl std::error::Error for ParseError {}

#[derive(Clone, Copy, Debug, Default)]
struct StyleState {
    bold: bool,
    underline: bool,
}

impl StyleState {
    fn to_span(self, text: impl Into<String>) -> Span {
        Span {
            text: text.into(),
            bold: self.bold,
            underline: self.underline,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Marker {
    Bold,
    Underline,
}

impl Marker {
    fn token(self) -> &'static str {
        match self {
            Marker::Bold => "**",
            Marker::Underline => "__",
        }
    }

    fn description(self) -> &'static str {
        match self {
            Marker::Bold => "bold span",
            Marker::Underline => "underline span",
        }
    }
}

/// Parses booklet markup into a list of [`Span`]s.
///
/// `**bold**` and `__underline__` spans may nest; unterminated spans are
/// reported with positional information.
pub fn parse_markup(input: &str) -> Result<Vec<Span>, ParseError> {
    let (spans, idx) = parse_inner(input, 0, StyleState::default(), None)?;
    debug_assert_eq!(idx, input.len());
    Ok(spans)
}

/// Parses markup, falling back to a single plain span on malformed input.
///
/// Record data is free text and may legitimately contain marker characters;
/// generation must not fail over them.
pub fn parse_markup_lossy(input: &str) -> Vec<Span> {
    parse_markup(input).unwrap_or_else(|err| {
        log::warn!("treating text as plain, markup did not parse: {}", err);
        vec![Span::new(input)]
    })
}

fn parse_inner(
    input: &str,
    mut index: usize,
    state: StyleState,
    closing_marker: Option<Marker>,
) -> Result<(Vec<Span>, usize), ParseError> {
    let mut spans = Vec::new();
    let mut buffer = String::new();

    while index < input.len() {
        if let Some(marker) = closing_marker {
            if input[index..].starts_with(marker.token()) {
                flush_buffer(&mut buffer, &mut spans, state);
                index += marker.token().len();
                return Ok((spans, index));
            }
        }

        let opener = if input[index..].starts_with(Marker::Bold.token()) {
            Some(Marker::Bold)
        } else if input[index..].starts_with(Marker::Underline.token()) {
            Some(Marker::Underline)
        } else {
            None
        };

        if let Some(marker) = opener {
            flush_buffer(&mut buffer, &mut spans, state);
            index += marker.token().len();
            let mut nested_state = state;
            match marker {
                Marker::Bold => nested_state.bold = true,
                Marker::Underline => nested_state.underline = true,
            }
            let (nested, new_index) = parse_inner(input, index, nested_state, Some(marker))?;
            spans.extend(nested);
            index = new_index;
            continue;
        }

        let ch = input[index..]
            .chars()
            .next()
            .expect("character extraction succeeded");
        buffer.push(ch);
        index += ch.len_utf8();
    }

    if let Some(marker) = closing_marker {
        Err(ParseError::new(
            index,
            format!("unterminated {}", marker.description()),
        ))
    } else {
        flush_buffer(&mut buffer, &mut spans, state);
        Ok((spans, index))
    }
}

fn flush_buffer(buffer: &mut String, spans: &mut Vec<Span>, state: StyleState) {
    if buffer.is_empty() {
        return;
    }
    spans.push(state.to_span(std::mem::take(buffer)));
}
