//! Text wrapping utilities for ratatui Lines.
//!
//! Lines are wrapped before rendering so the transcript knows exactly how
//! many rows it occupies, which is what scrolling is computed from.

use ratatui::text::{Line, Span};

/// Wrap each Line to fit within `width` columns, preserving span styles.
///
/// Every non-empty row, first and continuation alike, is indented by
/// `indent` spaces. Empty lines stay empty.
pub fn wrap_lines(lines: Vec<Line<'static>>, width: usize, indent: usize) -> Vec<Line<'static>> {
    if width == 0 {
        return lines;
    }
    let prefix = " ".repeat(indent);
    let options = textwrap::Options::new(width)
        .initial_indent(&prefix)
        .subsequent_indent(&prefix)
        .wrap_algorithm(textwrap::WrapAlgorithm::FirstFit);

    lines
        .into_iter()
        .flat_map(|line| wrap_line(&line, &options, &prefix))
        .collect()
}

/// Wrap a single Line, letting textwrap pick the break points.
fn wrap_line(
    line: &Line<'static>,
    options: &textwrap::Options<'_>,
    prefix: &str,
) -> Vec<Line<'static>> {
    if line.spans.is_empty() {
        return vec![Line::default()];
    }
    let plain: String = line.spans.iter().map(|s| s.content.as_ref()).collect();

    let mut rows = Vec::new();
    let mut cursor = 0;
    for row in textwrap::wrap(&plain, options) {
        let body = row.strip_prefix(prefix).unwrap_or(&*row);
        // Rows are slices of the input in order; find where this one starts.
        let Some(offset) = plain[cursor..].find(body) else {
            continue;
        };
        let start = cursor + offset;
        let end = start + body.len();
        cursor = end;

        let mut spans = Vec::new();
        if !prefix.is_empty() {
            spans.push(Span::raw(prefix.to_string()));
        }
        spans.extend(styled_range(&line.spans, start, end));
        rows.push(Line::from(spans));
    }
    rows
}

/// The parts of `spans` covering bytes `start..end` of their joined text.
fn styled_range(spans: &[Span<'static>], start: usize, end: usize) -> Vec<Span<'static>> {
    let mut out = Vec::new();
    let mut span_start = 0;
    for span in spans {
        let span_end = span_start + span.content.len();
        let from = start.max(span_start);
        let to = end.min(span_end);
        if from < to {
            out.push(Span::styled(
                span.content[from - span_start..to - span_start].to_string(),
                span.style,
            ));
        }
        span_start = span_end;
    }
    out
}
