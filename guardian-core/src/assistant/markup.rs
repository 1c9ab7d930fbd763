//! Inline markup used in assistant replies.
//!
//! Replies use a tiny subset of markdown: `**bold**` spans, literal
//! bar-chart glyph lines, and code fences that only exist to wrap the bar
//! charts. [`render`] turns a reply into lines the UI can style directly.

/// A run of text within a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub bold: bool,
}

impl Span {
    fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            bold: false,
        }
    }

    fn bold(text: &str) -> Self {
        Self {
            text: text.to_string(),
            bold: true,
        }
    }
}

/// One rendered line of a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupLine {
    /// A line whose first word is made only of `█` and `░` glyphs.
    BarChart(String),
    /// A line fully wrapped in `**`.
    Heading(String),
    /// A line with one or more inline bold spans.
    Rich(Vec<Span>),
    Blank,
    Plain(String),
}

/// Whether a line is a bar chart.
///
/// Only the first whitespace-separated word has to be glyphs, so a chart
/// with a trailing label such as `███░ 94%` is still a chart. A line that
/// merely contains glyphs after other text is not.
fn is_bar_chart(line: &str) -> bool {
    let glyphs = line.split_whitespace().next().unwrap_or("");
    !glyphs.is_empty() && glyphs.chars().all(|c| c == '█' || c == '░')
}

/// Split a line on `**` markers, alternating plain and bold text.
///
/// An unmatched trailing `**` is kept as literal text.
fn split_bold(line: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut rest = line;

    while let Some(start) = rest.find("**") {
        let after = &rest[start + 2..];
        let Some(end) = after.find("**") else {
            break;
        };
        if start > 0 {
            spans.push(Span::plain(&rest[..start]));
        }
        spans.push(Span::bold(&after[..end]));
        rest = &after[end + 2..];
    }

    if !rest.is_empty() {
        spans.push(Span::plain(rest));
    }
    spans
}

/// Convert reply text to styled lines.
pub fn render(content: &str) -> Vec<MarkupLine> {
    content
        .split('\n')
        .filter(|line| !line.starts_with("```"))
        .map(|line| {
            if line.trim().is_empty() {
                MarkupLine::Blank
            } else if is_bar_chart(line) {
                MarkupLine::BarChart(line.to_string())
            } else if line.len() > 4
                && line.starts_with("**")
                && line.ends_with("**")
                && !line[2..line.len() - 2].contains("**")
            {
                MarkupLine::Heading(line[2..line.len() - 2].to_string())
            } else if line.contains("**") {
                MarkupLine::Rich(split_bold(line))
            } else {
                MarkupLine::Plain(line.to_string())
            }
        })
        .collect()
}

/// Strip markup, leaving the text a plain-text client would print.
pub fn to_plain_text(content: &str) -> String {
    render(content)
        .into_iter()
        .map(|line| match line {
            MarkupLine::BarChart(s) | MarkupLine::Heading(s) | MarkupLine::Plain(s) => s,
            MarkupLine::Rich(spans) => spans.into_iter().map(|s| s.text).collect(),
            MarkupLine::Blank => String::new(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_fences_dropped() {
        let lines = render("a\n```\n█░ 50%\n```\nb");
        assert_eq!(
            lines,
            vec![
                MarkupLine::Plain("a".into()),
                MarkupLine::BarChart("█░ 50%".into()),
                MarkupLine::Plain("b".into()),
            ]
        );
    }

    #[test]
    fn test_bar_chart_with_label() {
        assert_eq!(render("███ 80%"), vec![MarkupLine::BarChart("███ 80%".into())]);
        assert_eq!(render("░░░░"), vec![MarkupLine::BarChart("░░░░".into())]);
        assert_eq!(render("Soil ███ 80%"), vec![MarkupLine::Plain("Soil ███ 80%".into())]);
        assert_eq!(render("███x 80%"), vec![MarkupLine::Plain("███x 80%".into())]);
    }

    #[test]
    fn test_heading() {
        assert_eq!(
            render("**Phase 1 - Immediate (0-30 min):**"),
            vec![MarkupLine::Heading("Phase 1 - Immediate (0-30 min):".into())]
        );
    }

    #[test]
    fn test_inline_bold() {
        let lines = render("1. **Meppadi Sector** - Risk Level: CRITICAL");
        assert_eq!(
            lines,
            vec![MarkupLine::Rich(vec![
                Span::plain("1. "),
                Span::bold("Meppadi Sector"),
                Span::plain(" - Risk Level: CRITICAL"),
            ])]
        );
    }

    #[test]
    fn test_two_bold_spans_are_not_a_heading() {
        let lines = render("**a** and **b**");
        assert!(matches!(&lines[0], MarkupLine::Rich(spans) if spans.len() == 3));
    }

    #[test]
    fn test_unmatched_marker_kept() {
        let lines = render("tail **open");
        assert_eq!(
            lines,
            vec![MarkupLine::Rich(vec![Span::plain("tail **open")])]
        );
    }

    #[test]
    fn test_blank_and_plain_text() {
        assert_eq!(render("   "), vec![MarkupLine::Blank]);
        assert_eq!(to_plain_text("**x** y\n\nz"), "x y\n\nz");
    }
}
