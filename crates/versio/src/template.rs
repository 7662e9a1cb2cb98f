//! Format templates used to assemble field values back into a version string
//!
//! A template is literal text with one `{}` placeholder per field, in field
//! order. A placeholder may zero-pad its value to a minimum width with
//! `{:02}`. Literal braces are written as `{{` and `}}`.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder { width: usize },
}

/// A parsed format template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl FormatTemplate {
    /// Parse a template, returning a description of the problem on failure
    pub fn parse(source: &str) -> Result<Self, String> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut spec = String::new();
                    let mut closed = false;
                    for c in chars.by_ref() {
                        if c == '}' {
                            closed = true;
                            break;
                        }
                        spec.push(c);
                    }
                    if !closed {
                        return Err(format!("unclosed placeholder in \"{}\"", source));
                    }

                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Placeholder {
                        width: parse_spec(&spec)
                            .ok_or_else(|| format!("unsupported placeholder \"{{{}}}\"", spec))?,
                    });
                }
                '}' => return Err(format!("unmatched '}}' in \"{}\"", source)),
                c => literal.push(c),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(FormatTemplate {
            source: source.to_string(),
            segments,
        })
    }

    /// Number of placeholders
    pub fn placeholders(&self) -> usize {
        self.segments
            .iter()
            .filter(|segment| matches!(segment, Segment::Placeholder { .. }))
            .count()
    }

    /// Zero-pad width of each placeholder in order, `0` when unpadded
    pub fn widths(&self) -> impl Iterator<Item = usize> + '_ {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Placeholder { width } => Some(*width),
            Segment::Literal(_) => None,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Substitute the rendered values into the placeholders, in order.
    ///
    /// Empty values stay empty so absent optional fields vanish instead of
    /// being padded.
    pub fn render<S: AsRef<str>>(&self, values: &[S]) -> String {
        let mut out = String::new();
        let mut values = values.iter();

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder { width } => {
                    let value: &str = values.next().map(|value| value.as_ref()).unwrap_or("");
                    if !value.is_empty() && value.len() < *width {
                        out.push_str(&"0".repeat(width - value.len()));
                    }
                    out.push_str(value);
                }
            }
        }

        out
    }
}

/// `""` is a bare placeholder, `":0N"` a zero-padded one
fn parse_spec(spec: &str) -> Option<usize> {
    if spec.is_empty() {
        return Some(0);
    }
    let width = spec.strip_prefix(":0")?;
    if width.is_empty() || !width.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    width.parse().ok()
}

impl fmt::Display for FormatTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}
