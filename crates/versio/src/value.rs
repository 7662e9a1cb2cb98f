//! Field types and the typed values a version holds for each field

use std::cmp::Ordering;
use std::fmt;

/// How the text captured for a field is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldType {
    /// Plain text, compared lexically. Can not be bumped.
    #[default]
    Str,
    /// Unsigned integer. Held as a number, so leading zeros in the
    /// captured text (`007`) are not kept when rendering.
    Int,
    /// Unsigned integers joined by a separator (`1.2.3`). The parts are
    /// addressable as subfields. Like `Int`, parts drop leading zeros, so
    /// `1.02.3` renders as `1.2.3`.
    Dotted(char),
    /// A label from the field's declared sequence followed by a number (`rc4`, `.post5`)
    Sequence,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Str => "string",
            FieldType::Int => "integer",
            FieldType::Dotted(_) => "dotted",
            FieldType::Sequence => "sequence",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The value written into fields to the right of a bumped position.
///
/// Every scheme declares one; there is no default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearValue {
    /// Optional fields disappear; dotted parts fall back to zero
    Absent,
    /// Numeric reset value, usually zero
    Value(u64),
}

impl ClearValue {
    /// The value used for a part inside a dotted field
    pub fn part(&self) -> u64 {
        match self {
            ClearValue::Absent => 0,
            ClearValue::Value(n) => *n,
        }
    }
}

/// A parsed field value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldValue {
    /// Optional field that did not participate in the match
    Absent,
    Str(String),
    Int(u64),
    Dotted(Vec<u64>),
    /// `label` indexes the field's declared sequence
    Labeled { label: usize, number: u64 },
}

impl FieldValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Absent)
    }

    /// Coerce captured text into a value of the given type.
    ///
    /// Sequence tokens are tried longest first, so with `["c", "rc"]` the
    /// text `rc4` resolves to `rc` rather than failing on `c`. With
    /// `ignore_case` tokens match regardless of ASCII case; the value keeps
    /// the label index, so it renders with the declared token.
    pub(crate) fn coerce(
        text: Option<&str>,
        field_type: FieldType,
        sequence: &[String],
        ignore_case: bool,
    ) -> Result<FieldValue, String> {
        let text = match text {
            Some(text) => text,
            None => return Ok(FieldValue::Absent),
        };

        match field_type {
            FieldType::Str => Ok(FieldValue::Str(text.to_string())),
            FieldType::Int => parse_number(text).map(FieldValue::Int),
            FieldType::Dotted(separator) => text
                .split(separator)
                .map(parse_number)
                .collect::<Result<Vec<_>, _>>()
                .map(FieldValue::Dotted),
            FieldType::Sequence => {
                if text.is_empty() {
                    return Ok(FieldValue::Absent);
                }

                let mut order: Vec<usize> = (0..sequence.len()).collect();
                order.sort_by(|a, b| sequence[*b].len().cmp(&sequence[*a].len()));

                for label in order {
                    if let Some(rest) = strip_token(text, &sequence[label], ignore_case) {
                        if let Ok(number) = parse_number(rest) {
                            return Ok(FieldValue::Labeled { label, number });
                        }
                    }
                }

                Err(format!(
                    "\"{}\" does not start with one of [{}] followed by a number",
                    text,
                    sequence.join(", ")
                ))
            }
        }
    }

    /// Render the value as text. Absent renders as the empty string.
    pub(crate) fn render(&self, field_type: FieldType, sequence: &[String]) -> String {
        match self {
            FieldValue::Absent => String::new(),
            FieldValue::Str(s) => s.clone(),
            FieldValue::Int(n) => n.to_string(),
            FieldValue::Dotted(parts) => {
                let separator = match field_type {
                    FieldType::Dotted(separator) => separator,
                    _ => '.',
                };
                parts
                    .iter()
                    .map(|part| part.to_string())
                    .collect::<Vec<_>>()
                    .join(&separator.to_string())
            }
            FieldValue::Labeled { label, number } => {
                let token = sequence.get(*label).map(String::as_str).unwrap_or_default();
                format!("{}{}", token, number)
            }
        }
    }

    /// The value this field takes when a field to its left is bumped
    pub(crate) fn cleared(&self, field_type: FieldType, clear: ClearValue) -> FieldValue {
        match (field_type, clear) {
            (FieldType::Sequence, _) | (_, ClearValue::Absent) => FieldValue::Absent,
            (FieldType::Int, ClearValue::Value(n)) => FieldValue::Int(n),
            (FieldType::Str, ClearValue::Value(n)) => FieldValue::Str(n.to_string()),
            (FieldType::Dotted(_), ClearValue::Value(n)) => match self {
                FieldValue::Dotted(parts) => FieldValue::Dotted(vec![n; parts.len()]),
                _ => FieldValue::Dotted(vec![n]),
            },
        }
    }

    /// Order two values of the same field.
    ///
    /// Absent sorts before any present value, except for sequence fields
    /// where absent is the final state and sorts after every label.
    pub(crate) fn compare(&self, other: &FieldValue, field_type: FieldType) -> Ordering {
        match (self, other) {
            (FieldValue::Absent, FieldValue::Absent) => Ordering::Equal,
            (FieldValue::Absent, _) if field_type == FieldType::Sequence => Ordering::Greater,
            (_, FieldValue::Absent) if field_type == FieldType::Sequence => Ordering::Less,
            (FieldValue::Absent, _) => Ordering::Less,
            (_, FieldValue::Absent) => Ordering::Greater,
            (FieldValue::Str(a), FieldValue::Str(b)) => a.cmp(b),
            (FieldValue::Int(a), FieldValue::Int(b)) => a.cmp(b),
            (FieldValue::Dotted(a), FieldValue::Dotted(b)) => compare_parts(a, b),
            (
                FieldValue::Labeled { label: la, number: na },
                FieldValue::Labeled { label: lb, number: nb },
            ) => la.cmp(lb).then(na.cmp(nb)),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            FieldValue::Absent => 0,
            FieldValue::Str(_) => 1,
            FieldValue::Int(_) => 2,
            FieldValue::Dotted(_) => 3,
            FieldValue::Labeled { .. } => 4,
        }
    }
}

fn strip_token<'t>(text: &'t str, token: &str, ignore_case: bool) -> Option<&'t str> {
    if !ignore_case {
        return text.strip_prefix(token);
    }
    let head = text.get(..token.len())?;
    if head.eq_ignore_ascii_case(token) {
        Some(&text[token.len()..])
    } else {
        None
    }
}

fn parse_number(text: &str) -> Result<u64, String> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("\"{}\" is not a number", text));
    }
    text.parse::<u64>()
        .map_err(|e| format!("\"{}\" is not a number: {}", text, e))
}

/// Part-wise numeric comparison, the shorter side padded with zeros
fn compare_parts(a: &[u64], b: &[u64]) -> Ordering {
    let max_len = std::cmp::max(a.len(), b.len());
    for i in 0..max_len {
        let a_val = a.get(i).copied().unwrap_or(0);
        let b_val = b.get(i).copied().unwrap_or(0);
        match a_val.cmp(&b_val) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}
