//! Declarative version schemes
//!
//! A scheme names the fields of a version, the regular expression used to
//! capture them, the template used to render them again, and the rules for
//! bumping (subfields, label sequences, clear value). Schemes are validated
//! once when built and are immutable afterwards, so they can be shared
//! freely behind an `Arc`.

use std::collections::{HashMap, HashSet};
use std::fmt;

use regex::{Regex, RegexBuilder};

use crate::error::{Result, VersionError};
use crate::template::FormatTemplate;
use crate::value::{ClearValue, FieldType};

/// Regex compilation options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParseFlags {
    /// Ignore whitespace and allow `#` comments in the pattern
    pub verbose: bool,
    pub case_insensitive: bool,
}

impl ParseFlags {
    pub fn verbose() -> Self {
        ParseFlags {
            verbose: true,
            ..Default::default()
        }
    }
}

/// What a field or subfield name resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// A top-level field
    Field(usize),
    /// Part `offset` of the dotted field at index `field`
    Subfield { field: usize, offset: usize },
}

impl Target {
    /// Index of the top-level field that holds the target
    pub fn field(&self) -> usize {
        match self {
            Target::Field(index) => *index,
            Target::Subfield { field, .. } => *field,
        }
    }
}

/// A validated version scheme
#[derive(Debug, Clone)]
pub struct VersionScheme {
    name: String,
    description: String,
    parse_pattern: String,
    parse_flags: ParseFlags,
    regex: Regex,
    format_template: FormatTemplate,
    field_types: Vec<FieldType>,
    fields: Vec<String>,
    subfields: Vec<Vec<String>>,
    clear_value: ClearValue,
    sequences: Vec<Vec<String>>,
    field_index: HashMap<String, usize>,
    subfield_index: HashMap<String, (usize, usize)>,
}

impl VersionScheme {
    /// Start declaring a scheme
    pub fn builder(
        name: impl Into<String>,
        parse_pattern: impl Into<String>,
        format_template: impl Into<String>,
    ) -> VersionSchemeBuilder {
        VersionSchemeBuilder {
            name: name.into(),
            parse_pattern: parse_pattern.into(),
            format_template: format_template.into(),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn parse_pattern(&self) -> &str {
        &self.parse_pattern
    }

    pub fn parse_flags(&self) -> ParseFlags {
        self.parse_flags
    }

    pub fn format_template(&self) -> &FormatTemplate {
        &self.format_template
    }

    /// Field names, lowercased, in declaration order
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn field_types(&self) -> &[FieldType] {
        &self.field_types
    }

    pub fn field_type(&self, index: usize) -> FieldType {
        self.field_types.get(index).copied().unwrap_or_default()
    }

    pub fn clear_value(&self) -> ClearValue {
        self.clear_value
    }

    /// Index of a top-level field
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.field_index.get(&name.to_lowercase()).copied()
    }

    /// `(field index, offset)` of a subfield
    pub fn subfield_position(&self, name: &str) -> Option<(usize, usize)> {
        self.subfield_index.get(&name.to_lowercase()).copied()
    }

    /// Subfield names declared for a field, empty when it has none
    pub fn subfields(&self, field: usize) -> &[String] {
        self.subfields.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    /// Allowed label tokens of a field, in bump order. Empty when the field
    /// has no declared sequence.
    pub fn sequence(&self, field: usize) -> &[String] {
        self.sequences.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    /// Resolve a field or subfield name. Subfield names win, matching
    /// how bump addresses them.
    pub fn resolve(&self, name: &str) -> Result<Target> {
        if let Some((field, offset)) = self.subfield_position(name) {
            return Ok(Target::Subfield { field, offset });
        }
        self.field_index(name)
            .map(Target::Field)
            .ok_or_else(|| VersionError::UnknownField(name.to_string()))
    }

    /// Whether the whole text matches the scheme's pattern
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Captured text per field, `None` for groups that did not participate.
    /// Returns `None` when the text does not match.
    pub fn captures<'t>(&self, text: &'t str) -> Option<Vec<Option<&'t str>>> {
        self.regex.captures(text).map(|caps| {
            (1..caps.len())
                .map(|group| caps.get(group).map(|m| m.as_str()))
                .collect()
        })
    }

    /// Versions of two schemes are comparable when they agree on field
    /// names, field types and label sequences
    pub fn same_fields(&self, other: &VersionScheme) -> bool {
        self.fields == other.fields
            && self.field_types == other.field_types
            && self.sequences == other.sequences
    }
}

impl fmt::Display for VersionScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Builder for [`VersionScheme`]; `build` performs all validation
#[derive(Debug, Clone, Default)]
pub struct VersionSchemeBuilder {
    name: String,
    parse_pattern: String,
    parse_flags: ParseFlags,
    format_template: String,
    field_types: Vec<FieldType>,
    fields: Vec<String>,
    subfields: Vec<(String, Vec<String>)>,
    clear_value: Option<ClearValue>,
    sequences: Vec<(String, Vec<String>)>,
    description: Option<String>,
}

impl VersionSchemeBuilder {
    pub fn parse_flags(mut self, flags: ParseFlags) -> Self {
        self.parse_flags = flags;
        self
    }

    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// One type per field. When never called, every field is a string.
    pub fn field_types<I>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = FieldType>,
    {
        self.field_types = types.into_iter().collect();
        self
    }

    pub fn subfields<I, S>(mut self, field: impl Into<String>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subfields
            .push((field.into(), names.into_iter().map(Into::into).collect()));
        self
    }

    pub fn sequence<I, S>(mut self, field: impl Into<String>, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sequences
            .push((field.into(), tokens.into_iter().map(Into::into).collect()));
        self
    }

    /// Required: what fields right of a bumped position are reset to
    pub fn clear_value(mut self, clear_value: ClearValue) -> Self {
        self.clear_value = Some(clear_value);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Validate the declaration and build the lookup tables
    pub fn build(self) -> Result<VersionScheme> {
        let name = self.name;
        let err = |reason: String| VersionError::configuration(&name, reason);

        let anchored = if self.parse_flags.verbose {
            // the newline terminates a trailing comment in verbose mode
            format!("^(?:{}\n)$", self.parse_pattern)
        } else {
            format!("^(?:{})$", self.parse_pattern)
        };
        let regex = RegexBuilder::new(&anchored)
            .ignore_whitespace(self.parse_flags.verbose)
            .case_insensitive(self.parse_flags.case_insensitive)
            .build()
            .map_err(|e| err(format!("invalid parse pattern: {}", e)))?;

        let format_template = FormatTemplate::parse(&self.format_template)
            .map_err(|reason| err(format!("invalid format template: {}", reason)))?;

        let fields: Vec<String> = self.fields.iter().map(|f| f.to_lowercase()).collect();
        if fields.is_empty() {
            return Err(err("no fields declared".to_string()));
        }

        let groups = regex.captures_len() - 1;
        if groups != fields.len() {
            return Err(err(format!(
                "{} fields but {} capture groups",
                fields.len(),
                groups
            )));
        }
        if format_template.placeholders() != fields.len() {
            return Err(err(format!(
                "{} fields but {} format placeholders",
                fields.len(),
                format_template.placeholders()
            )));
        }

        let field_types = if self.field_types.is_empty() {
            vec![FieldType::Str; fields.len()]
        } else if self.field_types.len() == fields.len() {
            self.field_types
        } else {
            return Err(err(format!(
                "{} fields but {} field types",
                fields.len(),
                self.field_types.len()
            )));
        };

        for (index, width) in format_template.widths().enumerate() {
            if width > 0 && !matches!(field_types[index], FieldType::Int | FieldType::Dotted(_)) {
                return Err(err(format!(
                    "zero padding needs a numeric field, \"{}\" is {}",
                    fields[index], field_types[index]
                )));
            }
        }

        let mut field_index = HashMap::new();
        for (index, field) in fields.iter().enumerate() {
            if field.is_empty() {
                return Err(err("empty field name".to_string()));
            }
            if field_index.insert(field.clone(), index).is_some() {
                return Err(err(format!("duplicate field \"{}\"", field)));
            }
        }

        let mut subfields = vec![Vec::new(); fields.len()];
        let mut subfield_index = HashMap::new();
        for (field, names) in self.subfields {
            let field = field.to_lowercase();
            let index = *field_index
                .get(&field)
                .ok_or_else(|| err(format!("subfields declared for unknown field \"{}\"", field)))?;
            if !matches!(field_types[index], FieldType::Dotted(_)) {
                return Err(err(format!(
                    "subfields need a dotted field, \"{}\" is {}",
                    field, field_types[index]
                )));
            }
            if !subfields[index].is_empty() {
                return Err(err(format!("subfields of \"{}\" declared twice", field)));
            }

            for (offset, subfield) in names.iter().enumerate() {
                let subfield = subfield.to_lowercase();
                if subfield.is_empty() {
                    return Err(err(format!("empty subfield name in \"{}\"", field)));
                }
                if field_index.contains_key(&subfield) {
                    return Err(err(format!(
                        "subfield \"{}\" collides with a field name",
                        subfield
                    )));
                }
                if subfield_index.insert(subfield.clone(), (index, offset)).is_some() {
                    return Err(err(format!("duplicate subfield \"{}\"", subfield)));
                }
                subfields[index].push(subfield);
            }
        }

        let mut sequences = vec![Vec::new(); fields.len()];
        for (field, tokens) in self.sequences {
            let field = field.to_lowercase();
            let index = *field_index
                .get(&field)
                .ok_or_else(|| err(format!("sequence declared for unknown field \"{}\"", field)))?;
            if field_types[index] != FieldType::Sequence {
                return Err(err(format!(
                    "sequence declared for \"{}\", which is {}",
                    field, field_types[index]
                )));
            }
            if !sequences[index].is_empty() {
                return Err(err(format!("sequence of \"{}\" declared twice", field)));
            }

            let mut seen = HashSet::new();
            for token in &tokens {
                if token.is_empty() {
                    return Err(err(format!("empty token in sequence of \"{}\"", field)));
                }
                if !seen.insert(token.as_str()) {
                    return Err(err(format!(
                        "duplicate token \"{}\" in sequence of \"{}\"",
                        token, field
                    )));
                }
            }
            sequences[index] = tokens;
        }

        for (index, field_type) in field_types.iter().enumerate() {
            if *field_type == FieldType::Sequence && sequences[index].is_empty() {
                return Err(err(format!(
                    "sequence field \"{}\" has no declared tokens",
                    fields[index]
                )));
            }
        }

        let clear_value = self
            .clear_value
            .ok_or_else(|| err("no clear value declared".to_string()))?;

        Ok(VersionScheme {
            description: self.description.unwrap_or_else(|| name.clone()),
            name,
            parse_pattern: self.parse_pattern,
            parse_flags: self.parse_flags,
            regex,
            format_template,
            field_types,
            fields,
            subfields,
            clear_value,
            sequences,
            field_index,
            subfield_index,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple() -> VersionSchemeBuilder {
        VersionScheme::builder("A.B", r"(\d+)\.(\d+)", "{}.{}")
            .fields(["Major", "Minor"])
            .field_types([FieldType::Int, FieldType::Int])
            .clear_value(ClearValue::Value(0))
    }

    fn configuration_reason(result: Result<VersionScheme>) -> String {
        match result {
            Err(VersionError::Configuration { reason, .. }) => reason,
            other => panic!("expected a configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_build_simple() {
        let scheme = simple().build().unwrap();
        assert_eq!(scheme.name(), "A.B");
        assert_eq!(scheme.description(), "A.B");
        assert_eq!(scheme.fields(), ["major", "minor"]);
        assert_eq!(scheme.field_index("MINOR"), Some(1));
        assert_eq!(scheme.field_index("tiny"), None);
        assert!(scheme.sequence(0).is_empty());
    }

    #[test]
    fn test_pattern_is_anchored() {
        let scheme = simple().build().unwrap();
        assert!(scheme.is_match("1.2"));
        assert!(!scheme.is_match("1.2.3"));
        assert!(!scheme.is_match("v1.2"));
        assert!(!scheme.is_match("1.2 "));
    }

    #[test]
    fn test_captures() {
        let scheme = VersionScheme::builder("opt", r"(\d+)(-\w+)?", "{}{}")
            .fields(["num", "tag"])
            .clear_value(ClearValue::Absent)
            .build()
            .unwrap();
        assert_eq!(scheme.captures("12-x"), Some(vec![Some("12"), Some("-x")]));
        assert_eq!(scheme.captures("12"), Some(vec![Some("12"), None]));
        assert_eq!(scheme.captures("x"), None);
    }

    #[test]
    fn test_verbose_pattern_with_trailing_comment() {
        let scheme = VersionScheme::builder(
            "verbose",
            r"
            (\d+)   # major
            \.
            (\d+)   # minor",
            "{}.{}",
        )
        .parse_flags(ParseFlags::verbose())
        .fields(["major", "minor"])
        .clear_value(ClearValue::Value(0))
        .build()
        .unwrap();
        assert!(scheme.is_match("1.2"));
        assert!(!scheme.is_match("1.2.3"));
    }

    #[test]
    fn test_case_insensitive_pattern() {
        let scheme = VersionScheme::builder("v", r"v(\d+)", "v{}")
            .parse_flags(ParseFlags {
                case_insensitive: true,
                ..Default::default()
            })
            .fields(["major"])
            .clear_value(ClearValue::Value(0))
            .build()
            .unwrap();
        assert!(scheme.is_match("V1"));
    }

    #[test]
    fn test_count_mismatches() {
        let reason = configuration_reason(simple().fields(["major"]).build());
        assert_eq!(reason, "1 fields but 2 capture groups");

        let reason = configuration_reason(
            VersionScheme::builder("x", r"(\d+)\.(\d+)", "{}")
                .fields(["major", "minor"])
                .build(),
        );
        assert_eq!(reason, "2 fields but 1 format placeholders");

        let reason = configuration_reason(simple().field_types([FieldType::Int]).build());
        assert_eq!(reason, "2 fields but 1 field types");

        let reason = configuration_reason(
            VersionScheme::builder("x", "", "").build(),
        );
        assert_eq!(reason, "no fields declared");
    }

    #[test]
    fn test_invalid_pattern_and_template() {
        let reason = configuration_reason(
            VersionScheme::builder("x", r"(\d+", "{}").fields(["a"]).build(),
        );
        assert!(reason.starts_with("invalid parse pattern"));

        let reason = configuration_reason(
            VersionScheme::builder("x", r"(\d+)", "{").fields(["a"]).build(),
        );
        assert!(reason.starts_with("invalid format template"));
    }

    #[test]
    fn test_duplicate_fields() {
        let reason = configuration_reason(simple().fields(["major", "MAJOR"]).build());
        assert_eq!(reason, "duplicate field \"major\"");
    }

    #[test]
    fn test_subfield_validation() {
        let dotted = || {
            VersionScheme::builder("d", r"(\d+(?:\.\d+)*)(-\d+)?", "{}{}")
                .fields(["release", "build"])
                .field_types([FieldType::Dotted('.'), FieldType::Str])
                .clear_value(ClearValue::Value(0))
        };

        let scheme = dotted()
            .subfields("Release", ["Major", "Minor"])
            .build()
            .unwrap();
        assert_eq!(scheme.subfield_position("minor"), Some((0, 1)));
        assert_eq!(scheme.subfields(0), ["major", "minor"]);
        assert_eq!(scheme.resolve("minor"), Ok(Target::Subfield { field: 0, offset: 1 }));
        assert_eq!(scheme.resolve("build"), Ok(Target::Field(1)));
        assert_eq!(
            scheme.resolve("nope"),
            Err(VersionError::UnknownField("nope".to_string()))
        );

        let reason = configuration_reason(dotted().subfields("release", ["major", "major"]).build());
        assert_eq!(reason, "duplicate subfield \"major\"");

        let reason = configuration_reason(dotted().subfields("release", ["build"]).build());
        assert_eq!(reason, "subfield \"build\" collides with a field name");

        let reason = configuration_reason(dotted().subfields("build", ["x"]).build());
        assert_eq!(reason, "subfields need a dotted field, \"build\" is string");

        let reason = configuration_reason(dotted().subfields("other", ["x"]).build());
        assert_eq!(reason, "subfields declared for unknown field \"other\"");
    }

    #[test]
    fn test_sequence_validation() {
        let labeled = || {
            VersionScheme::builder("s", r"(\d+)((?:a|b)\d+)?", "{}{}")
                .fields(["release", "pre"])
                .field_types([FieldType::Int, FieldType::Sequence])
                .clear_value(ClearValue::Value(0))
        };

        let scheme = labeled().sequence("pre", ["a", "b"]).build().unwrap();
        assert_eq!(scheme.sequence(1), ["a", "b"]);

        let reason = configuration_reason(labeled().build());
        assert_eq!(reason, "sequence field \"pre\" has no declared tokens");

        let reason = configuration_reason(labeled().sequence("pre", ["a", "a"]).build());
        assert_eq!(reason, "duplicate token \"a\" in sequence of \"pre\"");

        let reason = configuration_reason(
            labeled()
                .sequence("pre", ["a"])
                .sequence("release", ["x"])
                .build(),
        );
        assert_eq!(reason, "sequence declared for \"release\", which is integer");
    }

    #[test]
    fn test_clear_value_is_required() {
        let reason = configuration_reason(
            VersionScheme::builder("x", r"(\d+)\.(\d+)", "{}.{}")
                .fields(["major", "minor"])
                .field_types([FieldType::Int, FieldType::Int])
                .build(),
        );
        assert_eq!(reason, "no clear value declared");
    }

    #[test]
    fn test_zero_padding_needs_numeric_field() {
        let reason = configuration_reason(
            VersionScheme::builder("x", r"(\d+)-(\w+)", "{}-{:02}")
                .fields(["build", "tag"])
                .field_types([FieldType::Int, FieldType::Str])
                .clear_value(ClearValue::Value(0))
                .build(),
        );
        assert_eq!(reason, "zero padding needs a numeric field, \"tag\" is string");

        let reason = configuration_reason(
            VersionScheme::builder("x", r"(\d+)((?:a|b)\d+)", "{}{:03}")
                .fields(["release", "pre"])
                .field_types([FieldType::Int, FieldType::Sequence])
                .sequence("pre", ["a", "b"])
                .clear_value(ClearValue::Value(0))
                .build(),
        );
        assert_eq!(reason, "zero padding needs a numeric field, \"pre\" is sequence");

        assert!(simple().build().is_ok());
    }

    #[test]
    fn test_same_fields() {
        let a = simple().build().unwrap();
        let b = VersionScheme::builder("other", r"(\d+)-(\d+)", "{}-{}")
            .fields(["major", "minor"])
            .field_types([FieldType::Int, FieldType::Int])
            .clear_value(ClearValue::Absent)
            .build()
            .unwrap();
        let c = VersionScheme::builder("c", r"(\d+)", "{}")
            .fields(["major"])
            .field_types([FieldType::Int])
            .clear_value(ClearValue::Value(0))
            .build()
            .unwrap();
        let strings = VersionScheme::builder("strings", r"(\d+)-(\d+)", "{}-{}")
            .fields(["major", "minor"])
            .clear_value(ClearValue::Value(0))
            .build()
            .unwrap();
        assert!(a.same_fields(&b));
        assert!(!a.same_fields(&c));
        assert!(!a.same_fields(&strings));
    }

    #[test]
    fn test_same_fields_needs_same_sequences() {
        let labeled = |tokens: [&str; 2]| {
            VersionScheme::builder("s", r"(\d+)(\w+\d+)?", "{}{}")
                .fields(["release", "pre"])
                .field_types([FieldType::Int, FieldType::Sequence])
                .sequence("pre", tokens)
                .clear_value(ClearValue::Value(0))
                .build()
                .unwrap()
        };
        assert!(labeled(["a", "b"]).same_fields(&labeled(["a", "b"])));
        assert!(!labeled(["a", "b"]).same_fields(&labeled(["b", "a"])));
    }
}
