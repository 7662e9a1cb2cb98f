//! Version values bound to a scheme

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{Result, VersionError};
use crate::registry::supported_version_schemes;
use crate::scheme::{Target, VersionScheme};
use crate::value::FieldValue;

/// A parsed version.
///
/// Holds one typed value per field of its scheme. Comparison and equality
/// work on those values, never on the rendered text. `bump` mutates in
/// place and needs `&mut self`; share a `Version` behind a lock if several
/// threads bump it.
#[derive(Debug, Clone)]
pub struct Version {
    pub(crate) scheme: Arc<VersionScheme>,
    pub(crate) values: Vec<FieldValue>,
}

impl Version {
    /// Parse using the first supported scheme that accepts the text
    pub fn new(text: &str) -> Result<Self> {
        Self::parse(text, None)
    }

    /// Parse using exactly this scheme
    pub fn with_scheme(text: &str, scheme: Arc<VersionScheme>) -> Result<Self> {
        Self::parse(text, Some(scheme))
    }

    /// Parse the text with the given scheme, or with the supported schemes
    /// (see [`crate::set_supported_version_schemes`]) in order when none is
    /// given.
    pub fn parse(text: &str, scheme: Option<Arc<VersionScheme>>) -> Result<Self> {
        if let Some(scheme) = scheme {
            return Self::parse_with_scheme(text, scheme);
        }

        for scheme in supported_version_schemes() {
            match Self::parse_with_scheme(text, scheme) {
                Ok(version) => {
                    log::debug!("Parsed \"{}\" with scheme {}", text, version.scheme.name());
                    return Ok(version);
                }
                Err(e) => log::trace!("{}", e),
            }
        }

        Err(VersionError::parse(text, "no supported version scheme matches"))
    }

    fn parse_with_scheme(text: &str, scheme: Arc<VersionScheme>) -> Result<Self> {
        let captures = scheme.captures(text).ok_or_else(|| {
            VersionError::parse(text, format!("does not match version scheme \"{}\"", scheme.name()))
        })?;

        let values = captures
            .into_iter()
            .enumerate()
            .map(|(index, capture)| {
                FieldValue::coerce(
                    capture,
                    scheme.field_type(index),
                    scheme.sequence(index),
                    scheme.parse_flags().case_insensitive,
                )
                .map_err(|reason| {
                    VersionError::parse(
                        text,
                        format!("field \"{}\": {}", scheme.fields()[index], reason),
                    )
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Version { scheme, values })
    }

    pub fn scheme(&self) -> &Arc<VersionScheme> {
        &self.scheme
    }

    /// Field values in scheme field order
    pub fn values(&self) -> &[FieldValue] {
        &self.values
    }

    /// `(field name, value)` pairs in scheme field order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> + '_ {
        self.scheme
            .fields()
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }

    /// Value of a field or subfield. A subfield reads as `Int`, or `Absent`
    /// when its field is absent or has fewer parts.
    pub fn get(&self, name: &str) -> Result<FieldValue> {
        Ok(match self.scheme.resolve(name)? {
            Target::Field(index) => self.values[index].clone(),
            Target::Subfield { field, offset } => match &self.values[field] {
                FieldValue::Dotted(parts) => parts
                    .get(offset)
                    .map(|part| FieldValue::Int(*part))
                    .unwrap_or(FieldValue::Absent),
                _ => FieldValue::Absent,
            },
        })
    }

    /// Order this version against another.
    ///
    /// Fields are compared left to right; see [`FieldValue`] for the
    /// per-type rules. Fails when the schemes differ in field names, field
    /// types or label sequences.
    pub fn compare(&self, other: &Version) -> Result<Ordering> {
        if !self.scheme.same_fields(&other.scheme) {
            return Err(VersionError::TypeMismatch {
                left: self.scheme.name().to_string(),
                right: other.scheme.name().to_string(),
            });
        }

        for (index, (a, b)) in self.values.iter().zip(other.values.iter()).enumerate() {
            match a.compare(b, self.scheme.field_type(index)) {
                Ordering::Equal => continue,
                ordering => return Ok(ordering),
            }
        }
        Ok(Ordering::Equal)
    }

    /// Parse the text with this version's scheme and compare against it
    pub fn compare_text(&self, text: &str) -> Result<Ordering> {
        let other = Version::with_scheme(text, self.scheme.clone())?;
        self.compare(&other)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .values
            .iter()
            .enumerate()
            .map(|(index, value)| {
                value.render(self.scheme.field_type(index), self.scheme.sequence(index))
            })
            .collect();
        write!(f, "{}", self.scheme.format_template().render(rendered.as_slice()))
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self> {
        Version::new(s)
    }
}

/// Versions of incompatible schemes are never equal
impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        matches!(self.compare(other), Ok(Ordering::Equal))
    }
}

/// Versions of incompatible schemes are unordered
impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(other).ok()
    }
}
