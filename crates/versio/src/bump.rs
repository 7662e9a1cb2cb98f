//! Bumping: increment a field or subfield and clear everything to its right
//!
//! A bump either strictly increases the version or leaves it untouched and
//! returns `false`. The `false` cases are expected outcomes, not errors:
//! a sequence label already at its last token, a subfield position the
//! value does not have, or an absent sequence field (which is already in
//! its final state).

use crate::error::{Result, VersionError};
use crate::scheme::Target;
use crate::value::{FieldType, FieldValue};
use crate::version::Version;

impl Version {
    /// Bump a field or subfield by name.
    ///
    /// `index` selects the axis inside the field:
    /// - dotted field: the part to increment (default: the last part);
    /// - sequence field: `0` advances the label and resets the number to 1,
    ///   `1` (the default) increments the number;
    /// - integer field: only `0` or none.
    ///
    /// Subfield names address one part of a dotted field directly, so
    /// `bump("major", None)` is `bump("release", Some(0))` for PEP 440.
    /// `index` is ignored for subfield names.
    pub fn bump(&mut self, name: &str, index: Option<usize>) -> Result<bool> {
        let target = self.scheme.resolve(name)?;
        let field = target.field();

        let bumped = match (target, self.scheme.field_type(field)) {
            (Target::Subfield { offset, .. }, _) => self.bump_part(field, Some(offset)),
            (Target::Field(_), FieldType::Dotted(_)) => self.bump_part(field, index),
            (Target::Field(_), FieldType::Sequence) => self.bump_sequence(field, index),
            (Target::Field(_), FieldType::Int) => self.bump_int(field, index),
            (Target::Field(_), FieldType::Str) => {
                return Err(VersionError::configuration(
                    self.scheme.name(),
                    format!(
                        "field \"{}\" is a string and can not be bumped",
                        self.scheme.fields()[field]
                    ),
                ));
            }
        };

        if bumped {
            self.clear_right_of(field);
        }
        log::debug!(
            "bump {} {:?} on {} scheme: {} ({})",
            name,
            index,
            self.scheme.name(),
            self,
            if bumped { "bumped" } else { "unchanged" }
        );

        Ok(bumped)
    }

    /// Bump the last field of the scheme
    pub fn bump_least_significant(&mut self) -> Result<bool> {
        let scheme = self.scheme.clone();
        match scheme.fields().last() {
            Some(name) => self.bump(name, None),
            None => Ok(false),
        }
    }

    /// Enter a sequence on an absent sequence field: first label, number 1
    /// (`1.2.3` becomes `1.2.3a1` for `pre`). Fields to the right are
    /// cleared.
    ///
    /// Unlike `bump`, this moves a final version back to a pre-release
    /// state, so the result usually sorts lower. Returns `false` when the
    /// field already holds a value.
    pub fn start_sequence(&mut self, name: &str) -> Result<bool> {
        let field = match self.scheme.resolve(name)? {
            Target::Field(field) if self.scheme.field_type(field) == FieldType::Sequence => field,
            _ => {
                return Err(VersionError::configuration(
                    self.scheme.name(),
                    format!("\"{}\" is not a sequence field", name),
                ));
            }
        };

        if !self.values[field].is_absent() {
            return Ok(false);
        }

        self.values[field] = FieldValue::Labeled { label: 0, number: 1 };
        self.clear_right_of(field);
        log::debug!("started sequence {} on {} scheme: {}", name, self.scheme.name(), self);
        Ok(true)
    }

    fn bump_part(&mut self, field: usize, offset: Option<usize>) -> bool {
        let clear = self.scheme.clear_value().part();
        let parts = match &mut self.values[field] {
            FieldValue::Dotted(parts) => parts,
            _ => return false,
        };

        let offset = match offset.or_else(|| parts.len().checked_sub(1)) {
            Some(offset) if offset < parts.len() => offset,
            _ => return false,
        };
        let next = match parts[offset].checked_add(1) {
            Some(next) => next,
            None => return false,
        };

        parts[offset] = next;
        for part in parts.iter_mut().skip(offset + 1) {
            *part = clear;
        }
        true
    }

    fn bump_sequence(&mut self, field: usize, index: Option<usize>) -> bool {
        let tokens = self.scheme.sequence(field).len();
        match (&mut self.values[field], index) {
            (FieldValue::Labeled { label, number }, Some(0)) => {
                if *label + 1 >= tokens {
                    return false;
                }
                *label += 1;
                *number = 1;
                true
            }
            (FieldValue::Labeled { number, .. }, None | Some(1)) => match number.checked_add(1) {
                Some(next) => {
                    *number = next;
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    fn bump_int(&mut self, field: usize, index: Option<usize>) -> bool {
        if !matches!(index, None | Some(0)) {
            return false;
        }

        let next = match &self.values[field] {
            FieldValue::Int(n) => n.checked_add(1),
            FieldValue::Absent => self.scheme.clear_value().part().checked_add(1),
            _ => None,
        };
        match next {
            Some(next) => {
                self.values[field] = FieldValue::Int(next);
                true
            }
            None => false,
        }
    }

    fn clear_right_of(&mut self, field: usize) {
        let clear = self.scheme.clear_value();
        for index in field + 1..self.values.len() {
            let field_type = self.scheme.field_type(index);
            self.values[index] = self.values[index].cleared(field_type, clear);
        }
    }
}
