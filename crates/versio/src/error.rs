//! Error type shared by schemes and versions

use thiserror::Error;

/// Errors raised while declaring schemes or working with versions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    /// The scheme declaration is inconsistent, or an operation needs
    /// something the scheme can not provide (e.g. incrementing a string field)
    #[error("Invalid version scheme \"{scheme}\": {reason}")]
    Configuration { scheme: String, reason: String },

    /// The text does not match the scheme, or a captured segment can not be coerced
    #[error("Can not parse \"{version}\": {reason}")]
    Parse { version: String, reason: String },

    /// The two versions were parsed with schemes that have different fields
    #[error("Can not compare version scheme \"{left}\" with \"{right}\"")]
    TypeMismatch { left: String, right: String },

    /// No field or subfield with this name
    #[error("Unknown field \"{0}\"")]
    UnknownField(String),
}

impl VersionError {
    pub(crate) fn configuration(scheme: &str, reason: impl Into<String>) -> Self {
        VersionError::Configuration {
            scheme: scheme.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn parse(version: &str, reason: impl Into<String>) -> Self {
        VersionError::Parse {
            version: version.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, VersionError>;
