//! Generic version schemes
//!
//! This crate parses version strings according to a declarative
//! [`VersionScheme`], compares the parsed [`Version`]s, renders them back to
//! text and bumps (increments) a field or subfield while resetting the
//! fields to its right.
//!
//! Four schemes are built in:
//!
//! * [`SIMPLE3_VERSION_SCHEME`]: `A.B.C`, three integers
//! * [`SIMPLE4_VERSION_SCHEME`]: `A.B.C.D`, four integers
//! * [`PEP440_VERSION_SCHEME`]: PEP 440, `N[.N]+[{a|b|c|rc}N][.postN][.devN]`
//! * [`PERL_VERSION_SCHEME`]: `A.BB`, the second part zero padded
//!
//! A version parsed without an explicit scheme uses the first scheme from
//! the supported list that accepts the text. The list defaults to PEP 440
//! only and is replaced with [`set_supported_version_schemes`].
//!
//! ```
//! use versio::{Version, PEP440_VERSION_SCHEME};
//!
//! let mut version = Version::with_scheme("1.2.3rc4.post5.dev6", PEP440_VERSION_SCHEME.clone()).unwrap();
//! assert!(version.bump("minor", None).unwrap());
//! assert_eq!(version.to_string(), "1.3.0");
//! ```

mod bump;
mod error;
mod registry;
mod scheme;
mod schemes;
mod template;
mod value;
mod version;

pub use error::{Result, VersionError};
pub use registry::{
    reset_supported_version_schemes, set_supported_version_schemes, supported_version_schemes,
};
pub use scheme::{ParseFlags, Target, VersionScheme, VersionSchemeBuilder};
pub use schemes::{
    PEP440_VERSION_SCHEME, PERL_VERSION_SCHEME, SIMPLE3_VERSION_SCHEME, SIMPLE4_VERSION_SCHEME,
};
pub use template::FormatTemplate;
pub use value::{ClearValue, FieldType, FieldValue};
pub use version::Version;
