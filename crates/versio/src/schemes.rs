//! Built-in version schemes
//!
//! These are ordinary [`VersionScheme`] declarations; nothing in the crate
//! treats them specially.

use std::sync::Arc;

use lazy_static::lazy_static;

use crate::scheme::{ParseFlags, VersionScheme};
use crate::value::{ClearValue, FieldType};

const PEP440_DESCRIPTION: &str = "\
PEP 440
Public version identifiers MUST comply with the following scheme:

N[.N]+[{a|b|c|rc}N][.postN][.devN]

Public version identifiers MUST NOT include leading or trailing whitespace.

Public version identifiers MUST be unique within a given distribution.

Public version identifiers are separated into up to four segments:

    Release segment: N[.N]+
    Pre-release segment: {a|b|c|rc}N
    Post-release segment: .postN
    Development release segment: .devN
";

lazy_static! {
    /// `A.B.C` where A, B and C are integers
    pub static ref SIMPLE3_VERSION_SCHEME: Arc<VersionScheme> = Arc::new(
        VersionScheme::builder("A.B.C", r"(\d+)\.(\d+)\.(\d+)", "{}.{}.{}")
            .fields(["Major", "Minor", "Tiny"])
            .field_types([FieldType::Int; 3])
            .clear_value(ClearValue::Value(0))
            .description("Simple Major.Minor.Tiny version scheme")
            .build()
            .unwrap()
    );

    /// `A.B.C.D` where A, B, C and D are integers
    pub static ref SIMPLE4_VERSION_SCHEME: Arc<VersionScheme> = Arc::new(
        VersionScheme::builder("A.B.C.D", r"(\d+)\.(\d+)\.(\d+)\.(\d+)", "{}.{}.{}.{}")
            .fields(["Major", "Minor", "Tiny", "Tiny2"])
            .field_types([FieldType::Int; 4])
            .clear_value(ClearValue::Value(0))
            .description("Simple Major.Minor.Tiny.Tiny2 version scheme")
            .build()
            .unwrap()
    );

    /// PEP 440 public versions: `N[.N]+[{a|b|c|rc}N][.postN][.devN]`
    pub static ref PEP440_VERSION_SCHEME: Arc<VersionScheme> = Arc::new(
        VersionScheme::builder(
            "pep440",
            r"
            (\d+(?:\.\d+)*)         # release
            ((?:a|b|c|rc)\d+)?      # pre
            (\.post\d+)?            # post
            (\.dev\d+)?             # dev
            ",
            "{}{}{}{}",
        )
        .parse_flags(ParseFlags::verbose())
        .fields(["Release", "Pre", "Post", "Dev"])
        .field_types([
            FieldType::Dotted('.'),
            FieldType::Sequence,
            FieldType::Sequence,
            FieldType::Sequence,
        ])
        .subfields("Release", ["Major", "Minor", "Tiny", "Tiny2"])
        .sequence("Pre", ["a", "b", "c", "rc"])
        .sequence("Post", [".post"])
        .sequence("Dev", [".dev"])
        .clear_value(ClearValue::Absent)
        .description(PEP440_DESCRIPTION)
        .build()
        .unwrap()
    );

    /// Perl `A.BB`: the second part is zero padded to at least two digits
    pub static ref PERL_VERSION_SCHEME: Arc<VersionScheme> = Arc::new(
        VersionScheme::builder("A.B", r"(\d+)\.(\d+)", "{}.{:02}")
            .fields(["Major", "Minor"])
            .field_types([FieldType::Int; 2])
            .clear_value(ClearValue::Value(0))
            .description("perl Major.Minor version scheme")
            .build()
            .unwrap()
    );
}
