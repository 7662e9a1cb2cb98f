//! Process-wide list of schemes tried when a version is parsed without an
//! explicit scheme
//!
//! Readers take a snapshot of the list, so a parse running while another
//! thread replaces the list sees either the old list or the new one, never a
//! mix of both.

use std::sync::{Arc, RwLock};

use lazy_static::lazy_static;

use crate::scheme::VersionScheme;
use crate::schemes::PEP440_VERSION_SCHEME;

lazy_static! {
    static ref SUPPORTED_VERSION_SCHEMES: RwLock<Vec<Arc<VersionScheme>>> =
        RwLock::new(vec![PEP440_VERSION_SCHEME.clone()]);
}

/// Replace the schemes used for auto-detection. Order is priority: the first
/// scheme that matches wins.
pub fn set_supported_version_schemes<I>(schemes: I)
where
    I: IntoIterator<Item = Arc<VersionScheme>>,
{
    let schemes: Vec<Arc<VersionScheme>> = schemes.into_iter().collect();
    log::debug!(
        "Supported version schemes: [{}]",
        schemes
            .iter()
            .map(|scheme| scheme.name())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let mut guard = SUPPORTED_VERSION_SCHEMES
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = schemes;
}

/// Snapshot of the schemes used for auto-detection
pub fn supported_version_schemes() -> Vec<Arc<VersionScheme>> {
    SUPPORTED_VERSION_SCHEMES
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .clone()
}

/// Restore the default list (PEP 440 only)
pub fn reset_supported_version_schemes() {
    set_supported_version_schemes([PEP440_VERSION_SCHEME.clone()]);
}
