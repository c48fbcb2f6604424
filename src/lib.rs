//! Environment capability probes.
//!
//! `Registry::initialize` runs a fixed battery of probes against a `Host` and
//! exposes every outcome as a named boolean flag. New flags can be added with
//! `Registry::extend`, and `Registry::apply_markers` projects the supported
//! set onto a class-attribute style `MarkerList`.

use anyhow::{Result, bail};
use std::env;
use std::env::VarError;
use std::path::{Path, PathBuf};

pub mod declared;
pub mod host;
pub mod markers;
pub mod prefix;
pub mod probes;
pub mod registry;
pub mod report;
pub mod truthy;
pub mod utilities;

pub use declared::{DeclaredProbe, Extension, load_extensions_from_path, parse_extensions};
pub use host::{
    Host, HostError, HostObject, ProfileHost, Storage, StyleSurface, load_profile_from_path,
};
pub use markers::{BASE_MARKER, MarkerList};
pub use prefix::{PrefixResolver, VENDOR_PREFIXES};
pub use probes::{BUILTIN_PROBES, STORAGE_TEST_KEY, names};
pub use registry::{Flag, Registry, RegistryError};
pub use report::Report;
pub use truthy::Truthy;
pub use utilities::Utilities;

/// Environment variable naming the host profile when no flag is given.
pub const ENV_PROFILE: &str = "FEATURE_PROFILE";
/// Environment variable listing extension files (comma or space separated).
pub const ENV_EXTENSIONS: &str = "FEATURE_EXTENSIONS";

/// Pick the host profile: explicit path first, then `FEATURE_PROFILE`.
pub fn resolve_profile_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    if let Some(raw) = env_non_empty(ENV_PROFILE) {
        return Ok(PathBuf::from(raw));
    }
    bail!("No host profile given. Pass --profile <path> or set {ENV_PROFILE}.")
}

/// Extension files from the CLI, or from `FEATURE_EXTENSIONS` when none were
/// passed.
pub fn resolve_extension_paths(explicit: &[PathBuf]) -> Vec<PathBuf> {
    if !explicit.is_empty() {
        return explicit.to_vec();
    }
    env_non_empty(ENV_EXTENSIONS)
        .map(|raw| split_list(&raw).into_iter().map(PathBuf::from).collect())
        .unwrap_or_default()
}

pub fn split_list(value: &str) -> Vec<String> {
    value
        .replace(',', " ")
        .split_whitespace()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn env_non_empty(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => Some(value),
        Ok(_) => None,
        Err(VarError::NotPresent) => None,
        Err(VarError::NotUnicode(os)) => Some(os.to_string_lossy().into_owned()),
    }
}
