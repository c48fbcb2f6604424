//! Environment surface the probes inspect.
//!
//! Probes never reach for ambient globals; everything they can observe goes
//! through a `Host`. `ProfileHost` backs the trait with a captured JSON
//! environment profile, and tests provide their own doubles.

pub mod profile;

pub use profile::{ProfileHost, load_profile_from_path};

use thiserror::Error;

/// Namespace used when creating SVG elements.
pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Failure raised by a host operation. Probes absorb these as `false`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("access denied: {0}")]
    Security(String),
    #[error("quota exceeded")]
    QuotaExceeded,
    #[error("invalid assignment to {0}")]
    InvalidAssignment(String),
    #[error("host operation failed: {0}")]
    Other(String),
}

/// Style declaration of a created object.
pub trait StyleSurface {
    /// Whether `property` is an assignable property of this declaration.
    fn recognizes(&self, property: &str) -> bool;
    fn set_width(&mut self, value: &str) -> Result<(), HostError>;
    /// Current `width` value; empty when an assignment was rejected.
    fn width(&self) -> String;
}

/// An object created through the host: an element or a constructed instance.
pub trait HostObject {
    fn has_property(&self, name: &str) -> bool;
    fn style(&self) -> &dyn StyleSurface;
    fn style_mut(&mut self) -> &mut dyn StyleSurface;
    /// Whether a rendering context of `kind` could be obtained.
    fn context(&mut self, kind: &str) -> Result<bool, HostError>;
}

/// Key/value storage that persists between page loads.
pub trait Storage {
    fn set_item(&self, key: &str, value: &str) -> Result<(), HostError>;
    fn get_item(&self, key: &str) -> Result<Option<String>, HostError>;
    fn remove_item(&self, key: &str) -> Result<(), HostError>;
    fn len(&self) -> Result<usize, HostError>;

    fn is_empty(&self) -> Result<bool, HostError> {
        Ok(self.len()? == 0)
    }
}

pub trait Host {
    fn user_agent(&self) -> Option<String>;
    fn has_global(&self, name: &str) -> bool;
    fn navigator_has(&self, name: &str) -> bool;

    /// Truthiness of a navigator property, not just its presence.
    fn navigator_flag(&self, name: &str) -> bool {
        self.navigator_has(name)
    }

    fn document_has(&self, name: &str) -> bool;
    fn document_element_has(&self, name: &str) -> bool;
    /// `false` when the host exposes no history object at all.
    fn history_has(&self, name: &str) -> bool;
    fn document_is_instance_of(&self, constructor: &str) -> bool;
    fn create_element(&self, tag: &str) -> Box<dyn HostObject>;
    fn create_element_ns(&self, namespace: &str, tag: &str) -> Box<dyn HostObject>;
    /// Construct an instance of a global constructor, if it exists.
    fn instantiate(&self, constructor: &str) -> Option<Box<dyn HostObject>>;
    fn local_storage(&self) -> Option<&dyn Storage>;
}
