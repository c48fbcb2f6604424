//! Primitives shared by built-in and user-supplied probes.

use crate::host::{Host, HostObject};
use crate::prefix::PrefixResolver;
use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;

/// Legacy devices whose reported transform support is known to be broken.
static LEGACY_DEVICE: LazyLock<Regex> = LazyLock::new(|| {
    RegexBuilder::new(r"(Android\s(1\.|2\.))|(Silk/1\.)")
        .case_insensitive(true)
        .build()
        .expect("legacy device pattern is valid")
});

/// Everything a probe may touch: the host, a throwaway-element factory, the
/// legacy-device verdict and the prefix resolver.
pub struct Utilities {
    host: Box<dyn Host>,
    legacy_device: bool,
    prefix: PrefixResolver,
}

impl Utilities {
    pub fn new(host: Box<dyn Host>) -> Self {
        let legacy_device = is_legacy_user_agent(host.user_agent().as_deref());
        let prefix = PrefixResolver::new(host.as_ref());
        Self {
            host,
            legacy_device,
            prefix,
        }
    }

    pub fn host(&self) -> &dyn Host {
        self.host.as_ref()
    }

    /// Create a disposable element.
    pub fn create(&self, tag: &str) -> Box<dyn HostObject> {
        self.host.create_element(tag)
    }

    pub fn is_legacy_device(&self) -> bool {
        self.legacy_device
    }

    /// Recognized spelling of a CSS property, possibly vendor-prefixed.
    pub fn prefixed(&self, property: &str) -> Option<String> {
        self.prefix.resolve(property)
    }

    pub fn prefix_resolver(&self) -> &PrefixResolver {
        &self.prefix
    }
}

pub fn is_legacy_user_agent(user_agent: Option<&str>) -> bool {
    user_agent.is_some_and(|user_agent| LEGACY_DEVICE.is_match(user_agent))
}
