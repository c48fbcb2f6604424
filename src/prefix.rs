//! Memoized vendor-prefix resolution for CSS properties.

use crate::host::{Host, HostObject};
use std::cell::RefCell;
use std::collections::HashMap;

/// Vendor prefixes in the order they are tried, after the unprefixed name.
pub const VENDOR_PREFIXES: &[&str] = &["Webkit", "Moz", "O", "ms"];

/// Resolves which spelling of a CSS property the host recognizes.
///
/// A single throwaway element is created when the resolver is built and its
/// style declaration answers every lookup. The first answer for a property
/// name is cached for the resolver's lifetime, including "unsupported".
pub struct PrefixResolver {
    probe: Box<dyn HostObject>,
    memo: RefCell<HashMap<String, Option<String>>>,
}

impl PrefixResolver {
    pub fn new(host: &dyn Host) -> Self {
        Self {
            probe: host.create_element("dummy"),
            memo: RefCell::new(HashMap::new()),
        }
    }

    /// The recognized spelling of `property`, or `None` when no variant is.
    pub fn resolve(&self, property: &str) -> Option<String> {
        if let Some(cached) = self.memo.borrow().get(property) {
            return cached.clone();
        }

        let style = self.probe.style();
        let resolved = candidates(property)
            .into_iter()
            .find(|candidate| style.recognizes(candidate));
        self.memo
            .borrow_mut()
            .insert(property.to_string(), resolved.clone());
        resolved
    }

    /// Number of distinct property names resolved so far.
    pub fn cached(&self) -> usize {
        self.memo.borrow().len()
    }
}

/// Unprefixed name first, so native support wins over a prefixed alias.
fn candidates(property: &str) -> Vec<String> {
    let capitalized = capitalize(property);
    let mut names = Vec::with_capacity(VENDOR_PREFIXES.len() + 1);
    names.push(property.to_string());
    names.extend(
        VENDOR_PREFIXES
            .iter()
            .map(|prefix| format!("{prefix}{capitalized}")),
    );
    names
}

fn capitalize(property: &str) -> String {
    let mut chars = property.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
