// Prefix resolution order and memoization.
mod support;

use featureprobe::{PrefixResolver, Registry, names};
use support::FakeHost;

#[test]
fn unprefixed_spelling_wins() {
    let host = FakeHost::new()
        .style_property("transition")
        .style_property("WebkitTransition");
    let resolver = PrefixResolver::new(&host);
    assert_eq!(resolver.resolve("transition").as_deref(), Some("transition"));
}

#[test]
fn prefixes_are_tried_in_fixed_order() {
    let host = FakeHost::new()
        .style_property("msPerspective")
        .style_property("OPerspective");
    let resolver = PrefixResolver::new(&host);
    assert_eq!(resolver.resolve("perspective").as_deref(), Some("OPerspective"));
}

#[test]
fn resolution_is_cached_after_first_lookup() {
    let host = FakeHost::new().style_property("MozTransformOrigin");
    let lookups = host.style_lookups();
    let resolver = PrefixResolver::new(&host);

    let first = resolver.resolve("transformOrigin");
    let after_first = lookups.get();
    assert!(after_first > 0);

    let second = resolver.resolve("transformOrigin");
    assert_eq!(first, second);
    assert_eq!(lookups.get(), after_first);
    assert_eq!(resolver.cached(), 1);
}

#[test]
fn unsupported_answer_is_cached_too() {
    let host = FakeHost::new();
    let lookups = host.style_lookups();
    let resolver = PrefixResolver::new(&host);

    assert_eq!(resolver.resolve("bar"), None);
    // Unprefixed name plus one candidate per vendor prefix.
    assert_eq!(lookups.get(), 5);
    assert_eq!(resolver.resolve("bar"), None);
    assert_eq!(lookups.get(), 5);
}

#[test]
fn resolver_creates_its_probe_element_once() {
    let host = FakeHost::new();
    let created = host.created();
    let resolver = PrefixResolver::new(&host);
    assert_eq!(created.get(), 1);
    resolver.resolve("perspective");
    resolver.resolve("transition");
    assert_eq!(created.get(), 1);
}

#[test]
fn registry_shares_one_resolver_with_extensions() {
    let host = FakeHost::new().style_property("WebkitTransition");
    let lookups = host.style_lookups();
    let mut registry = Registry::initialize(host);
    assert!(registry.supports(names::CSS_TRANSITION));
    let after_init = lookups.get();

    registry.extend("transitionAgain", |utils| utils.prefixed("transition"));
    assert_eq!(registry.get("transitionAgain"), Some(true));
    assert_eq!(lookups.get(), after_init);
}
