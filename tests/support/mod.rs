#![allow(dead_code)]

// In-memory host double plus paths to the bundled profiles.

use featureprobe::{Host, HostError, HostObject, Storage, StyleSurface};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::rc::Rc;

pub fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

pub fn profile_path(name: &str) -> PathBuf {
    repo_root().join("profiles").join(format!("{name}.json"))
}

/// Host whose every surface is empty until configured.
#[derive(Default)]
pub struct FakeHost {
    user_agent: Option<String>,
    globals: BTreeSet<String>,
    navigator: BTreeSet<String>,
    navigator_flags: BTreeSet<String>,
    document: BTreeSet<String>,
    document_instance_of: BTreeSet<String>,
    document_element: BTreeSet<String>,
    history: Option<BTreeSet<String>>,
    style_properties: BTreeSet<String>,
    style_throws: bool,
    units: BTreeSet<String>,
    elements: BTreeMap<String, BTreeSet<String>>,
    contexts: BTreeSet<String>,
    storage: Option<Rc<FakeStorage>>,
    style_lookups: Rc<Cell<usize>>,
    created: Rc<Cell<usize>>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_agent(mut self, ua: &str) -> Self {
        self.user_agent = Some(ua.to_string());
        self
    }

    pub fn global(mut self, name: &str) -> Self {
        self.globals.insert(name.to_string());
        self
    }

    pub fn navigator(mut self, name: &str) -> Self {
        self.navigator.insert(name.to_string());
        self
    }

    /// Navigator property present and truthy.
    pub fn navigator_flag(mut self, name: &str) -> Self {
        self.navigator.insert(name.to_string());
        self.navigator_flags.insert(name.to_string());
        self
    }

    pub fn document_instance_of(mut self, constructor: &str) -> Self {
        self.document_instance_of.insert(constructor.to_string());
        self
    }

    pub fn document_element(mut self, name: &str) -> Self {
        self.document_element.insert(name.to_string());
        self
    }

    pub fn document(mut self, name: &str) -> Self {
        self.document.insert(name.to_string());
        self
    }

    pub fn style_property(mut self, name: &str) -> Self {
        self.style_properties.insert(name.to_string());
        self
    }

    pub fn style_throws(mut self) -> Self {
        self.style_throws = true;
        self
    }

    /// Accept `width` assignments in this unit.
    pub fn unit(mut self, unit: &str) -> Self {
        self.units.insert(unit.to_string());
        self
    }

    pub fn element(mut self, tag: &str, properties: &[&str]) -> Self {
        self.elements
            .entry(tag.to_string())
            .or_default()
            .extend(properties.iter().map(|p| p.to_string()));
        self
    }

    pub fn context(mut self, kind: &str) -> Self {
        self.contexts.insert(kind.to_string());
        self
    }

    pub fn storage(mut self, storage: Rc<FakeStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Counter bumped on every `StyleSurface::recognizes` call.
    pub fn style_lookups(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.style_lookups)
    }

    /// Counter bumped on every element creation.
    pub fn created(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.created)
    }

    fn object(&self, properties: BTreeSet<String>) -> Box<dyn HostObject> {
        self.created.set(self.created.get() + 1);
        Box::new(FakeObject {
            properties,
            contexts: self.contexts.clone(),
            style: FakeStyle {
                properties: self.style_properties.clone(),
                throws: self.style_throws,
                units: self.units.clone(),
                width: String::new(),
                lookups: Rc::clone(&self.style_lookups),
            },
        })
    }
}

impl Host for FakeHost {
    fn user_agent(&self) -> Option<String> {
        self.user_agent.clone()
    }

    fn has_global(&self, name: &str) -> bool {
        self.globals.contains(name)
    }

    fn navigator_has(&self, name: &str) -> bool {
        self.navigator.contains(name)
    }

    fn navigator_flag(&self, name: &str) -> bool {
        self.navigator_flags.contains(name)
    }

    fn document_has(&self, name: &str) -> bool {
        self.document.contains(name)
    }

    fn document_element_has(&self, name: &str) -> bool {
        self.document_element.contains(name)
    }

    fn history_has(&self, name: &str) -> bool {
        self.history.as_ref().is_some_and(|h| h.contains(name))
    }

    fn document_is_instance_of(&self, constructor: &str) -> bool {
        self.document_instance_of.contains(constructor)
    }

    fn create_element(&self, tag: &str) -> Box<dyn HostObject> {
        self.object(self.elements.get(tag).cloned().unwrap_or_default())
    }

    fn create_element_ns(&self, _namespace: &str, tag: &str) -> Box<dyn HostObject> {
        self.create_element(tag)
    }

    fn instantiate(&self, constructor: &str) -> Option<Box<dyn HostObject>> {
        self.globals
            .contains(constructor)
            .then(|| self.create_element(constructor))
    }

    fn local_storage(&self) -> Option<&dyn Storage> {
        self.storage.as_deref().map(|storage| storage as &dyn Storage)
    }
}

struct FakeObject {
    properties: BTreeSet<String>,
    contexts: BTreeSet<String>,
    style: FakeStyle,
}

impl HostObject for FakeObject {
    fn has_property(&self, name: &str) -> bool {
        self.properties.contains(name)
    }

    fn style(&self) -> &dyn StyleSurface {
        &self.style
    }

    fn style_mut(&mut self) -> &mut dyn StyleSurface {
        &mut self.style
    }

    fn context(&mut self, kind: &str) -> Result<bool, HostError> {
        Ok(self.contexts.contains(kind))
    }
}

struct FakeStyle {
    properties: BTreeSet<String>,
    throws: bool,
    units: BTreeSet<String>,
    width: String,
    lookups: Rc<Cell<usize>>,
}

impl StyleSurface for FakeStyle {
    fn recognizes(&self, property: &str) -> bool {
        self.lookups.set(self.lookups.get() + 1);
        self.properties.contains(property)
    }

    fn set_width(&mut self, value: &str) -> Result<(), HostError> {
        if self.throws {
            return Err(HostError::InvalidAssignment("width".to_string()));
        }
        let unit = value.trim_start_matches(|c: char| c.is_ascii_digit());
        if self.units.contains(unit) {
            self.width = value.to_string();
        }
        Ok(())
    }

    fn width(&self) -> String {
        self.width.clone()
    }
}

/// Storage double with switchable failure modes.
#[derive(Default)]
pub struct FakeStorage {
    pub entries: RefCell<BTreeMap<String, String>>,
    pub deny: bool,
    pub full: bool,
    /// Writes succeed but every read is refused.
    pub unreadable: bool,
}

impl FakeStorage {
    pub fn with_entries(entries: &[(&str, &str)]) -> Self {
        Self {
            entries: RefCell::new(
                entries
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            ),
            ..Self::default()
        }
    }

    fn access(&self) -> Result<(), HostError> {
        if self.deny {
            return Err(HostError::Security("denied".to_string()));
        }
        Ok(())
    }
}

impl Storage for FakeStorage {
    fn set_item(&self, key: &str, value: &str) -> Result<(), HostError> {
        self.access()?;
        if self.full {
            return Err(HostError::QuotaExceeded);
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get_item(&self, key: &str) -> Result<Option<String>, HostError> {
        self.access()?;
        if self.unreadable {
            return Err(HostError::Security("read denied".to_string()));
        }
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn remove_item(&self, key: &str) -> Result<(), HostError> {
        self.access()?;
        self.entries.borrow_mut().remove(key);
        Ok(())
    }

    fn len(&self) -> Result<usize, HostError> {
        self.access()?;
        Ok(self.entries.borrow().len())
    }
}
