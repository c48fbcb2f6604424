//! `Host` backed by a captured environment profile.
//!
//! A profile is a JSON document listing what an environment exposes (globals,
//! navigator members, element properties, style properties, storage state).
//! Profiles are validated against the bundled JSON Schema before they are
//! deserialized so malformed captures fail loudly instead of silently
//! reading as "unsupported".

use crate::host::{Host, HostError, HostObject, Storage, StyleSurface};
use anyhow::{Context, Result, anyhow, bail};
use jsonschema::JSONSchema;
use serde::Deserialize;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

/// Version marker every profile must declare.
pub const PROFILE_SCHEMA_VERSION: &str = "host_profile_v1";

const PROFILE_SCHEMA: &str = include_str!("../../schema/host_profile.schema.json");

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HostProfile {
    pub schema_version: String,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub globals: BTreeSet<String>,
    #[serde(default)]
    pub navigator: BTreeSet<String>,
    /// Navigator members whose value is truthy (implies presence).
    #[serde(default)]
    pub navigator_flags: BTreeSet<String>,
    #[serde(default)]
    pub document: BTreeSet<String>,
    #[serde(default)]
    pub document_element: BTreeSet<String>,
    #[serde(default)]
    pub document_instance_of: BTreeSet<String>,
    /// `None` means the environment has no history object.
    #[serde(default)]
    pub history: Option<BTreeSet<String>>,
    #[serde(default)]
    pub style: StyleProfile,
    #[serde(default)]
    pub elements: BTreeMap<String, BTreeSet<String>>,
    #[serde(default)]
    pub namespaced_elements: BTreeMap<String, BTreeMap<String, BTreeSet<String>>>,
    #[serde(default)]
    pub contexts: ContextProfile,
    #[serde(default)]
    pub instances: BTreeMap<String, BTreeSet<String>>,
    #[serde(default)]
    pub local_storage: Option<StorageProfile>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StyleProfile {
    #[serde(default)]
    pub properties: BTreeSet<String>,
    /// CSS length units accepted by `width` assignments.
    #[serde(default)]
    pub units: BTreeSet<String>,
    /// Every style assignment throws.
    #[serde(default)]
    pub throws: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContextProfile {
    #[serde(default)]
    pub supported: BTreeSet<String>,
    #[serde(default)]
    pub throwing: BTreeSet<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageProfile {
    #[serde(default)]
    pub entries: BTreeMap<String, String>,
    #[serde(default)]
    pub fault: Option<StorageFault>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageFault {
    /// Every storage access is denied.
    Security,
    /// Writes fail; reads and length still work.
    Quota,
}

/// Load, validate and deserialize a profile from disk.
pub fn load_profile_from_path(path: &Path) -> Result<ProfileHost> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading host profile {}", path.display()))?;
    ProfileHost::from_json_str(&data).with_context(|| format!("loading {}", path.display()))
}

pub struct ProfileHost {
    profile: HostProfile,
    storage: Option<ProfileStorage>,
}

impl ProfileHost {
    pub fn from_json_str(data: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(data).context("parsing host profile JSON")?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        validate_profile(&value)?;
        let profile: HostProfile =
            serde_json::from_value(value).context("deserializing host profile")?;
        Ok(Self::new(profile))
    }

    pub fn new(profile: HostProfile) -> Self {
        let storage = profile.local_storage.clone().map(ProfileStorage::new);
        Self { profile, storage }
    }

    pub fn profile(&self) -> &HostProfile {
        &self.profile
    }

    fn object_with(&self, properties: BTreeSet<String>) -> Box<dyn HostObject> {
        Box::new(ProfileObject {
            properties,
            style: ProfileStyle {
                properties: self.profile.style.properties.clone(),
                units: self.profile.style.units.clone(),
                throws: self.profile.style.throws,
                width: String::new(),
            },
            contexts: self.profile.contexts.clone(),
        })
    }
}

fn validate_profile(value: &Value) -> Result<()> {
    let schema: Value =
        serde_json::from_str(PROFILE_SCHEMA).context("parsing bundled host profile schema")?;
    let compiled = JSONSchema::compile(&schema)
        .map_err(|err| anyhow!("compiling bundled host profile schema: {err}"))?;
    if let Err(errors) = compiled.validate(value) {
        let details = errors
            .map(|err| format!("{}: {}", err.instance_path, err))
            .collect::<Vec<_>>()
            .join("\n");
        bail!("host profile failed validation:\n{details}");
    }

    let version = value
        .get("schema_version")
        .and_then(Value::as_str)
        .unwrap_or_default();
    if version != PROFILE_SCHEMA_VERSION {
        bail!("unsupported host profile version '{version}', expected {PROFILE_SCHEMA_VERSION}");
    }
    Ok(())
}

impl Host for ProfileHost {
    fn user_agent(&self) -> Option<String> {
        self.profile.user_agent.clone()
    }

    fn has_global(&self, name: &str) -> bool {
        self.profile.globals.contains(name)
    }

    fn navigator_has(&self, name: &str) -> bool {
        self.profile.navigator.contains(name) || self.profile.navigator_flags.contains(name)
    }

    fn navigator_flag(&self, name: &str) -> bool {
        self.profile.navigator_flags.contains(name)
    }

    fn document_has(&self, name: &str) -> bool {
        self.profile.document.contains(name)
    }

    fn document_element_has(&self, name: &str) -> bool {
        self.profile.document_element.contains(name)
    }

    fn history_has(&self, name: &str) -> bool {
        self.profile
            .history
            .as_ref()
            .is_some_and(|history| history.contains(name))
    }

    fn document_is_instance_of(&self, constructor: &str) -> bool {
        self.profile.document_instance_of.contains(constructor)
    }

    fn create_element(&self, tag: &str) -> Box<dyn HostObject> {
        let properties = self
            .profile
            .elements
            .get(&tag.to_ascii_lowercase())
            .cloned()
            .unwrap_or_default();
        self.object_with(properties)
    }

    fn create_element_ns(&self, namespace: &str, tag: &str) -> Box<dyn HostObject> {
        let properties = self
            .profile
            .namespaced_elements
            .get(namespace)
            .and_then(|tags| tags.get(tag))
            .cloned()
            .unwrap_or_default();
        self.object_with(properties)
    }

    fn instantiate(&self, constructor: &str) -> Option<Box<dyn HostObject>> {
        if !self.has_global(constructor) {
            return None;
        }
        let properties = self
            .profile
            .instances
            .get(constructor)
            .cloned()
            .unwrap_or_default();
        Some(self.object_with(properties))
    }

    fn local_storage(&self) -> Option<&dyn Storage> {
        self.storage.as_ref().map(|storage| storage as &dyn Storage)
    }
}

struct ProfileObject {
    properties: BTreeSet<String>,
    style: ProfileStyle,
    contexts: ContextProfile,
}

impl HostObject for ProfileObject {
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
        if !self.properties.contains("getContext") {
            return Err(HostError::Other("getContext is not a function".to_string()));
        }
        if self.contexts.throwing.contains(kind) {
            return Err(HostError::Other(format!("creating {kind} context failed")));
        }
        Ok(self.contexts.supported.contains(kind))
    }
}

struct ProfileStyle {
    properties: BTreeSet<String>,
    units: BTreeSet<String>,
    throws: bool,
    width: String,
}

impl StyleSurface for ProfileStyle {
    fn recognizes(&self, property: &str) -> bool {
        self.properties.contains(property)
    }

    fn set_width(&mut self, value: &str) -> Result<(), HostError> {
        if self.throws {
            return Err(HostError::InvalidAssignment("width".to_string()));
        }
        // Unknown units are dropped silently, like a real declaration does.
        let unit = value.trim_start_matches(|c: char| c.is_ascii_digit() || c == '.');
        if self.units.contains(unit) {
            self.width = value.to_string();
        }
        Ok(())
    }

    fn width(&self) -> String {
        self.width.clone()
    }
}

struct ProfileStorage {
    entries: RefCell<BTreeMap<String, String>>,
    fault: Option<StorageFault>,
}

impl ProfileStorage {
    fn new(profile: StorageProfile) -> Self {
        Self {
            entries: RefCell::new(profile.entries),
            fault: profile.fault,
        }
    }

    fn check_access(&self) -> Result<(), HostError> {
        match self.fault {
            Some(StorageFault::Security) => {
                Err(HostError::Security("localStorage is disabled".to_string()))
            }
            _ => Ok(()),
        }
    }
}

impl Storage for ProfileStorage {
    fn set_item(&self, key: &str, value: &str) -> Result<(), HostError> {
        self.check_access()?;
        if self.fault == Some(StorageFault::Quota) {
            return Err(HostError::QuotaExceeded);
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get_item(&self, key: &str) -> Result<Option<String>, HostError> {
        self.check_access()?;
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn remove_item(&self, key: &str) -> Result<(), HostError> {
        self.check_access()?;
        self.entries.borrow_mut().remove(key);
        Ok(())
    }

    fn len(&self) -> Result<usize, HostError> {
        self.check_access()?;
        Ok(self.entries.borrow().len())
    }
}
