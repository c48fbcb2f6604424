//! Capability registry.
//!
//! `Registry::initialize` runs every built-in probe exactly once against the
//! host and hands back a ready registry. Afterwards the flags only change
//! through `extend`/`extend_declared`, which upsert a single name. Flags are
//! plain data kept in insertion order; the registry's operations are methods
//! and never show up when the flags are enumerated.

use crate::declared::{DeclaredProbe, Extension};
use crate::host::Host;
use crate::markers::{MarkerList, marker_text};
use crate::probes::{BUILTIN_PROBES, run_probe};
use crate::truthy::Truthy;
use crate::utilities::Utilities;
use serde::Serialize;
use serde::ser::SerializeMap;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("extend: probe for `{name}` is not invocable: {reason}")]
    NotInvocable { name: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flag {
    pub name: String,
    pub value: bool,
}

pub struct Registry {
    flags: Vec<Flag>,
    utils: Utilities,
}

impl Registry {
    /// Probe the host and return the ready registry.
    ///
    /// Probe failures are absorbed as `false`; construction itself cannot
    /// fail.
    pub fn initialize(host: impl Host + 'static) -> Self {
        Self::with_utilities(Utilities::new(Box::new(host)))
    }

    pub fn with_utilities(utils: Utilities) -> Self {
        let flags = BUILTIN_PROBES
            .iter()
            .map(|spec| Flag {
                name: spec.name.to_string(),
                value: run_probe(spec, &utils),
            })
            .collect::<Vec<_>>();
        let supported = flags.iter().filter(|flag| flag.value).count();
        debug!(probes = flags.len(), supported, "capability registry ready");
        Self { flags, utils }
    }

    /// Value of a flag; `None` for names that were never probed.
    pub fn get(&self, name: &str) -> Option<bool> {
        self.position(name).map(|idx| self.flags[idx].value)
    }

    /// Whether a flag is set. Unknown names read as unsupported.
    pub fn supports(&self, name: &str) -> bool {
        self.get(name).unwrap_or(false)
    }

    pub fn flags(&self) -> impl Iterator<Item = &Flag> {
        self.flags.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.flags.iter().map(|flag| flag.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn utilities(&self) -> &Utilities {
        &self.utils
    }

    /// Run `probe` with the shared utilities and store its coerced outcome
    /// under `name`, replacing any previous value. Does not re-aggregate.
    pub fn extend<F, R>(&mut self, name: impl Into<String>, probe: F) -> &mut Self
    where
        F: FnOnce(&Utilities) -> R,
        R: Truthy,
    {
        let value = probe(&self.utils).truthy();
        self.upsert(name.into(), value);
        self
    }

    /// `extend` for probes described as data.
    ///
    /// Fails without touching the registry when `probe` does not describe an
    /// invocable probe.
    pub fn extend_declared(
        &mut self,
        name: impl Into<String>,
        probe: &serde_json::Value,
    ) -> Result<&mut Self, RegistryError> {
        let name = name.into();
        let declared =
            DeclaredProbe::from_value(probe).map_err(|err| RegistryError::NotInvocable {
                name: name.clone(),
                reason: err.to_string(),
            })?;
        let value = declared.evaluate(&self.utils);
        self.upsert(name, value);
        Ok(self)
    }

    /// Apply a parsed extension file in order.
    ///
    /// Every entry is checked before any flag is written, so a non-invocable
    /// entry leaves the registry untouched.
    pub fn apply_extensions(&mut self, extensions: &[Extension]) -> Result<(), RegistryError> {
        let declared = extensions
            .iter()
            .map(|extension| {
                DeclaredProbe::from_value(&extension.probe)
                    .map(|probe| (extension.name.as_str(), probe))
                    .map_err(|err| RegistryError::NotInvocable {
                        name: extension.name.clone(),
                        reason: err.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        for (name, probe) in declared {
            let value = probe.evaluate(&self.utils);
            self.upsert(name.to_string(), value);
        }
        Ok(())
    }

    /// Append the base marker and every supported flag, lower-cased, to
    /// `markers`.
    ///
    /// Appends on every call; running it twice duplicates tokens.
    pub fn apply_markers(&self, markers: &mut MarkerList) {
        let supported = self
            .flags
            .iter()
            .filter(|flag| flag.value)
            .map(|flag| flag.name.as_str());
        markers.append(&marker_text(supported));
    }

    fn upsert(&mut self, name: String, value: bool) {
        match self.position(&name) {
            Some(idx) => self.flags[idx].value = value,
            None => self.flags.push(Flag {
                name: name.clone(),
                value,
            }),
        }
        debug!(flag = %name, value, "capability flag stored");
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.flags.iter().position(|flag| flag.name == name)
    }
}

/// Serializes as a JSON object of flag name to value, in registry order.
impl Serialize for Registry {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.flags.len()))?;
        for flag in &self.flags {
            map.serialize_entry(&flag.name, &flag.value)?;
        }
        map.end()
    }
}
