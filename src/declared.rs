//! Probes described as data.
//!
//! Extension files name probes declaratively so flags can be added without
//! recompiling. A value that does not deserialize into a `DeclaredProbe` is
//! not invocable and is rejected before the registry is touched.

use crate::host::HostError;
use crate::truthy::Truthy;
use crate::utilities::Utilities;
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum DeclaredProbe {
    /// A fixed outcome, coerced with script truthiness.
    Constant {
        #[serde(default)]
        value: Value,
    },
    Global { name: String },
    Navigator { name: String },
    Element { tag: String, property: String },
    /// Some spelling of the CSS property is recognized.
    Style { property: String },
    /// A `width` assignment using this unit sticks.
    Unit { unit: String },
    /// A canvas can hand out this rendering context.
    Context { context: String },
}

impl DeclaredProbe {
    pub fn from_value(value: &Value) -> std::result::Result<Self, serde_json::Error> {
        Self::deserialize(value)
    }

    /// Evaluate against the shared utilities; host failures read as `false`.
    pub fn evaluate(&self, utils: &Utilities) -> bool {
        self.run(utils).truthy()
    }

    fn run(&self, utils: &Utilities) -> Result<bool, HostError> {
        let host = utils.host();
        match self {
            DeclaredProbe::Constant { value } => Ok(value.truthy()),
            DeclaredProbe::Global { name } => Ok(host.has_global(name)),
            DeclaredProbe::Navigator { name } => Ok(host.navigator_has(name)),
            DeclaredProbe::Element { tag, property } => {
                Ok(utils.create(tag).has_property(property))
            }
            DeclaredProbe::Style { property } => Ok(utils.prefixed(property).is_some()),
            DeclaredProbe::Unit { unit } => {
                let mut el = utils.create("dummy");
                el.style_mut().set_width(&format!("1{unit}"))?;
                Ok(!el.style().width().is_empty())
            }
            DeclaredProbe::Context { context } => utils.create("canvas").context(context),
        }
    }
}

/// One entry of an extension file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Extension {
    pub name: String,
    /// Kept raw so a non-invocable entry surfaces as a registry error.
    pub probe: Value,
}

/// Parse an extension file: a JSON array of `{ "name", "probe" }` entries.
pub fn load_extensions_from_path(path: &Path) -> Result<Vec<Extension>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading extension file {}", path.display()))?;
    parse_extensions(&data).with_context(|| format!("loading {}", path.display()))
}

pub fn parse_extensions(data: &str) -> Result<Vec<Extension>> {
    let extensions: Vec<Extension> =
        serde_json::from_str(data).context("parsing extension list")?;
    if let Some(bad) = extensions.iter().find(|ext| ext.name.trim().is_empty()) {
        bail!("extension entry with empty name (probe {})", bad.probe);
    }
    Ok(extensions)
}
