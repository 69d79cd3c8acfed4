use crate::planner::ComplexityPolicy;
use indexmap::IndexMap;
use jport_core::PyImport;
use jport_python_binding::mapper::{ImportTable, TypeTable, TypeTarget};
use jport_python_binding::{GeneratorOptions, MapperPolicy, ValidatorOptions};
use serde::{Deserialize, Serialize};

/// Root configuration from jport.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JportConfig {
    /// Type and import table overrides
    #[serde(default)]
    pub mapper: MapperSection,

    /// Complexity weights and thresholds
    #[serde(default)]
    pub planner: ComplexityPolicy,

    /// Output layout
    #[serde(default)]
    pub generator: GeneratorOptions,

    #[serde(default)]
    pub validator: ValidatorOptions,
}

impl JportConfig {
    /// Mapper policy: the built-in tables with this file's entries on top.
    pub fn mapper_policy(&self) -> MapperPolicy {
        let mut types = TypeTable::default();
        for (java, entry) in &self.mapper.types {
            types.insert(java.clone(), entry.to_target());
        }
        let mut imports = ImportTable::default();
        for (java, entry) in &self.mapper.imports {
            imports.insert(java.clone(), entry.to_import());
        }
        MapperPolicy { types, imports }
    }
}

/// [mapper] section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapperSection {
    /// Java type name (simple or qualified) to Python type
    #[serde(default)]
    pub types: IndexMap<String, TypeEntry>,

    /// Java import path to Python import
    #[serde(default)]
    pub imports: IndexMap<String, ImportEntry>,
}

/// A type table entry: either a bare Python name (`Money = "Decimal"`) or a
/// table naming the module it is imported from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeEntry {
    Name(String),
    Detailed {
        python: String,
        #[serde(default)]
        module: Option<String>,
    },
}

impl TypeEntry {
    pub fn to_target(&self) -> TypeTarget {
        match self {
            TypeEntry::Name(python) => TypeTarget::builtin(python.clone()),
            TypeEntry::Detailed {
                python,
                module: None,
            } => TypeTarget::builtin(python.clone()),
            TypeEntry::Detailed {
                python,
                module: Some(module),
            } => TypeTarget::imported(python, module),
        }
    }
}

/// `{ module = "acme.strings" }` or `{ module = "acme", name = "strings" }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportEntry {
    pub module: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl ImportEntry {
    pub fn to_import(&self) -> PyImport {
        match &self.name {
            Some(name) => PyImport::from(self.module.clone(), name.clone()),
            None => PyImport::module(self.module.clone()),
        }
    }
}
