//! Mapped IR
//!
//! The structural tree after translation to Python conventions. Every class,
//! field, constructor and method of the source appears here exactly once and
//! in the same order; only names, types and modifiers differ.

use super::{Body, DeclKind, ShapeCounts, TypeRef};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Target-side marker derived from source modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Marker {
    /// `static final` field.
    ClassConstant,
    /// `static` non-final field.
    ClassVariable,
    /// `final` instance field.
    ReadOnly,
    /// `static` method.
    StaticCallable,
    AbstractMethod,
    AbstractClass,
    /// `final` class or method.
    Sealed,
    Private,
    Protected,
    Synchronized,
    Native,
    Transient,
    Volatile,
    Strictfp,
    /// Interface method with a `default` body.
    DefaultImpl,
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Marker::ClassConstant => "class-constant",
            Marker::ClassVariable => "class-variable",
            Marker::ReadOnly => "read-only",
            Marker::StaticCallable => "static-callable",
            Marker::AbstractMethod => "abstract-method",
            Marker::AbstractClass => "abstract-class",
            Marker::Sealed => "sealed",
            Marker::Private => "private",
            Marker::Protected => "protected",
            Marker::Synchronized => "synchronized",
            Marker::Native => "native",
            Marker::Transient => "transient",
            Marker::Volatile => "volatile",
            Marker::Strictfp => "strictfp",
            Marker::DefaultImpl => "default-impl",
        };
        f.write_str(s)
    }
}

/// One Python import: `import module` or `from module import name`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PyImport {
    pub module: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl PyImport {
    pub fn module(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            name: None,
        }
    }

    pub fn from(module: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            name: Some(name.into()),
        }
    }
}

impl fmt::Display for PyImport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "from {} import {}", self.module, name),
            None => write!(f, "import {}", self.module),
        }
    }
}

/// A source import and what it became. `target` is `None` when the import
/// has no Python counterpart (builtins such as `list` need no import).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappedImport {
    pub source: String,
    pub target: Option<PyImport>,
}

/// A field initializer after literal translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappedInitializer {
    pub text: String,
    /// Kept verbatim because it is not a plain literal.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub untranslated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappedTypeParam {
    pub name: String,
    pub bound: Option<TypeRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappedField {
    pub name: String,
    pub source_name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    pub markers: BTreeSet<Marker>,
    pub initializer: Option<MappedInitializer>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappedParam {
    pub name: String,
    pub source_name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub varargs: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappedMethod {
    pub name: String,
    pub source_name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_params: Vec<MappedTypeParam>,
    pub params: Vec<MappedParam>,
    pub return_type: TypeRef,
    pub markers: BTreeSet<Marker>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub raises: Vec<TypeRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<String>,
    pub body: Body,
    /// Source parameter types, the overload identity.
    pub source_signature: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappedConstructor {
    pub params: Vec<MappedParam>,
    pub markers: BTreeSet<Marker>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub raises: Vec<TypeRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<String>,
    pub body: Body,
    pub source_signature: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappedClass {
    pub name: String,
    pub kind: DeclKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_params: Vec<MappedTypeParam>,
    /// Superclass as written in the source.
    pub superclass: Option<String>,
    /// Python base the superclass maps to; `None` for `Object` or no superclass.
    pub base: Option<String>,
    /// Interface names, carried as metadata.
    pub capabilities: Vec<String>,
    pub fields: Vec<MappedField>,
    pub constructors: Vec<MappedConstructor>,
    pub methods: Vec<MappedMethod>,
    pub markers: BTreeSet<Marker>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<String>,
}

impl MappedClass {
    /// Source supertypes: superclass first, then capabilities.
    pub fn supertypes(&self) -> impl Iterator<Item = &str> {
        self.superclass
            .iter()
            .chain(self.capabilities.iter())
            .map(String::as_str)
    }

    pub fn is_abstract(&self) -> bool {
        self.kind == DeclKind::Interface || self.markers.contains(&Marker::AbstractClass)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappedIr {
    pub package: Option<String>,
    pub imports: Vec<MappedImport>,
    /// Imports the translated types and markers need.
    pub support_imports: BTreeSet<PyImport>,
    pub classes: Vec<MappedClass>,
}

impl MappedIr {
    /// Classes keyed by name, in declaration order.
    pub fn by_class_name(&self) -> IndexMap<&str, &MappedClass> {
        self.classes.iter().map(|c| (c.name.as_str(), c)).collect()
    }

    pub fn shape(&self) -> ShapeCounts {
        self.classes
            .iter()
            .fold(ShapeCounts::default(), |acc, c| ShapeCounts {
                classes: acc.classes + 1,
                fields: acc.fields + c.fields.len(),
                constructors: acc.constructors + c.constructors.len(),
                methods: acc.methods + c.methods.len(),
            })
    }

    /// Every import the generated module needs: mapped source imports plus
    /// support imports, deduplicated and sorted.
    pub fn all_imports(&self) -> BTreeSet<PyImport> {
        self.imports
            .iter()
            .filter_map(|i| i.target.clone())
            .chain(self.support_imports.iter().cloned())
            .collect()
    }
}
