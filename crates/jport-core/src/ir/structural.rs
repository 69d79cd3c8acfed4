//! Structural IR
//!
//! Java declarations exactly as written: names, types and modifiers are not
//! translated, and declaration order inside a class is kept.

use super::{Modifier, ShapeCounts, TypeRef};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Body of a method or constructor.
///
/// The core never interprets body text; `Opaque` carries the verbatim source
/// between (and including) the braces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum Body {
    /// `abstract`, `native` and interface methods end with `;`.
    Absent,
    Opaque(String),
}

impl Body {
    pub fn is_absent(&self) -> bool {
        matches!(self, Body::Absent)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Body::Absent => None,
            Body::Opaque(text) => Some(text),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclKind {
    Class,
    Interface,
}

/// A generic type parameter, `T extends Comparable<T>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeParam {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bounds: Vec<TypeRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    pub modifiers: BTreeSet<Modifier>,
    /// Initializer expression, verbatim and unevaluated.
    pub initializer: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamDecl {
    pub name: String,
    /// For varargs the type already carries the extra array dimension.
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub varargs: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDecl {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_params: Vec<TypeParam>,
    pub params: Vec<ParamDecl>,
    pub return_type: TypeRef,
    pub modifiers: BTreeSet<Modifier>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub throws: Vec<TypeRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<String>,
    pub body: Body,
}

impl MethodDecl {
    /// Overload identity: name plus parameter types.
    pub fn signature(&self) -> (String, Vec<String>) {
        (
            self.name.clone(),
            self.params.iter().map(|p| p.ty.to_string()).collect(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructorDecl {
    pub params: Vec<ParamDecl>,
    pub modifiers: BTreeSet<Modifier>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub throws: Vec<TypeRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<String>,
    pub body: Body,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDecl {
    pub name: String,
    pub kind: DeclKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_params: Vec<TypeParam>,
    pub superclass: Option<String>,
    pub interfaces: Vec<String>,
    pub fields: Vec<FieldDecl>,
    pub constructors: Vec<ConstructorDecl>,
    pub methods: Vec<MethodDecl>,
    pub modifiers: BTreeSet<Modifier>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<String>,
}

impl ClassDecl {
    pub fn new(name: impl Into<String>, kind: DeclKind) -> Self {
        Self {
            name: name.into(),
            kind,
            type_params: Vec::new(),
            superclass: None,
            interfaces: Vec::new(),
            fields: Vec::new(),
            constructors: Vec::new(),
            methods: Vec::new(),
            modifiers: BTreeSet::new(),
            annotations: Vec::new(),
        }
    }

    /// Superclass first, then interfaces in declaration order.
    pub fn supertypes(&self) -> impl Iterator<Item = &str> {
        self.superclass
            .iter()
            .chain(self.interfaces.iter())
            .map(String::as_str)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralIr {
    pub package: Option<String>,
    pub imports: Vec<String>,
    pub classes: Vec<ClassDecl>,
}

impl StructuralIr {
    /// Classes keyed by name, in declaration order.
    pub fn by_class_name(&self) -> IndexMap<&str, &ClassDecl> {
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
}
