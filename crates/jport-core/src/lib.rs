//! # jport-core
//!
//! Model definitions shared by every jport stage.
//!
//! ```text
//! Java text ──parse──▶ StructuralIr ──map──▶ MappedIr ──┬─plan─────▶ Vec<PlanStep>
//!                                                        └─generate─▶ Python text ──validate──▶ ValidationReport
//! ```
//!
//! Stages never mutate each other's values: each one builds a fresh value
//! from its input.

pub mod error;
pub mod ir;
pub mod naming;
pub mod plan;
pub mod report;

pub use error::{CyclicDependencyError, MapperWarning, SyntaxError};
pub use ir::{
    Body, ClassDecl, ConstructorDecl, DeclKind, FieldDecl, MappedClass, MappedConstructor,
    MappedField, MappedImport, MappedInitializer, MappedIr, MappedMethod, MappedParam,
    MappedTypeParam, Marker, MethodDecl, Modifier, ModifierSet, ParamDecl, PyImport, ShapeCounts,
    StructuralIr, TypeParam, TypeRef,
};
pub use naming::{IdentKind, rename};
pub use plan::{Complexity, Component, PlanStep, PlanSummary};
pub use report::{Issue, Severity, ValidationReport};
