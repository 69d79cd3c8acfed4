//! Intermediate representations
//!
//! Two trees with the same shape: [`StructuralIr`] holds Java declarations as
//! written, [`MappedIr`] holds the same declarations after type, name and
//! modifier translation. Ordering and arity are identical between the two.

pub mod mapped;
pub mod modifier;
pub mod structural;
pub mod type_ref;

pub use mapped::{
    MappedClass, MappedConstructor, MappedField, MappedImport, MappedInitializer, MappedIr,
    MappedMethod, MappedParam, MappedTypeParam, Marker, PyImport,
};
pub use modifier::{Modifier, ModifierSet};
pub use structural::{
    Body, ClassDecl, ConstructorDecl, DeclKind, FieldDecl, MethodDecl, ParamDecl, StructuralIr,
    TypeParam,
};
pub use type_ref::TypeRef;

/// Declaration counts of one unit, used for shape comparisons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct ShapeCounts {
    pub classes: usize,
    pub fields: usize,
    pub constructors: usize,
    pub methods: usize,
}
