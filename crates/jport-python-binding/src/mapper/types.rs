//! Java → Python type table

use indexmap::IndexMap;
use jport_core::{PyImport, TypeRef};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// What a Java type name becomes in Python.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeTarget {
    pub python: String,
    /// Import the Python name needs, if any.
    pub import: Option<PyImport>,
}

impl TypeTarget {
    pub fn builtin(python: impl Into<String>) -> Self {
        Self {
            python: python.into(),
            import: None,
        }
    }

    pub fn imported(python: &str, module: &str) -> Self {
        Self {
            python: python.to_string(),
            import: Some(PyImport::from(module, python)),
        }
    }
}

const BUILTINS: &[(&str, &str)] = &[
    ("int", "int"),
    ("long", "int"),
    ("short", "int"),
    ("byte", "int"),
    ("float", "float"),
    ("double", "float"),
    ("boolean", "bool"),
    ("char", "str"),
    ("void", "None"),
    ("Integer", "int"),
    ("Long", "int"),
    ("Short", "int"),
    ("Byte", "int"),
    ("Float", "float"),
    ("Double", "float"),
    ("Number", "float"),
    ("Boolean", "bool"),
    ("Character", "str"),
    ("String", "str"),
    ("CharSequence", "str"),
    ("StringBuilder", "str"),
    ("Object", "object"),
    ("BigInteger", "int"),
    ("List", "list"),
    ("ArrayList", "list"),
    ("LinkedList", "list"),
    ("Collection", "list"),
    ("Set", "set"),
    ("HashSet", "set"),
    ("TreeSet", "set"),
    ("LinkedHashSet", "set"),
    ("Map", "dict"),
    ("HashMap", "dict"),
    ("TreeMap", "dict"),
    ("LinkedHashMap", "dict"),
    ("ConcurrentHashMap", "dict"),
    ("Throwable", "BaseException"),
    ("Exception", "Exception"),
    ("RuntimeException", "RuntimeError"),
    ("IllegalArgumentException", "ValueError"),
    ("IllegalStateException", "RuntimeError"),
    ("NumberFormatException", "ValueError"),
    ("NullPointerException", "TypeError"),
    ("ClassCastException", "TypeError"),
    ("IndexOutOfBoundsException", "IndexError"),
    ("ArrayIndexOutOfBoundsException", "IndexError"),
    ("UnsupportedOperationException", "NotImplementedError"),
    ("ArithmeticException", "ArithmeticError"),
    ("IOException", "OSError"),
    ("FileNotFoundException", "FileNotFoundError"),
    ("InterruptedException", "InterruptedError"),
    ("NoSuchElementException", "LookupError"),
];

const IMPORTED: &[(&str, &str, &str)] = &[
    ("Optional", "Optional", "typing"),
    ("Iterable", "Iterable", "collections.abc"),
    ("Iterator", "Iterator", "collections.abc"),
    ("Queue", "deque", "collections"),
    ("Deque", "deque", "collections"),
    ("ArrayDeque", "deque", "collections"),
    ("BigDecimal", "Decimal", "decimal"),
    ("LocalDate", "date", "datetime"),
    ("LocalDateTime", "datetime", "datetime"),
    ("Duration", "timedelta", "datetime"),
    ("UUID", "UUID", "uuid"),
    ("Path", "Path", "pathlib"),
    ("Function", "Callable", "collections.abc"),
    ("BiFunction", "Callable", "collections.abc"),
    ("Supplier", "Callable", "collections.abc"),
    ("Consumer", "Callable", "collections.abc"),
    ("Predicate", "Callable", "collections.abc"),
    ("Runnable", "Callable", "collections.abc"),
];

/// Table-driven type lookup. Qualified names are looked up whole first,
/// then by their last segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeTable {
    entries: IndexMap<String, TypeTarget>,
}

impl Default for TypeTable {
    fn default() -> Self {
        let mut entries = IndexMap::new();
        for (java, python) in BUILTINS {
            entries.insert(java.to_string(), TypeTarget::builtin(*python));
        }
        for (java, python, module) in IMPORTED {
            entries.insert(java.to_string(), TypeTarget::imported(python, module));
        }
        Self { entries }
    }
}

impl TypeTable {
    /// A table with no entries.
    pub fn empty() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Add or replace an entry.
    pub fn insert(&mut self, java: impl Into<String>, target: TypeTarget) {
        self.entries.insert(java.into(), target);
    }

    pub fn lookup(&self, name: &str) -> Option<&TypeTarget> {
        self.entries.get(name).or_else(|| {
            let simple = name.rsplit('.').next()?;
            self.entries.get(simple)
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Map a type tree. Array dimensions become nested `list[...]`, a bare
    /// `?` becomes `Any` and a bounded wildcard becomes its bound.
    pub(crate) fn map(&self, ty: &TypeRef, scope: &TypeScope<'_>, acc: &mut TypeAcc) -> TypeRef {
        if ty.is_unbounded_wildcard() {
            acc.imports.insert(PyImport::from("typing", "Any"));
            return TypeRef::simple("Any");
        }

        if let Some(element) = ty.element() {
            let mapped = self.map(&element, scope, acc);
            return TypeRef::new("list", vec![mapped], 0);
        }

        let args = ty
            .generic_args()
            .iter()
            .map(|arg| self.map(arg, scope, acc))
            .collect();

        let name = if scope.contains(ty.name()) {
            ty.name().to_string()
        } else if let Some(target) = self.lookup(ty.name()) {
            if let Some(import) = &target.import {
                acc.imports.insert(import.clone());
            }
            target.python.clone()
        } else {
            acc.unknown.push(ty.name().to_string());
            ty.name().to_string()
        };

        TypeRef::new(name, args, 0)
    }
}

/// Names that resolve without the table: classes of the unit and type
/// parameters in scope.
#[derive(Debug, Clone)]
pub(crate) struct TypeScope<'a> {
    classes: &'a HashSet<String>,
    params: Vec<String>,
}

impl<'a> TypeScope<'a> {
    pub(crate) fn new(classes: &'a HashSet<String>) -> Self {
        Self {
            classes,
            params: Vec::new(),
        }
    }

    pub(crate) fn with_params<'b>(&self, params: impl IntoIterator<Item = &'b str>) -> Self {
        let mut scope = self.clone();
        scope.params.extend(params.into_iter().map(str::to_string));
        scope
    }

    fn contains(&self, name: &str) -> bool {
        let simple = name.rsplit('.').next().unwrap_or(name);
        self.params.iter().any(|p| p == name)
            || self.classes.contains(name)
            || self.classes.contains(simple)
    }
}

/// Side results of mapping one or more types.
#[derive(Debug, Default)]
pub(crate) struct TypeAcc {
    pub(crate) imports: BTreeSet<PyImport>,
    pub(crate) unknown: Vec<String>,
}

/// Python spelling of a mapped type: `dict[str, list[int]]`.
pub fn render_type(ty: &TypeRef) -> String {
    if ty.generic_args().is_empty() {
        return ty.name().to_string();
    }
    let args: Vec<String> = ty.generic_args().iter().map(render_type).collect();
    format!("{}[{}]", ty.name(), args.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn map_one(ty: &TypeRef) -> (String, TypeAcc) {
        let table = TypeTable::default();
        let classes = HashSet::from(["Shape".to_string()]);
        let scope = TypeScope::new(&classes).with_params(["T"]);
        let mut acc = TypeAcc::default();
        let mapped = table.map(ty, &scope, &mut acc);
        (render_type(&mapped), acc)
    }

    #[rstest]
    #[case(TypeRef::simple("int"), "int")]
    #[case(TypeRef::simple("String"), "str")]
    #[case(TypeRef::simple("void"), "None")]
    #[case(TypeRef::simple("java.lang.String"), "str")]
    #[case(TypeRef::new("int", vec![], 2), "list[list[int]]")]
    #[case(
        TypeRef::new("Map", vec![TypeRef::simple("String"), TypeRef::new("List", vec![TypeRef::simple("T")], 0)], 0),
        "dict[str, list[T]]"
    )]
    #[case(TypeRef::new("List", vec![TypeRef::simple("Shape")], 1), "list[list[Shape]]")]
    #[case(TypeRef::new("List", vec![TypeRef::simple("Number").into_wildcard()], 0), "list[float]")]
    fn test_map_type(#[case] ty: TypeRef, #[case] expected: &str) {
        let (rendered, acc) = map_one(&ty);
        assert_eq!(rendered, expected);
        assert!(acc.unknown.is_empty());
    }

    #[test]
    fn test_bare_wildcard_is_any_and_needs_import() {
        let ty = TypeRef::new("List", vec![TypeRef::wildcard()], 0);
        let (rendered, acc) = map_one(&ty);
        assert_eq!(rendered, "list[Any]");
        assert!(acc.imports.contains(&PyImport::from("typing", "Any")));
    }

    #[test]
    fn test_unknown_type_passes_through_and_is_reported() {
        let (rendered, acc) = map_one(&TypeRef::simple("Widget"));
        assert_eq!(rendered, "Widget");
        assert_eq!(acc.unknown, ["Widget"]);
    }

    #[test]
    fn test_imported_target_records_import() {
        let ty = TypeRef::new("Optional", vec![TypeRef::simple("Integer")], 0);
        let (rendered, acc) = map_one(&ty);
        assert_eq!(rendered, "Optional[int]");
        assert!(acc.imports.contains(&PyImport::from("typing", "Optional")));
    }

    #[test]
    fn test_override_replaces_entry() {
        let mut table = TypeTable::default();
        table.insert("BigDecimal", TypeTarget::builtin("float"));
        assert_eq!(table.lookup("java.math.BigDecimal").unwrap().python, "float");
    }
}
