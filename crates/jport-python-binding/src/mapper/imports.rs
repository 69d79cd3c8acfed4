//! Java import → Python import

use super::types::TypeTable;
use indexmap::IndexMap;
use jport_core::{MappedImport, PyImport};

/// JDK packages whose on-demand imports need nothing in Python.
const KNOWN_PACKAGES: &[&str] = &[
    "java.lang",
    "java.util",
    "java.util.function",
    "java.util.concurrent",
    "java.util.stream",
    "java.io",
    "java.math",
    "java.time",
    "java.nio.file",
];

/// JDK classes that are not types of the type table but still have a known
/// Python counterpart (or need none).
const KNOWN_CLASSES: &[(&str, Option<(&str, &str)>)] = &[
    ("java.io.Serializable", None),
    ("java.lang.Comparable", None),
    ("java.lang.Cloneable", None),
    ("java.lang.Math", None),
    ("java.util.Objects", None),
    ("java.util.Arrays", None),
    ("java.util.Collections", None),
    ("java.util.stream.Collectors", None),
    ("java.util.stream.Stream", Some(("collections.abc", "Iterator"))),
    ("java.util.function.Function", Some(("collections.abc", "Callable"))),
    ("java.util.function.BiFunction", Some(("collections.abc", "Callable"))),
    ("java.util.function.Supplier", Some(("collections.abc", "Callable"))),
    ("java.util.function.Consumer", Some(("collections.abc", "Callable"))),
    ("java.util.function.Predicate", Some(("collections.abc", "Callable"))),
    ("java.lang.Runnable", Some(("collections.abc", "Callable"))),
];

/// Result of mapping one import, with an optional warning message.
pub(crate) struct ImportOutcome {
    pub(crate) mapped: MappedImport,
    pub(crate) warning: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportTable {
    /// Entries that win over every built-in rule.
    overrides: IndexMap<String, PyImport>,
}

impl ImportTable {
    pub fn insert(&mut self, java: impl Into<String>, target: PyImport) {
        self.overrides.insert(java.into(), target);
    }

    pub(crate) fn map(&self, source: &str, types: &TypeTable) -> ImportOutcome {
        let (is_static, path) = match source.strip_prefix("static ") {
            Some(rest) => (true, rest.trim()),
            None => (false, source),
        };

        let (target, warning) = if let Some(target) = self.overrides.get(path) {
            (Some(target.clone()), None)
        } else if is_jdk(path) {
            map_jdk(path, is_static, types)
        } else {
            (Some(map_project(path)), None)
        };

        ImportOutcome {
            mapped: MappedImport {
                source: source.to_string(),
                target,
            },
            warning,
        }
    }
}

fn is_jdk(path: &str) -> bool {
    ["java.", "javax.", "jdk.", "sun."]
        .iter()
        .any(|prefix| path.starts_with(prefix))
}

fn map_jdk(path: &str, is_static: bool, types: &TypeTable) -> (Option<PyImport>, Option<String>) {
    if let Some(package) = path.strip_suffix(".*") {
        return if KNOWN_PACKAGES.contains(&package) {
            (None, None)
        } else {
            (None, Some(format!("no Python counterpart for `{path}`")))
        };
    }

    if is_static {
        return (
            None,
            Some(format!("static import `{path}` has no Python counterpart")),
        );
    }

    if let Some((_, target)) = KNOWN_CLASSES.iter().find(|(java, _)| *java == path) {
        return (target.map(|(module, name)| PyImport::from(module, name)), None);
    }

    match types.lookup(path) {
        Some(target) => (target.import.clone(), None),
        None => (None, Some(format!("no Python counterpart for `{path}`"))),
    }
}

/// `com.acme.util.Strings` → `from com.acme.util import Strings`. Static
/// imports name a member, which is imported from its class's module.
fn map_project(path: &str) -> PyImport {
    if let Some(package) = path.strip_suffix(".*") {
        return PyImport::from(package, "*");
    }
    match path.rsplit_once('.') {
        Some((module, name)) => PyImport::from(module, name),
        None => PyImport::module(path),
    }
}
