//! Code generator: mapped IR → Python module text
//!
//! Output is a pure function of the mapped IR and [`GeneratorOptions`]: the
//! same input always yields byte-identical text.

mod constructors;
mod pretty_printer;

pub use pretty_printer::PLACEHOLDER;

use crate::mapper::render_type;
use constructors::InitPlan;
use indexmap::IndexMap;
use jport_core::{MappedClass, MappedIr, PyImport};
use pretty::RcAllocator;
use pretty_printer::PythonPrinter;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::debug;

pub const DEFAULT_WIDTH: usize = 100;
pub const DEFAULT_INDENT: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorOptions {
    /// Spaces per indentation level.
    pub indent: usize,
    pub docstrings: bool,
    /// Emit the Java body as `#` comments above each placeholder.
    pub include_source_bodies: bool,
    /// Line width signatures are wrapped at.
    pub width: usize,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT,
            docstrings: true,
            include_source_bodies: false,
            width: DEFAULT_WIDTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedCode {
    pub text: String,
    /// Lossy decisions the generator made: constructor merges, overload
    /// collapses, conflicting type variables.
    pub warnings: Vec<String>,
}

/// Everything printed above the first class.
pub(crate) struct ModuleHeader {
    pub(crate) package: Option<String>,
    pub(crate) imports: Vec<String>,
    pub(crate) type_vars: Vec<String>,
}

/// Per-class decisions made before printing.
pub(crate) struct ClassLayout<'a> {
    pub(crate) class: &'a MappedClass,
    pub(crate) bases: Vec<String>,
    /// Interfaces not declared in the unit, kept as a comment.
    pub(crate) capabilities: Vec<&'a str>,
    pub(crate) init: InitPlan<'a>,
}

impl<'a> ClassLayout<'a> {
    fn new(class: &'a MappedClass, unit: &HashSet<&str>, warnings: &mut Vec<String>) -> Self {
        let mut bases: Vec<String> = class.base.iter().cloned().collect();
        let mut capabilities = Vec::new();
        for interface in &class.capabilities {
            let simple = simple_name(interface);
            if unit.contains(simple) {
                bases.push(simple.to_string());
            } else {
                capabilities.push(interface.as_str());
            }
        }
        if !class.type_params.is_empty() {
            let names: Vec<&str> = class.type_params.iter().map(|p| p.name.as_str()).collect();
            bases.push(format!("Generic[{}]", names.join(", ")));
        }
        if class.is_abstract() {
            bases.push("ABC".to_string());
        }

        let init = InitPlan::new(&class.constructors);
        warnings.extend(init.warning(&class.name));

        let mut counts: IndexMap<&str, usize> = IndexMap::new();
        for method in &class.methods {
            *counts.entry(method.name.as_str()).or_default() += 1;
        }
        for (name, count) in counts.into_iter().filter(|(_, n)| *n > 1) {
            warnings.push(format!(
                "{}.{name}: {count} definitions share one Python name; only the last is kept",
                class.name
            ));
        }

        Self {
            class,
            bases,
            capabilities,
            init,
        }
    }
}

pub fn generate(ir: &MappedIr, options: &GeneratorOptions) -> GeneratedCode {
    let unit: HashSet<&str> = ir.classes.iter().map(|c| c.name.as_str()).collect();
    let mut warnings = Vec::new();

    let layouts: Vec<ClassLayout<'_>> = emission_order(ir)
        .into_iter()
        .map(|class| ClassLayout::new(class, &unit, &mut warnings))
        .collect();

    let header = ModuleHeader {
        package: ir.package.clone(),
        imports: import_lines(ir, &layouts),
        type_vars: type_vars(ir, &mut warnings),
    };

    let alloc = RcAllocator;
    let printer = PythonPrinter::new(&alloc, options);
    let text = tidy(&printer.render(printer.module(&header, &layouts)));

    debug!(
        classes = layouts.len(),
        bytes = text.len(),
        warnings = warnings.len(),
        "generated module"
    );

    GeneratedCode { text, warnings }
}

fn simple_name(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

/// Declaration order, except that an in-unit supertype is placed before
/// the classes that extend or implement it. Classes already on the current
/// path are skipped, so a cyclic graph still terminates.
fn emission_order(ir: &MappedIr) -> Vec<&MappedClass> {
    fn place<'a>(
        class: &'a MappedClass,
        by_name: &IndexMap<&str, &'a MappedClass>,
        visiting: &mut HashSet<&'a str>,
        order: &mut Vec<&'a MappedClass>,
    ) {
        if order.iter().any(|c| c.name == class.name) || !visiting.insert(&class.name) {
            return;
        }
        for supertype in class.supertypes() {
            if let Some(dep) = by_name.get(simple_name(supertype)) {
                place(dep, by_name, visiting, order);
            }
        }
        order.push(class);
    }

    let by_name = ir.by_class_name();
    let mut visiting = HashSet::new();
    let mut order = Vec::with_capacity(ir.classes.len());
    for class in &ir.classes {
        place(class, &by_name, &mut visiting, &mut order);
    }
    order
}

/// `import` lines: one `from m import a, b` line per module, sorted by
/// module. `__future__` is printed separately.
fn import_lines(ir: &MappedIr, layouts: &[ClassLayout<'_>]) -> Vec<String> {
    let mut imports = ir.all_imports();
    if layouts.iter().any(|l| l.init.is_variadic()) {
        imports.insert(PyImport::from("typing", "Any"));
    }

    let mut modules: BTreeSet<&str> = BTreeSet::new();
    let mut names: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for import in &imports {
        match &import.name {
            Some(name) => {
                names.entry(import.module.as_str()).or_default().insert(name);
            }
            None => {
                modules.insert(&import.module);
            }
        }
    }

    let mut lines: BTreeMap<(&str, u8), String> = BTreeMap::new();
    for module in modules {
        lines.insert((module, 0), format!("import {module}"));
    }
    for (module, names) in names {
        let (star, named): (Vec<&str>, Vec<&str>) = names.into_iter().partition(|n| *n == "*");
        if !star.is_empty() {
            lines.insert((module, 1), format!("from {module} import *"));
        }
        if !named.is_empty() {
            lines.insert((module, 2), format!("from {module} import {}", named.join(", ")));
        }
    }
    lines.into_values().collect()
}

/// One `TypeVar` per distinct type parameter name across the unit. The
/// first bound wins when names are reused with different bounds.
fn type_vars(ir: &MappedIr, warnings: &mut Vec<String>) -> Vec<String> {
    let mut seen: IndexMap<&str, Option<String>> = IndexMap::new();
    for class in &ir.classes {
        let params = class
            .type_params
            .iter()
            .chain(class.methods.iter().flat_map(|m| m.type_params.iter()));
        for param in params {
            let bound = param.bound.as_ref().map(render_type);
            match seen.get(param.name.as_str()) {
                None => {
                    seen.insert(&param.name, bound);
                }
                Some(existing) if *existing != bound => warnings.push(format!(
                    "{}: type variable `{}` is reused with another bound; the first bound is kept",
                    class.name, param.name
                )),
                Some(_) => {}
            }
        }
    }

    seen.into_iter()
        .map(|(name, bound)| match bound {
            Some(bound) => format!("{name} = TypeVar(\"{name}\", bound=\"{bound}\")"),
            None => format!("{name} = TypeVar(\"{name}\")"),
        })
        .collect()
}

/// Strip trailing whitespace, keep at most two consecutive blank lines and
/// end with exactly one newline.
fn tidy(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank_run = 0;
    for line in text.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            blank_run += 1;
            if blank_run > 2 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        out.push_str(line);
        out.push('\n');
    }
    while out.ends_with("\n\n") {
        out.pop();
    }
    out
}
