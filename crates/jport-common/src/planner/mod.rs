//! Migration planner: mapped IR → ordered plan steps
//!
//! Classes are ordered supertypes first (stable on declaration order). Each
//! class yields a `class` step followed by `fields`, `constructor` and
//! `methods` steps for the parts it actually has, always in that order.

mod complexity;
mod graph;

pub use complexity::{ComplexityPolicy, Thresholds, Weights};

use graph::{ClassGraph, simple_name};
use indexmap::IndexMap;
use jport_core::{
    Complexity, Component, CyclicDependencyError, DeclKind, MappedClass, MappedIr, MappedMethod,
    Marker, PlanStep, PlanSummary,
};
use std::collections::BTreeSet;
use tracing::debug;

/// Classes with more methods than this get a warning on their methods step.
pub const LARGE_CLASS_METHODS: usize = 10;

#[derive(Debug, Clone, Default)]
pub struct Planner {
    policy: ComplexityPolicy,
}

impl Planner {
    pub fn new(policy: ComplexityPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ComplexityPolicy {
        &self.policy
    }

    pub fn plan(&self, ir: &MappedIr) -> Result<Vec<PlanStep>, CyclicDependencyError> {
        plan(ir, &self.policy)
    }
}

/// Step ids already handed out for one class.
#[derive(Default, Clone, Copy)]
struct ClassSteps {
    class: u32,
    fields: Option<u32>,
    methods: Option<u32>,
}

struct StepBuilder<'p> {
    policy: &'p ComplexityPolicy,
    steps: Vec<PlanStep>,
}

impl StepBuilder<'_> {
    fn push(
        &mut self,
        class: &MappedClass,
        component: Component,
        score: u32,
        depends_on: BTreeSet<u32>,
        warnings: Vec<String>,
    ) -> u32 {
        let id = self.steps.len() as u32 + 1;
        self.steps.push(PlanStep {
            id,
            target_class: class.name.clone(),
            component,
            complexity: self.policy.thresholds.bucket(score),
            depends_on,
            warnings,
        });
        id
    }
}

pub fn plan(
    ir: &MappedIr,
    policy: &ComplexityPolicy,
) -> Result<Vec<PlanStep>, CyclicDependencyError> {
    let graph = ClassGraph::new(&ir.classes);
    let order = graph.topo_order()?;
    let depths = graph.depths(&order);

    let mut builder = StepBuilder {
        policy,
        steps: Vec::new(),
    };
    let mut emitted: Vec<Option<ClassSteps>> = vec![None; graph.nodes.len()];

    for &node in &order {
        let class = graph.nodes[node];
        let supers: Vec<ClassSteps> = graph
            .supers(node)
            .iter()
            .filter_map(|&sup| emitted[sup])
            .collect();

        let class_id = builder.push(
            class,
            Component::Class,
            policy.class_score(class, depths[node]),
            supers.iter().map(|s| s.class).collect(),
            class_warnings(class, &graph),
        );
        let mut ids = ClassSteps {
            class: class_id,
            ..ClassSteps::default()
        };

        if !class.fields.is_empty() {
            ids.fields = Some(builder.push(
                class,
                Component::Fields,
                policy.fields_score(class),
                BTreeSet::from([class_id]),
                field_warnings(class),
            ));
        }

        if !class.constructors.is_empty() {
            let mut depends_on = BTreeSet::from([class_id]);
            depends_on.extend(ids.fields);
            let mut warnings = Vec::new();
            if class.constructors.len() > 1 {
                warnings.push(format!(
                    "{} constructors must merge into a single __init__",
                    class.constructors.len()
                ));
            }
            builder.push(
                class,
                Component::Constructor,
                policy.constructor_score(class),
                depends_on,
                warnings,
            );
        }

        if !class.methods.is_empty() {
            let mut depends_on = BTreeSet::from([class_id]);
            depends_on.extend(supers.iter().filter_map(|s| s.methods));
            ids.methods = Some(builder.push(
                class,
                Component::Methods,
                policy.methods_score(class),
                depends_on,
                method_warnings(class),
            ));
        }

        emitted[node] = Some(ids);
    }

    debug!(
        classes = ir.classes.len(),
        steps = builder.steps.len(),
        "planned unit"
    );
    Ok(builder.steps)
}

fn class_warnings(class: &MappedClass, graph: &ClassGraph<'_>) -> Vec<String> {
    let mut warnings = Vec::new();

    if !class.capabilities.is_empty() {
        let verb = match class.kind {
            DeclKind::Class => "implements",
            DeclKind::Interface => "extends",
        };
        warnings.push(format!(
            "{verb} {}: Python has no interfaces; in-unit ones become bases, others a capability comment",
            class.capabilities.join(", ")
        ));
    }

    // A superclass the type table left untouched is user code from elsewhere.
    if let (Some(superclass), Some(base)) = (&class.superclass, &class.base) {
        if !graph.contains(superclass) && base == simple_name(superclass) {
            warnings.push(format!(
                "superclass `{superclass}` is not part of this unit; migrate it first"
            ));
        }
    }

    warnings
}

fn field_warnings(class: &MappedClass) -> Vec<String> {
    class
        .fields
        .iter()
        .filter(|f| f.markers.contains(&Marker::ClassConstant) && f.name != f.source_name)
        .map(|f| format!("constant `{}` renamed to `{}`", f.source_name, f.name))
        .collect()
}

fn method_warnings(class: &MappedClass) -> Vec<String> {
    let mut by_name: IndexMap<&str, Vec<&MappedMethod>> = IndexMap::new();
    for method in &class.methods {
        by_name.entry(method.name.as_str()).or_default().push(method);
    }

    let mut warnings = Vec::new();
    for (name, methods) in by_name.iter().filter(|(_, m)| m.len() > 1) {
        let statics = methods
            .iter()
            .filter(|m| m.markers.contains(&Marker::StaticCallable))
            .count();
        let sources: BTreeSet<&str> = methods.iter().map(|m| m.source_name.as_str()).collect();

        if statics > 0 && statics < methods.len() {
            warnings.push(format!(
                "static and instance methods collide as `{name}` after renaming"
            ));
        } else if sources.len() > 1 {
            let sources: Vec<_> = sources.into_iter().map(|s| format!("`{s}`")).collect();
            warnings.push(format!(
                "{} collide as `{name}` after renaming",
                sources.join(", ")
            ));
        } else {
            warnings.push(format!(
                "{} overloads of `{name}` collapse into one Python definition",
                methods.len()
            ));
        }
    }

    if class.methods.len() > LARGE_CLASS_METHODS {
        warnings.push(format!(
            "{} methods; consider migrating `{}` in smaller batches",
            class.methods.len(),
            class.name
        ));
    }
    warnings
}

/// Totals and an overall difficulty for a finished plan.
pub fn summarize(ir: &MappedIr, steps: &[PlanStep]) -> PlanSummary {
    let shape = ir.shape();
    let graph = ClassGraph::new(&ir.classes);

    let has_inheritance = ir.classes.iter().any(|c| c.base.is_some())
        || ir
            .classes
            .iter()
            .any(|c| c.supertypes().any(|s| graph.contains(s)));
    let has_interfaces = ir
        .classes
        .iter()
        .any(|c| c.kind == DeclKind::Interface || !c.capabilities.is_empty());
    let has_generics = ir.classes.iter().any(uses_generics);

    let warning_count = steps.iter().map(|s| s.warnings.len()).sum();
    let difficulty = steps
        .iter()
        .map(|s| s.complexity)
        .max()
        .unwrap_or(Complexity::Low);

    let mut recommendations = Vec::new();
    let high = steps
        .iter()
        .filter(|s| s.complexity == Complexity::High)
        .count();
    if high > 0 {
        recommendations.push(format!(
            "review the {high} high-complexity step(s) by hand before filling in bodies"
        ));
    }
    if has_generics {
        recommendations.push(
            "check TypeVar bounds: Java generics are erased and Python checks them only statically"
                .to_string(),
        );
    }
    if has_interfaces {
        recommendations.push(
            "decide per interface between an ABC base and a typing.Protocol".to_string(),
        );
    }
    if warning_count > 0 {
        recommendations.push(format!(
            "resolve the {warning_count} plan warning(s) before translating method bodies"
        ));
    }

    PlanSummary {
        total_steps: steps.len(),
        classes: shape.classes,
        fields: shape.fields,
        constructors: shape.constructors,
        methods: shape.methods,
        has_inheritance,
        has_interfaces,
        has_generics,
        warning_count,
        difficulty,
        recommendations,
    }
}

fn uses_generics(class: &MappedClass) -> bool {
    !class.type_params.is_empty()
        || class.fields.iter().any(|f| f.ty.is_generic())
        || class.methods.iter().any(|m| {
            !m.type_params.is_empty()
                || m.return_type.is_generic()
                || m.params.iter().any(|p| p.ty.is_generic())
        })
        || class
            .constructors
            .iter()
            .any(|c| c.params.iter().any(|p| p.ty.is_generic()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jport_java_binding::parse_java;
    use jport_python_binding::map;

    fn mapped(source: &str) -> MappedIr {
        map(&parse_java(source).unwrap()).ir
    }

    fn step<'a>(steps: &'a [PlanStep], class: &str, component: Component) -> &'a PlanStep {
        steps
            .iter()
            .find(|s| s.target_class == class && s.component == component)
            .unwrap_or_else(|| panic!("no {component} step for {class}"))
    }

    #[test]
    fn test_sub_steps_follow_fixed_order() {
        let ir = mapped(
            r#"
class Account {
    private int balance;
    public Account(int balance) { this.balance = balance; }
    public int getBalance() { return balance; }
}
"#,
        );
        let steps = plan(&ir, &ComplexityPolicy::default()).unwrap();
        let components: Vec<_> = steps.iter().map(|s| s.component).collect();
        assert_eq!(
            components,
            [
                Component::Class,
                Component::Fields,
                Component::Constructor,
                Component::Methods
            ]
        );
        assert_eq!(steps.iter().map(|s| s.id).collect::<Vec<_>>(), [1, 2, 3, 4]);
        assert_eq!(steps[2].depends_on, BTreeSet::from([1, 2]));
        assert_eq!(steps[3].depends_on, BTreeSet::from([1]));
    }

    #[test]
    fn test_missing_components_are_skipped() {
        let ir = mapped("interface Marker {}\nclass Plain { void run() {} }");
        let steps = plan(&ir, &ComplexityPolicy::default()).unwrap();
        let summary: Vec<_> = steps
            .iter()
            .map(|s| (s.target_class.as_str(), s.component))
            .collect();
        assert_eq!(
            summary,
            [
                ("Marker", Component::Class),
                ("Plain", Component::Class),
                ("Plain", Component::Methods)
            ]
        );
    }

    #[test]
    fn test_subclass_steps_come_after_and_depend_on_supertypes() {
        let ir = mapped(
            r#"
class Child extends Parent { void run() {} }
class Parent { void run() {} }
"#,
        );
        let steps = plan(&ir, &ComplexityPolicy::default()).unwrap();
        let parent = step(&steps, "Parent", Component::Class);
        let child = step(&steps, "Child", Component::Class);
        assert!(child.id > parent.id);
        assert!(child.depends_on.contains(&parent.id));

        let parent_methods = step(&steps, "Parent", Component::Methods);
        let child_methods = step(&steps, "Child", Component::Methods);
        assert!(child_methods.depends_on.contains(&parent_methods.id));
    }

    #[test]
    fn test_cycle_yields_no_steps() {
        let ir = mapped("class A extends B {}\nclass B extends A {}");
        let err = plan(&ir, &ComplexityPolicy::default()).unwrap_err();
        assert_eq!(err.cycle, ["A", "B", "A"]);
    }

    #[test]
    fn test_risk_warnings() {
        let ir = mapped(
            r#"
class Service implements Runnable, Closeable {
    static final int maxRetries = 3;
    public Service() {}
    public Service(int retries) {}
    public static void reset() {}
    public void reset(int to) {}
    public void log(String msg) {}
    public void log(int code) {}
}
"#,
        );
        let steps = plan(&ir, &ComplexityPolicy::default()).unwrap();

        let class = step(&steps, "Service", Component::Class);
        assert_eq!(class.warnings.len(), 1);
        assert!(class.warnings[0].starts_with("implements Runnable, Closeable:"));

        assert_eq!(
            step(&steps, "Service", Component::Fields).warnings,
            ["constant `maxRetries` renamed to `MAX_RETRIES`"]
        );
        assert_eq!(
            step(&steps, "Service", Component::Constructor).warnings,
            ["2 constructors must merge into a single __init__"]
        );
        assert_eq!(
            step(&steps, "Service", Component::Methods).warnings,
            [
                "static and instance methods collide as `reset` after renaming",
                "2 overloads of `log` collapse into one Python definition"
            ]
        );
    }

    #[test]
    fn test_external_superclass_is_flagged() {
        let ir = mapped("class Job extends com.acme.Task {}\nclass Oops extends RuntimeException {}");
        let steps = plan(&ir, &ComplexityPolicy::default()).unwrap();
        assert_eq!(
            step(&steps, "Job", Component::Class).warnings,
            ["superclass `com.acme.Task` is not part of this unit; migrate it first"]
        );
        assert!(step(&steps, "Oops", Component::Class).warnings.is_empty());
    }

    #[test]
    fn test_complexity_uses_policy() {
        let ir = mapped(
            r#"
class Wide {
    int a; int b; int c; int d; int e;
}
"#,
        );
        let steps = plan(&ir, &ComplexityPolicy::default()).unwrap();
        assert_eq!(step(&steps, "Wide", Component::Fields).complexity, Complexity::Medium);

        let strict = ComplexityPolicy {
            thresholds: Thresholds {
                low_max: 1,
                medium_max: 2,
            },
            ..ComplexityPolicy::default()
        };
        let steps = plan(&ir, &strict).unwrap();
        assert_eq!(step(&steps, "Wide", Component::Fields).complexity, Complexity::High);
        assert_eq!(step(&steps, "Wide", Component::Class).complexity, Complexity::Low);
    }

    #[test]
    fn test_summary() {
        let ir = mapped(
            r#"
interface Shape { double area(); }
class Box<T> implements Shape {
    private java.util.List<T> items;
    public double area() { return 0; }
}
"#,
        );
        let steps = plan(&ir, &ComplexityPolicy::default()).unwrap();
        let summary = summarize(&ir, &steps);

        assert_eq!(summary.total_steps, steps.len());
        assert_eq!(summary.classes, 2);
        assert_eq!(summary.fields, 1);
        assert_eq!(summary.methods, 2);
        assert!(summary.has_inheritance);
        assert!(summary.has_interfaces);
        assert!(summary.has_generics);
        assert_eq!(summary.warning_count, 1);
        assert_eq!(summary.difficulty, Complexity::Low);
        assert_eq!(summary.recommendations.len(), 3);
    }
}
