//! Parse the shared Java fixtures end to end.

use jport_core::{Body, DeclKind, Modifier};
use jport_java_binding::parse_java;
use rstest::rstest;

const CALCULATOR: &str = include_str!("../../../fixtures/java/Calculator.java");
const SHAPES: &str = include_str!("../../../fixtures/java/Shapes.java");
const BROKEN: &str = include_str!("../../../fixtures/java/Broken.java");
const CYCLE: &str = include_str!("../../../fixtures/java/Cycle.java");

#[test]
fn calculator_declarations_in_order() {
    let ir = parse_java(CALCULATOR).expect("Calculator.java parses");
    let calc = &ir.classes[0];

    assert_eq!(calc.fields.len(), 2);
    assert_eq!(calc.fields[0].name, "PI");
    assert_eq!(calc.fields[0].initializer.as_deref(), Some("3.14159"));
    assert_eq!(calc.constructors.len(), 1);

    let methods: Vec<_> = calc.methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(
        methods,
        [
            "add",
            "subtract",
            "multiply",
            "divide",
            "circleArea",
            "getName",
            "setName"
        ]
    );
    assert!(calc.methods.iter().all(|m| matches!(m.body, Body::Opaque(_))));
}

#[test]
fn shapes_hierarchy() {
    let ir = parse_java(SHAPES).expect("Shapes.java parses");
    assert_eq!(ir.package.as_deref(), Some("com.example.shapes"));
    assert_eq!(ir.imports.len(), 5);

    let by_name = ir.by_class_name();
    assert_eq!(
        by_name.keys().copied().collect::<Vec<_>>(),
        ["Shape", "AbstractShape", "Circle", "ShapeRegistry"]
    );

    let shape = by_name["Shape"];
    assert_eq!(shape.kind, DeclKind::Interface);
    assert_eq!(shape.interfaces, ["Comparable"]);

    let abstract_shape = by_name["AbstractShape"];
    assert!(abstract_shape.modifiers.contains(&Modifier::Abstract));
    assert_eq!(abstract_shape.interfaces, ["Shape", "Serializable"]);
    assert!(abstract_shape.methods[0].body.is_absent());

    let circle = by_name["Circle"];
    assert_eq!(circle.superclass.as_deref(), Some("AbstractShape"));
    assert_eq!(circle.constructors.len(), 2);

    let registry = by_name["ShapeRegistry"];
    assert_eq!(registry.type_params[0].name, "T");
    assert_eq!(registry.constructors.len(), 3);
    assert_eq!(registry.fields[0].ty.to_string(), "Map<String, List<T>>");
    assert_eq!(registry.fields[1].ty.array_depth(), 1);
    let size = registry.methods.last().unwrap();
    assert!(size.params[0].varargs);
    assert!(size.modifiers.contains(&Modifier::Synchronized));
}

#[test]
fn cycle_fixture_parses_structurally() {
    // Inheritance cycles are a planning error, not a syntax error.
    let ir = parse_java(CYCLE).expect("Cycle.java parses");
    assert_eq!(ir.classes.len(), 2);
}

#[test]
fn broken_fixture_fails_with_location() {
    let err = parse_java(BROKEN).unwrap_err();
    assert!(err.line > 0);
    assert!(err.found.is_none(), "error is at end of input");
}

#[rstest]
#[case("class {", 1)]
#[case("class A {\n  int x\n}", 3)]
#[case("class A {\n  void f( {\n}\n}", 2)]
#[case("class A extends B, C { }", 1)]
#[case("record Point(int x, int y) { }", 1)]
#[case("@interface Marker { }", 1)]
fn malformed_input_reports_line(#[case] source: &str, #[case] line: usize) {
    let err = parse_java(source).unwrap_err();
    assert_eq!(err.line, line, "{source:?}: {err}");
}

#[test]
fn syntax_error_serializes() {
    let err = parse_java("class A {").unwrap_err();
    let json = serde_json::to_value(&err).unwrap();
    assert_eq!(json["line"], 1);
    assert!(json["message"].as_str().unwrap().contains("end of input"));
}
