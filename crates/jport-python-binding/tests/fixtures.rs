//! Map, generate and validate the shared Java fixtures.

use jport_core::{Marker, TypeRef};
use jport_java_binding::parse_java;
use jport_python_binding::reader::read_outline;
use jport_python_binding::{GeneratorOptions, ValidatorOptions, generate, map, validate};

const CALCULATOR: &str = include_str!("../../../fixtures/java/Calculator.java");
const SHAPES: &str = include_str!("../../../fixtures/java/Shapes.java");

#[test]
fn calculator_round_trip() {
    let structural = parse_java(CALCULATOR).unwrap();
    let mapping = map(&structural);
    assert!(mapping.warnings.is_empty(), "{:?}", mapping.warnings);
    assert_eq!(mapping.ir.shape(), structural.shape());

    let calc = &mapping.ir.classes[0];
    assert_eq!(calc.fields[0].name, "PI");
    assert_eq!(calc.fields[1].name, "_name");
    let methods: Vec<_> = calc.methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(
        methods,
        [
            "add",
            "subtract",
            "multiply",
            "divide",
            "circle_area",
            "get_name",
            "set_name"
        ]
    );

    let code = generate(&mapping.ir, &GeneratorOptions::default());
    assert!(code.text.contains("    PI: Final[float] = 3.14159\n"));
    assert!(code.text.contains("    def add(self, a: int, b: int) -> int:\n"));
    assert!(code.text.contains("    @staticmethod\n    def circle_area(radius: float) -> float:\n"));

    let report = validate(&code.text, &mapping.ir, &ValidatorOptions::default());
    assert!(report.passed, "{:#?}", report.issues);
    assert!(report.issues.is_empty());
}

#[test]
fn shapes_mapping() {
    let structural = parse_java(SHAPES).unwrap();
    let mapping = map(&structural);
    assert_eq!(mapping.ir.shape(), structural.shape());

    let by_name = mapping.ir.by_class_name();
    let shape = by_name["Shape"];
    assert!(shape.methods[0].markers.contains(&Marker::AbstractMethod));
    assert_eq!(shape.capabilities, ["Comparable"]);

    let registry = by_name["ShapeRegistry"];
    assert_eq!(
        registry.fields[0].ty,
        TypeRef::new(
            "dict",
            vec![
                TypeRef::simple("str"),
                TypeRef::new("list", vec![TypeRef::simple("T")], 0)
            ],
            0
        )
    );
    assert_eq!(registry.fields[0].name, "_by_kind");
    assert!(registry.fields[0].initializer.as_ref().unwrap().untranslated);

    // Only the non-literal initializer is lossy.
    assert_eq!(mapping.warnings.len(), 1, "{:?}", mapping.warnings);
    assert_eq!(mapping.warnings[0].location, "ShapeRegistry.byKind");
}

#[test]
fn shapes_generate_and_validate() {
    let mapping = map(&parse_java(SHAPES).unwrap());
    let code = generate(&mapping.ir, &GeneratorOptions::default());
    let text = &code.text;

    assert!(text.contains("T = TypeVar(\"T\", bound=\"Shape\")\n"));
    assert!(text.contains("# capabilities: Comparable\nclass Shape(ABC):\n"));
    assert!(text.contains("# capabilities: Serializable\nclass AbstractShape(Shape, ABC):\n"));
    assert!(text.contains("class Circle(AbstractShape):\n"));
    assert!(text.contains("class ShapeRegistry(Generic[T]):\n"));
    assert!(text.contains("    created: ClassVar[int] = 0\n"));
    assert!(text.contains("    _by_kind: dict[str, list[T]]\n"));
    assert!(text.contains("    def size(self, *kinds: str) -> int:\n"));
    assert!(text.contains("    def largest(self, candidates: list[T]) -> Optional[T]:\n"));
    assert!(text.contains("from abc import ABC, abstractmethod\n"));

    // Circle merge, ShapeRegistry fallback, `register` overloads.
    assert_eq!(code.warnings.len(), 3, "{:?}", code.warnings);

    let outline = read_outline(text).unwrap();
    let names: Vec<_> = outline.classes.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Shape", "AbstractShape", "Circle", "ShapeRegistry"]);

    let report = validate(text, &mapping.ir, &ValidatorOptions::default());
    assert!(report.passed, "{:#?}", report.issues);
}

#[test]
fn unusual_sources_round_trip() {
    let java = r#"public class 订单 {
    private int 数量;

    @SuppressWarnings({
        "unchecked",
        "rawtypes"
    })
    public 订单(int 数量) {
        this.数量 = 数量;
    }

    public String note(int self) {
        return """
            } inside a text block
            """;
    }
}
"#;
    let mapping = map(&parse_java(java).unwrap());
    let options = GeneratorOptions {
        include_source_bodies: true,
        ..GeneratorOptions::default()
    };
    let code = generate(&mapping.ir, &options);
    let text = &code.text;

    assert!(text.contains("    _数量: int
"), "{text}");
    assert!(text.contains("    # @SuppressWarnings({\n    #     \"unchecked\",\n"), "{text}");
    assert!(text.contains("def note(self, self_: int) -> str:"), "{text}");
    assert!(text.contains("# } inside a text block"), "{text}");

    let report = validate(text, &mapping.ir, &ValidatorOptions::default());
    assert_eq!(report.errors().count(), 0, "{:#?}\n{text}", report.issues);
}

#[test]
fn generation_is_byte_identical() {
    let mapping = map(&parse_java(SHAPES).unwrap());
    let options = GeneratorOptions::default();
    assert_eq!(
        generate(&mapping.ir, &options).text,
        generate(&mapping.ir, &options).text
    );
}

#[test]
fn tampered_output_fails_validation() {
    let mapping = map(&parse_java(CALCULATOR).unwrap());
    let code = generate(&mapping.ir, &GeneratorOptions::default());
    let tampered = code.text.replace("    def divide", "    def _gone");

    let report = validate(&tampered, &mapping.ir, &ValidatorOptions::default());
    assert!(!report.passed);
    assert!(report.errors().any(|i| i.message == "method `divide` is missing"));
}
