//! Semantic mapper: structural IR → mapped IR
//!
//! The mapper never fails. Anything it cannot translate passes through
//! unchanged and is reported as a [`MapperWarning`]. Classes and members keep
//! their count and order.

pub mod imports;
mod literals;
pub mod types;

pub use imports::ImportTable;
pub use types::{TypeTable, TypeTarget, render_type};

use jport_core::naming::{IdentKind, rename};
use jport_core::{
    ClassDecl, ConstructorDecl, DeclKind, FieldDecl, MappedClass, MappedConstructor, MappedField,
    MappedIr, MappedMethod, MappedParam, MappedTypeParam, MapperWarning, Marker, MethodDecl,
    Modifier, ModifierSet, ParamDecl, PyImport, StructuralIr, TypeParam, TypeRef,
};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use tracing::debug;
use types::{TypeAcc, TypeScope};

/// Policy data the mapper runs with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapperPolicy {
    pub types: TypeTable,
    pub imports: ImportTable,
}

/// Mapped IR plus everything the mapper could not translate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mapping {
    pub ir: MappedIr,
    pub warnings: Vec<MapperWarning>,
}

#[derive(Debug, Clone, Default)]
pub struct Mapper {
    policy: MapperPolicy,
}

impl Mapper {
    pub fn new(policy: MapperPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &MapperPolicy {
        &self.policy
    }

    pub fn map(&self, ir: &StructuralIr) -> Mapping {
        let unit_classes: HashSet<String> = ir.classes.iter().map(|c| c.name.clone()).collect();
        let scope = TypeScope::new(&unit_classes);
        let mut cx = MapContext {
            policy: &self.policy,
            support: BTreeSet::new(),
            warnings: Vec::new(),
        };

        let imports = ir
            .imports
            .iter()
            .map(|source| {
                let outcome = self.policy.imports.map(source, &self.policy.types);
                if let Some(message) = outcome.warning {
                    cx.warn("import", message);
                }
                outcome.mapped
            })
            .collect();

        let classes = ir
            .classes
            .iter()
            .map(|class| cx.map_class(class, &scope))
            .collect();

        let mapped = MappedIr {
            package: ir.package.clone(),
            imports,
            support_imports: cx.support,
            classes,
        };

        debug!(
            classes = mapped.classes.len(),
            warnings = cx.warnings.len(),
            "mapped unit"
        );

        Mapping {
            ir: mapped,
            warnings: cx.warnings,
        }
    }
}

/// Map with the default policy.
pub fn map(ir: &StructuralIr) -> Mapping {
    Mapper::default().map(ir)
}

struct MapContext<'p> {
    policy: &'p MapperPolicy,
    support: BTreeSet<PyImport>,
    warnings: Vec<MapperWarning>,
}

impl MapContext<'_> {
    fn warn(&mut self, location: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(MapperWarning {
            location: location.into(),
            message: message.into(),
        });
    }

    fn need(&mut self, module: &str, name: &str) {
        self.support.insert(PyImport::from(module, name));
    }

    fn map_type(&mut self, ty: &TypeRef, scope: &TypeScope<'_>, location: &str) -> TypeRef {
        let mut acc = TypeAcc::default();
        let mapped = self.policy.types.map(ty, scope, &mut acc);
        self.support.extend(acc.imports);
        for name in acc.unknown {
            self.warn(location, format!("no Python mapping for type `{name}`"));
        }
        mapped
    }

    fn map_type_params(
        &mut self,
        params: &[TypeParam],
        scope: &TypeScope<'_>,
        location: &str,
    ) -> Vec<MappedTypeParam> {
        if !params.is_empty() {
            self.need("typing", "TypeVar");
        }
        params
            .iter()
            .map(|param| {
                if param.bounds.len() > 1 {
                    self.warn(
                        location,
                        format!("only the first bound of `{}` is kept", param.name),
                    );
                }
                MappedTypeParam {
                    name: param.name.clone(),
                    bound: param
                        .bounds
                        .first()
                        .map(|bound| self.map_type(bound, scope, location)),
                }
            })
            .collect()
    }

    fn map_class(&mut self, class: &ClassDecl, unit: &TypeScope<'_>) -> MappedClass {
        let location = class.name.as_str();
        let scope = unit.with_params(class.type_params.iter().map(|p| p.name.as_str()));

        let type_params = self.map_type_params(&class.type_params, &scope, location);
        if !type_params.is_empty() {
            self.need("typing", "Generic");
        }

        let base = class
            .superclass
            .as_deref()
            .and_then(|superclass| self.map_base(superclass, unit, location));

        let markers = self.class_markers(class);
        let is_interface = class.kind == DeclKind::Interface;

        let mapped = MappedClass {
            name: class.name.clone(),
            kind: class.kind,
            type_params,
            superclass: class.superclass.clone(),
            base,
            capabilities: class.interfaces.clone(),
            fields: class
                .fields
                .iter()
                .map(|f| self.map_field(f, is_interface, &scope, location))
                .collect(),
            constructors: class
                .constructors
                .iter()
                .map(|c| self.map_constructor(c, &scope, location))
                .collect(),
            methods: class
                .methods
                .iter()
                .map(|m| self.map_method(m, is_interface, &scope, location))
                .collect(),
            markers,
            annotations: class.annotations.clone(),
        };

        if mapped.is_abstract() {
            self.need("abc", "ABC");
        }
        mapped
    }

    /// Python base for a superclass. `Object` (and anything mapping to
    /// `object`) needs no base.
    fn map_base(&mut self, superclass: &str, unit: &TypeScope<'_>, location: &str) -> Option<String> {
        let mapped = self.map_type(&TypeRef::simple(superclass), unit, location);
        match mapped.name() {
            "object" => None,
            name => Some(name.rsplit('.').next().unwrap_or(name).to_string()),
        }
    }

    fn class_markers(&mut self, class: &ClassDecl) -> BTreeSet<Marker> {
        let mut markers = BTreeSet::new();
        for modifier in &class.modifiers {
            match modifier {
                Modifier::Public => {}
                Modifier::Private => {
                    markers.insert(Marker::Private);
                }
                Modifier::Protected => {
                    markers.insert(Marker::Protected);
                }
                Modifier::Abstract => {
                    if class.kind == DeclKind::Class {
                        markers.insert(Marker::AbstractClass);
                    }
                }
                Modifier::Final => {
                    markers.insert(Marker::Sealed);
                    self.need("typing", "final");
                }
                Modifier::Strictfp => {
                    markers.insert(Marker::Strictfp);
                }
                Modifier::Static
                | Modifier::Synchronized
                | Modifier::Native
                | Modifier::Transient
                | Modifier::Volatile
                | Modifier::Default => self.ignored(*modifier, &class.name, "a class"),
            }
        }
        markers
    }

    fn ignored(&mut self, modifier: Modifier, location: &str, what: &str) {
        self.warn(
            location,
            format!("modifier `{modifier}` has no meaning on {what} and is dropped"),
        );
    }

    fn map_field(
        &mut self,
        field: &FieldDecl,
        in_interface: bool,
        scope: &TypeScope<'_>,
        class: &str,
    ) -> MappedField {
        let location = format!("{class}.{}", field.name);
        let is_constant = in_interface || field.modifiers.is_constant();

        let mut markers = BTreeSet::new();
        for modifier in &field.modifiers {
            match modifier {
                Modifier::Public | Modifier::Static | Modifier::Final => {}
                Modifier::Private => {
                    markers.insert(Marker::Private);
                }
                Modifier::Protected => {
                    markers.insert(Marker::Protected);
                }
                Modifier::Transient => {
                    markers.insert(Marker::Transient);
                }
                Modifier::Volatile => {
                    markers.insert(Marker::Volatile);
                }
                Modifier::Abstract
                | Modifier::Synchronized
                | Modifier::Native
                | Modifier::Strictfp
                | Modifier::Default => self.ignored(*modifier, &location, "a field"),
            }
        }

        if is_constant {
            markers.insert(Marker::ClassConstant);
            self.need("typing", "Final");
        } else if field.modifiers.is_static() {
            markers.insert(Marker::ClassVariable);
            self.need("typing", "ClassVar");
        } else if field.modifiers.contains(&Modifier::Final) {
            markers.insert(Marker::ReadOnly);
        }

        let initializer = field.initializer.as_deref().map(|text| {
            let init = literals::translate_initializer(text);
            if init.untranslated {
                self.warn(&location, "initializer is not a literal and is kept verbatim");
            }
            init
        });

        let kind = IdentKind::for_field(is_constant, field.modifiers.is_private());
        MappedField {
            name: rename(&field.name, kind),
            source_name: field.name.clone(),
            ty: self.map_type(&field.ty, scope, &location),
            markers,
            initializer,
            annotations: field.annotations.clone(),
        }
    }

    fn map_params(
        &mut self,
        params: &[ParamDecl],
        scope: &TypeScope<'_>,
        location: &str,
    ) -> Vec<MappedParam> {
        params
            .iter()
            .map(|param| MappedParam {
                name: rename(&param.name, IdentKind::Param),
                source_name: param.name.clone(),
                ty: self.map_type(&param.ty, scope, location),
                varargs: param.varargs,
            })
            .collect()
    }

    fn map_raises(&mut self, throws: &[TypeRef], scope: &TypeScope<'_>, location: &str) -> Vec<TypeRef> {
        throws
            .iter()
            .map(|ty| self.map_type(ty, scope, location))
            .collect()
    }

    fn map_constructor(
        &mut self,
        ctor: &ConstructorDecl,
        scope: &TypeScope<'_>,
        class: &str,
    ) -> MappedConstructor {
        let location = format!("{class}.<init>");

        let mut markers = BTreeSet::new();
        for modifier in &ctor.modifiers {
            match modifier {
                Modifier::Public => {}
                Modifier::Private => {
                    markers.insert(Marker::Private);
                }
                Modifier::Protected => {
                    markers.insert(Marker::Protected);
                }
                Modifier::Static
                | Modifier::Final
                | Modifier::Abstract
                | Modifier::Synchronized
                | Modifier::Native
                | Modifier::Transient
                | Modifier::Volatile
                | Modifier::Strictfp
                | Modifier::Default => self.ignored(*modifier, &location, "a constructor"),
            }
        }

        MappedConstructor {
            params: self.map_params(&ctor.params, scope, &location),
            markers,
            raises: self.map_raises(&ctor.throws, scope, &location),
            annotations: ctor.annotations.clone(),
            body: ctor.body.clone(),
            source_signature: ctor.params.iter().map(|p| p.ty.to_string()).collect(),
        }
    }

    fn map_method(
        &mut self,
        method: &MethodDecl,
        in_interface: bool,
        class_scope: &TypeScope<'_>,
        class: &str,
    ) -> MappedMethod {
        let location = format!("{class}.{}", method.name);
        let scope = class_scope.with_params(method.type_params.iter().map(|p| p.name.as_str()));

        let mut markers = BTreeSet::new();
        for modifier in &method.modifiers {
            match modifier {
                Modifier::Public => {}
                Modifier::Private => {
                    markers.insert(Marker::Private);
                }
                Modifier::Protected => {
                    markers.insert(Marker::Protected);
                }
                Modifier::Static => {
                    markers.insert(Marker::StaticCallable);
                }
                Modifier::Final => {
                    markers.insert(Marker::Sealed);
                    self.need("typing", "final");
                }
                Modifier::Abstract => {
                    markers.insert(Marker::AbstractMethod);
                }
                Modifier::Synchronized => {
                    markers.insert(Marker::Synchronized);
                }
                Modifier::Native => {
                    markers.insert(Marker::Native);
                }
                Modifier::Strictfp => {
                    markers.insert(Marker::Strictfp);
                }
                Modifier::Default => {
                    markers.insert(Marker::DefaultImpl);
                }
                Modifier::Transient | Modifier::Volatile => {
                    self.ignored(*modifier, &location, "a method")
                }
            }
        }

        // Interface methods without a body are implicitly abstract.
        if in_interface && method.body.is_absent() && !method.modifiers.is_static() {
            markers.insert(Marker::AbstractMethod);
        }
        if markers.contains(&Marker::AbstractMethod) {
            self.need("abc", "abstractmethod");
        }

        MappedMethod {
            name: rename(
                &method.name,
                IdentKind::for_method(method.modifiers.is_private()),
            ),
            source_name: method.name.clone(),
            type_params: self.map_type_params(&method.type_params, &scope, &location),
            params: self.map_params(&method.params, &scope, &location),
            return_type: self.map_type(&method.return_type, &scope, &location),
            markers,
            raises: self.map_raises(&method.throws, &scope, &location),
            annotations: method.annotations.clone(),
            body: method.body.clone(),
            source_signature: method.params.iter().map(|p| p.ty.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jport_core::Body;

    fn field(name: &str, ty: &str, modifiers: &[Modifier], init: Option<&str>) -> FieldDecl {
        FieldDecl {
            name: name.into(),
            ty: TypeRef::simple(ty),
            modifiers: modifiers.iter().copied().collect(),
            initializer: init.map(String::from),
            annotations: vec![],
        }
    }

    fn method(name: &str, modifiers: &[Modifier], body: Body) -> MethodDecl {
        MethodDecl {
            name: name.into(),
            type_params: vec![],
            params: vec![ParamDecl {
                name: "inputValue".into(),
                ty: TypeRef::simple("String"),
                varargs: false,
            }],
            return_type: TypeRef::simple("void"),
            modifiers: modifiers.iter().copied().collect(),
            throws: vec![TypeRef::simple("IllegalArgumentException")],
            annotations: vec![],
            body,
        }
    }

    fn unit(classes: Vec<ClassDecl>) -> StructuralIr {
        StructuralIr {
            package: None,
            imports: vec![],
            classes,
        }
    }

    #[test]
    fn test_private_static_final_field_becomes_constant() {
        let mut class = ClassDecl::new("Counter", DeclKind::Class);
        class.fields.push(field(
            "count",
            "int",
            &[Modifier::Private, Modifier::Static, Modifier::Final],
            Some("0"),
        ));

        let mapping = map(&unit(vec![class]));
        let count = &mapping.ir.classes[0].fields[0];
        assert_eq!(count.name, "COUNT");
        assert_eq!(count.source_name, "count");
        assert_eq!(count.ty, TypeRef::simple("int"));
        assert!(count.markers.contains(&Marker::ClassConstant));
        assert!(count.markers.contains(&Marker::Private));
        assert!(mapping.ir.support_imports.contains(&PyImport::from("typing", "Final")));
        assert!(mapping.warnings.is_empty());
    }

    #[test]
    fn test_field_kinds() {
        let mut class = ClassDecl::new("A", DeclKind::Class);
        class.fields.push(field("instances", "int", &[Modifier::Static], None));
        class.fields.push(field("userName", "String", &[Modifier::Private], None));
        class.fields.push(field("id", "long", &[Modifier::Final], None));

        let mapping = map(&unit(vec![class]));
        let fields = &mapping.ir.classes[0].fields;
        assert_eq!(fields[0].name, "instances");
        assert!(fields[0].markers.contains(&Marker::ClassVariable));
        assert_eq!(fields[1].name, "_user_name");
        assert!(fields[2].markers.contains(&Marker::ReadOnly));
    }

    #[test]
    fn test_interface_members() {
        let mut iface = ClassDecl::new("Shape", DeclKind::Interface);
        iface.fields.push(field("sides", "int", &[], Some("0")));
        iface.methods.push(method("area", &[], Body::Absent));
        iface.methods.push(method(
            "describe",
            &[Modifier::Default],
            Body::Opaque("{}".into()),
        ));

        let mapping = map(&unit(vec![iface]));
        let shape = &mapping.ir.classes[0];
        assert_eq!(shape.fields[0].name, "SIDES");
        assert!(shape.methods[0].markers.contains(&Marker::AbstractMethod));
        assert!(shape.methods[1].markers.contains(&Marker::DefaultImpl));
        assert!(!shape.methods[1].markers.contains(&Marker::AbstractMethod));
        assert!(shape.is_abstract());
        assert!(mapping.ir.support_imports.contains(&PyImport::from("abc", "ABC")));
    }

    #[test]
    fn test_method_translation() {
        let mut class = ClassDecl::new("Parser", DeclKind::Class);
        class.methods.push(method(
            "parseHTTPResponse",
            &[Modifier::Private, Modifier::Static, Modifier::Synchronized],
            Body::Opaque("{ }".into()),
        ));

        let mapping = map(&unit(vec![class]));
        let m = &mapping.ir.classes[0].methods[0];
        assert_eq!(m.name, "_parse_http_response");
        assert_eq!(m.params[0].name, "input_value");
        assert_eq!(m.return_type, TypeRef::simple("None"));
        assert_eq!(m.raises, [TypeRef::simple("ValueError")]);
        assert_eq!(m.source_signature, ["String"]);
        assert!(m.markers.contains(&Marker::StaticCallable));
        assert!(m.markers.contains(&Marker::Synchronized));
    }

    #[test]
    fn test_receiver_named_params_are_escaped() {
        let source = "class Node { void link(Node self, int cls) {} static int of(int self) { return 0; } }";
        let mapping = map(&jport_java_binding::parse_java(source).unwrap());
        let methods = &mapping.ir.classes[0].methods;
        let link: Vec<_> = methods[0].params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(link, ["self_", "cls_"]);
        assert_eq!(methods[0].params[0].source_name, "self");
        assert_eq!(methods[1].params[0].name, "self_");
    }

    #[test]
    fn test_superclass_and_unknown_types() {
        let mut base = ClassDecl::new("Base", DeclKind::Class);
        base.superclass = Some("Object".into());
        let mut error = ClassDecl::new("ParseFailure", DeclKind::Class);
        error.superclass = Some("RuntimeException".into());
        let mut child = ClassDecl::new("Child", DeclKind::Class);
        child.superclass = Some("Base".into());
        child.fields.push(field("widget", "Widget", &[], None));

        let mapping = map(&unit(vec![base, error, child]));
        let classes = &mapping.ir.classes;
        assert_eq!(classes[0].base, None);
        assert_eq!(classes[1].base.as_deref(), Some("RuntimeError"));
        assert_eq!(classes[2].base.as_deref(), Some("Base"));
        assert_eq!(classes[2].fields[0].ty, TypeRef::simple("Widget"));
        assert_eq!(mapping.warnings.len(), 1);
        assert_eq!(mapping.warnings[0].location, "Child.widget");
    }

    #[test]
    fn test_meaningless_modifier_is_reported() {
        let mut class = ClassDecl::new("A", DeclKind::Class);
        class
            .fields
            .push(field("x", "int", &[Modifier::Synchronized], None));

        let mapping = map(&unit(vec![class]));
        assert_eq!(mapping.ir.classes[0].fields.len(), 1);
        assert!(mapping.warnings[0].message.contains("synchronized"));
    }

    #[test]
    fn test_untranslated_initializer_warns() {
        let mut class = ClassDecl::new("A", DeclKind::Class);
        class
            .fields
            .push(field("items", "List", &[], Some("new ArrayList<>()")));

        let mapping = map(&unit(vec![class]));
        let init = mapping.ir.classes[0].fields[0].initializer.as_ref().unwrap();
        assert!(init.untranslated);
        assert_eq!(mapping.warnings.len(), 1);
    }

    #[test]
    fn test_generic_class_needs_typevar() {
        let mut class = ClassDecl::new("Box", DeclKind::Class);
        class.type_params.push(TypeParam {
            name: "T".into(),
            bounds: vec![TypeRef::simple("Number")],
        });
        class.fields.push(field("value", "T", &[], None));

        let mapping = map(&unit(vec![class]));
        let boxed = &mapping.ir.classes[0];
        assert_eq!(boxed.type_params[0].bound, Some(TypeRef::simple("float")));
        assert_eq!(boxed.fields[0].ty, TypeRef::simple("T"));
        assert!(mapping.warnings.is_empty());
        for name in ["TypeVar", "Generic"] {
            assert!(mapping.ir.support_imports.contains(&PyImport::from("typing", name)));
        }
    }
}
