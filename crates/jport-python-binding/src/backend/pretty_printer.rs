//! Python pretty printer - Wadler-style document building
//!
//! Layout is fully determined by the mapped IR and [`GeneratorOptions`]:
//! signatures that fit the width stay on one line, longer ones break one
//! parameter per line with a trailing comma.

use pretty::{DocAllocator, DocBuilder, RcAllocator};

use super::constructors::InitPlan;
use super::{ClassLayout, GeneratorOptions, ModuleHeader};
use crate::mapper::render_type;
use jport_core::{
    Body, DeclKind, MappedClass, MappedField, MappedMethod, MappedParam, Marker,
};

type Doc<'a> = DocBuilder<'a, RcAllocator, ()>;

/// Body emitted for every method whose Java body was not translated.
pub const PLACEHOLDER: &str = "raise NotImplementedError(\"body pending translation\")";

pub(crate) struct PythonPrinter<'a> {
    alloc: &'a RcAllocator,
    options: &'a GeneratorOptions,
}

impl<'a> PythonPrinter<'a> {
    pub(crate) fn new(alloc: &'a RcAllocator, options: &'a GeneratorOptions) -> Self {
        Self { alloc, options }
    }

    // ========================================================================
    // Helper methods
    // ========================================================================

    fn text<S: Into<std::borrow::Cow<'a, str>>>(&self, s: S) -> Doc<'a> {
        self.alloc.text(s)
    }

    fn nil(&self) -> Doc<'a> {
        self.alloc.nil()
    }

    fn hardline(&self) -> Doc<'a> {
        self.alloc.hardline()
    }

    /// Soft break that disappears when the group fits.
    fn line_(&self) -> Doc<'a> {
        self.alloc.line_()
    }

    fn line(&self) -> Doc<'a> {
        self.alloc.line()
    }

    fn join<I>(&self, docs: I, sep: Doc<'a>) -> Doc<'a>
    where
        I: IntoIterator<Item = Doc<'a>>,
    {
        self.alloc.intersperse(docs, sep)
    }

    /// Ends the current line and leaves `n` empty lines.
    fn blank_lines(&self, n: usize) -> Doc<'a> {
        self.alloc.concat((0..=n).map(|_| self.hardline()))
    }

    fn lines<I>(&self, lines: I) -> Doc<'a>
    where
        I: IntoIterator<Item = String>,
    {
        self.join(lines.into_iter().map(|l| self.text(l)), self.hardline())
    }

    fn indent(&self) -> isize {
        self.options.indent as isize
    }

    /// `header` followed by an indented block.
    fn block(&self, header: Doc<'a>, body: Doc<'a>) -> Doc<'a> {
        header.append(self.hardline().append(body).nest(self.indent()))
    }

    fn docstring(&self, lines: &[String]) -> Doc<'a> {
        match lines {
            [] => self.nil(),
            [single] => self.text(format!("\"\"\"{single}\"\"\"")),
            [first, rest @ ..] => self
                .text(format!("\"\"\"{first}"))
                .append(self.hardline())
                .append(self.lines(rest.iter().cloned()))
                .append(self.hardline())
                .append(self.text("\"\"\"")),
        }
    }

    /// Comment lines; every physical line of an entry gets its own `#`.
    /// Multi-line entries are dedented like a source body. Nothing when
    /// empty.
    fn comments(&self, entries: Vec<String>) -> Option<Doc<'a>> {
        let lines: Vec<String> = entries
            .into_iter()
            .flat_map(|entry| {
                if entry.contains('\n') {
                    dedent(&entry)
                } else {
                    vec![entry]
                }
            })
            .map(|line| format!("# {line}").trim_end().to_string())
            .collect();
        (!lines.is_empty()).then(|| self.lines(lines))
    }

    // ========================================================================
    // Module printing
    // ========================================================================

    pub(crate) fn module(&self, header: &ModuleHeader, classes: &[ClassLayout<'_>]) -> Doc<'a> {
        let title = match &header.package {
            Some(package) => format!("Generated from Java package {package}."),
            None => "Generated from a Java compilation unit.".to_string(),
        };

        let mut doc = self
            .docstring(&[title])
            .append(self.blank_lines(1))
            .append(self.text("from __future__ import annotations"));

        if !header.imports.is_empty() {
            doc = doc
                .append(self.blank_lines(1))
                .append(self.lines(header.imports.iter().cloned()));
        }
        if !header.type_vars.is_empty() {
            doc = doc
                .append(self.blank_lines(1))
                .append(self.lines(header.type_vars.iter().cloned()));
        }
        for layout in classes {
            doc = doc.append(self.blank_lines(2)).append(self.class(layout));
        }
        doc.append(self.hardline())
    }

    // ========================================================================
    // Class printing
    // ========================================================================

    fn class(&self, layout: &ClassLayout<'_>) -> Doc<'a> {
        let class = layout.class;
        let mut prelude: Vec<Doc<'a>> = Vec::new();

        let mut notes: Vec<String> = class.annotations.clone();
        if !layout.capabilities.is_empty() {
            notes.push(format!("capabilities: {}", layout.capabilities.join(", ")));
        }
        let unexpressed = unexpressed_markers(&class.markers, &[Marker::AbstractClass, Marker::Sealed]);
        if !unexpressed.is_empty() {
            notes.push(format!("java: {unexpressed}"));
        }
        prelude.extend(self.comments(notes));
        if class.markers.contains(&Marker::Sealed) {
            prelude.push(self.text("@final"));
        }

        let header = if layout.bases.is_empty() {
            format!("class {}:", class.name)
        } else {
            format!("class {}({}):", class.name, layout.bases.join(", "))
        };
        prelude.push(self.text(header));

        let body = self.class_body(layout);
        self.block(self.join(prelude, self.hardline()), body)
    }

    fn class_body(&self, layout: &ClassLayout<'_>) -> Doc<'a> {
        let class = layout.class;
        let mut sections: Vec<Doc<'a>> = Vec::new();

        if self.options.docstrings {
            let kind = match class.kind {
                DeclKind::Class => "class",
                DeclKind::Interface => "interface",
            };
            sections.push(self.docstring(&[format!("Migrated from Java {kind} {}.", class.name)]));
        }

        let fields = self.fields(class);
        if !fields.is_empty() {
            sections.push(self.join(fields, self.hardline()));
        }

        if let Some(init) = self.init(layout) {
            sections.push(init);
        }

        let mut seen: Vec<&str> = Vec::new();
        for method in &class.methods {
            let repeated = seen.contains(&method.name.as_str());
            seen.push(method.name.as_str());
            sections.push(self.method(method, repeated));
        }

        if sections.is_empty() {
            return self.text("pass");
        }
        self.join(sections, self.blank_lines(1))
    }

    /// Constants, then class variables, then instance fields. Declaration
    /// order is kept inside each group.
    fn fields(&self, class: &MappedClass) -> Vec<Doc<'a>> {
        let rank = |f: &MappedField| {
            if f.markers.contains(&Marker::ClassConstant) {
                0
            } else if f.markers.contains(&Marker::ClassVariable) {
                1
            } else {
                2
            }
        };
        let mut ordered: Vec<&MappedField> = class.fields.iter().collect();
        ordered.sort_by_key(|f| rank(f));
        ordered.into_iter().map(|f| self.field(f)).collect()
    }

    fn field(&self, field: &MappedField) -> Doc<'a> {
        let ty = render_type(&field.ty);
        let annotation = if field.markers.contains(&Marker::ClassConstant) {
            format!("Final[{ty}]")
        } else if field.markers.contains(&Marker::ClassVariable) {
            format!("ClassVar[{ty}]")
        } else {
            ty
        };

        let mut notes = field.annotations.clone();
        let unexpressed = unexpressed_markers(
            &field.markers,
            &[Marker::ClassConstant, Marker::ClassVariable, Marker::Private],
        );
        if !unexpressed.is_empty() {
            notes.push(format!("java: {unexpressed}"));
        }

        let mut decl = format!("{}: {annotation}", field.name);
        match &field.initializer {
            Some(init) if init.untranslated => {
                notes.push(format!("java: = {}", collapse_whitespace(&init.text)));
            }
            Some(init) => {
                decl.push_str(" = ");
                decl.push_str(&init.text);
            }
            None => {}
        }

        match self.comments(notes) {
            Some(comments) => comments.append(self.hardline()).append(self.text(decl)),
            None => self.text(decl),
        }
    }

    // ========================================================================
    // Callables
    // ========================================================================

    fn init(&self, layout: &ClassLayout<'_>) -> Option<Doc<'a>> {
        let class = &layout.class.name;
        let sources = layout.init.sources();
        let signatures: Vec<String> = sources.iter().map(|c| source_call(class, &c.source_signature)).collect();

        let params: Vec<Doc<'a>> = match &layout.init {
            InitPlan::Absent => return None,
            InitPlan::Single(ctor) => ctor.params.iter().map(|p| self.param(p, false)).collect(),
            InitPlan::Merged { params, .. } => params
                .iter()
                .map(|p| self.param(p.param, p.optional))
                .collect(),
            InitPlan::Variadic(_) => vec![self.text("*args: Any"), self.text("**kwargs: Any")],
        };

        let mut notes: Vec<String> = Vec::new();
        for ctor in sources {
            notes.extend(ctor.annotations.iter().cloned());
        }
        let unexpressed = sources
            .iter()
            .map(|c| unexpressed_markers(&c.markers, &[Marker::Private]))
            .find(|m| !m.is_empty());
        if let Some(unexpressed) = unexpressed {
            notes.push(format!("java: {unexpressed}"));
        }

        let mut body: Vec<Doc<'a>> = Vec::new();
        if self.options.docstrings {
            let raises: Vec<String> = dedup(sources.iter().flat_map(|c| c.raises.iter().map(render_type)));
            body.push(self.docstring(&self.callable_doc(&format!("Java: {}", signatures.join(", ")), &raises)));
        }
        if layout.init.is_variadic() {
            body.extend(self.comments(signatures.iter().map(|s| format!("java: {s}")).collect()));
        }
        if self.options.include_source_bodies {
            for (ctor, signature) in sources.iter().zip(&signatures) {
                body.extend(self.source_body(&ctor.body, (sources.len() > 1).then_some(signature)));
            }
        }
        body.push(self.text(PLACEHOLDER));

        let mut header: Vec<Doc<'a>> = Vec::new();
        header.extend(self.comments(notes));
        header.push(self.signature("__init__", Some("self"), params, "None"));
        Some(self.block(self.join(header, self.hardline()), self.join(body, self.hardline())))
    }

    fn method(&self, method: &MappedMethod, repeated: bool) -> Doc<'a> {
        let mut header: Vec<Doc<'a>> = Vec::new();

        let mut notes: Vec<String> = method.annotations.clone();
        if repeated {
            notes.push(format!(
                "overload of `{}`: Python keeps only the last definition",
                method.name
            ));
        }
        let unexpressed = unexpressed_markers(
            &method.markers,
            &[
                Marker::StaticCallable,
                Marker::AbstractMethod,
                Marker::Sealed,
                Marker::Private,
            ],
        );
        if !unexpressed.is_empty() {
            notes.push(format!("java: {unexpressed}"));
        }
        header.extend(self.comments(notes));

        if method.markers.contains(&Marker::Sealed) {
            header.push(self.text("@final"));
        }
        let is_static = method.markers.contains(&Marker::StaticCallable);
        if is_static {
            header.push(self.text("@staticmethod"));
        }
        let is_abstract = method.markers.contains(&Marker::AbstractMethod);
        if is_abstract {
            header.push(self.text("@abstractmethod"));
        }

        let params = method.params.iter().map(|p| self.param(p, false)).collect();
        let receiver = (!is_static).then_some("self");
        header.push(self.signature(
            &method.name,
            receiver,
            params,
            &render_type(&method.return_type),
        ));

        let mut body: Vec<Doc<'a>> = Vec::new();
        if self.options.docstrings {
            let raises: Vec<String> = method.raises.iter().map(render_type).collect();
            let summary = format!(
                "Java: {}",
                source_call(&method.source_name, &method.source_signature)
            );
            body.push(self.docstring(&self.callable_doc(&summary, &raises)));
        }
        if self.options.include_source_bodies {
            body.extend(self.source_body(&method.body, None));
        }
        body.push(self.text(if is_abstract { "..." } else { PLACEHOLDER }));

        self.block(self.join(header, self.hardline()), self.join(body, self.hardline()))
    }

    fn callable_doc(&self, summary: &str, raises: &[String]) -> Vec<String> {
        let mut lines = vec![summary.to_string()];
        if !raises.is_empty() {
            lines.push(String::new());
            lines.push("Raises:".to_string());
            let pad = " ".repeat(self.options.indent);
            lines.extend(raises.iter().map(|r| format!("{pad}{r}")));
        }
        lines
    }

    /// Java body as comments above the placeholder.
    fn source_body(&self, body: &Body, label: Option<&String>) -> Option<Doc<'a>> {
        let text = body.as_text()?;
        let mut lines: Vec<String> = label.map(|l| format!("java {l}:")).into_iter().collect();
        lines.extend(dedent(text));
        self.comments(lines)
    }

    fn param(&self, param: &MappedParam, optional: bool) -> Doc<'a> {
        if param.varargs {
            let element = param
                .ty
                .generic_args()
                .first()
                .map(render_type)
                .unwrap_or_else(|| render_type(&param.ty));
            return self.text(format!("*{}: {element}", param.name));
        }
        let ty = render_type(&param.ty);
        if optional {
            self.text(format!("{}: {ty} | None = None", param.name))
        } else {
            self.text(format!("{}: {ty}", param.name))
        }
    }

    /// `def name(params) -> ret:`, broken one parameter per line when it
    /// does not fit.
    fn signature(
        &self,
        name: &str,
        receiver: Option<&'static str>,
        params: Vec<Doc<'a>>,
        ret: &str,
    ) -> Doc<'a> {
        let params: Vec<Doc<'a>> = receiver
            .map(|r| self.text(r))
            .into_iter()
            .chain(params)
            .collect();

        if params.is_empty() {
            return self.text(format!("def {name}() -> {ret}:"));
        }

        let list = self
            .line_()
            .append(self.join(params, self.text(",").append(self.line())))
            .append(self.text(",").flat_alt(self.nil()))
            .nest(self.indent());

        self.text(format!("def {name}("))
            .append(list)
            .append(self.line_())
            .append(self.text(format!(") -> {ret}:")))
            .group()
    }

    pub(crate) fn render(&self, doc: Doc<'a>) -> String {
        let mut out = String::new();
        doc.into_doc()
            .render_fmt(self.options.width, &mut out)
            .expect("writing to a String cannot fail");
        out
    }
}

/// Markers with no Python spelling, comma separated.
fn unexpressed_markers(markers: &std::collections::BTreeSet<Marker>, expressed: &[Marker]) -> String {
    markers
        .iter()
        .filter(|m| !expressed.contains(m))
        .map(|m| m.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn source_call(name: &str, signature: &[String]) -> String {
    format!("{name}({})", signature.join(", "))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn dedup(items: impl Iterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

/// Strip the common leading whitespace of every line after the first.
fn dedent(text: &str) -> Vec<String> {
    let lines: Vec<&str> = text.lines().collect();
    let margin = lines
        .iter()
        .skip(1)
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);

    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 {
                line.trim().to_string()
            } else {
                line.get(margin..).unwrap_or(line.trim_start()).trim_end().to_string()
            }
        })
        .collect()
}
