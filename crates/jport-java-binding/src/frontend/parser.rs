//! Java declaration parser
//!
//! Uses `logos` for lexing and `chumsky` for parsing. The grammar covers a
//! compilation unit down to member signatures. Bodies and initializers are
//! matched as balanced token trees and captured as source text.

use chumsky::input::{Input, ValueInput};
use chumsky::prelude::*;
use jport_core::{
    Body, ClassDecl, ConstructorDecl, DeclKind, FieldDecl, MethodDecl, Modifier, ParamDecl,
    StructuralIr, SyntaxError, TypeParam, TypeRef,
};
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

use super::errors::{lex_error, to_syntax_error};
use super::lexer::{Token, tokenize};

type Extra<'src> = extra::Err<Rich<'src, Token, SimpleSpan>>;

/// Parse Java source text into the structural IR.
///
/// Fails on the first syntax error (lowest offset) and never returns a
/// partial tree.
pub fn parse_java(source: &str) -> Result<StructuralIr, SyntaxError> {
    let tokens = tokenize(source);
    if let Some((_, span)) = tokens.iter().find(|(tok, _)| *tok == Token::Error) {
        return Err(lex_error(source, *span));
    }

    let eoi = SimpleSpan::from(source.len()..source.len());
    let input = tokens.as_slice().map(eoi, |(t, s)| (t, s));

    let ir = compilation_unit(source)
        .parse(input)
        .into_result()
        .map_err(|errs| {
            errs.iter()
                .min_by_key(|e| e.span().start)
                .map(|e| to_syntax_error(e, source))
                .unwrap_or_else(|| SyntaxError::at(source, 0, "invalid compilation unit"))
        })?;

    debug!(
        classes = ir.classes.len(),
        imports = ir.imports.len(),
        "parsed java unit"
    );
    Ok(ir)
}

// ============================================================================
// Intermediate parse results
// ============================================================================

#[derive(Debug, Clone)]
enum PrefixItem {
    Modifier(Modifier),
    Annotation(String),
}

#[derive(Debug, Clone, Default)]
struct Prefix {
    modifiers: BTreeSet<Modifier>,
    annotations: Vec<String>,
}

#[derive(Debug, Clone)]
struct Declarator {
    name: String,
    span: SimpleSpan,
    dims: u32,
    initializer: Option<String>,
}

#[derive(Debug, Clone)]
enum MemberKind {
    Fields {
        ty: TypeRef,
        declarators: Vec<Declarator>,
    },
    Constructor {
        name: String,
        span: SimpleSpan,
        params: Vec<ParamDecl>,
        throws: Vec<TypeRef>,
        body: Body,
    },
    Method(MethodDecl, SimpleSpan),
    Unsupported,
    Empty,
}

#[derive(Debug, Clone)]
struct Member {
    prefix: Prefix,
    kind: MemberKind,
}

#[derive(Debug, Clone)]
struct ClassHeader {
    prefix: Prefix,
    kind: DeclKind,
    name: String,
    type_params: Vec<TypeParam>,
    extends: Vec<TypeRef>,
    implements: Vec<TypeRef>,
}

fn slice(source: &str, span: SimpleSpan) -> String {
    source.get(span.start..span.end).unwrap_or_default().to_string()
}

// ============================================================================
// Parsers
// ============================================================================

fn compilation_unit<'src, I>(
    source: &'src str,
) -> impl Parser<'src, I, StructuralIr, Extra<'src>> + Clone
where
    I: ValueInput<'src, Token = Token, Span = SimpleSpan>,
{
    let package = just(Token::Package)
        .ignore_then(qualified_name())
        .then_ignore(just(Token::Semicolon))
        .or_not();

    let import = just(Token::Import)
        .ignore_then(just(Token::Modifier(Modifier::Static)).or_not())
        .then(ident())
        .then(
            just(Token::Dot)
                .ignore_then(choice((ident(), just(Token::Star).to("*".to_string()))))
                .repeated()
                .collect::<Vec<_>>(),
        )
        .then_ignore(just(Token::Semicolon))
        .map(|((is_static, head), tail)| {
            let path = std::iter::once(head)
                .chain(tail)
                .collect::<Vec<_>>()
                .join(".");
            match is_static {
                Some(_) => format!("static {path}"),
                None => path,
            }
        });

    let unsupported = prefix(source)
        .ignore_then(unsupported_type())
        .validate(|what, e, emitter| {
            emitter.emit(Rich::custom(e.span(), format!("{what} is not supported")));
            None::<ClassDecl>
        });

    let type_decl = choice((
        class_decl(source).map(Some),
        unsupported,
        just(Token::Semicolon).to(None::<ClassDecl>),
    ));

    package
        .then(import.repeated().collect::<Vec<_>>())
        .then(type_decl.repeated().collect::<Vec<_>>())
        .then_ignore(end())
        .validate(|((package, imports), decls), e, emitter| {
            let classes: Vec<ClassDecl> = decls.into_iter().flatten().collect();
            let span: SimpleSpan = e.span();
            let end = span.end;
            if classes.is_empty() {
                emitter.emit(Rich::custom(
                    SimpleSpan::from(end..end),
                    "expected a class or interface declaration",
                ));
            }
            let mut seen = HashSet::new();
            for class in &classes {
                if !seen.insert(class.name.clone()) {
                    emitter.emit(Rich::custom(
                        SimpleSpan::from(end..end),
                        format!("duplicate class `{}`", class.name),
                    ));
                }
            }
            StructuralIr {
                package,
                imports,
                classes,
            }
        })
}

fn class_decl<'src, I>(source: &'src str) -> impl Parser<'src, I, ClassDecl, Extra<'src>> + Clone
where
    I: ValueInput<'src, Token = Token, Span = SimpleSpan>,
{
    let kind = choice((
        just(Token::Class).to(DeclKind::Class),
        just(Token::Interface).to(DeclKind::Interface),
    ));

    prefix(source)
        .then(kind)
        .then(ident())
        .then(type_params().or_not())
        .then(supertype_list(Token::Extends))
        .then(supertype_list(Token::Implements))
        .then(
            member(source)
                .repeated()
                .collect::<Vec<_>>()
                .delimited_by(just(Token::LBrace), just(Token::RBrace)),
        )
        .validate(
            |((((((prefix, kind), name), type_params), extends), implements), members),
             e,
             emitter| {
                let header = ClassHeader {
                    prefix,
                    kind,
                    name,
                    type_params: type_params.unwrap_or_default(),
                    extends,
                    implements,
                };
                let (class, problems) = assemble_class(header, members, e.span());
                for (span, message) in problems {
                    emitter.emit(Rich::custom(span, message));
                }
                class
            },
        )
}

fn supertype_list<'src, I>(keyword: Token) -> impl Parser<'src, I, Vec<TypeRef>, Extra<'src>> + Clone
where
    I: ValueInput<'src, Token = Token, Span = SimpleSpan>,
{
    just(keyword)
        .ignore_then(
            type_ref()
                .separated_by(just(Token::Comma))
                .at_least(1)
                .collect::<Vec<_>>(),
        )
        .or_not()
        .map(Option::unwrap_or_default)
}

fn member<'src, I>(source: &'src str) -> impl Parser<'src, I, Member, Extra<'src>> + Clone
where
    I: ValueInput<'src, Token = Token, Span = SimpleSpan>,
{
    let body_or_semicolon = choice((
        block(source).map(Body::Opaque),
        just(Token::Semicolon).to(Body::Absent),
    ));

    let constructor = ident()
        .map_with(|name, e| (name, e.span()))
        .then(params(source))
        .then(throws())
        .then(block(source))
        .map(
            |((((name, span), params), throws), body)| MemberKind::Constructor {
                name,
                span,
                params,
                throws,
                body: Body::Opaque(body),
            },
        );

    let method = type_params()
        .or_not()
        .then(type_ref())
        .then(ident().map_with(|name, e| (name, e.span())))
        .then(params(source))
        .then(dims())
        .then(throws())
        .then(body_or_semicolon)
        .map(
            |((((((type_params, return_type), (name, span)), params), dims), throws), body)| {
                let method = MethodDecl {
                    name,
                    type_params: type_params.unwrap_or_default(),
                    params,
                    return_type: return_type.with_extra_dims(dims),
                    modifiers: BTreeSet::new(),
                    throws,
                    annotations: Vec::new(),
                    body,
                };
                MemberKind::Method(method, span)
            },
        );

    let fields = type_ref()
        .then(
            declarator(source)
                .separated_by(just(Token::Comma))
                .at_least(1)
                .collect::<Vec<_>>(),
        )
        .then_ignore(just(Token::Semicolon))
        .map(|(ty, declarators)| MemberKind::Fields { ty, declarators });

    let nested = choice((
        just(Token::Class)
            .or(just(Token::Interface))
            .ignore_then(ident())
            .then_ignore(skip_type_body())
            .map(|name| format!("nested type `{name}`")),
        unsupported_type(),
    ))
    .validate(|what, e, emitter| {
        emitter.emit(Rich::custom(e.span(), format!("{what} is not supported")));
        MemberKind::Unsupported
    });

    let initializer_block = token_tree()
        .repeated()
        .delimited_by(just(Token::LBrace), just(Token::RBrace))
        .validate(|_, e, emitter| {
            emitter.emit(Rich::custom(
                e.span(),
                "initializer blocks are not supported",
            ));
            MemberKind::Unsupported
        });

    let kind = choice((
        just(Token::Semicolon).to(MemberKind::Empty),
        nested,
        initializer_block,
        constructor,
        method,
        fields,
    ));

    prefix(source)
        .then(kind)
        .map(|(prefix, kind)| Member { prefix, kind })
}

/// One variable in a field declaration: `name[] = initializer`.
fn declarator<'src, I>(source: &'src str) -> impl Parser<'src, I, Declarator, Extra<'src>> + Clone
where
    I: ValueInput<'src, Token = Token, Span = SimpleSpan>,
{
    // A top-level comma ends the initializer only when another declarator
    // follows it; `new HashMap<K, V>()` keeps its comma.
    let next_declarator = just(Token::Comma).then(ident()).then(one_of([
        Token::Eq,
        Token::Comma,
        Token::Semicolon,
        Token::LBracket,
    ]));

    let initializer = choice((type_args(), token_tree()))
        .and_is(just(Token::Semicolon).not())
        .and_is(next_declarator.not())
        .repeated()
        .at_least(1)
        .map_with(move |_, e| slice(source, e.span()));

    ident()
        .map_with(|name, e| (name, e.span()))
        .then(dims())
        .then(just(Token::Eq).ignore_then(initializer).or_not())
        .map(|(((name, span), dims), initializer)| Declarator {
            name,
            span,
            dims,
            initializer,
        })
}

/// A balanced `<...>` run inside an initializer, such as the type arguments
/// of `new HashMap<String, int[]>()`. An unbalanced `<` is left to
/// [`token_tree`] as a plain operator.
fn type_args<'src, I>() -> impl Parser<'src, I, (), Extra<'src>> + Clone
where
    I: ValueInput<'src, Token = Token, Span = SimpleSpan>,
{
    recursive(|args| {
        let item = choice((
            args,
            token_tree().and_is(one_of([Token::Gt, Token::Semicolon]).not()),
        ));
        just(Token::Lt)
            .ignore_then(item.repeated())
            .then_ignore(just(Token::Gt))
    })
}

fn params<'src, I>(source: &'src str) -> impl Parser<'src, I, Vec<ParamDecl>, Extra<'src>> + Clone
where
    I: ValueInput<'src, Token = Token, Span = SimpleSpan>,
{
    let param = prefix(source)
        .ignore_then(type_ref())
        .then(just(Token::Ellipsis).or_not())
        .then(ident())
        .then(dims())
        .map(|(((ty, ellipsis), name), dims)| {
            let varargs = ellipsis.is_some();
            ParamDecl {
                name,
                ty: ty.with_extra_dims(dims + u32::from(varargs)),
                varargs,
            }
        });

    param
        .separated_by(just(Token::Comma))
        .collect::<Vec<_>>()
        .delimited_by(just(Token::LParen), just(Token::RParen))
        .labelled("parameter list")
}

fn throws<'src, I>() -> impl Parser<'src, I, Vec<TypeRef>, Extra<'src>> + Clone
where
    I: ValueInput<'src, Token = Token, Span = SimpleSpan>,
{
    supertype_list(Token::Throws)
}

/// Modifiers and annotations in any order. A repeated modifier is an error.
fn prefix<'src, I>(source: &'src str) -> impl Parser<'src, I, Prefix, Extra<'src>> + Clone
where
    I: ValueInput<'src, Token = Token, Span = SimpleSpan>,
{
    choice((
        select! { Token::Modifier(m) => PrefixItem::Modifier(m) },
        annotation(source).map(PrefixItem::Annotation),
    ))
    .repeated()
    .collect::<Vec<_>>()
    .validate(|items, e, emitter| {
        let mut prefix = Prefix::default();
        for item in items {
            match item {
                PrefixItem::Modifier(m) => {
                    if !prefix.modifiers.insert(m) {
                        emitter.emit(Rich::custom(e.span(), format!("repeated modifier `{m}`")));
                    }
                }
                PrefixItem::Annotation(a) => prefix.annotations.push(a),
            }
        }
        prefix
    })
}

fn annotation<'src, I>(source: &'src str) -> impl Parser<'src, I, String, Extra<'src>> + Clone
where
    I: ValueInput<'src, Token = Token, Span = SimpleSpan>,
{
    just(Token::At)
        .then(qualified_name())
        .then(
            token_tree()
                .repeated()
                .delimited_by(just(Token::LParen), just(Token::RParen))
                .or_not(),
        )
        .map_with(move |_, e| slice(source, e.span()))
}

/// `enum`, `record` and `@interface` declarations, consumed whole so the
/// error can name them. Outputs a description such as ``enum `Color` ``.
fn unsupported_type<'src, I>() -> impl Parser<'src, I, String, Extra<'src>> + Clone
where
    I: ValueInput<'src, Token = Token, Span = SimpleSpan>,
{
    choice((
        just(Token::Enum)
            .ignore_then(ident())
            .map(|name| format!("enum `{name}`")),
        just(Token::Ident("record".to_string()))
            .ignore_then(ident())
            .map(|name| format!("record `{name}`")),
        just(Token::At)
            .then(just(Token::Interface))
            .ignore_then(ident())
            .map(|name| format!("annotation type `{name}`")),
    ))
    .then_ignore(skip_type_body())
}

/// Everything from after a type name to its closing brace.
fn skip_type_body<'src, I>() -> impl Parser<'src, I, (), Extra<'src>> + Clone
where
    I: ValueInput<'src, Token = Token, Span = SimpleSpan>,
{
    none_of([Token::LBrace, Token::RBrace, Token::Semicolon])
        .repeated()
        .then(
            token_tree()
                .repeated()
                .delimited_by(just(Token::LBrace), just(Token::RBrace)),
        )
        .ignored()
}

/// A `{ ... }` block captured verbatim, braces included.
fn block<'src, I>(source: &'src str) -> impl Parser<'src, I, String, Extra<'src>> + Clone
where
    I: ValueInput<'src, Token = Token, Span = SimpleSpan>,
{
    token_tree()
        .repeated()
        .delimited_by(just(Token::LBrace), just(Token::RBrace))
        .map_with(move |_, e| slice(source, e.span()))
        .labelled("block")
}

/// Any single token, or a balanced `{}`/`()`/`[]` group.
fn token_tree<'src, I>() -> impl Parser<'src, I, (), Extra<'src>> + Clone
where
    I: ValueInput<'src, Token = Token, Span = SimpleSpan>,
{
    recursive(|tree| {
        choice((
            tree.clone()
                .repeated()
                .delimited_by(just(Token::LBrace), just(Token::RBrace)),
            tree.clone()
                .repeated()
                .delimited_by(just(Token::LParen), just(Token::RParen)),
            tree.repeated()
                .delimited_by(just(Token::LBracket), just(Token::RBracket)),
            none_of([
                Token::LBrace,
                Token::RBrace,
                Token::LParen,
                Token::RParen,
                Token::LBracket,
                Token::RBracket,
            ])
            .ignored(),
        ))
    })
}

/// `Outer<Inner<T>, U[]>[]` as a `TypeRef` tree.
fn type_ref<'src, I>() -> impl Parser<'src, I, TypeRef, Extra<'src>> + Clone
where
    I: ValueInput<'src, Token = Token, Span = SimpleSpan>,
{
    recursive(|ty| {
        let bound = choice((just(Token::Extends), just(Token::Super))).ignore_then(ty.clone());
        let wildcard = just(Token::Question)
            .ignore_then(bound.or_not())
            .map(|bound: Option<TypeRef>| match bound {
                Some(bound) => bound.into_wildcard(),
                None => TypeRef::wildcard(),
            });

        let args = wildcard
            .or(ty)
            .separated_by(just(Token::Comma))
            .at_least(1)
            .collect::<Vec<_>>()
            .delimited_by(just(Token::Lt), just(Token::Gt));

        qualified_name()
            .then(args.or_not())
            .then(dims())
            .map(|((name, args), dims)| TypeRef::new(name, args.unwrap_or_default(), dims))
    })
    .labelled("type")
}

fn type_params<'src, I>() -> impl Parser<'src, I, Vec<TypeParam>, Extra<'src>> + Clone
where
    I: ValueInput<'src, Token = Token, Span = SimpleSpan>,
{
    ident()
        .then(
            just(Token::Extends)
                .ignore_then(
                    type_ref()
                        .separated_by(just(Token::Amp))
                        .at_least(1)
                        .collect::<Vec<_>>(),
                )
                .or_not(),
        )
        .map(|(name, bounds)| TypeParam {
            name,
            bounds: bounds.unwrap_or_default(),
        })
        .separated_by(just(Token::Comma))
        .at_least(1)
        .collect::<Vec<_>>()
        .delimited_by(just(Token::Lt), just(Token::Gt))
}

/// Count of `[]` pairs.
fn dims<'src, I>() -> impl Parser<'src, I, u32, Extra<'src>> + Clone
where
    I: ValueInput<'src, Token = Token, Span = SimpleSpan>,
{
    just(Token::LBracket)
        .then(just(Token::RBracket))
        .repeated()
        .collect::<Vec<_>>()
        .map(|pairs| pairs.len() as u32)
}

fn qualified_name<'src, I>() -> impl Parser<'src, I, String, Extra<'src>> + Clone
where
    I: ValueInput<'src, Token = Token, Span = SimpleSpan>,
{
    ident()
        .then(
            just(Token::Dot)
                .ignore_then(ident())
                .repeated()
                .collect::<Vec<_>>(),
        )
        .map(|(head, tail)| {
            std::iter::once(head)
                .chain(tail)
                .collect::<Vec<_>>()
                .join(".")
        })
}

fn ident<'src, I>() -> impl Parser<'src, I, String, Extra<'src>> + Clone
where
    I: ValueInput<'src, Token = Token, Span = SimpleSpan>,
{
    select! { Token::Ident(name) => name }.labelled("identifier")
}

// ============================================================================
// Class assembly
// ============================================================================

/// Build a `ClassDecl` from its header and members, returning every rule
/// violation found along the way.
fn assemble_class(
    header: ClassHeader,
    members: Vec<Member>,
    span: SimpleSpan,
) -> (ClassDecl, Vec<(SimpleSpan, String)>) {
    let mut problems = Vec::new();
    let mut class = ClassDecl::new(header.name, header.kind);
    class.type_params = header.type_params;
    class.modifiers = header.prefix.modifiers;
    class.annotations = header.prefix.annotations;

    match header.kind {
        DeclKind::Class => {
            if header.extends.len() > 1 {
                problems.push((
                    span,
                    format!("class `{}` cannot extend more than one class", class.name),
                ));
            }
            class.superclass = header.extends.first().map(|t| t.name().to_string());
            class.interfaces = header
                .implements
                .iter()
                .map(|t| t.name().to_string())
                .collect();
        }
        DeclKind::Interface => {
            if !header.implements.is_empty() {
                problems.push((
                    span,
                    format!(
                        "interface `{}` cannot implement other types; use `extends`",
                        class.name
                    ),
                ));
            }
            class.interfaces = header
                .extends
                .iter()
                .map(|t| t.name().to_string())
                .collect();
        }
    }

    if class.supertypes().any(|s| s == class.name) {
        problems.push((span, format!("`{}` cannot inherit from itself", class.name)));
    }

    let mut field_names = HashSet::new();
    let mut method_signatures = HashSet::new();
    let mut constructor_signatures = HashSet::new();

    for member in members {
        let Prefix {
            modifiers,
            annotations,
        } = member.prefix;
        match member.kind {
            MemberKind::Fields { ty, declarators } => {
                for d in declarators {
                    if !field_names.insert(d.name.clone()) {
                        problems.push((
                            d.span,
                            format!("field `{}` is already defined in `{}`", d.name, class.name),
                        ));
                    }
                    class.fields.push(FieldDecl {
                        name: d.name,
                        ty: ty.clone().with_extra_dims(d.dims),
                        modifiers: modifiers.clone(),
                        initializer: d.initializer,
                        annotations: annotations.clone(),
                    });
                }
            }
            MemberKind::Constructor {
                name,
                span: name_span,
                params,
                throws,
                body,
            } => {
                if name != class.name {
                    problems.push((
                        name_span,
                        format!("invalid method declaration `{name}`; return type required"),
                    ));
                    continue;
                }
                if header.kind == DeclKind::Interface {
                    problems.push((
                        name_span,
                        format!("interface `{}` cannot declare a constructor", class.name),
                    ));
                    continue;
                }
                let signature: Vec<String> = params.iter().map(|p| p.ty.to_string()).collect();
                if !constructor_signatures.insert(signature.clone()) {
                    problems.push((
                        name_span,
                        format!(
                            "constructor `{}({})` is already defined",
                            class.name,
                            signature.join(", ")
                        ),
                    ));
                }
                class.constructors.push(ConstructorDecl {
                    params,
                    modifiers,
                    throws,
                    annotations,
                    body,
                });
            }
            MemberKind::Method(mut method, name_span) => {
                method.modifiers = modifiers;
                method.annotations = annotations;
                let (name, types) = method.signature();
                if !method_signatures.insert((name.clone(), types.clone())) {
                    problems.push((
                        name_span,
                        format!(
                            "method `{name}({})` is already defined in `{}`",
                            types.join(", "),
                            class.name
                        ),
                    ));
                }
                class.methods.push(method);
            }
            MemberKind::Unsupported | MemberKind::Empty => {}
        }
    }

    (class, problems)
}
