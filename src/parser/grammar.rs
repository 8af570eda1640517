//! Parser implementation using chumsky
//!
//! Declarations and type expressions are parsed into structured nodes;
//! statements and initialisers stay token trees. Newlines matter in a few
//! places (a result type or field type must start on the same line), which
//! is checked through each token's leading trivia.

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::parser::ast::*;
use crate::parser::lexer::{lex, Lexed, Token, TokenKind};
use crate::ParseError;

type Extra<'a> = extra::Err<Rich<'a, Token>>;

/// Parse a Go source file
pub fn parse_file(input: &str) -> Result<File, Vec<ParseError>> {
    let Lexed { tokens, trailing } = lex(input).map_err(|e| vec![e])?;
    let len = input.len();

    let token_iter = tokens.into_iter().map(|tok| {
        let span: SimpleSpan = tok.span().into();
        (tok, span)
    });
    let token_stream = Stream::from_iter(token_iter).map((len..len).into(), |(t, s): (_, _)| (t, s));

    file_parser()
        .parse(token_stream)
        .into_result()
        .map(|mut file| {
            file.trailing = trailing;
            file
        })
        .map_err(|errs| errs.into_iter().map(|e| e.into()).collect())
}

/// Parse a standalone type expression such as `map[string]*Item`
pub fn parse_type_expr(input: &str) -> Result<Expr, Vec<ParseError>> {
    let Lexed { tokens, .. } = lex(input).map_err(|e| vec![e])?;
    let len = input.len();

    let token_iter = tokens.into_iter().map(|tok| {
        let span: SimpleSpan = tok.span().into();
        (tok, span)
    });
    let token_stream = Stream::from_iter(token_iter).map((len..len).into(), |(t, s): (_, _)| (t, s));

    type_parser()
        .then_ignore(end())
        .parse(token_stream)
        .into_result()
        .map_err(|errs| errs.into_iter().map(|e| e.into()).collect())
}

/// Match a single token of the given kind
fn tok<'a, I>(kind: TokenKind) -> impl Parser<'a, I, Token, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    any().filter(move |t: &Token| t.kind == kind)
}

/// Run `parser` only if the next token is on the current line
fn same_line<'a, I, O, P>(parser: P) -> impl Parser<'a, I, O, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
    P: Parser<'a, I, O, Extra<'a>> + Clone,
{
    any()
        .filter(|t: &Token| !t.starts_line())
        .rewind()
        .ignore_then(parser)
}

/// One spec or a parenthesised group of them
fn specs<'a, I, T, P>(spec: P) -> impl Parser<'a, I, Specs<T>, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
    P: Parser<'a, I, T, Extra<'a>> + Clone,
{
    choice((
        tok(TokenKind::LParen)
            .then(spec.clone().repeated().collect::<Vec<_>>())
            .then(tok(TokenKind::RParen))
            .map(|((lparen, specs), rparen)| Specs::Group {
                lparen,
                specs,
                rparen,
            }),
        spec.map(Specs::Single),
    ))
}

/// A parameter before names and types are grouped
enum Param {
    Named(Ident, Expr),
    Anonymous(Expr),
}

/// Group parameters the way Go reads them: in `(a, b int, c string)` the
/// bare identifiers `a` and `b` are names sharing the type `int`. Without
/// any named parameter every entry is a type.
fn group_params(items: Vec<(Param, Option<Token>)>) -> Vec<Field> {
    let named = items.iter().any(|(p, _)| matches!(p, Param::Named(..)));
    let mut fields = Vec::with_capacity(items.len());
    let mut pending = Vec::new();

    for (param, sep) in items {
        match param {
            Param::Named(name, ty) => {
                pending.push(name);
                fields.push(Field {
                    names: std::mem::take(&mut pending),
                    ty,
                    tag: None,
                    sep,
                });
            }
            Param::Anonymous(Expr::Ident(name)) if named => pending.push(name),
            Param::Anonymous(ty) => fields.push(Field {
                sep,
                ..Field::anonymous(ty)
            }),
        }
    }
    // Names without a type: not valid Go, kept as types
    fields.extend(pending.into_iter().map(|name| Field::anonymous(Expr::Ident(name))));
    fields
}

/// `(a, b T, c ...U)`
fn param_list<'a, I, T>(ty: T) -> impl Parser<'a, I, FieldList, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
    T: Parser<'a, I, Expr, Extra<'a>> + Clone + 'a,
{
    let ident = tok(TokenKind::Ident).map(Ident::new);

    let param = choice((
        ident.then(ty.clone()).map(|(name, ty)| Param::Named(name, ty)),
        ty.map(Param::Anonymous),
    ))
    .then(tok(TokenKind::Comma).or_not());

    tok(TokenKind::LParen)
        .then(param.repeated().collect::<Vec<_>>())
        .then(tok(TokenKind::RParen))
        .map(|((open, items), close)| FieldList {
            open: Some(open),
            fields: group_params(items),
            close: Some(close),
        })
        .boxed()
}

/// Parameters and optional results, without the `func` keyword
fn signature<'a, I, T>(ty: T) -> impl Parser<'a, I, FuncType, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
    T: Parser<'a, I, Expr, Extra<'a>> + Clone + 'a,
{
    let params = param_list(ty.clone());
    let results = choice((
        params.clone(),
        same_line(ty).map(FieldList::single),
    ));

    params
        .then(results.or_not())
        .map(|(params, results)| FuncType {
            func: None,
            params,
            results,
        })
        .boxed()
}

/// Type expressions
fn type_parser<'a, I>() -> impl Parser<'a, I, Expr, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    recursive(|ty| {
        let ident = tok(TokenKind::Ident).map(Ident::new);

        // T, pkg.T, T[A, B]
        let type_name = ident
            .clone()
            .then(tok(TokenKind::Dot).then(ident.clone()).or_not())
            .map(|(x, sel)| match sel {
                Some((dot, sel)) => Expr::Selector(SelectorExpr {
                    x: Box::new(Expr::Ident(x)),
                    dot,
                    sel,
                }),
                None => Expr::Ident(x),
            })
            .then(
                tok(TokenKind::LBrack)
                    .then(
                        ty.clone()
                            .then_ignore(tok(TokenKind::Comma).or_not())
                            .repeated()
                            .at_least(1)
                            .collect::<Vec<_>>(),
                    )
                    .then(tok(TokenKind::RBrack))
                    .or_not(),
            )
            .map(|(x, args)| match args {
                Some(((lbrack, indices), rbrack)) => Expr::Index(IndexExpr {
                    x: Box::new(x),
                    lbrack,
                    indices,
                    rbrack,
                }),
                None => x,
            });

        let star = tok(TokenKind::Star)
            .then(ty.clone())
            .map(|(star, x)| Expr::Star(StarExpr { star, x: Box::new(x) }));

        let paren = tok(TokenKind::LParen)
            .then(ty.clone())
            .then(tok(TokenKind::RParen))
            .map(|((lparen, x), rparen)| {
                Expr::Paren(ParenExpr {
                    lparen,
                    x: Box::new(x),
                    rparen,
                })
            });

        let ellipsis = tok(TokenKind::Ellipsis)
            .then(ty.clone())
            .map(|(ellipsis, elt)| {
                Expr::Ellipsis(EllipsisExpr {
                    ellipsis,
                    elt: Box::new(elt),
                })
            });

        let array = tok(TokenKind::LBrack)
            .then(
                any()
                    .filter(|t: &Token| t.kind != TokenKind::RBrack)
                    .repeated()
                    .collect::<Vec<_>>(),
            )
            .then(tok(TokenKind::RBrack))
            .then(ty.clone())
            .map(|(((lbrack, len), rbrack), elt)| {
                Expr::Array(ArrayType {
                    lbrack,
                    len,
                    rbrack,
                    elt: Box::new(elt),
                })
            });

        let map = tok(TokenKind::Map)
            .then(tok(TokenKind::LBrack))
            .then(ty.clone())
            .then(tok(TokenKind::RBrack))
            .then(ty.clone())
            .map(|((((map, lbrack), key), rbrack), value)| {
                Expr::Map(MapType {
                    map,
                    lbrack,
                    key: Box::new(key),
                    rbrack,
                    value: Box::new(value),
                })
            });

        let chan = choice((
            tok(TokenKind::Arrow)
                .then(tok(TokenKind::Chan))
                .then(ty.clone())
                .map(|((recv, chan), value)| ChanType {
                    recv: Some(recv),
                    chan,
                    send: None,
                    value: Box::new(value),
                }),
            tok(TokenKind::Chan)
                .then(tok(TokenKind::Arrow).or_not())
                .then(ty.clone())
                .map(|((chan, send), value)| ChanType {
                    recv: None,
                    chan,
                    send,
                    value: Box::new(value),
                }),
        ))
        .map(Expr::Chan);

        let func = tok(TokenKind::Func)
            .then(signature(ty.clone()))
            .map(|(func, sig)| {
                Expr::Func(FuncType {
                    func: Some(func),
                    ..sig
                })
            });

        let tag = any().filter(|t: &Token| t.kind.is_string());

        // `a, b T "tag"` or an embedded `pkg.T`
        let struct_field = choice((
            ident
                .clone()
                .separated_by(tok(TokenKind::Comma))
                .at_least(1)
                .collect::<Vec<_>>()
                .then(same_line(ty.clone()))
                .then(tag.clone().or_not())
                .map(|((names, ty), tag)| Field {
                    names,
                    ty,
                    tag,
                    sep: None,
                }),
            ty.clone()
                .then(tag.or_not())
                .map(|(ty, tag)| Field {
                    tag,
                    ..Field::anonymous(ty)
                }),
        ))
        .then(tok(TokenKind::Semicolon).or_not())
        .map(|(field, sep)| Field { sep, ..field });

        let struct_type = tok(TokenKind::Struct)
            .then(tok(TokenKind::LBrace))
            .then(struct_field.repeated().collect::<Vec<_>>())
            .then(tok(TokenKind::RBrace))
            .map(|(((keyword, open), fields), close)| {
                Expr::Struct(StructType {
                    keyword,
                    fields: FieldList {
                        open: Some(open),
                        fields,
                        close: Some(close),
                    },
                })
            });

        // `Method(params) results` or an embedded interface
        let interface_elem = choice((
            ident
                .clone()
                .then(signature(ty.clone()))
                .map(|(name, sig)| Field {
                    names: vec![name],
                    ty: Expr::Func(sig),
                    tag: None,
                    sep: None,
                }),
            ty.clone().map(Field::anonymous),
        ))
        .then(tok(TokenKind::Semicolon).or_not())
        .map(|(field, sep)| Field { sep, ..field });

        let interface_type = tok(TokenKind::Interface)
            .then(tok(TokenKind::LBrace))
            .then(interface_elem.repeated().collect::<Vec<_>>())
            .then(tok(TokenKind::RBrace))
            .map(|(((keyword, open), methods), close)| {
                Expr::Interface(InterfaceType {
                    keyword,
                    methods: FieldList {
                        open: Some(open),
                        fields: methods,
                        close: Some(close),
                    },
                })
            });

        choice((
            type_name,
            star,
            paren,
            ellipsis,
            array,
            map,
            chan,
            func,
            struct_type,
            interface_type,
        ))
        .boxed()
    })
}

/// Token trees; type literals inside them become [`Tt::Type`]
fn token_tree<'a, I, T>(ty: T) -> impl Parser<'a, I, Tt, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
    T: Parser<'a, I, Expr, Extra<'a>> + Clone + 'a,
{
    recursive(|tt| {
        let items = tt.repeated().collect::<Vec<_>>();
        let group = choice((
            tok(TokenKind::LParen)
                .then(items.clone())
                .then(tok(TokenKind::RParen)),
            tok(TokenKind::LBrack)
                .then(items.clone())
                .then(tok(TokenKind::RBrack)),
            tok(TokenKind::LBrace)
                .then(items)
                .then(tok(TokenKind::RBrace)),
        ))
        .map(|((open, items), close)| Group { open, items, close });

        choice((
            any()
                .filter(|t: &Token| t.kind.starts_type_literal())
                .rewind()
                .ignore_then(ty)
                .map(Tt::Type),
            group.map(Tt::Group),
            any()
                .filter(|t: &Token| !t.kind.is_opener() && !t.kind.is_closer())
                .map(Tt::Token),
        ))
        .boxed()
    })
}

fn file_parser<'a, I>() -> impl Parser<'a, I, File, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    let ty = type_parser();
    let tt = token_tree(ty.clone());
    let ident = tok(TokenKind::Ident).map(Ident::new);
    let semi = tok(TokenKind::Semicolon).or_not();

    // import "path" / import ( alias "path" ... )
    let import_spec = choice((tok(TokenKind::Ident), tok(TokenKind::Dot)))
        .or_not()
        .then(tok(TokenKind::String))
        .then(semi.clone())
        .map(|((alias, path), semi)| ImportSpec { alias, path, semi });

    let import_decl = tok(TokenKind::Import)
        .then(specs(import_spec))
        .then(semi.clone())
        .map(|((import, specs), semi)| ImportDecl {
            import,
            specs,
            semi,
        });

    // Initialisers run to the end of the line, never past a `;`
    let value_item = tt
        .clone()
        .filter(|t: &Tt| !t.is_token(TokenKind::Semicolon));
    let values = value_item
        .clone()
        .then(
            value_item
                .filter(|t: &Tt| !t.starts_line())
                .repeated()
                .collect::<Vec<_>>(),
        )
        .map(|(first, mut rest)| {
            rest.insert(0, first);
            rest
        });

    let value_spec = ident
        .clone()
        .separated_by(tok(TokenKind::Comma))
        .at_least(1)
        .collect::<Vec<_>>()
        .then(same_line(ty.clone()).or_not())
        .then(tok(TokenKind::Assign).then(values).or_not())
        .then(semi.clone())
        .map(|(((names, ty), init), semi)| {
            let (assign, values) = match init {
                Some((assign, values)) => (Some(assign), values),
                None => (None, vec![]),
            };
            ValueSpec {
                names,
                ty,
                assign,
                values,
                semi,
            }
        });

    let value_decl = choice((tok(TokenKind::Var), tok(TokenKind::Const)))
        .then(specs(value_spec))
        .then(semi.clone())
        .map(|((keyword, specs), semi)| {
            Decl::Value(GenDecl {
                keyword,
                specs,
                semi,
            })
        });

    let type_spec = ident
        .clone()
        .then(tok(TokenKind::Assign).or_not())
        .then(ty.clone())
        .then(semi.clone())
        .map(|(((name, assign), ty), semi)| TypeSpec {
            name,
            assign,
            ty,
            semi,
        });

    let type_decl = tok(TokenKind::Type)
        .then(specs(type_spec))
        .then(semi.clone())
        .map(|((keyword, specs), semi)| {
            Decl::Type(GenDecl {
                keyword,
                specs,
                semi,
            })
        });

    let body = tok(TokenKind::LBrace)
        .then(tt.repeated().collect::<Vec<_>>())
        .then(tok(TokenKind::RBrace))
        .map(|((open, items), close)| Group { open, items, close });

    let func_decl = tok(TokenKind::Func)
        .then(param_list(ty.clone()).or_not())
        .then(ident.clone())
        .then(signature(ty))
        .then(body.or_not())
        .then(semi.clone())
        .map(|(((((func, recv), name), ty), body), semi)| {
            Decl::Func(FuncDecl {
                func,
                recv,
                name,
                ty,
                body,
                semi,
            })
        });

    let decl = choice((value_decl, type_decl, func_decl)).boxed();

    tok(TokenKind::Package)
        .then(ident)
        .then(semi)
        .then(import_decl.repeated().collect::<Vec<_>>())
        .then(decl.repeated().collect::<Vec<_>>())
        .then_ignore(end())
        .map(|((((package, name), semi), imports), decls)| File {
            package,
            name,
            semi,
            imports,
            decls,
            trailing: String::new(),
        })
}
