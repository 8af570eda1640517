//! Tree rewriting primitives shared by every strategy

use crate::parser::visit::{walk_expr_mut, walk_group_mut};
use crate::parser::*;

use super::arguments::{RenameTable, TypeArgument};
use super::MutateError;

struct SetPosition(Pos);

impl VisitMut for SetPosition {
    fn visit_token_mut(&mut self, token: &mut Token) {
        token.pos = self.0;
    }
}

/// Give every token under `node` the position `pos`
pub fn propagate_position<N: Walk + ?Sized>(node: &mut N, pos: Pos) {
    node.walk_mut(&mut SetPosition(pos));
}

struct ReplacePlaceholders<'a> {
    arg: &'a TypeArgument,
    count: usize,
}

impl ReplacePlaceholders<'_> {
    fn replacement(&mut self, pos: Pos, trivia: &str) -> Expr {
        self.count += 1;
        self.arg.instantiate(pos, trivia)
    }
}

impl VisitMut for ReplacePlaceholders<'_> {
    fn visit_expr_mut(&mut self, expr: &mut Expr) {
        if expr.is_placeholder() {
            let trivia = expr.first_token().map(|t| t.trivia.clone()).unwrap_or_default();
            *expr = self.replacement(expr.pos(), &trivia);
            return;
        }
        walk_expr_mut(self, expr);
    }

    fn visit_token_trees_mut(&mut self, items: &mut Vec<Tt>) {
        let mut after_dot = false;
        for item in items.iter_mut() {
            let next_after_dot = item.is_token(TokenKind::Dot);
            match item {
                Tt::Token(token) if !after_dot && token.is_ident("any") => {
                    let (pos, trivia) = (token.pos, token.trivia.clone());
                    *item = Tt::Type(self.replacement(pos, &trivia));
                }
                Tt::Token(token) => self.visit_token_mut(token),
                Tt::Group(group) => walk_group_mut(self, group),
                Tt::Type(expr) => self.visit_expr_mut(expr),
            }
            after_dot = next_after_dot;
        }
    }
}

/// Replace every unconstrained placeholder under `node` with `arg`.
///
/// Placeholders are `interface{}` without elements and `any`, found in
/// pre-order. Each replacement takes over the position and leading trivia
/// of the node it replaces. Returns the number of replacements; finding
/// none is an error.
pub fn replace_placeholders<N: Walk + ?Sized>(
    node: &mut N,
    arg: &TypeArgument,
) -> Result<usize, MutateError> {
    let mut visitor = ReplacePlaceholders { arg, count: 0 };
    node.walk_mut(&mut visitor);
    match visitor.count {
        0 => Err(MutateError::NoPlaceholder),
        count => Ok(count),
    }
}

/// Replace `expr` wholesale with `arg`, keeping its position and trivia
pub fn substitute(expr: &mut Expr, arg: &TypeArgument) {
    let trivia = expr.first_token().map(|t| t.trivia.clone()).unwrap_or_default();
    *expr = arg.instantiate(expr.pos(), &trivia);
}

/// Rename every `return` result that is exactly `nil` to `name`.
///
/// A return statement's results run to the end of its line or the next
/// `;`. Nested blocks are searched too. Returns the number of renames.
pub fn rename_nil_returns(body: &mut Group, name: &str) -> usize {
    rename_nil_in(&mut body.items, name)
}

fn rename_nil_in(items: &mut [Tt], name: &str) -> usize {
    let mut count = 0;
    let mut i = 0;
    while i < items.len() {
        if items[i].is_token(TokenKind::Return) {
            let start = i + 1;
            let mut end = start;
            while end < items.len()
                && !items[end].starts_line()
                && !items[end].is_token(TokenKind::Semicolon)
            {
                end += 1;
            }
            for element in items[start..end].split_mut(|tt| tt.is_token(TokenKind::Comma)) {
                if let [Tt::Token(token)] = element {
                    if token.is_ident("nil") {
                        token.text = name.to_string();
                        count += 1;
                    }
                }
            }
            for item in &mut items[start..end] {
                if let Tt::Group(group) = item {
                    count += rename_nil_in(&mut group.items, name);
                }
            }
            i = end;
            continue;
        }
        if let Tt::Group(group) = &mut items[i] {
            count += rename_nil_in(&mut group.items, name);
        }
        i += 1;
    }
    count
}

/// Give a parameter list that shares one placeholder between a key and a
/// value (`key, value interface{}`) distinct key and value types.
///
/// With equal type texts the shared field is substituted in place.
/// Otherwise it splits into `key K` and `value V`.
pub fn split_key_value(
    list: &mut FieldList,
    key: &TypeArgument,
    value: &TypeArgument,
) -> Result<(), MutateError> {
    let first = list.fields.first_mut().ok_or_else(|| MutateError::Missing {
        what: "key/value field".to_string(),
    })?;

    if key.text() == value.text() {
        replace_placeholders(first, key)?;
        return Ok(());
    }
    if first.names.len() < 2 {
        return Err(MutateError::Missing {
            what: "value name in key/value field".to_string(),
        });
    }

    let value_names = first.names.split_off(1);
    let comma_pos = value_names[0].pos();
    let mut second = Field {
        names: value_names,
        ty: first.ty.clone(),
        tag: None,
        sep: first.sep.take(),
    };
    first.sep = Some(Token::synthetic(TokenKind::Comma, ",", "").at(comma_pos));

    replace_placeholders(first, key)?;
    replace_placeholders(&mut second, value)?;
    list.fields.insert(1, second);
    Ok(())
}

struct ReplaceNamed<'a> {
    name: &'a str,
    arg: &'a TypeArgument,
    count: usize,
}

impl VisitMut for ReplaceNamed<'_> {
    fn visit_expr_mut(&mut self, expr: &mut Expr) {
        if expr.as_ident().is_some_and(|ident| ident.name() == self.name) {
            substitute(expr, self.arg);
            self.count += 1;
            return;
        }
        walk_expr_mut(self, expr);
    }
}

/// Replace every type expression that is exactly the identifier `name`.
///
/// Only parsed type positions are considered; plain body tokens are left
/// alone. Finding none is an error.
pub fn replace_named_type<N: Walk + ?Sized>(
    node: &mut N,
    name: &str,
    arg: &TypeArgument,
) -> Result<usize, MutateError> {
    let mut visitor = ReplaceNamed { name, arg, count: 0 };
    node.walk_mut(&mut visitor);
    match visitor.count {
        0 => Err(MutateError::missing(format!("type {}", name))),
        count => Ok(count),
    }
}

struct ReplaceMapKeys<'a> {
    arg: &'a TypeArgument,
    count: usize,
}

impl VisitMut for ReplaceMapKeys<'_> {
    fn visit_expr_mut(&mut self, expr: &mut Expr) {
        if let Expr::Map(map) = expr {
            substitute(&mut map.key, self.arg);
            self.count += 1;
            self.visit_expr_mut(&mut map.value);
            return;
        }
        walk_expr_mut(self, expr);
    }
}

/// Set the key of every map type under `node` to `arg`, including map
/// types inside function bodies. Returns the number of keys replaced.
pub fn replace_map_keys<N: Walk + ?Sized>(node: &mut N, arg: &TypeArgument) -> usize {
    let mut visitor = ReplaceMapKeys { arg, count: 0 };
    node.walk_mut(&mut visitor);
    visitor.count
}

struct Rename<'a> {
    table: &'a RenameTable,
    count: usize,
}

impl Rename<'_> {
    fn rename(&mut self, token: &mut Token) {
        if let Some(new) = self.table.get(&token.text) {
            token.text = new.to_string();
            self.count += 1;
        }
    }
}

impl VisitMut for Rename<'_> {
    fn visit_ident_mut(&mut self, ident: &mut Ident) {
        self.rename(&mut ident.token);
    }

    fn visit_token_trees_mut(&mut self, items: &mut Vec<Tt>) {
        let mut after_dot = false;
        for item in items.iter_mut() {
            match item {
                Tt::Token(token) => {
                    if !after_dot && token.is(TokenKind::Ident) {
                        self.rename(token);
                    }
                    after_dot = token.is(TokenKind::Dot);
                }
                Tt::Group(group) => {
                    walk_group_mut(self, group);
                    after_dot = false;
                }
                Tt::Type(expr) => {
                    self.visit_expr_mut(expr);
                    after_dot = false;
                }
            }
        }
    }
}

/// Rename declarations and every reference to them across the file.
///
/// Method names and selector fields (`x.Name`) never refer to top-level
/// declarations and are left alone. Returns the number of renamed tokens.
pub fn rename_all(file: &mut File, table: &RenameTable) -> usize {
    let mut rename = Rename { table, count: 0 };
    for decl in &mut file.decls {
        match decl {
            Decl::Func(func) if func.is_method() => {
                if let Some(recv) = &mut func.recv {
                    rename.visit_field_list_mut(recv);
                }
                func.ty.walk_mut(&mut rename);
                if let Some(body) = &mut func.body {
                    body.walk_mut(&mut rename);
                }
            }
            decl => decl.walk_mut(&mut rename),
        }
    }
    rename.count
}
