//! Mutable syntax tree traversal
//!
//! Override the `visit_*` hooks of [`VisitMut`] and call the matching
//! `walk_*` function to keep descending. Nodes are visited in source order.

use super::ast::*;

pub trait VisitMut {
    fn visit_expr_mut(&mut self, expr: &mut Expr) {
        walk_expr_mut(self, expr);
    }

    fn visit_field_list_mut(&mut self, list: &mut FieldList) {
        walk_field_list_mut(self, list);
    }

    fn visit_field_mut(&mut self, field: &mut Field) {
        walk_field_mut(self, field);
    }

    /// A run of token trees: a body, a group's contents or an initialiser
    fn visit_token_trees_mut(&mut self, items: &mut Vec<Tt>) {
        walk_token_trees_mut(self, items);
    }

    /// Identifiers that name something: declarations, fields, type names.
    ///
    /// Selector fields (`x.Sel`) are not reported here.
    fn visit_ident_mut(&mut self, ident: &mut Ident) {
        self.visit_token_mut(&mut ident.token);
    }

    fn visit_token_mut(&mut self, _token: &mut Token) {}
}

/// Nodes a [`VisitMut`] can be started on
pub trait Walk {
    fn walk_mut<V: VisitMut + ?Sized>(&mut self, v: &mut V);
}

fn opt_token<V: VisitMut + ?Sized>(v: &mut V, token: &mut Option<Token>) {
    if let Some(token) = token {
        v.visit_token_mut(token);
    }
}

fn walk_specs<T, V, F>(v: &mut V, specs: &mut Specs<T>, mut each: F)
where
    V: VisitMut + ?Sized,
    F: FnMut(&mut V, &mut T),
{
    match specs {
        Specs::Single(spec) => each(v, spec),
        Specs::Group {
            lparen,
            specs,
            rparen,
        } => {
            v.visit_token_mut(lparen);
            for spec in specs {
                each(v, spec);
            }
            v.visit_token_mut(rparen);
        }
    }
}

pub fn walk_file_mut<V: VisitMut + ?Sized>(v: &mut V, file: &mut File) {
    v.visit_token_mut(&mut file.package);
    v.visit_ident_mut(&mut file.name);
    opt_token(v, &mut file.semi);
    for import in &mut file.imports {
        v.visit_token_mut(&mut import.import);
        walk_specs(v, &mut import.specs, |v, spec| {
            opt_token(v, &mut spec.alias);
            v.visit_token_mut(&mut spec.path);
            opt_token(v, &mut spec.semi);
        });
        opt_token(v, &mut import.semi);
    }
    for decl in &mut file.decls {
        walk_decl_mut(v, decl);
    }
}

pub fn walk_decl_mut<V: VisitMut + ?Sized>(v: &mut V, decl: &mut Decl) {
    match decl {
        Decl::Value(gen) => {
            v.visit_token_mut(&mut gen.keyword);
            walk_specs(v, &mut gen.specs, |v, spec| walk_value_spec_mut(v, spec));
            opt_token(v, &mut gen.semi);
        }
        Decl::Type(gen) => {
            v.visit_token_mut(&mut gen.keyword);
            walk_specs(v, &mut gen.specs, |v, spec| walk_type_spec_mut(v, spec));
            opt_token(v, &mut gen.semi);
        }
        Decl::Func(func) => walk_func_decl_mut(v, func),
    }
}

pub fn walk_value_spec_mut<V: VisitMut + ?Sized>(v: &mut V, spec: &mut ValueSpec) {
    for name in &mut spec.names {
        v.visit_ident_mut(name);
    }
    if let Some(ty) = &mut spec.ty {
        v.visit_expr_mut(ty);
    }
    opt_token(v, &mut spec.assign);
    v.visit_token_trees_mut(&mut spec.values);
    opt_token(v, &mut spec.semi);
}

pub fn walk_type_spec_mut<V: VisitMut + ?Sized>(v: &mut V, spec: &mut TypeSpec) {
    v.visit_ident_mut(&mut spec.name);
    opt_token(v, &mut spec.assign);
    v.visit_expr_mut(&mut spec.ty);
    opt_token(v, &mut spec.semi);
}

pub fn walk_func_decl_mut<V: VisitMut + ?Sized>(v: &mut V, func: &mut FuncDecl) {
    v.visit_token_mut(&mut func.func);
    if let Some(recv) = &mut func.recv {
        v.visit_field_list_mut(recv);
    }
    v.visit_ident_mut(&mut func.name);
    walk_func_type_mut(v, &mut func.ty);
    if let Some(body) = &mut func.body {
        walk_group_mut(v, body);
    }
    opt_token(v, &mut func.semi);
}

pub fn walk_func_type_mut<V: VisitMut + ?Sized>(v: &mut V, ty: &mut FuncType) {
    opt_token(v, &mut ty.func);
    v.visit_field_list_mut(&mut ty.params);
    if let Some(results) = &mut ty.results {
        v.visit_field_list_mut(results);
    }
}

pub fn walk_group_mut<V: VisitMut + ?Sized>(v: &mut V, group: &mut Group) {
    v.visit_token_mut(&mut group.open);
    v.visit_token_trees_mut(&mut group.items);
    v.visit_token_mut(&mut group.close);
}

pub fn walk_token_trees_mut<V: VisitMut + ?Sized>(v: &mut V, items: &mut Vec<Tt>) {
    for item in items.iter_mut() {
        match item {
            Tt::Token(token) => v.visit_token_mut(token),
            Tt::Group(group) => walk_group_mut(v, group),
            Tt::Type(expr) => v.visit_expr_mut(expr),
        }
    }
}

pub fn walk_field_list_mut<V: VisitMut + ?Sized>(v: &mut V, list: &mut FieldList) {
    opt_token(v, &mut list.open);
    for field in &mut list.fields {
        v.visit_field_mut(field);
    }
    opt_token(v, &mut list.close);
}

pub fn walk_field_mut<V: VisitMut + ?Sized>(v: &mut V, field: &mut Field) {
    for name in &mut field.names {
        v.visit_ident_mut(name);
    }
    v.visit_expr_mut(&mut field.ty);
    opt_token(v, &mut field.tag);
    opt_token(v, &mut field.sep);
}

pub fn walk_expr_mut<V: VisitMut + ?Sized>(v: &mut V, expr: &mut Expr) {
    match expr {
        Expr::Ident(ident) => v.visit_ident_mut(ident),
        Expr::Selector(sel) => {
            v.visit_expr_mut(&mut sel.x);
            v.visit_token_mut(&mut sel.dot);
            v.visit_token_mut(&mut sel.sel.token);
        }
        Expr::Index(index) => {
            v.visit_expr_mut(&mut index.x);
            v.visit_token_mut(&mut index.lbrack);
            for index in &mut index.indices {
                v.visit_expr_mut(index);
            }
            v.visit_token_mut(&mut index.rbrack);
        }
        Expr::Star(star) => {
            v.visit_token_mut(&mut star.star);
            v.visit_expr_mut(&mut star.x);
        }
        Expr::Paren(paren) => {
            v.visit_token_mut(&mut paren.lparen);
            v.visit_expr_mut(&mut paren.x);
            v.visit_token_mut(&mut paren.rparen);
        }
        Expr::Ellipsis(ellipsis) => {
            v.visit_token_mut(&mut ellipsis.ellipsis);
            v.visit_expr_mut(&mut ellipsis.elt);
        }
        Expr::Array(array) => {
            v.visit_token_mut(&mut array.lbrack);
            for token in &mut array.len {
                v.visit_token_mut(token);
            }
            v.visit_token_mut(&mut array.rbrack);
            v.visit_expr_mut(&mut array.elt);
        }
        Expr::Map(map) => {
            v.visit_token_mut(&mut map.map);
            v.visit_token_mut(&mut map.lbrack);
            v.visit_expr_mut(&mut map.key);
            v.visit_token_mut(&mut map.rbrack);
            v.visit_expr_mut(&mut map.value);
        }
        Expr::Chan(chan) => {
            opt_token(v, &mut chan.recv);
            v.visit_token_mut(&mut chan.chan);
            opt_token(v, &mut chan.send);
            v.visit_expr_mut(&mut chan.value);
        }
        Expr::Func(func) => walk_func_type_mut(v, func),
        Expr::Struct(st) => {
            v.visit_token_mut(&mut st.keyword);
            v.visit_field_list_mut(&mut st.fields);
        }
        Expr::Interface(it) => {
            v.visit_token_mut(&mut it.keyword);
            v.visit_field_list_mut(&mut it.methods);
        }
    }
}

impl Walk for File {
    fn walk_mut<V: VisitMut + ?Sized>(&mut self, v: &mut V) {
        walk_file_mut(v, self);
    }
}

impl Walk for Decl {
    fn walk_mut<V: VisitMut + ?Sized>(&mut self, v: &mut V) {
        walk_decl_mut(v, self);
    }
}

impl Walk for ValueSpec {
    fn walk_mut<V: VisitMut + ?Sized>(&mut self, v: &mut V) {
        walk_value_spec_mut(v, self);
    }
}

impl Walk for TypeSpec {
    fn walk_mut<V: VisitMut + ?Sized>(&mut self, v: &mut V) {
        walk_type_spec_mut(v, self);
    }
}

impl Walk for FuncDecl {
    fn walk_mut<V: VisitMut + ?Sized>(&mut self, v: &mut V) {
        walk_func_decl_mut(v, self);
    }
}

impl Walk for FuncType {
    fn walk_mut<V: VisitMut + ?Sized>(&mut self, v: &mut V) {
        walk_func_type_mut(v, self);
    }
}

impl Walk for FieldList {
    fn walk_mut<V: VisitMut + ?Sized>(&mut self, v: &mut V) {
        v.visit_field_list_mut(self);
    }
}

impl Walk for Field {
    fn walk_mut<V: VisitMut + ?Sized>(&mut self, v: &mut V) {
        v.visit_field_mut(self);
    }
}

impl Walk for Expr {
    fn walk_mut<V: VisitMut + ?Sized>(&mut self, v: &mut V) {
        v.visit_expr_mut(self);
    }
}

impl Walk for Group {
    fn walk_mut<V: VisitMut + ?Sized>(&mut self, v: &mut V) {
        walk_group_mut(v, self);
    }
}
