//! Token printer
//!
//! Prints every token with its leading trivia in source order. Commas
//! between names and between type arguments are not stored in the tree and
//! are printed here.

use crate::parser::ast::*;

#[derive(Default)]
pub(crate) struct Printer {
    out: String,
    check_positions: bool,
    /// First token found without a source position
    pub(crate) missing: Option<String>,
}

impl Printer {
    pub(crate) fn new(check_positions: bool) -> Self {
        Self {
            check_positions,
            ..Self::default()
        }
    }

    pub(crate) fn finish(self) -> String {
        self.out
    }

    fn token(&mut self, token: &Token) {
        if self.check_positions && !token.pos.is_valid() && self.missing.is_none() {
            self.missing = Some(token.text.clone());
        }
        self.out.push_str(&token.trivia);
        self.out.push_str(&token.text);
    }

    fn opt_token(&mut self, token: &Option<Token>) {
        if let Some(token) = token {
            self.token(token);
        }
    }

    fn idents(&mut self, names: &[Ident]) {
        for (i, name) in names.iter().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            self.token(&name.token);
        }
    }

    fn specs<T>(&mut self, specs: &Specs<T>, mut each: impl FnMut(&mut Self, &T)) {
        match specs {
            Specs::Single(spec) => each(self, spec),
            Specs::Group {
                lparen,
                specs,
                rparen,
            } => {
                self.token(lparen);
                for spec in specs {
                    each(self, spec);
                }
                self.token(rparen);
            }
        }
    }

    pub(crate) fn file(&mut self, file: &File) {
        self.token(&file.package);
        self.token(&file.name.token);
        self.opt_token(&file.semi);
        for import in &file.imports {
            self.token(&import.import);
            self.specs(&import.specs, |p, spec| {
                p.opt_token(&spec.alias);
                p.token(&spec.path);
                p.opt_token(&spec.semi);
            });
            self.opt_token(&import.semi);
        }
        for decl in &file.decls {
            self.decl(decl);
        }
        self.out.push_str(&file.trailing);
    }

    fn decl(&mut self, decl: &Decl) {
        match decl {
            Decl::Value(gen) => {
                self.token(&gen.keyword);
                self.specs(&gen.specs, |p, spec| p.value_spec(spec));
                self.opt_token(&gen.semi);
            }
            Decl::Type(gen) => {
                self.token(&gen.keyword);
                self.specs(&gen.specs, |p, spec| p.type_spec(spec));
                self.opt_token(&gen.semi);
            }
            Decl::Func(func) => self.func_decl(func),
        }
    }

    fn value_spec(&mut self, spec: &ValueSpec) {
        self.idents(&spec.names);
        if let Some(ty) = &spec.ty {
            self.expr(ty);
        }
        self.opt_token(&spec.assign);
        self.tts(&spec.values);
        self.opt_token(&spec.semi);
    }

    fn type_spec(&mut self, spec: &TypeSpec) {
        self.token(&spec.name.token);
        self.opt_token(&spec.assign);
        self.expr(&spec.ty);
        self.opt_token(&spec.semi);
    }

    fn func_decl(&mut self, func: &FuncDecl) {
        self.token(&func.func);
        if let Some(recv) = &func.recv {
            self.field_list(recv);
        }
        self.token(&func.name.token);
        self.func_type(&func.ty);
        if let Some(body) = &func.body {
            self.group(body);
        }
        self.opt_token(&func.semi);
    }

    fn func_type(&mut self, ty: &FuncType) {
        self.opt_token(&ty.func);
        self.field_list(&ty.params);
        if let Some(results) = &ty.results {
            self.field_list(results);
        }
    }

    fn field_list(&mut self, list: &FieldList) {
        self.opt_token(&list.open);
        for field in &list.fields {
            self.idents(&field.names);
            self.expr(&field.ty);
            self.opt_token(&field.tag);
            self.opt_token(&field.sep);
        }
        self.opt_token(&list.close);
    }

    fn group(&mut self, group: &Group) {
        self.token(&group.open);
        self.tts(&group.items);
        self.token(&group.close);
    }

    fn tts(&mut self, items: &[Tt]) {
        for item in items {
            match item {
                Tt::Token(token) => self.token(token),
                Tt::Group(group) => self.group(group),
                Tt::Type(expr) => self.expr(expr),
            }
        }
    }

    pub(crate) fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Ident(ident) => self.token(&ident.token),
            Expr::Selector(sel) => {
                self.expr(&sel.x);
                self.token(&sel.dot);
                self.token(&sel.sel.token);
            }
            Expr::Index(index) => {
                self.expr(&index.x);
                self.token(&index.lbrack);
                for (i, arg) in index.indices.iter().enumerate() {
                    if i > 0 {
                        self.out.push(',');
                    }
                    self.expr(arg);
                }
                self.token(&index.rbrack);
            }
            Expr::Star(star) => {
                self.token(&star.star);
                self.expr(&star.x);
            }
            Expr::Paren(paren) => {
                self.token(&paren.lparen);
                self.expr(&paren.x);
                self.token(&paren.rparen);
            }
            Expr::Ellipsis(ellipsis) => {
                self.token(&ellipsis.ellipsis);
                self.expr(&ellipsis.elt);
            }
            Expr::Array(array) => {
                self.token(&array.lbrack);
                for token in &array.len {
                    self.token(token);
                }
                self.token(&array.rbrack);
                self.expr(&array.elt);
            }
            Expr::Map(map) => {
                self.token(&map.map);
                self.token(&map.lbrack);
                self.expr(&map.key);
                self.token(&map.rbrack);
                self.expr(&map.value);
            }
            Expr::Chan(chan) => {
                self.opt_token(&chan.recv);
                self.token(&chan.chan);
                self.opt_token(&chan.send);
                self.expr(&chan.value);
            }
            Expr::Func(func) => self.func_type(func),
            Expr::Struct(st) => {
                self.token(&st.keyword);
                self.field_list(&st.fields);
            }
            Expr::Interface(it) => {
                self.token(&it.keyword);
                self.field_list(&it.methods);
            }
        }
    }
}
