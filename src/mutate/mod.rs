//! Mutation engine: runs a strategy's hooks against a parsed template

mod arguments;
pub mod primitives;

pub use arguments::{title, RenameTable, TypeArgument};

use thiserror::Error;
use tracing::debug;

use crate::parser::*;
use crate::template::TemplateUnit;
use crate::GenerateError;

/// A template did not have the shape a hook expected
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutateError {
    #[error("no interface{{}} placeholder to replace")]
    NoPlaceholder,

    #[error("missing {what}")]
    Missing { what: String },

    #[error("unsupported template layout: {what}")]
    Unsupported { what: String },
}

impl MutateError {
    pub(crate) fn missing(what: impl Into<String>) -> Self {
        MutateError::Missing { what: what.into() }
    }
}

/// Rewrites one declaration of kind `N` for strategy `S`
pub type Hook<S, N> = fn(&S, &mut N) -> Result<(), MutateError>;

/// Declaration name -> hook, run in insertion order
pub struct HookTable<S, N> {
    entries: Vec<(&'static str, Hook<S, N>)>,
}

impl<S, N> HookTable<S, N> {
    pub fn new() -> Self {
        Self { entries: vec![] }
    }

    /// Register `hook` for the declaration called `name`
    pub fn on(mut self, name: &'static str, hook: Hook<S, N>) -> Self {
        self.entries.push((name, hook));
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Hook<S, N>)> + '_ {
        self.entries.iter().copied()
    }
}

impl<S, N> Default for HookTable<S, N> {
    fn default() -> Self {
        Self::new()
    }
}

/// How one template is specialized.
///
/// Hooks for names the template does not declare are skipped. After all
/// hooks have run, [`Strategy::mutate`] applies whole-file changes such as
/// imports and renames.
pub trait Strategy: Sized {
    fn values(&self) -> HookTable<Self, ValueSpec> {
        HookTable::new()
    }

    fn types(&self) -> HookTable<Self, TypeSpec> {
        HookTable::new()
    }

    fn funcs(&self) -> HookTable<Self, FuncDecl> {
        HookTable::new()
    }

    fn mutate(&self, engine: &mut Engine) -> Result<(), MutateError>;
}

/// Owns a template while a strategy rewrites it
pub struct Engine {
    unit: TemplateUnit,
    index: DeclIndex,
}

impl Engine {
    pub fn new(unit: TemplateUnit) -> Self {
        let index = DeclIndex::build(&unit.file);
        Self { unit, index }
    }

    pub fn file(&self) -> &File {
        &self.unit.file
    }

    pub fn file_mut(&mut self) -> &mut File {
        &mut self.unit.file
    }

    pub fn index(&self) -> &DeclIndex {
        &self.index
    }

    /// Run every hook of `strategy`, then its whole-file step
    pub fn run<S: Strategy>(mut self, strategy: &S) -> Result<TemplateUnit, GenerateError> {
        let structure = |decl: &str| {
            let decl = decl.to_string();
            move |source| GenerateError::Structure { decl, source }
        };

        for (name, hook) in strategy.values().iter() {
            match self.index.value_mut(&mut self.unit.file, name) {
                Some(spec) => {
                    debug!(decl = name, "rewriting value");
                    hook(strategy, spec).map_err(structure(name))?;
                }
                None => debug!(decl = name, "no such value, skipped"),
            }
        }
        for (name, hook) in strategy.types().iter() {
            match self.index.type_mut(&mut self.unit.file, name) {
                Some(spec) => {
                    debug!(decl = name, "rewriting type");
                    hook(strategy, spec).map_err(structure(name))?;
                }
                None => debug!(decl = name, "no such type, skipped"),
            }
        }
        for (name, hook) in strategy.funcs().iter() {
            match self.index.func_mut(&mut self.unit.file, name) {
                Some(func) => {
                    debug!(decl = name, "rewriting function");
                    hook(strategy, func).map_err(structure(name))?;
                }
                None => debug!(decl = name, "no such function, skipped"),
            }
        }

        strategy.mutate(&mut self).map_err(structure("file"))?;
        Ok(self.unit)
    }

    /// Rename declarations and their references; see [`primitives::rename_all`]
    pub fn rename_all(&mut self, table: &RenameTable) -> usize {
        let count = primitives::rename_all(&mut self.unit.file, table);
        debug!(?table, count, "renamed declarations");
        count
    }

    /// Import `path` unless it is already imported.
    ///
    /// The new declaration goes after the existing imports and is placed
    /// at the package clause's position.
    pub fn add_import(&mut self, path: &str) -> bool {
        let file = &mut self.unit.file;
        if file.imports_path(path) {
            return false;
        }
        let pos = file.package.pos;
        file.imports.push(ImportDecl {
            import: Token::synthetic(TokenKind::Import, "import", "\n\n").at(pos),
            specs: Specs::Single(ImportSpec {
                alias: None,
                path: Token::synthetic(TokenKind::String, format!("\"{}\"", path), " ").at(pos),
                semi: None,
            }),
            semi: None,
        });
        debug!(path, "added import");
        true
    }
}

/// Parameter `index` of a signature
pub fn param(ty: &mut FuncType, index: usize) -> Result<&mut Field, MutateError> {
    ty.params
        .fields
        .get_mut(index)
        .ok_or_else(|| MutateError::missing(format!("parameter {}", index)))
}

/// Result list of a signature
pub fn results(ty: &mut FuncType) -> Result<&mut FieldList, MutateError> {
    ty.results
        .as_mut()
        .ok_or_else(|| MutateError::missing("results"))
}

/// Result `index` of a signature
pub fn result(ty: &mut FuncType, index: usize) -> Result<&mut Field, MutateError> {
    results(ty)?
        .fields
        .get_mut(index)
        .ok_or_else(|| MutateError::missing(format!("result {}", index)))
}

/// First name of result `index`, for named results
pub fn result_name(ty: &FuncType, index: usize) -> Result<String, MutateError> {
    ty.results
        .as_ref()
        .and_then(|results| results.fields.get(index))
        .and_then(|field| field.names.first())
        .map(|name| name.name().to_string())
        .ok_or_else(|| MutateError::missing(format!("name of result {}", index)))
}

/// Signature of a field whose type is a function
pub fn func_type(field: &mut Field) -> Result<&mut FuncType, MutateError> {
    match &mut field.ty {
        Expr::Func(func) => Ok(func),
        _ => Err(MutateError::missing("function-typed field")),
    }
}

/// Fields of a struct type declaration
pub fn struct_fields(spec: &mut TypeSpec) -> Result<&mut FieldList, MutateError> {
    match &mut spec.ty {
        Expr::Struct(st) => Ok(&mut st.fields),
        _ => Err(MutateError::missing(format!("struct type {}", spec.name))),
    }
}

/// Body of a function declaration
pub fn body(func: &mut FuncDecl) -> Result<&mut Group, MutateError> {
    func.body
        .as_mut()
        .ok_or_else(|| MutateError::missing(format!("body of {}", func.name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::render_file_unchecked;

    const SOURCE: &str = "package tmpl\n\nimport \"sync\"\n\ntype Box struct {\n\tv interface{}\n}\n\nfunc Put(b *Box, v interface{}) {}\n";

    struct Boxes {
        elem: TypeArgument,
        visited: std::cell::RefCell<Vec<&'static str>>,
    }

    impl Boxes {
        fn new() -> Self {
            Self {
                elem: TypeArgument::parse("int").unwrap(),
                visited: Default::default(),
            }
        }

        fn box_type(&self, spec: &mut TypeSpec) -> Result<(), MutateError> {
            self.visited.borrow_mut().push("Box");
            primitives::replace_placeholders(spec, &self.elem).map(|_| ())
        }

        fn put(&self, func: &mut FuncDecl) -> Result<(), MutateError> {
            self.visited.borrow_mut().push("Put");
            primitives::replace_placeholders(param(&mut func.ty, 1)?, &self.elem).map(|_| ())
        }

        fn absent(&self, _func: &mut FuncDecl) -> Result<(), MutateError> {
            self.visited.borrow_mut().push("absent");
            Ok(())
        }
    }

    impl Strategy for Boxes {
        fn types(&self) -> HookTable<Self, TypeSpec> {
            HookTable::new().on("Box", Self::box_type)
        }

        fn funcs(&self) -> HookTable<Self, FuncDecl> {
            HookTable::new().on("Missing", Self::absent).on("Put", Self::put)
        }

        fn mutate(&self, engine: &mut Engine) -> Result<(), MutateError> {
            engine.add_import("sync");
            engine.add_import("fmt");
            engine.rename_all(&RenameTable::from([("Box", "IntBox")]));
            Ok(())
        }
    }

    fn unit(source: &str) -> TemplateUnit {
        TemplateUnit::parse("tmpl.go", source.to_string(), Some("out")).unwrap()
    }

    #[test]
    fn test_run_applies_hooks_and_mutate() {
        let strategy = Boxes::new();
        let unit = Engine::new(unit(SOURCE)).run(&strategy).unwrap();
        assert_eq!(*strategy.visited.borrow(), vec!["Box", "Put"]);
        let out = render_file_unchecked(&unit.file);
        assert_eq!(
            out,
            "package out\n\nimport \"sync\"\n\nimport \"fmt\"\n\ntype IntBox struct {\n\tv int\n}\n\nfunc Put(b *IntBox, v int) {}\n"
        );
    }

    #[test]
    fn test_structure_error_names_declaration() {
        let source = "package tmpl\n\ntype Box struct {\n\tv int\n}\n";
        let err = Engine::new(unit(source)).run(&Boxes::new()).unwrap_err();
        match err {
            GenerateError::Structure { decl, source } => {
                assert_eq!(decl, "Box");
                assert_eq!(source, MutateError::NoPlaceholder);
            }
            other => panic!("Expected structure error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_parameter() {
        let mut func = match parse_file("package p\nfunc f() {}\n").unwrap().decls.remove(0) {
            Decl::Func(func) => func,
            _ => unreachable!(),
        };
        assert!(matches!(param(&mut func.ty, 0), Err(MutateError::Missing { .. })));
        assert!(matches!(result(&mut func.ty, 0), Err(MutateError::Missing { .. })));
    }
}
