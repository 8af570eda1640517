//! Name lookup for top-level declarations

use std::collections::HashMap;

use super::ast::{Decl, File, FuncDecl, TypeSpec, ValueSpec};

/// Index of top-level value specs, type specs and functions by name.
///
/// Entries are positions into [`File::decls`], so the index stays valid
/// while declarations are edited in place. When a name is declared twice
/// the first declaration wins.
#[derive(Debug, Clone, Default)]
pub struct DeclIndex {
    values: HashMap<String, (usize, usize)>,
    types: HashMap<String, (usize, usize)>,
    funcs: HashMap<String, usize>,
}

impl DeclIndex {
    pub fn build(file: &File) -> Self {
        let mut index = Self::default();
        for (i, decl) in file.decls.iter().enumerate() {
            match decl {
                Decl::Value(gen) => {
                    for (j, spec) in gen.specs.iter().enumerate() {
                        for name in &spec.names {
                            index.values.entry(name.name().to_string()).or_insert((i, j));
                        }
                    }
                }
                Decl::Type(gen) => {
                    for (j, spec) in gen.specs.iter().enumerate() {
                        index.types.entry(spec.name.name().to_string()).or_insert((i, j));
                    }
                }
                Decl::Func(func) => {
                    index.funcs.entry(func.name.name().to_string()).or_insert(i);
                }
            }
        }
        index
    }

    pub fn has_value(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn has_type(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn has_func(&self, name: &str) -> bool {
        self.funcs.contains_key(name)
    }

    pub fn value_mut<'f>(&self, file: &'f mut File, name: &str) -> Option<&'f mut ValueSpec> {
        let &(decl, spec) = self.values.get(name)?;
        match file.decls.get_mut(decl)? {
            Decl::Value(gen) => gen.specs.get_mut(spec),
            _ => None,
        }
    }

    pub fn type_mut<'f>(&self, file: &'f mut File, name: &str) -> Option<&'f mut TypeSpec> {
        let &(decl, spec) = self.types.get(name)?;
        match file.decls.get_mut(decl)? {
            Decl::Type(gen) => gen.specs.get_mut(spec),
            _ => None,
        }
    }

    pub fn func_mut<'f>(&self, file: &'f mut File, name: &str) -> Option<&'f mut FuncDecl> {
        let &decl = self.funcs.get(name)?;
        match file.decls.get_mut(decl)? {
            Decl::Func(func) => Some(func),
            _ => None,
        }
    }

    /// Number of indexed names across all three kinds
    pub fn len(&self) -> usize {
        self.values.len() + self.types.len() + self.funcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
