//! `container/list`: a doubly linked list of one element type

use crate::mutate::primitives::replace_placeholders;
use crate::mutate::*;
use crate::parser::{FuncDecl, TypeSpec};

pub struct ListStrategy {
    name: String,
    elem: TypeArgument,
}

impl ListStrategy {
    pub fn new(name: &str, elem: TypeArgument) -> Self {
        Self {
            name: name.to_string(),
            elem,
        }
    }

    fn element(&self, spec: &mut TypeSpec) -> Result<(), MutateError> {
        replace_placeholders(spec, &self.elem)?;
        Ok(())
    }

    /// The inserted value is always the first parameter
    fn first_param(&self, func: &mut FuncDecl) -> Result<(), MutateError> {
        replace_placeholders(param(&mut func.ty, 0)?, &self.elem)?;
        Ok(())
    }

    fn remove(&self, func: &mut FuncDecl) -> Result<(), MutateError> {
        replace_placeholders(result(&mut func.ty, 0)?, &self.elem)?;
        Ok(())
    }
}

impl Strategy for ListStrategy {
    fn types(&self) -> HookTable<Self, TypeSpec> {
        HookTable::new().on("Element", Self::element)
    }

    fn funcs(&self) -> HookTable<Self, FuncDecl> {
        HookTable::new()
            .on("insertValue", Self::first_param)
            .on("Remove", Self::remove)
            .on("PushFront", Self::first_param)
            .on("PushBack", Self::first_param)
            .on("InsertBefore", Self::first_param)
            .on("InsertAfter", Self::first_param)
    }

    fn mutate(&self, engine: &mut Engine) -> Result<(), MutateError> {
        let name = title(&self.name);
        engine.rename_all(&RenameTable::from([
            ("Element", format!("{}Element", name)),
            ("List", format!("{}List", name)),
            ("New", format!("New{}", name)),
        ]));
        Ok(())
    }
}
