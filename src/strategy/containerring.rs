//! `container/ring`: a circular list of one element type

use crate::mutate::primitives::replace_placeholders;
use crate::mutate::*;
use crate::parser::{FuncDecl, TypeSpec};

pub struct RingStrategy {
    name: String,
    elem: TypeArgument,
}

impl RingStrategy {
    pub fn new(name: &str, elem: TypeArgument) -> Self {
        Self {
            name: name.to_string(),
            elem,
        }
    }

    fn ring(&self, spec: &mut TypeSpec) -> Result<(), MutateError> {
        replace_placeholders(spec, &self.elem)?;
        Ok(())
    }

    fn each(&self, func: &mut FuncDecl) -> Result<(), MutateError> {
        let callback = func_type(param(&mut func.ty, 0)?)?;
        replace_placeholders(param(callback, 0)?, &self.elem)?;
        Ok(())
    }
}

impl Strategy for RingStrategy {
    fn types(&self) -> HookTable<Self, TypeSpec> {
        HookTable::new().on("Ring", Self::ring)
    }

    fn funcs(&self) -> HookTable<Self, FuncDecl> {
        HookTable::new().on("Do", Self::each)
    }

    fn mutate(&self, engine: &mut Engine) -> Result<(), MutateError> {
        engine.rename_all(&RenameTable::from([(
            "Ring",
            format!("{}Ring", title(&self.name)),
        )]));
        Ok(())
    }
}
