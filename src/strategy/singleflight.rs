//! `singleflight`: duplicate call suppression keyed by a typed key
//!
//! The template keys calls by `string`. Every `string` key, and every map
//! key in the functions that index the call table, becomes `K`. Results
//! become `V`.

use crate::mutate::primitives::{replace_map_keys, replace_named_type, replace_placeholders};
use crate::mutate::*;
use crate::parser::{FuncDecl, FuncType, TypeSpec};
use crate::template::SINGLEFLIGHT_MODULE;
use crate::GenerateError;

pub struct SingleflightStrategy {
    name: String,
    key: TypeArgument,
    value: TypeArgument,
}

impl SingleflightStrategy {
    pub fn new(name: &str, key: TypeArgument, value: TypeArgument) -> Self {
        Self {
            name: name.to_string(),
            key,
            value,
        }
    }

    /// Build from a `map[K]V` type expression
    pub fn from_map_type(name: &str, expr: &str) -> Result<Self, GenerateError> {
        let (key, value) = TypeArgument::parse_pair(expr)?;
        Ok(Self::new(name, key, value))
    }

    fn holds_value(&self, spec: &mut TypeSpec) -> Result<(), MutateError> {
        replace_placeholders(spec, &self.value)?;
        Ok(())
    }

    fn group(&self, spec: &mut TypeSpec) -> Result<(), MutateError> {
        match replace_map_keys(struct_fields(spec)?, &self.key) {
            0 => Err(MutateError::missing("call table of Group")),
            _ => Ok(()),
        }
    }

    /// Key parameter `key` and callback parameter `key + 1`
    fn key_and_callback(&self, ty: &mut FuncType, key: usize) -> Result<(), MutateError> {
        replace_named_type(param(ty, key)?, "string", &self.key)?;
        let callback = func_type(param(ty, key + 1)?)?;
        replace_placeholders(result(callback, 0)?, &self.value)?;
        Ok(())
    }

    fn call_table_keys(&self, func: &mut FuncDecl) -> Result<(), MutateError> {
        match replace_map_keys(func, &self.key) {
            0 => Err(MutateError::missing(format!("call table in {}", func.name))),
            _ => Ok(()),
        }
    }

    fn run(&self, func: &mut FuncDecl) -> Result<(), MutateError> {
        // Map keys first: the type arguments themselves may contain maps.
        self.call_table_keys(func)?;
        replace_placeholders(results(&mut func.ty)?, &self.value)?;
        self.key_and_callback(&mut func.ty, 0)
    }

    fn run_chan(&self, func: &mut FuncDecl) -> Result<(), MutateError> {
        self.call_table_keys(func)?;
        self.key_and_callback(&mut func.ty, 0)
    }

    fn do_call(&self, func: &mut FuncDecl) -> Result<(), MutateError> {
        self.key_and_callback(&mut func.ty, 1)
    }

    fn forget(&self, func: &mut FuncDecl) -> Result<(), MutateError> {
        replace_named_type(param(&mut func.ty, 0)?, "string", &self.key)?;
        Ok(())
    }
}

impl Strategy for SingleflightStrategy {
    fn types(&self) -> HookTable<Self, TypeSpec> {
        HookTable::new()
            .on("call", Self::holds_value)
            .on("Group", Self::group)
            .on("Result", Self::holds_value)
    }

    fn funcs(&self) -> HookTable<Self, FuncDecl> {
        HookTable::new()
            .on("Do", Self::run)
            .on("DoChan", Self::run_chan)
            .on("doCall", Self::do_call)
            .on("Forget", Self::forget)
    }

    fn mutate(&self, engine: &mut Engine) -> Result<(), MutateError> {
        engine.add_import(SINGLEFLIGHT_MODULE);
        let suffix = title(&self.name);
        engine.rename_all(&RenameTable::from([
            ("Group", self.name.clone()),
            ("call", format!("call{}", suffix)),
            ("Result", format!("Result{}", suffix)),
        ]));
        Ok(())
    }
}
