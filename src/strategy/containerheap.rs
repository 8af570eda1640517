//! `container/heap`: heap operations over one element type
//!
//! The heap has no container type of its own, so the requested name is not
//! used. Its `Interface` contract is renamed after the element type
//! instead: `*pkg.Task` gives `TaskInterface`.

use crate::mutate::primitives::replace_placeholders;
use crate::mutate::*;
use crate::parser::{Expr, FuncDecl, TypeSpec};

pub struct HeapStrategy {
    elem: TypeArgument,
}

impl HeapStrategy {
    pub fn new(elem: TypeArgument) -> Self {
        Self { elem }
    }

    fn contract_name(&self) -> String {
        format!("{}Interface", self.elem.stem())
    }

    /// `Push(x)` takes the element, `Pop()` returns it
    fn interface(&self, spec: &mut TypeSpec) -> Result<(), MutateError> {
        spec.name.set_name(self.contract_name());
        let Expr::Interface(contract) = &mut spec.ty else {
            return Err(MutateError::missing("interface type Interface"));
        };
        for method in &mut contract.methods.fields {
            let Expr::Func(signature) = &mut method.ty else {
                continue;
            };
            let slot = if signature.params.fields.is_empty() {
                result(signature, 0)?
            } else {
                param(signature, 0)?
            };
            replace_placeholders(slot, &self.elem)?;
        }
        Ok(())
    }

    fn push(&self, func: &mut FuncDecl) -> Result<(), MutateError> {
        replace_placeholders(param(&mut func.ty, 1)?, &self.elem)?;
        Ok(())
    }

    fn returns_element(&self, func: &mut FuncDecl) -> Result<(), MutateError> {
        replace_placeholders(result(&mut func.ty, 0)?, &self.elem)?;
        Ok(())
    }
}

impl Strategy for HeapStrategy {
    fn types(&self) -> HookTable<Self, TypeSpec> {
        HookTable::new().on("Interface", Self::interface)
    }

    fn funcs(&self) -> HookTable<Self, FuncDecl> {
        HookTable::new()
            .on("Push", Self::push)
            .on("Pop", Self::returns_element)
            .on("Remove", Self::returns_element)
    }

    fn mutate(&self, engine: &mut Engine) -> Result<(), MutateError> {
        engine.rename_all(&RenameTable::from([("Interface", self.contract_name())]));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::testing::specialize;

    const TEMPLATE: &str = r#"package heap

import "sort"

type Interface interface {
	sort.Interface
	Push(x interface{}) // add x as element Len()
	Pop() interface{}   // remove and return element Len() - 1.
}

func Init(h Interface) {
	n := h.Len()
	for i := n/2 - 1; i >= 0; i-- {
		down(h, i, n)
	}
}

func Push(h Interface, x interface{}) {
	h.Push(x)
	up(h, h.Len()-1)
}

func Pop(h Interface) interface{} {
	n := h.Len() - 1
	h.Swap(0, n)
	down(h, 0, n)
	return h.Pop()
}

func Remove(h Interface, i int) interface{} {
	return h.Pop()
}

func up(h Interface, j int) {}
"#;

    #[test]
    fn test_heap_of_tasks() {
        let strategy = HeapStrategy::new(TypeArgument::parse("*pkg.Task").unwrap());
        let out = specialize(&strategy, TEMPLATE).unwrap();

        assert!(out.contains("type TaskInterface interface {\n\tsort.Interface\n"));
        assert!(out.contains("\tPush(x *pkg.Task) // add x as element Len()\n"));
        assert!(out.contains("\tPop() *pkg.Task   // remove and return element Len() - 1.\n"));
        assert!(out.contains("func Init(h TaskInterface) {"));
        assert!(out.contains("func Push(h TaskInterface, x *pkg.Task) {"));
        assert!(out.contains("func Pop(h TaskInterface) *pkg.Task {"));
        assert!(out.contains("func Remove(h TaskInterface, i int) *pkg.Task {"));
        assert!(out.contains("func up(h TaskInterface, j int) {}"));
        assert!(!out.contains("interface{}"));
    }

    #[test]
    fn test_push_without_element_parameter() {
        let template = "package heap\n\nfunc Push(h Interface) {}\n";
        let strategy = HeapStrategy::new(TypeArgument::parse("int").unwrap());
        let err = specialize(&strategy, template).unwrap_err();
        assert!(matches!(
            err,
            crate::GenerateError::Structure { ref decl, source: MutateError::Missing { .. } } if decl == "Push"
        ));
    }
}
