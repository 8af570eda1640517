//! `sync/map`: a concurrent map with typed keys and values
//!
//! Targets the `unsafe.Pointer` layout of `sync/map.go` shipped up to Go
//! 1.19. Later releases store values in `atomic.Pointer[any]` and add
//! methods these hooks do not cover, so such templates are rejected.

use crate::mutate::primitives::{
    rename_nil_returns, replace_placeholders, split_key_value, substitute,
};
use crate::mutate::*;
use crate::parser::{FuncDecl, TypeSpec, ValueSpec};
use crate::GenerateError;

pub struct SyncMapStrategy {
    name: String,
    key: TypeArgument,
    value: TypeArgument,
    mutex: TypeArgument,
}

impl SyncMapStrategy {
    pub fn new(name: &str, key: TypeArgument, value: TypeArgument) -> Result<Self, GenerateError> {
        Ok(Self {
            name: name.to_string(),
            key,
            value,
            mutex: TypeArgument::parse("sync.Mutex")?,
        })
    }

    /// Build from a `map[K]V` type expression
    pub fn from_map_type(name: &str, expr: &str) -> Result<Self, GenerateError> {
        let (key, value) = TypeArgument::parse_pair(expr)?;
        Self::new(name, key, value)
    }

    fn expunged(&self, spec: &mut ValueSpec) -> Result<(), MutateError> {
        replace_placeholders(spec, &self.value)?;
        Ok(())
    }

    fn map_type(&self, spec: &mut TypeSpec) -> Result<(), MutateError> {
        // The template lives in package sync and embeds a bare `Mutex`.
        let lock = struct_fields(spec)?
            .fields
            .first_mut()
            .ok_or_else(|| MutateError::missing("lock field of Map"))?;
        substitute(&mut lock.ty, &self.mutex);
        replace_placeholders(spec, &self.key)?;
        Ok(())
    }

    fn read_only(&self, spec: &mut TypeSpec) -> Result<(), MutateError> {
        replace_placeholders(spec, &self.key)?;
        Ok(())
    }

    /// `entry` holds values behind an untyped pointer and must stay that way
    fn entry(&self, spec: &mut TypeSpec) -> Result<(), MutateError> {
        match replace_placeholders(spec, &self.value) {
            Err(MutateError::NoPlaceholder) => Ok(()),
            Ok(_) => Err(MutateError::Unsupported {
                what: "typed entry pointer (Go 1.20 or later)".to_string(),
            }),
            Err(e) => Err(e),
        }
    }

    fn load(&self, func: &mut FuncDecl) -> Result<(), MutateError> {
        replace_placeholders(&mut func.ty.params, &self.key)?;
        replace_placeholders(results(&mut func.ty)?, &self.value)?;
        let zero = result_name(&func.ty, 0)?;
        rename_nil_returns(body(func)?, &zero);
        Ok(())
    }

    /// Value everywhere, with `nil` results renamed to the first named result
    fn value_returning(&self, func: &mut FuncDecl) -> Result<(), MutateError> {
        replace_placeholders(func, &self.value)?;
        let zero = result_name(&func.ty, 0)?;
        rename_nil_returns(body(func)?, &zero);
        Ok(())
    }

    fn store(&self, func: &mut FuncDecl) -> Result<(), MutateError> {
        split_key_value(&mut func.ty.params, &self.key, &self.value)
    }

    fn load_or_store(&self, func: &mut FuncDecl) -> Result<(), MutateError> {
        split_key_value(&mut func.ty.params, &self.key, &self.value)?;
        replace_placeholders(results(&mut func.ty)?, &self.value)?;
        Ok(())
    }

    fn range(&self, func: &mut FuncDecl) -> Result<(), MutateError> {
        let callback = func_type(param(&mut func.ty, 0)?)?;
        split_key_value(&mut callback.params, &self.key, &self.value)
    }

    fn key_everywhere(&self, func: &mut FuncDecl) -> Result<(), MutateError> {
        replace_placeholders(func, &self.key)?;
        Ok(())
    }

    fn value_everywhere(&self, func: &mut FuncDecl) -> Result<(), MutateError> {
        replace_placeholders(func, &self.value)?;
        Ok(())
    }
}

impl Strategy for SyncMapStrategy {
    fn values(&self) -> HookTable<Self, ValueSpec> {
        HookTable::new().on("expunged", Self::expunged)
    }

    fn types(&self) -> HookTable<Self, TypeSpec> {
        HookTable::new()
            .on("Map", Self::map_type)
            .on("readOnly", Self::read_only)
            .on("entry", Self::entry)
    }

    fn funcs(&self) -> HookTable<Self, FuncDecl> {
        HookTable::new()
            .on("Load", Self::load)
            .on("load", Self::value_returning)
            .on("Store", Self::store)
            .on("LoadOrStore", Self::load_or_store)
            .on("tryLoadOrStore", Self::value_returning)
            .on("Range", Self::range)
            .on("Delete", Self::key_everywhere)
            .on("dirtyLocked", Self::key_everywhere)
            .on("newEntry", Self::value_everywhere)
            .on("tryStore", Self::value_everywhere)
            .on("storeLocked", Self::value_everywhere)
    }

    fn mutate(&self, engine: &mut Engine) -> Result<(), MutateError> {
        engine.add_import("sync");
        let suffix = title(&self.name);
        let mut table = RenameTable::new();
        table.insert("Map", self.name.as_str());
        for helper in ["entry", "readOnly", "expunged", "newEntry"] {
            table.insert(helper, format!("{}{}", helper, suffix));
        }
        engine.rename_all(&table);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::testing::specialize;

    const TEMPLATE: &str = r#"package sync

import (
	"sync/atomic"
	"unsafe"
)

type Map struct {
	mu Mutex

	read atomic.Value // readOnly

	dirty map[interface{}]*entry

	misses int
}

type readOnly struct {
	m       map[interface{}]*entry
	amended bool
}

var expunged = unsafe.Pointer(new(interface{}))

type entry struct {
	p unsafe.Pointer // *interface{}
}

func newEntry(i interface{}) *entry {
	return &entry{p: unsafe.Pointer(&i)}
}

func (m *Map) Load(key interface{}) (value interface{}, ok bool) {
	read, _ := m.read.Load().(readOnly)
	e, ok := read.m[key]
	if !ok {
		return nil, false
	}
	return e.load()
}

func (e *entry) load() (value interface{}, ok bool) {
	p := atomic.LoadPointer(&e.p)
	if p == nil || p == expunged {
		return nil, false
	}
	return *(*interface{})(p), true
}

func (m *Map) Store(key, value interface{}) {
	m.dirty[key] = newEntry(value)
}

func (m *Map) Range(f func(key, value interface{}) bool) {
	read, _ := m.read.Load().(readOnly)
	for k, e := range read.m {
		v, ok := e.load()
		if !ok {
			continue
		}
		if !f(k, v) {
			break
		}
	}
}

func (m *Map) dirtyLocked() {
	m.dirty = make(map[interface{}]*entry, len(m.dirty))
}
"#;

    fn strategy(expr: &str) -> SyncMapStrategy {
        SyncMapStrategy::from_map_type("UserCache", expr).unwrap()
    }

    #[test]
    fn test_typed_map() {
        let out = specialize(&strategy("map[string]int"), TEMPLATE).unwrap();

        assert!(out.contains("type UserCache struct {\n\tmu sync.Mutex\n"));
        assert!(out.contains("dirty map[string]*entryUserCache"));
        assert!(out.contains("type readOnlyUserCache struct {\n\tm       map[string]*entryUserCache"));
        assert!(out.contains("var expungedUserCache = unsafe.Pointer(new(int))"));
        assert!(out.contains("func newEntryUserCache(i int) *entryUserCache {"));
        assert!(out.contains("func (m *UserCache) Load(key string) (value int, ok bool) {"));
        assert!(out.contains("read, _ := m.read.Load().(readOnlyUserCache)"));
        assert!(out.contains("func (e *entryUserCache) load() (value int, ok bool) {"));
        assert!(out.contains("p == nil || p == expungedUserCache"));
        assert!(out.contains("return *(*int)(p), true"));
        assert!(out.contains("func (m *UserCache) Store(key string, value int) {"));
        assert!(out.contains("func (m *UserCache) Range(f func(key string, value int) bool) {"));
        assert!(out.contains("make(map[string]*entryUserCache, len(m.dirty))"));
        assert!(out.contains("\"unsafe\"\n)\n\nimport \"sync\"\n"));
        assert_eq!(out.matches("interface{}").count(), 1, "only the comment keeps it");
        assert!(!out.contains("return nil"));
    }

    #[test]
    fn test_nil_results_become_zero_values() {
        let out = specialize(&strategy("map[string]int"), TEMPLATE).unwrap();
        assert_eq!(out.matches("return value, false").count(), 2);
    }

    #[test]
    fn test_equal_key_and_value_share_a_field() {
        let out = specialize(&strategy("map[int]int"), TEMPLATE).unwrap();
        assert!(out.contains("func (m *UserCache) Store(key, value int) {"));
        assert!(out.contains("Range(f func(key, value int) bool)"));
    }

    #[test]
    fn test_missing_lock_field_is_a_structure_error() {
        let template = "package sync\n\ntype Map struct{}\n";
        let err = specialize(&strategy("map[string]int"), template).unwrap_err();
        assert!(matches!(err, GenerateError::Structure { ref decl, .. } if decl == "Map"));
    }

    #[test]
    fn test_atomic_pointer_entry_is_rejected() {
        let template = TEMPLATE.replace(
            "p unsafe.Pointer // *interface{}",
            "p atomic.Pointer[any]",
        );
        let err = specialize(&strategy("map[string]int"), &template).unwrap_err();
        assert!(matches!(
            err,
            GenerateError::Structure { ref decl, source: MutateError::Unsupported { .. } } if decl == "entry"
        ));
    }
}
