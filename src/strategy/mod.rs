//! Specialization strategies, one per built-in template
//!
//! Each strategy lists the declarations it rewrites and what it does to
//! them, then renames the public API after the requested type name.

mod containerheap;
mod containerlist;
mod containerring;
mod singleflight;
mod syncmap;

pub use containerheap::HeapStrategy;
pub use containerlist::ListStrategy;
pub use containerring::RingStrategy;
pub use singleflight::SingleflightStrategy;
pub use syncmap::SyncMapStrategy;

use crate::mutate::{Engine, TypeArgument};
use crate::template::{TemplateKind, TemplateUnit};
use crate::GenerateError;

/// The strategy for one template kind, with its type arguments parsed
pub enum TemplateStrategy {
    SyncMap(SyncMapStrategy),
    List(ListStrategy),
    Ring(RingStrategy),
    Heap(HeapStrategy),
    Singleflight(SingleflightStrategy),
}

impl TemplateStrategy {
    /// Parse `expr` as the type arguments `kind` expects: `map[K]V` for
    /// `sync/map` and `singleflight`, a single type otherwise.
    pub fn new(kind: TemplateKind, name: &str, expr: &str) -> Result<Self, GenerateError> {
        Ok(match kind {
            TemplateKind::SyncMap => Self::SyncMap(SyncMapStrategy::from_map_type(name, expr)?),
            TemplateKind::ContainerList => Self::List(ListStrategy::new(name, TypeArgument::parse(expr)?)),
            TemplateKind::ContainerRing => Self::Ring(RingStrategy::new(name, TypeArgument::parse(expr)?)),
            TemplateKind::ContainerHeap => Self::Heap(HeapStrategy::new(TypeArgument::parse(expr)?)),
            TemplateKind::Singleflight => {
                Self::Singleflight(SingleflightStrategy::from_map_type(name, expr)?)
            }
        })
    }

    /// Rewrite `unit` in place of the template's placeholders
    pub fn apply(&self, unit: TemplateUnit) -> Result<TemplateUnit, GenerateError> {
        let engine = Engine::new(unit);
        match self {
            Self::SyncMap(strategy) => engine.run(strategy),
            Self::List(strategy) => engine.run(strategy),
            Self::Ring(strategy) => engine.run(strategy),
            Self::Heap(strategy) => engine.run(strategy),
            Self::Singleflight(strategy) => engine.run(strategy),
        }
    }
}
