//! Built-in templates and how they are found and loaded
//!
//! Templates are ordinary Go sources written against `interface{}`. Four
//! of them ship with the Go toolchain; the fifth comes from the module
//! cache.
//!
//! | selector         | source                                                 |
//! |------------------|--------------------------------------------------------|
//! | `sync/map`       | `$GOROOT/src/sync/map.go`                              |
//! | `container/list` | `$GOROOT/src/container/list/list.go`                   |
//! | `container/ring` | `$GOROOT/src/container/ring/ring.go`                   |
//! | `container/heap` | `$GOROOT/src/container/heap/heap.go`                   |
//! | `singleflight`   | `$GOPATH/pkg/mod/golang.org/x/sync@<ver>/singleflight` |

mod loader;
mod registry;
mod unit;

pub use loader::{highest_version, TemplateLocator};
pub use registry::{LoaderError, TemplateKind, SINGLEFLIGHT_MODULE};
pub use unit::TemplateUnit;
