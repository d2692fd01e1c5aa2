#![forbid(unsafe_code)]

//! Variable store and dependency graph for signvar.
//!
//! A [`VariableStore`] owns named variables whose values are format strings
//! embedding other variables (`Hello %name%!`). Each variable has a default
//! entry and optional per-viewer entries; the store keeps the reference graph
//! between entries, recomputes the minimum set of dependents on every change,
//! animates entries with tickers, and lays the results out on bound surface
//! chains through a [`SurfaceBackend`](signvar_layout::SurfaceBackend).
//!
//! # Example
//!
//! ```ignore
//! let mut store = VariableStore::new(backend);
//! store.set_value("name", "World");
//! store.set_value("greeting", "Hello %name%!");
//! assert_eq!(store.text("greeting", Some("alice")).as_deref(), Some("Hello World!"));
//! ```

pub mod config;
mod display;
pub mod entry;
pub mod error;
pub mod event;
mod graph;
mod persist;
pub mod record;
pub mod store;
pub mod ticker;
pub mod value;
pub mod variable;

pub use config::StoreConfig;
pub use entry::{Entry, EntryId, TickerSlot};
pub use error::{Result, StoreError};
pub use event::VariableEvent;
pub use record::{VariableRecord, ViewerRecord};
pub use store::{EntryKey, VariableStore};
pub use ticker::{DefaultTicker, GroupTicker, ViewerTicker};
pub use value::{FormatChanges, FormattedValue, Token, detect_changes};
pub use variable::{VarId, Variable};
