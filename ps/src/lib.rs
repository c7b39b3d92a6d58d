//! PlanStore - file-backed key-value store for planner state
//!
//! Stores one JSON document per key so that each collection can be loaded,
//! saved, and removed independently (last-write-wins per key).
//!
//! # Layout
//!
//! ```text
//! .planstore/
//! ├── topPriorities.json
//! ├── brainDump.json
//! └── timeBlocks.json
//! ```
//!
//! # Example
//!
//! ```ignore
//! use planstore::Store;
//!
//! let store = Store::open(".planstore")?;
//! store.set("topPriorities", r#"["a","b","c"]"#)?;
//! let raw = store.get("topPriorities")?;
//! store.remove("topPriorities")?;
//! ```

pub mod cli;
pub mod config;
mod store;

pub use store::Store;
