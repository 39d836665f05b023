// =============================================================================
// CRATE-LEVEL QUALITY LINTS (following Tokio/Serde standards)
// =============================================================================
#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]
#![warn(unreachable_pub)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
// =============================================================================
// CLIPPY CONFIGURATION
// =============================================================================
#![allow(clippy::doc_markdown)] // Operator tokens in docs - `$and` etc. everywhere
#![allow(clippy::missing_errors_doc)] // # Errors sections - doc-heavy
#![allow(clippy::module_name_repetitions)] // Type names matching module - acceptable
#![allow(clippy::return_self_not_must_use)] // Builder pattern methods return Self by design
#![allow(clippy::must_use_candidate)] // Query methods - bool/Vec results are obvious

//! # opstrip - Operator Injection Guard for Document Queries
//!
//! Strips MongoDB-style operator keys (`$where`, `$regex`, `$inc`, ...) from
//! untrusted documents before they are merged into a query, unless the
//! operator is explicitly whitelisted.
//!
//! ## Quick Start
//!
//! ```
//! # use opstrip::prelude::*;
//! // Allow logical operators in query filters, nothing else
//! let sanitizer = Sanitizer::new(&Permissions::new().grant("query", query::LOGICAL)).unwrap();
//!
//! let clean = sanitizer
//!     .filter_str(r#"{"$or": [{"name": {"$where": "sleep(1000)"}}]}"#, None)
//!     .unwrap();
//! assert_eq!(clean, r#"{"$or":[{"name":{}}]}"#);
//! ```
//!
//! ## Operator Groups
//!
//! | Group | Categories (bit order) |
//! |-------|------------------------|
//! | `query` | comparison, logical, element, evaluation, geospatial, array, comment, modifiers, sort |
//! | `update` | fields, operators, modifiers, bitwise, isolation |
//! | `pipeline` | stage, boolean, set, comparison, arithmetic, string, text, array, variable, literal, date, conditional, accumulators |
//! | `projection` | projection |
//!
//! Bit constants live in [`bits`]; each group also has an `ALL` mask.
//!
//! ## Restricting to One Group
//!
//! ```
//! # use opstrip::prelude::*;
//! let sanitizer = Sanitizer::new(
//!     &Permissions::new().grant("query", query::ALL).grant("update", update::ALL),
//! )
//! .unwrap();
//!
//! // `$inc` is an update operator: stripped when only query permissions apply
//! let out = sanitizer.filter_str(r#"{"$inc": {"quantity": -2}}"#, Some("query")).unwrap();
//! assert_eq!(out, "{}");
//! ```
//!
//! ## Diagnostics
//!
//! Stripped keys are reported as `tracing` debug events and dropped array
//! elements as trace events. The crate never installs a subscriber.

mod catalog;
pub mod constants;
mod error;
mod permission;
mod resolver;
mod sanitize;

pub use catalog::{Catalog, CategoryDef, GroupDef, bits};
pub use error::{Error, Result};
pub use permission::{PermissionSet, Permissions, resolve};
pub use resolver::GroupResolver;
pub use sanitize::{
    Sanitizer, is_container, is_empty_container, is_falsy, is_mapping, is_operator_token,
    is_sequence,
};

/// Re-export of `serde_json`: the document type sanitizers operate on.
///
/// Objects keep insertion order, so filtered documents list their surviving
/// keys in the order they arrived.
///
/// # Example
///
/// ```
/// use opstrip::{Permissions, Sanitizer, json};
///
/// let doc = json::json!({"age": {"$gt": 18}, "name": "x"});
/// let doc = Sanitizer::new(&Permissions::new()).unwrap().filter(doc, None).unwrap();
/// assert_eq!(doc, json::json!({"age": {}, "name": "x"}));
/// ```
pub use serde_json as json;

/// Prelude module for convenient imports.
///
/// ```
/// use opstrip::prelude::*;
/// let sanitizer = Sanitizer::new(&Permissions::new().grant_all("projection")).unwrap();
/// assert!(sanitizer.allowed("projection", "slice"));
/// ```
pub mod prelude {
    pub use crate::bits::{pipeline, projection, query, update};
    pub use crate::{Catalog, Error, GroupResolver, PermissionSet, Permissions, Sanitizer, json};
}


// ============================================================================
// API Contract Tests (compile-time assertions)
// ============================================================================
