//! An in-memory quad store.
//!
//! Quads are (subject, predicate, object, graph) tuples. Terms are interned
//! into a reference-counted [`TermPool`] and every graph indexes its triples
//! three times (SPO, POS, OSP) so that any pattern of bound and wildcard
//! terms is answered through the ordering whose bound keys come first.
//!
//! ```
//! use quadstore::{QuadStore, Value};
//!
//! let mut store = QuadStore::new();
//! store.add("alice", "knows", "bob", "people");
//! store.add("alice", "age", &Value::Int(42), "people");
//!
//! let mut objects: Vec<String> = store
//!     .find_objects("alice", "*", "*")
//!     .iter()
//!     .map(|o| o.to_string())
//!     .collect();
//! objects.sort();
//! assert_eq!(objects, vec!["42", "bob"]);
//! assert!(store.every_with("alice", "*", "*", "*", |q| q.graph == "people"));
//! ```

extern crate derive_builder;

pub mod config;
pub mod errors;
pub mod index;
pub mod pool;
mod query;
#[cfg(feature = "oxigraph")]
pub mod rdf;
pub mod store;
pub mod term;

pub use config::{Config, LiteralMode};
pub use errors::StoreError;
pub use index::{IndexOrder, TripleIndex};
pub use pool::TermPool;
#[cfg(feature = "oxigraph")]
pub use rdf::LoadReport;
pub use store::{Hook, QuadStore};
pub use term::{Object, ObjectRef, Position, Quad, QuadRef, TermId, Value, WILDCARD};
