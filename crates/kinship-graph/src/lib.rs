//! kinship-graph: Neo4j client for the family tree.
//!
//! This crate is the only place that speaks Cypher. Every read and write of
//! Person nodes, their CHILD_OF / SPOUSE_OF edges, and the Schema singleton
//! goes through [`GraphStore`], implemented by [`GraphClient`] against a live
//! database and by `mock::MockGraphStore` in memory for tests.

pub mod client;
pub mod discovery;
mod impl_graph_store;
pub mod mutations;
pub mod queries;
pub mod store;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use client::{GraphClient, GraphConfig, GraphError};
pub use discovery::{discover_database, DatabaseTarget};
pub use store::GraphStore;
