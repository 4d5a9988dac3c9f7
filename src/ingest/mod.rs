//! Loading movies into Weaviate: class schema management and batch import.

pub mod batch;
pub mod schema;
