//! # moviate
//!
//! A small movie search web application. Every search is forwarded as a
//! GraphQL query to a hosted Weaviate instance, which does all of the
//! ranking; this crate composes the queries and renders the results.
//!
//! ```text
//!   browser ──► /search ──┬─ filter   ─► where Or(Like *text*)
//!                         ├─ semantic ─► nearText
//!                         ├─ keyword  ─► bm25 (title^3, ...)
//!                         └─ hybrid   ─► hybrid(alpha)
//!
//!   browser ──► /movie/{id} ─► where movie_id = id ─► nearObject(_additional.id)
//! ```
//!
//! ## Module Overview
//!
//! - [`config`] - Environment-based configuration for the server and Weaviate
//! - [`models`] - `Movie` records and search request parameters
//! - [`search::graphql`] - Builder for `Get` queries
//! - [`search::client`] - GraphQL transport and response decoding
//! - [`search::movies`] - The movie queries (keyword, filter, semantic, hybrid, by id, recommendations)
//! - [`api`] - Axum handlers for the search and detail pages
//! - [`render`] - Embedded Tera templates
//! - [`ingest`] - Class schema creation and batch import
//! - [`state`] - Shared, read-only application state

pub mod api;
pub mod config;
pub mod ingest;
pub mod models;
pub mod render;
pub mod search;
pub mod state;
