//! # wals-web
//!
//! Web front end over the WALS database of languages, genera, families,
//! typological features and bibliographic sources.
//!
//! ## Languoid autocomplete
//!
//! The select box on the site asks `/languoids` for suggestions. A query is
//! answered by a cascade over four sources, each asked only for the slots
//! the previous ones left open:
//!
//! ```text
//!                    ┌──────────────┐
//!                    │  ?q=text     │        ?id=w-eng ──► 302 to the languoid
//!                    └──────┬───────┘
//!                           │ quota = 20
//!                           ▼
//!              ┌─────────────────────────┐
//!              │ A  language names       │  ordered by ascii name
//!              └────────────┬────────────┘
//!                           │ quota -= found
//!                           ▼
//!              ┌─────────────────────────┐
//!              │ B  language identifiers │  ordered by language ascii name,
//!              │    (ISO, Glottolog, …)  │  languages from A dropped
//!              └────────────┬────────────┘
//!                           │ quota -= accepted
//!                           ▼
//!              ┌─────────────────────────┐
//!              │ C  genus names          │  ordered by name
//!              └────────────┬────────────┘
//!                           │ quota -= found
//!                           ▼
//!              ┌─────────────────────────┐
//!              │ D  family names         │  ordered by name
//!              └────────────┬────────────┘
//!                           ▼
//!              { results: [{id, text}], more: false }
//! ```
//!
//! ## Module Overview
//!
//! - [`config`] - Environment-based configuration
//! - [`models`] - Catalog entities and request/response types
//! - [`catalog`] - In-memory catalog loaded from JSON, and its lookups
//! - [`search::cascade`] - The quota-bounded cascading resolver
//! - [`search::format`] - Display records for suggestions
//! - [`feeds`] - RSS to Atom conversion for the blog feed proxy
//! - [`blog`] - Blog URLs for feeds and datapoint discussions
//! - [`export::matrix`] - CSV language × feature matrix
//! - [`olac`] - OAI-PMH / OLAC archive of the bibliography
//! - [`api`] - Axum HTTP handlers
//! - [`state`] - Shared application state

pub mod api;
pub mod blog;
pub mod catalog;
pub mod config;
pub mod export;
pub mod feeds;
pub mod models;
pub mod olac;
pub mod search;
pub mod state;
