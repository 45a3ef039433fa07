//! In-crate test scaffolding.
//!
//! [`MemoryApi`] implements the full [`ApiClient`](crate::api::ApiClient)
//! contract against in-memory collections, with per-method call counting and
//! one-shot failure injection. The round-trip test suites run against it,
//! and `riskboard dashboard --demo` uses the seeded variant so the TUI works
//! without a backend.

pub mod memory;

pub use memory::MemoryApi;
