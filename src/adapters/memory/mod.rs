//! In-memory adapters - Lock-guarded implementations of the repository ports.

mod okr_store;

pub use okr_store::InMemoryOkrStore;
