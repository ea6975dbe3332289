// ============================================================
// Layer 3 — Infrastructure Layer
// ============================================================
// File-system concerns around the model. Errors here are
// anyhow errors with context, since they end up in front of a
// person running a job rather than being matched on.
//
//   config_store.rs — SaintPlusConfig <-> JSON on disk
//
// Reference: Rust Book §9 (Error Handling with anyhow)

/// Hyperparameter persistence
pub mod config_store;
