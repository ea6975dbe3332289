// ============================================================
// Layer 1 — Domain Layer
// ============================================================
// Plain Rust types that describe knowledge-tracing data and
// the ways it can be wrong. No Burn types in here.
//
//   feature.rs     — the five categorical input streams
//   interaction.rs — one learner's interaction history
//   error.rs       — SaintError, shared by every layer
//
// Reference: Rust Book §5 (Structs), §9 (Error Handling)

/// The five categorical input streams of the model
pub mod feature;

/// A single learner's aligned interaction sequence
pub mod interaction;

/// Error taxonomy for configuration, shape and index problems
pub mod error;
