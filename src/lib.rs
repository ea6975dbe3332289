// ============================================================
// saint-plus — SAINT+ knowledge tracing on Burn
// ============================================================
// Predicts, for every interaction in a learner's history,
// the probability that the learner answers correctly.
//
// Layers (each only depends on the ones above it):
//
//   domain — plain types: features, sequences, errors
//   ml     — Burn modules: embeddings, attention, model
//   infra  — config persistence
//
// Data pipelines, the training loop and checkpointing are
// left to the application embedding this crate. It logs via
// `tracing` and installs no subscriber of its own.

pub mod domain;
pub mod ml;
pub mod infra;

pub use domain::error::{SaintError, SaintResult};
pub use domain::feature::{Feature, VocabSizes};
pub use domain::interaction::InteractionSequence;
pub use infra::config_store::ConfigStore;
pub use ml::input::SaintInput;
pub use ml::model::{SaintPlus, SaintPlusConfig};
