// ============================================================
// Layer 1 — Feature Streams
// ============================================================
// Every interaction is described by five categorical ids.
// The first two feed the encoder, the last three the decoder:
//
//   Exercise     ─┐
//   Category     ─┴─ encoder  (what was asked)
//   Response     ─┐
//   ElapsedTime  ─┼─ decoder  (how the learner answered)
//   LaggedTime   ─┘
//
// Elapsed and lagged time arrive already bucketised, so they
// are plain vocabulary indices like the others.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    Exercise,
    Category,
    Response,
    ElapsedTime,
    LaggedTime,
}

impl Feature {
    /// All streams in the order the model consumes them
    pub const ALL: [Feature; 5] = [
        Feature::Exercise,
        Feature::Category,
        Feature::Response,
        Feature::ElapsedTime,
        Feature::LaggedTime,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Feature::Exercise    => "exercise",
            Feature::Category    => "category",
            Feature::Response    => "response",
            Feature::ElapsedTime => "elapsed_time",
            Feature::LaggedTime  => "lagged_time",
        }
    }
}

/// Vocabulary size of each stream, i.e. the row count of its embedding table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabSizes {
    pub exercises:    usize,
    pub categories:   usize,
    pub responses:    usize,
    pub elapsed_time: usize,
    pub lagged_time:  usize,
}

impl VocabSizes {
    pub fn size(&self, feature: Feature) -> usize {
        match feature {
            Feature::Exercise    => self.exercises,
            Feature::Category    => self.categories,
            Feature::Response    => self.responses,
            Feature::ElapsedTime => self.elapsed_time,
            Feature::LaggedTime  => self.lagged_time,
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocab_sizes_lookup() {
        let vocab = VocabSizes {
            exercises: 13523, categories: 8, responses: 3, elapsed_time: 301, lagged_time: 1441,
        };
        assert_eq!(vocab.size(Feature::Exercise),   13523);
        assert_eq!(vocab.size(Feature::LaggedTime), 1441);
    }

    #[test]
    fn test_display_uses_snake_case_name() {
        assert_eq!(Feature::ElapsedTime.to_string(), "elapsed_time");
        assert_eq!(Feature::LaggedTime.to_string(),  "lagged_time");
    }
}
