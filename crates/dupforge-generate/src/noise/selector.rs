use rand::RngCore;

use dupforge_core::{ErrorKind, WeightedKind};

use crate::rng::weighted_pick;

/// Ordered weight table over error kinds for one field type.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorModel {
    entries: Vec<(ErrorKind, f64)>,
}

impl ErrorModel {
    pub fn new(table: &[WeightedKind]) -> Self {
        Self {
            entries: table
                .iter()
                .map(|entry| (entry.kind, entry.weight))
                .collect(),
        }
    }

    /// Weighted roll over the cumulative weights; `None` for an empty or
    /// all-zero table.
    pub fn choose(&self, rng: &mut dyn RngCore) -> Option<ErrorKind> {
        weighted_pick(&self.entries, rng).copied()
    }

    pub fn kinds(&self) -> impl Iterator<Item = ErrorKind> + '_ {
        self.entries.iter().map(|(kind, _)| *kind)
    }

    pub fn weight(&self, kind: ErrorKind) -> f64 {
        self.entries
            .iter()
            .filter(|(candidate, _)| *candidate == kind)
            .map(|(_, weight)| weight)
            .sum()
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, weight)| weight.max(0.0)).sum()
    }
}
