//! Run-wide state threaded through record processing
//!
//! The order counter, the redirect entries and the aggregate bodies move
//! together: folding a built record advances all three at once, so their
//! orders cannot drift apart.

use super::builder::BuiltRecord;
use super::redirects::RedirectCollector;

/// Accumulated results of the records processed so far
#[derive(Debug, Clone)]
pub struct RunAccumulator {
    next_order: usize,
    redirects: RedirectCollector,
    bodies: Vec<String>,
}

impl RunAccumulator {
    /// Accumulator of a run that has not processed anything
    pub fn new() -> Self {
        Self {
            next_order: 1,
            redirects: RedirectCollector::new(),
            bodies: Vec::new(),
        }
    }

    /// Order index the next record receives (1-based)
    pub fn next_order(&self) -> usize {
        self.next_order
    }

    /// Number of records folded in
    pub fn processed(&self) -> usize {
        self.next_order - 1
    }

    /// Folds one built record in
    pub fn fold(mut self, from_alias: &str, built: &BuiltRecord) -> Self {
        self.redirects.record(from_alias, &built.slug);
        self.bodies.push(built.body.clone());
        self.next_order += 1;
        self
    }

    /// Collected redirects
    pub fn redirects(&self) -> &RedirectCollector {
        &self.redirects
    }

    /// Collected bodies, in processing order
    pub fn bodies(&self) -> &[String] {
        &self.bodies
    }
}

impl Default for RunAccumulator {
    fn default() -> Self {
        Self::new()
    }
}
