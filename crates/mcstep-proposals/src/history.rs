//! Chain history forwarded to adaptive proposal updates.

use serde::{Deserialize, Serialize};

use crate::proposal::ParamValues;

/// Outcome of one accept/reject decision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AcceptanceRecord {
    /// Whether the proposed jump was accepted.
    pub accepted: bool,
    /// Acceptance probability computed by the chain.
    pub acceptance_prob: f64,
}

/// The view of a chain's past that `update` hooks receive.
///
/// The chain driving the sampler appends one position and one acceptance
/// record per step; adaptive proposals read the history to tune their
/// internal state (e.g. step sizes) and must not mutate it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChainHistory {
    positions: Vec<ParamValues>,
    acceptance: Vec<AcceptanceRecord>,
}

impl ChainHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the outcome of one chain step.
    pub fn record(&mut self, position: ParamValues, accepted: bool, acceptance_prob: f64) {
        self.positions.push(position);
        self.acceptance.push(AcceptanceRecord {
            accepted,
            acceptance_prob,
        });
    }

    /// Number of recorded steps.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// True when no step has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Most recently recorded position.
    pub fn latest(&self) -> Option<&ParamValues> {
        self.positions.last()
    }

    /// All recorded positions, oldest first.
    pub fn positions(&self) -> &[ParamValues] {
        &self.positions
    }

    /// All acceptance records, oldest first.
    pub fn acceptance(&self) -> &[AcceptanceRecord] {
        &self.acceptance
    }

    /// Fraction of recorded steps that were accepted.
    pub fn acceptance_rate(&self) -> f64 {
        if self.acceptance.is_empty() {
            return 0.0;
        }
        let accepted = self.acceptance.iter().filter(|r| r.accepted).count();
        accepted as f64 / self.acceptance.len() as f64
    }
}
