//! The capability contract consumed by the composite.

use std::collections::BTreeMap;

use mcstep_core::{RandomSource, RngState, SamplerError};
use serde::{Deserialize, Serialize};

use crate::history::ChainHistory;

/// One named point in parameter space.
pub type ParamValues = BTreeMap<String, f64>;

/// A batch of proposed values: for each parameter, one sequence of draws.
pub type ParamDraws = BTreeMap<String, Vec<f64>>;

/// Serializable state of a single proposal.
///
/// A proposal may embed its random-source state as a sub-entry; adaptive
/// proposals additionally keep arbitrary named entries (step sizes,
/// adaptation buffers). A proposal whose only state is the random source
/// has an empty `entries` map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProposalState {
    /// Embedded random-source state, if the proposal serializes one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub random_source: Option<RngState>,
    /// Named non-random state entries.
    #[serde(default)]
    pub entries: BTreeMap<String, serde_json::Value>,
}

impl ProposalState {
    /// True when the state carries nothing at all.
    pub fn is_empty(&self) -> bool {
        self.random_source.is_none() && self.entries.is_empty()
    }

    /// Removes the embedded random-source sub-entry, if any.
    pub fn strip_random_source(&mut self) {
        self.random_source = None;
    }
}

/// Contract every jump proposal must satisfy.
///
/// A proposal owns an ordered set of parameter names, draws candidate
/// values for exactly those parameters, and can capture and restore its
/// full internal state for deterministic resumption. The composite in
/// [`crate::composite`] implements this same trait, so a composite is
/// structurally interchangeable with any single proposal (and composites
/// nest).
pub trait Proposal {
    /// Ordered parameter names this proposal owns.
    fn parameters(&self) -> &[String];

    /// True iff forward and reverse transition densities are equal.
    fn symmetric(&self) -> bool;

    /// The random source the proposal currently draws from.
    fn random_source(&self) -> &RandomSource;

    /// Replaces the proposal's random source with the given handle.
    ///
    /// Callers use this to make several proposals draw from one shared
    /// stream; implementations must drop any generator they already held.
    fn set_random_source(&mut self, source: RandomSource);

    /// Log-density of the proposal distribution at the given values.
    fn logpdf(&self, values: &ParamValues) -> Result<f64, SamplerError>;

    /// Adaptive update hook, called once per chain step before `jump`.
    fn update(&mut self, history: &ChainHistory) -> Result<(), SamplerError>;

    /// Draws `size` proposed values for every owned parameter.
    fn jump(&mut self, size: usize) -> Result<ParamDraws, SamplerError>;

    /// Captures everything needed to reproduce the next `jump` exactly.
    fn state(&self) -> Result<ProposalState, SamplerError>;

    /// Restores state previously captured by [`Proposal::state`].
    fn set_state(&mut self, state: &ProposalState) -> Result<(), SamplerError>;
}
