//! Composite proposal over a disjoint parameter partition.

use std::collections::BTreeMap;
use std::fmt;

use indexmap::IndexMap;
use mcstep_core::{ErrorInfo, RandomSource, SamplerError};
use serde::{Deserialize, Serialize};

use crate::history::ChainHistory;
use crate::proposal::{ParamDraws, ParamValues, Proposal, ProposalState};
use crate::snapshot::{ChildState, CompositeState};

/// Immutable ordered tuple of the parameter names one child owns.
///
/// Keys preserve the child's declared parameter order and identify the
/// child within snapshots, so a snapshot only restores onto a composite
/// with the identical partition.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ParamKey(Box<[String]>);

impl ParamKey {
    /// Builds a key from a child's ordered parameter names.
    pub fn new(names: &[String]) -> Self {
        Self(names.to_vec().into_boxed_slice())
    }

    /// The parameter names in declared order.
    pub fn names(&self) -> &[String] {
        &self.0
    }

    /// Human readable rendering for diagnostics.
    pub fn label(&self) -> String {
        self.0.join(", ")
    }
}

/// A collection of jump proposals acting as one proposal.
///
/// Each child owns a disjoint subset of the sampled parameters; the
/// composite flattens their parameter lists (encounter order), ANDs their
/// symmetry flags, and hands every child one shared random source so all
/// draws within a chain step consume a single reproducible stream. The
/// composite itself implements [`Proposal`], making it interchangeable
/// with any single proposal from the chain's point of view.
pub struct CompositeProposal {
    parameters: Vec<String>,
    symmetric: bool,
    source: RandomSource,
    index: IndexMap<ParamKey, usize>,
    children: Vec<Box<dyn Proposal>>,
}

impl CompositeProposal {
    /// Assembles a composite from pre-built child proposals.
    ///
    /// Fails with [`SamplerError::Configuration`] if any parameter name is
    /// owned by more than one child (the error names every offender) or if
    /// a child owns no parameters at all. When no `source` is supplied a
    /// generator is created from OS entropy. Either way the one resulting
    /// source is assigned to every child, overwriting whatever generator
    /// the child held before.
    pub fn new(
        children: Vec<Box<dyn Proposal>>,
        source: Option<RandomSource>,
    ) -> Result<Self, SamplerError> {
        let mut parameters: Vec<String> = Vec::new();
        for child in &children {
            if child.parameters().is_empty() {
                return Err(SamplerError::Configuration(ErrorInfo::new(
                    "childless-proposal",
                    "a child proposal owns no parameters",
                )));
            }
            parameters.extend(child.parameters().iter().cloned());
        }

        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for name in &parameters {
            *counts.entry(name.as_str()).or_insert(0) += 1;
        }
        let mut repeated: Vec<&str> = Vec::new();
        for name in &parameters {
            if counts[name.as_str()] > 1 && !repeated.contains(&name.as_str()) {
                repeated.push(name.as_str());
            }
        }
        if !repeated.is_empty() {
            return Err(SamplerError::Configuration(
                ErrorInfo::new(
                    "duplicate-parameter",
                    "multiple proposals provided for the same parameter(s)",
                )
                .with_context("parameters", repeated.join(", ")),
            ));
        }

        let symmetric = children.iter().all(|child| child.symmetric());
        let source = match source {
            Some(source) => source,
            None => RandomSource::from_entropy()?,
        };

        let mut children = children;
        let mut index = IndexMap::with_capacity(children.len());
        for (position, child) in children.iter_mut().enumerate() {
            // every child draws from the one shared stream
            child.set_random_source(source.clone());
            index.insert(ParamKey::new(child.parameters()), position);
        }

        Ok(Self {
            parameters,
            symmetric,
            source,
            index,
            children,
        })
    }

    /// Number of child proposals.
    pub fn num_children(&self) -> usize {
        self.children.len()
    }

    /// Parameter keys of the children, in construction order.
    pub fn keys(&self) -> impl Iterator<Item = &ParamKey> {
        self.index.keys()
    }

    /// Read access to the children, in construction order.
    pub fn children(&self) -> impl Iterator<Item = &dyn Proposal> {
        self.children.iter().map(|child| child.as_ref())
    }

    /// Captures a snapshot sufficient for exact resumption.
    ///
    /// Each child contributes its state with the random-source sub-entry
    /// stripped; a child whose only state was the random source is elided
    /// entirely. Exactly one top-level entry holds the shared generator's
    /// state.
    pub fn snapshot(&self) -> Result<CompositeState, SamplerError> {
        let mut children = Vec::new();
        for (key, &position) in &self.index {
            let mut state = self.children[position].state()?;
            state.strip_random_source();
            if !state.entries.is_empty() {
                children.push(ChildState {
                    parameters: key.clone(),
                    state,
                });
            }
        }
        Ok(CompositeState {
            children,
            random_source: Some(self.source.state()),
        })
    }

    /// Restores a snapshot produced by [`CompositeProposal::snapshot`].
    ///
    /// The snapshot is validated against the live partition before any
    /// child is touched: a keyed entry that matches no live child, or a
    /// missing top-level random-source entry, fails with
    /// [`SamplerError::StateMismatch`] and leaves the composite unchanged.
    /// Children without an entry in the snapshot are left as they are;
    /// their behavior is fully determined by the restored generator.
    pub fn restore(&mut self, snapshot: &CompositeState) -> Result<(), SamplerError> {
        for entry in &snapshot.children {
            if !self.index.contains_key(&entry.parameters) {
                return Err(SamplerError::StateMismatch(
                    ErrorInfo::new(
                        "unknown-child",
                        "snapshot entry does not match any live child proposal",
                    )
                    .with_context("parameters", entry.parameters.label()),
                ));
            }
        }
        let rng_state = snapshot.random_source.as_ref().ok_or_else(|| {
            SamplerError::StateMismatch(ErrorInfo::new(
                "missing-random-source",
                "snapshot carries no top-level random-source entry",
            ))
        })?;

        for entry in &snapshot.children {
            let position = self.index[&entry.parameters];
            // the snapshot stores the generator state exactly once, so a
            // nested composite gets its copy reinstated before restoring
            let mut state = entry.state.clone();
            state.random_source = Some(rng_state.clone());
            self.children[position].set_state(&state)?;
        }
        self.source.restore(rng_state);
        Ok(())
    }

    fn restrict<'a>(
        child: &(dyn Proposal + 'a),
        values: &ParamValues,
    ) -> Result<ParamValues, SamplerError> {
        let mut subset = ParamValues::new();
        for name in child.parameters() {
            let value = values.get(name).ok_or_else(|| {
                SamplerError::Validation(
                    ErrorInfo::new("missing-parameter", "values omit a required parameter")
                        .with_context("parameter", name.clone()),
                )
            })?;
            subset.insert(name.clone(), *value);
        }
        Ok(subset)
    }

    fn check_draws(
        child: &(dyn Proposal + '_),
        draws: &ParamDraws,
        size: usize,
    ) -> Result<(), SamplerError> {
        for name in child.parameters() {
            let series = draws.get(name).ok_or_else(|| {
                SamplerError::Validation(
                    ErrorInfo::new("jump-key-mismatch", "child jump omitted an owned parameter")
                        .with_context("parameter", name.clone()),
                )
            })?;
            if series.len() != size {
                return Err(SamplerError::Validation(
                    ErrorInfo::new("jump-length-mismatch", "child jump returned a wrong batch size")
                        .with_context("parameter", name.clone())
                        .with_context("expected", size.to_string())
                        .with_context("actual", series.len().to_string()),
                ));
            }
        }
        if draws.len() != child.parameters().len() {
            return Err(SamplerError::Validation(
                ErrorInfo::new(
                    "jump-key-mismatch",
                    "child jump returned parameters outside its partition",
                )
                .with_context("owned", child.parameters().join(", ")),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for CompositeProposal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeProposal")
            .field("parameters", &self.parameters)
            .field("symmetric", &self.symmetric)
            .field("num_children", &self.children.len())
            .finish_non_exhaustive()
    }
}

impl Proposal for CompositeProposal {
    fn parameters(&self) -> &[String] {
        &self.parameters
    }

    fn symmetric(&self) -> bool {
        self.symmetric
    }

    fn random_source(&self) -> &RandomSource {
        &self.source
    }

    fn set_random_source(&mut self, source: RandomSource) {
        // re-propagate so the shared-stream invariant survives re-seating
        for child in &mut self.children {
            child.set_random_source(source.clone());
        }
        self.source = source;
    }

    fn logpdf(&self, values: &ParamValues) -> Result<f64, SamplerError> {
        // the partition is disjoint, so the joint density factorizes
        let mut total = 0.0;
        for child in &self.children {
            let subset = Self::restrict(child.as_ref(), values)?;
            total += child.logpdf(&subset)?;
        }
        Ok(total)
    }

    fn update(&mut self, history: &ChainHistory) -> Result<(), SamplerError> {
        for child in &mut self.children {
            child.update(history)?;
        }
        Ok(())
    }

    fn jump(&mut self, size: usize) -> Result<ParamDraws, SamplerError> {
        let mut merged = ParamDraws::new();
        for child in &mut self.children {
            let draws = child.jump(size)?;
            Self::check_draws(child.as_ref(), &draws, size)?;
            merged.extend(draws);
        }
        Ok(merged)
    }

    fn state(&self) -> Result<ProposalState, SamplerError> {
        self.snapshot()?.to_proposal_state()
    }

    fn set_state(&mut self, state: &ProposalState) -> Result<(), SamplerError> {
        let snapshot = CompositeState::from_proposal_state(state)?;
        self.restore(&snapshot)
    }
}
