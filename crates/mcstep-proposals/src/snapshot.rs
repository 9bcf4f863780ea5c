//! Serializable snapshot payloads for checkpointing a composite.

use std::fs;
use std::path::Path;

use mcstep_core::{ErrorInfo, RngState, SamplerError};
use serde::{Deserialize, Serialize};

use crate::composite::ParamKey;
use crate::proposal::ProposalState;

/// State of one child proposal, keyed by its parameter tuple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildState {
    /// Parameter tuple identifying the child within the partition.
    pub parameters: ParamKey,
    /// The child's state with the random-source sub-entry stripped.
    pub state: ProposalState,
}

/// Full snapshot of a composite proposal.
///
/// Children whose only state was the shared generator carry no entry; the
/// generator state appears exactly once at the top level, never per child.
/// The top-level entry is optional only in the serialized form so that a
/// structurally damaged snapshot still parses and then fails `restore`
/// with a precise state-mismatch error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeState {
    /// Per-child states, in construction order.
    #[serde(default)]
    pub children: Vec<ChildState>,
    /// The shared generator's serialized state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub random_source: Option<RngState>,
}

impl CompositeState {
    /// Packs the snapshot into the generic [`ProposalState`] mapping.
    ///
    /// This is what lets a composite stand in for a single proposal (and
    /// nest inside another composite): the child vector becomes one JSON
    /// entry and the generator state becomes the embedded sub-entry.
    pub fn to_proposal_state(&self) -> Result<ProposalState, SamplerError> {
        let mut state = ProposalState {
            random_source: self.random_source.clone(),
            entries: Default::default(),
        };
        if !self.children.is_empty() {
            let children = serde_json::to_value(&self.children).map_err(|err| {
                SamplerError::Serde(ErrorInfo::new("snapshot-encode", err.to_string()))
            })?;
            state.entries.insert("children".to_string(), children);
        }
        Ok(state)
    }

    /// Inverse of [`CompositeState::to_proposal_state`].
    pub fn from_proposal_state(state: &ProposalState) -> Result<Self, SamplerError> {
        let children = match state.entries.get("children") {
            Some(value) => serde_json::from_value(value.clone()).map_err(|err| {
                SamplerError::Serde(ErrorInfo::new("snapshot-decode", err.to_string()))
            })?,
            None => Vec::new(),
        };
        Ok(Self {
            children,
            random_source: state.random_source.clone(),
        })
    }

    /// Restores a snapshot from disk.
    pub fn load(path: &Path) -> Result<Self, SamplerError> {
        let contents = fs::read_to_string(path).map_err(|err| {
            SamplerError::Serde(
                ErrorInfo::new("snapshot-read", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        serde_json::from_str(&contents).map_err(|err| {
            SamplerError::Serde(
                ErrorInfo::new("snapshot-parse", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })
    }

    /// Writes the snapshot to disk as pretty JSON.
    pub fn store(&self, path: &Path) -> Result<(), SamplerError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                SamplerError::Serde(
                    ErrorInfo::new("snapshot-mkdir", err.to_string())
                        .with_context("path", parent.display().to_string()),
                )
            })?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|err| {
            SamplerError::Serde(
                ErrorInfo::new("snapshot-serialize", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        fs::write(path, json).map_err(|err| {
            SamplerError::Serde(
                ErrorInfo::new("snapshot-write", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })
    }
}
