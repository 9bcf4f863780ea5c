#![deny(missing_docs)]
#![doc = "Composite proposal orchestration: combine independent per-parameter jump proposals into one proposal with a shared random stream, an aggregated log-density, and exact checkpoint/restore."]

/// Composite proposal over a disjoint parameter partition.
pub mod composite;
/// Seed-policy configuration for deriving per-chain generators.
pub mod config;
/// Deterministic per-chain seed derivation helpers.
pub mod determinism;
/// Chain history handed to adaptive proposal updates.
pub mod history;
/// The contract every child proposal must satisfy.
pub mod proposal;
/// Serializable snapshot payloads for checkpointing.
pub mod snapshot;

pub use composite::{CompositeProposal, ParamKey};
pub use config::SeedPolicy;
pub use history::{AcceptanceRecord, ChainHistory};
pub use proposal::{ParamDraws, ParamValues, Proposal, ProposalState};
pub use snapshot::{ChildState, CompositeState};
