//! Seeding configuration for sampler setups.

use mcstep_core::RandomSource;
use serde::{Deserialize, Serialize};

use crate::determinism;

/// Deterministic seeding configuration.
///
/// One master seed governs a whole sampler run; every chain derives an
/// independent generator from it, so runs are reproducible while chains
/// never share a stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedPolicy {
    /// Master seed used for the run.
    #[serde(default = "default_master_seed")]
    pub master_seed: u64,
    /// Optional label recorded alongside run artefacts.
    #[serde(default)]
    pub label: Option<String>,
}

fn default_master_seed() -> u64 {
    0x05EE_D5EE_DD15_5EED_u64
}

impl Default for SeedPolicy {
    fn default() -> Self {
        Self {
            master_seed: default_master_seed(),
            label: None,
        }
    }
}

impl SeedPolicy {
    /// Builds the independent random source owned by one chain.
    pub fn source_for_chain(&self, chain_id: u64) -> RandomSource {
        RandomSource::from_seed(determinism::chain_seed(self.master_seed, chain_id))
    }
}
