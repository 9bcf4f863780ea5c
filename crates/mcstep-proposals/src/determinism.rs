//! Deterministic per-chain seed derivation.

use mcstep_core::derive_substream_seed;

/// Derives the generator seed for a specific chain.
///
/// Concurrent chains must never share a stream; each derives its own seed
/// from the master seed and its chain identifier.
pub fn chain_seed(master_seed: u64, chain_id: u64) -> u64 {
    derive_substream_seed(master_seed, chain_id)
}
