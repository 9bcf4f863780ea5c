#![deny(missing_docs)]
#![doc = "Shared infrastructure for the mcstep sampler: structured errors, the serializable shared random source, and deterministic seed derivation."]

pub mod errors;
pub mod rng;

pub use errors::{ErrorInfo, SamplerError};
pub use rng::{create_seed, derive_substream_seed, RandomSource, RngState};
