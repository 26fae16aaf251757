//! Client-side image handling: upload checks and the downscale/recompress step.

pub mod normalizer;
pub mod upload;
