//! Pipeline conversions module
//!
//! This module contains orchestration logic for grayscale conversion: the
//! per-image pipeline, the interactive session, and the batch helper.

mod pipeline;
mod session;

#[cfg(test)]
mod tests;

pub use pipeline::GrayscalePipeline;
pub use session::{BatchItem, ConversionSession, convert_batch};
