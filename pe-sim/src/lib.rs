//! Bit-accurate functional simulator for a small SIMD processing-element
//! array accelerator: a [`pe::ProcessingElement`] datapath, a
//! [`buffer::MainBuffer`] scratchpad, and the [`accelerator::Accelerator`]
//! engine that fuses them under one compound instruction stream.

pub mod accelerator;
pub mod buffer;
pub mod error;
pub mod pe;

pub use accelerator::{Accelerator, AcceleratorConfig};
pub use buffer::{BufferConfig, MainBuffer};
pub use error::AccelError;
pub use pe::{PeConfig, ProcessingElement};
