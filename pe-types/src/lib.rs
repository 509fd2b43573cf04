//! Shared primitive types and bit-level arithmetic for the pe-sim
//! accelerator workspace: the lane-carrying [`Word`] type, the [`Mode`]
//! enum selecting SIMD sub-word partitioning, and fixed-width sign
//! extension / arithmetic-shift helpers in [`bits`].

pub mod bits;
pub mod error;
mod mode;

pub use error::Error;
pub use mode::Mode;

/// The 32-bit lane-carrying register unit used throughout the datapath:
/// PE input/output registers, and MEM0/MEM1/MEM2 bank element widths are
/// all expressed as a whole number of `Word`-sized (or sub-`Word`) lanes.
pub type Word = u32;
