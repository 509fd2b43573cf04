use thiserror::Error as ThisError;

/// Result alias for the fallible primitives in this crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Errors raised by the shared numeric/bit-field primitives.
#[derive(ThisError, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A 2-bit mode field carried a reserved encoding (only 0/1/2 are
    /// assigned; 3 is reserved).
    #[error("unknown mode encoding: {0:#04b}")]
    UnknownMode(u8),
}
