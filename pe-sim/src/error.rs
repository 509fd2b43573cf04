use thiserror::Error as ThisError;

/// Result alias for the datapath (spec §7).
pub type Result<T, E = AccelError> = core::result::Result<T, E>;

/// The unified error taxonomy from spec §7. Every fallible method in this
/// crate returns one of these variants; none of them are raised
/// transactionally — state mutated before a failing sub-op remains mutated
/// (spec §5, §7).
#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
pub enum AccelError {
    /// An [`crate::accelerator::AcceleratorConfig`] invariant was violated
    /// at construction.
    #[error("accelerator configuration error: {0}")]
    ConfigError(String),

    /// A PE operation's mode does not evenly divide the relevant register
    /// width, or register widths otherwise fell out of sync.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// A memory offset is `>=` its bank's configured depth.
    #[error("address {offset} out of range for bank of depth {depth}")]
    AddressOutOfRange {
        /// The offending offset.
        offset: u32,
        /// The bank's configured depth.
        depth: u32,
    },

    /// A bulk load's length disagreed with the bank depth, or a port write
    /// disagreed on width.
    #[error("width mismatch: expected {expected}, got {actual}")]
    WidthMismatch {
        /// Expected width/length.
        expected: u32,
        /// Actual width/length supplied.
        actual: u32,
    },

    /// A `pe.opcode`/`pe.value` combination did not map to a known
    /// operation.
    #[error("unknown PE opcode/value combination: {0}")]
    UnknownOpcode(String),

    /// A `mem.mode`/`pe.mode` field carried a reserved encoding.
    #[error("unknown mode encoding: {0}")]
    UnknownMode(String),
}

impl From<pe_types::Error> for AccelError {
    fn from(err: pe_types::Error) -> Self {
        match err {
            pe_types::Error::UnknownMode(bits) => AccelError::UnknownMode(format!("{bits:#04b}")),
        }
    }
}
