use thiserror::Error as ThisError;

/// Result alias for the instruction encoding/assembler layer.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Errors raised while configuring, packing, unpacking, or assembling
/// instruction words.
#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A field's reserved wire encoding does not map to any known variant.
    #[error("unknown {field} encoding: {value:#x}")]
    UnknownEncoding {
        /// Name of the offending field, e.g. `"mem.opcode"`.
        field: &'static str,
        /// The raw encoded value that failed to decode.
        value: u32,
    },

    /// An [`crate::config::InstConfig`] describes a wire word wider than
    /// this crate's 128-bit packed representation can hold.
    #[error("instruction configuration needs {needed} bits, at most 128 are available")]
    ConfigTooWide {
        /// Total bits the configuration's fields require.
        needed: u32,
    },

    /// A field value does not fit in the width its [`crate::config::InstConfig`]
    /// assigns it.
    #[error("value {value} does not fit in {width}-bit field {field}")]
    FieldOverflow {
        /// Name of the offending field.
        field: &'static str,
        /// The width, in bits, the field was configured with.
        width: u32,
        /// The value that was rejected.
        value: u64,
    },

    /// The assembler could not parse a mnemonic line.
    #[error("line {line}: {message}")]
    ParseError {
        /// 1-based line number within the assembled program text.
        line: usize,
        /// Human-readable description of what went wrong.
        message: String,
    },
}
