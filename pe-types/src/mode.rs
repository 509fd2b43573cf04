use crate::error::Error;

/// Per-lane element width selecting SIMD sub-word partitioning of the
/// 32-bit datapath. The wire encoding (`INT32=0, INT16=1, INT8=2`) is the
/// one spec §6 assigns to both `mem.mode` and `pe.mode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::FromRepr)]
#[repr(u8)]
pub enum Mode {
    /// Full 32-bit lane, one lane per register.
    Int32 = 0,
    /// 16-bit sub-word lanes, two lanes per register.
    Int16 = 1,
    /// 8-bit sub-word lanes, four lanes per register.
    Int8 = 2,
}

impl Mode {
    /// Width, in bits, of one lane under this mode.
    pub const fn lane_bits(self) -> u32 {
        match self {
            Mode::Int32 => 32,
            Mode::Int16 => 16,
            Mode::Int8 => 8,
        }
    }

    /// Decode the 2-bit wire representation of a mode field.
    pub fn from_wire(bits: u8) -> Result<Self, Error> {
        Self::from_repr(bits).ok_or(Error::UnknownMode(bits))
    }

    /// Encode back to the 2-bit wire representation.
    pub const fn to_wire(self) -> u8 {
        self as u8
    }
}
