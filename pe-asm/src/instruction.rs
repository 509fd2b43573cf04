use pe_types::Mode;

use crate::error::{Error, Result};

/// `mem.opcode` wire values (spec §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::FromRepr)]
#[repr(u8)]
pub enum MemoryOpcode {
    /// No memory-side effect this cycle.
    Nop = 0,
    /// Latch MEM0/MEM1 read ports.
    Read = 1,
    /// Commit the MEM2 write port.
    Write = 2,
}

impl MemoryOpcode {
    pub(crate) fn from_wire(bits: u32) -> Result<Self> {
        Self::from_repr(bits as u8).ok_or(Error::UnknownEncoding {
            field: "mem.opcode",
            value: bits,
        })
    }
}

/// `pe.opcode` wire values: a two-level encoding that this crate flattens
/// to [`PeOp`] everywhere except at the pack/unpack boundary, per spec §9.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::FromRepr)]
#[repr(u8)]
pub enum PeOpcodeTag {
    /// `pe.value` carries a [`PeSubOp`] sub-opcode.
    NoValue = 0,
    /// `pe.value` carries a shift amount for RND.
    Rnd = 1,
}

impl PeOpcodeTag {
    pub(crate) fn from_wire(bits: u32) -> Result<Self> {
        Self::from_repr(bits as u8).ok_or(Error::UnknownEncoding {
            field: "pe.opcode",
            value: bits,
        })
    }
}

/// `pe.value` sub-opcode values when `pe.opcode == NO_VALUE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::FromRepr)]
#[repr(u8)]
pub enum PeSubOp {
    /// Multiply-accumulate.
    Mac = 0,
    /// No state change.
    Nop = 1,
    /// Produce the output register from the accumulator.
    Out = 2,
    /// Load the accumulator from input A.
    Pass = 3,
    /// Zero the accumulator and output register.
    Clr = 4,
}

impl PeSubOp {
    fn from_wire(bits: u32) -> Result<Self> {
        Self::from_repr(bits as u8).ok_or(Error::UnknownEncoding {
            field: "pe.value",
            value: bits,
        })
    }
}

/// The flattened, single-level PE micro-op this crate and `pe-sim` operate
/// on internally. `pe.opcode == NO_VALUE` together with a [`PeSubOp`]
/// collapses to one of `Mac`/`Nop`/`Out`/`Pass`/`Clr`; `pe.opcode == RND`
/// collapses to `Rnd(shift_amount)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeOp {
    /// Multiply-accumulate.
    Mac,
    /// Load the accumulator from input A (sign-extended).
    Pass,
    /// Arithmetic shift-right quantize the accumulator by `shift` bits.
    Rnd(u32),
    /// Produce the output register by concatenating truncated accumulator lanes.
    Out,
    /// Zero the accumulator and output register.
    Clr,
    /// No state change.
    Nop,
}

impl PeOp {
    fn from_wire(tag: PeOpcodeTag, value: u32) -> Result<Self> {
        Ok(match tag {
            PeOpcodeTag::Rnd => PeOp::Rnd(value),
            PeOpcodeTag::NoValue => match PeSubOp::from_wire(value)? {
                PeSubOp::Mac => PeOp::Mac,
                PeSubOp::Nop => PeOp::Nop,
                PeSubOp::Out => PeOp::Out,
                PeSubOp::Pass => PeOp::Pass,
                PeSubOp::Clr => PeOp::Clr,
            },
        })
    }

    /// Encode back to the `(opcode_tag, value)` wire pair.
    fn to_wire(self) -> (PeOpcodeTag, u32) {
        match self {
            PeOp::Rnd(shift) => (PeOpcodeTag::Rnd, shift),
            PeOp::Mac => (PeOpcodeTag::NoValue, PeSubOp::Mac as u32),
            PeOp::Nop => (PeOpcodeTag::NoValue, PeSubOp::Nop as u32),
            PeOp::Out => (PeOpcodeTag::NoValue, PeSubOp::Out as u32),
            PeOp::Pass => (PeOpcodeTag::NoValue, PeSubOp::Pass as u32),
            PeOp::Clr => (PeOpcodeTag::NoValue, PeSubOp::Clr as u32),
        }
    }
}

/// A decoded memory micro-op (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryInstruction {
    /// NOP/READ/WRITE.
    pub opcode: MemoryOpcode,
    /// Element mode for this cycle's memory access.
    pub mode: Mode,
    /// MEM0/MEM2 offset (read source on READ, write destination on WRITE).
    pub mema_offset: u32,
    /// MEM1 offset (broadcast read source).
    pub memb_offset: u32,
}

/// A decoded PE micro-op (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeInstruction {
    /// Element mode for this cycle's PE operation.
    pub mode: Mode,
    /// The flattened micro-op.
    pub op: PeOp,
}

impl PeInstruction {
    pub(crate) fn from_wire(opcode: u32, mode: Mode, value: u32) -> Result<Self> {
        Ok(Self {
            mode,
            op: PeOp::from_wire(PeOpcodeTag::from_wire(opcode)?, value)?,
        })
    }

    pub(crate) fn to_wire(self) -> (u32, u32) {
        let (tag, value) = self.op.to_wire();
        (tag as u32, value)
    }
}

/// One compound instruction: a memory micro-op, a PE micro-op, per-cycle
/// offset strides, and the inner-loop repeat count (spec §3, §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    /// The embedded memory micro-op.
    pub mem: MemoryInstruction,
    /// The embedded PE micro-op.
    pub pe: PeInstruction,
    /// Per-cycle increment applied to `mem.mema_offset`.
    pub mema_inc: u32,
    /// Per-cycle increment applied to `mem.memb_offset`.
    pub memb_inc: u32,
    /// Inner-loop repeat count; the engine executes `count + 1` cycles.
    pub count: u32,
}
