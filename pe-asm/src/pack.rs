use pe_types::{bits::mask, Mode};

use crate::config::InstConfig;
use crate::error::{Error, Result};
use crate::instruction::{Instruction, MemoryInstruction, MemoryOpcode, PeInstruction};

/// An opaque, bit-packed compound instruction word. Field layout is defined
/// only in terms of an [`InstConfig`] (spec §6: "bit widths are a
/// per-configuration contract set by `InstConfig`, not fixed"); fields are
/// packed MSB-first in the order they appear in spec §6's field table:
/// `mem.opcode, mem.mode, mem.mema_offset, mem.memb_offset, pe.opcode,
/// pe.mode, pe.value, mema_inc, memb_inc, count`.
///
/// 128 bits comfortably covers every width combination this workspace's
/// configurations use; see [`InstConfig::validate`] for the bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawInstruction(u128);

impl RawInstruction {
    /// Construct from an already bit-packed word.
    pub const fn from_bits(bits: u128) -> Self {
        Self(bits)
    }

    /// The raw packed bits.
    pub const fn bits(self) -> u128 {
        self.0
    }
}

struct FieldCursor {
    remaining: u32,
}

impl FieldCursor {
    fn put(&mut self, word: &mut u128, field: &'static str, value: u32, width: u32) -> Result<()> {
        let value = value as u64;
        if width < 64 && value > mask(width) {
            return Err(Error::FieldOverflow { field, width, value });
        }
        self.remaining -= width;
        *word |= (value as u128) << self.remaining;
        Ok(())
    }

    fn take(&mut self, word: u128, width: u32) -> u32 {
        self.remaining -= width;
        ((word >> self.remaining) & mask(width) as u128) as u32
    }
}

/// Pack a decoded [`Instruction`] into its wire representation under `cfg`.
pub fn pack(inst: &Instruction, cfg: &InstConfig) -> Result<RawInstruction> {
    cfg.validate()?;
    let mut word: u128 = 0;
    let mut cursor = FieldCursor {
        remaining: cfg.total_bits(),
    };

    cursor.put(&mut word, "mem.opcode", inst.mem.opcode as u32, cfg.mem.opcode_bits)?;
    cursor.put(&mut word, "mem.mode", inst.mem.mode.to_wire() as u32, cfg.mem.mode_bits)?;
    cursor.put(&mut word, "mem.mema_offset", inst.mem.mema_offset, cfg.mem.mema_offset_bits)?;
    cursor.put(&mut word, "mem.memb_offset", inst.mem.memb_offset, cfg.mem.memb_offset_bits)?;

    let (pe_opcode, pe_value) = inst.pe.to_wire();
    cursor.put(&mut word, "pe.opcode", pe_opcode, cfg.pe.opcode_bits)?;
    cursor.put(&mut word, "pe.mode", inst.pe.mode.to_wire() as u32, cfg.pe.mode_bits)?;
    cursor.put(&mut word, "pe.value", pe_value, cfg.pe.value_bits)?;

    cursor.put(&mut word, "mema_inc", inst.mema_inc, cfg.mema_inc_bits)?;
    cursor.put(&mut word, "memb_inc", inst.memb_inc, cfg.memb_inc_bits)?;
    cursor.put(&mut word, "count", inst.count, cfg.count_bits)?;

    debug_assert_eq!(cursor.remaining, 0, "all configured fields must be consumed");
    Ok(RawInstruction(word))
}

/// Unpack a wire word into a decoded [`Instruction`] under `cfg`.
pub fn unpack(raw: RawInstruction, cfg: &InstConfig) -> Result<Instruction> {
    cfg.validate()?;
    let word = raw.0;
    let mut cursor = FieldCursor {
        remaining: cfg.total_bits(),
    };

    let mem_opcode = MemoryOpcode::from_wire(cursor.take(word, cfg.mem.opcode_bits))?;
    let mem_mode = Mode::from_wire(cursor.take(word, cfg.mem.mode_bits) as u8)?;
    let mema_offset = cursor.take(word, cfg.mem.mema_offset_bits);
    let memb_offset = cursor.take(word, cfg.mem.memb_offset_bits);

    let pe_opcode = cursor.take(word, cfg.pe.opcode_bits);
    let pe_mode = Mode::from_wire(cursor.take(word, cfg.pe.mode_bits) as u8)?;
    let pe_value = cursor.take(word, cfg.pe.value_bits);

    let mema_inc = cursor.take(word, cfg.mema_inc_bits);
    let memb_inc = cursor.take(word, cfg.memb_inc_bits);
    let count = cursor.take(word, cfg.count_bits);

    debug_assert_eq!(cursor.remaining, 0, "all configured fields must be consumed");

    Ok(Instruction {
        mem: MemoryInstruction {
            opcode: mem_opcode,
            mode: mem_mode,
            mema_offset,
            memb_offset,
        },
        pe: PeInstruction::from_wire(pe_opcode, pe_mode, pe_value)?,
        mema_inc,
        memb_inc,
        count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::PeOp;

    fn sample(mode: Mode, op: PeOp) -> Instruction {
        Instruction {
            mem: MemoryInstruction {
                opcode: MemoryOpcode::Read,
                mode,
                mema_offset: 3,
                memb_offset: 5,
            },
            pe: PeInstruction { mode, op },
            mema_inc: 1,
            memb_inc: 0,
            count: 7,
        }
    }

    #[test]
    fn round_trips_across_modes_and_ops() {
        let cfg = InstConfig::reference();
        for mode in [Mode::Int8, Mode::Int16, Mode::Int32] {
            for op in [PeOp::Mac, PeOp::Pass, PeOp::Rnd(8), PeOp::Out, PeOp::Clr, PeOp::Nop] {
                let inst = sample(mode, op);
                let raw = pack(&inst, &cfg).unwrap();
                let back = unpack(raw, &cfg).unwrap();
                assert_eq!(inst, back, "round trip failed for {mode:?}/{op:?}");
            }
        }
    }

    #[test]
    fn rnd_int16_shift_8_matches_spec_example() {
        let cfg = InstConfig::reference();
        let inst = sample(Mode::Int16, PeOp::Rnd(8));
        let raw = pack(&inst, &cfg).unwrap();
        let back = unpack(raw, &cfg).unwrap();
        assert_eq!(back.pe.op, PeOp::Rnd(8));
        assert_eq!(back.pe.mode, Mode::Int16);
    }

    #[test]
    fn overflowing_field_is_rejected() {
        let cfg = InstConfig::reference();
        let mut inst = sample(Mode::Int32, PeOp::Mac);
        inst.mem.mema_offset = 1 << cfg.mem.mema_offset_bits;
        assert!(pack(&inst, &cfg).is_err());
    }

    #[test]
    fn oversized_config_is_rejected_before_packing() {
        let mut cfg = InstConfig::reference();
        cfg.count_bits = 200;
        assert!(pack(&sample(Mode::Int32, PeOp::Nop), &cfg).is_err());
    }
}
