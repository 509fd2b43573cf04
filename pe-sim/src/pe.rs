use pe_asm::{PeInstruction, PeOp};
use pe_types::bits::{arithmetic_shift_right, extract_lane_lsb_first, mask, sign_extend, truncate};

use crate::error::{AccelError, Result};

/// Register widths for one [`ProcessingElement`] (spec §3). `acc_bits`
/// must be `>= input_bits`; both must be nonzero and at most 64 — this
/// workspace stores every register as a plain `u64`, so widths beyond 64
/// bits are out of scope (no configuration in spec §8's scenarios needs
/// more).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeConfig {
    /// Width, in bits, of the A/B input registers.
    pub input_bits: u32,
    /// Width, in bits, of the accumulator register.
    pub acc_bits: u32,
    /// Width, in bits, of the output register.
    pub out_bits: u32,
}

impl PeConfig {
    /// Construct a configuration, checking `input_bits > 0`, `acc_bits >=
    /// input_bits`, and that no register exceeds 64 bits.
    pub fn new(input_bits: u32, acc_bits: u32, out_bits: u32) -> Result<Self> {
        if input_bits == 0 {
            return Err(AccelError::ShapeMismatch("INPUT_BITS must be greater than zero".into()));
        }
        if acc_bits < input_bits {
            return Err(AccelError::ShapeMismatch(format!(
                "ACC_BITS ({acc_bits}) must be >= INPUT_BITS ({input_bits})"
            )));
        }
        if input_bits > 64 || acc_bits > 64 || out_bits > 64 {
            return Err(AccelError::ShapeMismatch(
                "register widths beyond 64 bits are not supported".into(),
            ));
        }
        Ok(Self {
            input_bits,
            acc_bits,
            out_bits,
        })
    }
}

/// One lane-parallel multiply-accumulate unit (spec §4.1). Holds input A,
/// input B, an accumulator, and an output register, all stored as plain
/// fixed-width integers masked to their configured widths — lane slicing
/// is arithmetic (shift + mask), never substring manipulation, per the
/// design note in spec §9.
#[derive(Debug, Clone)]
pub struct ProcessingElement {
    config: PeConfig,
    input_a: u64,
    input_b: u64,
    acc: u64,
    out: u64,
}

impl ProcessingElement {
    /// Construct a PE with all registers zeroed.
    pub fn new(config: PeConfig) -> Self {
        Self {
            config,
            input_a: 0,
            input_b: 0,
            acc: 0,
            out: 0,
        }
    }

    /// Overwrite input register A. Only the low `INPUT_BITS` bits of
    /// `value` are kept.
    pub fn input_a(&mut self, value: u64) {
        self.input_a = value & mask(self.config.input_bits);
    }

    /// Overwrite input register B. Only the low `INPUT_BITS` bits of
    /// `value` are kept.
    pub fn input_b(&mut self, value: u64) {
        self.input_b = value & mask(self.config.input_bits);
    }

    /// The output register.
    pub fn output(&self) -> u64 {
        self.out
    }

    /// The accumulator register.
    pub fn accumulation(&self) -> u64 {
        self.acc
    }

    /// Number of lanes and per-lane accumulator width for `mode`, checking
    /// that both divisions in spec §4.1 are exact.
    fn lane_shape(&self, mode_bits: u32) -> Result<(u32, u32)> {
        if self.config.out_bits % mode_bits != 0 {
            return Err(AccelError::ShapeMismatch(format!(
                "OUT_BITS ({}) is not divisible by mode width ({mode_bits})",
                self.config.out_bits
            )));
        }
        let lanes = self.config.out_bits / mode_bits;
        if self.config.acc_bits % lanes != 0 {
            return Err(AccelError::ShapeMismatch(format!(
                "ACC_BITS ({}) is not divisible by lane count ({lanes})",
                self.config.acc_bits
            )));
        }
        Ok((lanes, self.config.acc_bits / lanes))
    }

    fn set_acc_lane(&mut self, index: u32, lane_bits: u32, value: u64) {
        let shift = index as u64 * lane_bits as u64;
        let lane_mask = mask(lane_bits);
        self.acc = (self.acc & !(lane_mask << shift)) | ((value & lane_mask) << shift);
    }

    /// Apply one PE micro-op under `pe_inst.mode`. Neither a `ShapeMismatch`
    /// nor an `UnknownOpcode` mutates any register.
    pub fn execute_instruction(&mut self, pe_inst: PeInstruction) -> Result<()> {
        let m = pe_inst.mode.lane_bits();
        let (lanes, w) = self.lane_shape(m)?;

        tracing::trace!(op = ?pe_inst.op, mode = ?pe_inst.mode, lanes, lane_width = w, "pe micro-op");

        match pe_inst.op {
            PeOp::Mac => self.do_mac(lanes, m, w),
            PeOp::Pass => self.do_pass(lanes, m, w),
            PeOp::Rnd(shift) => self.do_rnd(lanes, w, shift),
            PeOp::Out => self.do_out(lanes, m, w),
            PeOp::Clr => self.do_clr(),
            PeOp::Nop => {}
        }
        Ok(())
    }

    fn do_mac(&mut self, lanes: u32, m: u32, w: u32) {
        for i in 0..lanes {
            let a = sign_extend(extract_lane_lsb_first(self.input_a, i, m), m);
            let b = sign_extend(extract_lane_lsb_first(self.input_b, i, m), m);
            let acc_old = sign_extend(extract_lane_lsb_first(self.acc, i, w), w);
            let product = a * b;
            let updated = acc_old.wrapping_add(product);
            self.set_acc_lane(i, w, truncate(updated, w));
        }
    }

    fn do_pass(&mut self, lanes: u32, m: u32, w: u32) {
        for i in 0..lanes {
            let a = sign_extend(extract_lane_lsb_first(self.input_a, i, m), m);
            self.set_acc_lane(i, w, truncate(a, w));
        }
    }

    fn do_rnd(&mut self, lanes: u32, w: u32, shift: u32) {
        for i in 0..lanes {
            let acc_old = sign_extend(extract_lane_lsb_first(self.acc, i, w), w);
            let shifted = arithmetic_shift_right(acc_old, shift, w);
            self.set_acc_lane(i, w, truncate(shifted, w));
        }
    }

    fn do_out(&mut self, lanes: u32, m: u32, w: u32) {
        let mut r: u64 = 0;
        for i in 0..lanes {
            let idx = lanes - 1 - i;
            let lane_low_bits = extract_lane_lsb_first(self.acc, idx, w) & mask(m);
            r = (r << m) | lane_low_bits;
        }
        self.out = r & mask(self.config.out_bits);
    }

    fn do_clr(&mut self) {
        self.acc = 0;
        self.out = 0;
    }
}
