use pe_asm::{Instruction, MemoryInstruction, MemoryOpcode};
use pe_types::bits::extract_lane_lsb_first;
use pe_types::Word;

use crate::buffer::{BufferConfig, MainBuffer};
use crate::error::{AccelError, Result};
use crate::pe::{PeConfig, ProcessingElement};

/// Top-level accelerator configuration (spec §4.3). Construction checks
/// `PE_COUNT = M0_BITS / INPUT_BITS`, `INPUT_BITS = M1_BITS`, and
/// `PE_COUNT = M2_BITS / OUT_BITS`; any violation is a `ConfigError`.
#[derive(Debug, Clone, Copy)]
pub struct AcceleratorConfig {
    /// Width, in bits, of the program-counter register.
    pub counter_bits: u32,
    /// Number of processing elements in the array.
    pub pe_count: u32,
    /// Shared register widths for every PE.
    pub pe: PeConfig,
    /// Bank widths and depths for the main buffer.
    pub buffer: BufferConfig,
}

/// `P` processing elements bound to one [`MainBuffer`], executing compound
/// instructions that expand into correlated memory+PE micro-cycles (spec
/// §4.3).
#[derive(Debug)]
pub struct Accelerator {
    config: AcceleratorConfig,
    pes: Vec<ProcessingElement>,
    buffer: MainBuffer,
    pc: Word,
}

impl Accelerator {
    /// Validate `config` and construct an accelerator with all PEs and the
    /// buffer zeroed.
    pub fn new(config: AcceleratorConfig) -> Result<Self> {
        let expected_pe_count = config.buffer.m0_bits / config.pe.input_bits;
        if config.buffer.m0_bits % config.pe.input_bits != 0 || expected_pe_count != config.pe_count {
            return Err(AccelError::ConfigError(format!(
                "PE_COUNT ({}) must equal M0_BITS / INPUT_BITS ({} / {})",
                config.pe_count, config.buffer.m0_bits, config.pe.input_bits
            )));
        }
        if config.buffer.m1_bits != config.pe.input_bits {
            return Err(AccelError::ConfigError(format!(
                "INPUT_BITS ({}) must equal M1_BITS ({})",
                config.pe.input_bits, config.buffer.m1_bits
            )));
        }
        let expected_pe_count_out = config.buffer.m2_bits / config.pe.out_bits;
        if config.buffer.m2_bits % config.pe.out_bits != 0 || expected_pe_count_out != config.pe_count {
            return Err(AccelError::ConfigError(format!(
                "PE_COUNT ({}) must equal M2_BITS / OUT_BITS ({} / {})",
                config.pe_count, config.buffer.m2_bits, config.pe.out_bits
            )));
        }

        let pes = (0..config.pe_count).map(|_| ProcessingElement::new(config.pe)).collect();
        Ok(Self {
            config,
            pes,
            buffer: MainBuffer::new(config.buffer),
            pc: 0,
        })
    }

    /// Load the entire MEM0 bank.
    pub fn set_mem0(&mut self, data: &[u64]) -> Result<()> {
        self.buffer.set_mem0(data)
    }

    /// Load the entire MEM1 bank.
    pub fn set_mem1(&mut self, data: &[u64]) -> Result<()> {
        self.buffer.set_mem1(data)
    }

    /// The full MEM2 bank.
    pub fn mem2(&self) -> &[u64] {
        self.buffer.read_mem2()
    }

    /// The program counter: incremented once per compound instruction
    /// executed by [`Self::execute_instruction`] (spec §4.3 leaves this
    /// policy to the implementer).
    pub fn pc(&self) -> Word {
        self.pc
    }

    /// Concatenate every PE's output register, ascending PE index
    /// left-to-right: PE 0 occupies the most-significant bits, PE `P-1`
    /// the least-significant (spec §4.3, §9 Open Question 3; spec §8
    /// scenario 8).
    fn concatenate_pe_outputs(&self) -> u64 {
        let out_bits = self.config.pe.out_bits as u64;
        let last = self.pes.len() as u64 - 1;
        let mut r: u64 = 0;
        for (i, pe) in self.pes.iter().enumerate() {
            let shift = (last - i as u64) * out_bits;
            r |= (pe.output() & pe_types::bits::mask(self.config.pe.out_bits)) << shift;
        }
        r
    }

    fn route_mem0_to_inputs(&mut self) {
        let word = self.buffer.read_mem0_output();
        let input_bits = self.config.pe.input_bits;
        let shared_b = self.buffer.read_mem1_output();
        for (k, pe) in self.pes.iter_mut().enumerate() {
            let a = extract_lane_lsb_first(word, k as u32, input_bits);
            pe.input_a(a);
            pe.input_b(shared_b);
        }
    }

    /// Expand one compound instruction into `count + 1` micro-cycles (spec
    /// §4.3, §5). Per cycle: latch the MEM2 write port from the PE outputs
    /// (only on WRITE), run the memory micro-op, route MEM0/MEM1 read ports
    /// to PE inputs (only on READ), then run the PE micro-op on every PE.
    ///
    /// Any sub-op error aborts the remaining cycles of this instruction and
    /// is returned; cycles already completed are not rolled back.
    pub fn execute_instruction(&mut self, inst: Instruction) -> Result<()> {
        let cycles = inst.count + 1;
        tracing::debug!(cycles, mem_opcode = ?inst.mem.opcode, pe_op = ?inst.pe.op, "compound instruction");

        for i in 0..cycles {
            let mema_offset = inst.mem.mema_offset.wrapping_add(i * inst.mema_inc);
            let memb_offset = inst.mem.memb_offset.wrapping_add(i * inst.memb_inc);
            let mem_inst = MemoryInstruction {
                opcode: inst.mem.opcode,
                mode: inst.mem.mode,
                mema_offset,
                memb_offset,
            };

            tracing::trace!(cycle = i, mema_offset, memb_offset, "expanded micro-cycle");

            if mem_inst.opcode == MemoryOpcode::Write {
                self.buffer.write_mem2_output(self.concatenate_pe_outputs());
            }

            self.buffer.execute_instruction(&mem_inst)?;

            if mem_inst.opcode == MemoryOpcode::Read {
                self.route_mem0_to_inputs();
            }

            for pe in &mut self.pes {
                pe.execute_instruction(inst.pe)?;
            }
        }

        self.pc = self.pc.wrapping_add(1);
        Ok(())
    }

    /// Run `stream` in order with no inter-instruction state reset.
    pub fn execute_instructions(&mut self, stream: &[Instruction]) -> Result<()> {
        for inst in stream {
            self.execute_instruction(*inst)?;
        }
        Ok(())
    }
}
