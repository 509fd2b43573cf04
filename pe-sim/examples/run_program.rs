//! Assembles a tiny mnemonic program and runs it against a one-PE
//! accelerator, printing the resulting MEM2 contents. Not part of the
//! public API; demonstrates the parser -> pack/unpack -> engine path an
//! external driver would use end to end.
//!
//! Run with `cargo run -p pe-sim --example run_program`.

use pe_asm::{pack, unpack, InstConfig};
use pe_sim::{Accelerator, AcceleratorConfig, BufferConfig, PeConfig};

fn main() {
    tracing_subscriber::fmt::init();

    let cfg = InstConfig::reference();
    let program_text = "\
        # load A=15, B=-6 and accumulate\n\
        READ INT32 0 0 ; MAC INT32 ; 0 0 0\n\
        NOP ; OUT INT32 ; 0 0 0\n\
        WRITE INT32 0 ; NOP INT32 ; 0 0 0\n\
    ";
    let program = pe_asm::parser::parse_program(program_text).expect("program assembles");

    // Round-trip every instruction through the wire format, the way a real
    // loader would receive packed words rather than decoded structs.
    let wire_program: Vec<_> = program
        .iter()
        .map(|inst| unpack(pack(inst, &cfg).expect("packs"), &cfg).expect("unpacks"))
        .collect();

    let pe = PeConfig::new(32, 64, 32).expect("valid PE shape");
    let buffer = BufferConfig {
        m0_bits: pe.input_bits,
        m0_depth: 16,
        m1_bits: pe.input_bits,
        m1_depth: 16,
        m2_bits: pe.out_bits,
        m2_depth: 16,
    };
    let mut acc = Accelerator::new(AcceleratorConfig {
        counter_bits: 16,
        pe_count: 1,
        pe,
        buffer,
    })
    .expect("valid accelerator config");

    let mut mem0 = vec![0u64; 16];
    mem0[0] = 15i64 as u32 as u64;
    acc.set_mem0(&mem0).expect("mem0 loads");
    let mut mem1 = vec![0u64; 16];
    mem1[0] = (-6i32) as u32 as u64;
    acc.set_mem1(&mem1).expect("mem1 loads");

    acc.execute_instructions(&wire_program).expect("program runs");

    println!("pc = {}", acc.pc());
    println!("mem2[0] = {:#010x}", acc.mem2()[0] as u32);
}
