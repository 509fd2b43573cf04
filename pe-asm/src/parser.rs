//! The mnemonic assembler surface from spec §6: turns human-readable
//! instruction text into the typed value objects in [`crate::instruction`].
//!
//! Mnemonics are `MAC|PASS|RND|OUT|CLR|NOP` (PE ops) and `READ|WRITE|NOP`
//! (memory ops), each followed by a mode suffix `INT8|INT16|INT32`, and for
//! `RND`, a decimal shift operand — e.g. `RND INT16 8` (spec §6's own
//! example). A standalone PE-op line (`parse_pe_line`) assembles just the
//! [`PeInstruction`] half, matching the way
//! `original_source/test_processing_element.py`'s `assemble_test_instruction`
//! drives the PE in isolation. [`parse_line`] assembles a full compound
//! instruction word from a memory clause, a PE clause, and the
//! increment/count fields, in the grammar documented on that function.

use pe_types::Mode;

use crate::error::{Error, Result};
use crate::instruction::{Instruction, MemoryInstruction, MemoryOpcode, PeInstruction, PeOp};

fn parse_mode(tok: &str, line: usize) -> Result<Mode> {
    match tok {
        "INT8" => Ok(Mode::Int8),
        "INT16" => Ok(Mode::Int16),
        "INT32" => Ok(Mode::Int32),
        other => Err(Error::ParseError {
            line,
            message: format!("unknown mode `{other}`, expected INT8/INT16/INT32"),
        }),
    }
}

fn parse_u32(tok: &str, field: &str, line: usize) -> Result<u32> {
    tok.parse::<u32>().map_err(|_| Error::ParseError {
        line,
        message: format!("expected a non-negative integer for {field}, got `{tok}`"),
    })
}

fn missing_operand(field: &str, line: usize) -> Error {
    Error::ParseError {
        line,
        message: format!("missing operand: {field}"),
    }
}

/// Assemble a single PE-only mnemonic line (`MAC INT16`, `RND INT16 8`, ...)
/// into a [`PeInstruction`]. `line` is the 1-based source line number used
/// in error messages.
pub fn parse_pe_line(text: &str, line: usize) -> Result<PeInstruction> {
    let mut toks = text.split_whitespace();
    let mnemonic = toks.next().ok_or_else(|| Error::ParseError {
        line,
        message: "empty instruction line".to_string(),
    })?;
    let mode_tok = toks.next().ok_or_else(|| missing_operand("mode", line))?;
    let mode = parse_mode(mode_tok, line)?;

    let op = match mnemonic {
        "MAC" => PeOp::Mac,
        "PASS" => PeOp::Pass,
        "OUT" => PeOp::Out,
        "CLR" => PeOp::Clr,
        "NOP" => PeOp::Nop,
        "RND" => {
            let shift_tok = toks.next().ok_or_else(|| missing_operand("RND shift amount", line))?;
            PeOp::Rnd(parse_u32(shift_tok, "RND shift amount", line)?)
        }
        other => {
            return Err(Error::ParseError {
                line,
                message: format!("unknown PE mnemonic `{other}`"),
            })
        }
    };

    if toks.next().is_some() {
        return Err(Error::ParseError {
            line,
            message: "trailing tokens after PE instruction".to_string(),
        });
    }

    Ok(PeInstruction { mode, op })
}

/// Assemble a single memory-only mnemonic line: `NOP`, `READ <mode>
/// <mema_offset> <memb_offset>`, or `WRITE <mode> <mema_offset>`.
pub fn parse_mem_line(text: &str, line: usize) -> Result<MemoryInstruction> {
    let mut toks = text.split_whitespace();
    let mnemonic = toks.next().ok_or_else(|| Error::ParseError {
        line,
        message: "empty instruction line".to_string(),
    })?;

    match mnemonic {
        "NOP" => Ok(MemoryInstruction {
            opcode: MemoryOpcode::Nop,
            mode: Mode::Int32,
            mema_offset: 0,
            memb_offset: 0,
        }),
        "READ" => {
            let mode = parse_mode(toks.next().ok_or_else(|| missing_operand("mode", line))?, line)?;
            let mema_offset = parse_u32(toks.next().ok_or_else(|| missing_operand("mema_offset", line))?, "mema_offset", line)?;
            let memb_offset = parse_u32(toks.next().ok_or_else(|| missing_operand("memb_offset", line))?, "memb_offset", line)?;
            Ok(MemoryInstruction {
                opcode: MemoryOpcode::Read,
                mode,
                mema_offset,
                memb_offset,
            })
        }
        "WRITE" => {
            let mode = parse_mode(toks.next().ok_or_else(|| missing_operand("mode", line))?, line)?;
            let mema_offset = parse_u32(toks.next().ok_or_else(|| missing_operand("mema_offset", line))?, "mema_offset", line)?;
            Ok(MemoryInstruction {
                opcode: MemoryOpcode::Write,
                mode,
                mema_offset,
                memb_offset: 0,
            })
        }
        other => Err(Error::ParseError {
            line,
            message: format!("unknown memory mnemonic `{other}`"),
        }),
    }
}

/// Assemble one full compound instruction line. Grammar (fields are
/// whitespace-separated, in this fixed order):
///
/// ```text
/// <mem-clause> ';' <pe-clause> ';' <mema_inc> <memb_inc> <count>
/// ```
///
/// where `<mem-clause>` is the grammar accepted by [`parse_mem_line`] and
/// `<pe-clause>` is the grammar accepted by [`parse_pe_line`]. For example:
///
/// ```text
/// READ INT16 0 0 ; MAC INT16 ; 1 0 9
/// ```
pub fn parse_line(text: &str, line: usize) -> Result<Instruction> {
    let mut clauses = text.splitn(3, ';');
    let mem_clause = clauses.next().unwrap_or_default();
    let pe_clause = clauses.next().ok_or_else(|| Error::ParseError {
        line,
        message: "expected `<mem-clause> ; <pe-clause> ; <inc/count>`".to_string(),
    })?;
    let tail = clauses.next().ok_or_else(|| Error::ParseError {
        line,
        message: "expected a third `;`-separated clause with mema_inc memb_inc count".to_string(),
    })?;

    let mem = parse_mem_line(mem_clause.trim(), line)?;
    let pe = parse_pe_line(pe_clause.trim(), line)?;

    let mut tail_toks = tail.split_whitespace();
    let mema_inc = parse_u32(tail_toks.next().ok_or_else(|| missing_operand("mema_inc", line))?, "mema_inc", line)?;
    let memb_inc = parse_u32(tail_toks.next().ok_or_else(|| missing_operand("memb_inc", line))?, "memb_inc", line)?;
    let count = parse_u32(tail_toks.next().ok_or_else(|| missing_operand("count", line))?, "count", line)?;

    Ok(Instruction {
        mem,
        pe,
        mema_inc,
        memb_inc,
        count,
    })
}

/// Assemble a whole program: one compound instruction per non-blank,
/// non-`#`-comment line.
pub fn parse_program(text: &str) -> Result<Vec<Instruction>> {
    text.lines()
        .enumerate()
        .map(|(i, raw)| (i + 1, raw.trim()))
        .filter(|(_, l)| !l.is_empty() && !l.starts_with('#'))
        .map(|(lineno, l)| parse_line(l, lineno))
        .collect()
}
