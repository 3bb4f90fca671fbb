//! Instruction Set Architecture (ISA) Definitions.
//!
//! Contains opcodes, function codes, the instruction-kind tag and the decoder for
//! the RV32I subset executed by the core.
//!
//! # Structure
//!
//! * `rv32i`: Major opcodes and funct3/funct7 codes of the base integer set.
//! * `instruction`: `InstKind` and its classification (register write, unit, stall class).
//! * `decode`: Field extraction, immediate construction and kind lookup.
//! * `abi`: ABI register indices.

/// Application Binary Interface (ABI) register name mappings.
pub mod abi;

/// Instruction decoding logic for all RV32I instruction formats.
pub mod decode;

/// Instruction kind tag and classification helpers.
pub mod instruction;

/// Base integer instruction set (32-bit RISC-V core instructions).
pub mod rv32i;
