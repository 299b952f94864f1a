//! x86-64 instruction codec.
//!
//! Decoding is table driven: every byte of every opcode map is classified
//! (prefix, escape, opcode, group, unused), and each defined opcode has a
//! packed property word describing the fields that follow it and how its
//! operands are printed. The decoder walks these tables, the encoder replays
//! them in reverse, and the printer renders the result in Intel or AT&T
//! syntax.
//!
//! Supported prefix families:
//! - Legacy prefixes (LOCK, REP/REPNE, segment overrides, operand/address size)
//! - REX and REX2 (APX) for 64-bit operands and extended registers
//! - VEX2/VEX3 and EVEX for AVX and AVX-512

pub mod categories;
mod decoder;
mod encoder;
mod formatter;
pub mod instruction;
mod mnemonics;
mod modrm;
mod opcodes;
mod opcodes_0f38;
mod opcodes_0f3a;
mod opcodes_vex;
pub mod prefix;
pub mod properties;
mod x87;

pub use categories::ByteCategory;
pub use decoder::{decode, try_decode, Decoded, X86_64Decoder, MAX_INSTRUCTION_LENGTH};
pub use encoder::{encode, encode_block, encode_into, encoded_length, X86_64Encoder};
pub use formatter::{format, format_decoded, FormatterConfig};
pub use instruction::{Instruction, InstructionBuilder, InstructionInterface, InstructionPayloads};
pub use mnemonics::NameTable;
pub use prefix::{MandatoryPrefix, PrefixInfo};
pub use properties::{CompositeOpcode, OpcodeInfo, OpcodeProperties};
