//! # harc-codec
//!
//! Machine instruction codec for the harc backend.
//!
//! The crate turns raw instruction bytes into a compact, bit-packed
//! [`Instruction`](x86_64::Instruction) record and back, and prints records
//! as Intel or AT&T assembly:
//!
//! ```
//! use harc_codec::x86_64::{self, FormatterConfig};
//! use harc_core::AssemblySyntax;
//!
//! let decoded = x86_64::try_decode(&[0x48, 0x89, 0xC8]).unwrap();
//! assert_eq!(decoded.size, 3);
//! assert_eq!(decoded.instruction.to_string(), "mov rax, rcx");
//!
//! let att = FormatterConfig::new(AssemblySyntax::Att);
//! assert_eq!(x86_64::format(&decoded.instruction, &att), "mov %rcx,%rax");
//!
//! let bytes = x86_64::encode(&decoded.instruction).unwrap();
//! assert_eq!(bytes, [0x48, 0x89, 0xC8]);
//! ```

pub mod error;
pub mod traits;

#[cfg(feature = "x86_64")]
pub mod x86_64;

pub use error::{DecodeError, DecodeErrorKind, EncodeError};
pub use traits::{Decoded, InstructionDecoder, InstructionEncoder};

#[cfg(feature = "x86_64")]
pub use x86_64::{FormatterConfig, Instruction, X86_64Decoder, X86_64Encoder};
