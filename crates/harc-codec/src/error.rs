//! Codec error types.

use thiserror::Error;

/// Decode failure classes, without their location details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecodeErrorKind {
    EmptyInput,
    UnrecognizedOpcode,
    ConflictingPrefixEncoding,
    TruncatedInstruction,
    UnsupportedEncoding,
    InstructionTooLong,
}

/// Error type for instruction decoding.
///
/// Every variant except `EmptyInput` carries the byte offset, relative to the
/// start of the decoded span, at which decoding stopped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// No bytes were supplied.
    #[error("empty input")]
    EmptyInput,

    /// The byte at `offset` has no defined instruction in the active opcode map.
    #[error("unrecognized opcode {byte:#04x} at offset {offset}")]
    UnrecognizedOpcode { offset: usize, byte: u8 },

    /// Two mutually exclusive prefix families, or a legacy prefix after a REX-family prefix.
    #[error("conflicting prefix {byte:#04x} at offset {offset}")]
    ConflictingPrefixEncoding { offset: usize, byte: u8 },

    /// A field whose presence was already established runs past the input.
    #[error("truncated instruction at offset {offset}: need {needed} bytes, have {available}")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// Structurally valid but outside what the codec models.
    #[error("unsupported encoding at offset {offset}: {reason}")]
    UnsupportedEncoding { offset: usize, reason: &'static str },

    /// The encoding exceeds the architectural 15-byte limit.
    #[error("instruction too long: {length} bytes")]
    InstructionTooLong { length: usize },
}

impl DecodeError {
    /// Creates a new UnrecognizedOpcode error.
    pub fn unrecognized_opcode(offset: usize, byte: u8) -> Self {
        Self::UnrecognizedOpcode { offset, byte }
    }

    /// Creates a new ConflictingPrefixEncoding error.
    pub fn conflicting_prefix(offset: usize, byte: u8) -> Self {
        Self::ConflictingPrefixEncoding { offset, byte }
    }

    /// Creates a new Truncated error.
    pub fn truncated(offset: usize, needed: usize, available: usize) -> Self {
        Self::Truncated {
            offset,
            needed,
            available,
        }
    }

    /// Creates a new UnsupportedEncoding error.
    pub fn unsupported(offset: usize, reason: &'static str) -> Self {
        Self::UnsupportedEncoding { offset, reason }
    }

    /// Creates a new InstructionTooLong error.
    pub fn too_long(length: usize) -> Self {
        Self::InstructionTooLong { length }
    }

    /// Returns the failure class.
    pub fn kind(&self) -> DecodeErrorKind {
        match self {
            Self::EmptyInput => DecodeErrorKind::EmptyInput,
            Self::UnrecognizedOpcode { .. } => DecodeErrorKind::UnrecognizedOpcode,
            Self::ConflictingPrefixEncoding { .. } => DecodeErrorKind::ConflictingPrefixEncoding,
            Self::Truncated { .. } => DecodeErrorKind::TruncatedInstruction,
            Self::UnsupportedEncoding { .. } => DecodeErrorKind::UnsupportedEncoding,
            Self::InstructionTooLong { .. } => DecodeErrorKind::InstructionTooLong,
        }
    }

    /// Returns the byte offset at which decoding stopped.
    pub fn offset(&self) -> usize {
        match self {
            Self::EmptyInput => 0,
            Self::UnrecognizedOpcode { offset, .. }
            | Self::ConflictingPrefixEncoding { offset, .. }
            | Self::Truncated { offset, .. }
            | Self::UnsupportedEncoding { offset, .. } => *offset,
            Self::InstructionTooLong { length } => *length,
        }
    }
}

/// Error type for instruction encoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// A register number does not fit the fields of the instruction's prefix family.
    #[error("register {field} number {value} cannot be encoded with {page}")]
    RegisterOutOfRange {
        field: &'static str,
        value: u8,
        page: &'static str,
    },

    /// A field holds a value the encoding cannot represent.
    #[error("invalid {field}: {reason}")]
    InvalidField {
        field: &'static str,
        reason: &'static str,
    },

    /// The opcode coordinate has no entry in the opcode tables.
    #[error("unknown opcode {opcode:#04x} in map {map}")]
    UnknownOpcode { map: u8, opcode: u8 },
}

impl EncodeError {
    /// Creates a new RegisterOutOfRange error.
    pub fn register_out_of_range(field: &'static str, value: u8, page: &'static str) -> Self {
        Self::RegisterOutOfRange { field, value, page }
    }

    /// Creates a new InvalidField error.
    pub fn invalid_field(field: &'static str, reason: &'static str) -> Self {
        Self::InvalidField { field, reason }
    }

    /// Creates a new UnknownOpcode error.
    pub fn unknown_opcode(map: u8, opcode: u8) -> Self {
        Self::UnknownOpcode { map, opcode }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_offset() {
        let err = DecodeError::truncated(1, 2, 1);
        assert_eq!(err.kind(), DecodeErrorKind::TruncatedInstruction);
        assert_eq!(err.offset(), 1);
        assert_eq!(
            err.to_string(),
            "truncated instruction at offset 1: need 2 bytes, have 1"
        );
        assert_eq!(DecodeError::EmptyInput.offset(), 0);
        assert_eq!(
            DecodeError::unrecognized_opcode(3, 0x06).to_string(),
            "unrecognized opcode 0x06 at offset 3"
        );
    }
}
