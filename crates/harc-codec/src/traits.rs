//! Codec traits.

use crate::error::{DecodeError, EncodeError};

/// Result of decoding an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoded<I> {
    /// The decoded instruction.
    pub instruction: I,
    /// Number of bytes consumed.
    pub size: usize,
}

/// Trait for architecture-specific instruction decoders.
pub trait InstructionDecoder {
    type Instruction;

    /// Decode a single instruction from the start of `bytes`.
    ///
    /// # Returns
    /// The decoded instruction and the number of bytes consumed.
    fn decode_instruction(&self, bytes: &[u8]) -> Result<Decoded<Self::Instruction>, DecodeError>;

    /// Returns the minimum instruction size for this architecture.
    fn min_instruction_size(&self) -> usize;

    /// Returns the maximum instruction size for this architecture.
    fn max_instruction_size(&self) -> usize;

    /// Returns whether instructions are fixed-width.
    fn is_fixed_width(&self) -> bool;

    /// Decode a contiguous block of code. Error offsets are relative to the
    /// instruction being decoded, not to the block.
    fn decode_block(&self, bytes: &[u8]) -> Vec<Result<Decoded<Self::Instruction>, DecodeError>> {
        let mut instructions = Vec::new();
        let mut offset = 0;

        while offset < bytes.len() {
            match self.decode_instruction(&bytes[offset..]) {
                Ok(decoded) => {
                    offset += decoded.size;
                    instructions.push(Ok(decoded));
                }
                Err(e) => {
                    // Resynchronize one byte further on
                    offset += 1;
                    instructions.push(Err(e));
                }
            }
        }

        instructions
    }
}

/// Trait for architecture-specific instruction encoders.
pub trait InstructionEncoder {
    type Instruction;

    /// Append the encoding of `instruction` to `out`, returning its length.
    /// On error `out` is left unchanged.
    fn encode_into(&self, instruction: &Self::Instruction, out: &mut Vec<u8>) -> Result<usize, EncodeError>;

    /// Encode a single instruction.
    fn encode(&self, instruction: &Self::Instruction) -> Result<Vec<u8>, EncodeError> {
        let mut out = Vec::new();
        self.encode_into(instruction, &mut out)?;
        Ok(out)
    }

    /// Concatenate the encodings of a sequence of instructions.
    fn encode_block(&self, instructions: &[Self::Instruction]) -> Result<Vec<u8>, EncodeError> {
        let mut out = Vec::new();
        for instruction in instructions {
            self.encode_into(instruction, &mut out)?;
        }
        Ok(out)
    }
}
