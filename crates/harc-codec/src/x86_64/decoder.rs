//! x86_64 instruction decoder.
//!
//! Decoding walks the prefix chain (legacy prefixes, then at most one REX,
//! REX2, VEX or EVEX header), the opcode escapes and the opcode byte, then
//! reads whatever structural fields the opcode's properties call for. Every
//! read is bounds-checked against both the input and the 15-byte limit.

use super::categories::{self, ByteCategory};
use super::instruction::{Instruction, LegacyPrefix1, VectorFields};
use super::modrm::{ModRm, Sib};
use super::prefix::{Evex, LegacyPrefixes, MandatoryPrefix, PrefixInfo, Rex, Rex2, Vex};
use super::properties::{self, OperandClass};
use crate::error::DecodeError;
use crate::traits::InstructionDecoder;

/// Architectural limit on the length of one instruction.
pub const MAX_INSTRUCTION_LENGTH: usize = 15;

/// A decoded x86-64 instruction and its length in bytes.
pub type Decoded = crate::traits::Decoded<Instruction>;

/// Decodes one instruction from the start of `bytes`.
pub fn decode(bytes: &[u8]) -> Option<Decoded> {
    try_decode(bytes).ok()
}

/// Decodes one instruction, reporting why and where decoding failed.
pub fn try_decode(bytes: &[u8]) -> Result<Decoded, DecodeError> {
    let result = Cursor::new(bytes).decode();
    if let Err(err) = &result {
        log::trace!("rejected encoding ({:?} at offset {}): {}", err.kind(), err.offset(), err);
    }
    result
}

/// x86_64 instruction decoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct X86_64Decoder;

impl X86_64Decoder {
    /// Creates a new x86_64 decoder.
    pub fn new() -> Self {
        Self
    }
}

impl InstructionDecoder for X86_64Decoder {
    type Instruction = Instruction;

    fn decode_instruction(&self, bytes: &[u8]) -> Result<Decoded, DecodeError> {
        try_decode(bytes)
    }

    fn min_instruction_size(&self) -> usize {
        1
    }

    fn max_instruction_size(&self) -> usize {
        MAX_INSTRUCTION_LENGTH
    }

    fn is_fixed_width(&self) -> bool {
        false
    }
}

/// Extension bits contributed by the REX-family header, already shifted
/// into place for the register fields.
#[derive(Debug, Clone, Copy, Default)]
struct Extensions {
    r: u8,
    x: u8,
    b: u8,
    /// EVEX.X, which extends ModRM.rm to bit 4 in register-direct forms.
    evex_x: u8,
}

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn available(&self) -> usize {
        self.bytes.len().saturating_sub(self.pos)
    }

    fn peek(&self) -> Result<u8, DecodeError> {
        self.bytes
            .get(self.pos)
            .copied()
            .ok_or_else(|| DecodeError::truncated(self.pos, 1, 0))
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        let end = self.pos + n;
        if end > MAX_INSTRUCTION_LENGTH {
            return Err(DecodeError::too_long(end));
        }
        let slice = self
            .bytes
            .get(self.pos..end)
            .ok_or_else(|| DecodeError::truncated(self.pos, n, self.available()))?;
        self.pos = end;
        Ok(slice)
    }

    fn byte(&mut self) -> Result<u8, DecodeError> {
        let slice = self.take(1)?;
        Ok(slice[0])
    }

    /// Little-endian value of `n` bytes, sign-extended.
    fn signed(&mut self, n: usize) -> Result<i64, DecodeError> {
        if n == 0 {
            return Ok(0);
        }
        let shift = 64 - 8 * n as u32;
        Ok((self.unsigned(n)? as i64) << shift >> shift)
    }

    fn unsigned(&mut self, n: usize) -> Result<u64, DecodeError> {
        let raw = self.take(n)?;
        let mut buf = [0u8; 8];
        buf[..n].copy_from_slice(raw);
        Ok(u64::from_le_bytes(buf))
    }

    /// Consumes `0F`, `0F 38` or `0F 3A` and returns the selected map.
    fn escapes(&mut self) -> Result<u8, DecodeError> {
        if self.peek()? != 0x0F {
            return Ok(0);
        }
        self.take(1)?;
        let map = match self.peek()? {
            0x38 => 2,
            0x3A => 3,
            _ => return Ok(1),
        };
        self.take(1)?;
        Ok(map)
    }

    /// A REX or REX2 header must be followed directly by the opcode.
    fn reject_prefix_after_header(&self) -> Result<(), DecodeError> {
        let byte = self.peek()?;
        let category = categories::classify(0, MandatoryPrefix::None, byte);
        if category.is_legacy_prefix() || category.is_rex_family() {
            return Err(DecodeError::conflicting_prefix(self.pos, byte));
        }
        Ok(())
    }

    fn decode(mut self) -> Result<Decoded, DecodeError> {
        if self.bytes.is_empty() {
            return Err(DecodeError::EmptyInput);
        }

        let mut prefixes = LegacyPrefixes::default();
        loop {
            let byte = self.peek()?;
            if !categories::classify(0, MandatoryPrefix::None, byte).is_legacy_prefix() {
                break;
            }
            self.take(1)?;
            prefixes.apply(byte);
        }

        let mut insn = Instruction::default();
        insn.payloads.prefix1 = prefixes.group1;
        insn.payloads.prefix2 = prefixes.group2;
        insn.payloads.prefix3 = prefixes.group3;
        insn.payloads.prefix4 = prefixes.group4;

        let header_at = self.pos;
        let lead = self.peek()?;
        let mut ext = Extensions::default();
        let (page, map) = match categories::classify(0, MandatoryPrefix::None, lead) {
            ByteCategory::Rex => {
                self.take(1)?;
                let rex = Rex::from_byte(lead).ok_or_else(|| DecodeError::unrecognized_opcode(header_at, lead))?;
                ext.r = u8::from(rex.r) << 3;
                ext.x = u8::from(rex.x) << 3;
                ext.b = u8::from(rex.b) << 3;
                insn.payloads.vector = VectorFields::default().with_w(rex.w);
                self.reject_prefix_after_header()?;
                let page = if rex.w { PrefixInfo::RexW1 } else { PrefixInfo::RexW0 };
                (page, self.escapes()?)
            }
            ByteCategory::Rex2 => {
                let raw = self.take(2)?;
                let rex2 = Rex2::from_payload(raw[1]);
                ext.r = u8::from(rex2.r3) << 3 | u8::from(rex2.r4) << 4;
                ext.x = u8::from(rex2.x3) << 3 | u8::from(rex2.x4) << 4;
                ext.b = u8::from(rex2.b3) << 3 | u8::from(rex2.b4) << 4;
                insn.payloads.vector = VectorFields::default().with_w(rex2.w);
                if rex2.map() == 0 {
                    self.reject_prefix_after_header()?;
                    let byte = self.peek()?;
                    if categories::classify(0, MandatoryPrefix::None, byte) == ByteCategory::Escape {
                        return Err(DecodeError::unrecognized_opcode(self.pos, byte));
                    }
                }
                (PrefixInfo::Rex2, rex2.map())
            }
            ByteCategory::Vex2 | ByteCategory::Vex3 | ByteCategory::Evex if prefixes.blocks_vex() => {
                return Err(DecodeError::conflicting_prefix(header_at, lead));
            }
            ByteCategory::Vex2 => {
                let raw = self.take(2)?;
                let vex = Vex::from_2byte(raw[1]);
                apply_vex(&mut insn, &mut ext, vex);
                (PrefixInfo::Vex2, 1)
            }
            ByteCategory::Vex3 => {
                let raw = self.take(3)?;
                let vex = Vex::from_3byte(raw[1], raw[2]);
                match vex.map {
                    1..=3 => {}
                    0 | 4 => return Err(DecodeError::unsupported(header_at, "VEX opcode map 0 or 4")),
                    _ => return Err(DecodeError::unrecognized_opcode(header_at + 1, raw[1])),
                }
                apply_vex(&mut insn, &mut ext, vex);
                (PrefixInfo::vex3_map(vex.map), vex.map)
            }
            ByteCategory::Evex => {
                let raw = self.take(4)?;
                let evex = Evex::from_bytes(raw[1], raw[2], raw[3])
                    .map_err(|reason| DecodeError::unsupported(header_at, reason))?;
                match evex.map {
                    1..=3 => {}
                    4..=6 => return Err(DecodeError::unsupported(header_at, "EVEX opcode map 4 to 6")),
                    _ => return Err(DecodeError::unrecognized_opcode(header_at + 1, raw[1])),
                }
                ext.r = u8::from(evex.r) << 3 | u8::from(evex.r_prime) << 4;
                ext.x = u8::from(evex.x) << 3;
                ext.b = u8::from(evex.b) << 3;
                ext.evex_x = u8::from(evex.x) << 4;
                insn.payloads.d_reg = evex.vvvv | u8::from(evex.v_prime) << 4;
                insn.payloads.vector = VectorFields::default()
                    .with_w(evex.w)
                    .with_vector_length(evex.ll)
                    .with_pp(evex.pp)
                    .with_zeroing(evex.z)
                    .with_broadcast(evex.bcst);
                insn.interface.set_mask(Some(evex.aaa).filter(|&k| k != 0));
                (PrefixInfo::Evex, evex.map)
            }
            _ => {
                let map = self.escapes()?;
                let page = if prefixes.group1 == LegacyPrefix1::Lock {
                    PrefixInfo::Lock
                } else {
                    PrefixInfo::legacy_map(map)
                };
                (page, map)
            }
        };

        let opcode_at = self.pos;
        let opcode = self.byte()?;
        insn.payloads.page = page;
        insn.payloads.opcode = opcode;
        insn.payloads.map_ext = map;

        let category = if page.is_vector() {
            categories::classify_vex(map, opcode)
        } else {
            categories::classify(map, insn.mandatory_prefix(), opcode)
        };
        let (extension, register_form) = match category {
            ByteCategory::Opcode => (0, false),
            ByteCategory::Group => {
                let modrm = ModRm::parse(self.peek()?);
                (modrm.reg, modrm.is_register())
            }
            _ => return Err(DecodeError::unrecognized_opcode(opcode_at, opcode)),
        };
        insn.payloads.map_ext = map | extension << 5;
        let info = properties::lookup(insn.composite_opcode(), register_form)
            .ok_or_else(|| DecodeError::unrecognized_opcode(opcode_at, opcode))?;
        let props = info.properties;

        insn.payloads.r_reg = ext.r;
        insn.payloads.x_reg = ext.x;
        insn.payloads.b_reg = ext.b;

        if props.has_modrm() {
            let modrm_at = self.pos;
            let raw = self.byte()?;
            let modrm = ModRm::parse(raw);
            insn.payloads.map_ext = map | modrm.reg << 5;
            insn.payloads.r_reg |= modrm.reg;
            insn.interface.set_addressing_mode(modrm.mode);

            if modrm.is_register() || props.is_register_only() {
                if props.rm_class() == OperandClass::Mem {
                    return Err(DecodeError::unrecognized_opcode(modrm_at, raw));
                }
                insn.payloads.b_reg |= modrm.rm;
                if page == PrefixInfo::Evex {
                    insn.payloads.b_reg |= ext.evex_x;
                    insn.payloads.x_reg = 0;
                }
            } else {
                let size = if modrm.needs_sib() {
                    let sib = Sib::parse(self.byte()?);
                    insn.interface.set_has_sib(true);
                    insn.payloads.scale = sib.scale;
                    insn.payloads.x_reg |= sib.index;
                    insn.payloads.b_reg |= sib.base;
                    modrm.displacement_size(Some(sib.base))
                } else {
                    insn.payloads.b_reg |= modrm.rm;
                    modrm.displacement_size(None)
                };
                // EVEX disp8 is kept unscaled
                insn.payloads.displacement = self.signed(size)? as i32;
            }

            if props.reg_class() == OperandClass::Segment && insn.payloads.r_reg >= 6 {
                return Err(DecodeError::unrecognized_opcode(modrm_at, raw));
            }
        } else if props.has_opcode_register() {
            insn.payloads.b_reg |= opcode & 7;
        }

        if props.is_moffs() {
            let width = if prefixes.address_size() { 4 } else { 8 };
            insn.payloads.offset = self.unsigned(width)?;
        }

        insn.resolve(props);
        insn.payloads.imm0 = self.signed(insn.interface.imm0_size().bytes())?;
        if props.has_imm1() {
            insn.payloads.imm1 = self.byte()?;
        }

        Ok(Decoded {
            instruction: insn,
            size: self.pos,
        })
    }
}

fn apply_vex(insn: &mut Instruction, ext: &mut Extensions, vex: Vex) {
    ext.r = u8::from(vex.r) << 3;
    ext.x = u8::from(vex.x) << 3;
    ext.b = u8::from(vex.b) << 3;
    insn.payloads.d_reg = vex.vvvv;
    insn.payloads.vector = VectorFields::default()
        .with_w(vex.w)
        .with_vector_length(u8::from(vex.l))
        .with_pp(vex.pp);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeErrorKind;
    use crate::x86_64::instruction::{AddressingMode, Imm0Size, LegacyPrefix2, Scale};
    use harc_core::{Gpr32, Gpr64, MaskReg, Register, SegmentReg, ZmmReg};

    fn decode_ok(bytes: &[u8]) -> Decoded {
        try_decode(bytes).unwrap_or_else(|e| panic!("{bytes:02x?}: {e}"))
    }

    fn kind(bytes: &[u8]) -> DecodeErrorKind {
        try_decode(bytes).unwrap_err().kind()
    }

    #[test]
    fn test_push_rax() {
        let decoded = decode_ok(&[0x50]);
        assert_eq!(decoded.size, 1);
        assert_eq!(decoded.instruction.b_register(), Register::from(Gpr64::Rax));
    }

    #[test]
    fn test_push_r12() {
        let decoded = decode_ok(&[0x41, 0x54]);
        assert_eq!(decoded.size, 2);
        assert_eq!(decoded.instruction.page(), PrefixInfo::RexW0);
        assert_eq!(decoded.instruction.b_register(), Register::from(Gpr64::R12));
    }

    #[test]
    fn test_lock_add() {
        let decoded = decode_ok(&[0xF0, 0x01, 0xC0]);
        assert_eq!(decoded.size, 3);
        let insn = decoded.instruction;
        assert_eq!(insn.page(), PrefixInfo::Lock);
        assert_eq!(insn.lock_rep(), LegacyPrefix1::Lock);
        assert_eq!(insn.addressing_mode(), AddressingMode::Direct);
        assert_eq!(insn.r_register(), Register::from(Gpr32::Eax));
    }

    #[test]
    fn test_multibyte_nop() {
        let decoded = decode_ok(&[0x0F, 0x1F, 0x00]);
        assert_eq!(decoded.size, 3);
        assert_eq!(decoded.instruction.opcode_map(), 1);
        assert!(decoded.instruction.has_memory_operand());
    }

    #[test]
    fn test_empty_and_truncated() {
        assert_eq!(try_decode(&[]), Err(DecodeError::EmptyInput));
        assert_eq!(kind(&[0xFF]), DecodeErrorKind::TruncatedInstruction);
        assert_eq!(kind(&[0x0F]), DecodeErrorKind::TruncatedInstruction);
        assert_eq!(kind(&[0x66, 0x66]), DecodeErrorKind::TruncatedInstruction);
        assert_eq!(try_decode(&[0xE8, 0x01, 0x02]), Err(DecodeError::truncated(1, 4, 2)));
        assert!(decode(&[0xC4, 0xE2]).is_none());
    }

    #[test]
    fn test_rex_then_vex_conflicts() {
        assert_eq!(
            try_decode(&[0x48, 0xC5, 0xF8, 0x77]),
            Err(DecodeError::conflicting_prefix(1, 0xC5))
        );
        assert_eq!(kind(&[0x48, 0x66, 0x90]), DecodeErrorKind::ConflictingPrefixEncoding);
        assert_eq!(kind(&[0x48, 0x48, 0x90]), DecodeErrorKind::ConflictingPrefixEncoding);
        assert_eq!(kind(&[0x66, 0xC5, 0xF8, 0x77]), DecodeErrorKind::ConflictingPrefixEncoding);
        assert_eq!(kind(&[0xF3, 0x62, 0xF1, 0x7C, 0x48, 0x58, 0xC2]), DecodeErrorKind::ConflictingPrefixEncoding);
    }

    #[test]
    fn test_too_long() {
        let mut bytes = vec![0x66; 14];
        bytes.extend_from_slice(&[0x05, 0x00, 0x00]);
        assert_eq!(kind(&bytes), DecodeErrorKind::InstructionTooLong);

        let mut bytes = vec![0x2E; 14];
        bytes.push(0x90);
        assert_eq!(decode_ok(&bytes).size, 15);
    }

    #[test]
    fn test_last_prefix_in_group_wins() {
        let insn = decode_ok(&[0x2E, 0x64, 0x8B, 0x00]).instruction;
        assert_eq!(insn.segment_override(), LegacyPrefix2::Fs);
        assert_eq!(insn.segment_override().segment(), SegmentReg::Fs);
    }

    #[test]
    fn test_mov_imm64() {
        let decoded = decode_ok(&[0x48, 0xB8, 0x88, 0x77, 0x66, 0x55, 0x44, 0x33, 0x22, 0x11]);
        assert_eq!(decoded.size, 10);
        assert_eq!(decoded.instruction.interface().imm0_size(), Imm0Size::Eight);
        assert_eq!(decoded.instruction.imm0(), Some(0x1122_3344_5566_7788));
    }

    #[test]
    fn test_sign_extended_immediate() {
        // add eax, -1
        let insn = decode_ok(&[0x83, 0xC0, 0xFF]).instruction;
        assert_eq!(insn.imm0(), Some(-1));
    }

    #[test]
    fn test_rip_relative_and_sib() {
        let insn = decode_ok(&[0x48, 0x8B, 0x05, 0x10, 0x00, 0x00, 0x00]).instruction;
        assert!(insn.is_rip_relative());
        assert_eq!(insn.displacement(), 0x10);
        assert_eq!(insn.b_register(), Register::NULL);

        let decoded = decode_ok(&[0x8B, 0x44, 0x8C, 0xF8]);
        assert_eq!(decoded.size, 4);
        let insn = decoded.instruction;
        assert!(insn.has_sib());
        assert_eq!(insn.scale(), Scale::X4);
        assert_eq!(insn.b_register(), Register::from(Gpr64::Rsp));
        assert_eq!(insn.index_register(), Register::from(Gpr64::Rcx));
        assert_eq!(insn.displacement(), -8);
    }

    #[test]
    fn test_moffs_width_follows_address_size() {
        let decoded = decode_ok(&[0xA1, 1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(decoded.size, 9);
        assert_eq!(decoded.instruction.offset(), 0x0807_0605_0403_0201);
        assert_eq!(decode_ok(&[0x67, 0xA1, 1, 2, 3, 4]).size, 6);
    }

    #[test]
    fn test_memory_only_operand_rejects_register_form() {
        // lea eax, eax
        assert_eq!(try_decode(&[0x8D, 0xC0]), Err(DecodeError::unrecognized_opcode(1, 0xC0)));
    }

    #[test]
    fn test_invalid_segment_register() {
        assert_eq!(kind(&[0x8C, 0xF0]), DecodeErrorKind::UnrecognizedOpcode);
        assert!(decode(&[0x8C, 0xE0]).is_some());
    }

    #[test]
    fn test_unused_opcode() {
        assert_eq!(try_decode(&[0x06]), Err(DecodeError::unrecognized_opcode(0, 0x06)));
        assert_eq!(try_decode(&[0x0F, 0x04]), Err(DecodeError::unrecognized_opcode(1, 0x04)));
    }

    #[test]
    fn test_rex_bits_survive_without_fields() {
        // ret with a meaningless REX.R
        let insn = decode_ok(&[0x44, 0xC3]).instruction;
        assert_eq!(insn.r_reg(), 8);
    }

    #[test]
    fn test_vzeroupper() {
        let decoded = decode_ok(&[0xC5, 0xF8, 0x77]);
        assert_eq!(decoded.size, 3);
        assert_eq!(decoded.instruction.page(), PrefixInfo::Vex2);
    }

    #[test]
    fn test_vex_map_errors() {
        assert_eq!(kind(&[0xC4, 0xE0, 0x78, 0x10, 0xC0]), DecodeErrorKind::UnsupportedEncoding);
        assert_eq!(kind(&[0xC4, 0xE4, 0x78, 0x10, 0xC0]), DecodeErrorKind::UnsupportedEncoding);
        assert_eq!(kind(&[0xC4, 0xE7, 0x78, 0x10, 0xC0]), DecodeErrorKind::UnrecognizedOpcode);
    }

    #[test]
    fn test_evex_register_form() {
        // vaddps zmm0{k1}{z}, zmm0, zmm2
        let decoded = decode_ok(&[0x62, 0xF1, 0x7C, 0xC9, 0x58, 0xC2]);
        assert_eq!(decoded.size, 6);
        let insn = decoded.instruction;
        assert_eq!(insn.page(), PrefixInfo::Evex);
        assert_eq!(insn.vector_length(), 2);
        assert!(insn.zeroing());
        assert_eq!(insn.mask_register(), Some(MaskReg::K1));
        assert_eq!(insn.b_register(), Register::from(ZmmReg::Zmm2));
        assert_eq!(insn.vvvv_register(), Register::from(ZmmReg::Zmm0));
    }

    #[test]
    fn test_evex_unsupported_maps() {
        assert_eq!(kind(&[0x62, 0xF5, 0x7C, 0x48, 0x58, 0xC2]), DecodeErrorKind::UnsupportedEncoding);
        // EVEX.U cleared
        assert_eq!(kind(&[0x62, 0xF1, 0x78, 0x48, 0x58, 0xC2]), DecodeErrorKind::UnsupportedEncoding);
    }

    #[test]
    fn test_rex2() {
        // add rax, r16 style: REX2.W with R4 set
        let insn = decode_ok(&[0xD5, 0x48, 0x01, 0xC0]).instruction;
        assert_eq!(insn.page(), PrefixInfo::Rex2);
        assert!(insn.w());
        assert_eq!(insn.r_reg(), 16);

        assert_eq!(kind(&[0xD5, 0x00, 0x0F, 0x05]), DecodeErrorKind::UnrecognizedOpcode);
        // M0 selects map 1: syscall
        assert_eq!(decode_ok(&[0xD5, 0x80, 0x05]).instruction.opcode_map(), 1);
    }

    #[test]
    fn test_decode_block_resynchronizes() {
        let decoder = X86_64Decoder::new();
        let results = decoder.decode_block(&[0x50, 0x06, 0xC3]);
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
        assert_eq!(results[2].as_ref().map(|d| d.size), Ok(1));
    }
}
