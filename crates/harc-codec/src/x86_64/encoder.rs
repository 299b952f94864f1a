//! x86_64 instruction encoder.
//!
//! Encoding is the exact inverse of [`decode`](super::decoder::decode): the
//! REX-family header is re-derived from the instruction's page, register
//! numbers and vector fields, and fields are written in the canonical order
//! legacy prefixes (`66`, `67`, segment, group 1), header, escapes, opcode,
//! ModRM, SIB, displacement or `moffs`, imm0, imm1.
//!
//! Instructions that would not decode back to themselves are refused with an
//! [`EncodeError`] rather than silently normalized.

use super::decoder::MAX_INSTRUCTION_LENGTH;
use super::instruction::{AddressingMode, Instruction, LegacyPrefix1, LegacyPrefix3, Scale};
use super::modrm::{self, ModRm, Sib};
use super::prefix::{Evex, LegacyPrefixes, PrefixInfo, Rex, Rex2, Vex};
use super::properties::OpcodeProperties;
use crate::error::EncodeError;
use crate::traits::InstructionEncoder;

/// Encodes one instruction.
pub fn encode(insn: &Instruction) -> Result<Vec<u8>, EncodeError> {
    let mut out = Vec::with_capacity(MAX_INSTRUCTION_LENGTH);
    encode_into(insn, &mut out)?;
    Ok(out)
}

/// Appends the encoding of `insn` to `out` and returns its length. On error
/// `out` is left as it was.
pub fn encode_into(insn: &Instruction, out: &mut Vec<u8>) -> Result<usize, EncodeError> {
    let start = out.len();
    let result = emit(insn, out).and_then(|()| {
        let length = out.len() - start;
        if length > MAX_INSTRUCTION_LENGTH {
            return Err(EncodeError::invalid_field("length", "encoding exceeds 15 bytes"));
        }
        Ok(length)
    });
    if let Err(err) = &result {
        out.truncate(start);
        log::debug!("refusing to encode {:?}: {}", insn.composite_opcode(), err);
    }
    result
}

/// Concatenates the encodings of a sequence of instructions.
pub fn encode_block(insns: &[Instruction]) -> Result<Vec<u8>, EncodeError> {
    let mut out = Vec::with_capacity(insns.len() * 4);
    for insn in insns {
        encode_into(insn, &mut out)?;
    }
    Ok(out)
}

/// Length in bytes `insn` encodes to.
pub fn encoded_length(insn: &Instruction) -> Result<usize, EncodeError> {
    let mut scratch = Vec::with_capacity(MAX_INSTRUCTION_LENGTH);
    encode_into(insn, &mut scratch)
}

/// x86_64 instruction encoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct X86_64Encoder;

impl X86_64Encoder {
    /// Creates a new x86_64 encoder.
    pub fn new() -> Self {
        Self
    }
}

impl InstructionEncoder for X86_64Encoder {
    type Instruction = Instruction;

    fn encode_into(&self, instruction: &Instruction, out: &mut Vec<u8>) -> Result<usize, EncodeError> {
        encode_into(instruction, out)
    }
}

fn page_name(page: PrefixInfo) -> &'static str {
    match page {
        PrefixInfo::RexW0 | PrefixInfo::RexW1 => "REX",
        PrefixInfo::Rex2 => "REX2",
        PrefixInfo::Evex => "EVEX",
        page if page.is_vex() => "VEX",
        _ => "legacy prefixes",
    }
}

fn ensure(ok: bool, field: &'static str, reason: &'static str) -> Result<(), EncodeError> {
    if ok {
        Ok(())
    } else {
        Err(EncodeError::invalid_field(field, reason))
    }
}

/// ModRM.rm names a register: register-direct, or an opcode whose memory
/// form does not exist and which ignores `mod`.
fn register_operand(insn: &Instruction, props: OpcodeProperties) -> bool {
    props.has_modrm() && (insn.addressing_mode() == AddressingMode::Direct || props.is_register_only())
}

fn validate_registers(insn: &Instruction, props: OpcodeProperties) -> Result<(), EncodeError> {
    let p = &insn.payloads;
    let page = p.page;
    let limit = page.register_limit();
    for (field, value) in [("r_reg", p.r_reg), ("b_reg", p.b_reg), ("x_reg", p.x_reg)] {
        if value >= limit {
            return Err(EncodeError::register_out_of_range(field, value, page_name(page)));
        }
    }

    let d_limit = match page {
        PrefixInfo::Evex => 32,
        page if page.is_vex() => 16,
        _ => 1,
    };
    if p.d_reg >= d_limit {
        return Err(EncodeError::register_out_of_range("d_reg", p.d_reg, page_name(page)));
    }

    let direct = register_operand(insn, props);
    if page == PrefixInfo::Evex {
        if direct {
            ensure(p.x_reg == 0, "x_reg", "EVEX register form carries X in b_reg")?;
        } else {
            if p.b_reg >= 16 {
                return Err(EncodeError::register_out_of_range("b_reg", p.b_reg, "EVEX memory operand"));
            }
            if p.x_reg >= 16 {
                return Err(EncodeError::register_out_of_range("x_reg", p.x_reg, "EVEX memory operand"));
            }
        }
    }

    // Fields absent from the encoding may only carry extension bits.
    if !props.has_modrm() {
        ensure(p.r_reg & 7 == 0, "r_reg", "no ModRM.reg field to hold it")?;
        ensure(p.x_reg & 7 == 0, "x_reg", "no SIB index field to hold it")?;
        if props.has_opcode_register() {
            ensure(p.b_reg & 7 == p.opcode & 7, "b_reg", "does not match the opcode register bits")?;
        } else {
            ensure(p.b_reg & 7 == 0, "b_reg", "no ModRM.rm field to hold it")?;
        }
    } else if !insn.has_sib() {
        ensure(p.x_reg & 7 == 0, "x_reg", "no SIB index field to hold it")?;
        ensure(p.scale == Scale::X1, "scale", "no SIB byte to hold it")?;
        if !direct {
            ensure(p.b_reg & 7 != 4, "b_reg", "rm = 100 requires a SIB byte")?;
        }
    } else {
        ensure(!direct, "has_sib", "register form has no SIB byte")?;
    }
    Ok(())
}

fn validate_page(insn: &Instruction) -> Result<(), EncodeError> {
    let p = &insn.payloads;
    let page = p.page;
    let map = insn.opcode_map();
    let vector = p.vector;

    if !page.is_vector() {
        ensure(
            vector.vector_length() == 0 && vector.pp() == 0 && !vector.zeroing() && !vector.broadcast(),
            "vector",
            "vector fields need a VEX or EVEX page",
        )?;
        ensure(insn.mask_register().is_none(), "mask", "opmask needs an EVEX page")?;
    }

    match page {
        PrefixInfo::Lock => {
            ensure(p.prefix1 == LegacyPrefix1::Lock, "page", "Lock page without a LOCK prefix")?;
            ensure(map <= 3, "map", "legacy opcode maps are 0 to 3")?;
            ensure(!insn.w(), "w", "W needs a REX-family prefix")?;
        }
        page if page.is_legacy() => {
            ensure(p.prefix1 != LegacyPrefix1::Lock, "page", "LOCK prefix needs the Lock page")?;
            ensure(PrefixInfo::legacy_map(map) == page && map <= 3, "map", "does not match the page")?;
            ensure(!insn.w(), "w", "W needs a REX-family prefix")?;
        }
        PrefixInfo::RexW0 | PrefixInfo::RexW1 => {
            ensure(map <= 3, "map", "legacy opcode maps are 0 to 3")?;
            ensure(insn.w() == (page == PrefixInfo::RexW1), "w", "does not match the REX page")?;
        }
        PrefixInfo::Rex2 => {
            ensure(map <= 1, "map", "REX2 selects map 0 or 1 only")?;
        }
        PrefixInfo::Vex2 => {
            ensure(map == 1, "map", "two-byte VEX implies map 1")?;
            ensure(
                p.x_reg & 8 == 0 && p.b_reg & 8 == 0 && !insn.w(),
                "page",
                "two-byte VEX cannot encode X, B or W",
            )?;
        }
        PrefixInfo::Evex => {
            ensure((1..=3).contains(&map), "map", "EVEX maps are 1 to 3")?;
        }
        _ => {
            ensure(PrefixInfo::vex3_map(map) == page, "map", "does not match the page")?;
        }
    }

    if page.is_vex() {
        ensure(vector.vector_length() <= 1, "vector_length", "VEX encodes L = 0 or 1")?;
        ensure(!vector.zeroing() && !vector.broadcast(), "vector", "z and b need an EVEX page")?;
        ensure(insn.mask_register().is_none(), "mask", "opmask needs an EVEX page")?;
    }
    if page.is_vector() {
        ensure(
            p.prefix1 == LegacyPrefix1::None && p.prefix3 == LegacyPrefix3::None,
            "prefix",
            "66, F2, F3 and F0 cannot precede VEX or EVEX",
        )?;
    }
    Ok(())
}

fn emit(insn: &Instruction, out: &mut Vec<u8>) -> Result<(), EncodeError> {
    let info = insn
        .info()
        .ok_or_else(|| EncodeError::unknown_opcode(insn.opcode_map(), insn.opcode()))?;
    let props = info.properties;
    validate_page(insn)?;
    validate_registers(insn, props)?;

    let p = &insn.payloads;
    let page = p.page;
    let map = insn.opcode_map();
    let direct = register_operand(insn, props);

    let prefixes = LegacyPrefixes {
        group1: p.prefix1,
        group2: p.prefix2,
        group3: p.prefix3,
        group4: p.prefix4,
    };
    out.extend(prefixes.bytes());

    let bit = |value: u8, mask: u8| value & mask != 0;
    match page {
        PrefixInfo::RexW0 | PrefixInfo::RexW1 => {
            let rex = Rex {
                w: page == PrefixInfo::RexW1,
                r: bit(p.r_reg, 8),
                x: bit(p.x_reg, 8),
                b: bit(p.b_reg, 8),
            };
            out.push(rex.to_byte());
        }
        PrefixInfo::Rex2 => {
            let rex2 = Rex2 {
                m0: map == 1,
                r4: bit(p.r_reg, 16),
                x4: bit(p.x_reg, 16),
                b4: bit(p.b_reg, 16),
                w: insn.w(),
                r3: bit(p.r_reg, 8),
                x3: bit(p.x_reg, 8),
                b3: bit(p.b_reg, 8),
            };
            out.extend([0xD5, rex2.to_payload()]);
        }
        PrefixInfo::Evex => {
            let evex = Evex {
                r: bit(p.r_reg, 8),
                x: if direct { bit(p.b_reg, 16) } else { bit(p.x_reg, 8) },
                b: bit(p.b_reg, 8),
                r_prime: bit(p.r_reg, 16),
                map,
                w: insn.w(),
                vvvv: p.d_reg & 0x0F,
                pp: p.vector.pp(),
                z: p.vector.zeroing(),
                ll: p.vector.vector_length(),
                bcst: p.vector.broadcast(),
                v_prime: bit(p.d_reg, 16),
                aaa: insn.mask_register().map_or(0, |k| (k.index() as u8).saturating_sub(1)),
            };
            out.extend(evex.to_bytes());
        }
        page if page.is_vex() => {
            let vex = Vex {
                r: bit(p.r_reg, 8),
                x: bit(p.x_reg, 8),
                b: bit(p.b_reg, 8),
                w: insn.w(),
                vvvv: p.d_reg,
                l: p.vector.vector_length() == 1,
                pp: p.vector.pp(),
                map,
            };
            if page == PrefixInfo::Vex2 {
                out.extend(vex.to_2byte());
            } else {
                out.extend(vex.to_3byte());
            }
        }
        _ => {}
    }

    if page.is_legacy() || page.is_rex() {
        match map {
            1 => out.push(0x0F),
            2 => out.extend([0x0F, 0x38]),
            3 => out.extend([0x0F, 0x3A]),
            _ => {}
        }
    }
    out.push(p.opcode);

    if props.has_modrm() {
        ensure(
            insn.opcode_extension() == p.r_reg & 7,
            "extension",
            "group extension must equal ModRM.reg",
        )?;
        let mode = insn.addressing_mode();
        let rm = if insn.has_sib() { 4 } else { p.b_reg & 7 };
        out.push(ModRm { mode, reg: p.r_reg, rm }.to_byte());
        if insn.has_sib() {
            out.push(Sib { scale: p.scale, index: p.x_reg, base: p.b_reg }.to_byte());
        }
        let size = if direct { 0 } else { modrm::displacement_size(mode, p.b_reg & 7) };
        match size {
            0 => ensure(p.displacement == 0, "displacement", "addressing mode has no displacement")?,
            1 => {
                let disp8 = i8::try_from(p.displacement)
                    .map_err(|_| EncodeError::invalid_field("displacement", "does not fit disp8"))?;
                out.push(disp8 as u8);
            }
            _ => out.extend(p.displacement.to_le_bytes()),
        }
    } else {
        ensure(p.displacement == 0, "displacement", "opcode has no ModRM")?;
    }

    if props.is_moffs() {
        if insn.address_size_override() {
            let offset = u32::try_from(p.offset)
                .map_err(|_| EncodeError::invalid_field("offset", "does not fit a 32-bit moffs"))?;
            out.extend(offset.to_le_bytes());
        } else {
            out.extend(p.offset.to_le_bytes());
        }
    } else {
        ensure(p.offset == 0, "offset", "opcode has no moffs")?;
    }

    let imm_size = insn.interface.imm0_size();
    ensure(imm_size.fits(p.imm0), "imm0", "does not fit its encoded width")?;
    out.extend_from_slice(&p.imm0.to_le_bytes()[..imm_size.bytes()]);

    if props.has_imm1() {
        out.push(p.imm1);
    } else {
        ensure(p.imm1 == 0, "imm1", "opcode has no second immediate")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EncodeError;
    use crate::x86_64::decoder::try_decode;
    use crate::x86_64::instruction::{InstructionBuilder, LegacyPrefix2};
    use crate::x86_64::prefix::MandatoryPrefix;
    use pretty_assertions::assert_eq;

    const CANONICAL: &[&[u8]] = &[
        &[0x50],
        &[0x41, 0x54],
        &[0xF0, 0x01, 0xC0],
        &[0x0F, 0x1F, 0x00],
        &[0x48, 0x8B, 0x05, 0x10, 0x00, 0x00, 0x00],
        &[0x8B, 0x44, 0x8C, 0xF8],
        &[0x66, 0x2E, 0x8B, 0x00],
        &[0xF3, 0xA5],
        &[0x48, 0xB8, 0x88, 0x77, 0x66, 0x55, 0x44, 0x33, 0x22, 0x11],
        &[0x67, 0xA1, 0x01, 0x02, 0x03, 0x04],
        &[0xC8, 0x10, 0x00, 0x01],
        &[0xEB, 0xFE],
        &[0xE8, 0x00, 0x00, 0x00, 0x00],
        &[0x83, 0xC0, 0xFF],
        &[0x0F, 0x20, 0xC0],
        &[0x8C, 0xD8],
        &[0xD9, 0xE8],
        &[0xDD, 0x45, 0xF8],
        &[0x44, 0xC3],
        &[0x66, 0x0F, 0x38, 0x00, 0xC1],
        &[0x66, 0x0F, 0x3A, 0x0F, 0xC1, 0x08],
        &[0xC5, 0xF8, 0x77],
        &[0xC4, 0xE1, 0x78, 0x58, 0xC2],
        &[0x62, 0xF1, 0x7C, 0xC9, 0x58, 0xC2],
        &[0x62, 0xF1, 0x7C, 0x48, 0x58, 0x40, 0x01],
        &[0xD5, 0x48, 0x01, 0xC0],
    ];

    #[test]
    fn test_canonical_bytes_round_trip() {
        for bytes in CANONICAL {
            let decoded = try_decode(bytes).unwrap_or_else(|e| panic!("{bytes:02x?}: {e}"));
            assert_eq!(decoded.size, bytes.len(), "{bytes:02x?}");
            assert_eq!(encode(&decoded.instruction).unwrap(), bytes.to_vec());
        }
    }

    #[test]
    fn test_built_instruction_round_trips() {
        // mov qword ptr fs:[rbx + r9*8 - 0x100], rax
        let insn = InstructionBuilder::new(0x89)
            .rex(true)
            .segment(LegacyPrefix2::Fs)
            .modrm(AddressingMode::Disp32, 0, 4)
            .sib(Scale::X8, 9, 3)
            .displacement(-0x100)
            .build()
            .unwrap();
        let bytes = encode(&insn).unwrap();
        assert_eq!(bytes, vec![0x64, 0x4A, 0x89, 0x84, 0xCB, 0x00, 0xFF, 0xFF, 0xFF]);
        assert_eq!(try_decode(&bytes).unwrap().instruction, insn);
    }

    #[test]
    fn test_vex_register_fields() {
        // vaddps ymm9, ymm2, ymm12
        let insn = InstructionBuilder::new(0x58)
            .page(PrefixInfo::Vex3Map1)
            .map(1)
            .modrm(AddressingMode::Direct, 9, 12)
            .vvvv(2)
            .vector_length(1)
            .pp(MandatoryPrefix::None)
            .build()
            .unwrap();
        let bytes = encode(&insn).unwrap();
        assert_eq!(bytes, vec![0xC4, 0x41, 0x6C, 0x58, 0xCC]);
        assert_eq!(try_decode(&bytes).unwrap().instruction, insn);
    }

    #[test]
    fn test_register_out_of_range() {
        let insn = InstructionBuilder::new(0x01)
            .modrm(AddressingMode::Direct, 9, 0)
            .build()
            .unwrap();
        assert_eq!(
            encode(&insn),
            Err(EncodeError::register_out_of_range("r_reg", 9, "legacy prefixes"))
        );

        let insn = InstructionBuilder::new(0x01)
            .rex(false)
            .modrm(AddressingMode::Direct, 17, 0)
            .build()
            .unwrap();
        assert!(matches!(encode(&insn), Err(EncodeError::RegisterOutOfRange { .. })));
    }

    #[test]
    fn test_vex2_cannot_encode_b() {
        let insn = InstructionBuilder::new(0x58)
            .page(PrefixInfo::Vex2)
            .map(1)
            .modrm(AddressingMode::Direct, 0, 8)
            .build()
            .unwrap();
        assert!(matches!(encode(&insn), Err(EncodeError::InvalidField { field: "page", .. })));
    }

    #[test]
    fn test_disp8_must_fit() {
        let insn = InstructionBuilder::new(0x8B)
            .modrm(AddressingMode::Disp8, 0, 0)
            .displacement(0x80)
            .build()
            .unwrap();
        assert!(matches!(encode(&insn), Err(EncodeError::InvalidField { field: "displacement", .. })));
    }

    #[test]
    fn test_immediate_must_fit() {
        let insn = InstructionBuilder::new(0x04).imm0(0x80).build().unwrap();
        assert!(matches!(encode(&insn), Err(EncodeError::InvalidField { field: "imm0", .. })));
    }

    #[test]
    fn test_encode_into_leaves_buffer_on_error() {
        let good = InstructionBuilder::new(0x90).opcode_register(0).build().unwrap();
        let bad = InstructionBuilder::new(0x04).imm0(0x1000).build().unwrap();
        let mut out = vec![0xCC];
        assert_eq!(encode_into(&good, &mut out), Ok(1));
        assert!(encode_into(&bad, &mut out).is_err());
        assert_eq!(out, vec![0xCC, 0x90]);
    }

    #[test]
    fn test_encode_block_and_length() {
        let push = InstructionBuilder::new(0x50).opcode_register(5).build().unwrap();
        let ret = InstructionBuilder::new(0xC3).build().unwrap();
        assert_eq!(encode_block(&[push, ret]).unwrap(), vec![0x55, 0xC3]);
        assert_eq!(encoded_length(&push), Ok(1));
        assert_eq!(X86_64Encoder::new().encode(&ret).unwrap(), vec![0xC3]);
    }
}
