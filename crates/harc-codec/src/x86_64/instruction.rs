//! Bit-packed instruction record.
//!
//! An [`Instruction`] is split into a 4-byte [`InstructionInterface`] holding
//! the fields needed to classify an instruction, and wider
//! [`InstructionPayloads`] holding immediates, displacement, prefixes and raw
//! register numbers. Both halves are needed to encode or print.

use harc_core::{MaskReg, RegCategory, Register, SegmentReg};

use super::properties::{self, CompositeOpcode, ImmKind, OpcodeInfo, OpcodeProperties, OperandClass};
use super::prefix::{MandatoryPrefix, PrefixInfo};
use crate::error::EncodeError;

/// Group 1 legacy prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LegacyPrefix1 {
    #[default]
    None,
    Lock,
    Repne,
    Rep,
}

impl LegacyPrefix1 {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0xF0 => Some(LegacyPrefix1::Lock),
            0xF2 => Some(LegacyPrefix1::Repne),
            0xF3 => Some(LegacyPrefix1::Rep),
            _ => None,
        }
    }

    pub fn byte(self) -> Option<u8> {
        match self {
            LegacyPrefix1::None => None,
            LegacyPrefix1::Lock => Some(0xF0),
            LegacyPrefix1::Repne => Some(0xF2),
            LegacyPrefix1::Rep => Some(0xF3),
        }
    }
}

/// Group 2 legacy prefix: segment override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LegacyPrefix2 {
    #[default]
    None,
    Es,
    Cs,
    Ss,
    Ds,
    Fs,
    Gs,
}

impl LegacyPrefix2 {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x26 => Some(LegacyPrefix2::Es),
            0x2E => Some(LegacyPrefix2::Cs),
            0x36 => Some(LegacyPrefix2::Ss),
            0x3E => Some(LegacyPrefix2::Ds),
            0x64 => Some(LegacyPrefix2::Fs),
            0x65 => Some(LegacyPrefix2::Gs),
            _ => None,
        }
    }

    pub fn byte(self) -> Option<u8> {
        match self {
            LegacyPrefix2::None => None,
            LegacyPrefix2::Es => Some(0x26),
            LegacyPrefix2::Cs => Some(0x2E),
            LegacyPrefix2::Ss => Some(0x36),
            LegacyPrefix2::Ds => Some(0x3E),
            LegacyPrefix2::Fs => Some(0x64),
            LegacyPrefix2::Gs => Some(0x65),
        }
    }

    /// The overriding segment register, `SegmentReg::Null` without override.
    pub fn segment(self) -> SegmentReg {
        match self {
            LegacyPrefix2::None => SegmentReg::Null,
            LegacyPrefix2::Es => SegmentReg::Es,
            LegacyPrefix2::Cs => SegmentReg::Cs,
            LegacyPrefix2::Ss => SegmentReg::Ss,
            LegacyPrefix2::Ds => SegmentReg::Ds,
            LegacyPrefix2::Fs => SegmentReg::Fs,
            LegacyPrefix2::Gs => SegmentReg::Gs,
        }
    }
}

/// Group 3 legacy prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LegacyPrefix3 {
    #[default]
    None,
    OperandSize,
}

impl LegacyPrefix3 {
    pub fn from_byte(byte: u8) -> Option<Self> {
        (byte == 0x66).then_some(LegacyPrefix3::OperandSize)
    }

    pub fn byte(self) -> Option<u8> {
        (self == LegacyPrefix3::OperandSize).then_some(0x66)
    }
}

/// Group 4 legacy prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LegacyPrefix4 {
    #[default]
    None,
    AddressSize,
}

impl LegacyPrefix4 {
    pub fn from_byte(byte: u8) -> Option<Self> {
        (byte == 0x67).then_some(LegacyPrefix4::AddressSize)
    }

    pub fn byte(self) -> Option<u8> {
        (self == LegacyPrefix4::AddressSize).then_some(0x67)
    }
}

/// ModRM `mod` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AddressingMode {
    /// `mod = 00`: memory, no displacement (except RIP-relative / SIB no-base).
    #[default]
    Indirect,
    /// `mod = 01`: memory with an 8-bit displacement.
    Disp8,
    /// `mod = 10`: memory with a 32-bit displacement.
    Disp32,
    /// `mod = 11`: register direct.
    Direct,
}

impl AddressingMode {
    pub const fn from_mod(bits: u8) -> Self {
        match bits & 3 {
            0 => AddressingMode::Indirect,
            1 => AddressingMode::Disp8,
            2 => AddressingMode::Disp32,
            _ => AddressingMode::Direct,
        }
    }

    pub const fn mod_bits(self) -> u8 {
        self as u8
    }
}

/// Width class of the first immediate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Imm0Size {
    #[default]
    None,
    One,
    Two,
    Four,
    Eight,
}

impl Imm0Size {
    pub const fn bytes(self) -> usize {
        match self {
            Imm0Size::None => 0,
            Imm0Size::One => 1,
            Imm0Size::Two => 2,
            Imm0Size::Four => 4,
            Imm0Size::Eight => 8,
        }
    }

    const fn from_bits(bits: u32) -> Self {
        match bits & 7 {
            1 => Imm0Size::One,
            2 => Imm0Size::Two,
            3 => Imm0Size::Four,
            4 => Imm0Size::Eight,
            _ => Imm0Size::None,
        }
    }

    /// True if `value` survives truncation to this width and sign extension.
    pub fn fits(self, value: i64) -> bool {
        match self {
            Imm0Size::None => value == 0,
            Imm0Size::One => i8::try_from(value).is_ok(),
            Imm0Size::Two => i16::try_from(value).is_ok(),
            Imm0Size::Four => i32::try_from(value).is_ok(),
            Imm0Size::Eight => true,
        }
    }
}

/// SIB scale factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Scale {
    #[default]
    X1,
    X2,
    X4,
    X8,
}

impl Scale {
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 3 {
            0 => Scale::X1,
            1 => Scale::X2,
            2 => Scale::X4,
            _ => Scale::X8,
        }
    }

    pub const fn bits(self) -> u8 {
        self as u8
    }

    pub const fn factor(self) -> u8 {
        1 << (self as u8)
    }
}

/// EVEX embedded rounding control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RoundingMode {
    /// MXCSR rounding; no embedded override.
    Current,
    ToNearest,
    Downwards,
    Upwards,
    Truncate,
}

/// Hot, 4-byte half of an instruction.
///
/// | bits  | field                   |
/// |-------|-------------------------|
/// | 0-3   | r-register category     |
/// | 4-7   | b-register category     |
/// | 8-11  | mask (0 none, 1-8 = k0-k7) |
/// | 12-14 | imm0 width class        |
/// | 15    | has imm1                |
/// | 16-17 | addressing mode         |
/// | 18    | has SIB                 |
/// | 19    | has ModRM               |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InstructionInterface(u32);

impl InstructionInterface {
    const R_CATEGORY_SHIFT: u32 = 0;
    const B_CATEGORY_SHIFT: u32 = 4;
    const MASK_SHIFT: u32 = 8;
    const IMM0_SHIFT: u32 = 12;
    const HAS_IMM1: u32 = 1 << 15;
    const MODE_SHIFT: u32 = 16;
    const HAS_SIB: u32 = 1 << 18;
    const HAS_MODRM: u32 = 1 << 19;

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub fn r_category(self) -> RegCategory {
        RegCategory::from_bits((self.0 >> Self::R_CATEGORY_SHIFT) as u8 & 0xF)
    }

    pub fn b_category(self) -> RegCategory {
        RegCategory::from_bits((self.0 >> Self::B_CATEGORY_SHIFT) as u8 & 0xF)
    }

    /// Opmask register, or `None` for an unmasked instruction.
    pub fn mask(self) -> Option<MaskReg> {
        match (self.0 >> Self::MASK_SHIFT) & 0xF {
            0 => None,
            n => Some(MaskReg::from_index(n as u16)),
        }
    }

    pub fn imm0_size(self) -> Imm0Size {
        Imm0Size::from_bits(self.0 >> Self::IMM0_SHIFT)
    }

    pub const fn has_imm1(self) -> bool {
        self.0 & Self::HAS_IMM1 != 0
    }

    pub const fn addressing_mode(self) -> AddressingMode {
        AddressingMode::from_mod((self.0 >> Self::MODE_SHIFT) as u8)
    }

    pub const fn has_sib(self) -> bool {
        self.0 & Self::HAS_SIB != 0
    }

    pub const fn has_modrm(self) -> bool {
        self.0 & Self::HAS_MODRM != 0
    }

    fn set(&mut self, shift: u32, width: u32, value: u32) {
        let mask = ((1 << width) - 1) << shift;
        self.0 = (self.0 & !mask) | ((value << shift) & mask);
    }

    fn set_flag(&mut self, flag: u32, on: bool) {
        if on {
            self.0 |= flag;
        } else {
            self.0 &= !flag;
        }
    }

    pub(crate) fn set_r_category(&mut self, category: RegCategory) {
        self.set(Self::R_CATEGORY_SHIFT, 4, u32::from(category.bits()));
    }

    pub(crate) fn set_b_category(&mut self, category: RegCategory) {
        self.set(Self::B_CATEGORY_SHIFT, 4, u32::from(category.bits()));
    }

    /// `aaa` is the EVEX opmask field; `None` clears the mask.
    pub(crate) fn set_mask(&mut self, aaa: Option<u8>) {
        self.set(Self::MASK_SHIFT, 4, aaa.map_or(0, |k| u32::from(k & 7) + 1));
    }

    pub(crate) fn set_imm0_size(&mut self, size: Imm0Size) {
        let bits = match size {
            Imm0Size::None => 0,
            Imm0Size::One => 1,
            Imm0Size::Two => 2,
            Imm0Size::Four => 3,
            Imm0Size::Eight => 4,
        };
        self.set(Self::IMM0_SHIFT, 3, bits);
    }

    pub(crate) fn set_has_imm1(&mut self, on: bool) {
        self.set_flag(Self::HAS_IMM1, on);
    }

    pub(crate) fn set_addressing_mode(&mut self, mode: AddressingMode) {
        self.set(Self::MODE_SHIFT, 2, u32::from(mode.mod_bits()));
    }

    pub(crate) fn set_has_sib(&mut self, on: bool) {
        self.set_flag(Self::HAS_SIB, on);
    }

    pub(crate) fn set_has_modrm(&mut self, on: bool) {
        self.set_flag(Self::HAS_MODRM, on);
    }
}

/// Vector-prefix fields packed in one byte: W (bit 0), L'L (bits 1-2),
/// pp (bits 3-4), EVEX z (bit 5) and EVEX b (bit 6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VectorFields(u8);

impl VectorFields {
    pub const fn w(self) -> bool {
        self.0 & 1 != 0
    }

    pub const fn vector_length(self) -> u8 {
        (self.0 >> 1) & 3
    }

    pub const fn pp(self) -> u8 {
        (self.0 >> 3) & 3
    }

    pub const fn zeroing(self) -> bool {
        self.0 & (1 << 5) != 0
    }

    pub const fn broadcast(self) -> bool {
        self.0 & (1 << 6) != 0
    }

    fn with(self, shift: u8, width: u8, value: u8) -> Self {
        let mask = ((1u8 << width) - 1) << shift;
        Self((self.0 & !mask) | ((value << shift) & mask))
    }

    pub(crate) fn with_w(self, w: bool) -> Self {
        self.with(0, 1, u8::from(w))
    }

    pub(crate) fn with_vector_length(self, ll: u8) -> Self {
        self.with(1, 2, ll)
    }

    pub(crate) fn with_pp(self, pp: u8) -> Self {
        self.with(3, 2, pp)
    }

    pub(crate) fn with_zeroing(self, z: bool) -> Self {
        self.with(5, 1, u8::from(z))
    }

    pub(crate) fn with_broadcast(self, b: bool) -> Self {
        self.with(6, 1, u8::from(b))
    }
}

/// Cold half of an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InstructionPayloads {
    pub(crate) imm0: i64,
    pub(crate) offset: u64,
    pub(crate) displacement: i32,
    pub(crate) prefix1: LegacyPrefix1,
    pub(crate) prefix2: LegacyPrefix2,
    pub(crate) prefix3: LegacyPrefix3,
    pub(crate) prefix4: LegacyPrefix4,
    pub(crate) opcode: u8,
    /// Opcode map (bits 0-4) and group extension (bits 5-7).
    pub(crate) map_ext: u8,
    pub(crate) imm1: u8,
    pub(crate) r_reg: u8,
    pub(crate) b_reg: u8,
    pub(crate) x_reg: u8,
    pub(crate) d_reg: u8,
    pub(crate) scale: Scale,
    pub(crate) page: PrefixInfo,
    pub(crate) vector: VectorFields,
}

impl InstructionPayloads {
    pub fn imm0(&self) -> i64 {
        self.imm0
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn displacement(&self) -> i32 {
        self.displacement
    }

    pub fn opcode(&self) -> u8 {
        self.opcode
    }

    pub fn map(&self) -> u8 {
        self.map_ext & 0x1F
    }

    pub fn extension(&self) -> u8 {
        self.map_ext >> 5
    }
}

/// A decoded (or to-be-encoded) x86-64 instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Instruction {
    pub(crate) payloads: InstructionPayloads,
    pub(crate) interface: InstructionInterface,
}

impl Instruction {
    pub fn interface(&self) -> InstructionInterface {
        self.interface
    }

    pub fn payloads(&self) -> &InstructionPayloads {
        &self.payloads
    }

    pub fn page(&self) -> PrefixInfo {
        self.payloads.page
    }

    pub fn opcode(&self) -> u8 {
        self.payloads.opcode
    }

    pub fn opcode_map(&self) -> u8 {
        self.payloads.map()
    }

    /// ModRM.reg extension for group opcodes (0 otherwise).
    pub fn opcode_extension(&self) -> u8 {
        self.payloads.extension()
    }

    pub fn lock_rep(&self) -> LegacyPrefix1 {
        self.payloads.prefix1
    }

    pub fn segment_override(&self) -> LegacyPrefix2 {
        self.payloads.prefix2
    }

    pub fn operand_size_override(&self) -> bool {
        self.payloads.prefix3 == LegacyPrefix3::OperandSize
    }

    pub fn address_size_override(&self) -> bool {
        self.payloads.prefix4 == LegacyPrefix4::AddressSize
    }

    pub fn w(&self) -> bool {
        self.payloads.vector.w()
    }

    /// VEX.L or EVEX.L'L.
    pub fn vector_length(&self) -> u8 {
        self.payloads.vector.vector_length()
    }

    pub fn vector_fields(&self) -> VectorFields {
        self.payloads.vector
    }

    pub fn zeroing(&self) -> bool {
        self.payloads.vector.zeroing()
    }

    pub fn broadcast(&self) -> bool {
        self.payloads.vector.broadcast()
    }

    pub fn imm0(&self) -> Option<i64> {
        (self.interface.imm0_size() != Imm0Size::None).then_some(self.payloads.imm0)
    }

    pub fn imm1(&self) -> Option<u8> {
        self.interface.has_imm1().then_some(self.payloads.imm1)
    }

    pub fn displacement(&self) -> i32 {
        self.payloads.displacement
    }

    /// Absolute `moffs` address.
    pub fn offset(&self) -> u64 {
        self.payloads.offset
    }

    pub fn addressing_mode(&self) -> AddressingMode {
        self.interface.addressing_mode()
    }

    pub fn has_modrm(&self) -> bool {
        self.interface.has_modrm()
    }

    pub fn has_sib(&self) -> bool {
        self.interface.has_sib()
    }

    pub fn scale(&self) -> Scale {
        self.payloads.scale
    }

    /// Raw register numbers with extension bits folded in.
    pub fn r_reg(&self) -> u8 {
        self.payloads.r_reg
    }

    pub fn b_reg(&self) -> u8 {
        self.payloads.b_reg
    }

    pub fn x_reg(&self) -> u8 {
        self.payloads.x_reg
    }

    pub fn d_reg(&self) -> u8 {
        self.payloads.d_reg
    }

    /// Mandatory prefix in effect, from the legacy slots or VEX/EVEX `pp`.
    pub fn mandatory_prefix(&self) -> MandatoryPrefix {
        if self.page().is_vector() {
            return MandatoryPrefix::from_pp(self.payloads.vector.pp());
        }
        let map = self.opcode_map();
        if map == 0 {
            return MandatoryPrefix::None;
        }
        let op = self.operand_size_override();
        match self.payloads.prefix1 {
            LegacyPrefix1::Rep if op && map == 2 => MandatoryPrefix::OpRep,
            LegacyPrefix1::Repne if op && map == 2 => MandatoryPrefix::OpRepne,
            LegacyPrefix1::Rep => MandatoryPrefix::Rep,
            LegacyPrefix1::Repne => MandatoryPrefix::Repne,
            _ if op => MandatoryPrefix::Op,
            _ => MandatoryPrefix::None,
        }
    }

    pub fn composite_opcode(&self) -> CompositeOpcode {
        CompositeOpcode::new(
            self.page(),
            self.opcode(),
            self.opcode_map(),
            self.mandatory_prefix(),
            self.opcode_extension(),
        )
    }

    /// ModRM register-direct form, or a register-only opcode.
    pub fn is_register_form(&self) -> bool {
        self.has_modrm() && self.addressing_mode() == AddressingMode::Direct
    }

    /// Property table entry for this instruction.
    pub fn info(&self) -> Option<OpcodeInfo> {
        properties::lookup(self.composite_opcode(), self.is_register_form())
    }

    /// Memory operand addressed through ModRM (not `moffs`).
    pub fn has_memory_operand(&self) -> bool {
        self.has_modrm()
            && self.addressing_mode() != AddressingMode::Direct
            && self.info().map_or(true, |info| !info.properties.is_register_only())
    }

    /// RIP-relative memory operand.
    pub fn is_rip_relative(&self) -> bool {
        self.has_modrm()
            && !self.has_sib()
            && self.addressing_mode() == AddressingMode::Indirect
            && self.payloads.b_reg & 7 == 5
    }

    pub fn r_register(&self) -> Register {
        let category = self.interface.r_category();
        Register::for_operand(category, self.payloads.r_reg, self.page().has_rex_family())
    }

    /// Register named by ModRM.rm (register form), the SIB base, or the low
    /// opcode bits. `Register::NULL` when there is none (no base, RIP).
    pub fn b_register(&self) -> Register {
        if self.has_memory_operand() && (self.is_rip_relative() || self.has_no_base()) {
            return Register::NULL;
        }
        let category = self.interface.b_category();
        Register::for_operand(category, self.payloads.b_reg, self.page().has_rex_family())
    }

    /// SIB index register; `Register::NULL` without SIB or for index 100.
    pub fn index_register(&self) -> Register {
        if !self.has_sib() {
            return Register::NULL;
        }
        if self.uses_vsib() {
            let category = RegCategory::vector_for_width(self.vsib_index_width_bits());
            return Register::from_encoding(category, self.payloads.x_reg);
        }
        if self.payloads.x_reg == 4 {
            return Register::NULL;
        }
        Register::from_encoding(self.interface.b_category(), self.payloads.x_reg)
    }

    /// Gather instructions index memory with a vector register.
    pub fn uses_vsib(&self) -> bool {
        self.page().is_vector() && self.opcode_map() == 2 && (0x90..=0x93).contains(&self.opcode())
    }

    /// Width of the VSIB index register. Dword indices gathering qword
    /// elements fill half of the vector.
    pub fn vsib_index_width_bits(&self) -> u16 {
        let width = self.vector_width_bits();
        if self.opcode() & 1 == 0 && self.w() {
            (width / 2).max(128)
        } else {
            width
        }
    }

    /// Width of the destination and mask of a gather. Qword indices
    /// gathering dword elements fill half of the vector.
    pub fn vsib_data_width_bits(&self) -> u16 {
        let width = self.vector_width_bits();
        if self.opcode() & 1 == 1 && !self.w() {
            (width / 2).max(128)
        } else {
            width
        }
    }

    /// SIB with base 101 and mod 00: disp32 without base.
    pub fn has_no_base(&self) -> bool {
        self.has_sib()
            && self.addressing_mode() == AddressingMode::Indirect
            && self.payloads.b_reg & 7 == 5
    }

    /// Register named by VEX/EVEX `vvvv`.
    pub fn vvvv_register(&self) -> Register {
        let Some(info) = self.info() else {
            return Register::NULL;
        };
        let category = match info.properties.vvvv_class() {
            properties::VvvvClass::None => return Register::NULL,
            properties::VvvvClass::Vector => RegCategory::vector_for_width(self.vector_width_bits()),
            properties::VvvvClass::Gpr => {
                if self.w() {
                    RegCategory::Gp64
                } else {
                    RegCategory::Gp32
                }
            }
            properties::VvvvClass::Mask => RegCategory::Mask,
        };
        Register::from_encoding(category, self.payloads.d_reg)
    }

    pub fn mask_register(&self) -> Option<MaskReg> {
        self.interface.mask()
    }

    /// Embedded rounding override (EVEX.b on a register form).
    pub fn rounding_mode(&self) -> RoundingMode {
        if self.page() != PrefixInfo::Evex || !self.broadcast() || !self.is_register_form() {
            return RoundingMode::Current;
        }
        match self.vector_length() {
            0 => RoundingMode::ToNearest,
            1 => RoundingMode::Downwards,
            2 => RoundingMode::Upwards,
            _ => RoundingMode::Truncate,
        }
    }

    /// Effective vector width in bits.
    pub fn vector_width_bits(&self) -> u16 {
        match self.page() {
            PrefixInfo::Evex if self.broadcast() && self.is_register_form() => 512,
            PrefixInfo::Evex => match self.vector_length() {
                0 => 128,
                1 => 256,
                _ => 512,
            },
            page if page.is_vex() && self.vector_length() != 0 => 256,
            _ => 128,
        }
    }

    /// Effective general purpose operand size in bits for the given opcode.
    pub fn operand_width_bits(&self, props: OpcodeProperties) -> u16 {
        if self.w() && !self.page().is_vector() {
            64
        } else if self.operand_size_override() {
            16
        } else if props.is_default_64() {
            64
        } else {
            32
        }
    }

    /// Derives the interface fields implied by the opcode properties:
    /// register categories and immediate widths.
    pub(crate) fn resolve(&mut self, props: OpcodeProperties) {
        let size = imm0_size(self, props);
        self.interface.set_imm0_size(size);
        self.interface.set_has_imm1(props.has_imm1());
        self.interface.set_has_modrm(props.has_modrm());
        if !props.has_modrm() {
            self.interface.set_has_sib(false);
            self.interface.set_addressing_mode(AddressingMode::Indirect);
        } else if props.is_register_only() {
            // Register-only opcodes ignore mod; print and fold as direct.
            self.interface.set_has_sib(false);
        }

        let has_rex = self.page().has_rex_family();
        let r_category = if props.has_modrm() {
            class_category(self, props, props.reg_class(), self.payloads.r_reg, has_rex)
        } else {
            RegCategory::Null
        };
        let b_category = if props.has_modrm() {
            if self.addressing_mode() == AddressingMode::Direct || props.is_register_only() {
                class_category(self, props, props.rm_class(), self.payloads.b_reg, has_rex)
            } else if self.address_size_override() {
                RegCategory::Gp32
            } else {
                RegCategory::Gp64
            }
        } else if props.has_opcode_register() || props.has_accumulator() {
            class_category(self, props, props.rm_class(), self.payloads.b_reg, has_rex)
        } else {
            RegCategory::Null
        };
        self.interface.set_r_category(r_category);
        self.interface.set_b_category(b_category);
    }
}

/// Register category materialized for an operand class.
fn class_category(
    insn: &Instruction,
    props: OpcodeProperties,
    class: OperandClass,
    number: u8,
    has_rex: bool,
) -> RegCategory {
    match class {
        OperandClass::None | OperandClass::Mem => RegCategory::Null,
        OperandClass::Gpr => RegCategory::gpr_for_width(insn.operand_width_bits(props)),
        OperandClass::Gpr8 if !has_rex && (4..8).contains(&number) => RegCategory::Gp8Hi,
        OperandClass::Gpr8 => RegCategory::Gp8Lo,
        OperandClass::Gpr16 => RegCategory::Gp16,
        OperandClass::Gpr32 => RegCategory::Gp32,
        OperandClass::Gpr64 => RegCategory::Gp64,
        OperandClass::GprW if insn.w() => RegCategory::Gp64,
        OperandClass::GprW => RegCategory::Gp32,
        OperandClass::Vector => RegCategory::vector_for_width(insn.vector_width_bits()),
        OperandClass::Xmm => RegCategory::Xmm,
        OperandClass::Mmx => RegCategory::Mmx,
        OperandClass::Segment => RegCategory::Segment,
        OperandClass::Control => RegCategory::Control,
        OperandClass::Debug => RegCategory::Debug,
        OperandClass::St => RegCategory::St,
        OperandClass::Mask => RegCategory::Mask,
    }
}

/// Width of imm0 for an opcode given the instruction's prefixes.
pub(crate) fn imm0_size(insn: &Instruction, props: OpcodeProperties) -> Imm0Size {
    if !props.has_imm0() {
        return Imm0Size::None;
    }
    let narrow = insn.operand_size_override() && !insn.w();
    match props.imm0_kind() {
        ImmKind::Byte => Imm0Size::One,
        ImmKind::Word => Imm0Size::Two,
        ImmKind::Full if props.is_relative() => Imm0Size::Four,
        ImmKind::Full if narrow => Imm0Size::Two,
        ImmKind::Full => Imm0Size::Four,
        ImmKind::Wide if insn.w() => Imm0Size::Eight,
        ImmKind::Wide if narrow => Imm0Size::Two,
        ImmKind::Wide => Imm0Size::Four,
    }
}

/// Builds an [`Instruction`] field by field.
///
/// Only the encoded fields are set here; [`InstructionBuilder::build`] looks
/// the opcode up and derives register categories and immediate widths the
/// same way the decoder does, so a built instruction compares equal to the
/// decoding of its encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstructionBuilder {
    insn: Instruction,
    imm0: Option<i64>,
}

impl InstructionBuilder {
    /// One-byte map opcode on a legacy page.
    pub fn new(opcode: u8) -> Self {
        let mut builder = Self::default();
        builder.insn.payloads.opcode = opcode;
        builder
    }

    /// Selects the opcode map (0-3 legacy, VEX/EVEX map number otherwise).
    pub fn map(mut self, map: u8) -> Self {
        let ext = self.insn.payloads.map_ext & 0xE0;
        self.insn.payloads.map_ext = ext | (map & 0x1F);
        if self.insn.page().is_legacy() {
            self.insn.payloads.page = if self.insn.payloads.prefix1 == LegacyPrefix1::Lock {
                PrefixInfo::Lock
            } else {
                PrefixInfo::legacy_map(map)
            };
        }
        self
    }

    pub fn page(mut self, page: PrefixInfo) -> Self {
        self.insn.payloads.page = page;
        if page.is_rex() {
            self.insn.payloads.vector = self.insn.payloads.vector.with_w(page == PrefixInfo::RexW1);
        }
        self
    }

    /// Uses a REX prefix with the given W bit.
    pub fn rex(self, w: bool) -> Self {
        self.page(if w { PrefixInfo::RexW1 } else { PrefixInfo::RexW0 })
    }

    pub fn lock(mut self) -> Self {
        self.insn.payloads.prefix1 = LegacyPrefix1::Lock;
        if self.insn.page().is_legacy() {
            self.insn.payloads.page = PrefixInfo::Lock;
        }
        self
    }

    pub fn rep(mut self) -> Self {
        self.insn.payloads.prefix1 = LegacyPrefix1::Rep;
        self
    }

    pub fn repne(mut self) -> Self {
        self.insn.payloads.prefix1 = LegacyPrefix1::Repne;
        self
    }

    pub fn segment(mut self, segment: LegacyPrefix2) -> Self {
        self.insn.payloads.prefix2 = segment;
        self
    }

    pub fn operand_size(mut self) -> Self {
        self.insn.payloads.prefix3 = LegacyPrefix3::OperandSize;
        self
    }

    pub fn address_size(mut self) -> Self {
        self.insn.payloads.prefix4 = LegacyPrefix4::AddressSize;
        self
    }

    /// ModRM fields. `reg` becomes the group extension's low bits as well.
    pub fn modrm(mut self, mode: AddressingMode, reg: u8, rm: u8) -> Self {
        self.insn.interface.set_addressing_mode(mode);
        self.insn.payloads.r_reg = reg;
        self.insn.payloads.b_reg = rm;
        self.insn.payloads.map_ext = (self.insn.payloads.map_ext & 0x1F) | ((reg & 7) << 5);
        self
    }

    pub fn sib(mut self, scale: Scale, index: u8, base: u8) -> Self {
        self.insn.interface.set_has_sib(true);
        self.insn.payloads.scale = scale;
        self.insn.payloads.x_reg = index;
        self.insn.payloads.b_reg = base;
        self
    }

    /// Register encoded in the low opcode bits (`push`, `mov r, imm`, ...).
    pub fn opcode_register(mut self, number: u8) -> Self {
        self.insn.payloads.opcode = (self.insn.payloads.opcode & !7) | (number & 7);
        self.insn.payloads.b_reg = number;
        self
    }

    pub fn displacement(mut self, displacement: i32) -> Self {
        self.insn.payloads.displacement = displacement;
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.insn.payloads.offset = offset;
        self
    }

    pub fn imm0(mut self, value: i64) -> Self {
        self.imm0 = Some(value);
        self
    }

    pub fn imm1(mut self, value: u8) -> Self {
        self.insn.payloads.imm1 = value;
        self
    }

    pub fn vvvv(mut self, number: u8) -> Self {
        self.insn.payloads.d_reg = number;
        self
    }

    pub fn w(mut self, w: bool) -> Self {
        self.insn.payloads.vector = self.insn.payloads.vector.with_w(w);
        if self.insn.page().is_rex() {
            self.insn.payloads.page = if w { PrefixInfo::RexW1 } else { PrefixInfo::RexW0 };
        }
        self
    }

    pub fn vector_length(mut self, ll: u8) -> Self {
        self.insn.payloads.vector = self.insn.payloads.vector.with_vector_length(ll);
        self
    }

    /// Mandatory prefix of a VEX/EVEX instruction.
    pub fn pp(mut self, prefix: MandatoryPrefix) -> Self {
        self.insn.payloads.vector = self.insn.payloads.vector.with_pp(prefix.pp().unwrap_or(0));
        self
    }

    /// EVEX opmask; `k0` means unmasked.
    pub fn mask(mut self, aaa: u8) -> Self {
        self.insn.interface.set_mask(Some(aaa & 7).filter(|&k| k != 0));
        self
    }

    pub fn zeroing(mut self, z: bool) -> Self {
        self.insn.payloads.vector = self.insn.payloads.vector.with_zeroing(z);
        self
    }

    pub fn broadcast(mut self, b: bool) -> Self {
        self.insn.payloads.vector = self.insn.payloads.vector.with_broadcast(b);
        self
    }

    /// Finishes the instruction. Fails if the opcode is not defined for the
    /// chosen page, map and prefixes.
    pub fn build(self) -> Result<Instruction, EncodeError> {
        let mut insn = self.insn;
        let info = insn
            .info()
            .ok_or_else(|| EncodeError::unknown_opcode(insn.opcode_map(), insn.opcode()))?;
        if !info.properties.has_modrm() {
            insn.payloads.map_ext &= 0x1F;
        }
        insn.resolve(info.properties);
        if insn.interface.imm0_size() != Imm0Size::None {
            insn.payloads.imm0 = self.imm0.unwrap_or(0);
        }
        Ok(insn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use harc_core::{Gpr32, Gpr64, XmmReg};

    #[test]
    fn test_interface_is_four_bytes() {
        assert_eq!(std::mem::size_of::<InstructionInterface>(), 4);
    }

    #[test]
    fn test_interface_fields() {
        let mut interface = InstructionInterface::default();
        interface.set_r_category(RegCategory::Xmm);
        interface.set_b_category(RegCategory::Gp64);
        interface.set_mask(Some(3));
        interface.set_imm0_size(Imm0Size::Eight);
        interface.set_has_imm1(true);
        interface.set_addressing_mode(AddressingMode::Disp8);
        interface.set_has_sib(true);
        assert_eq!(interface.r_category(), RegCategory::Xmm);
        assert_eq!(interface.b_category(), RegCategory::Gp64);
        assert_eq!(interface.mask(), Some(MaskReg::K3));
        assert_eq!(interface.imm0_size(), Imm0Size::Eight);
        assert!(interface.has_imm1());
        assert_eq!(interface.addressing_mode(), AddressingMode::Disp8);
        assert!(interface.has_sib());
        assert!(!interface.has_modrm());

        interface.set_mask(None);
        assert_eq!(interface.mask(), None);
        assert_eq!(interface.r_category(), RegCategory::Xmm);
    }

    #[test]
    fn test_vector_fields() {
        let fields = VectorFields::default()
            .with_w(true)
            .with_vector_length(2)
            .with_pp(3)
            .with_zeroing(true)
            .with_broadcast(false);
        assert!(fields.w());
        assert_eq!(fields.vector_length(), 2);
        assert_eq!(fields.pp(), 3);
        assert!(fields.zeroing());
        assert!(!fields.broadcast());
    }

    #[test]
    fn test_legacy_prefix_bytes() {
        for byte in 0..=255u8 {
            if let Some(prefix) = LegacyPrefix2::from_byte(byte) {
                assert_eq!(prefix.byte(), Some(byte));
            }
            if let Some(prefix) = LegacyPrefix1::from_byte(byte) {
                assert_eq!(prefix.byte(), Some(byte));
            }
        }
        assert_eq!(LegacyPrefix2::Fs.segment(), SegmentReg::Fs);
    }

    #[test]
    fn test_builder_register_form() {
        // add eax, ecx
        let insn = InstructionBuilder::new(0x01)
            .modrm(AddressingMode::Direct, 1, 0)
            .build()
            .unwrap();
        assert_eq!(insn.r_register(), Register::from(Gpr32::Ecx));
        assert_eq!(insn.b_register(), Register::from(Gpr32::Eax));
        assert_eq!(insn.imm0(), None);
    }

    #[test]
    fn test_builder_rex_w_immediate() {
        // mov rax, imm64
        let insn = InstructionBuilder::new(0xB8)
            .rex(true)
            .opcode_register(0)
            .imm0(0x1122_3344_5566_7788)
            .build()
            .unwrap();
        assert_eq!(insn.interface().imm0_size(), Imm0Size::Eight);
        assert_eq!(insn.b_register(), Register::from(Gpr64::Rax));
        assert_eq!(insn.imm0(), Some(0x1122_3344_5566_7788));
    }

    #[test]
    fn test_builder_memory_operand() {
        // movaps xmm1, [rsp + 8]
        let insn = InstructionBuilder::new(0x28)
            .map(1)
            .modrm(AddressingMode::Disp8, 1, 4)
            .sib(Scale::X1, 4, 4)
            .displacement(8)
            .build()
            .unwrap();
        assert_eq!(insn.r_register(), Register::from(XmmReg::Xmm1));
        assert_eq!(insn.b_register(), Register::from(Gpr64::Rsp));
        assert_eq!(insn.index_register(), Register::NULL);
        assert!(insn.has_memory_operand());
    }

    #[test]
    fn test_builder_unknown_opcode() {
        assert!(InstructionBuilder::new(0x06).build().is_err());
    }

    #[test]
    fn test_high_byte_registers_without_rex() {
        // mov ah, bh
        let insn = InstructionBuilder::new(0x88)
            .modrm(AddressingMode::Direct, 7, 4)
            .build()
            .unwrap();
        assert_eq!(insn.r_register().name(), "bh");
        assert_eq!(insn.b_register().name(), "ah");

        // mov spl, dil
        let insn = InstructionBuilder::new(0x88)
            .rex(false)
            .modrm(AddressingMode::Direct, 7, 4)
            .build()
            .unwrap();
        assert_eq!(insn.r_register().name(), "dil");
        assert_eq!(insn.b_register().name(), "spl");
    }
}
