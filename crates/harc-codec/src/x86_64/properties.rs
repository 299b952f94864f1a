//! Opcode property model and lookup.
//!
//! Each defined opcode (per map, mandatory prefix and, for groups, ModRM.reg
//! extension) has an [`OpcodeProperties`] value: a `u32` of packed flags that
//! tells the decoder which structural fields follow the opcode and tells the
//! printer how operands are laid out.

use std::fmt;

use super::categories::{self, ByteCategory};
use super::mnemonics::NameTable;
use super::prefix::{MandatoryPrefix, PrefixInfo};
use super::{opcodes, opcodes_0f38, opcodes_0f3a, opcodes_vex};

/// Register class of an instruction operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OperandClass {
    None = 0,
    /// General purpose register sized by the operand size.
    Gpr,
    Gpr8,
    Gpr16,
    Gpr32,
    Gpr64,
    /// 32-bit general purpose register, 64-bit with W set.
    GprW,
    /// Vector register sized by the vector length.
    Vector,
    Xmm,
    Mmx,
    Segment,
    Control,
    Debug,
    St,
    Mask,
    /// Memory only; the register-direct form is undefined.
    Mem,
}

impl OperandClass {
    const ALL: [OperandClass; 16] = [
        OperandClass::None,
        OperandClass::Gpr,
        OperandClass::Gpr8,
        OperandClass::Gpr16,
        OperandClass::Gpr32,
        OperandClass::Gpr64,
        OperandClass::GprW,
        OperandClass::Vector,
        OperandClass::Xmm,
        OperandClass::Mmx,
        OperandClass::Segment,
        OperandClass::Control,
        OperandClass::Debug,
        OperandClass::St,
        OperandClass::Mask,
        OperandClass::Mem,
    ];

    const fn from_bits(bits: u32) -> Self {
        Self::ALL[(bits & 0xF) as usize]
    }
}

/// How the size of the first immediate is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ImmKind {
    /// Always one byte.
    Byte = 0,
    /// Always two bytes.
    Word,
    /// Two bytes with a `66` prefix, otherwise four.
    Full,
    /// Eight bytes with W set, two with `66`, otherwise four.
    Wide,
}

impl ImmKind {
    const fn from_bits(bits: u32) -> Self {
        match bits & 3 {
            0 => ImmKind::Byte,
            1 => ImmKind::Word,
            2 => ImmKind::Full,
            _ => ImmKind::Wide,
        }
    }
}

/// Register class named by VEX/EVEX `vvvv`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum VvvvClass {
    None = 0,
    Vector,
    Gpr,
    Mask,
}

impl VvvvClass {
    const fn from_bits(bits: u32) -> Self {
        match bits & 3 {
            0 => VvvvClass::None,
            1 => VvvvClass::Vector,
            2 => VvvvClass::Gpr,
            _ => VvvvClass::Mask,
        }
    }
}

/// Packed per-opcode structural metadata.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct OpcodeProperties(u32);

impl OpcodeProperties {
    const MNEMONIC_MASK: u32 = 0xFF;
    const HAS_MODRM: u32 = 1 << 8;
    const HAS_SIB: u32 = 1 << 9;
    const HAS_DISPLACEMENT: u32 = 1 << 10;
    const HAS_IMM0: u32 = 1 << 11;
    const HAS_IMM1: u32 = 1 << 12;
    const IMM_KIND_SHIFT: u32 = 13;
    const RELATIVE: u32 = 1 << 15;
    const REG_CLASS_SHIFT: u32 = 16;
    const RM_CLASS_SHIFT: u32 = 20;
    const VVVV_CLASS_SHIFT: u32 = 24;
    const OPCODE_REGISTER: u32 = 1 << 26;
    const RM_FIRST: u32 = 1 << 27;
    const ACCUMULATOR: u32 = 1 << 28;
    const DEFAULT_64: u32 = 1 << 29;
    const VEX_FORM: u32 = 1 << 30;
    const NO_EVEX: u32 = 1 << 31;

    /// An opcode with no operands.
    pub const fn new(mnemonic: u8) -> Self {
        Self(mnemonic as u32)
    }

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Adds a ModRM byte with the given reg and r/m operand classes. The
    /// memory form (SIB and displacement) is permitted.
    pub const fn modrm(self, reg: OperandClass, rm: OperandClass) -> Self {
        Self(
            self.0
                | Self::HAS_MODRM
                | Self::HAS_SIB
                | Self::HAS_DISPLACEMENT
                | (reg as u32) << Self::REG_CLASS_SHIFT
                | (rm as u32) << Self::RM_CLASS_SHIFT,
        )
    }

    /// Restricts a ModRM opcode to its register form; mod is ignored.
    pub const fn register_only(self) -> Self {
        Self(self.0 & !(Self::HAS_SIB | Self::HAS_DISPLACEMENT))
    }

    pub const fn imm(self, kind: ImmKind) -> Self {
        Self(self.0 | Self::HAS_IMM0 | (kind as u32) << Self::IMM_KIND_SHIFT)
    }

    pub const fn imm8(self) -> Self {
        self.imm(ImmKind::Byte)
    }

    /// Adds the trailing one-byte immediate.
    pub const fn imm1(self) -> Self {
        Self(self.0 | Self::HAS_IMM1)
    }

    /// imm0 is a branch displacement relative to the next instruction.
    pub const fn relative(self, kind: ImmKind) -> Self {
        Self(self.imm(kind).0 | Self::RELATIVE)
    }

    /// Register operand encoded in the low three opcode bits.
    pub const fn opcode_register(self, class: OperandClass) -> Self {
        Self(self.0 | Self::OPCODE_REGISTER | (class as u32) << Self::RM_CLASS_SHIFT)
    }

    /// Implicit register number 0 of the r/m class (AL/eAX/rAX, ST(0)).
    pub const fn accumulator(self, class: OperandClass) -> Self {
        if self.0 & (Self::HAS_MODRM | Self::OPCODE_REGISTER) != 0 {
            Self(self.0 | Self::ACCUMULATOR)
        } else {
            Self(self.0 | Self::ACCUMULATOR | (class as u32) << Self::RM_CLASS_SHIFT)
        }
    }

    /// Accumulator plus an absolute memory offset following the opcode.
    pub const fn moffs(self, class: OperandClass) -> Self {
        Self(self.accumulator(class).0 | Self::HAS_DISPLACEMENT)
    }

    pub const fn rm_first(self) -> Self {
        Self(self.0 | Self::RM_FIRST)
    }

    pub const fn vvvv(self, class: VvvvClass) -> Self {
        Self(self.0 | (class as u32) << Self::VVVV_CLASS_SHIFT)
    }

    pub const fn default_64(self) -> Self {
        Self(self.0 | Self::DEFAULT_64)
    }

    /// Also encodable with VEX/EVEX, printed with a `v` prefix.
    pub const fn vex(self) -> Self {
        Self(self.0 | Self::VEX_FORM)
    }

    /// VEX only; no EVEX form.
    pub const fn no_evex(self) -> Self {
        Self(self.0 | Self::NO_EVEX)
    }

    pub const fn mnemonic_index(self) -> u8 {
        (self.0 & Self::MNEMONIC_MASK) as u8
    }

    pub const fn has_modrm(self) -> bool {
        self.0 & Self::HAS_MODRM != 0
    }

    pub const fn has_sib(self) -> bool {
        self.0 & Self::HAS_SIB != 0
    }

    pub const fn has_displacement(self) -> bool {
        self.0 & Self::HAS_DISPLACEMENT != 0
    }

    pub const fn has_imm0(self) -> bool {
        self.0 & Self::HAS_IMM0 != 0
    }

    pub const fn has_imm1(self) -> bool {
        self.0 & Self::HAS_IMM1 != 0
    }

    pub const fn imm0_kind(self) -> ImmKind {
        ImmKind::from_bits(self.0 >> Self::IMM_KIND_SHIFT)
    }

    pub const fn is_relative(self) -> bool {
        self.0 & Self::RELATIVE != 0
    }

    pub const fn reg_class(self) -> OperandClass {
        OperandClass::from_bits(self.0 >> Self::REG_CLASS_SHIFT)
    }

    pub const fn rm_class(self) -> OperandClass {
        OperandClass::from_bits(self.0 >> Self::RM_CLASS_SHIFT)
    }

    pub const fn vvvv_class(self) -> VvvvClass {
        VvvvClass::from_bits(self.0 >> Self::VVVV_CLASS_SHIFT)
    }

    pub const fn has_opcode_register(self) -> bool {
        self.0 & Self::OPCODE_REGISTER != 0
    }

    pub const fn is_rm_first(self) -> bool {
        self.0 & Self::RM_FIRST != 0
    }

    pub const fn has_accumulator(self) -> bool {
        self.0 & Self::ACCUMULATOR != 0
    }

    pub const fn is_default_64(self) -> bool {
        self.0 & Self::DEFAULT_64 != 0
    }

    pub const fn has_vex_form(self) -> bool {
        self.0 & Self::VEX_FORM != 0
    }

    pub const fn evex_allowed(self) -> bool {
        self.0 & Self::NO_EVEX == 0
    }

    /// ModRM opcode whose memory form is not permitted.
    pub const fn is_register_only(self) -> bool {
        self.has_modrm() && !self.has_sib() && !self.has_displacement()
    }

    /// Absolute memory offset operand without ModRM.
    pub const fn is_moffs(self) -> bool {
        !self.has_modrm() && self.has_displacement()
    }
}

impl fmt::Debug for OpcodeProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpcodeProperties")
            .field("mnemonic", &self.mnemonic_index())
            .field("modrm", &self.has_modrm())
            .field("sib", &self.has_sib())
            .field("disp", &self.has_displacement())
            .field("imm0", &self.has_imm0().then(|| self.imm0_kind()))
            .field("imm1", &self.has_imm1())
            .field("reg", &self.reg_class())
            .field("rm", &self.rm_class())
            .field("vvvv", &self.vvvv_class())
            .finish()
    }
}

/// An opcode completed by the ModRM `reg` field. Memory and register forms
/// of the same extension may name different instructions.
#[derive(Debug)]
pub struct OpcodeGroup {
    pub(crate) names: NameTable,
    pub(crate) memory: [Option<OpcodeProperties>; 8],
    pub(crate) register: [Option<OpcodeProperties>; 8],
}

impl OpcodeGroup {
    pub const fn uniform(names: NameTable, entries: [Option<OpcodeProperties>; 8]) -> Self {
        Self { names, memory: entries, register: entries }
    }

    pub const fn split(
        names: NameTable,
        memory: [Option<OpcodeProperties>; 8],
        register: [Option<OpcodeProperties>; 8],
    ) -> Self {
        Self { names, memory, register }
    }

    pub fn entry(&self, extension: u8, register_form: bool) -> Option<OpcodeProperties> {
        let slots = if register_form { &self.register } else { &self.memory };
        slots[usize::from(extension & 7)]
    }

    /// True if at least one extension is defined.
    pub fn is_populated(&self) -> bool {
        self.memory.iter().chain(self.register.iter()).any(Option::is_some)
    }
}

/// Lookup key for the property table.
///
/// `param_info` packs the opcode map (bits 1:0), the mandatory prefix
/// (bits 4:2) and the group extension (bits 7:5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompositeOpcode {
    pub opcode_page: PrefixInfo,
    pub opcode_byte: u8,
    pub param_info: u8,
}

impl CompositeOpcode {
    pub const fn new(
        opcode_page: PrefixInfo,
        opcode_byte: u8,
        map: u8,
        prefix: MandatoryPrefix,
        extension: u8,
    ) -> Self {
        Self {
            opcode_page,
            opcode_byte,
            param_info: (map & 3) | (prefix.bits() << 2) | ((extension & 7) << 5),
        }
    }

    pub const fn map(self) -> u8 {
        self.param_info & 3
    }

    pub const fn mandatory_prefix(self) -> MandatoryPrefix {
        MandatoryPrefix::from_bits((self.param_info >> 2) & 7)
    }

    pub const fn extension(self) -> u8 {
        self.param_info >> 5
    }
}

/// Result of a property lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeInfo {
    pub properties: OpcodeProperties,
    pub category: ByteCategory,
    names: NameTable,
    vex_encoded: bool,
}

impl OpcodeInfo {
    fn new(properties: OpcodeProperties, category: ByteCategory, names: NameTable, vex_encoded: bool) -> Self {
        Self { properties, category, names, vex_encoded }
    }

    /// Base mnemonic as stored in the name table.
    pub fn base_mnemonic(&self) -> &'static str {
        self.names.get(self.properties.mnemonic_index()).unwrap_or("(bad)")
    }

    pub fn name_table(&self) -> NameTable {
        self.names
    }

    /// True when the printed name takes a `v` prefix: a legacy table entry
    /// reached through a VEX or EVEX header.
    pub fn needs_v_prefix(&self) -> bool {
        self.vex_encoded
            && !matches!(self.names, NameTable::VexMap1 | NameTable::VexMap2 | NameTable::VexMap3)
    }
}

/// Looks up the properties of an opcode. `register_form` selects between the
/// memory and register tables of a group (ModRM.mod == 11).
pub fn lookup(key: CompositeOpcode, register_form: bool) -> Option<OpcodeInfo> {
    match key.opcode_page {
        PrefixInfo::Vex3Map0 | PrefixInfo::Vex3Map4 => None,
        PrefixInfo::Vex2 | PrefixInfo::Vex3Map1 | PrefixInfo::Vex3Map2 | PrefixInfo::Vex3Map3 => {
            lookup_vex(key, register_form, false)
        }
        PrefixInfo::Evex => lookup_vex(key, register_form, true),
        _ => lookup_legacy(key, register_form),
    }
}

fn lookup_legacy(key: CompositeOpcode, register_form: bool) -> Option<OpcodeInfo> {
    let map = key.map();
    let prefix = key.mandatory_prefix();
    let byte = key.opcode_byte;
    let category = categories::classify(map, prefix, byte);
    match category {
        ByteCategory::Opcode => {
            let (properties, names) = legacy_entry(map, prefix, byte, true)?;
            Some(OpcodeInfo::new(properties, category, names, false))
        }
        ByteCategory::Group => {
            let (properties, names) = legacy_group_entry(map, prefix, byte, key.extension(), register_form)?;
            Some(OpcodeInfo::new(properties, category, names, false))
        }
        _ => None,
    }
}

/// VEX and EVEX share the VEX opcode tables. Entries specific to VEX come
/// first; otherwise the legacy entry for the same map and `pp` applies when
/// it has a vector form.
fn lookup_vex(key: CompositeOpcode, register_form: bool, evex: bool) -> Option<OpcodeInfo> {
    let map = key.map();
    let prefix = key.mandatory_prefix();
    let byte = key.opcode_byte;
    let category = categories::classify_vex(map, byte);
    let (properties, names) = match category {
        ByteCategory::Opcode => match opcodes_vex::entry(map, prefix, byte) {
            Some(found) => found,
            None => {
                let (properties, names) = legacy_entry(map, prefix, byte, false)?;
                if !properties.has_vex_form() {
                    return None;
                }
                (properties, names)
            }
        },
        ByteCategory::Group => {
            let group = opcodes_vex::group(map, prefix, byte)?;
            (group.entry(key.extension(), register_form)?, group.names)
        }
        _ => return None,
    };
    if evex && !properties.evex_allowed() {
        return None;
    }
    Some(OpcodeInfo::new(properties, category, names, true))
}

/// Legacy table entry. In map 1 an SSE prefix without its own entry falls
/// back to the unprefixed instruction when `fallback` is set.
fn legacy_entry(
    map: u8,
    prefix: MandatoryPrefix,
    byte: u8,
    fallback: bool,
) -> Option<(OpcodeProperties, NameTable)> {
    use MandatoryPrefix as P;

    let index = usize::from(byte);
    match map {
        0 => opcodes::MAP0[index].map(|p| (p, NameTable::Map0)),
        1 => {
            let specific = match prefix {
                P::None => None,
                P::Op => opcodes::MAP1_66[index].map(|p| (p, NameTable::Map1Op)),
                P::Rep | P::OpRep => opcodes::MAP1_F3[index].map(|p| (p, NameTable::Map1Rep)),
                P::Repne | P::OpRepne => opcodes::MAP1_F2[index].map(|p| (p, NameTable::Map1Repne)),
            };
            match specific {
                Some(found) => Some(found),
                None if prefix == P::None || fallback => {
                    opcodes::MAP1_NP[index].map(|p| (p, NameTable::Map1))
                }
                None => None,
            }
        }
        2 => opcodes_0f38::entry(prefix, byte).map(|p| (p, NameTable::Map2)),
        3 => opcodes_0f3a::entry(prefix, byte).map(|p| (p, NameTable::Map3)),
        _ => None,
    }
}

fn legacy_group_entry(
    map: u8,
    prefix: MandatoryPrefix,
    byte: u8,
    extension: u8,
    register_form: bool,
) -> Option<(OpcodeProperties, NameTable)> {
    match map {
        0 => {
            let group = opcodes::map0_group(byte)?;
            Some((group.entry(extension, register_form)?, group.names))
        }
        1 => {
            if prefix != MandatoryPrefix::None {
                if let Some(group) = opcodes::map1_group(prefix, byte) {
                    if let Some(properties) = group.entry(extension, register_form) {
                        return Some((properties, group.names));
                    }
                }
            }
            let group = opcodes::map1_group(MandatoryPrefix::None, byte)?;
            Some((group.entry(extension, register_form)?, group.names))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legacy(map: u8, prefix: MandatoryPrefix, byte: u8) -> CompositeOpcode {
        let page = match map {
            0 => PrefixInfo::LegacyMap0,
            1 => PrefixInfo::LegacyMap1,
            2 => PrefixInfo::LegacyMap2,
            _ => PrefixInfo::LegacyMap3,
        };
        CompositeOpcode::new(page, byte, map, prefix, 0)
    }

    #[test]
    fn test_property_bits() {
        let props = OpcodeProperties::new(3)
            .modrm(OperandClass::Gpr, OperandClass::Gpr)
            .imm(ImmKind::Full)
            .rm_first();
        assert_eq!(props.mnemonic_index(), 3);
        assert!(props.has_modrm());
        assert!(props.has_sib());
        assert!(props.has_displacement());
        assert!(props.has_imm0());
        assert!(!props.has_imm1());
        assert_eq!(props.imm0_kind(), ImmKind::Full);
        assert_eq!(props.reg_class(), OperandClass::Gpr);
        assert_eq!(props.rm_class(), OperandClass::Gpr);
        assert!(props.is_rm_first());
        assert!(!props.is_register_only());

        let cr = OpcodeProperties::new(0)
            .modrm(OperandClass::Control, OperandClass::Gpr64)
            .register_only();
        assert!(cr.is_register_only());

        let moffs = OpcodeProperties::new(0).moffs(OperandClass::Gpr8);
        assert!(moffs.is_moffs());
        assert!(moffs.has_accumulator());
        assert_eq!(moffs.rm_class(), OperandClass::Gpr8);
    }

    #[test]
    fn test_composite_opcode_param_info() {
        let key = CompositeOpcode::new(PrefixInfo::LegacyMap2, 0xF0, 2, MandatoryPrefix::OpRepne, 5);
        assert_eq!(key.map(), 2);
        assert_eq!(key.mandatory_prefix(), MandatoryPrefix::OpRepne);
        assert_eq!(key.extension(), 5);
    }

    #[test]
    fn test_every_opcode_has_properties() {
        for map in 0..4u8 {
            for prefix in MandatoryPrefix::ALL {
                for byte in 0..=255u8 {
                    if categories::classify(map, prefix, byte) == ByteCategory::Opcode {
                        assert!(
                            lookup(legacy(map, prefix, byte), false).is_some(),
                            "map {map} prefix {prefix:?} byte {byte:#04x}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_every_group_has_an_extension() {
        for map in 0..4u8 {
            for prefix in MandatoryPrefix::ALL {
                for byte in 0..=255u8 {
                    if categories::classify(map, prefix, byte) != ByteCategory::Group {
                        continue;
                    }
                    let defined = (0..8u8).any(|ext| {
                        let page = legacy(map, prefix, byte).opcode_page;
                        let key = CompositeOpcode::new(page, byte, map, prefix, ext);
                        lookup(key, false).is_some() || lookup(key, true).is_some()
                    });
                    assert!(defined, "map {map} prefix {prefix:?} byte {byte:#04x}");
                }
            }
        }
    }

    #[test]
    fn test_every_vex_opcode_has_some_prefix() {
        for map in 1..4u8 {
            let page = match map {
                1 => PrefixInfo::Vex3Map1,
                2 => PrefixInfo::Vex3Map2,
                _ => PrefixInfo::Vex3Map3,
            };
            for byte in 0..=255u8 {
                let category = categories::classify_vex(map, byte);
                if category == ByteCategory::Unused {
                    continue;
                }
                let defined = [MandatoryPrefix::None, MandatoryPrefix::Op, MandatoryPrefix::Rep, MandatoryPrefix::Repne]
                    .into_iter()
                    .any(|prefix| {
                        (0..8u8).any(|ext| {
                            let key = CompositeOpcode::new(page, byte, map, prefix, ext);
                            lookup(key, false).is_some() || lookup(key, true).is_some()
                        })
                    });
                assert!(defined, "vex map {map} byte {byte:#04x}");
            }
        }
    }

    #[test]
    fn test_mandatory_prefix_selects_instruction() {
        let np = lookup(legacy(1, MandatoryPrefix::None, 0x10), false).unwrap();
        let op = lookup(legacy(1, MandatoryPrefix::Op, 0x10), false).unwrap();
        let rep = lookup(legacy(1, MandatoryPrefix::Rep, 0x10), false).unwrap();
        let repne = lookup(legacy(1, MandatoryPrefix::Repne, 0x10), false).unwrap();
        assert_eq!(np.base_mnemonic(), "movups");
        assert_eq!(op.base_mnemonic(), "movupd");
        assert_eq!(rep.base_mnemonic(), "movss");
        assert_eq!(repne.base_mnemonic(), "movsd");
    }

    #[test]
    fn test_legacy_instruction_ignores_sse_prefix() {
        let info = lookup(legacy(1, MandatoryPrefix::Rep, 0x1F), false).unwrap();
        assert_eq!(info.base_mnemonic(), "nop");
        let info = lookup(legacy(1, MandatoryPrefix::Op, 0xAF), false).unwrap();
        assert_eq!(info.base_mnemonic(), "imul");
    }

    #[test]
    fn test_vex_lookup() {
        let key = CompositeOpcode::new(PrefixInfo::Vex3Map1, 0x58, 1, MandatoryPrefix::None, 0);
        let info = lookup(key, false).unwrap();
        assert_eq!(info.base_mnemonic(), "addps");
        assert!(info.needs_v_prefix());

        // MMX forms have no VEX encoding.
        let key = CompositeOpcode::new(PrefixInfo::Vex3Map1, 0xFC, 1, MandatoryPrefix::None, 0);
        assert!(lookup(key, false).is_none());

        let key = CompositeOpcode::new(PrefixInfo::Vex3Map2, 0xF7, 2, MandatoryPrefix::Repne, 0);
        let info = lookup(key, false).unwrap();
        assert_eq!(info.base_mnemonic(), "shrx");
        assert!(!info.needs_v_prefix());
    }

    #[test]
    fn test_evex_rejects_vex_only() {
        let key = CompositeOpcode::new(PrefixInfo::Evex, 0xF7, 2, MandatoryPrefix::Repne, 0);
        assert!(lookup(key, false).is_none());
        let key = CompositeOpcode::new(PrefixInfo::Evex, 0x58, 1, MandatoryPrefix::Op, 0);
        assert!(lookup(key, false).is_some());
    }
}
