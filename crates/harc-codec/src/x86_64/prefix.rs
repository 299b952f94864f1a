//! Prefix resolvers.
//!
//! One parser per prefix family. Each consumes the family's header bytes and
//! exposes the W/R/X/B/L/pp/map fields with the inverted VEX/EVEX bits already
//! corrected, so callers only deal with positive logic.

use super::instruction::{LegacyPrefix1, LegacyPrefix2, LegacyPrefix3, LegacyPrefix4};

/// SSE-style mandatory prefix selecting an opcode table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum MandatoryPrefix {
    #[default]
    None = 0,
    /// `66`
    Op = 1,
    /// `F3`
    Rep = 2,
    /// `F2`
    Repne = 3,
    /// `66` with `F3`
    OpRep = 4,
    /// `66` with `F2`
    OpRepne = 5,
}

impl MandatoryPrefix {
    pub const ALL: [MandatoryPrefix; 6] = [
        MandatoryPrefix::None,
        MandatoryPrefix::Op,
        MandatoryPrefix::Rep,
        MandatoryPrefix::Repne,
        MandatoryPrefix::OpRep,
        MandatoryPrefix::OpRepne,
    ];

    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Total conversion; out-of-range values map to `None`.
    pub const fn from_bits(bits: u8) -> Self {
        match bits {
            1 => MandatoryPrefix::Op,
            2 => MandatoryPrefix::Rep,
            3 => MandatoryPrefix::Repne,
            4 => MandatoryPrefix::OpRep,
            5 => MandatoryPrefix::OpRepne,
            _ => MandatoryPrefix::None,
        }
    }

    /// Prefix implied by a VEX/EVEX `pp` field.
    pub const fn from_pp(pp: u8) -> Self {
        match pp & 3 {
            0 => MandatoryPrefix::None,
            1 => MandatoryPrefix::Op,
            2 => MandatoryPrefix::Rep,
            _ => MandatoryPrefix::Repne,
        }
    }

    /// The VEX/EVEX `pp` encoding, if this prefix has one.
    pub const fn pp(self) -> Option<u8> {
        match self {
            MandatoryPrefix::None => Some(0),
            MandatoryPrefix::Op => Some(1),
            MandatoryPrefix::Rep => Some(2),
            MandatoryPrefix::Repne => Some(3),
            MandatoryPrefix::OpRep | MandatoryPrefix::OpRepne => None,
        }
    }
}

/// Encoding family ("page") of an instruction.
///
/// Legacy pages name their opcode map. VEX3 pages name the VEX map; VEX2 is
/// always map 1 and EVEX carries its map in the composite opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum PrefixInfo {
    #[default]
    LegacyMap0 = 0,
    LegacyMap1,
    LegacyMap2,
    LegacyMap3,
    Lock,
    RexW0,
    RexW1,
    Vex2,
    Vex3Map0,
    Vex3Map1,
    Vex3Map2,
    Vex3Map3,
    Vex3Map4,
    Rex2,
    Evex,
}

impl PrefixInfo {
    const ALL: [PrefixInfo; 15] = [
        PrefixInfo::LegacyMap0,
        PrefixInfo::LegacyMap1,
        PrefixInfo::LegacyMap2,
        PrefixInfo::LegacyMap3,
        PrefixInfo::Lock,
        PrefixInfo::RexW0,
        PrefixInfo::RexW1,
        PrefixInfo::Vex2,
        PrefixInfo::Vex3Map0,
        PrefixInfo::Vex3Map1,
        PrefixInfo::Vex3Map2,
        PrefixInfo::Vex3Map3,
        PrefixInfo::Vex3Map4,
        PrefixInfo::Rex2,
        PrefixInfo::Evex,
    ];

    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Total conversion; out-of-range values map to `LegacyMap0`.
    pub const fn from_bits(bits: u8) -> Self {
        if (bits as usize) < Self::ALL.len() {
            Self::ALL[bits as usize]
        } else {
            PrefixInfo::LegacyMap0
        }
    }

    pub const fn legacy_map(map: u8) -> Self {
        match map {
            1 => PrefixInfo::LegacyMap1,
            2 => PrefixInfo::LegacyMap2,
            3 => PrefixInfo::LegacyMap3,
            _ => PrefixInfo::LegacyMap0,
        }
    }

    pub const fn vex3_map(map: u8) -> Self {
        match map {
            0 => PrefixInfo::Vex3Map0,
            1 => PrefixInfo::Vex3Map1,
            2 => PrefixInfo::Vex3Map2,
            3 => PrefixInfo::Vex3Map3,
            _ => PrefixInfo::Vex3Map4,
        }
    }

    /// No REX-family header: legacy maps and `LOCK`.
    pub const fn is_legacy(self) -> bool {
        matches!(
            self,
            PrefixInfo::LegacyMap0
                | PrefixInfo::LegacyMap1
                | PrefixInfo::LegacyMap2
                | PrefixInfo::LegacyMap3
                | PrefixInfo::Lock
        )
    }

    pub const fn is_rex(self) -> bool {
        matches!(self, PrefixInfo::RexW0 | PrefixInfo::RexW1)
    }

    pub const fn is_vex(self) -> bool {
        matches!(
            self,
            PrefixInfo::Vex2
                | PrefixInfo::Vex3Map0
                | PrefixInfo::Vex3Map1
                | PrefixInfo::Vex3Map2
                | PrefixInfo::Vex3Map3
                | PrefixInfo::Vex3Map4
        )
    }

    /// VEX or EVEX: the pages whose mandatory prefix comes from `pp`.
    pub const fn is_vector(self) -> bool {
        self.is_vex() || matches!(self, PrefixInfo::Evex)
    }

    /// A REX, REX2, VEX or EVEX header is present.
    pub const fn has_rex_family(self) -> bool {
        !self.is_legacy()
    }

    /// Largest register index a ModRM field can name on this page.
    pub const fn register_limit(self) -> u8 {
        match self {
            PrefixInfo::Rex2 | PrefixInfo::Evex => 32,
            _ if self.is_legacy() => 8,
            _ => 16,
        }
    }
}

/// Legacy prefixes seen before the opcode, one slot per group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LegacyPrefixes {
    pub group1: LegacyPrefix1,
    pub group2: LegacyPrefix2,
    pub group3: LegacyPrefix3,
    pub group4: LegacyPrefix4,
}

impl LegacyPrefixes {
    /// Records a legacy prefix byte, replacing any earlier prefix of the same
    /// group. Returns false if the byte is not a legacy prefix.
    pub fn apply(&mut self, byte: u8) -> bool {
        if let Some(prefix) = LegacyPrefix1::from_byte(byte) {
            self.group1 = prefix;
        } else if let Some(prefix) = LegacyPrefix2::from_byte(byte) {
            self.group2 = prefix;
        } else if let Some(prefix) = LegacyPrefix3::from_byte(byte) {
            self.group3 = prefix;
        } else if let Some(prefix) = LegacyPrefix4::from_byte(byte) {
            self.group4 = prefix;
        } else {
            return false;
        }
        true
    }

    pub fn operand_size(&self) -> bool {
        self.group3 == LegacyPrefix3::OperandSize
    }

    pub fn address_size(&self) -> bool {
        self.group4 == LegacyPrefix4::AddressSize
    }

    /// A prefix that cannot precede a VEX or EVEX header.
    pub fn blocks_vex(&self) -> bool {
        self.operand_size() || self.group1 != LegacyPrefix1::None
    }

    /// Mandatory prefix for a legacy opcode map. `F2`/`F3` take precedence
    /// over `66`; map 2 keeps the combination.
    pub fn mandatory(&self, map: u8) -> MandatoryPrefix {
        if map == 0 {
            return MandatoryPrefix::None;
        }
        let op = self.operand_size();
        match self.group1 {
            LegacyPrefix1::Rep if op && map == 2 => MandatoryPrefix::OpRep,
            LegacyPrefix1::Repne if op && map == 2 => MandatoryPrefix::OpRepne,
            LegacyPrefix1::Rep => MandatoryPrefix::Rep,
            LegacyPrefix1::Repne => MandatoryPrefix::Repne,
            _ if op => MandatoryPrefix::Op,
            _ => MandatoryPrefix::None,
        }
    }

    /// Prefix bytes in canonical order: `66`, `67`, segment, group 1.
    pub fn bytes(&self) -> impl Iterator<Item = u8> {
        [
            self.group3.byte(),
            self.group4.byte(),
            self.group2.byte(),
            self.group1.byte(),
        ]
        .into_iter()
        .flatten()
    }

    pub fn len(&self) -> usize {
        self.bytes().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// REX prefix (`40`-`4F`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rex {
    pub w: bool,
    pub r: bool,
    pub x: bool,
    pub b: bool,
}

impl Rex {
    pub fn from_byte(byte: u8) -> Option<Self> {
        if (byte & 0xF0) == 0x40 {
            Some(Self {
                w: (byte & 0x08) != 0,
                r: (byte & 0x04) != 0,
                x: (byte & 0x02) != 0,
                b: (byte & 0x01) != 0,
            })
        } else {
            None
        }
    }

    pub fn to_byte(self) -> u8 {
        0x40 | u8::from(self.w) << 3 | u8::from(self.r) << 2 | u8::from(self.x) << 1 | u8::from(self.b)
    }
}

/// REX2 prefix (`D5` + payload). Extends every ModRM/SIB register field to
/// five bits and selects map 0 or 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rex2 {
    pub m0: bool,
    pub r4: bool,
    pub x4: bool,
    pub b4: bool,
    pub w: bool,
    pub r3: bool,
    pub x3: bool,
    pub b3: bool,
}

impl Rex2 {
    pub fn from_payload(byte: u8) -> Self {
        Self {
            m0: (byte & 0x80) != 0,
            r4: (byte & 0x40) != 0,
            x4: (byte & 0x20) != 0,
            b4: (byte & 0x10) != 0,
            w: (byte & 0x08) != 0,
            r3: (byte & 0x04) != 0,
            x3: (byte & 0x02) != 0,
            b3: (byte & 0x01) != 0,
        }
    }

    pub fn to_payload(self) -> u8 {
        u8::from(self.m0) << 7
            | u8::from(self.r4) << 6
            | u8::from(self.x4) << 5
            | u8::from(self.b4) << 4
            | u8::from(self.w) << 3
            | u8::from(self.r3) << 2
            | u8::from(self.x3) << 1
            | u8::from(self.b3)
    }

    pub fn map(self) -> u8 {
        u8::from(self.m0)
    }
}

/// VEX prefix (2-byte `C5` or 3-byte `C4` form).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Vex {
    pub r: bool,
    pub x: bool,
    pub b: bool,
    pub w: bool,
    /// Register specifier, already un-inverted.
    pub vvvv: u8,
    /// 256-bit vector length.
    pub l: bool,
    pub pp: u8,
    /// Opcode map (`mmmmm`); always 1 for the 2-byte form.
    pub map: u8,
}

impl Vex {
    /// Parses the payload of a 2-byte VEX prefix (the byte after `C5`).
    pub fn from_2byte(byte1: u8) -> Self {
        Self {
            r: (byte1 & 0x80) == 0,
            x: false,
            b: false,
            w: false,
            vvvv: (!byte1 >> 3) & 0x0F,
            l: (byte1 & 0x04) != 0,
            pp: byte1 & 0x03,
            map: 1,
        }
    }

    /// Parses the payload of a 3-byte VEX prefix (the two bytes after `C4`).
    pub fn from_3byte(byte1: u8, byte2: u8) -> Self {
        Self {
            r: (byte1 & 0x80) == 0,
            x: (byte1 & 0x40) == 0,
            b: (byte1 & 0x20) == 0,
            map: byte1 & 0x1F,
            w: (byte2 & 0x80) != 0,
            vvvv: (!byte2 >> 3) & 0x0F,
            l: (byte2 & 0x04) != 0,
            pp: byte2 & 0x03,
        }
    }

    pub fn to_2byte(self) -> [u8; 2] {
        [
            0xC5,
            u8::from(!self.r) << 7 | ((!self.vvvv & 0x0F) << 3) | u8::from(self.l) << 2 | (self.pp & 3),
        ]
    }

    pub fn to_3byte(self) -> [u8; 3] {
        [
            0xC4,
            u8::from(!self.r) << 7 | u8::from(!self.x) << 6 | u8::from(!self.b) << 5 | (self.map & 0x1F),
            u8::from(self.w) << 7 | ((!self.vvvv & 0x0F) << 3) | u8::from(self.l) << 2 | (self.pp & 3),
        ]
    }

    pub fn mandatory(self) -> MandatoryPrefix {
        MandatoryPrefix::from_pp(self.pp)
    }
}

/// EVEX prefix (`62` + three payload bytes).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Evex {
    pub r: bool,
    pub x: bool,
    pub b: bool,
    /// High bit of ModRM.reg.
    pub r_prime: bool,
    pub map: u8,
    pub w: bool,
    pub vvvv: u8,
    pub pp: u8,
    /// Zeroing instead of merging under a mask.
    pub z: bool,
    /// L'L vector length (or rounding control with `b` on register forms).
    pub ll: u8,
    /// Broadcast / rounding / SAE context.
    pub bcst: bool,
    /// High bit of `vvvv`.
    pub v_prime: bool,
    /// Opmask register number.
    pub aaa: u8,
}

impl Evex {
    /// Parses the three payload bytes. Headers using the APX extensions
    /// (`B4` set or `U` clear) are reported as unsupported.
    pub fn from_bytes(p0: u8, p1: u8, p2: u8) -> Result<Self, &'static str> {
        if p0 & 0x08 != 0 {
            return Err("APX extended register bit in EVEX header");
        }
        if p1 & 0x04 == 0 {
            return Err("APX EVEX.U bit cleared");
        }
        Ok(Self {
            r: (p0 & 0x80) == 0,
            x: (p0 & 0x40) == 0,
            b: (p0 & 0x20) == 0,
            r_prime: (p0 & 0x10) == 0,
            map: p0 & 0x07,
            w: (p1 & 0x80) != 0,
            vvvv: (!p1 >> 3) & 0x0F,
            pp: p1 & 0x03,
            z: (p2 & 0x80) != 0,
            ll: (p2 >> 5) & 0x03,
            bcst: (p2 & 0x10) != 0,
            v_prime: (p2 & 0x08) == 0,
            aaa: p2 & 0x07,
        })
    }

    pub fn to_bytes(self) -> [u8; 4] {
        [
            0x62,
            u8::from(!self.r) << 7
                | u8::from(!self.x) << 6
                | u8::from(!self.b) << 5
                | u8::from(!self.r_prime) << 4
                | (self.map & 0x07),
            u8::from(self.w) << 7 | ((!self.vvvv & 0x0F) << 3) | 0x04 | (self.pp & 3),
            u8::from(self.z) << 7
                | (self.ll & 3) << 5
                | u8::from(self.bcst) << 4
                | u8::from(!self.v_prime) << 3
                | (self.aaa & 7),
        ]
    }

    pub fn mandatory(self) -> MandatoryPrefix {
        MandatoryPrefix::from_pp(self.pp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rex_parsing() {
        let rex = Rex::from_byte(0x48).unwrap();
        assert!(rex.w);
        assert!(!rex.r);
        assert!(!rex.x);
        assert!(!rex.b);

        let rex = Rex::from_byte(0x4D).unwrap();
        assert!(rex.w);
        assert!(rex.r);
        assert!(!rex.x);
        assert!(rex.b);
        assert_eq!(rex.to_byte(), 0x4D);

        assert!(Rex::from_byte(0x50).is_none());
    }

    #[test]
    fn test_rex2_payload() {
        let rex2 = Rex2::from_payload(0x99);
        assert!(rex2.m0);
        assert!(rex2.b4);
        assert!(rex2.w);
        assert!(rex2.b3);
        assert!(!rex2.r4);
        assert_eq!(rex2.map(), 1);
        assert_eq!(rex2.to_payload(), 0x99);
    }

    #[test]
    fn test_vex_2byte() {
        // vaddps ymm0, ymm1, ymm2: C5 F4 58 C2
        let vex = Vex::from_2byte(0xF4);
        assert!(!vex.r);
        assert_eq!(vex.vvvv, 1);
        assert!(vex.l);
        assert_eq!(vex.pp, 0);
        assert_eq!(vex.map, 1);
        assert_eq!(vex.to_2byte(), [0xC5, 0xF4]);
    }

    #[test]
    fn test_vex_3byte() {
        // andn eax, ebx, ecx: C4 E2 60 F2 C1
        let vex = Vex::from_3byte(0xE2, 0x60);
        assert!(!vex.r && !vex.x && !vex.b);
        assert_eq!(vex.map, 2);
        assert!(!vex.w);
        assert_eq!(vex.vvvv, 3);
        assert!(!vex.l);
        assert_eq!(vex.mandatory(), MandatoryPrefix::None);
        assert_eq!(vex.to_3byte(), [0xC4, 0xE2, 0x60]);
    }

    #[test]
    fn test_evex_fields() {
        // vaddps zmm1{k1}{z}, zmm2, zmm3: 62 F1 6C C9 58 CB
        let evex = Evex::from_bytes(0xF1, 0x6C, 0xC9).unwrap();
        assert_eq!(evex.map, 1);
        assert!(!evex.w);
        assert_eq!(evex.vvvv, 2);
        assert_eq!(evex.pp, 0);
        assert!(evex.z);
        assert_eq!(evex.ll, 2);
        assert!(!evex.bcst);
        assert!(!evex.v_prime);
        assert_eq!(evex.aaa, 1);
        assert_eq!(evex.to_bytes(), [0x62, 0xF1, 0x6C, 0xC9]);
    }

    #[test]
    fn test_evex_apx_bits_unsupported() {
        assert!(Evex::from_bytes(0xF9, 0x7C, 0x48).is_err());
        assert!(Evex::from_bytes(0xF1, 0x78, 0x48).is_err());
    }

    #[test]
    fn test_legacy_prefix_groups() {
        let mut prefixes = LegacyPrefixes::default();
        assert!(prefixes.apply(0xF3));
        assert!(prefixes.apply(0xF2));
        assert!(prefixes.apply(0x66));
        assert!(prefixes.apply(0x2E));
        assert!(prefixes.apply(0x64));
        assert!(!prefixes.apply(0x90));
        assert_eq!(prefixes.group1, LegacyPrefix1::Repne);
        assert_eq!(prefixes.group2, LegacyPrefix2::Fs);
        assert_eq!(prefixes.bytes().collect::<Vec<_>>(), vec![0x66, 0x64, 0xF2]);
        assert_eq!(prefixes.mandatory(1), MandatoryPrefix::Repne);
        assert_eq!(prefixes.mandatory(2), MandatoryPrefix::OpRepne);
        assert_eq!(prefixes.mandatory(0), MandatoryPrefix::None);
        assert!(prefixes.blocks_vex());
    }

    #[test]
    fn test_prefix_info_bits() {
        for page in PrefixInfo::ALL {
            assert_eq!(PrefixInfo::from_bits(page.bits()), page);
        }
        assert_eq!(PrefixInfo::from_bits(200), PrefixInfo::LegacyMap0);
        assert!(PrefixInfo::Lock.is_legacy());
        assert!(PrefixInfo::Vex2.is_vector());
        assert_eq!(PrefixInfo::Rex2.register_limit(), 32);
        assert_eq!(PrefixInfo::RexW1.register_limit(), 16);
        assert_eq!(PrefixInfo::LegacyMap1.register_limit(), 8);
    }

    #[test]
    fn test_mandatory_prefix_pp() {
        for pp in 0..4u8 {
            assert_eq!(MandatoryPrefix::from_pp(pp).pp(), Some(pp));
        }
        assert_eq!(MandatoryPrefix::OpRep.pp(), None);
        for prefix in MandatoryPrefix::ALL {
            assert_eq!(MandatoryPrefix::from_bits(prefix.bits()), prefix);
        }
    }
}
