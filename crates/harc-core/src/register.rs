//! x86-64 register model.
//!
//! Every architectural register belongs to a [`RegCategory`] and has an index
//! inside that category's table. Index 0 of every table is a `Null` sentinel,
//! so the register with hardware number `n` lives at index `n + 1`. The index
//! is shared across all general purpose widths: `rax`, `eax`, `ax` and `al`
//! are all index 1, which is what makes width conversion a pure category
//! change.

use std::fmt;

/// Register category (register file and width).
///
/// The discriminants are part of the packed [`Register`] layout and of the
/// instruction record, so existing values must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum RegCategory {
    #[default]
    Null = 0,
    /// 8-bit low byte registers (al, spl, r8b, ...)
    Gp8Lo = 1,
    /// Legacy 8-bit high byte registers (ah, ch, dh, bh)
    Gp8Hi = 2,
    Gp16 = 3,
    Gp32 = 4,
    Gp64 = 5,
    /// x87 stack registers
    St = 6,
    Mmx = 7,
    Xmm = 8,
    Ymm = 9,
    Zmm = 10,
    /// AVX-512 opmask registers
    Mask = 11,
    Segment = 12,
    Control = 13,
    Debug = 14,
}

impl RegCategory {
    /// All categories in discriminant order.
    pub const ALL: [RegCategory; 15] = [
        RegCategory::Null,
        RegCategory::Gp8Lo,
        RegCategory::Gp8Hi,
        RegCategory::Gp16,
        RegCategory::Gp32,
        RegCategory::Gp64,
        RegCategory::St,
        RegCategory::Mmx,
        RegCategory::Xmm,
        RegCategory::Ymm,
        RegCategory::Zmm,
        RegCategory::Mask,
        RegCategory::Segment,
        RegCategory::Control,
        RegCategory::Debug,
    ];

    /// Decodes a 4-bit category field. Unknown values map to `Null`.
    pub const fn from_bits(bits: u8) -> Self {
        if (bits as usize) < Self::ALL.len() {
            Self::ALL[bits as usize]
        } else {
            RegCategory::Null
        }
    }

    /// Returns the 4-bit field value of this category.
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Number of table slots in this category, including the `Null` sentinel.
    pub const fn slots(self) -> usize {
        match self {
            RegCategory::Null => 1,
            RegCategory::Gp8Lo
            | RegCategory::Gp16
            | RegCategory::Gp32
            | RegCategory::Gp64
            | RegCategory::Xmm
            | RegCategory::Ymm
            | RegCategory::Zmm => 33,
            RegCategory::Gp8Hi => 5,
            RegCategory::St | RegCategory::Mmx | RegCategory::Mask => 9,
            RegCategory::Segment => 7,
            RegCategory::Control | RegCategory::Debug => 17,
        }
    }

    /// Register width in bits.
    pub const fn width(self) -> u16 {
        match self {
            RegCategory::Null => 0,
            RegCategory::Gp8Lo | RegCategory::Gp8Hi => 8,
            RegCategory::Gp16 | RegCategory::Segment => 16,
            RegCategory::Gp32 => 32,
            RegCategory::Gp64
            | RegCategory::Mmx
            | RegCategory::Mask
            | RegCategory::Control
            | RegCategory::Debug => 64,
            RegCategory::St => 80,
            RegCategory::Xmm => 128,
            RegCategory::Ymm => 256,
            RegCategory::Zmm => 512,
        }
    }

    /// Returns true for the general purpose families.
    pub const fn is_gpr(self) -> bool {
        matches!(
            self,
            RegCategory::Gp8Lo
                | RegCategory::Gp8Hi
                | RegCategory::Gp16
                | RegCategory::Gp32
                | RegCategory::Gp64
        )
    }

    /// Returns true for the SSE/AVX families.
    pub const fn is_vector(self) -> bool {
        matches!(self, RegCategory::Xmm | RegCategory::Ymm | RegCategory::Zmm)
    }

    /// Returns the general purpose category for an operand width in bits.
    pub const fn gpr_for_width(width: u16) -> Self {
        match width {
            8 => RegCategory::Gp8Lo,
            16 => RegCategory::Gp16,
            32 => RegCategory::Gp32,
            64 => RegCategory::Gp64,
            _ => RegCategory::Null,
        }
    }

    /// Returns the vector category for a vector length in bits.
    pub const fn vector_for_width(width: u16) -> Self {
        match width {
            128 => RegCategory::Xmm,
            256 => RegCategory::Ymm,
            512 => RegCategory::Zmm,
            _ => RegCategory::Null,
        }
    }

    fn names(self) -> &'static [&'static str] {
        match self {
            RegCategory::Null => &["null"],
            RegCategory::Gp8Lo => Gpr8Lo::NAMES,
            RegCategory::Gp8Hi => Gpr8Hi::NAMES,
            RegCategory::Gp16 => Gpr16::NAMES,
            RegCategory::Gp32 => Gpr32::NAMES,
            RegCategory::Gp64 => Gpr64::NAMES,
            RegCategory::St => StReg::NAMES,
            RegCategory::Mmx => MmxReg::NAMES,
            RegCategory::Xmm => XmmReg::NAMES,
            RegCategory::Ymm => YmmReg::NAMES,
            RegCategory::Zmm => ZmmReg::NAMES,
            RegCategory::Mask => MaskReg::NAMES,
            RegCategory::Segment => SegmentReg::NAMES,
            RegCategory::Control => ControlReg::NAMES,
            RegCategory::Debug => DebugReg::NAMES,
        }
    }
}

/// A register family: one enum per [`RegCategory`], `Null` at index 0.
pub trait RegisterFamily: Copy + Eq + Sized {
    /// The category every member of this family belongs to.
    const CATEGORY: RegCategory;

    /// Table index of this member.
    fn index(self) -> u16;

    /// Member at `index`, or the family's `Null` sentinel when out of range.
    fn from_index(index: u16) -> Self;

    /// Returns true for the `Null` sentinel.
    fn is_null(self) -> bool {
        self.index() == 0
    }
}

/// Width conversions between the general purpose families.
///
/// Conversions keep the table index and only change the family; an index
/// that does not exist in the target family yields its `Null` sentinel.
pub trait GeneralPurpose: RegisterFamily {
    fn to_gpr8_lo(self) -> Gpr8Lo {
        Gpr8Lo::from_index(self.index())
    }

    fn to_gpr8_hi(self) -> Gpr8Hi {
        Gpr8Hi::from_index(self.index())
    }

    fn to_gpr16(self) -> Gpr16 {
        Gpr16::from_index(self.index())
    }

    fn to_gpr32(self) -> Gpr32 {
        Gpr32::from_index(self.index())
    }

    fn to_gpr64(self) -> Gpr64 {
        Gpr64::from_index(self.index())
    }
}

/// Length conversions between the SSE/AVX families.
pub trait VectorRegister: RegisterFamily {
    fn to_xmm(self) -> XmmReg {
        XmmReg::from_index(self.index())
    }

    fn to_ymm(self) -> YmmReg {
        YmmReg::from_index(self.index())
    }

    fn to_zmm(self) -> ZmmReg {
        ZmmReg::from_index(self.index())
    }
}

macro_rules! register_family {
    (
        $(#[$meta:meta])*
        $family:ident: $category:ident {
            $($variant:ident = $name:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[repr(u8)]
        pub enum $family {
            #[default]
            Null = 0,
            $($variant),+
        }

        impl $family {
            /// Every member in table order, `Null` first.
            pub const ALL: &'static [$family] = &[$family::Null, $($family::$variant),+];

            const NAMES: &'static [&'static str] = &["null", $($name),+];

            /// Returns the member at `index`, or `Null` when out of range.
            pub fn from_index(index: u16) -> Self {
                Self::ALL
                    .get(usize::from(index))
                    .copied()
                    .unwrap_or($family::Null)
            }

            pub const fn index(self) -> u16 {
                self as u16
            }

            /// Canonical lowercase name.
            pub fn name(self) -> &'static str {
                Self::NAMES[self as usize]
            }

            /// Parses a canonical name. Unknown text yields `Null`.
            pub fn parse(name: &str) -> Self {
                Self::NAMES
                    .iter()
                    .position(|candidate| *candidate == name)
                    .map_or($family::Null, |index| Self::ALL[index])
            }
        }

        impl RegisterFamily for $family {
            const CATEGORY: RegCategory = RegCategory::$category;

            fn index(self) -> u16 {
                $family::index(self)
            }

            fn from_index(index: u16) -> Self {
                $family::from_index(index)
            }
        }

        impl From<$family> for Register {
            fn from(reg: $family) -> Self {
                Register::new(RegCategory::$category, reg.index())
            }
        }

        impl fmt::Display for $family {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

register_family! {
    /// 8-bit low byte registers.
    Gpr8Lo: Gp8Lo {
        Al = "al", Cl = "cl", Dl = "dl", Bl = "bl",
        Spl = "spl", Bpl = "bpl", Sil = "sil", Dil = "dil",
        R8b = "r8b", R9b = "r9b", R10b = "r10b", R11b = "r11b",
        R12b = "r12b", R13b = "r13b", R14b = "r14b", R15b = "r15b",
        R16b = "r16b", R17b = "r17b", R18b = "r18b", R19b = "r19b",
        R20b = "r20b", R21b = "r21b", R22b = "r22b", R23b = "r23b",
        R24b = "r24b", R25b = "r25b", R26b = "r26b", R27b = "r27b",
        R28b = "r28b", R29b = "r29b", R30b = "r30b", R31b = "r31b",
    }
}

register_family! {
    /// Legacy high byte registers, addressable only without a REX-family prefix.
    Gpr8Hi: Gp8Hi {
        Ah = "ah", Ch = "ch", Dh = "dh", Bh = "bh",
    }
}

register_family! {
    Gpr16: Gp16 {
        Ax = "ax", Cx = "cx", Dx = "dx", Bx = "bx",
        Sp = "sp", Bp = "bp", Si = "si", Di = "di",
        R8w = "r8w", R9w = "r9w", R10w = "r10w", R11w = "r11w",
        R12w = "r12w", R13w = "r13w", R14w = "r14w", R15w = "r15w",
        R16w = "r16w", R17w = "r17w", R18w = "r18w", R19w = "r19w",
        R20w = "r20w", R21w = "r21w", R22w = "r22w", R23w = "r23w",
        R24w = "r24w", R25w = "r25w", R26w = "r26w", R27w = "r27w",
        R28w = "r28w", R29w = "r29w", R30w = "r30w", R31w = "r31w",
    }
}

register_family! {
    Gpr32: Gp32 {
        Eax = "eax", Ecx = "ecx", Edx = "edx", Ebx = "ebx",
        Esp = "esp", Ebp = "ebp", Esi = "esi", Edi = "edi",
        R8d = "r8d", R9d = "r9d", R10d = "r10d", R11d = "r11d",
        R12d = "r12d", R13d = "r13d", R14d = "r14d", R15d = "r15d",
        R16d = "r16d", R17d = "r17d", R18d = "r18d", R19d = "r19d",
        R20d = "r20d", R21d = "r21d", R22d = "r22d", R23d = "r23d",
        R24d = "r24d", R25d = "r25d", R26d = "r26d", R27d = "r27d",
        R28d = "r28d", R29d = "r29d", R30d = "r30d", R31d = "r31d",
    }
}

register_family! {
    Gpr64: Gp64 {
        Rax = "rax", Rcx = "rcx", Rdx = "rdx", Rbx = "rbx",
        Rsp = "rsp", Rbp = "rbp", Rsi = "rsi", Rdi = "rdi",
        R8 = "r8", R9 = "r9", R10 = "r10", R11 = "r11",
        R12 = "r12", R13 = "r13", R14 = "r14", R15 = "r15",
        R16 = "r16", R17 = "r17", R18 = "r18", R19 = "r19",
        R20 = "r20", R21 = "r21", R22 = "r22", R23 = "r23",
        R24 = "r24", R25 = "r25", R26 = "r26", R27 = "r27",
        R28 = "r28", R29 = "r29", R30 = "r30", R31 = "r31",
    }
}

register_family! {
    /// x87 register stack.
    StReg: St {
        St0 = "st(0)", St1 = "st(1)", St2 = "st(2)", St3 = "st(3)",
        St4 = "st(4)", St5 = "st(5)", St6 = "st(6)", St7 = "st(7)",
    }
}

register_family! {
    MmxReg: Mmx {
        Mm0 = "mm0", Mm1 = "mm1", Mm2 = "mm2", Mm3 = "mm3",
        Mm4 = "mm4", Mm5 = "mm5", Mm6 = "mm6", Mm7 = "mm7",
    }
}

register_family! {
    XmmReg: Xmm {
        Xmm0 = "xmm0", Xmm1 = "xmm1", Xmm2 = "xmm2", Xmm3 = "xmm3",
        Xmm4 = "xmm4", Xmm5 = "xmm5", Xmm6 = "xmm6", Xmm7 = "xmm7",
        Xmm8 = "xmm8", Xmm9 = "xmm9", Xmm10 = "xmm10", Xmm11 = "xmm11",
        Xmm12 = "xmm12", Xmm13 = "xmm13", Xmm14 = "xmm14", Xmm15 = "xmm15",
        Xmm16 = "xmm16", Xmm17 = "xmm17", Xmm18 = "xmm18", Xmm19 = "xmm19",
        Xmm20 = "xmm20", Xmm21 = "xmm21", Xmm22 = "xmm22", Xmm23 = "xmm23",
        Xmm24 = "xmm24", Xmm25 = "xmm25", Xmm26 = "xmm26", Xmm27 = "xmm27",
        Xmm28 = "xmm28", Xmm29 = "xmm29", Xmm30 = "xmm30", Xmm31 = "xmm31",
    }
}

register_family! {
    YmmReg: Ymm {
        Ymm0 = "ymm0", Ymm1 = "ymm1", Ymm2 = "ymm2", Ymm3 = "ymm3",
        Ymm4 = "ymm4", Ymm5 = "ymm5", Ymm6 = "ymm6", Ymm7 = "ymm7",
        Ymm8 = "ymm8", Ymm9 = "ymm9", Ymm10 = "ymm10", Ymm11 = "ymm11",
        Ymm12 = "ymm12", Ymm13 = "ymm13", Ymm14 = "ymm14", Ymm15 = "ymm15",
        Ymm16 = "ymm16", Ymm17 = "ymm17", Ymm18 = "ymm18", Ymm19 = "ymm19",
        Ymm20 = "ymm20", Ymm21 = "ymm21", Ymm22 = "ymm22", Ymm23 = "ymm23",
        Ymm24 = "ymm24", Ymm25 = "ymm25", Ymm26 = "ymm26", Ymm27 = "ymm27",
        Ymm28 = "ymm28", Ymm29 = "ymm29", Ymm30 = "ymm30", Ymm31 = "ymm31",
    }
}

register_family! {
    ZmmReg: Zmm {
        Zmm0 = "zmm0", Zmm1 = "zmm1", Zmm2 = "zmm2", Zmm3 = "zmm3",
        Zmm4 = "zmm4", Zmm5 = "zmm5", Zmm6 = "zmm6", Zmm7 = "zmm7",
        Zmm8 = "zmm8", Zmm9 = "zmm9", Zmm10 = "zmm10", Zmm11 = "zmm11",
        Zmm12 = "zmm12", Zmm13 = "zmm13", Zmm14 = "zmm14", Zmm15 = "zmm15",
        Zmm16 = "zmm16", Zmm17 = "zmm17", Zmm18 = "zmm18", Zmm19 = "zmm19",
        Zmm20 = "zmm20", Zmm21 = "zmm21", Zmm22 = "zmm22", Zmm23 = "zmm23",
        Zmm24 = "zmm24", Zmm25 = "zmm25", Zmm26 = "zmm26", Zmm27 = "zmm27",
        Zmm28 = "zmm28", Zmm29 = "zmm29", Zmm30 = "zmm30", Zmm31 = "zmm31",
    }
}

register_family! {
    /// AVX-512 opmask registers.
    MaskReg: Mask {
        K0 = "k0", K1 = "k1", K2 = "k2", K3 = "k3",
        K4 = "k4", K5 = "k5", K6 = "k6", K7 = "k7",
    }
}

register_family! {
    /// Segment registers in hardware encoding order.
    SegmentReg: Segment {
        Es = "es", Cs = "cs", Ss = "ss", Ds = "ds", Fs = "fs", Gs = "gs",
    }
}

register_family! {
    ControlReg: Control {
        Cr0 = "cr0", Cr1 = "cr1", Cr2 = "cr2", Cr3 = "cr3",
        Cr4 = "cr4", Cr5 = "cr5", Cr6 = "cr6", Cr7 = "cr7",
        Cr8 = "cr8", Cr9 = "cr9", Cr10 = "cr10", Cr11 = "cr11",
        Cr12 = "cr12", Cr13 = "cr13", Cr14 = "cr14", Cr15 = "cr15",
    }
}

register_family! {
    DebugReg: Debug {
        Dr0 = "dr0", Dr1 = "dr1", Dr2 = "dr2", Dr3 = "dr3",
        Dr4 = "dr4", Dr5 = "dr5", Dr6 = "dr6", Dr7 = "dr7",
        Dr8 = "dr8", Dr9 = "dr9", Dr10 = "dr10", Dr11 = "dr11",
        Dr12 = "dr12", Dr13 = "dr13", Dr14 = "dr14", Dr15 = "dr15",
    }
}

impl GeneralPurpose for Gpr8Lo {}
impl GeneralPurpose for Gpr8Hi {}
impl GeneralPurpose for Gpr16 {}
impl GeneralPurpose for Gpr32 {}
impl GeneralPurpose for Gpr64 {}

impl VectorRegister for XmmReg {}
impl VectorRegister for YmmReg {}
impl VectorRegister for ZmmReg {}

/// Any architectural register, packed as `category:4 | index:12`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Register(u16);

impl Register {
    /// The null register (category `Null`, index 0).
    pub const NULL: Register = Register(0);

    const INDEX_MASK: u16 = 0x0FFF;
    const CATEGORY_SHIFT: u16 = 12;

    /// Creates a register from a category and table index.
    ///
    /// Out-of-range indices and index 0 yield [`Register::NULL`].
    pub const fn new(category: RegCategory, index: u16) -> Self {
        if index == 0 || index as usize >= category.slots() {
            return Register::NULL;
        }
        Register(((category as u16) << Self::CATEGORY_SHIFT) | index)
    }

    /// Creates a register from its hardware register number.
    ///
    /// For `Gp8Hi` the hardware numbers are 4..=7 (ah, ch, dh, bh).
    pub const fn from_encoding(category: RegCategory, number: u8) -> Self {
        match category {
            RegCategory::Gp8Hi => {
                if number >= 4 && number < 8 {
                    Register::new(category, (number - 3) as u16)
                } else {
                    Register::NULL
                }
            }
            _ => Register::new(category, number as u16 + 1),
        }
    }

    /// Materializes an operand register, applying the legacy byte register
    /// rule: without a REX-family prefix, 8-bit encodings 4..=7 name
    /// ah, ch, dh and bh instead of spl, bpl, sil and dil.
    pub const fn for_operand(category: RegCategory, number: u8, has_rex: bool) -> Self {
        match category {
            RegCategory::Gp8Lo if !has_rex && number >= 4 && number < 8 => {
                Register::from_encoding(RegCategory::Gp8Hi, number)
            }
            _ => Register::from_encoding(category, number),
        }
    }

    /// Returns the hardware register number, or `None` for the null register.
    pub const fn encoding(self) -> Option<u8> {
        if self.is_null() {
            return None;
        }
        match self.category() {
            RegCategory::Gp8Hi => Some(self.index() as u8 + 3),
            _ => Some(self.index() as u8 - 1),
        }
    }

    pub const fn category(self) -> RegCategory {
        RegCategory::from_bits((self.0 >> Self::CATEGORY_SHIFT) as u8)
    }

    pub const fn index(self) -> u16 {
        self.0 & Self::INDEX_MASK
    }

    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// Returns the packed representation.
    pub const fn to_bits(self) -> u16 {
        self.0
    }

    /// Unpacks a register, validating the index against its category.
    pub const fn from_bits(bits: u16) -> Self {
        Register::new(
            RegCategory::from_bits((bits >> Self::CATEGORY_SHIFT) as u8),
            bits & Self::INDEX_MASK,
        )
    }

    /// Register width in bits.
    pub const fn width(self) -> u16 {
        self.category().width()
    }

    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        let names = self.category().names();
        names.get(usize::from(self.index())).copied().unwrap_or("null")
    }

    /// Parses a canonical register name from any family.
    ///
    /// Matching is case-sensitive. Unknown names yield [`Register::NULL`].
    pub fn parse(name: &str) -> Self {
        RegCategory::ALL
            .iter()
            .skip(1)
            .find_map(|&category| {
                category
                    .names()
                    .iter()
                    .skip(1)
                    .position(|candidate| *candidate == name)
                    .map(|position| Register::new(category, position as u16 + 1))
            })
            .unwrap_or(Register::NULL)
    }

    fn convert(self, target: RegCategory) -> Self {
        let source = self.category();
        let compatible = (source.is_gpr() && target.is_gpr())
            || (source.is_vector() && target.is_vector());
        if compatible {
            Register::new(target, self.index())
        } else {
            Register::NULL
        }
    }

    pub fn to_gpr8_lo(self) -> Self {
        self.convert(RegCategory::Gp8Lo)
    }

    pub fn to_gpr8_hi(self) -> Self {
        self.convert(RegCategory::Gp8Hi)
    }

    pub fn to_gpr16(self) -> Self {
        self.convert(RegCategory::Gp16)
    }

    pub fn to_gpr32(self) -> Self {
        self.convert(RegCategory::Gp32)
    }

    pub fn to_gpr64(self) -> Self {
        self.convert(RegCategory::Gp64)
    }

    pub fn to_xmm(self) -> Self {
        self.convert(RegCategory::Xmm)
    }

    pub fn to_ymm(self) -> Self {
        self.convert(RegCategory::Ymm)
    }

    pub fn to_zmm(self) -> Self {
        self.convert(RegCategory::Zmm)
    }
}

impl fmt::Debug for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Register({:?}:{})", self.category(), self.name())
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_sizes_match_categories() {
        assert_eq!(Gpr64::ALL.len(), 33);
        assert_eq!(Gpr8Lo::ALL.len(), RegCategory::Gp8Lo.slots());
        assert_eq!(Gpr8Hi::ALL.len(), RegCategory::Gp8Hi.slots());
        assert_eq!(StReg::ALL.len(), RegCategory::St.slots());
        assert_eq!(ZmmReg::ALL.len(), RegCategory::Zmm.slots());
        assert_eq!(SegmentReg::ALL.len(), RegCategory::Segment.slots());
        assert_eq!(DebugReg::ALL.len(), RegCategory::Debug.slots());
        for category in RegCategory::ALL.iter().skip(1) {
            assert_eq!(category.names().len(), category.slots(), "{category:?}");
        }
    }

    #[test]
    fn test_names_and_parse() {
        assert_eq!(Gpr64::Rax.name(), "rax");
        assert_eq!(Gpr64::parse("r15"), Gpr64::R15);
        assert_eq!(Gpr32::parse("EAX"), Gpr32::Null);
        assert_eq!(XmmReg::parse("xmm31"), XmmReg::Xmm31);
        assert_eq!(MaskReg::parse("k8"), MaskReg::Null);
        assert_eq!(Register::parse("spl"), Register::from(Gpr8Lo::Spl));
        assert_eq!(Register::parse("dr7"), Register::from(DebugReg::Dr7));
        assert_eq!(Register::parse("bogus"), Register::NULL);
        assert_eq!(Register::parse("null"), Register::NULL);
    }

    #[test]
    fn test_index_is_shared_across_widths() {
        assert_eq!(Gpr64::Rax.index(), 1);
        assert_eq!(Gpr8Lo::Al.index(), 1);
        assert_eq!(Gpr64::R12.to_gpr32(), Gpr32::R12d);
        assert_eq!(Gpr16::Di.to_gpr8_lo(), Gpr8Lo::Dil);
        assert_eq!(Gpr64::Rbx.to_gpr8_hi(), Gpr8Hi::Bh);
        assert_eq!(Gpr64::Rsp.to_gpr8_hi(), Gpr8Hi::Null);
        assert_eq!(Gpr8Hi::Ch.to_gpr64(), Gpr64::Rcx);
        assert_eq!(XmmReg::Xmm17.to_zmm(), ZmmReg::Zmm17);

        for &reg in Gpr64::ALL {
            assert_eq!(reg.to_gpr8_lo().to_gpr64(), reg);
            assert_eq!(reg.to_gpr16().to_gpr64(), reg);
            assert_eq!(reg.to_gpr32().to_gpr64(), reg);
        }
    }

    #[test]
    fn test_packed_register_conversions() {
        let rdi = Register::from(Gpr64::Rdi);
        assert_eq!(rdi.category(), RegCategory::Gp64);
        assert_eq!(rdi.to_gpr32().name(), "edi");
        assert_eq!(rdi.to_gpr8_hi(), Register::NULL);
        assert_eq!(rdi.to_xmm(), Register::NULL);
        assert_eq!(Register::from(YmmReg::Ymm3).to_xmm().name(), "xmm3");
        assert_eq!(Register::from_bits(rdi.to_bits()), rdi);
        assert_eq!(Register::new(RegCategory::Segment, 7), Register::NULL);
    }

    #[test]
    fn test_hardware_encoding() {
        assert_eq!(Register::from_encoding(RegCategory::Gp64, 0).name(), "rax");
        assert_eq!(Register::from_encoding(RegCategory::Gp64, 31).name(), "r31");
        assert_eq!(Register::from_encoding(RegCategory::Gp64, 32), Register::NULL);
        assert_eq!(Register::from_encoding(RegCategory::Gp8Hi, 7).name(), "bh");
        assert_eq!(Register::from_encoding(RegCategory::Gp8Hi, 3), Register::NULL);
        assert_eq!(Register::from(Gpr8Hi::Dh).encoding(), Some(6));
        assert_eq!(Register::from(SegmentReg::Fs).encoding(), Some(4));
        assert_eq!(Register::NULL.encoding(), None);

        assert_eq!(Register::for_operand(RegCategory::Gp8Lo, 4, false).name(), "ah");
        assert_eq!(Register::for_operand(RegCategory::Gp8Lo, 4, true).name(), "spl");
        assert_eq!(Register::for_operand(RegCategory::Gp8Lo, 9, false).name(), "r9b");
    }
}
