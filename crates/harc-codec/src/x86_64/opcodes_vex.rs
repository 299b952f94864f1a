//! VEX-only opcodes.
//!
//! These take precedence over the legacy tables when an opcode arrives
//! through a VEX or EVEX header. Everything else in the VEX maps reuses the
//! legacy entry for the same map and `pp`.

use super::mnemonics::{NameTable, VexMap1 as K, VexMap2 as B, VexMap3 as T};
use super::opcodes::{vhw, vw};
use super::prefix::MandatoryPrefix;
use super::properties::{OpcodeGroup, OpcodeProperties as P, OperandClass as C, VvvvClass as V};

const fn k(m: K) -> P {
    P::new(m as u8).no_evex()
}

const fn b(m: B) -> P {
    P::new(m as u8).no_evex()
}

const fn t(m: T) -> P {
    P::new(m as u8).no_evex()
}

/// Mask register logic: `k1, k2, k3`.
const fn mask_op(m: K) -> P {
    k(m).modrm(C::Mask, C::Mask).vvvv(V::Mask).register_only()
}

/// BMI operation on general registers with a `vvvv` source.
const fn bmi(m: B) -> P {
    b(m).modrm(C::GprW, C::GprW).vvvv(V::Gpr)
}

/// FMA operation; `scalar` forms use the low element only.
const fn fma(m: B, scalar: bool) -> P {
    if scalar {
        b(m).modrm(C::Xmm, C::Xmm).vvvv(V::Vector)
    } else {
        vhw(b(m))
    }
}

const FMA_ORDERS: [[B; 10]; 3] = [
    [
        B::Vfmaddsub132,
        B::Vfmsubadd132,
        B::Vfmadd132p,
        B::Vfmadd132s,
        B::Vfmsub132p,
        B::Vfmsub132s,
        B::Vfnmadd132p,
        B::Vfnmadd132s,
        B::Vfnmsub132p,
        B::Vfnmsub132s,
    ],
    [
        B::Vfmaddsub213,
        B::Vfmsubadd213,
        B::Vfmadd213p,
        B::Vfmadd213s,
        B::Vfmsub213p,
        B::Vfmsub213s,
        B::Vfnmadd213p,
        B::Vfnmadd213s,
        B::Vfnmsub213p,
        B::Vfnmsub213s,
    ],
    [
        B::Vfmaddsub231,
        B::Vfmsubadd231,
        B::Vfmadd231p,
        B::Vfmadd231s,
        B::Vfmsub231p,
        B::Vfmsub231s,
        B::Vfnmadd231p,
        B::Vfnmadd231s,
        B::Vfnmsub231p,
        B::Vfnmsub231s,
    ],
];

/// VEX-only entry for an opcode, if any.
pub fn entry(map: u8, prefix: MandatoryPrefix, opcode: u8) -> Option<(P, NameTable)> {
    match map {
        1 => map1(prefix, opcode).map(|p| (p, NameTable::VexMap1)),
        2 => map2(prefix, opcode).map(|p| (p, NameTable::VexMap2)),
        3 => map3(prefix, opcode).map(|p| (p, NameTable::VexMap3)),
        _ => None,
    }
}

fn map1(prefix: MandatoryPrefix, opcode: u8) -> Option<P> {
    use MandatoryPrefix as M;

    let props = match (prefix, opcode) {
        (M::None | M::Op, 0x41) => mask_op(K::Kand),
        (M::None | M::Op, 0x42) => mask_op(K::Kandn),
        (M::None | M::Op, 0x44) => k(K::Knot).modrm(C::Mask, C::Mask).register_only(),
        (M::None | M::Op, 0x45) => mask_op(K::Kor),
        (M::None | M::Op, 0x46) => mask_op(K::Kxnor),
        (M::None | M::Op, 0x47) => mask_op(K::Kxor),
        (M::None | M::Op, 0x4A) => mask_op(K::Kadd),
        (M::None | M::Op, 0x4B) => mask_op(K::Kunpck),
        (M::None, 0x77) => k(K::Vzeroupper),
        (M::None | M::Op, 0x90) => k(K::Kmov).modrm(C::Mask, C::Mask),
        (M::None | M::Op, 0x91) => k(K::Kmov).modrm(C::Mask, C::Mem).rm_first(),
        (M::None | M::Op, 0x92) => k(K::Kmov).modrm(C::Mask, C::Gpr32).register_only(),
        (M::Repne, 0x92) => k(K::Kmov).modrm(C::Mask, C::GprW).register_only(),
        (M::None | M::Op, 0x93) => k(K::Kmov).modrm(C::Gpr32, C::Mask).register_only(),
        (M::Repne, 0x93) => k(K::Kmov).modrm(C::GprW, C::Mask).register_only(),
        (M::None | M::Op, 0x98) => k(K::Kortest).modrm(C::Mask, C::Mask).register_only(),
        (M::None | M::Op, 0x99) => k(K::Ktest).modrm(C::Mask, C::Mask).register_only(),
        _ => return None,
    };
    Some(props)
}

fn map2(prefix: MandatoryPrefix, opcode: u8) -> Option<P> {
    use MandatoryPrefix as M;

    let props = match (prefix, opcode) {
        (M::Op, 0x0C) => vhw(b(B::Vpermilps)),
        (M::Op, 0x0D) => vhw(b(B::Vpermilpd)),
        (M::Op, 0x0E) => vw(b(B::Vtestps)),
        (M::Op, 0x0F) => vw(b(B::Vtestpd)),
        (M::Op, 0x13) => b(B::Vcvtph2ps).modrm(C::Vector, C::Xmm),
        (M::Op, 0x16) => vhw(b(B::Vpermps)),
        (M::Op, 0x18) => b(B::Vbroadcastss).modrm(C::Vector, C::Xmm),
        (M::Op, 0x19) => b(B::Vbroadcastsd).modrm(C::Vector, C::Xmm),
        (M::Op, 0x1A) => b(B::Vbroadcastf128).modrm(C::Vector, C::Mem),
        (M::Op, 0x2C) => b(B::Vmaskmovps).modrm(C::Vector, C::Mem).vvvv(V::Vector),
        (M::Op, 0x2D) => b(B::Vmaskmovpd).modrm(C::Vector, C::Mem).vvvv(V::Vector),
        (M::Op, 0x2E) => b(B::Vmaskmovps).modrm(C::Vector, C::Mem).vvvv(V::Vector).rm_first(),
        (M::Op, 0x2F) => b(B::Vmaskmovpd).modrm(C::Vector, C::Mem).vvvv(V::Vector).rm_first(),
        (M::Op, 0x36) => vhw(b(B::Vpermd)),
        (M::Op, 0x45) => vhw(b(B::Vpsrlvd)),
        (M::Op, 0x46) => vhw(b(B::Vpsravd)),
        (M::Op, 0x47) => vhw(b(B::Vpsllvd)),
        (M::Op, 0x58) => b(B::Vpbroadcastd).modrm(C::Vector, C::Xmm),
        (M::Op, 0x59) => b(B::Vpbroadcastq).modrm(C::Vector, C::Xmm),
        (M::Op, 0x5A) => b(B::Vbroadcasti128).modrm(C::Vector, C::Mem),
        (M::Op, 0x78) => b(B::Vpbroadcastb).modrm(C::Vector, C::Xmm),
        (M::Op, 0x79) => b(B::Vpbroadcastw).modrm(C::Vector, C::Xmm),
        (M::Op, 0x8C) => b(B::Vpmaskmovd).modrm(C::Vector, C::Mem).vvvv(V::Vector),
        (M::Op, 0x8E) => b(B::Vpmaskmovd).modrm(C::Vector, C::Mem).vvvv(V::Vector).rm_first(),
        (M::Op, 0x90) => b(B::Vpgatherdd).modrm(C::Vector, C::Mem).vvvv(V::Vector),
        (M::Op, 0x91) => b(B::Vpgatherqd).modrm(C::Vector, C::Mem).vvvv(V::Vector),
        (M::Op, 0x92) => b(B::Vgatherdps).modrm(C::Vector, C::Mem).vvvv(V::Vector),
        (M::Op, 0x93) => b(B::Vgatherqps).modrm(C::Vector, C::Mem).vvvv(V::Vector),
        (M::Op, 0x96..=0x9F | 0xA6..=0xAF | 0xB6..=0xBF) => {
            let order = usize::from((opcode >> 4) - 9);
            let slot = usize::from(opcode & 0xF) - 6;
            // Odd slots from 3 upward are the scalar forms.
            fma(FMA_ORDERS[order][slot], slot >= 3 && slot % 2 == 1)
        }
        (M::None, 0xF2) => bmi(B::Andn),
        (M::None, 0xF5) => bmi(B::Bzhi),
        (M::Rep, 0xF5) => bmi(B::Pext),
        (M::Repne, 0xF5) => bmi(B::Pdep),
        (M::Repne, 0xF6) => bmi(B::Mulx),
        (M::None, 0xF7) => bmi(B::Bextr),
        (M::Op, 0xF7) => bmi(B::Shlx),
        (M::Rep, 0xF7) => bmi(B::Sarx),
        (M::Repne, 0xF7) => bmi(B::Shrx),
        _ => return None,
    };
    Some(props)
}

fn map3(prefix: MandatoryPrefix, opcode: u8) -> Option<P> {
    use MandatoryPrefix as M;

    let props = match (prefix, opcode) {
        (M::Op, 0x00) => vw(t(T::Vpermq)).imm8(),
        (M::Op, 0x01) => vw(t(T::Vpermpd)).imm8(),
        (M::Op, 0x02) => vhw(t(T::Vpblendd)).imm8(),
        (M::Op, 0x04) => vw(t(T::Vpermilps)).imm8(),
        (M::Op, 0x05) => vw(t(T::Vpermilpd)).imm8(),
        (M::Op, 0x06) => vhw(t(T::Vperm2f128)).imm8(),
        (M::Op, 0x18) => t(T::Vinsertf128).modrm(C::Vector, C::Xmm).vvvv(V::Vector).imm8(),
        (M::Op, 0x19) => t(T::Vextractf128).modrm(C::Vector, C::Xmm).rm_first().imm8(),
        (M::Op, 0x1D) => t(T::Vcvtps2ph).modrm(C::Vector, C::Xmm).rm_first().imm8(),
        (M::Op, 0x30 | 0x31) => t(T::Kshiftr).modrm(C::Mask, C::Mask).register_only().imm8(),
        (M::Op, 0x32 | 0x33) => t(T::Kshiftl).modrm(C::Mask, C::Mask).register_only().imm8(),
        (M::Op, 0x38) => t(T::Vinserti128).modrm(C::Vector, C::Xmm).vvvv(V::Vector).imm8(),
        (M::Op, 0x39) => t(T::Vextracti128).modrm(C::Vector, C::Xmm).rm_first().imm8(),
        (M::Op, 0x46) => vhw(t(T::Vperm2i128)).imm8(),
        // The fourth register operand is carried in imm8[7:4].
        (M::Op, 0x4A) => vhw(t(T::Vblendvps)).imm8(),
        (M::Op, 0x4B) => vhw(t(T::Vblendvpd)).imm8(),
        (M::Op, 0x4C) => vhw(t(T::Vpblendvb)).imm8(),
        (M::Repne, 0xF0) => t(T::Rorx).modrm(C::GprW, C::GprW).imm8(),
        _ => return None,
    };
    Some(props)
}

const fn shift_imm(m: K) -> Option<P> {
    Some(k(m).modrm(C::None, C::Vector).vvvv(V::Vector).imm8())
}

static GROUP_71: OpcodeGroup = OpcodeGroup::split(
    NameTable::VexMap1,
    [None; 8],
    [None, None, shift_imm(K::Vpsrlw), None, shift_imm(K::Vpsraw), None, shift_imm(K::Vpsllw), None],
);

static GROUP_72: OpcodeGroup = OpcodeGroup::split(
    NameTable::VexMap1,
    [None; 8],
    [None, None, shift_imm(K::Vpsrld), None, shift_imm(K::Vpsrad), None, shift_imm(K::Vpslld), None],
);

static GROUP_73: OpcodeGroup = OpcodeGroup::split(
    NameTable::VexMap1,
    [None; 8],
    [
        None,
        None,
        shift_imm(K::Vpsrlq),
        shift_imm(K::Vpsrldq),
        None,
        None,
        shift_imm(K::Vpsllq),
        shift_imm(K::Vpslldq),
    ],
);

static GROUP_AE: OpcodeGroup = OpcodeGroup::split(
    NameTable::VexMap1,
    [
        None,
        None,
        Some(k(K::Vldmxcsr).modrm(C::None, C::Mem)),
        Some(k(K::Vstmxcsr).modrm(C::None, C::Mem)),
        None,
        None,
        None,
        None,
    ],
    [None; 8],
);

/// `blsr`/`blsmsk`/`blsi`: the destination is `vvvv`.
static GROUP_F3: OpcodeGroup = OpcodeGroup::uniform(
    NameTable::VexMap2,
    [
        None,
        Some(b(B::Blsr).modrm(C::None, C::GprW).vvvv(V::Gpr)),
        Some(b(B::Blsmsk).modrm(C::None, C::GprW).vvvv(V::Gpr)),
        Some(b(B::Blsi).modrm(C::None, C::GprW).vvvv(V::Gpr)),
        None,
        None,
        None,
        None,
    ],
);

/// Group table for a VEX opcode classified as `Group`.
pub fn group(map: u8, prefix: MandatoryPrefix, opcode: u8) -> Option<&'static OpcodeGroup> {
    use MandatoryPrefix as M;

    let group = match (map, prefix, opcode) {
        (1, M::Op, 0x71) => &GROUP_71,
        (1, M::Op, 0x72) => &GROUP_72,
        (1, M::Op, 0x73) => &GROUP_73,
        (1, M::None, 0xAE) => &GROUP_AE,
        (2, M::None, 0xF3) => &GROUP_F3,
        _ => return None,
    };
    Some(group)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(map: u8, prefix: MandatoryPrefix, opcode: u8) -> Option<&'static str> {
        let (props, names) = entry(map, prefix, opcode)?;
        names.get(props.mnemonic_index())
    }

    #[test]
    fn test_fma_layout() {
        assert_eq!(name(2, MandatoryPrefix::Op, 0x98), Some("vfmadd132p"));
        assert_eq!(name(2, MandatoryPrefix::Op, 0xA9), Some("vfmadd213s"));
        assert_eq!(name(2, MandatoryPrefix::Op, 0xBF), Some("vfnmsub231s"));
        assert_eq!(name(2, MandatoryPrefix::Op, 0xB6), Some("vfmaddsub231p"));
        let (scalar, _) = entry(2, MandatoryPrefix::Op, 0xB9).unwrap();
        assert_eq!(scalar.reg_class(), C::Xmm);
        let (packed, _) = entry(2, MandatoryPrefix::Op, 0xB8).unwrap();
        assert_eq!(packed.reg_class(), C::Vector);
    }

    #[test]
    fn test_bmi_prefixes() {
        assert_eq!(name(2, MandatoryPrefix::None, 0xF7), Some("bextr"));
        assert_eq!(name(2, MandatoryPrefix::Op, 0xF7), Some("shlx"));
        assert_eq!(name(2, MandatoryPrefix::Rep, 0xF7), Some("sarx"));
        assert_eq!(name(2, MandatoryPrefix::Repne, 0xF7), Some("shrx"));
        assert_eq!(name(3, MandatoryPrefix::Repne, 0xF0), Some("rorx"));
    }

    #[test]
    fn test_vex_only_entries_reject_evex() {
        let (props, _) = entry(1, MandatoryPrefix::None, 0x41).unwrap();
        assert!(!props.evex_allowed());
    }

    #[test]
    fn test_groups() {
        let shifts = group(1, MandatoryPrefix::Op, 0x73).unwrap();
        assert!(shifts.entry(7, true).is_some());
        assert!(shifts.entry(7, false).is_none());
        assert!(group(1, MandatoryPrefix::None, 0x73).is_none());
        let bls = group(2, MandatoryPrefix::None, 0xF3).unwrap();
        assert_eq!(bls.entry(1, true).unwrap().vvvv_class(), V::Gpr);
    }
}
