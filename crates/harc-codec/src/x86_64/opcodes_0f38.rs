//! Property tables for the three-byte map `0F 38`.

use super::mnemonics::Map2 as N;
use super::opcodes::{mmx, vhw, vw, Table};
use super::prefix::MandatoryPrefix;
use super::properties::{OpcodeProperties as P, OperandClass as C};

const NONE_ENTRY: Option<P> = None;

const fn n(m: N) -> P {
    P::new(m as u8)
}

/// SSSE3 operations present both as MMX (no prefix) and XMM (`66`) forms.
const SSSE3: [(u8, N); 15] = [
    (0x00, N::Pshufb),
    (0x01, N::Phaddw),
    (0x02, N::Phaddd),
    (0x03, N::Phaddsw),
    (0x04, N::Pmaddubsw),
    (0x05, N::Phsubw),
    (0x06, N::Phsubd),
    (0x07, N::Phsubsw),
    (0x08, N::Psignb),
    (0x09, N::Psignw),
    (0x0A, N::Psignd),
    (0x0B, N::Pmulhrsw),
    (0x1C, N::Pabsb),
    (0x1D, N::Pabsw),
    (0x1E, N::Pabsd),
];

static MAP2_NP: Table = {
    let mut t = [NONE_ENTRY; 256];
    let mut i = 0;
    while i < SSSE3.len() {
        let (byte, m) = SSSE3[i];
        t[byte as usize] = Some(mmx(n(m)));
        i += 1;
    }
    t[0xC8] = Some(n(N::Sha1nexte).modrm(C::Xmm, C::Xmm));
    t[0xC9] = Some(n(N::Sha1msg1).modrm(C::Xmm, C::Xmm));
    t[0xCA] = Some(n(N::Sha1msg2).modrm(C::Xmm, C::Xmm));
    t[0xCB] = Some(n(N::Sha256rnds2).modrm(C::Xmm, C::Xmm));
    t[0xCC] = Some(n(N::Sha256msg1).modrm(C::Xmm, C::Xmm));
    t[0xCD] = Some(n(N::Sha256msg2).modrm(C::Xmm, C::Xmm));
    t[0xF0] = Some(n(N::Movbe).modrm(C::Gpr, C::Mem));
    t[0xF1] = Some(n(N::Movbe).modrm(C::Gpr, C::Mem).rm_first());
    t[0xF9] = Some(n(N::Movdiri).modrm(C::GprW, C::Mem).rm_first());
    t
};

static MAP2_66: Table = {
    let mut t = [NONE_ENTRY; 256];
    let mut i = 0;
    while i < SSSE3.len() {
        let (byte, m) = SSSE3[i];
        let p = if byte >= 0x1C { vw(n(m)).vex() } else { vhw(n(m)) };
        // psign has no EVEX form
        t[byte as usize] = Some(if byte >= 0x08 && byte <= 0x0A { p.no_evex() } else { p });
        i += 1;
    }

    t[0x10] = Some(vw(n(N::Pblendvb)));
    t[0x14] = Some(vw(n(N::Blendvps)));
    t[0x15] = Some(vw(n(N::Blendvpd)));
    t[0x17] = Some(vw(n(N::Ptest)).vex().no_evex());

    let widen = [N::Pmovsxbw, N::Pmovsxbd, N::Pmovsxbq, N::Pmovsxwd, N::Pmovsxwq, N::Pmovsxdq];
    let zero_widen = [N::Pmovzxbw, N::Pmovzxbd, N::Pmovzxbq, N::Pmovzxwd, N::Pmovzxwq, N::Pmovzxdq];
    let mut i = 0;
    while i < 6 {
        t[0x20 + i] = Some(n(widen[i]).modrm(C::Vector, C::Xmm).vex());
        t[0x30 + i] = Some(n(zero_widen[i]).modrm(C::Vector, C::Xmm).vex());
        i += 1;
    }

    t[0x28] = Some(vhw(n(N::Pmuldq)));
    t[0x29] = Some(vhw(n(N::Pcmpeqq)));
    t[0x2A] = Some(n(N::Movntdqa).modrm(C::Vector, C::Mem).vex());
    t[0x2B] = Some(vhw(n(N::Packusdw)));
    t[0x37] = Some(vhw(n(N::Pcmpgtq)));
    t[0x38] = Some(vhw(n(N::Pminsb)));
    t[0x39] = Some(vhw(n(N::Pminsd)));
    t[0x3A] = Some(vhw(n(N::Pminuw)));
    t[0x3B] = Some(vhw(n(N::Pminud)));
    t[0x3C] = Some(vhw(n(N::Pmaxsb)));
    t[0x3D] = Some(vhw(n(N::Pmaxsd)));
    t[0x3E] = Some(vhw(n(N::Pmaxuw)));
    t[0x3F] = Some(vhw(n(N::Pmaxud)));
    t[0x40] = Some(vhw(n(N::Pmulld)));
    t[0x41] = Some(n(N::Phminposuw).modrm(C::Xmm, C::Xmm).vex().no_evex());

    t[0x80] = Some(n(N::Invept).modrm(C::Gpr64, C::Mem));
    t[0x81] = Some(n(N::Invvpid).modrm(C::Gpr64, C::Mem));
    t[0x82] = Some(n(N::Invpcid).modrm(C::Gpr64, C::Mem));

    t[0xCF] = Some(vhw(n(N::Gf2p8mulb)));
    t[0xDB] = Some(n(N::Aesimc).modrm(C::Xmm, C::Xmm).vex().no_evex());
    t[0xDC] = Some(vhw(n(N::Aesenc)));
    t[0xDD] = Some(vhw(n(N::Aesenclast)));
    t[0xDE] = Some(vhw(n(N::Aesdec)));
    t[0xDF] = Some(vhw(n(N::Aesdeclast)));

    t[0xF0] = Some(n(N::Movbe).modrm(C::Gpr, C::Mem));
    t[0xF1] = Some(n(N::Movbe).modrm(C::Gpr, C::Mem).rm_first());
    t[0xF6] = Some(n(N::Adcx).modrm(C::GprW, C::GprW));
    t[0xF8] = Some(n(N::Movdir64b).modrm(C::Gpr64, C::Mem));
    t
};

static MAP2_F3: Table = {
    let mut t = [NONE_ENTRY; 256];
    t[0xF6] = Some(n(N::Adox).modrm(C::GprW, C::GprW));
    t
};

/// Shared by `F2` and `66 F2`; the operand size override only narrows the
/// source of `crc32`.
static MAP2_F2: Table = {
    let mut t = [NONE_ENTRY; 256];
    t[0xF0] = Some(n(N::Crc32).modrm(C::GprW, C::Gpr8));
    t[0xF1] = Some(n(N::Crc32).modrm(C::GprW, C::Gpr));
    t
};

/// Properties of a `0F 38` opcode under a mandatory prefix.
pub fn entry(prefix: MandatoryPrefix, opcode: u8) -> Option<P> {
    let table = match prefix {
        MandatoryPrefix::None => &MAP2_NP,
        MandatoryPrefix::Op => &MAP2_66,
        MandatoryPrefix::Rep => &MAP2_F3,
        MandatoryPrefix::Repne | MandatoryPrefix::OpRepne => &MAP2_F2,
        MandatoryPrefix::OpRep => return None,
    };
    table[usize::from(opcode)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::x86_64::mnemonics::NameTable;
    use crate::x86_64::properties::VvvvClass;

    fn name(prefix: MandatoryPrefix, opcode: u8) -> Option<&'static str> {
        entry(prefix, opcode).and_then(|p| NameTable::Map2.get(p.mnemonic_index()))
    }

    #[test]
    fn test_ssse3_forms() {
        assert_eq!(name(MandatoryPrefix::None, 0x00), Some("pshufb"));
        assert_eq!(entry(MandatoryPrefix::None, 0x00).unwrap().reg_class(), C::Mmx);
        let xmm = entry(MandatoryPrefix::Op, 0x00).unwrap();
        assert_eq!(xmm.reg_class(), C::Vector);
        assert_eq!(xmm.vvvv_class(), VvvvClass::Vector);
        assert!(xmm.has_vex_form());
        assert!(entry(MandatoryPrefix::Op, 0x1C).unwrap().has_vex_form());
        assert_eq!(entry(MandatoryPrefix::Op, 0x1C).unwrap().vvvv_class(), VvvvClass::None);
    }

    #[test]
    fn test_prefix_variants() {
        assert_eq!(name(MandatoryPrefix::Op, 0xF6), Some("adcx"));
        assert_eq!(name(MandatoryPrefix::Rep, 0xF6), Some("adox"));
        assert_eq!(name(MandatoryPrefix::Repne, 0xF1), Some("crc32"));
        assert_eq!(name(MandatoryPrefix::OpRepne, 0xF1), Some("crc32"));
        assert_eq!(name(MandatoryPrefix::OpRep, 0xF6), None);
    }

    #[test]
    fn test_blendv_has_no_vex_form() {
        assert!(!entry(MandatoryPrefix::Op, 0x10).unwrap().has_vex_form());
    }
}
