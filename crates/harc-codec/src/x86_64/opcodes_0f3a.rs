//! Property tables for the three-byte map `0F 3A`. Every entry here takes
//! an 8-bit immediate.

use super::mnemonics::Map3 as N;
use super::opcodes::{mmx, sx, vhw, vw, Table};
use super::prefix::MandatoryPrefix;
use super::properties::{OpcodeProperties as P, OperandClass as C, VvvvClass as V};

const NONE_ENTRY: Option<P> = None;

const fn n(m: N) -> P {
    P::new(m as u8)
}

/// Extract to a general register or memory: `Ed, V, Ib`.
const fn extract(m: N, rm: C) -> P {
    n(m).modrm(C::Xmm, rm).rm_first().imm8().vex()
}

/// Insert from a general register or memory: `V, H, Ed, Ib`.
const fn insert(m: N, rm: C) -> P {
    n(m).modrm(C::Xmm, rm).vvvv(V::Vector).imm8().vex()
}

static MAP3_NP: Table = {
    let mut t = [NONE_ENTRY; 256];
    t[0x0F] = Some(mmx(n(N::Palignr)).imm8());
    t[0xCC] = Some(n(N::Sha1rnds4).modrm(C::Xmm, C::Xmm).imm8());
    t
};

static MAP3_66: Table = {
    let mut t = [NONE_ENTRY; 256];
    t[0x08] = Some(vw(n(N::Roundps)).imm8().vex().no_evex());
    t[0x09] = Some(vw(n(N::Roundpd)).imm8().vex().no_evex());
    t[0x0A] = Some(sx(n(N::Roundss)).imm8().no_evex());
    t[0x0B] = Some(sx(n(N::Roundsd)).imm8().no_evex());
    t[0x0C] = Some(vhw(n(N::Blendps)).imm8().no_evex());
    t[0x0D] = Some(vhw(n(N::Blendpd)).imm8().no_evex());
    t[0x0E] = Some(vhw(n(N::Pblendw)).imm8().no_evex());
    t[0x0F] = Some(vhw(n(N::Palignr)).imm8());

    t[0x14] = Some(extract(N::Pextrb, C::Gpr32));
    t[0x15] = Some(extract(N::Pextrw, C::Gpr32));
    t[0x16] = Some(extract(N::Pextrd, C::GprW));
    t[0x17] = Some(extract(N::Extractps, C::Gpr32));

    t[0x20] = Some(insert(N::Pinsrb, C::Gpr32));
    t[0x21] = Some(insert(N::Insertps, C::Xmm));
    t[0x22] = Some(insert(N::Pinsrd, C::GprW));

    t[0x40] = Some(vhw(n(N::Dpps)).imm8().no_evex());
    t[0x41] = Some(n(N::Dppd).modrm(C::Xmm, C::Xmm).vvvv(V::Vector).imm8().vex().no_evex());
    t[0x42] = Some(vhw(n(N::Mpsadbw)).imm8().no_evex());
    t[0x44] = Some(vhw(n(N::Pclmulqdq)).imm8());

    t[0x60] = Some(n(N::Pcmpestrm).modrm(C::Xmm, C::Xmm).imm8().vex().no_evex());
    t[0x61] = Some(n(N::Pcmpestri).modrm(C::Xmm, C::Xmm).imm8().vex().no_evex());
    t[0x62] = Some(n(N::Pcmpistrm).modrm(C::Xmm, C::Xmm).imm8().vex().no_evex());
    t[0x63] = Some(n(N::Pcmpistri).modrm(C::Xmm, C::Xmm).imm8().vex().no_evex());

    t[0xCE] = Some(vhw(n(N::Gf2p8affineqb)).imm8());
    t[0xCF] = Some(vhw(n(N::Gf2p8affineinvqb)).imm8());
    t[0xDF] = Some(n(N::Aeskeygenassist).modrm(C::Xmm, C::Xmm).imm8().vex().no_evex());
    t
};

static MAP3_F3: Table = {
    let mut t = [NONE_ENTRY; 256];
    t[0xF0] = Some(n(N::Hreset).modrm(C::None, C::None).register_only().imm8());
    t
};

/// Properties of a `0F 3A` opcode under a mandatory prefix. A `66` combined
/// with `F3` selects the `F3` table.
pub fn entry(prefix: MandatoryPrefix, opcode: u8) -> Option<P> {
    let table = match prefix {
        MandatoryPrefix::None => &MAP3_NP,
        MandatoryPrefix::Op => &MAP3_66,
        MandatoryPrefix::Rep | MandatoryPrefix::OpRep => &MAP3_F3,
        MandatoryPrefix::Repne | MandatoryPrefix::OpRepne => return None,
    };
    table[usize::from(opcode)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::x86_64::mnemonics::NameTable;

    #[test]
    fn test_every_entry_has_imm8() {
        for prefix in MandatoryPrefix::ALL {
            for byte in 0..=255u8 {
                if let Some(props) = entry(prefix, byte) {
                    assert!(props.has_imm0(), "{prefix:?} {byte:#04x}");
                }
            }
        }
    }

    #[test]
    fn test_extract_is_store_form() {
        let pextrd = entry(MandatoryPrefix::Op, 0x16).unwrap();
        assert!(pextrd.is_rm_first());
        assert_eq!(pextrd.rm_class(), C::GprW);
        assert_eq!(NameTable::Map3.get(pextrd.mnemonic_index()), Some("pextrd"));
    }

    #[test]
    fn test_hreset_under_combined_prefix() {
        assert!(entry(MandatoryPrefix::OpRep, 0xF0).is_some());
        assert!(entry(MandatoryPrefix::Repne, 0xF0).is_none());
    }
}
