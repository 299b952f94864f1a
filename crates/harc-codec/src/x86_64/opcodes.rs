//! Property tables for the one-byte and two-byte (`0F`) opcode maps.

use super::mnemonics::{Map0 as N0, Map1 as N1, Map1Group as NG, Map1Op as N66, Map1Rep as NF3};
use super::mnemonics::{Map1Repne as NF2, NameTable};
use super::prefix::MandatoryPrefix;
use super::properties::{ImmKind, OpcodeGroup, OpcodeProperties as P, OperandClass as C, VvvvClass as V};
use super::x87;

pub(crate) type Table = [Option<P>; 256];
pub(crate) type Slots = [Option<P>; 8];

const NONE_ENTRY: Option<P> = None;
const EMPTY: Slots = [NONE_ENTRY; 8];

const fn n0(m: N0) -> P {
    P::new(m as u8)
}

const fn n1(m: N1) -> P {
    P::new(m as u8)
}

const fn n66(m: N66) -> P {
    P::new(m as u8)
}

const fn nf3(m: NF3) -> P {
    P::new(m as u8)
}

const fn nf2(m: NF2) -> P {
    P::new(m as u8)
}

const fn ng(m: NG) -> P {
    P::new(m as u8)
}

/// Packed vector op: `V, W`.
pub(crate) const fn vw(p: P) -> P {
    p.modrm(C::Vector, C::Vector)
}

/// Packed vector op with a VEX source: `V, H, W`.
pub(crate) const fn vhw(p: P) -> P {
    vw(p).vvvv(V::Vector).vex()
}

/// Store form: `W, V`.
pub(crate) const fn wv(p: P) -> P {
    vw(p).rm_first()
}

/// Scalar op on XMM registers with a VEX source.
pub(crate) const fn sx(p: P) -> P {
    p.modrm(C::Xmm, C::Xmm).vvvv(V::Vector).vex()
}

pub(crate) const fn mmx(p: P) -> P {
    p.modrm(C::Mmx, C::Mmx)
}

/// Vector shift by an XMM count: `V, H, Wx`.
const fn vshift(p: P) -> P {
    p.modrm(C::Vector, C::Xmm).vvvv(V::Vector).vex()
}

const ALU: [N0; 8] = [N0::Add, N0::Or, N0::Adc, N0::Sbb, N0::And, N0::Sub, N0::Xor, N0::Cmp];
const SHIFTS: [N0; 8] = [N0::Rol, N0::Ror, N0::Rcl, N0::Rcr, N0::Shl, N0::Shr, N0::Sal, N0::Sar];

/// One-byte opcode map.
pub static MAP0: Table = {
    let mut t = [NONE_ENTRY; 256];

    let mut i = 0;
    while i < 8 {
        let base = i * 8;
        let m = ALU[i];
        t[base] = Some(n0(m).modrm(C::Gpr8, C::Gpr8).rm_first());
        t[base + 1] = Some(n0(m).modrm(C::Gpr, C::Gpr).rm_first());
        t[base + 2] = Some(n0(m).modrm(C::Gpr8, C::Gpr8));
        t[base + 3] = Some(n0(m).modrm(C::Gpr, C::Gpr));
        t[base + 4] = Some(n0(m).accumulator(C::Gpr8).imm8());
        t[base + 5] = Some(n0(m).accumulator(C::Gpr).imm(ImmKind::Full));
        i += 1;
    }

    let mut r = 0;
    while r < 8 {
        t[0x50 + r] = Some(n0(N0::Push).opcode_register(C::Gpr).default_64());
        t[0x58 + r] = Some(n0(N0::Pop).opcode_register(C::Gpr).default_64());
        t[0x70 + r] = Some(n0(N0::Jcc).relative(ImmKind::Byte));
        t[0x78 + r] = Some(n0(N0::Jcc).relative(ImmKind::Byte));
        t[0x90 + r] = Some(n0(N0::Xchg).opcode_register(C::Gpr).accumulator(C::Gpr));
        t[0xB0 + r] = Some(n0(N0::Mov).opcode_register(C::Gpr8).imm8());
        t[0xB8 + r] = Some(n0(N0::Mov).opcode_register(C::Gpr).imm(ImmKind::Wide));
        r += 1;
    }

    t[0x63] = Some(n0(N0::Movsxd).modrm(C::Gpr, C::Gpr32));
    t[0x68] = Some(n0(N0::Push).imm(ImmKind::Full).default_64());
    t[0x69] = Some(n0(N0::Imul).modrm(C::Gpr, C::Gpr).imm(ImmKind::Full));
    t[0x6A] = Some(n0(N0::Push).imm8().default_64());
    t[0x6B] = Some(n0(N0::Imul).modrm(C::Gpr, C::Gpr).imm8());
    t[0x6C] = Some(n0(N0::Ins));
    t[0x6D] = Some(n0(N0::Ins));
    t[0x6E] = Some(n0(N0::Outs));
    t[0x6F] = Some(n0(N0::Outs));

    t[0x84] = Some(n0(N0::Test).modrm(C::Gpr8, C::Gpr8).rm_first());
    t[0x85] = Some(n0(N0::Test).modrm(C::Gpr, C::Gpr).rm_first());
    t[0x86] = Some(n0(N0::Xchg).modrm(C::Gpr8, C::Gpr8).rm_first());
    t[0x87] = Some(n0(N0::Xchg).modrm(C::Gpr, C::Gpr).rm_first());
    t[0x88] = Some(n0(N0::Mov).modrm(C::Gpr8, C::Gpr8).rm_first());
    t[0x89] = Some(n0(N0::Mov).modrm(C::Gpr, C::Gpr).rm_first());
    t[0x8A] = Some(n0(N0::Mov).modrm(C::Gpr8, C::Gpr8));
    t[0x8B] = Some(n0(N0::Mov).modrm(C::Gpr, C::Gpr));
    t[0x8C] = Some(n0(N0::Mov).modrm(C::Segment, C::Gpr16).rm_first());
    t[0x8D] = Some(n0(N0::Lea).modrm(C::Gpr, C::Mem));
    t[0x8E] = Some(n0(N0::Mov).modrm(C::Segment, C::Gpr16));

    t[0x98] = Some(n0(N0::Cwde));
    t[0x99] = Some(n0(N0::Cdq));
    t[0x9B] = Some(n0(N0::Fwait));
    t[0x9C] = Some(n0(N0::Pushf).default_64());
    t[0x9D] = Some(n0(N0::Popf).default_64());
    t[0x9E] = Some(n0(N0::Sahf));
    t[0x9F] = Some(n0(N0::Lahf));

    t[0xA0] = Some(n0(N0::Mov).moffs(C::Gpr8));
    t[0xA1] = Some(n0(N0::Mov).moffs(C::Gpr));
    t[0xA2] = Some(n0(N0::Mov).moffs(C::Gpr8).rm_first());
    t[0xA3] = Some(n0(N0::Mov).moffs(C::Gpr).rm_first());
    t[0xA4] = Some(n0(N0::Movs));
    t[0xA5] = Some(n0(N0::Movs));
    t[0xA6] = Some(n0(N0::Cmps));
    t[0xA7] = Some(n0(N0::Cmps));
    t[0xA8] = Some(n0(N0::Test).accumulator(C::Gpr8).imm8());
    t[0xA9] = Some(n0(N0::Test).accumulator(C::Gpr).imm(ImmKind::Full));
    t[0xAA] = Some(n0(N0::Stos));
    t[0xAB] = Some(n0(N0::Stos));
    t[0xAC] = Some(n0(N0::Lods));
    t[0xAD] = Some(n0(N0::Lods));
    t[0xAE] = Some(n0(N0::Scas));
    t[0xAF] = Some(n0(N0::Scas));

    t[0xC2] = Some(n0(N0::Ret).imm(ImmKind::Word));
    t[0xC3] = Some(n0(N0::Ret));
    t[0xC8] = Some(n0(N0::Enter).imm(ImmKind::Word).imm1());
    t[0xC9] = Some(n0(N0::Leave));
    t[0xCA] = Some(n0(N0::Retf).imm(ImmKind::Word));
    t[0xCB] = Some(n0(N0::Retf));
    t[0xCC] = Some(n0(N0::Int3));
    t[0xCD] = Some(n0(N0::Int).imm8());
    t[0xCF] = Some(n0(N0::Iret));

    t[0xD7] = Some(n0(N0::Xlat));

    t[0xE0] = Some(n0(N0::Loopne).relative(ImmKind::Byte));
    t[0xE1] = Some(n0(N0::Loope).relative(ImmKind::Byte));
    t[0xE2] = Some(n0(N0::Loop).relative(ImmKind::Byte));
    t[0xE3] = Some(n0(N0::Jrcxz).relative(ImmKind::Byte));
    t[0xE4] = Some(n0(N0::In).accumulator(C::Gpr8).imm8());
    t[0xE5] = Some(n0(N0::In).accumulator(C::Gpr32).imm8());
    t[0xE6] = Some(n0(N0::Out).accumulator(C::Gpr8).imm8().rm_first());
    t[0xE7] = Some(n0(N0::Out).accumulator(C::Gpr32).imm8().rm_first());
    t[0xE8] = Some(n0(N0::Call).relative(ImmKind::Full).default_64());
    t[0xE9] = Some(n0(N0::Jmp).relative(ImmKind::Full).default_64());
    t[0xEB] = Some(n0(N0::Jmp).relative(ImmKind::Byte).default_64());
    t[0xEC] = Some(n0(N0::In).accumulator(C::Gpr8));
    t[0xED] = Some(n0(N0::In).accumulator(C::Gpr32));
    t[0xEE] = Some(n0(N0::Out).accumulator(C::Gpr8).rm_first());
    t[0xEF] = Some(n0(N0::Out).accumulator(C::Gpr32).rm_first());

    t[0xF1] = Some(n0(N0::Int1));
    t[0xF4] = Some(n0(N0::Hlt));
    t[0xF5] = Some(n0(N0::Cmc));
    t[0xF8] = Some(n0(N0::Clc));
    t[0xF9] = Some(n0(N0::Stc));
    t[0xFA] = Some(n0(N0::Cli));
    t[0xFB] = Some(n0(N0::Sti));
    t[0xFC] = Some(n0(N0::Cld));
    t[0xFD] = Some(n0(N0::Std));
    t
};

const fn alu_group(rm: C, imm: ImmKind) -> Slots {
    let mut slots = EMPTY;
    let mut i = 0;
    while i < 8 {
        slots[i] = Some(n0(ALU[i]).modrm(C::None, rm).imm(imm));
        i += 1;
    }
    slots
}

/// Shift/rotate group; `imm` selects the `Ib` forms over the by-1/by-CL forms.
const fn shift_group(rm: C, imm: bool) -> Slots {
    let mut slots = EMPTY;
    let mut i = 0;
    while i < 8 {
        let p = n0(SHIFTS[i]).modrm(C::None, rm);
        slots[i] = Some(if imm { p.imm8() } else { p });
        i += 1;
    }
    slots
}

const fn unary_group(rm: C, test_imm: ImmKind) -> Slots {
    let test = n0(N0::Test).modrm(C::None, rm).imm(test_imm);
    [
        Some(test),
        Some(test),
        Some(n0(N0::Not).modrm(C::None, rm)),
        Some(n0(N0::Neg).modrm(C::None, rm)),
        Some(n0(N0::Mul).modrm(C::None, rm)),
        Some(n0(N0::Imul).modrm(C::None, rm)),
        Some(n0(N0::Div).modrm(C::None, rm)),
        Some(n0(N0::Idiv).modrm(C::None, rm)),
    ]
}

static GROUP_80: OpcodeGroup = OpcodeGroup::uniform(NameTable::Map0, alu_group(C::Gpr8, ImmKind::Byte));
static GROUP_81: OpcodeGroup = OpcodeGroup::uniform(NameTable::Map0, alu_group(C::Gpr, ImmKind::Full));
static GROUP_83: OpcodeGroup = OpcodeGroup::uniform(NameTable::Map0, alu_group(C::Gpr, ImmKind::Byte));
static GROUP_8F: OpcodeGroup = OpcodeGroup::uniform(
    NameTable::Map0,
    [Some(n0(N0::Pop).modrm(C::None, C::Gpr).default_64()), None, None, None, None, None, None, None],
);
static GROUP_C0: OpcodeGroup = OpcodeGroup::uniform(NameTable::Map0, shift_group(C::Gpr8, true));
static GROUP_C1: OpcodeGroup = OpcodeGroup::uniform(NameTable::Map0, shift_group(C::Gpr, true));
static GROUP_C6: OpcodeGroup = OpcodeGroup::split(
    NameTable::Map0,
    [Some(n0(N0::Mov).modrm(C::None, C::Gpr8).imm8()), None, None, None, None, None, None, None],
    [
        Some(n0(N0::Mov).modrm(C::None, C::Gpr8).imm8()),
        None,
        None,
        None,
        None,
        None,
        None,
        Some(n0(N0::Xabort).modrm(C::None, C::None).imm8()),
    ],
);
static GROUP_C7: OpcodeGroup = OpcodeGroup::split(
    NameTable::Map0,
    [Some(n0(N0::Mov).modrm(C::None, C::Gpr).imm(ImmKind::Full)), None, None, None, None, None, None, None],
    [
        Some(n0(N0::Mov).modrm(C::None, C::Gpr).imm(ImmKind::Full)),
        None,
        None,
        None,
        None,
        None,
        None,
        Some(n0(N0::Xbegin).modrm(C::None, C::None).relative(ImmKind::Full)),
    ],
);
static GROUP_D0: OpcodeGroup = OpcodeGroup::uniform(NameTable::Map0, shift_group(C::Gpr8, false));
static GROUP_D1: OpcodeGroup = OpcodeGroup::uniform(NameTable::Map0, shift_group(C::Gpr, false));
static GROUP_D2: OpcodeGroup = OpcodeGroup::uniform(NameTable::Map0, shift_group(C::Gpr8, false));
static GROUP_D3: OpcodeGroup = OpcodeGroup::uniform(NameTable::Map0, shift_group(C::Gpr, false));
static GROUP_F6: OpcodeGroup = OpcodeGroup::uniform(NameTable::Map0, unary_group(C::Gpr8, ImmKind::Byte));
static GROUP_F7: OpcodeGroup = OpcodeGroup::uniform(NameTable::Map0, unary_group(C::Gpr, ImmKind::Full));
static GROUP_FE: OpcodeGroup = OpcodeGroup::uniform(
    NameTable::Map0,
    [
        Some(n0(N0::Inc).modrm(C::None, C::Gpr8)),
        Some(n0(N0::Dec).modrm(C::None, C::Gpr8)),
        None,
        None,
        None,
        None,
        None,
        None,
    ],
);
static GROUP_FF: OpcodeGroup = OpcodeGroup::split(
    NameTable::Map0,
    [
        Some(n0(N0::Inc).modrm(C::None, C::Gpr)),
        Some(n0(N0::Dec).modrm(C::None, C::Gpr)),
        Some(n0(N0::Call).modrm(C::None, C::Gpr).default_64()),
        Some(n0(N0::CallFar).modrm(C::None, C::Mem)),
        Some(n0(N0::Jmp).modrm(C::None, C::Gpr).default_64()),
        Some(n0(N0::JmpFar).modrm(C::None, C::Mem)),
        Some(n0(N0::Push).modrm(C::None, C::Gpr).default_64()),
        None,
    ],
    [
        Some(n0(N0::Inc).modrm(C::None, C::Gpr)),
        Some(n0(N0::Dec).modrm(C::None, C::Gpr)),
        Some(n0(N0::Call).modrm(C::None, C::Gpr).default_64()),
        None,
        Some(n0(N0::Jmp).modrm(C::None, C::Gpr).default_64()),
        None,
        Some(n0(N0::Push).modrm(C::None, C::Gpr).default_64()),
        None,
    ],
);

/// Group table for a one-byte opcode classified as `Group`.
pub fn map0_group(opcode: u8) -> Option<&'static OpcodeGroup> {
    let group = match opcode {
        0x80 => &GROUP_80,
        0x81 => &GROUP_81,
        0x83 => &GROUP_83,
        0x8F => &GROUP_8F,
        0xC0 => &GROUP_C0,
        0xC1 => &GROUP_C1,
        0xC6 => &GROUP_C6,
        0xC7 => &GROUP_C7,
        0xD0 => &GROUP_D0,
        0xD1 => &GROUP_D1,
        0xD2 => &GROUP_D2,
        0xD3 => &GROUP_D3,
        0xD8..=0xDF => &x87::GROUPS[usize::from(opcode - 0xD8)],
        0xF6 => &GROUP_F6,
        0xF7 => &GROUP_F7,
        0xFE => &GROUP_FE,
        0xFF => &GROUP_FF,
        _ => return None,
    };
    Some(group)
}

/// Two-byte map without a mandatory prefix, including the legacy
/// instructions that ignore SSE prefixes.
pub static MAP1_NP: Table = {
    let mut t = [NONE_ENTRY; 256];

    t[0x02] = Some(n1(N1::Lar).modrm(C::Gpr, C::Gpr16));
    t[0x03] = Some(n1(N1::Lsl).modrm(C::Gpr, C::Gpr16));
    t[0x05] = Some(n1(N1::Syscall));
    t[0x06] = Some(n1(N1::Clts));
    t[0x07] = Some(n1(N1::Sysret));
    t[0x08] = Some(n1(N1::Invd));
    t[0x09] = Some(n1(N1::Wbinvd));
    t[0x0B] = Some(n1(N1::Ud2));

    t[0x10] = Some(vw(n1(N1::Movups)).vex());
    t[0x11] = Some(wv(n1(N1::Movups)).vex());
    t[0x12] = Some(n1(N1::Movlps).modrm(C::Xmm, C::Xmm).vvvv(V::Vector).vex());
    t[0x13] = Some(n1(N1::Movlps).modrm(C::Xmm, C::Mem).rm_first().vex());
    t[0x14] = Some(vhw(n1(N1::Unpcklps)));
    t[0x15] = Some(vhw(n1(N1::Unpckhps)));
    t[0x16] = Some(n1(N1::Movhps).modrm(C::Xmm, C::Xmm).vvvv(V::Vector).vex());
    t[0x17] = Some(n1(N1::Movhps).modrm(C::Xmm, C::Mem).rm_first().vex());

    let mut r = 0x19;
    while r <= 0x1F {
        t[r] = Some(n1(N1::Nop).modrm(C::None, C::Gpr));
        r += 1;
    }

    t[0x20] = Some(n1(N1::Mov).modrm(C::Control, C::Gpr64).register_only().rm_first());
    t[0x21] = Some(n1(N1::Mov).modrm(C::Debug, C::Gpr64).register_only().rm_first());
    t[0x22] = Some(n1(N1::Mov).modrm(C::Control, C::Gpr64).register_only());
    t[0x23] = Some(n1(N1::Mov).modrm(C::Debug, C::Gpr64).register_only());

    t[0x28] = Some(vw(n1(N1::Movaps)).vex());
    t[0x29] = Some(wv(n1(N1::Movaps)).vex());
    t[0x2A] = Some(n1(N1::Cvtpi2ps).modrm(C::Xmm, C::Mmx));
    t[0x2B] = Some(n1(N1::Movntps).modrm(C::Vector, C::Mem).rm_first().vex());
    t[0x2C] = Some(n1(N1::Cvttps2pi).modrm(C::Mmx, C::Xmm));
    t[0x2D] = Some(n1(N1::Cvtps2pi).modrm(C::Mmx, C::Xmm));
    t[0x2E] = Some(n1(N1::Ucomiss).modrm(C::Xmm, C::Xmm).vex());
    t[0x2F] = Some(n1(N1::Comiss).modrm(C::Xmm, C::Xmm).vex());

    t[0x30] = Some(n1(N1::Wrmsr));
    t[0x31] = Some(n1(N1::Rdtsc));
    t[0x32] = Some(n1(N1::Rdmsr));
    t[0x33] = Some(n1(N1::Rdpmc));
    t[0x34] = Some(n1(N1::Sysenter));
    t[0x35] = Some(n1(N1::Sysexit));
    t[0x37] = Some(n1(N1::Getsec));

    let mut r = 0;
    while r < 16 {
        t[0x40 + r] = Some(n1(N1::Cmovcc).modrm(C::Gpr, C::Gpr));
        t[0x80 + r] = Some(n1(N1::Jcc).relative(ImmKind::Full).default_64());
        t[0x90 + r] = Some(n1(N1::Setcc).modrm(C::None, C::Gpr8));
        r += 1;
    }

    t[0x50] = Some(n1(N1::Movmskps).modrm(C::Gpr32, C::Vector).vex().no_evex());
    t[0x51] = Some(vw(n1(N1::Sqrtps)).vex());
    t[0x52] = Some(vw(n1(N1::Rsqrtps)).vex().no_evex());
    t[0x53] = Some(vw(n1(N1::Rcpps)).vex().no_evex());
    t[0x54] = Some(vhw(n1(N1::Andps)));
    t[0x55] = Some(vhw(n1(N1::Andnps)));
    t[0x56] = Some(vhw(n1(N1::Orps)));
    t[0x57] = Some(vhw(n1(N1::Xorps)));
    t[0x58] = Some(vhw(n1(N1::Addps)));
    t[0x59] = Some(vhw(n1(N1::Mulps)));
    t[0x5A] = Some(n1(N1::Cvtps2pd).modrm(C::Vector, C::Xmm).vex());
    t[0x5B] = Some(vw(n1(N1::Cvtdq2ps)).vex());
    t[0x5C] = Some(vhw(n1(N1::Subps)));
    t[0x5D] = Some(vhw(n1(N1::Minps)));
    t[0x5E] = Some(vhw(n1(N1::Divps)));
    t[0x5F] = Some(vhw(n1(N1::Maxps)));

    t[0x60] = Some(mmx(n1(N1::Punpcklbw)));
    t[0x61] = Some(mmx(n1(N1::Punpcklwd)));
    t[0x62] = Some(mmx(n1(N1::Punpckldq)));
    t[0x63] = Some(mmx(n1(N1::Packsswb)));
    t[0x64] = Some(mmx(n1(N1::Pcmpgtb)));
    t[0x65] = Some(mmx(n1(N1::Pcmpgtw)));
    t[0x66] = Some(mmx(n1(N1::Pcmpgtd)));
    t[0x67] = Some(mmx(n1(N1::Packuswb)));
    t[0x68] = Some(mmx(n1(N1::Punpckhbw)));
    t[0x69] = Some(mmx(n1(N1::Punpckhwd)));
    t[0x6A] = Some(mmx(n1(N1::Punpckhdq)));
    t[0x6B] = Some(mmx(n1(N1::Packssdw)));
    t[0x6E] = Some(n1(N1::Movd).modrm(C::Mmx, C::GprW));
    t[0x6F] = Some(mmx(n1(N1::Movq)));

    t[0x70] = Some(mmx(n1(N1::Pshufw)).imm8());
    t[0x74] = Some(mmx(n1(N1::Pcmpeqb)));
    t[0x75] = Some(mmx(n1(N1::Pcmpeqw)));
    t[0x76] = Some(mmx(n1(N1::Pcmpeqd)));
    t[0x77] = Some(n1(N1::Emms));
    t[0x78] = Some(n1(N1::Vmread).modrm(C::Gpr64, C::Gpr64).rm_first());
    t[0x79] = Some(n1(N1::Vmwrite).modrm(C::Gpr64, C::Gpr64));
    t[0x7E] = Some(n1(N1::Movd).modrm(C::Mmx, C::GprW).rm_first());
    t[0x7F] = Some(mmx(n1(N1::Movq)).rm_first());

    t[0xA0] = Some(n1(N1::Push).default_64());
    t[0xA1] = Some(n1(N1::Pop).default_64());
    t[0xA2] = Some(n1(N1::Cpuid));
    t[0xA3] = Some(n1(N1::Bt).modrm(C::Gpr, C::Gpr).rm_first());
    t[0xA4] = Some(n1(N1::Shld).modrm(C::Gpr, C::Gpr).rm_first().imm8());
    t[0xA5] = Some(n1(N1::Shld).modrm(C::Gpr, C::Gpr).rm_first());
    t[0xA8] = Some(n1(N1::Push).default_64());
    t[0xA9] = Some(n1(N1::Pop).default_64());
    t[0xAA] = Some(n1(N1::Rsm));
    t[0xAB] = Some(n1(N1::Bts).modrm(C::Gpr, C::Gpr).rm_first());
    t[0xAC] = Some(n1(N1::Shrd).modrm(C::Gpr, C::Gpr).rm_first().imm8());
    t[0xAD] = Some(n1(N1::Shrd).modrm(C::Gpr, C::Gpr).rm_first());
    t[0xAF] = Some(n1(N1::Imul).modrm(C::Gpr, C::Gpr));

    t[0xB0] = Some(n1(N1::Cmpxchg).modrm(C::Gpr8, C::Gpr8).rm_first());
    t[0xB1] = Some(n1(N1::Cmpxchg).modrm(C::Gpr, C::Gpr).rm_first());
    t[0xB2] = Some(n1(N1::Lss).modrm(C::Gpr, C::Mem));
    t[0xB3] = Some(n1(N1::Btr).modrm(C::Gpr, C::Gpr).rm_first());
    t[0xB4] = Some(n1(N1::Lfs).modrm(C::Gpr, C::Mem));
    t[0xB5] = Some(n1(N1::Lgs).modrm(C::Gpr, C::Mem));
    t[0xB6] = Some(n1(N1::Movzx).modrm(C::Gpr, C::Gpr8));
    t[0xB7] = Some(n1(N1::Movzx).modrm(C::Gpr, C::Gpr16));
    t[0xB9] = Some(n1(N1::Ud1).modrm(C::Gpr, C::Gpr));
    t[0xBB] = Some(n1(N1::Btc).modrm(C::Gpr, C::Gpr).rm_first());
    t[0xBC] = Some(n1(N1::Bsf).modrm(C::Gpr, C::Gpr));
    t[0xBD] = Some(n1(N1::Bsr).modrm(C::Gpr, C::Gpr));
    t[0xBE] = Some(n1(N1::Movsx).modrm(C::Gpr, C::Gpr8));
    t[0xBF] = Some(n1(N1::Movsx).modrm(C::Gpr, C::Gpr16));

    t[0xC0] = Some(n1(N1::Xadd).modrm(C::Gpr8, C::Gpr8).rm_first());
    t[0xC1] = Some(n1(N1::Xadd).modrm(C::Gpr, C::Gpr).rm_first());
    t[0xC2] = Some(vhw(n1(N1::Cmpps)).imm8());
    t[0xC3] = Some(n1(N1::Movnti).modrm(C::GprW, C::Mem).rm_first());
    t[0xC4] = Some(n1(N1::Pinsrw).modrm(C::Mmx, C::Gpr32).imm8());
    t[0xC5] = Some(n1(N1::Pextrw).modrm(C::Gpr32, C::Mmx).imm8());
    t[0xC6] = Some(vhw(n1(N1::Shufps)).imm8());
    let mut r = 0;
    while r < 8 {
        t[0xC8 + r] = Some(n1(N1::Bswap).opcode_register(C::Gpr));
        r += 1;
    }

    t[0xD1] = Some(mmx(n1(N1::Psrlw)));
    t[0xD2] = Some(mmx(n1(N1::Psrld)));
    t[0xD3] = Some(mmx(n1(N1::Psrlq)));
    t[0xD4] = Some(mmx(n1(N1::Paddq)));
    t[0xD5] = Some(mmx(n1(N1::Pmullw)));
    t[0xD7] = Some(n1(N1::Pmovmskb).modrm(C::Gpr32, C::Mmx));
    t[0xD8] = Some(mmx(n1(N1::Psubusb)));
    t[0xD9] = Some(mmx(n1(N1::Psubusw)));
    t[0xDA] = Some(mmx(n1(N1::Pminub)));
    t[0xDB] = Some(mmx(n1(N1::Pand)));
    t[0xDC] = Some(mmx(n1(N1::Paddusb)));
    t[0xDD] = Some(mmx(n1(N1::Paddusw)));
    t[0xDE] = Some(mmx(n1(N1::Pmaxub)));
    t[0xDF] = Some(mmx(n1(N1::Pandn)));

    t[0xE0] = Some(mmx(n1(N1::Pavgb)));
    t[0xE1] = Some(mmx(n1(N1::Psraw)));
    t[0xE2] = Some(mmx(n1(N1::Psrad)));
    t[0xE3] = Some(mmx(n1(N1::Pavgw)));
    t[0xE4] = Some(mmx(n1(N1::Pmulhuw)));
    t[0xE5] = Some(mmx(n1(N1::Pmulhw)));
    t[0xE7] = Some(n1(N1::Movntq).modrm(C::Mmx, C::Mem).rm_first());
    t[0xE8] = Some(mmx(n1(N1::Psubsb)));
    t[0xE9] = Some(mmx(n1(N1::Psubsw)));
    t[0xEA] = Some(mmx(n1(N1::Pminsw)));
    t[0xEB] = Some(mmx(n1(N1::Por)));
    t[0xEC] = Some(mmx(n1(N1::Paddsb)));
    t[0xED] = Some(mmx(n1(N1::Paddsw)));
    t[0xEE] = Some(mmx(n1(N1::Pmaxsw)));
    t[0xEF] = Some(mmx(n1(N1::Pxor)));

    t[0xF1] = Some(mmx(n1(N1::Psllw)));
    t[0xF2] = Some(mmx(n1(N1::Pslld)));
    t[0xF3] = Some(mmx(n1(N1::Psllq)));
    t[0xF4] = Some(mmx(n1(N1::Pmuludq)));
    t[0xF5] = Some(mmx(n1(N1::Pmaddwd)));
    t[0xF6] = Some(mmx(n1(N1::Psadbw)));
    t[0xF7] = Some(mmx(n1(N1::Maskmovq)));
    t[0xF8] = Some(mmx(n1(N1::Psubb)));
    t[0xF9] = Some(mmx(n1(N1::Psubw)));
    t[0xFA] = Some(mmx(n1(N1::Psubd)));
    t[0xFB] = Some(mmx(n1(N1::Psubq)));
    t[0xFC] = Some(mmx(n1(N1::Paddb)));
    t[0xFD] = Some(mmx(n1(N1::Paddw)));
    t[0xFE] = Some(mmx(n1(N1::Paddd)));
    t[0xFF] = Some(n1(N1::Ud0).modrm(C::Gpr, C::Gpr));
    t
};

/// Two-byte map with mandatory `66`.
pub static MAP1_66: Table = {
    let mut t = [NONE_ENTRY; 256];

    t[0x10] = Some(vw(n66(N66::Movupd)).vex());
    t[0x11] = Some(wv(n66(N66::Movupd)).vex());
    t[0x12] = Some(n66(N66::Movlpd).modrm(C::Xmm, C::Mem).vvvv(V::Vector).vex());
    t[0x13] = Some(n66(N66::Movlpd).modrm(C::Xmm, C::Mem).rm_first().vex());
    t[0x14] = Some(vhw(n66(N66::Unpcklpd)));
    t[0x15] = Some(vhw(n66(N66::Unpckhpd)));
    t[0x16] = Some(n66(N66::Movhpd).modrm(C::Xmm, C::Mem).vvvv(V::Vector).vex());
    t[0x17] = Some(n66(N66::Movhpd).modrm(C::Xmm, C::Mem).rm_first().vex());

    t[0x28] = Some(vw(n66(N66::Movapd)).vex());
    t[0x29] = Some(wv(n66(N66::Movapd)).vex());
    t[0x2A] = Some(n66(N66::Cvtpi2pd).modrm(C::Xmm, C::Mmx));
    t[0x2B] = Some(n66(N66::Movntpd).modrm(C::Vector, C::Mem).rm_first().vex());
    t[0x2C] = Some(n66(N66::Cvttpd2pi).modrm(C::Mmx, C::Xmm));
    t[0x2D] = Some(n66(N66::Cvtpd2pi).modrm(C::Mmx, C::Xmm));
    t[0x2E] = Some(n66(N66::Ucomisd).modrm(C::Xmm, C::Xmm).vex());
    t[0x2F] = Some(n66(N66::Comisd).modrm(C::Xmm, C::Xmm).vex());

    t[0x50] = Some(n66(N66::Movmskpd).modrm(C::Gpr32, C::Vector).vex().no_evex());
    t[0x51] = Some(vw(n66(N66::Sqrtpd)).vex());
    t[0x54] = Some(vhw(n66(N66::Andpd)));
    t[0x55] = Some(vhw(n66(N66::Andnpd)));
    t[0x56] = Some(vhw(n66(N66::Orpd)));
    t[0x57] = Some(vhw(n66(N66::Xorpd)));
    t[0x58] = Some(vhw(n66(N66::Addpd)));
    t[0x59] = Some(vhw(n66(N66::Mulpd)));
    t[0x5A] = Some(n66(N66::Cvtpd2ps).modrm(C::Xmm, C::Vector).vex());
    t[0x5B] = Some(vw(n66(N66::Cvtps2dq)).vex());
    t[0x5C] = Some(vhw(n66(N66::Subpd)));
    t[0x5D] = Some(vhw(n66(N66::Minpd)));
    t[0x5E] = Some(vhw(n66(N66::Divpd)));
    t[0x5F] = Some(vhw(n66(N66::Maxpd)));

    t[0x60] = Some(vhw(n66(N66::Punpcklbw)));
    t[0x61] = Some(vhw(n66(N66::Punpcklwd)));
    t[0x62] = Some(vhw(n66(N66::Punpckldq)));
    t[0x63] = Some(vhw(n66(N66::Packsswb)));
    t[0x64] = Some(vhw(n66(N66::Pcmpgtb)));
    t[0x65] = Some(vhw(n66(N66::Pcmpgtw)));
    t[0x66] = Some(vhw(n66(N66::Pcmpgtd)));
    t[0x67] = Some(vhw(n66(N66::Packuswb)));
    t[0x68] = Some(vhw(n66(N66::Punpckhbw)));
    t[0x69] = Some(vhw(n66(N66::Punpckhwd)));
    t[0x6A] = Some(vhw(n66(N66::Punpckhdq)));
    t[0x6B] = Some(vhw(n66(N66::Packssdw)));
    t[0x6C] = Some(vhw(n66(N66::Punpcklqdq)));
    t[0x6D] = Some(vhw(n66(N66::Punpckhqdq)));
    t[0x6E] = Some(n66(N66::Movd).modrm(C::Xmm, C::GprW).vex());
    t[0x6F] = Some(vw(n66(N66::Movdqa)).vex());

    t[0x70] = Some(vw(n66(N66::Pshufd)).imm8().vex());
    t[0x74] = Some(vhw(n66(N66::Pcmpeqb)));
    t[0x75] = Some(vhw(n66(N66::Pcmpeqw)));
    t[0x76] = Some(vhw(n66(N66::Pcmpeqd)));
    t[0x79] = Some(n66(N66::Extrq).modrm(C::Xmm, C::Xmm));
    t[0x7C] = Some(vhw(n66(N66::Haddpd)).no_evex());
    t[0x7D] = Some(vhw(n66(N66::Hsubpd)).no_evex());
    t[0x7E] = Some(n66(N66::Movd).modrm(C::Xmm, C::GprW).rm_first().vex());
    t[0x7F] = Some(wv(n66(N66::Movdqa)).vex());

    t[0xC2] = Some(vhw(n66(N66::Cmppd)).imm8());
    t[0xC4] = Some(n66(N66::Pinsrw).modrm(C::Xmm, C::Gpr32).vvvv(V::Vector).imm8().vex());
    t[0xC5] = Some(n66(N66::Pextrw).modrm(C::Gpr32, C::Xmm).imm8().vex());
    t[0xC6] = Some(vhw(n66(N66::Shufpd)).imm8());

    t[0xD0] = Some(vhw(n66(N66::Addsubpd)).no_evex());
    t[0xD1] = Some(vshift(n66(N66::Psrlw)));
    t[0xD2] = Some(vshift(n66(N66::Psrld)));
    t[0xD3] = Some(vshift(n66(N66::Psrlq)));
    t[0xD4] = Some(vhw(n66(N66::Paddq)));
    t[0xD5] = Some(vhw(n66(N66::Pmullw)));
    t[0xD6] = Some(n66(N66::Movq).modrm(C::Xmm, C::Xmm).rm_first().vex());
    t[0xD7] = Some(n66(N66::Pmovmskb).modrm(C::Gpr32, C::Vector).vex().no_evex());
    t[0xD8] = Some(vhw(n66(N66::Psubusb)));
    t[0xD9] = Some(vhw(n66(N66::Psubusw)));
    t[0xDA] = Some(vhw(n66(N66::Pminub)));
    t[0xDB] = Some(vhw(n66(N66::Pand)));
    t[0xDC] = Some(vhw(n66(N66::Paddusb)));
    t[0xDD] = Some(vhw(n66(N66::Paddusw)));
    t[0xDE] = Some(vhw(n66(N66::Pmaxub)));
    t[0xDF] = Some(vhw(n66(N66::Pandn)));

    t[0xE0] = Some(vhw(n66(N66::Pavgb)));
    t[0xE1] = Some(vshift(n66(N66::Psraw)));
    t[0xE2] = Some(vshift(n66(N66::Psrad)));
    t[0xE3] = Some(vhw(n66(N66::Pavgw)));
    t[0xE4] = Some(vhw(n66(N66::Pmulhuw)));
    t[0xE5] = Some(vhw(n66(N66::Pmulhw)));
    t[0xE6] = Some(n66(N66::Cvttpd2dq).modrm(C::Xmm, C::Vector).vex());
    t[0xE7] = Some(n66(N66::Movntdq).modrm(C::Vector, C::Mem).rm_first().vex());
    t[0xE8] = Some(vhw(n66(N66::Psubsb)));
    t[0xE9] = Some(vhw(n66(N66::Psubsw)));
    t[0xEA] = Some(vhw(n66(N66::Pminsw)));
    t[0xEB] = Some(vhw(n66(N66::Por)));
    t[0xEC] = Some(vhw(n66(N66::Paddsb)));
    t[0xED] = Some(vhw(n66(N66::Paddsw)));
    t[0xEE] = Some(vhw(n66(N66::Pmaxsw)));
    t[0xEF] = Some(vhw(n66(N66::Pxor)));

    t[0xF1] = Some(vshift(n66(N66::Psllw)));
    t[0xF2] = Some(vshift(n66(N66::Pslld)));
    t[0xF3] = Some(vshift(n66(N66::Psllq)));
    t[0xF4] = Some(vhw(n66(N66::Pmuludq)));
    t[0xF5] = Some(vhw(n66(N66::Pmaddwd)));
    t[0xF6] = Some(vhw(n66(N66::Psadbw)));
    t[0xF7] = Some(n66(N66::Maskmovdqu).modrm(C::Xmm, C::Xmm).vex().no_evex());
    t[0xF8] = Some(vhw(n66(N66::Psubb)));
    t[0xF9] = Some(vhw(n66(N66::Psubw)));
    t[0xFA] = Some(vhw(n66(N66::Psubd)));
    t[0xFB] = Some(vhw(n66(N66::Psubq)));
    t[0xFC] = Some(vhw(n66(N66::Paddb)));
    t[0xFD] = Some(vhw(n66(N66::Paddw)));
    t[0xFE] = Some(vhw(n66(N66::Paddd)));
    t
};

/// Two-byte map with mandatory `F3`.
pub static MAP1_F3: Table = {
    let mut t = [NONE_ENTRY; 256];

    t[0x10] = Some(nf3(NF3::Movss).modrm(C::Xmm, C::Xmm).vex());
    t[0x11] = Some(nf3(NF3::Movss).modrm(C::Xmm, C::Xmm).rm_first().vex());
    t[0x12] = Some(vw(nf3(NF3::Movsldup)).vex());
    t[0x16] = Some(vw(nf3(NF3::Movshdup)).vex());
    t[0x2A] = Some(nf3(NF3::Cvtsi2ss).modrm(C::Xmm, C::GprW).vvvv(V::Vector).vex());
    t[0x2C] = Some(nf3(NF3::Cvttss2si).modrm(C::GprW, C::Xmm).vex());
    t[0x2D] = Some(nf3(NF3::Cvtss2si).modrm(C::GprW, C::Xmm).vex());

    t[0x51] = Some(sx(nf3(NF3::Sqrtss)));
    t[0x52] = Some(sx(nf3(NF3::Rsqrtss)).no_evex());
    t[0x53] = Some(sx(nf3(NF3::Rcpss)).no_evex());
    t[0x58] = Some(sx(nf3(NF3::Addss)));
    t[0x59] = Some(sx(nf3(NF3::Mulss)));
    t[0x5A] = Some(sx(nf3(NF3::Cvtss2sd)));
    t[0x5B] = Some(vw(nf3(NF3::Cvttps2dq)).vex());
    t[0x5C] = Some(sx(nf3(NF3::Subss)));
    t[0x5D] = Some(sx(nf3(NF3::Minss)));
    t[0x5E] = Some(sx(nf3(NF3::Divss)));
    t[0x5F] = Some(sx(nf3(NF3::Maxss)));

    t[0x6F] = Some(vw(nf3(NF3::Movdqu)).vex());
    t[0x70] = Some(vw(nf3(NF3::Pshufhw)).imm8().vex());
    t[0x7E] = Some(nf3(NF3::Movq).modrm(C::Xmm, C::Xmm).vex());
    t[0x7F] = Some(wv(nf3(NF3::Movdqu)).vex());

    t[0xB8] = Some(nf3(NF3::Popcnt).modrm(C::Gpr, C::Gpr));
    t[0xBC] = Some(nf3(NF3::Tzcnt).modrm(C::Gpr, C::Gpr));
    t[0xBD] = Some(nf3(NF3::Lzcnt).modrm(C::Gpr, C::Gpr));
    t[0xC2] = Some(sx(nf3(NF3::Cmpss)).imm8());
    t[0xD6] = Some(nf3(NF3::Movq2dq).modrm(C::Xmm, C::Mmx));
    t[0xE6] = Some(nf3(NF3::Cvtdq2pd).modrm(C::Vector, C::Xmm).vex());
    t
};

/// Two-byte map with mandatory `F2`.
pub static MAP1_F2: Table = {
    let mut t = [NONE_ENTRY; 256];

    t[0x10] = Some(nf2(NF2::Movsd).modrm(C::Xmm, C::Xmm).vex());
    t[0x11] = Some(nf2(NF2::Movsd).modrm(C::Xmm, C::Xmm).rm_first().vex());
    t[0x12] = Some(vw(nf2(NF2::Movddup)).vex());
    t[0x2A] = Some(nf2(NF2::Cvtsi2sd).modrm(C::Xmm, C::GprW).vvvv(V::Vector).vex());
    t[0x2C] = Some(nf2(NF2::Cvttsd2si).modrm(C::GprW, C::Xmm).vex());
    t[0x2D] = Some(nf2(NF2::Cvtsd2si).modrm(C::GprW, C::Xmm).vex());

    t[0x51] = Some(sx(nf2(NF2::Sqrtsd)));
    t[0x58] = Some(sx(nf2(NF2::Addsd)));
    t[0x59] = Some(sx(nf2(NF2::Mulsd)));
    t[0x5A] = Some(sx(nf2(NF2::Cvtsd2ss)));
    t[0x5C] = Some(sx(nf2(NF2::Subsd)));
    t[0x5D] = Some(sx(nf2(NF2::Minsd)));
    t[0x5E] = Some(sx(nf2(NF2::Divsd)));
    t[0x5F] = Some(sx(nf2(NF2::Maxsd)));

    t[0x70] = Some(vw(nf2(NF2::Pshuflw)).imm8().vex());
    t[0x78] = Some(nf2(NF2::Insertq).modrm(C::Xmm, C::Xmm).imm8().imm1());
    t[0x79] = Some(nf2(NF2::Insertq).modrm(C::Xmm, C::Xmm));
    t[0x7C] = Some(vhw(nf2(NF2::Haddps)).no_evex());
    t[0x7D] = Some(vhw(nf2(NF2::Hsubps)).no_evex());

    t[0xC2] = Some(sx(nf2(NF2::Cmpsd)).imm8());
    t[0xD0] = Some(vhw(nf2(NF2::Addsubps)).no_evex());
    t[0xD6] = Some(nf2(NF2::Movdq2q).modrm(C::Mmx, C::Xmm));
    t[0xE6] = Some(nf2(NF2::Cvtpd2dq).modrm(C::Xmm, C::Vector).vex());
    t[0xF0] = Some(nf2(NF2::Lddqu).modrm(C::Vector, C::Mem).vex().no_evex());
    t
};

const fn mem(m: NG) -> Option<P> {
    Some(ng(m).modrm(C::None, C::Mem))
}

const fn reg(m: NG, rm: C) -> Option<P> {
    Some(ng(m).modrm(C::None, rm))
}

/// Register forms named by the whole ModRM byte (`0F 01 C8` is `monitor`).
const fn system() -> Option<P> {
    Some(ng(NG::System).modrm(C::None, C::None))
}

/// Shift-by-immediate group entry.
const fn shift_imm(m: NG, rm: C) -> Option<P> {
    Some(ng(m).modrm(C::None, rm).imm8())
}

static GROUP_0F00: OpcodeGroup = OpcodeGroup::uniform(
    NameTable::Map1Group,
    [
        reg(NG::Sldt, C::Gpr16),
        reg(NG::Str, C::Gpr16),
        reg(NG::Lldt, C::Gpr16),
        reg(NG::Ltr, C::Gpr16),
        reg(NG::Verr, C::Gpr16),
        reg(NG::Verw, C::Gpr16),
        None,
        None,
    ],
);

static GROUP_0F01: OpcodeGroup = OpcodeGroup::split(
    NameTable::Map1Group,
    [
        mem(NG::Sgdt),
        mem(NG::Sidt),
        mem(NG::Lgdt),
        mem(NG::Lidt),
        reg(NG::Smsw, C::Gpr16),
        None,
        reg(NG::Lmsw, C::Gpr16),
        mem(NG::Invlpg),
    ],
    [
        system(),
        system(),
        system(),
        system(),
        reg(NG::Smsw, C::Gpr),
        system(),
        reg(NG::Lmsw, C::Gpr16),
        system(),
    ],
);

static GROUP_0F0D: OpcodeGroup = OpcodeGroup::split(
    NameTable::Map1Group,
    [
        mem(NG::Prefetch),
        mem(NG::Prefetchw),
        mem(NG::Prefetch),
        mem(NG::Prefetch),
        mem(NG::Prefetch),
        mem(NG::Prefetch),
        mem(NG::Prefetch),
        mem(NG::Prefetch),
    ],
    EMPTY,
);

static GROUP_0F18: OpcodeGroup = OpcodeGroup::split(
    NameTable::Map1Group,
    [
        mem(NG::Prefetchnta),
        mem(NG::Prefetcht0),
        mem(NG::Prefetcht1),
        mem(NG::Prefetcht2),
        reg(NG::Nop, C::Gpr),
        reg(NG::Nop, C::Gpr),
        reg(NG::Nop, C::Gpr),
        reg(NG::Nop, C::Gpr),
    ],
    [
        reg(NG::Nop, C::Gpr),
        reg(NG::Nop, C::Gpr),
        reg(NG::Nop, C::Gpr),
        reg(NG::Nop, C::Gpr),
        reg(NG::Nop, C::Gpr),
        reg(NG::Nop, C::Gpr),
        reg(NG::Nop, C::Gpr),
        reg(NG::Nop, C::Gpr),
    ],
);

static GROUP_0F71: OpcodeGroup = OpcodeGroup::split(
    NameTable::Map1Group,
    EMPTY,
    [None, None, shift_imm(NG::Psrlw, C::Mmx), None, shift_imm(NG::Psraw, C::Mmx), None, shift_imm(NG::Psllw, C::Mmx), None],
);

static GROUP_0F72: OpcodeGroup = OpcodeGroup::split(
    NameTable::Map1Group,
    EMPTY,
    [None, None, shift_imm(NG::Psrld, C::Mmx), None, shift_imm(NG::Psrad, C::Mmx), None, shift_imm(NG::Pslld, C::Mmx), None],
);

static GROUP_0F73: OpcodeGroup = OpcodeGroup::split(
    NameTable::Map1Group,
    EMPTY,
    [None, None, shift_imm(NG::Psrlq, C::Mmx), None, None, None, shift_imm(NG::Psllq, C::Mmx), None],
);

static GROUP_660F71: OpcodeGroup = OpcodeGroup::split(
    NameTable::Map1Group,
    EMPTY,
    [
        None,
        None,
        shift_imm(NG::Psrlw, C::Vector),
        None,
        shift_imm(NG::Psraw, C::Vector),
        None,
        shift_imm(NG::Psllw, C::Vector),
        None,
    ],
);

static GROUP_660F72: OpcodeGroup = OpcodeGroup::split(
    NameTable::Map1Group,
    EMPTY,
    [
        None,
        None,
        shift_imm(NG::Psrld, C::Vector),
        None,
        shift_imm(NG::Psrad, C::Vector),
        None,
        shift_imm(NG::Pslld, C::Vector),
        None,
    ],
);

static GROUP_660F73: OpcodeGroup = OpcodeGroup::split(
    NameTable::Map1Group,
    EMPTY,
    [
        None,
        None,
        shift_imm(NG::Psrlq, C::Vector),
        shift_imm(NG::Psrldq, C::Vector),
        None,
        None,
        shift_imm(NG::Psllq, C::Vector),
        shift_imm(NG::Pslldq, C::Vector),
    ],
);

static GROUP_660F78: OpcodeGroup = OpcodeGroup::split(
    NameTable::Map1Group,
    EMPTY,
    [Some(ng(NG::Extrq).modrm(C::None, C::Xmm).imm8().imm1()), None, None, None, None, None, None, None],
);

static GROUP_0FAE: OpcodeGroup = OpcodeGroup::split(
    NameTable::Map1Group,
    [
        mem(NG::Fxsave),
        mem(NG::Fxrstor),
        mem(NG::Ldmxcsr),
        mem(NG::Stmxcsr),
        mem(NG::Xsave),
        mem(NG::Xrstor),
        mem(NG::Xsaveopt),
        mem(NG::Clflush),
    ],
    [
        None,
        None,
        None,
        None,
        None,
        reg(NG::Lfence, C::None),
        reg(NG::Mfence, C::None),
        reg(NG::Sfence, C::None),
    ],
);

static GROUP_660FAE: OpcodeGroup = OpcodeGroup::split(
    NameTable::Map1Group,
    [None, None, None, None, None, None, mem(NG::Clwb), mem(NG::Clflushopt)],
    EMPTY,
);

static GROUP_F30FAE: OpcodeGroup = OpcodeGroup::split(
    NameTable::Map1Group,
    EMPTY,
    [
        reg(NG::Rdfsbase, C::GprW),
        reg(NG::Rdgsbase, C::GprW),
        reg(NG::Wrfsbase, C::GprW),
        reg(NG::Wrgsbase, C::GprW),
        None,
        None,
        None,
        None,
    ],
);

static GROUP_0FBA: OpcodeGroup = OpcodeGroup::uniform(
    NameTable::Map1Group,
    [
        None,
        None,
        None,
        None,
        Some(ng(NG::Bt).modrm(C::None, C::Gpr).imm8()),
        Some(ng(NG::Bts).modrm(C::None, C::Gpr).imm8()),
        Some(ng(NG::Btr).modrm(C::None, C::Gpr).imm8()),
        Some(ng(NG::Btc).modrm(C::None, C::Gpr).imm8()),
    ],
);

static GROUP_0FC7: OpcodeGroup = OpcodeGroup::split(
    NameTable::Map1Group,
    [
        None,
        mem(NG::Cmpxchg8b),
        None,
        mem(NG::Xrstors),
        mem(NG::Xsavec),
        mem(NG::Xsaves),
        mem(NG::Vmptrld),
        mem(NG::Vmptrst),
    ],
    [None, None, None, None, None, None, reg(NG::Rdrand, C::Gpr), reg(NG::Rdseed, C::Gpr)],
);

static GROUP_660FC7: OpcodeGroup = OpcodeGroup::split(
    NameTable::Map1Group,
    [None, None, None, None, None, None, mem(NG::Vmclear), None],
    EMPTY,
);

static GROUP_F30FC7: OpcodeGroup = OpcodeGroup::split(
    NameTable::Map1Group,
    [None, None, None, None, None, None, mem(NG::Vmxon), None],
    [None, None, None, None, None, None, None, reg(NG::Rdpid, C::Gpr64)],
);

/// Group table for a two-byte opcode under a mandatory prefix. Prefixed
/// groups only list the extensions that differ from the unprefixed group.
pub fn map1_group(prefix: MandatoryPrefix, opcode: u8) -> Option<&'static OpcodeGroup> {
    use MandatoryPrefix as M;

    let group = match (prefix, opcode) {
        (M::None, 0x00) => &GROUP_0F00,
        (M::None, 0x01) => &GROUP_0F01,
        (M::None, 0x0D) => &GROUP_0F0D,
        (M::None, 0x18) => &GROUP_0F18,
        (M::None, 0x71) => &GROUP_0F71,
        (M::None, 0x72) => &GROUP_0F72,
        (M::None, 0x73) => &GROUP_0F73,
        (M::None, 0xAE) => &GROUP_0FAE,
        (M::None, 0xBA) => &GROUP_0FBA,
        (M::None, 0xC7) => &GROUP_0FC7,
        (M::Op, 0x71) => &GROUP_660F71,
        (M::Op, 0x72) => &GROUP_660F72,
        (M::Op, 0x73) => &GROUP_660F73,
        (M::Op, 0x78) => &GROUP_660F78,
        (M::Op, 0xAE) => &GROUP_660FAE,
        (M::Op, 0xC7) => &GROUP_660FC7,
        (M::Rep | M::OpRep, 0xAE) => &GROUP_F30FAE,
        (M::Rep | M::OpRep, 0xC7) => &GROUP_F30FC7,
        _ => return None,
    };
    Some(group)
}

/// Names of the `0F 01` register forms, selected by ModRM.reg and ModRM.rm.
pub fn system_register_form(extension: u8, rm: u8) -> Option<&'static str> {
    let name = match (extension & 7, rm & 7) {
        (0, 1) => "vmcall",
        (0, 2) => "vmlaunch",
        (0, 3) => "vmresume",
        (0, 4) => "vmxoff",
        (0, 5) => "pconfig",
        (1, 0) => "monitor",
        (1, 1) => "mwait",
        (1, 2) => "clac",
        (1, 3) => "stac",
        (1, 7) => "encls",
        (2, 0) => "xgetbv",
        (2, 1) => "xsetbv",
        (2, 4) => "vmfunc",
        (2, 5) => "xend",
        (2, 6) => "xtest",
        (2, 7) => "enclu",
        (3, 0) => "vmrun",
        (3, 1) => "vmmcall",
        (3, 2) => "vmload",
        (3, 3) => "vmsave",
        (3, 4) => "stgi",
        (3, 5) => "clgi",
        (3, 6) => "skinit",
        (3, 7) => "invlpga",
        (5, 0) => "setssbsy",
        (5, 6) => "rdpkru",
        (5, 7) => "wrpkru",
        (7, 0) => "swapgs",
        (7, 1) => "rdtscp",
        (7, 2) => "monitorx",
        (7, 3) => "mwaitx",
        (7, 4) => "clzero",
        (7, 5) => "rdpru",
        _ => return None,
    };
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::x86_64::categories::{self, ByteCategory};

    #[test]
    fn test_map0_entries_match_classification() {
        for byte in 0..=255u8 {
            let category = categories::classify(0, MandatoryPrefix::None, byte);
            assert_eq!(
                MAP0[usize::from(byte)].is_some(),
                category == ByteCategory::Opcode,
                "opcode {byte:#04x}"
            );
            assert_eq!(map0_group(byte).is_some(), category == ByteCategory::Group, "group {byte:#04x}");
        }
    }

    #[test]
    fn test_alu_block() {
        let add = MAP0[0x01].unwrap();
        assert!(add.has_modrm());
        assert!(add.is_rm_first());
        assert_eq!(add.reg_class(), C::Gpr);

        let cmp_imm = MAP0[0x3D].unwrap();
        assert!(cmp_imm.has_accumulator());
        assert_eq!(cmp_imm.imm0_kind(), ImmKind::Full);
        assert_eq!(NameTable::Map0.get(cmp_imm.mnemonic_index()), Some("cmp"));
    }

    #[test]
    fn test_push_is_default_64() {
        let push = MAP0[0x50].unwrap();
        assert!(push.has_opcode_register());
        assert!(push.is_default_64());
        assert!(!push.has_modrm());
    }

    #[test]
    fn test_mov_control_register_only() {
        let mov = MAP1_NP[0x20].unwrap();
        assert!(mov.is_register_only());
        assert_eq!(mov.reg_class(), C::Control);
    }

    #[test]
    fn test_group_ff_far_forms_are_memory_only() {
        let group = map0_group(0xFF).unwrap();
        assert!(group.entry(3, false).is_some());
        assert!(group.entry(3, true).is_none());
        assert!(group.entry(7, false).is_none());
    }

    #[test]
    fn test_prefixed_group_falls_back() {
        assert!(map1_group(MandatoryPrefix::Op, 0xBA).is_none());
        let group = map1_group(MandatoryPrefix::Rep, 0xAE).unwrap();
        assert!(group.entry(0, true).is_some());
        assert!(group.entry(7, false).is_none());
    }

    #[test]
    fn test_system_register_forms() {
        assert_eq!(system_register_form(1, 0), Some("monitor"));
        assert_eq!(system_register_form(7, 1), Some("rdtscp"));
        assert_eq!(system_register_form(4, 0), None);
    }
}
