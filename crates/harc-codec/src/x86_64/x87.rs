//! x87 escape opcodes `D8`..`DF`.
//!
//! Memory forms are selected by ModRM.reg alone. Register forms either take
//! an `st(i)` operand from ModRM.rm or, for the fixed forms such as `fld1`,
//! are named by the whole ModRM byte.

use super::mnemonics::{Map0 as N, NameTable};
use super::opcodes::Slots;
use super::properties::{OpcodeGroup, OpcodeProperties as P, OperandClass as C};

const fn m(name: N) -> Option<P> {
    Some(P::new(name as u8).modrm(C::None, C::Mem))
}

/// `op st(i)`
const fn sti(name: N) -> Option<P> {
    Some(P::new(name as u8).modrm(C::None, C::St))
}

/// `op st, st(i)`
const fn st_sti(name: N) -> Option<P> {
    Some(P::new(name as u8).modrm(C::None, C::St).accumulator(C::St))
}

/// `op st(i), st`
const fn sti_st(name: N) -> Option<P> {
    Some(P::new(name as u8).modrm(C::None, C::St).accumulator(C::St).rm_first())
}

/// Named by the full ModRM byte, see [`fixed_register_form`].
const fn fixed() -> Option<P> {
    Some(P::new(N::X87Fixed as u8).modrm(C::None, C::None))
}

const ARITH: [N; 8] = [N::Fadd, N::Fmul, N::Fcom, N::Fcomp, N::Fsub, N::Fsubr, N::Fdiv, N::Fdivr];
const INT_ARITH: [N; 8] = [N::Fiadd, N::Fimul, N::Ficom, N::Ficomp, N::Fisub, N::Fisubr, N::Fidiv, N::Fidivr];

const fn all_memory(names: [N; 8]) -> Slots {
    [m(names[0]), m(names[1]), m(names[2]), m(names[3]), m(names[4]), m(names[5]), m(names[6]), m(names[7])]
}

pub(crate) static GROUPS: [OpcodeGroup; 8] = [
    // D8
    OpcodeGroup::split(
        NameTable::Map0,
        all_memory(ARITH),
        [
            st_sti(N::Fadd),
            st_sti(N::Fmul),
            sti(N::Fcom),
            sti(N::Fcomp),
            st_sti(N::Fsub),
            st_sti(N::Fsubr),
            st_sti(N::Fdiv),
            st_sti(N::Fdivr),
        ],
    ),
    // D9
    OpcodeGroup::split(
        NameTable::Map0,
        [m(N::Fld), None, m(N::Fst), m(N::Fstp), m(N::Fldenv), m(N::Fldcw), m(N::Fnstenv), m(N::Fnstcw)],
        [sti(N::Fld), sti(N::Fxch), fixed(), sti(N::Fstp1), fixed(), fixed(), fixed(), fixed()],
    ),
    // DA
    OpcodeGroup::split(
        NameTable::Map0,
        all_memory(INT_ARITH),
        [
            st_sti(N::Fcmovb),
            st_sti(N::Fcmove),
            st_sti(N::Fcmovbe),
            st_sti(N::Fcmovu),
            None,
            fixed(),
            None,
            None,
        ],
    ),
    // DB
    OpcodeGroup::split(
        NameTable::Map0,
        [m(N::Fild), m(N::Fisttp), m(N::Fist), m(N::Fistp), None, m(N::Fld), None, m(N::Fstp)],
        [
            st_sti(N::Fcmovnb),
            st_sti(N::Fcmovne),
            st_sti(N::Fcmovnbe),
            st_sti(N::Fcmovnu),
            fixed(),
            st_sti(N::Fucomi),
            st_sti(N::Fcomi),
            None,
        ],
    ),
    // DC
    OpcodeGroup::split(
        NameTable::Map0,
        all_memory(ARITH),
        [
            sti_st(N::Fadd),
            sti_st(N::Fmul),
            sti(N::Fcom2),
            sti(N::Fcomp3),
            sti_st(N::Fsubr),
            sti_st(N::Fsub),
            sti_st(N::Fdivr),
            sti_st(N::Fdiv),
        ],
    ),
    // DD
    OpcodeGroup::split(
        NameTable::Map0,
        [m(N::Fld), m(N::Fisttp), m(N::Fst), m(N::Fstp), m(N::Frstor), None, m(N::Fnsave), m(N::Fnstsw)],
        [sti(N::Ffree), sti(N::Fxch4), sti(N::Fst), sti(N::Fstp), sti(N::Fucom), sti(N::Fucomp), None, None],
    ),
    // DE
    OpcodeGroup::split(
        NameTable::Map0,
        all_memory(INT_ARITH),
        [
            sti_st(N::Faddp),
            sti_st(N::Fmulp),
            sti(N::Fcomp5),
            fixed(),
            sti_st(N::Fsubrp),
            sti_st(N::Fsubp),
            sti_st(N::Fdivrp),
            sti_st(N::Fdivp),
        ],
    ),
    // DF
    OpcodeGroup::split(
        NameTable::Map0,
        [m(N::Fild), m(N::Fisttp), m(N::Fist), m(N::Fistp), m(N::Fbld), m(N::Fild), m(N::Fbstp), m(N::Fistp)],
        [
            sti(N::Ffreep),
            sti(N::Fxch7),
            sti(N::Fstp8),
            sti(N::Fstp9),
            fixed(),
            st_sti(N::Fucomip),
            st_sti(N::Fcomip),
            None,
        ],
    ),
];

static D9_E0: [Option<&str>; 32] = [
    Some("fchs"),
    Some("fabs"),
    None,
    None,
    Some("ftst"),
    Some("fxam"),
    None,
    None,
    Some("fld1"),
    Some("fldl2t"),
    Some("fldl2e"),
    Some("fldpi"),
    Some("fldlg2"),
    Some("fldln2"),
    Some("fldz"),
    None,
    Some("f2xm1"),
    Some("fyl2x"),
    Some("fptan"),
    Some("fpatan"),
    Some("fxtract"),
    Some("fprem1"),
    Some("fdecstp"),
    Some("fincstp"),
    Some("fprem"),
    Some("fyl2xp1"),
    Some("fsqrt"),
    Some("fsincos"),
    Some("frndint"),
    Some("fscale"),
    Some("fsin"),
    Some("fcos"),
];

/// Name of a register form identified by its full ModRM byte.
pub fn fixed_register_form(opcode: u8, modrm: u8) -> Option<&'static str> {
    match (opcode, modrm) {
        (0xD9, 0xD0) => Some("fnop"),
        (0xD9, 0xE0..=0xFF) => D9_E0[usize::from(modrm - 0xE0)],
        (0xDA, 0xE9) => Some("fucompp"),
        (0xDB, 0xE2) => Some("fnclex"),
        (0xDB, 0xE3) => Some("fninit"),
        (0xDE, 0xD9) => Some("fcompp"),
        (0xDF, 0xE0) => Some("fnstsw"),
        _ => None,
    }
}

/// Memory operand size in bytes of an x87 memory form, when it has one.
/// Environment and state images (`fldenv`, `fnsave`) have none.
pub fn memory_size(opcode: u8, extension: u8) -> Option<u8> {
    let size = match (opcode, extension & 7) {
        (0xD8, _) => 4,
        (0xD9, 0 | 2 | 3) => 4,
        (0xD9, 5 | 7) => 2,
        (0xDA, _) => 4,
        (0xDB, 0..=3) => 4,
        (0xDB, 5 | 7) => 10,
        (0xDC, _) => 8,
        (0xDD, 0..=3) => 8,
        (0xDD, 7) => 2,
        (0xDE, _) => 2,
        (0xDF, 0..=3) => 2,
        (0xDF, 4 | 6) => 10,
        (0xDF, 5 | 7) => 8,
        _ => return None,
    };
    Some(size)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(opcode: u8, extension: u8, register_form: bool) -> Option<&'static str> {
        let group = &GROUPS[usize::from(opcode - 0xD8)];
        let props = group.entry(extension, register_form)?;
        group.names.get(props.mnemonic_index())
    }

    #[test]
    fn test_memory_and_register_forms_differ() {
        assert_eq!(name(0xDD, 0, false), Some("fld"));
        assert_eq!(name(0xDD, 0, true), Some("ffree"));
        assert_eq!(name(0xD9, 1, false), None);
        assert_eq!(name(0xD9, 1, true), Some("fxch"));
    }

    #[test]
    fn test_reversed_subtraction_in_dc() {
        // DC E0+i is fsubr st(i), st
        assert_eq!(name(0xDC, 4, true), Some("fsubr"));
        assert_eq!(name(0xDC, 4, false), Some("fsub"));
        let group = &GROUPS[4];
        assert!(group.entry(4, true).unwrap().is_rm_first());
    }

    #[test]
    fn test_fixed_forms() {
        assert_eq!(fixed_register_form(0xD9, 0xE8), Some("fld1"));
        assert_eq!(fixed_register_form(0xD9, 0xFF), Some("fcos"));
        assert_eq!(fixed_register_form(0xD9, 0xE2), None);
        assert_eq!(fixed_register_form(0xDF, 0xE0), Some("fnstsw"));
        assert_eq!(fixed_register_form(0xDA, 0xE8), None);
    }

    #[test]
    fn test_memory_sizes() {
        assert_eq!(memory_size(0xDD, 0), Some(8));
        assert_eq!(memory_size(0xDB, 5), Some(10));
        assert_eq!(memory_size(0xD9, 4), None);
        assert_eq!(memory_size(0xDF, 7), Some(8));
    }
}
