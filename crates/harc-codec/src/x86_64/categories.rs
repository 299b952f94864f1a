//! Opcode byte classification tables.
//!
//! One 256-entry table per (opcode map, mandatory prefix). Every entry is
//! written out explicitly; `Unused` is itself a classification meaning the
//! encoding has no defined instruction.

use super::prefix::MandatoryPrefix;

/// What a byte means at a given position of the decoder state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ByteCategory {
    Unused,
    Opcode,
    /// Selects a deeper opcode map (`0F`, `0F 38`, `0F 3A`).
    Escape,
    /// Segment override prefix.
    Segment,
    Rex,
    Rex2,
    Vex2,
    Vex3,
    Evex,
    /// Operand-size override (`66`).
    OpSize,
    /// Address-size override (`67`).
    AdSize,
    /// Opcode completed by the ModRM `reg` field.
    Group,
    Lock,
    Repne,
    Rep,
}

impl ByteCategory {
    /// Returns true for the legacy prefix categories.
    pub const fn is_legacy_prefix(self) -> bool {
        matches!(
            self,
            ByteCategory::Segment
                | ByteCategory::OpSize
                | ByteCategory::AdSize
                | ByteCategory::Lock
                | ByteCategory::Repne
                | ByteCategory::Rep
        )
    }

    /// Returns true for REX, REX2, VEX and EVEX headers.
    pub const fn is_rex_family(self) -> bool {
        matches!(
            self,
            ByteCategory::Rex
                | ByteCategory::Rex2
                | ByteCategory::Vex2
                | ByteCategory::Vex3
                | ByteCategory::Evex
        )
    }
}

type Table = [ByteCategory; 256];

const U: ByteCategory = ByteCategory::Unused;
const O: ByteCategory = ByteCategory::Opcode;
const E: ByteCategory = ByteCategory::Escape;
const G: ByteCategory = ByteCategory::Group;
const SG: ByteCategory = ByteCategory::Segment;
const RX: ByteCategory = ByteCategory::Rex;
const R2: ByteCategory = ByteCategory::Rex2;
const V2: ByteCategory = ByteCategory::Vex2;
const V3: ByteCategory = ByteCategory::Vex3;
const EV: ByteCategory = ByteCategory::Evex;
const OS: ByteCategory = ByteCategory::OpSize;
const AS: ByteCategory = ByteCategory::AdSize;
const LK: ByteCategory = ByteCategory::Lock;
const RN: ByteCategory = ByteCategory::Repne;
const RP: ByteCategory = ByteCategory::Rep;

/// One-byte opcode map, 64-bit mode.
#[rustfmt::skip]
pub static MAP0: Table = [
    /* 0x */ O,  O,  O,  O,  O,  O,  U,  U,  O,  O,  O,  O,  O,  O,  U,  E,
    /* 1x */ O,  O,  O,  O,  O,  O,  U,  U,  O,  O,  O,  O,  O,  O,  U,  U,
    /* 2x */ O,  O,  O,  O,  O,  O,  SG, U,  O,  O,  O,  O,  O,  O,  SG, U,
    /* 3x */ O,  O,  O,  O,  O,  O,  SG, U,  O,  O,  O,  O,  O,  O,  SG, U,
    /* 4x */ RX, RX, RX, RX, RX, RX, RX, RX, RX, RX, RX, RX, RX, RX, RX, RX,
    /* 5x */ O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,
    /* 6x */ U,  U,  EV, O,  SG, SG, OS, AS, O,  O,  O,  O,  O,  O,  O,  O,
    /* 7x */ O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,
    /* 8x */ G,  G,  U,  G,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  G,
    /* 9x */ O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  U,  O,  O,  O,  O,  O,
    /* Ax */ O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,
    /* Bx */ O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,
    /* Cx */ G,  G,  O,  O,  V3, V2, G,  G,  O,  O,  O,  O,  O,  O,  U,  O,
    /* Dx */ G,  G,  G,  G,  U,  R2, U,  O,  G,  G,  G,  G,  G,  G,  G,  G,
    /* Ex */ O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  U,  O,  O,  O,  O,  O,
    /* Fx */ LK, O,  RN, RP, O,  O,  G,  G,  O,  O,  O,  O,  O,  O,  G,  G,
];

/// Two-byte map (`0F`), no mandatory prefix.
#[rustfmt::skip]
pub static MAP1_NP: Table = [
    /* 0x */ G,  G,  O,  O,  U,  O,  O,  O,  O,  O,  U,  O,  U,  G,  U,  U,
    /* 1x */ O,  O,  O,  O,  O,  O,  O,  O,  G,  O,  O,  O,  O,  O,  O,  O,
    /* 2x */ O,  O,  O,  O,  U,  U,  U,  U,  O,  O,  O,  O,  O,  O,  O,  O,
    /* 3x */ O,  O,  O,  O,  O,  O,  U,  O,  E,  U,  E,  U,  U,  U,  U,  U,
    /* 4x */ O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,
    /* 5x */ O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,
    /* 6x */ O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  U,  U,  O,  O,
    /* 7x */ O,  G,  G,  G,  O,  O,  O,  O,  O,  O,  U,  U,  U,  U,  O,  O,
    /* 8x */ O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,
    /* 9x */ O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,
    /* Ax */ O,  O,  O,  O,  O,  O,  U,  U,  O,  O,  O,  O,  O,  O,  G,  O,
    /* Bx */ O,  O,  O,  O,  O,  O,  O,  O,  U,  O,  G,  O,  O,  O,  O,  O,
    /* Cx */ O,  O,  O,  O,  O,  O,  O,  G,  O,  O,  O,  O,  O,  O,  O,  O,
    /* Dx */ U,  O,  O,  O,  O,  O,  U,  O,  O,  O,  O,  O,  O,  O,  O,  O,
    /* Ex */ O,  O,  O,  O,  O,  O,  U,  O,  O,  O,  O,  O,  O,  O,  O,  O,
    /* Fx */ U,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,
];

/// Two-byte map (`0F`) with mandatory `66`.
#[rustfmt::skip]
pub static MAP1_66: Table = [
    /* 0x */ G,  G,  O,  O,  U,  O,  O,  O,  O,  O,  U,  O,  U,  G,  U,  U,
    /* 1x */ O,  O,  O,  O,  O,  O,  O,  O,  G,  O,  O,  O,  O,  O,  O,  O,
    /* 2x */ O,  O,  O,  O,  U,  U,  U,  U,  O,  O,  O,  O,  O,  O,  O,  O,
    /* 3x */ O,  O,  O,  O,  O,  O,  U,  O,  E,  U,  E,  U,  U,  U,  U,  U,
    /* 4x */ O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,
    /* 5x */ O,  O,  U,  U,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,
    /* 6x */ O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,
    /* 7x */ O,  G,  G,  G,  O,  O,  O,  O,  G,  O,  U,  U,  O,  O,  O,  O,
    /* 8x */ O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,
    /* 9x */ O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,
    /* Ax */ O,  O,  O,  O,  O,  O,  U,  U,  O,  O,  O,  O,  O,  O,  G,  O,
    /* Bx */ O,  O,  O,  O,  O,  O,  O,  O,  U,  O,  G,  O,  O,  O,  O,  O,
    /* Cx */ O,  O,  O,  O,  O,  O,  O,  G,  O,  O,  O,  O,  O,  O,  O,  O,
    /* Dx */ O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,
    /* Ex */ O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,
    /* Fx */ U,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,
];

/// Two-byte map (`0F`) with mandatory `F3`.
#[rustfmt::skip]
pub static MAP1_F3: Table = [
    /* 0x */ G,  G,  O,  O,  U,  O,  O,  O,  O,  O,  U,  O,  U,  G,  U,  U,
    /* 1x */ O,  O,  O,  U,  U,  U,  O,  U,  G,  O,  O,  O,  O,  O,  O,  O,
    /* 2x */ O,  O,  O,  O,  U,  U,  U,  U,  U,  U,  O,  U,  O,  O,  U,  U,
    /* 3x */ O,  O,  O,  O,  O,  O,  U,  O,  E,  U,  E,  U,  U,  U,  U,  U,
    /* 4x */ O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,
    /* 5x */ U,  O,  O,  O,  U,  U,  U,  U,  O,  O,  O,  O,  O,  O,  O,  O,
    /* 6x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  O,
    /* 7x */ O,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  O,  O,
    /* 8x */ O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,
    /* 9x */ O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,
    /* Ax */ O,  O,  O,  O,  O,  O,  U,  U,  O,  O,  O,  O,  O,  O,  G,  O,
    /* Bx */ O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  G,  O,  O,  O,  O,  O,
    /* Cx */ O,  O,  O,  U,  U,  U,  U,  G,  O,  O,  O,  O,  O,  O,  O,  O,
    /* Dx */ U,  U,  U,  U,  U,  U,  O,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* Ex */ U,  U,  U,  U,  U,  U,  O,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* Fx */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  O,
];

/// Two-byte map (`0F`) with mandatory `F2`.
#[rustfmt::skip]
pub static MAP1_F2: Table = [
    /* 0x */ G,  G,  O,  O,  U,  O,  O,  O,  O,  O,  U,  O,  U,  G,  U,  U,
    /* 1x */ O,  O,  O,  U,  U,  U,  U,  U,  G,  O,  O,  O,  O,  O,  O,  O,
    /* 2x */ O,  O,  O,  O,  U,  U,  U,  U,  U,  U,  O,  U,  O,  O,  U,  U,
    /* 3x */ O,  O,  O,  O,  O,  O,  U,  O,  E,  U,  E,  U,  U,  U,  U,  U,
    /* 4x */ O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,
    /* 5x */ U,  O,  U,  U,  U,  U,  U,  U,  O,  O,  O,  U,  O,  O,  O,  O,
    /* 6x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 7x */ O,  U,  U,  U,  U,  U,  U,  U,  O,  O,  U,  U,  O,  O,  U,  U,
    /* 8x */ O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,
    /* 9x */ O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,
    /* Ax */ O,  O,  O,  O,  O,  O,  U,  U,  O,  O,  O,  O,  O,  O,  G,  O,
    /* Bx */ O,  O,  O,  O,  O,  O,  O,  O,  U,  O,  G,  O,  O,  O,  O,  O,
    /* Cx */ O,  O,  O,  U,  U,  U,  U,  G,  O,  O,  O,  O,  O,  O,  O,  O,
    /* Dx */ O,  U,  U,  U,  U,  U,  O,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* Ex */ U,  U,  U,  U,  U,  U,  O,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* Fx */ O,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  O,
];

/// Three-byte map (`0F 38`), no mandatory prefix.
#[rustfmt::skip]
pub static MAP2_NP: Table = [
    /* 0x */ O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  U,  U,  U,  U,
    /* 1x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  O,  O,  O,  U,
    /* 2x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 3x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 4x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 5x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 6x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 7x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 8x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 9x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* Ax */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* Bx */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* Cx */ U,  U,  U,  U,  U,  U,  U,  U,  O,  O,  O,  O,  O,  O,  U,  U,
    /* Dx */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* Ex */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* Fx */ O,  O,  U,  U,  U,  U,  U,  U,  U,  O,  U,  U,  U,  U,  U,  U,
];

/// Three-byte map (`0F 38`) with mandatory `66`.
#[rustfmt::skip]
pub static MAP2_66: Table = [
    /* 0x */ O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  U,  U,  U,  U,
    /* 1x */ O,  U,  U,  U,  O,  O,  U,  O,  U,  U,  U,  U,  O,  O,  O,  U,
    /* 2x */ O,  O,  O,  O,  O,  O,  U,  U,  O,  O,  O,  O,  U,  U,  U,  U,
    /* 3x */ O,  O,  O,  O,  O,  O,  U,  O,  O,  O,  O,  O,  O,  O,  O,  O,
    /* 4x */ O,  O,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 5x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 6x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 7x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 8x */ O,  O,  O,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 9x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* Ax */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* Bx */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* Cx */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  O,
    /* Dx */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  O,  O,  O,  O,  O,
    /* Ex */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* Fx */ O,  O,  U,  U,  U,  U,  O,  U,  O,  U,  U,  U,  U,  U,  U,  U,
];

/// Three-byte map (`0F 38`) with mandatory `F3`.
#[rustfmt::skip]
pub static MAP2_F3: Table = [
    /* 0x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 1x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 2x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 3x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 4x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 5x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 6x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 7x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 8x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 9x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* Ax */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* Bx */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* Cx */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* Dx */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* Ex */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* Fx */ U,  U,  U,  U,  U,  U,  O,  U,  U,  U,  U,  U,  U,  U,  U,  U,
];

/// Three-byte map (`0F 38`) with mandatory `F2`.
#[rustfmt::skip]
pub static MAP2_F2: Table = [
    /* 0x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 1x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 2x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 3x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 4x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 5x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 6x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 7x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 8x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 9x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* Ax */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* Bx */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* Cx */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* Dx */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* Ex */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* Fx */ O,  O,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
];

/// Three-byte map (`0F 38`) with `66` and `F2` together.
#[rustfmt::skip]
pub static MAP2_66_F2: Table = [
    /* 0x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 1x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 2x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 3x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 4x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 5x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 6x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 7x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 8x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 9x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* Ax */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* Bx */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* Cx */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* Dx */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* Ex */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* Fx */ O,  O,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
];

/// Three-byte map (`0F 38`) with `66` and `F3` together: no defined encodings.
pub static MAP2_66_F3: Table = [U; 256];

/// Three-byte map (`0F 3A`), no mandatory prefix.
#[rustfmt::skip]
pub static MAP3_NP: Table = [
    /* 0x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  O,
    /* 1x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 2x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 3x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 4x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 5x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 6x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 7x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 8x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 9x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* Ax */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* Bx */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* Cx */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  O,  U,  U,  U,
    /* Dx */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* Ex */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* Fx */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
];

/// Three-byte map (`0F 3A`) with mandatory `66`.
#[rustfmt::skip]
pub static MAP3_66: Table = [
    /* 0x */ U,  U,  U,  U,  U,  U,  U,  U,  O,  O,  O,  O,  O,  O,  O,  O,
    /* 1x */ U,  U,  U,  U,  O,  O,  O,  O,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 2x */ O,  O,  O,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 3x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 4x */ O,  O,  O,  U,  O,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 5x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 6x */ O,  O,  O,  O,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 7x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 8x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 9x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* Ax */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* Bx */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* Cx */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  O,  O,
    /* Dx */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  O,
    /* Ex */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* Fx */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
];

/// Three-byte map (`0F 3A`) with mandatory `F3`.
#[rustfmt::skip]
pub static MAP3_F3: Table = [
    /* 0x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 1x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 2x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 3x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 4x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 5x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 6x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 7x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 8x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 9x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* Ax */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* Bx */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* Cx */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* Dx */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* Ex */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* Fx */ O,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
];

/// Three-byte map (`0F 3A`) with mandatory `F2`: no defined legacy encodings.
pub static MAP3_F2: Table = [U; 256];

/// VEX/EVEX map 1. The `pp` field selects the instruction, not the structure.
#[rustfmt::skip]
pub static VEX_MAP1: Table = [
    /* 0x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 1x */ O,  O,  O,  O,  O,  O,  O,  O,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 2x */ U,  U,  U,  U,  U,  U,  U,  U,  O,  O,  O,  O,  O,  O,  O,  O,
    /* 3x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 4x */ U,  O,  O,  U,  O,  O,  O,  O,  U,  U,  O,  O,  U,  U,  U,  U,
    /* 5x */ O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,
    /* 6x */ O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,
    /* 7x */ O,  G,  G,  G,  O,  O,  O,  O,  U,  U,  U,  U,  O,  O,  O,  O,
    /* 8x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 9x */ O,  O,  O,  O,  U,  U,  U,  U,  O,  O,  U,  U,  U,  U,  U,  U,
    /* Ax */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  G,  U,
    /* Bx */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* Cx */ U,  U,  O,  U,  O,  O,  O,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* Dx */ O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,
    /* Ex */ O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,
    /* Fx */ O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  U,
];

/// VEX/EVEX map 2.
#[rustfmt::skip]
pub static VEX_MAP2: Table = [
    /* 0x */ O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,
    /* 1x */ U,  U,  U,  O,  U,  U,  O,  O,  O,  O,  O,  U,  O,  O,  O,  U,
    /* 2x */ O,  O,  O,  O,  O,  O,  U,  U,  O,  O,  O,  O,  O,  O,  O,  O,
    /* 3x */ O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,
    /* 4x */ O,  O,  U,  U,  U,  O,  O,  O,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 5x */ U,  U,  U,  U,  U,  U,  U,  U,  O,  O,  O,  U,  U,  U,  U,  U,
    /* 6x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 7x */ U,  U,  U,  U,  U,  U,  U,  U,  O,  O,  U,  U,  U,  U,  U,  U,
    /* 8x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  O,  U,  O,  U,
    /* 9x */ O,  O,  O,  O,  U,  U,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,
    /* Ax */ U,  U,  U,  U,  U,  U,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,
    /* Bx */ U,  U,  U,  U,  U,  U,  O,  O,  O,  O,  O,  O,  O,  O,  O,  O,
    /* Cx */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  O,
    /* Dx */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  O,  O,  O,  O,  O,
    /* Ex */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* Fx */ U,  U,  O,  G,  U,  O,  O,  O,  U,  U,  U,  U,  U,  U,  U,  U,
];

/// VEX/EVEX map 3.
#[rustfmt::skip]
pub static VEX_MAP3: Table = [
    /* 0x */ O,  O,  O,  U,  O,  O,  O,  U,  O,  O,  O,  O,  O,  O,  O,  O,
    /* 1x */ U,  U,  U,  U,  O,  O,  O,  O,  O,  O,  U,  U,  U,  O,  U,  U,
    /* 2x */ O,  O,  O,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 3x */ O,  O,  O,  O,  U,  U,  U,  U,  O,  O,  U,  U,  U,  U,  U,  U,
    /* 4x */ O,  O,  O,  U,  O,  U,  O,  U,  U,  U,  O,  O,  O,  U,  U,  U,
    /* 5x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 6x */ O,  O,  O,  O,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 7x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 8x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* 9x */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* Ax */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* Bx */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* Cx */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  O,  O,
    /* Dx */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  O,
    /* Ex */ U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
    /* Fx */ O,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,  U,
];

/// Selects the legacy classification table for an opcode map and mandatory prefix.
///
/// Map 0 ignores the mandatory prefix. The combined `66`+`F2`/`F3` contexts
/// only exist in map 2; elsewhere the group-1 prefix alone selects the table.
pub fn legacy_table(map: u8, prefix: MandatoryPrefix) -> Option<&'static [ByteCategory; 256]> {
    use MandatoryPrefix as P;

    let table = match (map, prefix) {
        (0, _) => &MAP0,
        (1, P::None) => &MAP1_NP,
        (1, P::Op) => &MAP1_66,
        (1, P::Rep | P::OpRep) => &MAP1_F3,
        (1, P::Repne | P::OpRepne) => &MAP1_F2,
        (2, P::None) => &MAP2_NP,
        (2, P::Op) => &MAP2_66,
        (2, P::Rep) => &MAP2_F3,
        (2, P::Repne) => &MAP2_F2,
        (2, P::OpRep) => &MAP2_66_F3,
        (2, P::OpRepne) => &MAP2_66_F2,
        (3, P::None) => &MAP3_NP,
        (3, P::Op) => &MAP3_66,
        (3, P::Rep | P::OpRep) => &MAP3_F3,
        (3, P::Repne | P::OpRepne) => &MAP3_F2,
        _ => return None,
    };
    Some(table)
}

/// Selects the VEX/EVEX classification table for an opcode map.
pub fn vex_table(map: u8) -> Option<&'static [ByteCategory; 256]> {
    match map {
        1 => Some(&VEX_MAP1),
        2 => Some(&VEX_MAP2),
        3 => Some(&VEX_MAP3),
        _ => None,
    }
}

/// Classifies a byte in a legacy opcode map.
pub fn classify(map: u8, prefix: MandatoryPrefix, byte: u8) -> ByteCategory {
    legacy_table(map, prefix).map_or(ByteCategory::Unused, |table| table[usize::from(byte)])
}

/// Classifies an opcode byte in a VEX/EVEX opcode map.
pub fn classify_vex(map: u8, byte: u8) -> ByteCategory {
    vex_table(map).map_or(ByteCategory::Unused, |table| table[usize::from(byte)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map0_prefix_bytes() {
        assert_eq!(MAP0[0xF0], ByteCategory::Lock);
        assert_eq!(MAP0[0xF2], ByteCategory::Repne);
        assert_eq!(MAP0[0xF3], ByteCategory::Rep);
        assert_eq!(MAP0[0x66], ByteCategory::OpSize);
        assert_eq!(MAP0[0x67], ByteCategory::AdSize);
        assert_eq!(MAP0[0xC4], ByteCategory::Vex3);
        assert_eq!(MAP0[0xC5], ByteCategory::Vex2);
        assert_eq!(MAP0[0x62], ByteCategory::Evex);
        assert_eq!(MAP0[0xD5], ByteCategory::Rex2);
        assert_eq!(MAP0[0x0F], ByteCategory::Escape);
        for byte in 0x40..=0x4F {
            assert_eq!(MAP0[byte], ByteCategory::Rex);
        }
        for byte in [0x26, 0x2E, 0x36, 0x3E, 0x64, 0x65] {
            assert_eq!(MAP0[byte], ByteCategory::Segment);
        }
    }

    #[test]
    fn test_invalid_64bit_opcodes_are_unused() {
        for byte in [
            0x06, 0x07, 0x0E, 0x16, 0x17, 0x1E, 0x1F, 0x27, 0x2F, 0x37, 0x3F, 0x60, 0x61, 0x82,
            0x9A, 0xCE, 0xD4, 0xD6, 0xEA,
        ] {
            assert_eq!(MAP0[byte], ByteCategory::Unused, "{byte:#04x}");
        }
    }

    #[test]
    fn test_mandatory_prefix_changes_classification() {
        assert_eq!(classify(1, MandatoryPrefix::None, 0xB8), ByteCategory::Unused);
        assert_eq!(classify(1, MandatoryPrefix::Rep, 0xB8), ByteCategory::Opcode);
        assert_eq!(classify(1, MandatoryPrefix::None, 0x78), ByteCategory::Opcode);
        assert_eq!(classify(1, MandatoryPrefix::Op, 0x78), ByteCategory::Group);
        assert_eq!(classify(1, MandatoryPrefix::Repne, 0xF0), ByteCategory::Opcode);
        assert_eq!(classify(1, MandatoryPrefix::None, 0xF0), ByteCategory::Unused);
        assert_eq!(classify(2, MandatoryPrefix::OpRepne, 0xF1), ByteCategory::Opcode);
        assert_eq!(classify(2, MandatoryPrefix::OpRep, 0xF1), ByteCategory::Unused);
        assert_eq!(classify(3, MandatoryPrefix::Rep, 0xF0), ByteCategory::Opcode);
        assert_eq!(classify(4, MandatoryPrefix::None, 0x00), ByteCategory::Unused);
    }

    #[test]
    fn test_escapes_only_in_map1() {
        assert_eq!(classify(1, MandatoryPrefix::None, 0x38), ByteCategory::Escape);
        assert_eq!(classify(1, MandatoryPrefix::Op, 0x3A), ByteCategory::Escape);
        for map in 2..=3 {
            for prefix in MandatoryPrefix::ALL {
                let table = legacy_table(map, prefix).unwrap();
                assert!(table.iter().all(|c| *c != ByteCategory::Escape));
            }
        }
        for map in 1..=3 {
            let table = vex_table(map).unwrap();
            assert!(table
                .iter()
                .all(|c| matches!(c, ByteCategory::Opcode | ByteCategory::Group | ByteCategory::Unused)));
        }
    }
}
