//! ModR/M and SIB byte fields.

use super::instruction::{AddressingMode, Scale};

/// ModR/M byte split into its three fields. Register numbers are the raw
/// 3-bit values; prefix extension bits are folded in by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModRm {
    pub mode: AddressingMode,
    pub reg: u8,
    pub rm: u8,
}

impl ModRm {
    pub fn parse(byte: u8) -> Self {
        Self {
            mode: AddressingMode::from_mod(byte >> 6),
            reg: (byte >> 3) & 7,
            rm: byte & 7,
        }
    }

    pub fn to_byte(self) -> u8 {
        (self.mode.mod_bits() << 6) | ((self.reg & 7) << 3) | (self.rm & 7)
    }

    pub fn is_register(self) -> bool {
        self.mode == AddressingMode::Direct
    }

    /// A SIB byte follows (memory form with rm = 100).
    pub fn needs_sib(self) -> bool {
        !self.is_register() && self.rm == 4
    }

    /// Displacement bytes following ModR/M (and SIB). `sib_base` is the low
    /// three bits of the SIB base when a SIB byte is present.
    pub fn displacement_size(self, sib_base: Option<u8>) -> usize {
        displacement_size(self.mode, sib_base.unwrap_or(self.rm))
    }
}

/// Displacement width for a memory operand given the `mod` field and the
/// low bits of the base (ModR/M.rm or SIB.base).
pub fn displacement_size(mode: AddressingMode, base_low: u8) -> usize {
    match mode {
        AddressingMode::Indirect if base_low & 7 == 5 => 4,
        AddressingMode::Indirect | AddressingMode::Direct => 0,
        AddressingMode::Disp8 => 1,
        AddressingMode::Disp32 => 4,
    }
}

/// SIB byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sib {
    pub scale: Scale,
    pub index: u8,
    pub base: u8,
}

impl Sib {
    pub fn parse(byte: u8) -> Self {
        Self {
            scale: Scale::from_bits(byte >> 6),
            index: (byte >> 3) & 7,
            base: byte & 7,
        }
    }

    pub fn to_byte(self) -> u8 {
        (self.scale.bits() << 6) | ((self.index & 7) << 3) | (self.base & 7)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modrm_parse() {
        let modrm = ModRm::parse(0xC0);
        assert!(modrm.is_register());
        assert_eq!(modrm.reg, 0);
        assert_eq!(modrm.rm, 0);

        let modrm = ModRm::parse(0x44);
        assert_eq!(modrm.mode, AddressingMode::Disp8);
        assert!(modrm.needs_sib());
        assert_eq!(modrm.to_byte(), 0x44);
    }

    #[test]
    fn test_displacement_sizes() {
        assert_eq!(ModRm::parse(0x05).displacement_size(None), 4);
        assert_eq!(ModRm::parse(0x00).displacement_size(None), 0);
        assert_eq!(ModRm::parse(0x04).displacement_size(Some(5)), 4);
        assert_eq!(ModRm::parse(0x44).displacement_size(Some(5)), 1);
        assert_eq!(ModRm::parse(0x84).displacement_size(Some(0)), 4);
        assert_eq!(ModRm::parse(0xC5).displacement_size(None), 0);
    }

    #[test]
    fn test_sib_parse() {
        let sib = Sib::parse(0x88);
        assert_eq!(sib.scale, Scale::X4);
        assert_eq!(sib.index, 1);
        assert_eq!(sib.base, 0);
        assert_eq!(sib.scale.factor(), 4);
        assert_eq!(sib.to_byte(), 0x88);
    }
}
