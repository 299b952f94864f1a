//! Intel and AT&T assembly printer.
//!
//! Printing happens in two steps. The instruction is first lowered to a
//! mnemonic and a list of operands in Intel order; the operands are then
//! rendered for the configured syntax. AT&T reverses the operand list, adds
//! sigils and size suffixes, and writes memory operands as
//! `seg:disp(base,index,scale)`.

use std::fmt;

use harc_core::{AssemblySyntax, RegCategory, Register, SegmentReg};

use super::decoder::Decoded;
use super::encoder;
use super::instruction::{AddressingMode, Instruction, LegacyPrefix1, RoundingMode};
use super::mnemonics::NameTable;
use super::opcodes;
use super::prefix::PrefixInfo;
use super::properties::{OpcodeInfo, OperandClass, VvvvClass};
use super::x87;

const CONDITIONS: [&str; 16] = [
    "o", "no", "b", "ae", "e", "ne", "be", "a", "s", "ns", "p", "np", "l", "ge", "le", "g",
];

/// Printer settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FormatterConfig {
    pub syntax: AssemblySyntax,
    /// Address of the instruction. Relative branch targets print as absolute
    /// addresses when set and as `$+N` otherwise.
    pub address: Option<u64>,
    pub uppercase: bool,
}

impl FormatterConfig {
    pub fn new(syntax: AssemblySyntax) -> Self {
        Self { syntax, ..Self::default() }
    }

    pub fn with_syntax(mut self, syntax: AssemblySyntax) -> Self {
        self.syntax = syntax;
        self
    }

    pub fn with_address(mut self, address: u64) -> Self {
        self.address = Some(address);
        self
    }

    pub fn with_uppercase(mut self, uppercase: bool) -> Self {
        self.uppercase = uppercase;
        self
    }
}

/// Renders an instruction as assembly text.
///
/// Relative branch targets are measured from the end of the canonical
/// encoding. Use [`format_decoded`] to measure them from the bytes that were
/// actually decoded, which may carry redundant prefixes.
pub fn format(insn: &Instruction, config: &FormatterConfig) -> String {
    render(insn, None, config)
}

/// Renders a decoded instruction, resolving branch targets against its
/// decoded length.
pub fn format_decoded(decoded: &Decoded, config: &FormatterConfig) -> String {
    render(&decoded.instruction, Some(decoded.size), config)
}

fn render(insn: &Instruction, length: Option<usize>, config: &FormatterConfig) -> String {
    let text = Printer { insn, length, config }.render();
    if config.uppercase {
        text.to_uppercase().replace("0X", "0x")
    } else {
        text
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format(self, &FormatterConfig::default()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operand {
    Register(Register),
    Immediate { value: i64, bytes: usize, signed: bool },
    /// Branch target as an offset from the start of the instruction.
    Target(i64),
    Memory(Memory),
    /// The `dx` port operand of `in` and `out`.
    Port,
    Rounding(RoundingMode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Memory {
    segment: Option<&'static str>,
    base: Option<&'static str>,
    index: Option<&'static str>,
    scale: u8,
    displacement: i64,
    /// Bytes accessed, when known.
    size: Option<u16>,
    /// Element count of an EVEX embedded broadcast.
    broadcast: Option<u16>,
}

struct Printer<'a> {
    insn: &'a Instruction,
    /// Length of the bytes the instruction was decoded from, when known.
    length: Option<usize>,
    config: &'a FormatterConfig,
}

impl Printer<'_> {
    fn att(&self) -> bool {
        self.config.syntax == AssemblySyntax::Att
    }

    fn render(&self) -> String {
        let Some(info) = self.insn.info() else {
            return "(bad)".to_string();
        };
        let mnemonic = self.mnemonic(&info);
        if mnemonic == "(bad)" {
            return mnemonic;
        }
        let operands = self.operands(&info, &mnemonic);

        let mut text = String::new();
        if let Some(prefix) = self.prefix(&mnemonic) {
            text.push_str(prefix);
            text.push(' ');
        }
        if self.att() {
            text.push_str(&self.att_mnemonic(&info, &mnemonic, &operands));
        } else {
            text.push_str(&mnemonic);
        }

        let mut rendered: Vec<String> = operands
            .iter()
            .map(|op| if self.att() { att_operand(op, self) } else { intel_operand(op, self) })
            .collect();

        if let Some(first) = rendered.first_mut() {
            if let Some(mask) = self.insn.mask_register() {
                if self.att() {
                    first.push_str(&format!("{{%{}}}", mask.name()));
                } else {
                    first.push_str(&format!("{{{}}}", mask.name()));
                }
            }
            if self.insn.page() == PrefixInfo::Evex && self.insn.zeroing() {
                first.push_str("{z}");
            }
        }

        if self.att() && is_indirect_branch(&info, &mnemonic) {
            if let Some(target) = rendered.first_mut() {
                target.insert(0, '*');
            }
        }

        let immediates_only = operands
            .iter()
            .all(|op| matches!(op, Operand::Immediate { .. }));
        if self.att() && !immediates_only {
            rendered.reverse();
        }

        if !rendered.is_empty() {
            text.push(' ');
            text.push_str(&rendered.join(if self.att() { "," } else { ", " }));
        }
        text
    }

    fn prefix(&self, mnemonic: &str) -> Option<&'static str> {
        let repeatable = ["movs", "stos", "lods", "ins", "outs"];
        let comparing = ["cmps", "scas"];
        let string_op = |names: &[&str]| {
            self.insn.opcode_map() == 0
                && !self.insn.has_modrm()
                && names.iter().any(|name| mnemonic.starts_with(name))
        };
        match self.insn.lock_rep() {
            LegacyPrefix1::Lock => Some("lock"),
            LegacyPrefix1::Rep if string_op(&repeatable[..]) => Some("rep"),
            LegacyPrefix1::Rep if string_op(&comparing[..]) => Some("repe"),
            LegacyPrefix1::Repne if string_op(&comparing[..]) => Some("repne"),
            _ => None,
        }
    }

    fn mnemonic(&self, info: &OpcodeInfo) -> String {
        let insn = self.insn;
        let props = info.properties;
        let base = info.base_mnemonic();
        let opcode = insn.opcode();
        let width = insn.operand_width_bits(props);

        let name: String = match (info.name_table(), base) {
            (NameTable::Map0, "(bad)") => {
                let modrm = 0xC0 | (insn.opcode_extension() << 3) | (insn.b_reg() & 7);
                x87::fixed_register_form(opcode, modrm).unwrap_or("(bad)").to_string()
            }
            (NameTable::Map1Group, "(bad)") => {
                opcodes::system_register_form(insn.opcode_extension(), insn.b_reg())
                    .unwrap_or("(bad)")
                    .to_string()
            }
            (NameTable::Map0, "cwde") => match width {
                16 => "cbw",
                64 => "cdqe",
                _ => "cwde",
            }
            .to_string(),
            (NameTable::Map0, "cdq") => match width {
                16 => "cwd",
                64 => "cqo",
                _ => "cdq",
            }
            .to_string(),
            (NameTable::Map0, "xchg")
                if opcode == 0x90 && insn.b_reg() == 0 && !insn.operand_size_override() =>
            {
                (if insn.lock_rep() == LegacyPrefix1::Rep { "pause" } else { "nop" }).to_string()
            }
            (NameTable::Map0, "jrcxz") if insn.address_size_override() => "jecxz".to_string(),
            (NameTable::Map0, "movs" | "cmps" | "stos" | "lods" | "scas" | "ins" | "outs") => {
                format!("{base}{}", self.string_suffix(base, width))
            }
            (NameTable::Map1, "nop")
                if opcode == 0x1E
                    && insn.lock_rep() == LegacyPrefix1::Rep
                    && insn.is_register_form()
                    && insn.opcode_extension() == 7
                    && matches!(insn.b_reg() & 7, 2 | 3) =>
            {
                (if insn.b_reg() & 7 == 2 { "endbr64" } else { "endbr32" }).to_string()
            }
            (NameTable::Map1, "movlps") if insn.is_register_form() => "movhlps".to_string(),
            (NameTable::Map1, "movhps") if insn.is_register_form() => "movlhps".to_string(),
            (NameTable::Map1 | NameTable::Map1Op, "movd") if insn.w() => "movq".to_string(),
            (NameTable::Map1Group, "cmpxchg8b") if insn.w() => "cmpxchg16b".to_string(),
            (NameTable::Map3, "pextrd") if insn.w() => "pextrq".to_string(),
            (NameTable::Map3, "pinsrd") if insn.w() => "pinsrq".to_string(),
            (NameTable::VexMap1, "vzeroupper") if insn.vector_length() == 1 => "vzeroall".to_string(),
            (NameTable::VexMap1, "kunpck") => {
                let suffix = match (insn.vector_fields().pp(), insn.w()) {
                    (0, false) => "wd",
                    (0, true) => "dq",
                    _ => "bw",
                };
                format!("{base}{suffix}")
            }
            (NameTable::VexMap1, _) if base.starts_with('k') => {
                format!("{base}{}", self.mask_suffix().unwrap_or('w'))
            }
            (NameTable::VexMap3, "kshiftr" | "kshiftl") => {
                let suffix = match (opcode & 1, insn.w()) {
                    (0, false) => 'b',
                    (0, true) => 'w',
                    (_, false) => 'd',
                    (_, true) => 'q',
                };
                format!("{base}{suffix}")
            }
            (NameTable::VexMap2, _) if is_fma_family(base) => {
                format!("{base}{}", if insn.w() { 'd' } else { 's' })
            }
            (NameTable::VexMap2, "vpsrlvd" | "vpsravd" | "vpsllvd" | "vpmaskmovd" | "vpgatherdd" | "vpgatherqd")
                if insn.w() =>
            {
                format!("{}q", &base[..base.len() - 1])
            }
            (NameTable::VexMap2, "vgatherdps" | "vgatherqps") if insn.w() => {
                format!("{}pd", &base[..base.len() - 2])
            }
            (_, name) if name.ends_with("cc") => {
                format!("{}{}", &name[..name.len() - 2], CONDITIONS[usize::from(opcode & 0xF)])
            }
            (_, name) => name.to_string(),
        };

        let name = if info.needs_v_prefix() { format!("v{name}") } else { name };
        if insn.page() == PrefixInfo::Evex {
            if let Some(renamed) = evex_element_name(&name, insn.w()) {
                return renamed;
            }
        }
        name
    }

    /// `b`, `w`, `d`/`l` or `q` for a string instruction.
    fn string_suffix(&self, base: &str, width: u16) -> &'static str {
        if self.insn.opcode() & 1 == 0 {
            return "b";
        }
        let dword = if self.att() { "l" } else { "d" };
        match width {
            16 => "w",
            64 if base != "ins" && base != "outs" => "q",
            _ => dword,
        }
    }

    /// Operand size letter of a mask instruction, from `pp` and W.
    fn mask_suffix(&self) -> Option<char> {
        match (self.insn.vector_fields().pp(), self.insn.w()) {
            (0, false) => Some('w'),
            (0, true) => Some('q'),
            (1, false) => Some('b'),
            (1, true) => Some('d'),
            (3, false) => Some('d'),
            (3, true) => Some('q'),
            _ => None,
        }
    }

    fn operands(&self, info: &OpcodeInfo, mnemonic: &str) -> Vec<Operand> {
        let insn = self.insn;
        let props = info.properties;
        let mut ops = Vec::new();
        let mut trailing_accumulator = None;

        if (!props.has_modrm() && matches!(mnemonic, "nop" | "pause")) || mnemonic.starts_with("endbr") {
            return ops;
        }

        if insn.uses_vsib() && !insn.is_register_form() {
            self.gather_operands(info, mnemonic, &mut ops);
        } else if props.has_modrm() {
            let reg = (props.reg_class() != OperandClass::None)
                .then(|| Operand::Register(insn.r_register()));
            let vvvv = (insn.page().is_vector() && props.vvvv_class() != VvvvClass::None)
                .then(|| Operand::Register(insn.vvvv_register()));
            let rm = self.rm_operand(info, mnemonic);
            if props.is_rm_first() {
                ops.extend([rm, vvvv, reg].into_iter().flatten());
            } else {
                ops.extend([reg, vvvv, rm].into_iter().flatten());
            }
            if props.has_accumulator() {
                let accumulator = Operand::Register(self.accumulator());
                if props.is_rm_first() {
                    ops.push(accumulator);
                } else {
                    ops.insert(0, accumulator);
                }
            }
        } else {
            if props.has_opcode_register() {
                ops.push(Operand::Register(insn.b_register()));
            }
            if props.is_moffs() {
                let accumulator = Operand::Register(self.accumulator());
                let memory = Operand::Memory(self.moffs(info, mnemonic));
                if props.is_rm_first() {
                    ops.extend([memory, accumulator]);
                } else {
                    ops.extend([accumulator, memory]);
                }
            } else if props.has_accumulator() {
                let accumulator = Operand::Register(self.accumulator());
                if props.is_rm_first() {
                    trailing_accumulator = Some(accumulator);
                } else {
                    ops.push(accumulator);
                }
            }
        }

        if let Some(value) = insn.imm0() {
            if props.is_relative() {
                ops.push(Operand::Target(value));
            } else {
                let bytes = insn.interface().imm0_size().bytes();
                let signed = bytes * 8 < usize::from(self.destination_width(&ops, info));
                ops.push(Operand::Immediate { value, bytes, signed });
            }
        }
        if let Some(value) = insn.imm1() {
            ops.push(Operand::Immediate { value: i64::from(value), bytes: 1, signed: false });
        }
        ops.extend(trailing_accumulator);

        self.implicit_operands(info, mnemonic, &mut ops);

        let rounding = insn.rounding_mode();
        if rounding != RoundingMode::Current {
            ops.push(Operand::Rounding(rounding));
        }
        ops
    }

    /// `dest, [vsib], mask`, with the mask in `vvvv`.
    fn gather_operands(&self, info: &OpcodeInfo, mnemonic: &str, ops: &mut Vec<Operand>) {
        let insn = self.insn;
        let category = RegCategory::vector_for_width(insn.vsib_data_width_bits());
        ops.extend([
            Operand::Register(Register::from_encoding(category, insn.r_reg())),
            Operand::Memory(self.memory(info, mnemonic)),
            Operand::Register(Register::from_encoding(category, insn.d_reg())),
        ]);
    }

    /// Operands the encoding implies but does not name.
    fn implicit_operands(&self, info: &OpcodeInfo, mnemonic: &str, ops: &mut Vec<Operand>) {
        let insn = self.insn;
        let opcode = insn.opcode();
        let cl = Operand::Register(Register::from_encoding(RegCategory::Gp8Lo, 1));
        let xmm0 = Operand::Register(Register::from_encoding(RegCategory::Xmm, 0));

        match (info.name_table(), opcode) {
            (NameTable::Map0, 0xD0 | 0xD1) => ops.push(Operand::Immediate { value: 1, bytes: 1, signed: false }),
            (NameTable::Map0, 0xD2 | 0xD3) => ops.push(cl),
            (NameTable::Map0, 0xEC | 0xED) => ops.push(Operand::Port),
            (NameTable::Map0, 0xEE | 0xEF) => ops.insert(0, Operand::Port),
            (NameTable::Map0, 0xDF) if mnemonic == "fnstsw" => {
                ops.push(Operand::Register(Register::from_encoding(RegCategory::Gp16, 0)));
            }
            (NameTable::Map1, 0xA5 | 0xAD) => ops.push(cl),
            (NameTable::Map1, 0xA0 | 0xA1 | 0xA8 | 0xA9) => {
                let segment = if opcode < 0xA8 { SegmentReg::Fs } else { SegmentReg::Gs };
                ops.push(Operand::Register(Register::new(RegCategory::Segment, segment.index())));
            }
            (NameTable::Map2, 0x10 | 0x14 | 0x15 | 0xCB) if !insn.page().is_vector() => ops.push(xmm0),
            (NameTable::VexMap3, 0x4A..=0x4C) => {
                // The fourth register is carried in imm8[7:4].
                if let Some(Operand::Immediate { value, .. }) = ops.pop() {
                    let category = RegCategory::vector_for_width(insn.vector_width_bits());
                    ops.push(Operand::Register(Register::from_encoding(category, (value as u8) >> 4)));
                }
            }
            (NameTable::VexMap2, 0xF5 | 0xF7) if matches!(mnemonic, "bzhi" | "bextr" | "shlx" | "sarx" | "shrx") => {
                // vvvv is the last operand of these forms.
                if ops.len() == 3 {
                    ops.swap(1, 2);
                }
            }
            _ => {}
        }
    }

    /// Register number 0 of the r/m category: `al`/`ax`/`eax`/`rax`, `st(0)`.
    fn accumulator(&self) -> Register {
        let insn = self.insn;
        let mut category = insn.interface().b_category();
        if category == RegCategory::Gp8Hi {
            category = RegCategory::Gp8Lo;
        }
        let port_io = insn.opcode_map() == 0 && matches!(insn.opcode(), 0xE5 | 0xE7 | 0xED | 0xEF);
        if port_io && insn.operand_size_override() {
            category = RegCategory::Gp16;
        }
        Register::from_encoding(category, 0)
    }

    fn rm_operand(&self, info: &OpcodeInfo, mnemonic: &str) -> Option<Operand> {
        let props = info.properties;
        if props.rm_class() == OperandClass::None {
            return None;
        }
        if self.insn.is_register_form() || props.is_register_only() {
            Some(Operand::Register(self.insn.b_register()))
        } else {
            Some(Operand::Memory(self.memory(info, mnemonic)))
        }
    }

    fn segment(&self) -> Option<&'static str> {
        let segment = self.insn.segment_override().segment();
        (segment != SegmentReg::Null).then(|| segment.name())
    }

    fn memory(&self, info: &OpcodeInfo, mnemonic: &str) -> Memory {
        let insn = self.insn;
        let broadcast = (insn.page() == PrefixInfo::Evex && insn.broadcast()).then(|| {
            let element = if insn.w() { 64 } else { 32 };
            insn.vector_width_bits() / element
        });
        let size = if broadcast.is_some() {
            Some(if insn.w() { 8 } else { 4 })
        } else {
            self.memory_size(info, mnemonic)
        };

        let base = if insn.is_rip_relative() {
            Some(if insn.address_size_override() { "eip" } else { "rip" })
        } else {
            let base = insn.b_register();
            (!base.is_null()).then(|| base.name())
        };
        let index = insn.index_register();

        let mut displacement = i64::from(insn.displacement());
        if insn.page() == PrefixInfo::Evex && insn.addressing_mode() == AddressingMode::Disp8 {
            // EVEX disp8 is scaled by the memory access size.
            displacement *= i64::from(size.unwrap_or(1));
        }

        Memory {
            segment: self.segment(),
            base,
            index: (!index.is_null()).then(|| index.name()),
            scale: insn.scale().factor(),
            displacement,
            size,
            broadcast,
        }
    }

    fn moffs(&self, info: &OpcodeInfo, mnemonic: &str) -> Memory {
        Memory {
            segment: self.segment(),
            base: None,
            index: None,
            scale: 1,
            displacement: self.insn.offset() as i64,
            size: self.memory_size(info, mnemonic),
            broadcast: None,
        }
    }

    /// Bytes read or written by the memory operand.
    fn memory_size(&self, info: &OpcodeInfo, mnemonic: &str) -> Option<u16> {
        let insn = self.insn;
        let props = info.properties;
        if info.name_table() == NameTable::Map0 && (0xD8..=0xDF).contains(&insn.opcode()) {
            return x87::memory_size(insn.opcode(), insn.opcode_extension()).map(u16::from);
        }
        if insn.uses_vsib() {
            // One gathered element.
            return Some(if insn.w() { 8 } else { 4 });
        }
        match mnemonic {
            "cmpxchg8b" => return Some(8),
            "cmpxchg16b" => return Some(16),
            "movbe" => return Some(insn.operand_width_bits(props) / 8),
            _ => {}
        }
        match props.rm_class() {
            OperandClass::Gpr => Some(insn.operand_width_bits(props) / 8),
            OperandClass::Gpr8 => Some(1),
            OperandClass::Gpr16 => Some(2),
            OperandClass::Gpr32 => Some(4),
            OperandClass::Gpr64 | OperandClass::Mmx => Some(8),
            OperandClass::GprW => Some(if insn.w() { 8 } else { 4 }),
            OperandClass::Xmm => Some(scalar_size(mnemonic).unwrap_or(16)),
            OperandClass::Vector => {
                Some(scalar_size(mnemonic).unwrap_or(insn.vector_width_bits() / 8))
            }
            OperandClass::Mask => self.mask_suffix().map(|suffix| match suffix {
                'b' => 1,
                'w' => 2,
                'd' => 4,
                _ => 8,
            }),
            _ if props.is_moffs() => Some(insn.operand_width_bits(props) / 8),
            _ => None,
        }
    }

    /// Width in bits of the operand an immediate is combined with.
    fn destination_width(&self, ops: &[Operand], info: &OpcodeInfo) -> u16 {
        let gpr_memory = matches!(
            info.properties.rm_class(),
            OperandClass::Gpr
                | OperandClass::Gpr8
                | OperandClass::Gpr16
                | OperandClass::Gpr32
                | OperandClass::Gpr64
                | OperandClass::GprW
        );
        match ops.first() {
            Some(Operand::Register(reg)) if reg.category().is_gpr() => reg.width(),
            Some(Operand::Memory(memory)) if gpr_memory => memory.size.map_or(0, |size| size * 8),
            None if info.properties.is_default_64() => 64,
            _ => 0,
        }
    }

    fn att_mnemonic(&self, info: &OpcodeInfo, mnemonic: &str, ops: &[Operand]) -> String {
        let insn = self.insn;
        let renamed = match mnemonic {
            "cbw" => "cbtw",
            "cwde" => "cwtl",
            "cdqe" => "cltq",
            "cwd" => "cwtd",
            "cdq" => "cltd",
            "cqo" => "cqto",
            "movsxd" if insn.w() => "movslq",
            "movzx" | "movsx" => {
                let source = if insn.opcode() & 1 == 0 { 'b' } else { 'w' };
                let destination = size_letter(insn.operand_width_bits(info.properties) / 8);
                return format!("{}{source}{}", &mnemonic[..4], destination.unwrap_or('l'));
            }
            _ => mnemonic,
        };

        let memory_size = ops.iter().find_map(|op| match op {
            Operand::Memory(memory) => memory.size,
            _ => None,
        });
        let Some(size) = memory_size else {
            return renamed.to_string();
        };
        if info.name_table() == NameTable::Map0 && (0xD8..=0xDF).contains(&insn.opcode()) {
            return match x87_suffix(renamed, size) {
                Some(suffix) => format!("{renamed}{suffix}"),
                None => renamed.to_string(),
            };
        }

        // Implicit operands such as the `cl` shift count do not size the access.
        let props = info.properties;
        let named_register = props.reg_class() != OperandClass::None
            || (insn.page().is_vector() && props.vvvv_class() != VvvvClass::None)
            || props.has_accumulator()
            || props.has_opcode_register();
        let gpr_class = matches!(
            props.rm_class(),
            OperandClass::Gpr
                | OperandClass::Gpr8
                | OperandClass::Gpr16
                | OperandClass::Gpr32
                | OperandClass::Gpr64
                | OperandClass::GprW
        );
        let suffix = if !named_register
            && gpr_class
            && !renamed.starts_with("set")
            && !is_indirect_branch(info, mnemonic)
        {
            size_letter(size)
        } else {
            None
        };
        match suffix {
            Some(letter) => format!("{renamed}{letter}"),
            None => renamed.to_string(),
        }
    }

    /// Relative target text: absolute with a known address, `$+N` otherwise.
    fn target(&self, offset: i64) -> String {
        let length = self
            .length
            .or_else(|| encoder::encoded_length(self.insn).ok())
            .unwrap_or(0) as i64;
        let distance = length.wrapping_add(offset);
        match self.config.address {
            Some(address) => format!("{:#x}", address.wrapping_add(distance as u64)),
            None => {
                let here = if self.att() { "." } else { "$" };
                if distance < 0 {
                    format!("{here}-{:#x}", distance.unsigned_abs())
                } else {
                    format!("{here}+{distance:#x}")
                }
            }
        }
    }
}

fn is_fma_family(name: &str) -> bool {
    let bytes = name.as_bytes();
    name.starts_with("vf")
        && bytes.len() > 2
        && matches!(bytes[bytes.len() - 1], b'p' | b's')
        && bytes[bytes.len() - 2].is_ascii_digit()
}

/// AVX-512 spells out the element size that VEX integer operations leave
/// implicit; EVEX.W selects it.
fn evex_element_name(name: &str, w: bool) -> Option<String> {
    let element = if w { 'q' } else { 'd' };
    let renamed = match name {
        "vpand" | "vpandn" | "vpor" | "vpxor" => format!("{name}{element}"),
        "vmovdqa" => format!("vmovdqa{}", if w { 64 } else { 32 }),
        "vmovdqu" => format!("vmovdqu{}", if w { 64 } else { 32 }),
        "vpmulld" if w => "vpmullq".to_string(),
        "vpminsd" | "vpmaxsd" | "vpminud" | "vpmaxud" | "vpsrad" if w => {
            format!("{}q", &name[..name.len() - 1])
        }
        _ => return None,
    };
    Some(renamed)
}

fn is_indirect_branch(info: &OpcodeInfo, mnemonic: &str) -> bool {
    info.properties.has_modrm() && matches!(mnemonic, "call" | "jmp" | "lcall" | "ljmp")
}

/// Scalar SSE/AVX memory operands are narrower than the vector register.
fn scalar_size(mnemonic: &str) -> Option<u16> {
    let stem = mnemonic.strip_prefix('v').unwrap_or(mnemonic);
    if stem.starts_with('p') {
        return None;
    }
    if stem.starts_with("movlp") || stem.starts_with("movhp") || stem == "movq" {
        return Some(8);
    }
    if stem == "movd" {
        return Some(4);
    }
    let source = stem.split('2').next().unwrap_or(stem);
    if source.ends_with("ss") {
        Some(4)
    } else if source.ends_with("sd") {
        Some(8)
    } else {
        None
    }
}

fn size_letter(bytes: u16) -> Option<char> {
    match bytes {
        1 => Some('b'),
        2 => Some('w'),
        4 => Some('l'),
        8 => Some('q'),
        _ => None,
    }
}

/// GAS suffix of an x87 memory form: `s`/`l`/`t` for real operands and
/// `s`/`l`/`ll` for integer operands. Environment and control-word forms
/// take none.
fn x87_suffix(mnemonic: &str, bytes: u16) -> Option<&'static str> {
    let integer = mnemonic.starts_with("fi");
    let real = matches!(
        mnemonic,
        "fld" | "fst" | "fstp" | "fadd" | "fmul" | "fcom" | "fcomp" | "fsub" | "fsubr" | "fdiv" | "fdivr"
    );
    match bytes {
        2 if integer => Some("s"),
        4 if integer => Some("l"),
        8 if integer => Some("ll"),
        4 if real => Some("s"),
        8 if real => Some("l"),
        10 if real => Some("t"),
        _ => None,
    }
}

fn intel_size(bytes: u16) -> Option<&'static str> {
    let name = match bytes {
        1 => "byte",
        2 => "word",
        4 => "dword",
        6 => "fword",
        8 => "qword",
        10 => "tbyte",
        16 => "xmmword",
        32 => "ymmword",
        64 => "zmmword",
        _ => return None,
    };
    Some(name)
}

fn immediate(value: i64, bytes: usize, signed: bool) -> String {
    if signed && value < 0 {
        format!("-{:#x}", value.unsigned_abs())
    } else if bytes >= 8 {
        format!("{:#x}", value as u64)
    } else {
        format!("{:#x}", (value as u64) & ((1u64 << (bytes * 8)) - 1))
    }
}

fn rounding(mode: RoundingMode) -> &'static str {
    match mode {
        RoundingMode::Current => "",
        RoundingMode::ToNearest => "{rn-sae}",
        RoundingMode::Downwards => "{rd-sae}",
        RoundingMode::Upwards => "{ru-sae}",
        RoundingMode::Truncate => "{rz-sae}",
    }
}

fn intel_operand(op: &Operand, printer: &Printer<'_>) -> String {
    match *op {
        Operand::Register(reg) => reg.name().to_string(),
        Operand::Immediate { value, bytes, signed } => immediate(value, bytes, signed),
        Operand::Target(offset) => printer.target(offset),
        Operand::Port => "dx".to_string(),
        Operand::Rounding(mode) => rounding(mode).to_string(),
        Operand::Memory(memory) => {
            let mut text = String::new();
            if let Some(size) = memory.size.and_then(intel_size) {
                text.push_str(size);
                text.push_str(" ptr ");
            }
            if let Some(segment) = memory.segment {
                text.push_str(segment);
                text.push(':');
            }
            text.push('[');
            let mut has_content = false;
            if let Some(base) = memory.base {
                text.push_str(base);
                has_content = true;
            }
            if let Some(index) = memory.index {
                if has_content {
                    text.push_str(" + ");
                }
                text.push_str(index);
                if memory.scale > 1 {
                    text.push_str(&format!("*{}", memory.scale));
                }
                has_content = true;
            }
            if has_content {
                if memory.displacement > 0 {
                    text.push_str(&format!(" + {:#x}", memory.displacement));
                } else if memory.displacement < 0 {
                    text.push_str(&format!(" - {:#x}", memory.displacement.unsigned_abs()));
                }
            } else {
                text.push_str(&format!("{:#x}", memory.displacement));
            }
            text.push(']');
            if let Some(count) = memory.broadcast {
                text.push_str(&format!("{{1to{count}}}"));
            }
            text
        }
    }
}

fn att_operand(op: &Operand, printer: &Printer<'_>) -> String {
    match *op {
        Operand::Register(reg) => format!("%{}", reg.name()),
        Operand::Immediate { value, bytes, signed } => format!("${}", immediate(value, bytes, signed)),
        Operand::Target(offset) => printer.target(offset),
        Operand::Port => "(%dx)".to_string(),
        Operand::Rounding(mode) => rounding(mode).to_string(),
        Operand::Memory(memory) => {
            let mut text = String::new();
            if let Some(segment) = memory.segment {
                text.push_str(&format!("%{segment}:"));
            }
            let addressed = memory.base.is_some() || memory.index.is_some();
            if memory.displacement < 0 && addressed {
                text.push_str(&format!("-{:#x}", memory.displacement.unsigned_abs()));
            } else if memory.displacement != 0 || !addressed || memory.base.is_none() {
                text.push_str(&format!("{:#x}", memory.displacement));
            }
            if addressed {
                text.push('(');
                if let Some(base) = memory.base {
                    text.push_str(&format!("%{base}"));
                }
                if let Some(index) = memory.index {
                    text.push_str(&format!(",%{index},{}", memory.scale));
                }
                text.push(')');
            }
            if let Some(count) = memory.broadcast {
                text.push_str(&format!("{{1to{count}}}"));
            }
            text
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::x86_64::decoder::try_decode;

    fn intel(bytes: &[u8]) -> String {
        try_decode(bytes).unwrap().instruction.to_string()
    }

    fn att(bytes: &[u8]) -> String {
        let config = FormatterConfig::new(AssemblySyntax::Att);
        format(&try_decode(bytes).unwrap().instruction, &config)
    }

    #[test]
    fn test_register_operands() {
        assert_eq!(intel(&[0x48, 0x89, 0xC8]), "mov rax, rcx");
        assert_eq!(att(&[0x48, 0x89, 0xC8]), "mov %rcx,%rax");
        assert_eq!(intel(&[0x50]), "push rax");
        assert_eq!(intel(&[0x41, 0x54]), "push r12");
        assert_eq!(intel(&[0xC3]), "ret");
        assert_eq!(intel(&[0x0F, 0x94, 0xC0]), "sete al");
    }

    #[test]
    fn test_memory_operands() {
        assert_eq!(intel(&[0x48, 0x8B, 0x44, 0x24, 0x08]), "mov rax, qword ptr [rsp + 0x8]");
        assert_eq!(att(&[0x48, 0x8B, 0x44, 0x24, 0x08]), "mov 0x8(%rsp),%rax");
        assert_eq!(intel(&[0x8B, 0x05, 0x10, 0x00, 0x00, 0x00]), "mov eax, dword ptr [rip + 0x10]");
        assert_eq!(att(&[0x8B, 0x05, 0x10, 0x00, 0x00, 0x00]), "mov 0x10(%rip),%eax");
        assert_eq!(intel(&[0xDD, 0x45, 0xF8]), "fld qword ptr [rbp - 0x8]");
    }

    #[test]
    fn test_segment_without_base() {
        let bytes = [0x64, 0x48, 0x8B, 0x04, 0x25, 0x28, 0x00, 0x00, 0x00];
        assert_eq!(intel(&bytes), "mov rax, qword ptr fs:[0x28]");
        assert_eq!(att(&bytes), "mov %fs:0x28,%rax");
    }

    #[test]
    fn test_immediates() {
        assert_eq!(intel(&[0x48, 0x83, 0xC0, 0xFF]), "add rax, -0x1");
        assert_eq!(att(&[0x48, 0x83, 0xC0, 0xFF]), "add $-0x1,%rax");
        assert_eq!(intel(&[0xB8, 0xFF, 0xFF, 0xFF, 0xFF]), "mov eax, 0xffffffff");
        assert_eq!(intel(&[0xC7, 0x00, 0x01, 0x00, 0x00, 0x00]), "mov dword ptr [rax], 0x1");
        assert_eq!(att(&[0xC7, 0x00, 0x01, 0x00, 0x00, 0x00]), "movl $0x1,(%rax)");
    }

    #[test]
    fn test_relative_targets() {
        assert_eq!(intel(&[0xE8, 0x00, 0x00, 0x00, 0x00]), "call $+0x5");
        assert_eq!(intel(&[0xEB, 0xFE]), "jmp $+0x0");
        assert_eq!(intel(&[0x74, 0x02]), "je $+0x4");
        assert_eq!(att(&[0xEB, 0xF0]), "jmp .-0xe");

        let insn = try_decode(&[0xE8, 0x00, 0x10, 0x00, 0x00]).unwrap().instruction;
        let config = FormatterConfig::default().with_address(0x40_0000);
        assert_eq!(format(&insn, &config), "call 0x401005");
    }

    #[test]
    fn test_prefixes_and_aliases() {
        assert_eq!(intel(&[0xF0, 0x01, 0xC0]), "lock add eax, eax");
        assert_eq!(intel(&[0xF3, 0x48, 0xA5]), "rep movsq");
        assert_eq!(att(&[0xF3, 0xA5]), "rep movsl");
        assert_eq!(intel(&[0x90]), "nop");
        assert_eq!(intel(&[0xF3, 0x90]), "pause");
        assert_eq!(intel(&[0x41, 0x90]), "xchg r8d, eax");
        assert_eq!(intel(&[0x49, 0x90]), "xchg r8, rax");
        assert_eq!(intel(&[0x48, 0x98]), "cdqe");
        assert_eq!(att(&[0x48, 0x99]), "cqto");
        assert_eq!(intel(&[0xF3, 0x0F, 0x1E, 0xFA]), "endbr64");
    }

    #[test]
    fn test_implicit_operands() {
        assert_eq!(intel(&[0xD1, 0xE0]), "shl eax, 0x1");
        assert_eq!(intel(&[0x48, 0xD3, 0xE8]), "shr rax, cl");
        assert_eq!(intel(&[0xEC]), "in al, dx");
        assert_eq!(att(&[0xEE]), "out %al,(%dx)");
    }

    #[test]
    fn test_fixed_forms() {
        assert_eq!(intel(&[0xD9, 0xE8]), "fld1");
        assert_eq!(intel(&[0xDF, 0xE0]), "fnstsw ax");
        assert_eq!(intel(&[0x0F, 0x01, 0xF9]), "rdtscp");
    }

    #[test]
    fn test_vector_forms() {
        assert_eq!(intel(&[0xC5, 0xF8, 0x77]), "vzeroupper");
        assert_eq!(intel(&[0xC5, 0xFC, 0x77]), "vzeroall");
        assert_eq!(intel(&[0xC4, 0xE1, 0x78, 0x58, 0xC2]), "vaddps xmm0, xmm0, xmm2");
        assert_eq!(intel(&[0x0F, 0x58, 0xC1]), "addps xmm0, xmm1");
    }

    #[test]
    fn test_evex_decorations() {
        let bytes = [0x62, 0xF1, 0x7C, 0xC9, 0x58, 0xC2];
        assert_eq!(intel(&bytes), "vaddps zmm0{k1}{z}, zmm0, zmm2");
        assert_eq!(att(&bytes), "vaddps %zmm2,%zmm0,%zmm0{%k1}{z}");
    }

    #[test]
    fn test_uppercase() {
        let insn = try_decode(&[0x48, 0x83, 0xC0, 0x1F]).unwrap().instruction;
        let config = FormatterConfig::default().with_uppercase(true);
        assert_eq!(format(&insn, &config), "ADD RAX, 0x1F");
    }

    #[test]
    fn test_unnamed_system_form_prints_bad() {
        assert_eq!(intel(&[0x0F, 0x01, 0xE9]), "(bad)");
    }

    #[test]
    fn test_targets_use_decoded_length() {
        // Repeated segment prefixes are dropped from the canonical encoding.
        let decoded = try_decode(&[0x2E, 0x2E, 0x74, 0x05]).unwrap();
        let config = FormatterConfig::default();
        assert_eq!(format_decoded(&decoded, &config), "je $+0x9");
        assert_eq!(format(&decoded.instruction, &config), "je $+0x8");

        let decoded = try_decode(&[0x3E, 0x3E, 0x3E, 0xEB, 0x00]).unwrap();
        assert_eq!(format_decoded(&decoded, &config), "jmp $+0x5");

        let decoded = try_decode(&[0x2E, 0x2E, 0x74, 0x05]).unwrap();
        let config = FormatterConfig::default().with_address(0x1000);
        assert_eq!(format_decoded(&decoded, &config), "je 0x1009");
    }

    #[test]
    fn test_gather_operand_order() {
        let bytes = [0xC4, 0xE2, 0x75, 0x90, 0x04, 0x90];
        assert_eq!(intel(&bytes), "vpgatherdd ymm0, dword ptr [rax + ymm2*4], ymm1");
        assert_eq!(att(&bytes), "vpgatherdd %ymm1,(%rax,%ymm2,4),%ymm0");

        // Dword indices gathering qwords use half-width index registers.
        let bytes = [0xC4, 0xE2, 0xF5, 0x90, 0x04, 0x90];
        assert_eq!(intel(&bytes), "vpgatherdq ymm0, qword ptr [rax + xmm2*4], ymm1");
    }

    #[test]
    fn test_att_size_suffixes() {
        assert_eq!(intel(&[0xDB, 0x28]), "fld tbyte ptr [rax]");
        assert_eq!(att(&[0xDB, 0x28]), "fldt (%rax)");
        assert_eq!(att(&[0xD9, 0x00]), "flds (%rax)");
        assert_eq!(att(&[0xDD, 0x45, 0xF8]), "fldl -0x8(%rbp)");
        assert_eq!(att(&[0xDF, 0x28]), "fildll (%rax)");
        assert_eq!(att(&[0xDB, 0x00]), "fildl (%rax)");
        assert_eq!(att(&[0xDE, 0x00]), "fiadds (%rax)");
        assert_eq!(att(&[0xD9, 0x38]), "fnstcw (%rax)");
        assert_eq!(att(&[0x48, 0xD3, 0x20]), "shlq %cl,(%rax)");
        assert_eq!(att(&[0xD3, 0x20]), "shll %cl,(%rax)");
        assert_eq!(att(&[0x48, 0x89, 0x08]), "mov %rcx,(%rax)");
    }

    #[test]
    fn test_evex_element_names() {
        assert_eq!(intel(&[0x62, 0xF1, 0x7D, 0x48, 0xDB, 0xC2]), "vpandd zmm0, zmm0, zmm2");
        assert_eq!(intel(&[0x62, 0xF1, 0xFD, 0x48, 0xDB, 0xC2]), "vpandq zmm0, zmm0, zmm2");
        assert_eq!(intel(&[0x62, 0xF1, 0x7D, 0x48, 0xEF, 0xC2]), "vpxord zmm0, zmm0, zmm2");
        assert_eq!(intel(&[0x62, 0xF1, 0xFD, 0x48, 0x6F, 0xC1]), "vmovdqa64 zmm0, zmm1");
        assert_eq!(intel(&[0x62, 0xF1, 0x7E, 0x48, 0x6F, 0xC1]), "vmovdqu32 zmm0, zmm1");
        // VEX keeps the element-agnostic names.
        assert_eq!(intel(&[0xC5, 0xFD, 0xDB, 0xC2]), "vpand ymm0, ymm0, ymm2");
    }

    #[test]
    fn test_memory_sizes_without_register_class() {
        assert_eq!(intel(&[0x0F, 0xC7, 0x08]), "cmpxchg8b qword ptr [rax]");
        assert_eq!(intel(&[0x48, 0x0F, 0xC7, 0x08]), "cmpxchg16b xmmword ptr [rax]");
        assert_eq!(intel(&[0x0F, 0x38, 0xF0, 0x00]), "movbe eax, dword ptr [rax]");
        assert_eq!(intel(&[0x48, 0x0F, 0x38, 0xF1, 0x00]), "movbe qword ptr [rax], rax");
    }
}
