//! # harc-core
//!
//! Core types shared by the harc x86-64 backend: the architectural register
//! model and the assembly syntax setting used by the printer.

pub mod register;
pub mod syntax;

pub use register::{
    ControlReg, DebugReg, GeneralPurpose, Gpr16, Gpr32, Gpr64, Gpr8Hi, Gpr8Lo, MaskReg, MmxReg,
    RegCategory, Register, RegisterFamily, SegmentReg, StReg, VectorRegister, XmmReg, YmmReg,
    ZmmReg,
};
pub use syntax::{AssemblySyntax, ParseSyntaxError};
