//! Operations, registers and primitive routines of the mJAM machine.
//!
//! Discriminants match the machine's encoding, so `u8::from(op)` and
//! `i32::from(prim)` give the numbers an object-file writer expects.

use std::fmt;

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Machine operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum Op {
    /// Push the word at `d[r]`.
    Load = 0,
    /// Push the address `d[r]`.
    LoadA,
    /// Pop an address, push the word there.
    LoadI,
    /// Push the literal `d`.
    LoadL,
    /// Pop a word into `d[r]`.
    Store,
    /// Pop an address and a word, store the word there.
    StoreI,
    /// Call the routine at `d[r]`. With `r = PB`, call primitive `d`.
    Call,
    /// Call the instance method at `d[r]`; the instance address is on top.
    CallI,
    /// Dynamic dispatch (never emitted).
    CallD,
    /// Return with `n` result words, popping `d` arguments.
    Return,
    /// Push `d` uninitialized words.
    Push,
    /// Pop `d` words.
    Pop,
    /// Jump to `d[r]`.
    Jump,
    /// Pop an address and jump to it.
    JumpI,
    /// Pop a word; jump to `d[r]` if it equals `n`.
    JumpIf,
    Halt,
}

impl Op {
    /// Mnemonic as printed by the mJAM disassembler.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Op::Load => "LOAD",
            Op::LoadA => "LOADA",
            Op::LoadI => "LOADI",
            Op::LoadL => "LOADL",
            Op::Store => "STORE",
            Op::StoreI => "STOREI",
            Op::Call => "CALL",
            Op::CallI => "CALLI",
            Op::CallD => "CALLD",
            Op::Return => "RETURN",
            Op::Push => "PUSH",
            Op::Pop => "POP",
            Op::Jump => "JUMP",
            Op::JumpI => "JUMPI",
            Op::JumpIf => "JUMPIF",
            Op::Halt => "HALT",
        }
    }
}

/// Machine registers.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum Reg {
    /// Zero (no register).
    ZR = 0,
    /// Code base
    CB,
    /// Code top
    CT,
    /// Primitives base
    PB,
    /// Primitives top
    PT,
    /// Stack base
    SB,
    /// Stack top
    ST,
    /// Heap base
    HB,
    /// Heap top
    HT,
    /// Local base
    LB,
    /// Object base
    OB,
    /// Code pointer
    CP,
}

/// Primitive routines, called as `CALL PB d`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(i32)]
pub enum Prim {
    Id = 0,
    Not,
    And,
    Or,
    Succ,
    Pred,
    Neg,
    Add,
    Sub,
    Mult,
    Div,
    Mod,
    Lt,
    Le,
    Ge,
    Gt,
    Eq,
    Ne,
    Eol,
    Eof,
    Get,
    Put,
    GetEol,
    PutEol,
    GetInt,
    PutInt,
    PutIntNl,
    Alloc,
    Dispose,
    NewObj,
    NewArr,
    ArrayRef,
    ArrayLen,
    ArrayUpd,
    FieldRef,
    FieldUpd,
}

impl Prim {
    /// Name as printed by the mJAM disassembler.
    pub fn name(self) -> &'static str {
        match self {
            Prim::Id => "id",
            Prim::Not => "not",
            Prim::And => "and",
            Prim::Or => "or",
            Prim::Succ => "succ",
            Prim::Pred => "pred",
            Prim::Neg => "neg",
            Prim::Add => "add",
            Prim::Sub => "sub",
            Prim::Mult => "mult",
            Prim::Div => "div",
            Prim::Mod => "mod",
            Prim::Lt => "lt",
            Prim::Le => "le",
            Prim::Ge => "ge",
            Prim::Gt => "gt",
            Prim::Eq => "eq",
            Prim::Ne => "ne",
            Prim::Eol => "eol",
            Prim::Eof => "eof",
            Prim::Get => "get",
            Prim::Put => "put",
            Prim::GetEol => "geteol",
            Prim::PutEol => "puteol",
            Prim::GetInt => "getint",
            Prim::PutInt => "putint",
            Prim::PutIntNl => "putintnl",
            Prim::Alloc => "alloc",
            Prim::Dispose => "dispose",
            Prim::NewObj => "newobj",
            Prim::NewArr => "newarr",
            Prim::ArrayRef => "arrayref",
            Prim::ArrayLen => "arraylen",
            Prim::ArrayUpd => "arrayupd",
            Prim::FieldRef => "fieldref",
            Prim::FieldUpd => "fieldupd",
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl fmt::Display for Prim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
