//! Tokens
use smol_str::SmolStr;

/// A scanned lexical token.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// End of line. Carries any trailing comment text, which BREAK and
    /// ASSERT keep as the breakpoint reason.
    End(String),
    /// A character with no lexical class of its own.
    Char(u8),
    /// Label definition starting in column 0.
    Label(SmolStr),
    /// Identifier that is not a reserved word; resolved against the
    /// label table during assembly.
    Ref(SmolStr),
    /// Opcode or data directive mnemonic.
    Instruction(Mnemonic),
    /// `[...]` indirection. Only `[I]` is meaningful in operands.
    Address(Box<Token>),
    /// A `,`-prefixed operand in an operand list.
    Operand(Box<Token>),

    // ------------------------------------------------------------------------
    // Registers
    V(u8),
    R,
    I,
    B,
    F,
    HF,
    K,
    DT,
    ST,
    /// CHIP-8E ASCII pointer, only valid in `LD A, Vx`.
    A,

    /// Numeric literal. Negative values scan only in decimal.
    Lit(i32),
    /// Quoted string literal.
    Text(String),

    // ------------------------------------------------------------------------
    // Directives with their own token kind
    Break,
    Assert,
    Equ,
    Var,
    Super,
    Extended,
    Declare,
    As(Box<Token>),
}

impl Token {
    /// True when two tokens have the same kind, ignoring payloads.
    /// Operand shape matching compares kinds, not values.
    pub fn same_kind(&self, other: &Token) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// Reserved instruction and directive mnemonics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[rustfmt::skip]
pub enum Mnemonic {
    // ------------------------------------------------------------------------
    // Opcodes
    Cls, Ret, Exit, Low, High,
    Scu, Scd, Scr, Scl,
    Sys, Jp, Call,
    Se, Sne, Sgt, Slt, Skp, Sknp,
    Ld, Or, And, Xor, Add, Sub, Subn, Shr, Shl,
    Mul, Div, Bcd, Rnd, Drw,

    // ------------------------------------------------------------------------
    // Data directives
    Ascii, Byte, Word, Align, Pad,
}

impl Mnemonic {
    /// Map an upper-cased identifier to its mnemonic, aliases included.
    #[rustfmt::skip]
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "CLS"   => Some(Self::Cls),
            "RET"   => Some(Self::Ret),
            "EXIT"  => Some(Self::Exit),
            "LOW"   => Some(Self::Low),
            "HIGH"  => Some(Self::High),
            "SCU"   => Some(Self::Scu),
            "SCD"   => Some(Self::Scd),
            "SCR"   => Some(Self::Scr),
            "SCL"   => Some(Self::Scl),
            "SYS"   => Some(Self::Sys),
            "JP"    => Some(Self::Jp),
            "CALL"  => Some(Self::Call),
            "SE"    => Some(Self::Se),
            "SNE"   => Some(Self::Sne),
            "SGT"   => Some(Self::Sgt),
            "SLT"   => Some(Self::Slt),
            "SKP"   => Some(Self::Skp),
            "SKNP"  => Some(Self::Sknp),
            "LD"    => Some(Self::Ld),
            "OR"    => Some(Self::Or),
            "AND"   => Some(Self::And),
            "XOR"   => Some(Self::Xor),
            "ADD"   => Some(Self::Add),
            "SUB"   => Some(Self::Sub),
            "SUBN"  => Some(Self::Subn),
            "SHR"   => Some(Self::Shr),
            "SHL"   => Some(Self::Shl),
            "MUL"   => Some(Self::Mul),
            "DIV"   => Some(Self::Div),
            "BCD"   => Some(Self::Bcd),
            "RND"   => Some(Self::Rnd),
            "DRW"   => Some(Self::Drw),
            "ASCII" => Some(Self::Ascii),
            "BYTE" | "DB" => Some(Self::Byte),
            "WORD" | "DW" => Some(Self::Word),
            "ALIGN" => Some(Self::Align),
            "PAD" | "RESERVE" => Some(Self::Pad),
            _ => None,
        }
    }

    /// Canonical upper-case spelling.
    #[rustfmt::skip]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cls => "CLS",     Self::Ret => "RET",   Self::Exit => "EXIT",
            Self::Low => "LOW",     Self::High => "HIGH",
            Self::Scu => "SCU",     Self::Scd => "SCD",
            Self::Scr => "SCR",     Self::Scl => "SCL",
            Self::Sys => "SYS",     Self::Jp => "JP",     Self::Call => "CALL",
            Self::Se => "SE",       Self::Sne => "SNE",
            Self::Sgt => "SGT",     Self::Slt => "SLT",
            Self::Skp => "SKP",     Self::Sknp => "SKNP",
            Self::Ld => "LD",       Self::Or => "OR",     Self::And => "AND",
            Self::Xor => "XOR",     Self::Add => "ADD",   Self::Sub => "SUB",
            Self::Subn => "SUBN",   Self::Shr => "SHR",   Self::Shl => "SHL",
            Self::Mul => "MUL",     Self::Div => "DIV",   Self::Bcd => "BCD",
            Self::Rnd => "RND",     Self::Drw => "DRW",
            Self::Ascii => "ASCII", Self::Byte => "BYTE", Self::Word => "WORD",
            Self::Align => "ALIGN", Self::Pad => "PAD",
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_mnemonic_aliases() {
        assert_eq!(Mnemonic::parse("BYTE"), Some(Mnemonic::Byte));
        assert_eq!(Mnemonic::parse("DB"), Some(Mnemonic::Byte));
        assert_eq!(Mnemonic::parse("DW"), Some(Mnemonic::Word));
        assert_eq!(Mnemonic::parse("RESERVE"), Some(Mnemonic::Pad));
        assert_eq!(Mnemonic::parse("NOPE"), None);
    }

    #[test]
    fn test_same_kind_ignores_payload() {
        assert!(Token::V(0).same_kind(&Token::V(15)));
        assert!(Token::Lit(1).same_kind(&Token::Lit(-1)));
        assert!(!Token::V(0).same_kind(&Token::Lit(0)));
    }
}
