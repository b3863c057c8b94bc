//! Result and errors.
use std::{
    fmt::{self, Display, Formatter},
    io,
};

pub type Chip8Result<T> = std::result::Result<T, Chip8Error>;

#[derive(Debug)]
pub enum Chip8Error {
    /// Lexer rejected a source line.
    Syntax {
        line: usize,
        column: usize,
        detail: String,
    },
    /// No operand shape of the mnemonic matched, or a mode-guarded
    /// opcode was used outside SUPER/EXTENDED mode.
    IllegalInstruction { line: usize, mnemonic: String },
    /// A directive was malformed or used in the wrong mode.
    IllegalDirective { line: usize, detail: String },
    /// A label was bound twice.
    DuplicateLabel { line: usize, name: String },
    /// A referenced label was never defined, or resolved to something
    /// other than an address literal.
    UnresolvedLabel { name: String },
    /// Attempt to load a program that can't fit in memory.
    LargeProgram,
    /// CALL with all sixteen stack slots in use.
    StackOverflow { pc: usize },
    /// RET with an empty stack.
    StackUnderflow { pc: usize },
    /// Fetched a word that decodes to nothing.
    InvalidOpcode { pc: usize, inst: u16 },
    /// SYS calls into CDP1802 machine code are not emulated.
    UnimplementedSys { address: usize },
    Io(io::Error),
}

impl Display for Chip8Error {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Syntax {
                line,
                column,
                detail,
            } => write!(f, "line {line}, column {column}: {detail}"),
            Self::IllegalInstruction { line, mnemonic } => {
                write!(f, "line {line}: illegal instruction {mnemonic}")
            }
            Self::IllegalDirective { line, detail } => {
                write!(f, "line {line}: illegal directive: {detail}")
            }
            Self::DuplicateLabel { line, name } => {
                write!(f, "line {line}: duplicate label {name}")
            }
            Self::UnresolvedLabel { name } => write!(f, "unresolved label: {name}"),
            Self::LargeProgram => write!(f, "program too large to fit in memory"),
            Self::StackOverflow { pc } => write!(f, "stack overflow @ {pc:04X}"),
            Self::StackUnderflow { pc } => write!(f, "stack underflow @ {pc:04X}"),
            Self::InvalidOpcode { pc, inst } => {
                write!(f, "invalid opcode @ {pc:04X}: {inst:04X}")
            }
            Self::UnimplementedSys { address } => {
                write!(f, "unimplemented syscall to #{address:04X}")
            }
            Self::Io(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Chip8Error {}

impl From<io::Error> for Chip8Error {
    fn from(err: io::Error) -> Self {
        Chip8Error::Io(err)
    }
}

/// Assembly error before it has been attached to a source line.
///
/// The scanner and the per-mnemonic emitters don't know which line they
/// are working on; the assembler driver wraps their failures with
/// [`with_line`](AsmError::with_line).
#[derive(Debug)]
pub enum AsmError {
    Syntax { column: usize, detail: String },
    IllegalInstruction { mnemonic: String },
    IllegalDirective { detail: String },
    DuplicateLabel { name: String },
}

pub type AsmResult<T> = std::result::Result<T, AsmError>;

impl AsmError {
    pub fn syntax(column: usize, detail: impl ToString) -> Self {
        AsmError::Syntax {
            column,
            detail: detail.to_string(),
        }
    }

    pub fn directive(detail: impl ToString) -> Self {
        AsmError::IllegalDirective {
            detail: detail.to_string(),
        }
    }

    /// Attach the 1-based source line number, producing the public error.
    pub fn with_line(self, line: usize) -> Chip8Error {
        match self {
            AsmError::Syntax { column, detail } => Chip8Error::Syntax {
                line,
                column,
                detail,
            },
            AsmError::IllegalInstruction { mnemonic } => {
                Chip8Error::IllegalInstruction { line, mnemonic }
            }
            AsmError::IllegalDirective { detail } => Chip8Error::IllegalDirective { line, detail },
            AsmError::DuplicateLabel { name } => Chip8Error::DuplicateLabel { line, name },
        }
    }
}
