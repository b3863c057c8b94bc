//! Assembler
mod assembler;
mod scanner;
mod tokens;

pub use self::{
    assembler::{assemble, Assembly},
    scanner::TokenScanner,
    tokens::{Mnemonic, Token},
};
