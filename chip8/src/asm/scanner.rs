//! Lexical analysis.
//!
//! The scanner works on one source line at a time. The assembler driver
//! upper-cases the whole input before splitting it into lines, so every
//! byte seen here is already folded; string literals fold with it,
//! which is what the CHIP-8E ASCII table expects.
use smol_str::SmolStr;

use crate::error::{AsmError, AsmResult};

use super::tokens::{Mnemonic, Token};

/// Token scanner over a single upper-cased source line.
pub struct TokenScanner<'a> {
    bytes: &'a [u8],
    /// Scan position, also reported as the error column.
    pos: usize,
}

impl<'a> TokenScanner<'a> {
    pub fn new(line: &'a [u8]) -> Self {
        Self { bytes: line, pos: 0 }
    }

    /// Scan the next token from the line.
    pub fn scan_token(&mut self) -> AsmResult<Token> {
        // A label must begin in column 0, so whitespace is significant
        // only for deciding whether we are still there.
        while self.pos < self.bytes.len() && self.bytes[self.pos] < 33 {
            self.pos += 1;
        }

        if self.pos >= self.bytes.len() {
            return Ok(Token::End(String::new()));
        }

        let c = self.bytes[self.pos];

        match c {
            b';' => Ok(self.scan_to_end()),
            b'.' if self.pos == 0 => self.scan_dot_label(),
            b'[' if self.pos > 0 => self.scan_indirection(),
            b',' if self.pos > 0 => self.scan_operand(),
            b'#' if self.pos > 0 => self.scan_hex_lit(),
            b'$' if self.pos > 0 => self.scan_bin_lit(),
            b'-' if self.pos > 0 => self.scan_dec_lit(),
            b'0'..=b'9' if self.pos > 0 => self.scan_dec_lit(),
            b'"' | b'\'' | b'`' if self.pos > 0 => self.scan_string(c),
            b'A'..=b'Z' | b'_' => {
                if self.pos == 0 {
                    // Bare identifier in the label column.
                    match self.scan_identifier()? {
                        Token::Ref(name) => Ok(Token::Label(name)),
                        _ => Err(AsmError::syntax(0, "expected label")),
                    }
                } else {
                    self.scan_identifier()
                }
            }
            _ => {
                if self.pos == 0 {
                    return Err(AsmError::syntax(0, "expected label"));
                }
                Ok(self.scan_char())
            }
        }
    }

    /// Scan a full comma-separated operand list to the end of the line.
    pub fn scan_operands(&mut self) -> AsmResult<Vec<Token>> {
        let mut tokens = Vec::with_capacity(3);

        let mut t = self.scan_token()?;
        while !matches!(t, Token::End(_)) {
            tokens.push(t);

            match self.scan_token()? {
                Token::Operand(inner) => t = *inner,
                Token::End(_) => break,
                _ => return Err(AsmError::syntax(self.pos, "unexpected token")),
            }
        }

        Ok(tokens)
    }

    /// Consume the rest of the line, returning it as trimmed text.
    /// BREAK and ASSERT use this to capture their reason.
    pub fn scan_to_end(&mut self) -> Token {
        let mut text = &self.bytes[self.pos..];
        self.pos = self.bytes.len();

        while let Some(b) = text.first() {
            if *b >= 33 {
                break;
            }
            text = &text[1..];
        }

        // A reason may be given as a trailing comment.
        if text.first() == Some(&b';') {
            text = &text[1..];
        }

        let text = String::from_utf8_lossy(text).trim().to_string();
        Token::End(text)
    }

    /// Scan a single character token.
    fn scan_char(&mut self) -> Token {
        let c = self.bytes[self.pos];
        self.pos += 1;
        Token::Char(c)
    }

    /// Scan a `.`-prefixed label.
    fn scan_dot_label(&mut self) -> AsmResult<Token> {
        self.pos += 1;

        if self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_uppercase() {
            if let Token::Ref(name) = self.scan_identifier()? {
                return Ok(Token::Label(name));
            }
        }

        Err(AsmError::syntax(self.pos, "expected label"))
    }

    /// Scan a `,`-prefixed operand.
    fn scan_operand(&mut self) -> AsmResult<Token> {
        self.pos += 1;

        let t = self.scan_token()?;
        if matches!(t, Token::End(_)) {
            return Err(AsmError::syntax(self.pos, "expected operand after comma"));
        }

        Ok(Token::Operand(Box::new(t)))
    }

    /// Scan `[...]` indirection.
    fn scan_indirection(&mut self) -> AsmResult<Token> {
        self.pos += 1;

        let inner = self.scan_token()?;

        match self.scan_token()? {
            Token::Char(b']') => Ok(Token::Address(Box::new(inner))),
            _ => Err(AsmError::syntax(self.pos, "illegal indirection")),
        }
    }

    /// Scan an identifier: instruction, register, directive or reference.
    fn scan_identifier(&mut self) -> AsmResult<Token> {
        let start = self.pos;

        while self.pos < self.bytes.len() && is_ident(self.bytes[self.pos]) {
            self.pos += 1;
        }

        let id = std::str::from_utf8(&self.bytes[start..self.pos])
            .map_err(|_| AsmError::syntax(start, "illegal character in identifier"))?;

        if let Some(vx) = parse_vregister(id) {
            return Ok(Token::V(vx));
        }

        if let Some(mnemonic) = Mnemonic::parse(id) {
            return Ok(Token::Instruction(mnemonic));
        }

        let token = match id {
            "R" => Token::R,
            "I" => Token::I,
            "B" => Token::B,
            "F" => Token::F,
            "HF" => Token::HF,
            "K" => Token::K,
            "A" => Token::A,
            "D" | "DT" => Token::DT,
            "S" | "ST" => Token::ST,
            "BREAK" => Token::Break,
            "ASSERT" => Token::Assert,
            "EQU" => Token::Equ,
            "VAR" => Token::Var,
            "SUPER" => Token::Super,
            "EXTENDED" => Token::Extended,
            "DECLARE" => Token::Declare,
            "AS" => return self.scan_as(),
            _ => Token::Ref(SmolStr::new(id)),
        };

        Ok(token)
    }

    /// Scan the operand of an `AS` clause.
    fn scan_as(&mut self) -> AsmResult<Token> {
        let t = self.scan_token()?;

        // Only literals, references and registers can be declared.
        match t {
            Token::Lit(_)
            | Token::Ref(_)
            | Token::V(_)
            | Token::R
            | Token::I
            | Token::B
            | Token::F
            | Token::HF
            | Token::K
            | Token::DT
            | Token::ST => Ok(Token::As(Box::new(t))),
            _ => Err(AsmError::syntax(self.pos, "illegal declare .. as")),
        }
    }

    /// Scan a decimal literal, the only radix that allows a sign.
    fn scan_dec_lit(&mut self) -> AsmResult<Token> {
        let start = self.pos;

        if self.bytes[self.pos] == b'-' {
            self.pos += 1;
        }

        while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_digit() {
            self.pos += 1;
        }

        let text = std::str::from_utf8(&self.bytes[start..self.pos]).unwrap_or_default();

        text.parse::<i32>().map(Token::Lit).map_err(|_| {
            AsmError::syntax(start, format!("illegal decimal value: {text}"))
        })
    }

    /// Scan a `#`-prefixed hexadecimal literal.
    fn scan_hex_lit(&mut self) -> AsmResult<Token> {
        let start = self.pos;
        self.pos += 1;

        while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_hexdigit() {
            self.pos += 1;
        }

        let text = std::str::from_utf8(&self.bytes[start + 1..self.pos]).unwrap_or_default();

        i32::from_str_radix(text, 16).map(Token::Lit).map_err(|_| {
            AsmError::syntax(start, format!("illegal hex value: #{text}"))
        })
    }

    /// Scan a `$`-prefixed binary literal. `.` counts as `0` so sprite
    /// rows read as pictures.
    fn scan_bin_lit(&mut self) -> AsmResult<Token> {
        let start = self.pos;
        self.pos += 1;

        while self.pos < self.bytes.len() && matches!(self.bytes[self.pos], b'.' | b'0' | b'1') {
            self.pos += 1;
        }

        let text: String = self.bytes[start + 1..self.pos]
            .iter()
            .map(|&b| if b == b'.' { '0' } else { b as char })
            .collect();

        i32::from_str_radix(&text, 2).map(Token::Lit).map_err(|_| {
            AsmError::syntax(start, format!("illegal binary value: ${text}"))
        })
    }

    /// Scan a quoted string. No escape sequences.
    fn scan_string(&mut self, term: u8) -> AsmResult<Token> {
        let start = self.pos;
        self.pos += 1;

        let from = self.pos;
        while self.pos < self.bytes.len() && self.bytes[self.pos] != term {
            self.pos += 1;
        }

        if self.pos >= self.bytes.len() {
            return Err(AsmError::syntax(start, "unterminated string"));
        }

        let text = String::from_utf8_lossy(&self.bytes[from..self.pos]).into_owned();

        // Step over the closing quote.
        self.pos += 1;

        Ok(Token::Text(text))
    }
}

fn is_ident(c: u8) -> bool {
    c.is_ascii_uppercase() || c.is_ascii_digit() || c == b'_'
}

fn parse_vregister(id: &str) -> Option<u8> {
    let bytes = id.as_bytes();
    if bytes.len() == 2 && bytes[0] == b'V' {
        match bytes[1] {
            b'0'..=b'9' => Some(bytes[1] - b'0'),
            b'A'..=b'F' => Some(bytes[1] - b'A' + 10),
            _ => None,
        }
    } else {
        None
    }
}
