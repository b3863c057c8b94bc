//! Assembler.
//!
//! A single pass over the source grows the ROM buffer line by line.
//! Forward references emit a placeholder and are patched after the
//! pass: every address-taking encoding keeps its 12-bit immediate in
//! the low nibble of byte 0 plus all of byte 1, so one fixup rule
//! covers SYS/JP/CALL/LD I and WORD alike.
use std::collections::HashMap;

use log::debug;
use smol_str::SmolStr;

use crate::{
    constants::*,
    error::{AsmError, AsmResult, Chip8Error, Chip8Result},
    rom::ASCII_CHARSET,
    vm::Breakpoint,
};

use super::{
    scanner::TokenScanner,
    tokens::{Mnemonic, Token},
};

/// A completely assembled source file.
#[derive(Debug)]
pub struct Assembly {
    /// Final assembled bytes, starting at `base`.
    pub rom: Vec<u8>,
    /// Address the ROM loads at (0x200, or 0x600 for ETI-660).
    pub base: usize,
    /// Breakpoints declared with BREAK and ASSERT.
    pub breakpoints: Vec<Breakpoint>,
    /// Symbol table: labels bound to address literals, EQU literals or
    /// VAR registers.
    pub labels: HashMap<SmolStr, Token>,
    /// True when SUPER enabled the Super-CHIP instructions.
    pub schip: bool,
    /// True when EXTENDED enabled the CHIP-8E instructions.
    pub chip8e: bool,
}

/// Assemble CHIP-8 source text into a ROM image.
pub fn assemble(source: &[u8], eti: bool) -> Chip8Result<Assembly> {
    let base = if eti { ETI_BASE } else { PROGRAM_BASE };
    let mut asm = Assembler::new(base);

    // Case folding the whole input keeps the scanner trivially
    // case-insensitive; string literals fold with it, matching the
    // upper-case-only CHIP-8E character set.
    let upper = source.to_ascii_uppercase();

    for (index, line) in upper.split(|b| *b == b'\n').enumerate() {
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        asm.assemble_line(line).map_err(|err| err.with_line(index + 1))?;
    }

    asm.fixup()?;
    Ok(asm.finish())
}

struct Assembler {
    /// ROM buffer, preloaded with the reserved `[0, base)` bytes so
    /// `rom.len()` is always the current output address.
    rom: Vec<u8>,
    base: usize,
    labels: HashMap<SmolStr, Token>,
    /// Patch addresses of operands whose label was not yet defined.
    unresolved: HashMap<usize, SmolStr>,
    breakpoints: Vec<Breakpoint>,
    schip: bool,
    chip8e: bool,
}

/// Operand kinds an encoding can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    V,
    Lit,
    I,
    B,
    F,
    HF,
    K,
    Dt,
    St,
    R,
    A,
    /// `[I]` effective address.
    Indirect,
}

impl Assembler {
    fn new(base: usize) -> Self {
        Self {
            rom: vec![0; base],
            base,
            labels: HashMap::new(),
            unresolved: HashMap::new(),
            breakpoints: Vec::new(),
            schip: false,
            chip8e: false,
        }
    }

    fn finish(self) -> Assembly {
        let Assembler {
            mut rom,
            base,
            labels,
            breakpoints,
            schip,
            chip8e,
            ..
        } = self;

        // Drop the reserved prefix; callers place the result at `base`.
        let rom = rom.split_off(base);

        Assembly {
            rom,
            base,
            breakpoints,
            labels,
            schip,
            chip8e,
        }
    }

    /// Assemble one source line.
    fn assemble_line(&mut self, line: &[u8]) -> AsmResult<()> {
        let mut scanner = TokenScanner::new(line);

        let token = match scanner.scan_token()? {
            Token::Label(name) => self.assemble_label(name, &mut scanner)?,
            other => other,
        };

        match token {
            Token::Instruction(mnemonic) => self.assemble_instruction(mnemonic, &mut scanner),
            Token::Super => self.assemble_super(&mut scanner),
            Token::Extended => self.assemble_extended(&mut scanner),
            Token::Break => self.assemble_breakpoint(&mut scanner, false),
            Token::Assert => self.assemble_breakpoint(&mut scanner, true),
            Token::Declare => self.assemble_declare(&mut scanner),
            Token::End(_) => Ok(()),
            _ => Err(AsmError::syntax(0, "unexpected token")),
        }
    }

    /// Bind a label. By default it takes the current address; EQU and
    /// VAR rebind it to a literal or a V register.
    fn assemble_label(&mut self, name: SmolStr, scanner: &mut TokenScanner) -> AsmResult<Token> {
        if self.labels.contains_key(&name) {
            return Err(AsmError::DuplicateLabel {
                name: name.to_string(),
            });
        }

        self.labels
            .insert(name.clone(), Token::Lit(self.rom.len() as i32));

        let token = scanner.scan_token()?;

        if matches!(token, Token::Equ | Token::Var) {
            let value = scanner.scan_token()?;

            let legal = matches!(
                (&token, &value),
                (Token::Equ, Token::Lit(_)) | (Token::Var, Token::V(_))
            );

            if legal {
                self.labels.insert(name, value);

                if matches!(scanner.scan_token()?, Token::End(_)) {
                    return Ok(Token::End(String::new()));
                }
            }

            return Err(AsmError::directive("illegal label assignment"));
        }

        Ok(token)
    }

    /// `DECLARE <name> AS <register|literal>` binds like EQU/VAR.
    fn assemble_declare(&mut self, scanner: &mut TokenScanner) -> AsmResult<()> {
        let name = match scanner.scan_token()? {
            Token::Ref(name) => name,
            _ => return Err(AsmError::directive("expected name after DECLARE")),
        };

        let value = match scanner.scan_token()? {
            Token::As(inner) => *inner,
            _ => return Err(AsmError::directive("expected AS clause")),
        };

        if !matches!(scanner.scan_token()?, Token::End(_)) {
            return Err(AsmError::directive("unexpected token after DECLARE"));
        }

        if self.labels.contains_key(&name) {
            return Err(AsmError::DuplicateLabel {
                name: name.to_string(),
            });
        }

        self.labels.insert(name, value);
        Ok(())
    }

    /// BREAK / ASSERT: emit nothing, note a breakpoint at the current
    /// address with the rest of the line as reason.
    fn assemble_breakpoint(&mut self, scanner: &mut TokenScanner, conditional: bool) -> AsmResult<()> {
        let reason = match scanner.scan_to_end() {
            Token::End(text) => text,
            _ => String::new(),
        };

        self.breakpoints.push(Breakpoint {
            address: self.rom.len(),
            reason,
            conditional,
            once: false,
        });

        Ok(())
    }

    fn assemble_super(&mut self, scanner: &mut TokenScanner) -> AsmResult<()> {
        if !matches!(scanner.scan_token()?, Token::End(_)) {
            return Err(AsmError::directive("unexpected token after SUPER"));
        }

        if self.rom.len() > self.base {
            return Err(AsmError::directive("SUPER must come before instructions"));
        }

        self.schip = true;
        Ok(())
    }

    fn assemble_extended(&mut self, scanner: &mut TokenScanner) -> AsmResult<()> {
        if !matches!(scanner.scan_token()?, Token::End(_)) {
            return Err(AsmError::directive("unexpected token after EXTENDED"));
        }

        if self.rom.len() > self.base {
            return Err(AsmError::directive("EXTENDED must come before instructions"));
        }

        self.chip8e = true;
        Ok(())
    }

    /// Assemble one instruction or data directive.
    fn assemble_instruction(&mut self, mnemonic: Mnemonic, scanner: &mut TokenScanner) -> AsmResult<()> {
        use Mnemonic as M;

        let operands = scanner.scan_operands()?;

        let bytes = match mnemonic {
            M::Cls => self.emit_bare(mnemonic, &operands, [0x00, 0xE0])?,
            M::Ret => self.emit_bare(mnemonic, &operands, [0x00, 0xEE])?,
            M::Exit => self.emit_schip_bare(mnemonic, &operands, [0x00, 0xFD])?,
            M::Low => self.emit_schip_bare(mnemonic, &operands, [0x00, 0xFE])?,
            M::High => self.emit_schip_bare(mnemonic, &operands, [0x00, 0xFF])?,
            M::Scr => self.emit_schip_bare(mnemonic, &operands, [0x00, 0xFB])?,
            M::Scl => self.emit_schip_bare(mnemonic, &operands, [0x00, 0xFC])?,
            M::Scu => self.emit_scroll(mnemonic, &operands, 0xB0)?,
            M::Scd => self.emit_scroll(mnemonic, &operands, 0xC0)?,
            M::Sys => self.emit_addr(mnemonic, &operands, 0x00)?,
            M::Jp => self.emit_jp(&operands)?,
            M::Call => self.emit_addr(mnemonic, &operands, 0x20)?,
            M::Se => self.emit_skip(mnemonic, &operands, 0x30, 0x50, 0x00)?,
            M::Sne => self.emit_skip(mnemonic, &operands, 0x40, 0x90, 0x00)?,
            M::Sgt => self.emit_chip8e_xy(mnemonic, &operands, 0x50, 0x01)?,
            M::Slt => self.emit_chip8e_xy(mnemonic, &operands, 0x50, 0x02)?,
            M::Skp => self.emit_key_skip(mnemonic, &operands, 0x9E)?,
            M::Sknp => self.emit_key_skip(mnemonic, &operands, 0xA1)?,
            M::Or => self.emit_alu(mnemonic, &operands, 0x01)?,
            M::And => self.emit_alu(mnemonic, &operands, 0x02)?,
            M::Xor => self.emit_alu(mnemonic, &operands, 0x03)?,
            M::Shr => self.emit_shift(mnemonic, &operands, 0x06)?,
            M::Shl => self.emit_shift(mnemonic, &operands, 0x0E)?,
            M::Add => self.emit_add(&operands)?,
            M::Sub => self.emit_alu(mnemonic, &operands, 0x05)?,
            M::Subn => self.emit_alu(mnemonic, &operands, 0x07)?,
            M::Mul => self.emit_chip8e_xy(mnemonic, &operands, 0x90, 0x01)?,
            M::Div => self.emit_chip8e_xy(mnemonic, &operands, 0x90, 0x02)?,
            M::Bcd => self.emit_bcd(&operands)?,
            M::Rnd => self.emit_rnd(&operands)?,
            M::Drw => self.emit_drw(&operands)?,
            M::Ld => self.emit_ld(&operands)?,
            M::Ascii => self.emit_ascii(&operands)?,
            M::Byte => self.emit_byte(&operands)?,
            M::Word => self.emit_word(&operands)?,
            M::Align => self.emit_align(&operands)?,
            M::Pad => self.emit_pad(&operands)?,
        };

        debug!(
            "emit {:04X}: {} {:02X?}",
            self.rom.len(),
            mnemonic.as_str(),
            bytes
        );

        self.rom.extend_from_slice(&bytes);
        Ok(())
    }

    /// Expand a single operand: label references become their bound
    /// token, or a placeholder address recorded for the final fixup.
    /// `offset` is how many bytes the current directive has already
    /// produced, so the patch lands on the operand's own output slot.
    fn expand(&mut self, token: &Token, offset: usize) -> Token {
        if let Token::Ref(name) = token {
            match self.labels.get(name) {
                Some(value) => value.clone(),
                None => {
                    self.unresolved.insert(self.rom.len() + offset, name.clone());
                    Token::Lit(self.base as i32)
                }
            }
        } else {
            token.clone()
        }
    }

    /// Match operands against a shape tuple, expanding references.
    /// Returns the expanded operands on a full match.
    fn match_operands(&mut self, tokens: &[Token], shapes: &[Shape]) -> Option<Vec<Token>> {
        if tokens.len() != shapes.len() {
            return None;
        }

        let mut ops = Vec::with_capacity(shapes.len());

        for (token, &shape) in tokens.iter().zip(shapes) {
            let token = self.expand(token, 0);

            if !shape_matches(shape, &token) {
                return None;
            }

            ops.push(token);
        }

        Some(ops)
    }

    // ------------------------------------------------------------------------
    // Encoders

    fn emit_bare(&mut self, m: Mnemonic, tokens: &[Token], code: [u8; 2]) -> AsmResult<Vec<u8>> {
        if tokens.is_empty() {
            return Ok(code.to_vec());
        }

        Err(illegal(m))
    }

    fn emit_schip_bare(&mut self, m: Mnemonic, tokens: &[Token], code: [u8; 2]) -> AsmResult<Vec<u8>> {
        if self.schip && tokens.is_empty() {
            return Ok(code.to_vec());
        }

        Err(illegal(m))
    }

    /// SCU / SCD: 00BN / 00CN.
    fn emit_scroll(&mut self, m: Mnemonic, tokens: &[Token], code: u8) -> AsmResult<Vec<u8>> {
        if self.schip {
            if let Some(ops) = self.match_operands(tokens, &[Shape::Lit]) {
                let n = lit(&ops[0]);

                if (0..0x10).contains(&n) {
                    return Ok(vec![0x00, code | n as u8]);
                }
            }
        }

        Err(illegal(m))
    }

    /// SYS / CALL: high nibble plus a 12-bit address.
    fn emit_addr(&mut self, m: Mnemonic, tokens: &[Token], code: u8) -> AsmResult<Vec<u8>> {
        if let Some(ops) = self.match_operands(tokens, &[Shape::Lit]) {
            let a = lit(&ops[0]);

            if (0..0x1000).contains(&a) {
                return Ok(vec![code | (a >> 8) as u8, (a & 0xFF) as u8]);
            }
        }

        Err(illegal(m))
    }

    /// JP NNN (1NNN) and JP V0, NNN (BNNN).
    fn emit_jp(&mut self, tokens: &[Token]) -> AsmResult<Vec<u8>> {
        if let Some(ops) = self.match_operands(tokens, &[Shape::Lit]) {
            let a = lit(&ops[0]);

            if (0..0x1000).contains(&a) {
                return Ok(vec![0x10 | (a >> 8) as u8, (a & 0xFF) as u8]);
            }
        }

        if let Some(ops) = self.match_operands(tokens, &[Shape::V, Shape::Lit]) {
            let v = vx(&ops[0]);
            let a = lit(&ops[1]);

            if v == 0 && (0..0x1000).contains(&a) {
                return Ok(vec![0xB0 | (a >> 8) as u8, (a & 0xFF) as u8]);
            }
        }

        Err(illegal(Mnemonic::Jp))
    }

    /// SE / SNE against a byte (3XKK/4XKK) or a register (5XY0/9XY0).
    fn emit_skip(
        &mut self,
        m: Mnemonic,
        tokens: &[Token],
        byte_code: u8,
        reg_code: u8,
        reg_n: u8,
    ) -> AsmResult<Vec<u8>> {
        if let Some(ops) = self.match_operands(tokens, &[Shape::V, Shape::Lit]) {
            let x = vx(&ops[0]);
            let b = lit(&ops[1]);

            if byte_range(b) {
                return Ok(vec![byte_code | x, b as u8]);
            }
        }

        if let Some(ops) = self.match_operands(tokens, &[Shape::V, Shape::V]) {
            let x = vx(&ops[0]);
            let y = vx(&ops[1]);

            return Ok(vec![reg_code | x, y << 4 | reg_n]);
        }

        Err(illegal(m))
    }

    /// SKP / SKNP: EX9E / EXA1.
    fn emit_key_skip(&mut self, m: Mnemonic, tokens: &[Token], code: u8) -> AsmResult<Vec<u8>> {
        if let Some(ops) = self.match_operands(tokens, &[Shape::V]) {
            let x = vx(&ops[0]);

            return Ok(vec![0xE0 | x, code]);
        }

        Err(illegal(m))
    }

    /// OR/AND/XOR/SUB/SUBN: 8XYn.
    fn emit_alu(&mut self, m: Mnemonic, tokens: &[Token], n: u8) -> AsmResult<Vec<u8>> {
        if let Some(ops) = self.match_operands(tokens, &[Shape::V, Shape::V]) {
            let x = vx(&ops[0]);
            let y = vx(&ops[1]);

            return Ok(vec![0x80 | x, y << 4 | n]);
        }

        Err(illegal(m))
    }

    /// SHR / SHL: single-register form with X mirrored into Y.
    fn emit_shift(&mut self, m: Mnemonic, tokens: &[Token], n: u8) -> AsmResult<Vec<u8>> {
        if let Some(ops) = self.match_operands(tokens, &[Shape::V]) {
            let x = vx(&ops[0]);

            return Ok(vec![0x80 | x, x << 4 | n]);
        }

        Err(illegal(m))
    }

    /// Mode-guarded CHIP-8E register pair forms (SGT/SLT/MUL/DIV).
    fn emit_chip8e_xy(&mut self, m: Mnemonic, tokens: &[Token], code: u8, n: u8) -> AsmResult<Vec<u8>> {
        if self.chip8e {
            if let Some(ops) = self.match_operands(tokens, &[Shape::V, Shape::V]) {
                let x = vx(&ops[0]);
                let y = vx(&ops[1]);

                return Ok(vec![code | x, y << 4 | n]);
            }
        }

        Err(illegal(m))
    }

    /// ADD Vx,KK (7XKK), ADD Vx,Vy (8XY4), ADD I,Vx (FX1E).
    fn emit_add(&mut self, tokens: &[Token]) -> AsmResult<Vec<u8>> {
        if let Some(ops) = self.match_operands(tokens, &[Shape::V, Shape::Lit]) {
            let x = vx(&ops[0]);
            let b = lit(&ops[1]);

            if byte_range(b) {
                return Ok(vec![0x70 | x, b as u8]);
            }
        }

        if let Some(ops) = self.match_operands(tokens, &[Shape::V, Shape::V]) {
            let x = vx(&ops[0]);
            let y = vx(&ops[1]);

            return Ok(vec![0x80 | x, y << 4 | 0x04]);
        }

        if let Some(ops) = self.match_operands(tokens, &[Shape::I, Shape::V]) {
            let x = vx(&ops[1]);

            return Ok(vec![0xF0 | x, 0x1E]);
        }

        Err(illegal(Mnemonic::Add))
    }

    /// BCD Vx (FX33) and the 16-bit CHIP-8E BCD Vx,Vy (9XY3).
    fn emit_bcd(&mut self, tokens: &[Token]) -> AsmResult<Vec<u8>> {
        if let Some(ops) = self.match_operands(tokens, &[Shape::V]) {
            let x = vx(&ops[0]);

            return Ok(vec![0xF0 | x, 0x33]);
        }

        if self.chip8e {
            if let Some(ops) = self.match_operands(tokens, &[Shape::V, Shape::V]) {
                let x = vx(&ops[0]);
                let y = vx(&ops[1]);

                return Ok(vec![0x90 | x, y << 4 | 0x03]);
            }
        }

        Err(illegal(Mnemonic::Bcd))
    }

    fn emit_rnd(&mut self, tokens: &[Token]) -> AsmResult<Vec<u8>> {
        if let Some(ops) = self.match_operands(tokens, &[Shape::V, Shape::Lit]) {
            let x = vx(&ops[0]);
            let b = lit(&ops[1]);

            if byte_range(b) {
                return Ok(vec![0xC0 | x, b as u8]);
            }
        }

        Err(illegal(Mnemonic::Rnd))
    }

    fn emit_drw(&mut self, tokens: &[Token]) -> AsmResult<Vec<u8>> {
        if let Some(ops) = self.match_operands(tokens, &[Shape::V, Shape::V, Shape::Lit]) {
            let x = vx(&ops[0]);
            let y = vx(&ops[1]);
            let n = lit(&ops[2]);

            if (0..0x10).contains(&n) {
                return Ok(vec![0xD0 | x, y << 4 | n as u8]);
            }
        }

        Err(illegal(Mnemonic::Drw))
    }

    /// The LD family covers most of the 0xF page plus 6XKK/8XY0/ANNN.
    fn emit_ld(&mut self, tokens: &[Token]) -> AsmResult<Vec<u8>> {
        if let Some(ops) = self.match_operands(tokens, &[Shape::V, Shape::Lit]) {
            let x = vx(&ops[0]);
            let b = lit(&ops[1]);

            if byte_range(b) {
                return Ok(vec![0x60 | x, b as u8]);
            }
        }

        if let Some(ops) = self.match_operands(tokens, &[Shape::V, Shape::V]) {
            let x = vx(&ops[0]);
            let y = vx(&ops[1]);

            return Ok(vec![0x80 | x, y << 4]);
        }

        if let Some(ops) = self.match_operands(tokens, &[Shape::I, Shape::Lit]) {
            let a = lit(&ops[1]);

            if (0..0x1000).contains(&a) {
                return Ok(vec![0xA0 | (a >> 8) as u8, (a & 0xFF) as u8]);
            }
        }

        if let Some(ops) = self.match_operands(tokens, &[Shape::V, Shape::Dt]) {
            return Ok(vec![0xF0 | vx(&ops[0]), 0x07]);
        }

        if let Some(ops) = self.match_operands(tokens, &[Shape::V, Shape::K]) {
            return Ok(vec![0xF0 | vx(&ops[0]), 0x0A]);
        }

        if let Some(ops) = self.match_operands(tokens, &[Shape::Dt, Shape::V]) {
            return Ok(vec![0xF0 | vx(&ops[1]), 0x15]);
        }

        if let Some(ops) = self.match_operands(tokens, &[Shape::St, Shape::V]) {
            return Ok(vec![0xF0 | vx(&ops[1]), 0x18]);
        }

        if let Some(ops) = self.match_operands(tokens, &[Shape::F, Shape::V]) {
            return Ok(vec![0xF0 | vx(&ops[1]), 0x29]);
        }

        // LD B, Vx is the load-shaped alias of BCD Vx.
        if let Some(ops) = self.match_operands(tokens, &[Shape::B, Shape::V]) {
            return Ok(vec![0xF0 | vx(&ops[1]), 0x33]);
        }

        if let Some(ops) = self.match_operands(tokens, &[Shape::Indirect, Shape::V]) {
            return Ok(vec![0xF0 | vx(&ops[1]), 0x55]);
        }

        if let Some(ops) = self.match_operands(tokens, &[Shape::V, Shape::Indirect]) {
            return Ok(vec![0xF0 | vx(&ops[0]), 0x65]);
        }

        if self.schip {
            if let Some(ops) = self.match_operands(tokens, &[Shape::HF, Shape::V]) {
                return Ok(vec![0xF0 | vx(&ops[1]), 0x30]);
            }

            if let Some(ops) = self.match_operands(tokens, &[Shape::R, Shape::V]) {
                let x = vx(&ops[1]);

                if x < 8 {
                    return Ok(vec![0xF0 | x, 0x75]);
                }
            }

            if let Some(ops) = self.match_operands(tokens, &[Shape::V, Shape::R]) {
                let x = vx(&ops[0]);

                if x < 8 {
                    return Ok(vec![0xF0 | x, 0x85]);
                }
            }
        }

        if self.chip8e {
            if let Some(ops) = self.match_operands(tokens, &[Shape::A, Shape::V]) {
                return Ok(vec![0xF0 | vx(&ops[1]), 0x94]);
            }
        }

        Err(illegal(Mnemonic::Ld))
    }

    /// ASCII "..." encodes one 6-bit table index per character.
    fn emit_ascii(&mut self, tokens: &[Token]) -> AsmResult<Vec<u8>> {
        if !self.chip8e {
            return Err(AsmError::directive("ASCII requires EXTENDED mode"));
        }

        let mut bytes = Vec::new();

        for token in tokens {
            let text = match self.expand(token, bytes.len()) {
                Token::Text(text) => text,
                _ => return Err(AsmError::directive("expected ascii string")),
            };

            for c in text.chars() {
                match ASCII_CHARSET.find(c) {
                    Some(index) => bytes.push(index as u8),
                    None => {
                        return Err(AsmError::directive(format!(
                            "invalid CHIP-8E ascii character {c:?}"
                        )))
                    }
                }
            }
        }

        Ok(bytes)
    }

    /// BYTE: literals in byte range, or raw string bytes.
    fn emit_byte(&mut self, tokens: &[Token]) -> AsmResult<Vec<u8>> {
        let mut bytes = Vec::new();

        for token in tokens {
            match self.expand(token, bytes.len()) {
                Token::Lit(value) if byte_range(value) => bytes.push(value as u8),
                Token::Lit(_) => return Err(AsmError::directive("invalid byte")),
                Token::Text(text) => bytes.extend_from_slice(text.as_bytes()),
                _ => return Err(AsmError::directive("invalid byte operand")),
            }
        }

        Ok(bytes)
    }

    /// WORD: 16-bit literals, MSB first.
    fn emit_word(&mut self, tokens: &[Token]) -> AsmResult<Vec<u8>> {
        let mut bytes = Vec::new();

        for token in tokens {
            match self.expand(token, bytes.len()) {
                Token::Lit(value) if (-0x8000..=0xFFFF).contains(&value) => {
                    bytes.push((value >> 8) as u8);
                    bytes.push(value as u8);
                }
                _ => return Err(AsmError::directive("invalid word")),
            }
        }

        Ok(bytes)
    }

    /// ALIGN n: zero-fill until the output address is a multiple of n.
    fn emit_align(&mut self, tokens: &[Token]) -> AsmResult<Vec<u8>> {
        if let Some(ops) = self.match_operands(tokens, &[Shape::Lit]) {
            let n = lit(&ops[0]);

            if n > 0 && n & (n - 1) == 0 {
                let n = n as usize;
                let pad = (n - (self.rom.len() & (n - 1))) & (n - 1);

                return Ok(vec![0; pad]);
            }
        }

        Err(AsmError::directive("illegal alignment"))
    }

    /// PAD n: reserve n zero bytes.
    fn emit_pad(&mut self, tokens: &[Token]) -> AsmResult<Vec<u8>> {
        if let Some(ops) = self.match_operands(tokens, &[Shape::Lit]) {
            let n = lit(&ops[0]);

            if n >= 0 && self.rom.len() + n as usize <= MEM_SIZE {
                return Ok(vec![0; n as usize]);
            }
        }

        Err(AsmError::directive("illegal pad size"))
    }

    /// Patch every unresolved reference now that all labels are known.
    fn fixup(&mut self) -> Chip8Result<()> {
        let unresolved = std::mem::take(&mut self.unresolved);

        for (address, name) in unresolved {
            match self.labels.get(&name) {
                Some(Token::Lit(value)) => {
                    let value = *value as u16;

                    self.rom[address] = (self.rom[address] & 0xF0) | ((value >> 8) as u8 & 0x0F);
                    self.rom[address + 1] = value as u8;
                }
                _ => {
                    return Err(Chip8Error::UnresolvedLabel {
                        name: name.to_string(),
                    })
                }
            }
        }

        Ok(())
    }
}

fn shape_matches(shape: Shape, token: &Token) -> bool {
    match shape {
        Shape::V => matches!(token, Token::V(_)),
        Shape::Lit => matches!(token, Token::Lit(_)),
        Shape::I => matches!(token, Token::I),
        Shape::B => matches!(token, Token::B),
        Shape::F => matches!(token, Token::F),
        Shape::HF => matches!(token, Token::HF),
        Shape::K => matches!(token, Token::K),
        Shape::Dt => matches!(token, Token::DT),
        Shape::St => matches!(token, Token::ST),
        Shape::R => matches!(token, Token::R),
        Shape::A => matches!(token, Token::A),
        Shape::Indirect => matches!(token, Token::Address(inner) if **inner == Token::I),
    }
}

fn illegal(m: Mnemonic) -> AsmError {
    AsmError::IllegalInstruction {
        mnemonic: m.as_str().to_string(),
    }
}

fn lit(token: &Token) -> i32 {
    match token {
        Token::Lit(value) => *value,
        _ => unreachable!("shape match guarantees a literal"),
    }
}

fn vx(token: &Token) -> u8 {
    match token {
        Token::V(x) => *x,
        _ => unreachable!("shape match guarantees a register"),
    }
}

fn byte_range(value: i32) -> bool {
    (-0x80..=0xFF).contains(&value)
}
