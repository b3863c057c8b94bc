//! Debugger controller.
//!
//! The semantics live here: pause state, stepping, the memory dump and
//! the disassembly window the host renders. How the text gets on the
//! screen is the host's business.
use itertools::Itertools;

use crate::{
    constants::MEM_SIZE,
    error::Chip8Result,
    vm::{Breakpoint, Chip8Vm, Flow},
};

/// Rows shown by a memory dump.
const DUMP_ROWS: usize = 6;

/// Bytes per memory dump row.
const DUMP_COLS: usize = 12;

/// Instructions shown by the disassembly window.
const WINDOW_LINES: usize = 19;

/// Scrollable log of debugger output. The buffer is kept across ROM
/// loads; `pos` is the user's read position.
#[derive(Debug, Default)]
pub struct Logger {
    buf: Vec<String>,
    pos: usize,
}

impl Logger {
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(100),
            pos: 0,
        }
    }

    /// Append a line. The read position follows the tail unless the
    /// user scrolled away.
    pub fn log(&mut self, line: impl Into<String>) {
        let follow = self.pos == self.buf.len();

        self.buf.push(line.into());

        if follow {
            self.pos = self.buf.len();
        }
    }

    /// Append a line with a blank separator before it.
    pub fn logln(&mut self, line: impl Into<String>) {
        let follow = self.pos == self.buf.len();

        self.buf.push(String::new());
        self.buf.push(line.into());

        if follow {
            self.pos = self.buf.len();
        }
    }

    /// The `n` lines ending at the read position.
    pub fn window(&self, n: usize) -> &[String] {
        let start = self.pos.saturating_sub(n);

        if start + n >= self.buf.len() {
            &self.buf[start..]
        } else {
            &self.buf[start..start + n]
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn home(&mut self) {
        self.pos = 0;
    }

    pub fn end(&mut self) {
        self.pos = self.buf.len();
    }

    pub fn scroll_up(&mut self) {
        self.pos = self.pos.saturating_sub(1);
    }

    pub fn scroll_down(&mut self, window: usize) {
        self.pos += 1;

        // No point scrolling into the leading empty area.
        if self.pos <= window {
            self.pos = window + 1;
        }

        if self.pos >= self.buf.len() {
            self.end();
        }
    }
}

/// One rendered line of the disassembly window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisasmLine {
    pub address: usize,
    pub text: String,
    /// This line is the current instruction.
    pub current: bool,
    /// A breakpoint is set on this line.
    pub breakpoint: bool,
}

/// Sliding window of disassembled instructions around the PC.
///
/// The base address W only moves when the PC walks out of the window,
/// and always keeps the PC's parity so the current instruction stays
/// aligned with a rendered line: `PC-38 < W <= PC-2`.
#[derive(Debug, Default)]
pub struct DisasmWindow {
    base: usize,
}

impl DisasmWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&mut self, vm: &Chip8Vm) -> Vec<DisasmLine> {
        let pc = vm.pc();

        let keep = self.base + 2 <= pc
            && pc < self.base + (WINDOW_LINES * 2)
            && (self.base ^ pc) & 1 == 0;

        if !keep {
            self.base = pc.saturating_sub(2);
        }

        (0..WINDOW_LINES * 2)
            .step_by(2)
            .map(|offset| {
                let address = self.base + offset;

                DisasmLine {
                    address,
                    text: vm.disassemble(address),
                    current: address == pc,
                    breakpoint: vm.has_breakpoint(address),
                }
            })
            .collect()
    }
}

/// Render six rows of twelve bytes starting at the I register.
pub fn memory_dump(vm: &Chip8Vm) -> Vec<String> {
    let memory = vm.memory();
    let start = vm.i();

    (0..DUMP_ROWS)
        .map(|row| {
            let at = start + row * DUMP_COLS;

            let bytes = (at..at + DUMP_COLS)
                .map(|addr| {
                    if addr < MEM_SIZE {
                        format!("{:02X}", memory[addr])
                    } else {
                        String::new()
                    }
                })
                .join(" ");

            format!(" {at:04X} - {}", bytes.trim_end())
        })
        .collect()
}

/// Interactive debugger state driving a VM between steps.
pub struct Debugger {
    pub logger: Logger,
    window: DisasmWindow,
    paused: bool,
}

impl Default for Debugger {
    fn default() -> Self {
        Self::new()
    }
}

impl Debugger {
    pub fn new() -> Self {
        Self {
            logger: Logger::new(),
            window: DisasmWindow::new(),
            paused: false,
        }
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Drive the VM for one host clock tick, honoring the pause state
    /// and logging any breakpoint hit.
    pub fn process(&mut self, vm: &mut Chip8Vm) -> Chip8Result<()> {
        if let Flow::Break(breakpoint) = vm.process(self.paused)? {
            self.on_break(&breakpoint);
        }

        Ok(())
    }

    /// Single-step the current instruction. Only meaningful while
    /// paused.
    pub fn step(&mut self, vm: &mut Chip8Vm) -> Chip8Result<()> {
        if self.paused {
            if let Flow::Break(breakpoint) = vm.step()? {
                self.on_break(&breakpoint);
            }
        }

        Ok(())
    }

    /// Step over a CALL by arming a one-shot breakpoint after it and
    /// resuming; otherwise a plain step.
    pub fn step_over(&mut self, vm: &mut Chip8Vm) -> Chip8Result<()> {
        if self.paused {
            if vm.step_over_breakpoint() {
                self.paused = false;
            } else {
                self.step(vm)?;
            }
        }

        Ok(())
    }

    /// Run until the current subroutine returns.
    pub fn step_out(&mut self, vm: &mut Chip8Vm) -> Chip8Result<()> {
        if self.paused {
            if let Flow::Break(breakpoint) = vm.step_out()? {
                self.on_break(&breakpoint);
            }
        }

        Ok(())
    }

    pub fn toggle_breakpoint(&mut self, vm: &mut Chip8Vm) {
        if self.paused {
            vm.toggle_breakpoint();
        }
    }

    /// Log a 6x12 memory dump at I.
    pub fn dump_memory(&mut self, vm: &Chip8Vm) {
        self.logger.logln("Memory dump at I...");

        for line in memory_dump(vm) {
            self.logger.log(line);
        }
    }

    /// The disassembly window around the current PC.
    pub fn disassembly(&mut self, vm: &Chip8Vm) -> Vec<DisasmLine> {
        self.window.lines(vm)
    }

    /// A breakpoint tripped: pause, and log it unless it was a silent
    /// one-shot from step-over.
    pub fn on_break(&mut self, breakpoint: &Breakpoint) {
        if !breakpoint.once {
            self.logger.logln(breakpoint.to_string());
        }

        self.paused = true;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_logger_follows_tail() {
        let mut logger = Logger::new();
        logger.log("one");
        logger.log("two");
        logger.logln("three");

        assert_eq!(logger.lines(), &["one", "two", "", "three"]);
        assert_eq!(logger.window(2), &["", "three"]);
    }

    #[test]
    fn test_logger_scrolling() {
        let mut logger = Logger::new();
        for n in 0..10 {
            logger.log(format!("line {n}"));
        }

        logger.scroll_up();
        logger.scroll_up();
        assert_eq!(logger.window(2), &["line 6", "line 7"]);

        // New lines don't move a scrolled-away position.
        logger.log("line 10");
        assert_eq!(logger.window(2), &["line 6", "line 7"]);

        logger.end();
        assert_eq!(logger.window(2), &["line 9", "line 10"]);

        logger.home();
        assert_eq!(logger.window(2), &["line 0", "line 1"]);
    }

    fn test_vm(source: &[u8]) -> Chip8Vm {
        let assembly = crate::asm::assemble(source, false).unwrap();
        Chip8Vm::load_assembly(&assembly).unwrap()
    }

    #[test]
    fn test_disasm_window_tracks_pc() {
        let mut vm = test_vm(b"  LD V0, #01\n  LD V1, #02\n  JP #0200\n");
        let mut window = DisasmWindow::new();

        let lines = window.lines(&vm);
        assert_eq!(lines.len(), WINDOW_LINES);

        // The base settles one instruction above the PC.
        assert_eq!(lines[0].address, 0x1FE);
        assert!(lines[1].current);
        assert_eq!(lines[1].address, 0x200);

        // The base holds while the PC walks forward inside the window.
        vm.step().unwrap();
        let lines = window.lines(&vm);
        assert_eq!(lines[0].address, 0x1FE);
        assert!(lines[2].current);
    }

    #[test]
    fn test_debugger_pause_and_step() {
        let mut vm = test_vm(b"  LD V0, #01\n  JP #0200\n");
        let mut debugger = Debugger::new();

        // Stepping does nothing until paused.
        debugger.step(&mut vm).unwrap();
        assert_eq!(vm.pc(), 0x200);

        debugger.pause();
        debugger.step(&mut vm).unwrap();
        assert_eq!(vm.pc(), 0x202);

        // Processing while paused fast-forwards without executing.
        debugger.process(&mut vm).unwrap();
        assert_eq!(vm.pc(), 0x202);
    }

    #[test]
    fn test_debugger_logs_breakpoint() {
        let mut vm = test_vm(b"  LD V0, #01\n  JP #0200\n");
        let mut debugger = Debugger::new();

        vm.set_breakpoint(crate::vm::Breakpoint {
            address: 0x202,
            reason: "checkpoint".into(),
            conditional: false,
            once: false,
        });

        // The break pauses emulation and lands in the log.
        if let crate::vm::Flow::Break(breakpoint) = vm.step().unwrap() {
            debugger.on_break(&breakpoint);
        }

        assert!(debugger.paused());
        assert!(debugger
            .logger
            .lines()
            .iter()
            .any(|line| line.contains("checkpoint")));
    }

    #[test]
    fn test_memory_dump_shape() {
        let vm = crate::vm::Chip8Vm::load_rom(&[0x12, 0x00], false).unwrap();
        let rows = memory_dump(&vm);

        assert_eq!(rows.len(), DUMP_ROWS);
        // I is zero after load; the first row shows the small font.
        assert!(rows[0].starts_with(" 0000 - F0 90 90 90 F0"));
    }
}
