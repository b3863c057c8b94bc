pub mod asm;
mod audio;
mod clock;
pub mod constants;
pub mod debug;
mod disasm;
mod error;
mod loader;
mod rom;
mod vm;

pub use self::{
    asm::{assemble, Assembly},
    audio::Tone,
    disasm::disassemble,
    error::{AsmError, Chip8Error, Chip8Result},
    loader::{load_boot, load_bytes, load_dummy, load_file, save_rom},
    vm::{Breakpoint, Chip8Vm, Flow, SoundHandle},
};

/// Version of *this* implementation.
pub const IMPL_VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod prelude {
    pub use super::{
        debug::{Debugger, Logger},
        disasm::disassemble,
        error::{Chip8Error, Chip8Result},
        vm::{Breakpoint, Chip8Vm, Flow},
    };
}
