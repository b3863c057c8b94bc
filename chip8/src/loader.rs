//! ROM and source file loading.
use std::{fs, path::Path};

use log::info;

use crate::{
    asm::assemble,
    error::Chip8Result,
    rom::{reserved_image, BOOT, DUMMY},
    vm::Chip8Vm,
};

/// Load a ROM or assembler source file into a new VM.
///
/// A file is binary when any byte is neither whitespace nor graphic;
/// otherwise it is assembled as source text.
pub fn load_file(path: impl AsRef<Path>, eti: bool) -> Chip8Result<Chip8Vm> {
    let bytes = fs::read(path.as_ref())?;
    load_bytes(&bytes, eti)
}

/// Load raw file content, classifying binary ROM vs assembler source.
pub fn load_bytes(bytes: &[u8], eti: bool) -> Chip8Result<Chip8Vm> {
    if is_binary(bytes) {
        info!("loading binary rom, {} bytes", bytes.len());
        return Chip8Vm::load_rom(bytes, eti);
    }

    let assembly = assemble(bytes, eti)?;
    info!("assembled {} bytes", assembly.rom.len());

    Chip8Vm::load_assembly(&assembly)
}

/// VM running the built-in boot ROM, for when nothing is loaded.
pub fn load_boot() -> Chip8Vm {
    Chip8Vm::load_rom(BOOT, false).expect("boot rom fits in memory")
}

/// VM running the built-in dummy ROM, installed after a failed load so
/// the emulator always has something to run.
pub fn load_dummy() -> Chip8Vm {
    Chip8Vm::load_rom(DUMMY, false).expect("dummy rom fits in memory")
}

/// Write the loaded program back to disk, optionally prefixed with the
/// legacy 512-byte interpreter image.
pub fn save_rom(vm: &Chip8Vm, path: impl AsRef<Path>, include_interpreter: bool) -> Chip8Result<()> {
    let mut bytes = Vec::new();

    if include_interpreter {
        bytes.extend_from_slice(&reserved_image());
    }

    bytes.extend_from_slice(vm.rom_bytes());

    fs::write(path.as_ref(), &bytes)?;
    info!("rom saved, {} bytes", bytes.len());

    Ok(())
}

fn is_binary(bytes: &[u8]) -> bool {
    bytes
        .iter()
        .any(|b| !b.is_ascii_whitespace() && !b.is_ascii_graphic())
}
