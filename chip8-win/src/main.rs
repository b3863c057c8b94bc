//! Entrypoint for the emulator front end.
mod app;
mod error;
mod inputmap;
mod render;
mod window;

use std::{env, process};

use log::{error, info};

pub type EventLoop = winit::event_loop::EventLoop<()>;

static USAGE: &str = r#"
usage: chip8 [-a] [-b] [-eti] [-i] [-o FILE] [ROM|C8]

flags:
    -a       Assemble only; no window is opened
    -b       Break on the first instruction
    -eti     Load at 0x600 for the ETI-660
    -i       Prepend the 512 byte interpreter when saving
    -o FILE  Write the assembled ROM to FILE

examples:
    chip8 games/pong.rom
    chip8 -b games/maze.c8
    chip8 -a -o invaders.rom invaders.c8
"#;

/// Parsed command line.
pub struct Options {
    pub assemble_only: bool,
    pub break_on_start: bool,
    pub eti: bool,
    pub include_interpreter: bool,
    pub output: Option<String>,
    pub file: Option<String>,
}

fn main() {
    simple_logger::SimpleLogger::new().env().init().unwrap();

    let Some(options) = parse_args() else {
        print_usage();
        // FreeBSD EX_USAGE (64)
        process::exit(64);
    };

    if options.assemble_only {
        process::exit(run_assembler(&options));
    }

    if let Err(err) = app::run(options) {
        error!("{err}");
        process::exit(1);
    }
}

/// Headless mode: load or assemble the file, optionally writing the
/// ROM image back out.
fn run_assembler(options: &Options) -> i32 {
    let Some(file) = options.file.as_deref() else {
        print_usage();
        return 64;
    };

    let vm = match chip8::load_file(file, options.eti) {
        Ok(vm) => vm,
        Err(err) => {
            error!("{err}");
            return 1;
        }
    };

    info!("assembled {file}: {} bytes", vm.size());

    if let Some(output) = options.output.as_deref() {
        if let Err(err) = chip8::save_rom(&vm, output, options.include_interpreter) {
            error!("{err}");
            return 1;
        }

        info!("rom written to {output}");
    }

    0
}

fn parse_args() -> Option<Options> {
    let mut options = Options {
        assemble_only: false,
        break_on_start: false,
        eti: false,
        include_interpreter: false,
        output: None,
        file: None,
    };

    let mut args = env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-a" => options.assemble_only = true,
            "-b" => options.break_on_start = true,
            "-eti" => options.eti = true,
            "-i" => options.include_interpreter = true,
            "-o" => options.output = Some(args.next()?),
            _ if arg.starts_with('-') => return None,
            _ => {
                // At most one positional file argument.
                if options.file.is_some() {
                    return None;
                }
                options.file = Some(arg);
            }
        }
    }

    Some(options)
}

fn print_usage() {
    println!("CHIP-8 v{}", chip8::IMPL_VERSION);
    println!("{USAGE}");
}
