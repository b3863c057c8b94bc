//! Application event loop.
//!
//! One loop multiplexes the two periodic signals with input events:
//! every pass drives the VM clock (the VM self-regulates against wall
//! time), and a 60 Hz gate requests a window redraw. Debugger text
//! (log, memory dumps, disassembly) goes to the terminal.
use std::{
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use chip8::{debug::Debugger, Chip8Vm};
use winit::{
    event::{ElementState, Event as EV, KeyboardInput, ModifiersState, VirtualKeyCode, WindowEvent as WE},
    event_loop::EventLoopBuilder,
    platform::run_return::EventLoopExtRunReturn,
};

use crate::{
    error::AppError, inputmap::chip8_key, render::Render, window::WindowContext, EventLoop,
    Options,
};

/// Lines of log text shown when scrolling.
const LOG_WINDOW: usize = 16;

/// Open the main window and run the emulator.
pub fn run(options: Options) -> Result<(), AppError> {
    let mut event_loop = EventLoopBuilder::new().build();
    let window_ctx = WindowContext::new(&event_loop);
    let mut app = Chip8App::from_window(window_ctx, &options);

    app.run(&mut event_loop)
}

pub struct Chip8App {
    window_ctx: WindowContext,
    render: Render,
    vm: Chip8Vm,
    debugger: Debugger,
    /// Currently loaded ROM/C8 path, for F2 reload and F4 save.
    file: Option<PathBuf>,
    eti: bool,
    include_interpreter: bool,
    modifiers: ModifiersState,
    /// Log lines already written to the terminal.
    printed: usize,
    last_frame: Instant,
}

impl Chip8App {
    pub fn from_window(window_ctx: WindowContext, options: &Options) -> Self {
        let render = Render::new(window_ctx.gl.clone());

        let mut app = Self {
            window_ctx,
            render,
            vm: chip8::load_boot(),
            debugger: Debugger::new(),
            file: None,
            eti: options.eti,
            include_interpreter: options.include_interpreter,
            modifiers: ModifiersState::empty(),
            printed: 0,
            last_frame: Instant::now(),
        };

        app.debugger
            .logger
            .log(format!("CHIP-8 v{}", chip8::IMPL_VERSION));

        if app.eti {
            app.debugger.logger.log("Running in ETI-660 mode");
        }

        if let Some(file) = &options.file {
            app.load(&PathBuf::from(file));
        }

        if options.break_on_start {
            app.debugger.pause();
        }

        app.debugger.logger.logln("Press 'H' for help");

        app
    }

    /// Load a ROM or C8 source file. On failure the dummy ROM is
    /// installed so the emulator stays alive.
    fn load(&mut self, path: &Path) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        self.debugger.logger.logln(format!("Loading {name}"));
        self.file = Some(path.to_owned());

        match chip8::load_file(path, self.eti) {
            Ok(vm) => {
                self.debugger.logger.log(format!("{} bytes", vm.size()));
                self.vm = vm;
            }
            Err(err) => {
                self.debugger.logger.log(err.to_string());
                self.vm = chip8::load_dummy();
            }
        }

        self.debugger.resume();
    }

    /// Replace the VM with the boot ROM.
    fn unload(&mut self) {
        self.debugger.logger.logln("Unloading ROM");
        self.vm = chip8::load_boot();
        self.file = None;
        self.debugger.resume();
    }

    /// Reset the VM, optionally breaking on the first instruction.
    fn reboot(&mut self, break_on_reset: bool) {
        self.vm.reset();

        if break_on_reset {
            self.debugger.pause();
        } else {
            self.debugger.resume();
        }
    }

    /// Save the loaded program next to its source file.
    fn save(&mut self) -> Result<(), AppError> {
        let Some(file) = self.file.clone() else {
            self.debugger.logger.logln("No ROM loaded to save");
            return Ok(());
        };

        let out = file.with_extension("rom");
        chip8::save_rom(&self.vm, &out, self.include_interpreter)?;

        self.debugger
            .logger
            .logln(format!("ROM saved to {}", out.display()));

        Ok(())
    }

    pub fn run(&mut self, event_loop: &mut EventLoop) -> Result<(), AppError> {
        let main_window_id = self.window_ctx.window_id();

        event_loop.run_return(|event, _, control_flow| {
            control_flow.set_poll();

            match event {
                EV::MainEventsCleared => {
                    self.tick();
                }
                EV::RedrawRequested(_) => {
                    self.render.clear_window(0.125, 0.165, 0.208, 1.0);
                    self.render.draw_screen(&self.vm);
                    self.window_ctx.swap_buffers().unwrap();
                }
                EV::WindowEvent { window_id, event } if window_id == main_window_id => {
                    match event {
                        WE::Resized(size) => {
                            self.window_ctx.resize_surface(size);
                            self.render.resize(size);
                        }
                        WE::ModifiersChanged(state) => self.modifiers = state,
                        WE::KeyboardInput { input, .. } => self.on_key(input),
                        WE::DroppedFile(path) => self.load(&path),
                        WE::CloseRequested => control_flow.set_exit(),
                        _ => { /* blank */ }
                    }
                }
                _ => { /* blank */ }
            }
        });

        Ok(())
    }

    /// Drive the VM clock and the 60 Hz video gate.
    fn tick(&mut self) {
        if let Err(err) = self.debugger.process(&mut self.vm) {
            // A runtime fault halts emulation; state stays inspectable.
            self.debugger.logger.logln(err.to_string());
            self.debugger.pause();
        }

        self.flush_log();

        if self.last_frame.elapsed() >= Duration::from_micros(16_666) {
            self.last_frame = Instant::now();
            self.window_ctx.request_redraw();
        }
    }

    fn on_key(&mut self, input: KeyboardInput) {
        let Some(key) = input.virtual_keycode else {
            return;
        };

        match input.state {
            ElementState::Pressed => {
                if let Some(pad) = chip8_key(key) {
                    self.vm.press_key(pad);
                } else {
                    self.on_control_key(key);
                }
            }
            ElementState::Released => {
                if let Some(pad) = chip8_key(key) {
                    self.vm.release_key(pad);
                }
            }
        }
    }

    fn on_control_key(&mut self, key: VirtualKeyCode) {
        use VirtualKeyCode as VK;

        match key {
            VK::Escape => self.unload(),
            VK::Back => self.reboot(self.modifiers.ctrl()),
            VK::F2 => {
                if let Some(file) = self.file.clone() {
                    self.load(&file);
                }
            }
            VK::F4 => {
                if let Err(err) = self.save() {
                    self.debugger.logger.logln(err.to_string());
                }
            }
            VK::F5 | VK::Space => {
                self.debugger.toggle_pause();

                if self.debugger.paused() {
                    self.show_disassembly();
                }
            }
            VK::F6 | VK::F10 => {
                self.step_with(|debugger, vm| debugger.step_over(vm));
            }
            VK::F7 | VK::F11 => {
                if self.modifiers.shift() {
                    self.step_with(|debugger, vm| debugger.step_out(vm));
                } else {
                    self.step_with(|debugger, vm| debugger.step(vm));
                }
            }
            VK::F8 => {
                if self.debugger.paused() {
                    self.debugger.dump_memory(&self.vm);
                }
            }
            VK::F9 => self.debugger.toggle_breakpoint(&mut self.vm),
            VK::LBracket => {
                let pct = self.vm.dec_speed();
                self.debugger.logger.log(format!("Speed {pct}%"));
            }
            VK::RBracket => {
                let pct = self.vm.inc_speed();
                self.debugger.logger.log(format!("Speed {pct}%"));
            }
            VK::Home => {
                self.debugger.logger.home();
                self.show_log_window();
            }
            VK::End => {
                self.debugger.logger.end();
                self.show_log_window();
            }
            VK::Up | VK::PageUp => {
                self.debugger.logger.scroll_up();
                self.show_log_window();
            }
            VK::Down | VK::PageDown => {
                self.debugger.logger.scroll_down(LOG_WINDOW);
                self.show_log_window();
            }
            VK::H => self.help(),
            _ => { /* blank */ }
        }

        self.flush_log();
    }

    /// Run one debugger stepping action and report where it landed.
    fn step_with<F>(&mut self, action: F)
    where
        F: FnOnce(&mut Debugger, &mut Chip8Vm) -> chip8::Chip8Result<()>,
    {
        if !self.debugger.paused() {
            return;
        }

        if let Err(err) = action(&mut self.debugger, &mut self.vm) {
            self.debugger.logger.logln(err.to_string());
            return;
        }

        let pc = self.vm.pc();
        self.debugger.logger.log(self.vm.disassemble(pc));
    }

    /// Print the disassembly window, marking the current instruction
    /// and any breakpoints.
    fn show_disassembly(&mut self) {
        let lines = self.debugger.disassembly(&self.vm);

        self.debugger.logger.logln("Paused");
        for line in lines {
            let marker = match (line.current, line.breakpoint) {
                (true, _) => '>',
                (false, true) => '*',
                (false, false) => ' ',
            };

            self.debugger.logger.log(format!("{marker} {}", line.text));
        }
    }

    /// Print the visible slice of the log after scrolling.
    fn show_log_window(&mut self) {
        println!("--------");
        for line in self.debugger.logger.window(LOG_WINDOW) {
            println!("{line}");
        }
    }

    fn help(&mut self) {
        let logger = &mut self.debugger.logger;

        logger.logln("Keys        | Description");
        logger.log("------------+-------------------------------------");
        logger.log("1..4,Q..R,  | CHIP-8 pad");
        logger.log("A..F,Z..V   |");
        logger.log("ESC         | Unload ROM");
        logger.log("BACK        | Reset (CTRL to reset + break)");
        logger.log("[ / ]       | Decrease/increase speed");
        logger.log("HOME / END  | Scroll log");
        logger.log("PGUP / PGDN | Scroll log");
        logger.log("F2          | Reload ROM/C8 assembler");
        logger.log("F4          | Save ROM");
        logger.log("F5 / SPACE  | Pause/break");
        logger.log("F6 / F10    | Step over");
        logger.log("F7 / F11    | Step into (SHIFT to step out)");
        logger.log("F8          | Memory dump at I");
        logger.log("F9          | Toggle breakpoint");
        logger.log("H           | Help");
    }

    /// Write log lines added since the last flush to the terminal.
    fn flush_log(&mut self) {
        let lines = self.debugger.logger.lines();

        for line in &lines[self.printed..] {
            println!("{line}");
        }

        self.printed = lines.len();
    }
}
