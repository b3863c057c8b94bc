//! OpenGL renderer for the emulator screen.
//!
//! The VM framebuffer is expanded into an R8 texture sized for the
//! high-res mode and blitted with a single oversized triangle. In
//! low-res mode only the top-left quarter of the texture is sampled.
use std::rc::Rc;

use chip8::Chip8Vm;
use glow::{Context as GlowContext, HasContext, PixelUnpackData};
use winit::dpi::PhysicalSize;

/// Texture extent, matching the 128x64 high-res mode.
const SCREEN_WIDTH: usize = 128;
const SCREEN_HEIGHT: usize = 64;

macro_rules! gl_error {
    ($gl:expr) => {
        #[cfg(debug_assertions)]
        {
            let line = line!();
            let file = file!();
            let _: &glow::Context = &$gl; // type assert
            let mut has_error = false;
            loop {
                let err = $gl.get_error();
                if err == glow::NO_ERROR {
                    break;
                }
                has_error = true;
                log::error!("OpenGL error [{file}:{line}]: 0x{err:04x}");
            }
            if has_error {
                panic!("OpenGL errors. See logs.");
            }
        }
    };
}

macro_rules! shader_error {
    ($gl:expr, $shader:expr, $name:expr) => {{
        let _: &glow::Context = &$gl; // type assert
        let _: &glow::NativeShader = &$shader;
        if !$gl.get_shader_compile_status($shader) {
            log::error!(
                "failed to compile {}: {}",
                $name,
                $gl.get_shader_info_log($shader)
            );
            panic!("shader compilation error");
        }
    }};
}

pub struct Render {
    gl: Rc<GlowContext>,
    program: glow::NativeProgram,
    /// Bound but empty; core profile requires one for draw calls.
    vao: glow::NativeVertexArray,
    texture: glow::NativeTexture,
    u_extent: Option<glow::NativeUniformLocation>,
    pixels: Box<[u8; SCREEN_WIDTH * SCREEN_HEIGHT]>,
}

impl Render {
    pub fn new(gl: Rc<GlowContext>) -> Self {
        let program = Self::compile_shaders(gl.as_ref());
        let (vao, texture) = Self::create_screen(gl.as_ref());

        let u_extent = unsafe { gl.get_uniform_location(program, "u_extent") };

        Self {
            gl,
            program,
            vao,
            texture,
            u_extent,
            pixels: Box::new([0; SCREEN_WIDTH * SCREEN_HEIGHT]),
        }
    }

    fn compile_shaders(gl: &GlowContext) -> glow::NativeProgram {
        log::debug!("compiling shaders");
        unsafe {
            let vert_shader = gl.create_shader(glow::VERTEX_SHADER).unwrap();
            gl.shader_source(vert_shader, include_str!("shader_screen.vert"));
            gl.compile_shader(vert_shader);
            shader_error!(gl, vert_shader, "vertex shader");

            let frag_shader = gl.create_shader(glow::FRAGMENT_SHADER).unwrap();
            gl.shader_source(frag_shader, include_str!("shader_screen.frag"));
            gl.compile_shader(frag_shader);
            shader_error!(gl, frag_shader, "fragment shader");

            let program = gl.create_program().unwrap();
            gl.attach_shader(program, vert_shader);
            gl.attach_shader(program, frag_shader);
            gl.link_program(program);
            if !gl.get_program_link_status(program) {
                let message = gl.get_program_info_log(program);
                log::error!("failed to link shader program: {message}");
            }

            // Shader objects are deleted once detached from the program.
            gl.delete_shader(vert_shader);
            gl.delete_shader(frag_shader);

            program
        }
    }

    fn create_screen(gl: &GlowContext) -> (glow::NativeVertexArray, glow::NativeTexture) {
        log::debug!("creating screen texture");
        unsafe {
            let vao = gl.create_vertex_array().unwrap();

            let texture = gl.create_texture().unwrap();
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));

            gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::R8 as i32,
                SCREEN_WIDTH as i32,
                SCREEN_HEIGHT as i32,
                0,
                glow::RED,
                glow::UNSIGNED_BYTE,
                None,
            );

            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                glow::NEAREST as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MAG_FILTER,
                glow::NEAREST as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_WRAP_S,
                glow::CLAMP_TO_EDGE as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_WRAP_T,
                glow::CLAMP_TO_EDGE as i32,
            );

            gl.bind_texture(glow::TEXTURE_2D, None);
            gl_error!(gl);

            (vao, texture)
        }
    }

    /// Upload the VM framebuffer and draw it to the window.
    pub fn draw_screen(&mut self, vm: &Chip8Vm) {
        let (width, height) = vm.resolution();

        self.pixels.fill(0);
        for y in 0..height {
            for x in 0..width {
                if vm.pixel(y * width + x) {
                    self.pixels[y * SCREEN_WIDTH + x] = 0xFF;
                }
            }
        }

        let gl = self.gl.as_ref();

        unsafe {
            gl.use_program(Some(self.program));

            gl.active_texture(glow::TEXTURE0);
            gl.bind_texture(glow::TEXTURE_2D, Some(self.texture));
            gl.tex_sub_image_2d(
                glow::TEXTURE_2D,
                0,
                0,
                0,
                SCREEN_WIDTH as i32,
                SCREEN_HEIGHT as i32,
                glow::RED,
                glow::UNSIGNED_BYTE,
                PixelUnpackData::Slice(&self.pixels[..]),
            );

            gl.uniform_2_f32(
                self.u_extent.as_ref(),
                width as f32 / SCREEN_WIDTH as f32,
                height as f32 / SCREEN_HEIGHT as f32,
            );

            gl.bind_vertex_array(Some(self.vao));
            gl.draw_arrays(glow::TRIANGLES, 0, 3);

            gl.bind_vertex_array(None);
            gl.bind_texture(glow::TEXTURE_2D, None);
            gl.use_program(None);
            gl_error!(gl);
        }
    }

    pub fn resize(&self, size: PhysicalSize<u32>) {
        unsafe {
            self.gl
                .viewport(0, 0, size.width as i32, size.height as i32);
        }
    }

    pub fn clear_window(&self, red: f32, green: f32, blue: f32, alpha: f32) {
        unsafe {
            self.gl.clear_color(red, green, blue, alpha);
            self.gl.clear(glow::COLOR_BUFFER_BIT);
        }
    }
}

impl Drop for Render {
    fn drop(&mut self) {
        let gl = self.gl.as_ref();

        unsafe {
            gl.delete_texture(self.texture);
            gl.delete_vertex_array(self.vao);
            gl.delete_program(self.program);
        }
    }
}
