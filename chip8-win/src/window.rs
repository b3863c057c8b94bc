//! Window and OpenGL context bootstrap.
use std::num::NonZeroU32;
use std::rc::Rc;

use glutin::config::ConfigTemplateBuilder;
use glutin::context::{ContextApi, ContextAttributesBuilder, GlProfile, Version as GlVersion};
use glutin::display::GetGlDisplay;
use glutin::prelude::*;
use glutin::surface::{GlSurface, SwapInterval, WindowSurface};
use glutin_winit::GlWindow;
use raw_window_handle::HasRawWindowHandle;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::window::WindowBuilder;

use crate::EventLoop;

pub struct WindowContext {
    pub(crate) window: winit::window::Window,
    gl_context: glutin::context::PossiblyCurrentContext,
    gl_surface: glutin::surface::Surface<WindowSurface>,
    pub(crate) gl: Rc<glow::Context>,
}

impl WindowContext {
    /// Create the main window with an OpenGL context.
    ///
    /// On Windows the window must exist before the context can be
    /// created; on Android it is the other way around. glutin-winit
    /// papers over the difference.
    pub fn new(event_loop: &EventLoop) -> Self {
        let window_builder = WindowBuilder::new()
            .with_inner_size(LogicalSize::new(768, 384))
            .with_title("CHIP-8");

        let template = ConfigTemplateBuilder::new().prefer_hardware_accelerated(Some(true));

        let (window, gl_config) = glutin_winit::DisplayBuilder::new()
            .with_preference(glutin_winit::ApiPrefence::FallbackEgl)
            .with_window_builder(Some(window_builder.clone()))
            .build(event_loop, template, |mut configs| {
                configs
                    .next()
                    .expect("the system must supply at least one GL config")
            })
            .unwrap();

        let window = window.unwrap_or_else(|| {
            glutin_winit::finalize_window(event_loop, window_builder, &gl_config)
                .expect("failed to finalize window")
        });

        let raw_window_handle = window.raw_window_handle();
        let gl_display = gl_config.display();

        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(GlVersion::new(3, 3))))
            .with_profile(GlProfile::Core)
            .build(Some(raw_window_handle));

        // Core 3.3 may not exist; try GLES before giving up.
        let fallback_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::Gles(None))
            .build(Some(raw_window_handle));

        let not_current = unsafe {
            gl_display
                .create_context(&gl_config, &context_attributes)
                .unwrap_or_else(|_| {
                    log::warn!("falling back to OpenGL ES");
                    gl_display
                        .create_context(&gl_config, &fallback_attributes)
                        .expect("failed to create context")
                })
        };

        let attrs = window.build_surface_attributes(<_>::default());
        let gl_surface = unsafe {
            gl_display
                .create_window_surface(&gl_config, &attrs)
                .unwrap()
        };

        let gl_context = not_current.make_current(&gl_surface).unwrap();

        if let Err(err) = gl_surface
            .set_swap_interval(&gl_context, SwapInterval::Wait(NonZeroU32::new(1).unwrap()))
        {
            log::error!("error setting vsync: {err:?}");
        }

        let gl = unsafe {
            Rc::new(glow::Context::from_loader_function_cstr(|symbol| {
                gl_display.get_proc_address(symbol)
            }))
        };

        Self {
            window,
            gl_context,
            gl_surface,
            gl,
        }
    }

    #[inline]
    pub fn window_id(&self) -> winit::window::WindowId {
        self.window.id()
    }

    #[inline]
    pub fn request_redraw(&self) {
        self.window.request_redraw()
    }

    pub fn swap_buffers(&self) -> glutin::error::Result<()> {
        self.gl_surface.swap_buffers(&self.gl_context)
    }

    /// Resize the GL surface. A no-op on most platforms, required on
    /// Wayland and macOS. Zero sized surfaces are invalid.
    pub fn resize_surface(&self, size: PhysicalSize<u32>) {
        if size.width != 0 && size.height != 0 {
            self.gl_surface.resize(
                &self.gl_context,
                NonZeroU32::new(size.width).unwrap(),
                NonZeroU32::new(size.height).unwrap(),
            );
        }
    }
}
