use std::sync::Arc;

use anyhow::{anyhow, Result};
use log::{debug, error, info, warn};
use pollster::block_on;
use thiserror::Error;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{DeviceEvent, DeviceId, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode as WinitKey, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowId};

use crate::config::RuntimeConfig;
use crate::frame::{FrameContext, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::input::{KeyCode, NamedKey};
use crate::mesh::MeshError;
use crate::render::Renderer;
use crate::scene::Scene;

const WINDOW_TITLE: &str = "LearnOpenGL";
/// Pixel scroll deltas per line of wheel movement.
const PIXELS_PER_LINE: f32 = 20.0;

/// Failures before the first frame. The binary exits with -1 on these.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("failed to create event loop")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("failed to create window")]
    Window(#[from] winit::error::OsError),
    #[error("failed to create rendering surface")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no suitable GPU adapter")]
    Adapter(#[from] wgpu::RequestAdapterError),
    #[error("failed to create GPU device")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("surface supports no texture formats")]
    NoSurfaceFormat,
    #[error("failed to build mesh {mesh}")]
    Mesh {
        mesh: &'static str,
        #[source]
        source: MeshError,
    },
}

/// Opens the window and runs the render loop until the viewer is closed.
pub fn run(config: RuntimeConfig) -> Result<()> {
    let event_loop = EventLoop::new().map_err(InitError::from)?;
    event_loop.set_control_flow(ControlFlow::Poll);
    let mut app = CountertopApp::new(config);
    event_loop.run_app(&mut app).map_err(InitError::from)?;
    app.finish()
}

/// winit handler owning the frame context and the renderer.
pub struct CountertopApp {
    config: RuntimeConfig,
    scene: Scene,
    frame: FrameContext,
    renderer: Option<Renderer>,
    frames_rendered: u64,
    cursor_grabbed: bool,
    last_error: Option<anyhow::Error>,
}

impl CountertopApp {
    pub fn new(config: RuntimeConfig) -> Self {
        Self {
            frame: FrameContext::from_config(&config),
            scene: Scene::authored(),
            config,
            renderer: None,
            frames_rendered: 0,
            cursor_grabbed: false,
            last_error: None,
        }
    }

    /// Surfaces the error that stopped the loop, if any.
    pub fn finish(mut self) -> Result<()> {
        match self.last_error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        self.last_error = Some(err);
        self.frame.request_close();
        event_loop.exit();
    }

    fn create_renderer(&mut self, event_loop: &ActiveEventLoop) -> Result<Renderer> {
        let attrs = Window::default_attributes()
            .with_title(WINDOW_TITLE)
            .with_inner_size(LogicalSize::new(DEFAULT_WIDTH, DEFAULT_HEIGHT));
        let window = Arc::new(event_loop.create_window(attrs).map_err(InitError::from)?);
        self.cursor_grabbed = capture_cursor(&window);
        let renderer = block_on(Renderer::new(
            Arc::clone(&window),
            &self.scene,
            &self.config,
        ))?;
        Ok(renderer)
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        if self
            .config
            .frames
            .is_some_and(|limit| self.frames_rendered >= limit)
        {
            info!("rendered {} frames, exiting", self.frames_rendered);
            self.frame.request_close();
        }
        self.frame.begin_frame();
        if self.frame.should_close() {
            event_loop.exit();
            return;
        }
        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };

        let plan = self.frame.plan(&self.scene);
        match renderer.render(&plan) {
            Ok(()) => self.frames_rendered += 1,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                renderer.reconfigure();
            }
            Err(wgpu::SurfaceError::Timeout) => {
                info!("Surface timeout; retrying next frame");
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                self.fail(event_loop, anyhow!("GPU is out of memory"));
            }
            Err(err) => warn!("skipping frame: {err}"),
        }
    }
}

impl ApplicationHandler for CountertopApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.renderer.is_some() {
            return;
        }
        match self.create_renderer(event_loop) {
            Ok(renderer) => {
                let size = renderer.size().to_logical::<f32>(renderer.window().scale_factor());
                self.frame.on_resize(size.width, size.height);
                renderer.window().request_redraw();
                self.renderer = Some(renderer);
            }
            Err(err) => {
                error!("{err:#}");
                self.fail(event_loop, err);
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.frame.should_close() {
            event_loop.exit();
            return;
        }
        if let Some(renderer) = &self.renderer {
            renderer.window().request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };
        if window_id != renderer.window_id() {
            return;
        }
        let scale = renderer.window().scale_factor();

        match event {
            WindowEvent::CloseRequested => {
                self.frame.request_close();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                renderer.resize(size);
                let logical = size.to_logical::<f32>(scale);
                self.frame.on_resize(logical.width, logical.height);
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                renderer.reconfigure();
                let logical = renderer.size().to_logical::<f32>(scale_factor);
                self.frame.on_resize(logical.width, logical.height);
            }
            WindowEvent::Focused(false) => self.frame.on_focus_lost(),
            WindowEvent::KeyboardInput { event, .. } => {
                if let Some(key) = map_keycode(event.physical_key) {
                    self.frame.on_key(key, event.state.is_pressed());
                }
            }
            WindowEvent::CursorMoved { position, .. } if !self.cursor_grabbed => {
                let logical = position.to_logical::<f32>(scale);
                self.frame.on_cursor_moved(logical.x, logical.y);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.frame.on_scroll(scroll_lines(delta));
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if !self.cursor_grabbed || self.renderer.is_none() {
            return;
        }
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            self.frame.on_mouse_motion(dx as f32, dy as f32);
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(mut renderer) = self.renderer.take() {
            renderer.shutdown();
        }
    }
}

/// Hides and grabs the pointer. Returns whether a grab took hold; without
/// one, mouse look falls back to absolute cursor positions.
fn capture_cursor(window: &Window) -> bool {
    window.set_cursor_visible(false);
    let grabbed = window
        .set_cursor_grab(CursorGrabMode::Locked)
        .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
    match grabbed {
        Ok(()) => true,
        Err(err) => {
            warn!("cursor grab unavailable: {err}");
            false
        }
    }
}

/// Wheel movement in lines, positive away from the user.
fn scroll_lines(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => y,
        MouseScrollDelta::PixelDelta(position) => position.y as f32 / PIXELS_PER_LINE,
    }
}

fn map_keycode(key: PhysicalKey) -> Option<KeyCode> {
    let PhysicalKey::Code(code) = key else {
        debug!("ignoring unidentified key {key:?}");
        return None;
    };
    Some(match code {
        WinitKey::Escape => KeyCode::Named(NamedKey::Escape),
        WinitKey::KeyW => KeyCode::Character('W'),
        WinitKey::KeyS => KeyCode::Character('S'),
        WinitKey::KeyA => KeyCode::Character('A'),
        WinitKey::KeyD => KeyCode::Character('D'),
        WinitKey::KeyQ => KeyCode::Character('Q'),
        WinitKey::KeyE => KeyCode::Character('E'),
        WinitKey::KeyP => KeyCode::Character('P'),
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use winit::dpi::PhysicalPosition;
    use winit::keyboard::NativeKeyCode;

    use super::*;
    use crate::input::BINDINGS;

    #[test]
    fn maps_bound_keys() {
        assert_eq!(
            map_keycode(PhysicalKey::Code(WinitKey::KeyW)),
            Some(KeyCode::Character('W'))
        );
        assert_eq!(
            map_keycode(PhysicalKey::Code(WinitKey::Escape)),
            Some(KeyCode::Named(NamedKey::Escape))
        );
        assert_eq!(map_keycode(PhysicalKey::Code(WinitKey::F1)), None);
        assert_eq!(map_keycode(PhysicalKey::Code(WinitKey::Space)), None);
        assert_eq!(
            map_keycode(PhysicalKey::Unidentified(NativeKeyCode::Unidentified)),
            None
        );
    }

    #[test]
    fn scroll_deltas_convert_to_lines() {
        assert_eq!(scroll_lines(MouseScrollDelta::LineDelta(0.0, -1.0)), -1.0);
        let pixels = MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 40.0));
        assert_eq!(scroll_lines(pixels), 2.0);
    }

    #[test]
    fn every_binding_has_a_physical_key() {
        let mapped: Vec<KeyCode> = [
            WinitKey::KeyW,
            WinitKey::KeyS,
            WinitKey::KeyA,
            WinitKey::KeyD,
            WinitKey::KeyQ,
            WinitKey::KeyE,
            WinitKey::KeyP,
            WinitKey::Escape,
        ]
        .into_iter()
        .filter_map(|code| map_keycode(PhysicalKey::Code(code)))
        .collect();
        for (key, _) in BINDINGS {
            assert!(mapped.contains(&key), "{key:?} is unreachable");
        }
    }

    #[test]
    fn event_loop_failure_is_an_init_error() {
        let err: anyhow::Error =
            InitError::from(winit::error::EventLoopError::ExitFailure(3)).into();
        assert!(err.downcast_ref::<InitError>().is_some());
    }

    #[test]
    fn app_starts_without_renderer() {
        let app = CountertopApp::new(RuntimeConfig::default());
        assert!(app.renderer.is_none());
        assert!(!app.cursor_grabbed);
        assert_eq!(app.scene.len(), 9);
        assert!(app.finish().is_ok());
    }
}
