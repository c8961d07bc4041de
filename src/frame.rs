//! Per-frame state owned by the application shell.
//!
//! [`FrameContext`] folds window events into the camera and turns the
//! current pose into a [`FramePlan`]: the global uniforms plus one draw per
//! scene instance. The plan is plain data so everything the GPU consumes
//! can be checked without a device.

use glam::{Mat4, Vec3};
use log::debug;

use crate::camera::{Camera, Direction};
use crate::config::RuntimeConfig;
use crate::input::{Action, InputState, KeyCode, MouseLatch};
use crate::lighting::{LightSet, POINT_LIGHT_COUNT, POINT_LIGHT_POSITIONS};
use crate::math;
use crate::scene::{MeshKey, Scene, TextureKey};
use crate::timing::FrameTimer;
use crate::uniforms::GlobalUniforms;

pub const DEFAULT_WIDTH: f32 = 800.0;
pub const DEFAULT_HEIGHT: f32 = 600.0;

const NEAR: f32 = 0.1;
const FAR: f32 = 100.0;
const ORTHO_UNITS_PER_PIXEL: f32 = 0.01;
const ORTHO_NEAR: f32 = -5.0;
const LIGHT_MARKER_SCALE: f32 = 0.2;

/// One instance draw, in scene order.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub instance: usize,
    pub mesh: MeshKey,
    pub diffuse: TextureKey,
    pub specular: TextureKey,
    pub model: Mat4,
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FramePlan {
    pub globals: GlobalUniforms,
    pub draws: Vec<DrawCall>,
    /// Model matrices of the light marker cubes; empty unless enabled.
    pub light_markers: Vec<Mat4>,
}

#[derive(Debug, Clone)]
pub struct FrameContext {
    camera: Camera,
    timer: FrameTimer,
    input: InputState,
    mouse: MouseLatch,
    use_ortho: bool,
    show_lights: bool,
    width: f32,
    height: f32,
    close_requested: bool,
}

impl Default for FrameContext {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

impl FrameContext {
    /// Context for a `width` x `height` logical window.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            camera: Camera::default(),
            timer: FrameTimer::new(),
            input: InputState::new(),
            mouse: MouseLatch::new(width, height),
            use_ortho: false,
            show_lights: false,
            width,
            height,
            close_requested: false,
        }
    }

    pub fn from_config(config: &RuntimeConfig) -> Self {
        let mut context = Self::default();
        context.use_ortho = config.ortho;
        context.show_lights = config.show_lights;
        context
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn use_ortho(&self) -> bool {
        self.use_ortho
    }

    pub fn viewport(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn should_close(&self) -> bool {
        self.close_requested
    }

    pub fn request_close(&mut self) {
        self.close_requested = true;
    }

    /// Samples the clock and applies held input. Returns the frame delta.
    pub fn begin_frame(&mut self) -> f32 {
        let dt = self.timer.tick();
        self.apply_input(dt);
        dt
    }

    /// Like [`FrameContext::begin_frame`] with an explicit clock reading.
    pub fn begin_frame_at(&mut self, now: f64) -> f32 {
        let dt = self.timer.advance_to(now);
        self.apply_input(dt);
        dt
    }

    /// Movement keys act while held; the projection toggle acts once per
    /// press.
    pub fn apply_input(&mut self, dt: f32) {
        let held: Vec<Action> = self.input.held_actions().collect();
        for action in held {
            let direction = match action {
                Action::MoveForward => Direction::Forward,
                Action::MoveBackward => Direction::Backward,
                Action::StrafeLeft => Direction::Left,
                Action::StrafeRight => Direction::Right,
                Action::PanUp => Direction::Up,
                Action::PanDown => Direction::Down,
                Action::Quit => {
                    self.close_requested = true;
                    continue;
                }
                Action::ToggleProjection => continue,
            };
            self.camera.process_keyboard(direction, dt);
        }
        let toggles = self
            .input
            .pressed_actions()
            .filter(|action| *action == Action::ToggleProjection)
            .count();
        for _ in 0..toggles {
            self.use_ortho = !self.use_ortho;
            debug!(
                "projection switched to {}",
                if self.use_ortho { "orthographic" } else { "perspective" }
            );
        }
        self.input.end_frame();
    }

    pub fn on_key(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            self.input.set_key_down(key);
        } else {
            self.input.set_key_up(key);
        }
    }

    pub fn on_focus_lost(&mut self) {
        self.input.release_all();
    }

    /// Cursor position in logical pixels, origin top-left. Used when the
    /// pointer is not grabbed.
    pub fn on_cursor_moved(&mut self, x: f32, y: f32) {
        let offset = self.mouse.offset(x, y);
        self.camera.process_mouse_movement(offset.x, offset.y, true);
    }

    /// Raw pointer motion while grabbed, `dy` growing downwards.
    pub fn on_mouse_motion(&mut self, dx: f32, dy: f32) {
        self.camera.process_mouse_movement(dx, -dy, true);
    }

    pub fn on_scroll(&mut self, dy: f32) {
        self.camera.process_mouse_scroll(dy);
    }

    /// Logical window size; a minimised window keeps the previous size.
    pub fn on_resize(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.width = width;
            self.height = height;
        }
    }

    pub fn projection(&self) -> Mat4 {
        if self.use_ortho {
            let half_w = self.width * ORTHO_UNITS_PER_PIXEL;
            let half_h = self.height * ORTHO_UNITS_PER_PIXEL;
            math::orthographic(-half_w, half_w, -half_h, half_h, ORTHO_NEAR, FAR)
        } else {
            math::perspective(self.camera.zoom(), self.width / self.height, NEAR, FAR)
        }
    }

    pub fn plan(&self, scene: &Scene) -> FramePlan {
        let lights = LightSet::authored(&self.camera);
        let globals = GlobalUniforms::new(
            self.projection(),
            self.camera.view_matrix(),
            self.camera.position(),
            &lights,
        );
        let draws = scene
            .instances
            .iter()
            .enumerate()
            .map(|(index, instance)| DrawCall {
                instance: index,
                mesh: instance.mesh,
                diffuse: instance.diffuse,
                specular: instance.specular,
                model: instance.model_matrix(),
            })
            .collect();
        let light_markers = if self.show_lights {
            light_marker_models().to_vec()
        } else {
            Vec::new()
        };
        FramePlan {
            globals,
            draws,
            light_markers,
        }
    }
}

/// Small cubes at each point light position.
pub fn light_marker_models() -> [Mat4; POINT_LIGHT_COUNT] {
    POINT_LIGHT_POSITIONS.map(|position| {
        Mat4::from_translation(position) * Mat4::from_scale(Vec3::splat(LIGHT_MARKER_SCALE))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(context: &mut FrameContext, key: char) {
        context.on_key(KeyCode::Character(key), true);
    }

    fn release(context: &mut FrameContext, key: char) {
        context.on_key(KeyCode::Character(key), false);
    }

    #[test]
    fn holding_w_for_one_second_moves_forward() {
        let mut context = FrameContext::default();
        context.begin_frame_at(0.0);
        press(&mut context, 'W');
        context.begin_frame_at(1.0);
        let position = context.camera().position();
        assert!((position - Vec3::new(0.0, 0.0, 0.5)).length() < 1e-4);
    }

    #[test]
    fn p_toggles_once_per_press() {
        let mut context = FrameContext::default();
        let perspective = context.projection();
        press(&mut context, 'P');
        context.begin_frame_at(0.1);
        assert!(context.use_ortho());
        context.begin_frame_at(0.2);
        assert!(context.use_ortho());
        release(&mut context, 'P');
        context.begin_frame_at(0.3);
        press(&mut context, 'P');
        context.begin_frame_at(0.4);
        assert!(!context.use_ortho());
        assert_eq!(context.projection(), perspective);
    }

    #[test]
    fn ortho_spans_window_in_hundredths() {
        let mut context = FrameContext::from_config(&RuntimeConfig {
            ortho: true,
            ..RuntimeConfig::default()
        });
        let projection = context.projection();
        let corner = projection.project_point3(Vec3::new(8.0, 6.0, -1.0));
        assert!((corner.x - 1.0).abs() < 1e-6 && (corner.y - 1.0).abs() < 1e-6);
        let corner = projection.project_point3(Vec3::new(-8.0, -6.0, -1.0));
        assert!((corner.x + 1.0).abs() < 1e-6 && (corner.y + 1.0).abs() < 1e-6);
        let inner = projection.project_point3(Vec3::new(4.0, 3.0, -1.0));
        assert!((inner.x - 0.5).abs() < 1e-6 && (inner.y - 0.5).abs() < 1e-6);

        context.on_resize(1600.0, 600.0);
        let corner = context.projection().project_point3(Vec3::new(16.0, 6.0, -1.0));
        assert!((corner.x - 1.0).abs() < 1e-6 && (corner.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn point_ahead_of_origin_stays_centred_in_both_projections() {
        let mut context = FrameContext::default();
        let view = Camera::new(Vec3::ZERO).view_matrix();
        let ahead = Vec3::new(0.0, 0.0, -1.0);
        for use_ortho in [false, true] {
            if context.use_ortho() != use_ortho {
                press(&mut context, 'P');
                context.begin_frame_at(0.1);
                release(&mut context, 'P');
            }
            assert_eq!(context.use_ortho(), use_ortho);
            let clip = (context.projection() * view).project_point3(ahead);
            assert!(clip.x.abs() < 1e-5 && clip.y.abs() < 1e-5, "{clip:?}");
            assert!((0.0..=1.0).contains(&clip.z), "{clip:?}");
        }
    }

    #[test]
    fn p_tapped_between_frames_still_toggles() {
        let mut context = FrameContext::default();
        context.begin_frame_at(0.0);
        press(&mut context, 'P');
        release(&mut context, 'P');
        context.begin_frame_at(0.016);
        assert!(context.use_ortho());
        context.begin_frame_at(0.032);
        assert!(context.use_ortho());
    }

    #[test]
    fn grabbed_pointer_motion_turns_camera() {
        let mut context = FrameContext::default();
        context.on_mouse_motion(10.0, -10.0);
        assert!((context.camera().yaw() + 89.0).abs() < 1e-5);
        assert!((context.camera().pitch() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn zero_sized_resize_is_ignored() {
        let mut context = FrameContext::default();
        context.on_resize(0.0, 0.0);
        assert_eq!(context.viewport(), (800.0, 600.0));
        assert!(context.projection().is_finite());
    }

    #[test]
    fn plans_are_deterministic() {
        let scene = Scene::authored();
        let mut context = FrameContext::default();
        context.on_cursor_moved(400.0, 300.0);
        context.on_cursor_moved(420.0, 290.0);
        context.begin_frame_at(0.5);
        assert_eq!(context.plan(&scene), context.plan(&scene));
    }

    #[test]
    fn plan_draws_every_instance_in_order() {
        let scene = Scene::authored();
        let plan = FrameContext::default().plan(&scene);
        assert_eq!(plan.draws.len(), 9);
        for (index, draw) in plan.draws.iter().enumerate() {
            assert_eq!(draw.instance, index);
            assert_eq!(draw.mesh, scene.instances[index].mesh);
            assert_eq!(draw.model, scene.instances[index].model_matrix());
        }
        assert!(plan.light_markers.is_empty());
        assert_eq!(plan.globals.view_pos, [0.0, 0.0, 3.0, 1.0]);
    }

    #[test]
    fn escape_requests_close() {
        let mut context = FrameContext::default();
        context.on_key(KeyCode::Named(crate::input::NamedKey::Escape), true);
        assert!(!context.should_close());
        context.begin_frame_at(0.1);
        assert!(context.should_close());
    }

    #[test]
    fn first_cursor_event_does_not_turn_camera() {
        let mut context = FrameContext::default();
        context.on_cursor_moved(10.0, 500.0);
        assert_eq!(context.camera().yaw(), -90.0);
        context.on_cursor_moved(20.0, 490.0);
        assert!((context.camera().yaw() + 89.0).abs() < 1e-5);
        assert!((context.camera().pitch() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn markers_follow_point_lights() {
        let plan = FrameContext::from_config(&RuntimeConfig {
            show_lights: true,
            ..RuntimeConfig::default()
        })
        .plan(&Scene::authored());
        assert_eq!(plan.light_markers.len(), 4);
        let centre = plan.light_markers[2].transform_point3(Vec3::ZERO);
        assert_eq!(centre, Vec3::new(-4.0, 2.0, -12.0));
    }
}
