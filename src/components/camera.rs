use cgmath::{InnerSpace, Vector3};
use winit::event::{
    ElementState, KeyboardInput, MouseScrollDelta, VirtualKeyCode, WindowEvent,
};

// cgmath targets OpenGL clip space (z in -1..1), wgpu expects z in 0..1
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);
pub const IDENTITY_MATRIX_4: [[f32; 4]; 4] = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

pub struct CameraComponent {
    pub camera: Camera,
    pub camera_uniform: CameraUniform,
    pub camera_buffer: wgpu::Buffer,
    pub camera_bind_group: wgpu::BindGroup,
    pub camera_bind_group_layout: wgpu::BindGroupLayout,
    pub camera_controller: CameraController,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub eye: cgmath::Point3<f32>,
    pub target: cgmath::Point3<f32>,
    pub up: cgmath::Vector3<f32>,
    pub aspect: f32,
    pub fovy: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn build_view_projection_matrix(&self) -> cgmath::Matrix4<f32> {
        let view = cgmath::Matrix4::look_at_rh(self.eye, self.target, self.up);
        let proj = cgmath::perspective(cgmath::Deg(self.fovy), self.aspect, self.znear, self.zfar);
        OPENGL_TO_WGPU_MATRIX * proj * view
    }

    pub fn distance(&self) -> f32 {
        (self.eye - self.target).magnitude()
    }
}

/// Keyboard and wheel camera controls: zoom towards the target and orbit
/// around the up axis.
#[derive(Debug, Clone)]
pub struct CameraController {
    zoom_step: f32,
    rotate_step: cgmath::Deg<f32>,
    min_distance: f32,
    max_distance: f32,
    pending_scroll: f32,
    is_forward_pressed: bool,
    is_backward_pressed: bool,
    is_left_pressed: bool,
    is_right_pressed: bool,
}

impl CameraController {
    /// `zoom_step` is the fraction of the current distance covered per update.
    pub fn new(zoom_step: f32, rotate_step: cgmath::Deg<f32>, min_distance: f32, max_distance: f32) -> Self {
        Self {
            zoom_step,
            rotate_step,
            min_distance,
            max_distance,
            pending_scroll: 0.0,
            is_forward_pressed: false,
            is_backward_pressed: false,
            is_left_pressed: false,
            is_right_pressed: false,
        }
    }

    pub fn process_events(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput {
                input:
                    KeyboardInput {
                        state,
                        virtual_keycode: Some(keycode),
                        ..
                    },
                ..
            } => {
                let is_pressed = *state == ElementState::Pressed;
                match keycode {
                    VirtualKeyCode::W | VirtualKeyCode::Up => {
                        self.is_forward_pressed = is_pressed;
                        true
                    }
                    VirtualKeyCode::A | VirtualKeyCode::Left => {
                        self.is_left_pressed = is_pressed;
                        true
                    }
                    VirtualKeyCode::S | VirtualKeyCode::Down => {
                        self.is_backward_pressed = is_pressed;
                        true
                    }
                    VirtualKeyCode::D | VirtualKeyCode::Right => {
                        self.is_right_pressed = is_pressed;
                        true
                    }
                    _ => false,
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.pending_scroll += match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    // roughly one wheel notch per 40 pixels
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 40.0,
                };
                true
            }
            _ => false,
        }
    }

    pub fn update_camera(&mut self, camera: &mut Camera) {
        let offset = camera.eye - camera.target;
        let distance = offset.magnitude();
        if distance <= f32::EPSILON {
            return;
        }

        let mut zoom_steps = self.pending_scroll;
        self.pending_scroll = 0.0;
        if self.is_forward_pressed {
            zoom_steps += 1.0;
        }
        if self.is_backward_pressed {
            zoom_steps -= 1.0;
        }
        let new_distance = (distance * (1.0 - self.zoom_step).powf(zoom_steps))
            .clamp(self.min_distance, self.max_distance);
        let mut offset = offset.normalize() * new_distance;

        let mut angle = cgmath::Deg(0.0);
        if self.is_right_pressed {
            angle -= self.rotate_step;
        }
        if self.is_left_pressed {
            angle += self.rotate_step;
        }
        if angle != cgmath::Deg(0.0) {
            let rotation = cgmath::Matrix3::from_axis_angle(camera.up.normalize(), angle);
            offset = rotation * offset;
        }

        camera.eye = camera.target + offset;
    }
}

// We need this for Rust to store our data correctly for the shaders
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj_matrix: [[f32; 4]; 4],
    // aspect scaling applied to every vertex before the view
    pub model_matrix: [[f32; 4]; 4],
    // width, height in pixels, zw unused (16 byte alignment)
    pub viewport: [f32; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        Self {
            view_proj_matrix: IDENTITY_MATRIX_4,
            model_matrix: IDENTITY_MATRIX_4,
            viewport: [1.0, 1.0, 0.0, 0.0],
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera) {
        self.view_proj_matrix = camera.build_view_projection_matrix().into();
    }

    pub fn update_viewport(&mut self, width: u32, height: u32) {
        self.viewport = [width.max(1) as f32, height.max(1) as f32, 0.0, 0.0];
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

pub fn up_axis() -> Vector3<f32> {
    Vector3::unit_z()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use winit::event::{DeviceId, ModifiersState};

    fn camera() -> Camera {
        Camera {
            eye: (100.0, 0.0, 0.0).into(),
            target: (0.0, 0.0, 0.0).into(),
            up: up_axis(),
            aspect: 1.0,
            fovy: 45.0,
            znear: 1.0,
            zfar: 1000.0,
        }
    }

    #[allow(deprecated)]
    fn key(code: VirtualKeyCode, state: ElementState) -> WindowEvent<'static> {
        WindowEvent::KeyboardInput {
            device_id: unsafe { DeviceId::dummy() },
            input: KeyboardInput {
                scancode: 0,
                state,
                virtual_keycode: Some(code),
                modifiers: ModifiersState::empty(),
            },
            is_synthetic: false,
        }
    }

    #[test]
    fn zoom_is_clamped() {
        let mut cam = camera();
        let mut controller = CameraController::new(0.5, cgmath::Deg(5.0), 40.0, 150.0);

        assert!(controller.process_events(&key(VirtualKeyCode::W, ElementState::Pressed)));
        for _ in 0..10 {
            controller.update_camera(&mut cam);
        }
        assert_relative_eq!(cam.distance(), 40.0, epsilon = 1e-3);

        controller.process_events(&key(VirtualKeyCode::W, ElementState::Released));
        controller.process_events(&key(VirtualKeyCode::S, ElementState::Pressed));
        for _ in 0..10 {
            controller.update_camera(&mut cam);
        }
        assert_relative_eq!(cam.distance(), 150.0, epsilon = 1e-3);
    }

    #[test]
    fn orbit_keeps_distance_and_height() {
        let mut cam = camera();
        cam.eye = (100.0, 0.0, 30.0).into();
        let before = cam.distance();
        let mut controller = CameraController::new(0.1, cgmath::Deg(90.0), 1.0, 1000.0);

        controller.process_events(&key(VirtualKeyCode::A, ElementState::Pressed));
        controller.update_camera(&mut cam);

        assert_relative_eq!(cam.distance(), before, epsilon = 1e-3);
        assert_relative_eq!(cam.eye.z, 30.0, epsilon = 1e-3);
        // a quarter turn counter-clockwise around +z moves +x to +y
        assert_relative_eq!(cam.eye.x, 0.0, epsilon = 1e-3);
        assert_relative_eq!(cam.eye.y, 100.0, epsilon = 1e-3);
    }

    #[test]
    fn unrelated_keys_are_not_consumed() {
        let mut controller = CameraController::new(0.1, cgmath::Deg(1.0), 1.0, 10.0);
        assert!(!controller.process_events(&key(VirtualKeyCode::Q, ElementState::Pressed)));
    }

    #[test]
    fn target_projects_to_screen_center() {
        let cam = camera();
        let clip = cam.build_view_projection_matrix() * cgmath::Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert_relative_eq!(clip.x / clip.w, 0.0, epsilon = 1e-5);
        assert_relative_eq!(clip.y / clip.w, 0.0, epsilon = 1e-5);
        let depth = clip.z / clip.w;
        assert!((0.0..=1.0).contains(&depth));
    }
}
