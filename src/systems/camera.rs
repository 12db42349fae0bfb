use cgmath::InnerSpace;
use wgpu::util::DeviceExt;

use crate::{
    components::{
        camera::{up_axis, Camera, CameraController, CameraUniform},
        scene::{AspectMode, Bounds},
    },
    matrix4_to_array, Uniform,
};

// viewing direction of the default eye, from the scene center
const EYE_DIRECTION: [f32; 3] = [1.25, 1.25, 1.25];

pub struct CameraSystem {}

impl CameraSystem {
    /// Per-axis scale applied to the scene for the given aspect mode.
    pub fn aspect_scale(mode: AspectMode, bounds: &Bounds) -> [f64; 3] {
        match mode {
            AspectMode::Data => [1.0, 1.0, 1.0],
            AspectMode::Cube => {
                let extent = bounds.extent();
                let longest = extent.iter().cloned().fold(0.0, f64::max);
                extent.map(|e| if e > 0.0 { longest / e } else { 1.0 })
            }
        }
    }

    /// Camera looking at the center of `bounds` from far enough away that the
    /// whole box fits the view.
    pub fn frame_bounds(bounds: &Bounds, aspect: f32, fovy_deg: f32) -> Camera {
        let center = bounds.center().map(|c| c as f32);
        let radius = (bounds.radius() as f32).max(1e-3);

        let half_fovy = cgmath::Rad::from(cgmath::Deg(fovy_deg)).0 * 0.5;
        let half_fovx = (half_fovy.tan() * aspect).atan();
        let half_fov = half_fovy.min(half_fovx);
        let distance = radius / half_fov.sin() * 1.1;

        let direction = cgmath::Vector3::from(EYE_DIRECTION).normalize();
        let target = cgmath::Point3::from(center);

        Camera {
            eye: target + direction * distance,
            target,
            up: up_axis(),
            aspect,
            fovy: fovy_deg,
            znear: radius * 0.01,
            zfar: (distance * CameraSystem::MAX_ZOOM_OUT + radius) * 2.0,
        }
    }

    pub const MAX_ZOOM_OUT: f32 = 4.0;

    pub fn create_controller(camera: &Camera, bounds: &Bounds, zoom_step: f32, rotate_step_deg: f32) -> CameraController {
        let distance = camera.distance();
        CameraController::new(
            zoom_step,
            cgmath::Deg(rotate_step_deg),
            (bounds.radius() as f32 * 0.05).min(distance),
            distance * CameraSystem::MAX_ZOOM_OUT,
        )
    }

    pub fn create_camera_resources(
        device: &wgpu::Device,
        camera: &Camera,
        model_scale: [f64; 3],
        width: u32,
        height: u32,
    ) -> (CameraUniform, wgpu::Buffer, wgpu::BindGroup, wgpu::BindGroupLayout) {
        let mut camera_uniform = CameraUniform::new();
        camera_uniform.update_view_proj(camera);
        camera_uniform.update_viewport(width, height);
        let [sx, sy, sz] = model_scale.map(|s| s as f32);
        camera_uniform.model_matrix = matrix4_to_array(cgmath::Matrix4::from_nonuniform_scale(sx, sy, sz));

        let camera_buffer = CameraSystem::create_uniform_buffer(device, &camera_uniform);
        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
                label: Some("Camera Component Uniform Bind Group Layout"),
            });
        let camera_bind_group = CameraSystem::create_uniform_bind_group(
            device,
            &camera_buffer,
            &camera_bind_group_layout,
        );

        (
            camera_uniform,
            camera_buffer,
            camera_bind_group,
            camera_bind_group_layout,
        )
    }
}

impl Uniform for CameraSystem {
    fn create_uniform_buffer<T: bytemuck::Pod>(device: &wgpu::Device, data: &T) -> wgpu::Buffer {
        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Component Uniform Buffer"),
            contents: bytemuck::bytes_of(data),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        })
    }

    fn create_uniform_bind_group(
        device: &wgpu::Device,
        buffer: &wgpu::Buffer,
        layout: &wgpu::BindGroupLayout,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("Camera Component Uniform Bind Group"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn corners(bounds: &Bounds) -> Vec<cgmath::Vector4<f32>> {
        let mut out = Vec::new();
        for x in [bounds.min[0], bounds.max[0]] {
            for y in [bounds.min[1], bounds.max[1]] {
                for z in [bounds.min[2], bounds.max[2]] {
                    out.push(cgmath::Vector4::new(x as f32, y as f32, z as f32, 1.0));
                }
            }
        }
        out
    }

    #[test]
    fn framed_scene_is_fully_visible() {
        let bounds = Bounds {
            min: [-6371.0, -6371.0, -6371.0],
            max: [7000.0, 7000.0, 6371.0],
        };
        for aspect in [0.5f32, 1.0, 16.0 / 9.0] {
            let camera = CameraSystem::frame_bounds(&bounds, aspect, 45.0);
            let view_proj = camera.build_view_projection_matrix();
            for corner in corners(&bounds) {
                let clip = view_proj * corner;
                assert!(clip.w > 0.0);
                let ndc = clip.truncate() / clip.w;
                assert!(ndc.x.abs() <= 1.0, "x {} at aspect {}", ndc.x, aspect);
                assert!(ndc.y.abs() <= 1.0, "y {} at aspect {}", ndc.y, aspect);
                assert!((0.0..=1.0).contains(&ndc.z), "z {}", ndc.z);
            }
        }
    }

    #[test]
    fn camera_looks_at_bounds_center_with_z_up() {
        let bounds = Bounds {
            min: [0.0, 0.0, 0.0],
            max: [10.0, 20.0, 30.0],
        };
        let camera = CameraSystem::frame_bounds(&bounds, 1.0, 45.0);
        assert_eq!(camera.target, cgmath::Point3::new(5.0, 10.0, 15.0));
        assert_eq!(camera.up, cgmath::Vector3::unit_z());
        assert!(camera.eye.x > camera.target.x && camera.eye.z > camera.target.z);
    }

    #[test]
    fn data_aspect_keeps_units_equal() {
        let bounds = Bounds {
            min: [-1.0, -2.0, -3.0],
            max: [1.0, 2.0, 3.0],
        };
        assert_eq!(CameraSystem::aspect_scale(AspectMode::Data, &bounds), [1.0, 1.0, 1.0]);
    }

    #[test]
    fn cube_aspect_equalizes_extents() {
        let bounds = Bounds {
            min: [-1.0, -2.0, 0.0],
            max: [1.0, 2.0, 0.0],
        };
        let scale = CameraSystem::aspect_scale(AspectMode::Cube, &bounds);
        assert_relative_eq!(scale[0], 2.0);
        assert_relative_eq!(scale[1], 1.0);
        // flat axis is left alone
        assert_relative_eq!(scale[2], 1.0);

        let scaled = bounds.scaled(scale);
        assert_relative_eq!(scaled.extent()[0], scaled.extent()[1]);
    }

    #[test]
    #[allow(deprecated)]
    fn controller_limits_follow_framing() {
        let bounds = Bounds {
            min: [-1.0; 3],
            max: [1.0; 3],
        };
        let mut camera = CameraSystem::frame_bounds(&bounds, 1.0, 45.0);
        let start = camera.distance();
        let mut controller = CameraSystem::create_controller(&camera, &bounds, 0.5, 1.0);
        let zoom_out = winit::event::WindowEvent::MouseWheel {
            device_id: unsafe { winit::event::DeviceId::dummy() },
            delta: winit::event::MouseScrollDelta::LineDelta(0.0, -100.0),
            phase: winit::event::TouchPhase::Moved,
            modifiers: winit::event::ModifiersState::empty(),
        };
        controller.process_events(&zoom_out);
        controller.update_camera(&mut camera);
        assert_relative_eq!(camera.distance(), start * CameraSystem::MAX_ZOOM_OUT, max_relative = 1e-4);
        assert!(camera.distance() < camera.zfar);
    }
}
