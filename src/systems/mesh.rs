use wgpu::util::DeviceExt;

use crate::components::{
    mesh::{LineVertex, MeshComponent, Vertex},
    scene::{LineTrace, SurfaceTrace},
};

use super::material::MaterialSystem;

pub struct MeshSystem {}

impl MeshSystem {
    pub fn create_vertex_buffer<T: bytemuck::Pod>(device: &wgpu::Device, data: &[T]) -> wgpu::Buffer {
        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Vertex Buffer"),
            contents: bytemuck::cast_slice(data),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        })
    }

    pub fn create_index_buffer(device: &wgpu::Device, data: &[u32]) -> wgpu::Buffer {
        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Index Buffer"),
            contents: bytemuck::cast_slice(data),
            usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        })
    }

    /// Uploads vertices (and indices, if any). Returns None for empty geometry.
    pub fn create_mesh<T: bytemuck::Pod>(
        device: &wgpu::Device,
        vertices: &[T],
        indices: Option<&[u32]>,
    ) -> Option<MeshComponent> {
        if vertices.is_empty() {
            return None;
        }
        match indices {
            Some(indices) if indices.is_empty() => None,
            Some(indices) => Some(MeshComponent {
                vertex_buffer: MeshSystem::create_vertex_buffer(device, vertices),
                index_buffer: Some(MeshSystem::create_index_buffer(device, indices)),
                num_elements: indices.len() as u32,
            }),
            None => Some(MeshComponent {
                vertex_buffer: MeshSystem::create_vertex_buffer(device, vertices),
                index_buffer: None,
                num_elements: vertices.len() as u32,
            }),
        }
    }

    /// Triangle list over the surface grid, two triangles per cell. Vertex
    /// colors come from the colorscale over the z range, alpha is the trace
    /// opacity.
    pub fn surface_geometry(surface: &SurfaceTrace, srgb_target: bool) -> (Vec<Vertex>, Vec<u32>) {
        let (rows, cols) = surface.z.shape();
        let (z_min, z_max) = surface.z.range().unwrap_or((0.0, 0.0));
        let span = z_max - z_min;
        let alpha = surface.opacity.clamp(0.0, 1.0);

        let vertices: Vec<Vertex> = surface
            .points()
            .map(|[x, y, z]| {
                // a flat surface takes the middle of the scale
                let t = if span > 0.0 { (z - z_min) / span } else { 0.5 };
                let rgb = MaterialSystem::sample(&surface.colorscale, t);
                Vertex {
                    position: [x as f32, y as f32, z as f32],
                    color: MaterialSystem::vertex_color(rgb, alpha, srgb_target),
                }
            })
            .collect();

        let mut indices = Vec::with_capacity(6 * rows.saturating_sub(1) * cols.saturating_sub(1));
        for i in 0..rows.saturating_sub(1) {
            for j in 0..cols.saturating_sub(1) {
                let a = (i * cols + j) as u32;
                let b = a + 1;
                let c = a + cols as u32;
                let d = c + 1;
                indices.extend_from_slice(&[a, c, b, b, c, d]);
            }
        }

        (vertices, indices)
    }

    /// Screen-space thick polyline: six vertices (two triangles) per segment.
    pub fn polyline_geometry(line: &LineTrace, srgb_target: bool) -> Vec<LineVertex> {
        let color = MaterialSystem::vertex_color(
            MaterialSystem::unit_rgb(line.style.color),
            1.0,
            srgb_target,
        );
        let points: Vec<[f32; 3]> = line
            .points()
            .map(|p| p.map(|c| c as f32))
            .collect();
        MeshSystem::segments_geometry(
            points.windows(2).map(|w| (w[0], w[1])),
            line.style.width,
            color,
        )
    }

    pub fn segments_geometry(
        segments: impl Iterator<Item = ([f32; 3], [f32; 3])>,
        width: f32,
        color: [f32; 4],
    ) -> Vec<LineVertex> {
        const CORNERS: [(f32, f32); 6] = [
            (0.0, -1.0),
            (0.0, 1.0),
            (1.0, -1.0),
            (1.0, -1.0),
            (0.0, 1.0),
            (1.0, 1.0),
        ];

        let mut vertices = Vec::new();
        for (start, end) in segments {
            vertices.extend(CORNERS.iter().map(|&(along, side)| LineVertex {
                start,
                end,
                along,
                side,
                width,
                color,
            }));
        }
        vertices
    }
}
