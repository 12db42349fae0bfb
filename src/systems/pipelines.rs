use crate::components::mesh::{LabelVertex, LineVertex, Vertex};

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

// Everything that differs between the scene's pipelines.
struct PipelineParams<'a> {
    label: &'a str,
    vertex_layout: wgpu::VertexBufferLayout<'static>,
    topology: wgpu::PrimitiveTopology,
    blend: wgpu::BlendState,
    depth_write_enabled: bool,
    depth_compare: wgpu::CompareFunction,
}

fn layout_desc(
    device: &wgpu::Device,
    label: &str,
    bind_group_layouts: &[&wgpu::BindGroupLayout],
) -> wgpu::PipelineLayout {
    device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts,
        push_constant_ranges: &[],
    })
}

fn pipeline_desc(
    device: &wgpu::Device,
    params: PipelineParams,
    pipeline_layout: &wgpu::PipelineLayout,
    shader_module: &wgpu::ShaderModule,
    texture_format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(params.label),
        layout: Some(pipeline_layout),

        vertex: wgpu::VertexState {
            module: shader_module,
            entry_point: "vs_main",
            buffers: &[params.vertex_layout],
        },

        fragment: Some(wgpu::FragmentState {
            module: shader_module,
            entry_point: "fs_main",
            targets: &[Some(wgpu::ColorTargetState {
                format: texture_format,
                blend: Some(params.blend),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: params.topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // translucent surfaces show their back side, quads have no fixed winding
            cull_mode: None,
            // anything other than Fill requires Features::NON_FILL_POLYGON_MODE
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: params.depth_write_enabled,
            depth_compare: params.depth_compare,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
    })
}

pub struct SurfaceRenderPipelineSystem {}

impl SurfaceRenderPipelineSystem {
    pub fn layout_desc(
        device: &wgpu::Device,
        bind_group_layouts: &[&wgpu::BindGroupLayout],
    ) -> wgpu::PipelineLayout {
        layout_desc(device, "Surface Render Pipeline Layout", bind_group_layouts)
    }

    /// Alpha blended, depth tested but not written, so it never hides what
    /// is drawn after it.
    pub fn pipeline_desc(
        device: &wgpu::Device,
        pipeline_layout: &wgpu::PipelineLayout,
        shader_module: &wgpu::ShaderModule,
        texture_format: wgpu::TextureFormat,
    ) -> wgpu::RenderPipeline {
        let params = PipelineParams {
            label: "Surface Render Pipeline",
            vertex_layout: Vertex::desc(),
            topology: wgpu::PrimitiveTopology::TriangleList,
            blend: wgpu::BlendState::ALPHA_BLENDING,
            depth_write_enabled: false,
            depth_compare: wgpu::CompareFunction::Less,
        };
        pipeline_desc(device, params, pipeline_layout, shader_module, texture_format)
    }
}

pub struct LineRenderPipelineSystem {}

impl LineRenderPipelineSystem {
    pub fn layout_desc(
        device: &wgpu::Device,
        bind_group_layouts: &[&wgpu::BindGroupLayout],
    ) -> wgpu::PipelineLayout {
        layout_desc(device, "Line Render Pipeline Layout", bind_group_layouts)
    }

    pub fn pipeline_desc(
        device: &wgpu::Device,
        pipeline_layout: &wgpu::PipelineLayout,
        shader_module: &wgpu::ShaderModule,
        texture_format: wgpu::TextureFormat,
    ) -> wgpu::RenderPipeline {
        let params = PipelineParams {
            label: "Line Render Pipeline",
            vertex_layout: LineVertex::desc(),
            topology: wgpu::PrimitiveTopology::TriangleList,
            blend: wgpu::BlendState::REPLACE,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::LessEqual,
        };
        pipeline_desc(device, params, pipeline_layout, shader_module, texture_format)
    }
}

pub struct LabelRenderPipelineSystem {}

impl LabelRenderPipelineSystem {
    pub fn layout_desc(
        device: &wgpu::Device,
        bind_group_layouts: &[&wgpu::BindGroupLayout],
    ) -> wgpu::PipelineLayout {
        layout_desc(device, "Label Render Pipeline Layout", bind_group_layouts)
    }

    // labels ignore depth so the globe never hides them
    pub fn pipeline_desc(
        device: &wgpu::Device,
        pipeline_layout: &wgpu::PipelineLayout,
        shader_module: &wgpu::ShaderModule,
        texture_format: wgpu::TextureFormat,
    ) -> wgpu::RenderPipeline {
        let params = PipelineParams {
            label: "Label Render Pipeline",
            vertex_layout: LabelVertex::desc(),
            topology: wgpu::PrimitiveTopology::LineList,
            blend: wgpu::BlendState::REPLACE,
            depth_write_enabled: false,
            depth_compare: wgpu::CompareFunction::Always,
        };
        pipeline_desc(device, params, pipeline_layout, shader_module, texture_format)
    }
}

pub fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    depth_texture.create_view(&wgpu::TextureViewDescriptor::default())
}
