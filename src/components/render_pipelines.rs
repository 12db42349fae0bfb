pub struct RenderPipelineComponent {
    pub render_pipeline: wgpu::RenderPipeline,
    pub render_pipeline_layout: wgpu::PipelineLayout,
}

/// What an entity stands for in the scene. Guides are the axes and their labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawableComponent {
    Guide(&'static str),
    Trace(String),
}
