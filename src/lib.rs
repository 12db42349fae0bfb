pub mod components;
pub mod config;
pub mod errors;
pub mod systems;
mod world;

use anyhow::Context;
use components::{
    camera::CameraComponent,
    mesh::MeshComponent,
    render_pipelines::{DrawableComponent, RenderPipelineComponent},
    scene::{Bounds, Scene, Trace},
};
use config::Config;
use errors::{render_error, Result, VizError};
use systems::{
    camera::CameraSystem,
    labels::LabelSystem,
    loader::DataLoader,
    mesh::MeshSystem,
    pipelines::{
        create_depth_view, LabelRenderPipelineSystem, LineRenderPipelineSystem,
        SurfaceRenderPipelineSystem,
    },
    scene::SceneSystem,
    sphere::SphereSystem,
};
use tracing::{debug, info, warn};
use wgpu::Surface;
use winit::{
    event::*,
    event_loop::{ControlFlow, EventLoop},
    platform::run_return::EventLoopExtRunReturn,
    window::{Window, WindowBuilder},
};
use world::World;

pub trait Uniform {
    // uniform structs are padded to 16 bytes so they stay valid on every backend
    fn create_uniform_buffer<T: bytemuck::Pod>(device: &wgpu::Device, data: &T) -> wgpu::Buffer;

    fn create_uniform_bind_group(
        device: &wgpu::Device,
        buffer: &wgpu::Buffer,
        layout: &wgpu::BindGroupLayout,
    ) -> wgpu::BindGroup;
}

/// Final stage of the pipeline. Displaying is terminal: `render` returns once
/// the scene is no longer shown.
pub trait SceneRenderer {
    fn render(&mut self, scene: &Scene) -> Result<()>;
}

pub fn matrix4_to_array(mat: cgmath::Matrix4<f32>) -> [[f32; 4]; 4] {
    mat.into()
}

/// Load, mesh, assemble, render. Loader failures return before the renderer
/// is touched.
pub fn run_pipeline<R: SceneRenderer>(config: &Config, renderer: &mut R) -> Result<()> {
    let orbit = DataLoader::load_orbit_table(&config.data_path)?;
    let sphere = SphereSystem::generate_mesh(config.mesh_resolution, config.earth_radius_km);
    let scene = SceneSystem::assemble(config, &orbit, sphere);
    renderer.render(&scene)
}

pub fn run(config: Config) -> anyhow::Result<()> {
    let mut renderer = WindowRenderer::new(&config);
    run_pipeline(&config, &mut renderer)
        .with_context(|| format!("failed to show {}", config.data_path.display()))
}

/// Shows the scene in a native window until it is closed.
pub struct WindowRenderer {
    width: u32,
    height: u32,
    fovy_deg: f32,
    zoom_step: f32,
    rotate_step_deg: f32,
    label_size: f32,
}

impl WindowRenderer {
    pub fn new(config: &Config) -> Self {
        Self {
            width: config.window_width,
            height: config.window_height,
            fovy_deg: config.fovy_deg,
            zoom_step: config.zoom_step,
            rotate_step_deg: config.rotate_step_deg,
            label_size: config.label_size,
        }
    }
}

impl SceneRenderer for WindowRenderer {
    fn render(&mut self, scene: &Scene) -> Result<()> {
        let mut event_loop = EventLoop::new();
        let window = WindowBuilder::new()
            .with_title(&scene.title)
            .with_inner_size(winit::dpi::LogicalSize::new(self.width, self.height))
            .build(&event_loop)
            .map_err(|e| render_error!("cannot open window: {}", e))?;

        let mut state = pollster::block_on(State::new(&window, scene, self))?;
        let mut outcome: Result<()> = Ok(());

        event_loop.run_return(|event, _, control_flow| match event {
            Event::WindowEvent {
                ref event,
                window_id,
            } if window_id == window.id() => {
                if !state.input(event) {
                    match event {
                        WindowEvent::CloseRequested
                        | WindowEvent::KeyboardInput {
                            input:
                                KeyboardInput {
                                    state: ElementState::Pressed,
                                    virtual_keycode: Some(VirtualKeyCode::Escape),
                                    ..
                                },
                            ..
                        } => *control_flow = ControlFlow::Exit,
                        WindowEvent::Resized(physical_size) => {
                            state.resize(*physical_size);
                        }
                        WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                            // new_inner_size is &&mut so we have to dereference it twice
                            state.resize(**new_inner_size);
                        }
                        _ => {}
                    }
                }
            }
            Event::RedrawRequested(window_id) if window_id == window.id() => {
                state.update();
                match state.render() {
                    Ok(_) => {}
                    // Reconfigure the surface if lost
                    Err(wgpu::SurfaceError::Lost) => state.resize(state.size),
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        outcome = Err(render_error!("out of GPU memory"));
                        *control_flow = ControlFlow::Exit;
                    }
                    // All other errors (Outdated, Timeout) should be resolved by the next frame
                    Err(e) => warn!("{:?}", e),
                }
            }
            Event::MainEventsCleared => {
                // RedrawRequested will only trigger once, unless we manually
                // request it.
                window.request_redraw();
            }
            _ => {}
        });

        info!("window closed");
        outcome
    }
}

struct State {
    size: winit::dpi::PhysicalSize<u32>,
    surface: wgpu::Surface,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,

    world: World,
    camera_component: CameraComponent,
}

impl State {
    async fn new(window: &Window, scene: &Scene, renderer: &WindowRenderer) -> Result<Self> {
        let size = window.inner_size();

        let instance = State::create_instance();

        // # Safety
        // The surface needs to live as long as the window that created it.
        // The window outlives the event loop that owns this state.
        let surface = unsafe { instance.create_surface(window) }
            .map_err(|e| render_error!("cannot create surface: {}", e))?;
        let adapter = State::create_adapter(&instance, &surface).await?;
        info!("using adapter {:?}", adapter.get_info().name);
        let (device, queue) = State::create_device_and_queue(&adapter).await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| render_error!("surface has no supported formats"))?;
        let srgb_target = surface_format.is_srgb();

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps
                .present_modes
                .first()
                .copied()
                .unwrap_or(wgpu::PresentMode::Fifo),
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
        };
        surface.configure(&device, &config);
        let depth_view = create_depth_view(&device, config.width, config.height);

        // CAMERA
        let bounds = scene.bounds().unwrap_or(Bounds::point([0.0; 3]));
        let model_scale = CameraSystem::aspect_scale(scene.aspect_mode, &bounds);
        let view_bounds = bounds.scaled(model_scale);
        let aspect = config.width as f32 / config.height as f32;
        let camera = CameraSystem::frame_bounds(&view_bounds, aspect, renderer.fovy_deg);
        let camera_controller = CameraSystem::create_controller(
            &camera,
            &view_bounds,
            renderer.zoom_step,
            renderer.rotate_step_deg,
        );
        let (camera_uniform, camera_buffer, camera_bind_group, camera_bind_group_layout) =
            CameraSystem::create_camera_resources(
                &device,
                &camera,
                model_scale,
                config.width,
                config.height,
            );
        let camera_component = CameraComponent {
            camera,
            camera_uniform,
            camera_buffer,
            camera_bind_group,
            camera_bind_group_layout,
            camera_controller,
        };

        let mut world = World::new();
        let layouts: &[&wgpu::BindGroupLayout] = &[&camera_component.camera_bind_group_layout];

        // GUIDES
        // opaque, so they go before any translucent trace
        let (axis_vertices, label_vertices) =
            LabelSystem::axes_geometry(&bounds, &scene.axis_titles, renderer.label_size, srgb_target);
        let line_shader = device.create_shader_module(wgpu::include_wgsl!("./shaders/line.wgsl"));
        let label_shader = device.create_shader_module(wgpu::include_wgsl!("./shaders/label.wgsl"));
        let surface_shader =
            device.create_shader_module(wgpu::include_wgsl!("./shaders/surface.wgsl"));

        if let Some(mesh) = MeshSystem::create_mesh(&device, &axis_vertices, None) {
            let layout = LineRenderPipelineSystem::layout_desc(&device, layouts);
            let pipeline =
                LineRenderPipelineSystem::pipeline_desc(&device, &layout, &line_shader, config.format);
            State::spawn(&mut world, DrawableComponent::Guide("axes"), mesh, pipeline, layout);
        }
        if let Some(mesh) = MeshSystem::create_mesh(&device, &label_vertices, None) {
            let layout = LabelRenderPipelineSystem::layout_desc(&device, layouts);
            let pipeline =
                LabelRenderPipelineSystem::pipeline_desc(&device, &layout, &label_shader, config.format);
            State::spawn(&mut world, DrawableComponent::Guide("axis labels"), mesh, pipeline, layout);
        }

        // TRACES
        for trace in scene.traces() {
            let drawable = DrawableComponent::Trace(trace.name().to_string());
            match trace {
                Trace::Line(line) => {
                    let vertices = MeshSystem::polyline_geometry(line, srgb_target);
                    let Some(mesh) = MeshSystem::create_mesh(&device, &vertices, None) else {
                        warn!("trace '{}' has fewer than two points, nothing to draw", line.name);
                        continue;
                    };
                    let layout = LineRenderPipelineSystem::layout_desc(&device, layouts);
                    let pipeline = LineRenderPipelineSystem::pipeline_desc(
                        &device,
                        &layout,
                        &line_shader,
                        config.format,
                    );
                    State::spawn(&mut world, drawable, mesh, pipeline, layout);
                }
                Trace::Surface(surface) => {
                    let (vertices, indices) = MeshSystem::surface_geometry(surface, srgb_target);
                    let Some(mesh) = MeshSystem::create_mesh(&device, &vertices, Some(indices.as_slice()))
                    else {
                        warn!("surface '{}' has no cells, nothing to draw", surface.name);
                        continue;
                    };
                    let layout = SurfaceRenderPipelineSystem::layout_desc(&device, layouts);
                    let pipeline = SurfaceRenderPipelineSystem::pipeline_desc(
                        &device,
                        &layout,
                        &surface_shader,
                        config.format,
                    );
                    State::spawn(&mut world, drawable, mesh, pipeline, layout);
                }
            }
        }
        debug!("scene world holds {} entities", world.entities_count);

        Ok(Self {
            size,
            surface,
            device,
            queue,
            config,
            depth_view,
            world,
            camera_component,
        })
    }

    fn spawn(
        world: &mut World,
        drawable: DrawableComponent,
        mesh: MeshComponent,
        render_pipeline: wgpu::RenderPipeline,
        render_pipeline_layout: wgpu::PipelineLayout,
    ) {
        let entity = world.new_entity();
        debug!("entity {} draws {:?}", entity, drawable);
        world.add_component_to_entity(entity, drawable);
        world.add_component_to_entity(entity, mesh);
        world.add_component_to_entity(
            entity,
            RenderPipelineComponent {
                render_pipeline,
                render_pipeline_layout,
            },
        );
    }

    pub fn create_instance() -> wgpu::Instance {
        wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        })
    }

    pub async fn create_adapter(instance: &wgpu::Instance, surface: &Surface) -> Result<wgpu::Adapter> {
        instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| render_error!("no compatible GPU adapter"))
    }

    pub async fn create_device_and_queue(adapter: &wgpu::Adapter) -> Result<(wgpu::Device, wgpu::Queue)> {
        adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    features: wgpu::Features::empty(),
                    limits: wgpu::Limits::downlevel_defaults(),
                    label: None,
                },
                None, // Trace path
            )
            .await
            .map_err(|e| VizError::Render(format!("cannot open device: {e}")))
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth_view = create_depth_view(&self.device, new_size.width, new_size.height);
            self.camera_component.camera.aspect = new_size.width as f32 / new_size.height as f32;
            self.camera_component
                .camera_uniform
                .update_viewport(new_size.width, new_size.height);
        }
    }

    fn input(&mut self, event: &WindowEvent) -> bool {
        self.camera_component
            .camera_controller
            .process_events(event)
    }

    fn update(&mut self) {
        self.camera_component
            .camera_controller
            .update_camera(&mut self.camera_component.camera);
        self.camera_component
            .camera_uniform
            .update_view_proj(&self.camera_component.camera);
        self.queue.write_buffer(
            &self.camera_component.camera_buffer,
            0,
            bytemuck::cast_slice(&[self.camera_component.camera_uniform]),
        );
    }

    pub fn render(&mut self) -> std::result::Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: 0.02,
                        g: 0.02,
                        b: 0.03,
                        a: 1.0,
                    }),
                    store: true,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: true,
                }),
                stencil_ops: None,
            }),
        });

        render_pass.set_bind_group(0, &self.camera_component.camera_bind_group, &[]);

        for entity_id in self
            .world
            .query_entities_with::<MeshComponent, RenderPipelineComponent>()
        {
            let render_pipeline = self
                .world
                .get_component::<RenderPipelineComponent>(entity_id);
            let mesh = self.world.get_component::<MeshComponent>(entity_id);

            if let (Some(render_pipeline), Some(mesh)) = (render_pipeline, mesh) {
                render_pass.set_pipeline(&render_pipeline.render_pipeline);
                render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                match &mesh.index_buffer {
                    Some(index_buffer) => {
                        render_pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                        render_pass.draw_indexed(0..mesh.num_elements, 0, 0..1);
                    }
                    None => render_pass.draw(0..mesh.num_elements, 0..1),
                }
            }
        }

        drop(render_pass);

        // submit will accept anything that implements IntoIter
        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::sphere::Grid;
    use std::io::Write;

    #[derive(Default)]
    struct RecordingRenderer {
        scenes: Vec<Scene>,
    }

    impl SceneRenderer for RecordingRenderer {
        fn render(&mut self, scene: &Scene) -> Result<()> {
            self.scenes.push(scene.clone());
            Ok(())
        }
    }

    fn config_for(path: &std::path::Path) -> Config {
        Config {
            data_path: path.to_path_buf(),
            ..Config::default()
        }
    }

    fn radius_of(x: &Grid, y: &Grid, z: &Grid, row: usize, col: usize) -> f64 {
        let (x, y, z) = (
            x.get(row, col).unwrap(),
            y.get(row, col).unwrap(),
            z.get(row, col).unwrap(),
        );
        (x * x + y * y + z * z).sqrt()
    }

    #[test]
    fn two_sample_orbit_end_to_end() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "t,x,y,z\n0,7000,0,0\n1,0,7000,0\n").unwrap();

        let mut renderer = RecordingRenderer::default();
        run_pipeline(&config_for(file.path()), &mut renderer).unwrap();

        assert_eq!(renderer.scenes.len(), 1);
        let scene = &renderer.scenes[0];
        assert_eq!(scene.title, config::SCENE_TITLE);
        assert_eq!(scene.traces().len(), 2);

        let Trace::Line(orbit) = &scene.traces()[0] else {
            panic!("orbit trace must come first");
        };
        assert_eq!(orbit.x, vec![7000.0, 0.0]);
        assert_eq!(orbit.y, vec![0.0, 7000.0]);
        assert_eq!(orbit.z, vec![0.0, 0.0]);

        let Trace::Surface(sphere) = &scene.traces()[1] else {
            panic!("sphere trace must come second");
        };
        assert_eq!(sphere.x.shape(), (200, 200));
        assert_eq!(sphere.y.shape(), (200, 200));
        assert_eq!(sphere.z.shape(), (200, 200));
        for (row, col) in [(0, 0), (57, 123), (199, 199), (100, 0)] {
            approx::assert_relative_eq!(
                radius_of(&sphere.x, &sphere.y, &sphere.z, row, col),
                6371.0,
                max_relative = 1e-12
            );
        }
    }

    #[test]
    fn missing_file_never_reaches_the_renderer() {
        let dir = tempfile::tempdir().unwrap();
        let mut renderer = RecordingRenderer::default();

        let err = run_pipeline(&config_for(&dir.path().join("orbit.csv")), &mut renderer).unwrap_err();
        assert!(matches!(err, VizError::FileAccess { .. }), "{err:?}");
        assert!(renderer.scenes.is_empty());
    }

    #[test]
    fn short_row_never_reaches_the_renderer() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "t,x,y,z\n0,7000,0,0\n1,0,7000\n").unwrap();

        let mut renderer = RecordingRenderer::default();
        let err = run_pipeline(&config_for(file.path()), &mut renderer).unwrap_err();
        assert!(matches!(err, VizError::Parse { .. }), "{err:?}");
        assert!(renderer.scenes.is_empty());
    }

    #[test]
    fn renderer_errors_propagate() {
        struct Failing;
        impl SceneRenderer for Failing {
            fn render(&mut self, _scene: &Scene) -> Result<()> {
                Err(render_error!("no display"))
            }
        }

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "t,x,y,z\n0,7000,0,0\n").unwrap();
        let err = run_pipeline(&config_for(file.path()), &mut Failing).unwrap_err();
        assert_eq!(err.to_string(), "render error no display");
    }
}
