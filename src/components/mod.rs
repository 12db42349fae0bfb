pub mod camera;
pub mod material;
pub mod mesh;
pub mod orbit;
pub mod render_pipelines;
pub mod scene;
pub mod sphere;
