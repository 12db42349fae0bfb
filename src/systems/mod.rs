pub mod camera;
pub mod labels;
pub mod loader;
pub mod material;
pub mod mesh;
pub mod pipelines;
pub mod scene;
pub mod sphere;
