use std::path::PathBuf;

use crate::components::{
    material::{Color, Colorscale},
    scene::{AspectMode, AxisTitles, LineStyle},
};

pub const DATA_PATH: &str = "build/orbit.csv";
pub const EARTH_RADIUS_KM: f64 = 6371.0;
pub const MESH_RESOLUTION: usize = 200;
pub const SCENE_TITLE: &str = "Satellite Orbit around Earth";

pub struct Config {
    pub data_path: PathBuf,
    pub earth_radius_km: f64,
    pub mesh_resolution: usize,
    pub title: String,
    pub axis_titles: AxisTitles,
    pub aspect_mode: AspectMode,
    pub orbit_name: String,
    pub orbit_style: LineStyle,
    pub surface_name: String,
    pub surface_colorscale: Colorscale,
    pub surface_opacity: f32,
    pub window_width: u32,
    pub window_height: u32,
    pub fovy_deg: f32,
    /// fraction of the camera distance covered by one zoom step
    pub zoom_step: f32,
    pub rotate_step_deg: f32,
    /// label glyph height in pixels
    pub label_size: f32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_path: PathBuf::from(DATA_PATH),
            earth_radius_km: EARTH_RADIUS_KM,
            mesh_resolution: MESH_RESOLUTION,
            title: SCENE_TITLE.to_string(),
            axis_titles: AxisTitles {
                x: "X (km)".to_string(),
                y: "Y (km)".to_string(),
                z: "Z (km)".to_string(),
            },
            aspect_mode: AspectMode::Data,
            orbit_name: "Orbit".to_string(),
            orbit_style: LineStyle {
                color: Color::RED,
                width: 4.0,
            },
            surface_name: "Earth".to_string(),
            surface_colorscale: Colorscale::blues(),
            surface_opacity: 0.75,
            window_width: 1080,
            window_height: 1080,
            fovy_deg: 45.0,
            zoom_step: 0.02,
            rotate_step_deg: 1.0,
            label_size: 14.0,
        }
    }
}
