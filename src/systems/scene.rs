use tracing::info;

use crate::{
    components::{
        orbit::OrbitSampleTable,
        scene::{LineTrace, Scene, SurfaceTrace, Trace},
        sphere::SphereMesh,
    },
    config::Config,
};

pub struct SceneSystem {}

impl SceneSystem {
    /// Orbit line first, then the sphere surface. The title is set once,
    /// here, from the config.
    pub fn assemble(config: &Config, orbit: &OrbitSampleTable, sphere: SphereMesh) -> Scene {
        let mut scene = Scene::new(
            config.title.clone(),
            config.axis_titles.clone(),
            config.aspect_mode,
        );

        scene.add_trace(Trace::Line(LineTrace {
            name: config.orbit_name.clone(),
            x: orbit.xs().to_vec(),
            y: orbit.ys().to_vec(),
            z: orbit.zs().to_vec(),
            style: config.orbit_style,
        }));

        let (x, y, z) = sphere.into_grids();
        scene.add_trace(Trace::Surface(SurfaceTrace {
            name: config.surface_name.clone(),
            x,
            y,
            z,
            colorscale: config.surface_colorscale.clone(),
            opacity: config.surface_opacity,
        }));

        info!(
            "assembled scene '{}' with {} traces",
            scene.title,
            scene.traces().len()
        );
        scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        components::{material::Color, scene::AspectMode},
        systems::{loader::DataLoader, sphere::SphereSystem},
    };

    #[test]
    fn orbit_then_surface_with_labels() {
        let config = Config::default();
        let orbit = DataLoader::read_orbit_table("t,x,y,z\n0,7000,0,0\n1,0,7000,0\n".as_bytes()).unwrap();
        let sphere = SphereSystem::generate_mesh(10, config.earth_radius_km);

        let scene = SceneSystem::assemble(&config, &orbit, sphere);
        assert_eq!(scene.title, "Satellite Orbit around Earth");
        assert_eq!(scene.axis_titles.x, "X (km)");
        assert_eq!(scene.axis_titles.y, "Y (km)");
        assert_eq!(scene.axis_titles.z, "Z (km)");
        assert_eq!(scene.aspect_mode, AspectMode::Data);
        assert_eq!(scene.traces().len(), 2);

        match &scene.traces()[0] {
            Trace::Line(line) => {
                assert_eq!(line.name, "Orbit");
                assert_eq!(line.x, vec![7000.0, 0.0]);
                assert_eq!(line.y, vec![0.0, 7000.0]);
                assert_eq!(line.z, vec![0.0, 0.0]);
                assert_eq!(line.style.color, Color::RED);
                assert_eq!(line.style.width, 4.0);
            }
            other => panic!("expected the orbit first, got {other:?}"),
        }
        match &scene.traces()[1] {
            Trace::Surface(surface) => {
                assert_eq!(surface.z.shape(), (10, 10));
                assert_eq!(surface.opacity, 0.75);
            }
            other => panic!("expected the sphere second, got {other:?}"),
        }

        let bounds = scene.bounds().unwrap();
        assert_eq!(bounds.max[0], 7000.0);
        assert_eq!(bounds.max[2], 6371.0);
    }
}
