use std::f64::consts::PI;

use tracing::{debug, warn};

use crate::components::sphere::{Grid, SphereMesh};

pub struct SphereSystem {}

impl SphereSystem {
    /// `n` evenly spaced samples over [start, stop], both ends included.
    /// A single sample is `start`; zero samples is empty.
    pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
        match n {
            0 => Vec::new(),
            1 => vec![start],
            _ => {
                let step = (stop - start) / (n - 1) as f64;
                (0..n)
                    .map(|i| if i == n - 1 { stop } else { start + step * i as f64 })
                    .collect()
            }
        }
    }

    /// Samples the sphere of `radius` on an `n`×`n` grid: rows by colatitude
    /// over [0, π], columns by longitude over [-π, π].
    pub fn generate_mesh(n: usize, radius: f64) -> SphereMesh {
        if n == 0 {
            warn!("sphere mesh resolution is 0, the surface will be empty");
        }
        if radius < 0.0 {
            warn!("sphere mesh radius {} is negative", radius);
        }

        let longitude = SphereSystem::linspace(-PI, PI, n);
        let colatitude = SphereSystem::linspace(0.0, PI, n);

        let x = Grid::from_fn(n, n, |i, j| radius * colatitude[i].sin() * longitude[j].cos());
        let y = Grid::from_fn(n, n, |i, j| radius * colatitude[i].sin() * longitude[j].sin());
        let z = Grid::from_fn(n, n, |i, _| radius * colatitude[i].cos());

        debug!("generated {}x{} sphere mesh, radius {}", n, n, radius);
        SphereMesh {
            resolution: n,
            radius,
            x,
            y,
            z,
        }
    }
}
