use crate::components::material::{Color, Colorscale};

pub struct MaterialSystem {}

impl MaterialSystem {
    /// Color at `t` in [0, 1] (clamped) as sRGB components in [0, 1].
    pub fn sample(colorscale: &Colorscale, t: f64) -> [f32; 3] {
        let stops = colorscale.stops();
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) as f32 };

        let (first, last) = match (stops.first(), stops.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return [0.0, 0.0, 0.0],
        };
        if t <= first.0 {
            return MaterialSystem::unit_rgb(first.1);
        }
        if t >= last.0 {
            return MaterialSystem::unit_rgb(last.1);
        }

        let upper = stops.iter().position(|(p, _)| *p >= t).unwrap_or(stops.len() - 1);
        let (p0, c0) = stops[upper - 1];
        let (p1, c1) = stops[upper];
        let f = if p1 > p0 { (t - p0) / (p1 - p0) } else { 0.0 };
        let a = MaterialSystem::unit_rgb(c0);
        let b = MaterialSystem::unit_rgb(c1);
        [0, 1, 2].map(|k| a[k] + (b[k] - a[k]) * f)
    }

    pub fn unit_rgb(color: Color) -> [f32; 3] {
        [color.r, color.g, color.b].map(|c| c as f32 / 255.0)
    }

    pub fn srgb_to_linear(c: f32) -> f32 {
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }

    /// RGBA for a vertex. When the surface format is sRGB the GPU encodes on
    /// write, so colors are handed over linear.
    pub fn vertex_color(rgb: [f32; 3], alpha: f32, srgb_target: bool) -> [f32; 4] {
        let [r, g, b] = if srgb_target {
            rgb.map(MaterialSystem::srgb_to_linear)
        } else {
            rgb
        };
        [r, g, b, alpha]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn endpoints_match_first_and_last_stop() {
        let blues = Colorscale::blues();
        assert_eq!(
            MaterialSystem::sample(&blues, 0.0),
            MaterialSystem::unit_rgb(Color::rgb(247, 251, 255))
        );
        assert_eq!(
            MaterialSystem::sample(&blues, 1.0),
            MaterialSystem::unit_rgb(Color::rgb(8, 48, 107))
        );
        // out of range is clamped
        assert_eq!(
            MaterialSystem::sample(&blues, 3.0),
            MaterialSystem::sample(&blues, 1.0)
        );
        assert_eq!(
            MaterialSystem::sample(&blues, -1.0),
            MaterialSystem::sample(&blues, 0.0)
        );
    }

    #[test]
    fn interpolates_between_stops() {
        let scale = Colorscale::new(vec![
            (1.0, Color::rgb(255, 255, 255)),
            (0.0, Color::rgb(0, 0, 0)),
        ]);
        let mid = MaterialSystem::sample(&scale, 0.25);
        for c in mid {
            assert_relative_eq!(c, 0.25, epsilon = 1e-6);
        }
    }

    #[test]
    fn blues_darken_monotonically() {
        let blues = Colorscale::blues();
        let mut previous = f32::MAX;
        for step in 0..=20 {
            let [r, g, b] = MaterialSystem::sample(&blues, step as f64 / 20.0);
            let luma = 0.2126 * r + 0.7152 * g + 0.0722 * b;
            assert!(luma <= previous + 1e-6);
            previous = luma;
        }
    }

    #[test]
    fn linear_conversion_keeps_endpoints() {
        assert_eq!(MaterialSystem::srgb_to_linear(0.0), 0.0);
        assert_relative_eq!(MaterialSystem::srgb_to_linear(1.0), 1.0, epsilon = 1e-6);
        assert_relative_eq!(MaterialSystem::srgb_to_linear(0.5), 0.214, epsilon = 1e-3);

        let c = MaterialSystem::vertex_color([0.5, 0.5, 0.5], 0.75, false);
        assert_eq!(c, [0.5, 0.5, 0.5, 0.75]);
    }
}
