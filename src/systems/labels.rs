use tracing::debug;

use crate::components::{
    material::Color,
    mesh::{LabelVertex, LineVertex},
    scene::{AxisTitles, Bounds},
};

use super::{material::MaterialSystem, mesh::MeshSystem};

type Segment = [[f32; 2]; 2];

// Stroke glyphs in a 0.6 x 1.0 cell, baseline at y = 0.
const GLYPH_X: &[Segment] = &[[[0.0, 0.0], [0.6, 1.0]], [[0.0, 1.0], [0.6, 0.0]]];
const GLYPH_Y: &[Segment] = &[
    [[0.0, 1.0], [0.3, 0.5]],
    [[0.6, 1.0], [0.3, 0.5]],
    [[0.3, 0.5], [0.3, 0.0]],
];
const GLYPH_Z: &[Segment] = &[
    [[0.0, 1.0], [0.6, 1.0]],
    [[0.6, 1.0], [0.0, 0.0]],
    [[0.0, 0.0], [0.6, 0.0]],
];
const GLYPH_K: &[Segment] = &[
    [[0.0, 1.0], [0.0, 0.0]],
    [[0.0, 0.2], [0.45, 0.6]],
    [[0.15, 0.33], [0.45, 0.0]],
];
const GLYPH_M: &[Segment] = &[
    [[0.0, 0.0], [0.0, 0.6]],
    [[0.0, 0.5], [0.1, 0.6]],
    [[0.1, 0.6], [0.2, 0.6]],
    [[0.2, 0.6], [0.3, 0.5]],
    [[0.3, 0.5], [0.3, 0.0]],
    [[0.3, 0.5], [0.4, 0.6]],
    [[0.4, 0.6], [0.5, 0.6]],
    [[0.5, 0.6], [0.6, 0.5]],
    [[0.6, 0.5], [0.6, 0.0]],
];
const GLYPH_OPEN: &[Segment] = &[
    [[0.4, 1.0], [0.2, 0.75]],
    [[0.2, 0.75], [0.2, 0.25]],
    [[0.2, 0.25], [0.4, 0.0]],
];
const GLYPH_CLOSE: &[Segment] = &[
    [[0.2, 1.0], [0.4, 0.75]],
    [[0.4, 0.75], [0.4, 0.25]],
    [[0.4, 0.25], [0.2, 0.0]],
];
const GLYPH_DASH: &[Segment] = &[[[0.1, 0.5], [0.5, 0.5]]];
const GLYPH_SPACE: &[Segment] = &[];
// anything without a glyph is drawn as a hollow box
const GLYPH_MISSING: &[Segment] = &[
    [[0.0, 0.0], [0.6, 0.0]],
    [[0.6, 0.0], [0.6, 1.0]],
    [[0.6, 1.0], [0.0, 1.0]],
    [[0.0, 1.0], [0.0, 0.0]],
];

const ADVANCE: f32 = 0.8;

pub struct LabelSystem {}

impl LabelSystem {
    pub fn glyph(c: char) -> Option<&'static [Segment]> {
        match c {
            'X' | 'x' => Some(GLYPH_X),
            'Y' | 'y' => Some(GLYPH_Y),
            'Z' | 'z' => Some(GLYPH_Z),
            'k' | 'K' => Some(GLYPH_K),
            'm' | 'M' => Some(GLYPH_M),
            '(' => Some(GLYPH_OPEN),
            ')' => Some(GLYPH_CLOSE),
            '-' => Some(GLYPH_DASH),
            ' ' => Some(GLYPH_SPACE),
            _ => None,
        }
    }

    /// Line-list vertices spelling `text` to the right of `anchor`. `size` is
    /// the glyph height in pixels, the text stays screen aligned.
    pub fn text_geometry(
        text: &str,
        anchor: [f64; 3],
        size: f32,
        color: Color,
        srgb_target: bool,
    ) -> Vec<LabelVertex> {
        let anchor = anchor.map(|c| c as f32);
        let color = MaterialSystem::vertex_color(MaterialSystem::unit_rgb(color), 1.0, srgb_target);
        // small gap between the anchor and the first glyph
        let origin = [0.5 * size, 0.5 * size];

        let mut vertices = Vec::new();
        for (index, c) in text.chars().enumerate() {
            let segments = LabelSystem::glyph(c).unwrap_or_else(|| {
                debug!("no glyph for {:?}", c);
                GLYPH_MISSING
            });
            let x0 = index as f32 * ADVANCE;
            for [a, b] in segments {
                for p in [a, b] {
                    vertices.push(LabelVertex {
                        anchor,
                        offset: [origin[0] + (x0 + p[0]) * size, origin[1] + p[1] * size],
                        color,
                    });
                }
            }
        }
        vertices
    }

    /// Three axis lines through the origin, spanning the bounds (and the
    /// origin itself), with each title placed past the positive end.
    pub fn axes_geometry(
        bounds: &Bounds,
        titles: &AxisTitles,
        label_size: f32,
        srgb_target: bool,
    ) -> (Vec<LineVertex>, Vec<LabelVertex>) {
        let color = MaterialSystem::vertex_color(
            MaterialSystem::unit_rgb(Color::AXIS_GRAY),
            1.0,
            srgb_target,
        );
        let margin = 0.05 * bounds.radius();

        let mut segments = Vec::with_capacity(3);
        let mut labels = Vec::new();
        for (axis, title) in [&titles.x, &titles.y, &titles.z].into_iter().enumerate() {
            let low = bounds.min[axis].min(0.0) - margin;
            let high = bounds.max[axis].max(0.0) + margin;

            let mut start = [0.0f32; 3];
            let mut end = [0.0f32; 3];
            start[axis] = low as f32;
            end[axis] = high as f32;
            segments.push((start, end));

            let mut anchor = [0.0f64; 3];
            anchor[axis] = high;
            labels.extend(LabelSystem::text_geometry(
                title,
                anchor,
                label_size,
                Color::LABEL_WHITE,
                srgb_target,
            ));
        }

        (
            MeshSystem::segments_geometry(segments.into_iter(), 1.5, color),
            labels,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles() -> AxisTitles {
        AxisTitles {
            x: "X (km)".into(),
            y: "Y (km)".into(),
            z: "Z (km)".into(),
        }
    }

    #[test]
    fn axis_titles_have_glyphs() {
        for title in [titles().x, titles().y, titles().z] {
            assert!(title.chars().all(|c| LabelSystem::glyph(c).is_some()), "{title}");
        }
    }

    #[test]
    fn text_is_a_line_list() {
        let vertices = LabelSystem::text_geometry("X (km)", [1.0, 2.0, 3.0], 10.0, Color::RED, false);
        // X:2 (:3 k:3 m:9 ):3 segments, space draws nothing
        assert_eq!(vertices.len(), 2 * (2 + 3 + 3 + 9 + 3));
        assert!(vertices.iter().all(|v| v.anchor == [1.0, 2.0, 3.0]));
        assert!(vertices.iter().all(|v| v.offset[0] >= 5.0 && v.offset[1] >= 5.0));
    }

    #[test]
    fn characters_advance_to_the_right() {
        let a = LabelSystem::text_geometry("X", [0.0; 3], 10.0, Color::RED, false);
        let b = LabelSystem::text_geometry(" X", [0.0; 3], 10.0, Color::RED, false);
        assert_eq!(a.len(), b.len());
        for (va, vb) in a.iter().zip(&b) {
            assert!((vb.offset[0] - va.offset[0] - 8.0).abs() < 1e-4);
            assert_eq!(va.offset[1], vb.offset[1]);
        }
    }

    #[test]
    fn unknown_characters_render_as_a_box() {
        let vertices = LabelSystem::text_geometry("?", [0.0; 3], 10.0, Color::RED, false);
        assert_eq!(vertices.len(), 8);
    }

    #[test]
    fn axes_span_bounds_and_origin() {
        let bounds = Bounds {
            min: [10.0, -5.0, -1.0],
            max: [20.0, 5.0, 1.0],
        };
        let (lines, labels) = LabelSystem::axes_geometry(&bounds, &titles(), 12.0, false);
        assert_eq!(lines.len(), 18);
        assert!(!labels.is_empty());

        // x axis starts at or before the origin even though the bounds don't
        let x_axis = &lines[0];
        assert!(x_axis.start[0] <= 0.0);
        assert!(x_axis.end[0] >= 20.0);
        assert_eq!(x_axis.start[1], 0.0);
        assert_eq!(x_axis.start[2], 0.0);

        let z_axis = &lines[12];
        assert!(z_axis.start[2] < -1.0 && z_axis.end[2] > 1.0);
    }
}
