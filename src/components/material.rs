/// 8-bit sRGB color, the way trace styles are written down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const AXIS_GRAY: Color = Color::rgb(160, 160, 170);
    pub const LABEL_WHITE: Color = Color::rgb(235, 235, 235);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Piecewise linear color scale. Stops are sorted by position and span [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct Colorscale {
    stops: Vec<(f32, Color)>,
}

impl Colorscale {
    pub fn new(mut stops: Vec<(f32, Color)>) -> Self {
        stops.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self { stops }
    }

    /// Sequential "Blues", light at the low end and dark navy at the high end.
    pub fn blues() -> Self {
        let colors = [
            Color::rgb(247, 251, 255),
            Color::rgb(222, 235, 247),
            Color::rgb(198, 219, 239),
            Color::rgb(158, 202, 225),
            Color::rgb(107, 174, 214),
            Color::rgb(66, 146, 198),
            Color::rgb(33, 113, 181),
            Color::rgb(8, 81, 156),
            Color::rgb(8, 48, 107),
        ];
        let last = (colors.len() - 1) as f32;
        Self::new(
            colors
                .iter()
                .enumerate()
                .map(|(i, c)| (i as f32 / last, *c))
                .collect(),
        )
    }

    pub fn stops(&self) -> &[(f32, Color)] {
        &self.stops
    }
}
