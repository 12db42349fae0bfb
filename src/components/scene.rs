use super::{
    material::{Color, Colorscale},
    sphere::Grid,
};

/// How axis units are scaled against each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AspectMode {
    /// one unit is the same length on every axis
    Data,
    /// every axis is stretched so the scene bounds form a cube
    Cube,
}

/// Solid line style. Width is in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub color: Color,
    pub width: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineTrace {
    pub name: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
    pub style: LineStyle,
}

impl LineTrace {
    pub fn points(&self) -> impl Iterator<Item = [f64; 3]> + '_ {
        self.x
            .iter()
            .zip(&self.y)
            .zip(&self.z)
            .map(|((x, y), z)| [*x, *y, *z])
    }
}

/// Surface over a grid. Cells are colored by their z value through `colorscale`.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceTrace {
    pub name: String,
    pub x: Grid,
    pub y: Grid,
    pub z: Grid,
    pub colorscale: Colorscale,
    pub opacity: f32,
}

impl SurfaceTrace {
    pub fn points(&self) -> impl Iterator<Item = [f64; 3]> + '_ {
        self.x
            .values()
            .iter()
            .zip(self.y.values())
            .zip(self.z.values())
            .map(|((x, y), z)| [*x, *y, *z])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Trace {
    Line(LineTrace),
    Surface(SurfaceTrace),
}

impl Trace {
    pub fn name(&self) -> &str {
        match self {
            Trace::Line(line) => &line.name,
            Trace::Surface(surface) => &surface.name,
        }
    }

    fn extend_bounds(&self, bounds: &mut Option<Bounds>) {
        let mut add = |p: [f64; 3]| {
            if let Some(b) = bounds.as_mut() {
                b.include(p);
            } else {
                *bounds = Some(Bounds::point(p));
            }
        };
        match self {
            Trace::Line(line) => line.points().for_each(&mut add),
            Trace::Surface(surface) => surface.points().for_each(&mut add),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisTitles {
    pub x: String,
    pub y: String,
    pub z: String,
}

/// Declarative description of what gets displayed. Traces are drawn in
/// insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub title: String,
    pub axis_titles: AxisTitles,
    pub aspect_mode: AspectMode,
    traces: Vec<Trace>,
}

impl Scene {
    pub fn new(title: impl Into<String>, axis_titles: AxisTitles, aspect_mode: AspectMode) -> Self {
        Self {
            title: title.into(),
            axis_titles,
            aspect_mode,
            traces: Vec::new(),
        }
    }

    pub fn add_trace(&mut self, trace: Trace) {
        self.traces.push(trace);
    }

    pub fn traces(&self) -> &[Trace] {
        &self.traces
    }

    /// Axis-aligned box around every trace point, None if the scene has no points.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut bounds = None;
        for trace in &self.traces {
            trace.extend_bounds(&mut bounds);
        }
        bounds
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl Bounds {
    pub fn point(p: [f64; 3]) -> Self {
        Self { min: p, max: p }
    }

    pub fn include(&mut self, p: [f64; 3]) {
        for axis in 0..3 {
            // NaN samples are left out of the box
            if p[axis] < self.min[axis] {
                self.min[axis] = p[axis];
            }
            if p[axis] > self.max[axis] {
                self.max[axis] = p[axis];
            }
        }
    }

    pub fn center(&self) -> [f64; 3] {
        [0, 1, 2].map(|a| 0.5 * (self.min[a] + self.max[a]))
    }

    pub fn extent(&self) -> [f64; 3] {
        [0, 1, 2].map(|a| self.max[a] - self.min[a])
    }

    /// half of the box diagonal
    pub fn radius(&self) -> f64 {
        let [dx, dy, dz] = self.extent();
        0.5 * (dx * dx + dy * dy + dz * dz).sqrt()
    }

    pub fn scaled(&self, scale: [f64; 3]) -> Self {
        Self {
            min: [0, 1, 2].map(|a| self.min[a] * scale[a]),
            max: [0, 1, 2].map(|a| self.max[a] * scale[a]),
        }
    }
}
