/// Dense row-major 2D grid of values.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Grid {
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                data.push(f(i, j));
            }
        }
        Self { rows, cols, data }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    pub fn values(&self) -> &[f64] {
        &self.data
    }

    /// (min, max) over all cells, None for an empty grid
    pub fn range(&self) -> Option<(f64, f64)> {
        self.data.iter().fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}

/// X, Y, Z grids of a sphere centered at the origin.
///
/// Rows run along colatitude (north pole first), columns along longitude
/// (from -π). Produced by [`crate::systems::sphere::SphereSystem::generate_mesh`].
#[derive(Debug, Clone, PartialEq)]
pub struct SphereMesh {
    pub(crate) resolution: usize,
    pub(crate) radius: f64,
    pub(crate) x: Grid,
    pub(crate) y: Grid,
    pub(crate) z: Grid,
}

impl SphereMesh {
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn x(&self) -> &Grid {
        &self.x
    }

    pub fn y(&self) -> &Grid {
        &self.y
    }

    pub fn z(&self) -> &Grid {
        &self.z
    }

    pub fn point(&self, row: usize, col: usize) -> Option<[f64; 3]> {
        Some([
            self.x.get(row, col)?,
            self.y.get(row, col)?,
            self.z.get(row, col)?,
        ])
    }

    pub fn z_range(&self) -> Option<(f64, f64)> {
        self.z.range()
    }

    pub fn into_grids(self) -> (Grid, Grid, Grid) {
        (self.x, self.y, self.z)
    }
}
