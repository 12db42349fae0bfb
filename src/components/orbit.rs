/// Orbit samples in column form: time plus Earth-centered x, y, z in km.
///
/// Built once by the loader and read-only afterwards. All four columns always
/// have the same length.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OrbitSampleTable {
    times: Vec<f64>,
    xs: Vec<f64>,
    ys: Vec<f64>,
    zs: Vec<f64>,
}

impl OrbitSampleTable {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            times: Vec::with_capacity(capacity),
            xs: Vec::with_capacity(capacity),
            ys: Vec::with_capacity(capacity),
            zs: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, time: f64, position: [f64; 3]) {
        self.times.push(time);
        self.xs.push(position[0]);
        self.ys.push(position[1]);
        self.zs.push(position[2]);
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    // time is carried along but nothing in the scene uses it
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    pub fn zs(&self) -> &[f64] {
        &self.zs
    }

    pub fn positions(&self) -> impl Iterator<Item = [f64; 3]> + '_ {
        self.xs
            .iter()
            .zip(&self.ys)
            .zip(&self.zs)
            .map(|((x, y), z)| [*x, *y, *z])
    }
}
