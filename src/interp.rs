//! Bicubic spline upsampler
//!
//! Upsamples the sensor's 8x8 grid to 48x48 for display. The interpolation is
//! separable: a 1-D natural cubic spline is evaluated along rows, then along
//! columns. Because both the source knots and the target coordinates are fixed,
//! the whole 1-D evaluation collapses into a 48x8 weight matrix computed once at
//! construction; per frame the upsample is two small matrix products,
//! `W * Z * W^T`.

/// Sensor resolution per axis.
pub const SENSOR_DIM: usize = 8;

/// Upsampling multiplier.
pub const INTERP_MULT: usize = 6;

/// Interpolated resolution per axis.
pub const INTERP_DIM: usize = SENSOR_DIM * INTERP_MULT;

/// Raw sensor grid, `grid[row][col]`.
pub type SensorGrid = [[f64; SENSOR_DIM]; SENSOR_DIM];

/// Upsampled grid, row-major `INTERP_DIM * INTERP_DIM` values.
#[derive(Debug, Clone, PartialEq)]
pub struct InterpGrid {
    data: Vec<f64>,
}

impl InterpGrid {
    /// Value at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * INTERP_DIM + col]
    }

    /// Row-major backing slice.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Number of values (always `INTERP_DIM * INTERP_DIM`).
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Fixed-basis 8x8 -> 48x48 spline interpolator.
///
/// Knots sit at `linspace(0, 8, 8)` and targets at `linspace(0, 8, 48)` on both
/// axes, mirroring the sensor's coordinate convention. Pure function of the
/// input grid; no state is carried between frames.
pub struct Interpolator {
    /// `weights[i][j]`: contribution of knot `j` to target `i`.
    weights: Vec<[f64; SENSOR_DIM]>,
}

impl Default for Interpolator {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpolator {
    pub fn new() -> Self {
        let knots = linspace(0.0, SENSOR_DIM as f64, SENSOR_DIM);
        let targets = linspace(0.0, SENSOR_DIM as f64, INTERP_DIM);

        // Column j of the weight matrix is the natural cubic spline through the
        // j-th unit vector, evaluated at every target.
        let mut weights = vec![[0.0; SENSOR_DIM]; INTERP_DIM];
        for j in 0..SENSOR_DIM {
            let mut unit = [0.0; SENSOR_DIM];
            unit[j] = 1.0;
            let m = second_derivatives(&knots, &unit);
            for (i, &x) in targets.iter().enumerate() {
                weights[i][j] = spline_eval(&knots, &unit, &m, x);
            }
        }
        Self { weights }
    }

    /// Upsample one sensor grid to `INTERP_DIM x INTERP_DIM`.
    pub fn upsample(&self, grid: &SensorGrid) -> InterpGrid {
        // Rows first: tmp[i][c] = sum_j W[i][j] * grid[j][c]
        let mut tmp = vec![[0.0f64; SENSOR_DIM]; INTERP_DIM];
        for (i, w) in self.weights.iter().enumerate() {
            for j in 0..SENSOR_DIM {
                let wij = w[j];
                for c in 0..SENSOR_DIM {
                    tmp[i][c] += wij * grid[j][c];
                }
            }
        }

        // Columns: out[i][k] = sum_c tmp[i][c] * W[k][c]
        let mut data = vec![0.0f64; INTERP_DIM * INTERP_DIM];
        for i in 0..INTERP_DIM {
            let row = &tmp[i];
            let out_row = &mut data[i * INTERP_DIM..(i + 1) * INTERP_DIM];
            for (k, w) in self.weights.iter().enumerate() {
                let mut acc = 0.0;
                for c in 0..SENSOR_DIM {
                    acc += row[c] * w[c];
                }
                out_row[k] = acc;
            }
        }
        InterpGrid { data }
    }
}

fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    let step = (end - start) / (n - 1) as f64;
    (0..n).map(|i| start + step * i as f64).collect()
}

/// Second derivatives of the natural cubic spline through `(xs, ys)`.
///
/// Tridiagonal (Thomas) solve with natural boundary conditions
/// (`m[0] = m[n-1] = 0`).
fn second_derivatives(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    let n = xs.len();
    let mut m = vec![0.0; n];
    if n < 3 {
        return m;
    }

    // Forward sweep over the interior rows.
    let mut c_prime = vec![0.0; n];
    let mut d_prime = vec![0.0; n];
    for i in 1..n - 1 {
        let h_lo = xs[i] - xs[i - 1];
        let h_hi = xs[i + 1] - xs[i];
        let a = h_lo;
        let b = 2.0 * (h_lo + h_hi);
        let c = h_hi;
        let d = 6.0 * ((ys[i + 1] - ys[i]) / h_hi - (ys[i] - ys[i - 1]) / h_lo);

        let denom = b - a * c_prime[i - 1];
        c_prime[i] = c / denom;
        d_prime[i] = (d - a * d_prime[i - 1]) / denom;
    }

    // Back substitution.
    for i in (1..n - 1).rev() {
        m[i] = d_prime[i] - c_prime[i] * m[i + 1];
    }
    m
}

/// Evaluate the spline defined by knots `xs`, values `ys`, and second
/// derivatives `m` at `x`. Clamps to the end segments outside the knot range.
fn spline_eval(xs: &[f64], ys: &[f64], m: &[f64], x: f64) -> f64 {
    let n = xs.len();
    let seg = match xs[1..n - 1].iter().position(|&k| x < k) {
        Some(p) => p,
        None => n - 2,
    };

    let h = xs[seg + 1] - xs[seg];
    let a = (xs[seg + 1] - x) / h;
    let b = (x - xs[seg]) / h;
    a * ys[seg]
        + b * ys[seg + 1]
        + ((a * a * a - a) * m[seg] + (b * b * b - b) * m[seg + 1]) * (h * h) / 6.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_output_shape() {
        let grid = [[21.0; SENSOR_DIM]; SENSOR_DIM];
        let out = Interpolator::new().upsample(&grid);
        assert_eq!(out.len(), INTERP_DIM * INTERP_DIM);
        assert_eq!(INTERP_DIM, 48);
    }

    #[test]
    fn test_constant_grid_stays_constant() {
        let grid = [[22.5; SENSOR_DIM]; SENSOR_DIM];
        let out = Interpolator::new().upsample(&grid);
        for &v in out.as_slice() {
            assert!((v - 22.5).abs() < EPS, "got {v}");
        }
    }

    #[test]
    fn test_linear_ramp_is_preserved() {
        // f(x, y) = x + 2y at the knot coordinates; a natural cubic spline
        // reproduces affine data exactly.
        let step = SENSOR_DIM as f64 / (SENSOR_DIM - 1) as f64;
        let mut grid = [[0.0; SENSOR_DIM]; SENSOR_DIM];
        for (r, row) in grid.iter_mut().enumerate() {
            for (c, v) in row.iter_mut().enumerate() {
                *v = (r as f64) * step + 2.0 * (c as f64) * step;
            }
        }
        let out = Interpolator::new().upsample(&grid);

        let t_step = SENSOR_DIM as f64 / (INTERP_DIM - 1) as f64;
        for r in 0..INTERP_DIM {
            for c in 0..INTERP_DIM {
                let expected = (r as f64) * t_step + 2.0 * (c as f64) * t_step;
                let got = out.get(r, c);
                assert!(
                    (got - expected).abs() < 1e-6,
                    "({r},{c}): got {got}, expected {expected}"
                );
            }
        }
    }

    #[test]
    fn test_corners_are_exact() {
        // Target endpoints coincide with knot endpoints on both axes.
        let mut grid = [[20.0; SENSOR_DIM]; SENSOR_DIM];
        grid[0][0] = 17.0;
        grid[0][SENSOR_DIM - 1] = 23.0;
        grid[SENSOR_DIM - 1][0] = 29.0;
        grid[SENSOR_DIM - 1][SENSOR_DIM - 1] = 31.0;
        let out = Interpolator::new().upsample(&grid);
        assert!((out.get(0, 0) - 17.0).abs() < EPS);
        assert!((out.get(0, INTERP_DIM - 1) - 23.0).abs() < EPS);
        assert!((out.get(INTERP_DIM - 1, 0) - 29.0).abs() < EPS);
        assert!((out.get(INTERP_DIM - 1, INTERP_DIM - 1) - 31.0).abs() < EPS);
    }

    #[test]
    fn test_weights_partition_unity() {
        // Each target's knot weights sum to 1 (constant reproduction per axis).
        let interp = Interpolator::new();
        for (i, w) in interp.weights.iter().enumerate() {
            let sum: f64 = w.iter().sum();
            assert!((sum - 1.0).abs() < EPS, "row {i}: sum {sum}");
        }
    }

    #[test]
    fn test_second_derivatives_natural_ends() {
        let xs = linspace(0.0, 8.0, 8);
        let ys = [0.0, 1.0, 4.0, 9.0, 16.0, 25.0, 36.0, 49.0];
        let m = second_derivatives(&xs, &ys);
        assert_eq!(m[0], 0.0);
        assert_eq!(m[7], 0.0);
    }

    #[test]
    fn test_spline_passes_through_knots() {
        let xs = linspace(0.0, 8.0, 8);
        let ys = [3.0, -1.0, 2.5, 7.0, 0.0, 4.0, 4.0, -2.0];
        let m = second_derivatives(&xs, &ys);
        for (i, &x) in xs.iter().enumerate() {
            let v = spline_eval(&xs, &ys, &m, x);
            assert!((v - ys[i]).abs() < EPS, "knot {i}: got {v}");
        }
    }
}
