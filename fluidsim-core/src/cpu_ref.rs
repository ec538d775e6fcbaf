//! Pure-Rust mirrors of the Jacobi-style fluid kernels (spec §4.2, §8),
//! used to check the testable invariants (divergence reduction, dissipation
//! decay curve) without a live GPU adapter. These are not used by the
//! simulator at runtime — `FluidKernels` is the GPU implementation that
//! actually runs every frame — this module exists purely so the PDE math can
//! be unit-tested in CI.

/// A single-channel field on a regular grid, clamp-to-edge indexed to match
/// the `ClampToEdge` sampler address mode every fluid kernel texture uses.
#[derive(Clone, Debug, PartialEq)]
pub struct ScalarGrid {
    pub width: usize,
    pub height: usize,
    pub data: Vec<f32>,
}

impl ScalarGrid {
    pub fn zeros(width: usize, height: usize) -> Self {
        Self { width, height, data: vec![0.0; width * height] }
    }

    pub fn get(&self, x: i64, y: i64) -> f32 {
        let cx = x.clamp(0, self.width as i64 - 1) as usize;
        let cy = y.clamp(0, self.height as i64 - 1) as usize;
        self.data[cy * self.width + cx]
    }

    pub fn set(&mut self, x: usize, y: usize, value: f32) {
        self.data[y * self.width + x] = value;
    }

    pub fn l2_norm(&self) -> f32 {
        self.data.iter().map(|v| v * v).sum::<f32>().sqrt()
    }
}

/// A two-channel (vx, vy) field, same indexing convention as `ScalarGrid`.
#[derive(Clone, Debug, PartialEq)]
pub struct VelocityGrid {
    pub width: usize,
    pub height: usize,
    pub vx: Vec<f32>,
    pub vy: Vec<f32>,
}

impl VelocityGrid {
    pub fn zeros(width: usize, height: usize) -> Self {
        Self { width, height, vx: vec![0.0; width * height], vy: vec![0.0; width * height] }
    }

    pub fn get(&self, x: i64, y: i64) -> (f32, f32) {
        let cx = x.clamp(0, self.width as i64 - 1) as usize;
        let cy = y.clamp(0, self.height as i64 - 1) as usize;
        let i = cy * self.width + cx;
        (self.vx[i], self.vy[i])
    }

    pub fn set(&mut self, x: usize, y: usize, value: (f32, f32)) {
        let i = y * self.width + x;
        self.vx[i] = value.0;
        self.vy[i] = value.1;
    }
}

/// Central-difference divergence (`divergence.wgsl`): mirrors the normal
/// velocity component at each domain edge so the solver behaves as a closed
/// box rather than reading outside-domain garbage.
pub fn divergence(vel: &VelocityGrid) -> ScalarGrid {
    let (w, h) = (vel.width, vel.height);
    let mut out = ScalarGrid::zeros(w, h);
    for y in 0..h {
        for x in 0..w {
            let (cx, cy) = vel.get(x as i64, y as i64);
            let l = if x == 0 { (-cx, cy) } else { vel.get(x as i64 - 1, y as i64) };
            let r = if x + 1 == w { (-cx, cy) } else { vel.get(x as i64 + 1, y as i64) };
            let b = if y == 0 { (cx, -cy) } else { vel.get(x as i64, y as i64 - 1) };
            let t = if y + 1 == h { (cx, -cy) } else { vel.get(x as i64, y as i64 + 1) };
            let div = 0.5 * ((r.0 - l.0) + (t.1 - b.1));
            out.set(x, y, div);
        }
    }
    out
}

/// `curl.wgsl`: `∂v/∂x − ∂u/∂y`.
pub fn curl(vel: &VelocityGrid) -> ScalarGrid {
    let (w, h) = (vel.width, vel.height);
    let mut out = ScalarGrid::zeros(w, h);
    for y in 0..h {
        for x in 0..w {
            let l = vel.get(x as i64 - 1, y as i64).1;
            let r = vel.get(x as i64 + 1, y as i64).1;
            let t = vel.get(x as i64, y as i64 + 1).0;
            let b = vel.get(x as i64, y as i64 - 1).0;
            out.set(x, y, 0.5 * (r - l - t + b));
        }
    }
    out
}

/// One Jacobi relaxation step of `∇²p = div` (`pressure.wgsl`).
pub fn jacobi_step(pressure: &ScalarGrid, div: &ScalarGrid) -> ScalarGrid {
    let (w, h) = (pressure.width, pressure.height);
    let mut out = ScalarGrid::zeros(w, h);
    for y in 0..h {
        for x in 0..w {
            let l = pressure.get(x as i64 - 1, y as i64);
            let r = pressure.get(x as i64 + 1, y as i64);
            let t = pressure.get(x as i64, y as i64 + 1);
            let b = pressure.get(x as i64, y as i64 - 1);
            let d = div.get(x as i64, y as i64);
            out.set(x, y, (l + r + t + b - d) * 0.25);
        }
    }
    out
}

/// Runs `iterations` Jacobi relaxations starting from an all-zero pressure
/// field, as the stepper does each frame (spec §4.3 step 5).
pub fn solve_pressure(div: &ScalarGrid, iterations: u32) -> ScalarGrid {
    let mut pressure = ScalarGrid::zeros(div.width, div.height);
    for _ in 0..iterations {
        pressure = jacobi_step(&pressure, div);
    }
    pressure
}

/// Projects `vel` onto its divergence-free component given a solved pressure
/// field (`gradient_subtract.wgsl`).
pub fn gradient_subtract(pressure: &ScalarGrid, vel: &VelocityGrid) -> VelocityGrid {
    let (w, h) = (vel.width, vel.height);
    let mut out = VelocityGrid::zeros(w, h);
    for y in 0..h {
        for x in 0..w {
            let l = pressure.get(x as i64 - 1, y as i64);
            let r = pressure.get(x as i64 + 1, y as i64);
            let t = pressure.get(x as i64, y as i64 + 1);
            let b = pressure.get(x as i64, y as i64 - 1);
            let (vx, vy) = vel.get(x as i64, y as i64);
            out.set(x, y, (vx - 0.5 * (r - l), vy - 0.5 * (t - b)));
        }
    }
    out
}

/// Runs the full divergence → solve → project pipeline once, returning the
/// projected velocity and its resulting divergence (for comparing L2 norms
/// before/after, spec §8).
pub fn project(vel: &VelocityGrid, pressure_iterations: u32) -> (VelocityGrid, ScalarGrid) {
    let div = divergence(vel);
    let pressure = solve_pressure(&div, pressure_iterations);
    let projected = gradient_subtract(&pressure, vel);
    let post_div = divergence(&projected);
    (projected, post_div)
}

/// Closed-form per-step dissipation multiplier (`advection.wgsl`'s
/// `1 / (1 + dissipation * dt)`), applied `steps` times.
pub fn dissipation_decay(initial: f32, dissipation: f32, dt: f32, steps: u32) -> f32 {
    let per_step = 1.0 / (1.0 + dissipation * dt);
    initial * per_step.powi(steps as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn divergent_velocity(w: usize, h: usize) -> VelocityGrid {
        let mut vel = VelocityGrid::zeros(w, h);
        for y in 0..h {
            for x in 0..w {
                vel.set(x, y, (x as f32 - w as f32 / 2.0, y as f32 - h as f32 / 2.0));
            }
        }
        vel
    }

    #[test]
    fn projection_reduces_divergence_l2_norm() {
        let vel = divergent_velocity(16, 16);
        let pre_div = divergence(&vel);
        let (_, post_div) = project(&vel, 20);
        assert!(post_div.l2_norm() < pre_div.l2_norm());
    }

    #[test]
    fn projection_is_idempotent_on_already_divergence_free_field() {
        let vel = VelocityGrid::zeros(8, 8);
        let (_, post_div) = project(&vel, 20);
        assert!(post_div.l2_norm() < 1e-6);
    }

    #[test]
    fn dissipation_matches_geometric_decay_formula() {
        let dt = 1.0 / 60.0;
        let dissipation = 1.0;
        let decayed = dissipation_decay(1.0, dissipation, dt, 60);
        let expected = (1.0 / (1.0 + dissipation * dt)).powi(60);
        assert!((decayed - expected).abs() < 1e-6);
        assert!(decayed < 1.0);
    }

    #[test]
    fn dissipation_is_monotonically_decreasing() {
        let dt = 1.0 / 60.0;
        let mut prev = 1.0_f32;
        for step in 1..=10u32 {
            let cur = dissipation_decay(1.0, 0.5, dt, step);
            assert!(cur < prev);
            prev = cur;
        }
    }

    #[test]
    fn curl_of_uniform_field_is_zero() {
        let mut vel = VelocityGrid::zeros(8, 8);
        for y in 0..8 {
            for x in 0..8 {
                vel.set(x, y, (1.0, -1.0));
            }
        }
        let c = curl(&vel);
        assert!(c.l2_norm() < 1e-6);
    }
}
