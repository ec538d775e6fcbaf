use crate::color::Color;

/// Hard ceiling on the per-step time delta (spec §5), applied by whichever
/// component receives the raw frame `dt` before it reaches the stepper.
pub const SIM_DT_MAX: f32 = 0.05;

/// Runtime-modifiable configuration surface (spec §6). `serde`-derived so a
/// host may load/save it as TOML/JSON if it wants to; the simulator itself
/// never touches the filesystem.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub sim_resolution: u32,
    pub dye_resolution: u32,
    pub bloom_resolution: u32,
    pub sunrays_resolution: u32,

    pub density_dissipation: f32,
    pub velocity_dissipation: f32,
    /// Pressure warm-start decay, multiplicative, `[0,1]` (Open Question b).
    pub pressure: f32,
    pub pressure_iterations: u32,
    pub bloom_iterations: u32,
    /// Vorticity confinement strength.
    pub curl: f32,

    pub splat_radius: f32,
    pub splat_force: f32,

    pub shading: bool,
    pub bloom: bool,
    pub sunrays: bool,
    pub colorful: bool,
    pub paused: bool,
    pub transparent: bool,

    pub bloom_intensity: f32,
    pub bloom_threshold: f32,
    pub bloom_soft_knee: f32,
    pub sunrays_weight: f32,
    pub color_update_speed: f32,

    pub back_color: Color,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            sim_resolution: 128,
            dye_resolution: 1024,
            bloom_resolution: 256,
            sunrays_resolution: 196,

            density_dissipation: 1.0,
            velocity_dissipation: 0.2,
            pressure: 0.8,
            pressure_iterations: 20,
            bloom_iterations: 8,
            curl: 30.0,

            splat_radius: 0.25,
            splat_force: 6000.0,

            shading: true,
            bloom: true,
            sunrays: true,
            colorful: true,
            paused: false,
            transparent: false,

            bloom_intensity: 0.8,
            bloom_threshold: 0.6,
            bloom_soft_knee: 0.7,
            sunrays_weight: 1.0,
            color_update_speed: 10.0,

            back_color: Color::BLACK,
        }
    }
}

impl SimConfig {
    /// Bitmask of the three display-pipeline keywords, in a fixed bit order
    /// (`SHADING = bit 0`, `BLOOM = bit 1`, `SUNRAYS = bit 2`). Used by the
    /// Display Compositor to key its pipeline-variant cache (spec §4.1/§4.5).
    pub fn display_keyword_bits(&self) -> u8 {
        (self.shading as u8) | ((self.bloom as u8) << 1) | ((self.sunrays as u8) << 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_bits_are_independent() {
        let mut cfg = SimConfig { shading: false, bloom: false, sunrays: false, ..Default::default() };
        assert_eq!(cfg.display_keyword_bits(), 0);
        cfg.shading = true;
        assert_eq!(cfg.display_keyword_bits(), 0b001);
        cfg.bloom = true;
        assert_eq!(cfg.display_keyword_bits(), 0b011);
        cfg.sunrays = true;
        assert_eq!(cfg.display_keyword_bits(), 0b111);
    }

    #[test]
    fn default_round_trips_through_json() {
        let cfg = SimConfig::default();
        let encoded = serde_json::to_string(&cfg).expect("serialize");
        let decoded: SimConfig = serde_json::from_str(&encoded).expect("deserialize");
        assert_eq!(cfg.sim_resolution, decoded.sim_resolution);
        assert_eq!(cfg.splat_force, decoded.splat_force);
    }
}
