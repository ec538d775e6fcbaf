//! sRGB color used for the back color, pointer colors, and splat tints.

/// Linear-ish `[0,1]` RGB triple. No alpha — callers that need alpha pair
/// this with a separate float (e.g. the display compositor derives alpha
/// from `max(r, g, b)` rather than storing one).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color { r: 0.0, g: 0.0, b: 0.0 };

    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// HSV to RGB, `h/s/v` all in `[0,1]`. Matches the standard six-sector
    /// conversion used for pointer and splat colors.
    pub fn from_hsv(h: f32, s: f32, v: f32) -> Self {
        let i = (h * 6.0).floor();
        let f = h * 6.0 - i;
        let p = v * (1.0 - s);
        let q = v * (1.0 - f * s);
        let t = v * (1.0 - (1.0 - f) * s);
        let (r, g, b) = match (i as i64).rem_euclid(6) {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };
        Self { r, g, b }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hsv_primary_colors() {
        let red = Color::from_hsv(0.0, 1.0, 1.0);
        assert!((red.r - 1.0).abs() < 1e-6 && red.g.abs() < 1e-6 && red.b.abs() < 1e-6);

        let green = Color::from_hsv(1.0 / 3.0, 1.0, 1.0);
        assert!(green.g > 0.99 && green.r.abs() < 1e-3 && green.b.abs() < 1e-3);
    }

    #[test]
    fn hsv_zero_saturation_is_gray() {
        let c = Color::from_hsv(0.42, 0.0, 0.7);
        assert!((c.r - 0.7).abs() < 1e-6);
        assert!((c.g - 0.7).abs() < 1e-6);
        assert!((c.b - 0.7).abs() < 1e-6);
    }
}
