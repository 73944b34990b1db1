//! Pixel colors for rendered frames and sheets.

/// Straight (non-premultiplied) RGBA, each channel nominally in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    /// Opaque color.
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque gray of the given intensity.
    pub const fn gray(value: f64) -> Self {
        Self::rgb(value, value, value)
    }

    /// Zero alpha. Cleared sheet pixels use this.
    pub const fn transparent() -> Self {
        Self::rgba(0.0, 0.0, 0.0, 0.0)
    }

    /// From `[r, g, b, a]`, the layout used by outline parameters.
    pub const fn from_array(c: [f64; 4]) -> Self {
        Self::rgba(c[0], c[1], c[2], c[3])
    }

    fn map(self, f: impl Fn(f64) -> f64) -> Color {
        Color::rgba(f(self.r), f(self.g), f(self.b), f(self.a))
    }

    /// Blends toward `other` by `t`, clamped to [0, 1]. Alpha blends too.
    pub fn lerp(&self, other: &Color, t: f64) -> Color {
        let t = t.clamp(0.0, 1.0);
        Color::rgba(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
            self.a + (other.a - self.a) * t,
        )
    }

    /// Brightness scaling for shading; alpha is untouched.
    pub fn scale(&self, factor: f64) -> Color {
        Color::rgba(self.r * factor, self.g * factor, self.b * factor, self.a)
    }

    pub fn clamp(&self) -> Color {
        self.map(|v| v.clamp(0.0, 1.0))
    }

    /// Quantizes to the 8-bit RGBA written into PNGs.
    pub fn to_rgba8(&self) -> [u8; 4] {
        let c = self.clamp().map(|v| (v * 255.0).round());
        [c.r as u8, c.g as u8, c.b as u8, c.a as u8]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::transparent()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_clamps_t() {
        let black = Color::gray(0.0);
        let white = Color::gray(1.0);

        assert_eq!(black.lerp(&white, 0.5), Color::gray(0.5));
        assert_eq!(black.lerp(&white, 3.0), white);
        assert_eq!(
            Color::transparent().lerp(&white, 0.25),
            Color::rgba(0.25, 0.25, 0.25, 0.25)
        );
    }

    #[test]
    fn test_scale_keeps_alpha() {
        let c = Color::rgba(0.5, 0.5, 0.5, 0.25).scale(2.0);
        assert_eq!(c, Color::rgba(1.0, 1.0, 1.0, 0.25));
    }

    #[test]
    fn test_rgba8_quantizes_and_clamps() {
        assert_eq!(Color::rgba(0.5, 0.25, 1.5, -0.2).to_rgba8(), [128, 64, 255, 0]);
        assert_eq!(Color::from_array([1.0, 0.0, 0.0, 1.0]).to_rgba8(), [255, 0, 0, 255]);
    }

    #[test]
    fn test_transparent_default() {
        assert_eq!(Color::default().to_rgba8(), [0, 0, 0, 0]);
    }
}
