//! Statistic to extrusion height and HSL color.

use crate::config::ChoroplethConfig;

/// Hue of a zero-intensity feature, in degrees (blue).
pub const COLD_HUE_DEG: f64 = 240.0;

/// Visual encoding of one statistic.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Encoded {
    pub intensity: f64,
    pub depth: f64,
    pub hue_deg: f64,
    /// sRGB.
    pub color: [f32; 3],
}

/// Maps a statistic to intensity, depth and color relative to a global max.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ValueEncoder {
    max_value: f64,
    base_height: f64,
    height_range: f64,
    saturation: f64,
    lightness: f64,
}

impl ValueEncoder {
    /// A non-positive or non-finite `max_value` is replaced by 1.
    pub fn new(max_value: f64, cfg: &ChoroplethConfig) -> Self {
        let max_value = if max_value.is_finite() && max_value > 0.0 {
            max_value
        } else {
            1.0
        };
        Self {
            max_value,
            base_height: cfg.base_height,
            height_range: cfg.height_range,
            saturation: cfg.saturation,
            lightness: cfg.lightness,
        }
    }

    pub fn max_value(&self) -> f64 {
        self.max_value
    }

    pub fn intensity(&self, value: f64) -> f64 {
        let i = value / self.max_value;
        if i.is_nan() { 0.0 } else { i.clamp(0.0, 1.0) }
    }

    pub fn depth(&self, value: f64) -> f64 {
        self.base_height + self.intensity(value) * self.height_range
    }

    pub fn hue(&self, value: f64) -> f64 {
        (1.0 - self.intensity(value)) * COLD_HUE_DEG
    }

    pub fn color(&self, value: f64) -> [f32; 3] {
        let [r, g, b] = hsl_to_rgb(self.hue(value), self.saturation, self.lightness);
        [r as f32, g as f32, b as f32]
    }

    pub fn encode(&self, value: f64) -> Encoded {
        Encoded {
            intensity: self.intensity(value),
            depth: self.depth(value),
            hue_deg: self.hue(value),
            color: self.color(value),
        }
    }
}

/// HSL (hue in degrees, saturation and lightness in [0, 1]) to sRGB.
pub fn hsl_to_rgb(hue_deg: f64, saturation: f64, lightness: f64) -> [f64; 3] {
    let h = hue_deg.rem_euclid(360.0) / 60.0;
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let m = lightness - c / 2.0;
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    [r + m, g + m, b + m]
}
