use serde::{Deserialize, Serialize};

use stillrisk_core::models::assessment::RiskBand;

/// An sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (the `#` is optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Channels scaled to `[0, 1]`.
    pub fn unit(self) -> (f32, f32, f32) {
        (
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
        )
    }
}

/// Colours and type sizes for the PDF report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportStyles {
    pub header_background: Color,
    pub title: Color,
    pub subtitle: Color,
    pub body: Color,
    pub accent: Color,
    pub table_stripe: Color,

    pub badge_low: Color,
    pub badge_moderate: Color,
    pub badge_high: Color,

    pub segment_low: Color,
    pub segment_moderate: Color,
    pub segment_high: Color,

    /// Title size in points.
    pub title_size: f64,
    pub subtitle_size: f64,
    pub heading_size: f64,
    pub body_size: f64,
    pub badge_size: f64,
    pub label_size: f64,
}

impl Default for ReportStyles {
    fn default() -> Self {
        Self {
            header_background: Color::rgb(0xec, 0xfd, 0xf5),
            title: Color::rgb(0x0f, 0x17, 0x2a),
            subtitle: Color::rgb(0x47, 0x55, 0x69),
            body: Color::rgb(0x33, 0x41, 0x55),
            accent: Color::rgb(0x10, 0xb9, 0x81),
            table_stripe: Color::rgb(0xf0, 0xfd, 0xf4),

            badge_low: Color::rgb(0x16, 0xa3, 0x4a),
            badge_moderate: Color::rgb(0xd9, 0x77, 0x06),
            badge_high: Color::rgb(0xdc, 0x26, 0x26),

            segment_low: Color::rgb(0x86, 0xef, 0xac),
            segment_moderate: Color::rgb(0xfd, 0xe6, 0x8a),
            segment_high: Color::rgb(0xfe, 0xca, 0xca),

            title_size: 18.0,
            subtitle_size: 10.0,
            heading_size: 12.0,
            body_size: 10.0,
            badge_size: 11.0,
            label_size: 9.0,
        }
    }
}

impl ReportStyles {
    pub fn badge(&self, band: RiskBand) -> Color {
        match band {
            RiskBand::Low => self.badge_low,
            RiskBand::Moderate => self.badge_moderate,
            RiskBand::High => self.badge_high,
        }
    }

    pub fn segment(&self, band: RiskBand) -> Color {
        match band {
            RiskBand::Low => self.segment_low,
            RiskBand::Moderate => self.segment_moderate,
            RiskBand::High => self.segment_high,
        }
    }
}
