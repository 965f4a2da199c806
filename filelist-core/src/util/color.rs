//! src/util/color.rs
//!
//! Textual RGBA colour specs used by the row colour options.
//! Accepted forms: `"r g b"`, `"r g b a"` (decimal 0-255) and `"#rrggbb"`,
//! `"#rrggbbaa"`.

use std::{fmt, str::FromStr};

use ratatui::style::Color;
use tracing::warn;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Self = Self::new(255, 255, 255, 255);

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `spec`, falling back to white when it is malformed.
    #[must_use]
    pub fn parse_or_white(spec: &str) -> Self {
        spec.parse().unwrap_or_else(|e: AppError| {
            warn!("Bad colour spec {spec:?}: {e}; using white");
            Self::WHITE
        })
    }
}

impl FromStr for Rgba {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex);
        }

        let parts: Vec<&str> = s.split_whitespace().collect();
        if !(3..=4).contains(&parts.len()) {
            return Err(AppError::invalid_input(
                "color",
                format!("expected 3 or 4 components, got {}", parts.len()),
            ));
        }

        let mut channels = [255u8; 4];
        for (slot, part) in channels.iter_mut().zip(&parts) {
            *slot = part.parse::<u8>().map_err(|e| {
                AppError::invalid_input("color", format!("component {part:?}: {e}"))
            })?;
        }

        let [r, g, b, a] = channels;
        Ok(Self::new(r, g, b, a))
    }
}

fn parse_hex(hex: &str) -> Result<Rgba, AppError> {
    if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
        return Err(AppError::invalid_input(
            "color",
            format!("hex colour must have 6 or 8 digits: #{hex}"),
        ));
    }

    let byte = |i: usize| -> Result<u8, AppError> {
        u8::from_str_radix(&hex[i..i + 2], 16)
            .map_err(|e| AppError::invalid_input("color", format!("#{hex}: {e}")))
    };

    let a = if hex.len() == 8 { byte(6)? } else { 255 };
    Ok(Rgba::new(byte(0)?, byte(2)?, byte(4)?, a))
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.r, self.g, self.b, self.a)
    }
}

// Terminals have no alpha channel.
impl From<Rgba> for Color {
    fn from(c: Rgba) -> Self {
        Self::Rgb(c.r, c.g, c.b)
    }
}
