use egui::Color32;

use crate::error::FeatureError;

pub const DEFAULT_STROKE_COLOR: Color32 = Color32::from_rgb(0xff, 0x00, 0x00);
pub const DEFAULT_FILL_COLOR: Color32 = Color32::from_rgb(0xff, 0x66, 0x66);
pub const DEFAULT_FILL_OPACITY: f32 = 0.5;
pub const DEFAULT_WEIGHT: f32 = 3.0;

/// Parse `#rrggbb` or `#rgb`.
pub fn parse_hex_color(text: &str) -> Result<Color32, FeatureError> {
    let invalid = || FeatureError::InvalidColor(text.to_string());
    let hex = text.trim().strip_prefix('#').ok_or_else(invalid)?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
    match hex.len() {
        6 => Ok(Color32::from_rgb(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        3 => {
            let short = |i: usize| channel(&hex[i..=i]).map(|v| v * 17);
            Ok(Color32::from_rgb(short(0)?, short(1)?, short(2)?))
        }
        _ => Err(invalid()),
    }
}

/// Lowercase `#rrggbb`; alpha is dropped.
pub fn to_hex(color: Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b())
}

/// Paint options for one shape layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeStyle {
    pub stroke_color: Color32,
    pub fill_color: Color32,
    pub fill_opacity: f32,
    pub weight: f32,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        StyleState::default().shape_style(DEFAULT_FILL_OPACITY)
    }
}

impl ShapeStyle {
    pub fn stroke(&self) -> egui::Stroke {
        egui::Stroke::new(self.weight, self.stroke_color)
    }

    /// Fill color with the fill opacity applied.
    pub fn fill(&self) -> Color32 {
        let alpha = (self.fill_opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        Color32::from_rgba_unmultiplied(self.fill_color.r(), self.fill_color.g(), self.fill_color.b(), alpha)
    }

    /// Same style with the stroke and fill faded, for layers pending removal.
    pub fn faded(&self) -> Self {
        Self {
            stroke_color: self.stroke_color.gamma_multiply(0.35),
            fill_opacity: self.fill_opacity * 0.35,
            ..*self
        }
    }
}

/// The stroke/fill pair currently selected in the style panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleState {
    pub stroke_color: Color32,
    pub fill_color: Color32,
}

impl Default for StyleState {
    fn default() -> Self {
        Self {
            stroke_color: DEFAULT_STROKE_COLOR,
            fill_color: DEFAULT_FILL_COLOR,
        }
    }
}

impl StyleState {
    pub fn new(stroke_color: Color32, fill_color: Color32) -> Self {
        Self { stroke_color, fill_color }
    }

    pub fn shape_style(&self, fill_opacity: f32) -> ShapeStyle {
        ShapeStyle {
            stroke_color: self.stroke_color,
            fill_color: self.fill_color,
            fill_opacity,
            weight: DEFAULT_WEIGHT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex_color("#ff6666").unwrap(), Color32::from_rgb(255, 102, 102));
        assert_eq!(parse_hex_color("#F00").unwrap(), Color32::from_rgb(255, 0, 0));
        assert!(parse_hex_color("ff0000").is_err());
        assert!(parse_hex_color("#ff00").is_err());
        assert!(parse_hex_color("#gg0000").is_err());
    }

    #[test]
    fn test_hex_output_is_lowercase() {
        assert_eq!(to_hex(Color32::from_rgb(0xFF, 0x66, 0x66)), "#ff6666");
    }

    #[test]
    fn test_fill_applies_opacity() {
        let style = StyleState::default().shape_style(0.5);
        assert_eq!(style.fill().a(), 128);
    }
}
