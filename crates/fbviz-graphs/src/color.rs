//! Hex colour parsing and the resolved chart theme.

use fbviz_common::{FbvizError, Result};
use fbviz_config::StyleConfig;
use plotters::style::RGBColor;

/// Parses `#rrggbb`.
pub fn parse_color(value: &str) -> Result<RGBColor> {
    let hex = value
        .strip_prefix('#')
        .filter(|hex| hex.len() == 6 && hex.is_ascii())
        .ok_or_else(|| FbvizError::validation(format!("Invalid colour '{}'", value)))?;

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16)
            .map_err(|_| FbvizError::validation(format!("Invalid colour '{}'", value)))
    };
    Ok(RGBColor(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Linear blend from `low` at `t = 0` to `high` at `t = 1`. `t` is clamped.
pub fn gradient(low: RGBColor, high: RGBColor, t: f64) -> RGBColor {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let mix = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
    RGBColor(mix(low.0, high.0), mix(low.1, high.1), mix(low.2, high.2))
}

/// Colours resolved once from [`StyleConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    /// Canvas fill.
    pub background: RGBColor,
    /// Axes fill.
    pub plot_background: RGBColor,
    /// Title text.
    pub title: RGBColor,
    /// Subtitle, labels and caption.
    pub subtitle: RGBColor,
    /// Grid lines.
    pub grid: RGBColor,
    /// Low end of value gradients.
    pub low: RGBColor,
    /// High end of value gradients.
    pub high: RGBColor,
    /// Categorical series colours.
    pub palette: Vec<RGBColor>,
}

impl Theme {
    /// Resolves every colour in `style`.
    pub fn from_style(style: &StyleConfig) -> Result<Self> {
        let palette = style
            .palette
            .iter()
            .map(|c| parse_color(c))
            .collect::<Result<Vec<_>>>()?;
        if palette.is_empty() {
            return Err(FbvizError::validation_field(
                "Palette needs at least one colour",
                "style.palette",
            ));
        }

        Ok(Self {
            background: parse_color(&style.background)?,
            plot_background: parse_color(&style.plot_background)?,
            title: parse_color(&style.title_color)?,
            subtitle: parse_color(&style.subtitle_color)?,
            grid: parse_color(&style.grid_color)?,
            low: parse_color(&style.low_color)?,
            high: parse_color(&style.high_color)?,
            palette,
        })
    }

    /// Palette colour for series `index`, cycling.
    pub fn series(&self, index: usize) -> RGBColor {
        self.palette[index % self.palette.len()]
    }

    /// Gradient colour for `value` within `[min, max]`.
    pub fn scale(&self, value: f64, min: f64, max: f64) -> RGBColor {
        let span = max - min;
        let t = if span.abs() < f64::EPSILON {
            1.0
        } else {
            (value - min) / span
        };
        gradient(self.low, self.high, t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("#ff8000").unwrap(), RGBColor(255, 128, 0));
        assert_eq!(parse_color("#EEEEEE").unwrap(), RGBColor(238, 238, 238));
        assert!(parse_color("ff8000").is_err());
        assert!(parse_color("#ff80").is_err());
        assert!(parse_color("#gg8000").is_err());
        assert!(parse_color("#ff80é").is_err());
    }

    #[test]
    fn test_gradient_endpoints_and_clamp() {
        let (low, high) = (RGBColor(0, 0, 0), RGBColor(200, 100, 50));
        assert_eq!(gradient(low, high, 0.0), low);
        assert_eq!(gradient(low, high, 1.0), high);
        assert_eq!(gradient(low, high, 0.5), RGBColor(100, 50, 25));
        assert_eq!(gradient(low, high, 7.0), high);
        assert_eq!(gradient(low, high, f64::NAN), low);
    }

    #[test]
    fn test_theme_from_default_style() {
        let theme = Theme::from_style(&StyleConfig::default()).unwrap();
        assert_eq!(theme.background, RGBColor(0xee, 0xee, 0xee));
        assert_eq!(theme.series(0), theme.series(theme.palette.len()));
        assert_eq!(theme.scale(5.0, 5.0, 5.0), theme.high);
        assert_eq!(theme.scale(0.0, 0.0, 10.0), theme.low);
    }

    #[test]
    fn test_theme_rejects_empty_palette() {
        let style = StyleConfig {
            palette: Vec::new(),
            ..StyleConfig::default()
        };
        assert!(Theme::from_style(&style).is_err());
    }
}
