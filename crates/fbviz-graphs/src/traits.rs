//! Chart renderer and logo source traits.

use crate::color::Theme;
use crate::layout::{AxesRect, DEFAULT_AXES};
use async_trait::async_trait;
use fbviz_common::Result;
use fbviz_config::StyleConfig;
use plotters::coord::Shift;
use plotters::prelude::*;

/// One axes' drawing area on the in-memory bitmap.
pub type PlotArea<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

/// Style values a renderer draws with.
#[derive(Debug, Clone, Copy)]
pub struct DrawContext<'a> {
    /// Resolved colours.
    pub theme: &'a Theme,
    /// Font family name.
    pub font_family: &'a str,
    /// Pixels per typographic point.
    pub px_per_pt: f64,
}

impl<'a> DrawContext<'a> {
    /// A font of `points` size in `color`.
    pub fn text(&self, points: f64, color: RGBColor) -> TextStyle<'a> {
        FontDesc::new(
            FontFamily::from(self.font_family),
            points * self.px_per_pt,
            FontStyle::Normal,
        )
        .color(&color)
    }

    /// Bold variant of [`DrawContext::text`].
    pub fn bold(&self, points: f64, color: RGBColor) -> TextStyle<'a> {
        FontDesc::new(
            FontFamily::from(self.font_family),
            points * self.px_per_pt,
            FontStyle::Bold,
        )
        .color(&color)
    }

    /// Converts a length in points to whole pixels.
    pub fn px(&self, points: f64) -> u32 {
        (points * self.px_per_pt).round().max(1.0) as u32
    }
}

/// Draws one chart type into pre-placed axes areas.
///
/// The renderer chooses its axes layout and figure size; the canvas places
/// the header, shifts the axes and hands back one [`PlotArea`] per axes, in
/// the order returned by [`ChartRenderer::axes`].
pub trait ChartRenderer: Send + Sync {
    /// The data this chart draws.
    type Data;

    /// Short identifier, also the default file name.
    fn name(&self) -> &'static str;

    /// One-line description.
    fn description(&self) -> &'static str;

    /// Axes positions in figure fractions, before the header shift.
    fn axes(&self, _data: &Self::Data) -> Vec<AxesRect> {
        vec![DEFAULT_AXES]
    }

    /// Figure size in inches.
    fn figure_size(&self, _data: &Self::Data, style: &StyleConfig) -> (f64, f64) {
        (style.width_in, style.height_in)
    }

    /// Draws `data` into `panels`.
    fn draw(&self, panels: &[PlotArea<'_>], data: &Self::Data, ctx: &DrawContext<'_>) -> Result<()>;
}

/// Fetches logo image bytes by URL.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LogoSource: Send + Sync {
    /// Downloads the image at `url`.
    async fn fetch_logo(&self, url: &str) -> Result<Vec<u8>>;
}
