//! Figure composition: header text, renderer axes, caption and logo.
//!
//! Charts are drawn by plotters into an RGB buffer, which is then wrapped as
//! an [`image`] buffer so the logo can be alpha-composited before the PNG is
//! written.

use crate::color::Theme;
use crate::layout::{add_header, AxesRect, Figure, HeaderLayout, HeaderMetrics, POINTS_PER_INCH};
use crate::traits::{ChartRenderer, DrawContext, PlotArea};
use fbviz_common::{FbvizError, Result};
use fbviz_config::StyleConfig;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, RgbImage, RgbaImage};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;
use tracing::debug;

/// Padding around the canvas edge, figure fraction.
const EDGE_PAD: f64 = 0.02;

/// Height reserved under the lowest axes for the caption, figure fraction.
const CAPTION_BAND: f64 = 0.04;

/// Smallest logo box, figure fraction of the height.
const MIN_LOGO_SIZE: f64 = 0.08;

/// Title, subtitle and optional logo of one chart.
#[derive(Debug, Clone, Default)]
pub struct ChartHeader {
    /// Title, wrapped.
    pub title: String,
    /// Subtitle, wrapped and justified.
    pub subtitle: String,
    /// Encoded logo image.
    pub logo: Option<Vec<u8>>,
}

impl ChartHeader {
    /// Header without a logo.
    pub fn new(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
            logo: None,
        }
    }

    /// Attaches logo bytes.
    #[must_use]
    pub fn with_logo(mut self, logo: Vec<u8>) -> Self {
        self.logo = Some(logo);
        self
    }
}

impl From<&StyleConfig> for HeaderMetrics {
    fn from(style: &StyleConfig) -> Self {
        Self {
            title_font_size: style.title_font_size,
            title_line_spacing: style.title_line_spacing,
            subtitle_font_size: style.subtitle_font_size,
            subtitle_line_spacing: style.subtitle_line_spacing,
            ..Self::default()
        }
    }
}

/// Pixel rectangle: left, top, width, height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width.
    pub width: u32,
    /// Height.
    pub height: u32,
}

/// Maps figure fractions to canvas pixels.
///
/// The canvas grows downward past the nominal figure when the header has
/// pushed axes below the bottom edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasGeometry {
    /// Nominal figure width in pixels.
    pub width: u32,
    /// Nominal figure height in pixels.
    pub nominal_height: u32,
    /// Canvas height in pixels.
    pub height: u32,
}

impl CanvasGeometry {
    /// Geometry for `figure` with room for the caption band when needed.
    pub fn for_figure(figure: &Figure, caption: bool) -> Self {
        let (width, nominal_height) = figure.pixel_size();
        let band = if caption { CAPTION_BAND } else { EDGE_PAD };
        let lowest = figure
            .axes
            .iter()
            .map(|a| a.bottom)
            .fold(f64::INFINITY, f64::min);
        let bottom = if lowest.is_finite() { (lowest - band).min(0.0) } else { 0.0 };
        let height = ((1.0 - bottom) * f64::from(nominal_height)).round() as u32;
        Self {
            width,
            nominal_height,
            height: height.max(nominal_height),
        }
    }

    /// Pixel rectangle of `axes`.
    pub fn rect(&self, axes: &AxesRect) -> PixelRect {
        let (w, h) = (f64::from(self.width), f64::from(self.nominal_height));
        PixelRect {
            x: (axes.left * w).round() as i32,
            y: ((1.0 - axes.top()) * h).round() as i32,
            width: (axes.width * w).round().max(1.0) as u32,
            height: (axes.height * h).round().max(1.0) as u32,
        }
    }

    /// Pixel y of a figure-fraction y.
    pub fn y(&self, fraction: f64) -> i32 {
        ((1.0 - fraction) * f64::from(self.nominal_height)).round() as i32
    }
}

/// Renders `data` with `renderer` into an RGBA image.
pub fn render_chart<R: ChartRenderer>(
    renderer: &R,
    data: &R::Data,
    header: &ChartHeader,
    style: &StyleConfig,
) -> Result<RgbaImage> {
    let theme = Theme::from_style(style)?;
    let (width_in, height_in) = renderer.figure_size(data, style);
    if !(width_in > 0.0 && height_in > 0.0) {
        return Err(FbvizError::validation("Figure size must be positive"));
    }

    let mut figure = Figure::new(width_in, height_in, style.dpi, renderer.axes(data));
    let layout = add_header(
        &mut figure,
        &header.title,
        &header.subtitle,
        &HeaderMetrics::from(style),
    );
    let geometry = CanvasGeometry::for_figure(&figure, style.caption.is_some());
    let ctx = DrawContext {
        theme: &theme,
        font_family: &style.font_family,
        px_per_pt: f64::from(style.dpi) / POINTS_PER_INCH,
    };
    debug!(
        "Rendering {} at {}x{} px with {} axes",
        renderer.name(),
        geometry.width,
        geometry.height,
        figure.axes.len()
    );

    let mut buffer = vec![0u8; geometry.width as usize * geometry.height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (geometry.width, geometry.height))
            .into_drawing_area();
        root.fill(&theme.background)?;

        let panels: Vec<PlotArea<'_>> = figure
            .axes
            .iter()
            .map(|axes| {
                let rect = geometry.rect(axes);
                root.clone().shrink((rect.x, rect.y), (rect.width as i32, rect.height as i32))
            })
            .collect();
        renderer.draw(&panels, data, &ctx)?;

        draw_header(&root, &figure, &geometry, &layout, style, &ctx)?;
        if let Some(caption) = style.caption.as_deref() {
            let pad = (EDGE_PAD * f64::from(geometry.nominal_height)).round() as i32;
            let anchor = Pos::new(HPos::Right, VPos::Bottom);
            root.draw(&Text::new(
                caption.to_string(),
                (geometry.width as i32 - pad, geometry.height as i32 - pad / 2),
                ctx.text(style.subtitle_font_size * 0.8, theme.subtitle).pos(anchor),
            ))?;
        }
        root.present()?;
    }

    let rgb = RgbImage::from_raw(geometry.width, geometry.height, buffer)
        .ok_or_else(|| FbvizError::render("Canvas buffer has the wrong size"))?;
    let mut canvas = DynamicImage::ImageRgb8(rgb).to_rgba8();

    if let Some(bytes) = header.logo.as_deref() {
        let size = (layout.title_height + layout.subtitle_height).max(MIN_LOGO_SIZE);
        let side = (size * f64::from(geometry.nominal_height)).round() as u32;
        let pad = (EDGE_PAD * f64::from(geometry.nominal_height)).round() as u32;
        let target = PixelRect {
            x: geometry.width.saturating_sub(side + pad) as i32,
            y: pad as i32,
            width: side,
            height: side,
        };
        overlay_logo(&mut canvas, bytes, target, style.greyscale_logo)?;
    }

    Ok(canvas)
}

fn draw_header(
    root: &PlotArea<'_>,
    figure: &Figure,
    geometry: &CanvasGeometry,
    layout: &HeaderLayout,
    style: &StyleConfig,
    ctx: &DrawContext<'_>,
) -> Result<()> {
    let left = figure
        .axes
        .iter()
        .map(|a| a.left)
        .fold(f64::INFINITY, f64::min);
    let x = if left.is_finite() {
        (left * f64::from(geometry.width)).round() as i32
    } else {
        0
    };
    let top_left = Pos::new(HPos::Left, VPos::Top);

    let mut y = geometry.y(1.0 - EDGE_PAD);
    let title_step = f64::from(ctx.px(style.title_font_size)) * style.title_line_spacing;
    for (i, line) in layout.title_lines.iter().enumerate() {
        root.draw(&Text::new(
            line.clone(),
            (x, y + (i as f64 * title_step).round() as i32),
            ctx.bold(style.title_font_size, ctx.theme.title).pos(top_left),
        ))?;
    }

    if !layout.title_lines.is_empty() {
        y = geometry.y(1.0 - EDGE_PAD - layout.title_height - HeaderMetrics::default().spacing);
    }
    let subtitle_step = f64::from(ctx.px(style.subtitle_font_size)) * style.subtitle_line_spacing;
    for (i, line) in layout.subtitle_lines.iter().enumerate() {
        root.draw(&Text::new(
            line.clone(),
            (x, y + (i as f64 * subtitle_step).round() as i32),
            ctx.text(style.subtitle_font_size, ctx.theme.subtitle).pos(top_left),
        ))?;
    }
    Ok(())
}

/// Decodes `bytes`, fits the image inside `target` keeping its aspect ratio
/// and composites it onto `canvas`.
pub fn overlay_logo(canvas: &mut RgbaImage, bytes: &[u8], target: PixelRect, greyscale: bool) -> Result<()> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| FbvizError::render_with_source("Failed to decode logo", e))?;
    let logo = if greyscale {
        DynamicImage::ImageLumaA8(decoded.to_luma_alpha8()).to_rgba8()
    } else {
        decoded.to_rgba8()
    };
    if logo.width() == 0 || logo.height() == 0 {
        return Err(FbvizError::render("Logo image is empty"));
    }

    let (width, height) = fit_within(logo.dimensions(), (target.width, target.height));
    let resized = imageops::resize(&logo, width, height, FilterType::Triangle);
    let x = i64::from(target.x) + i64::from((target.width - width) / 2);
    let y = i64::from(target.y) + i64::from((target.height - height) / 2);
    imageops::overlay(canvas, &resized, x, y);
    Ok(())
}

/// Largest size with the aspect ratio of `source` that fits in `bounds`.
pub fn fit_within(source: (u32, u32), bounds: (u32, u32)) -> (u32, u32) {
    if source.0 == 0 || source.1 == 0 {
        return (0, 0);
    }
    let scale = (f64::from(bounds.0) / f64::from(source.0)).min(f64::from(bounds.1) / f64::from(source.1));
    (
        ((f64::from(source.0) * scale).round() as u32).clamp(1, bounds.0.max(1)),
        ((f64::from(source.1) * scale).round() as u32).clamp(1, bounds.1.max(1)),
    )
}

/// Writes `image` as PNG, creating parent directories.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| FbvizError::render_with_source(format!("Failed to write {}", path.display()), e))
}
