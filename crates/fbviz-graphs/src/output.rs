//! Chart output: logo download, rendering and PNG placement.

use crate::canvas::{render_chart, save_png, ChartHeader};
use crate::traits::{ChartRenderer, LogoSource};
use fbviz_common::{FbvizError, Result};
use fbviz_config::StyleConfig;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// What to put on top of a chart and where to save it.
#[derive(Debug, Clone, Default)]
pub struct ChartRequest {
    /// Title text.
    pub title: String,
    /// Subtitle text.
    pub subtitle: String,
    /// Logo to download and composite.
    pub logo_url: Option<String>,
    /// Folder under the output directory.
    pub sub_folder: String,
    /// File name without extension.
    pub name: String,
}

/// `<output_dir>/<sub_folder>/<name>.png`. Path separators in the parts are
/// replaced so every chart lands exactly one folder deep.
pub fn chart_path(output_dir: &Path, sub_folder: &str, name: &str) -> Result<PathBuf> {
    let clean = |part: &str| -> String {
        part.trim()
            .chars()
            .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
            .collect()
    };
    let (folder, file) = (clean(sub_folder), clean(name));
    if file.is_empty() || file == "." || file == ".." {
        return Err(FbvizError::validation_field("Chart name must not be empty", "name"));
    }
    if folder == "." || folder == ".." {
        return Err(FbvizError::validation_field("Invalid output folder", "sub_folder"));
    }
    Ok(output_dir.join(folder).join(format!("{}.png", file)))
}

/// Renders charts with a fixed style into one output directory.
pub struct ChartWriter<L> {
    style: StyleConfig,
    output_dir: PathBuf,
    logos: L,
}

impl<L: LogoSource> ChartWriter<L> {
    /// Creates a writer.
    pub fn new(style: StyleConfig, output_dir: impl Into<PathBuf>, logos: L) -> Self {
        Self {
            style,
            output_dir: output_dir.into(),
            logos,
        }
    }

    /// Style charts are drawn with.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Draws `data` with `renderer` and saves it. A logo download failure
    /// aborts the chart.
    #[instrument(skip(self, renderer, data), fields(chart = renderer.name()))]
    pub async fn write<R: ChartRenderer>(&self, renderer: &R, data: &R::Data, request: &ChartRequest) -> Result<PathBuf> {
        let path = chart_path(&self.output_dir, &request.sub_folder, &request.name)?;

        let mut header = ChartHeader::new(request.title.clone(), request.subtitle.clone());
        if let Some(url) = request.logo_url.as_deref() {
            header = header.with_logo(self.logos.fetch_logo(url).await?);
        }

        let image = render_chart(renderer, data, &header, &self.style)?;
        save_png(&image, &path)?;
        info!("Saved {} chart to {}", renderer.name(), path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::MockLogoSource;
    use crate::PointsRaceChart;

    #[test]
    fn test_chart_path() {
        let path = chart_path(Path::new("imgs"), "Serie A", "points_race").unwrap();
        assert_eq!(path, PathBuf::from("imgs/Serie A/points_race.png"));

        let path = chart_path(Path::new("imgs"), "a/b", "c\\d").unwrap();
        assert_eq!(path, PathBuf::from("imgs/a_b/c_d.png"));

        assert!(chart_path(Path::new("imgs"), "x", " ").is_err());
        assert!(chart_path(Path::new("imgs"), "..", "x").is_err());
    }

    #[tokio::test]
    async fn test_logo_failure_aborts() {
        let mut logos = MockLogoSource::new();
        logos
            .expect_fetch_logo()
            .times(1)
            .returning(|_| Err(FbvizError::network_with_source("down", std::io::Error::other("refused"))));
        let dir = tempfile::tempdir().unwrap();
        let writer = ChartWriter::new(StyleConfig::default(), dir.path(), logos);
        let request = ChartRequest {
            title: "t".to_string(),
            logo_url: Some("https://example.org/logo.png".to_string()),
            sub_folder: "x".to_string(),
            name: "y".to_string(),
            ..ChartRequest::default()
        };

        let result = writer.write(&PointsRaceChart, &Vec::new(), &request).await;
        assert!(result.is_err());
        assert!(!dir.path().join("x").join("y.png").exists());
    }
}
