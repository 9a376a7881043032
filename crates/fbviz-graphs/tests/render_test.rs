//! Full renders. Charts with text need a system font for the configured
//! family; the text-free panel renders run anywhere.

use async_trait::async_trait;
use fbviz_common::test_utils::create_temp_dir;
use fbviz_common::test_utils::schedule_fixtures::four_team_season;
use fbviz_common::{normalize_schedule, Result};
use fbviz_config::StyleConfig;
use fbviz_graphs::*;
use fbviz_metrics::{clean_win_table, points_race, team_form, DEFAULT_MAX_GOALS};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use plotters::style::RGBColor;
use std::io::Cursor;

struct StaticLogo(Vec<u8>);

#[async_trait]
impl LogoSource for StaticLogo {
    async fn fetch_logo(&self, _url: &str) -> Result<Vec<u8>> {
        Ok(self.0.clone())
    }
}

fn red_square() -> Vec<u8> {
    let mut bytes = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(16, 16, Rgba([200, 0, 0, 255])))
        .write_to(&mut bytes, ImageFormat::Png)
        .unwrap();
    bytes.into_inner()
}

fn request(name: &str) -> ChartRequest {
    ChartRequest {
        title: "Points race".to_string(),
        subtitle: "Cumulative points against cumulative expected points, match by match, for the top two sides"
            .to_string(),
        logo_url: Some("https://example.org/logo.png".to_string()),
        sub_folder: "Test League".to_string(),
        name: name.to_string(),
    }
}

/// Two stacked panels filled with palette colours; draws no text.
struct StackedPanels;

impl ChartRenderer for StackedPanels {
    type Data = ();

    fn name(&self) -> &'static str {
        "stacked"
    }

    fn description(&self) -> &'static str {
        "Filled panels"
    }

    fn axes(&self, _data: &()) -> Vec<AxesRect> {
        vec![AxesRect::new(0.05, 0.55, 0.9, 0.4), AxesRect::new(0.05, 0.05, 0.9, 0.4)]
    }

    fn draw(&self, panels: &[PlotArea<'_>], _data: &(), ctx: &DrawContext<'_>) -> Result<()> {
        for (i, panel) in panels.iter().enumerate() {
            panel.fill(&ctx.theme.series(i))?;
        }
        Ok(())
    }
}

fn plain_style() -> StyleConfig {
    StyleConfig {
        caption: None,
        greyscale_logo: false,
        ..StyleConfig::default()
    }
}

#[test]
fn test_panels_and_logo_on_canvas() {
    let style = plain_style();
    let theme = Theme::from_style(&style).unwrap();
    let header = ChartHeader::new("", "").with_logo(red_square());

    let canvas = render_chart(&StackedPanels, &(), &header, &style).unwrap();

    assert_eq!(canvas.dimensions(), (800, 800));
    let color = |c: RGBColor| Rgba([c.0, c.1, c.2, 255]);
    assert_eq!(*canvas.get_pixel(400, 200), color(theme.series(0)));
    assert_eq!(*canvas.get_pixel(400, 600), color(theme.series(1)));
    assert_eq!(*canvas.get_pixel(5, 5), color(theme.background));
    // 64 px logo box, 16 px from the top-right corner
    assert_eq!(*canvas.get_pixel(752, 48), Rgba([200, 0, 0, 255]));
}

#[test]
fn test_undecodable_logo_is_a_render_error() {
    let style = StyleConfig {
        height_in: 2.0,
        ..plain_style()
    };
    let canvas = render_chart(&StackedPanels, &(), &ChartHeader::new("", ""), &style).unwrap();
    assert_eq!(canvas.dimensions(), (800, 200));

    let header = ChartHeader::new("", "").with_logo(b"not an image".to_vec());
    assert!(render_chart(&StackedPanels, &(), &header, &style).is_err());
}

#[tokio::test]
#[ignore = "needs system fonts"]
async fn test_points_race_png() {
    let dir = create_temp_dir();
    let rows = normalize_schedule(&four_team_season("2425")).unwrap();
    let races = points_race(&rows, &["Alpha".to_string(), "Beta".to_string()], DEFAULT_MAX_GOALS).unwrap();

    let writer = ChartWriter::new(StyleConfig::default(), dir.path(), StaticLogo(red_square()));
    let path = writer.write(&PointsRaceChart, &races, &request("points_race")).await.unwrap();

    assert_eq!(path, dir.path().join("Test League").join("points_race.png"));
    let png = image::open(&path).unwrap();
    assert_eq!(png.width(), 800);
    assert!(png.height() >= 800);
}

#[tokio::test]
#[ignore = "needs system fonts"]
async fn test_multi_panel_and_table_charts() {
    let dir = create_temp_dir();
    let rows = normalize_schedule(&four_team_season("2425")).unwrap();
    let writer = ChartWriter::new(StyleConfig::default(), dir.path(), StaticLogo(red_square()));

    let form = team_form(&rows, "Gamma", 3).unwrap();
    writer.write(&TeamFormChart, &form, &request("team_form")).await.unwrap();

    let table = clean_win_table(&rows);
    let path = writer.write(&CleanWinChart, &table, &request("clean_wins")).await.unwrap();
    assert!(path.exists());
}

#[test]
fn test_empty_data_is_a_render_error() {
    let style = StyleConfig::default();
    let header = ChartHeader::new("Empty", "");
    assert!(render_chart(&PointsRaceChart, &Vec::new(), &header, &style).is_err());
    assert!(render_chart(&TacklingChart, &Vec::new(), &header, &style).is_err());
}
