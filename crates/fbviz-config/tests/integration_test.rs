//! Integration tests for configuration loading.

use fbviz_config::*;
use proptest::prelude::*;
use std::io::Write;
use std::path::PathBuf;

#[test]
fn test_full_round_trip_through_yaml() {
    let mut config = Config::default();
    config.cache.ttl_hours = Some(24);
    config.analysis.team_overrides = Some(TeamOverrides {
        off_strong: ["Inter".to_string()].into_iter().collect(),
        ..TeamOverrides::default()
    });

    let yaml = serde_yaml::to_string(&config).unwrap();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();

    let loaded = ConfigLoader::load_config_with(file.path(), |_| None).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_team_overrides_parse_from_yaml() {
    let yaml = "analysis:\n  team_overrides:\n    def_strong: [\"Napoli\", \"Juventus\"]\n    off_weak: [\"Monza\"]\n";
    let config = ConfigLoader::parse(yaml).unwrap();
    let overrides = config.analysis.team_overrides.unwrap();
    assert!(overrides.def_strong.contains("Napoli"));
    assert!(overrides.off_weak.contains("Monza"));
    assert!(overrides.off_strong.is_empty());
}

#[test]
fn test_pixel_size_and_ttl_helpers() {
    let config = Config::default();
    assert_eq!(config.style.pixel_size(), (800, 800));
    assert_eq!(config.cache.ttl(), None);

    let resized = config.style.with_size(12.0, 6.0);
    assert_eq!(resized.pixel_size(), (1200, 600));
    assert_eq!(resized.font_family, config.style.font_family);
}

#[test]
fn test_defaults_match_documented_paths() {
    let config = Config::default();
    assert_eq!(config.cache.directory, PathBuf::from("fbrefData"));
    assert_eq!(config.output.directory, PathBuf::from("imgs"));
    assert_eq!(config.style.subtitle_color, "#5a5a5a");
}

proptest! {
    #[test]
    fn prop_percentile_validation_matches_open_interval(p in 0.0f64..150.0) {
        let mut config = Config::default();
        config.analysis.percentile_threshold = p;
        let valid = ConfigValidator::validate(&config).is_ok();
        prop_assert_eq!(valid, p > 50.0 && p < 100.0);
    }
}
