use glyphgrid_config::{Config, ConfigError, CursorStyle, FontScaleRule};
use tempfile::TempDir;

#[test]
fn test_config_defaults() {
    let config = Config::default();
    assert_eq!(config.font.family, "JetBrains Mono");
    assert_eq!(config.font.size, 12.0);
    assert_eq!(config.atlas.max_size, 4096);
    assert_eq!(config.atlas.padding, 1);
    assert_eq!(config.compositor.cluster_merge_limit, 12);
    assert_eq!(config.compositor.force_fit_tolerance, 0.05);
    assert_eq!(config.cursor.style, CursorStyle::Default);
    assert!(config.validate().is_ok());
}

#[test]
fn test_partial_yaml_fills_defaults() {
    let yaml = r#"
font:
  family: "Fira Code"
  size: 14.0
  font_scale_overrides:
    - pattern: "noto color emoji"
      scale: 0.9
compositor:
  cluster_merge_limit: 8
cursor:
  style: bar
"#;
    let config = Config::from_yaml(yaml).unwrap();
    assert_eq!(config.font.family, "Fira Code");
    assert_eq!(config.font.size, 14.0);
    assert_eq!(
        config.font.font_scale_overrides,
        vec![FontScaleRule {
            pattern: "noto color emoji".to_string(),
            scale: 0.9
        }]
    );
    assert_eq!(config.compositor.cluster_merge_limit, 8);
    assert_eq!(config.cursor.style, CursorStyle::Bar);
    // Untouched sections keep their defaults
    assert_eq!(config.atlas.max_size, 4096);
    assert!(!config.font.font_classes.color_emoji.is_empty());
}

#[test]
fn test_save_and_load_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("config.yaml");

    let mut config = Config::default();
    config.font.family = "Iosevka".to_string();
    config.compositor.minimum_contrast = 4.5;
    config.save(&path).unwrap();

    assert!(path.exists());
    assert!(!path.with_extension("yaml.tmp").exists());

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_load_or_default_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::load_or_default(&temp_dir.path().join("absent.yaml")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_invalid_values_rejected() {
    let err = Config::from_yaml("font:\n  size: 0\n").unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));

    let err = Config::from_yaml("atlas:\n  max_size: 1000\n").unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));

    let err = Config::from_yaml("compositor:\n  cluster_merge_limit: 0\n").unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));
}

#[test]
fn test_bad_class_pattern_rejected() {
    let yaml = "font:\n  font_classes:\n    symbol: [\"(unclosed\"]\n";
    match Config::from_yaml(yaml) {
        Err(ConfigError::Validation(msg)) => assert!(msg.contains("font_classes.symbol")),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn test_malformed_yaml_is_parse_error() {
    let err = Config::from_yaml("font: [1, 2").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_decscusr_mapping() {
    assert_eq!(CursorStyle::from_decscusr(2), CursorStyle::Block);
    assert_eq!(CursorStyle::from_decscusr(4), CursorStyle::Underline);
    assert_eq!(CursorStyle::from_decscusr(6), CursorStyle::Bar);
    assert!(CursorStyle::Default.is_filled_block());
    assert!(!CursorStyle::Hollow.is_filled_block());
}
