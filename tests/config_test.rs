//! Configuration loading and validation tests.

use eye_tracking::config::{Config, EXAMPLE_CONFIG};
use std::io::Write;

#[test]
fn test_defaults_are_consistent() {
    let config = Config::default();
    assert_eq!(config.tracker.learn_frames_limit, 50);
    assert_eq!(config.tracker.template_size, 24);
    assert!((config.detector.relative_face_size - 0.2).abs() < f32::EPSILON);
    assert!(config.output.draw_faces);
    assert!(config.output.draw_tracking);
}

#[test]
fn test_example_config_round_trips() {
    let parsed: Config = serde_yaml::from_str(EXAMPLE_CONFIG).unwrap();
    let dumped = serde_yaml::to_string(&parsed).unwrap();
    let reparsed: Config = serde_yaml::from_str(&dumped).unwrap();

    assert_eq!(parsed.tracker.learn_frames_limit, reparsed.tracker.learn_frames_limit);
    assert_eq!(parsed.tracker.template_size, reparsed.tracker.template_size);
    assert_eq!(parsed.model.face_model, reparsed.model.face_model);
}

#[test]
fn test_partial_config_uses_defaults() {
    let yaml = r"
tracker:
  learn_frames_limit: 10
  template_size: 16
";
    let config: Config = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(config.tracker.learn_frames_limit, 10);
    assert_eq!(config.tracker.template_size, 16);
    // Untouched sections fall back to defaults
    assert!((config.detector.relative_face_size - 0.2).abs() < f32::EPSILON);
}

#[test]
fn test_from_file() {
    let file = tempfile_path("eye_tracking_config_test.yaml");
    {
        let mut f = std::fs::File::create(&file.0).unwrap();
        f.write_all(EXAMPLE_CONFIG.as_bytes()).unwrap();
    }
    let config = Config::from_file(&file.0).unwrap();
    assert_eq!(config.tracker.learn_frames_limit, 50);
    file.cleanup();
}

#[test]
fn test_from_file_missing() {
    assert!(Config::from_file("/nonexistent/config.yaml").is_err());
}

#[test]
fn test_from_file_malformed() {
    let file = tempfile_path("eye_tracking_config_bad.yaml");
    {
        let mut f = std::fs::File::create(&file.0).unwrap();
        f.write_all(b"tracker: [not, a, mapping]").unwrap();
    }
    assert!(Config::from_file(&file.0).is_err());
    file.cleanup();
}

#[test]
fn test_validation_rules() {
    let mut config = Config::default();
    config.tracker.template_size = 1;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.detector.score_threshold = -1.0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.detector.relative_face_size = -0.1;
    assert!(config.validate().is_err());
}

#[test]
fn test_validation_requires_model_file() {
    let mut config = Config::default();
    config.model.face_model = "/nonexistent/model.bin".into();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("not found"));
}

#[test]
fn test_tracker_config_mapping() {
    let mut config = Config::default();
    config.tracker.learn_frames_limit = 7;
    config.tracker.template_size = 12;

    let tracker_config = config.tracker_config();
    assert_eq!(tracker_config.learn_frames_limit, 7);
    assert_eq!(tracker_config.template_size, 12);
}

/// Minimal temp-file helper; removed on cleanup
struct TempFile(std::path::PathBuf);

impl TempFile {
    fn cleanup(self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

fn tempfile_path(name: &str) -> TempFile {
    TempFile(std::env::temp_dir().join(name))
}
