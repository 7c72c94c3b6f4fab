use card_camera::config::{CaptureFilter, Configuration};
use std::io::Write;

#[test]
fn defaults_use_card_ratio() {
    let cfg: Configuration = serde_yaml::from_str("{}").unwrap();
    assert!((cfg.aspect_ratio.get() - 1.586).abs() < f64::EPSILON);
    assert_eq!(cfg.event_channel_capacity, 16);
    assert_eq!(cfg.capture.filter, CaptureFilter::CatmullRom);
    assert!(!cfg.capture.mirror);
}

#[test]
fn parse_kebab_case_config() {
    let yaml = r#"
aspect-ratio: 1.7777
event-channel-capacity: 4
capture:
  filter: lanczos3
  mirror: true
"#;
    let cfg: Configuration = serde_yaml::from_str(yaml).unwrap();
    let cfg = cfg.validated().unwrap();
    assert!((cfg.aspect_ratio.get() - 1.7777).abs() < f64::EPSILON);
    assert_eq!(cfg.event_channel_capacity, 4);
    assert_eq!(cfg.capture.filter, CaptureFilter::Lanczos3);
    assert!(cfg.capture.mirror);
}

#[test]
fn rejects_non_positive_aspect_ratio() {
    for raw in ["aspect-ratio: 0", "aspect-ratio: -1.586", "aspect-ratio: .nan"] {
        let err = serde_yaml::from_str::<Configuration>(raw).unwrap_err();
        assert!(
            err.to_string().contains("invalid aspect ratio"),
            "unexpected error for {raw}: {err}"
        );
    }
}

#[test]
fn rejects_unknown_filter() {
    let yaml = "capture:\n  filter: box\n";
    assert!(serde_yaml::from_str::<Configuration>(yaml).is_err());
}

#[test]
fn validated_rejects_zero_capacity() {
    let cfg: Configuration = serde_yaml::from_str("event-channel-capacity: 0").unwrap();
    let err = cfg.validated().unwrap_err();
    assert!(err.to_string().contains("event-channel-capacity"));
}

#[test]
fn loads_from_yaml_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "aspect-ratio: 1.5").unwrap();
    let cfg = Configuration::from_yaml_file(file.path())
        .unwrap()
        .validated()
        .unwrap();
    assert!((cfg.aspect_ratio.get() - 1.5).abs() < f64::EPSILON);
}

#[test]
fn missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.yaml");
    let err = Configuration::from_yaml_file(&path).unwrap_err();
    assert!(err.to_string().contains("absent.yaml"));
}
