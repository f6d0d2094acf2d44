use super::*;

#[test]
fn partial_json_uses_defaults() {
    let cfg = EngineConfig::from_json_str(r#"{"screen_width": 800}"#).unwrap();
    assert_eq!(cfg.screen_width, 800);
    assert_eq!(cfg.screen_height, 480);
    assert!(!cfg.enable_hires);
}

#[test]
fn invalid_values_are_rejected() {
    assert!(EngineConfig::from_json_str(r#"{"texture_scaling_factor": 0}"#).is_err());
    assert!(EngineConfig::from_json_str(r#"{"frame_rate": -1}"#).is_err());
    assert!(EngineConfig::from_json_str("{not json").is_err());
}

#[test]
fn builders_compose() {
    let cfg = EngineConfig::default()
        .with_hires(2.0)
        .with_screen(320, 240)
        .with_frame_rate(30.0);
    assert!(cfg.enable_hires);
    assert_eq!(cfg.texture_scaling_factor, 2.0);
    assert_eq!((cfg.screen_width, cfg.screen_height), (320, 240));
    assert_eq!(cfg.frame_rate, 30.0);
    cfg.validate().unwrap();
}
