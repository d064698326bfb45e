use super::*;

#[test]
fn defaults_match_documented_values() {
    let c = CaptureConfig::default();
    assert_eq!(c.downscale_factor, 0.12);
    assert_eq!(c.blur_radius, 12);
    assert_eq!(c.fps, 60);
    assert_eq!(c.corner_radius, 0.0);
    assert_eq!(c.alpha, None);
    assert_eq!(c.resting_opacity(), 1.0);
    c.validate().unwrap();
}

#[test]
fn validate_rejects_out_of_range_values() {
    let bad = [
        CaptureConfig {
            downscale_factor: 0.0,
            ..Default::default()
        },
        CaptureConfig {
            downscale_factor: 1.5,
            ..Default::default()
        },
        CaptureConfig {
            downscale_factor: f64::NAN,
            ..Default::default()
        },
        CaptureConfig {
            corner_radius: -1.0,
            ..Default::default()
        },
        CaptureConfig {
            alpha: Some(2.0),
            ..Default::default()
        },
    ];
    for c in bad {
        let err = c.validate().unwrap_err();
        assert!(err.to_string().contains("validation error:"), "{c:?}");
    }
}

#[test]
fn partial_json_fills_in_defaults() {
    let c: CaptureConfig = serde_json::from_str(r#"{"blur_radius": 4, "alpha": 0.5}"#).unwrap();
    assert_eq!(c.blur_radius, 4);
    assert_eq!(c.downscale_factor, DEFAULT_DOWNSCALE_FACTOR);
    assert_eq!(c.resting_opacity(), 0.5);
}

#[test]
fn unknown_fields_are_rejected() {
    let res: Result<CaptureConfig, _> = serde_json::from_str(r#"{"radius": 4}"#);
    assert!(res.is_err());
}
