use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        FrostError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        FrostError::capture_unavailable("x")
            .to_string()
            .contains("capture unavailable:")
    );
    assert!(
        FrostError::containment("x")
            .to_string()
            .contains("containment resolution failed:")
    );
    assert!(
        FrostError::evaluation("x")
            .to_string()
            .contains("evaluation error:")
    );
    assert!(
        FrostError::FacadeUninitialized
            .to_string()
            .contains("before initialization")
    );
}

#[test]
fn only_capture_and_containment_are_recoverable() {
    assert!(FrostError::capture_unavailable("x").is_recoverable());
    assert!(FrostError::containment("x").is_recoverable());
    assert!(!FrostError::FacadeUninitialized.is_recoverable());
    assert!(!FrostError::validation("x").is_recoverable());
    assert!(!FrostError::evaluation("x").is_recoverable());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = FrostError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
    assert!(!err.is_recoverable());
}
