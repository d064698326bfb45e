use super::*;

#[test]
fn region_rect_spans_origin_plus_size() {
    let r = Region::at(Point::new(400.0, 800.0), 200, 100);
    assert_eq!(r.rect(), Rect::new(400.0, 800.0, 600.0, 900.0));
    assert_eq!(r.origin(), Point::new(400.0, 800.0));
}

#[test]
fn scaled_size_truncates() {
    let r = Region::at(Point::ZERO, 205, 199);
    assert_eq!(r.scaled_size(0.1).unwrap(), (20, 19));
}

#[test]
fn scaled_size_of_zero_is_capture_unavailable() {
    let r = Region::at(Point::ZERO, 5, 200);
    let err = r.scaled_size(0.1).unwrap_err();
    assert!(matches!(err, FrostError::CaptureUnavailable(_)));
}
