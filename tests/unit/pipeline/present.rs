use super::*;

#[test]
fn slot_keeps_the_latest_image() {
    let mut slot = ImageSlot::new();
    assert!(slot.image().is_none());
    slot.set_image(PixelBuffer::new(2, 2));
    slot.set_image(PixelBuffer::new(3, 3));
    assert_eq!(slot.published(), 2);
    assert_eq!(slot.image().map(PixelBuffer::width), Some(3));
    assert!(slot.take_image().is_some());
    assert!(slot.image().is_none());
}

#[test]
fn slot_rounds_corners_when_configured() {
    let mut slot = ImageSlot::new();
    slot.set_corner_radius(3.0);
    slot.set_image(PixelBuffer::filled(12, 12, [255, 255, 255, 255]));
    let img = slot.image().unwrap();
    assert_eq!(img.pixel(0, 0).unwrap()[3], 0);
    assert_eq!(img.pixel(6, 6).unwrap()[3], 255);
}
