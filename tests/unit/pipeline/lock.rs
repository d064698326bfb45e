use super::*;
use crate::foundation::core::Point;
use crate::foundation::error::FrostError;

#[test]
fn live_position_resolves_every_time() {
    let mut locks = LockController::new();
    let mut calls = 0;
    for i in 0..3 {
        let p = locks.screen_point(|| {
            calls += 1;
            Point::new(f64::from(i), 0.0)
        });
        assert_eq!(p, Point::new(f64::from(i), 0.0));
    }
    assert_eq!(calls, 3);
    assert!(!locks.is_position_locked());
}

#[test]
fn locked_point_is_taken_lazily_on_first_use() {
    let mut locks = LockController::new();
    locks.lock_position();
    assert!(locks.is_position_locked());
    assert_eq!(locks.locked_point(), None);

    let p = locks.screen_point(|| Point::new(5.0, 6.0));
    assert_eq!(p, Point::new(5.0, 6.0));
    assert_eq!(locks.locked_point(), Some(Point::new(5.0, 6.0)));

    let p = locks.screen_point(|| panic!("locked point must be reused"));
    assert_eq!(p, Point::new(5.0, 6.0));
}

#[test]
fn locking_position_twice_keeps_the_first_point() {
    let mut locks = LockController::new();
    locks.lock_position();
    locks.screen_point(|| Point::new(1.0, 2.0));
    locks.lock_position();
    assert_eq!(locks.locked_point(), Some(Point::new(1.0, 2.0)));
    assert_eq!(
        locks.screen_point(|| Point::new(9.0, 9.0)),
        Point::new(1.0, 2.0)
    );
}

#[test]
fn unlock_position_clears_the_point() {
    let mut locks = LockController::new();
    locks.lock_position();
    locks.screen_point(|| Point::new(1.0, 2.0));
    locks.unlock_position();
    assert_eq!(locks.locked_point(), None);
    assert_eq!(*locks.position_source(), PositionSource::Live);
    assert_eq!(
        locks.screen_point(|| Point::new(3.0, 4.0)),
        Point::new(3.0, 4.0)
    );
}

#[test]
fn lock_view_stores_the_captured_buffer() {
    let mut locks = LockController::new();
    locks.lock_view(|| Ok(PixelBuffer::new(4, 4)));
    assert!(locks.is_view_locked());
    assert_eq!(locks.locked_buffer(), Some(&PixelBuffer::new(4, 4)));

    locks.unlock_view();
    assert!(!locks.is_view_locked());
    assert_eq!(locks.locked_buffer(), None);
}

#[test]
fn failed_view_capture_locks_without_a_buffer() {
    let mut locks = LockController::new();
    locks.lock_view(|| Err(FrostError::capture_unavailable("no surface")));
    assert!(locks.is_view_locked());
    assert_eq!(locks.locked_buffer(), None);
    assert_eq!(*locks.capture_source(), CaptureSource::Stale);
}

#[test]
fn invalidation_keeps_the_view_locked_but_drops_the_buffer() {
    let mut locks = LockController::new();
    locks.invalidate_locked_buffer();
    assert!(!locks.is_view_locked());

    locks.lock_view(|| Ok(PixelBuffer::new(2, 2)));
    locks.invalidate_locked_buffer();
    assert!(locks.is_view_locked());
    assert_eq!(locks.locked_buffer(), None);

    locks.lock_view(|| Ok(PixelBuffer::new(3, 3)));
    assert_eq!(locks.locked_buffer().map(PixelBuffer::width), Some(3));
}
