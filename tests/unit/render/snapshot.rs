use super::*;
use crate::foundation::core::Vec2;

fn close(px: [u8; 4], want: [u8; 4], tol: u8) -> bool {
    px.iter().zip(want).all(|(&a, b)| a.abs_diff(b) <= tol)
}

fn split_surface() -> SurfaceTree {
    let mut tree = SurfaceTree::new(100, 100, Some([0, 0, 0, 255]));
    tree.add_node(
        tree.root(),
        NodeKind::Solid([255, 0, 0, 255]),
        Vec2::new(50.0, 0.0),
        50,
        100,
    )
    .unwrap();
    tree
}

#[test]
fn capture_translates_crop_to_origin_and_downscales() {
    let tree = split_surface();
    let crop = Rect::new(40.0, 0.0, 80.0, 20.0);
    let out = SurfaceSnapshotter
        .capture(&tree, tree.root(), crop, 0.5)
        .unwrap();
    assert_eq!((out.width(), out.height()), (20, 10));
    assert!(close(out.pixel(2, 5).unwrap(), [0, 0, 0, 255], 2));
    assert!(close(out.pixel(15, 5).unwrap(), [255, 0, 0, 255], 2));
}

#[test]
fn capture_outside_the_surface_is_transparent() {
    let tree = split_surface();
    let crop = Rect::new(90.0, 0.0, 110.0, 10.0);
    let out = SurfaceSnapshotter
        .capture(&tree, tree.root(), crop, 1.0)
        .unwrap();
    assert!(close(out.pixel(5, 5).unwrap(), [255, 0, 0, 255], 2));
    assert_eq!(out.pixel(15, 5).unwrap()[3], 0);
}

#[test]
fn empty_surface_is_capture_unavailable() {
    let tree = SurfaceTree::new(0, 100, None);
    let err = SurfaceSnapshotter
        .capture(&tree, tree.root(), Rect::new(0.0, 0.0, 10.0, 10.0), 1.0)
        .unwrap_err();
    assert!(matches!(err, FrostError::CaptureUnavailable(_)));
}

#[test]
fn zero_sized_output_is_capture_unavailable() {
    let tree = split_surface();
    for (crop, scale) in [
        (Rect::new(0.0, 0.0, 5.0, 50.0), 0.1),
        (Rect::new(0.0, 0.0, 50.0, 50.0), 0.0),
        (Rect::new(0.0, 0.0, 50.0, 50.0), f64::NAN),
    ] {
        let err = SurfaceSnapshotter
            .capture(&tree, tree.root(), crop, scale)
            .unwrap_err();
        assert!(err.is_recoverable());
    }
}

#[test]
fn hidden_nodes_are_not_captured() {
    let mut tree = split_surface();
    let red = tree.node(tree.root()).unwrap().children()[0];
    tree.set_opacity(red, 0.0).unwrap();
    let out = SurfaceSnapshotter
        .capture(&tree, tree.root(), Rect::new(50.0, 0.0, 60.0, 10.0), 1.0)
        .unwrap();
    assert!(close(out.pixel(5, 5).unwrap(), [0, 0, 0, 255], 0));
}

#[test]
fn translucent_nodes_blend_over_what_is_below() {
    let mut tree = split_surface();
    let red = tree.node(tree.root()).unwrap().children()[0];
    tree.set_opacity(red, 0.5).unwrap();
    let out = SurfaceSnapshotter
        .capture(&tree, tree.root(), Rect::new(50.0, 0.0, 60.0, 10.0), 1.0)
        .unwrap();
    let [r, g, b, a] = out.pixel(5, 5).unwrap();
    assert!((120..=136).contains(&r), "r = {r}");
    assert_eq!((g, b, a), (0, 0, 255));
}

#[test]
fn images_are_stretched_over_their_box() {
    let mut tree = SurfaceTree::new(100, 50, None);
    let mut img = PixelBuffer::new(2, 1);
    img.data_mut()
        .copy_from_slice(&[255, 0, 0, 255, 0, 0, 255, 255]);
    tree.add_node(tree.root(), NodeKind::Image(img), Vec2::ZERO, 100, 50)
        .unwrap();

    let out = SurfaceSnapshotter
        .capture(&tree, tree.root(), Rect::new(0.0, 0.0, 100.0, 50.0), 1.0)
        .unwrap();
    assert!(close(out.pixel(10, 25).unwrap(), [255, 0, 0, 255], 8));
    assert!(close(out.pixel(90, 25).unwrap(), [0, 0, 255, 255], 8));
}

#[test]
fn capturing_a_subtree_ignores_its_own_offset() {
    let mut tree = SurfaceTree::new(100, 100, Some([0, 0, 0, 255]));
    let card = tree
        .add_node(
            tree.root(),
            NodeKind::Group {
                fill: Some([0, 255, 0, 255]),
            },
            Vec2::new(60.0, 60.0),
            20,
            20,
        )
        .unwrap();
    let out = SurfaceSnapshotter
        .capture(&tree, card, Rect::new(0.0, 0.0, 20.0, 20.0), 1.0)
        .unwrap();
    assert!(close(out.pixel(0, 0).unwrap(), [0, 255, 0, 255], 0));
    assert!(close(out.pixel(19, 19).unwrap(), [0, 255, 0, 255], 0));
}
