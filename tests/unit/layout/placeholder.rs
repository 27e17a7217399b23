use super::*;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

fn approx_rect(a: PlacementRect, b: PlacementRect) -> bool {
    a.is_relative == b.is_relative
        && approx(a.x, b.x)
        && approx(a.y, b.y)
        && approx(a.width, b.width)
        && approx(a.height, b.height)
}

#[test]
fn percentage_roundtrip_is_exact_within_tolerance() {
    let rects = [
        PlacementRect::absolute(0.0, 0.0, 10.0, 10.0),
        PlacementRect::absolute(123.4, 56.7, 89.1, 234.5),
        PlacementRect::absolute(-5.0, 1e6, 0.0, 3.3),
    ];
    let canvases = [(1.0, 1.0), (600.0, 600.0), (1920.0, 1080.0), (7.0, 3333.0)];
    for r in rects {
        for (w, h) in canvases {
            let pct = convert_to_percentage(r, w, h).unwrap();
            assert!(pct.is_relative);
            let back = convert_from_percentage(pct, w, h).unwrap();
            assert!(approx_rect(back, r), "{r:?} on {w}x{h} came back as {back:?}");
        }
    }
}

#[test]
fn conversion_scales_linearly() {
    let pct =
        convert_to_percentage(PlacementRect::absolute(150.0, 30.0, 300.0, 60.0), 600.0, 300.0)
            .unwrap();
    assert_eq!(pct, PlacementRect::relative(25.0, 10.0, 50.0, 20.0));

    // Already in the requested space.
    assert_eq!(convert_to_percentage(pct, 600.0, 300.0).unwrap(), pct);
    let abs = PlacementRect::absolute(1.0, 2.0, 3.0, 4.0);
    assert_eq!(convert_from_percentage(abs, 10.0, 10.0).unwrap(), abs);
}

#[test]
fn conversion_rejects_degenerate_canvas() {
    let r = PlacementRect::absolute(1.0, 2.0, 3.0, 4.0);
    assert!(convert_to_percentage(r, 0.0, 10.0).is_err());
    assert!(convert_from_percentage(PlacementRect::relative(1.0, 1.0, 1.0, 1.0), 10.0, f64::NAN)
        .is_err());
}

#[test]
fn normalize_clamps_absolute_rects_into_image() {
    let r = normalize_placeholder(PlacementRect::absolute(-20.0, 390.0, 500.0, 2.0), 400.0, 400.0)
        .unwrap();
    assert_eq!(r, PlacementRect::absolute(0.0, 390.0, 400.0, 10.0));

    let r = normalize_placeholder(PlacementRect::absolute(399.0, 0.0, 50.0, 50.0), 400.0, 400.0)
        .unwrap();
    assert_eq!(r.x, 390.0);
    assert_eq!(r.width, 10.0);
}

#[test]
fn normalize_uses_percentage_bounds_for_relative_rects() {
    let r = normalize_placeholder(PlacementRect::relative(99.5, -3.0, 0.2, 150.0), 0.0, 0.0)
        .unwrap();
    assert_eq!(r, PlacementRect::relative(99.0, 0.0, 1.0, 100.0));
}

#[test]
fn normalize_holds_invariant_and_is_idempotent() {
    let inputs = [
        PlacementRect::absolute(-1.0, -1.0, -1.0, -1.0),
        PlacementRect::absolute(1e9, 1e9, 1e9, 1e9),
        PlacementRect::absolute(f64::NAN, 5.0, f64::INFINITY, 20.0),
        PlacementRect::absolute(3.0, 4.0, 5.0, 6.0),
        PlacementRect::relative(50.0, 50.0, 80.0, 80.0),
        PlacementRect::relative(-10.0, 120.0, 0.0, 0.0),
    ];
    for (w, h) in [(400.0, 300.0), (5.0, 5.0), (0.0, 0.0)] {
        for r in inputs {
            let once = normalize_placeholder(r, w, h).unwrap();
            let (bw, bh) = if r.is_relative { (100.0, 100.0) } else { (w, h) };
            assert!(once.x >= 0.0 && once.y >= 0.0, "{once:?}");
            assert!(once.x + once.width <= bw + 1e-9, "{once:?}");
            assert!(once.y + once.height <= bh + 1e-9, "{once:?}");
            assert_eq!(normalize_placeholder(once, w, h).unwrap(), once);
        }
    }
}

#[test]
fn normalize_rejects_bad_image_size_for_absolute_rects() {
    let r = PlacementRect::absolute(0.0, 0.0, 10.0, 10.0);
    assert!(normalize_placeholder(r, -1.0, 10.0).is_err());
    assert!(normalize_placeholder(r, 10.0, f64::INFINITY).is_err());
}

#[test]
fn centered_scaling_preserves_center() {
    let r = PlacementRect::absolute(100.0, 50.0, 200.0, 100.0);
    assert_eq!(get_center(r), Point::new(200.0, 100.0));

    let scaled = scale_rect(r, 1.5).unwrap();
    assert_eq!(get_center(scaled), Point::new(200.0, 100.0));
    assert_eq!(scaled, PlacementRect::absolute(50.0, 25.0, 300.0, 150.0));

    let c = create_centered_rect(Point::new(50.0, 50.0), 20.0, 10.0, true);
    assert_eq!(c, PlacementRect::relative(40.0, 45.0, 20.0, 10.0));

    assert!(scale_rect(r, -1.0).is_err());
    assert!(scale_rect(r, f64::NAN).is_err());
}

#[test]
fn deserializes_camel_case_relative_flag() {
    let r: PlacementRect = serde_json::from_str(
        r#"{"x": 10, "y": 20, "width": 30, "height": 40, "isRelative": true}"#,
    )
    .unwrap();
    assert_eq!(r, PlacementRect::relative(10.0, 20.0, 30.0, 40.0));
}
