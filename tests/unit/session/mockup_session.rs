use std::cell::RefCell;
use std::collections::BTreeMap;

use super::*;
use crate::assets::raster::Image;
use crate::composition::model::ColorSpec;
use crate::effects::shadow::ShadowOpts;
use crate::foundation::core::Canvas;

#[derive(Default)]
struct MemStore {
    blobs: RefCell<BTreeMap<String, Vec<u8>>>,
    refuse: Option<&'static str>,
}

impl MemStore {
    fn with(items: &[(&str, Vec<u8>)]) -> Self {
        let store = Self::default();
        for (k, v) in items {
            store.blobs.borrow_mut().insert((*k).to_owned(), v.clone());
        }
        store
    }

    fn image(&self, reference: &str) -> Image {
        decode_image(&self.blobs.borrow()[reference]).unwrap()
    }
}

impl ImageSource for &MemStore {
    fn load_bytes(&self, reference: &str) -> MockupResult<Vec<u8>> {
        self.blobs
            .borrow()
            .get(reference)
            .cloned()
            .ok_or_else(|| MockupError::validation(format!("missing {reference}")))
    }
}

impl BlobStore for &MemStore {
    fn persist(&self, name: &str, bytes: &[u8]) -> MockupResult<String> {
        if self.refuse.is_some_and(|r| name.contains(r)) {
            return Err(MockupError::validation("store refused"));
        }
        self.blobs
            .borrow_mut()
            .insert(format!("out/{name}"), bytes.to_vec());
        Ok(format!("out/{name}"))
    }
}

fn png(w: u32, h: u32, rgba: [u8; 4]) -> Vec<u8> {
    encode_png(&Image::solid(w, h, rgba).unwrap()).unwrap()
}

fn small_opts() -> SessionOpts {
    SessionOpts {
        compositor: CompositorOpts {
            canvas: Canvas::new(40, 40).unwrap(),
            ..CompositorOpts::default()
        },
        batch: BatchOpts::default(),
    }
}

fn request(categories: &[&str]) -> MockupRequest {
    MockupRequest {
        background: "bg.png".to_owned(),
        design: "fg.png".to_owned(),
        categories: categories.iter().map(|c| (*c).to_owned()).collect(),
        placement: None,
        output_name: "mockup.png".to_owned(),
    }
}

#[test]
fn render_mockup_persists_full_fidelity_png() {
    let mem = MemStore::with(&[
        ("bg.png", png(80, 80, [255, 255, 255, 255])),
        ("fg.png", png(10, 10, [255, 0, 0, 255])),
    ]);
    let session = MockupSession::new(&mem, &mem, small_opts());
    let outcome = session.render_mockup(&request(&["T-Shirt"])).unwrap();

    assert_eq!(outcome.fidelity, Fidelity::Full);
    assert_eq!(outcome.reference, "out/mockup.png");
    let out = mem.image("out/mockup.png");
    assert_eq!(out.dimensions(), (40, 40));
    assert_eq!(out.pixel(20, 20).map(|p| p[1] < 100), Some(true));
    assert_eq!(out.pixel(0, 0), Some([255, 255, 255, 255]));
}

#[test]
fn compositor_failure_falls_back_to_overlay() {
    let mem = MemStore::with(&[
        ("bg.png", png(80, 80, [255, 255, 255, 255])),
        ("fg.png", png(10, 10, [255, 0, 0, 255])),
    ]);
    let mut opts = small_opts();
    opts.compositor.shadow = Some(ShadowOpts {
        blur_radius: 3,
        sigma: 0.0,
        ..ShadowOpts::default()
    });
    let session = MockupSession::new(&mem, &mem, opts);
    let outcome = session.render_mockup(&request(&[])).unwrap();

    assert_eq!(outcome.fidelity, Fidelity::Fallback);
    let out = mem.image(&outcome.reference);
    assert_eq!(out.dimensions(), (40, 40));
    assert_ne!(out.pixel(20, 20), Some([255, 255, 255, 255]));
}

#[test]
fn decode_errors_are_not_masked_by_fallback() {
    let mem = MemStore::with(&[
        ("bg.png", b"not a png".to_vec()),
        ("fg.png", png(10, 10, [255, 0, 0, 255])),
    ]);
    let session = MockupSession::new(&mem, &mem, small_opts());
    let err = session.render_mockup(&request(&[])).unwrap_err();
    assert!(matches!(err, MockupError::ImageDecode(_)));
    assert!(!mem.blobs.borrow().contains_key("out/mockup.png"));
}

#[test]
fn explicit_placement_overrides_category_position() {
    let mem = MemStore::with(&[
        ("bg.png", png(40, 40, [255, 255, 255, 255])),
        ("fg.png", png(10, 10, [0, 0, 0, 255])),
    ]);
    let mut opts = small_opts();
    opts.compositor.shadow = None;
    let session = MockupSession::new(&mem, &mem, opts);
    let mut req = request(&[]);
    req.placement = Some(PlacementRect::absolute(0.0, 0.0, 20.0, 20.0));
    session.render_mockup(&req).unwrap();

    let out = mem.image("out/mockup.png");
    assert!(out.pixel(10, 10).unwrap()[0] < 128);
    assert_eq!(out.pixel(30, 30), Some([255, 255, 255, 255]));
}

#[test]
fn color_variants_are_persisted_and_failures_reported() {
    let mut mem = MemStore::with(&[("tee.png", png(6, 6, [200, 200, 200, 255]))]);
    mem.refuse = Some("forest");
    let session = MockupSession::new(&mem, &mem, small_opts());
    let colors = vec![
        NamedColor::new("Fire Red", ColorSpec::flat("ff0000")),
        NamedColor::new("Bad", ColorSpec::flat("#ZZZZZZ")),
        NamedColor::new("Forest", ColorSpec::flat("#228B22")),
    ];
    let report = session
        .render_color_variants("tee.png", &colors, "tee")
        .unwrap();

    assert_eq!(
        report.variants,
        vec![ColorVariant {
            color: "Fire Red".to_owned(),
            hex: "#FF0000".to_owned(),
            image: "out/tee-fire-red.png".to_owned(),
        }]
    );
    let mut failed: Vec<_> = report.failures.iter().map(|f| f.name.as_str()).collect();
    failed.sort_unstable();
    assert_eq!(failed, vec!["Bad", "Forest"]);
    assert_eq!(
        mem.image("out/tee-fire-red.png").pixel(0, 0),
        Some([255, 0, 0, 255])
    );
}

#[test]
fn duplicate_color_names_report_the_last_request() {
    let mem = MemStore::with(&[("tee.png", png(4, 4, [200, 200, 200, 255]))]);
    let session = MockupSession::new(&mem, &mem, small_opts());

    let failed_last = vec![
        NamedColor::new("Red", ColorSpec::flat("#FF0000")),
        NamedColor::new("Red", ColorSpec::flat("#ZZZZZZ")),
    ];
    let report = session
        .render_color_variants("tee.png", &failed_last, "a")
        .unwrap();
    assert!(report.variants.is_empty());
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].name, "Red");

    let succeeded_last = vec![
        NamedColor::new("Red", ColorSpec::flat("#ZZZZZZ")),
        NamedColor::new("Red", ColorSpec::flat("#FF0000")),
    ];
    let report = session
        .render_color_variants("tee.png", &succeeded_last, "b")
        .unwrap();
    assert!(report.failures.is_empty());
    assert_eq!(
        report.variants,
        vec![ColorVariant {
            color: "Red".to_owned(),
            hex: "#FF0000".to_owned(),
            image: "out/b-red.png".to_owned(),
        }]
    );
    assert_eq!(
        mem.image("out/b-red.png").pixel(1, 1),
        Some([255, 0, 0, 255])
    );
}

#[test]
fn slug_is_filename_safe() {
    assert_eq!(slug("Heather Grey"), "heather-grey");
    assert_eq!(slug("  Navy/Blue!! "), "navy-blue");
    assert_eq!(slug("***"), "color");
}

#[test]
fn opts_load_from_json() {
    let opts = SessionOpts::from_json_str(
        r#"{"compositor": {"canvas": {"width": 100, "height": 50}}, "batch": {"parallel": false}}"#,
    )
    .unwrap();
    assert_eq!(opts.compositor.canvas, Canvas::new(100, 50).unwrap());
    assert!(!opts.batch.parallel);
    assert_eq!(opts.compositor.shadow, Some(ShadowOpts::default()));

    assert!(matches!(
        SessionOpts::from_json_str("{"),
        Err(MockupError::Validation(_))
    ));
    assert!(SessionOpts::from_path("/definitely/missing/opts.json").is_err());

    let from_reader =
        SessionOpts::from_reader(&br#"{"batch": {"threads": 2}}"#[..]).unwrap();
    assert_eq!(from_reader.batch.threads, Some(2));
    assert!(from_reader.batch.parallel);

    let path = std::env::temp_dir().join(format!("mockup_opts_{}.json", std::process::id()));
    std::fs::write(&path, r#"{"compositor": {"shadow": null}}"#).unwrap();
    let from_file = SessionOpts::from_path(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(from_file.compositor.shadow, None);
    assert!(matches!(
        SessionOpts::from_reader(&b"[1, 2"[..]),
        Err(MockupError::Validation(_))
    ));
}
