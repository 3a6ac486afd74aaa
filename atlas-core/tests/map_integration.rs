//! World Map Integration Tests
//!
//! Drives the engine the way a host does and checks the recorded intents:
//! - Name resolution and alias lookup
//! - Color fallbacks
//! - Camera follow
//! - Selection and reset
//! - Frame loop lifecycle

use std::time::Duration;

use atlas_core::{
    BoundsTable, CameraFollow, CameraSettings, ComplianceDataset, ComplianceModel, CountryFeature,
    FeatureId, FeatureProperties, Intent, IntentLog, JsonSource, MapConfig, NameResolver, Point,
    Transform, TransformConstraint, Viewport, WorldMap, ZoomExtent,
};

const DATA: &str = r##"{
    "categories": [
        {"status": "compliant", "color": "#2e7d32", "label": "Compliant"},
        {"status": "non-compliant", "color": "#c62828", "label": "Non-compliant"},
        {"status": "unknown", "color": "#9e9e9e", "label": "Unknown"}
    ],
    "countries": {
        "United States": {"standard": "SOC 2", "status": "compliant", "unitsInCountry": 40, "certifications": ["SOC 2 Type II"]},
        "Germany": {"standard": "ISO 27001", "status": "non-compliant", "unitsInCountry": 3, "lastAuditDate": "2024-03-01"}
    }
}"##;

const VIEW: Viewport = Viewport::new(960.0, 600.0);

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn props(name: Option<&str>, admin: Option<&str>) -> FeatureProperties {
    FeatureProperties {
        name: name.map(str::to_string),
        admin: admin.map(str::to_string),
        ..FeatureProperties::default()
    }
}

/// A map with three countries, projected geometry and loaded data.
async fn loaded_map() -> WorldMap<BoundsTable, IntentLog> {
    let mut projection = BoundsTable::new();
    projection.insert(
        FeatureId::new("840"),
        Some(atlas_core::Bounds::new(120.0, 150.0, 320.0, 280.0)),
        Some(Point::new(220.0, 215.0)),
    );
    projection.insert(
        FeatureId::new("276"),
        Some(atlas_core::Bounds::new(480.0, 120.0, 500.0, 145.0)),
        Some(Point::new(490.0, 132.0)),
    );
    let mut map = WorldMap::new(MapConfig::default(), VIEW, projection, IntentLog::new());
    map.set_features(vec![
        CountryFeature::new("840", props(Some("USA"), None)),
        CountryFeature::new("276", props(None, Some("Germany"))),
        CountryFeature::new("-99", FeatureProperties::default()),
    ]);
    assert!(map.load_from(&JsonSource::new(DATA)).await);
    map
}

/// Run frames until every transition has finished.
fn settle(map: &mut WorldMap<BoundsTable, IntentLog>, now: Duration) {
    let token = map.start();
    map.frame(token, now + ms(5_000));
}

// ============================================================================
// Names and Records
// ============================================================================

#[test]
fn test_resolution_follows_name_field_priority() {
    let resolver = NameResolver::new();
    let france = CountryFeature::new("250", props(Some("France"), None));
    let brazil = CountryFeature::new("76", props(None, Some("Brazil")));
    let blank = CountryFeature::new("0", FeatureProperties::default());

    assert_eq!(resolver.resolve(&france), "France");
    assert_eq!(resolver.resolve(&brazil), "Brazil");
    assert_eq!(resolver.resolve(&blank), "Unknown");
}

#[test]
fn test_lookup_retries_through_alias() {
    let model = ComplianceDataset::from_json(DATA)
        .expect("valid data")
        .into_model();
    let resolver = NameResolver::new();

    let record = resolver.lookup_record(&model, "USA").expect("alias hit");
    assert_eq!(record.units_in_country, 40);
    assert!(resolver.lookup_record(&model, "Atlantis").is_none());
}

#[test]
fn test_color_falls_back_to_unknown_then_default() {
    let model = ComplianceDataset::from_json(DATA)
        .expect("valid data")
        .into_model();
    assert_eq!(model.color_for("Atlantis"), "#9e9e9e");

    let bare = ComplianceModel::from_parts(Vec::new(), Vec::new());
    assert_eq!(bare.color_for("Atlantis"), "#e0e0e0");
}

#[tokio::test]
async fn test_every_feature_gets_a_status_style() {
    let map = loaded_map().await;
    let styled: Vec<_> = map
        .surface()
        .intents()
        .iter()
        .filter_map(|intent| match intent {
            Intent::Status { id, class, .. } => Some((id.as_str().to_string(), class.clone())),
            _ => None,
        })
        .collect();

    assert_eq!(
        styled,
        vec![
            ("840".to_string(), "status-compliant".to_string()),
            ("276".to_string(), "status-non-compliant".to_string()),
            ("-99".to_string(), "status-unknown".to_string()),
        ]
    );
}

// ============================================================================
// Camera Follow
// ============================================================================

#[test]
fn test_camera_is_still_at_minimum_zoom() {
    let mut camera = CameraFollow::new(CameraSettings::default());
    camera.sample_pointer(Point::new(0.0, 0.0));
    let offset = camera.target_offset(&Transform::identity(), VIEW, ZoomExtent::default());
    assert_eq!(offset, Point::default());
}

#[test]
fn test_camera_target_depends_on_pointer_position() {
    let zoomed = Transform::new(-1440.0, -900.0, 4.0);
    let mut camera = CameraFollow::new(CameraSettings::default());

    camera.sample_pointer(VIEW.center());
    let centered = camera.target_offset(&zoomed, VIEW, ZoomExtent::default());
    assert!(centered.x.abs() < 1e-12 && centered.y.abs() < 1e-12);

    camera.sample_pointer(Point::new(VIEW.width, VIEW.height));
    let corner = camera.target_offset(&zoomed, VIEW, ZoomExtent::default());
    assert!((corner.x - -0.02 * 480.0).abs() < 1e-9);
    assert!((corner.y - -0.02 * 300.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_pointer_drift_never_escapes_constraint() {
    let mut map = loaded_map().await;
    map.gesture(Transform::new(-1440.0, -900.0, 4.0));
    map.pointer_moved(0.0, 0.0);

    let token = map.start();
    let constraint = TransformConstraint::default();
    for frame in 0..120 {
        let rendered = map.frame(token, ms(frame * 16)).expect("loop running");
        assert_eq!(constraint.clamp(rendered, VIEW), rendered);
    }
    assert!(map.snapshot().camera_offset.x > 0.0);
}

// ============================================================================
// Selection and Reset
// ============================================================================

#[tokio::test]
async fn test_only_last_selected_feature_is_marked() {
    let mut map = loaded_map().await;
    map.click(&FeatureId::new("840"), ms(0)).expect("known");
    map.click(&FeatureId::new("276"), ms(100)).expect("known");

    let marked: Vec<_> = map.surface().marked_selected().into_iter().collect();
    assert_eq!(marked, vec![FeatureId::new("276")]);

    map.deselect();
    assert!(map.surface().marked_selected().is_empty());
    assert!(!map.surface().info_visible());
}

#[tokio::test]
async fn test_info_panel_reports_no_data() {
    let mut map = loaded_map().await;
    map.click(&FeatureId::new("-99"), ms(0)).expect("known");
    let last = map.surface().intents().iter().rev().find_map(|intent| match intent {
        Intent::ShowInfo { country, record } => Some((country.clone(), record.is_none())),
        _ => None,
    });
    assert_eq!(last, Some(("Unknown".to_string(), true)));
}

#[tokio::test]
async fn test_reset_returns_to_identity_and_clears_selection() {
    let mut map = loaded_map().await;
    map.click(&FeatureId::new("276"), ms(0)).expect("known");
    settle(&mut map, ms(0));
    assert!(map.snapshot().base.scale > 1.0);

    map.reset(ms(10_000));
    settle(&mut map, ms(10_000));

    assert_eq!(map.snapshot().base, Transform::identity());
    assert!(map.selection().selected().is_none());
    assert_eq!(map.surface().last_transform(), Some(Transform::identity()));
}

#[tokio::test]
async fn test_new_transition_supersedes_the_old_one() {
    let mut map = loaded_map().await;
    map.click(&FeatureId::new("276"), ms(0)).expect("known");
    let token = map.start();
    map.frame(token, ms(100));

    map.click(&FeatureId::new("840"), ms(100)).expect("known");
    map.frame(token, ms(10_000));

    // 200 x 130 box in 960 x 600 → scale 0.9 / max(0.208, 0.217) ≈ 4.15.
    let base = map.snapshot().base;
    let expected = 0.9 / (130.0 / 600.0);
    assert!((base.scale - expected).abs() < 1e-9);
}

// ============================================================================
// Frame Loop Lifecycle
// ============================================================================

#[tokio::test]
async fn test_start_and_stop_are_idempotent() {
    let mut map = loaded_map().await;
    let token = map.start();
    assert_eq!(map.start(), token);
    assert!(map.is_running());

    assert!(map.stop());
    assert!(!map.stop());
    assert!(map.frame(token, ms(16)).is_none());

    let restarted = map.start();
    assert_ne!(restarted, token);
    assert!(map.frame(token, ms(32)).is_none());
    assert!(map.frame(restarted, ms(32)).is_some());
}

#[tokio::test]
async fn test_restart_resumes_from_last_camera_offset() {
    let mut map = loaded_map().await;
    map.gesture(Transform::new(-1440.0, -900.0, 4.0));
    map.pointer_moved(0.0, 0.0);
    let token = map.start();
    for i in 0..30 {
        map.frame(token, ms(i * 16));
    }
    assert!(map.stop());
    let drifted = map.snapshot().camera_offset;
    assert!(drifted.x > 0.0 && drifted.y > 0.0);

    map.start();
    assert_eq!(map.snapshot().camera_offset, drifted);
}

#[tokio::test]
async fn test_non_finite_pointer_is_recoverable() {
    let mut map = loaded_map().await;
    map.gesture(Transform::new(-1440.0, -900.0, 4.0));
    map.pointer_moved(f64::NAN, 10.0);
    let token = map.start();
    map.frame(token, ms(16));

    map.pointer_moved(480.0, 300.0);
    for i in 0..200 {
        map.frame(token, ms(32 + i * 16));
    }
    let offset = map.snapshot().camera_offset;
    assert!(offset.x.is_finite() && offset.y.is_finite());

    let base = Transform::new(-1000.0, -800.0, 3.0);
    map.gesture(base);
    let snap = map.snapshot();
    assert_eq!(snap.base, base);
    assert!((snap.combined.scale - 3.0).abs() < f64::EPSILON);
    assert!((snap.combined.translate_x - base.translate_x).abs() < 1e-6);
    assert!((snap.combined.translate_y - base.translate_y).abs() < 1e-6);
}
