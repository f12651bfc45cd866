use super::*;
use crate::timeline::dsl::DiagramBuilder;

fn sample() -> Diagram {
    DiagramBuilder::new(2000, 2020)
        .unwrap()
        .layer("Policy")
        .unwrap()
        .layer("Markets")
        .unwrap()
        .event("Policy", "Act", 2005)
        .unwrap()
        .event_with("Markets", "Crash", 2010, |s| {
            s.color(Color::rgb(255, 230, 230)).style(EventStyle::Italic)
        })
        .unwrap()
        .event("Markets", "Rebound", 2015)
        .unwrap()
        .connect(0, 1)
        .unwrap()
        .column("Recovery", 2010, 2016)
        .unwrap()
        .trend(Trend::new("Growth", 2002, 2018))
        .unwrap()
        .build()
        .unwrap()
}

#[test]
fn document_uses_positional_references_and_projected_x() {
    let doc = to_document(&sample());
    assert_eq!(doc.version, Some(FORMAT_VERSION));
    assert_eq!(doc.layers, vec!["Policy", "Markets"]);
    assert_eq!(doc.events[1].layer, 1);
    assert_eq!(doc.events[1].x, 50.0);
    assert_eq!(doc.connections[0].from, 0);
    assert_eq!(doc.connections[0].to, 1);
}

#[test]
fn json_keys_are_camel_case() {
    let json = to_json_string(&to_document(&sample())).unwrap();
    let v: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(v["startYear"], 2000);
    assert_eq!(v["endYear"], 2020);
    assert_eq!(v["events"][1]["borderColor"], "#333333");
    assert_eq!(v["events"][1]["color"], "#ffe6e6");
    assert_eq!(v["events"][1]["style"], "italic");
    assert_eq!(v["connections"][0]["lineStyle"], "solid");
    assert_eq!(v["connections"][0]["showArrow"], true);
    assert_eq!(v["columns"][0]["startYear"], 2010);
    assert_eq!(v["trends"][0]["color"], "#666666");
    assert!(json.contains("\n  \"layers\""));
}

#[test]
fn round_trip_preserves_the_diagram() {
    let original = sample();
    let doc = to_document(&original);
    let restored = Diagram::from_document(&from_json_str(&to_json_string(&doc).unwrap()).unwrap())
        .unwrap();
    assert_eq!(to_document(&restored), doc);
}

#[test]
fn legacy_documents_without_version_or_optional_fields_load() {
    let json = r##"{
        "layers": ["A"],
        "startYear": 2008,
        "endYear": 2025,
        "events": [{ "label": "One", "year": 2010, "layer": 0, "x": 99.0 }],
        "connections": [],
        "columns": [],
        "trends": []
    }"##;
    let d = Diagram::from_document(&from_json_str(json).unwrap()).unwrap();
    let e = &d.events()[0];
    assert_eq!(e.color, Color::WHITE);
    assert_eq!(e.border_color, Color::rgb(0x33, 0x33, 0x33));
    // Stored x is ignored in favor of the projection.
    let x = d.event_x(e.id).unwrap();
    assert!((x - 2.0 / 17.0 * 100.0).abs() < 1e-9);
}

#[test]
fn newer_versions_are_rejected() {
    let mut doc = to_document(&sample());
    doc.version = Some(FORMAT_VERSION + 1);
    let err = Diagram::from_document(&doc).unwrap_err();
    assert!(err.to_string().starts_with("validation error:"));
}

#[test]
fn dangling_indices_are_reference_errors() {
    let mut doc = to_document(&sample());
    doc.events[0].layer = 7;
    let err = Diagram::from_document(&doc).unwrap_err();
    assert!(err.to_string().starts_with("reference error:"));

    let mut doc = to_document(&sample());
    doc.connections[0].to = 3;
    let err = Diagram::from_document(&doc).unwrap_err();
    assert!(err.to_string().starts_with("reference error:"));
}

#[test]
fn degenerate_ranges_and_excess_trends_are_rejected() {
    let mut doc = to_document(&sample());
    doc.end_year = doc.start_year;
    assert!(Diagram::from_document(&doc).is_err());

    let mut doc = to_document(&sample());
    doc.trends = (0..5).map(|i| Trend::new(format!("t{i}"), 2001, 2002)).collect();
    let err = Diagram::from_document(&doc).unwrap_err();
    assert!(err.to_string().starts_with("capacity error:"));
}

#[test]
fn malformed_json_is_a_serialization_error() {
    let err = from_json_str("{ not json").unwrap_err();
    assert!(err.to_string().starts_with("serialization error:"));
}
