use super::*;
use crate::{
    geometry::projection::OverflowPolicy,
    render::text::ApproxMeasure,
    timeline::{
        dsl::DiagramBuilder,
        model::{ConnectionStyle, LineStyle, Trend},
    },
};

fn diagram() -> Diagram {
    let dashed = ConnectionStyle {
        line_style: LineStyle::Dashed,
        ..ConnectionStyle::default()
    };
    DiagramBuilder::new(2000, 2020)
        .unwrap()
        .layer("Product")
        .unwrap()
        .layer("Market")
        .unwrap()
        .event_with("Product", "Launch of the new platform", 2005, |s| {
            s.style(EventStyle::Italic)
        })
        .unwrap()
        .event("Market", "Ship", 2015)
        .unwrap()
        .connect_with(0, 1, dashed)
        .unwrap()
        .column("Era", 1995, 2005)
        .unwrap()
        .trend(Trend::new("Growth", 2002, 2018))
        .unwrap()
        .build()
        .unwrap()
}

fn compile(d: &Diagram, overflow: OverflowPolicy) -> Scene {
    let layout = SceneLayout::new(d, 1200.0);
    let settings = RenderSettings {
        overflow,
        ..RenderSettings::default()
    };
    compile_scene(d, &layout, &settings, &mut ApproxMeasure)
}

fn texts<'a>(scene: &'a Scene, phase: ScenePhase) -> Vec<&'a TextRun> {
    scene
        .ops_in(phase)
        .filter_map(|op| match op {
            DrawOp::Text(t) => Some(t),
            _ => None,
        })
        .collect()
}

#[test]
fn phases_are_emitted_back_to_front() {
    let scene = compile(&diagram(), OverflowPolicy::Clamp);
    let phases: Vec<ScenePhase> = scene.items.iter().map(|i| i.phase).collect();
    let mut sorted = phases.clone();
    sorted.sort();
    assert_eq!(phases, sorted);
    assert_eq!(
        scene.items[0].op,
        DrawOp::FillRect {
            rect: Rect::new(0.0, 0.0, 1200.0, 340.0),
            color: Color::WHITE,
        }
    );
    for phase in [
        ScenePhase::Columns,
        ScenePhase::Layers,
        ScenePhase::Connections,
        ScenePhase::Events,
        ScenePhase::Axis,
        ScenePhase::Trends,
    ] {
        assert!(scene.ops_in(phase).next().is_some(), "{phase:?} is empty");
    }
}

#[test]
fn columns_clamp_by_default_and_overflow_on_request() {
    let d = diagram();
    let clamped = compile(&d, OverflowPolicy::Clamp);
    let fill = clamped.ops_in(ScenePhase::Columns).next().unwrap();
    assert_eq!(
        fill,
        &DrawOp::FillRect {
            rect: Rect::new(0.0, 0.0, 300.0, 340.0),
            color: COLUMN_FILL,
        }
    );
    assert_eq!(texts(&clamped, ScenePhase::Columns)[0].origin, Point::new(150.0, 15.0));

    let raw = compile(&d, OverflowPolicy::Overflow);
    let fill = raw.ops_in(ScenePhase::Columns).next().unwrap();
    assert_eq!(
        fill,
        &DrawOp::FillRect {
            rect: Rect::new(-300.0, 0.0, 300.0, 340.0),
            color: COLUMN_FILL,
        }
    );
    assert_eq!(texts(&raw, ScenePhase::Columns)[0].origin, Point::new(0.0, 15.0));
}

#[test]
fn layer_labels_are_bold_and_width_limited() {
    let scene = compile(&diagram(), OverflowPolicy::Clamp);
    let labels = texts(&scene, ScenePhase::Layers);
    assert_eq!(labels.len(), 2);
    assert_eq!(labels[1].text, "Market");
    assert_eq!(labels[1].origin, Point::new(8.0, 135.0));
    assert_eq!(labels[1].face, TextFace::Bold);
    assert_eq!(labels[1].align, TextAlign::Left);
    assert_eq!(labels[1].max_width, Some(140.0));
}

#[test]
fn connections_carry_dash_and_arrow() {
    let scene = compile(&diagram(), OverflowPolicy::Clamp);
    let ops: Vec<&DrawOp> = scene.ops_in(ScenePhase::Connections).collect();
    assert_eq!(ops.len(), 2);
    match ops[0] {
        DrawOp::StrokePath { stroke, .. } => {
            assert_eq!(stroke.dash, vec![5.0, 5.0]);
            assert_eq!(stroke.width, 2.0);
            assert_eq!(stroke.color, Color::rgb(0x66, 0x66, 0x66));
        }
        other => panic!("expected connector stroke, got {other:?}"),
    }
    assert!(matches!(ops[1], DrawOp::FillPath { .. }));
}

#[test]
fn event_labels_wrap_inside_the_box() {
    let scene = compile(&diagram(), OverflowPolicy::Clamp);
    let lines = texts(&scene, ScenePhase::Events);
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0].text, "Launch of the new");
    assert_eq!(lines[0].origin, Point::new(300.0, 35.0));
    assert_eq!(lines[0].face, TextFace::Italic);
    assert_eq!(lines[1].text, "platform");
    assert_eq!(lines[1].origin, Point::new(300.0, 47.0));
    assert_eq!(lines[2].text, "Ship");
    assert_eq!(lines[2].face, TextFace::Regular);
    assert_eq!(lines[2].origin, Point::new(900.0, 155.0));
}

#[test]
fn axis_has_a_tick_and_label_per_stride() {
    let scene = compile(&diagram(), OverflowPolicy::Clamp);
    let strokes = scene
        .ops_in(ScenePhase::Axis)
        .filter(|op| matches!(op, DrawOp::StrokePath { .. }))
        .count();
    assert_eq!(strokes, 6);
    let labels: Vec<&str> = texts(&scene, ScenePhase::Axis)
        .iter()
        .map(|t| t.text.as_str())
        .collect();
    assert_eq!(labels, vec!["2000", "2005", "2010", "2015", "2020"]);
    assert_eq!(texts(&scene, ScenePhase::Axis)[0].origin.y, 312.0);
}

#[test]
fn trends_are_translucent_with_white_labels() {
    let scene = compile(&diagram(), OverflowPolicy::Clamp);
    let ops: Vec<&DrawOp> = scene.ops_in(ScenePhase::Trends).collect();
    assert_eq!(
        ops[0],
        &DrawOp::FillRect {
            rect: Rect::new(120.0, 276.0, 1080.0, 300.0),
            color: Color::rgba(0x66, 0x66, 0x66, 204),
        }
    );
    match ops[1] {
        DrawOp::Text(t) => {
            assert_eq!(t.color, Color::WHITE);
            assert_eq!(t.origin, Point::new(600.0, 291.0));
        }
        other => panic!("expected trend label, got {other:?}"),
    }
}

#[test]
fn event_positions_follow_year_range_changes() {
    let mut d = diagram();
    d.set_year_range(2000, 2040).unwrap();
    let scene = compile(&d, OverflowPolicy::Clamp);
    let lines = texts(&scene, ScenePhase::Events);
    assert_eq!(lines[2].origin.x, 450.0);
}

#[test]
fn off_axis_columns_and_trends_are_skipped_when_clamping() {
    let d = DiagramBuilder::new(2008, 2025)
        .unwrap()
        .layer("Only")
        .unwrap()
        .column("Before", 1990, 1995)
        .unwrap()
        .trend(Trend::new("Later", 2030, 2040))
        .unwrap()
        .trend(Trend::new("Visible", 2010, 2020))
        .unwrap()
        .build()
        .unwrap();

    let scene = compile(&d, OverflowPolicy::Clamp);
    assert_eq!(scene.ops_in(ScenePhase::Columns).count(), 0);
    let labels: Vec<&str> = texts(&scene, ScenePhase::Trends)
        .iter()
        .map(|t| t.text.as_str())
        .collect();
    assert_eq!(labels, vec!["Visible"]);
    // The visible trend keeps the second stacking slot.
    match scene.ops_in(ScenePhase::Trends).next() {
        Some(DrawOp::FillRect { rect, .. }) => assert_eq!(rect.y0, 220.0 - 64.0 - 8.0),
        other => panic!("expected trend fill, got {other:?}"),
    }

    let overflow = compile(&d, OverflowPolicy::Overflow);
    assert_eq!(overflow.ops_in(ScenePhase::Columns).count(), 3);
    assert_eq!(texts(&overflow, ScenePhase::Trends).len(), 2);
}

#[test]
fn huge_year_spans_compile_a_bounded_axis() {
    let d = DiagramBuilder::new(0, 50_000_000)
        .unwrap()
        .layer("Deep time")
        .unwrap()
        .build()
        .unwrap();
    let scene = compile(&d, OverflowPolicy::Clamp);
    let labels = texts(&scene, ScenePhase::Axis);
    assert!(labels.len() <= 300);
    assert_eq!(labels[0].text, "0");
}
