use super::*;
use crate::timeline::{dsl::DiagramBuilder, model::MAX_TRENDS};

// Layers A (y 0..120) and B (y 120..240); E1 box 245..355 x 20..60, E2 box 845..955 x 140..180.
fn session() -> EditorSession {
    let d = DiagramBuilder::new(2000, 2020)
        .unwrap()
        .layer("A")
        .unwrap()
        .layer("B")
        .unwrap()
        .event("A", "E1", 2005)
        .unwrap()
        .event("B", "E2", 2015)
        .unwrap()
        .build()
        .unwrap();
    EditorSession::new(d, 1200.0)
}

fn ids(s: &EditorSession) -> (EventId, EventId) {
    (s.diagram().events()[0].id, s.diagram().events()[1].id)
}

#[test]
fn background_click_opens_placement_then_submit_adds_event() {
    let mut s = session();
    let layer_a = s.diagram().layers()[0].id;
    assert_eq!(
        s.apply(EditorAction::Click(Point::new(600.0, 100.0))).unwrap(),
        Outcome::StateChanged
    );
    assert_eq!(
        s.state(),
        EditorState::PlacingEvent(EventDraft {
            layer: Some(layer_a),
            year: 2010
        })
    );

    let out = s
        .apply(EditorAction::SubmitEvent(EventSpec::new("New", 2010, layer_a)))
        .unwrap();
    assert!(matches!(out, Outcome::EventAdded(_)));
    assert_eq!(s.state(), EditorState::Idle);
    assert_eq!(s.diagram().events().len(), 3);
}

#[test]
fn clicks_below_the_layers_are_ignored() {
    let mut s = session();
    assert_eq!(
        s.apply(EditorAction::Click(Point::new(600.0, 300.0))).unwrap(),
        Outcome::Ignored
    );
    assert_eq!(s.state(), EditorState::Idle);
}

#[test]
fn connecting_two_events_goes_through_the_property_form() {
    let mut s = session();
    let (e1, e2) = ids(&s);
    s.apply(EditorAction::Click(Point::new(300.0, 40.0))).unwrap();
    assert_eq!(s.state(), EditorState::Selected(e1));

    s.apply(EditorAction::StartConnecting(e1)).unwrap();
    s.apply(EditorAction::Click(Point::new(900.0, 160.0))).unwrap();
    assert_eq!(
        s.state(),
        EditorState::AwaitingConnectionProperties { from: e1, to: e2 }
    );

    let out = s
        .apply(EditorAction::SubmitConnection(ConnectionStyle::default()))
        .unwrap();
    assert_eq!(out, Outcome::ConnectionAdded(0));
    assert_eq!(s.state(), EditorState::Idle);
    assert_eq!(s.diagram().connection_endpoints(0), Some((0, 1)));
}

#[test]
fn clicking_the_source_again_cancels_connecting() {
    let mut s = session();
    let (e1, _) = ids(&s);
    s.apply(EditorAction::StartConnecting(e1)).unwrap();
    s.apply(EditorAction::Click(Point::new(300.0, 40.0))).unwrap();
    assert_eq!(s.state(), EditorState::Idle);
    assert!(s.diagram().connections().is_empty());
}

#[test]
fn connecting_suppresses_background_placement() {
    let mut s = session();
    let (e1, _) = ids(&s);
    s.apply(EditorAction::StartConnecting(e1)).unwrap();
    let err = s
        .apply(EditorAction::Click(Point::new(600.0, 100.0)))
        .unwrap_err();
    assert!(err.to_string().starts_with("invalid transition:"));
    assert_eq!(s.state(), EditorState::ConnectingFrom(e1));
}

#[test]
fn open_forms_reject_canvas_clicks() {
    let mut s = session();
    s.apply(EditorAction::OpenLayerForm).unwrap();
    assert!(s.apply(EditorAction::Click(Point::new(300.0, 40.0))).is_err());
    assert!(s.apply(EditorAction::OpenColumnForm).is_err());
    assert_eq!(s.state(), EditorState::AddingLayer);

    s.apply(EditorAction::SubmitLayer("C".into())).unwrap();
    assert_eq!(s.diagram().layers().len(), 3);
    assert_eq!(s.state(), EditorState::Idle);
}

#[test]
fn drop_moves_the_dragged_event() {
    let mut s = session();
    let (e1, _) = ids(&s);
    let layer_b = s.diagram().layers()[1].id;
    s.apply(EditorAction::BeginDrag(e1)).unwrap();
    assert_eq!(
        s.apply(EditorAction::Drop(Point::new(1200.0, 200.0))).unwrap(),
        Outcome::EventMoved(e1)
    );
    let e = s.diagram().event(e1).unwrap();
    assert_eq!((e.year, e.layer), (2020, layer_b));
    assert_eq!(s.state(), EditorState::Idle);
}

#[test]
fn drop_outside_layers_ends_drag_without_moving() {
    let mut s = session();
    let (e1, _) = ids(&s);
    s.apply(EditorAction::BeginDrag(e1)).unwrap();
    assert_eq!(
        s.apply(EditorAction::Drop(Point::new(600.0, 400.0))).unwrap(),
        Outcome::Ignored
    );
    assert_eq!(s.diagram().event(e1).unwrap().year, 2005);
    assert_eq!(s.state(), EditorState::Idle);
}

#[test]
fn trend_capacity_error_keeps_the_form_open() {
    let mut s = session();
    for i in 0..MAX_TRENDS {
        s.apply(EditorAction::OpenTrendForm).unwrap();
        s.apply(EditorAction::SubmitTrend(Trend::new(format!("t{i}"), 2001, 2003)))
            .unwrap();
    }
    s.apply(EditorAction::OpenTrendForm).unwrap();
    let err = s
        .apply(EditorAction::SubmitTrend(Trend::new("extra", 2001, 2003)))
        .unwrap_err();
    assert!(err.to_string().starts_with("capacity error:"));
    assert_eq!(s.state(), EditorState::AddingTrend);
    assert_eq!(s.diagram().trends().len(), MAX_TRENDS);
    s.apply(EditorAction::Cancel).unwrap();
    assert_eq!(s.state(), EditorState::Idle);
}

#[test]
fn submits_without_a_form_are_invalid_transitions() {
    let mut s = session();
    let err = s
        .apply(EditorAction::SubmitConnection(ConnectionStyle::default()))
        .unwrap_err();
    assert!(err.to_string().starts_with("invalid transition:"));
    assert!(s.apply(EditorAction::Drop(Point::new(10.0, 10.0))).is_err());
    assert_eq!(s.state(), EditorState::Idle);
}

#[test]
fn editing_updates_in_place() {
    let mut s = session();
    let (e1, _) = ids(&s);
    s.apply(EditorAction::EditEvent(e1)).unwrap();
    let spec = s.diagram().event(e1).unwrap().to_spec();
    let out = s
        .apply(EditorAction::SubmitEvent(EventSpec {
            label: "Renamed".into(),
            ..spec
        }))
        .unwrap();
    assert_eq!(out, Outcome::EventUpdated(e1));
    assert_eq!(s.diagram().event(e1).unwrap().label, "Renamed");
}

#[test]
fn removing_the_selected_events_layer_returns_to_idle() {
    let mut s = session();
    let (e1, e2) = ids(&s);
    let layer_a = s.diagram().layers()[0].id;
    s.apply(EditorAction::Click(Point::new(300.0, 40.0))).unwrap();
    assert_eq!(s.state(), EditorState::Selected(e1));
    let out = s.apply(EditorAction::RemoveLayer(layer_a)).unwrap();
    assert!(matches!(out, Outcome::LayerRemoved(_)));
    assert_eq!(s.state(), EditorState::Idle);
    assert!(s.diagram().event(e2).is_some());
}

#[test]
fn toolbar_event_form_prefills_first_layer_and_middle_year() {
    let mut s = session();
    let layer_a = s.diagram().layers()[0].id;
    s.apply(EditorAction::OpenEventForm).unwrap();
    assert_eq!(
        s.state(),
        EditorState::PlacingEvent(EventDraft {
            layer: Some(layer_a),
            year: 2010
        })
    );

    s.apply(EditorAction::Cancel).unwrap();
    s.apply(EditorAction::SetYearRange {
        start_year: 2008,
        end_year: 2025,
    })
    .unwrap();
    s.apply(EditorAction::OpenEventForm).unwrap();
    assert!(matches!(
        s.state(),
        EditorState::PlacingEvent(EventDraft { year: 2017, .. })
    ));
}
