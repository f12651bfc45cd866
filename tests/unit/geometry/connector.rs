use super::*;

fn close(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
}

#[test]
fn left_to_right_exits_right_enters_left() {
    let a = Point::new(240.0, 50.0);
    let b = Point::new(960.0, 170.0);
    let c = ConnectorPath::between(a, b);
    assert_eq!(c.exit, Side::Right);
    assert_eq!(c.entry, Side::Left);
    assert_eq!(c.start, Point::new(300.0, 50.0));
    assert_eq!(c.end, Point::new(900.0, 170.0));
}

#[test]
fn reversed_positions_reverse_sides() {
    let a = Point::new(960.0, 50.0);
    let b = Point::new(240.0, 170.0);
    let c = ConnectorPath::between(a, b);
    assert_eq!(c.exit, Side::Left);
    assert_eq!(c.entry, Side::Right);
    assert_eq!(c.start, Point::new(900.0, 50.0));
    assert_eq!(c.end, Point::new(300.0, 170.0));
}

#[test]
fn equal_x_uses_left_exit() {
    let c = ConnectorPath::between(Point::new(500.0, 50.0), Point::new(500.0, 290.0));
    assert_eq!(c.exit, Side::Left);
    assert_eq!(c.entry, Side::Right);
}

#[test]
fn control_points_form_horizontal_elbow() {
    let c = ConnectorPath::between(Point::new(100.0, 50.0), Point::new(500.0, 290.0));
    // start 160, end 440, midpoint 300
    assert_eq!(c.c1, Point::new(300.0, 50.0));
    assert_eq!(c.c2, Point::new(300.0, 290.0));
    let els: Vec<_> = c.to_bezpath().elements().to_vec();
    assert_eq!(els.len(), 2);
}

#[test]
fn arrowhead_points_back_along_tangent() {
    let c = ConnectorPath::between(Point::new(100.0, 50.0), Point::new(500.0, 50.0));
    // horizontal curve ending at (440, 50) heading +x
    assert!(c.end_angle().abs() < 1e-12);
    let [tip, a, b] = c.arrowhead();
    assert_eq!(tip, c.end);
    let dx = ARROW_SIZE * FRAC_PI_6.cos();
    let dy = ARROW_SIZE * FRAC_PI_6.sin();
    assert!(close(a, Point::new(440.0 - dx, 50.0 + dy)));
    assert!(close(b, Point::new(440.0 - dx, 50.0 - dy)));
}

#[test]
fn dash_patterns_per_style() {
    assert!(dash_pattern(LineStyle::Solid).is_empty());
    assert_eq!(dash_pattern(LineStyle::Dashed), &[5.0, 5.0]);
    assert_eq!(dash_pattern(LineStyle::Dotted), &[2.0, 3.0]);
}
