use super::*;

fn wrap(label: &str) -> Vec<String> {
    wrap_label(label, 100.0, TextFace::Regular, 10.0, &mut ApproxMeasure)
}

#[test]
fn approx_measure_scales_with_size_and_length() {
    let mut m = ApproxMeasure;
    assert_eq!(m.measure("abcd", TextFace::Regular, 10.0), 22.0);
    assert_eq!(m.measure("abcd", TextFace::Bold, 20.0), 44.0);
    assert_eq!(m.measure("", TextFace::Italic, 10.0), 0.0);
}

#[test]
fn greedy_wrap_breaks_before_overflowing_word() {
    // 5.5px per char: 18 chars (with trailing space) fit in 100px, 19 do not.
    assert_eq!(
        wrap("Launch of the new platform"),
        vec!["Launch of the new", "platform"]
    );
}

#[test]
fn short_label_stays_on_one_line() {
    assert_eq!(wrap("Kickoff"), vec!["Kickoff"]);
}

#[test]
fn first_word_never_breaks_even_when_too_wide() {
    assert_eq!(
        wrap("Supercalifragilisticexpialidocious"),
        vec!["Supercalifragilisticexpialidocious"]
    );
    assert_eq!(
        wrap("Aaaaaaaaaaaaaaaaaaaaaaaa Bbbbbbbbbbbbbbbbbbbbbbbbb"),
        vec!["Aaaaaaaaaaaaaaaaaaaaaaaa", "Bbbbbbbbbbbbbbbbbbbbbbbbb"]
    );
}

#[test]
fn disabled_book_falls_back_to_approximate_metrics() {
    let mut book = FontBook::load(&FontSource::Disabled);
    for face in TextFace::ALL {
        assert!(!book.has_face(face));
        assert!(book.font_data(face).is_none());
    }
    assert_eq!(book.measure("abcd", TextFace::Regular, 10.0), 22.0);
    assert!(book.shape("abcd", TextFace::Regular, 10.0).is_none());
}

#[test]
fn missing_font_directory_degrades_to_no_faces() {
    let dir = std::env::temp_dir().join("layerline-no-such-font-dir");
    let book = FontBook::load(&FontSource::Directory(dir));
    assert!(!book.has_face(TextFace::Regular));
}
