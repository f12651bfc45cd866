use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        LayerlineError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        LayerlineError::reference("x")
            .to_string()
            .contains("reference error:")
    );
    assert!(
        LayerlineError::capacity("x")
            .to_string()
            .contains("capacity error:")
    );
    assert!(
        LayerlineError::transition("x")
            .to_string()
            .contains("invalid transition:")
    );
    assert!(
        LayerlineError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert!(
        LayerlineError::export("x")
            .to_string()
            .contains("export error:")
    );
    assert!(
        LayerlineError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = LayerlineError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn json_errors_map_to_serde() {
    let err: LayerlineError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, LayerlineError::Serde(_)));
}
