use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        BoilerError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(BoilerError::decode("x").to_string().contains("decode error:"));
    assert!(BoilerError::encode("x").to_string().contains("encode error:"));
    assert!(
        BoilerError::platform("x")
            .to_string()
            .contains("platform error:")
    );
}

#[test]
fn too_large_reports_both_sizes() {
    let msg = BoilerError::TooLarge {
        bytes: 30,
        limit: 24,
    }
    .to_string();
    assert!(msg.contains("30 bytes"));
    assert!(msg.contains("24 byte limit"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = BoilerError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
