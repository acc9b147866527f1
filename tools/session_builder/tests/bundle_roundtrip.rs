use session_builder::build_from_path;
use session_format::SessionBundle;
use std::fs;

#[test]
fn bundle_written_from_file_decodes_back() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config_path = dir.path().join("session.yaml");
    fs::write(
        &config_path,
        r##"version: 1
prompts:
  - id: drums
    text: "Punchy kick drums"
    color: "#ff5500"
    cc: 1
    weight: 0.5
  - id: bass
    text: "Deep sub bass"
    color: "#00ff55"
    cc: 2
filtered: []
"##,
    )
    .expect("write config");

    let (output, bytes) = build_from_path(&config_path).expect("build");
    let decoded: SessionBundle = bincode::deserialize(&bytes).expect("decode");
    assert_eq!(decoded, output.bundle);
    assert_eq!(decoded.prompts.len(), 2);
    assert_eq!(decoded.prompts[0].id, "drums");
    assert_eq!(decoded.header.version, session_format::SESSION_VERSION);
    assert_ne!(decoded.header.source_hash, 0);
}
