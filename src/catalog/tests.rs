use super::remote::{list_url, parse_track_list};

#[test]
fn list_url_joins_without_doubled_slashes() {
    assert_eq!(
        list_url("http://localhost:5000", "/music-list"),
        "http://localhost:5000/music-list"
    );
    assert_eq!(
        list_url("http://localhost:5000/", "music-list"),
        "http://localhost:5000/music-list"
    );
    assert_eq!(
        list_url("  http://localhost:5000/  ", "/music-list"),
        "http://localhost:5000/music-list"
    );
}

#[test]
fn parse_track_list_reads_server_order() {
    let body = r#"[
        {"name": "First Song", "url": "https://cdn.test/first.mp3"},
        {"name": "Second Song", "url": "https://cdn.test/second.mp3"}
    ]"#;

    let tracks = parse_track_list(body).unwrap();
    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[0].name, "First Song");
    assert_eq!(tracks[0].url, "https://cdn.test/first.mp3");
    assert_eq!(tracks[1].name, "Second Song");
}

#[test]
fn parse_track_list_accepts_empty_array() {
    assert_eq!(parse_track_list("[]").unwrap(), vec![]);
}

#[test]
fn parse_track_list_rejects_non_array_payloads() {
    // The server reports failures as a JSON object, not an array.
    assert!(parse_track_list(r#"{"error": "Failed to fetch music list"}"#).is_err());
    assert!(parse_track_list("not json").is_err());
    assert!(parse_track_list(r#"[{"name": "missing url"}]"#).is_err());
}
