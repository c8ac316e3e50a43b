use spotlyrics::types::ArtistRef;
use spotlyrics::utils::*;

fn artist(name: Option<&str>) -> ArtistRef {
    ArtistRef {
        name: name.map(str::to_string),
    }
}

#[test]
fn test_format_duration() {
    assert_eq!(format_duration(0), "00:00");
    assert_eq!(format_duration(999), "00:00");
    assert_eq!(format_duration(65_000), "01:05");
    assert_eq!(format_duration(215_000), "03:35");

    // Minutes are not wrapped into hours
    assert_eq!(format_duration(3_600_000), "60:00");
    assert_eq!(format_duration(6_005_000), "100:05");
}

#[test]
fn test_join_artists() {
    let artists = vec![artist(Some("Daft Punk")), artist(Some("Pharrell Williams"))];
    assert_eq!(join_artists(&artists, ","), "Daft Punk,Pharrell Williams");
    assert_eq!(join_artists(&artists, ", "), "Daft Punk, Pharrell Williams");
}

#[test]
fn test_join_artists_unknown_and_empty() {
    let artists = vec![artist(None), artist(Some("Nile Rodgers"))];
    assert_eq!(join_artists(&artists, ", "), "Unknown Artist, Nile Rodgers");
    assert_eq!(join_artists(&[], ", "), "");
}

#[test]
fn test_generate_session_id() {
    let id = generate_session_id();

    assert_eq!(id.len(), SESSION_ID_LEN);
    assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
    assert!(is_valid_session_id(&id));

    // Two generated ids should be different
    assert_ne!(id, generate_session_id());
}

#[test]
fn test_is_valid_session_id_rejects_malformed() {
    assert!(!is_valid_session_id(""));
    assert!(!is_valid_session_id("short"));
    assert!(!is_valid_session_id(&"a".repeat(SESSION_ID_LEN + 1)));
    assert!(!is_valid_session_id(&format!("{};", "a".repeat(SESSION_ID_LEN - 1))));
}

#[test]
fn test_escape_html() {
    assert_eq!(
        escape_html(r#"<b>"Rock" & 'Roll'</b>"#),
        "&lt;b&gt;&quot;Rock&quot; &amp; &#39;Roll&#39;&lt;/b&gt;"
    );
    assert_eq!(escape_html("plain text"), "plain text");
}
