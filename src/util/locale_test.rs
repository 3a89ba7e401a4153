use super::*;
use crate::state::persistence::MemoryPersistence;

#[test]
fn stored_preference_wins() {
    assert_eq!(resolve(Some("fr"), Some("en-US")), Locale::Fr);
    assert_eq!(resolve(Some("en"), Some("fr-FR")), Locale::En);
}

#[test]
fn reported_language_uses_primary_subtag() {
    assert_eq!(resolve(None, Some("fr-FR")), Locale::Fr);
    assert_eq!(resolve(None, Some("fr_CA.UTF-8")), Locale::Fr);
    assert_eq!(resolve(None, Some("EN_gb")), Locale::En);
}

#[test]
fn unsupported_stored_value_falls_through_to_reported() {
    assert_eq!(resolve(Some("de"), Some("fr-BE")), Locale::Fr);
}

#[test]
fn defaults_to_english() {
    assert_eq!(resolve(None, None), Locale::En);
    assert_eq!(resolve(Some("es"), Some("ja-JP")), Locale::En);
    assert_eq!(resolve(Some(""), Some("  ")), Locale::En);
}

#[test]
fn from_str_rejects_unknown_codes() {
    assert_eq!("fr".parse::<Locale>(), Ok(Locale::Fr));
    assert!("klingon".parse::<Locale>().is_err());
}

#[test]
fn set_locale_persists_code() {
    let store = MemoryPersistence::new();
    set_locale(&store, Locale::Fr);
    assert_eq!(store.get(LOCALE_KEY).as_deref(), Some("fr"));
    assert_eq!(current(&store), Locale::Fr);
}

#[test]
fn locale_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&Locale::Fr).unwrap(), "\"fr\"");
}
