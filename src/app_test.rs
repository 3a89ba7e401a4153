use super::*;
use crate::net::transport::mock::MockTransport;
use crate::router::RouteName;
use crate::state::persistence::{LOCALE_KEY, MemoryPersistence, TOKEN_KEY, USER_KEY};
use serde_json::json;

struct Harness {
    transport: Arc<MockTransport>,
    session_store: Arc<MemoryPersistence>,
    preferences: Arc<MemoryPersistence>,
}

impl Harness {
    fn new() -> Self {
        let preferences = Arc::new(MemoryPersistence::new());
        preferences.set(LOCALE_KEY, "fr");
        Self { transport: Arc::new(MockTransport::new()), session_store: Arc::new(MemoryPersistence::new()), preferences }
    }

    fn with_session(self, role: &str) -> Self {
        self.session_store.set(TOKEN_KEY, "t1");
        self.session_store
            .set(USER_KEY, &json!({"user_id": 2, "email": "u@x.com", "name": "U", "role": role}).to_string());
        self
    }

    fn app(&self) -> App {
        App::from_parts(self.transport.clone(), self.session_store.clone(), self.preferences.clone())
    }
}

#[test]
fn bootstrap_restores_persisted_session() {
    let h = Harness::new().with_session("company");
    let mut app = h.app();
    assert!(app.store().is_authenticated());
    assert_eq!(app.navigate("/login").unwrap().name(), RouteName::Company);
}

#[test]
fn bootstrap_clears_half_persisted_session() {
    let h = Harness::new();
    h.session_store.set(TOKEN_KEY, "orphan");
    let app = h.app();
    assert!(!app.store().is_authenticated());
    assert!(h.session_store.is_empty());
}

#[test]
fn stored_locale_is_applied_and_updatable() {
    let h = Harness::new();
    let mut app = h.app();
    assert_eq!(app.locale(), Locale::Fr);
    app.set_locale(Locale::En);
    assert_eq!(app.locale(), Locale::En);
    assert_eq!(h.preferences.get(LOCALE_KEY).as_deref(), Some("en"));
}

#[tokio::test]
async fn login_lands_on_role_home() {
    let h = Harness::new();
    h.transport.push_json(200, json!({"access": "t1", "user_id": 3, "role": "petsitter"}));
    let mut app = h.app();
    let (outcome, landing) = app.login("sitter@x.com", "pw").await.unwrap();
    assert!(outcome.is_success());
    assert_eq!(landing.unwrap().name(), RouteName::PetSitter);
}

#[tokio::test]
async fn login_returns_to_remembered_destination() {
    let h = Harness::new();
    let mut app = h.app();
    assert_eq!(app.navigate("/profile").unwrap().name(), RouteName::Login);

    h.transport.push_json(200, json!({"access": "t1", "user_id": 1, "role": "petowner"}));
    let (_, landing) = app.login("owner@x.com", "pw").await.unwrap();
    assert_eq!(landing.unwrap().name(), RouteName::Profile);
}

#[tokio::test]
async fn failed_login_does_not_navigate() {
    let h = Harness::new();
    h.transport.push_json(401, json!({"error": "bad"}));
    let mut app = h.app();
    let (outcome, landing) = app.login("owner@x.com", "nope").await.unwrap();
    assert!(!outcome.is_success());
    assert!(landing.is_none());
    assert!(app.router().current().is_none());
}

#[test]
fn logout_routes_to_login() {
    let h = Harness::new().with_session("petowner");
    let mut app = h.app();
    let landing = app.logout().unwrap().unwrap();
    assert_eq!(landing.name(), RouteName::Login);
    assert!(h.session_store.is_empty());
}

#[tokio::test]
async fn rejected_token_routes_to_login_on_sync() {
    let h = Harness::new().with_session("petowner");
    h.transport.push_json(401, json!({"detail": "Token is invalid or expired"}));
    let mut app = h.app();
    assert!(app.api().get_all_animals().await.is_err());
    assert_eq!(app.sync().unwrap().unwrap().name(), RouteName::Login);
    assert!(!app.store().is_authenticated());
}

#[test]
fn corrupted_role_forces_logout_on_guarded_view() {
    let h = Harness::new().with_session("superhero");
    let mut app = h.app();
    assert_eq!(app.navigate("/petowner").unwrap().name(), RouteName::Login);
    assert!(h.session_store.is_empty());
}
