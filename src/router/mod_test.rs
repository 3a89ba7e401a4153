use super::*;
use crate::state::persistence::{MemoryPersistence, SessionPersistence, TOKEN_KEY};
use crate::state::session::Session;

fn session(role: &str) -> Session {
    Session {
        user_id: 5,
        email: "u@x.com".to_owned(),
        name: "U".to_owned(),
        role: role.to_owned(),
        is_admin: false,
        admin_status: None,
    }
}

fn router() -> (Arc<MemoryPersistence>, Arc<SessionCell>, Navigator, Router) {
    let store = Arc::new(MemoryPersistence::new());
    let cell = Arc::new(SessionCell::new(store.clone()));
    let (navigator, rx) = Navigator::channel();
    let router = Router::new(cell.clone(), rx);
    (store, cell, navigator, router)
}

// =============================================================================
// navigate
// =============================================================================

#[test]
fn anonymous_user_reaches_public_views() {
    let (_, _, _, mut router) = router();
    assert_eq!(router.navigate("/").unwrap().name(), RouteName::Home);
    assert_eq!(router.navigate("/petsitter/3").unwrap().name(), RouteName::PetSitterDetail);
    assert_eq!(router.current().unwrap().matched.param("id"), Some("3"));
}

#[test]
fn anonymous_user_is_sent_to_login_with_destination() {
    let (_, _, _, mut router) = router();
    let resolved = router.navigate("/company/12").unwrap();
    assert_eq!(resolved.name(), RouteName::Login);
    assert_eq!(resolved.location.query_value(REDIRECT_QUERY_KEY), Some("/company/12"));
    assert_eq!(resolved.redirects, 1);
}

#[test]
fn owner_visiting_login_lands_on_owner_home() {
    let (_, cell, _, mut router) = router();
    cell.establish(session("petowner"), "t1");
    let resolved = router.navigate("/login").unwrap();
    assert_eq!(resolved.name(), RouteName::PetOwner);
    assert_eq!(resolved.view(), "PetOwnerView");
}

#[test]
fn owner_visiting_company_view_lands_on_owner_home() {
    let (_, cell, _, mut router) = router();
    cell.establish(session("petowner"), "t1");
    let resolved = router.navigate("/company").unwrap();
    assert_eq!(resolved.name(), RouteName::PetOwner);
}

#[test]
fn corrupted_role_forces_logout() {
    let (store, cell, _, mut router) = router();
    cell.establish(session("ghost"), "t1");
    let resolved = router.navigate("/petowner").unwrap();
    assert_eq!(resolved.name(), RouteName::Login);
    assert!(!cell.is_authenticated());
    assert!(store.get(TOKEN_KEY).is_none());
}

#[test]
fn unknown_path_is_not_found() {
    let (_, _, _, mut router) = router();
    let err = router.navigate("/nowhere").unwrap_err();
    assert!(matches!(err, RouterError::NotFound(ref p) if p == "/nowhere"));
    assert!(router.current().is_none());
}

#[test]
fn malformed_path_is_rejected() {
    let (_, _, _, mut router) = router();
    assert!(matches!(router.navigate("login").unwrap_err(), RouterError::InvalidLocation(_)));
}

// =============================================================================
// process_pending
// =============================================================================

#[test]
fn process_pending_applies_queued_requests_in_order() {
    let (_, _, navigator, mut router) = router();
    navigator.push(Location::new("/register"));
    navigator.push(Location::named(RouteName::Login));
    let last = router.process_pending().unwrap().unwrap();
    assert_eq!(last.name(), RouteName::Login);
    assert!(router.process_pending().unwrap().is_none());
}

#[test]
fn navigator_push_after_router_drop_is_silent() {
    let (_, _, navigator, router) = router();
    drop(router);
    navigator.push(Location::named(RouteName::Login));
}

// =============================================================================
// after_login
// =============================================================================

#[test]
fn after_login_honors_remembered_destination() {
    let (_, cell, _, mut router) = router();
    router.navigate("/profile").unwrap();
    cell.establish(session("company"), "t1");
    let resolved = router.after_login(Some(Role::Company)).unwrap();
    assert_eq!(resolved.name(), RouteName::Profile);
}

#[test]
fn after_login_defaults_to_role_home() {
    let (_, cell, _, mut router) = router();
    router.navigate("/login").unwrap();
    cell.establish(session("petsitter"), "t1");
    let resolved = router.after_login(Some(Role::PetSitter)).unwrap();
    assert_eq!(resolved.name(), RouteName::PetSitter);
}
