use super::*;

const ALL_NAMES: [RouteName; 11] = [
    RouteName::Home,
    RouteName::Login,
    RouteName::Register,
    RouteName::ForgotPassword,
    RouteName::Profile,
    RouteName::PetOwner,
    RouteName::PetSitter,
    RouteName::PetSitterDetail,
    RouteName::CompanyReservation,
    RouteName::CompanyDetail,
    RouteName::Company,
];

#[test]
fn every_route_name_has_an_entry() {
    for name in ALL_NAMES {
        assert_eq!(ROUTES.iter().filter(|r| r.name == name).count(), 1, "{name}");
        assert_eq!(route(name).name, name);
    }
    assert_eq!(ROUTES.len(), ALL_NAMES.len());
}

#[test]
fn resolve_root() {
    let m = resolve("/").unwrap();
    assert_eq!(m.route.name, RouteName::Home);
    assert!(m.params.is_empty());
}

#[test]
fn resolve_static_paths() {
    assert_eq!(resolve("/login").unwrap().route.name, RouteName::Login);
    assert_eq!(resolve("/forgot-password").unwrap().route.name, RouteName::ForgotPassword);
    assert_eq!(resolve("/company").unwrap().route.name, RouteName::Company);
}

#[test]
fn resolve_captures_params() {
    let m = resolve("/company-reservation/42").unwrap();
    assert_eq!(m.route.name, RouteName::CompanyReservation);
    assert_eq!(m.param("id"), Some("42"));
}

#[test]
fn resolve_prefers_exact_segment_count() {
    assert_eq!(resolve("/petsitter").unwrap().route.name, RouteName::PetSitter);
    assert_eq!(resolve("/petsitter/7").unwrap().route.name, RouteName::PetSitterDetail);
    assert_eq!(resolve("/company/7").unwrap().route.name, RouteName::CompanyDetail);
}

#[test]
fn resolve_unknown_path_is_none() {
    assert!(resolve("/admin").is_none());
    assert!(resolve("/petsitter/7/extra").is_none());
}

#[test]
fn guards_match_route_table() {
    assert_eq!(route(RouteName::Login).guard, Some(Guard::RedirectLoggedIn));
    assert_eq!(route(RouteName::Profile).guard, Some(Guard::RequireAuth));
    assert_eq!(route(RouteName::CompanyReservation).guard, Some(Guard::RequireRole(Role::PetSitter)));
    assert_eq!(route(RouteName::PetSitterDetail).guard, None);
}

#[test]
fn route_name_exposes_view() {
    assert_eq!(RouteName::PetOwner.view(), "PetOwnerView");
    assert_eq!(RouteName::PetOwner.pattern(), "/petowner");
}
