//! Static route table: URL patterns, views and their guards.

#[cfg(test)]
#[path = "table_test.rs"]
mod table_test;

use std::fmt;

use super::guards::Guard;
use crate::state::session::Role;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RouteName {
    Home,
    Login,
    Register,
    ForgotPassword,
    Profile,
    PetOwner,
    PetSitter,
    PetSitterDetail,
    CompanyReservation,
    CompanyDetail,
    Company,
}

impl RouteName {
    /// URL pattern; `:name` segments capture a path parameter.
    #[must_use]
    pub fn pattern(self) -> &'static str {
        route(self).pattern
    }

    #[must_use]
    pub fn view(self) -> &'static str {
        route(self).view
    }
}

impl fmt::Display for RouteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Route {
    pub name: RouteName,
    pub pattern: &'static str,
    pub view: &'static str,
    pub guard: Option<Guard>,
}

pub static ROUTES: &[Route] = &[
    Route { name: RouteName::Home, pattern: "/", view: "HomeView", guard: Some(Guard::RedirectLoggedIn) },
    Route { name: RouteName::Login, pattern: "/login", view: "LoginView", guard: Some(Guard::RedirectLoggedIn) },
    Route { name: RouteName::Register, pattern: "/register", view: "RegisterView", guard: Some(Guard::RedirectLoggedIn) },
    Route {
        name: RouteName::ForgotPassword,
        pattern: "/forgot-password",
        view: "ForgotPasswordView",
        guard: Some(Guard::RedirectLoggedIn),
    },
    Route { name: RouteName::Profile, pattern: "/profile", view: "ProfileView", guard: Some(Guard::RequireAuth) },
    Route {
        name: RouteName::PetOwner,
        pattern: "/petowner",
        view: "PetOwnerView",
        guard: Some(Guard::RequireRole(Role::PetOwner)),
    },
    Route {
        name: RouteName::PetSitter,
        pattern: "/petsitter",
        view: "PetSitterView",
        guard: Some(Guard::RequireRole(Role::PetSitter)),
    },
    // Public: sitter profiles are browsable without an account.
    Route { name: RouteName::PetSitterDetail, pattern: "/petsitter/:id", view: "PetSitterDetailView", guard: None },
    Route {
        name: RouteName::CompanyReservation,
        pattern: "/company-reservation/:id",
        view: "CompanyReservationView",
        guard: Some(Guard::RequireRole(Role::PetSitter)),
    },
    Route {
        name: RouteName::CompanyDetail,
        pattern: "/company/:id",
        view: "CompanyDetailView",
        guard: Some(Guard::RequireAuth),
    },
    Route {
        name: RouteName::Company,
        pattern: "/company",
        view: "CompanyView",
        guard: Some(Guard::RequireRole(Role::Company)),
    },
];

/// Look up the table entry for `name`.
#[must_use]
pub fn route(name: RouteName) -> &'static Route {
    // Every RouteName variant has exactly one entry; see `every_route_name_has_an_entry`.
    ROUTES.iter().find(|r| r.name == name).unwrap_or(&ROUTES[0])
}

/// A route matched against a concrete path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteMatch {
    pub route: &'static Route,
    pub params: Vec<(&'static str, String)>,
}

impl RouteMatch {
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.iter().find(|(k, _)| *k == key).map(|(_, v)| v.as_str())
    }
}

/// Match `path` (no query string) against the table, first hit wins.
#[must_use]
pub fn resolve(path: &str) -> Option<RouteMatch> {
    let segments: Vec<&str> = split_segments(path).collect();
    ROUTES.iter().find_map(|route| {
        let pattern: Vec<&'static str> = split_segments(route.pattern).collect();
        if pattern.len() != segments.len() {
            return None;
        }
        let mut params = Vec::new();
        for (pat, seg) in pattern.iter().copied().zip(segments.iter().copied()) {
            if let Some(key) = pat.strip_prefix(':') {
                params.push((key, seg.to_owned()));
            } else if pat != seg {
                return None;
            }
        }
        Some(RouteMatch { route, params })
    })
}

fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}
