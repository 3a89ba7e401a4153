//! Navigation targets: a path plus decoded query pairs.

#[cfg(test)]
#[path = "location_test.rs"]
mod location_test;

use std::fmt;

use reqwest::Url;

use super::table::RouteName;

/// Query key carrying the post-login destination.
pub const REDIRECT_QUERY_KEY: &str = "redirect";

// Placeholder origin so `Url` can do the query encoding; stripped on render.
const APP_ORIGIN: &str = "http://app.invalid";

#[derive(Debug, thiserror::Error)]
#[error("invalid location '{raw}': {reason}")]
pub struct LocationError {
    pub raw: String,
    pub reason: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl Location {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into(), query: Vec::new() }
    }

    /// Location of a parameterless route.
    #[must_use]
    pub fn named(name: RouteName) -> Self {
        Self::new(name.pattern())
    }

    /// Login location remembering `from` for the post-login redirect.
    #[must_use]
    pub fn login_redirect(from: &Location) -> Self {
        Self::named(RouteName::Login).with_query(REDIRECT_QUERY_KEY, from.full_path())
    }

    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    /// Parse an app-relative path such as `/login?redirect=%2Fprofile`.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError`] when `raw` is not an absolute path.
    pub fn parse(raw: &str) -> Result<Self, LocationError> {
        let err = |reason: &str| LocationError { raw: raw.to_owned(), reason: reason.to_owned() };
        if !raw.starts_with('/') || raw.starts_with("//") {
            return Err(err("expected a path starting with a single '/'"));
        }
        let url = Url::parse(APP_ORIGIN)
            .and_then(|base| base.join(raw))
            .map_err(|e| err(&e.to_string()))?;
        let query = url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())).collect();
        Ok(Self { path: normalize_path(url.path()), query })
    }

    /// Path plus encoded query string.
    #[must_use]
    pub fn full_path(&self) -> String {
        let Ok(mut url) = Url::parse(APP_ORIGIN) else {
            return self.path.clone();
        };
        url.set_path(&self.path);
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(self.query.iter());
        }
        let rendered = url.as_str();
        rendered.strip_prefix(APP_ORIGIN).unwrap_or(rendered).to_owned()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_path())
    }
}

fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/".to_owned() } else { trimmed.to_owned() }
}
