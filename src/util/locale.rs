//! Display-language selection.
//!
//! Reads the user's preference from the preferences store and falls back to
//! the language the environment reports (`LC_ALL`, `LC_MESSAGES`, `LANG`).

#[cfg(test)]
#[path = "locale_test.rs"]
mod locale_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::state::persistence::{LOCALE_KEY, SessionPersistence};

const LANGUAGE_ENV_VARS: [&str; 3] = ["LC_ALL", "LC_MESSAGES", "LANG"];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Fr,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::En, Locale::Fr];

    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Fr => "fr",
        }
    }

    /// Match a language tag on its primary subtag: `fr`, `fr-FR` and
    /// `fr_FR.UTF-8` all map to French.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        let primary = tag.trim().split(['-', '_', '.', '@']).next()?;
        Self::ALL.into_iter().find(|l| l.code().eq_ignore_ascii_case(primary))
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| format!("unsupported locale '{s}' (expected en or fr)"))
    }
}

/// Stored preference if supported, else the reported language if supported,
/// else English.
#[must_use]
pub fn resolve(stored: Option<&str>, reported: Option<&str>) -> Locale {
    stored
        .and_then(Locale::from_tag)
        .or_else(|| reported.and_then(Locale::from_tag))
        .unwrap_or_default()
}

/// Language reported by the process environment, first non-empty variable wins.
#[must_use]
pub fn reported_language() -> Option<String> {
    LANGUAGE_ENV_VARS
        .iter()
        .filter_map(|key| std::env::var(key).ok())
        .find(|value| !value.trim().is_empty() && value != "C" && value != "POSIX")
}

/// Resolve the active locale from `store` and the environment.
#[must_use]
pub fn current(store: &dyn SessionPersistence) -> Locale {
    let stored = store.get(LOCALE_KEY);
    let reported = reported_language();
    resolve(stored.as_deref(), reported.as_deref())
}

pub fn set_locale(store: &dyn SessionPersistence, locale: Locale) {
    store.set(LOCALE_KEY, locale.code());
    tracing::info!(%locale, "locale preference saved");
}
