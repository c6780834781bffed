// Cosmetic colour themes. Purely visual; consumers map each to a palette.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// One of six fixed themes, cycled in declaration order.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Theme {
    #[default]
    Nebula,
    Matrix,
    Sunset,
    Glacier,
    Ember,
    Mono,
}

impl Theme {
    pub const ALL: [Theme; 6] = [
        Self::Nebula,
        Self::Matrix,
        Self::Sunset,
        Self::Glacier,
        Self::Ember,
        Self::Mono,
    ];

    /// The next theme in the cycle, wrapping after the last.
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Parse a persisted value. Anything unrecognized is `None`.
    pub fn from_stored(raw: &str) -> Option<Self> {
        raw.trim().parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_visits_every_theme_then_wraps() {
        let mut theme = Theme::default();
        let mut seen = vec![theme];
        for _ in 1..Theme::ALL.len() {
            theme = theme.next();
            seen.push(theme);
        }
        assert_eq!(seen, Theme::ALL.to_vec());
        assert_eq!(theme.next(), Theme::Nebula);
    }

    #[test]
    fn stored_values_round_trip_by_name() {
        assert_eq!(Theme::from_stored("glacier"), Some(Theme::Glacier));
        assert_eq!(Theme::from_stored(" Ember "), Some(Theme::Ember));
        assert_eq!(Theme::from_stored("{corrupt"), None);
        assert_eq!(Theme::Mono.as_ref(), "mono");
    }
}
