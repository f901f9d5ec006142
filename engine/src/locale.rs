//! Display language for labels in exported documents.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Language used for column headers, style labels and yes/no flags.
///
/// The club works in Spanish, which is also the wire language for style
/// labels, so [`Locale::Es`] is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Es,
    En,
}

impl Locale {
    /// Localised boolean.
    pub fn yes_no(self, value: bool) -> &'static str {
        match (self, value) {
            (Locale::Es, true) => "Sí",
            (Locale::Es, false) => "No",
            (Locale::En, true) => "Yes",
            (Locale::En, false) => "No",
        }
    }
}

impl FromStr for Locale {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "es" | "es-es" | "spanish" => Ok(Locale::Es),
            "en" | "en-gb" | "en-us" | "english" => Ok(Locale::En),
            _ => Err(Error::Unrecognised {
                kind: "locale",
                value: s.to_string(),
            }),
        }
    }
}
