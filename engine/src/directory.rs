//! Swimmer name resolution.

use crate::{Swimmer, SwimmerId};
use std::collections::HashMap;

/// Name shown for a swimmer id that cannot be resolved.
pub const UNKNOWN_SWIMMER: &str = "Unknown";

/// Resolves swimmer ids to display names.
pub trait SwimmerLookup {
    /// Display name for `swimmer_id`, or a fixed placeholder when unknown.
    fn resolve_name(&self, swimmer_id: &str) -> String;
}

/// An id → name map built from a list of swimmers.
#[derive(Debug, Clone)]
pub struct SwimmerDirectory {
    names: HashMap<SwimmerId, String>,
    placeholder: String,
}

impl SwimmerDirectory {
    pub fn new() -> Self {
        Self {
            names: HashMap::new(),
            placeholder: UNKNOWN_SWIMMER.to_string(),
        }
    }

    /// Use a different placeholder for unknown ids.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn insert(&mut self, swimmer: Swimmer) {
        self.names.insert(swimmer.id, swimmer.name);
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, swimmer_id: &str) -> bool {
        self.names.contains_key(swimmer_id)
    }
}

impl Default for SwimmerDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<Swimmer> for SwimmerDirectory {
    fn from_iter<I: IntoIterator<Item = Swimmer>>(iter: I) -> Self {
        let mut directory = Self::new();
        for swimmer in iter {
            directory.insert(swimmer);
        }
        directory
    }
}

impl SwimmerLookup for SwimmerDirectory {
    fn resolve_name(&self, swimmer_id: &str) -> String {
        self.names
            .get(swimmer_id)
            .cloned()
            .unwrap_or_else(|| self.placeholder.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_known_and_unknown() {
        let directory: SwimmerDirectory = vec![
            Swimmer::new("s1", "Ane Etxeberria"),
            Swimmer::new("s2", "Jon Agirre"),
        ]
        .into_iter()
        .collect();

        assert_eq!(directory.len(), 2);
        assert_eq!(directory.resolve_name("s2"), "Jon Agirre");
        assert_eq!(directory.resolve_name("nope"), UNKNOWN_SWIMMER);
    }

    #[test]
    fn custom_placeholder() {
        let directory = SwimmerDirectory::new().with_placeholder("Desconocido");
        assert!(directory.is_empty());
        assert_eq!(directory.resolve_name("s1"), "Desconocido");
    }
}
