use crate::services::Coordinates;
use std::collections::HashMap;

pub const DEFAULT_LOCATION: &str = "Seoul";

/// Static lookup from location name to coordinates
///
/// Unknown names resolve to the default entry; resolution never fails.
#[derive(Debug, Clone)]
pub struct LocationTable {
    entries: HashMap<String, Coordinates>,
    default_name: String,
    default: Coordinates,
}

impl LocationTable {
    /// A table holding only the default entry
    pub fn new(default_name: impl Into<String>, default: Coordinates) -> Self {
        let default_name = default_name.into();
        let mut entries = HashMap::new();
        entries.insert(default_name.clone(), default);
        Self {
            entries,
            default_name,
            default,
        }
    }

    pub fn with_entry(mut self, name: impl Into<String>, at: Coordinates) -> Self {
        self.entries.insert(name.into(), at);
        self
    }

    /// Coordinates for `name`, falling back to the default entry
    pub fn resolve(&self, name: &str) -> Coordinates {
        match self.entries.get(name) {
            Some(at) => *at,
            None => {
                tracing::debug!(
                    location = name,
                    fallback = %self.default_name,
                    "unknown location, using default coordinates"
                );
                self.default
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn default_name(&self) -> &str {
        &self.default_name
    }
}

impl Default for LocationTable {
    fn default() -> Self {
        LocationTable::new(DEFAULT_LOCATION, Coordinates::new(37.5, 126.9))
            .with_entry("Busan", Coordinates::new(35.1, 129.0))
            .with_entry("Incheon", Coordinates::new(37.4, 126.7))
    }
}
