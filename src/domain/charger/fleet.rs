//! Fleet registry: the fixed, ordered set of monitored chargers

use super::model::ChargerId;

/// Stations polled when no list is configured.
pub const DEFAULT_CHARGERS: [&str; 14] = [
    "NSP-BRI-01",
    "NSP-BRI-02",
    "NSP-MAS-01",
    "NSP-MAS-02",
    "NSP-MEM-01",
    "NSP-MEM-02",
    "NSP-MIL-01",
    "NSP-MIL-02",
    "NSP-PIC-01",
    "NSP-PIC-02",
    "NSP-WHY-01",
    "NSP-WHY-02",
    "NSP-WIN-01",
    "NSP-WIN-02",
];

/// Immutable for the lifetime of the process; order is poll order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FleetRegistry {
    chargers: Vec<ChargerId>,
}

impl FleetRegistry {
    /// Build from names, dropping repeats after their first occurrence.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut chargers: Vec<ChargerId> = Vec::new();
        for name in names {
            let id = ChargerId::new(name);
            if !chargers.contains(&id) {
                chargers.push(id);
            }
        }
        Self { chargers }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChargerId> {
        self.chargers.iter()
    }

    pub fn len(&self) -> usize {
        self.chargers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chargers.is_empty()
    }
}

impl Default for FleetRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_CHARGERS)
    }
}

impl<'a> IntoIterator for &'a FleetRegistry {
    type Item = &'a ChargerId;
    type IntoIter = std::slice::Iter<'a, ChargerId>;

    fn into_iter(self) -> Self::IntoIter {
        self.chargers.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_keeps_order_and_drops_repeats() {
        let registry = FleetRegistry::new(["B", "A", "B", "C"]);
        let names: Vec<&str> = registry.iter().map(|c| c.as_str()).collect();
        assert_eq!(names, vec!["B", "A", "C"]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_default_registry() {
        let registry = FleetRegistry::default();
        assert_eq!(registry.len(), 14);
        assert_eq!(registry.iter().next().map(|c| c.as_str()), Some("NSP-BRI-01"));
    }
}
