use serde::{Deserialize, Serialize};

/// A discovered service as shown on the homepage.
/// This is the canonical data model used by the discovery engine and API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceRecord {
    /// Display name, e.g. "My App". Never empty.
    pub name: String,

    /// Fully-qualified reachable address, e.g. "https://myapp.example.com".
    /// Unique key when deduplicating the catalog.
    pub url: String,

    /// Human-readable note; derived from the hostname when no label supplies one.
    pub description: String,

    /// Opaque icon reference, may be empty.
    pub icon: String,

    /// Grouping label, e.g. "Applications". Defaults to "Services".
    pub category: String,
}
