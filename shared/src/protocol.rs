/// Label that gates discovery eligibility; value compared case-insensitively to "true"
pub const TRAEFIK_ENABLE: &str = "traefik.enable";

/// Namespace marker for Traefik router labels
pub const ROUTER_NAMESPACE: &str = "traefik.http.routers";

/// Namespace marker for Traefik service (loadbalancer) labels
pub const SERVICES_NAMESPACE: &str = "traefik.http.services";
pub const LOADBALANCER_MARKER: &str = ".loadbalancer";

/// Suffixes of router labels carrying the matcher rule and its TLS companion
pub const RULE_SUFFIX: &str = ".rule";
pub const TLS_SUFFIX: &str = ".tls";

/// A router key containing this marker is served over HTTPS regardless of
/// its TLS companion label
pub const SECURE_KEY_MARKER: &str = "https";

/// Homepage label namespaces; the plain namespace takes precedence over the
/// swarm-scoped mirror
pub const HOMEPAGE_PREFIX: &str = "homepage.";
pub const SWARM_HOMEPAGE_PREFIX: &str = "swarm.homepage.";

/// Traefik routers under this prefix are administrative and never listed
pub const INTERNAL_ROUTER_PREFIX: &str = "api@";

/// Category assigned when no label supplies one
pub const DEFAULT_CATEGORY: &str = "Services";

/// API paths served by the daemon
pub const SERVICES_PATH: &str = "/api/services";
pub const HEALTH_PATH: &str = "/health";
