use std::collections::HashMap;
use shared::protocol::{
    DEFAULT_CATEGORY, HOMEPAGE_PREFIX, LOADBALANCER_MARKER, ROUTER_NAMESPACE, RULE_SUFFIX,
    SECURE_KEY_MARKER, SERVICES_NAMESPACE, SWARM_HOMEPAGE_PREFIX, TLS_SUFFIX, TRAEFIK_ENABLE,
};
use shared::types::ServiceRecord;

/// Parses the hostname out of a Traefik rule expression such as
/// "Host(`myapp.example.com`)". Takes the first argument of the first
/// `Host(` group, stripping backtick or double-quote delimiters. Returns
/// None when the matcher is absent, unclosed or empty.
pub fn parse_host_rule(rule: &str) -> Option<String> {
    let start = rule.find("Host(")? + "Host(".len();
    let args = &rule[start..];
    let end = args.find(')')?;
    let first = args[..end].split(',').next().unwrap_or("");
    let hostname = first.trim().trim_matches(|c| c == '`' || c == '"');

    if hostname.is_empty() {
        None
    } else {
        Some(hostname.to_string())
    }
}

/// Extract a ServiceRecord from an entity's label map, or None if the entity
/// is not eligible (no truthy enable flag) or no URL can be resolved.
/// Pure; the caller supplies the entity name used as the default display name.
pub fn extract_service(entity_name: &str, labels: &HashMap<String, String>) -> Option<ServiceRecord> {
    let enabled = labels
        .get(TRAEFIK_ENABLE)
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    if !enabled {
        return None;
    }

    let url = router_url(labels)
        .or_else(|| homepage_label(labels, "url").map(str::to_string))?;

    let service_name = loadbalancer_name(labels).unwrap_or_else(|| entity_name.to_string());

    // Hostname for the default description; fall back to the raw URL when it
    // cannot be parsed.
    let hostname = url::Url::parse(&url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| url.clone());

    let name = homepage_label(labels, "name")
        .map(str::to_string)
        .unwrap_or(service_name);
    let description = homepage_label(labels, "description")
        .map(str::to_string)
        .unwrap_or_else(|| format!("Service available at {}", hostname));
    let icon = homepage_label(labels, "icon").unwrap_or("").to_string();
    let category = homepage_label(labels, "category")
        .unwrap_or(DEFAULT_CATEGORY)
        .to_string();

    Some(ServiceRecord {
        name,
        url,
        description,
        icon,
        category,
    })
}

/// Resolve the service URL from router rule labels. Keys are scanned in
/// sorted order so the result does not depend on map iteration order: the
/// lexicographically smallest rule key with a parseable Host matcher wins.
fn router_url(labels: &HashMap<String, String>) -> Option<String> {
    let mut rule_keys: Vec<&String> = labels
        .keys()
        .filter(|k| k.contains(ROUTER_NAMESPACE) && k.ends_with(RULE_SUFFIX))
        .collect();
    rule_keys.sort();

    for key in rule_keys {
        if let Some(hostname) = parse_host_rule(&labels[key.as_str()]) {
            return Some(format!("{}://{}", router_scheme(key, labels), hostname));
        }
    }

    None
}

/// https when the rule key itself carries the secure marker, or when the
/// router's `.tls` companion label is set to anything non-empty.
fn router_scheme(rule_key: &str, labels: &HashMap<String, String>) -> &'static str {
    if rule_key.contains(SECURE_KEY_MARKER) {
        return "https";
    }

    let tls_key = match rule_key.strip_suffix(RULE_SUFFIX) {
        Some(base) => format!("{}{}", base, TLS_SUFFIX),
        None => return "http",
    };

    match labels.get(&tls_key) {
        Some(value) if !value.is_empty() => "https",
        _ => "http",
    }
}

/// Service-name override from `traefik.http.services.<s>.loadbalancer...`
/// labels: the fourth dot-delimited segment of the smallest matching key.
fn loadbalancer_name(labels: &HashMap<String, String>) -> Option<String> {
    let mut lb_keys: Vec<&String> = labels
        .keys()
        .filter(|k| k.contains(SERVICES_NAMESPACE) && k.contains(LOADBALANCER_MARKER))
        .collect();
    lb_keys.sort();

    lb_keys
        .first()
        .and_then(|key| key.split('.').nth(3))
        .map(str::to_string)
}

/// Look up `homepage.<key>`, then the `swarm.homepage.<key>` mirror.
/// Empty values are treated as absent so defaults still apply.
fn homepage_label<'a>(labels: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    let primary = format!("{}{}", HOMEPAGE_PREFIX, key);
    let mirror = format!("{}{}", SWARM_HOMEPAGE_PREFIX, key);

    labels
        .get(&primary)
        .filter(|v| !v.is_empty())
        .or_else(|| labels.get(&mirror).filter(|v| !v.is_empty()))
        .map(String::as_str)
}
