pub mod docker;
pub mod labels;
pub mod traefik;

use std::collections::HashSet;
use async_trait::async_trait;
use shared::types::ServiceRecord;

pub use docker::DockerSource;
pub use traefik::TraefikSource;

/// Outcome of polling one discovery source. Adapters absorb their own
/// failures into `Degraded` so a broken source never aborts a cycle; the
/// reason is kept for logging and assertions, the adapter has already
/// logged it.
#[derive(Debug)]
pub enum SourceOutcome {
    Available(Vec<ServiceRecord>),
    Degraded(String),
}

impl SourceOutcome {
    fn into_records(self) -> Vec<ServiceRecord> {
        match self {
            SourceOutcome::Available(records) => records,
            SourceOutcome::Degraded(_) => Vec::new(),
        }
    }
}

/// A source of service records. Implementations must not return errors;
/// every failure mode degrades to `SourceOutcome::Degraded`.
#[async_trait]
pub trait ServiceSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn poll(&self) -> SourceOutcome;
}

/// Coordinates the two discovery sources under the shadowing policy: the
/// primary (Docker labels) carries richer metadata, so whenever it yields
/// anything at all the fallback (Traefik routers) is not consulted.
pub struct Discovery {
    primary: Box<dyn ServiceSource>,
    fallback: Box<dyn ServiceSource>,
}

impl Discovery {
    pub fn new(primary: Box<dyn ServiceSource>, fallback: Box<dyn ServiceSource>) -> Self {
        Self { primary, fallback }
    }

    /// Run one discovery cycle. Never fails; an empty catalog is a valid
    /// outcome when both sources are empty or degraded.
    pub async fn discover(&self) -> Vec<ServiceRecord> {
        let records = match self.primary.poll().await {
            SourceOutcome::Available(records) if !records.is_empty() => records,
            outcome => {
                if let SourceOutcome::Degraded(reason) = &outcome {
                    tracing::debug!("{} source degraded: {}", self.primary.name(), reason);
                }
                tracing::debug!(
                    "{} yielded no services, falling back to {}",
                    self.primary.name(),
                    self.fallback.name()
                );
                self.fallback.poll().await.into_records()
            }
        };

        let catalog = dedup_and_sort(records);
        tracing::info!("Discovery cycle produced {} services", catalog.len());
        catalog
    }
}

/// Deduplicate by URL (first record seen for a URL wins) and sort ascending
/// by (category, name). Records without a URL never reach the catalog.
fn dedup_and_sort(records: Vec<ServiceRecord>) -> Vec<ServiceRecord> {
    let mut seen = HashSet::new();
    let mut catalog: Vec<ServiceRecord> = records
        .into_iter()
        .filter(|record| !record.url.is_empty() && seen.insert(record.url.clone()))
        .collect();

    catalog.sort_by(|a, b| {
        (a.category.as_str(), a.name.as_str()).cmp(&(b.category.as_str(), b.name.as_str()))
    });
    catalog
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn record(name: &str, url: &str, category: &str) -> ServiceRecord {
        ServiceRecord {
            name: name.to_string(),
            url: url.to_string(),
            description: String::new(),
            icon: String::new(),
            category: category.to_string(),
        }
    }

    /// Fake source counting how often it is polled. The counter is shared so
    /// tests can keep a handle after the source is boxed into `Discovery`.
    struct FakeSource {
        records: Vec<ServiceRecord>,
        degraded: bool,
        calls: Arc<AtomicUsize>,
    }

    impl FakeSource {
        fn available(records: Vec<ServiceRecord>) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    records,
                    degraded: false,
                    calls: calls.clone(),
                },
                calls,
            )
        }

        fn degraded() -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    records: Vec::new(),
                    degraded: true,
                    calls: calls.clone(),
                },
                calls,
            )
        }
    }

    #[async_trait]
    impl ServiceSource for FakeSource {
        fn name(&self) -> &'static str {
            "fake"
        }

        async fn poll(&self) -> SourceOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.degraded {
                SourceOutcome::Degraded("simulated failure".to_string())
            } else {
                SourceOutcome::Available(self.records.clone())
            }
        }
    }

    #[tokio::test]
    async fn test_primary_shadows_fallback() {
        let (primary, _) = FakeSource::available(vec![record("app", "http://a.local", "Services")]);
        let (fallback, fallback_calls) =
            FakeSource::available(vec![record("other", "http://b.local", "Services")]);

        let discovery = Discovery::new(Box::new(primary), Box::new(fallback));
        let catalog = discovery.discover().await;

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].url, "http://a.local");
        assert_eq!(
            fallback_calls.load(Ordering::SeqCst),
            0,
            "fallback must not be polled"
        );
    }

    #[tokio::test]
    async fn test_fallback_on_empty_primary() {
        let (primary, _) = FakeSource::available(Vec::new());
        let (fallback, fallback_calls) =
            FakeSource::available(vec![record("other", "http://b.local", "Services")]);

        let discovery = Discovery::new(Box::new(primary), Box::new(fallback));
        let catalog = discovery.discover().await;

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].url, "http://b.local");
        assert_eq!(fallback_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fallback_on_degraded_primary() {
        let (primary, _) = FakeSource::degraded();
        let (fallback, _) =
            FakeSource::available(vec![record("other", "http://b.local", "Services")]);

        let discovery = Discovery::new(Box::new(primary), Box::new(fallback));
        let catalog = discovery.discover().await;

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].name, "other");
    }

    #[tokio::test]
    async fn test_both_degraded_yields_empty_catalog() {
        let (primary, primary_calls) = FakeSource::degraded();
        let (fallback, fallback_calls) = FakeSource::degraded();

        let discovery = Discovery::new(Box::new(primary), Box::new(fallback));
        let catalog = discovery.discover().await;

        assert!(catalog.is_empty());
        assert_eq!(primary_calls.load(Ordering::SeqCst), 1);
        assert_eq!(fallback_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_dedup_first_record_wins() {
        let records = vec![
            record("first", "http://a.com", "Services"),
            record("second", "http://a.com", "Services"),
        ];

        let catalog = dedup_and_sort(records);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].name, "first");
    }

    #[test]
    fn test_sort_by_category_then_name() {
        let records = vec![
            record("x", "http://1.local", "B"),
            record("y", "http://2.local", "A"),
            record("x", "http://3.local", "A"),
        ];

        let catalog = dedup_and_sort(records);
        let order: Vec<(&str, &str)> = catalog
            .iter()
            .map(|r| (r.category.as_str(), r.name.as_str()))
            .collect();
        assert_eq!(order, vec![("A", "x"), ("A", "y"), ("B", "x")]);
    }

    #[test]
    fn test_records_without_url_are_dropped() {
        let records = vec![
            record("nameless", "", "Services"),
            record("app", "http://a.local", "Services"),
        ];

        let catalog = dedup_and_sort(records);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].name, "app");
    }
}
