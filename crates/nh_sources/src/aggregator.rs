use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::NaiveDate;
use tracing::{error, info, warn};

use nh_core::{Article, Error, Filters, LogNotifier, Notification, Notifier, Result};

use crate::debounce::Debouncer;
use crate::normalize::normalize;
use crate::sources::guardian::GuardianItem;
use crate::sources::newsapi::NewsApiArticle;
use crate::sources::NewsSource;

pub const DEFAULT_QUIET_WINDOW: Duration = Duration::from_millis(500);

type WireSource = Arc<dyn NewsSource<Item = NewsApiArticle>>;
type ContentSource = Arc<dyn NewsSource<Item = GuardianItem>>;

struct Inner {
    newsapi: WireSource,
    guardian: ContentSource,
    notifier: Arc<dyn Notifier>,
    filters: Mutex<Filters>,
    articles: Mutex<Vec<Article>>,
    loading: AtomicBool,
    debouncer: Mutex<Debouncer>,
}

/// Owns the fetch lifecycle: filter state, debounced refetch, joint
/// dispatch of both providers, and the unified article list handed to
/// the presentation layer.
///
/// Cheap to clone; all clones share the same state.
#[derive(Clone)]
pub struct Aggregator {
    inner: Arc<Inner>,
}

impl Aggregator {
    pub fn new(newsapi: WireSource, guardian: ContentSource) -> Self {
        Self::with_options(newsapi, guardian, Arc::new(LogNotifier), DEFAULT_QUIET_WINDOW)
    }

    pub fn with_options(
        newsapi: WireSource,
        guardian: ContentSource,
        notifier: Arc<dyn Notifier>,
        quiet_window: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                newsapi,
                guardian,
                notifier,
                filters: Mutex::new(Filters::default()),
                articles: Mutex::new(Vec::new()),
                loading: AtomicBool::new(false),
                debouncer: Mutex::new(Debouncer::new(quiet_window)),
            }),
        }
    }

    /// Replace the whole filter state at once without scheduling a
    /// refetch. Used at startup before the first fetch cycle.
    pub fn apply_filters(&self, filters: Filters) {
        *self.inner.filters.lock().unwrap() = filters;
    }

    /// Current filter state, by value.
    pub fn filters(&self) -> Filters {
        self.inner.filters.lock().unwrap().clone()
    }

    /// Snapshot of the current unified article list.
    pub fn articles(&self) -> Vec<Article> {
        self.inner.articles.lock().unwrap().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.loading.load(Ordering::SeqCst)
    }

    pub fn set_query(&self, query: Option<String>) {
        self.inner.filters.lock().unwrap().query = query.filter(|q| !q.is_empty());
        self.schedule_refresh();
    }

    pub fn set_category(&self, category: Option<String>) {
        self.inner.filters.lock().unwrap().category = category.filter(|c| !c.is_empty());
        self.schedule_refresh();
    }

    pub fn set_source(&self, source: Option<String>) {
        self.inner.filters.lock().unwrap().source = source.filter(|s| !s.is_empty());
        self.schedule_refresh();
    }

    /// Update the start date. An inverted range is rejected and the
    /// previous value stays in place; no refetch is scheduled.
    pub fn set_from_date(&self, from: Option<NaiveDate>) -> Result<()> {
        self.inner.filters.lock().unwrap().set_from(from)?;
        self.schedule_refresh();
        Ok(())
    }

    /// Update the end date, with the same range check as [`Aggregator::set_from_date`].
    pub fn set_to_date(&self, to: Option<NaiveDate>) -> Result<()> {
        self.inner.filters.lock().unwrap().set_to(to)?;
        self.schedule_refresh();
        Ok(())
    }

    fn schedule_refresh(&self) {
        let aggregator = self.clone();
        self.inner.debouncer.lock().unwrap().call(async move {
            aggregator.refresh().await;
        });
    }

    /// Run one fetch cycle immediately. The loading flag is cleared on
    /// every path, including failure.
    pub async fn refresh(&self) {
        self.inner.loading.store(true, Ordering::SeqCst);
        let result = self.fetch_cycle().await;
        self.inner.loading.store(false, Ordering::SeqCst);

        if let Err(e) = result {
            error!(error = %e, "fetch cycle failed");
            self.inner.notifier.notify(Notification::error(
                "Failed to fetch articles",
                "Please try again later.",
            ));
        }
    }

    async fn fetch_cycle(&self) -> Result<()> {
        let filters = self.filters();

        // Both requests in flight at once, awaited jointly.
        let (newsapi_result, guardian_result) = futures::future::join(
            self.inner.newsapi.search(&filters),
            self.inner.guardian.search(&filters),
        )
        .await;

        // One provider failing degrades to an empty list so the other's
        // results still land. Both failing keeps the previous list and
        // surfaces a notification instead.
        if let (Err(newsapi_err), Err(guardian_err)) = (&newsapi_result, &guardian_result) {
            return Err(Error::AllSourcesFailed(format!(
                "{}: {}; {}: {}",
                self.inner.newsapi.name(),
                newsapi_err,
                self.inner.guardian.name(),
                guardian_err
            )));
        }

        let newsapi = degrade(self.inner.newsapi.name(), newsapi_result);
        let guardian = degrade(self.inner.guardian.name(), guardian_result);

        let articles = normalize(newsapi, guardian);
        info!(count = articles.len(), "fetch cycle complete");
        *self.inner.articles.lock().unwrap() = articles;
        Ok(())
    }
}

fn degrade<T>(source: &str, result: Result<Vec<T>>) -> Vec<T> {
    result.unwrap_or_else(|e| {
        warn!(source, error = %e, "provider failed; continuing with empty result");
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::newsapi::NewsApiSourceRef;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use tokio::time::sleep;

    struct MockNewsApi {
        articles: Vec<NewsApiArticle>,
        fail: AtomicBool,
        calls: AtomicUsize,
        seen: Mutex<Option<Filters>>,
    }

    impl MockNewsApi {
        fn new(count: usize) -> Arc<Self> {
            let articles = (0..count)
                .map(|n| NewsApiArticle {
                    title: format!("Wire {}", n),
                    description: None,
                    source: NewsApiSourceRef {
                        name: "Reuters".to_string(),
                    },
                    published_at: "2024-01-01T00:00:00Z".to_string(),
                    url: format!("https://example.com/wire/{}", n),
                    url_to_image: None,
                })
                .collect();
            Arc::new(Self {
                articles,
                fail: AtomicBool::new(false),
                calls: AtomicUsize::new(0),
                seen: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl NewsSource for MockNewsApi {
        type Item = NewsApiArticle;

        fn name(&self) -> &str {
            "NewsAPI"
        }

        async fn search(&self, filters: &Filters) -> Result<Vec<NewsApiArticle>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.seen.lock().unwrap() = Some(filters.clone());
            if self.fail.load(Ordering::SeqCst) {
                return Err(Error::External(anyhow::anyhow!("connection refused")));
            }
            Ok(self.articles.clone())
        }
    }

    struct MockGuardian {
        items: Vec<GuardianItem>,
        fail: AtomicBool,
    }

    impl MockGuardian {
        fn new(count: usize) -> Arc<Self> {
            let items = (0..count)
                .map(|n| GuardianItem {
                    web_title: format!("Guardian {}", n),
                    web_publication_date: "2024-01-02T00:00:00Z".to_string(),
                    web_url: format!("https://theguardian.com/{}", n),
                    section_name: "World".to_string(),
                    fields: None,
                })
                .collect();
            Arc::new(Self {
                items,
                fail: AtomicBool::new(false),
            })
        }
    }

    #[async_trait]
    impl NewsSource for MockGuardian {
        type Item = GuardianItem;

        fn name(&self) -> &str {
            "The Guardian"
        }

        async fn search(&self, _filters: &Filters) -> Result<Vec<GuardianItem>> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(Error::External(anyhow::anyhow!("connection refused")));
            }
            Ok(self.items.clone())
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        notes: Mutex<Vec<Notification>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, notification: Notification) {
            self.notes.lock().unwrap().push(notification);
        }
    }

    fn aggregator(
        newsapi: Arc<MockNewsApi>,
        guardian: Arc<MockGuardian>,
    ) -> (Aggregator, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::default());
        let aggregator = Aggregator::with_options(
            newsapi,
            guardian,
            notifier.clone(),
            DEFAULT_QUIET_WINDOW,
        );
        (aggregator, notifier)
    }

    #[tokio::test]
    async fn test_refresh_merges_both_providers() {
        let (agg, _) = aggregator(MockNewsApi::new(2), MockGuardian::new(3));
        agg.refresh().await;

        let articles = agg.articles();
        assert_eq!(articles.len(), 5);
        assert_eq!(articles[0].source, "Reuters");
        assert_eq!(articles[4].source, "The Guardian");
        assert!(!agg.is_loading());
    }

    #[tokio::test]
    async fn test_one_provider_failing_degrades_to_its_results_only() {
        let newsapi = MockNewsApi::new(2);
        newsapi.fail.store(true, Ordering::SeqCst);
        let (agg, notifier) = aggregator(newsapi, MockGuardian::new(3));

        agg.refresh().await;

        assert_eq!(agg.articles().len(), 3);
        assert!(!agg.is_loading());
        assert!(notifier.notes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_both_providers_failing_keeps_previous_list_and_notifies() {
        let newsapi = MockNewsApi::new(2);
        let guardian = MockGuardian::new(3);
        let (agg, notifier) = aggregator(newsapi.clone(), guardian.clone());

        agg.refresh().await;
        assert_eq!(agg.articles().len(), 5);

        newsapi.fail.store(true, Ordering::SeqCst);
        guardian.fail.store(true, Ordering::SeqCst);
        agg.refresh().await;

        assert_eq!(agg.articles().len(), 5, "previous list must be retained");
        assert!(!agg.is_loading(), "loading must be cleared on failure");

        let notes = notifier.notes.lock().unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, "Failed to fetch articles");
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_filter_changes_fetch_once_with_latest_state() {
        let newsapi = MockNewsApi::new(1);
        let (agg, _) = aggregator(newsapi.clone(), MockGuardian::new(1));

        agg.set_query(Some("cli".to_string()));
        sleep(Duration::from_millis(50)).await;
        agg.set_query(Some("clima".to_string()));
        sleep(Duration::from_millis(50)).await;
        agg.set_query(Some("climate".to_string()));
        agg.set_category(Some("science".to_string()));

        sleep(DEFAULT_QUIET_WINDOW * 2).await;

        assert_eq!(newsapi.calls.load(Ordering::SeqCst), 1);
        let seen = newsapi.seen.lock().unwrap().clone().unwrap();
        assert_eq!(seen.query.as_deref(), Some("climate"));
        assert_eq!(seen.category.as_deref(), Some("science"));
    }

    #[tokio::test]
    async fn test_invalid_date_range_is_not_propagated() {
        let newsapi = MockNewsApi::new(1);
        let (agg, _) = aggregator(newsapi.clone(), MockGuardian::new(1));

        agg.set_to_date(Some("2023-12-31".parse().unwrap())).unwrap();
        let result = agg.set_from_date(Some("2024-01-01".parse().unwrap()));
        assert!(result.is_err());

        let filters = agg.filters();
        assert_eq!(filters.from, None);
        assert_eq!(filters.to, Some("2023-12-31".parse().unwrap()));
    }

    #[tokio::test]
    async fn test_empty_setter_values_clear_the_filter() {
        let (agg, _) = aggregator(MockNewsApi::new(1), MockGuardian::new(1));

        agg.set_query(Some("climate".to_string()));
        agg.set_query(Some(String::new()));
        assert_eq!(agg.filters().query, None);

        agg.set_source(Some("bbc-news".to_string()));
        agg.set_source(None);
        assert_eq!(agg.filters().source, None);
    }
}
