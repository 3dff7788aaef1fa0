//! Exactly-once loading of the data tables.
//!
//! [`DataStore`] owns one lazily initialised slot per table. The first
//! caller to ask for a table triggers the fetch; every concurrent caller
//! awaits the same pending load instead of issuing its own. A table whose
//! fetch fails is logged once and memoized as empty, so the map keeps
//! working with whatever did load.

use std::sync::Arc;

use kehilot_map_history_models::{
    AreaEvent, MigrationArrow, SettlementRecord, SortedByStart, TemporalSpan,
};
use tokio::sync::OnceCell;

use crate::config::DataSources;
use crate::fetch::TextFetcher;
use crate::normalize::{
    normalize_ellipse_events, normalize_migrations, normalize_polygon_events,
    normalize_settlements,
};

type Table<T> = Arc<SortedByStart<T>>;

/// All four tables, each sorted by `year_start`.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Settlement records.
    pub settlements: Table<SettlementRecord>,
    /// Migration arrows.
    pub migrations: Table<MigrationArrow>,
    /// Ellipse events.
    pub ellipse_events: Table<AreaEvent>,
    /// Polygon events.
    pub polygon_events: Table<AreaEvent>,
}

impl Snapshot {
    /// Builds a snapshot from in-memory entities, sorting each table.
    #[must_use]
    pub fn from_entities(
        settlements: Vec<SettlementRecord>,
        migrations: Vec<MigrationArrow>,
        ellipse_events: Vec<AreaEvent>,
        polygon_events: Vec<AreaEvent>,
    ) -> Self {
        Self {
            settlements: Arc::new(SortedByStart::new(settlements)),
            migrations: Arc::new(SortedByStart::new(migrations)),
            ellipse_events: Arc::new(SortedByStart::new(ellipse_events)),
            polygon_events: Arc::new(SortedByStart::new(polygon_events)),
        }
    }
}

/// Owns the four table slots and the fetcher that fills them.
pub struct DataStore {
    fetcher: Arc<dyn TextFetcher>,
    sources: DataSources,
    settlements: OnceCell<Table<SettlementRecord>>,
    migrations: OnceCell<Table<MigrationArrow>>,
    ellipse_events: OnceCell<Table<AreaEvent>>,
    polygon_events: OnceCell<Table<AreaEvent>>,
}

impl DataStore {
    /// Creates a store with empty slots. Nothing is fetched until a table
    /// is requested.
    #[must_use]
    pub fn new(fetcher: Arc<dyn TextFetcher>, sources: DataSources) -> Self {
        Self {
            fetcher,
            sources,
            settlements: OnceCell::new(),
            migrations: OnceCell::new(),
            ellipse_events: OnceCell::new(),
            polygon_events: OnceCell::new(),
        }
    }

    /// Returns the settlement table, loading it on first use.
    pub async fn settlements(&self) -> Table<SettlementRecord> {
        self.settlements
            .get_or_init(|| {
                self.load_table("settlements", &self.sources.settlements, normalize_settlements)
            })
            .await
            .clone()
    }

    /// Returns the migration arrow table, loading it on first use.
    pub async fn migrations(&self) -> Table<MigrationArrow> {
        self.migrations
            .get_or_init(|| {
                self.load_table("migrations", &self.sources.migrations, normalize_migrations)
            })
            .await
            .clone()
    }

    /// Returns the ellipse event table, loading it on first use.
    pub async fn ellipse_events(&self) -> Table<AreaEvent> {
        self.ellipse_events
            .get_or_init(|| {
                self.load_table(
                    "ellipse_events",
                    &self.sources.ellipse_events,
                    normalize_ellipse_events,
                )
            })
            .await
            .clone()
    }

    /// Returns the polygon event table, loading it on first use.
    pub async fn polygon_events(&self) -> Table<AreaEvent> {
        self.polygon_events
            .get_or_init(|| {
                self.load_table(
                    "polygon_events",
                    &self.sources.polygon_events,
                    normalize_polygon_events,
                )
            })
            .await
            .clone()
    }

    /// Loads every table concurrently and returns them together. Tables
    /// already loaded are returned from their slots.
    pub async fn load(&self) -> Snapshot {
        let (settlements, migrations, ellipse_events, polygon_events) = tokio::join!(
            self.settlements(),
            self.migrations(),
            self.ellipse_events(),
            self.polygon_events(),
        );

        Snapshot {
            settlements,
            migrations,
            ellipse_events,
            polygon_events,
        }
    }

    async fn load_table<T: TemporalSpan>(
        &self,
        label: &str,
        location: &str,
        normalize: fn(&str) -> Vec<T>,
    ) -> Table<T> {
        match self.fetcher.fetch_text(location).await {
            Ok(text) => {
                let table = SortedByStart::new(normalize(&text));
                log::info!("[{label}] Loaded {} rows from {location}", table.len());
                Arc::new(table)
            }
            Err(e) => {
                log::error!("[{label}] Failed to load {location}: {e}");
                Arc::new(SortedByStart::empty())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::SourceError;
    use crate::config::DataOrigin;

    /// Serves canned tables and counts fetches per location.
    struct CannedFetcher {
        tables: BTreeMap<&'static str, &'static str>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TextFetcher for CannedFetcher {
        async fn fetch_text(&self, location: &str) -> Result<String, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.tables
                .get(location)
                .map(|t| (*t).to_string())
                .ok_or_else(|| {
                    SourceError::Io(std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        location.to_string(),
                    ))
                })
        }
    }

    fn sources() -> DataSources {
        DataSources {
            origin: DataOrigin::Directory,
            base: String::new(),
            settlements: "s.csv".to_string(),
            migrations: "m.csv".to_string(),
            ellipse_events: "e.csv".to_string(),
            polygon_events: "p.csv".to_string(),
        }
    }

    fn store(tables: BTreeMap<&'static str, &'static str>) -> (Arc<CannedFetcher>, DataStore) {
        let fetcher = Arc::new(CannedFetcher {
            tables,
            calls: AtomicUsize::new(0),
        });
        let store = DataStore::new(fetcher.clone(), sources());
        (fetcher, store)
    }

    #[tokio::test]
    async fn concurrent_requests_share_one_fetch() {
        let (fetcher, store) = store(BTreeMap::from([(
            "s.csv",
            "header\nPoland,Krakow,19.9,50.0,,1300,,2000,,high\n",
        )]));

        let (a, b) = tokio::join!(store.settlements(), store.settlements());
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.len(), 1);

        let _ = store.settlements().await;
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_sources_degrade_to_empty_without_retry() {
        let (fetcher, store) = store(BTreeMap::from([(
            "s.csv",
            "header\nSpain,Toledo,-4.0,39.8,,1100,1492,5000,8000,medium\n",
        )]));

        let snapshot = store.load().await;
        assert_eq!(snapshot.settlements.len(), 1);
        assert!(snapshot.migrations.is_empty());
        assert!(snapshot.ellipse_events.is_empty());
        assert!(snapshot.polygon_events.is_empty());
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 4);

        let _ = store.load().await;
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn loaded_tables_are_sorted_by_start() {
        let (_, store) = store(BTreeMap::from([(
            "e.csv",
            "header\n\
             10,10,1,1,0,,,,1500,1500,Late,,,1\n\
             10,10,1,1,0,,,,-500,-400,Early,,,1\n",
        )]));

        let events = store.ellipse_events().await;
        let starts: Vec<_> = events
            .as_slice()
            .iter()
            .map(|e| e.details.year_start)
            .collect();
        assert_eq!(starts, vec![Some(-500), Some(1500)]);
    }
}
