//! The sequential acquisition loop.
//!
//! Instruments are processed strictly one at a time: every fetch feeds the
//! shared quota accounting, and sequential order is what makes the
//! stop-on-exhaustion point deterministic. Skips are decided from the
//! archive tail before any network call, so a current archive costs no
//! quota at all.

use std::time::{Duration, Instant};

use taroko_archive::{DataDir, plan_acquisition, writer};
use taroko_catalog::{
    Catalog, CatalogError, CategoryExclusions, filter_instruments, write_symbol_mapping,
};
use taroko_fetch::{MarketSource, fetch_guarded};
use taroko_types::{Instrument, PlanMode};
use thiserror::Error;

use crate::context::RunContext;
use crate::report::{InstrumentOutcome, InstrumentReport, RunReport};

/// Errors that end a run before or outside the per-instrument loop.
///
/// Per-instrument failures never surface here; they are recorded as
/// [`InstrumentOutcome::Failed`] and the loop moves on.
#[derive(Error, Debug)]
pub enum RunError {
    /// The instrument list could not be obtained.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The archive directory could not be prepared or scanned.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Runs one acquisition pass over the filtered catalog.
///
/// For each instrument in code order: plan against the archive tail, fetch
/// the missing window, persist per the plan. The loop stops before the next
/// instrument once the quota is exhausted. `observe` is called with each
/// finished [`InstrumentReport`] so the caller can drive a progress
/// display; all other diagnostics come back on the [`RunReport`].
///
/// The source session is logged out when the pass ends, whether it
/// succeeded or not.
///
/// # Errors
///
/// Returns an error if the catalog cannot be listed or the archive
/// directory cannot be created.
pub async fn run_acquisition<F>(
    catalog: &dyn Catalog,
    source: &dyn MarketSource,
    context: &mut RunContext,
    observe: F,
) -> Result<RunReport, RunError>
where
    F: FnMut(&InstrumentReport),
{
    let result = acquire_all(catalog, source, context, observe).await;
    let logout = source.logout().await;

    let mut report = result?;
    if let Err(err) = logout {
        report.warnings.push(format!("Logout failed: {err}"));
    }
    Ok(report)
}

async fn acquire_all<F>(
    catalog: &dyn Catalog,
    source: &dyn MarketSource,
    context: &mut RunContext,
    mut observe: F,
) -> Result<RunReport, RunError>
where
    F: FnMut(&InstrumentReport),
{
    let started = Instant::now();
    let mut warnings = Vec::new();

    context.data_dir.ensure_exists()?;

    let raw = catalog.instruments().await?;
    let exclusions = load_exclusions(&context.data_dir, &mut warnings);
    let mut instruments = filter_instruments(&raw, &exclusions);

    let mapping_path = context.data_dir.symbol_mapping_path();
    if let Err(err) = write_symbol_mapping(&mapping_path, &instruments) {
        warnings.push(format!("Symbol mapping not written: {err}"));
    }

    if let Some(limit) = context.limit {
        instruments.truncate(limit);
    }

    let mut outcomes = Vec::with_capacity(instruments.len());
    let mut unreached = 0;
    for (index, instrument) in instruments.iter().enumerate() {
        if context.quota.is_exhausted() {
            unreached = instruments.len() - index;
            break;
        }
        let report = acquire_one(source, context, instrument, &mut warnings).await;
        observe(&report);
        outcomes.push(report);
    }

    Ok(RunReport {
        outcomes,
        unreached,
        quota_used: context.quota.used(),
        quota_exhausted: context.quota.is_exhausted(),
        wall_time: started.elapsed(),
        warnings,
    })
}

/// Plans, fetches and persists a single instrument.
async fn acquire_one(
    source: &dyn MarketSource,
    context: &mut RunContext,
    instrument: &Instrument,
    warnings: &mut Vec<String>,
) -> InstrumentReport {
    let minute_path = context.data_dir.minute_path(instrument.code());
    let plan = plan_acquisition(&minute_path, context.earliest, context.today);

    if let Some(sidecar) = plan.quarantined() {
        warnings.push(format!(
            "{}: unreadable archive moved to {}",
            instrument.code(),
            sidecar.display()
        ));
    }

    let Some(window) = plan.window() else {
        return InstrumentReport {
            code: instrument.code().to_string(),
            outcome: InstrumentOutcome::Skipped,
            elapsed: Duration::ZERO,
        };
    };

    let fetched = fetch_guarded(source, &mut context.quota, instrument, &window).await;
    let outcome = if let Some(err) = fetched.error {
        InstrumentOutcome::Failed {
            reason: err.to_string(),
        }
    } else if fetched.bars.is_empty() {
        InstrumentOutcome::NoData
    } else {
        match writer::apply(&minute_path, plan.mode(), &fetched.bars) {
            Ok(rows) => {
                if plan.mode() == PlanMode::Append {
                    InstrumentOutcome::Appended { rows }
                } else {
                    InstrumentOutcome::Rebuilt { rows }
                }
            }
            Err(err) => InstrumentOutcome::Failed {
                reason: err.to_string(),
            },
        }
    };

    InstrumentReport {
        code: instrument.code().to_string(),
        outcome,
        elapsed: fetched.elapsed,
    }
}

fn load_exclusions(data_dir: &DataDir, warnings: &mut Vec<String>) -> CategoryExclusions {
    let path = data_dir.category_path();
    match CategoryExclusions::load(&path) {
        Ok(exclusions) => exclusions,
        Err(err) => {
            warnings.push(format!(
                "No category exclusions ({}): {err}",
                path.display()
            ));
            CategoryExclusions::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::NaiveDate;
    use taroko_catalog::StaticCatalog;
    use taroko_fetch::FetchError;
    use taroko_types::{BarSet, Board, FetchWindow, MinuteBar};
    use tempfile::TempDir;

    struct ScriptedSource {
        replies: Mutex<Vec<Result<BarSet, FetchError>>>,
        usage: u64,
        fetched: Mutex<Vec<String>>,
        logouts: Mutex<u32>,
    }

    impl ScriptedSource {
        fn new(replies: Vec<Result<BarSet, FetchError>>, usage: u64) -> Self {
            Self {
                replies: Mutex::new(replies),
                usage,
                fetched: Mutex::new(Vec::new()),
                logouts: Mutex::new(0),
            }
        }

        fn fetched_codes(&self) -> Vec<String> {
            self.fetched.lock().unwrap().clone()
        }

        fn logouts(&self) -> u32 {
            *self.logouts.lock().unwrap()
        }
    }

    #[async_trait]
    impl MarketSource for ScriptedSource {
        async fn fetch_bars(
            &self,
            instrument: &Instrument,
            _window: &FetchWindow,
        ) -> Result<BarSet, FetchError> {
            self.fetched
                .lock()
                .unwrap()
                .push(instrument.code().to_string());
            self.replies.lock().unwrap().remove(0)
        }

        async fn usage(&self) -> Result<u64, FetchError> {
            Ok(self.usage)
        }

        async fn logout(&self) -> Result<(), FetchError> {
            *self.logouts.lock().unwrap() += 1;
            Ok(())
        }
    }

    struct FailingCatalog;

    #[async_trait]
    impl Catalog for FailingCatalog {
        async fn instruments(&self) -> Result<Vec<Instrument>, CatalogError> {
            Err(CatalogError::Unavailable("session expired".to_string()))
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn catalog() -> StaticCatalog {
        StaticCatalog::new(vec![
            Instrument::new("2330", "台積電", Board::Tse, "24"),
            Instrument::new("0050", "元大台灣50", Board::Tse, "00"),
            Instrument::new("2412", "中華電", Board::Tse, "26"),
        ])
    }

    fn one_bar() -> BarSet {
        let ts = date(2024, 3, 1).and_hms_opt(9, 1, 0).unwrap();
        BarSet::canonical(vec![MinuteBar::new(ts, 10.0, 11.0, 9.0, 10.5, 100.0)])
    }

    fn context(dir: &TempDir) -> RunContext {
        RunContext::with_today(dir.path(), date(2018, 12, 7), 1000, date(2024, 3, 4))
    }

    #[tokio::test]
    async fn test_fresh_run_rebuilds_every_instrument() {
        let dir = TempDir::new().unwrap();
        let source =
            ScriptedSource::new(vec![Ok(one_bar()), Ok(one_bar()), Ok(one_bar())], 0);
        let mut context = context(&dir);
        let mut seen = Vec::new();

        let report = run_acquisition(&catalog(), &source, &mut context, |r| {
            seen.push(r.code.clone());
        })
        .await
        .unwrap();

        // Filter sorts by code, so acquisition order is deterministic.
        assert_eq!(seen, vec!["0050", "2330", "2412"]);
        assert_eq!(report.rebuilt(), 3);
        assert_eq!(report.rows_written(), 3);
        assert_eq!(report.unreached, 0);
        assert!(!report.quota_exhausted);
        assert_eq!(source.logouts(), 1);
        for code in ["0050", "2330", "2412"] {
            assert!(dir.path().join(format!("{code}_min.csv")).exists());
        }
        // Missing category map is a warning, not an error.
        assert!(
            report
                .warnings
                .iter()
                .any(|w| w.starts_with("No category exclusions"))
        );
    }

    #[tokio::test]
    async fn test_quota_exhaustion_stops_before_next_instrument() {
        let dir = TempDir::new().unwrap();
        // First fetch succeeds; the second fails and the usage query then
        // reports the ceiling reached.
        let source = ScriptedSource::new(
            vec![
                Ok(one_bar()),
                Err(FetchError::ServerError { status: 500 }),
            ],
            1000,
        );
        let mut context = context(&dir);

        let report = run_acquisition(&catalog(), &source, &mut context, |_| {})
            .await
            .unwrap();

        assert_eq!(source.fetched_codes(), vec!["0050", "2330"]);
        assert_eq!(report.outcomes.len(), 2);
        assert_eq!(report.outcomes[0].outcome, InstrumentOutcome::Rebuilt { rows: 1 });
        assert!(matches!(
            report.outcomes[1].outcome,
            InstrumentOutcome::Failed { .. }
        ));
        assert_eq!(report.unreached, 1);
        assert!(report.quota_exhausted);
        assert_eq!(report.quota_used, 1000);

        // The archive written before exhaustion is intact; the unreached
        // instrument has none.
        let written = std::fs::read_to_string(dir.path().join("0050_min.csv")).unwrap();
        assert!(written.contains("2024-03-01 09:01:00"));
        assert!(!dir.path().join("2412_min.csv").exists());
        assert_eq!(source.logouts(), 1);
    }

    #[tokio::test]
    async fn test_current_archive_skips_without_fetching() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("2330_min.csv"),
            "ts,Open,High,Low,Close,Volume\n2024-03-03 13:30:00,10,11,9,10.5,100\n",
        )
        .unwrap();
        let catalog = StaticCatalog::new(vec![Instrument::new(
            "2330",
            "台積電",
            Board::Tse,
            "24",
        )]);
        let source = ScriptedSource::new(Vec::new(), 0);
        let mut context = context(&dir);

        let report = run_acquisition(&catalog, &source, &mut context, |_| {})
            .await
            .unwrap();

        assert_eq!(report.skipped(), 1);
        assert_eq!(report.outcomes[0].elapsed, Duration::ZERO);
        assert!(source.fetched_codes().is_empty());
    }

    #[tokio::test]
    async fn test_no_data_continues_run() {
        let dir = TempDir::new().unwrap();
        let source = ScriptedSource::new(
            vec![Ok(BarSet::empty()), Ok(one_bar()), Ok(one_bar())],
            10,
        );
        let mut context = context(&dir);

        let report = run_acquisition(&catalog(), &source, &mut context, |_| {})
            .await
            .unwrap();

        assert_eq!(report.no_data(), 1);
        assert_eq!(report.rebuilt(), 2);
        assert_eq!(report.unreached, 0);
        assert!(!dir.path().join("0050_min.csv").exists());
    }

    #[tokio::test]
    async fn test_limit_caps_processed_instruments() {
        let dir = TempDir::new().unwrap();
        let source = ScriptedSource::new(vec![Ok(one_bar())], 0);
        let mut context = context(&dir).with_limit(Some(1));

        let report = run_acquisition(&catalog(), &source, &mut context, |_| {})
            .await
            .unwrap();

        assert_eq!(report.outcomes.len(), 1);
        assert_eq!(source.fetched_codes(), vec!["0050"]);
        // The symbol mapping still covers the whole filtered catalog.
        let mapping =
            std::fs::read_to_string(dir.path().join("stock_symbol_mapping.json")).unwrap();
        assert!(mapping.contains("\"2412\""));
    }

    #[tokio::test]
    async fn test_catalog_failure_still_logs_out() {
        let dir = TempDir::new().unwrap();
        let source = ScriptedSource::new(Vec::new(), 0);
        let mut context = context(&dir);

        let result = run_acquisition(&FailingCatalog, &source, &mut context, |_| {}).await;

        assert!(matches!(result, Err(RunError::Catalog(_))));
        assert_eq!(source.logouts(), 1);
    }

    #[tokio::test]
    async fn test_symbol_mapping_sorted_by_code() {
        let dir = TempDir::new().unwrap();
        let source =
            ScriptedSource::new(vec![Ok(one_bar()), Ok(one_bar()), Ok(one_bar())], 0);
        let mut context = context(&dir);

        run_acquisition(&catalog(), &source, &mut context, |_| {})
            .await
            .unwrap();

        let mapping =
            std::fs::read_to_string(dir.path().join("stock_symbol_mapping.json")).unwrap();
        let p0050 = mapping.find("\"0050\"").unwrap();
        let p2330 = mapping.find("\"2330\"").unwrap();
        let p2412 = mapping.find("\"2412\"").unwrap();
        assert!(p0050 < p2330 && p2330 < p2412);
        assert!(mapping.contains("\"台積電\""));
    }
}
