//! Per-symbol CSV bar cache.
//!
//! One file per symbol under the cache directory. The scan only refreshes a
//! symbol when its newest cached bar is older than the requested end date.

use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

use super::provider::{DataError, RawBar};

pub struct BarCache {
    dir: PathBuf,
}

impl BarCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{symbol}.csv"))
    }

    /// Load cached bars, None if the symbol has never been stored.
    pub fn load(&self, symbol: &str) -> Result<Option<Vec<RawBar>>, DataError> {
        let path = self.path_for(symbol);
        if !path.exists() {
            return Ok(None);
        }

        let mut reader = csv::Reader::from_path(&path)
            .map_err(|e| DataError::CacheError(format!("open {}: {e}", path.display())))?;

        let mut bars = Vec::new();
        for row in reader.deserialize() {
            let bar: RawBar = row
                .map_err(|e| DataError::CacheError(format!("read {}: {e}", path.display())))?;
            bars.push(bar);
        }
        Ok(Some(bars))
    }

    /// Store bars for a symbol, replacing any previous file.
    pub fn store(&self, symbol: &str, bars: &[RawBar]) -> Result<(), DataError> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| DataError::CacheError(format!("create {}: {e}", self.dir.display())))?;

        let path = self.path_for(symbol);
        let mut writer = csv::Writer::from_path(&path)
            .map_err(|e| DataError::CacheError(format!("write {}: {e}", path.display())))?;

        for bar in bars {
            writer
                .serialize(bar)
                .map_err(|e| DataError::CacheError(format!("serialize row: {e}")))?;
        }
        writer
            .flush()
            .map_err(|e| DataError::CacheError(format!("flush {}: {e}", path.display())))?;
        Ok(())
    }

    /// Date of the newest cached bar for a symbol, if any.
    pub fn last_date(&self, symbol: &str) -> Result<Option<NaiveDate>, DataError> {
        Ok(self
            .load(symbol)?
            .and_then(|bars| bars.last().map(|b| b.date)))
    }

    /// True when the cache already covers `end` (no fetch needed).
    pub fn is_fresh(&self, symbol: &str, end: NaiveDate) -> bool {
        matches!(self.last_date(symbol), Ok(Some(last)) if last >= end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bars() -> Vec<RawBar> {
        (0..3)
            .map(|i| RawBar {
                date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
                    + chrono::Duration::days(i as i64),
                open: 100.0 + i as f64,
                high: 101.0 + i as f64,
                low: 99.0 + i as f64,
                close: 100.5 + i as f64,
                volume: 1000 * (i as u64 + 1),
            })
            .collect()
    }

    #[test]
    fn store_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let cache = BarCache::new(dir.path());

        let bars = sample_bars();
        cache.store("2330.TW", &bars).unwrap();

        let loaded = cache.load("2330.TW").unwrap().unwrap();
        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded[0].date, bars[0].date);
        assert_eq!(loaded[2].volume, 3000);
        assert!((loaded[1].close - 101.5).abs() < 1e-12);
    }

    #[test]
    fn missing_symbol_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let cache = BarCache::new(dir.path());
        assert!(cache.load("9999.TW").unwrap().is_none());
        assert!(cache.last_date("9999.TW").unwrap().is_none());
    }

    #[test]
    fn freshness_tracks_last_bar() {
        let dir = tempfile::tempdir().unwrap();
        let cache = BarCache::new(dir.path());
        cache.store("2330.TW", &sample_bars()).unwrap();

        let last = NaiveDate::from_ymd_opt(2024, 1, 4).unwrap();
        assert!(cache.is_fresh("2330.TW", last));
        assert!(!cache.is_fresh("2330.TW", last + chrono::Duration::days(1)));
        assert!(!cache.is_fresh("UNSEEN.TW", last));
    }
}
