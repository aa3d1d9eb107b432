//! Instrument catalog access and filtering for taroko.
//!
//! The tradable universe comes from the external source at run time; this
//! crate owns what happens to it before the acquisition loop starts:
//!
//! - [`Catalog`] - Collaborator trait producing the raw instrument list
//! - [`CategoryExclusions`] - Configured per-board category exclusion sets
//! - [`filter_instruments`] - The archive's catalog policy
//! - [`write_symbol_mapping`] - Code → name mapping persistence
//!
//! # Example
//!
//! ```
//! use taroko_catalog::{CategoryExclusions, filter_instruments};
//! use taroko_types::{Board, Instrument};
//!
//! let raw = vec![
//!     Instrument::new("2330", "台積電", Board::Tse, "24"),
//!     Instrument::new("03001P", "元大權證", Board::Tse, "W1"),
//! ];
//! let kept = filter_instruments(&raw, &CategoryExclusions::default());
//! assert_eq!(kept.len(), 1);
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/taroko-data/taroko/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use async_trait::async_trait;
use taroko_types::{Board, Instrument};
use thiserror::Error;

/// Category label that marks a board category as excluded.
///
/// The exchange files option-like products under equity boards; their
/// categories are tagged with this label in the category map.
pub const EXCLUDED_LABEL: &str = "期權";

/// Errors that can occur obtaining or filtering the catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The source could not produce an instrument list.
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),

    /// I/O error reading or writing a catalog sidecar file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed category map or mapping file.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Source of the tradable instrument list.
///
/// Implemented by the live market-data session and by in-memory stand-ins
/// for tests and offline runs.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Lists every tradable instrument known to the source.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Unavailable`] if the list cannot be obtained.
    async fn instruments(&self) -> Result<Vec<Instrument>, CatalogError>;
}

/// A fixed in-memory catalog.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    instruments: Vec<Instrument>,
}

impl StaticCatalog {
    /// Creates a catalog over the given instruments.
    #[must_use]
    pub const fn new(instruments: Vec<Instrument>) -> Self {
        Self { instruments }
    }
}

#[async_trait]
impl Catalog for StaticCatalog {
    async fn instruments(&self) -> Result<Vec<Instrument>, CatalogError> {
        Ok(self.instruments.clone())
    }
}

/// Per-board sets of excluded category tags.
///
/// Built from the category map file, which records
/// `{board: {category: label}}`; a category is excluded when its label is
/// [`EXCLUDED_LABEL`]. The default value excludes nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryExclusions {
    tse: BTreeSet<String>,
    otc: BTreeSet<String>,
}

impl CategoryExclusions {
    /// Loads exclusions from a category map file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a
    /// `{board: {category: label}}` JSON object.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = fs::read_to_string(path)?;
        let map: BTreeMap<String, BTreeMap<String, String>> = serde_json::from_str(&raw)?;
        Ok(Self::from_category_map(&map))
    }

    /// Builds exclusions from an in-memory category map.
    #[must_use]
    pub fn from_category_map(map: &BTreeMap<String, BTreeMap<String, String>>) -> Self {
        let collect = |board: &str| -> BTreeSet<String> {
            map.get(board)
                .map(|categories| {
                    categories
                        .iter()
                        .filter(|(_, label)| label.as_str() == EXCLUDED_LABEL)
                        .map(|(category, _)| category.clone())
                        .collect()
                })
                .unwrap_or_default()
        };
        Self {
            tse: collect("TSE"),
            otc: collect("OTC"),
        }
    }

    /// Returns true if the instrument's category is excluded on its board.
    ///
    /// Index instruments are never excluded.
    #[must_use]
    pub fn is_excluded(&self, instrument: &Instrument) -> bool {
        let set = match instrument.board() {
            Board::Tse => &self.tse,
            Board::Otc => &self.otc,
            Board::Index => return false,
        };
        set.contains(instrument.category())
    }

    /// Returns the total number of excluded categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tse.len() + self.otc.len()
    }

    /// Returns true if nothing is excluded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tse.is_empty() && self.otc.is_empty()
    }
}

/// Applies the archive's catalog policy to a raw instrument list.
///
/// Keeps equities with purely numeric codes whose category is not
/// excluded, always keeps index series, and sorts ascending by code so
/// acquisition order (and therefore quota-exhaustion order) is
/// deterministic.
#[must_use]
pub fn filter_instruments(
    raw: &[Instrument],
    exclusions: &CategoryExclusions,
) -> Vec<Instrument> {
    let mut kept: Vec<Instrument> = raw
        .iter()
        .filter(|instrument| {
            instrument.is_index()
                || (instrument.has_numeric_code() && !exclusions.is_excluded(instrument))
        })
        .cloned()
        .collect();
    kept.sort_by(|a, b| a.code().cmp(b.code()));
    kept
}

/// Persists a sorted `{code: name}` mapping next to the archive files.
///
/// Downstream tooling renders charts by code; the mapping lets it show
/// names without a live session.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn write_symbol_mapping(path: &Path, instruments: &[Instrument]) -> Result<(), CatalogError> {
    let mapping: BTreeMap<&str, &str> = instruments
        .iter()
        .map(|instrument| (instrument.code(), instrument.name()))
        .collect();
    let mut json = serde_json::to_string_pretty(&mapping)?;
    json.push('\n');
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Instrument> {
        vec![
            Instrument::new("2330", "台積電", Board::Tse, "24"),
            Instrument::new("0050", "元大台灣50", Board::Tse, "00"),
            Instrument::new("6488", "環球晶", Board::Otc, "24"),
            Instrument::new("9105", "泰金寶", Board::Tse, "17"),
            Instrument::new("03001P", "認售權證", Board::Tse, "W1"),
            Instrument::new("001", "加權指數", Board::Index, "00"),
        ]
    }

    fn exclusions_with(tse: &[&str], otc: &[&str]) -> CategoryExclusions {
        let mut map = BTreeMap::new();
        map.insert(
            "TSE".to_string(),
            tse.iter()
                .map(|c| ((*c).to_string(), EXCLUDED_LABEL.to_string()))
                .collect(),
        );
        map.insert(
            "OTC".to_string(),
            otc.iter()
                .map(|c| ((*c).to_string(), EXCLUDED_LABEL.to_string()))
                .collect(),
        );
        CategoryExclusions::from_category_map(&map)
    }

    #[test]
    fn test_filter_drops_non_numeric_codes() {
        let kept = filter_instruments(&sample(), &CategoryExclusions::default());
        assert!(kept.iter().all(|i| i.code() != "03001P"));
        assert_eq!(kept.len(), 5);
    }

    #[test]
    fn test_filter_is_sorted_by_code() {
        let kept = filter_instruments(&sample(), &CategoryExclusions::default());
        let codes: Vec<_> = kept.iter().map(Instrument::code).collect();
        assert_eq!(codes, vec!["001", "0050", "2330", "6488", "9105"]);
    }

    #[test]
    fn test_filter_excludes_configured_categories_per_board() {
        // Category 24 excluded on OTC only; the TSE instrument with the
        // same tag stays.
        let kept = filter_instruments(&sample(), &exclusions_with(&[], &["24"]));
        assert!(kept.iter().any(|i| i.code() == "2330"));
        assert!(kept.iter().all(|i| i.code() != "6488"));
    }

    #[test]
    fn test_index_survives_exclusions() {
        let kept = filter_instruments(&sample(), &exclusions_with(&["00", "17", "24"], &["24"]));
        assert!(kept.iter().any(|i| i.code() == "001"));
        assert!(kept.iter().all(|i| i.code() != "0050"));
    }

    #[test]
    fn test_exclusions_ignore_other_labels() {
        let mut map = BTreeMap::new();
        let mut tse = BTreeMap::new();
        tse.insert("17".to_string(), "金融".to_string());
        tse.insert("W1".to_string(), EXCLUDED_LABEL.to_string());
        map.insert("TSE".to_string(), tse);

        let exclusions = CategoryExclusions::from_category_map(&map);
        assert_eq!(exclusions.len(), 1);
        assert!(!exclusions.is_excluded(&Instrument::new("9105", "泰金寶", Board::Tse, "17")));
        assert!(exclusions.is_excluded(&Instrument::new("0999", "某權證", Board::Tse, "W1")));
    }

    #[test]
    fn test_exclusions_load_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = CategoryExclusions::load(&dir.path().join("stock_category.json"));
        assert!(err.is_err());
    }

    #[test]
    fn test_exclusions_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stock_category.json");
        std::fs::write(&path, r#"{"TSE": {"W1": "期權", "24": "半導體"}, "OTC": {}}"#).unwrap();

        let exclusions = CategoryExclusions::load(&path).unwrap();
        assert_eq!(exclusions.len(), 1);
    }

    #[test]
    fn test_write_symbol_mapping_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stock_symbol_mapping.json");
        write_symbol_mapping(&path, &sample()).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let mapping: BTreeMap<String, String> = serde_json::from_str(&written).unwrap();
        assert_eq!(mapping.len(), 6);
        assert_eq!(mapping["2330"], "台積電");
        // BTreeMap serialization keeps codes ascending.
        let codes: Vec<_> = mapping.keys().cloned().collect();
        let mut sorted = codes.clone();
        sorted.sort();
        assert_eq!(codes, sorted);
    }

    #[tokio::test]
    async fn test_static_catalog() {
        let catalog = StaticCatalog::new(sample());
        let listed = catalog.instruments().await.unwrap();
        assert_eq!(listed.len(), 6);
    }
}
