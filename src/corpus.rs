// src/corpus.rs
// =============================================================================
// The crawl's output: one PageRecord per fetched page, folded into a single
// Corpus and written to disk as JSON.
//
// Output file shape:
//   {
//     "university_info": "<all page texts, whitespace-normalized>",
//     "last_updated": "2024-05-01T10:00:00.000Z",
//     "source": "https://kanchiuniv.ac.in"
//   }
// =============================================================================

use crate::error::PersistError;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use url::Url;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Extracted text of one fetched page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    pub url: String,
    pub text: String,
}

/// The aggregated text of a whole crawl run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Corpus {
    pub university_info: String,
    #[serde(serialize_with = "iso_millis")]
    pub last_updated: DateTime<Utc>,
    pub source: String,
}

// Millisecond precision with a `Z` suffix, e.g. 2024-05-01T10:00:00.000Z
fn iso_millis<S: Serializer>(time: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&time.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Builds the corpus for `records`, stamped with the current time.
pub fn build_corpus(records: &[PageRecord], origin: &Url) -> Corpus {
    build_corpus_at(records, origin, Utc::now())
}

/// Same as [`build_corpus`] with an explicit timestamp.
pub fn build_corpus_at(records: &[PageRecord], origin: &Url, now: DateTime<Utc>) -> Corpus {
    let joined = records
        .iter()
        .map(|record| record.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    Corpus {
        university_info: normalize_whitespace(&joined),
        last_updated: now,
        source: origin.origin().ascii_serialization(),
    }
}

/// Collapses every whitespace run to a single space and trims both ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Writes `corpus` as pretty JSON to `path`, replacing whatever was there.
///
/// The JSON goes to a temporary sibling file first and is then renamed over
/// `path`, so an interrupted write never leaves a half-written corpus behind.
pub async fn persist_corpus(corpus: &Corpus, path: &Path) -> Result<(), PersistError> {
    let json = serde_json::to_string_pretty(corpus)?;

    let tmp_path = temp_sibling(path);

    let write_err = |source| PersistError::Write {
        path: path.to_path_buf(),
        source,
    };

    tokio::fs::write(&tmp_path, json).await.map_err(write_err)?;

    if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
        // Best effort: the temp file is useless once the rename failed
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(write_err(e));
    }

    log::info!("Corpus written to {}", path.display());
    Ok(())
}

// `.<name>.<pid>.<n>.tmp` next to `path`; unique per process and per call so
// concurrent writers to the same destination never share a temp file
fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = std::ffi::OsString::from(".");
    name.push(path.file_name().unwrap_or_default());
    name.push(format!(
        ".{}.{}.tmp",
        std::process::id(),
        TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
    ));
    path.with_file_name(name)
}
