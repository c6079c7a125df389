// src/services/dataset.rs
// DOCUMENTATION: CSV destination dataset and its in-memory cache
// PURPOSE: Parse the destinations file once and share it between requests

use crate::errors::TravelError;
use crate::models::{DestinationRecord, ID_FIELD};
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

const QUOTES: &[char] = &['"', '\''];

/// Normalize a dataset header or query key: strip surrounding quotes, trim, lowercase
pub fn normalize_key(key: &str) -> String {
    let key = key.trim_start_matches('\u{feff}');
    let key = key.strip_prefix(QUOTES).unwrap_or(key);
    let key = key.strip_suffix(QUOTES).unwrap_or(key);
    key.trim().to_lowercase()
}

/// Parsed destinations file
#[derive(Debug, Default)]
pub struct Dataset {
    headers: Vec<String>,
    records: Vec<DestinationRecord>,
    /// normalized header -> original header
    normalized_keys: HashMap<String, String>,
}

impl Dataset {
    /// Parse CSV content
    /// DOCUMENTATION: Rows without an ID get their 1-based position as ID
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, TravelError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let mut headers: Vec<String> = csv_reader
            .headers()
            .map_err(|e| TravelError::DatasetError(format!("Invalid CSV header: {}", e)))?
            .iter()
            .map(str::to_string)
            .collect();

        if let Some(first) = headers.first_mut() {
            *first = first.trim_start_matches('\u{feff}').to_string();
        }

        let mut records = Vec::new();
        for (index, row) in csv_reader.records().enumerate() {
            let row = row.map_err(|e| {
                TravelError::DatasetError(format!("Invalid CSV row {}: {}", index + 1, e))
            })?;

            let fields = headers
                .iter()
                .zip(row.iter())
                .map(|(h, v)| (h.clone(), v.to_string()))
                .collect();
            let mut record = DestinationRecord::new(fields);

            if record.id().trim().is_empty() {
                record.set(ID_FIELD, (index + 1).to_string());
            }
            records.push(record);
        }

        if !headers.iter().any(|h| h == ID_FIELD) {
            headers.push(ID_FIELD.to_string());
        }

        let normalized_keys = headers
            .iter()
            .map(|h| (normalize_key(h), h.clone()))
            .collect();

        Ok(Self {
            headers,
            records,
            normalized_keys,
        })
    }

    /// Read and parse a CSV file from disk
    pub fn load(path: &Path) -> Result<Self, TravelError> {
        let file = std::fs::File::open(path).map_err(|e| {
            log::error!("Error reading CSV file {}: {}", path.display(), e);
            TravelError::DatasetError(format!("Cannot open {}: {}", path.display(), e))
        })?;

        let dataset = Self::from_reader(std::io::BufReader::new(file))?;
        log::info!(
            "Loaded {} destinations from {} (columns: {})",
            dataset.records.len(),
            path.display(),
            dataset.headers().join(", ")
        );
        Ok(dataset)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn records(&self) -> &[DestinationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Original header for a query key, matched on its normalized form
    pub fn resolve_key(&self, key: &str) -> Option<&str> {
        self.normalized_keys
            .get(&normalize_key(key))
            .map(String::as_str)
    }

    pub fn find_by_id(&self, id: &str) -> Option<&DestinationRecord> {
        self.records.iter().find(|r| r.id() == id)
    }
}

/// Loaded dataset with expiration
struct CacheEntry {
    data: Arc<Dataset>,
    expires_at: Instant,
}

impl CacheEntry {
    fn new(data: Arc<Dataset>, ttl: Duration) -> Self {
        Self {
            data,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() > self.expires_at
    }
}

/// Thread-safe dataset cache with TTL
/// DOCUMENTATION: Loads lazily; an expired entry is re-read from disk on next access
pub struct DatasetCache {
    path: PathBuf,
    ttl: Duration,
    entry: RwLock<Option<CacheEntry>>,
}

impl DatasetCache {
    pub fn new(path: impl Into<PathBuf>, ttl_seconds: u64) -> Self {
        Self {
            path: path.into(),
            ttl: Duration::from_secs(ttl_seconds),
            entry: RwLock::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current dataset, loading it if missing or expired
    pub async fn get(&self) -> Result<Arc<Dataset>, TravelError> {
        {
            let entry = self.entry.read().await;
            if let Some(entry) = entry.as_ref() {
                if !entry.is_expired() {
                    log::debug!("Dataset cache HIT");
                    return Ok(entry.data.clone());
                }
                log::debug!("Dataset cache EXPIRED");
            } else {
                log::debug!("Dataset cache MISS");
            }
        }

        let mut entry = self.entry.write().await;
        // Another request may have reloaded while we waited for the lock
        if let Some(current) = entry.as_ref() {
            if !current.is_expired() {
                return Ok(current.data.clone());
            }
        }

        let data = self.read_from_disk().await?;
        *entry = Some(CacheEntry::new(data.clone(), self.ttl));
        Ok(data)
    }

    /// Force a reload from disk
    /// DOCUMENTATION: On failure the previous dataset stays in place
    pub async fn refresh(&self) -> Result<(), TravelError> {
        let data = self.read_from_disk().await?;
        let mut entry = self.entry.write().await;
        *entry = Some(CacheEntry::new(data, self.ttl));
        Ok(())
    }

    async fn read_from_disk(&self) -> Result<Arc<Dataset>, TravelError> {
        let path = self.path.clone();
        let dataset = tokio::task::spawn_blocking(move || Dataset::load(&path))
            .await
            .map_err(|e| TravelError::InternalError(format!("Dataset loader panicked: {}", e)))??;
        Ok(Arc::new(dataset))
    }
}

/// Start background refresh task
/// DOCUMENTATION: Periodically re-reads the dataset so requests never pay for parsing
pub fn start_refresh_task(cache: Arc<DatasetCache>, interval_seconds: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_seconds.max(1)));

        loop {
            interval.tick().await;
            if let Err(e) = cache.refresh().await {
                log::error!("Dataset refresh failed: {}", e);
            }
        }
    });
}

#[cfg(test)]
pub(crate) const SAMPLE_CSV: &str = "\u{feff}Destination,Region,Country,Category,Latitude,Longitude\n\
Rome,Lazio,Italy,City,41.9028,12.4964\n\
Florence,Tuscany,Italy,City,43.7696,11.2558\n\
Paris,Ile-de-France,France,City,48.8566,2.3522\n\
Hallstatt,Upper Austria,Austria,Village,47.5622,13.6493\n\
Santorini,South Aegean,Greece,Island,not-a-number,25.4615\n";

#[cfg(test)]
pub(crate) fn sample_dataset() -> Dataset {
    Dataset::from_reader(SAMPLE_CSV.as_bytes()).unwrap()
}
