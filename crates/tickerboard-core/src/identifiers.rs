//! Static identifier list with a timed in-memory cache.
//!
//! The list comes from an [`IdentifierLoader`] and is kept for `ttl` before the
//! next [`IdentifierSource::load`] goes back to the loader. Load errors are
//! never cached.

use std::collections::HashSet;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::{ConfigError, Identifier};

/// Default lifetime of a loaded identifier list.
pub const DEFAULT_IDENTIFIER_TTL: Duration = Duration::from_secs(300);

// ============================================================================
// Clock
// ============================================================================

/// Monotonic time source.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    pub fn advance(&self, step: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += step;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Whether a value fetched at `fetched_at` may still be served at `now`.
pub fn is_fresh(fetched_at: Instant, now: Instant, ttl: Duration) -> bool {
    now.saturating_duration_since(fetched_at) < ttl
}

// ============================================================================
// Loaders
// ============================================================================

pub type LoadFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Vec<Identifier>, ConfigError>> + Send + 'a>>;

/// Backing store of the identifier list.
pub trait IdentifierLoader: Send + Sync {
    fn load<'a>(&'a self) -> LoadFuture<'a>;
}

/// Reads `{ "data": [{ "kode": ..., "nama": ... }] }` from disk.
#[derive(Debug, Clone)]
pub struct JsonFileLoader {
    path: PathBuf,
}

impl JsonFileLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl IdentifierLoader for JsonFileLoader {
    fn load<'a>(&'a self) -> LoadFuture<'a> {
        Box::pin(async move {
            let text = tokio::fs::read_to_string(&self.path)
                .await
                .map_err(|source| ConfigError::Io {
                    path: self.path.clone(),
                    source,
                })?;
            parse_identifiers(&text)
        })
    }
}

/// Fixed in-memory list.
#[derive(Debug, Clone, Default)]
pub struct StaticLoader {
    identifiers: Vec<Identifier>,
}

impl StaticLoader {
    pub fn new(identifiers: Vec<Identifier>) -> Self {
        Self { identifiers }
    }
}

impl IdentifierLoader for StaticLoader {
    fn load<'a>(&'a self) -> LoadFuture<'a> {
        let identifiers = self.identifiers.clone();
        Box::pin(async move { Ok(identifiers) })
    }
}

/// Parse and validate an identifier document.
///
/// Codes and names are trimmed. A blank code or name is malformed. Repeated
/// codes (ignoring case) keep the first entry.
pub fn parse_identifiers(text: &str) -> Result<Vec<Identifier>, ConfigError> {
    let document: Value = serde_json::from_str(text)?;
    let entries = document
        .as_object()
        .ok_or_else(|| ConfigError::malformed("top level must be an object"))?
        .get("data")
        .ok_or_else(|| ConfigError::malformed("missing 'data'"))?
        .as_array()
        .ok_or_else(|| ConfigError::malformed("'data' must be an array"))?;

    let mut seen = HashSet::new();
    let mut identifiers = Vec::with_capacity(entries.len());

    for (index, entry) in entries.iter().enumerate() {
        let code = required_text(entry, "kode", index)?;
        let name = required_text(entry, "nama", index)?;

        if !seen.insert(code.to_ascii_uppercase()) {
            warn!(code, index, "duplicate identifier ignored");
            continue;
        }
        identifiers.push(Identifier::new(code, name));
    }

    Ok(identifiers)
}

fn required_text<'a>(entry: &'a Value, key: &str, index: usize) -> Result<&'a str, ConfigError> {
    let text = entry
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .ok_or_else(|| ConfigError::malformed(format!("entry {index}: '{key}' must be a string")))?;

    if text.is_empty() {
        return Err(ConfigError::malformed(format!("entry {index}: '{key}' is blank")));
    }
    Ok(text)
}

// ============================================================================
// Cached source
// ============================================================================

#[derive(Debug)]
struct CachedList {
    value: Arc<Vec<Identifier>>,
    fetched_at: Instant,
}

/// Process-wide identifier list, refreshed when stale.
pub struct IdentifierSource {
    loader: Arc<dyn IdentifierLoader>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    state: RwLock<Option<CachedList>>,
}

impl IdentifierSource {
    pub fn new(loader: Arc<dyn IdentifierLoader>) -> Self {
        Self {
            loader,
            clock: Arc::new(SystemClock),
            ttl: DEFAULT_IDENTIFIER_TTL,
            state: RwLock::new(None),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached list if fresh, otherwise a fresh load that replaces the cache.
    pub async fn load(&self) -> Result<Arc<Vec<Identifier>>, ConfigError> {
        let now = self.clock.now();
        if let Some(cached) = self.state.read().await.as_ref() {
            if is_fresh(cached.fetched_at, now, self.ttl) {
                return Ok(Arc::clone(&cached.value));
            }
        }

        let value = Arc::new(self.loader.load().await?);
        info!(count = value.len(), "identifier list loaded");

        *self.state.write().await = Some(CachedList {
            value: Arc::clone(&value),
            fetched_at: self.clock.now(),
        });
        Ok(value)
    }
}
