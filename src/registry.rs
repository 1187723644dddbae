//! Query registration table.
//!
//! An explicit registry object, never ambient global state: created at
//! process start, populated once during a startup phase, sealed read-only
//! thereafter, and injected into whatever runtime client executes the
//! queries by key.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Write as _;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::ast::{CompiledOperation, OperationKind};
use crate::error::{SelqError, SelqResult};

/// Stable hash of a compiled document, lowercase hex.
///
/// Used for deduplication and as a cache key; depends on the assembler's
/// byte-stable whitespace.
pub fn content_hash(document: &str) -> String {
    let digest = Sha256::digest(document.as_bytes());
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        let _ = write!(out, "{:02x}", byte);
    }
    out
}

/// What the runtime client needs to execute one registered operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryInfo {
    /// Full document text, sent as the `query` field of the request body.
    pub query: String,
    /// The selection fragment alone.
    pub query_body: String,
    pub operation_type: OperationKind,
    pub hash: String,
}

impl From<&CompiledOperation> for QueryInfo {
    fn from(operation: &CompiledOperation) -> Self {
        Self {
            query: operation.document.clone(),
            query_body: operation.body.clone(),
            operation_type: operation.kind,
            hash: operation.hash.clone(),
        }
    }
}

/// Process-wide lookup from normalized key to registered operation.
#[derive(Debug, Default)]
pub struct QueryRegistry {
    entries: RwLock<HashMap<String, QueryInfo>>,
    sealed: AtomicBool,
}

impl QueryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one operation. Idempotent per key: the first registration
    /// wins and later ones report `Ok(false)`.
    pub fn register(&self, key: &str, info: QueryInfo) -> SelqResult<bool> {
        if self.sealed.load(Ordering::Acquire) {
            return Err(SelqError::RegistrySealed);
        }
        let mut entries = self.entries.write().expect("registry poisoned");
        if entries.contains_key(key) {
            return Ok(false);
        }
        entries.insert(key.to_string(), info);
        Ok(true)
    }

    /// End the startup phase; the table is read-only from here on.
    pub fn seal(&self) {
        self.sealed.store(true, Ordering::Release);
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed.load(Ordering::Acquire)
    }

    pub fn get(&self, key: &str) -> Option<QueryInfo> {
        self.entries.read().expect("registry poisoned").get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.read().expect("registry poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Key-sorted snapshot, for deterministic export.
    pub fn snapshot(&self) -> Vec<(String, QueryInfo)> {
        let entries = self.entries.read().expect("registry poisoned");
        let mut out: Vec<(String, QueryInfo)> =
            entries.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }

    /// JSON snapshot of the table, keys sorted.
    pub fn to_json(&self) -> SelqResult<String> {
        let entries = self.entries.read().expect("registry poisoned");
        let ordered: BTreeMap<&String, &QueryInfo> = entries.iter().collect();
        Ok(serde_json::to_string_pretty(&ordered)?)
    }
}
