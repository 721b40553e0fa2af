//! In-memory cache of analysis results, keyed by session id.

use chrono::{DateTime, Utc};
use knit_core::AnalysisResult;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

/// One cached analysis.
#[derive(Debug, Clone)]
pub struct StoredAnalysis {
    pub result: AnalysisResult,
    pub created_at: DateTime<Utc>,
}

/// Bounded session cache. Inserting past capacity evicts the oldest entry.
#[derive(Debug)]
pub struct SessionStore {
    capacity: usize,
    entries: RwLock<HashMap<Uuid, StoredAnalysis>>,
}

impl SessionStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Stores `result` under a fresh session id.
    pub fn insert(&self, result: AnalysisResult) -> Uuid {
        let id = Uuid::new_v4();
        let mut entries = self.entries.write();

        while entries.len() >= self.capacity {
            let oldest = entries
                .iter()
                .min_by_key(|(_, stored)| stored.created_at)
                .map(|(id, _)| *id);
            match oldest {
                Some(oldest) => {
                    entries.remove(&oldest);
                    debug!(session_id = %oldest, "evicted session");
                }
                None => break,
            }
        }

        entries.insert(
            id,
            StoredAnalysis {
                result,
                created_at: Utc::now(),
            },
        );
        id
    }

    pub fn get(&self, id: &Uuid) -> Option<StoredAnalysis> {
        self.entries.read().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
