//! Read-only access to the raw data behind event analytics
//!
//! The engine never queries storage itself. Handlers fetch aggregates through
//! [`EventDataSource`] and pass them to the builders.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use rsvp_analytics::{AnalyticsError, InviteStats, RsvpStats, parse_instant, parse_timestamps};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

/// Data source errors
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Event not found: {0}")]
    EventNotFound(Uuid),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Invalid fixture for event {event_id}: {source}")]
    InvalidFixture {
        event_id: Uuid,
        source: AnalyticsError,
    },

    #[error("Failed to read fixtures: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse fixtures: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Event metadata needed by the snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub id: Uuid,
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub starts_at: OffsetDateTime,
}

/// Page-level engagement tracked between opening an invite and responding
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementCounts {
    pub page_views: u64,
    pub form_starts: u64,
}

/// Raw analytics inputs for one event
#[async_trait]
pub trait EventDataSource: Send + Sync {
    async fn event(&self, event_id: Uuid) -> Result<EventRecord, SourceError>;

    async fn rsvp_stats(&self, event_id: Uuid) -> Result<RsvpStats, SourceError>;

    async fn invite_stats(&self, event_id: Uuid) -> Result<InviteStats, SourceError>;

    async fn engagement_counts(&self, event_id: Uuid) -> Result<EngagementCounts, SourceError>;

    /// Submission instant of every RSVP, in no particular order
    async fn rsvp_timestamps(&self, event_id: Uuid) -> Result<Vec<OffsetDateTime>, SourceError>;
}

/// Serialized form of an event, as found in a seed file
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFixture {
    pub id: Uuid,
    pub name: String,
    pub starts_at: String,
    #[serde(default)]
    pub rsvp_stats: RsvpStats,
    #[serde(default)]
    pub invite_stats: InviteStats,
    #[serde(default)]
    pub engagement: EngagementCounts,
    #[serde(default)]
    pub rsvp_timestamps: Vec<String>,
}

#[derive(Debug, Clone)]
struct StoredEvent {
    record: EventRecord,
    rsvp_stats: RsvpStats,
    invite_stats: InviteStats,
    engagement: EngagementCounts,
    rsvp_timestamps: Vec<OffsetDateTime>,
}

impl TryFrom<EventFixture> for StoredEvent {
    type Error = SourceError;

    fn try_from(fixture: EventFixture) -> Result<Self, Self::Error> {
        let event_id = fixture.id;
        let invalid = |source| SourceError::InvalidFixture { event_id, source };

        let starts_at = parse_instant(&fixture.starts_at).map_err(invalid)?;
        let rsvp_timestamps = parse_timestamps(&fixture.rsvp_timestamps).map_err(invalid)?;

        Ok(Self {
            record: EventRecord {
                id: event_id,
                name: fixture.name,
                starts_at,
            },
            rsvp_stats: fixture.rsvp_stats,
            invite_stats: fixture.invite_stats,
            engagement: fixture.engagement,
            rsvp_timestamps,
        })
    }
}

/// In-memory data source for tests and local development
#[derive(Debug, Default)]
pub struct MemorySource {
    events: Mutex<HashMap<Uuid, StoredEvent>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load fixtures from a JSON array on disk
    pub async fn load(path: &Path) -> Result<Self, SourceError> {
        let raw = tokio::fs::read(path).await?;
        let fixtures: Vec<EventFixture> = serde_json::from_slice(&raw)?;

        let source = Self::new();
        for fixture in fixtures {
            source.insert(fixture)?;
        }
        info!("Loaded {} event fixture(s) from {}", source.len()?, path.display());
        Ok(source)
    }

    /// Insert or replace an event. Rejects fixtures with malformed instants.
    pub fn insert(&self, fixture: EventFixture) -> Result<(), SourceError> {
        let stored = StoredEvent::try_from(fixture)?;
        let mut events = self
            .events
            .lock()
            .map_err(|_| SourceError::Backend("Lock poisoned".into()))?;
        events.insert(stored.record.id, stored);
        Ok(())
    }

    /// Number of stored events
    pub fn len(&self) -> Result<usize, SourceError> {
        let events = self
            .events
            .lock()
            .map_err(|_| SourceError::Backend("Lock poisoned".into()))?;
        Ok(events.len())
    }

    /// Whether no events are stored
    pub fn is_empty(&self) -> Result<bool, SourceError> {
        Ok(self.len()? == 0)
    }

    fn with_event<T>(
        &self,
        event_id: Uuid,
        f: impl FnOnce(&StoredEvent) -> T,
    ) -> Result<T, SourceError> {
        let events = self
            .events
            .lock()
            .map_err(|_| SourceError::Backend("Lock poisoned".into()))?;
        events
            .get(&event_id)
            .map(f)
            .ok_or(SourceError::EventNotFound(event_id))
    }
}

#[async_trait]
impl EventDataSource for MemorySource {
    async fn event(&self, event_id: Uuid) -> Result<EventRecord, SourceError> {
        self.with_event(event_id, |e| e.record.clone())
    }

    async fn rsvp_stats(&self, event_id: Uuid) -> Result<RsvpStats, SourceError> {
        self.with_event(event_id, |e| e.rsvp_stats)
    }

    async fn invite_stats(&self, event_id: Uuid) -> Result<InviteStats, SourceError> {
        self.with_event(event_id, |e| e.invite_stats)
    }

    async fn engagement_counts(&self, event_id: Uuid) -> Result<EngagementCounts, SourceError> {
        self.with_event(event_id, |e| e.engagement)
    }

    async fn rsvp_timestamps(&self, event_id: Uuid) -> Result<Vec<OffsetDateTime>, SourceError> {
        self.with_event(event_id, |e| e.rsvp_timestamps.clone())
    }
}
