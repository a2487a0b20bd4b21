//! Board domain logic: wire conversions and reference data.

pub mod model;

pub use model::{
    BoardState, Card, CardUpdate, Category, CategoryId, ColumnId, ColumnView, NewCard, Priority,
};

use chrono::{DateTime, NaiveDateTime, Utc};
use continuum_api::{CardPayload, CardUpdatePayload, CategoryPayload, NewCardPayload};

use crate::error::{CoreError, CoreResult};

/// Categories installed when the API cannot provide them.
const FALLBACK_CATEGORIES: &[(CategoryId, &str, &str, &str)] = &[
    (
        CategoryId::Business,
        "Business & Finance",
        "briefcase",
        "Financial planning, investments, and business tasks",
    ),
    (
        CategoryId::Coding,
        "Coding Projects",
        "code",
        "Development projects, issues, and technical tasks",
    ),
    (
        CategoryId::Health,
        "Health & Life",
        "heart",
        "Fitness, wellness, and personal development",
    ),
    (
        CategoryId::Communications,
        "Communications",
        "mail",
        "Emails, messages, and correspondence",
    ),
];

/// The built-in category list.
pub fn fallback_categories() -> Vec<Category> {
    FALLBACK_CATEGORIES
        .iter()
        .map(|(id, name, icon, description)| Category {
            id: *id,
            name: name.to_string(),
            icon: icon.to_string(),
            description: description.to_string(),
        })
        .collect()
}

/// Parse a wire timestamp.
///
/// Accepts RFC 3339 (`2024-05-01T10:00:00Z`) and the naive ISO form the
/// server emits (`2024-05-01T10:00:00.123456`), which is UTC.
pub fn parse_timestamp(s: &str) -> CoreResult<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|_| CoreError::InvalidTimestamp(s.to_string()))
}

impl Category {
    /// Create a Category from an API payload.
    pub fn from_payload(payload: CategoryPayload) -> CoreResult<Self> {
        Ok(Self {
            id: payload.id.parse()?,
            name: payload.name,
            icon: payload.icon.unwrap_or_default(),
            description: payload.description.unwrap_or_default(),
        })
    }
}

impl Card {
    /// Create a Card from an API payload, checking ids and timestamps.
    pub fn from_payload(payload: CardPayload) -> CoreResult<Self> {
        let created_at = parse_timestamp(&payload.created_at)?;
        let updated_at = parse_timestamp(&payload.updated_at)?;
        if updated_at < created_at {
            return Err(CoreError::validation(format!(
                "Card {} was updated ({}) before it was created ({})",
                payload.id, payload.updated_at, payload.created_at
            )));
        }

        Ok(Self {
            id: payload.id,
            title: payload.title,
            description: payload.description.unwrap_or_default(),
            category_id: payload.category_id.parse()?,
            column_id: payload.column_id.parse()?,
            created_at,
            updated_at,
            tags: payload.tags.unwrap_or_default(),
            priority: payload
                .priority
                .as_deref()
                .map(str::parse::<Priority>)
                .transpose()?,
        })
    }

    /// Body for `POST /cards`; timestamps are left to the server.
    pub fn to_new_payload(&self) -> NewCardPayload {
        NewCardPayload {
            id: self.id.clone(),
            title: self.title.clone(),
            description: Some(self.description.clone()),
            category_id: self.category_id.as_str().to_string(),
            column_id: self.column_id.as_str().to_string(),
            priority: self.priority.map(|p| p.as_str().to_string()),
            tags: self.tags.clone(),
        }
    }
}

impl CardUpdate {
    /// Body for `PUT /cards/{id}`.
    pub fn to_payload(&self) -> CardUpdatePayload {
        CardUpdatePayload {
            title: self.title.as_ref().map(|t| t.trim().to_string()),
            description: self.description.clone(),
            category_id: self.category_id.map(|c| c.as_str().to_string()),
            column_id: self.column_id.map(|c| c.as_str().to_string()),
            priority: self.priority.map(|p| p.as_str().to_string()),
            tags: self.tags.clone(),
        }
    }
}
