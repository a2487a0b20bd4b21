//! Local cache codec.
//!
//! The cache is one JSON blob `{ version, cards, activeCategory }` under a
//! fixed key. Version 1 is the current schema. Blobs written before the
//! version field existed (version 0) used the long category ids and
//! `in-progress`; they decode through the enum aliases, so the migration is
//! just reading them.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::board::model::{Card, CategoryId};
use crate::error::{CoreError, CoreResult};

/// Key the board blob is stored under.
pub const STORAGE_KEY: &str = "continuum-kanban-data";

/// Schema version written by this client.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StoredBoardRef<'a> {
    version: u32,
    cards: &'a [Card],
    active_category: CategoryId,
}

/// A decoded cache blob.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredBoard {
    #[serde(default)]
    pub version: u32,
    pub cards: Vec<Card>,
    /// Missing in some legacy blobs; the current selector is kept then.
    #[serde(default)]
    pub active_category: Option<CategoryId>,
}

/// Serialize the cards and selector into a cache blob.
pub fn encode(cards: &[Card], active_category: CategoryId) -> CoreResult<String> {
    Ok(serde_json::to_string(&StoredBoardRef {
        version: SCHEMA_VERSION,
        cards,
        active_category,
    })?)
}

/// Parse a cache blob, re-hydrating card timestamps.
///
/// Fails with [`CoreError::MalformedCache`] when the blob is not valid JSON,
/// comes from a newer schema, or breaks a card invariant.
pub fn decode(blob: &str) -> CoreResult<StoredBoard> {
    let stored: StoredBoard =
        serde_json::from_str(blob).map_err(|e| CoreError::MalformedCache(e.to_string()))?;

    if stored.version > SCHEMA_VERSION {
        return Err(CoreError::MalformedCache(format!(
            "unsupported schema version {} (newest known is {})",
            stored.version, SCHEMA_VERSION
        )));
    }

    let mut seen = HashSet::new();
    for card in &stored.cards {
        if !seen.insert(card.id.as_str()) {
            return Err(CoreError::MalformedCache(format!(
                "duplicate card id {}",
                card.id
            )));
        }
        if card.updated_at < card.created_at {
            return Err(CoreError::MalformedCache(format!(
                "card {} was updated before it was created",
                card.id
            )));
        }
    }

    Ok(stored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::model::{ColumnId, Priority};
    use chrono::{Duration, TimeZone, Utc};

    fn sample_cards() -> Vec<Card> {
        let created = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()
            + Duration::nanoseconds(123_456_789);
        vec![
            Card {
                id: "a".to_string(),
                title: "Pay rent".to_string(),
                description: "Before the 5th".to_string(),
                category_id: CategoryId::Business,
                column_id: ColumnId::Todo,
                created_at: created,
                updated_at: created,
                tags: vec!["home".to_string()],
                priority: Some(Priority::High),
            },
            Card {
                id: "b".to_string(),
                title: "Fix CI".to_string(),
                description: String::new(),
                category_id: CategoryId::Coding,
                column_id: ColumnId::InProgress,
                created_at: created,
                updated_at: created + Duration::days(2),
                tags: vec![],
                priority: None,
            },
        ]
    }

    #[test]
    fn test_round_trip() {
        let cards = sample_cards();
        let blob = encode(&cards, CategoryId::Health).unwrap();
        let stored = decode(&blob).unwrap();

        assert_eq!(stored.version, SCHEMA_VERSION);
        assert_eq!(stored.cards, cards);
        assert_eq!(stored.active_category, Some(CategoryId::Health));
    }

    #[test]
    fn test_blob_shape() {
        let blob = encode(&sample_cards(), CategoryId::Coding).unwrap();
        let value: serde_json::Value = serde_json::from_str(&blob).unwrap();

        assert_eq!(value["version"], 1);
        assert_eq!(value["activeCategory"], "coding");
        assert_eq!(value["cards"][1]["columnId"], "inProgress");
        assert!(value["cards"][0]["createdAt"].is_string());
        assert!(value["cards"][1].get("priority").is_none());
    }

    #[test]
    fn test_decodes_legacy_blob() {
        let blob = r#"{
            "cards": [{
                "id": "old-1",
                "title": "Invoice",
                "description": "",
                "categoryId": "business-finance",
                "columnId": "in-progress",
                "createdAt": "2024-01-01T09:00:00.000Z",
                "updatedAt": "2024-01-02T09:00:00.000Z",
                "tags": [],
                "priority": "medium"
            }],
            "activeCategory": "coding-projects"
        }"#;
        let stored = decode(blob).unwrap();

        assert_eq!(stored.version, 0);
        assert_eq!(stored.cards[0].category_id, CategoryId::Business);
        assert_eq!(stored.cards[0].column_id, ColumnId::InProgress);
        assert_eq!(stored.active_category, Some(CategoryId::Coding));
    }

    #[test]
    fn test_rejects_malformed_blobs() {
        assert!(matches!(decode("not json"), Err(CoreError::MalformedCache(_))));
        assert!(matches!(
            decode(r#"{"cards": 3}"#),
            Err(CoreError::MalformedCache(_))
        ));
        assert!(matches!(
            decode(r#"{"version": 2, "cards": []}"#),
            Err(CoreError::MalformedCache(_))
        ));

        let mut cards = sample_cards();
        cards[1].id = "a".to_string();
        let blob = encode(&cards, CategoryId::Coding).unwrap();
        assert!(matches!(decode(&blob), Err(CoreError::MalformedCache(_))));
    }

    #[test]
    fn test_missing_selector_is_none() {
        let stored = decode(r#"{"cards": []}"#).unwrap();
        assert!(stored.cards.is_empty());
        assert_eq!(stored.active_category, None);
    }
}
