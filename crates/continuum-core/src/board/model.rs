//! Board domain models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Longest title the server accepts.
pub const MAX_TITLE_LEN: usize = 255;

/// Category identifiers.
///
/// Older clients wrote `business-finance`, `coding-projects` and
/// `health-life`; those are read as aliases and always written back in the
/// short form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoryId {
    #[serde(rename = "business", alias = "business-finance")]
    Business,
    #[default]
    #[serde(rename = "coding", alias = "coding-projects")]
    Coding,
    #[serde(rename = "health", alias = "health-life")]
    Health,
    #[serde(rename = "communications")]
    Communications,
}

impl CategoryId {
    pub const ALL: [Self; 4] = [
        Self::Business,
        Self::Coding,
        Self::Health,
        Self::Communications,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Business => "business",
            Self::Coding => "coding",
            Self::Health => "health",
            Self::Communications => "communications",
        }
    }
}

impl FromStr for CategoryId {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s {
            "business" | "business-finance" => Ok(Self::Business),
            "coding" | "coding-projects" => Ok(Self::Coding),
            "health" | "health-life" => Ok(Self::Health),
            "communications" => Ok(Self::Communications),
            other => Err(CoreError::UnknownCategory(other.to_string())),
        }
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Workflow columns. `in-progress` is accepted as a legacy spelling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnId {
    #[default]
    #[serde(rename = "todo")]
    Todo,
    #[serde(rename = "inProgress", alias = "in-progress")]
    InProgress,
    #[serde(rename = "done")]
    Done,
}

impl ColumnId {
    pub const ALL: [Self; 3] = [Self::Todo, Self::InProgress, Self::Done];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "inProgress",
            Self::Done => "done",
        }
    }

    /// Column header shown to users.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Todo => "To Do",
            Self::InProgress => "In Progress",
            Self::Done => "Done",
        }
    }
}

impl FromStr for ColumnId {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s {
            "todo" => Ok(Self::Todo),
            "inProgress" | "in-progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            other => Err(CoreError::UnknownColumn(other.to_string())),
        }
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Card priority levels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl FromStr for Priority {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(CoreError::UnknownPriority(other.to_string())),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A top-level grouping of cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub icon: String,
    pub description: String,
}

/// A single work item on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category_id: CategoryId,
    pub column_id: ColumnId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

impl Card {
    /// Bump `updated_at` to now. `updated_at` strictly increases, even when
    /// the clock has not moved since the last bump.
    pub fn touch(&mut self) {
        let now = Utc::now();
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + Duration::microseconds(1)
        };
    }
}

/// A column of the active category, as rendered on the board.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnView {
    pub id: ColumnId,
    pub name: &'static str,
    pub cards: Vec<Card>,
}

/// Everything the board store holds.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardState {
    pub categories: Vec<Category>,
    /// All cards of every category; filtering is a view.
    pub cards: Vec<Card>,
    pub active_category: CategoryId,
    pub loading: bool,
    pub error: Option<String>,
}

impl BoardState {
    pub fn new(active_category: CategoryId) -> Self {
        Self {
            active_category,
            ..Default::default()
        }
    }

    pub fn card(&self, id: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    pub fn card_mut(&mut self, id: &str) -> Option<&mut Card> {
        self.cards.iter_mut().find(|c| c.id == id)
    }

    /// Replace the card with the same id, or append it.
    pub fn upsert_card(&mut self, card: Card) {
        match self.card_mut(&card.id) {
            Some(existing) => *existing = card,
            None => self.cards.push(card),
        }
    }

    /// Remove a card by id. Returns whether a card was removed.
    pub fn remove_card(&mut self, id: &str) -> bool {
        let before = self.cards.len();
        self.cards.retain(|c| c.id != id);
        self.cards.len() != before
    }

    /// Replace all cards, keeping the last occurrence of any duplicate id.
    pub fn replace_cards(&mut self, cards: Vec<Card>) {
        self.cards.clear();
        for card in cards {
            self.upsert_card(card);
        }
    }

    pub fn active_category_cards(&self) -> Vec<Card> {
        self.cards
            .iter()
            .filter(|c| c.category_id == self.active_category)
            .cloned()
            .collect()
    }

    /// Cards of the active category in one column.
    pub fn column_cards(&self, column: ColumnId) -> Vec<Card> {
        self.cards
            .iter()
            .filter(|c| c.category_id == self.active_category && c.column_id == column)
            .cloned()
            .collect()
    }

    pub fn columns(&self) -> Vec<ColumnView> {
        ColumnId::ALL
            .iter()
            .map(|column| ColumnView {
                id: *column,
                name: column.display_name(),
                cards: self.column_cards(*column),
            })
            .collect()
    }
}

/// Input for creating a card.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCard {
    pub title: String,
    pub description: String,
    pub category_id: CategoryId,
    pub column_id: ColumnId,
    pub priority: Option<Priority>,
    pub tags: Vec<String>,
}

impl NewCard {
    /// A card in the `todo` column with medium priority and no tags.
    pub fn new(title: impl Into<String>, category_id: CategoryId) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            category_id,
            column_id: ColumnId::Todo,
            priority: Some(Priority::Medium),
            tags: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn column(mut self, column_id: ColumnId) -> Self {
        self.column_id = column_id;
        self
    }

    pub fn priority(mut self, priority: Option<Priority>) -> Self {
        self.priority = priority;
        self
    }

    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn validate(&self) -> CoreResult<()> {
        validate_title(&self.title)
    }

    /// Build the card with a client-generated id and matching timestamps.
    pub fn into_card(self, id: String, now: DateTime<Utc>) -> Card {
        Card {
            id,
            title: self.title.trim().to_string(),
            description: self.description,
            category_id: self.category_id,
            column_id: self.column_id,
            created_at: now,
            updated_at: now,
            tags: self.tags,
            priority: self.priority,
        }
    }
}

/// Partial update of a card. `None` fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<CategoryId>,
    pub column_id: Option<ColumnId>,
    pub priority: Option<Priority>,
    pub tags: Option<Vec<String>>,
}

impl CardUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn validate(&self) -> CoreResult<()> {
        match &self.title {
            Some(title) => validate_title(title),
            None => Ok(()),
        }
    }

    /// Apply the fields to a card locally and bump its `updated_at`.
    pub fn apply_to(&self, card: &mut Card) {
        if let Some(title) = &self.title {
            card.title = title.trim().to_string();
        }
        if let Some(description) = &self.description {
            card.description = description.clone();
        }
        if let Some(category_id) = self.category_id {
            card.category_id = category_id;
        }
        if let Some(column_id) = self.column_id {
            card.column_id = column_id;
        }
        if let Some(priority) = self.priority {
            card.priority = Some(priority);
        }
        if let Some(tags) = &self.tags {
            card.tags = tags.clone();
        }
        card.touch();
    }
}

fn validate_title(title: &str) -> CoreResult<()> {
    let len = title.trim().chars().count();
    if len == 0 {
        return Err(CoreError::validation("Title must not be empty"));
    }
    if len > MAX_TITLE_LEN {
        return Err(CoreError::validation(format!(
            "Title must be at most {} characters (got {})",
            MAX_TITLE_LEN, len
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn card(id: &str, category: CategoryId, column: ColumnId) -> Card {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        Card {
            id: id.to_string(),
            title: format!("Card {}", id),
            description: String::new(),
            category_id: category,
            column_id: column,
            created_at: at,
            updated_at: at,
            tags: vec![],
            priority: Some(Priority::Medium),
        }
    }

    #[test]
    fn test_ids_parse_legacy_spellings() {
        assert_eq!("business-finance".parse::<CategoryId>().unwrap(), CategoryId::Business);
        assert_eq!("coding-projects".parse::<CategoryId>().unwrap(), CategoryId::Coding);
        assert_eq!("health-life".parse::<CategoryId>().unwrap(), CategoryId::Health);
        assert_eq!("in-progress".parse::<ColumnId>().unwrap(), ColumnId::InProgress);
        assert!("personal".parse::<CategoryId>().is_err());
        assert!("review".parse::<ColumnId>().is_err());
        assert!("critical".parse::<Priority>().is_err());
    }

    #[test]
    fn test_ids_serialize_canonical() {
        let legacy: ColumnId = serde_json::from_str("\"in-progress\"").unwrap();
        assert_eq!(serde_json::to_string(&legacy).unwrap(), "\"inProgress\"");

        let legacy: CategoryId = serde_json::from_str("\"business-finance\"").unwrap();
        assert_eq!(serde_json::to_string(&legacy).unwrap(), "\"business\"");

        for id in CategoryId::ALL {
            assert_eq!(id.as_str().parse::<CategoryId>().unwrap(), id);
        }
        for id in ColumnId::ALL {
            assert_eq!(id.as_str().parse::<ColumnId>().unwrap(), id);
        }
    }

    #[test]
    fn test_touch_strictly_increases() {
        let mut c = card("a", CategoryId::Coding, ColumnId::Todo);
        c.updated_at = Utc::now() + Duration::hours(1);
        let before = c.updated_at;
        c.touch();
        assert!(c.updated_at > before);
        assert!(c.updated_at >= c.created_at);
    }

    #[test]
    fn test_upsert_replaces_by_id() {
        let mut state = BoardState::new(CategoryId::Coding);
        state.upsert_card(card("a", CategoryId::Coding, ColumnId::Todo));
        state.upsert_card(card("b", CategoryId::Coding, ColumnId::Todo));
        state.upsert_card(card("a", CategoryId::Coding, ColumnId::Done));

        assert_eq!(state.cards.len(), 2);
        assert_eq!(state.cards[0].id, "a");
        assert_eq!(state.cards[0].column_id, ColumnId::Done);
        assert!(state.remove_card("a"));
        assert!(!state.remove_card("a"));
    }

    #[test]
    fn test_column_views_partition_active_category() {
        let mut state = BoardState::new(CategoryId::Business);
        let mut n = 0;
        for category in CategoryId::ALL {
            for column in ColumnId::ALL {
                for _ in 0..2 {
                    n += 1;
                    state.upsert_card(card(&n.to_string(), category, column));
                }
            }
        }

        for active in CategoryId::ALL {
            state.active_category = active;
            let active_cards = state.active_category_cards();
            let mut from_columns: Vec<String> = state
                .columns()
                .into_iter()
                .flat_map(|col| col.cards.into_iter().map(|c| c.id))
                .collect();
            assert_eq!(from_columns.len(), active_cards.len());
            from_columns.sort();
            from_columns.dedup();
            assert_eq!(from_columns.len(), active_cards.len());
            assert!(active_cards.iter().all(|c| c.category_id == active));
        }
    }

    #[test]
    fn test_new_card_validation() {
        assert!(NewCard::new("Pay rent", CategoryId::Business).validate().is_ok());
        assert!(NewCard::new("   ", CategoryId::Business).validate().is_err());
        assert!(NewCard::new("x".repeat(256), CategoryId::Business).validate().is_err());
        assert!(NewCard::new("x".repeat(255), CategoryId::Business).validate().is_ok());
    }

    #[test]
    fn test_new_card_defaults() {
        let now = Utc::now();
        let c = NewCard::new(" Pay rent ", CategoryId::Business).into_card("id-1".into(), now);
        assert_eq!(c.title, "Pay rent");
        assert_eq!(c.column_id, ColumnId::Todo);
        assert_eq!(c.priority, Some(Priority::Medium));
        assert!(c.tags.is_empty());
        assert_eq!(c.created_at, c.updated_at);
    }

    #[test]
    fn test_update_applies_only_given_fields() {
        let mut c = card("a", CategoryId::Coding, ColumnId::Todo);
        let before = c.updated_at;
        let update = CardUpdate {
            column_id: Some(ColumnId::InProgress),
            tags: Some(vec!["urgent".to_string()]),
            ..Default::default()
        };
        update.apply_to(&mut c);

        assert_eq!(c.title, "Card a");
        assert_eq!(c.column_id, ColumnId::InProgress);
        assert_eq!(c.tags, vec!["urgent".to_string()]);
        assert!(c.updated_at > before);
        assert!(CardUpdate::default().is_empty());
    }
}
