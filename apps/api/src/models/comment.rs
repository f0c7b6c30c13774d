use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Self-reported skin type attached to a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkinType {
    Dry,
    Oily,
    Combination,
    Normal,
    Sensitive,
    AcneProne,
    Dehydrated,
    Mature,
}

impl SkinType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkinType::Dry => "dry",
            SkinType::Oily => "oily",
            SkinType::Combination => "combination",
            SkinType::Normal => "normal",
            SkinType::Sensitive => "sensitive",
            SkinType::AcneProne => "acne_prone",
            SkinType::Dehydrated => "dehydrated",
            SkinType::Mature => "mature",
        }
    }
}

/// A stored comment. `skin_type` holds `SkinType::as_str` values.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CommentRow {
    pub id: Uuid,
    pub product_id: Uuid,
    pub text: String,
    pub skin_type: Option<String>,
    pub source: String,
    pub source_url: Option<String>,
    pub processed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A comment with the tag keys extracted from its current text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentWithTags {
    #[serde(flatten)]
    pub comment: CommentRow,
    pub tags: Vec<String>,
}
