//! The immutable catalog of tag definitions.
//!
//! Built once at startup and shared as `Arc<TagVocabulary>`. There is no
//! mutation API; a changed catalog means constructing a new vocabulary.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tags::catalog::builtin_definitions;

#[derive(Debug, Error)]
pub enum VocabularyError {
    #[error("Duplicate tag key '{0}'")]
    DuplicateKey(String),

    #[error("Tag '{0}' has no keywords")]
    EmptyKeywords(String),

    #[error("Tag '{0}' has a blank keyword")]
    BlankKeyword(String),

    #[error("Unknown tag '{0}'")]
    UnknownTag(String),

    #[error("Unknown tag category '{0}'")]
    UnknownCategory(String),

    #[error("Failed to read vocabulary file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid vocabulary JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagCategory {
    SkinType,
    Finish,
    Coverage,
    Issue,
    Property,
    Longevity,
}

impl TagCategory {
    pub const ALL: [TagCategory; 6] = [
        TagCategory::SkinType,
        TagCategory::Finish,
        TagCategory::Coverage,
        TagCategory::Issue,
        TagCategory::Property,
        TagCategory::Longevity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TagCategory::SkinType => "skin_type",
            TagCategory::Finish => "finish",
            TagCategory::Coverage => "coverage",
            TagCategory::Issue => "issue",
            TagCategory::Property => "property",
            TagCategory::Longevity => "longevity",
        }
    }
}

impl fmt::Display for TagCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TagCategory {
    type Err = VocabularyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('-', "_").to_lowercase();
        TagCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| VocabularyError::UnknownCategory(s.to_string()))
    }
}

/// One catalog entry. `keywords` are matched as case-insensitive literal substrings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagDefinition {
    pub key: String,
    pub category: TagCategory,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct TagVocabulary {
    definitions: Vec<TagDefinition>,
    index: HashMap<String, usize>,
}

impl TagVocabulary {
    /// Validates and normalizes the definitions.
    ///
    /// Keywords are trimmed, lowercased and deduplicated (first occurrence
    /// keeps its position). Fails on duplicate keys, empty keyword lists and
    /// blank keywords.
    pub fn new(definitions: Vec<TagDefinition>) -> Result<Self, VocabularyError> {
        let mut index = HashMap::with_capacity(definitions.len());
        let mut normalized = Vec::with_capacity(definitions.len());

        for (position, mut definition) in definitions.into_iter().enumerate() {
            if index.insert(definition.key.clone(), position).is_some() {
                return Err(VocabularyError::DuplicateKey(definition.key));
            }
            if definition.keywords.is_empty() {
                return Err(VocabularyError::EmptyKeywords(definition.key));
            }

            let mut seen = HashSet::new();
            let mut keywords = Vec::with_capacity(definition.keywords.len());
            for keyword in &definition.keywords {
                let keyword = keyword.trim().to_lowercase();
                if keyword.is_empty() {
                    return Err(VocabularyError::BlankKeyword(definition.key));
                }
                if seen.insert(keyword.clone()) {
                    keywords.push(keyword);
                }
            }
            definition.keywords = keywords;
            normalized.push(definition);
        }

        Ok(Self {
            definitions: normalized,
            index,
        })
    }

    /// The built-in cosmetics catalog.
    pub fn builtin() -> Result<Self, VocabularyError> {
        Self::new(builtin_definitions())
    }

    /// Parses a JSON array of definitions.
    pub fn from_json_str(json: &str) -> Result<Self, VocabularyError> {
        let definitions: Vec<TagDefinition> = serde_json::from_str(json)?;
        Self::new(definitions)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, VocabularyError> {
        let json = std::fs::read_to_string(path).map_err(|source| VocabularyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn lookup(&self, key: &str) -> Result<&TagDefinition, VocabularyError> {
        self.get(key)
            .ok_or_else(|| VocabularyError::UnknownTag(key.to_string()))
    }

    pub fn get(&self, key: &str) -> Option<&TagDefinition> {
        self.index.get(key).map(|&i| &self.definitions[i])
    }

    /// Definitions of one category, in catalog order.
    pub fn list_by_category(&self, category: TagCategory) -> Vec<&TagDefinition> {
        self.definitions
            .iter()
            .filter(|d| d.category == category)
            .collect()
    }

    pub fn all(&self) -> &[TagDefinition] {
        &self.definitions
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }
}
