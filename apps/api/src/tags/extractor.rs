//! Keyword extractor: maps one comment's text to the set of tag keys it mentions.
//!
//! Matching is plain case-insensitive substring search. Each definition is
//! tested independently: the first keyword hit adds its key and the rest of
//! that definition's keywords are skipped. Keywords shared between
//! definitions fire for every definition that lists them.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::tags::vocabulary::TagVocabulary;

/// Tag keys carried by a single comment. Ordered so persisted output is stable.
pub type TagSet = BTreeSet<String>;

/// A matched tag together with the keyword that triggered it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagMatch {
    pub key: String,
    pub keyword: String,
}

/// Returns one `TagMatch` per matching definition, in vocabulary order.
pub fn find_matches(vocabulary: &TagVocabulary, text: &str) -> Vec<TagMatch> {
    let normalized = text.to_lowercase();
    if normalized.trim().is_empty() {
        return Vec::new();
    }

    vocabulary
        .all()
        .iter()
        .filter_map(|definition| {
            definition
                .keywords
                .iter()
                .find(|keyword| normalized.contains(keyword.as_str()))
                .map(|keyword| TagMatch {
                    key: definition.key.clone(),
                    keyword: keyword.clone(),
                })
        })
        .collect()
}

pub fn extract(vocabulary: &TagVocabulary, text: &str) -> TagSet {
    find_matches(vocabulary, text)
        .into_iter()
        .map(|m| m.key)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::vocabulary::{TagCategory, TagDefinition};

    const OILY_MATTE: &str = "Great for oily skin, matte finish, lasts all day";
    const DRY_COMPLAINT: &str = "Too drying for my dry skin";
    const COMBO_DEWY: &str = "Perfect for combination skin, dewy finish";

    fn vocab() -> TagVocabulary {
        TagVocabulary::builtin().unwrap()
    }

    fn keys(set: &TagSet) -> Vec<&str> {
        set.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_scenario_comment_one() {
        let tags = extract(&vocab(), OILY_MATTE);
        assert_eq!(keys(&tags), vec!["finish_matte", "longevity_long", "skin_type_oily"]);
    }

    #[test]
    fn test_scenario_other_comments() {
        let v = vocab();
        assert_eq!(
            keys(&extract(&v, DRY_COMPLAINT)),
            vec!["issue_drying", "skin_type_dry"]
        );
        assert_eq!(
            keys(&extract(&v, COMBO_DEWY)),
            vec!["finish_dewy", "skin_type_combination"]
        );
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let tags = extract(&vocab(), "FULL COVERAGE and Long Lasting");
        assert!(tags.contains("coverage_full"));
        assert!(tags.contains("longevity_long"));
    }

    #[test]
    fn test_empty_and_whitespace_text_yield_no_tags() {
        let v = vocab();
        assert!(extract(&v, "").is_empty());
        assert!(extract(&v, "   \n\t ").is_empty());
    }

    #[test]
    fn test_text_without_keywords_yields_no_tags() {
        assert!(extract(&vocab(), "Arrived on time, box was blue.").is_empty());
    }

    #[test]
    fn test_extract_is_deterministic() {
        let v = vocab();
        for text in [OILY_MATTE, DRY_COMPLAINT, COMBO_DEWY, "", "no shine, oil control"] {
            assert_eq!(extract(&v, text), extract(&v, text));
        }
    }

    #[test]
    fn test_definition_matches_once_and_reports_first_keyword() {
        // "matte" and "matte finish" and "velvety" all belong to finish_matte.
        let matches = find_matches(&vocab(), "velvety matte finish, so matte");
        let matte: Vec<_> = matches.iter().filter(|m| m.key == "finish_matte").collect();
        assert_eq!(matte.len(), 1);
        assert_eq!(matte[0].keyword, "matte");
    }

    #[test]
    fn test_shared_keyword_fires_for_every_definition() {
        // "no shine" is listed under both finish_matte and property_oil_control;
        // "oil control" under both skin_type_oily and property_oil_control.
        let tags = extract(&vocab(), "no shine and real oil control");
        assert!(tags.contains("finish_matte"));
        assert!(tags.contains("property_oil_control"));
        assert!(tags.contains("skin_type_oily"));
    }

    #[test]
    fn test_substring_matching_inside_words() {
        // "natural" fires inside "unnatural" (plain substring search).
        let tags = extract(&vocab(), "looks unnatural on me");
        assert!(tags.contains("finish_natural"));
    }

    #[test]
    fn test_every_extracted_key_exists_in_vocabulary() {
        let v = vocab();
        let text = "matte, dewy, sheer, full coverage, oxidizes, acne, lightweight, all day, \
                    dry skin, oily skin, combo skin, sensitive skin, messy, shade range";
        for key in extract(&v, text) {
            assert!(v.lookup(&key).is_ok(), "{key} missing from vocabulary");
        }
    }

    #[test]
    fn test_custom_vocabulary_keywords_normalized() {
        let v = TagVocabulary::new(vec![TagDefinition {
            key: "finish_glass".to_string(),
            category: TagCategory::Finish,
            label: "Glass Skin".to_string(),
            description: None,
            keywords: vec!["Glass Skin".to_string()],
        }])
        .unwrap();
        assert_eq!(keys(&extract(&v, "total GLASS skin look")), vec!["finish_glass"]);
    }
}
