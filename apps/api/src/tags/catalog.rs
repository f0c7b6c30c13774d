//! Built-in cosmetics tag catalog.
//!
//! Order matters only for presentation: the extractor matches every
//! definition independently.

use crate::tags::vocabulary::{TagCategory, TagDefinition};

pub const SKIN_TYPE_DRY: &str = "skin_type_dry";
pub const SKIN_TYPE_OILY: &str = "skin_type_oily";
pub const SKIN_TYPE_COMBINATION: &str = "skin_type_combination";
pub const FINISH_MATTE: &str = "finish_matte";
pub const FINISH_DEWY: &str = "finish_dewy";
pub const COVERAGE_FULL: &str = "coverage_full";
pub const ISSUE_NO_OXIDATION: &str = "issue_no_oxidation";
pub const PROPERTY_OIL_CONTROL: &str = "property_oil_control";
pub const PROPERTY_HYDRATING: &str = "property_hydrating";
pub const PROPERTY_LIGHTWEIGHT: &str = "property_lightweight";
pub const LONGEVITY_SHORT: &str = "longevity_short";
pub const LONGEVITY_LONG: &str = "longevity_long";

struct CatalogEntry {
    key: &'static str,
    category: TagCategory,
    label: &'static str,
    description: &'static str,
    keywords: &'static [&'static str],
}

const CATALOG: &[CatalogEntry] = &[
    // Skin type
    CatalogEntry {
        key: SKIN_TYPE_DRY,
        category: TagCategory::SkinType,
        label: "Dry Skin",
        description: "Suitable for dry skin",
        keywords: &["dry skin", "dryness", "flaky", "dehydrated", "works for dry", "good for dry"],
    },
    CatalogEntry {
        key: SKIN_TYPE_OILY,
        category: TagCategory::SkinType,
        label: "Oily Skin",
        description: "Suitable for oily skin",
        keywords: &["oily skin", "oil control", "sebum", "works for oily", "good for oily", "controls oil"],
    },
    CatalogEntry {
        key: SKIN_TYPE_COMBINATION,
        category: TagCategory::SkinType,
        label: "Combination Skin",
        description: "Suitable for combination skin",
        keywords: &["combination skin", "combo skin", "mixed skin", "works for combination"],
    },
    CatalogEntry {
        key: "skin_type_normal",
        category: TagCategory::SkinType,
        label: "Normal Skin",
        description: "Suitable for normal skin",
        keywords: &["normal skin", "works for normal", "balanced skin"],
    },
    CatalogEntry {
        key: "skin_type_sensitive",
        category: TagCategory::SkinType,
        label: "Sensitive Skin",
        description: "Suitable for sensitive skin",
        keywords: &["sensitive skin", "gentle", "non-irritating", "hypoallergenic", "works for sensitive"],
    },
    // Finish
    CatalogEntry {
        key: FINISH_MATTE,
        category: TagCategory::Finish,
        label: "Matte Finish",
        description: "Leaves a matte finish",
        keywords: &["matte", "matte finish", "no shine", "flat finish", "velvety"],
    },
    CatalogEntry {
        key: FINISH_DEWY,
        category: TagCategory::Finish,
        label: "Dewy Finish",
        description: "Leaves a dewy, luminous finish",
        keywords: &["dewy", "glowy", "luminous", "radiant", "glowing", "shiny", "wet look"],
    },
    CatalogEntry {
        key: "finish_satin",
        category: TagCategory::Finish,
        label: "Satin Finish",
        description: "Leaves a natural, satin finish",
        keywords: &["satin", "satin finish", "semi-matte", "natural finish", "skin-like"],
    },
    CatalogEntry {
        key: "finish_natural",
        category: TagCategory::Finish,
        label: "Natural Finish",
        description: "Natural, skin-like finish",
        keywords: &["natural", "natural finish", "looks like skin", "second skin"],
    },
    // Coverage
    CatalogEntry {
        key: "coverage_sheer",
        category: TagCategory::Coverage,
        label: "Sheer Coverage",
        description: "Light, sheer coverage",
        keywords: &["sheer", "light coverage", "minimal coverage", "barely there", "natural coverage"],
    },
    CatalogEntry {
        key: "coverage_light",
        category: TagCategory::Coverage,
        label: "Light Coverage",
        description: "Light to medium coverage",
        keywords: &["light coverage", "buildable", "light to medium"],
    },
    CatalogEntry {
        key: "coverage_medium",
        category: TagCategory::Coverage,
        label: "Medium Coverage",
        description: "Medium coverage",
        keywords: &["medium coverage", "good coverage", "covers well"],
    },
    CatalogEntry {
        key: COVERAGE_FULL,
        category: TagCategory::Coverage,
        label: "Full Coverage",
        description: "Full, opaque coverage",
        keywords: &["full coverage", "heavy coverage", "high coverage", "covers everything", "opaque"],
    },
    // Issues users report
    CatalogEntry {
        key: "issue_oxidation",
        category: TagCategory::Issue,
        label: "Oxidizes",
        description: "Changes color/oxidizes over time",
        keywords: &["oxidize", "oxidizes", "oxidation", "turns orange", "changes color", "darker throughout day"],
    },
    CatalogEntry {
        key: ISSUE_NO_OXIDATION,
        category: TagCategory::Issue,
        label: "No Oxidation",
        description: "Does not oxidize",
        keywords: &["no oxidation", "doesn't oxidize", "color stays true", "doesn't change color"],
    },
    CatalogEntry {
        key: "issue_caking",
        category: TagCategory::Issue,
        label: "Cakes",
        description: "Cakes or settles into lines",
        keywords: &["caking", "cakes", "settles into lines", "emphasizes texture", "creases"],
    },
    CatalogEntry {
        key: "issue_drying",
        category: TagCategory::Issue,
        label: "Drying",
        description: "Dries out the skin",
        keywords: &["drying", "dries out", "makes skin dry", "dried me out", "emphasizes dry patches"],
    },
    CatalogEntry {
        key: "issue_pore_visibility",
        category: TagCategory::Issue,
        label: "Shows Pores",
        description: "Makes pores more visible",
        keywords: &["shows pores", "emphasizes pores", "pores visible", "accentuates pores"],
    },
    CatalogEntry {
        key: "issue_no_pore_visibility",
        category: TagCategory::Issue,
        label: "Blurs Pores",
        description: "Minimizes pore visibility",
        keywords: &["blurs pores", "hides pores", "pores invisible", "smooths pores", "pore-blurring"],
    },
    CatalogEntry {
        key: "issue_separation",
        category: TagCategory::Issue,
        label: "Separates",
        description: "Separates or breaks apart on skin",
        keywords: &["separates", "breaks apart", "patches", "wears off unevenly"],
    },
    CatalogEntry {
        key: "issue_breakouts",
        category: TagCategory::Issue,
        label: "Causes Breakouts",
        description: "May cause breakouts or acne",
        keywords: &["breakouts", "broke me out", "acne", "caused pimples", "clogs pores"],
    },
    CatalogEntry {
        key: "issue_no_breakouts",
        category: TagCategory::Issue,
        label: "Acne-Safe",
        description: "Does not cause breakouts",
        keywords: &["no breakouts", "acne-safe", "non-comedogenic", "didn't break me out"],
    },
    // Positive properties
    CatalogEntry {
        key: PROPERTY_OIL_CONTROL,
        category: TagCategory::Property,
        label: "Oil Control",
        description: "Controls oil well",
        keywords: &["oil control", "controls oil", "keeps me matte", "no shine", "oil-free"],
    },
    CatalogEntry {
        key: PROPERTY_HYDRATING,
        category: TagCategory::Property,
        label: "Hydrating",
        description: "Hydrating and moisturizing",
        keywords: &["hydrating", "moisturizing", "doesn't dry", "comfortable", "nourishing"],
    },
    CatalogEntry {
        key: PROPERTY_LIGHTWEIGHT,
        category: TagCategory::Property,
        label: "Lightweight",
        description: "Lightweight feel",
        keywords: &["lightweight", "light feel", "not heavy", "breathable", "weightless"],
    },
    CatalogEntry {
        key: "property_blendable",
        category: TagCategory::Property,
        label: "Blendable",
        description: "Easy to blend",
        keywords: &["blendable", "easy to blend", "blends well", "smooth application"],
    },
    CatalogEntry {
        key: "property_buildable",
        category: TagCategory::Property,
        label: "Buildable",
        description: "Buildable coverage",
        keywords: &["buildable", "build up", "layerable", "can layer"],
    },
    CatalogEntry {
        key: "property_shade_range",
        category: TagCategory::Property,
        label: "Good Shade Range",
        description: "Good shade selection",
        keywords: &["shade range", "many shades", "inclusive", "found my shade"],
    },
    CatalogEntry {
        key: "property_good_packaging",
        category: TagCategory::Property,
        label: "Good Packaging",
        description: "User-friendly packaging",
        keywords: &["good packaging", "great pump", "nice bottle", "easy to use", "hygienic"],
    },
    CatalogEntry {
        key: "property_bad_packaging",
        category: TagCategory::Property,
        label: "Poor Packaging",
        description: "Issues with packaging",
        keywords: &["bad packaging", "terrible pump", "messy", "hard to use", "wasteful"],
    },
    // Longevity
    CatalogEntry {
        key: LONGEVITY_SHORT,
        category: TagCategory::Longevity,
        label: "Short Wear",
        description: "Wears off quickly (under 4 hours)",
        keywords: &["wears off", "short wear", "fades quickly", "doesn't last", "gone in hours"],
    },
    CatalogEntry {
        key: "longevity_medium",
        category: TagCategory::Longevity,
        label: "Medium Wear",
        description: "Lasts 4-8 hours",
        keywords: &["lasts half day", "medium wear", "needs touch up", "fades by afternoon"],
    },
    CatalogEntry {
        key: LONGEVITY_LONG,
        category: TagCategory::Longevity,
        label: "Long Wear",
        description: "Lasts 8+ hours",
        keywords: &["long lasting", "all day", "stays put", "doesn't fade", "lasts forever", "12 hours"],
    },
];

/// Returns owned copies of the built-in catalog, ready for `TagVocabulary::new`.
pub fn builtin_definitions() -> Vec<TagDefinition> {
    CATALOG
        .iter()
        .map(|entry| TagDefinition {
            key: entry.key.to_string(),
            category: entry.category,
            label: entry.label.to_string(),
            description: Some(entry.description.to_string()),
            keywords: entry.keywords.iter().map(|k| k.to_string()).collect(),
        })
        .collect()
}
