//! Sample catalog for local runs against the in-memory store.

use tracing::info;

use crate::comments::pipeline::create_comment;
use crate::errors::AppError;
use crate::models::comment::SkinType;
use crate::store::{MemoryStore, NewComment};
use crate::tags::TagVocabulary;

struct SampleProduct {
    name: &'static str,
    brand: &'static str,
    category: &'static str,
    comments: &'static [(SkinType, &'static str)],
}

const SAMPLES: &[SampleProduct] = &[
    SampleProduct {
        name: "Natural Matte Foundation",
        brand: "Studio Fix",
        category: "foundation",
        comments: &[
            (SkinType::Oily, "Works great on my oily skin! Stays matte all day without oxidizing. Medium coverage that's buildable."),
            (SkinType::Dry, "I have dry skin and this foundation made my face look flaky. Too drying for me."),
            (SkinType::Oily, "Perfect matte finish, controls oil really well. Lasts about 8 hours on me. Full coverage."),
            (SkinType::Combination, "Love the matte finish but it does emphasize my pores a bit. Good coverage though."),
            (SkinType::Combination, "Great for my oily t-zone! Doesn't oxidize and blends easily. Medium to full coverage."),
        ],
    },
    SampleProduct {
        name: "Luminous Silk Foundation",
        brand: "Beauty Co",
        category: "foundation",
        comments: &[
            (SkinType::Dry, "Beautiful dewy finish! Perfect for my dry skin. Hydrating and looks like skin. Light to medium coverage."),
            (SkinType::Oily, "Too glowy for me, I have oily skin and it made me look greasy. Coverage is good though."),
            (SkinType::Normal, "Gorgeous radiant finish, very lightweight and blendable. Doesn't oxidize. Medium coverage."),
            (SkinType::Dry, "Love the dewy look! Doesn't dry me out at all. Light coverage but buildable."),
            (SkinType::Combination, "Luminous finish is beautiful on my combination skin. Hydrating without being oily. Good packaging too."),
        ],
    },
    SampleProduct {
        name: "Radiant Creamy Concealer",
        brand: "Cover Pro",
        category: "concealer",
        comments: &[
            (SkinType::Normal, "Full coverage concealer that doesn't crease! Stays put all day. Slightly dewy finish."),
            (SkinType::Dry, "Great coverage but can be drying under the eyes. Creases a bit after a few hours."),
            (SkinType::Oily, "Covers everything! Full coverage and long lasting. Works well on my oily skin."),
            (SkinType::Combination, "Creamy texture, easy to blend. Doesn't cake. Medium to full coverage."),
        ],
    },
    SampleProduct {
        name: "HD Loose Powder",
        brand: "Studio Fix",
        category: "powder",
        comments: &[
            (SkinType::Oily, "Sets makeup beautifully! Doesn't look cakey. Controls oil all day."),
            (SkinType::Dry, "Too drying for my skin. Made my dry patches worse. Flashback in photos."),
            (SkinType::Oily, "Perfect setting powder for oily skin. Matte finish, no flashback if used lightly."),
            (SkinType::Combination, "Great for setting t-zone. Doesn't dry out my cheeks. Lightweight."),
        ],
    },
];

/// Inserts the sample products and runs every sample comment through the
/// regular write pipeline. Returns the number of comments created.
pub async fn seed_sample_data(
    store: &MemoryStore,
    vocabulary: &TagVocabulary,
) -> Result<usize, AppError> {
    let mut created = 0;
    for sample in SAMPLES {
        let product = store
            .insert_product(sample.name, Some(sample.brand), sample.category)
            .await;

        for (skin_type, text) in sample.comments {
            let comment = NewComment {
                product_id: product.id,
                text: (*text).to_string(),
                skin_type: Some(*skin_type),
                source: None,
                source_url: None,
            };
            create_comment(store, vocabulary, comment).await?;
            created += 1;
        }
        info!("Seeded product {} with {} comments", product.name, sample.comments.len());
    }
    Ok(created)
}
