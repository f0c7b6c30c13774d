// Tag extraction and aggregation engine.
// Vocabulary → extractor → aggregator → derived metrics. Everything except
// `handlers` is synchronous and free of I/O.

pub mod aggregator;
pub mod catalog;
pub mod extractor;
pub mod handlers;
pub mod metrics;
pub mod vocabulary;

pub use aggregator::{aggregate, AggregateMap, TagAggregate};
pub use extractor::{extract, TagSet};
pub use vocabulary::{TagCategory, TagDefinition, TagVocabulary, VocabularyError};
