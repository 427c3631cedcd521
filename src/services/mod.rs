pub mod classifier;
pub mod formatter;
pub mod metadata;
pub mod providers;
pub mod recommendations;

pub use classifier::SentimentClassifier;
pub use providers::{CatalogProvider, TmdbProvider};
