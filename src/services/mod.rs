pub mod fallback;

pub mod recommendation;
pub use recommendation::{RecommendationService, TextGenerator};
