pub mod aspects;
pub mod confidence;
pub mod language;
pub mod models;
pub mod segment;

pub use aspects::{matching_aspects, Aspect, AspectGroup, ASPECT_GROUPS};
pub use confidence::boost_confidence;
pub use language::detect_language_rules;
pub use models::*;
pub use segment::sentences;
