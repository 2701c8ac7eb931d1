pub mod corpus;
pub mod dates;
pub mod engagement;
pub mod filters;
pub mod listing;
pub mod post;
pub mod related;
pub mod search;
pub mod text;

pub use corpus::Corpus;
pub use post::{Category, PostSummary, Source, Topic};
