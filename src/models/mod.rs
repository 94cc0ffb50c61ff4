pub mod chunk;
pub mod token_estimate;

pub use chunk::{Complexity, SlideType, StructuredChunk, Topic};
pub use token_estimate::TokenEstimate;
