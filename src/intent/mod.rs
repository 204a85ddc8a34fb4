pub mod gemini;
pub mod handlers;
pub mod heuristic;
pub mod model;
pub mod parser;
pub mod types;

pub use gemini::GeminiClient;
pub use handlers::*;
pub use heuristic::keyword_intent;
pub use model::{IntentError, IntentModel};
pub use parser::IntentParser;
pub use types::*;
