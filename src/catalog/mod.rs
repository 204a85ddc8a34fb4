pub mod gateway;
pub mod handlers;
pub mod types;

pub use gateway::*;
pub use handlers::*;
pub use types::*;
