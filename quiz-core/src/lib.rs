pub mod engine;
pub mod session;
pub mod words;

// Re-export main components
pub use engine::*;
pub use session::*;
pub use words::*;
