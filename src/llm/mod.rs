pub mod client;
pub mod extractor;
#[cfg(feature = "gemini")]
pub mod gemini;
pub mod prompts;
pub mod types;

pub use client::*;
pub use extractor::*;
#[cfg(feature = "gemini")]
pub use gemini::*;
pub use types::*;
