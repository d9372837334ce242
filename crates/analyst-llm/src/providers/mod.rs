//! Concrete LLM provider implementations

mod groq;

pub use groq::{GroqConfig, GroqProvider};
