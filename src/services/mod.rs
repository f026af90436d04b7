pub mod gemini_service;

pub use gemini_service::{GeminiService, TextGenerator};
