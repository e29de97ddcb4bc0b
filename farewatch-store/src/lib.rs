pub mod app_config;
pub mod gemini;

pub use app_config::Config;
pub use gemini::GeminiClient;
