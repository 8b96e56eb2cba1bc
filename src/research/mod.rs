// src/research/mod.rs
pub mod client;
pub mod firecrawl;
pub mod models;
pub mod moz;
pub mod openai;
pub mod page;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod serp;

pub use pipeline::{ResearchPipeline, ResearchReport};
pub use progress::ProgressStage;
