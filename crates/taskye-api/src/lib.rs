// taskye-api: Async Rust client for the generative-language provider

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::{DEFAULT_BASE_URL, GenerativeClient};
pub use error::Error;
pub use models::{
    Candidate, Content, ErrorBody, GenerateRequest, GenerateResponse, InlineData, ModelInfo,
    ModelsPage, Part,
};
pub use transport::TransportConfig;
