//! Writing assistant for the composer body
//!
//! Optional: requests go to the OpenRouter API from a background actor and
//! come back as a replacement body. Without an API key the assist menu
//! still opens but reports that it is not configured.

mod actor;
mod assist;
mod client;
mod prompts;

pub use actor::{AiActorHandle, AiCommand, AiEvent, RequestId, spawn_ai_actor};
pub use assist::{AssistRequest, AssistSelection};
pub use client::OpenRouterClient;
