//! Travel itinerary planner: a chat model with flight and hotel search tools.

#![deny(unsafe_code)]

pub mod chat;
pub mod config;
pub mod form;
pub mod planner;
pub mod prompt;
pub mod search;
pub mod tools;

pub use chat::{ChatClient, ChatError, ChatResponse, OpenAiClient};
pub use config::{Config, ConfigError};
pub use form::{FormError, TripArgs};
pub use planner::{Planner, PlannerError};
pub use prompt::{PromptError, PromptTemplate, SYSTEM_MESSAGE, TripRequest};
pub use search::{SearchClient, SearchError, TavilyClient};
pub use tools::install_search_client;
