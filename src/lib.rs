//! Compile plain Rust functions into tool descriptors for tool-calling
//! language models, and dispatch the calls those models make.
//!
//! ```rust,ignore
//! use fntool::prelude::*;
//!
//! /// Searches for flights based on the provided query
//! ///
//! /// Args:
//! ///     query (str): The search query for flights
//! #[tool]
//! async fn flight_search(query: String) -> String {
//!     format!("no flights for {query}")
//! }
//!
//! let tools = collect_tools();
//! let declarations = tools.json()?;
//! ```
#![deny(unsafe_code)]

pub mod prelude;

pub use fntool_core::*;
pub use fntool_macros::{Describe, tool};

use serde_json::Value;

/// Every `#[tool]` function linked into the binary.
pub fn collect_tools() -> ToolCollection {
    ToolCollection::collect_tools()
}

/// The declarations of every `#[tool]` function as a JSON array.
pub fn function_declarations() -> Result<Value, ToolError> {
    collect_tools().json()
}

pub fn list_tool_names() -> Vec<String> {
    collect_tools().names().map(str::to_owned).collect()
}

/// Runs one `#[tool]` function by name.
///
/// Builds a fresh collection per call; hold on to a [`ToolCollection`] when
/// dispatching more than once.
pub async fn call_tool(name: &str, arguments: Value) -> Result<FunctionResponse, ToolError> {
    collect_tools()
        .call(FunctionCall::new(name, arguments))
        .await
}
