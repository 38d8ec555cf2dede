//! Convenient re-exports for common usage patterns.
//!
//! ```rust
//! use fntool::prelude::*;
//! ```

// Core functionality
pub use crate::{call_tool, collect_tools, function_declarations, list_tool_names};

// Essential types
pub use crate::{
    CompileOptions, Describe, FunctionCall, FunctionDescriptor, FunctionResponse, ToolCollection,
    ToolDescriptor, ToolError, TypeDescriptor,
};

// Macros
pub use crate::tool;

// Commonly used external types
pub use serde_json::{Value, json};

pub use serde::{Deserialize, Serialize};

// Re-export async runtime for examples
pub use tokio;
