#![deny(unsafe_code)]

//! Turns function signatures into tool-calling schemas and dispatches the
//! resulting calls.
//!
//! The pipeline is descriptor in, descriptor out:
//! [`FunctionDescriptor`] → [`translate`] per parameter → [`compile`] →
//! [`ToolDescriptor`]. Nothing here touches the network or the host
//! function; the `#[tool]` macro builds descriptors at compile time and
//! [`ToolCollection`] runs the functions behind them.

pub mod assemble;
pub mod collection;
pub mod describe;
pub mod docstring;
pub mod error;
pub mod models;
pub mod optionality;
pub mod translate;

pub use assemble::{CompileOptions, ParametersSchema, ToolDescriptor, compile};
pub use collection::{
    CallId, FunctionCall, FunctionResponse, ToolCollection, ToolFunc, ToolRegistration,
};
pub use describe::Describe;
pub use docstring::{DocSummary, analyze as analyze_docstring};
pub use error::{DeserializationError, ToolError};
pub use models::{
    FieldDescriptor, FunctionDescriptor, LiteralValue, ParamDescriptor, PrimitiveKind,
    RecordDescriptor, TemporalKind, TypeDescriptor,
};
pub use optionality::is_required;
pub use translate::{SchemaFragment, translate};

// Re-exported for use in generated code
pub use futures;
pub use inventory;
pub use serde;
pub use serde_json;
