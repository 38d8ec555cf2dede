//! Schema assembler: the last stage, producing the OpenAI-style tool descriptor.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::docstring;
use crate::models::FunctionDescriptor;
use crate::translate::{SchemaFragment, translate};

/// Conventional receiver name skipped when it leads the parameter list.
const RECEIVER: &str = "self";

/// Caller-supplied adjustments applied on top of what introspection finds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompileOptions {
    /// Replaces the function name.
    pub name: Option<String>,
    /// Replaces the docstring summary.
    pub description: Option<String>,
    /// Per-parameter keys shallow-merged into the generated fragment.
    pub param_overrides: IndexMap<String, SchemaFragment>,
}

impl CompileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds override keys for `param`. Later calls for the same parameter
    /// merge into the earlier ones. Non-object values carry no keys and are
    /// ignored.
    #[must_use]
    pub fn with_override(mut self, param: impl Into<String>, fragment: Value) -> Self {
        let param = param.into();
        match fragment {
            Value::Object(keys) => {
                self.param_overrides.entry(param).or_default().extend(keys);
            }
            other => {
                tracing::warn!(%param, override_value = %other, "ignoring non-object parameter override");
            }
        }
        self
    }
}

/// `parameters` block of a [`ToolDescriptor`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParametersSchema {
    #[serde(rename = "type")]
    pub schema_type: &'static str,
    pub properties: Map<String, Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

/// A tool as a tool-calling chat API expects it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDescriptor {
    #[serde(rename = "type")]
    pub tool_type: &'static str,
    pub name: String,
    pub description: String,
    pub parameters: ParametersSchema,
}

impl ToolDescriptor {
    pub fn to_json(&self) -> Value {
        let mut parameters = Map::new();
        parameters.insert("type".into(), self.parameters.schema_type.into());
        parameters.insert(
            "properties".into(),
            Value::Object(self.parameters.properties.clone()),
        );
        if !self.parameters.required.is_empty() {
            parameters.insert("required".into(), json!(self.parameters.required));
        }

        json!({
            "type": self.tool_type,
            "name": self.name,
            "description": self.description,
            "parameters": parameters,
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Compiles a function descriptor into a tool descriptor.
///
/// Parameters keep declaration order. Each property starts as the translated
/// type, takes the docstring description when one exists, then the caller's
/// override keys (caller wins). A property left with no keys becomes
/// `{"type": "string"}`. Defaults only affect `required`; they are never
/// written into the schema.
pub fn compile(function: &FunctionDescriptor, options: &CompileOptions) -> ToolDescriptor {
    let doc = docstring::analyze(&function.doc);

    let name = non_empty(options.name.as_deref())
        .unwrap_or(function.name.as_str())
        .to_owned();
    let description = non_empty(options.description.as_deref())
        .or(non_empty(Some(doc.summary.as_str())))
        .map(str::to_owned)
        .unwrap_or_else(|| format!("Callable function `{name}`."));

    let mut properties = Map::new();
    let mut required = Vec::new();

    for (index, param) in function.params.iter().enumerate() {
        if index == 0 && param.name == RECEIVER {
            continue;
        }

        let mut fragment = translate(&param.ty);

        if let Some(text) = doc.params.get(&param.name).filter(|text| !text.is_empty()) {
            fragment.insert("description".into(), Value::String(text.clone()));
        }

        if let Some(overrides) = options.param_overrides.get(&param.name) {
            for (key, value) in overrides {
                fragment.insert(key.clone(), value.clone());
            }
        }

        if fragment.is_empty() {
            fragment.insert("type".into(), "string".into());
        }

        if param.is_required() {
            required.push(param.name.clone());
        }
        properties.insert(param.name.clone(), Value::Object(fragment));
    }

    for unused in options
        .param_overrides
        .keys()
        .filter(|key| !properties.contains_key(key.as_str()))
    {
        tracing::debug!(tool = %name, param = %unused, "override names no parameter");
    }

    tracing::debug!(
        tool = %name,
        properties = properties.len(),
        required = required.len(),
        "compiled tool descriptor"
    );

    ToolDescriptor {
        tool_type: "function",
        name,
        description,
        parameters: ParametersSchema {
            schema_type: "object",
            properties,
            required,
        },
    }
}

impl FunctionDescriptor {
    /// Shorthand for [`compile`] without overrides.
    pub fn to_tool(&self) -> ToolDescriptor {
        compile(self, &CompileOptions::default())
    }

    pub fn to_tool_with(&self, options: &CompileOptions) -> ToolDescriptor {
        compile(self, options)
    }
}
