//! Named tool registry: compiled declarations plus type-erased async
//! functions that accept JSON arguments.

use std::{borrow::Cow, fmt, sync::Arc};

use futures::{FutureExt, future::BoxFuture};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    assemble::{CompileOptions, ToolDescriptor, compile},
    describe::Describe,
    error::{DeserializationError, ToolError},
    models::{FunctionDescriptor, ParamDescriptor, TypeDescriptor},
};

// ============================================================================
// CALLS AND RESPONSES
// ============================================================================

/// Identifier correlating a tool call with its output.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallId(String);

impl CallId {
    /// A fresh random id.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CallId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for CallId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for CallId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// A request to run one tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCall {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CallId>,
    pub name: String,
    pub arguments: Value,
}

impl FunctionCall {
    pub fn new(name: impl Into<String>, arguments: Value) -> Self {
        Self {
            id: None,
            name: name.into(),
            arguments,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<CallId>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// The result of a [`FunctionCall`], carrying the caller's id back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CallId>,
    pub name: String,
    pub result: Value,
}

impl FunctionResponse {
    /// The result as text for a model: strings as-is, anything else as JSON.
    pub fn output_text(&self) -> String {
        match &self.result {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        }
    }
}

// ============================================================================
// REGISTRATION
// ============================================================================

/// Function signature for tools
pub type ToolFunc = dyn Fn(Value) -> BoxFuture<'static, Result<Value, ToolError>> + Send + Sync;

/// Static registration emitted by `#[tool]` and gathered with `inventory`.
pub struct ToolRegistration {
    pub name: &'static str,
    pub descriptor: fn() -> FunctionDescriptor,
    pub options: fn() -> CompileOptions,
    pub f: fn(Value) -> BoxFuture<'static, Result<Value, ToolError>>,
}

impl ToolRegistration {
    pub const fn new(
        name: &'static str,
        descriptor: fn() -> FunctionDescriptor,
        options: fn() -> CompileOptions,
        f: fn(Value) -> BoxFuture<'static, Result<Value, ToolError>>,
    ) -> Self {
        Self {
            name,
            descriptor,
            options,
            f,
        }
    }
}

inventory::collect!(ToolRegistration);

/// Derives parameters from the input type of a closure-based tool.
///
/// Records contribute one parameter per field. Unit takes no parameters.
fn input_descriptor<I: Describe>(name: &str) -> Result<FunctionDescriptor, ToolError> {
    match I::describe() {
        TypeDescriptor::Record(record) => Ok(record.fields.into_iter().fold(
            FunctionDescriptor::new(name),
            |function, field| {
                let param = ParamDescriptor::new(field.name, field.ty);
                let param = if field.has_default || !record.total {
                    param.with_default_marker()
                } else {
                    param
                };
                function.push_param(param)
            },
        )),
        TypeDescriptor::Null => Ok(FunctionDescriptor::new(name)),
        other => Err(ToolError::UnsupportedInput {
            name: Cow::Owned(name.to_owned()),
            input: format!("{other:?}"),
        }),
    }
}

// ============================================================================
// TOOL COLLECTION
// ============================================================================

struct Entry {
    function: FunctionDescriptor,
    options: CompileOptions,
    declaration: ToolDescriptor,
    func: Arc<ToolFunc>,
}

/// Registered tools keyed by their compiled name, in registration order.
#[derive(Default)]
pub struct ToolCollection {
    entries: IndexMap<String, Entry>,
}

impl ToolCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an async closure. Parameters come from the input type,
    /// which must describe itself as a record (or unit).
    pub fn register<I, O, F, Fut>(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        func: F,
    ) -> Result<&mut Self, ToolError>
    where
        I: 'static + DeserializeOwned + Describe + Send,
        O: 'static + Serialize + Send,
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = O> + Send + 'static,
    {
        let name = name.into();
        let function = input_descriptor::<I>(&name)?;
        let options = CompileOptions::new().with_description(description);
        self.register_with(function, options, func)
    }

    /// Registers an async closure against an explicit descriptor.
    pub fn register_with<I, O, F, Fut>(
        &mut self,
        function: FunctionDescriptor,
        options: CompileOptions,
        func: F,
    ) -> Result<&mut Self, ToolError>
    where
        I: 'static + DeserializeOwned + Send,
        O: 'static + Serialize + Send,
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = O> + Send + 'static,
    {
        let func_arc: Arc<F> = Arc::new(func);
        let erased: Arc<ToolFunc> = Arc::new(
            move |raw: Value| -> BoxFuture<'static, Result<Value, ToolError>> {
                let func = func_arc.clone();
                async move {
                    let input: I =
                        serde_json::from_value(raw).map_err(DeserializationError::from)?;
                    let output: O = (func)(input).await;
                    serde_json::to_value(output).map_err(|e| ToolError::Runtime(e.to_string()))
                }
                .boxed()
            },
        );
        self.insert(function, options, erased)
    }

    fn insert(
        &mut self,
        function: FunctionDescriptor,
        options: CompileOptions,
        func: Arc<ToolFunc>,
    ) -> Result<&mut Self, ToolError> {
        let declaration = compile(&function, &options);
        if self.entries.contains_key(&declaration.name) {
            return Err(ToolError::AlreadyRegistered {
                name: Cow::Owned(declaration.name),
            });
        }

        tracing::debug!(tool = %declaration.name, "registered tool");
        self.entries.insert(
            declaration.name.clone(),
            Entry {
                function,
                options,
                declaration,
                func,
            },
        );
        Ok(self)
    }

    /// Runs the named tool with the call's arguments.
    pub async fn call(&self, call: FunctionCall) -> Result<FunctionResponse, ToolError> {
        let FunctionCall {
            id,
            name,
            arguments,
        } = call;
        let Some(entry) = self.entries.get(name.as_str()) else {
            tracing::warn!(tool = %name, "call to unregistered tool");
            return Err(ToolError::not_found(name));
        };

        tracing::debug!(tool = %name, call_id = ?id, "calling tool");
        let result = (entry.func)(arguments).await?;
        Ok(FunctionResponse { id, name, result })
    }

    pub fn unregister(&mut self, name: &str) -> Result<(), ToolError> {
        if self.entries.shift_remove(name).is_none() {
            return Err(ToolError::not_found(name));
        }
        Ok(())
    }

    /// Recompiles a registered tool with new options. A rename moves the
    /// entry to the end of the collection.
    pub fn configure(&mut self, name: &str, options: CompileOptions) -> Result<(), ToolError> {
        let Some(entry) = self.entries.get(name) else {
            return Err(ToolError::not_found(name));
        };

        let declaration = compile(&entry.function, &options);
        if declaration.name != name && self.entries.contains_key(&declaration.name) {
            return Err(ToolError::AlreadyRegistered {
                name: Cow::Owned(declaration.name),
            });
        }

        if declaration.name == name {
            if let Some(entry) = self.entries.get_mut(name) {
                entry.options = options;
                entry.declaration = declaration;
            }
        } else if let Some(mut entry) = self.entries.shift_remove(name) {
            entry.options = options;
            entry.declaration = declaration;
            self.entries.insert(entry.declaration.name.clone(), entry);
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    pub fn descriptions(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries
            .values()
            .map(|e| (e.declaration.name.as_str(), e.declaration.description.as_str()))
    }

    pub fn declarations(&self) -> impl Iterator<Item = &ToolDescriptor> + '_ {
        self.entries.values().map(|e| &e.declaration)
    }

    pub fn declaration(&self, name: &str) -> Option<&ToolDescriptor> {
        self.entries.get(name).map(|e| &e.declaration)
    }

    pub fn options(&self, name: &str) -> Option<&CompileOptions> {
        self.entries.get(name).map(|e| &e.options)
    }

    /// Every `#[tool]` function linked into the binary. When two share a
    /// name the first one seen is kept.
    pub fn collect_tools() -> Self {
        let mut hub = Self::new();

        for reg in inventory::iter::<ToolRegistration> {
            let result = hub.insert((reg.descriptor)(), (reg.options)(), Arc::new(reg.f));
            if let Err(err) = result {
                tracing::warn!(tool = reg.name, error = %err, "skipping tool registration");
            }
        }

        hub
    }

    /// All declarations as a JSON array, ready for a chat request.
    pub fn json(&self) -> Result<Value, ToolError> {
        let list: Vec<&ToolDescriptor> = self.declarations().collect();
        Ok(serde_json::to_value(list)?)
    }
}

impl fmt::Debug for ToolCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolCollection")
            .field("tools", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

// ============================================================================
// TESTS
// ============================================================================


#[cfg(test)]
mod stateful_tests {
    use super::*;
    use serde_json::json;
    use std::sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    #[derive(Deserialize)]
    struct Push {
        value: i32,
    }

    impl Describe for Push {
        fn describe() -> TypeDescriptor {
            TypeDescriptor::Record(
                crate::models::RecordDescriptor::new("Push").field("value", i32::describe()),
            )
        }
    }

    fn fc(name: &str, args: Value) -> FunctionCall {
        FunctionCall::new(name, args).with_id(CallId::new())
    }

    #[tokio::test]
    async fn test_stateful_counter_concurrent() {
        let counter = Arc::new(AtomicUsize::new(0));

        let mut col_mut = ToolCollection::default();
        {
            let counter_inc = counter.clone();
            col_mut
                .register("inc", "increments", move |_: ()| {
                    let counter_inner = counter_inc.clone();
                    async move { counter_inner.fetch_add(1, Ordering::SeqCst) + 1 }
                })
                .unwrap();
        }

        let col = Arc::new(col_mut);

        let handles = (0..10)
            .map(|_| {
                let col_clone = col.clone();
                tokio::spawn(async move { col_clone.call(fc("inc", json!(null))).await })
            })
            .collect::<Vec<_>>();

        for h in handles {
            assert!(h.await.unwrap().is_ok());
        }

        assert_eq!(counter.load(Ordering::SeqCst), 10);
    }

    #[tokio::test]
    async fn test_stateful_vector_and_unregister() {
        let data: Arc<Mutex<Vec<i32>>> = Arc::new(Mutex::new(vec![]));
        let mut col = ToolCollection::default();

        {
            let data_push = data.clone();
            col.register("push", "pushes", move |t: Push| {
                let data_inner = data_push.clone();
                async move {
                    let mut g = data_inner.lock().unwrap();
                    g.push(t.value);
                    g.len()
                }
            })
            .unwrap();
        }

        for (value, len) in [(1, 1), (2, 2), (3, 3)] {
            assert_eq!(
                col.call(fc("push", json!({ "value": value })))
                    .await
                    .unwrap()
                    .result,
                json!(len)
            );
        }

        col.unregister("push").unwrap();

        let err = col
            .call(fc("push", json!({ "value": 4 })))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::FunctionNotFound { .. }));

        assert_eq!(data.lock().unwrap().as_slice(), &[1, 2, 3]);
    }
}
