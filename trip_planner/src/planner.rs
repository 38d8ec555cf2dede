//! The tool-calling loop that turns a [`TripRequest`] into an itinerary.

use fntool::{FunctionCall, ToolCollection, ToolError};
use serde_json::{Value, json};

use crate::chat::{ChatClient, ChatError};
use crate::config::DEFAULT_MAX_TOOL_ROUNDS;
use crate::prompt::{PromptError, SYSTEM_MESSAGE, TripRequest};

#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error(transparent)]
    Chat(#[from] ChatError),

    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error("model sent unparsable arguments for '{name}': {source}")]
    Arguments {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("model still calling tools after {0} rounds")]
    TooManyRounds(usize),
}

pub struct Planner<C> {
    chat: C,
    tools: ToolCollection,
    max_tool_rounds: usize,
}

impl<C: ChatClient> Planner<C> {
    pub fn new(chat: C, tools: ToolCollection) -> Self {
        Self {
            chat,
            tools,
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
        }
    }

    #[must_use]
    pub fn with_max_tool_rounds(mut self, rounds: usize) -> Self {
        self.max_tool_rounds = rounds;
        self
    }

    pub fn tools(&self) -> &ToolCollection {
        &self.tools
    }

    /// Plans the trip. The model is asked again after every tool call until
    /// its answer no longer opens with one.
    pub async fn plan(&self, request: &TripRequest) -> Result<String, PlannerError> {
        let prompt = request.prompt()?;
        let tools = self.tools.json()?;

        let mut input = vec![
            json!({ "role": "system", "content": SYSTEM_MESSAGE }),
            json!({ "role": "user", "content": prompt }),
        ];

        tracing::info!(destination = %request.destination, "planning trip");
        let mut response = self.chat.respond(&input, &tools).await?;
        let mut rounds = 0;

        while let Some(call) = response.leading_function_call()? {
            if rounds == self.max_tool_rounds {
                return Err(PlannerError::TooManyRounds(rounds));
            }
            rounds += 1;

            input.extend(response.output.iter().cloned());

            let arguments: Value =
                serde_json::from_str(&call.arguments).map_err(|source| PlannerError::Arguments {
                    name: call.name.clone(),
                    source,
                })?;
            tracing::info!(tool = %call.name, round = rounds, "model requested tool");

            let result = self
                .tools
                .call(FunctionCall::new(call.name, arguments).with_id(call.call_id.as_str()))
                .await?;

            input.push(json!({
                "type": "function_call_output",
                "call_id": call.call_id,
                "output": result.output_text(),
            }));

            response = self.chat.respond(&input, &tools).await?;
        }

        tracing::debug!(rounds, "model answered");
        Ok(response.output_text())
    }
}
