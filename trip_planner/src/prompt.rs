//! Prompt text for the planner.

use std::collections::HashMap;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PromptError {
    #[error("missing value for prompt variable '{0}'")]
    MissingVariable(String),

    #[error("placeholder '{{{0}}}' is not a declared input variable")]
    UndeclaredPlaceholder(String),

    #[error("unbalanced brace at byte {0} of the template")]
    UnbalancedBrace(usize),
}

/// A template with `{name}` placeholders. `{{` and `}}` stand for literal
/// braces. Only declared input variables may appear as placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    pub template: String,
    pub input_variables: Vec<String>,
}

impl PromptTemplate {
    pub fn new<I, S>(template: impl Into<String>, input_variables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            template: template.into(),
            input_variables: input_variables.into_iter().map(Into::into).collect(),
        }
    }

    /// Renders the template. Every declared variable must have a value;
    /// extra values are ignored.
    pub fn generate(&self, values: &HashMap<&str, &str>) -> Result<String, PromptError> {
        if let Some(missing) = self
            .input_variables
            .iter()
            .find(|name| !values.contains_key(name.as_str()))
        {
            return Err(PromptError::MissingVariable(missing.clone()));
        }

        let mut out = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();
        let mut offset = 0;

        while let Some(pos) = rest.find(['{', '}']) {
            out.push_str(&rest[..pos]);
            let tail = &rest[pos..];

            if tail.starts_with("{{") || tail.starts_with("}}") {
                out.push_str(&tail[..1]);
                rest = &tail[2..];
                offset += pos + 2;
                continue;
            }
            if tail.starts_with('}') {
                return Err(PromptError::UnbalancedBrace(offset + pos));
            }

            let Some(end) = tail.find('}') else {
                return Err(PromptError::UnbalancedBrace(offset + pos));
            };
            let name = &tail[1..end];
            if !self.input_variables.iter().any(|declared| declared == name) {
                return Err(PromptError::UndeclaredPlaceholder(name.to_owned()));
            }
            // Declared names are checked above.
            if let Some(value) = values.get(name) {
                out.push_str(value);
            }
            rest = &tail[end + 1..];
            offset += pos + end + 1;
        }
        out.push_str(rest);

        Ok(out)
    }
}

pub const TRIP_TEMPLATE: &str = "I want to travel to {destination} from {origin} on {departure_date} and return on {return_date}. I prefer {preferences}";

pub const SYSTEM_MESSAGE: &str = r#"
You are an AI travel planner. The user will provide all their vacation details in a single prompt. Your job is to:

1. Use the provided details to search for the best flights and hotels using your tools.
2. Summarize the results in a neatly formatted, easy-to-read itinerary.
3. Do not ask the user any questions or request clarification—just use the information given.
4. Make the itinerary clear, helpful, and a little bit fun!

Example flow:
- Receive the user's vacation details (destination, dates, preferences, etc.).
- Use your flight tool to find the best flight options.
- Use your hotel search tools to find the best options.
- Present a summary itinerary like:

---
**Your Adventure Awaits!**
- Destination: Chennai, India
- Dates: 2025-10-30 to 2025-11-10

✈️ **Flight Options:**
1. [Flight details here]

Day 1:
🏨 **Hotel Options:**
1. [Hotel details here]
2. List of things to do

Day 2:
🏨 **Hotel Options:**
1. [Hotel details here]
2. List of things to do

Day 3:
🏨 **Hotel Options:**
1. [Hotel details here]
2. List of things to do

Have a fantastic trip!
---

Only return the final itinerary—no follow-up questions or conversation needed.
Always call the flight tool first, then the hotel tool. Do not give me a response until you have called both tools.
"#;

pub fn trip_template() -> PromptTemplate {
    PromptTemplate::new(
        TRIP_TEMPLATE,
        [
            "destination",
            "origin",
            "departure_date",
            "return_date",
            "preferences",
        ],
    )
}

/// What the traveller asked for. Dates stay free text; the model reads them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripRequest {
    pub destination: String,
    pub origin: String,
    pub departure_date: String,
    pub return_date: String,
    pub preferences: String,
}

impl TripRequest {
    pub fn prompt(&self) -> Result<String, PromptError> {
        let values = HashMap::from([
            ("destination", self.destination.as_str()),
            ("origin", self.origin.as_str()),
            ("departure_date", self.departure_date.as_str()),
            ("return_date", self.return_date.as_str()),
            ("preferences", self.preferences.as_str()),
        ]);
        trip_template().generate(&values)
    }
}
