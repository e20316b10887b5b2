//! Tool registry, parameter schemas and argument validation.

use crate::error::{ToolError, ToolResult};
use crate::protocol::{CallToolParams, CallToolResult, Tool};
use crate::tools::BuiltinTool;
use crate::tools::arithmetic::Number;
use serde_json::{Map, Value, json};
use std::borrow::Cow;
use tracing::debug;

/// Declared type of a tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Number,
    String,
}

impl ParamKind {
    /// JSON-Schema type name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::String => "string",
        }
    }

    fn matches(self, value: &Value) -> bool {
        match self {
            Self::Number => value.is_number(),
            Self::String => value.is_string(),
        }
    }
}

/// One entry of a tool's parameter schema.
#[derive(Debug, Clone)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub required: bool,
    pub default: Option<Value>,
    pub title: Option<&'static str>,
    pub description: Option<&'static str>,
}

impl ParamSpec {
    pub fn required(name: &'static str, kind: ParamKind) -> Self {
        Self {
            name,
            kind,
            required: true,
            default: None,
            title: None,
            description: None,
        }
    }

    pub fn optional(name: &'static str, kind: ParamKind, default: Value) -> Self {
        Self {
            name,
            kind,
            required: false,
            default: Some(default),
            title: None,
            description: None,
        }
    }

    pub fn title(mut self, title: &'static str) -> Self {
        self.title = Some(title);
        self
    }

    pub fn description(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    fn property(&self) -> Value {
        let mut property = Map::new();
        property.insert("type".into(), json!(self.kind.as_str()));
        if let Some(description) = self.description {
            property.insert("description".into(), json!(description));
        }
        if let Some(title) = self.title {
            property.insert("title".into(), json!(title));
        }
        if let Some(default) = &self.default {
            property.insert("default".into(), default.clone());
        }
        Value::Object(property)
    }
}

/// Render a parameter list as a JSON-Schema object.
pub fn input_schema(params: &[ParamSpec]) -> Value {
    let properties: Map<String, Value> = params
        .iter()
        .map(|p| (p.name.to_string(), p.property()))
        .collect();
    let required: Vec<&str> = params.iter().filter(|p| p.required).map(|p| p.name).collect();

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

/// Tool arguments checked against a parameter schema, with defaults filled in.
#[derive(Debug, Clone)]
pub struct Arguments {
    values: Map<String, Value>,
}

impl Arguments {
    /// Validate raw `arguments` against `params`.
    ///
    /// `null` counts as absent. Unknown keys are ignored.
    pub fn validate(params: &[ParamSpec], raw: &Value) -> ToolResult<Self> {
        let supplied = match raw {
            Value::Null => Map::new(),
            Value::Object(map) => map.clone(),
            other => {
                return Err(ToolError::InvalidArguments(format!(
                    "arguments must be an object, got {}",
                    other
                )));
            }
        };

        let mut values = Map::new();
        for spec in params {
            match supplied.get(spec.name).filter(|v| !v.is_null()) {
                Some(value) if spec.kind.matches(value) => {
                    values.insert(spec.name.to_string(), value.clone());
                }
                Some(_) => {
                    return Err(ToolError::InvalidType {
                        name: spec.name.into(),
                        expected: spec.kind.as_str(),
                    });
                }
                None => match (&spec.default, spec.required) {
                    (Some(default), _) => {
                        values.insert(spec.name.to_string(), default.clone());
                    }
                    (None, true) => {
                        return Err(ToolError::MissingArgument(spec.name.into()));
                    }
                    (None, false) => {}
                },
            }
        }

        Ok(Self { values })
    }

    pub fn number(&self, name: &'static str) -> ToolResult<Number> {
        self.values
            .get(name)
            .and_then(Number::from_json)
            .ok_or_else(|| self.missing_or_mistyped(name, ParamKind::Number))
    }

    pub fn string(&self, name: &'static str) -> ToolResult<&str> {
        self.values
            .get(name)
            .and_then(Value::as_str)
            .ok_or_else(|| self.missing_or_mistyped(name, ParamKind::String))
    }

    fn missing_or_mistyped(&self, name: &'static str, kind: ParamKind) -> ToolError {
        if self.values.contains_key(name) {
            ToolError::InvalidType {
                name: Cow::Borrowed(name),
                expected: kind.as_str(),
            }
        } else {
            ToolError::MissingArgument(Cow::Borrowed(name))
        }
    }
}

/// Ordered, read-only catalog of the tools this server exposes.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: Vec<BuiltinTool>,
}

impl ToolRegistry {
    pub fn new(tools: impl IntoIterator<Item = BuiltinTool>) -> Self {
        Self {
            tools: tools.into_iter().collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<BuiltinTool> {
        BuiltinTool::from_name(name).filter(|tool| self.tools.contains(tool))
    }

    pub fn list(&self) -> Vec<Tool> {
        self.tools.iter().map(|t| t.definition()).collect()
    }

    pub fn execute(&self, params: CallToolParams) -> ToolResult<CallToolResult> {
        let tool = self
            .get(&params.name)
            .ok_or_else(|| ToolError::NotFound(params.name.clone()))?;

        debug!("Executing tool: {}", tool.name());
        let text = tool.invoke(&params.arguments)?;
        Ok(CallToolResult::text(text))
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new(BuiltinTool::ALL)
    }
}
