//! Built-in tool definitions and registry.

pub mod arithmetic;
pub mod greeting;
pub mod registry;

pub use greeting::Language;
pub use registry::{Arguments, ParamKind, ParamSpec, ToolRegistry, input_schema};

use crate::error::ToolResult;
use crate::protocol::Tool;
use serde_json::{Value, json};

/// The closed set of tools this server exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinTool {
    AddNumbers,
    MultiplyNumbers,
    GetGreeting,
}

impl BuiltinTool {
    /// Catalog order, as reported by `tools/list`.
    pub const ALL: [BuiltinTool; 3] = [Self::AddNumbers, Self::MultiplyNumbers, Self::GetGreeting];

    pub fn name(self) -> &'static str {
        match self {
            Self::AddNumbers => "add_numbers",
            Self::MultiplyNumbers => "multiply_numbers",
            Self::GetGreeting => "get_greeting",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::AddNumbers => "두 숫자를 더합니다",
            Self::MultiplyNumbers => "두 숫자를 곱합니다",
            Self::GetGreeting => "인사말을 생성합니다",
        }
    }

    pub fn params(self) -> Vec<ParamSpec> {
        match self {
            Self::AddNumbers => vec![
                ParamSpec::required("a", ParamKind::Number)
                    .title("숫자 A")
                    .description("첫 번째 숫자"),
                ParamSpec::required("b", ParamKind::Number)
                    .title("숫자 B")
                    .description("두 번째 숫자"),
            ],
            Self::MultiplyNumbers => vec![
                ParamSpec::required("x", ParamKind::Number)
                    .title("숫자 X")
                    .description("첫 번째 숫자"),
                ParamSpec::required("y", ParamKind::Number)
                    .title("숫자 Y")
                    .description("두 번째 숫자"),
            ],
            Self::GetGreeting => vec![
                ParamSpec::required("name", ParamKind::String)
                    .title("이름")
                    .description("이름"),
                ParamSpec::optional(
                    "language",
                    ParamKind::String,
                    json!(Language::default().code()),
                )
                .title("언어")
                .description("언어 (ko, en)"),
            ],
        }
    }

    pub fn definition(self) -> Tool {
        Tool {
            name: self.name().into(),
            description: Some(self.description().into()),
            input_schema: input_schema(&self.params()),
        }
    }

    /// Validate `arguments` and run the tool.
    pub fn invoke(self, arguments: &Value) -> ToolResult<String> {
        let args = Arguments::validate(&self.params(), arguments)?;
        let text = match self {
            Self::AddNumbers => arithmetic::add_numbers(args.number("a")?, args.number("b")?),
            Self::MultiplyNumbers => {
                arithmetic::multiply_numbers(args.number("x")?, args.number("y")?)
            }
            Self::GetGreeting => {
                let language = Language::try_from(args.string("language")?)?;
                greeting::get_greeting(args.string("name")?, language)
            }
        };
        Ok(text)
    }
}

/// Create the registry of all built-in tools.
pub fn create_registry() -> ToolRegistry {
    ToolRegistry::new(BuiltinTool::ALL)
}
