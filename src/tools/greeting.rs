//! `get_greeting`.

use crate::error::ToolError;

/// Supported greeting languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    Korean,
    English,
}

impl Language {
    /// Parse a language code. Only `ko` and `en` are recognised.
    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "ko" => Some(Self::Korean),
            "en" => Some(Self::English),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::Korean => "ko",
            Self::English => "en",
        }
    }
}

impl TryFrom<&str> for Language {
    type Error = ToolError;

    fn try_from(code: &str) -> Result<Self, Self::Error> {
        Self::parse(code).ok_or_else(|| ToolError::UnsupportedValue {
            name: "language".into(),
            value: format!("'{}' (supported: ko, en)", code),
        })
    }
}

pub fn get_greeting(name: &str, language: Language) -> String {
    match language {
        Language::Korean => format!("안녕하세요, {}님!", name),
        Language::English => format!("Hello, {}!", name),
    }
}
