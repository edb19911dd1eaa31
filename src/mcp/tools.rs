//! Tool definitions and argument validation.
//!
//! `tools/call` arguments are decoded into a [`ToolRequest`] before anything
//! touches the design system. An unknown tool name is a protocol error; bad
//! arguments for a known tool become an error tool result.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use super::protocol::is_false;
use crate::design_system::{CodeOptions, TokenCategory, TokenFormat};
use crate::integration::{ComponentIntegrationRequest, IntegrationOptions};

/// Component categories accepted by `search_components`.
pub const COMPONENT_CATEGORIES: [&str; 5] = ["button", "input", "card", "typography", "label"];

/// A tool definition for the `tools/list` response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    /// Unique tool name.
    pub name: String,
    /// Human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON Schema for the tool's input parameters.
    pub input_schema: Value,
}

/// Parameters of a `tools/call` request.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallParams {
    /// Name of the tool to call.
    pub name: String,
    /// Arguments for the tool.
    #[serde(default)]
    pub arguments: Value,
}

/// Content item in a tool call response.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    /// Text content.
    Text {
        /// The text content.
        text: String,
    },
}

/// Result of a tool call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallResult {
    /// Content returned by the tool.
    pub content: Vec<ToolContent>,
    /// Whether the tool call resulted in an error.
    #[serde(skip_serializing_if = "is_false")]
    pub is_error: bool,
}

impl ToolCallResult {
    /// Creates a successful text result.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text { text: text.into() }],
            is_error: false,
        }
    }

    /// Creates an error text result.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: message.into(),
            }],
            is_error: true,
        }
    }

    /// Pretty-prints `value` as a successful result.
    #[must_use]
    pub fn json(value: &impl Serialize) -> Self {
        match serde_json::to_string_pretty(value) {
            Ok(text) => Self::text(text),
            Err(e) => Self::error(format!("Failed to serialise result: {e}")),
        }
    }

    /// Returns the text of the first content item.
    #[must_use]
    pub fn first_text(&self) -> Option<&str> {
        self.content.first().map(|ToolContent::Text { text }| text.as_str())
    }
}

/// Arguments of `search_components`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SearchArgs {
    /// Case-insensitive substring of the component name.
    #[serde(default)]
    pub query: Option<String>,
    /// Exact component directory name.
    ///
    /// The schema advertises [`COMPONENT_CATEGORIES`], but any string is
    /// accepted and simply matches nothing when no directory has that name.
    #[serde(default)]
    pub category: Option<String>,
}

/// Arguments of `get_component_code`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentCodeArgs {
    /// Component directory name.
    pub component_name: String,
    #[serde(default)]
    pub include_stories: bool,
    #[serde(default)]
    pub include_types: bool,
    #[serde(default = "default_true")]
    pub include_index: bool,
}

impl ComponentCodeArgs {
    /// Sibling-file selection for the reader.
    #[must_use]
    pub const fn code_options(&self) -> CodeOptions {
        CodeOptions {
            include_stories: self.include_stories,
            include_types: self.include_types,
            include_index: self.include_index,
        }
    }
}

const fn default_true() -> bool {
    true
}

/// Arguments of `get_design_tokens`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TokensArgs {
    /// Restrict to one category.
    #[serde(default)]
    pub category: Option<TokenCategory>,
    /// Output rendering.
    #[serde(default)]
    pub format: TokenFormat,
}

/// A validated tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolRequest {
    SearchComponents(SearchArgs),
    GetComponentCode(ComponentCodeArgs),
    GetDesignTokens(TokensArgs),
    ApplyThemeSetup(IntegrationOptions),
    IntegrateComponents(ComponentIntegrationRequest),
}

/// Why a `tools/call` could not be turned into a [`ToolRequest`].
#[derive(Debug, Error)]
pub enum ToolRequestError {
    /// No tool has this name.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// The arguments do not fit the tool's schema.
    #[error("Invalid arguments for {tool}: {source}")]
    InvalidArguments {
        /// Tool name.
        tool: &'static str,
        /// Decoding failure.
        #[source]
        source: serde_json::Error,
    },
}

impl ToolRequest {
    /// Validates a tool name and its arguments.
    ///
    /// Absent (`null`) arguments are treated as an empty object.
    ///
    /// # Errors
    ///
    /// Returns [`ToolRequestError::UnknownTool`] for an unknown name and
    /// [`ToolRequestError::InvalidArguments`] when the arguments do not decode.
    pub fn parse(name: &str, arguments: Value) -> Result<Self, ToolRequestError> {
        let arguments = if arguments.is_null() {
            json!({})
        } else {
            arguments
        };

        match name {
            "search_components" => decode("search_components", arguments).map(Self::SearchComponents),
            "get_component_code" => decode("get_component_code", arguments).map(Self::GetComponentCode),
            "get_design_tokens" => decode("get_design_tokens", arguments).map(Self::GetDesignTokens),
            "apply_theme_setup" => decode("apply_theme_setup", arguments).map(Self::ApplyThemeSetup),
            "integrate_components" => {
                decode("integrate_components", arguments).map(Self::IntegrateComponents)
            }
            _ => Err(ToolRequestError::UnknownTool(name.to_string())),
        }
    }

    /// Name of the tool this request targets.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SearchComponents(_) => "search_components",
            Self::GetComponentCode(_) => "get_component_code",
            Self::GetDesignTokens(_) => "get_design_tokens",
            Self::ApplyThemeSetup(_) => "apply_theme_setup",
            Self::IntegrateComponents(_) => "integrate_components",
        }
    }
}

fn decode<T: serde::de::DeserializeOwned>(
    tool: &'static str,
    arguments: Value,
) -> Result<T, ToolRequestError> {
    serde_json::from_value(arguments)
        .map_err(|source| ToolRequestError::InvalidArguments { tool, source })
}

/// Returns the definitions advertised by `tools/list`.
#[allow(clippy::too_many_lines)]
#[must_use]
pub fn definitions() -> Vec<ToolDefinition> {
    let framework = json!({
        "type": "string",
        "description": "Target framework",
        "enum": ["react", "next", "vite"],
        "default": "vite"
    });

    vec![
        ToolDefinition {
            name: "search_components".to_string(),
            description: Some(
                "Search the design system's components by name. Returns each match with \
                 its description, variants, props and dependencies."
                    .to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Case-insensitive substring of the component name"
                    },
                    "category": {
                        "type": "string",
                        "description": "Component category (matched against the component name)",
                        "enum": COMPONENT_CATEGORIES
                    }
                }
            }),
        },
        ToolDefinition {
            name: "get_component_code".to_string(),
            description: Some(
                "Get a component's source code and extracted metadata, optionally with its \
                 stories, type definitions and index file."
                    .to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "componentName": {
                        "type": "string",
                        "description": "Component name (its directory under components/)"
                    },
                    "includeStories": {
                        "type": "boolean",
                        "description": "Include the Storybook stories file",
                        "default": false
                    },
                    "includeTypes": {
                        "type": "boolean",
                        "description": "Include the type definitions file",
                        "default": false
                    },
                    "includeIndex": {
                        "type": "boolean",
                        "description": "Include index.ts",
                        "default": true
                    }
                },
                "required": ["componentName"]
            }),
        },
        ToolDefinition {
            name: "get_design_tokens".to_string(),
            description: Some(
                "Get the design tokens declared in the global stylesheet for the light and \
                 dark themes, as JSON, CSS custom properties or a JS module."
                    .to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "category": {
                        "type": "string",
                        "description": "Token category",
                        "enum": TokenCategory::ALL.map(TokenCategory::as_str)
                    },
                    "format": {
                        "type": "string",
                        "description": "Output format",
                        "enum": ["json", "css", "js"],
                        "default": "json"
                    }
                }
            }),
        },
        ToolDefinition {
            name: "apply_theme_setup".to_string(),
            description: Some(
                "Generate the theme setup files for a project: globals.css, Tailwind, \
                 TypeScript and framework configs, and the cn() utility. Files are returned, \
                 not written."
                    .to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "targetPath": {
                        "type": "string",
                        "description": "Path of the target project"
                    },
                    "framework": framework,
                    "typescript": {
                        "type": "boolean",
                        "description": "Generate tsconfig.json",
                        "default": true
                    },
                    "setupTailwind": {
                        "type": "boolean",
                        "description": "Set up Tailwind CSS v4",
                        "default": true
                    }
                },
                "required": ["targetPath"]
            }),
        },
        ToolDefinition {
            name: "integrate_components".to_string(),
            description: Some(
                "Generate the files needed to copy components into a project, with an \
                 index re-exporting them and the packages to install."
                    .to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "components": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Names of the components to integrate"
                    },
                    "targetPath": {
                        "type": "string",
                        "description": "Path of the target project"
                    },
                    "framework": framework,
                    "setupStorybook": {
                        "type": "boolean",
                        "description": "Include Storybook stories",
                        "default": false
                    }
                },
                "required": ["components", "targetPath"]
            }),
        },
    ]
}
