//! Read-only resources exposed under the library's URI scheme.
//!
//! Every URI has the form `<library>://<path>`, where `<library>` is the
//! configured library name.

use serde::{Deserialize, Serialize};

/// MIME type of every resource body.
pub const JSON_MIME_TYPE: &str = "application/json";

/// The resources this server can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    /// Every readable component with its metadata.
    ComponentCatalog,
    /// Colour tokens of both themes plus their colour groups.
    ColorTokens,
    /// Theme sections extracted from the Tailwind config.
    TailwindConfig,
}

impl Resource {
    /// All resources, in listing order.
    pub const ALL: [Self; 3] = [Self::ComponentCatalog, Self::ColorTokens, Self::TailwindConfig];

    const fn path(self) -> &'static str {
        match self {
            Self::ComponentCatalog => "components/catalog",
            Self::ColorTokens => "design-tokens/colors",
            Self::TailwindConfig => "config/tailwind",
        }
    }

    /// Full URI under `library`'s scheme.
    #[must_use]
    pub fn uri(self, library: &str) -> String {
        format!("{library}://{}", self.path())
    }

    /// Resolves a URI, returning `None` for anything not served.
    #[must_use]
    pub fn from_uri(uri: &str, library: &str) -> Option<Self> {
        let path = uri.strip_prefix(library)?.strip_prefix("://")?;
        Self::ALL.into_iter().find(|r| r.path() == path)
    }

    /// Listing entry for `resources/list`.
    #[must_use]
    pub fn definition(self, library: &str) -> ResourceDefinition {
        let (name, description) = match self {
            Self::ComponentCatalog => (
                "Component Catalog",
                format!("All components of the {library} design system"),
            ),
            Self::ColorTokens => (
                "Design Tokens - Colors",
                "Colour tokens of the light and dark themes, grouped by colour family".to_string(),
            ),
            Self::TailwindConfig => (
                "Tailwind Config",
                "Theme sections of the design system's Tailwind config".to_string(),
            ),
        };

        ResourceDefinition {
            uri: self.uri(library),
            name: name.to_string(),
            description: Some(description),
            mime_type: JSON_MIME_TYPE.to_string(),
        }
    }
}

/// A resource entry in the `resources/list` response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDefinition {
    pub uri: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub mime_type: String,
}

/// Parameters of a `resources/read` request.
#[derive(Debug, Clone, Deserialize)]
pub struct ReadResourceParams {
    /// URI to read.
    pub uri: String,
}

/// One body in a `resources/read` response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceContents {
    pub uri: String,
    pub mime_type: String,
    pub text: String,
}

impl ResourceContents {
    /// JSON body for `uri`.
    #[must_use]
    pub fn json(uri: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            mime_type: JSON_MIME_TYPE.to_string(),
            text: text.into(),
        }
    }
}
