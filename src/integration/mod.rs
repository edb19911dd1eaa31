//! Integration file generation for consumer projects.
//!
//! The [`IntegrationManager`] combines the design-system readers with the
//! [`templates`] to produce the files a consumer project needs. Files are
//! returned as data; writing them is the caller's job.
//!
//! Both entry points are infallible at their boundary: any error becomes an
//! [`IntegrationResult`] with `success: false` and no files, instructions or
//! dependencies.

pub mod templates;

use std::path::Path;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::design_system::{CodeOptions, ComponentReader, DesignSystemError, TokenReader};

/// Tailwind packages installed by the theme setup.
pub const TAILWIND_PACKAGES: [&str; 2] = ["@tailwindcss/vite@4.0.0-beta.7", "tailwindcss@4.0.0-beta.7"];

/// Packages every theme setup needs for the `cn` helper and variants.
pub const UTILITY_PACKAGES: [&str; 3] = ["clsx", "tailwind-merge", "class-variance-authority"];

/// Packages every integrated component set needs, whatever the components.
pub const BASELINE_COMPONENT_PACKAGES: [&str; 4] = [
    "@radix-ui/react-slot",
    "class-variance-authority",
    "clsx",
    "tailwind-merge",
];

/// Packages added when Storybook stories are integrated.
pub const STORYBOOK_PACKAGES: [&str; 2] = ["@storybook/react", "storybook"];

/// Target framework of the consumer project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Framework {
    /// Plain React, no bundler config generated.
    React,
    /// Next.js.
    Next,
    /// Vite.
    #[default]
    Vite,
}

/// Options for theme setup and component integration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationOptions {
    /// Root of the consumer project.
    pub target_path: String,
    /// Target framework.
    #[serde(default)]
    pub framework: Framework,
    /// Generate `tsconfig.json`.
    #[serde(default = "default_true")]
    pub typescript: bool,
    /// Generate `globals.css` and `tailwind.config.ts`.
    #[serde(default = "default_true")]
    pub setup_tailwind: bool,
    /// Include Storybook stories and packages.
    #[serde(default)]
    pub setup_storybook: bool,
}

const fn default_true() -> bool {
    true
}

/// A request to copy components into a consumer project.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentIntegrationRequest {
    /// Component names, in the order they should be exported.
    pub components: Vec<String>,
    /// Options shared with theme setup.
    #[serde(flatten)]
    pub options: IntegrationOptions,
}

/// What the caller should do with a generated file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileAction {
    /// Create a new file.
    Create,
    /// Update an existing file.
    Update,
}

/// A file produced by the generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedFile {
    /// Path relative to the target project.
    pub path: String,
    /// Full file content.
    pub content: String,
    /// Create or update.
    pub action: FileAction,
}

impl GeneratedFile {
    /// A file to be created.
    pub fn create(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            action: FileAction::Create,
        }
    }
}

/// Outcome of a generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationResult {
    /// Whether generation succeeded.
    pub success: bool,
    /// Human-readable summary.
    pub message: String,
    /// Files to write.
    pub files: Vec<GeneratedFile>,
    /// Steps for the user, in order.
    pub instructions: Vec<String>,
    /// Packages to install, for display.
    pub dependencies: Vec<String>,
}

impl IntegrationResult {
    /// A failed result carrying only a message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            files: Vec::new(),
            instructions: Vec::new(),
            dependencies: Vec::new(),
        }
    }
}

/// Errors raised while generating. Never escapes the public entry points.
#[derive(Debug, Error)]
enum IntegrationError {
    #[error("{0}")]
    InvalidRequest(&'static str),

    #[error("{}", .0.detailed())]
    DesignSystem(#[from] DesignSystemError),

    #[error("failed to serialise {file}: {source}")]
    Serialise {
        file: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Generates integration files from the design system.
#[derive(Debug, Clone)]
pub struct IntegrationManager {
    components: ComponentReader,
    tokens: TokenReader,
    library_name: String,
}

impl IntegrationManager {
    /// Creates a manager reading from the design system at `design_system_path`.
    pub fn new(design_system_path: impl AsRef<Path>, library_name: impl Into<String>) -> Self {
        let path = design_system_path.as_ref();
        Self {
            components: ComponentReader::new(path),
            tokens: TokenReader::new(path),
            library_name: library_name.into(),
        }
    }

    /// Generates theme files (stylesheet, Tailwind, TypeScript and framework
    /// configs, utilities) for a consumer project.
    ///
    /// Only `styles/globals.css` is read from the design system. The
    /// generated `tailwind.config.ts` carries fixed colour and radius
    /// mappings onto the token variables rather than a copy of the design
    /// system's own Tailwind config, so that file may be absent. Clients
    /// wanting the library's exact theme read the `config/tailwind`
    /// resource.
    pub async fn apply_theme_setup(&self, options: &IntegrationOptions) -> IntegrationResult {
        match self.try_apply_theme_setup(options).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(error = %e, "Theme setup generation failed");
                IntegrationResult::failure(format!("Failed to generate theme setup: {e}"))
            }
        }
    }

    /// Generates component source files and an aggregating index for a
    /// consumer project.
    pub async fn integrate_components(
        &self,
        request: &ComponentIntegrationRequest,
    ) -> IntegrationResult {
        match self.try_integrate_components(request).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(error = %e, "Component integration failed");
                IntegrationResult::failure(format!("Failed to integrate components: {e}"))
            }
        }
    }

    async fn try_apply_theme_setup(
        &self,
        options: &IntegrationOptions,
    ) -> Result<IntegrationResult, IntegrationError> {
        validate_target(&options.target_path)?;

        let mut files = Vec::new();
        let mut instructions = Vec::new();
        let mut dependencies: Vec<String> = Vec::new();

        if options.setup_tailwind {
            let tokens = self.tokens.design_tokens(None).await?;

            files.push(GeneratedFile::create(
                "src/styles/globals.css",
                templates::global_css(&tokens),
            ));
            files.push(GeneratedFile::create(
                "tailwind.config.ts",
                templates::tailwind_config(options),
            ));

            dependencies.extend(TAILWIND_PACKAGES.map(String::from));
            instructions.push(format!("npm install {}", TAILWIND_PACKAGES.join(" ")));
        }

        if options.typescript {
            let tsconfig = serde_json::to_string_pretty(&templates::tsconfig(options.framework))
                .map_err(|source| IntegrationError::Serialise {
                    file: "tsconfig.json",
                    source,
                })?;
            files.push(GeneratedFile::create("tsconfig.json", tsconfig));
        }

        match options.framework {
            Framework::Vite => {
                files.push(GeneratedFile::create("vite.config.ts", templates::vite_config()));
                dependencies.extend(["@vitejs/plugin-react", "vite"].map(String::from));
            }
            Framework::Next => {
                files.push(GeneratedFile::create("next.config.js", templates::next_config()));
                dependencies.extend(["next", "react", "react-dom"].map(String::from));
            }
            Framework::React => {}
        }

        files.push(GeneratedFile::create(
            "src/lib/utils.ts",
            templates::utils_module(),
        ));
        dependencies.extend(UTILITY_PACKAGES.map(String::from));

        instructions.extend(
            [
                "1. Install the dependencies",
                "2. Import globals.css as the main stylesheet",
                "3. Configure the Tailwind CSS v4 Vite plugin",
                "4. Enable dark mode by toggling the .dark class",
            ]
            .map(String::from),
        );

        tracing::info!(
            target_path = %options.target_path,
            files = files.len(),
            "Generated theme setup"
        );

        Ok(IntegrationResult {
            success: true,
            message: format!("Theme setup generated for {}", options.target_path),
            files,
            instructions,
            dependencies,
        })
    }

    async fn try_integrate_components(
        &self,
        request: &ComponentIntegrationRequest,
    ) -> Result<IntegrationResult, IntegrationError> {
        let options = &request.options;
        validate_target(&options.target_path)?;
        if request.components.is_empty() {
            return Err(IntegrationError::InvalidRequest(
                "at least one component is required",
            ));
        }

        let code_options = CodeOptions {
            include_stories: options.setup_storybook,
            include_types: false,
            include_index: true,
        };

        let mut files = Vec::new();
        let mut dependencies: IndexSet<String> =
            BASELINE_COMPONENT_PACKAGES.map(String::from).into_iter().collect();

        for name in &request.components {
            let (info, code) = tokio::join!(
                self.components.component_info(name),
                self.components.component_code(name, code_options),
            );
            let (info, code) = (info?, code?);

            files.extend(templates::component_files(
                name,
                &code,
                options.setup_storybook,
            ));
            dependencies.extend(info.dependencies);
        }

        files.push(GeneratedFile::create(
            "src/components/index.ts",
            templates::main_index(&self.library_name, &request.components),
        ));

        if options.setup_storybook {
            dependencies.extend(STORYBOOK_PACKAGES.map(String::from));
        }
        let dependencies: Vec<String> = dependencies.into_iter().collect();

        let mut instructions = vec![
            format!("1. Install dependencies: npm install {}", dependencies.join(" ")),
            "2. Import globals.css to apply Tailwind CSS v4".to_string(),
            "3. Use components via: import { ComponentName } from \"./components\"".to_string(),
            "4. Control dark mode with the .dark class".to_string(),
        ];
        if options.setup_storybook {
            instructions.push("5. Initialise Storybook with: npx storybook init".to_string());
        }

        tracing::info!(
            target_path = %options.target_path,
            components = request.components.len(),
            files = files.len(),
            "Integrated components"
        );

        Ok(IntegrationResult {
            success: true,
            message: format!(
                "Integrated {} component(s) into {}",
                request.components.len(),
                options.target_path
            ),
            files,
            instructions,
            dependencies,
        })
    }
}

fn validate_target(target_path: &str) -> Result<(), IntegrationError> {
    if target_path.trim().is_empty() {
        return Err(IntegrationError::InvalidRequest("targetPath must not be empty"));
    }
    Ok(())
}
