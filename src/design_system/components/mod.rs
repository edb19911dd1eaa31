//! Component library introspection.
//!
//! Components live one per directory under `<design system>/components/`:
//!
//! ```text
//! components/
//! └── button/
//!     ├── button.tsx          main source (required)
//!     ├── button.stories.tsx  Storybook stories (optional)
//!     ├── button.types.ts     extra type definitions (optional)
//!     └── index.ts            re-exports (optional)
//! ```
//!
//! Nothing is cached. Every call reads the files as they are on disk now.

pub mod extract;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{DesignSystemError, DesignSystemResult};

/// Name of the sibling index file.
pub const INDEX_FILE: &str = "index.ts";

/// Metadata derived from a component's sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentInfo {
    /// Component (directory) name.
    pub name: String,
    /// Path relative to the design system's project root.
    pub path: String,
    /// Description from the doc comment or display name.
    pub description: String,
    /// Variant-group names, in declaration order.
    pub variants: Vec<String>,
    /// Whether `<name>.stories.tsx` exists.
    pub has_stories: bool,
    /// Whether `<name>.types.ts` exists.
    pub has_types: bool,
    /// Non-relative module dependencies, sorted.
    pub dependencies: Vec<String>,
    /// Props of the exported `...Props` declaration.
    pub props: Vec<ComponentProp>,
}

/// A single prop of a component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentProp {
    /// Prop name.
    pub name: String,
    /// Type expression as written (first line only).
    #[serde(rename = "type")]
    pub prop_type: String,
    /// `false` when declared with `?`.
    pub required: bool,
    /// Text of the prop's comment, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Raw source files of a component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentCode {
    /// Main `<name>.tsx` source.
    pub tsx: String,
    /// `index.ts`, when requested and present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
    /// `<name>.stories.tsx`, when requested and present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stories: Option<String>,
    /// `<name>.types.ts`, when requested and present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub types: Option<String>,
}

/// Which sibling files [`ComponentReader::component_code`] should include.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeOptions {
    /// Include `<name>.stories.tsx`.
    pub include_stories: bool,
    /// Include `<name>.types.ts`.
    pub include_types: bool,
    /// Include `index.ts`.
    pub include_index: bool,
}

impl Default for CodeOptions {
    fn default() -> Self {
        Self {
            include_stories: false,
            include_types: false,
            include_index: true,
        }
    }
}

/// Reads components from a design-system source directory.
#[derive(Debug, Clone)]
pub struct ComponentReader {
    base_path: PathBuf,
}

impl ComponentReader {
    /// Creates a reader for `<design_system_path>/components`.
    pub fn new(design_system_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: design_system_path.as_ref().join("components"),
        }
    }

    /// Directory holding the component folders.
    #[must_use]
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn component_dir(&self, name: &str) -> PathBuf {
        self.base_path.join(name)
    }

    fn main_file(&self, name: &str) -> PathBuf {
        self.component_dir(name).join(format!("{name}.tsx"))
    }

    fn stories_file(&self, name: &str) -> PathBuf {
        self.component_dir(name).join(format!("{name}.stories.tsx"))
    }

    fn types_file(&self, name: &str) -> PathBuf {
        self.component_dir(name).join(format!("{name}.types.ts"))
    }

    fn index_file(&self, name: &str) -> PathBuf {
        self.component_dir(name).join(INDEX_FILE)
    }

    /// Lists component directory names, sorted ascending.
    ///
    /// # Errors
    ///
    /// Returns an error if the components directory cannot be listed.
    pub async fn list_components(&self) -> DesignSystemResult<Vec<String>> {
        let list_err = |e| DesignSystemError::directory_read(&self.base_path, e);

        let mut entries = tokio::fs::read_dir(&self.base_path)
            .await
            .map_err(list_err)?;
        let mut names = Vec::new();

        while let Some(entry) = entries.next_entry().await.map_err(list_err)? {
            let is_dir = entry.file_type().await.is_ok_and(|t| t.is_dir());
            if is_dir {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }

        names.sort();
        Ok(names)
    }

    /// Reads a component's sources and extracts its metadata.
    ///
    /// # Errors
    ///
    /// Returns [`DesignSystemError::ComponentNotFound`] if the main source
    /// file does not exist, or a read error if it cannot be read.
    pub async fn component_info(&self, name: &str) -> DesignSystemResult<ComponentInfo> {
        let main_file = self.main_file(name);
        if !is_component_name(name) || !is_file(&main_file).await {
            return Err(DesignSystemError::component_not_found(name));
        }

        let stories_file = self.stories_file(name);
        let types_file = self.types_file(name);
        let index_file = self.index_file(name);
        let (source, has_stories, has_types, index) = tokio::join!(
            tokio::fs::read_to_string(&main_file),
            is_file(&stories_file),
            is_file(&types_file),
            read_optional(&index_file),
        );
        let source = source.map_err(|e| DesignSystemError::file_read(&main_file, e))?;

        Ok(ComponentInfo {
            name: name.to_string(),
            path: format!("src/components/{name}"),
            description: extract::description(&source),
            variants: extract::variants(&source),
            has_stories,
            has_types,
            dependencies: extract::dependencies(&source, index.as_deref()),
            props: extract::props(&source),
        })
    }

    /// Reads a component's source files.
    ///
    /// # Errors
    ///
    /// Returns [`DesignSystemError::ComponentNotFound`] if the main source
    /// file does not exist, or a read error if it cannot be read. Missing
    /// sibling files are never an error.
    pub async fn component_code(
        &self,
        name: &str,
        options: CodeOptions,
    ) -> DesignSystemResult<ComponentCode> {
        if !is_component_name(name) {
            return Err(DesignSystemError::component_not_found(name));
        }
        let main_file = self.main_file(name);
        let tsx = tokio::fs::read_to_string(&main_file)
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    DesignSystemError::component_not_found(name)
                } else {
                    DesignSystemError::file_read(&main_file, e)
                }
            })?;

        let (index, stories, types) = tokio::join!(
            read_if(options.include_index, self.index_file(name)),
            read_if(options.include_stories, self.stories_file(name)),
            read_if(options.include_types, self.types_file(name)),
        );

        Ok(ComponentCode {
            tsx,
            index,
            stories,
            types,
        })
    }

    /// Finds components by name.
    ///
    /// `query` is a case-insensitive substring match (empty matches all).
    /// `category` is compared for case-insensitive equality with the
    /// component's directory name; it is not a semantic grouping.
    ///
    /// # Errors
    ///
    /// Returns an error if the components directory cannot be listed.
    pub async fn search_components(
        &self,
        query: &str,
        category: Option<&str>,
    ) -> DesignSystemResult<Vec<ComponentInfo>> {
        let query = query.to_lowercase();
        let category = category.map(str::to_lowercase);

        let names: Vec<String> = self
            .list_components()
            .await?
            .into_iter()
            .filter(|name| {
                let name = name.to_lowercase();
                category.as_ref().map_or(true, |c| name == *c)
                    && (query.is_empty() || name.contains(&query))
            })
            .collect();

        Ok(self.collect_infos(names).await)
    }

    /// Returns info for every component that can be read.
    ///
    /// # Errors
    ///
    /// Returns an error if the components directory cannot be listed.
    pub async fn catalog(&self) -> DesignSystemResult<Vec<ComponentInfo>> {
        let names = self.list_components().await?;
        Ok(self.collect_infos(names).await)
    }

    /// Reads component infos concurrently, preserving the order of `names`.
    ///
    /// Components that fail are logged and left out.
    async fn collect_infos(&self, names: Vec<String>) -> Vec<ComponentInfo> {
        let handles: Vec<_> = names
            .into_iter()
            .map(|name| {
                let reader = self.clone();
                tokio::spawn(async move {
                    let result = reader.component_info(&name).await;
                    (name, result)
                })
            })
            .collect();

        let mut infos = Vec::with_capacity(handles.len());
        for handle in handles {
            match handle.await {
                Ok((_, Ok(info))) => infos.push(info),
                Ok((name, Err(e))) => {
                    tracing::warn!(component = %name, error = %e, "Skipping unreadable component");
                }
                Err(e) => tracing::error!(error = %e, "Component read task failed"),
            }
        }
        infos
    }
}

/// A component name must be a single path segment.
fn is_component_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .is_ok_and(|m| m.is_file())
}

async fn read_optional(path: &Path) -> Option<String> {
    tokio::fs::read_to_string(path).await.ok()
}

async fn read_if(wanted: bool, path: PathBuf) -> Option<String> {
    if wanted {
        read_optional(&path).await
    } else {
        None
    }
}
