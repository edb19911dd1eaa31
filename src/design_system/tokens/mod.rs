//! Design-token extraction from the global stylesheet.
//!
//! Tokens are CSS custom properties declared in the `:root` (light theme) and
//! `.dark` (dark theme) blocks of `styles/globals.css`:
//!
//! ```css
//! :root {
//!   --background: 0 0% 100%;
//!   --primary: 217 91% 60%;
//!   --radius: 0.5rem;
//! }
//! ```
//!
//! Each declaration becomes a [`DesignToken`] whose category is derived from
//! its name alone. Values in the bare `H S% L%` form used by shadcn-style
//! themes are additionally decoded into an [`Hsl`] triple.

mod tailwind;

pub use tailwind::TailwindConfig;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{SecondsFormat, Utc};
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::text::static_regex;
use super::{DesignSystemError, DesignSystemResult};

/// Selector of the light-theme block.
pub const LIGHT_SELECTOR: &str = ":root";

/// Selector of the dark-theme block.
pub const DARK_SELECTOR: &str = ".dark";

/// Token names that are colours even though they do not contain "color".
const SEMANTIC_COLOR_NAMES: [&str; 12] = [
    "primary",
    "secondary",
    "destructive",
    "muted",
    "accent",
    "background",
    "foreground",
    "border",
    "input",
    "ring",
    "card",
    "popover",
];

/// Human-readable descriptions of the well-known theme tokens.
const TOKEN_DESCRIPTIONS: [(&str, &str); 20] = [
    ("background", "Main background colour"),
    ("foreground", "Main text colour"),
    ("primary", "Primary brand colour"),
    ("primary-foreground", "Text colour on primary backgrounds"),
    ("secondary", "Secondary colour"),
    ("secondary-foreground", "Text colour on secondary backgrounds"),
    ("destructive", "Colour for dangerous or destructive actions"),
    ("destructive-foreground", "Text colour on destructive backgrounds"),
    ("muted", "Muted background colour"),
    ("muted-foreground", "Muted text colour"),
    ("accent", "Accent colour"),
    ("accent-foreground", "Text colour on accent backgrounds"),
    ("border", "Border colour"),
    ("input", "Input field border colour"),
    ("ring", "Focus ring colour"),
    ("card", "Card background colour"),
    ("card-foreground", "Text colour on cards"),
    ("popover", "Popover background colour"),
    ("popover-foreground", "Text colour on popovers"),
    ("radius", "Default corner radius"),
];

static_regex!(declaration_re, r"--([^:]+):\s*([^;]+);");
static_regex!(
    hsl_re,
    r"^(\d+(?:\.\d+)?)\s+(\d+(?:\.\d+)?)%\s+(\d+(?:\.\d+)?)%$"
);

/// Classification bucket of a design token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenCategory {
    /// Colours.
    Color,
    /// Spacing, gaps, margins and paddings.
    Spacing,
    /// Corner radii.
    BorderRadius,
    /// Fonts and text.
    Typography,
    /// Shadows.
    Shadow,
    /// Animations and transitions.
    Animation,
    /// Anything else.
    Other,
}

impl TokenCategory {
    /// All categories in classification order.
    pub const ALL: [Self; 7] = [
        Self::Color,
        Self::Spacing,
        Self::BorderRadius,
        Self::Typography,
        Self::Shadow,
        Self::Animation,
        Self::Other,
    ];

    /// Returns the wire name of this category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::Spacing => "spacing",
            Self::BorderRadius => "border-radius",
            Self::Typography => "typography",
            Self::Shadow => "shadow",
            Self::Animation => "animation",
            Self::Other => "other",
        }
    }

    /// Classifies a token by name. The first matching rule wins.
    #[must_use]
    pub fn classify(name: &str) -> Self {
        let has = |needle: &str| name.contains(needle);

        if has("color") || SEMANTIC_COLOR_NAMES.contains(&name) {
            Self::Color
        } else if has("spacing") || has("gap") || has("margin") || has("padding") {
            Self::Spacing
        } else if has("radius") {
            Self::BorderRadius
        } else if has("font") || has("text") {
            Self::Typography
        } else if has("shadow") {
            Self::Shadow
        } else if has("animation") || has("transition") {
            Self::Animation
        } else {
            Self::Other
        }
    }
}

impl fmt::Display for TokenCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| {
                let names: Vec<_> = Self::ALL.iter().map(|c| c.as_str()).collect();
                format!(
                    "Unknown token category '{s}'. Must be one of: {}",
                    names.join(", ")
                )
            })
    }
}

/// An HSL colour triple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    /// Hue in degrees.
    pub h: f64,
    /// Saturation in percent.
    pub s: f64,
    /// Lightness in percent.
    pub l: f64,
}

impl Hsl {
    /// Parses a value of the form `"217 91% 60%"`.
    ///
    /// Returns `None` for anything else (`#fff`, `hsl(...)`, `0.5rem`, ...).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let caps = hsl_re().captures(value)?;
        Some(Self {
            h: caps[1].parse().ok()?,
            s: caps[2].parse().ok()?,
            l: caps[3].parse().ok()?,
        })
    }
}

/// A single design token parsed from the stylesheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignToken {
    /// Custom-property name without the leading `--`.
    pub name: String,
    /// Raw declared value.
    pub value: String,
    /// Category derived from the name.
    pub category: TokenCategory,
    /// Description of well-known tokens; empty for any other name.
    #[serde(default)]
    pub description: String,
    /// Decoded HSL triple, if the value is in `H S% L%` form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hsl: Option<Hsl>,
}

impl DesignToken {
    /// Builds a token from a declaration, deriving category, description and HSL.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        Self {
            category: TokenCategory::classify(&name),
            description: describe(&name).unwrap_or_default().to_string(),
            hsl: Hsl::parse(&value),
            name,
            value,
        }
    }
}

/// Returns the fixed description of a well-known token name.
#[must_use]
pub fn describe(name: &str) -> Option<&'static str> {
    TOKEN_DESCRIPTIONS
        .iter()
        .find(|(known, _)| *known == name)
        .map(|(_, description)| *description)
}

/// Light and dark theme tokens parsed from one stylesheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenCollection {
    /// Tokens from the `:root` block, in declaration order.
    pub light: IndexMap<String, DesignToken>,
    /// Tokens from the `.dark` block, in declaration order.
    pub dark: IndexMap<String, DesignToken>,
    /// Sorted categories present in the light theme.
    pub categories: Vec<TokenCategory>,
    /// RFC 3339 timestamp of the read.
    pub generated_at: String,
}

impl TokenCollection {
    /// Parses both theme blocks out of stylesheet text.
    #[must_use]
    pub fn from_css(css: &str) -> Self {
        let light = parse_tokens(css, LIGHT_SELECTOR);
        let dark = parse_tokens(css, DARK_SELECTOR);
        let categories = categories_of(&light);

        Self {
            light,
            dark,
            categories,
            generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    /// Returns a copy holding only tokens of `category` in both themes.
    #[must_use]
    pub fn filter_by_category(&self, category: TokenCategory) -> Self {
        let keep = |tokens: &IndexMap<String, DesignToken>| {
            tokens
                .iter()
                .filter(|(_, token)| token.category == category)
                .map(|(name, token)| (name.clone(), token.clone()))
                .collect()
        };

        Self {
            light: keep(&self.light),
            dark: keep(&self.dark),
            categories: vec![category],
            generated_at: self.generated_at.clone(),
        }
    }

    /// Total number of tokens across both themes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.light.len() + self.dark.len()
    }

    /// Returns `true` if neither theme has tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.light.is_empty() && self.dark.is_empty()
    }
}

/// Extracts the custom properties declared in the first block for `selector`.
///
/// Only the first occurrence of the selector is considered, and the block ends
/// at the first closing brace. A missing block yields an empty map.
#[must_use]
pub fn parse_tokens(css: &str, selector: &str) -> IndexMap<String, DesignToken> {
    let mut tokens = IndexMap::new();

    let pattern = format!(r"{}\s*\{{([^}}]+)\}}", regex::escape(selector));
    let Ok(block_re) = Regex::new(&pattern) else {
        return tokens;
    };
    let Some(block) = block_re.captures(css).and_then(|c| c.get(1)) else {
        return tokens;
    };

    for caps in declaration_re().captures_iter(block.as_str()) {
        let name = caps[1].trim();
        let value = caps[2].trim();
        tokens.insert(name.to_string(), DesignToken::new(name, value));
    }

    tokens
}

fn categories_of(tokens: &IndexMap<String, DesignToken>) -> Vec<TokenCategory> {
    let mut categories: Vec<TokenCategory> = tokens.values().map(|t| t.category).collect();
    categories.sort_by_key(|c| c.as_str());
    categories.dedup();
    categories
}

/// Returns the colour group a colour token belongs to.
#[must_use]
pub fn color_group(name: &str) -> &'static str {
    const PREFIX_GROUPS: [&str; 7] = [
        "primary",
        "secondary",
        "destructive",
        "muted",
        "accent",
        "card",
        "popover",
    ];

    if let Some(group) = PREFIX_GROUPS.into_iter().find(|g| name.starts_with(g)) {
        return group;
    }
    if name.contains("background") || name.contains("foreground") {
        return "base";
    }
    "system"
}

/// Output format for a rendered token collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenFormat {
    /// Pretty-printed JSON.
    #[default]
    Json,
    /// `:root` and `.dark` custom-property blocks.
    Css,
    /// An ES module exporting the collection.
    Js,
}

impl TokenFormat {
    /// Renders a collection in this format.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialisation fails.
    pub fn render(self, tokens: &TokenCollection) -> Result<String, serde_json::Error> {
        match self {
            Self::Json => serde_json::to_string_pretty(tokens),
            Self::Css => Ok(render_css(tokens)),
            Self::Js => Ok(format!(
                "export const designTokens = {};",
                serde_json::to_string_pretty(tokens)?
            )),
        }
    }
}

/// Renders both themes as custom-property blocks.
#[must_use]
pub fn render_css(tokens: &TokenCollection) -> String {
    let mut css = String::from(":root {\n");
    push_declarations(&mut css, &tokens.light);
    css.push_str("}\n\n.dark {\n");
    push_declarations(&mut css, &tokens.dark);
    css.push_str("}\n");
    css
}

pub(crate) fn push_declarations(css: &mut String, tokens: &IndexMap<String, DesignToken>) {
    for token in tokens.values() {
        css.push_str("  --");
        css.push_str(&token.name);
        css.push_str(": ");
        css.push_str(&token.value);
        css.push_str(";\n");
    }
}

/// Reads design tokens from a design-system source directory.
#[derive(Debug, Clone)]
pub struct TokenReader {
    base_path: PathBuf,
}

impl TokenReader {
    /// Creates a reader rooted at the design system's source directory.
    pub fn new(design_system_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: design_system_path.into(),
        }
    }

    /// Path of the global stylesheet.
    #[must_use]
    pub fn stylesheet_path(&self) -> PathBuf {
        self.base_path.join("styles").join("globals.css")
    }

    /// Path of the Tailwind config, one level above the source directory.
    #[must_use]
    pub fn tailwind_config_path(&self) -> PathBuf {
        self.base_path.join("..").join("tailwind.config.ts")
    }

    /// Reads the stylesheet and returns its tokens, optionally filtered.
    ///
    /// # Errors
    ///
    /// Returns an error if the stylesheet cannot be read.
    pub async fn design_tokens(
        &self,
        category: Option<TokenCategory>,
    ) -> DesignSystemResult<TokenCollection> {
        let css = read_text(&self.stylesheet_path()).await?;
        let collection = TokenCollection::from_css(&css);

        tracing::debug!(
            light = collection.light.len(),
            dark = collection.dark.len(),
            "Parsed design tokens"
        );

        Ok(match category {
            Some(category) => collection.filter_by_category(category),
            None => collection,
        })
    }

    /// Groups the colour tokens of both themes (light first) by colour family.
    ///
    /// # Errors
    ///
    /// Returns an error if the stylesheet cannot be read.
    pub async fn color_groups(&self) -> DesignSystemResult<IndexMap<String, Vec<DesignToken>>> {
        let tokens = self.design_tokens(Some(TokenCategory::Color)).await?;
        let mut groups: IndexMap<String, Vec<DesignToken>> = IndexMap::new();

        for token in tokens.light.values().chain(tokens.dark.values()) {
            groups
                .entry(color_group(&token.name).to_string())
                .or_default()
                .push(token.clone());
        }

        Ok(groups)
    }

    /// Returns the light-theme spacing tokens.
    ///
    /// # Errors
    ///
    /// Returns an error if the stylesheet cannot be read.
    pub async fn spacing_tokens(&self) -> DesignSystemResult<Vec<DesignToken>> {
        let tokens = self.design_tokens(Some(TokenCategory::Spacing)).await?;
        Ok(tokens.light.into_values().collect())
    }

    /// Reads the Tailwind config and extracts its theme sections.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read. Sections that do
    /// not match are left empty.
    pub async fn tailwind_config(&self) -> DesignSystemResult<TailwindConfig> {
        let content = read_text(&self.tailwind_config_path()).await?;
        Ok(TailwindConfig::parse(&content))
    }
}

async fn read_text(path: &Path) -> DesignSystemResult<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| DesignSystemError::file_read(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSS: &str = r"
@layer base {
  :root {
    --background: 0 0% 100%;
    --primary: 217 91% 60%;
    --radius: 0.5rem;
    --font-sans: Inter, sans-serif;
  }

  .dark {
    --background: 222.2 84% 4.9%;
    --primary: 217.2 91.2% 59.8%;
  }
}
";

    #[test]
    fn classify_examples() {
        assert_eq!(TokenCategory::classify("primary"), TokenCategory::Color);
        assert_eq!(TokenCategory::classify("spacing-sm"), TokenCategory::Spacing);
        assert_eq!(TokenCategory::classify("radius-lg"), TokenCategory::BorderRadius);
        assert_eq!(
            TokenCategory::classify("font-size-base"),
            TokenCategory::Typography
        );
        assert_eq!(TokenCategory::classify("box-shadow"), TokenCategory::Shadow);
        assert_eq!(
            TokenCategory::classify("fade-animation"),
            TokenCategory::Animation
        );
        assert_eq!(TokenCategory::classify("zz-unknown"), TokenCategory::Other);
    }

    #[test]
    fn classify_rule_order() {
        // "text-color" hits the colour rule before typography.
        assert_eq!(TokenCategory::classify("text-color"), TokenCategory::Color);
        // Semantic names only match exactly.
        assert_eq!(
            TokenCategory::classify("primary-foreground"),
            TokenCategory::Other
        );
        assert_eq!(TokenCategory::classify("card-gap"), TokenCategory::Spacing);
    }

    #[test]
    fn category_round_trips_through_str() {
        for category in TokenCategory::ALL {
            assert_eq!(category.as_str().parse::<TokenCategory>(), Ok(category));
        }
        assert!("colour".parse::<TokenCategory>().is_err());
    }

    #[test]
    fn category_serialises_kebab_case() {
        let json = serde_json::to_string(&TokenCategory::BorderRadius).unwrap();
        assert_eq!(json, r#""border-radius""#);
    }

    #[test]
    fn hsl_parsing() {
        assert_eq!(
            Hsl::parse("217 91% 60%"),
            Some(Hsl {
                h: 217.0,
                s: 91.0,
                l: 60.0
            })
        );
        assert_eq!(
            Hsl::parse("222.2 84% 4.9%"),
            Some(Hsl {
                h: 222.2,
                s: 84.0,
                l: 4.9
            })
        );
        assert_eq!(Hsl::parse("#fff"), None);
        assert_eq!(Hsl::parse("217 91 60"), None);
        assert_eq!(Hsl::parse("hsl(217 91% 60%)"), None);
    }

    #[test]
    fn descriptions_cover_known_names_only() {
        assert_eq!(describe("radius"), Some("Default corner radius"));
        assert!(describe("popover-foreground").is_some());
        assert_eq!(describe("spacing-sm"), None);

        let known = DesignToken::new("radius", "0.5rem");
        assert_eq!(known.description, "Default corner radius");

        let unknown = DesignToken::new("zz-unknown", "1px");
        assert_eq!(unknown.description, "");
        let json = serde_json::to_value(&unknown).unwrap();
        assert_eq!(json["description"], "");
    }

    #[test]
    fn parse_both_themes_in_order() {
        let tokens = TokenCollection::from_css(CSS);

        let light: Vec<_> = tokens.light.keys().map(String::as_str).collect();
        assert_eq!(light, vec!["background", "primary", "radius", "font-sans"]);
        assert_eq!(tokens.dark.len(), 2);
        assert_eq!(tokens.dark["primary"].value, "217.2 91.2% 59.8%");
        assert_eq!(
            tokens.categories,
            vec![
                TokenCategory::BorderRadius,
                TokenCategory::Color,
                TokenCategory::Typography
            ]
        );
    }

    #[test]
    fn missing_selector_yields_empty_theme() {
        let tokens = TokenCollection::from_css(":root { --primary: 0 0% 0%; }");
        assert_eq!(tokens.light.len(), 1);
        assert!(tokens.dark.is_empty());
    }

    #[test]
    fn only_first_selector_block_is_read() {
        let css = ":root { --a: 1; }\n:root { --b: 2; }";
        let tokens = parse_tokens(css, LIGHT_SELECTOR);
        assert_eq!(tokens.len(), 1);
        assert!(tokens.contains_key("a"));
    }

    #[test]
    fn filter_keeps_only_requested_category() {
        let tokens = TokenCollection::from_css(CSS);
        let colors = tokens.filter_by_category(TokenCategory::Color);

        assert_eq!(colors.light.len(), 2);
        assert_eq!(colors.dark.len(), 2);
        assert_eq!(colors.categories, vec![TokenCategory::Color]);
        assert_eq!(colors.generated_at, tokens.generated_at);
        assert_eq!(colors.filter_by_category(TokenCategory::Color), colors);
    }

    #[test]
    fn filter_with_no_matches_is_empty() {
        let tokens = TokenCollection::from_css(CSS);
        let shadows = tokens.filter_by_category(TokenCategory::Shadow);
        assert!(shadows.is_empty());
        assert_eq!(shadows.categories, vec![TokenCategory::Shadow]);
    }

    #[test]
    fn color_groups_by_prefix() {
        assert_eq!(color_group("primary-foreground"), "primary");
        assert_eq!(color_group("card"), "card");
        assert_eq!(color_group("background"), "base");
        assert_eq!(color_group("ring"), "system");
    }

    #[test]
    fn render_css_lists_both_themes() {
        let tokens = TokenCollection::from_css(CSS);
        let css = render_css(&tokens);
        assert!(css.starts_with(":root {\n  --background: 0 0% 100%;\n"));
        assert!(css.contains(".dark {\n  --background: 222.2 84% 4.9%;\n"));
        assert!(css.ends_with("}\n"));
    }

    #[test]
    fn render_js_wraps_json() {
        let tokens = TokenCollection::from_css(CSS);
        let js = TokenFormat::Js.render(&tokens).unwrap();
        assert!(js.starts_with("export const designTokens = {"));
        assert!(js.ends_with("};"));
        assert!(js.contains(r#""generatedAt""#));
    }
}
