//! Best-effort extraction of theme sections from `tailwind.config.ts`.
//!
//! Each section (`colors: { ... }` and friends) is located by brace matching
//! and its top-level lines are read with a `key: value` heuristic. Entries whose
//! value is a nested object, computed, or spread over several lines are
//! dropped rather than reported.

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::design_system::text::{find_block, static_regex, top_level_lines};

static_regex!(colors_re, r"\bcolors:\s*\{");
static_regex!(spacing_re, r"\bspacing:\s*\{");
static_regex!(border_radius_re, r"\bborderRadius:\s*\{");
static_regex!(animation_re, r"\banimation:\s*\{");
static_regex!(keyframes_re, r"\bkeyframes:\s*\{");
static_regex!(entry_re, r#"^['"`]?([^'"`:\s]+)['"`]?\s*:\s*(.+?),?$"#);

/// Theme sections extracted from a Tailwind config.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TailwindConfig {
    /// Entries of `colors`.
    pub colors: IndexMap<String, String>,
    /// Entries of `spacing`.
    pub spacing: IndexMap<String, String>,
    /// Entries of `borderRadius`.
    pub border_radius: IndexMap<String, String>,
    /// Entries of `animation`.
    pub animation: IndexMap<String, String>,
    /// Entries of `keyframes`.
    pub keyframes: IndexMap<String, String>,
}

impl TailwindConfig {
    /// Extracts every known section from config source text.
    ///
    /// Never fails: a section that cannot be found is left empty.
    #[must_use]
    pub fn parse(content: &str) -> Self {
        let section = |re: &Regex| find_block(content, re).map(parse_entries).unwrap_or_default();

        Self {
            colors: section(colors_re()),
            spacing: section(spacing_re()),
            border_radius: section(border_radius_re()),
            animation: section(animation_re()),
            keyframes: section(keyframes_re()),
        }
    }

    /// Returns `true` if no section produced any entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
            && self.spacing.is_empty()
            && self.border_radius.is_empty()
            && self.animation.is_empty()
            && self.keyframes.is_empty()
    }
}

/// Parses the top-level `key: value` lines of an object body.
fn parse_entries(body: &str) -> IndexMap<String, String> {
    let mut entries = IndexMap::new();

    for line in top_level_lines(body) {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with("//") {
            continue;
        }

        let Some(caps) = entry_re().captures(trimmed) else {
            continue;
        };

        let value: String = caps[2].chars().filter(|c| !matches!(c, '\'' | '"' | '`')).collect();
        let value = value.strip_suffix(',').unwrap_or(&value).trim();
        if value.starts_with('{') || value.is_empty() {
            continue;
        }

        entries.insert(caps[1].to_string(), value.to_string());
    }

    entries
}
