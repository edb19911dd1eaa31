//! Heuristic metadata extraction from component source text.
//!
//! Every pass is independent and total: when its pattern does not match, it
//! returns an empty value instead of an error.
//!
//! Known limitations, kept on purpose:
//!
//! - Only single-line `import`/`export ... from` statements are seen.
//! - Variant groups are read one level deep.
//! - A prop's type is whatever follows the colon on its first line.

use super::ComponentProp;
use crate::design_system::text::{find_block, static_regex, top_level_lines};

static_regex!(doc_comment_re, r"(?s)/\*\*(.*?)\*/");
static_regex!(
    display_name_re,
    r#"\.displayName\s*=\s*['"`]([^'"`]+)['"`]"#
);
static_regex!(variants_re, r"variants:\s*\{");
static_regex!(variant_group_re, r"^(\w+):\s*\{");
static_regex!(
    import_re,
    r#"(?m)^import\s+.*?\s+from\s+['"`]([^'"`]+)['"`]"#
);
static_regex!(
    reexport_re,
    r#"(?m)^export\s+.*?\s+from\s+['"`]([^'"`]+)['"`]"#
);
static_regex!(
    props_re,
    r"export\s+(?:interface\s+\w+Props\b[^{]*|type\s+\w+Props\s*=\s*)\{"
);
static_regex!(prop_re, r"^(\w+)(\?)?:\s*([^;,]+)");
static_regex!(inline_doc_re, r"/\*\*(.*?)\*/");
static_regex!(line_comment_re, r"//\s*(.+)");

/// Extracts the component description.
///
/// Prefers the first `/** ... */` block; falls back to a `displayName`
/// assignment rendered as `"<Name> component"`.
#[must_use]
pub fn description(source: &str) -> String {
    if let Some(caps) = doc_comment_re().captures(source) {
        return caps[1]
            .replace('*', "")
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
    }

    display_name_re()
        .captures(source)
        .map(|caps| format!("{} component", &caps[1]))
        .unwrap_or_default()
}

/// Extracts the variant-group names declared in a `variants: { ... }` literal.
#[must_use]
pub fn variants(source: &str) -> Vec<String> {
    let Some(body) = find_block(source, variants_re()) else {
        return Vec::new();
    };

    top_level_lines(body)
        .into_iter()
        .filter_map(|line| variant_group_re().captures(line.trim()))
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Collects non-relative module targets from imports in `source` and
/// re-exports in the sibling `index` file, sorted and deduplicated.
#[must_use]
pub fn dependencies(source: &str, index: Option<&str>) -> Vec<String> {
    let imports = import_re().captures_iter(source);
    let reexports = index
        .into_iter()
        .flat_map(|index| reexport_re().captures_iter(index));

    let mut modules: Vec<String> = imports
        .chain(reexports)
        .map(|caps| caps[1].to_string())
        .filter(|module| !module.starts_with('.') && !module.starts_with('/'))
        .collect();

    modules.sort();
    modules.dedup();
    modules
}

/// Extracts prop definitions from the exported `...Props` interface or type.
#[must_use]
pub fn props(source: &str) -> Vec<ComponentProp> {
    let Some(body) = find_block(source, props_re()) else {
        return Vec::new();
    };

    let mut props = Vec::new();
    let mut pending = PendingComment::default();

    for line in top_level_lines(body) {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            pending.clear();
            continue;
        }

        let split = if pending.in_block {
            None
        } else {
            split_leading_comment(trimmed)
        };
        let (leading, decl) = match split {
            Some((comment, decl)) => (comment, decl),
            None if pending.absorb(trimmed) => continue,
            None => (None, trimmed),
        };

        let Some(caps) = prop_re().captures(decl) else {
            pending.clear();
            continue;
        };

        props.push(ComponentProp {
            name: caps[1].to_string(),
            prop_type: caps[3].trim().to_string(),
            required: caps.get(2).is_none(),
            description: leading
                .or_else(|| inline_comment(decl))
                .or_else(|| pending.take()),
        });
        pending.clear();
    }

    props
}

/// Splits `/** text */ decl` into the comment text and the declaration.
///
/// Returns `None` unless a closed block comment is followed by more text.
fn split_leading_comment(line: &str) -> Option<(Option<String>, &str)> {
    let (comment, decl) = line.strip_prefix("/*")?.split_once("*/")?;
    let decl = decl.trim();
    if decl.is_empty() {
        return None;
    }

    let comment = comment.trim_start_matches('*').trim();
    Some(((!comment.is_empty()).then(|| comment.to_string()), decl))
}

/// Returns the text of a `/** ... */` or `// ...` comment on the same line.
fn inline_comment(line: &str) -> Option<String> {
    inline_doc_re()
        .captures(line)
        .or_else(|| line_comment_re().captures(line))
        .map(|caps| caps[1].trim().to_string())
        .filter(|text| !text.is_empty())
}

/// Comment text seen on the lines just above a prop.
#[derive(Debug, Default)]
struct PendingComment {
    lines: Vec<String>,
    in_block: bool,
}

impl PendingComment {
    /// Consumes `line` if it is (part of) a comment.
    fn absorb(&mut self, line: &str) -> bool {
        if self.in_block {
            if let Some(rest) = line.strip_suffix("*/") {
                self.in_block = false;
                self.push(rest);
            } else {
                self.push(line);
            }
            return true;
        }

        if let Some(rest) = line.strip_prefix("//") {
            self.lines.clear();
            self.push(rest);
            return true;
        }

        if let Some(rest) = line.strip_prefix("/*") {
            self.lines.clear();
            if let Some(inner) = rest.strip_suffix("*/") {
                self.push(inner);
            } else {
                self.in_block = true;
                self.push(rest);
            }
            return true;
        }

        // Stray block-comment continuation lines.
        line.starts_with('*')
    }

    fn push(&mut self, text: &str) {
        let text = text.trim_start_matches('*').trim();
        if !text.is_empty() {
            self.lines.push(text.to_string());
        }
    }

    fn take(&mut self) -> Option<String> {
        if self.lines.is_empty() {
            return None;
        }
        Some(std::mem::take(&mut self.lines).join(" "))
    }

    fn clear(&mut self) {
        self.lines.clear();
        self.in_block = false;
    }
}
