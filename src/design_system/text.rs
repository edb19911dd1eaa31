//! Bounded text-scanning helpers shared by the token and component readers.
//!
//! None of this is a parser. Braces are counted byte by byte without regard
//! for strings or comments, which is good enough for the object literals found
//! in component sources and Tailwind configs.

use regex::Regex;

/// Declares a function returning a lazily compiled, process-wide regex.
macro_rules! static_regex {
    ($(#[$meta:meta])* $name:ident, $pattern:expr) => {
        $(#[$meta])*
        fn $name() -> &'static regex::Regex {
            static RE: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
            RE.get_or_init(|| regex::Regex::new($pattern).expect("static regex must compile"))
        }
    };
}

pub(crate) use static_regex;

/// Returns the text strictly between the `{` at byte offset `open` and its
/// matching `}`.
///
/// Returns `None` if `open` is not a `{` or the block is never closed.
#[must_use]
pub fn brace_block(text: &str, open: usize) -> Option<&str> {
    let bytes = text.as_bytes();
    if bytes.get(open) != Some(&b'{') {
        return None;
    }

    let mut depth = 0usize;
    for (i, &b) in bytes.iter().enumerate().skip(open) {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[open + 1..i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Finds the first match of `opener` (a pattern ending in `{`) and returns the
/// body of the block it opens.
#[must_use]
pub fn find_block<'a>(text: &'a str, opener: &Regex) -> Option<&'a str> {
    let m = opener.find(text)?;
    let open = m.as_str().rfind('{').map(|i| m.start() + i)?;
    brace_block(text, open)
}

/// Returns the lines of a block body that start at nesting depth zero.
///
/// A line opening a nested object is itself returned; the lines inside that
/// object are not.
#[must_use]
pub fn top_level_lines(block: &str) -> Vec<&str> {
    let mut depth = 0usize;
    let mut lines = Vec::new();

    for line in block.lines() {
        if depth == 0 {
            lines.push(line);
        }
        let opens = line.matches('{').count();
        let closes = line.matches('}').count();
        depth = (depth + opens).saturating_sub(closes);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brace_block_handles_nesting() {
        let text = "x = { a: { b: 1 }, c: 2 } tail";
        let open = text.find('{').unwrap();
        assert_eq!(brace_block(text, open), Some(" a: { b: 1 }, c: 2 "));
    }

    #[test]
    fn brace_block_unterminated() {
        assert_eq!(brace_block("{ a: { b", 0), None);
        assert_eq!(brace_block("no brace", 0), None);
    }

    #[test]
    fn find_block_uses_first_match() {
        let re = Regex::new(r"variants:\s*\{").unwrap();
        let text = "variants: { one: 1 }\nvariants: { two: 2 }";
        assert_eq!(find_block(text, &re), Some(" one: 1 "));
    }

    #[test]
    fn top_level_lines_skip_nested_bodies() {
        let block = "\n  size: {\n    sm: 'h-8',\n    lg: {\n      x: 1\n    },\n  },\n  tone: {\n  },\n";
        let lines: Vec<&str> = top_level_lines(block)
            .into_iter()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        assert_eq!(lines, vec!["size: {", "tone: {"]);
    }
}
