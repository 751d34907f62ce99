//! Text fixes applied to assistant output before markdown rendering.
//!
//! Models regularly emit tables squeezed onto too few lines and LaTeX wrapped
//! in square brackets instead of math delimiters. Both repairs are heuristics:
//! they never validate markdown, they only make the common broken shapes
//! renderable. Each transform is idempotent and leaves text without a matching
//! pattern untouched.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static PIPE_GAP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\|[ \t]+\|").expect("pipe gap pattern is valid"));

static GLUED_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^([ \t]*\|(?:[ \t]*:?-{3,}:?[ \t]*\|)+)[ \t]*([^\s:-])")
        .expect("separator pattern is valid")
});

static BRACKET_MATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(\s*\\[^\[\]]*)\]").expect("bracket math pattern is valid"));

/// Run every assistant-text repair in order: tables first, then math.
pub fn postprocess(text: &str) -> String {
    brackets_to_math(&fix_tables(text))
}

/// Best-effort repair of malformed table markup.
///
/// Horizontal whitespace between two adjacent pipes collapses into one pipe,
/// a header separator row that has the first body row glued onto it is split,
/// and a trailing table line gets the line break it was missing.
pub fn fix_tables(text: &str) -> String {
    if !text.contains('|') {
        return text.to_string();
    }

    let mut fixed = text.to_string();
    // Adjacent matches share a pipe, so a single pass can leave gaps behind.
    while PIPE_GAP.is_match(&fixed) {
        fixed = PIPE_GAP.replace_all(&fixed, "|").into_owned();
    }

    fixed = GLUED_SEPARATOR
        .replace_all(&fixed, |caps: &Captures| format!("{}\n{}", &caps[1], &caps[2]))
        .into_owned();

    let last_line = fixed.rsplit('\n').next().unwrap_or_default();
    if is_separator_row(last_line) || is_table_row(last_line) {
        fixed.push('\n');
    }

    fixed
}

/// Rewrite `[\expr]` as `$\expr$` so the renderer sees inline math.
pub fn brackets_to_math(text: &str) -> String {
    if !text.contains('[') {
        return text.to_string();
    }

    let mut fixed = text.to_string();
    // Rewriting an inner bracket can expose an enclosing one; every pass
    // removes a bracket pair, so this settles.
    while BRACKET_MATH.is_match(&fixed) {
        fixed = BRACKET_MATH
            .replace_all(&fixed, |caps: &Captures| format!("${}$", caps[1].trim()))
            .into_owned();
    }
    fixed
}

fn is_separator_row(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty()
        && trimmed.contains('|')
        && trimmed.contains('-')
        && trimmed
            .chars()
            .all(|c| matches!(c, '|' | '-' | ':' | ' ' | '\t'))
}

fn is_table_row(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= 2 && trimmed.starts_with('|') && trimmed.ends_with('|')
}
