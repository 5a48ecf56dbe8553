//! Terminal UI primitives for the order REPL: colors, icons, formatting.
//!
//! Uses raw ANSI escape codes.
//! Respects the `NO_COLOR` environment variable (https://no-color.org/).

use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Color support detection
// ---------------------------------------------------------------------------

/// Returns `true` if color output is enabled.
/// Disabled when `NO_COLOR` env var is set (any value) or `TERM=dumb`.
pub fn color_enabled() -> bool {
    static ENABLED: OnceLock<bool> = OnceLock::new();
    *ENABLED.get_or_init(|| {
        if std::env::var_os("NO_COLOR").is_some() {
            return false;
        }
        if let Ok(term) = std::env::var("TERM") {
            if term == "dumb" {
                return false;
            }
        }
        true
    })
}

// ---------------------------------------------------------------------------
// ANSI escape helpers
// ---------------------------------------------------------------------------

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

const FG_BLACK: &str = "\x1b[30m";
const FG_RED: &str = "\x1b[31m";
const FG_GREEN: &str = "\x1b[32m";
const FG_YELLOW: &str = "\x1b[33m";
const FG_CYAN: &str = "\x1b[36m";
const FG_WHITE: &str = "\x1b[37m";

const BG_GREEN: &str = "\x1b[42m";
const BG_YELLOW: &str = "\x1b[43m";
const BG_CYAN: &str = "\x1b[46m";
const BG_BRIGHT_BLACK: &str = "\x1b[100m";

/// Apply an ANSI style to text. Returns plain text if color is disabled.
fn styled(codes: &[&str], text: &str) -> String {
    if !color_enabled() || codes.is_empty() {
        return text.to_string();
    }
    let prefix: String = codes.iter().copied().collect();
    format!("{}{}{}", prefix, text, RESET)
}

// ---------------------------------------------------------------------------
// Public style functions
// ---------------------------------------------------------------------------

pub fn dim(text: &str) -> String { styled(&[DIM], text) }

pub fn red(text: &str) -> String { styled(&[FG_RED], text) }
pub fn yellow(text: &str) -> String { styled(&[FG_YELLOW], text) }
pub fn cyan(text: &str) -> String { styled(&[FG_CYAN], text) }

pub fn bold_red(text: &str) -> String { styled(&[BOLD, FG_RED], text) }
pub fn bold_yellow(text: &str) -> String { styled(&[BOLD, FG_YELLOW], text) }
pub fn bold_cyan(text: &str) -> String { styled(&[BOLD, FG_CYAN], text) }
pub fn bold_white(text: &str) -> String { styled(&[BOLD, FG_WHITE], text) }

pub fn badge_green(text: &str) -> String { styled(&[BOLD, FG_BLACK, BG_GREEN], text) }
pub fn badge_yellow(text: &str) -> String { styled(&[BOLD, FG_BLACK, BG_YELLOW], text) }
pub fn badge_cyan(text: &str) -> String { styled(&[BOLD, FG_BLACK, BG_CYAN], text) }
pub fn badge_gray(text: &str) -> String { styled(&[FG_WHITE, BG_BRIGHT_BLACK], text) }

// ---------------------------------------------------------------------------
// Icons
// ---------------------------------------------------------------------------

pub mod icon {
    pub const FAIL: &str = "✗";
    pub const WARN: &str = "△";
    pub const INFO: &str = "◆";
    pub const BULLET: &str = "▸";
    pub const SECTION: &str = "▰▰▰";
    pub const PROMPT: &str = "◆";
    pub const DROID: &str = "◇";
    pub const TREE_BRANCH: &str = "├";
    pub const TREE_LAST: &str = "└";
    pub const TREE_DASH: &str = "─";
}

// ---------------------------------------------------------------------------
// Formatting primitives
// ---------------------------------------------------------------------------

/// Print a compact banner.
///
/// ```text
/// ▰▰▰ ORDER DROID v0.1.0 — type your order
/// ```
pub fn banner(name: &str, version: &str, subtitle: &str) -> String {
    if subtitle.is_empty() {
        format!("{} {} {}",
            bold_cyan(icon::SECTION),
            bold_white(name),
            dim(version),
        )
    } else {
        format!("{} {} {} {} {}",
            bold_cyan(icon::SECTION),
            bold_white(name),
            dim(version),
            dim("—"),
            dim(subtitle),
        )
    }
}

/// The assistant's reply line.
///
/// ```text
/// ◇ your current order is: burger. Is that all?
/// ```
pub fn droid_says(text: &str) -> String {
    format!("{} {}", bold_cyan(icon::DROID), text)
}

/// A key-value pair, key in color, value plain.
pub fn kv(key: &str, value: &str) -> String {
    format!("  {}  {}", cyan(key), value)
}

/// Dialogue state badge.
///
/// ```text
///  TAKING ORDER
/// ```
pub fn state_badge(state: &str) -> String {
    let label = format!(" {} ", state.to_uppercase());
    match state {
        "goodbye" => badge_gray(&label),
        "confirming order" => badge_yellow(&label),
        "taking order" => badge_green(&label),
        _ => badge_cyan(&label),
    }
}

/// Order list as a tree; a single dim line when empty.
///
/// ```text
///   ├─ burger
///   └─ fries
/// ```
pub fn order_list<S: AsRef<str>>(items: &[S]) -> String {
    if items.is_empty() {
        return format!("  {}", dim("(no items)"));
    }
    let last = items.len() - 1;
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let branch = if i == last { icon::TREE_LAST } else { icon::TREE_BRANCH };
            format!("  {}{}  {}", dim(branch), dim(icon::TREE_DASH), item.as_ref())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Indented bullet point.
pub fn bullet(text: &str) -> String {
    format!("  {} {}", dim(icon::BULLET), text)
}

/// Error message.
pub fn error(msg: &str) -> String {
    format!("{} {}", bold_red(icon::FAIL), red(msg))
}

/// Warning message.
pub fn warning(msg: &str) -> String {
    format!("{} {}", bold_yellow(icon::WARN), yellow(msg))
}

/// Info message.
pub fn info(msg: &str) -> String {
    format!("{} {}", bold_cyan(icon::INFO), cyan(msg))
}

/// Compact prompt string for the REPL.
pub fn prompt() -> String {
    if color_enabled() {
        format!("{}{}{} ", BOLD, FG_CYAN, icon::PROMPT)
    } else {
        format!("{} ", icon::PROMPT)
    }
}

/// Reset code (for use after prompt where we don't want to reset inline).
pub fn reset() -> &'static str {
    if color_enabled() { RESET } else { "" }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
