/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";

/// Counter that should stay at zero (skips, drops, unresolved names):
/// 0 → grey, anything else → yellow.
pub fn colorize_warn_count(value: usize) -> String {
    if value == 0 {
        format!("{GREY}{value}{RESET}")
    } else {
        format!("{YELLOW}{value}{RESET}")
    }
}

/// Counter of produced records: 0 → red, anything else → green.
pub fn colorize_output_count(value: usize) -> String {
    if value == 0 {
        format!("{RED}{value}{RESET}")
    } else {
        format!("{GREEN}{value}{RESET}")
    }
}
