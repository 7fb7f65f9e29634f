//! Pass inserting the standard 42 header.
//!
//! A file already has a header when it starts with `/*` and one of the header
//! sentinels (`42` or `:+:`) appears in its first 500 characters. Otherwise an
//! 11-row, 80-column header is prepended, followed by one blank line.

use normfix_core::{Pass, PassContext, PassId, PassOutcome};
use tracing::debug;

/// Pass name for header insertion.
pub const NAME: &str = "header";

const INTERIOR: usize = 76;
const SCAN_LIMIT: usize = 500;
const TIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

const ART: [&str; 7] = [
    ":::      ::::::::   ",
    ":+:      :+:    :+:   ",
    "+:+ +:+         +:+     ",
    "+#+  +:+       +#+        ",
    "+#+#+#+#+#+   +#+           ",
    "#+#    #+#             ",
    "###   ########.fr       ",
];

/// Prepends a 42 header to files that lack one.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderPass;

impl HeaderPass {
    /// Creates the pass.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Pass for HeaderPass {
    fn id(&self) -> PassId {
        PassId::Header
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Inserts the 42 header when the file has none"
    }

    fn apply(&self, ctx: &PassContext, text: &str) -> PassOutcome {
        if has_header(text) {
            return PassOutcome::unchanged(text);
        }
        debug!(file = %ctx.filename, "inserting header");
        let mut output = render_header(ctx).join("\n");
        output.push('\n');
        if !text.is_empty() {
            output.push('\n');
            output.push_str(text);
        }
        PassOutcome {
            text: output,
            changes: 1,
        }
    }
}

/// Whether `text` already starts with a 42 header.
#[must_use]
pub fn has_header(text: &str) -> bool {
    if !text.starts_with("/*") {
        return false;
    }
    let head: String = text.chars().take(SCAN_LIMIT).collect();
    head.contains("42") || head.contains(":+:")
}

/// Renders the 11 header rows, each exactly 80 characters.
#[must_use]
pub fn render_header(ctx: &PassContext) -> Vec<String> {
    let stamp = ctx.timestamp.format(TIME_FORMAT).to_string();
    let border = format!("/* {} */", "*".repeat(INTERIOR - 2));
    let empty = format!("/*{}*/", " ".repeat(INTERIOR));

    vec![
        border.clone(),
        empty.clone(),
        row("", ART[0]),
        row(&format!("   {}", ctx.filename), ART[1]),
        row("", ART[2]),
        row(&format!("   By: {} <{}>", ctx.author, ctx.email), ART[3]),
        row("", ART[4]),
        row(&format!("   Created: {stamp} by {}", ctx.author), ART[5]),
        row(&format!("   Updated: {stamp} by {}", ctx.author), ART[6]),
        empty,
        border,
    ]
}

fn row(left: &str, art: &str) -> String {
    let art_len = art.chars().count();
    let room = INTERIOR - art_len - 1;
    let left: String = left.chars().take(room).collect();
    let pad = INTERIOR - art_len - left.chars().count();
    format!("/*{left}{}{art}*/", " ".repeat(pad))
}
