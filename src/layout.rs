//! Word wrapping, card dimensions, and the truncation policy.
//!
//! The card width is fixed; the height grows with the wrapped message and is
//! clamped to the configured range. Wrapping is greedy over whitespace-split
//! words against a pluggable measurement function — production passes the
//! shared [`FontStore`] measurement, tests can pass a fake.

use crate::config::CardConfig;
use crate::fonts::FontStore;

/// The literal appended as the final line when the message is truncated.
pub const ELLIPSIS: &str = "...";

/// A computed card layout. Derived once per render, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardLayout {
    /// Card width in pixels.
    pub width: u32,
    /// Card height in pixels, already clamped.
    pub height: u32,
    /// Wrapped (and possibly truncated) message lines, top to bottom.
    pub lines: Vec<String>,
    /// Author name, elided to fit the text area.
    pub name: String,
    /// Top-left corner of the message text area.
    pub text_origin: (u32, u32),
    /// Vertical advance per message line.
    pub line_height: u32,
}

/// Greedy word wrap.
///
/// Words are accumulated into a line while the measured width of the
/// candidate line stays within `max_width`; the word that would overflow
/// starts the next line. A single word wider than `max_width` occupies its
/// own line — there is no mid-word breaking. Text without any words (empty
/// or all whitespace) yields exactly one empty line.
pub fn wrap_text(text: &str, max_width: f32, measure: impl Fn(&str) -> f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };

        if measure(&candidate) <= max_width {
            current = candidate;
        } else if current.is_empty() {
            // Over-wide word on an empty line: it becomes its own line.
            lines.push(word.to_string());
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Compute the card layout for a message.
///
/// `card_width` overrides the configured width (the text area shrinks or
/// grows with it); all other geometry comes from `config`. The wrap pass and
/// the height estimate share one measurement function, so the computed
/// height always matches the drawn content.
pub fn compute_layout(
    message_text: &str,
    author_name: &str,
    card_width: u32,
    fonts: &FontStore,
    config: &CardConfig,
) -> CardLayout {
    let text_area_x = config.text_area_x();
    let text_area_width = config.text_area_width_at(card_width);

    let text_font = fonts.regular();
    let mut lines = wrap_text(message_text, text_area_width as f32, |line| {
        text_font.text_width(line, config.text_size)
    });

    // Height from the full (pre-clamp) line count, then clamp.
    let text_height = lines.len() as u32 * config.line_height;
    let content_height = config
        .avatar_size
        .max(config.name_row_height + text_height + config.name_text_spacing);
    let height = (content_height + 2 * config.margin + 2 * config.padding)
        .clamp(config.min_height, config.max_height);

    // Truncate against the clamped height. The wrap above used the full line
    // count, so truncation is deterministic whichever way the clamp went.
    let text_start_y = config.text_start_y();
    let available = height
        .saturating_sub(text_start_y)
        .saturating_sub(config.margin + config.padding);
    let max_lines = (available / config.line_height) as usize;
    if lines.len() > max_lines {
        lines.truncate(max_lines.saturating_sub(1));
        lines.push(ELLIPSIS.to_string());
    }

    let name = elide_name(author_name, text_area_width as f32, fonts, config);

    CardLayout {
        width: card_width,
        height,
        lines,
        name,
        text_origin: (text_area_x, text_start_y),
        line_height: config.line_height,
    }
}

/// Elide the author name with a trailing `…` when it would overflow the
/// text area at the bold name size.
fn elide_name(name: &str, max_width: f32, fonts: &FontStore, config: &CardConfig) -> String {
    let font = fonts.bold();
    if font.text_width(name, config.name_size) <= max_width {
        return name.to_string();
    }

    let mut elided: String = name.trim_end().to_string();
    while !elided.is_empty() {
        elided.pop();
        let candidate = format!("{}…", elided.trim_end());
        if font.text_width(&candidate, config.name_size) <= max_width {
            return candidate;
        }
    }
    "…".to_string()
}
