//! Page-flow layout state for the claim report.
//!
//! A single cursor tracks the vertical write position from the top of the
//! page. Before any block of known height is written, the caller asks
//! whether it still fits; if not, the renderer opens a fresh page and the
//! cursor resets. The cursor is owned by one composer invocation and never
//! shared.

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;
pub const MARGIN_MM: f32 = 20.0;

const MM_PER_PT: f32 = 25.4 / 72.0;

/// Average Helvetica glyph width as a fraction of the font size.
const GLYPH_WIDTH_FACTOR: f32 = 0.5;

/// Vertical write position, measured in mm from the top of the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageCursor {
    y: f32,
}

impl PageCursor {
    pub fn top() -> Self {
        Self { y: MARGIN_MM }
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn set(&mut self, y: f32) {
        self.y = y;
    }

    pub fn advance(&mut self, height: f32) {
        self.y += height;
    }

    /// True when a block of the given height would run past the bottom
    /// margin, i.e. a page break is required first.
    pub fn needs_break(&self, height: f32) -> bool {
        self.y + height > PAGE_HEIGHT_MM - MARGIN_MM
    }

    pub fn reset(&mut self) {
        self.y = MARGIN_MM;
    }
}

/// Estimated rendered width of a string, in mm.
pub fn text_width_mm(text: &str, font_size_pt: f32) -> f32 {
    text.chars().count() as f32 * font_size_pt * GLYPH_WIDTH_FACTOR * MM_PER_PT
}

/// Greedy word wrap against the estimated glyph width.
///
/// Words longer than a full line are hard-split so no line ever exceeds
/// the limit. Always returns at least one line.
pub fn wrap_text(text: &str, max_width_mm: f32, font_size_pt: f32) -> Vec<String> {
    let char_width = font_size_pt * GLYPH_WIDTH_FACTOR * MM_PER_PT;
    let max_chars = ((max_width_mm / char_width).floor() as usize).max(1);

    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word = word;
        // Hard-split oversized words.
        while word.chars().count() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let split: usize = word.chars().take(max_chars).map(|c| c.len_utf8()).sum();
            lines.push(word[..split].to_string());
            word = &word[split..];
        }

        if current.is_empty() {
            current.push_str(word);
        } else if current.chars().count() + 1 + word.chars().count() <= max_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }

    lines
}
