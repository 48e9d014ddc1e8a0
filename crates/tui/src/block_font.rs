use std::collections::HashMap;

use once_cell::sync::Lazy;

pub const FONT_HEIGHT: usize = 5;
const FONT_WIDTH: usize = 4;
const SHADOW_OFFSET: usize = 1;
const FILL_CHAR: char = '█';
const SHADOW_CHAR: char = '░';

type Glyph = [&'static str; FONT_HEIGHT];

static GLYPHS: Lazy<HashMap<char, Glyph>> = Lazy::new(|| {
    HashMap::from([
        ('0', ["1111", "1  1", "1  1", "1  1", "1111"]),
        ('1', ["  1 ", " 11 ", "  1 ", "  1 ", " 111"]),
        ('2', ["1111", "   1", "1111", "1   ", "1111"]),
        ('3', ["1111", "   1", " 111", "   1", "1111"]),
        ('4', ["1  1", "1  1", "1111", "   1", "   1"]),
        ('5', ["1111", "1   ", "1111", "   1", "1111"]),
        ('6', ["1111", "1   ", "1111", "1  1", "1111"]),
        ('7', ["1111", "   1", "  1 ", " 1  ", " 1  "]),
        ('8', ["1111", "1  1", "1111", "1  1", "1111"]),
        ('9', ["1111", "1  1", "1111", "   1", "1111"]),
        ('L', ["1   ", "1   ", "1   ", "1   ", "1111"]),
        ('O', [" 11 ", "1  1", "1  1", "1  1", " 11 "]),
        ('T', ["1111", " 11 ", " 11 ", " 11 ", " 11 "]),
        ('/', ["   1", "  1 ", " 11 ", " 1  ", "1   "]),
        (' ', ["    ", "    ", "    ", "    ", "    "]),
        ('?', ["111 ", "   1", " 11 ", "    ", " 1  "]),
    ])
});

/// Glyph rendering variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    /// Double-width strokes with a drop shadow, for titles.
    Banner,
    /// Single-width strokes, for numbers inside slots.
    Compact,
}

impl FontStyle {
    fn stroke(self) -> usize {
        match self {
            Self::Banner => 2,
            Self::Compact => 1,
        }
    }

    fn shadow(self) -> usize {
        match self {
            Self::Banner => SHADOW_OFFSET,
            Self::Compact => 0,
        }
    }
}

/// Render `text` with the block font. Unknown characters render as `?`.
pub fn render(text: &str, style: FontStyle) -> Vec<String> {
    let content: Vec<char> = text.chars().map(|c| c.to_ascii_uppercase()).collect();
    let shadow = style.shadow();
    if content.is_empty() {
        return vec![String::new(); FONT_HEIGHT + shadow];
    }

    let glyph_width = FONT_WIDTH * style.stroke();
    let spacing = style.stroke();
    let total_width =
        content.len() * glyph_width + content.len().saturating_sub(1) * spacing + shadow * 2;
    let mut canvas = vec![vec![' '; total_width]; FONT_HEIGHT + shadow];

    for (index, ch) in content.iter().enumerate() {
        let glyph = GLYPHS.get(ch).unwrap_or(&GLYPHS[&'?']);
        let x_offset = index * (glyph_width + spacing);
        paint_glyph(&mut canvas, glyph, x_offset, style);
    }

    canvas
        .into_iter()
        .map(|row| row.into_iter().collect::<String>().trim_end().to_string())
        .collect()
}

/// Width in cells of the widest line `render` produces for `text`.
pub fn width(text: &str, style: FontStyle) -> usize {
    render(text, style)
        .iter()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0)
}

fn paint_glyph(canvas: &mut [Vec<char>], glyph: &Glyph, x_offset: usize, style: FontStyle) {
    let stroke = style.stroke();
    let shadow = style.shadow();
    for (row_idx, row) in glyph.iter().enumerate() {
        for (col_idx, symbol) in row.chars().enumerate() {
            if symbol != '1' {
                continue;
            }
            let x = x_offset + col_idx * stroke;
            for dx in 0..stroke {
                if shadow > 0 {
                    place(canvas, row_idx + shadow, x + dx + shadow * 2, SHADOW_CHAR);
                }
                place(canvas, row_idx, x + dx, FILL_CHAR);
            }
        }
    }
}

fn place(canvas: &mut [Vec<char>], y: usize, x: usize, ch: char) {
    if y >= canvas.len() || x >= canvas[y].len() {
        return;
    }
    let cell = &mut canvas[y][x];
    if *cell == ' ' || (*cell == SHADOW_CHAR && ch == FILL_CHAR) {
        *cell = ch;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_digits() {
        let lines = render("45", FontStyle::Compact);
        assert_eq!(lines.len(), FONT_HEIGHT);
        assert_eq!(lines[0], "█  █ ████");
        assert_eq!(lines[4], "   █ ████");
        assert_eq!(width("45", FontStyle::Compact), 9);
    }

    #[test]
    fn banner_has_shadow_row() {
        let lines = render("LOTTO", FontStyle::Banner);
        assert_eq!(lines.len(), FONT_HEIGHT + SHADOW_OFFSET);
        assert!(lines.last().is_some_and(|line| line.contains(SHADOW_CHAR)));
        assert!(!lines.last().is_some_and(|line| line.contains(FILL_CHAR)));
    }

    #[test]
    fn unknown_characters_fall_back() {
        assert_eq!(
            render("#", FontStyle::Compact),
            render("?", FontStyle::Compact)
        );
    }
}
