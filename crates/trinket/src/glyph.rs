//! Rectangular stroke lettering.
//!
//! Each letter is a fixed set of axis-aligned strokes positioned relative to
//! the letter's origin: x at the letter's left anchor, y on the text's
//! vertical center line. Stroke lengths that span the full letter follow the
//! text height and stroke width; the horizontal bar lengths are fixed.

use crate::GlyphError;

/// One rectangular stroke, as a center offset plus size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    /// Center x offset from the letter origin.
    pub x: f64,
    /// Center y offset from the letter origin.
    pub y: f64,
    /// Size along X.
    pub width: f64,
    /// Size along Y.
    pub height: f64,
}

impl Stroke {
    /// A stroke whose `x` addresses its center.
    pub fn centered(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A stroke whose `x` addresses its left edge.
    pub fn from_left(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::centered(x + width / 2.0, y, width, height)
    }

    /// The same stroke moved by `(dx, dy)`.
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }
}

/// Letter size parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphMetrics {
    /// Full letter height.
    pub height: f64,
    /// Stroke thickness.
    pub stroke: f64,
}

/// The available stroke fonts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeFont {
    /// Wide block capitals, left-anchored (`A U S T I N`).
    Block,
    /// Narrow capitals, center-anchored (`B U L S`).
    Compact,
}

impl StrokeFont {
    /// Font name for messages.
    pub fn name(self) -> &'static str {
        match self {
            StrokeFont::Block => "block",
            StrokeFont::Compact => "compact",
        }
    }

    /// Letters this font defines.
    pub fn letters(self) -> &'static str {
        match self {
            StrokeFont::Block => "AUSTIN",
            StrokeFont::Compact => "BULS",
        }
    }

    /// Whether `letter` (any case) has strokes in this font.
    pub fn supports(self, letter: char) -> bool {
        self.letters().contains(letter.to_ascii_uppercase())
    }

    /// Strokes for `letter` (any case), or `None` if undefined.
    pub fn glyph(self, letter: char, m: &GlyphMetrics) -> Option<Vec<Stroke>> {
        match self {
            StrokeFont::Block => block_glyph(letter.to_ascii_uppercase(), m),
            StrokeFont::Compact => compact_glyph(letter.to_ascii_uppercase(), m),
        }
    }
}

fn block_glyph(letter: char, m: &GlyphMetrics) -> Option<Vec<Stroke>> {
    let (h, s) = (m.height, m.stroke);
    let top = h / 2.0 - s / 2.0;
    let bottom = -h / 2.0 + s / 2.0;
    let strokes = match letter {
        'A' => vec![
            Stroke::from_left(0.0, 0.0, s, h),
            Stroke::from_left(3.0, 0.0, s, h),
            Stroke::from_left(0.0, top, 4.2, s),
            Stroke::from_left(0.0, h / 4.0 - s / 2.0, 4.2, s),
        ],
        'U' => vec![
            Stroke::from_left(0.0, 0.0, s, h),
            Stroke::from_left(3.0, 0.0, s, h),
            Stroke::from_left(0.0, bottom, 4.2, s),
        ],
        'S' => vec![
            Stroke::from_left(0.0, top, 3.5, s),
            Stroke::from_left(0.0, 0.0, 3.5, s),
            Stroke::from_left(0.0, bottom, 3.5, s),
            Stroke::from_left(0.0, h / 4.0 - s / 4.0, s, h / 4.0 + s),
            Stroke::from_left(2.8, -h / 4.0 + s / 4.0, s, h / 4.0 + s),
        ],
        'T' => vec![
            Stroke::from_left(1.5, 0.0, s, h),
            Stroke::from_left(0.0, top, 4.0, s),
        ],
        'I' => vec![Stroke::from_left(1.5, 0.0, s, h)],
        'N' => vec![
            Stroke::from_left(0.0, 0.0, s, h),
            Stroke::from_left(3.0, 0.0, s, h),
            // diagonal as three stepped segments
            Stroke::from_left(0.7, h / 3.0, s, h / 3.5),
            Stroke::from_left(1.5, 0.0, s, h / 3.5),
            Stroke::from_left(2.3, -h / 3.0, s, h / 3.5),
        ],
        _ => return None,
    };
    Some(strokes)
}

fn compact_glyph(letter: char, m: &GlyphMetrics) -> Option<Vec<Stroke>> {
    let (h, s) = (m.height, m.stroke);
    let bottom = -h / 2.0 + s / 2.0;
    let strokes = match letter {
        'B' => vec![
            Stroke::centered(0.0, 0.0, s, h),
            Stroke::centered(1.0, h / 3.0, 1.5, s),
            Stroke::centered(1.0, 0.0, 1.5, s),
            Stroke::centered(1.0, -h / 3.0, 1.5, s),
        ],
        'U' => vec![
            Stroke::centered(0.0, 0.0, s, h),
            Stroke::centered(2.0, 0.0, s, h),
            Stroke::centered(1.0, bottom, 2.0, s),
        ],
        'L' => vec![
            Stroke::centered(0.0, 0.0, s, h),
            Stroke::centered(1.0, bottom, 1.5, s),
        ],
        'S' => vec![
            Stroke::centered(0.0, h / 3.0, 2.0, s),
            Stroke::centered(0.0, 0.0, 2.0, s),
            Stroke::centered(0.0, -h / 3.0, 2.0, s),
        ],
        _ => return None,
    };
    Some(strokes)
}

/// Lay out `text` left to right starting at `origin`, advancing `spacing`
/// per character. Spaces advance without strokes.
///
/// Returns each stroke with absolute center coordinates, tagged with the
/// letter it belongs to.
pub fn layout_text(
    font: StrokeFont,
    text: &str,
    metrics: &GlyphMetrics,
    origin: (f64, f64),
    spacing: f64,
) -> Result<Vec<(char, Stroke)>, GlyphError> {
    let mut placed = Vec::new();
    let (mut x, y) = origin;
    for letter in text.chars() {
        if !letter.is_whitespace() {
            let upper = letter.to_ascii_uppercase();
            if !font.supports(upper) {
                return Err(GlyphError::Unsupported {
                    letter: upper,
                    font: font.name(),
                });
            }
            let strokes = font.glyph(upper, metrics).unwrap_or_default();
            placed.extend(strokes.into_iter().map(|s| (upper, s.offset(x, y))));
        }
        x += spacing;
    }
    Ok(placed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const BLOCK: GlyphMetrics = GlyphMetrics {
        height: 8.0,
        stroke: 1.2,
    };
    const COMPACT: GlyphMetrics = GlyphMetrics {
        height: 4.0,
        stroke: 0.8,
    };

    #[test]
    fn austin_has_twenty_strokes() {
        let strokes = layout_text(StrokeFont::Block, "AUSTIN", &BLOCK, (4.0, 10.0), 5.5).unwrap();
        assert_eq!(strokes.len(), 20);
    }

    #[test]
    fn bulls_has_fourteen_strokes() {
        let strokes = layout_text(StrokeFont::Compact, "BULLS", &COMPACT, (-8.0, -8.0), 3.5).unwrap();
        assert_eq!(strokes.len(), 14);
    }

    #[test]
    fn block_strokes_are_left_anchored() {
        let strokes = layout_text(StrokeFont::Block, "A", &BLOCK, (4.0, 10.0), 5.5).unwrap();
        let (_, left) = strokes[0];
        assert_relative_eq!(left.x - left.width / 2.0, 4.0);
        assert_relative_eq!(left.y, 10.0);
        assert_relative_eq!(left.height, 8.0);

        let (_, top) = strokes[2];
        assert_relative_eq!(top.x, 4.0 + 2.1);
        assert_relative_eq!(top.y + top.height / 2.0, 14.0);
    }

    #[test]
    fn compact_strokes_are_center_anchored() {
        let strokes = layout_text(StrokeFont::Compact, "BU", &COMPACT, (-8.0, -8.0), 3.5).unwrap();
        let (letter, spine) = strokes[0];
        assert_eq!(letter, 'B');
        assert_relative_eq!(spine.x, -8.0);

        let (letter, right) = strokes[5];
        assert_eq!(letter, 'U');
        assert_relative_eq!(right.x, -8.0 + 3.5 + 2.0);
        let (_, bottom) = strokes[6];
        assert_relative_eq!(bottom.y - bottom.height / 2.0, -10.0);
    }

    #[test]
    fn letters_are_case_insensitive() {
        let upper = layout_text(StrokeFont::Block, "TIN", &BLOCK, (0.0, 0.0), 5.5).unwrap();
        let lower = layout_text(StrokeFont::Block, "tin", &BLOCK, (0.0, 0.0), 5.5).unwrap();
        assert_eq!(upper, lower);
        assert!(StrokeFont::Compact.supports('l'));
    }

    #[test]
    fn every_listed_letter_has_strokes() {
        for font in [StrokeFont::Block, StrokeFont::Compact] {
            for letter in font.letters().chars() {
                let strokes = font.glyph(letter, &BLOCK);
                assert!(strokes.is_some_and(|s| !s.is_empty()), "{letter} in {}", font.name());
            }
            assert!(!font.supports('Z'));
            assert!(font.glyph('Z', &BLOCK).is_none());
        }
    }

    #[test]
    fn spaces_advance_only() {
        let spaced = layout_text(StrokeFont::Block, "I I", &BLOCK, (0.0, 0.0), 5.5).unwrap();
        assert_eq!(spaced.len(), 2);
        assert_relative_eq!(spaced[1].1.x - spaced[0].1.x, 11.0);
    }

    #[test]
    fn unknown_letter_is_an_error() {
        let err = layout_text(StrokeFont::Compact, "BOB", &COMPACT, (0.0, 0.0), 3.5).unwrap_err();
        assert_eq!(
            err,
            GlyphError::Unsupported {
                letter: 'O',
                font: "compact"
            }
        );
        assert!(StrokeFont::Block.glyph('Z', &BLOCK).is_none());
    }

    #[test]
    fn strokes_scale_with_metrics() {
        let big = GlyphMetrics {
            height: 16.0,
            stroke: 2.0,
        };
        let strokes = StrokeFont::Block.glyph('I', &big).unwrap();
        assert_relative_eq!(strokes[0].height, 16.0);
        assert_relative_eq!(strokes[0].width, 2.0);
    }
}
