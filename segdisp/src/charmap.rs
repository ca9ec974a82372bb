//! Maps characters to the segments that display them.
//!
//! The glyphs are designed for [`SegmentType::Alphanumeric14`]; the other
//! segment types derive theirs from it.
use segdisp_geom::SegmentType;

use crate::LitMask;

/// The mask shown by a settings preview: the `\` glyph of a 14-segment cell.
pub const PREVIEW_MASK: LitMask = LitMask(0x4100);

// Segments of `Alphanumeric14`
const A: u32 = 1 << 0;
const B: u32 = 1 << 1;
const C: u32 = 1 << 2;
const D: u32 = 1 << 3;
const E: u32 = 1 << 4;
const F: u32 = 1 << 5;
const G1: u32 = 1 << 6;
const COMMA: u32 = 1 << 7;
const H: u32 = 1 << 8;
const J: u32 = 1 << 9;
const K: u32 = 1 << 10;
const G2: u32 = 1 << 11;
const L: u32 = 1 << 12;
const M: u32 = 1 << 13;
const N: u32 = 1 << 14;
const DP: u32 = 1 << 15;

/// Get the lit segments displaying `ch`.
///
/// Lower-case letters are displayed as upper-case ones. Returns `None` if
/// `ch` can't be displayed on `segment_type`. `Numeric8` only supports the
/// characters that don't need diagonal or centre-vertical strokes.
pub fn lit_mask(segment_type: SegmentType, ch: char) -> Option<LitMask> {
    let mask = alnum14(ch)?;
    match segment_type {
        SegmentType::Alphanumeric14 => Some(LitMask(mask)),
        SegmentType::Alphanumeric16 => Some(LitMask(to_alnum16(mask))),
        SegmentType::Numeric8 => to_numeric8(mask).map(LitMask),
    }
}

/// Convert `text` to one mask per character cell.
///
/// A `.` or `,` lights the decimal point (or comma) of the preceding cell
/// instead of taking up a cell of its own. Characters that can't be
/// displayed produce blank cells.
pub fn text_masks(segment_type: SegmentType, text: &str) -> Vec<LitMask> {
    let mut cells: Vec<LitMask> = Vec::with_capacity(text.len());
    let mut can_fold = false;

    for ch in text.chars() {
        let mask = lit_mask(segment_type, ch).unwrap_or(LitMask::EMPTY);

        if (ch == '.' || ch == ',') && can_fold {
            if let Some(last) = cells.last_mut() {
                *last |= mask;
            }
            can_fold = false;
        } else {
            cells.push(mask);
            can_fold = ch != '.' && ch != ',';
        }
    }

    cells
}

fn alnum14(ch: char) -> Option<u32> {
    Some(match ch.to_ascii_uppercase() {
        ' ' => 0,
        '!' => B | C | DP,
        '"' => F | J,
        '#' => B | C | D | G1 | G2 | J | M,
        '$' => A | C | D | F | G1 | G2 | J | M,
        '%' => C | F | G1 | G2 | J | K | L | M,
        '&' => A | D | E | G1 | H | J | N,
        '\'' => J,
        '(' => K | N,
        ')' => H | L,
        '*' => G1 | G2 | H | J | K | L | M | N,
        '+' => G1 | G2 | J | M,
        ',' => COMMA,
        '-' => G1 | G2,
        '.' => DP,
        '/' => K | L,
        '0' => A | B | C | D | E | F,
        '1' => B | C,
        '2' => A | B | D | E | G1 | G2,
        '3' => A | B | C | D | G2,
        '4' => B | C | F | G1 | G2,
        '5' => A | C | D | F | G1 | G2,
        '6' => A | C | D | E | F | G1 | G2,
        '7' => A | B | C,
        '8' => A | B | C | D | E | F | G1 | G2,
        '9' => A | B | C | D | F | G1 | G2,
        ':' => J | M,
        ';' => J | L,
        '<' => K | N,
        '=' => D | G1 | G2,
        '>' => H | L,
        '?' => A | B | G2 | M,
        '@' => A | B | D | E | F | G2 | J,
        'A' => A | B | C | E | F | G1 | G2,
        'B' => A | B | C | D | G2 | J | M,
        'C' => A | D | E | F,
        'D' => A | B | C | D | J | M,
        'E' => A | D | E | F | G1 | G2,
        'F' => A | E | F | G1,
        'G' => A | C | D | E | F | G2,
        'H' => B | C | E | F | G1 | G2,
        'I' => A | D | J | M,
        'J' => B | C | D | E,
        'K' => E | F | G1 | K | N,
        'L' => D | E | F,
        'M' => B | C | E | F | H | K,
        'N' => B | C | E | F | H | N,
        'O' => A | B | C | D | E | F,
        'P' => A | B | E | F | G1 | G2,
        'Q' => A | B | C | D | E | F | N,
        'R' => A | B | E | F | G1 | G2 | N,
        'S' => A | C | D | F | G1 | G2,
        'T' => A | J | M,
        'U' => B | C | D | E | F,
        'V' => E | F | K | L,
        'W' => B | C | E | F | L | N,
        'X' => H | K | L | N,
        'Y' => H | K | M,
        'Z' => A | D | K | L,
        '[' => A | D | E | F,
        '\\' => H | N,
        ']' => A | B | C | D,
        '^' => L | N,
        '_' => D,
        '`' => H,
        '{' => A | D | G1 | J | M,
        '|' => J | M,
        '}' => A | D | G2 | J | M,
        '~' => G1 | G2 | K | L,
        _ => return None,
    })
}

/// Split the top and bottom bars, and turn the comma into the decimal point.
fn to_alnum16(mask: u32) -> u32 {
    // (14-segment bit, 16-segment bits)
    const MAP: [(u32, u32); 16] = [
        (A, 0b11),
        (B, 1 << 2),
        (C, 1 << 3),
        (D, 0b11 << 4),
        (E, 1 << 6),
        (F, 1 << 7),
        (G1, 1 << 8),
        (G2, 1 << 9),
        (H, 1 << 10),
        (J, 1 << 11),
        (K, 1 << 12),
        (L, 1 << 13),
        (M, 1 << 14),
        (N, 1 << 15),
        (DP, 1 << 16),
        (COMMA, 1 << 16),
    ];
    MAP.iter()
        .filter(|&&(from, _)| mask & from != 0)
        .fold(0, |out, &(_, to)| out | to)
}

fn to_numeric8(mask: u32) -> Option<u32> {
    if mask & (H | J | K | L | M | N) != 0 {
        return None;
    }
    let bars = mask & (A | B | C | D | E | F);
    let g = if mask & (G1 | G2) != 0 { 1 << 6 } else { 0 };
    let dp = if mask & (DP | COMMA) != 0 { 1 << 7 } else { 0 };
    Some(bars | g | dp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_mask_is_backslash() {
        assert_eq!(
            lit_mask(SegmentType::Alphanumeric14, '\\'),
            Some(PREVIEW_MASK)
        );
    }

    #[test]
    fn lower_case_folds() {
        for ty in SegmentType::ALL.iter().cloned() {
            assert_eq!(lit_mask(ty, 'e'), lit_mask(ty, 'E'));
        }
    }

    #[test]
    fn every_printable_ascii_has_a_glyph() {
        for b in 0x20u8..0x7f {
            let ch = b as char;
            assert!(lit_mask(SegmentType::Alphanumeric14, ch).is_some(), "{:?}", ch);
            assert!(lit_mask(SegmentType::Alphanumeric16, ch).is_some(), "{:?}", ch);
        }
        assert_eq!(lit_mask(SegmentType::Alphanumeric14, '\n'), None);
        assert_eq!(lit_mask(SegmentType::Alphanumeric14, 'é'), None);
    }

    #[test]
    fn masks_fit_segment_counts() {
        let counts = [
            (SegmentType::Numeric8, 8),
            (SegmentType::Alphanumeric14, 16),
            (SegmentType::Alphanumeric16, 17),
        ];
        for &(ty, count) in counts.iter() {
            for b in 0x20u8..0x7f {
                if let Some(m) = lit_mask(ty, b as char) {
                    assert_eq!(m.0 & !LitMask::all(count).0, 0, "{} {:?}", ty, b as char);
                }
            }
        }
    }

    #[test]
    fn numeric_digits() {
        let ty = SegmentType::Numeric8;
        assert_eq!(lit_mask(ty, '8'), Some(LitMask(0x7f)));
        assert_eq!(lit_mask(ty, '1'), Some(LitMask(0b110)));
        assert_eq!(lit_mask(ty, '0'), Some(LitMask(0x3f)));
        assert_eq!(lit_mask(ty, '7'), Some(LitMask(0b111)));
        assert_eq!(lit_mask(ty, '-'), Some(LitMask(1 << 6)));
        assert_eq!(lit_mask(ty, '.'), Some(LitMask(1 << 7)));
        assert_eq!(lit_mask(ty, 'X'), None);
    }

    #[test]
    fn alnum16_splits_bars() {
        let ty = SegmentType::Alphanumeric16;
        assert_eq!(lit_mask(ty, '_'), Some(LitMask(0b11 << 4)));
        assert_eq!(lit_mask(ty, '8'), Some(LitMask(0x3ff)));
        assert_eq!(lit_mask(ty, ','), lit_mask(ty, '.'));
    }

    #[test]
    fn text_folds_points() {
        let ty = SegmentType::Alphanumeric14;
        let masks = text_masks(ty, "1.5,.");
        assert_eq!(masks.len(), 3);
        assert_eq!(masks[0].0, B | C | DP);
        assert_eq!(masks[1].0, A | C | D | F | G1 | G2 | COMMA);
        assert_eq!(masks[2].0, DP);
        assert_eq!(text_masks(ty, ".5")[0].0, DP);
        assert_eq!(text_masks(ty, "a\u{1}b")[1], LitMask::EMPTY);
    }
}
