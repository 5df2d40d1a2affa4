//! Page geometry and deterministic text measurement.
//!
//! The page is a landscape A4 canvas with fixed regions: a header band,
//! a title/subtitle block, a body column and an optional image column.
//! Text wrapping uses the standard Helvetica advance widths (units per
//! 1000 em), so the layout is reproducible without consulting a font file.

/// Page width, landscape A4
pub const PAGE_WIDTH_MM: f32 = 297.0;
/// Page height, landscape A4
pub const PAGE_HEIGHT_MM: f32 = 210.0;

/// Height of the colored header band
pub const HEADER_HEIGHT_MM: f32 = 20.0;
/// Header text position
pub const HEADER_TEXT_X_MM: f32 = 10.0;
pub const HEADER_TEXT_Y_MM: f32 = 13.0;
/// Right edge of the right-aligned page counter
pub const HEADER_RIGHT_EDGE_MM: f32 = 280.0;
pub const HEADER_FONT_PT: f32 = 12.0;

/// Title block
pub const TITLE_X_MM: f32 = 15.0;
pub const TITLE_Y_MM: f32 = 40.0;
pub const TITLE_FONT_PT: f32 = 24.0;
pub const SUBTITLE_Y_MM: f32 = 50.0;
pub const SUBTITLE_FONT_PT: f32 = 16.0;

/// Body column
pub const BODY_X_MM: f32 = 15.0;
pub const BODY_FONT_PT: f32 = 14.0;
/// Body text width without an image
pub const BODY_WIDTH_FULL_MM: f32 = 260.0;
/// Body text width when the image column is present
pub const BODY_WIDTH_SPLIT_MM: f32 = 130.0;
/// First bullet baseline with and without an image
pub const BODY_START_WITH_IMAGE_MM: f32 = 60.0;
pub const BODY_START_WITHOUT_IMAGE_MM: f32 = 70.0;
/// Vertical advance per wrapped line and gap between bullets
pub const LINE_HEIGHT_MM: f32 = 7.0;
pub const BULLET_GAP_MM: f32 = 5.0;

/// Image column placement
pub const IMAGE_X_MM: f32 = 150.0;
pub const IMAGE_Y_MM: f32 = 60.0;
pub const IMAGE_WIDTH_MM: f32 = 130.0;
pub const IMAGE_HEIGHT_MM: f32 = 73.0;

/// Colors (RGB, 0-255)
pub const COLOR_BACKGROUND: (u8, u8, u8) = (248, 250, 252);
pub const COLOR_HEADER: (u8, u8, u8) = (79, 70, 229);
pub const COLOR_HEADER_TEXT: (u8, u8, u8) = (255, 255, 255);
pub const COLOR_TEXT: (u8, u8, u8) = (31, 41, 55);
pub const COLOR_SUBTITLE: (u8, u8, u8) = (100, 100, 100);

const PT_TO_MM: f32 = 25.4 / 72.0;

/// Helvetica advance width for one character, in 1/1000 em.
///
/// Covers WinAnsi Latin including the accented letters Portuguese text
/// uses; anything unknown falls back to the lowercase letter width.
fn advance_milli_em(ch: char) -> u32 {
    match ch {
        ' ' => 278,
        '!' => 278,
        '"' => 355,
        '#' => 556,
        '$' => 556,
        '%' => 889,
        '&' => 667,
        '\'' => 191,
        '(' | ')' => 333,
        '*' => 389,
        '+' => 584,
        ',' | '.' => 278,
        '-' => 333,
        '/' => 278,
        '0'..='9' => 556,
        ':' | ';' => 278,
        '<' | '=' | '>' => 584,
        '?' => 556,
        '@' => 1015,
        'A' => 667,
        'B' => 667,
        'C' => 722,
        'D' => 722,
        'E' => 667,
        'F' => 611,
        'G' => 778,
        'H' => 722,
        'I' => 278,
        'J' => 500,
        'K' => 667,
        'L' => 556,
        'M' => 833,
        'N' => 722,
        'O' => 778,
        'P' => 667,
        'Q' => 778,
        'R' => 722,
        'S' => 667,
        'T' => 611,
        'U' => 722,
        'V' => 667,
        'W' => 944,
        'X' => 667,
        'Y' => 667,
        'Z' => 611,
        '[' | ']' => 278,
        '\\' => 278,
        '^' => 469,
        '_' => 556,
        '`' => 333,
        'a' => 556,
        'b' => 556,
        'c' => 500,
        'd' => 556,
        'e' => 556,
        'f' => 278,
        'g' => 556,
        'h' => 556,
        'i' => 222,
        'j' => 222,
        'k' => 500,
        'l' => 222,
        'm' => 833,
        'n' => 556,
        'o' => 556,
        'p' => 556,
        'q' => 556,
        'r' => 333,
        's' => 500,
        't' => 278,
        'u' => 556,
        'v' => 500,
        'w' => 722,
        'x' => 500,
        'y' => 500,
        'z' => 500,
        '{' | '}' => 334,
        '|' => 260,
        '~' => 584,
        '•' => 350,
        // Accented vowels keep the base letter's advance
        'á' | 'à' | 'â' | 'ã' | 'ä' | 'å' => 556,
        'é' | 'è' | 'ê' | 'ë' => 556,
        'í' | 'ì' | 'î' | 'ï' => 278,
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 556,
        'ú' | 'ù' | 'û' | 'ü' => 556,
        'ç' => 500,
        'ñ' => 556,
        'Á' | 'À' | 'Â' | 'Ã' | 'Ä' | 'Å' => 667,
        'É' | 'È' | 'Ê' | 'Ë' => 667,
        'Í' | 'Ì' | 'Î' | 'Ï' => 278,
        'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 778,
        'Ú' | 'Ù' | 'Û' | 'Ü' => 722,
        'Ç' => 722,
        'Ñ' => 722,
        _ => 556,
    }
}

/// Width of a string rendered in Helvetica at the given size, in mm
pub fn text_width_mm(text: &str, font_size_pt: f32) -> f32 {
    let milli_em: u32 = text.chars().map(advance_milli_em).sum();
    milli_em as f32 / 1000.0 * font_size_pt * PT_TO_MM
}

/// Greedy word wrap to a column width.
///
/// Words are packed onto lines separated by single spaces; a word wider
/// than the column is hard-split by characters so no line ever exceeds
/// the column width.
pub fn wrap_text(text: &str, max_width_mm: f32, font_size_pt: f32) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        for piece in split_oversized_word(word, max_width_mm, font_size_pt) {
            let candidate = if current.is_empty() {
                piece.clone()
            } else {
                format!("{} {}", current, piece)
            };

            if text_width_mm(&candidate, font_size_pt) <= max_width_mm {
                current = candidate;
            } else {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                current = piece;
            }
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

/// Splits a single word into pieces that each fit the column width
fn split_oversized_word(word: &str, max_width_mm: f32, font_size_pt: f32) -> Vec<String> {
    if text_width_mm(word, font_size_pt) <= max_width_mm {
        return vec![word.to_string()];
    }

    let mut pieces = Vec::new();
    let mut piece = String::new();
    for ch in word.chars() {
        piece.push(ch);
        if text_width_mm(&piece, font_size_pt) > max_width_mm && piece.chars().count() > 1 {
            piece.pop();
            pieces.push(std::mem::take(&mut piece));
            piece.push(ch);
        }
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}
