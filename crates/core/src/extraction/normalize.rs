//! Text folding used to match headers and names across inconsistent sheets.

const HEADER_STOPWORDS: [&str; 10] = ["el", "la", "de", "del", "al", "a", "e", "i", "o", "u"];

fn fold_char(c: char) -> Option<char> {
    let folded = match c {
        'á' | 'à' | 'ä' | 'â' | 'ã' | 'å' => 'a',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' | 'õ' => 'o',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        'ý' | 'ÿ' => 'y',
        c if c.is_ascii() => c,
        _ => return None,
    };
    Some(folded)
}

/// Lowercases, folds accents to ASCII, keeps `[a-z0-9]` and whitespace,
/// then collapses runs of whitespace.
pub fn normalize_text(text: &str) -> String {
    let kept: String = text
        .to_lowercase()
        .chars()
        .filter_map(fold_char)
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Header variant of [`normalize_text`]: punctuation separates words and
/// Spanish stop-words are dropped.
pub fn normalize_header(text: &str) -> String {
    let spaced: String = text
        .chars()
        .map(|c| if "-_.,:".contains(c) { ' ' } else { c })
        .collect();
    normalize_text(&spaced)
        .split(' ')
        .filter(|w| !w.is_empty() && !HEADER_STOPWORDS.contains(w))
        .collect::<Vec<_>>()
        .join(" ")
}
