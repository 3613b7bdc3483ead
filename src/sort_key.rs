//! Sortable keys for song titles.
//!
//! Chinese characters are replaced by their toneless pinyin syllable and
//! every other character is lowercased, so that Chinese and English titles
//! interleave alphabetically: `"恩典"` becomes `"en dian"` and sorts after
//! `"amazing grace"`.

use pinyin::ToPinyin;

use crate::error::TransliterationError;

/// Readings that differ from the dictionary's first choice.
///
/// `祢` is listed as "mí" first, but it is sung as "nǐ".
const PINYIN_ADJUSTMENTS: &[(char, &str)] = &[('祢', "ni")];

/// Compute the sort key of a title.
///
/// The result only contains lowercase text, so applying this function to its
/// own output returns the output unchanged.
pub fn derive_sort_key(title: &str) -> Result<String, TransliterationError> {
    let mut key = String::with_capacity(title.len() * 2);
    let mut after_syllable = false;

    for c in title.chars() {
        if c.is_control() {
            return Err(TransliterationError::new(title, c, "control character"));
        }

        if let Some(syllable) = syllable(c) {
            if !key.is_empty() && !key.ends_with(char::is_whitespace) {
                key.push(' ');
            }
            key.push_str(syllable);
            after_syllable = true;
            continue;
        }

        if is_cjk_ideograph(c) {
            return Err(TransliterationError::new(title, c, "no known pinyin reading"));
        }

        if after_syllable && !c.is_whitespace() {
            key.push(' ');
        }
        after_syllable = false;
        key.extend(c.to_lowercase());
    }

    Ok(key)
}

fn syllable(c: char) -> Option<&'static str> {
    PINYIN_ADJUSTMENTS
        .iter()
        .find(|(adjusted, _)| *adjusted == c)
        .map(|(_, reading)| *reading)
        .or_else(|| c.to_pinyin().map(|p| p.plain()))
}

fn is_cjk_ideograph(c: char) -> bool {
    matches!(c,
        '\u{3400}'..='\u{4DBF}'
        | '\u{4E00}'..='\u{9FFF}'
        | '\u{F900}'..='\u{FAFF}'
        | '\u{20000}'..='\u{2A6DF}')
}
