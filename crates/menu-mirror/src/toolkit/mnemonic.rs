//! Mnemonic parsing for underline-style labels.

/// Result of parsing a label for a mnemonic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MnemonicText {
    /// The display text with `_` markers removed (and `__` converted to `_`).
    pub display_text: String,
    /// The mnemonic character (lowercase), if any.
    pub mnemonic: Option<char>,
    /// The byte index in `display_text` where the mnemonic character is.
    pub mnemonic_index: Option<usize>,
}

impl MnemonicText {
    /// Text shown as-is, with no mnemonic processing.
    pub fn plain(text: &str) -> Self {
        Self {
            display_text: text.to_string(),
            mnemonic: None,
            mnemonic_index: None,
        }
    }
}

/// Parse a label containing an optional `_` mnemonic marker.
///
/// - `"_File"` -> display "File", mnemonic 'f', index 0
/// - `"Save _As"` -> display "Save As", mnemonic 'a', index 5
/// - `"snake__case"` -> display "snake_case", no mnemonic
pub fn parse_mnemonic(text: &str) -> MnemonicText {
    let mut display_text = String::with_capacity(text.len());
    let mut mnemonic: Option<char> = None;
    let mut mnemonic_index: Option<usize> = None;

    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '_' {
            display_text.push(ch);
            continue;
        }
        match chars.peek() {
            Some('_') => {
                display_text.push('_');
                chars.next();
            }
            Some(&next_ch) if next_ch.is_alphanumeric() => {
                if mnemonic.is_none() {
                    mnemonic = Some(next_ch.to_ascii_lowercase());
                    mnemonic_index = Some(display_text.len());
                }
                display_text.push(next_ch);
                chars.next();
            }
            _ => display_text.push(ch),
        }
    }

    MnemonicText {
        display_text,
        mnemonic,
        mnemonic_index,
    }
}
