//! Hot-key markers in menu titles.
//!
//! A title like `"_File"` displays as `File` with `F` as its hot-key. Only the first marker counts;
//! later ones, and a marker at the very end, are kept as literal text.

use compact_str::CompactString;
use unicode_width::UnicodeWidthStr;

pub const DEFAULT_HOTKEY_SPECIFIER: char = '_';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Title {
    text: CompactString,
    hotkey: Option<char>,
    /// Byte offset of the hot-key character inside `text`.
    hotkey_offset: Option<usize>,
}

impl Title {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn hotkey(&self) -> Option<char> {
        self.hotkey
    }

    pub fn width(&self) -> usize {
        self.text.width()
    }

    /// Splits the display text around the hot-key character: `(before, hotkey, after)`.
    pub fn split(&self) -> (&str, &str, &str) {
        match self.hotkey_offset {
            Some(at) => {
                let rest = &self.text[at..];
                let len = rest.chars().next().map_or(0, char::len_utf8);
                (&self.text[..at], &rest[..len], &rest[len..])
            }
            None => (&self.text, "", ""),
        }
    }
}

pub fn parse_title(raw: &str, specifier: char) -> Title {
    let mut text = CompactString::default();
    let mut hotkey = None;
    let mut hotkey_offset = None;
    let mut marked = false;

    for ch in raw.chars() {
        if marked {
            marked = false;
            if !ch.is_whitespace() {
                hotkey = Some(normalize(ch));
                hotkey_offset = Some(text.len());
            }
            text.push(ch);
            continue;
        }
        if ch == specifier && hotkey_offset.is_none() && hotkey.is_none() {
            marked = true;
            continue;
        }
        text.push(ch);
    }
    if marked {
        text.push(specifier);
    }

    Title {
        text,
        hotkey,
        hotkey_offset,
    }
}

/// Case-insensitive hot-key comparison.
pub fn hotkey_matches(hotkey: Option<char>, ch: char) -> bool {
    hotkey.is_some_and(|h| h == normalize(ch))
}

fn normalize(ch: char) -> char {
    ch.to_uppercase().next().unwrap_or(ch)
}

#[cfg(test)]
#[path = "../../../tests/unit/ui/menu/hotkey.rs"]
mod tests;
