//! Delimiter escaping with a reversible private-use-area remapping.
//!
//! Text embedded in a larger structure (a literal array, character data in a
//! markup document) must not contain the structure's own delimiters. An
//! [`Escape`] prefixes those delimiters with an introducer on the way out;
//! on the way in, [`Escape::map`] turns every escaped delimiter into a private
//! use code point so the structure can be parsed without ambiguity, and
//! [`Escape::demap`] restores the delimiters afterwards.

use std::collections::HashMap;

use crate::error::EscapeError;

/// First code point of the Unicode Private Use Area (`U+E000..=U+F8FF`).
pub const PUA_START: u32 = 0xE000;

const PUA_END: u32 = 0xF8FF;

/// Default escape introducer.
pub const DEFAULT_INTRODUCER: char = '\\';

/// # Examples
///
/// ```
/// use mapgraph_util::strings::Escape;
///
/// let esc = Escape::new("[,]").unwrap();
/// let escaped = esc.escape("a,[b]");
/// assert_eq!(escaped, "a\\,\\[b\\]");
///
/// let mapped = esc.map(&escaped);
/// assert!(!mapped.contains(','));
/// assert_eq!(esc.demap(&mapped), "a,[b]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Escape {
    introducer: char,
    chars: Vec<char>,
    ordinals: HashMap<char, u32>,
}

impl Escape {
    /// Escape for `chars` using the default `\` introducer.
    pub fn new(chars: &str) -> Result<Self, EscapeError> {
        Self::with_introducer(DEFAULT_INTRODUCER, chars)
    }

    /// Escape for `chars` using a custom introducer.
    ///
    /// The introducer is always escapable: when it is not part of `chars` it
    /// takes the last ordinal, after the listed delimiters.
    pub fn with_introducer(introducer: char, chars: &str) -> Result<Self, EscapeError> {
        if chars.is_empty() {
            return Err(EscapeError::Empty);
        }
        let mut listed: Vec<char> = Vec::new();
        let mut ordinals = HashMap::new();
        for c in chars.chars() {
            if ordinals.insert(c, listed.len() as u32).is_some() {
                return Err(EscapeError::Duplicate(c));
            }
            listed.push(c);
        }
        if !ordinals.contains_key(&introducer) {
            ordinals.insert(introducer, listed.len() as u32);
            listed.push(introducer);
        }
        if listed.len() as u32 > PUA_END - PUA_START + 1 {
            return Err(EscapeError::TooMany(listed.len()));
        }
        Ok(Self {
            introducer,
            chars: listed,
            ordinals,
        })
    }

    pub fn introducer(&self) -> char {
        self.introducer
    }

    /// Escapable characters in ordinal order.
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Prefixes every escapable character with the introducer.
    pub fn escape(&self, text: &str) -> String {
        let mut escaped = String::with_capacity(text.len() + 4);
        for c in text.chars() {
            if self.ordinals.contains_key(&c) {
                escaped.push(self.introducer);
            }
            escaped.push(c);
        }
        escaped
    }

    /// [`Escape::escape`] lifted over an optional value.
    pub fn escape_opt(&self, text: Option<&str>) -> Option<String> {
        text.map(|t| self.escape(t))
    }

    /// Replaces every escaped character with its private use code point.
    ///
    /// An introducer followed by a character which is not escapable is kept
    /// as is, and so is a dangling introducer at the end of the text.
    pub fn map(&self, text: &str) -> String {
        self.map_with(text, &[])
    }

    /// Like [`Escape::map`], but an escaped character whose ordinal is covered
    /// by `replacements` is replaced by that text instead of a code point.
    pub fn map_with(&self, text: &str, replacements: &[&str]) -> String {
        let mut remapped = String::with_capacity(text.len());
        let mut in_escape = false;
        for c in text.chars() {
            if in_escape {
                match self.ordinals.get(&c) {
                    Some(&pos) => match replacements.get(pos as usize) {
                        Some(replacement) => remapped.push_str(replacement),
                        None => remapped.push(Self::code_point(pos)),
                    },
                    None => {
                        remapped.push(self.introducer);
                        remapped.push(c);
                    }
                }
                in_escape = false;
            } else if c == self.introducer {
                in_escape = true;
            } else {
                remapped.push(c);
            }
        }
        if in_escape {
            remapped.push(self.introducer);
        }
        remapped
    }

    /// Restores the characters replaced by [`Escape::map`], without their
    /// introducer.
    pub fn demap(&self, text: &str) -> String {
        text.chars()
            .map(|c| {
                let offset = (c as u32).wrapping_sub(PUA_START);
                match self.chars.get(offset as usize) {
                    Some(&original) if (c as u32) >= PUA_START => original,
                    _ => c,
                }
            })
            .collect()
    }

    /// Private use code point standing for the escapable character `c`.
    pub fn mapped_char(&self, c: char) -> Option<char> {
        self.ordinals.get(&c).map(|&pos| Self::code_point(pos))
    }

    fn code_point(pos: u32) -> char {
        // In range: the constructor caps the character count to the PUA size.
        char::from_u32(PUA_START + pos).unwrap_or(char::REPLACEMENT_CHARACTER)
    }
}
