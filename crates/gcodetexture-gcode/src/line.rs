//! Parsed G-code line types
//!
//! A [`GcodeLine`] keeps the original text of the line together with the
//! byte spans of every word, so a single word value can be replaced
//! without touching the rest of the line.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// Numeric part of a G or M code, e.g. `1` for `G1` or `61.1` for `G61.1`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CodeNumber {
    /// Integer part of the code
    pub number: u16,
    /// First decimal digit, if the code has one
    pub subcode: Option<u8>,
}

impl CodeNumber {
    /// Create a plain code without a subcode
    pub fn new(number: u16) -> Self {
        Self {
            number,
            subcode: None,
        }
    }

    /// Convert a word value into a code number
    ///
    /// Returns `None` for negative values or values that do not fit a code.
    pub fn from_value(value: f64) -> Option<Self> {
        if !value.is_finite() || value < 0.0 || value > f64::from(u16::MAX) {
            return None;
        }
        let whole = value.trunc();
        let fraction = ((value - whole) * 10.0).round();
        let number = whole as u16;
        if fraction >= 10.0 {
            return Some(Self::new(number.saturating_add(1)));
        }
        let subcode = (fraction > 0.0).then_some(fraction as u8);
        Some(Self { number, subcode })
    }

    /// Check for a plain code number (no subcode)
    pub fn is(&self, number: u16) -> bool {
        self.number == number && self.subcode.is_none()
    }
}

impl fmt::Display for CodeNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.subcode {
            Some(sub) => write!(f, "{}.{}", self.number, sub),
            None => write!(f, "{}", self.number),
        }
    }
}

/// A single letter/value word such as `X10.5`
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    /// Upper-cased word letter
    pub letter: char,
    /// Parsed numeric value
    pub value: f64,
    /// Byte span of the whole word (letter and value) in the raw line
    pub span: Range<usize>,
    /// Byte span of the value text only
    pub value_span: Range<usize>,
}

/// Comment delimiter style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommentStyle {
    /// `; to end of line`
    Semicolon,
    /// `( inline )`
    Parenthesis,
}

/// A comment found on a line
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    /// Delimiter style
    pub style: CommentStyle,
    /// Byte span including the delimiters
    pub span: Range<usize>,
    /// Comment text without delimiters
    pub text: String,
}

/// The handful of fields the rewriter consumes, extracted once per line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MotionFields {
    /// G codes in line order
    pub g_codes: Vec<CodeNumber>,
    /// M codes in line order
    pub m_codes: Vec<CodeNumber>,
    /// X word value
    pub x: Option<f64>,
    /// Y word value
    pub y: Option<f64>,
    /// Z word value
    pub z: Option<f64>,
    /// E word value
    pub e: Option<f64>,
    /// F word value
    pub f: Option<f64>,
    /// Whether the line carries arc centre or radius words (I, J, K, R)
    pub has_arc_parameters: bool,
    /// First axis letter that appeared more than once, if any
    pub repeated_axis: Option<char>,
}

impl MotionFields {
    /// Build the record from a list of words
    pub fn from_words(words: &[Word]) -> Self {
        let mut fields = Self::default();
        for word in words {
            match word.letter {
                'G' => fields.g_codes.extend(CodeNumber::from_value(word.value)),
                'M' => fields.m_codes.extend(CodeNumber::from_value(word.value)),
                'X' => fields.set_axis('X', word.value),
                'Y' => fields.set_axis('Y', word.value),
                'Z' => fields.set_axis('Z', word.value),
                'E' => fields.set_axis('E', word.value),
                'F' => fields.f = Some(word.value),
                'I' | 'J' | 'K' | 'R' => fields.has_arc_parameters = true,
                _ => {}
            }
        }
        fields
    }

    fn set_axis(&mut self, letter: char, value: f64) {
        let slot = match letter {
            'X' => &mut self.x,
            'Y' => &mut self.y,
            'Z' => &mut self.z,
            _ => &mut self.e,
        };
        if slot.is_some() {
            self.repeated_axis.get_or_insert(letter);
        } else {
            *slot = Some(value);
        }
    }

    /// Whether any of X, Y or Z is present
    pub fn has_axis_words(&self) -> bool {
        self.x.is_some() || self.y.is_some() || self.z.is_some()
    }

    /// Whether both X and Y are present
    pub fn has_xy(&self) -> bool {
        self.x.is_some() && self.y.is_some()
    }

    /// Check for a plain G code
    pub fn has_g(&self, number: u16) -> bool {
        self.g_codes.iter().any(|code| code.is(number))
    }

    /// Check for a plain M code
    pub fn has_m(&self, number: u16) -> bool {
        self.m_codes.iter().any(|code| code.is(number))
    }
}

/// A tokenized G-code line
#[derive(Debug, Clone, PartialEq)]
pub struct GcodeLine {
    /// 1-based line number in the input stream
    pub line_number: u32,
    raw: String,
    words: Vec<Word>,
    comments: Vec<Comment>,
    opaque: Option<Range<usize>>,
    fields: MotionFields,
}

impl GcodeLine {
    pub(crate) fn new(
        line_number: u32,
        raw: &str,
        words: Vec<Word>,
        comments: Vec<Comment>,
        opaque: Option<Range<usize>>,
    ) -> Self {
        let fields = MotionFields::from_words(&words);
        Self {
            line_number,
            raw: raw.to_string(),
            words,
            comments,
            opaque,
            fields,
        }
    }

    /// Original line text, without its line terminator
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Words in line order
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    /// Comments in line order
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// Text of the first comment, if any
    pub fn comment(&self) -> Option<&str> {
        self.comments.first().map(|c| c.text.as_str())
    }

    /// Text the tokenizer kept verbatim (message text, extended commands, checksums)
    pub fn opaque_text(&self) -> Option<&str> {
        self.opaque.clone().map(|span| &self.raw[span])
    }

    /// Whether the line has no content besides whitespace
    pub fn is_blank(&self) -> bool {
        self.words.is_empty() && self.comments.is_empty() && self.opaque.is_none()
    }

    /// Whether the line has any words
    pub fn has_words(&self) -> bool {
        !self.words.is_empty()
    }

    /// First word with the given letter
    pub fn word(&self, letter: char) -> Option<&Word> {
        let letter = letter.to_ascii_uppercase();
        self.words.iter().find(|w| w.letter == letter)
    }

    /// Value text of a word as written in the input
    pub fn value_text(&self, word: &Word) -> &str {
        &self.raw[word.value_span.clone()]
    }

    /// Fields consumed by the machine model and the rewriter
    pub fn fields(&self) -> &MotionFields {
        &self.fields
    }
}

impl fmt::Display for GcodeLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
