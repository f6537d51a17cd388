//! G-code line tokenizer

use regex::Regex;
use std::sync::OnceLock;

use gcodetexture_core::GcodeError;

use super::line::{CodeNumber, Comment, CommentStyle, GcodeLine, Word};

/// M codes whose remaining text is a free-form message or file name
const MESSAGE_CODES: [u16; 5] = [23, 28, 32, 117, 118];

/// Tokenizes raw lines into [`GcodeLine`] records
///
/// Recognized syntax:
/// - Words: a letter followed by an optionally signed decimal number
///   (`X10`, `x-1.5`, `E.25`); whitespace between words is optional
/// - Comments: `; to end of line` and inline `( ... )`
/// - Message commands (`M117 Printing...`): text after the code is kept verbatim
/// - Extended commands (`START_PRINT`, `SET_FAN_SPEED FAN=1`): the whole line is kept verbatim
/// - Checksums and program delimiters (`*71`, `%`): kept verbatim
#[derive(Debug, Clone, Copy, Default)]
pub struct LineParser;

impl LineParser {
    /// Create a new line parser
    pub fn new() -> Self {
        Self
    }

    /// Tokenize one line (without its line terminator)
    ///
    /// # Errors
    /// Returns [`GcodeError::ParseMalformed`] for characters that are not
    /// part of any recognized token, letters without a numeric value, and
    /// unterminated parenthesized comments.
    pub fn parse(&self, line_number: u32, text: &str) -> Result<GcodeLine, GcodeError> {
        let malformed = |reason: String| GcodeError::ParseMalformed {
            line_number,
            reason,
        };

        if extended_command_regex().is_match(text) {
            let start = text.len() - text.trim_start().len();
            return Ok(GcodeLine::new(
                line_number,
                text,
                Vec::new(),
                Vec::new(),
                Some(start..text.len()),
            ));
        }

        let bytes = text.as_bytes();
        let len = bytes.len();
        let mut words = Vec::new();
        let mut comments = Vec::new();
        let mut opaque = None;
        let mut i = 0;

        while i < len {
            match bytes[i] {
                b' ' | b'\t' | b'\r' => i += 1,
                b';' => {
                    comments.push(Comment {
                        style: CommentStyle::Semicolon,
                        span: i..len,
                        text: text[i + 1..].to_string(),
                    });
                    break;
                }
                b'(' => {
                    let close = text[i..]
                        .find(')')
                        .map(|offset| i + offset)
                        .ok_or_else(|| malformed("unterminated '(' comment".to_string()))?;
                    comments.push(Comment {
                        style: CommentStyle::Parenthesis,
                        span: i..close + 1,
                        text: text[i + 1..close].to_string(),
                    });
                    i = close + 1;
                }
                b'*' | b'%' => {
                    opaque = Some(i..len);
                    break;
                }
                b if b.is_ascii_alphabetic() => {
                    let word = scan_word(text, i).map_err(malformed)?;
                    i = word.span.end;
                    let is_message = word.letter == 'M'
                        && CodeNumber::from_value(word.value)
                            .is_some_and(|code| code.subcode.is_none() && MESSAGE_CODES.contains(&code.number));
                    words.push(word);
                    if is_message {
                        while i < len && matches!(bytes[i], b' ' | b'\t') {
                            i += 1;
                        }
                        if i < len {
                            opaque = Some(i..len);
                        }
                        break;
                    }
                }
                _ => {
                    let ch = text[i..].chars().next().unwrap_or('?');
                    return Err(malformed(format!("unexpected character '{}'", ch)));
                }
            }
        }

        Ok(GcodeLine::new(line_number, text, words, comments, opaque))
    }
}

/// Lines that start with a multi-letter identifier are host/firmware macros
fn extended_command_regex() -> &'static Regex {
    static EXTENDED_COMMAND: OnceLock<Regex> = OnceLock::new();
    EXTENDED_COMMAND
        .get_or_init(|| Regex::new(r"^\s*[A-Za-z_][A-Za-z_]+").expect("invalid regex pattern"))
}

/// Scan a word starting at `start`, which must be an ASCII letter
fn scan_word(text: &str, start: usize) -> Result<Word, String> {
    let bytes = text.as_bytes();
    let letter = char::from(bytes[start]).to_ascii_uppercase();
    let value_start = start + 1;
    let mut i = value_start;

    if i < bytes.len() && matches!(bytes[i], b'+' | b'-') {
        i += 1;
    }

    let mut seen_digit = false;
    let mut seen_dot = false;
    while i < bytes.len() {
        match bytes[i] {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        i += 1;
    }

    if !seen_digit {
        return Err(format!("letter '{}' has no numeric value", letter));
    }

    let value_text = &text[value_start..i];
    let value = value_text
        .parse::<f64>()
        .map_err(|e| format!("invalid number '{}' for '{}': {}", value_text, letter, e))?;
    if !value.is_finite() {
        return Err(format!("value for '{}' is out of range", letter));
    }

    Ok(Word {
        letter,
        value,
        span: start..i,
        value_span: value_start..i,
    })
}
