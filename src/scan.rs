//! Structural skim over raw JSON bytes: advance to a terminator without
//! building values, stepping over UTF-8 multi-byte sequences, string escape
//! sequences, and nested strings/arrays/objects so a terminator inside them
//! can never end the outer scan early.

use smallvec::SmallVec;

use crate::error::ExpectedBytes;
use crate::{Error, Result};

/// JSON whitespace: space, horizontal tab, line feed, carriage return.
pub(crate) fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r')
}

pub(crate) fn skim_whitespace(buf: &[u8], start: usize, end: usize) -> usize {
    let mut i = start;
    while i < end && is_whitespace(buf[i]) {
        i += 1;
    }
    i
}

/// Match exactly one byte at `at` against `set`. Advances past it on a match;
/// on a mismatch fails if `required`, otherwise stays put.
pub(crate) fn skim_byte(
    buf: &[u8],
    at: usize,
    end: usize,
    set: &[u8],
    required: bool,
) -> Result<usize> {
    let found = if at < end { Some(buf[at]) } else { None };
    match found {
        Some(byte) if set.contains(&byte) => Ok(at + 1),
        _ if required => Err(Error::UnexpectedByte {
            expected: ExpectedBytes::from_slice(set),
            found,
            offset: at,
        }),
        _ => Ok(at),
    }
}

/// A structure the skim has stepped into and must fully cross before the
/// outer terminator set applies again. The closer is always consumed.
struct Nested {
    closer: u8,
    in_string: bool,
}

/// Advance from `start` until a byte of `terminators` is found at the current
/// nesting level, returning the final position (`end` if none is found).
///
/// `in_string` describes the context the scan starts in; nesting below it is
/// tracked with an explicit stack bounded by `max_depth` so adversarially deep
/// documents cannot grow the call stack.
pub(crate) fn skim_until(
    buf: &[u8],
    start: usize,
    end: usize,
    in_string: bool,
    terminators: &[u8],
    include_terminator: bool,
    max_depth: usize,
) -> Result<usize> {
    let mut stack: SmallVec<[Nested; 16]> = SmallVec::new();
    let mut i = start;
    while i < end {
        let byte = buf[i];

        // UTF-8 lead bytes carry the sequence length; the sequence is skipped
        // whole so continuation bytes are never inspected and a terminator can
        // never match inside one.
        if byte & 0b1110_0000 == 0b1100_0000 {
            i = (i + 2).min(end);
            continue;
        }
        if byte & 0b1111_0000 == 0b1110_0000 {
            i = (i + 3).min(end);
            continue;
        }
        if byte & 0b1111_1000 == 0b1111_0000 {
            i = (i + 4).min(end);
            continue;
        }

        let inside_string = stack.last().map_or(in_string, |nested| nested.in_string);

        if inside_string && byte == b'\\' {
            i += escape_sequence_length(buf, i, end)?;
            continue;
        }

        let stops_here = match stack.last() {
            Some(nested) => byte == nested.closer,
            None => terminators.contains(&byte),
        };
        if stops_here {
            if stack.pop().is_some() {
                // Closers of nested structures are always consumed.
                i += 1;
                continue;
            }
            if include_terminator {
                i += 1;
            }
            return Ok(i);
        }

        i += 1;
        if !inside_string {
            let opened = match byte {
                b'"' => Some(Nested {
                    closer: b'"',
                    in_string: true,
                }),
                b'[' => Some(Nested {
                    closer: b']',
                    in_string: false,
                }),
                b'{' => Some(Nested {
                    closer: b'}',
                    in_string: false,
                }),
                _ => None,
            };
            if let Some(nested) = opened {
                if stack.len() >= max_depth {
                    return Err(Error::DepthLimitExceeded {
                        limit: max_depth,
                        offset: i - 1,
                    });
                }
                stack.push(nested);
            }
        }
    }
    Ok(i)
}

/// Total byte length of the escape sequence starting at `at` (which holds the
/// backslash): `\xHH` is 4 bytes, `\uHHHH` is 6, `\` followed by an octal
/// digit is 4, any other single escaped character is 2.
pub(crate) fn escape_sequence_length(buf: &[u8], at: usize, end: usize) -> Result<usize> {
    debug_assert_eq!(buf.get(at), Some(&b'\\'));
    if at + 1 >= end {
        return Err(Error::InvalidEscapeSequence { offset: at });
    }
    let len = match buf[at + 1] {
        b'x' => 4,
        b'u' => 6,
        b'0'..=b'9' => 4,
        _ => 2,
    };
    if at + len > end {
        return Err(Error::InvalidEscapeSequence { offset: at });
    }
    Ok(len)
}
