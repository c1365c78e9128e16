//! Trigger spans
//!
//! An inline span opens with `` `mdj `` followed by one whitespace
//! character and closes at the next backtick. A backslash right before the
//! opening backtick escapes it.

use std::ops::Range;

/// Opening marker, without the mandatory whitespace
pub const TRIGGER_MARKER: &str = "`mdj";

const FENCE: char = '`';
const ESCAPE: u8 = b'\\';

/// One delimited span of a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerSpan {
    /// Byte range of the whole span, delimiters included
    pub range: Range<usize>,
    /// Byte range of the text between the delimiters
    pub body: Range<usize>,
}

impl TriggerSpan {
    pub fn body_text<'a>(&self, text: &'a str) -> &'a str {
        &text[self.body.clone()]
    }
}

/// Find every non-overlapping trigger span, left to right
pub fn find_trigger_spans(text: &str) -> Vec<TriggerSpan> {
    let bytes = text.as_bytes();
    let mut spans = Vec::new();
    let mut pos = 0;

    while let Some(offset) = text[pos..].find(TRIGGER_MARKER) {
        let start = pos + offset;
        // Resume one byte later on any miss; the marker starts with ASCII
        pos = start + 1;

        if start > 0 && bytes[start - 1] == ESCAPE {
            continue;
        }

        let after_marker = start + TRIGGER_MARKER.len();
        let Some(space) = text[after_marker..].chars().next() else {
            continue;
        };
        if !space.is_whitespace() {
            continue;
        }

        let body_start = after_marker + space.len_utf8();
        let Some(close) = text[body_start..].find(FENCE) else {
            continue;
        };
        let body_end = body_start + close;
        let end = body_end + FENCE.len_utf8();

        spans.push(TriggerSpan {
            range: start..end,
            body: body_start..body_end,
        });
        pos = end;
    }

    spans
}

/// Rebuild `text` with each span replaced by `render(body)`
///
/// Returns `None` when the text holds no span.
pub fn replace_trigger_spans<F>(text: &str, mut render: F) -> Option<String>
where
    F: FnMut(&str) -> String,
{
    let spans = find_trigger_spans(text);
    if spans.is_empty() {
        return None;
    }

    let mut out = String::with_capacity(text.len() * 4);
    let mut last = 0;
    for span in &spans {
        out.push_str(&text[last..span.range.start]);
        out.push_str(&render(span.body_text(text)));
        last = span.range.end;
    }
    out.push_str(&text[last..]);

    Some(out)
}
