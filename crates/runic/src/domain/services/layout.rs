//! Line layout for image rendering
//!
//! Widths count glyphs (chars), not bytes.

use crate::domain::value_objects::WrapMode;

/// Break `text` into lines according to `mode`
///
/// Explicit newlines always break. A `line_width` of 0 disables wrapping.
pub fn layout_lines(text: &str, mode: WrapMode, line_width: usize) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        if line_width == 0 {
            lines.push(paragraph.to_string());
            continue;
        }
        match mode {
            WrapMode::None => lines.push(paragraph.to_string()),
            WrapMode::Flow => flow(paragraph, line_width, &mut lines),
            WrapMode::Force => force(paragraph, line_width, &mut lines),
        }
    }

    lines
}

fn flow(paragraph: &str, width: usize, lines: &mut Vec<String>) {
    let mut current = String::new();
    let mut current_len = 0;

    for word in paragraph.split_whitespace() {
        let word_len = word.chars().count();
        if current_len > 0 && current_len + 1 + word_len > width {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }

    lines.push(current);
}

fn force(paragraph: &str, width: usize, lines: &mut Vec<String>) {
    let chars: Vec<char> = paragraph.chars().collect();
    if chars.is_empty() {
        lines.push(String::new());
        return;
    }
    lines.extend(chars.chunks(width).map(|chunk| chunk.iter().collect()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_only_breaks_on_newlines() {
        assert_eq!(
            layout_lines("a long line\nnext", WrapMode::None, 3),
            vec!["a long line", "next"]
        );
    }

    #[test]
    fn test_flow_wraps_between_words() {
        assert_eq!(
            layout_lines("ka ra to mene", WrapMode::Flow, 5),
            vec!["ka ra", "to", "mene"]
        );
    }

    #[test]
    fn test_flow_keeps_overlong_words_whole() {
        assert_eq!(
            layout_lines("a madoujiword b", WrapMode::Flow, 4),
            vec!["a", "madoujiword", "b"]
        );
    }

    #[test]
    fn test_force_breaks_mid_word() {
        assert_eq!(
            layout_lines("abcdefg", WrapMode::Force, 3),
            vec!["abc", "def", "g"]
        );
    }

    #[test]
    fn test_widths_count_glyphs() {
        assert_eq!(layout_lines("áéíó", WrapMode::Force, 2), vec!["áé", "íó"]);
    }

    #[test]
    fn test_zero_width_disables_wrapping() {
        assert_eq!(layout_lines("abc def", WrapMode::Force, 0), vec!["abc def"]);
    }

    #[test]
    fn test_empty_lines_survive() {
        assert_eq!(layout_lines("a\n\nb", WrapMode::Flow, 8), vec!["a", "", "b"]);
    }
}
