/// Trim `s` and cut it to at most `max` chars, appending `...` when cut.
///
/// Works on char boundaries so multi-byte titles never split mid-codepoint.
pub fn preview(s: &str, max: usize) -> String {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    let mut out = String::new();
    let mut truncated = false;
    for (idx, ch) in trimmed.chars().enumerate() {
        if idx >= max {
            truncated = true;
            break;
        }
        out.push(ch);
    }

    if truncated {
        out.push_str("...");
    }

    out
}
