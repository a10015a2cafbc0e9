//! Logging utilities for sanitizing chat-supplied strings so logs stay single-line.
//! Player and gang names arrive straight from chat and may carry control characters.

/// Escape a string for single-line logging:
/// - `\n` => `\\n`
/// - `\r` => `\\r`
/// - `\t` => `\\t`
/// - backslash => `\\\\`
///   Truncates long strings with an ellipsis; names longer than the cap are noise.
pub fn escape_log(s: &str) -> String {
    const MAX_PREVIEW: usize = 120;
    let mut out = String::with_capacity(s.len().min(MAX_PREVIEW) + 8);
    for (count, ch) in s.chars().enumerate() {
        if count >= MAX_PREVIEW {
            out.push('…');
            break;
        }
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                use std::fmt::Write;
                let _ = write!(&mut out, "\\x{:02X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::escape_log;

    #[test]
    fn escapes_newlines() {
        let esc = escape_log("Gang\nName\r\tEnd");
        assert_eq!(esc, "Gang\\nName\\r\\tEnd");
        assert!(!esc.contains('\n'));
    }

    #[test]
    fn truncates_long_names() {
        let long = "x".repeat(400);
        let esc = escape_log(&long);
        assert!(esc.chars().count() <= 121);
        assert!(esc.ends_with('…'));
    }
}
