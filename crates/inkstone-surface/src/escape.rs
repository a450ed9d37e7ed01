//! Content escaping for surface injection
//!
//! Injected text travels inside a template-literal style transport, so
//! backslashes, backticks, and dollar signs must be escaped or document
//! text could terminate the host script early or run as code.

pub fn escape_for_injection(content: &str) -> String {
    let mut escaped = String::with_capacity(content.len());

    for ch in content.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '`' => escaped.push_str("\\`"),
            '$' => escaped.push_str("\\$"),
            _ => escaped.push(ch),
        }
    }

    escaped
}
