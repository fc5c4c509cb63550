//! POSIX shell quoting for the remote command boundary.
//!
//! Arguments travel as arrays everywhere inside the crate. The remote shell
//! does not tokenize on our behalf, so the single place that serializes an
//! argument vector into a command string is [`join_command`], and it quotes
//! every word. Both transports therefore observe the same argument
//! boundaries for any input, including spaces, quotes, and metacharacters.

/// Bytes that never need quoting in a POSIX shell word.
fn is_safe_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'/' | b':' | b'=' | b'@' | b'+' | b',' | b'%')
}

/// Quote a single word for a POSIX shell.
///
/// Safe words are returned unchanged; everything else is wrapped in single
/// quotes, with embedded single quotes spelled `'\''`.
#[must_use]
pub fn quote(word: &str) -> String {
    if !word.is_empty() && word.bytes().all(is_safe_byte) {
        return word.to_string();
    }
    let mut out = String::with_capacity(word.len() + 2);
    out.push('\'');
    for ch in word.chars() {
        if ch == '\'' {
            out.push_str("'\\''");
        } else {
            out.push(ch);
        }
    }
    out.push('\'');
    out
}

/// Serialize a binary path plus argument vector into one remote command line.
#[must_use]
pub fn join_command(binary: &str, args: &[String]) -> String {
    let mut out = quote(binary);
    for arg in args {
        out.push(' ');
        out.push_str(&quote(arg));
    }
    out
}
