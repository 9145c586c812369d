//! UTF-8 between Rust strings and NUL-terminated native buffers.

/// Decodes the bytes before the first NUL. Malformed sequences become U+FFFD.
pub fn decode(buf: &[u8]) -> String {
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    String::from_utf8_lossy(&buf[..end]).into_owned()
}

/// Longest prefix of `text` that ends on a character boundary and encodes in at most
/// `max_bytes` bytes. Shrinks from the end one whole character at a time.
pub fn fitting_prefix(text: &str, max_bytes: usize) -> &str {
    let mut end = text.len();
    while end > max_bytes {
        end = text[..end]
            .char_indices()
            .next_back()
            .map_or(0, |(index, _)| index);
    }
    &text[..end]
}

/// Writes `text` into `buf` followed by a NUL terminator, dropping whole trailing
/// characters that do not fit. The rest of `buf` is zeroed. Returns the number of text
/// bytes written.
pub fn encode_into(text: &str, buf: &mut [u8]) -> usize {
    let Some(room) = buf.len().checked_sub(1) else {
        return 0;
    };

    let fitted = fitting_prefix(text, room);
    buf[..fitted.len()].copy_from_slice(fitted.as_bytes());
    buf[fitted.len()..].fill(0);
    fitted.len()
}

/// Keeps at most `max_chars` Unicode scalar values.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

/// Cuts `text` at its first NUL, which native strings cannot carry.
pub fn until_nul(text: &str) -> &str {
    match text.find('\0') {
        Some(index) => &text[..index],
        None => text,
    }
}
