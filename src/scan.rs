// File: src/scan.rs

/// Default minimum run length for binary extraction.
pub const DEFAULT_MIN_LENGTH: usize = 4;

/// A printable run found in a byte buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedString {
    pub text: String,
    pub offset: usize,
}

#[inline]
fn is_printable(byte: u8) -> bool {
    (0x20..=0x7e).contains(&byte) || byte == b'\t'
}

/// Collects maximal runs of printable ASCII (plus tab) that are at least
/// `min_length` bytes long, each tagged with its starting offset. A
/// `min_length` of 0 means [`DEFAULT_MIN_LENGTH`].
pub fn extract_strings(bytes: &[u8], min_length: usize) -> Vec<ExtractedString> {
    let min_length = if min_length == 0 { DEFAULT_MIN_LENGTH } else { min_length };
    let mut strings = Vec::new();
    let mut start: Option<usize> = None;

    for (i, &byte) in bytes.iter().enumerate() {
        match (is_printable(byte), start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                push_run(&mut strings, bytes, s, i, min_length);
                start = None;
            }
            _ => {}
        }
    }

    if let Some(s) = start {
        push_run(&mut strings, bytes, s, bytes.len(), min_length);
    }

    strings
}

fn push_run(
    out: &mut Vec<ExtractedString>,
    bytes: &[u8],
    start: usize,
    end: usize,
    min_length: usize,
) {
    if end - start >= min_length {
        // Printable bytes are ASCII, so each byte is one char.
        let text = bytes[start..end].iter().map(|&b| b as char).collect();
        out.push(ExtractedString { text, offset: start });
    }
}
