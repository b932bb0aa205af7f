// File: src/core/alphabet.rs
//! Fixed configuration of the 128-symbol alphabet: control-character aliases
//! used by the model-file format, and the length-calibrated thresholds.

/// Number of symbols in the scoring alphabet (7-bit ASCII).
pub const ALPHABET_SIZE: usize = 128;

/// Shortest candidate the trigram formula can score.
pub const MINIMUM_STRING_LENGTH: usize = 3;

/// Score given to candidates shorter than [`MINIMUM_STRING_LENGTH`].
pub const DEFAULT_LOG_VALUE: f64 = -20.0;

/// Threshold used for every candidate longer than the calibrated table.
pub const MAX_NG_THRESHOLD: f64 = -6.3;

pub const BEGIN_MARKER: &str = "[^]";
pub const END_MARKER: &str = "[$]";
pub const MODEL_TYPE_PREFIX: &str = "Model Type: ";
pub const LOWERCASE_MODEL_TYPE: &str = "lowercase";

/// A bracketed alias standing in for a control character in model files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlAlias {
    pub code: u8,
    pub alias: &'static str,
    pub description: &'static str,
}

const fn alias(code: u8, alias: &'static str, description: &'static str) -> ControlAlias {
    ControlAlias { code, alias, description }
}

/// Codes 0..=32 in order, then DEL.
pub static CONTROL_ALIASES: [ControlAlias; 34] = [
    alias(0, "[NUL]", "null"),
    alias(1, "[SOH]", "start of header"),
    alias(2, "[STX]", "start of text"),
    alias(3, "[ETX]", "end of text"),
    alias(4, "[EOT]", "end of transmission"),
    alias(5, "[ENQ]", "enquiry"),
    alias(6, "[ACK]", "acknowledgement"),
    alias(7, "[BEL]", "bell"),
    alias(8, "[BS]", "backspace"),
    alias(9, "[HT]", "horizontal tab"),
    alias(10, "[LF]", "line feed"),
    alias(11, "[VT]", "vertical tab"),
    alias(12, "[FF]", "form feed"),
    alias(13, "[CR]", "carriage return"),
    alias(14, "[SO]", "shift out"),
    alias(15, "[SI]", "shift in"),
    alias(16, "[DLE]", "data link escape"),
    alias(17, "[DC1]", "device control 1"),
    alias(18, "[DC2]", "device control 2"),
    alias(19, "[DC3]", "device control 3"),
    alias(20, "[DC4]", "device control 4"),
    alias(21, "[NAK]", "negative acknowledge"),
    alias(22, "[SYN]", "synchronous idle"),
    alias(23, "[ETB]", "end of transmission block"),
    alias(24, "[CAN]", "cancel"),
    alias(25, "[EM]", "end of medium"),
    alias(26, "[SUB]", "substitute"),
    alias(27, "[ESC]", "escape"),
    alias(28, "[FS]", "file separator"),
    alias(29, "[GS]", "group separator"),
    alias(30, "[RS]", "record separator"),
    alias(31, "[US]", "unit separator"),
    alias(32, "[SP]", "space"),
    alias(127, "[DEL]", "delete"),
];

/// Thresholds indexed by normalized length. Lengths below 4 can never pass.
pub static NG_THRESHOLDS: [f64; 101] = [
    10.0, 10.0, 10.0, 10.0, -2.71, -3.26, -3.52, -3.84, -4.23, -4.49, // 0 - 9
    -4.55, -4.74, -4.88, -5.03, -5.06, -5.2, -5.24, -5.29, -5.29, -5.42, // 10 - 19
    -5.51, -5.52, -5.53, -5.6, -5.6, -5.62, -5.7, -5.7, -5.78, -5.79, // 20 - 29
    -5.81, -5.81, -5.84, -5.85, -5.86, -5.88, -5.92, -5.92, -5.93, -5.95, // 30 - 39
    -5.99, -6.0, -6.0, -6.0, -6.02, -6.02, -6.02, -6.05, -6.06, -6.07, // 40 - 49
    -6.08, -6.1, -6.12, -6.12, -6.13, -6.13, -6.13, -6.13, -6.13, -6.13, // 50 - 59
    -6.13, -6.15, -6.15, -6.16, -6.16, -6.16, -6.17, -6.19, -6.19, -6.21, // 60 - 69
    -6.21, -6.21, -6.21, -6.21, -6.21, -6.25, -6.25, -6.25, -6.25, -6.25, // 70 - 79
    -6.25, -6.25, -6.26, -6.26, -6.26, -6.26, -6.26, -6.26, -6.26, -6.26, // 80 - 89
    -6.26, -6.29, -6.29, -6.3, -6.3, -6.3, -6.3, -6.3, -6.3, -6.3, -6.3, // 90 - 100
];

/// Threshold a candidate of `len` normalized characters must exceed.
pub fn threshold_for(len: usize) -> f64 {
    NG_THRESHOLDS.get(len).copied().unwrap_or(MAX_NG_THRESHOLD)
}

/// Resolves a bracketed alias such as `[HT]` to its code.
pub fn code_for_alias(token: &str) -> Option<u8> {
    CONTROL_ALIASES
        .iter()
        .find(|entry| entry.alias == token)
        .map(|entry| entry.code)
}

/// Returns the alias entry for a control code, if it has one.
pub fn alias_for_code(code: u8) -> Option<&'static ControlAlias> {
    match code {
        0..=32 => Some(&CONTROL_ALIASES[code as usize]),
        127 => Some(&CONTROL_ALIASES[33]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_map_both_ways() {
        assert_eq!(code_for_alias("[NUL]"), Some(0));
        assert_eq!(code_for_alias("[HT]"), Some(9));
        assert_eq!(code_for_alias("[SP]"), Some(32));
        assert_eq!(code_for_alias("[DEL]"), Some(127));
        assert_eq!(code_for_alias("[XYZ]"), None);

        for entry in CONTROL_ALIASES.iter() {
            assert_eq!(code_for_alias(entry.alias), Some(entry.code));
            assert_eq!(alias_for_code(entry.code), Some(entry));
        }
        assert_eq!(alias_for_code(9).map(|a| a.description), Some("horizontal tab"));
        assert!(alias_for_code(b'a').is_none());
    }

    #[test]
    fn short_lengths_use_unreachable_threshold() {
        for len in 0..4 {
            assert_eq!(threshold_for(len), 10.0);
        }
    }

    #[test]
    fn calibrated_values() {
        assert_eq!(NG_THRESHOLDS.len(), 101);
        assert_eq!(threshold_for(4), -2.71);
        assert_eq!(threshold_for(5), -3.26);
        assert_eq!(threshold_for(10), -4.55);
        assert_eq!(threshold_for(100), -6.3);
    }

    #[test]
    fn long_candidates_clamp_to_ceiling() {
        assert_eq!(threshold_for(101), MAX_NG_THRESHOLD);
        assert_eq!(threshold_for(5000), MAX_NG_THRESHOLD);
    }

    #[test]
    fn thresholds_never_loosen_with_length() {
        for len in 5..=100 {
            assert!(
                threshold_for(len) <= threshold_for(len - 1),
                "threshold rises at length {}",
                len
            );
        }
    }
}
