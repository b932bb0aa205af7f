// File: src/parser.rs
//! Reading and writing the tab-separated trigram frequency format.
//!
//! ```text
//! # Model Type: lowercase
//! [^]	t	h	1532
//! t	h	e	9120
//! h	e	[$]	812
//! [SP]	o	f	77
//! ```

use crate::core::alphabet::{
    alias_for_code, code_for_alias, ALPHABET_SIZE, BEGIN_MARKER, END_MARKER, MODEL_TYPE_PREFIX,
};
use crate::core::types::TrigramCounts;
use crate::error::{LineError, Result, StringsError};
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Begin,
    End,
    Code(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Strict,
    Lenient,
}

/// Accumulates counts and the model type line by line.
struct ModelDecoder {
    counts: TrigramCounts,
    model_type: Option<String>,
    mode: Mode,
    skipped: usize,
}

impl ModelDecoder {
    fn new(mode: Mode) -> Self {
        Self {
            counts: TrigramCounts::new(),
            model_type: None,
            mode,
            skipped: 0,
        }
    }

    fn feed(&mut self, line_no: usize, raw: &str) -> Result<()> {
        let line = raw.strip_suffix('\r').unwrap_or(raw);

        if line.starts_with('#') {
            if let Some(idx) = line.find(MODEL_TYPE_PREFIX) {
                self.model_type = Some(line[idx + MODEL_TYPE_PREFIX.len()..].to_string());
            }
            return Ok(());
        }
        if line.trim().is_empty() {
            return Ok(());
        }

        match decode_data_line(line).and_then(|(entry, count)| self.record(entry, count)) {
            Ok(()) => Ok(()),
            Err(reason) => match self.mode {
                Mode::Strict => Err(StringsError::Format { line: line_no, reason }),
                Mode::Lenient => {
                    debug!(line = line_no, %reason, "skipping malformed model line");
                    self.skipped += 1;
                    Ok(())
                }
            },
        }
    }

    fn record(&mut self, entry: [Token; 3], count: u64) -> std::result::Result<(), LineError> {
        match entry {
            [Token::Begin, _, Token::End] => self.counts.add_untabled(count),
            [Token::Begin, Token::Code(b), Token::Code(c)] => self.counts.add_begin(b, c, count),
            [Token::Code(a), Token::Code(b), Token::End] => self.counts.add_end(a, b, count),
            [Token::Code(a), Token::Code(b), Token::Code(c)] => {
                self.counts.add_trigram(a, b, c, count)
            }
            // Ruled out by check_positions.
            _ => Ok(()),
        }
    }

    fn finish(self) -> Result<(TrigramCounts, String)> {
        if self.skipped > 0 {
            warn!(skipped = self.skipped, "ignored malformed lines in model text");
        }
        match self.model_type {
            Some(model_type) if !model_type.is_empty() => Ok((self.counts, model_type)),
            _ => Err(StringsError::MissingHeader),
        }
    }
}

fn decode_data_line(line: &str) -> std::result::Result<([Token; 3], u64), LineError> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() != 4 {
        return Err(LineError::FieldCount(fields.len()));
    }

    let count = fields[3]
        .trim()
        .parse::<u64>()
        .map_err(|_| LineError::InvalidCount(fields[3].to_string()))?;

    let entry = [
        resolve_token(fields[0])?,
        resolve_token(fields[1])?,
        resolve_token(fields[2])?,
    ];
    check_positions(&entry)?;

    Ok((entry, count))
}

fn resolve_token(token: &str) -> std::result::Result<Token, LineError> {
    if token == BEGIN_MARKER {
        return Ok(Token::Begin);
    }
    if token == END_MARKER {
        return Ok(Token::End);
    }

    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => {
            if (c as usize) < ALPHABET_SIZE {
                Ok(Token::Code(c as u8))
            } else {
                Err(LineError::NonAsciiToken(token.to_string()))
            }
        }
        _ => code_for_alias(token)
            .map(Token::Code)
            .ok_or_else(|| LineError::UnknownToken(token.to_string())),
    }
}

/// Begin may only open a line, end may only close it.
fn check_positions(entry: &[Token; 3]) -> std::result::Result<(), LineError> {
    for (position, token) in entry.iter().enumerate() {
        match token {
            Token::Begin if position != 0 => {
                return Err(LineError::MisplacedSentinel {
                    token: BEGIN_MARKER,
                    position: position + 1,
                });
            }
            Token::End if position != 2 => {
                return Err(LineError::MisplacedSentinel {
                    token: END_MARKER,
                    position: position + 1,
                });
            }
            _ => {}
        }
    }
    Ok(())
}

/// Streams a model file, failing on the first malformed line.
pub fn parse_model_file(path: &Path) -> Result<(TrigramCounts, String)> {
    let reader = BufReader::new(File::open(path)?);
    let mut decoder = ModelDecoder::new(Mode::Strict);

    for (idx, line) in reader.lines().enumerate() {
        decoder.feed(idx + 1, &line?)?;
    }

    decoder.finish()
}

/// Parses model text held in memory, skipping malformed lines.
pub fn parse_model_str(content: &str) -> Result<(TrigramCounts, String)> {
    let mut decoder = ModelDecoder::new(Mode::Lenient);

    for (idx, line) in content.split('\n').enumerate() {
        decoder.feed(idx + 1, line)?;
    }

    decoder.finish()
}

fn render_token(code: u8) -> String {
    match alias_for_code(code) {
        Some(entry) => entry.alias.to_string(),
        None => (code as char).to_string(),
    }
}

/// Writes counts in the model file format. Only table cells are written, so
/// counts that had no cell (single-character strings) are not carried over.
pub fn write_model<W: Write>(
    counts: &TrigramCounts,
    model_type: &str,
    mut writer: W,
) -> Result<()> {
    writeln!(writer, "# Trigram frequencies")?;
    writeln!(writer, "# {}{}", MODEL_TYPE_PREFIX, model_type)?;

    let codes = 0..ALPHABET_SIZE as u8;

    for a in codes.clone() {
        for b in codes.clone() {
            let count = counts.begin(a, b);
            if count > 0 {
                let (a, b) = (render_token(a), render_token(b));
                writeln!(writer, "{}\t{}\t{}\t{}", BEGIN_MARKER, a, b, count)?;
            }
        }
    }

    for a in codes.clone() {
        for b in codes.clone() {
            for c in codes.clone() {
                let count = counts.trigram(a, b, c);
                if count > 0 {
                    writeln!(
                        writer,
                        "{}\t{}\t{}\t{}",
                        render_token(a),
                        render_token(b),
                        render_token(c),
                        count
                    )?;
                }
            }
        }
    }

    for a in codes.clone() {
        for b in codes.clone() {
            let count = counts.end(a, b);
            if count > 0 {
                let (a, b) = (render_token(a), render_token(b));
                writeln!(writer, "{}\t{}\t{}\t{}", a, b, END_MARKER, count)?;
            }
        }
    }

    writer.flush()?;
    Ok(())
}
