//! Entity graph: logical records and the shell face sequence.
//!
//! The graph is built from the raw file text without normalizing it. Each
//! logical record keeps the byte offset of its `#` in the source so the
//! injector can rewrite the original bytes surgically; the joined `body`
//! text exists only for scanning. Continuation lines (physical lines that
//! begin with whitespace) are concatenated as-is, with no whitespace
//! rewriting, so quoted string content is never corrupted and files with
//! either per-line or collapsed record layout parse identically.

use std::collections::HashMap;

use crate::error::StepError;

/// One logical record from the file: `#<id> = <body>`.
#[derive(Debug, Clone)]
pub struct EntityRecord {
    /// Numeric entity id.
    pub id: u64,
    /// Record text after the `=`, with continuation lines joined.
    pub body: String,
    /// Index of the physical line the record starts on (0-based).
    pub line: usize,
    /// Byte offset of the record's `#` in the source text.
    pub(crate) offset: usize,
}

/// The parsed entity graph of one STEP file.
///
/// Records are kept in file order and never reordered. The shell face
/// sequence is the authoritative face order: every `#id` referenced in the
/// argument list of each shell record, in appearance order, concatenated
/// across shell records for multi-body files.
#[derive(Debug, Clone)]
pub struct EntityGraph {
    records: Vec<EntityRecord>,
    index: HashMap<u64, usize>,
    shell_faces: Vec<u64>,
}

/// Keywords that carry the ordered face reference list of one body.
const SHELL_KEYWORDS: [&str; 2] = ["CLOSED_SHELL", "OPEN_SHELL"];

impl EntityGraph {
    /// Parse the raw file text into an entity graph.
    ///
    /// Fails with [`StepError::ShellNotFound`] if the file contains no shell
    /// record; an empty face order is never returned silently.
    pub fn parse(text: &str) -> Result<Self, StepError> {
        let mut records: Vec<EntityRecord> = Vec::new();
        let mut pending: Option<(usize, usize, String)> = None;

        let mut offset = 0;
        for (line_idx, raw_line) in text.split_inclusive('\n').enumerate() {
            let content = raw_line.trim_end_matches(['\n', '\r']);
            let continues = content.starts_with(' ') || content.starts_with('\t');
            if continues && pending.is_some() {
                if let Some((_, _, body)) = pending.as_mut() {
                    body.push_str(content);
                }
            } else {
                if let Some(logical) = pending.take() {
                    push_record(&mut records, logical);
                }
                pending = Some((offset, line_idx, content.to_string()));
            }
            offset += raw_line.len();
        }
        if let Some(logical) = pending.take() {
            push_record(&mut records, logical);
        }

        let mut index = HashMap::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            index.insert(record.id, i);
        }

        let mut shell_faces = Vec::new();
        let mut shell_seen = false;
        for record in &records {
            if SHELL_KEYWORDS
                .iter()
                .any(|kw| starts_with_keyword(&record.body, kw))
            {
                shell_seen = true;
                shell_faces.extend(entity_refs(&record.body));
            }
        }
        if !shell_seen {
            return Err(StepError::ShellNotFound);
        }

        Ok(Self {
            records,
            index,
            shell_faces,
        })
    }

    /// The authoritative face order: shell-referenced entity ids, in file
    /// and argument order.
    pub fn shell_faces(&self) -> &[u64] {
        &self.shell_faces
    }

    /// All records, in file order.
    pub fn records(&self) -> &[EntityRecord] {
        &self.records
    }

    /// Look up a record by entity id.
    pub fn get(&self, id: u64) -> Option<&EntityRecord> {
        self.index.get(&id).map(|&i| &self.records[i])
    }

    /// Look up a record by entity id, failing if absent.
    pub fn require(&self, id: u64) -> Result<&EntityRecord, StepError> {
        self.get(id).ok_or(StepError::MissingEntity(id))
    }
}

/// Parse one joined logical line as `#<id> = <body>`, ignoring anything else
/// (header lines, section markers, blank lines).
fn push_record(records: &mut Vec<EntityRecord>, (offset, line, text): (usize, usize, String)) {
    let Some(rest) = text.strip_prefix('#') else {
        return;
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return;
    }
    let Ok(id) = rest[..digits].parse::<u64>() else {
        return;
    };
    let Some(body) = rest[digits..].trim_start().strip_prefix('=') else {
        return;
    };
    records.push(EntityRecord {
        id,
        body: body.trim().to_string(),
        line,
        offset,
    });
}

/// Whether `body` starts with `keyword` at a keyword boundary.
fn starts_with_keyword(body: &str, keyword: &str) -> bool {
    match body.strip_prefix(keyword) {
        Some(rest) => !rest
            .bytes()
            .next()
            .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_'),
        None => false,
    }
}

/// Every `#<id>` token in a record body, in appearance order, skipping
/// quoted string content.
fn entity_refs(body: &str) -> Vec<u64> {
    let bytes = body.as_bytes();
    let mut refs = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\'' => {
                // Skip the string literal, honoring the '' escape
                i += 1;
                while i < bytes.len() {
                    if bytes[i] == b'\'' {
                        if bytes.get(i + 1) == Some(&b'\'') {
                            i += 2;
                            continue;
                        }
                        break;
                    }
                    i += 1;
                }
                i += 1;
            }
            b'#' => {
                let start = i + 1;
                let mut end = start;
                while end < bytes.len() && bytes[end].is_ascii_digit() {
                    end += 1;
                }
                if end > start {
                    if let Ok(id) = body[start..end].parse() {
                        refs.push(id);
                    }
                }
                i = end.max(start);
            }
            _ => i += 1,
        }
    }
    refs
}
