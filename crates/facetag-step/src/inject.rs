//! Label injection: rewrite face-record name fields in place.
//!
//! The injector never rebuilds the file. For each face record it tokenizes
//! the record header in the original text (`#id`, `=`, the face keyword,
//! `(`, the opening quote) and splices the new label into the byte span of
//! the first quoted argument. Every byte outside those spans survives
//! unchanged, including continuation-line whitespace; a monolithic pattern
//! match over the whole record would be fragile against nested parentheses
//! and numeric lists resembling the target.

use std::collections::HashSet;
use std::ops::Range;

use crate::error::StepError;
use crate::graph::EntityGraph;

/// Keyword of the face entity whose name field is rewritten.
const FACE_KEYWORD: &str = "ADVANCED_FACE";

/// Rewrite the name field of every shell-referenced face record.
///
/// `labels` must pair one-to-one with [`EntityGraph::shell_faces`]; a length
/// mismatch aborts before any output is produced, reporting both counts.
/// Injecting the same label sequence twice yields byte-identical output.
pub fn inject_labels(
    text: &str,
    graph: &EntityGraph,
    labels: &[String],
) -> Result<String, StepError> {
    let shell = graph.shell_faces();
    if shell.len() != labels.len() {
        return Err(StepError::FaceCountMismatch {
            shell_faces: shell.len(),
            labels: labels.len(),
        });
    }

    let mut seen = HashSet::with_capacity(shell.len());
    let mut edits: Vec<(Range<usize>, String)> = Vec::with_capacity(shell.len());
    for (&id, label) in shell.iter().zip(labels) {
        if !seen.insert(id) {
            return Err(StepError::record_shape(
                id,
                "face referenced more than once by shell records",
            ));
        }
        let record = graph.require(id)?;
        let span = name_span(text, record.offset, id)?;
        edits.push((span, escape_name(label)));
    }

    // Splice back to front so earlier spans stay valid.
    edits.sort_by(|a, b| b.0.start.cmp(&a.0.start));
    let mut out = text.to_string();
    for (range, replacement) in edits {
        out.replace_range(range, &replacement);
    }
    Ok(out)
}

/// Escape a label for embedding in a STEP string literal (`'` doubles).
fn escape_name(label: &str) -> String {
    label.replace('\'', "''")
}

/// Byte span of the first quoted argument of the face record at `offset`.
///
/// Any deviation from the expected `#id = ADVANCED_FACE('name', ...` shape
/// is a parser assumption violation, not recoverable data.
fn name_span(text: &str, offset: usize, id: u64) -> Result<Range<usize>, StepError> {
    let bytes = text.as_bytes();
    let mut i = offset;

    if bytes.get(i) != Some(&b'#') {
        return Err(StepError::record_shape(id, "record does not start with '#'"));
    }
    i += 1;
    let digits_start = i;
    while bytes.get(i).is_some_and(u8::is_ascii_digit) {
        i += 1;
    }
    if i == digits_start {
        return Err(StepError::record_shape(id, "missing entity id digits"));
    }

    skip_whitespace(bytes, &mut i);
    if bytes.get(i) != Some(&b'=') {
        return Err(StepError::record_shape(id, "expected '=' after entity id"));
    }
    i += 1;
    skip_whitespace(bytes, &mut i);

    let keyword_start = i;
    while bytes
        .get(i)
        .is_some_and(|b| b.is_ascii_alphanumeric() || *b == b'_')
    {
        i += 1;
    }
    let keyword = &text[keyword_start..i];
    if keyword != FACE_KEYWORD {
        return Err(StepError::record_shape(
            id,
            format!("expected {FACE_KEYWORD} record, found '{keyword}'"),
        ));
    }

    skip_whitespace(bytes, &mut i);
    if bytes.get(i) != Some(&b'(') {
        return Err(StepError::record_shape(id, "expected '(' after keyword"));
    }
    i += 1;
    skip_whitespace(bytes, &mut i);
    if bytes.get(i) != Some(&b'\'') {
        return Err(StepError::record_shape(
            id,
            "first argument is not a quoted name string",
        ));
    }
    i += 1;

    let name_start = i;
    loop {
        match bytes.get(i) {
            None => {
                return Err(StepError::record_shape(id, "unterminated name string"));
            }
            Some(b'\'') => {
                if bytes.get(i + 1) == Some(&b'\'') {
                    i += 2;
                } else {
                    break;
                }
            }
            Some(_) => i += 1,
        }
    }
    Ok(name_start..i)
}

/// Advance past whitespace, including the line breaks of continuation lines.
fn skip_whitespace(bytes: &[u8], i: &mut usize) {
    while bytes.get(*i).is_some_and(u8::is_ascii_whitespace) {
        *i += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILE: &str = "\
ISO-10303-21;
HEADER;
FILE_DESCRIPTION((''),'2;1');
ENDSEC;
DATA;
#10 = CLOSED_SHELL('',(#20,#21));
#20 = ADVANCED_FACE('',(#30),#40,.T.);
#21 = ADVANCED_FACE('placeholder',(#31),#41,.F.);
ENDSEC;
END-ISO-10303-21;
";

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_inject_rewrites_only_names() {
        let graph = EntityGraph::parse(FILE).unwrap();
        let out = inject_labels(FILE, &graph, &labels(&["top", "bore.wall"])).unwrap();
        assert!(out.contains("#20 = ADVANCED_FACE('top',(#30),#40,.T.);"));
        assert!(out.contains("#21 = ADVANCED_FACE('bore.wall',(#31),#41,.F.);"));
        // Everything outside the two name fields is untouched
        assert!(out.starts_with("ISO-10303-21;\nHEADER;"));
        assert!(out.contains("#10 = CLOSED_SHELL('',(#20,#21));"));
        assert!(out.ends_with("END-ISO-10303-21;\n"));
    }

    #[test]
    fn test_inject_is_idempotent() {
        let graph = EntityGraph::parse(FILE).unwrap();
        let sequence = labels(&["top", "bore.wall"]);
        let once = inject_labels(FILE, &graph, &sequence).unwrap();
        let graph2 = EntityGraph::parse(&once).unwrap();
        let twice = inject_labels(&once, &graph2, &sequence).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_round_trip_without_changes() {
        // Re-injecting the names a file already carries is a byte-level no-op
        let graph = EntityGraph::parse(FILE).unwrap();
        let out = inject_labels(FILE, &graph, &labels(&["", "placeholder"])).unwrap();
        assert_eq!(out, FILE);
    }

    #[test]
    fn test_count_mismatch_reports_both_counts() {
        let graph = EntityGraph::parse(FILE).unwrap();
        let err = inject_labels(FILE, &graph, &labels(&["only_one"])).unwrap_err();
        match err {
            StepError::FaceCountMismatch {
                shell_faces,
                labels,
            } => {
                assert_eq!(shell_faces, 2);
                assert_eq!(labels, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_name_on_continuation_line() {
        let text = "\
#10 = CLOSED_SHELL('',(#20));
#20 = ADVANCED_FACE(
    '',(#30),#40,.T.);
";
        let graph = EntityGraph::parse(text).unwrap();
        let out = inject_labels(text, &graph, &labels(&["rim_01"])).unwrap();
        assert!(out.contains("#20 = ADVANCED_FACE(\n    'rim_01',(#30),#40,.T.);"));
    }

    #[test]
    fn test_non_face_record_is_shape_error() {
        let text = "\
#10 = CLOSED_SHELL('',(#11));
#11 = CARTESIAN_POINT('',(0.,0.,0.));
";
        let graph = EntityGraph::parse(text).unwrap();
        let err = inject_labels(text, &graph, &labels(&["oops"])).unwrap_err();
        assert!(matches!(err, StepError::RecordShape { id: 11, .. }));
    }

    #[test]
    fn test_missing_face_record() {
        let text = "#10 = CLOSED_SHELL('',(#99));\n";
        let graph = EntityGraph::parse(text).unwrap();
        let err = inject_labels(text, &graph, &labels(&["x"])).unwrap_err();
        assert!(matches!(err, StepError::MissingEntity(99)));
    }

    #[test]
    fn test_duplicate_shell_reference() {
        let text = "\
#10 = CLOSED_SHELL('',(#20,#20));
#20 = ADVANCED_FACE('',(#30),#40,.T.);
";
        let graph = EntityGraph::parse(text).unwrap();
        let err = inject_labels(text, &graph, &labels(&["a", "b"])).unwrap_err();
        assert!(matches!(err, StepError::RecordShape { id: 20, .. }));
    }

    #[test]
    fn test_quote_escaping_survives_reparse() {
        let graph = EntityGraph::parse(FILE).unwrap();
        let out = inject_labels(FILE, &graph, &labels(&["it's", "fine"])).unwrap();
        assert!(out.contains("ADVANCED_FACE('it''s',"));
        // The escaped name must not confuse a second pass
        let graph2 = EntityGraph::parse(&out).unwrap();
        let again = inject_labels(&out, &graph2, &labels(&["it's", "fine"])).unwrap();
        assert_eq!(out, again);
    }

    #[test]
    fn test_existing_escaped_name_replaced_cleanly() {
        let text = "\
#10 = CLOSED_SHELL('',(#20));
#20 = ADVANCED_FACE('old''name',(#30),#40,.T.);
";
        let graph = EntityGraph::parse(text).unwrap();
        let out = inject_labels(text, &graph, &labels(&["new"])).unwrap();
        assert!(out.contains("ADVANCED_FACE('new',(#30),#40,.T.);"));
    }
}
