//! FASTA parser for uploaded peptide files.
//!
//! ## FASTA Format
//!
//! ```text
//! >peptide_1 optional description
//! GLFDIIKKIAES
//! >peptide_2
//! KWKLFKKIEKVG
//! QRIRDFLRNLV
//! ```
//!
//! Headers only delimit records; their text is discarded. Sequence lines of a
//! record are concatenated. Lines before the first header are accumulated
//! like any other sequence line, so headerless plain text yields a single
//! sequence.

/// Parse FASTA lines into an ordered list of raw sequences.
///
/// A line starting with `>` flushes the accumulated sequence (if non-empty)
/// and starts a new record; every other line has trailing whitespace stripped
/// and is appended. Records with no sequence lines produce nothing. Sequences
/// are not validated here.
pub fn parse<I, S>(lines: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut sequences = Vec::new();
    let mut current = String::new();

    for line in lines {
        let line = line.as_ref();
        if line.starts_with('>') {
            if !current.is_empty() {
                sequences.push(std::mem::take(&mut current));
            }
        } else {
            current.push_str(line.trim_end());
        }
    }
    if !current.is_empty() {
        sequences.push(current);
    }

    sequences
}

/// Parse a whole FASTA document.
pub fn parse_str(content: &str) -> Vec<String> {
    parse(content.lines())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_two_records() {
        assert_eq!(parse_str(">a\nXYZ\n>b\nQWE"), vec!["XYZ", "QWE"]);
    }

    #[test]
    fn test_multiline_record_concatenated() {
        let text = ">p1 magainin\nGIGKFLHSAK\nKFGKAFVGEIMNS\n>p2\nKWK\n";
        assert_eq!(parse_str(text), vec!["GIGKFLHSAKKFGKAFVGEIMNS", "KWK"]);
    }

    #[test]
    fn test_no_header_accumulates_everything() {
        assert_eq!(parse_str("AAA  \nCCC\t\nDDD"), vec!["AAACCCDDD"]);
    }

    #[test]
    fn test_empty_records_and_leading_headers_ignored() {
        assert_eq!(parse_str(">empty\n>also empty\n>real\nKLAK\n>trailing"), vec!["KLAK"]);
        assert!(parse_str("").is_empty());
        assert!(parse_str(">only\n\n").is_empty());
    }

    #[test]
    fn test_crlf_line_endings() {
        assert_eq!(parse_str(">a\r\nGLF\r\nDII\r\n>b\r\nKK\r\n"), vec!["GLFDII", "KK"]);
    }

    #[test]
    fn test_idempotent_on_own_output() {
        let once = parse_str(">a\nXYZ\n>b\nQWE");
        let reformatted: String = once.iter().map(|s| format!(">x\n{s}\n")).collect();
        assert_eq!(parse_str(&reformatted), once);
    }

    #[test]
    fn test_accepts_owned_lines() {
        let lines = vec![">h".to_string(), "GG".to_string()];
        assert_eq!(parse(lines), vec!["GG"]);
    }
}
