//! Evaluation record loading from JSON and JSON Lines files

use std::path::Path;

use super::EvalRecord;

/// Error type for record loading
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error on line {line}: {source}")]
    Line {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No records found")]
    Empty,
}

/// Load records from a `.json` array or a `.jsonl` file
pub fn load_records_from_file(path: impl AsRef<Path>) -> Result<Vec<EvalRecord>, LoadError> {
    let content = std::fs::read_to_string(path.as_ref())?;
    let records = load_records_from_str(&content)?;
    tracing::debug!(
        count = records.len(),
        path = %path.as_ref().display(),
        "Loaded evaluation records"
    );
    Ok(records)
}

/// Parse records; input starting with `[` is a JSON array, anything else is
/// one record per non-blank line
pub fn load_records_from_str(content: &str) -> Result<Vec<EvalRecord>, LoadError> {
    let records: Vec<EvalRecord> = if content.trim_start().starts_with('[') {
        serde_json::from_str(content)?
    } else {
        content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(idx, line)| {
                serde_json::from_str(line).map_err(|source| LoadError::Line {
                    line: idx + 1,
                    source,
                })
            })
            .collect::<Result<_, _>>()?
    };

    if records.is_empty() {
        return Err(LoadError::Empty);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jsonl_with_blank_lines() {
        let content = r#"
{"doc": {"question": "q1", "answer": "A"}, "results": ["A"]}

{"doc": {"question": "q2", "answer": "B", "difficulty": "hard"}}
"#;
        let records = load_records_from_str(content).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].results, vec!["A"]);
        assert!(records[1].results.is_empty());
        assert_eq!(records[1].doc.text("difficulty").as_deref(), Some("hard"));
    }

    #[test]
    fn test_json_array() {
        let content = r#"[{"doc": {"question": "q", "answer": "C"}, "results": ["(C)"]}]"#;
        let records = load_records_from_str(content).unwrap();
        assert_eq!(records[0].doc.answer, "C");
    }

    #[test]
    fn test_bad_line_reports_line_number() {
        let content = "{\"doc\": {\"question\": \"q\"}}\n{not json}\n";
        match load_records_from_str(content) {
            Err(LoadError::Line { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected line error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(load_records_from_str("\n  \n"), Err(LoadError::Empty)));
        assert!(matches!(load_records_from_str("[]"), Err(LoadError::Empty)));
    }
}
