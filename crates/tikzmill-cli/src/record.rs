//! JSONL record schema: one role-tagged message tuple per figure.
//!
//! The schema is the AutomaTikZ instruction-tuning shape downstream
//! consumers expect: a fixed system instruction, a user message
//! embedding the prefixed document identifier and the cleaned caption,
//! and the assembled document as the assistant message.

use std::io::{self, Write};

use serde::{Deserialize, Serialize};
use tikzmill::TikzFigure;

/// Fixed system instruction carried by every record.
pub const SYSTEM_INSTRUCTION: &str =
    "AutomaTikZ: Text-Guided Synthesis of Scientific Vector Graphics with TikZ";

/// Source-collection tag prefixed to the identifier in the user message.
pub const ID_PREFIX: &str = "iArxiv-";

/// One chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

/// One output record: a three-message tuple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub messages: Vec<Message>,
}

impl Record {
    /// Build the record for one extracted figure.
    pub fn new(id: &str, figure: &TikzFigure) -> Self {
        Self {
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: SYSTEM_INSTRUCTION.to_string(),
                },
                Message {
                    role: "user".to_string(),
                    content: format!("{ID_PREFIX}{id}:{}", figure.caption),
                },
                Message {
                    role: "assistant".to_string(),
                    content: figure.code.clone(),
                },
            ],
        }
    }
}

/// Serialize one record as a single JSON line.
pub fn write_record(out: &mut dyn Write, record: &Record) -> io::Result<()> {
    let line = serde_json::to_string(record)?;
    writeln!(out, "{line}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn figure() -> TikzFigure {
        TikzFigure {
            code: "\\documentclass{article}\n\\begin{document}\n\\begin{tikzpicture}\\end{tikzpicture}\n\\end{document}".to_string(),
            caption: "A caption".to_string(),
        }
    }

    #[test]
    fn record_has_three_roles_in_order() {
        let record = Record::new("2401.00001", &figure());
        let roles: Vec<_> = record.messages.iter().map(|m| m.role.as_str()).collect();
        assert_eq!(roles, vec!["system", "user", "assistant"]);
    }

    #[test]
    fn user_message_embeds_prefixed_id_and_caption() {
        let record = Record::new("2401.00001", &figure());
        assert_eq!(record.messages[1].content, "iArxiv-2401.00001:A caption");
    }

    #[test]
    fn system_message_is_the_fixed_instruction() {
        let record = Record::new("2401.00001", &figure());
        assert_eq!(record.messages[0].content, SYSTEM_INSTRUCTION);
        assert!(record.messages[0].content.starts_with("AutomaTikZ: "));
    }

    #[test]
    fn record_is_one_json_line() {
        let mut buf = Vec::new();
        write_record(&mut buf, &Record::new("id", &figure())).unwrap();
        let line = String::from_utf8(buf).unwrap();
        assert_eq!(line.matches('\n').count(), 1);
        assert!(line.ends_with('\n'));
        let back: Record = serde_json::from_str(line.trim_end()).unwrap();
        assert_eq!(back.messages[2].content, figure().code);
    }
}
