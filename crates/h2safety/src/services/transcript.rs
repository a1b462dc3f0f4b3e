//! Conversation flattening shared by the generators

use crate::error::H2Result;
use crate::models::{Message, Project};

/// "Label: content" lines in log order, separated by blank lines
pub fn build_transcript(messages: &[Message]) -> String {
    messages
        .iter()
        .map(|m| format!("{}: {}", m.sender.label(), m.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Pretty-printed project document embedded into report prompts
pub fn project_json(project: &Project) -> H2Result<String> {
    Ok(serde_json::to_string_pretty(project)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sender;

    #[test]
    fn transcript_keeps_order_and_labels() {
        let messages = vec![
            Message::new("t1", "Which code covers bulk storage?", Sender::User),
            Message::new("t1", "NFPA 2 chapter 7.", Sender::Ai),
            Message::new("t1", "Summary of findings", Sender::Insight),
        ];
        assert_eq!(
            build_transcript(&messages),
            "User: Which code covers bulk storage?\n\nAI: NFPA 2 chapter 7.\n\nInsight: Summary of findings"
        );
        assert_eq!(build_transcript(&[]), "");
    }
}
