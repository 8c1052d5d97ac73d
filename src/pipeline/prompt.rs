use crate::history::{ConversationTurn, Role};
use crate::llm::types::ChatMessage;
use crate::retrieval::RetrievedDocument;

pub const SYSTEM_INSTRUCTION: &str =
    "You are a helpful assistant. Answer the question based only on the following context:";

/// Assemble the structured prompt: system instruction carrying the joined
/// context, the prior turns most-recent-last, then the question as the final
/// user message.
pub fn build_messages(
    history: &[ConversationTurn],
    context: &[RetrievedDocument],
    question: &str,
) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ChatMessage::system(format!(
        "{}\n{}",
        SYSTEM_INSTRUCTION,
        join_context(context)
    )));
    messages.extend(history.iter().map(|turn| match turn.role {
        Role::User => ChatMessage::user(turn.content.clone()),
        Role::Assistant => ChatMessage::assistant(turn.content.clone()),
    }));
    messages.push(ChatMessage::user(question));
    messages
}

fn join_context(context: &[RetrievedDocument]) -> String {
    context
        .iter()
        .map(|doc| doc.page_content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(content: &str) -> RetrievedDocument {
        RetrievedDocument {
            page_content: content.to_string(),
            metadata: json!({}),
        }
    }

    #[test]
    fn system_message_carries_joined_context() {
        let messages = build_messages(&[], &[doc("alpha"), doc("beta")], "question?");
        assert_eq!(messages[0].role, "system");
        assert!(messages[0].content.starts_with(SYSTEM_INSTRUCTION));
        assert!(messages[0].content.contains("alpha\n\nbeta"));
    }

    #[test]
    fn history_sits_between_system_and_question() {
        let history = vec![
            ConversationTurn::assistant("greeting"),
            ConversationTurn::user("earlier question"),
            ConversationTurn::assistant("earlier answer"),
        ];

        let messages = build_messages(&history, &[], "latest question");

        assert_eq!(messages.len(), 5);
        assert_eq!(messages[1].role, "assistant");
        assert_eq!(messages[2].content, "earlier question");
        assert_eq!(messages[3].content, "earlier answer");
        let last = messages.last().unwrap();
        assert_eq!(last.role, "user");
        assert_eq!(last.content, "latest question");
    }

    #[test]
    fn empty_context_still_produces_system_message() {
        let messages = build_messages(&[], &[], "question?");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].content, format!("{}\n", SYSTEM_INSTRUCTION));
    }
}
