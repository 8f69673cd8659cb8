//! Append-only chronological record of chat exchanges.

use shared::domain::ChatMessage;

/// Ordered transcript of refinement exchanges for one session.
///
/// `append` is the only mutator; entries are never edited or evicted for
/// the life of the session.
#[derive(Debug, Clone, Default)]
pub struct RefinementLog {
    entries: Vec<ChatMessage>,
}

impl RefinementLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, message: ChatMessage) {
        self.entries.push(message);
    }

    pub fn all(&self) -> &[ChatMessage] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::ChatRole;

    #[test]
    fn append_preserves_insertion_order() {
        let mut log = RefinementLog::new();
        log.append(ChatMessage::user("add a timeline"));
        log.append(ChatMessage::assistant("# SOW\n## Timeline"));

        let entries = log.all();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].role, ChatRole::User);
        assert_eq!(entries[1].role, ChatRole::Assistant);
    }
}
