//! Turn-taking and the message log

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use super::Phase;

/// Message identifier derived from the send time.
///
/// The sequence number keeps ids unique when two messages share a
/// millisecond.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MessageId {
    pub at_ms: u64,
    pub seq: u32,
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.at_ms, self.seq)
    }
}

/// One argument in the debate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub author: String,
    pub content: String,
    /// Clock time the message was sent
    pub created_at: Duration,
    /// Phase the message was sent in
    pub phase: Phase,
}

/// Who may speak next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Turn {
    Mine,
    Theirs,
}

/// Append-only message log
#[derive(Debug, Clone, Default, Serialize)]
pub struct Transcript {
    messages: Vec<Message>,
    #[serde(skip)]
    next_seq: u32,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message and return it
    pub fn append(
        &mut self,
        author: &str,
        content: String,
        created_at: Duration,
        phase: Phase,
    ) -> &Message {
        let id = MessageId {
            at_ms: created_at.as_millis() as u64,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.messages.push(Message {
            id,
            author: author.to_string(),
            content,
            created_at,
            phase,
        });
        &self.messages[self.messages.len() - 1]
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Messages sent during `phase`
    pub fn in_phase(&self, phase: Phase) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(move |m| m.phase == phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_preserves_order_and_phase() {
        let mut log = Transcript::new();
        log.append("Ada", "first".into(), Duration::from_secs(1), Phase::Opening);
        log.append("Ada", "second".into(), Duration::from_secs(40), Phase::Rebuttal);

        let contents: Vec<&str> = log.messages().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second"]);
        assert_eq!(log.messages()[0].phase, Phase::Opening);
        assert_eq!(log.messages()[1].phase, Phase::Rebuttal);
    }

    #[test]
    fn test_ids_unique_within_same_millisecond() {
        let mut log = Transcript::new();
        let at = Duration::from_millis(1234);
        let a = log.append("Ada", "a".into(), at, Phase::Opening).id;
        let b = log.append("Bo", "b".into(), at, Phase::Opening).id;
        assert_ne!(a, b);
        assert_eq!(a.at_ms, 1234);
        assert_eq!(a.to_string(), "1234-0");
        assert_eq!(b.to_string(), "1234-1");
    }

    #[test]
    fn test_in_phase_filter() {
        let mut log = Transcript::new();
        log.append("Ada", "a".into(), Duration::ZERO, Phase::Opening);
        log.append("Ada", "b".into(), Duration::from_secs(31), Phase::Rebuttal);
        log.append("Ada", "c".into(), Duration::from_secs(32), Phase::Rebuttal);
        assert_eq!(log.in_phase(Phase::Rebuttal).count(), 2);
        assert_eq!(log.in_phase(Phase::Final).count(), 0);
    }
}
