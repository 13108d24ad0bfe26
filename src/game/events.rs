//! # Game Events
//!
//! Ordered results produced while resolving a turn, and the message log they feed.

use crate::EntityId;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Colour hint for a message; the presentation layer picks the actual colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MessageTone {
    #[default]
    Normal,
    Notice,
    Warning,
    Danger,
    Good,
}

/// A line of text for the message log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    pub tone: MessageTone,
}

impl Message {
    pub fn new(text: impl Into<String>, tone: MessageTone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }

    /// Message with the [`MessageTone::Normal`] tone.
    pub fn normal(text: impl Into<String>) -> Self {
        Self::new(text, MessageTone::Normal)
    }
}

/// One result of resolving an action, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// Text for the message log
    Message(Message),
    /// The entity's hit points reached zero
    Dead(EntityId),
    /// The item entity went into the player's inventory
    ItemAdded(EntityId),
    /// The item entity was used up
    ItemConsumed(EntityId),
}

impl GameEvent {
    /// Shorthand for a [`GameEvent::Message`].
    pub fn message(text: impl Into<String>, tone: MessageTone) -> Self {
        GameEvent::Message(Message::new(text, tone))
    }
}

/// Receiver of messages produced by the turn engine.
pub trait MessageLog {
    fn add_message(&mut self, message: Message);
}

impl MessageLog for Vec<Message> {
    fn add_message(&mut self, message: Message) {
        self.push(message);
    }
}

/// Keeps only the most recent messages.
///
/// # Examples
///
/// ```
/// use cosmic_chaos::{Message, MessageBuffer, MessageLog};
///
/// let mut log = MessageBuffer::new(2);
/// for text in ["one", "two", "three"] {
///     log.add_message(Message::normal(text));
/// }
/// let texts: Vec<_> = log.iter().map(|m| m.text.as_str()).collect();
/// assert_eq!(texts, ["two", "three"]);
/// ```
#[derive(Debug, Clone)]
pub struct MessageBuffer {
    capacity: usize,
    messages: VecDeque<Message>,
}

impl MessageBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            messages: VecDeque::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }
}

impl MessageLog for MessageBuffer {
    fn add_message(&mut self, message: Message) {
        if self.capacity == 0 {
            return;
        }
        while self.messages.len() >= self.capacity {
            self.messages.pop_front();
        }
        self.messages.push_back(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_log_keeps_everything_in_order() {
        let mut log: Vec<Message> = Vec::new();
        log.add_message(Message::normal("first"));
        log.add_message(Message::new("second", MessageTone::Danger));
        assert_eq!(log.len(), 2);
        assert_eq!(log[1].tone, MessageTone::Danger);
    }

    #[test]
    fn test_zero_capacity_buffer_drops_all() {
        let mut log = MessageBuffer::new(0);
        log.add_message(Message::normal("lost"));
        assert!(log.is_empty());
    }
}
