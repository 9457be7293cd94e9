//! UI state for a single conversation with the relay.
//!
//! Sending a message is a two-phase update. [`Conversation::submit`]
//! tentatively appends the user's message and hands back a
//! [`PendingTurn`]. The turn is then settled exactly once, either with
//! [`Conversation::confirm`] when the relay answered or with
//! [`Conversation::revert`] when it failed.
//!
//! Clearing the transcript while a turn is pending does not cancel the
//! turn. A reply that arrives afterwards is still appended to the (now
//! empty) transcript. A failure that arrives afterwards removes nothing,
//! since the tentative message went away with the clear, but the error
//! is still shown.

use super::transport::{RelayRequest, RelayTransport};
use super::transcript::Transcript;
use crate::openai::{Message, Role};

pub const ERROR_FALLBACK: &str = "An error occurred";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Idle,
    Sending,
}

/// A submitted message waiting on the relay.
#[derive(Debug)]
#[must_use = "a pending turn must be settled with `confirm` or `revert`"]
pub struct PendingTurn {
    request: RelayRequest,
    generation: u64,
    index: usize,
}

impl PendingTurn {
    pub fn request(&self) -> &RelayRequest {
        &self.request
    }
}

/// What happened to a call to [`Conversation::send`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing was sent, either the input was blank or a turn was
    /// already in flight.
    Skipped,
    Replied(String),
    Failed(String),
}

#[derive(Debug)]
pub struct Conversation {
    transcript: Transcript,
    input: String,
    status: Status,
    error: Option<String>,
    // Bumped on every clear so a late revert can tell whether its
    // tentative message is still around
    generation: u64,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            transcript: Transcript::new(),
            input: String::new(),
            status: Status::Idle,
            error: None,
            generation: 0,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_sending(&self) -> bool {
        self.status == Status::Sending
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Replace the input buffer. Editing is allowed while sending.
    pub fn set_input(&mut self, input: &str) {
        self.input = input.to_string();
    }

    pub fn can_submit(&self) -> bool {
        !self.is_sending() && !self.input.trim().is_empty()
    }

    /// Tentatively apply the current input as a new user message.
    ///
    /// Returns `None` without touching any state when the trimmed input
    /// is empty or another turn is still in flight.
    pub fn submit(&mut self) -> Option<PendingTurn> {
        if !self.can_submit() {
            return None;
        }

        let text = self.input.trim().to_string();
        self.input.clear();
        self.error = None;
        self.transcript.push(Message::new(Role::User, &text));
        self.status = Status::Sending;

        Some(PendingTurn {
            // Only the latest message goes to the relay, never the
            // rest of the transcript
            request: RelayRequest { message: text },
            generation: self.generation,
            index: self.transcript.len() - 1,
        })
    }

    /// Settle a turn that the relay answered.
    pub fn confirm(&mut self, turn: PendingTurn, reply: &str) {
        if turn.generation != self.generation {
            tracing::debug!("Reply arrived after the transcript was cleared");
        }
        self.transcript.push(Message::new(Role::Assistant, reply));
        self.status = Status::Idle;
    }

    /// Settle a turn that failed, rolling back its tentative message.
    pub fn revert(&mut self, turn: PendingTurn, error: &str) {
        let still_tentative = turn.generation == self.generation
            && self.transcript.len() == turn.index + 1
            && self
                .transcript
                .last()
                .is_some_and(|m| m.role == Role::User && m.content == turn.request.message);
        if still_tentative {
            self.transcript.pop();
        }

        let error = error.trim();
        self.error = Some(if error.is_empty() {
            ERROR_FALLBACK.to_string()
        } else {
            error.to_string()
        });
        self.status = Status::Idle;
    }

    pub fn can_clear(&self) -> bool {
        !self.transcript.is_empty() || self.error.is_some()
    }

    /// Empty the transcript and drop any displayed error. A turn in
    /// flight keeps going.
    pub fn clear(&mut self) {
        self.transcript.clear();
        self.error = None;
        self.generation += 1;
    }

    /// Submit the current input and wait for the relay, settling the
    /// turn with whatever comes back. Makes at most one transport call.
    pub async fn send<T>(&mut self, transport: &T) -> Outcome
    where
        T: RelayTransport + ?Sized,
    {
        let Some(turn) = self.submit() else {
            return Outcome::Skipped;
        };

        match transport.send(turn.request()).await {
            Ok(resp) => {
                self.confirm(turn, &resp.reply);
                Outcome::Replied(resp.reply)
            }
            Err(e) => {
                tracing::debug!("Relay call failed: {}", e);
                self.revert(turn, &e.to_string());
                // Report what is actually displayed, fallback included
                Outcome::Failed(self.error.clone().unwrap_or_default())
            }
        }
    }
}
