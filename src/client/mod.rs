//! Terminal-side client for the chat relay.

mod conversation;
mod transcript;
mod transport;

pub use conversation::{Conversation, ERROR_FALLBACK, Outcome, PendingTurn, Status};
pub use transcript::Transcript;
pub use transport::{ClientError, HttpRelayClient, RESPONSE_FALLBACK, RelayRequest, RelayTransport};
