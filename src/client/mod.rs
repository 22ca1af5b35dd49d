//! Headless client core
//!
//! Everything a game client does except rendering and the socket itself:
//! local player prediction, remote mirrors, combat, input mapping, and the
//! reconnect policy. A presentation/transport shell drives `ClientSession`
//! once per frame, drains its outbox onto the wire and its events into UI.

pub mod input;
pub mod reconnect;
pub mod session;

pub use input::{FrameInput, InputMapper};
pub use reconnect::ReconnectPolicy;
pub use session::{ClientSession, SessionEvent};

use crate::ws::protocol::ServerMsg;

/// Client-side failures
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Internal inconsistency: the session has an id but no roster entry
    #[error("local player missing from roster")]
    MissingLocalPlayer,

    #[error("malformed server message: {0}")]
    Protocol(#[from] serde_json::Error),
}

/// Decode one inbound frame of text into a server message.
/// A failure here is fatal for the session per the error policy.
pub fn decode_server(text: &str) -> Result<ServerMsg, ClientError> {
    Ok(serde_json::from_str(text)?)
}
