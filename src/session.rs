//! Connection identity and outbound delivery
//!
//! This module defines the per-connection identifier handed out by the
//! transport layer and the trait for tunneling messages back to connected
//! clients. The tunnel abstraction keeps the room logic independent of the
//! actual real-time transport (WebSockets, SSE, or anything else with
//! per-connection ordered delivery).

use std::{fmt::Display, str::FromStr};

use serde_with::{DeserializeFromStr, SerializeDisplay};
use uuid::Uuid;

use super::engine::UpdateMessage;

/// A unique identifier for a connection participating in a room
///
/// Each connection (host or player) gets a unique ID that persists for the
/// lifetime of the connection. The ID carries no identity beyond that; a
/// reconnecting client receives a fresh one.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, DeserializeFromStr, SerializeDisplay,
)]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random connection ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for Id {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for Id {
    type Err = uuid::Error;

    /// Parses an ID from a UUID string
    ///
    /// # Errors
    ///
    /// Returns a `uuid::Error` if the string is not a valid UUID.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::from_str(s)?))
    }
}

/// Trait for sending messages through a communication tunnel
///
/// This trait abstracts the mechanism used to deliver outbound events to a
/// single connected client. The room logic only ever needs fire-and-forget
/// delivery; ordering per connection is the transport's responsibility.
pub trait Tunnel {
    /// Sends an update message to the client
    ///
    /// # Arguments
    ///
    /// * `message` - The update message to send
    fn send_message(&self, message: &UpdateMessage);

    /// Closes the communication tunnel
    ///
    /// Called when the owning connection disconnects. Room teardown does
    /// not close the remaining members' tunnels; their connections stay
    /// usable for other rooms.
    fn close(self);
}
