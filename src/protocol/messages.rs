//! World sync message types and codec.
//!
//! Only seeds and spawn parameters cross the wire. Meshes are rebuilt
//! locally from them.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::world::{BodySpawnRecord, WorldConfig};

/// Unique identifier for a participant in a session.
pub type PeerId = u32;

/// All messages exchanged between the authority and its peers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SyncMessage {
    /// Start of a world; discards whatever the receiver had before.
    WorldConfig(WorldConfig),

    /// One body's spawn parameters.
    BodySpawn(BodySpawnRecord),

    /// Barrier: every record of the current world has been sent.
    GenerationComplete { body_count: u32 },

    /// Ask the authority to resend the current world.
    ReplayRequest,
}

impl SyncMessage {
    /// Short tag for log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            SyncMessage::WorldConfig(_) => "WorldConfig",
            SyncMessage::BodySpawn(_) => "BodySpawn",
            SyncMessage::GenerationComplete { .. } => "GenerationComplete",
            SyncMessage::ReplayRequest => "ReplayRequest",
        }
    }
}

/// Destination of an outgoing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recipient {
    Peer(PeerId),
    AllPeers,
    Authority,
}

/// A message paired with where it should go.
///
/// State machines return envelopes instead of sending; the transport is the
/// caller's concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub to: Recipient,
    pub message: SyncMessage,
}

impl Envelope {
    pub fn new(to: Recipient, message: SyncMessage) -> Self {
        Self { to, message }
    }

    /// True if a participant with this id (and authority flag) should
    /// receive the envelope.
    pub fn is_for(&self, peer: PeerId, is_authority: bool) -> bool {
        match self.to {
            Recipient::Peer(id) => id == peer,
            Recipient::AllPeers => !is_authority,
            Recipient::Authority => is_authority,
        }
    }
}

/// Encode a message to bytes.
pub fn encode(message: &SyncMessage) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(message)?)
}

/// Decode a message from bytes.
pub fn decode(data: &[u8]) -> Result<SyncMessage> {
    Ok(serde_json::from_slice(data)?)
}
