//! Session context shared by the protocol state machines.

use crate::config::{AsteroidConfig, WorldSettings};
use crate::protocol::messages::PeerId;

/// Which side of the world sync a participant plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Owns the world seed and broadcasts spawn records.
    Authority,
    /// Rebuilds worlds from received records.
    Peer,
}

/// Explicit per-participant context
///
/// Passed to the state machines instead of living in globals. Every
/// participant of a session must hold equal `settings` and `asteroid`
/// values, otherwise identical records produce different meshes.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionContext {
    pub role: Role,
    pub local_peer: PeerId,
    pub settings: WorldSettings,
    pub asteroid: AsteroidConfig,
}

impl SessionContext {
    pub fn authority(local_peer: PeerId, settings: WorldSettings, asteroid: AsteroidConfig) -> Self {
        Self {
            role: Role::Authority,
            local_peer,
            settings,
            asteroid,
        }
    }

    pub fn peer(local_peer: PeerId, settings: WorldSettings, asteroid: AsteroidConfig) -> Self {
        Self {
            role: Role::Peer,
            local_peer,
            settings,
            asteroid,
        }
    }

    #[inline]
    pub fn is_authority(&self) -> bool {
        self.role == Role::Authority
    }
}
