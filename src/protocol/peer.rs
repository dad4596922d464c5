//! Peer side of the world sync.

use std::collections::BTreeMap;

use crate::config::MAX_BODY_COUNT;
use crate::error::{AsteroidError, Result};
use crate::protocol::messages::{Envelope, Recipient, SyncMessage};
use crate::protocol::session::SessionContext;
use crate::random::body_seed;
use crate::world::{BodySpawnRecord, World, WorldConfig};

/// Progress of a peer through one world
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerState {
    /// Waiting for a world config
    Idle,
    /// Config stored, no records yet
    ConfigReceived,
    /// Collecting spawn records
    SpawnRecordsReceiving,
    /// Building bodies from the complete record set
    Generating,
    /// World built and renderable
    Ready,
}

/// A participant that rebuilds worlds from received spawn records
///
/// Records may arrive in any order; they are keyed by index and only
/// turned into bodies once the completion barrier confirms the set is whole.
pub struct WorldPeer {
    ctx: SessionContext,
    state: PeerState,
    config: Option<WorldConfig>,
    records: BTreeMap<i32, BodySpawnRecord>,
    world: Option<World>,
    last_desync: Option<AsteroidError>,
}

impl WorldPeer {
    /// Create a peer for a session
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the context carries the authority role.
    pub fn new(ctx: SessionContext) -> Result<Self> {
        if ctx.is_authority() {
            return Err(AsteroidError::InvalidConfig(format!(
                "peer {} holds the authority role",
                ctx.local_peer
            )));
        }
        Ok(Self {
            ctx,
            state: PeerState::Idle,
            config: None,
            records: BTreeMap::new(),
            world: None,
            last_desync: None,
        })
    }

    #[inline]
    pub fn state(&self) -> PeerState {
        self.state
    }

    #[inline]
    pub fn context(&self) -> &SessionContext {
        &self.ctx
    }

    /// The generated world; `Some` only once the peer is ready
    pub fn world(&self) -> Option<&World> {
        match self.state {
            PeerState::Ready => self.world.as_ref(),
            _ => None,
        }
    }

    /// Number of spawn records held for the current world
    #[inline]
    pub fn received_records(&self) -> usize {
        self.records.len()
    }

    /// The most recent desync detected at a completion barrier
    #[inline]
    pub fn last_desync(&self) -> Option<&AsteroidError> {
        self.last_desync.as_ref()
    }

    /// Apply one message from the authority
    ///
    /// Returns the envelopes the peer wants sent in response; a desync at
    /// the completion barrier yields a replay request.
    pub fn handle_message(&mut self, message: &SyncMessage) -> Vec<Envelope> {
        match message {
            SyncMessage::WorldConfig(config) => {
                self.on_world_config(*config);
                Vec::new()
            }
            SyncMessage::BodySpawn(record) => {
                self.on_body_spawn(*record);
                Vec::new()
            }
            SyncMessage::GenerationComplete { body_count } => self.on_generation_complete(*body_count),
            SyncMessage::ReplayRequest => {
                log::warn!("peer {} ignoring ReplayRequest", self.ctx.local_peer);
                Vec::new()
            }
        }
    }

    fn on_world_config(&mut self, config: WorldConfig) {
        if self.state != PeerState::Idle {
            log::debug!(
                "peer {} abandoning world in state {:?} for world {}",
                self.ctx.local_peer,
                self.state,
                config.world_seed
            );
        }
        self.records.clear();
        self.world = None;
        self.last_desync = None;
        self.config = Some(config);
        self.state = PeerState::ConfigReceived;
    }

    fn on_body_spawn(&mut self, record: BodySpawnRecord) {
        match self.state {
            PeerState::ConfigReceived | PeerState::SpawnRecordsReceiving => {
                if let Some(config) = self.config {
                    let derived = body_seed(config.world_seed, record.index);
                    if record.seed != derived {
                        // Surfaces as a missing record at the barrier.
                        log::warn!(
                            "peer {} dropping spawn record {}: seed {} does not derive from world {} (expected {})",
                            self.ctx.local_peer,
                            record.index,
                            record.seed,
                            config.world_seed,
                            derived
                        );
                        return;
                    }
                }
                self.records.insert(record.index, record);
                self.state = PeerState::SpawnRecordsReceiving;
            }
            PeerState::Idle => {
                log::warn!(
                    "peer {} dropping spawn record {} received before any world config",
                    self.ctx.local_peer,
                    record.index
                );
            }
            PeerState::Generating | PeerState::Ready => {
                log::warn!(
                    "peer {} dropping spawn record {} for an already generated world",
                    self.ctx.local_peer,
                    record.index
                );
            }
        }
    }

    fn on_generation_complete(&mut self, body_count: u32) -> Vec<Envelope> {
        let config = match (self.state, self.config) {
            (PeerState::ConfigReceived | PeerState::SpawnRecordsReceiving, Some(config)) => config,
            (state, _) => {
                log::warn!(
                    "peer {} ignoring GenerationComplete in state {:?}",
                    self.ctx.local_peer,
                    state
                );
                return Vec::new();
            }
        };

        let expected = match i32::try_from(body_count) {
            Ok(n) if body_count as usize <= MAX_BODY_COUNT => n,
            _ => {
                log::warn!(
                    "peer {} got a barrier for {} bodies, above the limit of {}",
                    self.ctx.local_peer,
                    body_count,
                    MAX_BODY_COUNT
                );
                return self.request_replay(AsteroidError::ProtocolDesync { missing: Vec::new() }, body_count);
            }
        };
        let missing: Vec<i32> = (0..expected).filter(|i| !self.records.contains_key(i)).collect();
        let extra = self.records.keys().any(|&i| i < 0 || i >= expected);

        if !missing.is_empty() || extra {
            return self.request_replay(AsteroidError::ProtocolDesync { missing }, body_count);
        }

        self.state = PeerState::Generating;
        let records: Vec<BodySpawnRecord> = self.records.values().copied().collect();
        self.world = Some(World::generate(config, records, &self.ctx.asteroid));
        self.state = PeerState::Ready;

        log::debug!(
            "peer {} ready with world {} ({} bodies)",
            self.ctx.local_peer,
            config.world_seed,
            body_count
        );
        Vec::new()
    }

    fn request_replay(&mut self, err: AsteroidError, body_count: u32) -> Vec<Envelope> {
        log::warn!(
            "peer {}: {} (holding {} records, expected {}); requesting replay",
            self.ctx.local_peer,
            err,
            self.records.len(),
            body_count
        );
        self.last_desync = Some(err);
        vec![Envelope::new(Recipient::Authority, SyncMessage::ReplayRequest)]
    }
}
