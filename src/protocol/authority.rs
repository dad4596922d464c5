//! Authority side of the world sync.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{AsteroidError, Result};
use crate::placement::{derive_spawn_records, Placement};
use crate::protocol::messages::{Envelope, PeerId, Recipient, SyncMessage};
use crate::protocol::session::SessionContext;
use crate::random::Seed;
use crate::world::{World, WorldConfig};

/// Progress of the authority through one world
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorityState {
    /// No world seeded yet
    Idle,
    /// Seed chosen and spawn records derived
    AuthoritySeeded,
    /// World config sent
    ConfigBroadcast,
    /// Spawn records going out in index order
    SpawnRecordsBroadcasting,
    /// Completion barrier sent
    Complete,
}

/// The participant that owns the world seed
///
/// Derives spawn records from the seed, builds its own copy of the world
/// from them, and replays the full record set to anyone who needs it.
pub struct WorldAuthority {
    ctx: SessionContext,
    state: AuthorityState,
    world: Option<World>,
    placement: Option<Placement>,
}

impl WorldAuthority {
    /// Create the authority for a session
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the context does not carry the authority role.
    pub fn new(ctx: SessionContext) -> Result<Self> {
        if !ctx.is_authority() {
            return Err(AsteroidError::InvalidConfig(format!(
                "peer {} is not the session authority",
                ctx.local_peer
            )));
        }
        Ok(Self {
            ctx,
            state: AuthorityState::Idle,
            world: None,
            placement: None,
        })
    }

    #[inline]
    pub fn state(&self) -> AuthorityState {
        self.state
    }

    #[inline]
    pub fn context(&self) -> &SessionContext {
        &self.ctx
    }

    /// The authority's own copy of the current world
    #[inline]
    pub fn world(&self) -> Option<&World> {
        self.world.as_ref()
    }

    /// Placement outcome of the current world, including any shortfall
    #[inline]
    pub fn placement(&self) -> Option<&Placement> {
        self.placement.as_ref()
    }

    /// Seed a new world and build it locally
    ///
    /// With `None`, the seed is taken from the system clock. Any previous
    /// world is replaced; call [`WorldAuthority::broadcast`] afterwards to
    /// push it to peers.
    pub fn seed_world(&mut self, seed: Option<Seed>) -> &World {
        let world_seed = seed.unwrap_or_else(time_seed);
        let settings = self.ctx.settings;

        let (records, placement) = derive_spawn_records(world_seed, &settings);
        let config = WorldConfig {
            world_size: settings.world_size,
            world_seed,
        };

        log::debug!(
            "authority seeded world {} with {} of {} bodies",
            world_seed,
            placement.placed(),
            placement.requested
        );

        self.placement = Some(placement);
        self.state = AuthorityState::AuthoritySeeded;
        self.world.insert(World::generate(config, records, &self.ctx.asteroid))
    }

    /// Envelopes carrying the full current world to `to`
    ///
    /// Order is config, then records by index, then the completion barrier.
    /// Returns nothing if no world has been seeded.
    pub fn broadcast(&mut self, to: Recipient) -> Vec<Envelope> {
        if self.world.is_none() {
            log::warn!("broadcast to {:?} requested before any world was seeded", to);
            return Vec::new();
        }

        let out: Vec<Envelope> = self.broadcast_steps(to).collect();

        if let Some(world) = self.world.as_ref() {
            log::debug!(
                "authority broadcast world {} ({} records) to {:?}",
                world.config().world_seed,
                world.records().len(),
                to
            );
        }
        out
    }

    /// Emit the current world to `to` one envelope at a time
    ///
    /// Each call restarts from the world config. The authority passes
    /// through `ConfigBroadcast` and `SpawnRecordsBroadcasting` as the
    /// iterator advances and reaches `Complete` with the barrier. With no
    /// world seeded the iterator is empty.
    pub fn broadcast_steps(&mut self, to: Recipient) -> BroadcastSteps<'_> {
        if self.world.is_some() {
            self.state = AuthorityState::AuthoritySeeded;
        }
        BroadcastSteps {
            state: &mut self.state,
            world: self.world.as_ref(),
            to,
            next_record: 0,
        }
    }

    /// A peer joined: replay the current world to everyone
    pub fn on_peer_joined(&mut self, peer: PeerId) -> Vec<Envelope> {
        log::debug!("peer {} joined", peer);
        self.broadcast(Recipient::AllPeers)
    }

    /// Handle a message from a peer
    pub fn handle_message(&mut self, from: PeerId, message: &SyncMessage) -> Vec<Envelope> {
        match message {
            SyncMessage::ReplayRequest => {
                log::debug!("peer {} requested a replay", from);
                self.broadcast(Recipient::Peer(from))
            }
            other => {
                log::warn!("authority ignoring {} from peer {}", other.kind(), from);
                Vec::new()
            }
        }
    }
}

/// Step-wise emitter returned by [`WorldAuthority::broadcast_steps`]
pub struct BroadcastSteps<'a> {
    state: &'a mut AuthorityState,
    world: Option<&'a World>,
    to: Recipient,
    next_record: usize,
}

impl BroadcastSteps<'_> {
    /// Authority state after the envelopes emitted so far
    #[inline]
    pub fn state(&self) -> AuthorityState {
        *self.state
    }
}

impl Iterator for BroadcastSteps<'_> {
    type Item = Envelope;

    fn next(&mut self) -> Option<Envelope> {
        let world = self.world?;
        let records = world.records();

        let message = match *self.state {
            AuthorityState::Idle | AuthorityState::Complete => return None,
            AuthorityState::AuthoritySeeded => {
                *self.state = AuthorityState::ConfigBroadcast;
                SyncMessage::WorldConfig(*world.config())
            }
            AuthorityState::ConfigBroadcast | AuthorityState::SpawnRecordsBroadcasting => {
                match records.get(self.next_record) {
                    Some(record) => {
                        self.next_record += 1;
                        *self.state = AuthorityState::SpawnRecordsBroadcasting;
                        SyncMessage::BodySpawn(*record)
                    }
                    None => {
                        *self.state = AuthorityState::Complete;
                        SyncMessage::GenerationComplete {
                            body_count: records.len() as u32,
                        }
                    }
                }
            }
        };
        Some(Envelope::new(self.to, message))
    }
}

fn time_seed() -> Seed {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(elapsed) => {
            let nanos = elapsed.as_nanos() as u64;
            (nanos ^ (nanos >> 32)) as Seed
        }
        Err(_) => 0,
    }
}
