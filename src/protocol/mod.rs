//! Seed-only world synchronization
//!
//! One authority derives the spawn records of a world from its seed and
//! sends them, bracketed by the world config and a completion barrier, to
//! every peer. Peers rebuild the exact same meshes locally. Geometry never
//! crosses the wire.
//!
//! The state machines here perform no I/O: every handler returns the
//! [`Envelope`]s it wants delivered and the caller moves them over whatever
//! transport it has. See `demos/world_sync.rs` for an in-memory loop.

pub mod authority;
pub mod messages;
pub mod peer;
pub mod session;

pub use authority::{AuthorityState, BroadcastSteps, WorldAuthority};
pub use messages::{decode, encode, Envelope, PeerId, Recipient, SyncMessage};
pub use peer::{PeerState, WorldPeer};
pub use session::{Role, SessionContext};
