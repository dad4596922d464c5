//! Deterministic asteroid field generation
//!
//! A standalone library for generating procedural asteroid meshes with
//! through-tunnels, placing them in a wrapping world cube, and keeping every
//! participant of a multiplayer session in sync by exchanging seeds instead
//! of geometry.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use rust_asteroid_field::*;
//!
//! // One asteroid mesh
//! let config = AsteroidConfigBuilder::new()
//!     .size(AsteroidSize::Medium)
//!     .radius_variation(0.3).unwrap()
//!     .build().unwrap();
//! let mesh = generate_asteroid_mesh(1042, config.base_radius(), &config);
//! println!("Generated {} triangles", mesh.triangle_count());
//!
//! // A whole world, built the same way on every peer
//! let settings = WorldSettings::default();
//! let (records, placement) = derive_spawn_records(42, &settings);
//! let world = World::generate(
//!     WorldConfig { world_size: settings.world_size, world_seed: 42 },
//!     records,
//!     &config,
//! );
//! println!("Placed {} of {} bodies", placement.placed(), placement.requested);
//! println!("World has {} bodies", world.body_count());
//! ```
//!
//! # Features
//!
//! - `spatial-index` (default): O(log n) nearest-body lookups using a KD-tree

// Modules
pub mod error;
pub mod config;
pub mod random;
pub mod noise;
pub mod tunnel;
pub mod mesh;
pub mod collision;
pub mod body;
pub mod placement;
pub mod world;
pub mod protocol;

#[cfg(feature = "spatial-index")]
pub mod spatial;

// Re-export core types for convenience
pub use error::{AsteroidError, Result};
pub use config::{AsteroidConfig, AsteroidConfigBuilder, AsteroidSize, WorldSettings, WorldSettingsBuilder};
pub use random::{body_seed, tunnel_seed, Seed, SeededStream};
pub use noise::{NoiseField, NoiseKind};
pub use tunnel::{plan_tunnels, TunnelSpec};
pub use mesh::{build_asteroid_mesh, generate_asteroid_mesh, FallbackReason, MeshData, VertexRange};
pub use collision::derive_collision_shape;
pub use body::{Body, Transform};
pub use placement::{derive_spawn_records, place_bodies, wrap_position, Placement};
pub use world::{BodySpawnRecord, World, WorldConfig};
pub use protocol::{
    AuthorityState, BroadcastSteps, Envelope, PeerId, PeerState, Recipient, Role, SessionContext, SyncMessage,
    WorldAuthority, WorldPeer,
};

#[cfg(feature = "spatial-index")]
pub use spatial::SpatialIndex;

// Re-export glam::Vec3 for convenience
pub use glam::Vec3;
