//! Seed-only world sync between one authority and three peers
//!
//! Runs the whole protocol over an in-memory "network": a peer that joins
//! early, one that joins late, and one that loses a spawn record and has to
//! ask for a replay. Run with `RUST_LOG=debug` to watch the state machines.

use std::collections::VecDeque;

use rust_asteroid_field::protocol::{decode, encode};
use rust_asteroid_field::*;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("=== rust_asteroid_field World Sync Demo ===\n");

    // Step 1: Shared session configuration
    let settings = WorldSettingsBuilder::new()
        .world_size(120.0)?
        .body_count(6)
        .min_separation(10.0)?
        .build()?;
    let asteroid = AsteroidConfigBuilder::new()
        .size(AsteroidSize::Medium)
        .radius_variation(0.3)?
        .build()?;

    println!("Step 1: Session settings");
    println!("  World size: {}", settings.world_size);
    println!("  Bodies requested: {}", settings.body_count);
    println!("  Asteroid size: {} (complexity {})", asteroid.size.name(), asteroid.complexity());

    // Step 2: Authority seeds the world
    let mut authority = WorldAuthority::new(SessionContext::authority(0, settings, asteroid))?;
    let world = authority.seed_world(Some(7));
    println!("\nStep 2: Authority seeded world {}", world.config().world_seed);
    for body in world.bodies() {
        println!(
            "  body {:>2}: seed {:>5}, radius {:5.2}, {:>4} verts, {} tunnels{}",
            body.index,
            body.seed,
            body.radius,
            body.mesh.vertex_count(),
            body.mesh.tunnels.len(),
            if body.mesh.is_fallback() { " (fallback)" } else { "" }
        );
    }
    if let Some(placement) = authority.placement() {
        if !placement.is_complete() {
            println!("  shortfall: {} bodies could not be placed", placement.shortfall());
        }
    }

    // Step 3: Early peer receives the initial broadcast
    let mut early = WorldPeer::new(SessionContext::peer(1, settings, asteroid))?;
    let initial = authority.broadcast(Recipient::AllPeers);
    pump(&mut authority, &mut [&mut early], initial)?;
    println!("\nStep 3: Early peer state: {:?}", early.state());

    // Step 4: Late peer joins; the authority replays to everyone
    let mut late = WorldPeer::new(SessionContext::peer(2, settings, asteroid))?;
    let replay = authority.on_peer_joined(2);
    pump(&mut authority, &mut [&mut early, &mut late], replay)?;
    println!("Step 4: Late peer state: {:?}", late.state());

    // Step 5: A lossy peer misses one record and recovers through replay
    let mut lossy = WorldPeer::new(SessionContext::peer(3, settings, asteroid))?;
    let mut lossy_stream = authority.broadcast(Recipient::Peer(3));
    if lossy_stream.len() > 2 {
        lossy_stream.remove(1);
    }
    pump(&mut authority, &mut [&mut lossy], lossy_stream)?;
    println!("Step 5: Lossy peer state after replay: {:?}", lossy.state());

    // Step 6: Compare every peer against the authority
    println!("\nStep 6: Consistency check");
    let reference = authority.world();
    for peer in [&early, &late, &lossy] {
        let same = match (peer.world(), reference) {
            (Some(a), Some(b)) => a.matches(b),
            _ => false,
        };
        println!("  peer {}: identical = {}", peer.context().local_peer, same);
    }

    if let Some(world) = late.world() {
        let point = Vec3::new(30.0, -10.0, 5.0);
        if let Some(body) = world.nearest_body(point) {
            println!("\n  Nearest body to {:?}: {} at {:?}", point, body.index, body.position());
        }
    }

    let wrapped = wrap_position(Vec3::new(70.0, -65.0, 0.0), settings.world_size);
    println!("  (70, -65, 0) wraps to {:?}", wrapped);

    println!("\n=== Demo Complete ===");
    Ok(())
}

/// Deliver envelopes until the network goes quiet
///
/// Every message goes through the wire codec, the same as a real transport.
fn pump(authority: &mut WorldAuthority, peers: &mut [&mut WorldPeer], initial: Vec<Envelope>) -> Result<()> {
    let mut queue: VecDeque<(PeerId, Envelope)> = initial.into_iter().map(|e| (0, e)).collect();

    while let Some((from, envelope)) = queue.pop_front() {
        let message = decode(&encode(&envelope.message)?)?;

        if envelope.is_for(authority.context().local_peer, true) {
            for reply in authority.handle_message(from, &message) {
                queue.push_back((authority.context().local_peer, reply));
            }
            continue;
        }

        for peer in peers.iter_mut() {
            let id = peer.context().local_peer;
            if envelope.is_for(id, false) {
                for reply in peer.handle_message(&message) {
                    queue.push_back((id, reply));
                }
            }
        }
    }
    Ok(())
}
