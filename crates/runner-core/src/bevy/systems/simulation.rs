//! Fixed-step simulation.
//!
//! Runs one [`RunnerSession`] tick per `FixedUpdate` and forwards the tick
//! report as messages.

use bevy::prelude::*;

use crate::bevy::{
    CoinCollectedEvent, EnemyDestroyedEvent, EntityDespawnedEvent, EntitySpawnedEvent,
    PlayerIntent, RunEndedEvent, RunnerSession, TileRecycledEvent,
};

/// System to advance the run by one fixed step.
#[allow(clippy::too_many_arguments)]
pub fn run_fixed_tick(
    time: Res<Time>,
    mut session: ResMut<RunnerSession>,
    mut intent: ResMut<PlayerIntent>,
    mut recycled_events: MessageWriter<TileRecycledEvent>,
    mut spawned_events: MessageWriter<EntitySpawnedEvent>,
    mut despawned_events: MessageWriter<EntityDespawnedEvent>,
    mut collected_events: MessageWriter<CoinCollectedEvent>,
    mut destroyed_events: MessageWriter<EnemyDestroyedEvent>,
    mut ended_events: MessageWriter<RunEndedEvent>,
) {
    if !session.game.is_running() {
        return;
    }

    let input = intent.take();
    let report = session.tick(input, time.delta_secs());
    let game = &session.game;

    for tile_id in report.recycled_tiles {
        if let Some(tile) = game.tiles().tile(tile_id) {
            recycled_events.write(TileRecycledEvent {
                tile_id,
                z: tile.z,
            });
        }
    }
    for id in report.spawned {
        if let Some(entity) = game.entity(id) {
            spawned_events.write(EntitySpawnedEvent {
                id,
                kind: entity.kind,
            });
        }
    }
    for id in report.despawned {
        despawned_events.write(EntityDespawnedEvent { id });
    }
    // Money counted up to and including each coin of this tick
    let before = game.state().money().saturating_sub(
        u32::try_from(report.collected.len()).unwrap_or(u32::MAX),
    );
    for (money, id) in (before + 1..).zip(report.collected) {
        collected_events.write(CoinCollectedEvent { id, money });
    }
    for id in report.destroyed {
        destroyed_events.write(EnemyDestroyedEvent { id });
    }
    if let Some(cause) = report.ended {
        tracing::info!("[simulation] Run ended at frame {}", game.current_frame());
        ended_events.write(RunEndedEvent {
            cause,
            distance: game.state().distance(),
            score: game.state().score(),
        });
    }
}
