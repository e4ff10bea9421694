//! Fixed-size ground tile pool that simulates infinite terrain.
//!
//! Tiles slide backward as the world scrolls. Any tile that falls behind the
//! recycle threshold is moved in front of the furthest tile, so the pool
//! size never changes and spacing stays uniform.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ConfigError, ensure_positive};

/// Tile length used when the tile has no measurable bounds.
pub const DEFAULT_TILE_LENGTH: f32 = 30.0;

/// Identifier of a pooled tile. Stable for the lifetime of the pool.
pub type TileId = u32;

/// A ground tile (visual + collision pair) at a view-space Z.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    pub z: f32,
}

/// Picks the tile length, falling back to [`DEFAULT_TILE_LENGTH`] if the
/// measured value is missing or degenerate.
pub fn resolve_tile_length(measured: Option<f32>) -> f32 {
    match measured {
        Some(length) if length.is_finite() && length > 0.0 => length,
        Some(length) => {
            warn!(
                "Tile length {} is not usable, falling back to {}",
                length, DEFAULT_TILE_LENGTH
            );
            DEFAULT_TILE_LENGTH
        }
        None => {
            warn!(
                "Tile has no measurable bounds, falling back to length {}",
                DEFAULT_TILE_LENGTH
            );
            DEFAULT_TILE_LENGTH
        }
    }
}

/// Pool of ground tiles recycled as the world scrolls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TilePool {
    tiles: Vec<Tile>,
    tile_length: f32,
    recycle_threshold: f32,
}

impl TilePool {
    /// Creates `count` tiles at `i * tile_length - back_offset`.
    ///
    /// `recycle_threshold` defaults to `-tile_length`.
    pub fn new(
        count: usize,
        tile_length: f32,
        recycle_threshold: Option<f32>,
        back_offset: f32,
    ) -> Result<Self, ConfigError> {
        if count == 0 {
            return Err(ConfigError::EmptyTilePool);
        }
        ensure_positive("world.tile_length", tile_length)?;
        let recycle_threshold = recycle_threshold.unwrap_or(-tile_length);

        #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
        let tiles = (0..count)
            .map(|i| Tile {
                id: i as TileId,
                z: i as f32 * tile_length - back_offset,
            })
            .collect();

        Ok(Self {
            tiles,
            tile_length,
            recycle_threshold,
        })
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.id == id)
    }

    pub fn tile_length(&self) -> f32 {
        self.tile_length
    }

    pub fn recycle_threshold(&self) -> f32 {
        self.recycle_threshold
    }

    /// Z of the furthest-forward tile.
    pub fn max_z(&self) -> f32 {
        self.tiles.iter().map(|t| t.z).fold(f32::NEG_INFINITY, f32::max)
    }

    /// Z of the rearmost tile.
    pub fn min_z(&self) -> f32 {
        self.tiles.iter().map(|t| t.z).fold(f32::INFINITY, f32::min)
    }

    /// Moves every tile back by `delta` and recycles the ones left behind.
    ///
    /// Returns the ids of recycled tiles in the order they were moved.
    /// The world only scrolls forward: non-positive or non-finite deltas
    /// leave the tiles where they are.
    pub fn scroll(&mut self, delta: f32) -> Vec<TileId> {
        if delta.is_finite() && delta > 0.0 {
            for tile in &mut self.tiles {
                tile.z -= delta;
            }
            self.rebase();
        }
        self.recycle()
    }

    /// Brings a pool that fell entirely behind the threshold back in whole
    /// pool spans, keeping the relative layout.
    fn rebase(&mut self) {
        let behind = self.recycle_threshold - self.max_z();
        if behind <= 0.0 {
            return;
        }
        #[allow(clippy::cast_precision_loss)]
        let span = self.tile_length * self.tiles.len() as f32;
        let shift = (behind / span).ceil() * span;
        debug!("Pool fell {:.2} behind, rebasing by {:.2}", behind, shift);
        for tile in &mut self.tiles {
            tile.z += shift;
        }
    }

    /// Relocates every tile below the threshold to the front of the pool.
    ///
    /// The furthest tile is searched for every relocation, never assumed
    /// from ordering, so drift that reorders tiles cannot break spacing.
    /// A relocated tile lands past the threshold, so each tile moves at
    /// most once per call.
    fn recycle(&mut self) -> Vec<TileId> {
        let mut recycled = Vec::new();

        for _ in 0..self.tiles.len() {
            let Some(index) = self
                .tiles
                .iter()
                .enumerate()
                .filter(|(_, t)| t.z < self.recycle_threshold)
                .min_by(|(_, a), (_, b)| a.z.total_cmp(&b.z))
                .map(|(i, _)| i)
            else {
                break;
            };

            let front = self
                .tiles
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != index)
                .map(|(_, t)| t.z)
                .fold(f32::NEG_INFINITY, f32::max);

            // A single-tile pool has no other tile to line up behind.
            let new_z = if front.is_finite() {
                front + self.tile_length
            } else {
                self.tiles[index].z + self.tile_length
            };

            let tile = &mut self.tiles[index];
            debug!("Recycling tile {} from z={:.2} to z={:.2}", tile.id, tile.z, new_z);
            tile.z = new_z;
            recycled.push(tile.id);
        }

        recycled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted_z(pool: &TilePool) -> Vec<f32> {
        let mut zs: Vec<f32> = pool.tiles().iter().map(|t| t.z).collect();
        zs.sort_by(f32::total_cmp);
        zs
    }

    #[test]
    fn test_initial_layout() {
        let pool = TilePool::new(6, 30.0, None, 0.0).unwrap();
        assert_eq!(pool.len(), 6);
        assert_eq!(sorted_z(&pool), vec![0.0, 30.0, 60.0, 90.0, 120.0, 150.0]);
        assert_eq!(pool.recycle_threshold(), -30.0);

        let shifted = TilePool::new(3, 10.0, None, 10.0).unwrap();
        assert_eq!(sorted_z(&shifted), vec![-10.0, 0.0, 10.0]);
    }

    #[test]
    fn test_first_tile_reappears_at_front() {
        let mut pool = TilePool::new(6, 30.0, None, 0.0).unwrap();

        let recycled = pool.scroll(30.001);

        assert_eq!(recycled, vec![0]);
        let tile = pool.tile(0).unwrap();
        assert!((tile.z - 150.0).abs() < 0.01, "tile 0 at {}", tile.z);
        assert_eq!(pool.len(), 6);
    }

    #[test]
    fn test_no_recycle_at_threshold() {
        let mut pool = TilePool::new(6, 30.0, None, 0.0).unwrap();
        assert!(pool.scroll(30.0).is_empty());
        assert_eq!(pool.tile(0).unwrap().z, -30.0);
    }

    #[test]
    fn test_spacing_stays_uniform_over_many_frames() {
        let mut pool = TilePool::new(6, 30.0, None, 0.0).unwrap();

        for _ in 0..10_000 {
            pool.scroll(0.37);
            assert_eq!(pool.len(), 6);
        }

        let zs = sorted_z(&pool);
        for pair in zs.windows(2) {
            assert!((pair[1] - pair[0] - 30.0).abs() < 0.05, "gap {:?}", pair);
        }
        assert!(pool.min_z() >= pool.recycle_threshold());
    }

    #[test]
    fn test_large_delta_recycles_several_tiles() {
        let mut pool = TilePool::new(4, 10.0, None, 0.0).unwrap();

        let recycled = pool.scroll(25.0);

        assert_eq!(recycled.len(), 2);
        assert_eq!(sorted_z(&pool), vec![-5.0, 5.0, 15.0, 25.0]);
    }

    #[test]
    fn test_huge_delta_rebases_pool() {
        let mut pool = TilePool::new(6, 30.0, None, 0.0).unwrap();

        let recycled = pool.scroll(1.0e9);

        assert!(recycled.len() <= 6);
        assert_eq!(pool.len(), 6);
        assert!(pool.tiles().iter().all(|t| t.z.is_finite()));
        assert!(pool.min_z() >= pool.recycle_threshold());
        assert!(pool.max_z() < pool.recycle_threshold() + 6.0 * 30.0 + 200.0);
    }

    #[test]
    fn test_single_tile_pool_falls_far_behind() {
        let mut pool = TilePool::new(1, 10.0, None, 0.0).unwrap();

        pool.scroll(95.0);

        let z = pool.tile(0).unwrap().z;
        assert!((-10.0..0.0).contains(&z), "tile at {z}");
    }

    #[test]
    fn test_backward_delta_ignored() {
        let mut pool = TilePool::new(6, 30.0, None, 0.0).unwrap();

        assert!(pool.scroll(-40.0).is_empty());
        assert!(pool.scroll(f32::INFINITY).is_empty());

        assert_eq!(sorted_z(&pool), vec![0.0, 30.0, 60.0, 90.0, 120.0, 150.0]);
    }

    #[test]
    fn test_recycle_finds_true_maximum_when_unordered() {
        let mut pool = TilePool::new(3, 10.0, None, 0.0).unwrap();
        // The furthest tile is no longer last in the backing vector.
        pool.tiles[1].z = 20.0;
        pool.tiles[2].z = 10.0;

        pool.scroll(10.5);

        assert!((pool.tile(0).unwrap().z - 19.5).abs() < 1e-4);
    }

    #[test]
    fn test_custom_threshold() {
        let mut pool = TilePool::new(3, 10.0, Some(-2.0), 0.0).unwrap();
        assert_eq!(pool.scroll(2.5), vec![0]);
        assert!((pool.tile(0).unwrap().z - 27.5).abs() < 1e-4);
    }

    #[test]
    fn test_tile_length_fallback() {
        assert_eq!(resolve_tile_length(Some(12.0)), 12.0);
        assert_eq!(resolve_tile_length(None), DEFAULT_TILE_LENGTH);
        assert_eq!(resolve_tile_length(Some(0.0)), DEFAULT_TILE_LENGTH);
        assert_eq!(resolve_tile_length(Some(f32::NAN)), DEFAULT_TILE_LENGTH);
    }

    #[test]
    fn test_rejects_empty_pool() {
        assert!(matches!(
            TilePool::new(0, 30.0, None, 0.0),
            Err(ConfigError::EmptyTilePool)
        ));
    }
}
