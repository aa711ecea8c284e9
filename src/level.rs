use thiserror::Error;

use crate::{
    ai::{ENEMY_RADIUS, Enemy},
    camera::Camera,
    collision::is_colliding,
    grid::{Grid, GridError},
    movement::PLAYER_RADIUS,
    texture::{Atlas, AtlasError, Rect, SpriteId},
};

pub const ATLAS_PATH: &str = "t_map.png";
pub const TILE_SIZE_PX: usize = 16;
pub const GHOST: SpriteId = SpriteId(1);

// 1: outer wall, 2: inner blocks, 3: center pillar. The gap at the end of
// row 14 is the exit.
const MAZE: &str = "
    1111111111111111
    1010000000000001
    1000000000000001
    1022220000222001
    1022000000002001
    1022000000002001
    1020000330000001
    1020000330000001
    1020000000000001
    1022000000002001
    1022000000002001
    1022220000222001
    1000000000000001
    1000000000000001
    1000000000000000
    1111111111111111
";

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("invalid grid: {0}")]
    Grid(#[from] GridError),
    #[error("invalid atlas: {0}")]
    Atlas(#[from] AtlasError),
    #[error("{what} spawns inside a wall at ({}, {})", .pos[0], .pos[1])]
    BlockedSpawn { what: String, pos: [f32; 2] },
    #[error("kill distance must be non-negative, got {0}")]
    KillDistance(f32),
}

/// Immutable spawn data. Restarting a level copies these values back out.
#[derive(Clone, Debug)]
pub struct Level {
    grid: Grid,
    player: Camera,
    enemies: Vec<Enemy>,
    kill_distance: f32,
}

impl Level {
    /// Every id the level references must resolve in `atlas` and every spawn
    /// must be free; nothing is checked again mid-frame.
    pub fn new(
        grid: Grid,
        player: Camera,
        enemies: Vec<Enemy>,
        kill_distance: f32,
        atlas: &Atlas,
    ) -> Result<Self, LevelError> {
        if kill_distance.is_nan() || kill_distance < 0.0 {
            return Err(LevelError::KillDistance(kill_distance));
        }

        for tile in 1..=grid.max_tile() {
            atlas.require_wall(tile)?;
        }

        if is_colliding(&grid, player.pos, PLAYER_RADIUS) {
            return Err(LevelError::BlockedSpawn {
                what: "player".into(),
                pos: player.pos,
            });
        }

        for (i, enemy) in enemies.iter().enumerate() {
            atlas.require_sprite(enemy.sprite)?;
            if is_colliding(&grid, enemy.pos, ENEMY_RADIUS) {
                return Err(LevelError::BlockedSpawn {
                    what: format!("enemy {i}"),
                    pos: enemy.pos,
                });
            }
        }

        Ok(Self {
            grid,
            player,
            enemies,
            kill_distance,
        })
    }

    pub fn builtin(atlas: &Atlas) -> Result<Self, LevelError> {
        let grid = Grid::parse(MAZE)?;
        let player = Camera {
            pos: [1.5, 1.5],
            heading: 0.0,
            move_speed: 0.03,
            turn_speed: 0.03,
        };
        let enemies = vec![
            Enemy::new([8.5, 4.5], GHOST, 0.012, 6.0),
            Enemy::new([13.5, 13.5], GHOST, 0.015, 6.0),
        ];
        Self::new(grid, player, enemies, 0.8, atlas)
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn player(&self) -> Camera {
        self.player
    }

    #[inline]
    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    #[inline]
    pub fn kill_distance(&self) -> f32 {
        self.kill_distance
    }
}

/// Layout of `t_map.png`: wall variants along the top row, the ghost below
/// the first one.
pub fn builtin_atlas() -> Result<Atlas, AtlasError> {
    Atlas::new(
        TILE_SIZE_PX,
        TILE_SIZE_PX,
        3,
        [(
            GHOST,
            Rect {
                x: 0,
                y: TILE_SIZE_PX,
                width: TILE_SIZE_PX,
                height: TILE_SIZE_PX,
            },
        )],
    )
}
