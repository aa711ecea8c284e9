use log::debug;

use crate::{
    collision::{has_line_of_sight, is_colliding},
    grid::Grid,
    texture::SpriteId,
};

/// Footprint used to gate enemy moves.
pub const ENEMY_RADIUS: f32 = 0.2;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TrackState {
    #[default]
    NoTrack,
    Tracking,
}

/// Pursuing billboard entity.
#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub pos: [f32; 2],
    pub size: f32, // relative to wall height
    pub sprite: SpriteId,
    pub speed: f32, // tile units per tick
    pub detection_range: f32,
    pub state: TrackState,
    /// Recorded while tracking. Nothing steers towards it yet.
    pub last_known_player_pos: Option<[f32; 2]>,
}

impl Enemy {
    pub fn new(pos: [f32; 2], sprite: SpriteId, speed: f32, detection_range: f32) -> Self {
        Self {
            pos,
            size: 1.0,
            sprite,
            speed,
            detection_range,
            state: TrackState::NoTrack,
            last_known_player_pos: None,
        }
    }

    #[inline]
    pub fn has_line_of_sight(&self) -> bool {
        self.state == TrackState::Tracking
    }

    fn set_state(&mut self, index: usize, state: TrackState) {
        if self.state != state {
            debug!("enemy {index}: {:?} -> {:?}", self.state, state);
            self.state = state;
        }
    }

    /// One straight-line step towards `target`, dropped if it would collide.
    fn step_towards(&mut self, grid: &Grid, target: [f32; 2], distance: f32) {
        if distance <= 0.0 {
            return;
        }
        let k = self.speed / distance;
        let next = [
            self.pos[0] + (target[0] - self.pos[0]) * k,
            self.pos[1] + (target[1] - self.pos[1]) * k,
        ];
        if !is_colliding(grid, next, ENEMY_RADIUS) {
            self.pos = next;
        }
    }
}

/// Runs one AI tick in array order. Returns the index of the enemy that
/// reached the player; later enemies are not updated on that tick.
pub fn update_enemies(
    grid: &Grid,
    enemies: &mut [Enemy],
    player: [f32; 2],
    kill_distance: f32,
) -> Option<usize> {
    for (i, enemy) in enemies.iter_mut().enumerate() {
        let dx = player[0] - enemy.pos[0];
        let dy = player[1] - enemy.pos[1];
        let distance = (dx * dx + dy * dy).sqrt();

        if distance <= kill_distance {
            return Some(i);
        }

        if distance <= enemy.detection_range && has_line_of_sight(grid, enemy.pos, player) {
            enemy.set_state(i, TrackState::Tracking);
            enemy.last_known_player_pos = Some(player);
        } else {
            enemy.set_state(i, TrackState::NoTrack);
        }

        if enemy.state == TrackState::Tracking {
            enemy.step_towards(grid, player, distance);
        }
    }
    None
}
