use log::info;

use crate::{
    ai::{Enemy, update_enemies},
    camera::Camera,
    grid::Grid,
    input::Input,
    level::Level,
    movement::{apply_input, check_escape},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameState {
    Playing,
    Won,
    Caught,
}

impl GameState {
    #[inline]
    pub fn is_terminal(self) -> bool {
        self != Self::Playing
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Playing => "",
            Self::Won => "You escaped the maze! Press R to play again",
            Self::Caught => "Caught! Press R to try again",
        }
    }
}

/// Everything the tick mutates, plus the spawn data it resets from.
pub struct World {
    level: Level,
    pub camera: Camera,
    pub enemies: Vec<Enemy>,
    state: GameState,
}

impl World {
    pub fn new(level: Level) -> Self {
        info!(
            "Level loaded: {}x{} grid, {} enemies",
            level.grid().width(),
            level.grid().height(),
            level.enemies().len()
        );
        Self {
            camera: level.player(),
            enemies: level.enemies().to_vec(),
            state: GameState::Playing,
            level,
        }
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        self.level.grid()
    }

    #[inline]
    pub fn state(&self) -> GameState {
        self.state
    }

    /// Puts the camera, enemies and flags back to their spawn values.
    pub fn restart(&mut self) {
        self.camera = self.level.player();
        self.enemies = self.level.enemies().to_vec();
        self.state = GameState::Playing;
        info!("Level restarted");
    }

    /// One simulation step: AI, then movement, then the escape check.
    /// Returns the new state when it changed.
    pub fn tick(&mut self, input: &Input) -> Option<GameState> {
        if self.state.is_terminal() {
            if input.restart {
                self.restart();
                return Some(self.state);
            }
            return None;
        }

        let grid = self.level.grid();
        if let Some(i) = update_enemies(
            grid,
            &mut self.enemies,
            self.camera.pos,
            self.level.kill_distance(),
        ) {
            info!("Player caught by enemy {i}");
            return Some(self.transition(GameState::Caught));
        }

        apply_input(grid, &mut self.camera, input);

        if check_escape(grid, self.camera.pos) {
            info!("Player escaped at {:?}", self.camera.pos);
            return Some(self.transition(GameState::Won));
        }
        None
    }

    fn transition(&mut self, state: GameState) -> GameState {
        self.state = state;
        state
    }
}
