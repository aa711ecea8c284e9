//! Ray-cast first-person maze: a march-and-intersect ray caster, textured
//! column rasterizer, grid collision and line-of-sight, and straight-line
//! pursuing enemies, all driven by an owned [`world::World`].

pub mod ai;
pub mod camera;
pub mod collision;
pub mod config;
pub mod grid;
pub mod input;
pub mod level;
pub mod logging;
pub mod movement;
pub mod raycast;
pub mod renderer;
pub mod scaler;
pub mod texture;
pub mod world;
