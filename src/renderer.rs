use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::{
    ai::Enemy,
    camera::Camera,
    config::{EngineConfig, Falloff},
    grid::Grid,
    raycast::{RayHit, cast},
    texture::{Atlas, Texture},
    world::{GameState, World},
};

/// Sprite texels darker than this on every channel are see-through.
const CUTOUT: u8 = 10;

const WON_TINT: [u8; 3] = [20, 90, 30];
const CAUGHT_TINT: [u8; 3] = [110, 10, 10];

/// Fixed-size RGBA8 raster, row-major, opaque.
pub struct Framebuffer {
    width: usize,
    height: usize,
    pixels: Vec<[u8; 4]>,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0, 0, 0, 255]; width * height],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[[u8; 4]] {
        &self.pixels
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        self.pixels[y * self.width + x]
    }

    pub fn clear(&mut self, rgb: [u8; 3]) {
        self.pixels.fill([rgb[0], rgb[1], rgb[2], 255]);
    }

    #[inline]
    fn put(&mut self, x: usize, y: usize, rgb: [u8; 3]) {
        self.pixels[y * self.width + x] = [rgb[0], rgb[1], rgb[2], 255];
    }
}

#[inline]
fn shade(texel: [u8; 4], darken: f32) -> [u8; 3] {
    [
        (texel[0] as f32 * darken) as u8,
        (texel[1] as f32 * darken) as u8,
        (texel[2] as f32 * darken) as u8,
    ]
}

/// Draws one textured wall strip centered on the horizon. `distance` is the
/// fisheye-corrected distance and only drives shading.
pub fn draw_wall_column(
    fb: &mut Framebuffer,
    texture: &Texture,
    atlas: &Atlas,
    falloff: Falloff,
    screen_x: usize,
    hit: &RayHit,
    distance: f32,
    projected_height: f32,
) {
    let Some(rect) = atlas.wall(hit.tile) else {
        return;
    };
    if screen_x >= fb.width() || !projected_height.is_finite() {
        return;
    }

    let mut height = projected_height.round() as i64;
    height += height % 2;
    if height <= 0 {
        return;
    }

    let darken = falloff.darken(distance);
    let tx = rect.x + ((hit.u * rect.width as f32) as usize).min(rect.width - 1);
    let screen_h = fb.height() as f32;
    let offset = screen_h / 2.0 - height as f32 / 2.0;

    // Only walk the part of the strip that lands on screen
    let first = (-offset - 1.0).floor().max(0.0) as i64;
    let last = (screen_h - offset + 1.0).ceil().min(height as f32) as i64;

    for i in first..last {
        let y = (i as f32 + offset).round();
        if y < 0.0 || y >= screen_h {
            continue;
        }
        let ty = rect.y + (i as f32 / height as f32 * rect.height as f32) as usize;
        let rgb = shade(texture.pixel(tx, ty), darken);
        fb.put(screen_x, y as usize, rgb);
    }
}

/// Draws a camera-facing sprite. `wall_distance` answers the wall hit
/// distance for a screen column; columns where the wall is nearer are
/// skipped. Sprites do not sort against each other.
pub fn draw_sprite(
    fb: &mut Framebuffer,
    texture: &Texture,
    atlas: &Atlas,
    config: &EngineConfig,
    sprite: &Enemy,
    camera: &Camera,
    wall_distance: impl Fn(usize) -> f32,
) {
    let Some(rect) = atlas.sprite(sprite.sprite) else {
        return;
    };

    let (tiles, angle) = camera.bearing_to(sprite.pos);
    let distance = tiles * config.tile_size;
    if distance < config.sprite_near_clip
        || distance > config.sprite_far_clip
        || angle.abs() > config.fov / 2.0
    {
        return;
    }

    let screen_w = fb.width() as f32;
    let screen_h = fb.height() as f32;
    let center_x = (angle / config.fov + 0.5) * screen_w;
    let wall_height = screen_h / distance * config.scale_constant;
    let size = wall_height * sprite.size;
    if size < 1.0 {
        return;
    }

    // Stand on the floor line of a wall at the same distance
    let bottom = screen_h / 2.0 + wall_height / 2.0;
    let left = (center_x - size / 2.0).round() as i64;
    let top = (bottom - size).round() as i64;
    let side = size.round() as i64;
    let darken = config.sprite_falloff.darken(distance);

    let x0 = left.max(0);
    let x1 = (left + side).min(fb.width() as i64);
    let y0 = top.max(0);
    let y1 = (top + side).min(fb.height() as i64);

    for sx in x0..x1 {
        if distance > wall_distance(sx as usize) {
            continue;
        }
        let u = (sx - left) as f32 / side as f32;
        let tx = rect.x + ((u * rect.width as f32) as usize).min(rect.width - 1);

        for sy in y0..y1 {
            let v = (sy - top) as f32 / side as f32;
            let ty = rect.y + ((v * rect.height as f32) as usize).min(rect.height - 1);
            let texel = texture.pixel(tx, ty);
            if texel[0] < CUTOUT && texel[1] < CUTOUT && texel[2] < CUTOUT {
                continue;
            }
            fb.put(sx as usize, sy as usize, shade(texel, darken));
        }
    }
}

/// Casts the ray through column `col` of a `width` column view.
#[inline]
fn cast_column(
    grid: &Grid,
    config: &EngineConfig,
    camera: &Camera,
    col: usize,
    width: usize,
) -> (f32, RayHit) {
    let angle = camera.column_angle(col, width, config.fov);
    (angle, cast(grid, config, camera.pos, angle))
}

/// Renders one full frame of `world` into `fb`. Columns follow the
/// framebuffer's own width; `config.screen_width` only sizes the shell's
/// buffer.
pub fn render_frame(
    fb: &mut Framebuffer,
    world: &World,
    texture: &Texture,
    atlas: &Atlas,
    config: &EngineConfig,
) {
    let tint = match world.state() {
        GameState::Playing => None,
        GameState::Won => Some(WON_TINT),
        GameState::Caught => Some(CAUGHT_TINT),
    };
    if let Some(rgb) = tint {
        fb.clear(rgb);
        return;
    }

    fb.clear(config.background);

    let grid = world.grid();
    let camera = &world.camera;
    let width = fb.width();

    // Columns are independent; cast them across the pool, draw in order
    let hits: Vec<(f32, RayHit)> = (0..width)
        .into_par_iter()
        .map(|col| cast_column(grid, config, camera, col, width))
        .collect();

    for (col, (angle, hit)) in hits.iter().enumerate() {
        if hit.distance == 0.0 {
            continue;
        }
        let corrected = hit.distance * (angle - camera.heading).cos();
        let projected = fb.height() as f32 / corrected * config.scale_constant;
        draw_wall_column(
            fb,
            texture,
            atlas,
            config.wall_falloff,
            col,
            hit,
            corrected,
            projected,
        );
    }

    for enemy in &world.enemies {
        draw_sprite(fb, texture, atlas, config, enemy, camera, |col| {
            cast_column(grid, config, camera, col, width).1.distance
        });
    }
}
