use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};

use log::{error, info};
use thiserror::Error;

/// Shown until the atlas image has been decoded.
const PLACEHOLDER_RGBA: [u8; 4] = [96, 96, 96, 255];

/// Decoded RGBA8 image, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Texture {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("expected {expected} bytes of RGBA8 data, got {found}")]
    Size { expected: usize, found: usize },
    #[error(transparent)]
    Atlas(#[from] AtlasError),
    #[error("loader task dropped before sending a result")]
    Disconnected,
}

impl Texture {
    pub fn from_rgba(width: usize, height: usize, data: Vec<u8>) -> Result<Self, TextureError> {
        let expected = width * height * 4;
        if expected == 0 || data.len() != expected {
            return Err(TextureError::Size {
                expected,
                found: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn placeholder() -> Self {
        Self {
            width: 1,
            height: 1,
            data: PLACEHOLDER_RGBA.to_vec(),
        }
    }

    pub fn load(path: &Path) -> Result<Self, TextureError> {
        let img = image::open(path)
            .map_err(|source| TextureError::Decode {
                path: path.to_path_buf(),
                source,
            })?
            .into_rgba8();
        let (w, h) = img.dimensions();
        Self::from_rgba(w as usize, h as usize, img.into_raw())
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Nearest texel. The byte offset is clamped into the buffer so rounding
    /// overshoot never reads past the end.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let i = (4 * (x + self.width * y)).min(self.data.len() - 4);
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }
}

/// Pixel rectangle inside the atlas image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpriteId(pub u16);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AtlasError {
    #[error("atlas tiles must be at least 1x1, got {width}x{height}")]
    EmptyTile { width: usize, height: usize },
    #[error("sprite {0:?} has an empty rectangle")]
    EmptySprite(SpriteId),
    #[error("no atlas rectangle for sprite {0:?}")]
    MissingSprite(SpriteId),
    #[error("tile code {tile} has no wall variant, atlas holds {variants}")]
    MissingWall { tile: u8, variants: u8 },
    #[error("{what} {rect:?} lies outside the {width}x{height} image")]
    OutOfImage {
        what: String,
        rect: Rect,
        width: usize,
        height: usize,
    },
}

/// Maps tile codes and sprite ids to rectangles in the atlas image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Atlas {
    walls: Vec<Rect>, // index = tile code - 1
    sprites: HashMap<SpriteId, Rect>,
}

impl Atlas {
    /// Wall variants sit side by side on the top row of the image.
    pub fn new(
        tile_width: usize,
        tile_height: usize,
        wall_variants: u8,
        sprites: impl IntoIterator<Item = (SpriteId, Rect)>,
    ) -> Result<Self, AtlasError> {
        if tile_width == 0 || tile_height == 0 {
            return Err(AtlasError::EmptyTile {
                width: tile_width,
                height: tile_height,
            });
        }

        let walls = (0..wall_variants as usize)
            .map(|i| Rect {
                x: i * tile_width,
                y: 0,
                width: tile_width,
                height: tile_height,
            })
            .collect();

        let sprites: HashMap<_, _> = sprites.into_iter().collect();
        if let Some((&id, _)) = sprites.iter().find(|(_, r)| r.width == 0 || r.height == 0) {
            return Err(AtlasError::EmptySprite(id));
        }

        Ok(Self {
            walls,
            sprites,
        })
    }

    pub fn wall_variants(&self) -> u8 {
        self.walls.len() as u8
    }

    #[inline]
    pub fn wall(&self, tile: u8) -> Option<Rect> {
        (tile as usize).checked_sub(1).and_then(|i| self.walls.get(i)).copied()
    }

    #[inline]
    pub fn sprite(&self, id: SpriteId) -> Option<Rect> {
        self.sprites.get(&id).copied()
    }

    pub fn require_sprite(&self, id: SpriteId) -> Result<Rect, AtlasError> {
        self.sprite(id).ok_or(AtlasError::MissingSprite(id))
    }

    pub fn require_wall(&self, tile: u8) -> Result<Rect, AtlasError> {
        self.wall(tile).ok_or(AtlasError::MissingWall {
            tile,
            variants: self.wall_variants(),
        })
    }

    /// Checks every rectangle against a decoded image.
    pub fn fits(&self, texture: &Texture) -> Result<(), AtlasError> {
        let (w, h) = (texture.width(), texture.height());
        let outside = |r: &Rect| r.x + r.width > w || r.y + r.height > h;

        for (i, rect) in self.walls.iter().enumerate() {
            if outside(rect) {
                return Err(AtlasError::OutOfImage {
                    what: format!("wall variant {}", i + 1),
                    rect: *rect,
                    width: w,
                    height: h,
                });
            }
        }
        let mut ids: Vec<_> = self.sprites.keys().copied().collect();
        ids.sort();
        for id in ids {
            let rect = self.sprites[&id];
            if outside(&rect) {
                return Err(AtlasError::OutOfImage {
                    what: format!("sprite {}", id.0),
                    rect,
                    width: w,
                    height: h,
                });
            }
        }
        Ok(())
    }
}

/// Atlas image that is decoded off the tick thread. Until it arrives the
/// renderer samples a 1x1 placeholder.
pub struct TextureResource {
    texture: Texture,
    pending: Option<Receiver<Result<Texture, TextureError>>>,
    ready: bool,
}

impl TextureResource {
    /// Starts decoding `path` on the rayon pool.
    pub fn spawn_load(path: PathBuf, atlas: Atlas) -> Self {
        let (tx, rx) = mpsc::channel();
        rayon::spawn(move || {
            let result = Texture::load(&path).and_then(|texture| {
                atlas.fits(&texture)?;
                Ok(texture)
            });
            // Receiver gone means the app already shut down
            let _ = tx.send(result);
        });
        Self {
            texture: Texture::placeholder(),
            pending: Some(rx),
            ready: false,
        }
    }

    pub fn ready(texture: Texture) -> Self {
        Self {
            texture,
            pending: None,
            ready: true,
        }
    }

    /// Non-blocking readiness check, call once per tick.
    pub fn poll(&mut self) -> bool {
        let Some(rx) = &self.pending else {
            return self.ready;
        };

        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => Err(TextureError::Disconnected),
        };
        self.pending = None;

        match result {
            Ok(texture) => {
                info!(
                    "Texture atlas ready ({}x{})",
                    texture.width(),
                    texture.height()
                );
                self.texture = texture;
                self.ready = true;
            }
            Err(e) => error!("Texture atlas unavailable, keeping placeholder: {e}"),
        }
        self.ready
    }

    #[inline]
    pub fn texture(&self) -> &Texture {
        &self.texture
    }
}
