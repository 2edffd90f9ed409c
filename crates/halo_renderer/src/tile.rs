//! Tile decomposition of the image.
//!
//! The image is cut into a row-major grid of tiles that render independently.
//! Each tile row reseeds its own random stream from the film row (counted
//! from the bottom of the image) and the tile index, so the result does not
//! depend on which thread renders which tile.

use crate::material::Color;

/// Default tile edge in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 8;

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    /// X coordinate of tile's top-left corner
    pub x: u32,
    /// Y coordinate of tile's top-left corner
    pub y: u32,
    /// Width of the tile in pixels
    pub width: u32,
    /// Height of the tile in pixels
    pub height: u32,
    /// Row-major index of this tile in the grid
    pub index: usize,
}

impl Tile {
    /// Create a new tile.
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    /// Get the total number of pixels in this tile.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }

    /// Image rows covered by this tile, in render order (bottom row first).
    pub fn rows(&self) -> impl Iterator<Item = u32> {
        (self.y..self.y + self.height).rev()
    }

    /// Random stream seed for image row `row` of this tile, in an image
    /// `image_height` pixels tall.
    pub fn row_seed(&self, row: u32, image_height: u32) -> u32 {
        debug_assert!(row < image_height, "row {row} outside image of height {image_height}");
        tile_seed(image_height - 1 - row, self.index)
    }
}

/// Seed for a film row (0 = bottom) within a tile. Always odd, so never zero.
#[inline]
pub fn tile_seed(film_row: u32, tile_index: usize) -> u32 {
    film_row
        .wrapping_mul(9781)
        .wrapping_add((tile_index as u32).wrapping_mul(6271))
        | 1
}

/// Number of tiles along each axis.
pub fn tile_counts(width: u32, height: u32, tile_size: u32) -> (u32, u32) {
    (width.div_ceil(tile_size), height.div_ceil(tile_size))
}

/// Generate tiles in row-major order; index `ty * tiles_x + tx`.
///
/// Tiles on the right and bottom edges are clipped to the image.
pub fn generate_tiles(width: u32, height: u32, tile_size: u32) -> Vec<Tile> {
    debug_assert!(tile_size > 0, "tile size must be positive");
    let (tiles_x, tiles_y) = tile_counts(width, height, tile_size);
    let mut tiles = Vec::with_capacity((tiles_x * tiles_y) as usize);

    for ty in 0..tiles_y {
        for tx in 0..tiles_x {
            let x = tx * tile_size;
            let y = ty * tile_size;
            let tw = tile_size.min(width - x);
            let th = tile_size.min(height - y);
            tiles.push(Tile::new(x, y, tw, th, tiles.len()));
        }
    }

    tiles
}

/// Result of rendering a tile.
#[derive(Debug, Clone)]
pub struct TileResult {
    /// The tile that was rendered
    pub tile: Tile,
    /// Pixel colors in row-major order, top row first
    pub pixels: Vec<Color>,
    /// Rays cast while rendering the tile
    pub rays: u64,
}

impl TileResult {
    /// Create a new tile result.
    pub fn new(tile: Tile, pixels: Vec<Color>, rays: u64) -> Self {
        Self { tile, pixels, rays }
    }
}
