//! Tile-parallel path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Tiles fanned out over rayon, each with its own per-row random streams
//! - A serial path that produces the identical image
//! - sRGB encoding for 8-bit output

use crate::camera::Camera;
use crate::error::{RenderError, RenderResult};
use crate::integrator::{trace, MAX_DEPTH};
use crate::material::Color;
use crate::sampling::{gen_f32, XorShift32};
use crate::scene::Scene;
use crate::tile::{generate_tiles, Tile, TileResult, DEFAULT_TILE_SIZE};
use halo_math::LaneWidth;
use rand::RngCore;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Render configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Tile edge in pixels
    pub tile_size: u32,
    /// Lane width the scene should be committed for
    pub lane_width: LaneWidth,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            samples_per_pixel: 16,
            max_depth: MAX_DEPTH,
            tile_size: DEFAULT_TILE_SIZE,
            lane_width: LaneWidth::native(),
        }
    }
}

impl RenderConfig {
    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_samples(mut self, samples_per_pixel: u32) -> Self {
        self.samples_per_pixel = samples_per_pixel;
        self
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_tile_size(mut self, tile_size: u32) -> Self {
        self.tile_size = tile_size;
        self
    }

    pub fn with_lane_width(mut self, lane_width: LaneWidth) -> Self {
        self.lane_width = lane_width;
        self
    }

    /// Film aspect ratio (width over height).
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Check that the configuration describes a renderable image.
    pub fn validate(&self) -> RenderResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::EmptyImage {
                width: self.width,
                height: self.height,
            });
        }
        if self.samples_per_pixel == 0 {
            return Err(RenderError::NoSamples);
        }
        if self.tile_size == 0 {
            return Err(RenderError::ZeroTileSize);
        }
        if self.max_depth == 0 {
            return Err(RenderError::ZeroMaxDepth);
        }
        Ok(())
    }
}

/// Shared cancellation switch, checked once per tile.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask every render holding this flag to stop at the next tile.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Simple image buffer for storing linear render output.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    /// Row-major, top row first
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        y as usize * self.width as usize + x as usize
    }

    /// Copy a rendered tile into place.
    pub fn write_tile(&mut self, result: &TileResult) {
        let tile = &result.tile;
        for (row, chunk) in result.pixels.chunks_exact(tile.width as usize).enumerate() {
            let start = self.index(tile.x, tile.y + row as u32);
            self.pixels[start..start + chunk.len()].copy_from_slice(chunk);
        }
    }

    /// Convert to sRGB-encoded RGB bytes (for display or saving).
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgb8(*color));
        }
        bytes
    }
}

/// Counters collected during a render.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RenderStats {
    pub tiles: usize,
    /// Camera rays (pixels times samples)
    pub primary_rays: u64,
    /// Every ray sent into the accelerator, primary and scattered
    pub total_rays: u64,
    pub elapsed: Duration,
}

impl RenderStats {
    pub fn rays_per_second(&self) -> f64 {
        let seconds = self.elapsed.as_secs_f64();
        if seconds > 0.0 {
            self.total_rays as f64 / seconds
        } else {
            0.0
        }
    }
}

/// A finished render.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    pub image: ImageBuffer,
    pub stats: RenderStats,
}

/// sRGB transfer function, input clamped to [0, 1].
#[inline]
pub fn linear_to_srgb(linear: f32) -> f32 {
    let c = linear.clamp(0.0, 1.0);
    if c < 0.003_130_8 {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

/// Convert a linear color to 8-bit sRGB.
pub fn color_to_rgb8(color: Color) -> [u8; 3] {
    let encode = |c: f32| (255.99 * linear_to_srgb(c)) as u8;
    [encode(color.x), encode(color.y), encode(color.z)]
}

/// Render a single pixel with multi-sampling.
///
/// Returns the averaged linear color and the number of rays cast.
pub fn render_pixel<R: RngCore + ?Sized>(
    scene: &Scene,
    camera: &Camera,
    config: &RenderConfig,
    x: u32,
    y: u32,
    rng: &mut R,
) -> (Color, u64) {
    let inv_width = 1.0 / config.width as f32;
    let inv_height = 1.0 / config.height as f32;
    // Film t runs bottom to top, image rows top to bottom
    let row_from_bottom = (config.height - 1 - y) as f32;

    let mut pixel_color = Color::ZERO;
    let mut rays = 0;

    for _ in 0..config.samples_per_pixel {
        let s = (x as f32 + gen_f32(rng)) * inv_width;
        let t = (row_from_bottom + gen_f32(rng)) * inv_height;

        let ray = camera.get_ray(s, t, rng);
        let path = trace(ray, scene, config.max_depth, rng);
        pixel_color += path.color;
        rays += path.rays_cast();
    }

    // Average the samples
    (pixel_color * (1.0 / config.samples_per_pixel as f32), rays)
}

/// Render one tile to a vector of colors.
///
/// Rows are rendered bottom row first, each with a freshly seeded stream;
/// pixels come back in row-major order, top row first.
pub fn render_tile(
    tile: &Tile,
    scene: &Scene,
    camera: &Camera,
    config: &RenderConfig,
) -> TileResult {
    let mut pixels = vec![Color::ZERO; tile.pixel_count() as usize];
    let mut rays = 0;

    for row in tile.rows() {
        let mut rng = XorShift32::new(tile.row_seed(row, config.height));
        let offset = ((row - tile.y) * tile.width) as usize;

        for dx in 0..tile.width {
            let (color, pixel_rays) =
                render_pixel(scene, camera, config, tile.x + dx, row, &mut rng);
            pixels[offset + dx as usize] = color;
            rays += pixel_rays;
        }
    }

    TileResult::new(*tile, pixels, rays)
}

/// Render the scene, fanning tiles out over the rayon thread pool.
pub fn render(
    scene: &Scene,
    camera: &Camera,
    config: &RenderConfig,
    cancel: &CancelFlag,
) -> RenderResult<RenderOutput> {
    let tiles = prepare(scene, config)?;
    log::info!(
        "Rendering {}x{} @ {} spp: {} tiles on {} threads",
        config.width,
        config.height,
        config.samples_per_pixel,
        tiles.len(),
        rayon::current_num_threads()
    );

    let start = Instant::now();
    let results = tiles
        .par_iter()
        .map(|tile| (!cancel.is_cancelled()).then(|| render_tile(tile, scene, camera, config)))
        .collect::<Option<Vec<_>>>();

    finish(config, results, start)
}

/// Render the scene on the calling thread. Produces the same image as
/// [`render`].
pub fn render_serial(
    scene: &Scene,
    camera: &Camera,
    config: &RenderConfig,
    cancel: &CancelFlag,
) -> RenderResult<RenderOutput> {
    let tiles = prepare(scene, config)?;
    log::info!(
        "Rendering {}x{} @ {} spp: {} tiles serially",
        config.width,
        config.height,
        config.samples_per_pixel,
        tiles.len()
    );

    let start = Instant::now();
    let results = tiles
        .iter()
        .map(|tile| (!cancel.is_cancelled()).then(|| render_tile(tile, scene, camera, config)))
        .collect::<Option<Vec<_>>>();

    finish(config, results, start)
}

fn prepare(scene: &Scene, config: &RenderConfig) -> RenderResult<Vec<Tile>> {
    config.validate()?;

    let committed = scene.spheres().lane_width();
    if committed != config.lane_width {
        log::warn!(
            "Scene committed for {}-wide lanes but config asks for {}; using {}",
            committed.lanes(),
            config.lane_width.lanes(),
            committed.lanes()
        );
    }
    log::debug!(
        "{} spheres, {}-wide lanes, {}px tiles, max depth {}",
        scene.spheres().len(),
        committed.lanes(),
        config.tile_size,
        config.max_depth
    );

    Ok(generate_tiles(config.width, config.height, config.tile_size))
}

fn finish(
    config: &RenderConfig,
    results: Option<Vec<TileResult>>,
    start: Instant,
) -> RenderResult<RenderOutput> {
    let Some(results) = results else {
        log::warn!("Render cancelled after {:.2?}", start.elapsed());
        return Err(RenderError::Cancelled);
    };

    let mut image = ImageBuffer::new(config.width, config.height);
    let mut total_rays = 0;
    for result in &results {
        image.write_tile(result);
        total_rays += result.rays;
    }

    let stats = RenderStats {
        tiles: results.len(),
        primary_rays: config.width as u64 * config.height as u64 * config.samples_per_pixel as u64,
        total_rays,
        elapsed: start.elapsed(),
    };
    log::info!(
        "Rendered in {:.2?} ({} rays, {:.2} Mrays/s)",
        stats.elapsed,
        stats.total_rays,
        stats.rays_per_second() / 1.0e6
    );

    Ok(RenderOutput { image, stats })
}
