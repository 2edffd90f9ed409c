use anyhow::{Context, Result};
use clap::Parser;
use halo_math::{LaneWidth, Vec3};
use halo_renderer::{render, render_serial, save_ppm, Camera, CancelFlag, PpmFormat, RenderConfig};
use log::{info, warn};

mod cli;
mod logger;
mod scene;

use cli::Args;
use logger::init_logger;
use scene::random_scene;

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.log_level.into());

    let lane_width = LaneWidth::from(args.lanes);
    if lane_width.lanes() > LaneWidth::native().lanes() {
        warn!(
            "{}-wide lanes requested but this build targets {}-wide registers; expect emulation",
            lane_width.lanes(),
            LaneWidth::native().lanes()
        );
    }

    let config = RenderConfig::default()
        .with_resolution(args.width, args.height)
        .with_samples(args.samples)
        .with_max_depth(args.max_depth)
        .with_tile_size(args.tile_size)
        .with_lane_width(lane_width);
    config.validate().context("invalid render settings")?;

    let scene =
        random_scene(args.seed, args.grid, lane_width).context("failed to build demo scene")?;
    info!(
        "Scene: {} spheres (seed {}, grid {})",
        scene.spheres().len(),
        args.seed,
        args.grid
    );

    let camera = Camera::new()
        .with_position(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.1, 10.0)
        .with_aspect(config.aspect());

    let cancel = CancelFlag::new();
    let output = if args.serial {
        render_serial(&scene, &camera, &config, &cancel)
    } else {
        render(&scene, &camera, &config, &cancel)
    }
    .context("render failed")?;

    let stats = output.stats;
    let seconds = stats.elapsed.as_secs_f64();
    info!("Tiles: {}", stats.tiles);
    info!(
        "Primary rays: {} ({:.2} Mrays/s)",
        stats.primary_rays,
        if seconds > 0.0 { stats.primary_rays as f64 / seconds / 1.0e6 } else { 0.0 }
    );
    info!(
        "Total rays: {} ({:.2} Mrays/s)",
        stats.total_rays,
        stats.rays_per_second() / 1.0e6
    );

    let format = if args.ascii { PpmFormat::Ascii } else { PpmFormat::Binary };
    save_ppm(&output.image, &args.output, format)
        .with_context(|| format!("failed to write {}", args.output))?;

    Ok(())
}
