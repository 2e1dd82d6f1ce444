mod cli;

use std::fs;

use anyhow::{Context, Result};
use clap::Parser;
use gridray_core::{Camera, Geometry, GroundGrid, ImageBuffer, Sphere};
use gridray_math::{Color, Mat4, Quat, Vec3};
use gridray_renderer::{render, render_buckets, CancelToken, RenderConfig, Scene};
use log::{debug, info};

use cli::{Args, SceneKind};

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(args.log_level.into())
        .init();

    info!("Starting gridray");

    let mut image = ImageBuffer::new(args.width, args.height);

    match args.pattern {
        Some(index) => {
            let pattern = image.fill_test_pattern(index);
            info!("Wrote test pattern {:?}", pattern);
        }
        None => trace_scene(&args, &mut image)?,
    }

    image
        .to_rgb_image()
        .save(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    info!("Saved {}", args.output.display());

    Ok(())
}

fn trace_scene(args: &Args, image: &mut ImageBuffer) -> Result<()> {
    let config = load_config(args)?;
    let scene = build_scene(args.scene, args.width, args.height)?;
    let cancel = CancelToken::new();

    let stats = if args.parallel {
        render_buckets(&scene, image, &config, &cancel)?
    } else {
        let height = args.height;
        let mut on_progress = |_: &ImageBuffer, rows: u32| {
            debug!("{}/{} scanlines", rows, height);
        };
        render(&scene, image, &config, &cancel, Some(&mut on_progress))?
    };

    debug!("Render stats: {:?}", stats);
    image.log_pixel(args.width / 2, args.height / 2)?;
    Ok(())
}

/// Read the JSON config if one was given, then apply command-line overrides.
fn load_config(args: &Args) -> Result<RenderConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("Failed to parse config {}", path.display()))?
        }
        None => RenderConfig::default(),
    };

    if let Some(samples) = args.samples {
        config.samples_per_axis = samples;
    }
    if args.jitter {
        config.jitter = true;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    config.validate()?;
    Ok(config)
}

fn build_scene(kind: SceneKind, width: u32, height: u32) -> Result<Scene> {
    let mut camera = Camera::new()
        .with_resolution(width, height)
        .context("Invalid image size")?;
    let grid = Geometry::ground_grid(GroundGrid::default());

    let scene = match kind {
        SceneKind::Grid => {
            let mut scene = Scene::new(camera);
            scene.add(grid);
            scene
        }
        SceneKind::Spheres => {
            camera.set_perspective(50.0, width as f32 / height as f32, 1.0)?;
            camera.look_at(
                Vec3::new(0.0, -9.0, -1.0),
                Vec3::new(0.0, 0.0, -4.0),
                Vec3::Z,
            )?;

            let mut scene = Scene::new(camera);
            scene.add(grid);
            scene.add_placed(
                Geometry::sphere(Sphere::new(Color::new(0.8, 0.3, 0.3))),
                Mat4::from_translation(Vec3::new(-1.5, 0.0, -4.0)),
            )?;
            scene.add_placed(
                Geometry::sphere(Sphere::new(Color::new(0.2, 0.3, 0.8))),
                Mat4::from_scale_rotation_translation(
                    Vec3::new(0.75, 0.75, 1.5),
                    Quat::IDENTITY,
                    Vec3::new(1.5, 1.0, -3.5),
                ),
            )?;
            scene
        }
    };

    scene.camera.log_state();
    info!(
        "Built {:?} scene with {} geometry at {}x{}",
        kind,
        scene.len(),
        width,
        height
    );
    Ok(scene)
}
