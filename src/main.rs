use clap::Parser;
use log::{error, info, warn};

mod cli;
mod logger;

use cli::Args;
use lenstrace::aberration::rms_spot_size;
use lenstrace::beam::cylindrical_beam;
use lenstrace::optimize::{curvature_grid, matching_rear_curvature, optimize_singlet};
use lenstrace::output::save_spot_diagram;
use lenstrace::surface::Surface;
use lenstrace::system::propagate;
use logger::init_logger;

fn main() {
    let args = Args::parse();

    init_logger(args.debug_level.clone().into());

    // Log application startup with version information
    info!("Lenstrace - Git Version {} ({})", env!("GIT_HASH"), env!("GIT_DATE"));

    let result = if args.optimize {
        run_optimizer(&args)
    } else {
        run_trace(&args)
    };

    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}

/// Trace the configured beam through the configured singlet, report the RMS
/// spot size at the focal plane and save the spot diagram.
fn run_trace(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let rear_curvature = matching_rear_curvature(
        args.curvature,
        args.focal_length,
        args.lens_index,
        args.thickness,
    );
    let output_z = args.focal_length + args.thickness / 2.0;

    info!(
        "singlet: c1 = {:.4} 1/mm, c2 = {:.4} 1/mm, n = {}, thickness = {} mm",
        args.curvature, rear_curvature, args.lens_index, args.thickness
    );

    let surfaces = [
        Surface::lens(0.0, args.curvature, 1.0, args.lens_index, args.aperture)?,
        Surface::lens(
            args.thickness,
            rear_curvature,
            args.lens_index,
            1.0,
            args.aperture,
        )?,
        Surface::output_plane(output_z),
    ];

    let mut rays = cylindrical_beam(args.rings, args.ring_step, 0.0, 0.0, args.launch_z)?;
    info!("tracing {} rays through {} surfaces", rays.len(), surfaces.len());
    propagate(&surfaces, &mut rays);

    let terminated_early = rays
        .iter()
        .filter(|ray| (ray.position().z - output_z).abs() > 1e-6)
        .count();
    if terminated_early > 0 {
        warn!("{} rays never reached the output plane", terminated_early);
    }

    let rms = rms_spot_size(&rays, output_z);
    info!("RMS spot size at z = {:.3} mm: {:.6} mm", output_z, rms);

    save_spot_diagram(&rays, output_z, &args.output, args.spot_size);
    Ok(())
}

/// Sweep the reference curvature grid for the minimum-RMS singlet.
fn run_optimizer(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let grid = curvature_grid(0.01, 0.151, 0.01);
    info!(
        "sweeping {} front curvatures for f = {} mm",
        grid.len(),
        args.focal_length
    );

    let best = optimize_singlet(
        args.focal_length,
        args.lens_index,
        args.thickness,
        args.aperture,
        &grid,
    )?;

    match best {
        Some(design) => info!(
            "optimum: c1 = {:.4} 1/mm, c2 = {:.4} 1/mm, RMS = {:.6} mm",
            design.front_curvature, design.rear_curvature, design.rms
        ),
        None => warn!("empty curvature grid, nothing to optimize"),
    }
    Ok(())
}
