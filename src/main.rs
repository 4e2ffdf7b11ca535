mod cli;

use clap::Parser;

use iridescent::{Viewer, ViewerError};

fn main() -> Result<(), ViewerError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = cli::Args::parse();
    let params = args.shading_params();
    log::info!(
        "starting with {} octaves, amplitude {}, {} subdivisions",
        params.octaves,
        params.amplitude,
        params.subdivisions
    );

    let viewer = Viewer::new()
        .with_params(params)
        .with_config(args.render_config());

    let viewer = match &args.texture {
        Some(path) => viewer.with_texture_file(path),
        None => viewer.with_noise_seed(args.seed),
    };

    viewer.run()
}
