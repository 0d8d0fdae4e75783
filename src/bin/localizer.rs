use std::path::PathBuf;

use clap::Parser;
use vloc::{
    config::HarnessConfig,
    line_editor::{LineEditor, PROMPT},
    Localizer,
};

#[derive(Parser)]
#[clap(about = "Interactive localization evaluation against a keyframe map")]
struct Args {
    /// JSON file with the loop settings
    #[clap(long)]
    config: Option<PathBuf>,
    /// Directory receiving the dumped trajectories and images
    #[clap(long)]
    scratch_dir: Option<PathBuf>,
    /// Number of neighbouring keyframes used by `find`
    #[clap(long)]
    window_size: Option<usize>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => HarnessConfig::load(path)?,
        None => HarnessConfig::default(),
    };
    if let Some(scratch_dir) = args.scratch_dir {
        config.scratch_dir = scratch_dir;
    }
    if let Some(window_size) = args.window_size {
        config.window_size = window_size;
    }
    config.validate()?;
    log::info!("Dumping artifacts to {}", config.scratch_dir.display());

    let editor = LineEditor::new(PROMPT)?;
    let mut stdout = std::io::stdout();
    Localizer::with_files(config).run(editor, &mut stdout)?;
    Ok(())
}
