use std::path::PathBuf;

use clap::Parser;
use kdam::tqdm;
use vloc::{
    cursor::DatasetCursor,
    io::map::{descriptor_length, Keyframe, KeyframeMap},
    matching::{descriptor, DEFAULT_DESCRIPTOR_SIZE},
};

#[derive(Parser)]
#[clap(about = "Builds a keyframe map from an Oxford style recording")]
struct Args {
    /// Path to the recording directory
    dataset: PathBuf,
    /// Directory with the camera model files
    model_dir: PathBuf,
    /// Output map file
    output: PathBuf,
    /// Keeps one keyframe every `step` frames
    #[clap(long, default_value = "1")]
    step: usize,
    /// Zoom applied to the frames before computing descriptors
    #[clap(long, default_value = "1.0")]
    zoom: f64,
    /// Descriptor width
    #[clap(long, default_value_t = DEFAULT_DESCRIPTOR_SIZE.0)]
    width: u32,
    /// Descriptor height
    #[clap(long, default_value_t = DEFAULT_DESCRIPTOR_SIZE.1)]
    height: u32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();
    if args.step == 0 {
        return Err("step must be positive".into());
    }

    let mut cursor = DatasetCursor::open(&args.dataset, &args.model_dir)?;
    cursor.set_zoom(args.zoom)?;
    let size = (args.width, args.height);
    descriptor_length(size)?;

    let mut keyframes = Vec::new();
    for index in tqdm!(
        (0..cursor.size()).step_by(args.step),
        total = (cursor.size() + args.step - 1) / args.step,
        desc = "Building keyframes"
    ) {
        let frame = cursor.frame_at(index)?;
        let gray = image::imageops::grayscale(&frame.image()?);
        keyframes.push(Keyframe::new(frame.timestamp, &frame.pose, descriptor(&gray, size)));
    }

    let map = KeyframeMap::new(size, keyframes)?;
    map.save(&args.output)?;
    let (width, height) = map.descriptor_size();
    log::info!(
        "Saved {} keyframes with {width}x{height} descriptors to {}",
        map.len(),
        args.output.display()
    );
    Ok(())
}
