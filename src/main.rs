use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::info;

mod audio;
mod batch;
mod catalog;
mod heatmap;
mod inpainting;
mod manifest;

/// Generates the mocked adversarial audio assets for the demo site. Run without
/// arguments, it reproduces the fixed batch over the built-in paths
#[derive(Parser, Debug)]
#[command(name = "maia-demo-gen")]
struct Args {
	/// Directory holding the source recordings
	#[arg(long, default_value = batch::SOURCE_DIR)]
	source_dir: PathBuf,

	/// Site data directory; audio lands in its `audio` subdirectory
	#[arg(long, default_value = batch::OUTPUT_DIR)]
	output_dir: PathBuf,

	/// Fix the random seed for reproducible output
	#[arg(long)]
	seed: Option<u64>,
}

fn main() -> Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
	let args = Args::parse();
	let start = std::time::Instant::now();

	let config = batch::BatchConfig {
		source_dir: args.source_dir,
		output_dir: args.output_dir,
		seed: args.seed,
		..Default::default()
	};
	batch::Batch::new(config).run()?;

	info!("Generation took {:?}", start.elapsed());
	Ok(())
}
