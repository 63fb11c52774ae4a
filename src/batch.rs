//! Drives the whole asset generation run, one recording at a time

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::audio::Clip;
use crate::catalog::{self, SampleDescriptor};
use crate::heatmap::{self, Heatmap};
use crate::inpainting;
use crate::manifest::{self, MetricsTables, SampleMetadata, SamplesManifest};

pub const SOURCE_DIR: &str = "IDS-NMR";
pub const OUTPUT_DIR: &str = "docs/data";
pub const SAMPLE_RATE: u32 = 16000;

#[derive(Clone, Debug)]
pub struct BatchConfig {
	pub source_dir: PathBuf,
	/// Receives `samples.json` and `metrics.json`, audio and heatmaps go to
	/// its `audio` subdirectory
	pub output_dir: PathBuf,
	pub sample_rate: u32,
	pub freq_bins: usize,
	/// Fixes every random draw when set
	pub seed: Option<u64>,
}
impl Default for BatchConfig {
	fn default() -> Self {
		Self {
			source_dir: SOURCE_DIR.into(),
			output_dir: OUTPUT_DIR.into(),
			sample_rate: SAMPLE_RATE,
			freq_bins: heatmap::DEFAULT_FREQ_BINS,
			seed: None,
		}
	}
}
impl BatchConfig {
	pub fn audio_dir(&self) -> PathBuf {
		self.output_dir.join("audio")
	}
	pub fn samples_path(&self) -> PathBuf {
		self.output_dir.join("samples.json")
	}
	pub fn metrics_path(&self) -> PathBuf {
		self.output_dir.join("metrics.json")
	}
}

#[derive(Debug)]
pub struct Batch {
	config: BatchConfig,
	rng: StdRng,
	/// Advances once per processed recording and picks its region list
	sample_index: usize,
	records: Vec<SampleMetadata>,
}
impl Batch {
	pub fn new(config: BatchConfig) -> Self {
		let rng = match config.seed {
			Some(seed) => StdRng::seed_from_u64(seed),
			None => StdRng::from_entropy(),
		};
		Self {
			config,
			rng,
			sample_index: 0,
			records: Vec::new(),
		}
	}

	/// Processes every catalog recording, then writes both JSON documents.
	/// Returns the manifest that was written
	pub fn run(mut self) -> Result<SamplesManifest> {
		let audio_dir = self.config.audio_dir();
		std::fs::create_dir_all(&audio_dir)
			.with_context(|| format!("Failed to create {}", audio_dir.display()))?;

		for descriptor in catalog::descriptors() {
			let source = self.config.source_dir.join(descriptor.file_name);
			if !source.exists() {
				warn!("{} not found, skipping", source.display());
				continue;
			}
			self.process(&descriptor, &source, &audio_dir)?;
		}

		let manifest = SamplesManifest {
			samples: self.records,
		};
		let samples_path = self.config.samples_path();
		manifest::write_json(&samples_path, &manifest, true)?;
		info!("Generated {} adversarial samples", manifest.samples.len());
		info!("Audio files saved to {}", audio_dir.display());
		info!("Metadata saved to {}", samples_path.display());

		let metrics_path = self.config.metrics_path();
		manifest::write_json(&metrics_path, &MetricsTables::default(), true)?;
		info!("Metrics saved to {}", metrics_path.display());
		Ok(manifest)
	}

	fn process(&mut self, descriptor: &SampleDescriptor, source: &Path, audio_dir: &Path) -> Result<()> {
		info!("Processing {}", descriptor.file_name);
		let mut clip = Clip::from_wav(source)?;
		if clip.sample_rate != self.config.sample_rate {
			info!(
				"Resampling from {}Hz to {}Hz",
				clip.sample_rate, self.config.sample_rate
			);
			clip = clip
				.resample(self.config.sample_rate)
				.with_context(|| format!("Failed to resample {}", source.display()))?;
		}

		let regions = catalog::regions(self.sample_index)
			.with_context(|| format!("No inpainting regions for sample {}", self.sample_index))?;
		let adversarial = Clip {
			sample_rate: clip.sample_rate,
			samples: inpainting::apply(&clip.samples, regions, clip.sample_rate, &mut self.rng),
		};

		let id = descriptor.id();
		let original_path = audio_dir.join(format!("{id}_original.wav"));
		clip.to_wav(&original_path)?;
		info!("Saved {}", original_path.display());
		let adversarial_path = audio_dir.join(format!("{id}_adversarial.wav"));
		adversarial.to_wav(&adversarial_path)?;
		info!("Saved {}", adversarial_path.display());

		let heatmap = Heatmap::generate(clip.duration_secs(), regions, self.config.freq_bins, &mut self.rng);
		let heatmap_path = audio_dir.join(format!("{id}_importance.json"));
		manifest::write_json(&heatmap_path, &heatmap, false)?;
		info!("Saved {}", heatmap_path.display());

		let adversarial_label = descriptor
			.adversarial_label()
			.with_context(|| format!("No adversarial label for {id}"))?;
		let record = SampleMetadata::mock(descriptor, adversarial_label, regions, &mut self.rng);
		info!(
			"Processed {}: {} -> {} ({})",
			record.id,
			record.genre,
			record.adversarial_prediction,
			if record.attack_success { "SUCCESS" } else { "FAILED" }
		);
		self.records.push(record);
		self.sample_index += 1;
		Ok(())
	}
}
