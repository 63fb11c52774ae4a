//! JSON documents consumed by the demo site: the per-sample manifest and the
//! static method comparison tables. Every score in here is mocked.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::{Region, SampleDescriptor};

/// Site-relative directory the audio links point into
const SITE_AUDIO_DIR: &str = "data/audio";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityMetrics {
	pub fad: f64,
	pub lsd: f64,
	pub mos: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleMetadata {
	pub id: String,
	pub genre: String,
	pub original_audio: String,
	pub adversarial_audio: String,
	pub original_prediction: String,
	pub adversarial_prediction: String,
	pub original_confidence: f64,
	pub adversarial_confidence: f64,
	pub inpainting_regions: Vec<[f64; 2]>,
	pub attack_success: bool,
	pub metrics: QualityMetrics,
}

fn round_to(value: f64, decimals: i32) -> f64 {
	let scale = 10f64.powi(decimals);
	(value * scale).round() / scale
}

/// The mocked attack counts as a success when the reported label moved away
/// from the true genre
pub fn attack_succeeded(genre_label: &str, adversarial_label: &str) -> bool {
	!genre_label.eq_ignore_ascii_case(adversarial_label)
}

impl SampleMetadata {
	pub fn mock<R: Rng>(
		descriptor: &SampleDescriptor,
		adversarial_label: &str,
		regions: &[Region],
		rng: &mut R,
	) -> Self {
		let id = descriptor.id();
		let genre = descriptor.genre_label();
		SampleMetadata {
			original_audio: format!("{SITE_AUDIO_DIR}/{id}_original.wav"),
			adversarial_audio: format!("{SITE_AUDIO_DIR}/{id}_adversarial.wav"),
			original_prediction: genre.clone(),
			adversarial_prediction: adversarial_label.into(),
			original_confidence: round_to(0.75 + rng.gen::<f64>() * 0.20, 2),
			adversarial_confidence: round_to(0.45 + rng.gen::<f64>() * 0.30, 2),
			inpainting_regions: regions.iter().map(|&(start, end)| [start, end]).collect(),
			attack_success: attack_succeeded(&genre, adversarial_label),
			metrics: QualityMetrics {
				fad: round_to(11.0 + rng.gen::<f64>() * 2.0, 2),
				lsd: round_to(1.5 + rng.gen::<f64>() * 0.6, 2),
				mos: round_to(3.5 + rng.gen::<f64>() * 0.8, 1),
			},
			id,
			genre,
		}
	}
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SamplesManifest {
	pub samples: Vec<SampleMetadata>,
}

/// One comparison table. Classification tasks report `map`, genre tasks
/// report `accuracy`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodTable {
	pub methods: Vec<String>,
	pub asr: Vec<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub map: Option<Vec<f64>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub accuracy: Option<Vec<f64>>,
	pub fad: Vec<f64>,
	pub lsd: Vec<f64>,
	pub mos: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsTables {
	pub csi_whitebox: MethodTable,
	pub mgc_whitebox: MethodTable,
	pub csi_blackbox: MethodTable,
	pub mgc_blackbox: MethodTable,
}

fn methods(names: [&str; 3]) -> Vec<String> {
	names.into_iter().map(String::from).collect()
}

impl Default for MetricsTables {
	fn default() -> Self {
		Self {
			csi_whitebox: MethodTable {
				methods: methods(["PGD", "C&W", "MAIA-WB"]),
				asr: vec![82.1, 88.5, 92.8],
				map: Some(vec![0.619, 0.560, 0.488]),
				accuracy: None,
				fad: vec![12.64, 12.11, 11.25],
				lsd: vec![2.10, 1.94, 1.58],
				mos: vec![3.1, 3.4, 4.0],
			},
			mgc_whitebox: MethodTable {
				methods: methods(["PGD", "C&W", "MAIA-WB"]),
				asr: vec![84.6, 89.1, 93.5],
				map: None,
				accuracy: Some(vec![0.551, 0.512, 0.466]),
				fad: vec![15.32, 14.90, 13.85],
				lsd: vec![2.20, 2.21, 1.94],
				mos: vec![3.2, 3.3, 3.8],
			},
			csi_blackbox: MethodTable {
				methods: methods(["NES", "ZOO", "MAIA-BB"]),
				asr: vec![70.2, 74.9, 80.1],
				map: Some(vec![0.682, 0.639, 0.594]),
				accuracy: None,
				fad: vec![13.93, 13.51, 12.56],
				lsd: vec![2.27, 2.12, 1.90],
				mos: vec![2.8, 3.0, 3.6],
			},
			mgc_blackbox: MethodTable {
				methods: methods(["NES", "ZOO", "MAIA-BB"]),
				asr: vec![65.7, 72.4, 77.9],
				map: None,
				accuracy: Some(vec![0.704, 0.654, 0.601]),
				fad: vec![16.26, 15.90, 14.68],
				lsd: vec![2.15, 2.05, 1.85],
				mos: vec![2.5, 3.0, 3.3],
			},
		}
	}
}

pub fn write_json<T: Serialize>(path: &Path, value: &T, pretty: bool) -> Result<()> {
	let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
	let mut writer = BufWriter::new(file);
	if pretty {
		serde_json::to_writer_pretty(&mut writer, value)
	} else {
		serde_json::to_writer(&mut writer, value)
	}
	.with_context(|| format!("Failed to serialize {}", path.display()))?;
	writer
		.flush()
		.with_context(|| format!("Failed to write {}", path.display()))
}
