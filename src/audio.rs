//! Handles conversion between WAV files on disk and mono sample buffers

use std::path::Path;

use anyhow::{Context, Result};
use log::debug;
use rubato::{
	Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};

#[derive(Debug, Clone)]
pub struct Clip {
	pub sample_rate: u32,
	pub samples: Vec<f32>,
}

impl Clip {
	/// Reads a WAV file of any channel count, averaging the channels down to
	/// mono. Samples are scaled to `[-1, 1]`
	pub fn from_wav(path: &Path) -> Result<Clip> {
		let mut reader = hound::WavReader::open(path)
			.with_context(|| format!("Failed to open {}", path.display()))?;
		let spec = reader.spec();
		let interleaved: Vec<f32> = match spec.sample_format {
			hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<Vec<f32>, _>>(),
			hound::SampleFormat::Int => {
				let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
				reader
					.samples::<i32>()
					.map(|sample| sample.map(|x| x as f32 / scale))
					.collect::<Result<Vec<f32>, _>>()
			}
		}
		.with_context(|| format!("Failed to decode {}", path.display()))?;
		let channels = spec.channels.max(1) as usize;
		let samples = if channels == 1 {
			interleaved
		} else {
			interleaved
				.chunks_exact(channels)
				.map(|frame| frame.iter().sum::<f32>() / channels as f32)
				.collect()
		};
		Ok(Clip {
			sample_rate: spec.sample_rate,
			samples,
		})
	}

	/// Writes the clip as mono 16 bit PCM
	pub fn to_wav(&self, path: &Path) -> Result<()> {
		let spec = hound::WavSpec {
			channels: 1,
			sample_rate: self.sample_rate,
			bits_per_sample: 16,
			sample_format: hound::SampleFormat::Int,
		};
		let mut writer = hound::WavWriter::create(path, spec)
			.with_context(|| format!("Failed to create {}", path.display()))?;
		for &sample in &self.samples {
			writer
				.write_sample((sample.clamp(-1., 1.) * i16::MAX as f32).round() as i16)
				.with_context(|| format!("Failed to write {}", path.display()))?;
		}
		writer
			.finalize()
			.with_context(|| format!("Failed to finalize {}", path.display()))
	}

	pub fn duration_secs(&self) -> f64 {
		self.samples.len() as f64 / self.sample_rate as f64
	}

	/// Converts to `target_rate` with band-limited sinc interpolation. The output
	/// always holds `floor(len * target_rate / sample_rate)` samples
	pub fn resample(self, target_rate: u32) -> Result<Clip> {
		if self.sample_rate == target_rate {
			return Ok(self);
		}
		let ratio = target_rate as f64 / self.sample_rate as f64;
		let expected_len =
			(self.samples.len() as u64 * target_rate as u64 / self.sample_rate as u64) as usize;
		if self.samples.is_empty() {
			return Ok(Clip {
				sample_rate: target_rate,
				samples: Vec::new(),
			});
		}

		let params = SincInterpolationParameters {
			sinc_len: 256,
			f_cutoff: 0.95,
			interpolation: SincInterpolationType::Linear,
			oversampling_factor: 256,
			window: WindowFunction::BlackmanHarris2,
		};
		let mut resampler = SincFixedIn::<f32>::new(ratio, 1.0, params, self.samples.len(), 1)
			.context("Failed to create resampler")?;

		let mut output = resampler
			.process(&[self.samples], None)
			.context("Resampling failed")?
			.swap_remove(0);
		// Output is already aligned with the input; flushing only tops up a short final chunk
		while output.len() < expected_len {
			let tail = resampler
				.process_partial::<Vec<f32>>(None, None)
				.context("Resampling failed")?
				.swap_remove(0);
			if tail.is_empty() {
				break;
			}
			output.extend(tail);
		}

		let mut samples: Vec<f32> = output.into_iter().take(expected_len).collect();
		samples.resize(expected_len, 0.);
		debug!("Resampled to {} samples at {}Hz", samples.len(), target_rate);
		Ok(Clip {
			sample_rate: target_rate,
			samples,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn write_stereo(path: &Path, sample_rate: u32, frames: &[(i16, i16)]) {
		let spec = hound::WavSpec {
			channels: 2,
			sample_rate,
			bits_per_sample: 16,
			sample_format: hound::SampleFormat::Int,
		};
		let mut writer = hound::WavWriter::create(path, spec).unwrap();
		for &(left, right) in frames {
			writer.write_sample(left).unwrap();
			writer.write_sample(right).unwrap();
		}
		writer.finalize().unwrap();
	}

	#[test]
	fn stereo_is_averaged_to_mono() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("stereo.wav");
		write_stereo(&path, 22050, &[(16384, 0), (-16384, -16384), (0, 8192)]);

		let clip = Clip::from_wav(&path).unwrap();
		assert_eq!(clip.sample_rate, 22050);
		assert_eq!(clip.samples, vec![0.25, -0.5, 0.125]);
	}

	#[test]
	fn written_clip_reads_back_as_mono_16_bit() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("mono.wav");
		let clip = Clip {
			sample_rate: 16000,
			samples: vec![0., 0.5, -0.5, 2.],
		};
		clip.to_wav(&path).unwrap();

		let reader = hound::WavReader::open(&path).unwrap();
		assert_eq!(reader.spec().channels, 1);
		assert_eq!(reader.spec().bits_per_sample, 16);
		let back = Clip::from_wav(&path).unwrap();
		assert_eq!(back.samples.len(), 4);
		assert!((back.samples[1] - 0.5).abs() < 1e-3);
		// Out of range input is clipped on write
		assert!((back.samples[3] - 1.).abs() < 1e-3);
	}

	#[test]
	fn missing_file_is_an_error() {
		assert!(Clip::from_wav(Path::new("/nonexistent/clip.wav")).is_err());
	}

	#[test]
	fn resampling_matches_expected_length() {
		let clip = Clip {
			sample_rate: 22050,
			samples: (0..22050)
				.map(|i| (i as f32 * 440. * std::f32::consts::TAU / 22050.).sin() * 0.5)
				.collect(),
		};
		let resampled = clip.resample(16000).unwrap();
		assert_eq!(resampled.sample_rate, 16000);
		assert_eq!(resampled.samples.len(), 16000);
		let peak = resampled.samples.iter().fold(0f32, |acc, x| acc.max(x.abs()));
		assert!(peak > 0.4 && peak < 0.6, "peak {peak}");
	}

	#[test]
	fn resampling_keeps_events_in_place() {
		// Narrow pulse at 1.0s must still sit at 1.0s after conversion
		let clip = Clip {
			sample_rate: 22050,
			samples: (0..44100)
				.map(|i| {
					let t = (i as f32 - 22050.) / 22050.;
					(-(t / 0.0005).powi(2)).exp() * 0.8
				})
				.collect(),
		};
		let resampled = clip.resample(16000).unwrap();
		let (peak_index, _) = resampled
			.samples
			.iter()
			.enumerate()
			.fold((0, 0f32), |best, (i, &x)| if x > best.1 { (i, x) } else { best });
		assert!(peak_index.abs_diff(16000) <= 1, "pulse landed at {peak_index}");
	}

	#[test]
	fn matching_rate_is_untouched() {
		let clip = Clip {
			sample_rate: 16000,
			samples: vec![0.1, 0.2],
		};
		let same = clip.clone().resample(16000).unwrap();
		assert_eq!(same.samples, clip.samples);
		assert_eq!(clip.duration_secs(), 2. / 16000.);
	}
}
