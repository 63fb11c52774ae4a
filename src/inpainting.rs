//! Cosmetic "inpainting": subtle noise and amplitude wobble confined to short
//! time windows, crossfaded against the untouched signal at both ends

use std::f32::consts::PI;

use rand::Rng;
use rand_distr::StandardNormal;

use crate::catalog::Region;

const NOISE_LEVEL: f32 = 0.005;
/// Depth of the sinusoidal amplitude envelope
const ENVELOPE_DEPTH: f32 = 0.05;
/// The envelope completes this many radians across a region
const ENVELOPE_SPAN: f32 = 4. * PI;
const FADE_SECS: f64 = 0.01;
/// Peak level the output is scaled down to when it would clip
pub const PEAK_CEILING: f32 = 0.99;

/// `n` evenly spaced points from `start` to `end`, both inclusive
fn linspace(start: f32, end: f32, n: usize) -> impl Iterator<Item = f32> {
	let last = n.saturating_sub(1).max(1) as f32;
	(0..n).map(move |i| start + (end - start) * (i as f32 / last))
}

/// Sample bounds of `region`, clamped to `len`. Empty when the region lies
/// outside the buffer
fn sample_bounds(region: Region, sample_rate: u32, len: usize) -> std::ops::Range<usize> {
	let to_sample = |secs: f64| ((secs * sample_rate as f64).max(0.) as usize).min(len);
	let start = to_sample(region.0);
	let end = to_sample(region.1);
	start..end.max(start)
}

pub fn apply<R: Rng>(audio: &[f32], regions: &[Region], sample_rate: u32, rng: &mut R) -> Vec<f32> {
	let mut modified = audio.to_vec();
	let max_fade = (FADE_SECS * sample_rate as f64) as usize;

	for &region in regions {
		let bounds = sample_bounds(region, sample_rate, audio.len());
		let original = &audio[bounds.clone()];
		let len = original.len();
		if len == 0 {
			continue;
		}

		let mut perturbed: Vec<f32> = original
			.iter()
			.zip(linspace(0., ENVELOPE_SPAN, len))
			.map(|(&sample, phase)| {
				let noise: f32 = rng.sample(StandardNormal);
				(sample + noise * NOISE_LEVEL) * (1. + ENVELOPE_DEPTH * phase.sin())
			})
			.collect();

		let fade_len = max_fade.min(len / 4);
		if fade_len > 0 {
			for (i, weight) in linspace(0., 1., fade_len).enumerate() {
				perturbed[i] = original[i] * (1. - weight) + perturbed[i] * weight;
			}
			let tail = len - fade_len;
			for (i, weight) in linspace(1., 0., fade_len).enumerate() {
				let j = tail + i;
				perturbed[j] = original[j] * (1. - weight) + perturbed[j] * weight;
			}
		}

		modified[bounds].copy_from_slice(&perturbed);
	}

	let peak = modified.iter().fold(0f32, |acc, x| acc.max(x.abs()));
	if peak > PEAK_CEILING {
		let gain = PEAK_CEILING / peak;
		modified
			.iter_mut()
			.for_each(|x| *x = (*x * gain).clamp(-PEAK_CEILING, PEAK_CEILING));
	}
	modified
}
