//! Fabricated frequency x time "importance" maps for the site's saliency view

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::Region;

pub const FRAMES_PER_SEC: f64 = 10.;
pub const DEFAULT_FREQ_BINS: usize = 128;
/// Ceiling of the background noise
const BASELINE_LEVEL: f32 = 0.2;
/// Half width, in bins, of the bump laid over each region
const PEAK_WIDTH: usize = 30;
/// Keeps bump centres away from the lowest and highest bins
const PEAK_MARGIN: usize = 20;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Heatmap {
	/// `[freq_bins, time_frames]`
	pub shape: [usize; 2],
	/// Indexed `[freq][frame]`
	pub data: Vec<Vec<f32>>,
	/// Seconds per frame
	pub time_resolution: f64,
	pub freq_bins: usize,
}

impl Heatmap {
	pub fn generate<R: Rng>(duration_secs: f64, regions: &[Region], freq_bins: usize, rng: &mut R) -> Self {
		let frames = (duration_secs * FRAMES_PER_SEC).max(0.) as usize;
		let mut data: Vec<Vec<f32>> = (0..freq_bins)
			.map(|_| (0..frames).map(|_| rng.gen::<f32>() * BASELINE_LEVEL).collect())
			.collect();

		for &(start, end) in regions {
			let start_frame = (start * FRAMES_PER_SEC).max(0.) as usize;
			let end_frame = ((end * FRAMES_PER_SEC).max(0.) as usize).min(frames);
			let peak_hi = freq_bins.saturating_sub(PEAK_MARGIN).max(PEAK_MARGIN + 1);
			let peak = rng.gen_range(PEAK_MARGIN..peak_hi);

			for (freq, row) in data
				.iter_mut()
				.enumerate()
				.take((peak + PEAK_WIDTH).min(freq_bins))
				.skip(peak.saturating_sub(PEAK_WIDTH))
			{
				let distance = peak.abs_diff(freq) as f32 / PEAK_WIDTH as f32;
				let level = 0.7 + 0.3 * (1. - distance);
				for cell in row.iter_mut().take(end_frame).skip(start_frame) {
					*cell = cell.max(level);
				}
			}
		}

		Heatmap {
			shape: [freq_bins, frames],
			data,
			time_resolution: FRAMES_PER_SEC.recip(),
			freq_bins,
		}
	}
}
