//! The fixed set of source recordings and the canned attack outcomes paired
//! with them

/// Region in seconds, `(start, end)`
pub type Region = (f64, f64);

/// Source files, grouped by genre, two recordings per genre
pub const SAMPLES: [(&str, [&str; 2]); 4] = [
	("blues", ["blues.00000.wav", "blues.00001.wav"]),
	("classical", ["classical.00000.wav", "classical.00001.wav"]),
	("country", ["country.00000.wav", "country.00001.wav"]),
	("pop", ["pop.00000.wav", "pop.00001.wav"]),
];

/// Label the mocked classifier reports for the perturbed recording, indexed by
/// the file position within its genre
const ADVERSARIAL_LABELS: [(&str, [&str; 2]); 4] = [
	("blues", ["Jazz", "Rock"]),
	("classical", ["Ambient", "Classical"]),
	("country", ["Folk", "Pop"]),
	("pop", ["Dance", "Pop"]),
];

/// Inpainting windows, consumed in order as recordings are processed
pub const INPAINTING_REGIONS: [&[Region]; 8] = [
	&[(5.0, 5.4), (12.0, 12.3), (18.0, 18.5)],
	&[(6.5, 6.9), (14.0, 14.4)],
	&[(4.0, 4.5), (10.0, 10.3), (20.0, 20.4)],
	&[(7.0, 7.3), (15.0, 15.5)],
	&[(5.5, 5.9), (13.0, 13.4), (22.0, 22.3)],
	&[(8.0, 8.4), (16.0, 16.5)],
	&[(3.0, 3.5), (11.0, 11.3), (19.0, 19.5)],
	&[(6.0, 6.4), (14.5, 14.9)],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleDescriptor {
	pub genre: &'static str,
	pub file_name: &'static str,
	/// Position of the file within its genre
	pub file_index: usize,
}

impl SampleDescriptor {
	pub fn id(&self) -> String {
		format!("{}_{:02}", self.genre, self.file_index)
	}

	/// Genre with its first letter capitalized, as shown on the site
	pub fn genre_label(&self) -> String {
		capitalize(self.genre)
	}

	pub fn adversarial_label(&self) -> Option<&'static str> {
		ADVERSARIAL_LABELS
			.iter()
			.find(|(genre, _)| *genre == self.genre)
			.and_then(|(_, labels)| labels.get(self.file_index).copied())
	}
}

/// Every recording in processing order
pub fn descriptors() -> impl Iterator<Item = SampleDescriptor> {
	SAMPLES.iter().flat_map(|&(genre, files)| {
		files
			.into_iter()
			.enumerate()
			.map(move |(file_index, file_name)| SampleDescriptor {
				genre,
				file_name,
				file_index,
			})
	})
}

pub fn regions(sample_index: usize) -> Option<&'static [Region]> {
	INPAINTING_REGIONS.get(sample_index).copied()
}

fn capitalize(word: &str) -> String {
	let mut chars = word.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
		None => String::new(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn eight_recordings_in_genre_order() {
		let ids: Vec<_> = descriptors().map(|d| d.id()).collect();
		assert_eq!(
			ids,
			[
				"blues_00",
				"blues_01",
				"classical_00",
				"classical_01",
				"country_00",
				"country_01",
				"pop_00",
				"pop_01"
			]
		);
		assert_eq!(ids.len(), INPAINTING_REGIONS.len());
	}

	#[test]
	fn labels_follow_file_position() {
		let labels: Vec<_> = descriptors()
			.map(|d| d.adversarial_label().unwrap())
			.collect();
		assert_eq!(
			labels,
			["Jazz", "Rock", "Ambient", "Classical", "Folk", "Pop", "Dance", "Pop"]
		);
	}

	#[test]
	fn genre_label_is_capitalized() {
		let descriptor = descriptors().nth(2).unwrap();
		assert_eq!(descriptor.genre_label(), "Classical");
		assert_eq!(capitalize(""), "");
	}

	#[test]
	fn regions_past_the_table_are_absent() {
		assert_eq!(regions(0).unwrap().len(), 3);
		assert_eq!(regions(7).unwrap(), &[(6.0, 6.4), (14.5, 14.9)]);
		assert!(regions(8).is_none());
	}
}
