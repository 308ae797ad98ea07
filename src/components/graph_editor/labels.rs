//! Keyboard encodings for vertex labels and edge weights.

use super::types::Key;

/// Set of vertex labels currently in use, one bit per letter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TakenLetters(u32);

impl TakenLetters {
	fn bit(letter: char) -> Option<u32> {
		letter
			.is_ascii_uppercase()
			.then(|| 1 << (letter as u32 - 'A' as u32))
	}

	/// Whether `letter` is assigned to some vertex.
	pub fn contains(self, letter: char) -> bool {
		Self::bit(letter).is_some_and(|b| self.0 & b != 0)
	}

	/// Mark `letter` as taken. Returns `false` if it already was.
	pub fn take(&mut self, letter: char) -> bool {
		match Self::bit(letter) {
			Some(b) if self.0 & b == 0 => {
				self.0 |= b;
				true
			}
			_ => false,
		}
	}

	/// Make `letter` available again.
	pub fn release(&mut self, letter: char) {
		if let Some(b) = Self::bit(letter) {
			self.0 &= !b;
		}
	}

	/// Number of taken letters.
	pub fn len(self) -> usize {
		self.0.count_ones() as usize
	}

	/// `true` when no letter is taken.
	pub fn is_empty(self) -> bool {
		self.0 == 0
	}
}

/// Apply `key` to an edge weight.
///
/// Digits shift into the weight from the right, Backspace drops the last
/// digit and a single-digit weight becomes absent. Digits that would overflow
/// are ignored.
pub fn encode_weight(weight: Option<u64>, key: &Key) -> Option<u64> {
	match key {
		Key::Char(c) => {
			let Some(digit) = c.to_digit(10) else {
				return weight;
			};
			match weight {
				None if digit == 0 => None,
				None => Some(u64::from(digit)),
				Some(w) => w
					.checked_mul(10)
					.and_then(|w| w.checked_add(u64::from(digit)))
					.or(Some(w)),
			}
		}
		Key::Backspace => weight.and_then(|w| (w >= 10).then_some(w / 10)),
		_ => weight,
	}
}

/// Outcome of a key press on a vertex label.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LabelEdit {
	/// The vertex takes this (uppercase) letter.
	Assign(char),
	/// The vertex's current label is cleared.
	Clear,
	Ignore,
}

/// Decide what `key` does to a vertex currently labelled `label`.
pub fn encode_label(label: Option<char>, key: &Key, taken: TakenLetters) -> LabelEdit {
	match (label, key) {
		(None, Key::Char(c)) if c.is_ascii_alphabetic() => {
			let letter = c.to_ascii_uppercase();
			if taken.contains(letter) {
				LabelEdit::Ignore
			} else {
				LabelEdit::Assign(letter)
			}
		}
		(Some(_), Key::Backspace) => LabelEdit::Clear,
		_ => LabelEdit::Ignore,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn type_keys(keys: &[Key]) -> Option<u64> {
		keys.iter().fold(None, |w, k| encode_weight(w, k))
	}

	#[test]
	fn digits_build_weight_and_backspace_unwinds_it() {
		let w = type_keys(&[Key::Char('4'), Key::Char('2')]);
		assert_eq!(w, Some(42));
		let w = encode_weight(w, &Key::Backspace);
		assert_eq!(w, Some(4));
		assert_eq!(encode_weight(w, &Key::Backspace), None);
	}

	#[test]
	fn backspace_on_absent_weight_is_noop() {
		assert_eq!(encode_weight(None, &Key::Backspace), None);
	}

	#[test]
	fn inner_zero_is_kept() {
		assert_eq!(type_keys(&[Key::Char('1'), Key::Char('0'), Key::Char('0')]), Some(100));
		assert_eq!(encode_weight(Some(100), &Key::Backspace), Some(10));
		assert_eq!(encode_weight(Some(10), &Key::Backspace), Some(1));
	}

	#[test]
	fn leading_zero_leaves_edge_unweighted() {
		assert_eq!(encode_weight(None, &Key::Char('0')), None);
	}

	#[test]
	fn non_digits_are_ignored() {
		assert_eq!(encode_weight(Some(3), &Key::Char('x')), Some(3));
		assert_eq!(encode_weight(Some(3), &Key::Delete), Some(3));
		assert_eq!(encode_weight(Some(3), &Key::Other("Enter".into())), Some(3));
	}

	#[test]
	fn overflowing_digit_is_dropped() {
		let max = Some(u64::MAX / 10 + 1);
		assert_eq!(encode_weight(max, &Key::Char('9')), max);
	}

	#[test]
	fn taken_letters_track_membership() {
		let mut taken = TakenLetters::default();
		assert!(taken.is_empty());
		assert!(taken.take('A'));
		assert!(!taken.take('A'));
		assert!(taken.take('Z'));
		assert!(taken.contains('A') && taken.contains('Z'));
		assert_eq!(taken.len(), 2);
		taken.release('A');
		assert!(!taken.contains('A'));
		assert!(!taken.take('a'));
	}

	#[test]
	fn label_assignment_rules() {
		let mut taken = TakenLetters::default();
		assert_eq!(encode_label(None, &Key::Char('a'), taken), LabelEdit::Assign('A'));
		taken.take('A');
		assert_eq!(encode_label(None, &Key::Char('a'), taken), LabelEdit::Ignore);
		assert_eq!(encode_label(Some('B'), &Key::Char('c'), taken), LabelEdit::Ignore);
		assert_eq!(encode_label(Some('B'), &Key::Backspace, taken), LabelEdit::Clear);
		assert_eq!(encode_label(None, &Key::Backspace, taken), LabelEdit::Ignore);
		assert_eq!(encode_label(None, &Key::Char('1'), taken), LabelEdit::Ignore);
		assert_eq!(encode_label(None, &Key::Char('é'), taken), LabelEdit::Ignore);
	}
}
