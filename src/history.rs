//! Navigation over previously submitted entries.
//!
//! The navigator walks newest-to-oldest while preserving whatever the user
//! had typed: the draft is captured exactly once when navigation begins and
//! restored verbatim when the walk returns below the newest entry.

pub struct History {
	entries: Vec<String>,
	/// `None` when not navigating; `Some(0)` is the newest entry.
	index: Option<usize>,
	draft: String,
}

impl Default for History {
	fn default() -> Self {
		Self::new()
	}
}

impl History {
	pub fn new() -> Self {
		Self {
			entries: Vec::new(),
			index: None,
			draft: String::new(),
		}
	}
	pub fn with_entries(entries: Vec<String>) -> Self {
		Self {
			entries,
			index: None,
			draft: String::new(),
		}
	}

	pub fn entries(&self) -> &[String] {
		&self.entries
	}
	pub fn index(&self) -> Option<usize> {
		self.index
	}
	pub fn is_navigating(&self) -> bool {
		self.index.is_some()
	}

	/// Record an entry, skipping consecutive duplicates.
	pub fn push(&mut self, entry: &str) {
		if !entry.is_empty() && self.entries.last().is_none_or(|last| last != entry) {
			self.entries.push(entry.to_string());
		}
	}

	fn emit(&self, index: usize) -> &str {
		&self.entries[self.entries.len() - 1 - index]
	}

	/// Step to an older entry. The first step captures `current` as the
	/// draft. Returns the text to install, or `None` when there is nothing
	/// to navigate to.
	pub fn navigate_up(&mut self, current: &str) -> Option<&str> {
		if self.entries.is_empty() {
			return None
		}
		match self.index {
			None => {
				self.draft = current.to_string();
				self.index = Some(0);
			}
			Some(i) => {
				self.index = Some((i + 1).min(self.entries.len() - 1));
			}
		}
		self.index.map(|i| self.emit(i))
	}

	/// Step to a newer entry; stepping past the newest restores the draft
	/// and ends navigation.
	pub fn navigate_down(&mut self) -> Option<&str> {
		let i = self.index?;
		if i == 0 {
			self.index = None;
			return Some(&self.draft)
		}
		self.index = Some(i - 1);
		Some(self.emit(i - 1))
	}

	/// Jump straight to an index, clamped into range. `-1` ends navigation
	/// and restores the draft.
	pub fn go_to(&mut self, target: isize, current: &str) -> Option<&str> {
		let top = self.entries.len() as isize - 1;
		let target = target.clamp(-1, top.max(-1));
		if target < 0 {
			return self.index.take().map(|_| self.draft.as_str())
		}
		if self.index.is_none() {
			self.draft = current.to_string();
		}
		let idx = target as usize;
		self.index = Some(idx);
		Some(self.emit(idx))
	}

	/// Trim and record a submission, resetting navigation. Returns the entry
	/// the host should forward to its submit port, or `None` for blank input.
	pub fn submit(&mut self, value: &str) -> Option<String> {
		self.index = None;
		self.draft.clear();
		let trimmed = value.trim();
		if trimmed.is_empty() {
			return None
		}
		self.push(trimmed);
		Some(trimmed.to_string())
	}
}
