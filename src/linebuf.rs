//! This module contains the core editor state and the reducer that mutates it.
//!
//! `LineBuf` is responsible for any and all mutations of the buffer. The
//! controller in `vimode` never edits text itself; it hands `MotionCmd`s and
//! `VerbCmd`s to the methods here.

use itertools::Itertools;
use log::trace;

use crate::chars::{self, CharClass};
use crate::vicmd::{Anchor, Dest, Direction, Motion, MotionCmd, MoveDir, SelectKind, To, Verb, VerbCmd};

/// Undo depth. Overflow discards the oldest snapshot.
const UNDO_MAX: usize = 100;

/// Everything a mutation must be able to roll back.
///
/// A popped snapshot is installed wholesale, so the stack holds the complete
/// state minus itself.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
	lines: Vec<String>,
	cursor_row: usize,
	cursor_col: usize,
	preferred_col: Option<usize>,
	clipboard: String,
	last_search: Option<(String, Direction)>,
}

/// A line-structured text buffer with a code-point cursor.
///
/// Invariants, maintained by every method here:
/// * `lines` is never empty; a cleared buffer is `[""]`.
/// * `cursor_row < lines.len()` and `cursor_col <= len(lines[cursor_row])`.
#[derive(Clone, Debug, PartialEq)]
pub struct LineBuf {
	lines: Vec<String>,
	cursor_row: usize,
	cursor_col: usize,
	preferred_col: Option<usize>,
	selection_anchor: Option<(usize, usize)>,
	clipboard: String,
	last_search: Option<(String, Direction)>,
	undo_stack: Vec<Snapshot>,
}

impl Default for LineBuf {
	fn default() -> Self {
		Self::new()
	}
}

impl LineBuf {
	pub fn new() -> Self {
		Self {
			lines: vec![String::new()],
			cursor_row: 0,
			cursor_col: 0,
			preferred_col: None,
			selection_anchor: None,
			clipboard: String::new(),
			last_search: None,
			undo_stack: Vec::new(),
		}
	}
	/// Set the initial state of the buffer. The cursor lands at the end.
	pub fn with_initial(mut self, text: &str) -> Self {
		self.set_text(text);
		self
	}

	pub fn lines(&self) -> &[String] {
		&self.lines
	}
	pub fn cursor(&self) -> (usize, usize) {
		(self.cursor_row, self.cursor_col)
	}
	pub fn selection_anchor(&self) -> Option<(usize, usize)> {
		self.selection_anchor
	}
	pub fn preferred_col(&self) -> Option<usize> {
		self.preferred_col
	}
	pub fn clipboard(&self) -> &str {
		&self.clipboard
	}
	pub fn last_search(&self) -> Option<&(String, Direction)> {
		self.last_search.as_ref()
	}
	pub fn undo_depth(&self) -> usize {
		self.undo_stack.len()
	}

	/// The whole buffer as one string.
	pub fn text(&self) -> String {
		self.lines.iter().join("\n")
	}
	pub fn is_blank(&self) -> bool {
		self.lines.len() == 1 && self.lines[0].is_empty()
	}
	/// Replace the whole buffer, dropping undo history. The cursor moves to
	/// the end of the new text.
	pub fn set_text(&mut self, text: &str) {
		self.lines = text.split('\n').map(String::from).collect();
		if self.lines.is_empty() {
			self.lines.push(String::new());
		}
		self.cursor_row = self.lines.len() - 1;
		self.cursor_col = chars::len(&self.lines[self.cursor_row]);
		self.preferred_col = None;
		self.selection_anchor = None;
		self.undo_stack.clear();
	}
	/// Reset to the single-empty-line state. The clipboard and search memory
	/// outlive prompt entries.
	pub fn clear(&mut self) {
		self.lines = vec![String::new()];
		self.cursor_row = 0;
		self.cursor_col = 0;
		self.preferred_col = None;
		self.selection_anchor = None;
		self.undo_stack.clear();
	}

	fn line(&self) -> &str {
		&self.lines[self.cursor_row]
	}
	fn line_len(&self) -> usize {
		chars::len(self.line())
	}
	fn line_len_at(&self, row: usize) -> usize {
		chars::len(&self.lines[row])
	}
	fn last_row(&self) -> usize {
		self.lines.len() - 1
	}
	/// The rightmost column the cursor may rest on outside insert mode.
	fn normal_max_col(&self, row: usize) -> usize {
		self.line_len_at(row).saturating_sub(1)
	}

	/// Clamp and install a cursor position directly. Hosts use this for
	/// things like mouse placement.
	pub fn set_cursor(&mut self, row: usize, col: usize) {
		self.cursor_row = row.min(self.last_row());
		self.cursor_col = col.min(self.line_len_at(self.cursor_row));
		self.preferred_col = None;
	}
	/// Load the register from outside, e.g. from an OS clipboard bridge.
	/// A trailing newline makes the content linewise.
	pub fn set_clipboard(&mut self, text: &str) {
		self.clipboard = text.to_string();
	}

	/// `a`: step past the cursor character, allowing the one-past-the-end
	/// column that only insert mode may occupy.
	pub fn shift_cursor_append(&mut self) {
		self.cursor_col = (self.cursor_col + 1).min(self.line_len());
		self.preferred_col = None;
	}
	/// `A`: jump to the one-past-the-end column of the current line.
	pub fn seek_eol_append(&mut self) {
		self.cursor_col = self.line_len();
		self.preferred_col = None;
	}

	pub fn start_selection(&mut self) {
		self.selection_anchor = Some((self.cursor_row, self.cursor_col));
	}
	pub fn clear_selection(&mut self) {
		self.selection_anchor = None;
	}
	/// Anchor and cursor as an ordered inclusive pair.
	fn selection_bounds(&self) -> Option<((usize, usize), (usize, usize))> {
		let anchor = self.selection_anchor?;
		let cursor = (self.cursor_row, self.cursor_col);
		if anchor <= cursor {
			Some((anchor, cursor))
		} else {
			Some((cursor, anchor))
		}
	}

	// ----- primitives ---------------------------------------------------

	fn snapshot(&self) -> Snapshot {
		Snapshot {
			lines: self.lines.clone(),
			cursor_row: self.cursor_row,
			cursor_col: self.cursor_col,
			preferred_col: self.preferred_col,
			clipboard: self.clipboard.clone(),
			last_search: self.last_search.clone(),
		}
	}
	/// Record the pre-image of a mutation.
	pub fn push_undo(&mut self) {
		if self.undo_stack.len() == UNDO_MAX {
			self.undo_stack.remove(0);
		}
		let snap = self.snapshot();
		self.undo_stack.push(snap);
	}
	/// Pop the latest snapshot and install it wholesale.
	pub fn undo(&mut self) -> bool {
		let Some(snap) = self.undo_stack.pop() else {
			return false
		};
		self.lines = snap.lines;
		self.cursor_row = snap.cursor_row;
		self.cursor_col = snap.cursor_col;
		self.preferred_col = snap.preferred_col;
		self.clipboard = snap.clipboard;
		self.last_search = snap.last_search;
		true
	}

	/// The workhorse behind every text mutation.
	///
	/// Splices `text` (which may contain `\n`) over the code-point range
	/// `[start_col, end_col)` spanning `start_row..=end_row`, leaves the
	/// cursor at the end of the inserted text and clears the sticky column.
	pub fn replace_range(
		&mut self,
		start_row: usize,
		start_col: usize,
		end_row: usize,
		end_col: usize,
		text: &str,
	) {
		let start_row = start_row.min(self.last_row());
		let end_row = end_row.min(self.last_row());
		let before = chars::slice(&self.lines[start_row], 0, start_col);
		let tail = &self.lines[end_row];
		let after = chars::slice(tail, end_col, chars::len(tail));

		let mut spliced = String::with_capacity(before.len() + text.len() + after.len());
		spliced.push_str(&before);
		spliced.push_str(text);
		spliced.push_str(&after);
		let replacement = spliced.split('\n').map(String::from).collect::<Vec<_>>();

		let inserted_rows = text.matches('\n').count();
		let new_row = start_row + inserted_rows;
		let new_col = if inserted_rows == 0 {
			chars::len(&before) + chars::len(text)
		} else {
			text.rsplit('\n').next().map(chars::len).unwrap_or(0)
		};

		self.lines.splice(start_row..=end_row, replacement);
		self.cursor_row = new_row.min(self.last_row());
		self.cursor_col = new_col.min(self.line_len_at(self.cursor_row));
		self.preferred_col = None;
	}

	/// The text within `[start_col, end_col)` spanning the given rows.
	fn range_text(&self, start_row: usize, start_col: usize, end_row: usize, end_col: usize) -> String {
		if start_row == end_row {
			return chars::slice(&self.lines[start_row], start_col, end_col)
		}
		let mut out = chars::slice(&self.lines[start_row], start_col, self.line_len_at(start_row));
		for row in start_row + 1..end_row {
			out.push('\n');
			out.push_str(&self.lines[row]);
		}
		out.push('\n');
		out.push_str(&chars::slice(&self.lines[end_row], 0, end_col));
		out
	}

	// ----- position scanning --------------------------------------------

	/// One position forward. Column `len` is the virtual newline slot; past
	/// it the scan moves to the next row.
	fn step_fwd(&self, row: usize, col: usize) -> Option<(usize, usize)> {
		if col < self.line_len_at(row) {
			Some((row, col + 1))
		} else if row < self.last_row() {
			Some((row + 1, 0))
		} else {
			None
		}
	}
	fn step_back(&self, row: usize, col: usize) -> Option<(usize, usize)> {
		if col > 0 {
			Some((row, col - 1))
		} else if row > 0 {
			Some((row - 1, self.line_len_at(row - 1)))
		} else {
			None
		}
	}
	/// Class of the character at a position. Line ends read as whitespace.
	fn class_at(&self, row: usize, col: usize) -> CharClass {
		chars::at(&self.lines[row], col)
			.map(CharClass::from)
			.unwrap_or(CharClass::Whitespace)
	}

	/// Target of the `w` motion: start of the next word or symbol run.
	fn next_word_start(&self, row: usize, col: usize) -> (usize, usize) {
		let (mut r, mut c) = (row, col);
		let start = self.class_at(r, c);
		if start != CharClass::Whitespace {
			while self.class_at(r, c) == start {
				match self.step_fwd(r, c) {
					Some(next) => (r, c) = next,
					None => return (r, c),
				}
			}
		}
		while self.class_at(r, c) == CharClass::Whitespace {
			match self.step_fwd(r, c) {
				Some(next) => (r, c) = next,
				None => break,
			}
		}
		(r, c)
	}
	/// Target of the `b` motion: start of the current or previous run.
	fn prev_word_start(&self, row: usize, col: usize) -> (usize, usize) {
		let Some((mut r, mut c)) = self.step_back(row, col) else {
			return (row, col)
		};
		while self.class_at(r, c) == CharClass::Whitespace {
			match self.step_back(r, c) {
				Some(next) => (r, c) = next,
				None => return (r, c),
			}
		}
		let class = self.class_at(r, c);
		while let Some((r2, c2)) = self.step_back(r, c) {
			if self.class_at(r2, c2) == class {
				(r, c) = (r2, c2);
			} else {
				break
			}
		}
		(r, c)
	}
	/// Target of the `e` motion: last character of the current or next run.
	fn word_end(&self, row: usize, col: usize) -> (usize, usize) {
		let Some((mut r, mut c)) = self.step_fwd(row, col) else {
			return (row, col)
		};
		while self.class_at(r, c) == CharClass::Whitespace {
			match self.step_fwd(r, c) {
				Some(next) => (r, c) = next,
				None => return (row, col),
			}
		}
		let class = self.class_at(r, c);
		while let Some((r2, c2)) = self.step_fwd(r, c) {
			if self.class_at(r2, c2) == class {
				(r, c) = (r2, c2);
			} else {
				break
			}
		}
		(r, c)
	}
	fn word_scan(&self, to: To, dir: Direction, count: usize) -> (usize, usize) {
		let (mut r, mut c) = (self.cursor_row, self.cursor_col);
		for _ in 0..count.max(1) {
			(r, c) = match (to, dir) {
				(To::Start, Direction::Forward) => self.next_word_start(r, c),
				(To::Start, Direction::Backward) => self.prev_word_start(r, c),
				(To::End, Direction::Forward) => self.word_end(r, c),
				// Not produced by the controller; read as `b`
				(To::End, Direction::Backward) => self.prev_word_start(r, c),
			};
		}
		(r, c)
	}

	/// The inner-word range on the current line: the maximal run of
	/// same-class characters (word vs non-word) containing the cursor,
	/// inclusive on both ends.
	pub fn inner_word_range(&self) -> Option<(usize, usize)> {
		let line = self.line();
		let len = chars::len(line);
		if len == 0 || self.cursor_col >= len {
			return None
		}
		let word = chars::is_word_char_strict(chars::at(line, self.cursor_col)?);
		let same = |col: usize| chars::at(line, col).is_some_and(|c| chars::is_word_char_strict(c) == word);
		let mut start = self.cursor_col;
		while start > 0 && same(start - 1) {
			start -= 1;
		}
		let mut end = self.cursor_col;
		while end + 1 < len && same(end + 1) {
			end += 1;
		}
		Some((start, end))
	}

	// ----- search -------------------------------------------------------

	/// Columns (code points) where `query` begins within `line`.
	fn match_cols(line: &str, query: &str) -> Vec<usize> {
		line.match_indices(query)
			.map(|(byte, _)| line[..byte].chars().count())
			.collect()
	}

	/// Substring search from the cursor, wrapping at the buffer edges.
	fn search_from(&self, query: &str, dir: Direction) -> Option<(usize, usize)> {
		if query.is_empty() {
			return None
		}
		let rows = self.lines.len();
		match dir {
			Direction::Forward => {
				if let Some(col) = Self::match_cols(self.line(), query)
					.into_iter()
					.find(|&c| c > self.cursor_col)
				{
					return Some((self.cursor_row, col))
				}
				for row in (self.cursor_row + 1..rows).chain(0..=self.cursor_row) {
					if let Some(col) = Self::match_cols(&self.lines[row], query).first().copied() {
						return Some((row, col))
					}
				}
				None
			}
			Direction::Backward => {
				if let Some(col) = Self::match_cols(self.line(), query)
					.into_iter()
					.rev()
					.find(|&c| c < self.cursor_col)
				{
					return Some((self.cursor_row, col))
				}
				let before = (0..self.cursor_row).rev();
				let wrapped = (self.cursor_row..rows).rev();
				for row in before.chain(wrapped) {
					if let Some(col) = Self::match_cols(&self.lines[row], query).last().copied() {
						return Some((row, col))
					}
				}
				None
			}
		}
	}

	// ----- motions ------------------------------------------------------

	fn motion_left(&mut self) {
		if self.cursor_col > 0 {
			self.cursor_col -= 1;
		} else if self.cursor_row > 0 {
			self.cursor_row -= 1;
			self.cursor_col = self.normal_max_col(self.cursor_row);
		}
	}
	fn motion_right(&mut self) {
		let len = self.line_len();
		if len == 0 || self.cursor_col + 1 >= len {
			if self.cursor_row < self.last_row() {
				self.cursor_row += 1;
				self.cursor_col = 0;
			}
			return
		}
		self.cursor_col += 1;
		// Never rest on a combining mark
		while self.cursor_col < len
			&& chars::at(self.line(), self.cursor_col).is_some_and(chars::is_combining_mark)
		{
			self.cursor_col += 1;
		}
		if self.cursor_col >= len {
			if self.cursor_row < self.last_row() {
				self.cursor_row += 1;
				self.cursor_col = 0;
			} else {
				self.cursor_col = len - 1;
			}
		}
	}
	fn motion_vertical(&mut self, dir: Direction, count: usize) {
		let want = self.preferred_col.unwrap_or(self.cursor_col);
		self.preferred_col = Some(want);
		self.cursor_row = match dir {
			Direction::Backward => self.cursor_row.saturating_sub(count),
			Direction::Forward => (self.cursor_row + count).min(self.last_row()),
		};
		self.cursor_col = want.min(self.normal_max_col(self.cursor_row));
	}
	fn motion_char_search(&mut self, dir: Direction, dest: Dest, ch: char, count: usize) {
		let line = self.line();
		let len = self.line_len();
		let target = match dir {
			Direction::Forward => (self.cursor_col + 1..len)
				.filter(|&c| chars::at(line, c) == Some(ch))
				.nth(count.max(1) - 1),
			Direction::Backward => (0..self.cursor_col)
				.rev()
				.filter(|&c| chars::at(line, c) == Some(ch))
				.nth(count.max(1) - 1),
		};
		let Some(target) = target else { return };
		self.cursor_col = match (dest, dir) {
			(Dest::On, _) => target,
			(Dest::Before, Direction::Forward) => target.saturating_sub(1),
			(Dest::Before, Direction::Backward) => (target + 1).min(self.normal_max_col(self.cursor_row)),
		};
	}
	/// `%`: scan the current line from the cursor for a bracket, then walk
	/// to its partner with a depth counter, crossing lines as needed.
	fn motion_delim_match(&mut self) {
		const OPEN: &str = "([{<";
		const CLOSE: &str = ")]}>";
		let line = self.line();
		let len = self.line_len();
		let Some((col, ch)) = (self.cursor_col..len)
			.filter_map(|c| chars::at(line, c).map(|ch| (c, ch)))
			.find(|(_, ch)| OPEN.contains(*ch) || CLOSE.contains(*ch))
		else {
			return
		};
		let (partner, forward) = if let Some(i) = OPEN.find(ch) {
			(CLOSE.chars().nth(i), true)
		} else {
			(CLOSE.find(ch).and_then(|i| OPEN.chars().nth(i)), false)
		};
		let Some(partner) = partner else { return };

		let (mut r, mut c) = (self.cursor_row, col);
		let mut depth = 0usize;
		loop {
			let next = if forward { self.step_fwd(r, c) } else { self.step_back(r, c) };
			let Some((r2, c2)) = next else { return };
			(r, c) = (r2, c2);
			match chars::at(&self.lines[r], c) {
				Some(x) if x == ch => depth += 1,
				Some(x) if x == partner => {
					if depth == 0 {
						self.cursor_row = r;
						self.cursor_col = c;
						return
					}
					depth -= 1;
				}
				_ => {}
			}
		}
	}

	/// Execute a motion. Returns true if the cursor moved.
	///
	/// Motions never push undo and never touch the text or the clipboard.
	pub fn exec_motion(&mut self, cmd: &MotionCmd) -> bool {
		let MotionCmd(count, motion) = cmd;
		let count = (*count).max(1);
		let before = (self.cursor_row, self.cursor_col);
		let vertical = matches!(motion, Motion::LineUp | Motion::LineDown);

		match motion {
			Motion::BackwardChar => {
				for _ in 0..count {
					self.motion_left();
				}
			}
			Motion::ForwardChar => {
				for _ in 0..count {
					self.motion_right();
				}
			}
			Motion::BackwardCharInLine => {
				self.cursor_col = self.cursor_col.saturating_sub(count);
			}
			Motion::LineUp => self.motion_vertical(Direction::Backward, count),
			Motion::LineDown => self.motion_vertical(Direction::Forward, count),
			Motion::WordMotion(to, dir) => {
				let (row, col) = self.word_scan(*to, *dir, count);
				self.cursor_row = row;
				self.cursor_col = col.min(self.normal_max_col(row));
			}
			Motion::BeginningOfLine => self.cursor_col = 0,
			Motion::EndOfLine => self.cursor_col = self.normal_max_col(self.cursor_row),
			Motion::FirstNonBlank => {
				self.cursor_col = self
					.line()
					.chars()
					.position(|c| !c.is_whitespace())
					.unwrap_or(0);
			}
			Motion::BeginningOfBuffer => {
				self.cursor_row = 0;
				self.cursor_col = 0;
			}
			Motion::EndOfBuffer => {
				self.cursor_row = self.last_row();
				self.cursor_col = 0;
			}
			Motion::ToLine => {
				self.cursor_row = count.saturating_sub(1).min(self.last_row());
				self.cursor_col = 0;
			}
			Motion::ToDelimMatch => self.motion_delim_match(),
			Motion::CharSearch(dir, dest, ch) => self.motion_char_search(*dir, *dest, *ch, count),
			Motion::PatternSearch(query, dir) => {
				if !query.is_empty() {
					self.last_search = Some((query.clone(), *dir));
					if let Some((row, col)) = self.search_from(query, *dir) {
						self.cursor_row = row;
						self.cursor_col = col;
					}
				}
			}
			Motion::NextMatch | Motion::PrevMatch => {
				let Some((query, stored)) = self.last_search.clone() else {
					return false
				};
				let dir = match motion {
					Motion::NextMatch => stored,
					_ => stored.flipped(),
				};
				for _ in 0..count {
					let Some((row, col)) = self.search_from(&query, dir) else {
						break
					};
					self.cursor_row = row;
					self.cursor_col = col;
				}
			}
		}

		if !vertical {
			self.preferred_col = None;
		}
		(self.cursor_row, self.cursor_col) != before
	}

	// ----- verbs --------------------------------------------------------

	/// Execute a verb. Returns true if the text changed.
	///
	/// Every text-changing path pushes exactly one undo snapshot first,
	/// except the insert-session primitives (`InsertChar`, `Insert`,
	/// `DeleteBack`), which are covered by the snapshot taken when insert
	/// mode was entered, and `Undo` itself.
	pub fn exec_verb(&mut self, cmd: &VerbCmd) -> bool {
		let VerbCmd(count, verb) = cmd;
		let count = (*count).max(1);
		match verb {
			Verb::InsertChar(ch) => {
				let mut buf = [0u8; 4];
				let text = ch.encode_utf8(&mut buf);
				self.replace_range(self.cursor_row, self.cursor_col, self.cursor_row, self.cursor_col, text);
				true
			}
			Verb::Insert(text) => {
				if text.is_empty() {
					return false
				}
				self.replace_range(self.cursor_row, self.cursor_col, self.cursor_row, self.cursor_col, text);
				true
			}
			Verb::DeleteBack => self.delete_back(),
			Verb::DeleteChar => self.delete_chars_forward(count, false),
			Verb::DeleteCharBefore => self.delete_chars_backward(count),
			Verb::DeleteWord(dir) => self.delete_word(*dir, count, false),
			Verb::DeleteWordEnd => self.delete_word_end(count, false),
			Verb::ChangeWord(Direction::Forward) => self.delete_word_end(count, true),
			Verb::ChangeWord(Direction::Backward) => self.delete_word(Direction::Backward, count, true),
			Verb::ChangeWordEnd => self.delete_word_end(count, true),
			Verb::DeleteLine => self.delete_lines(count),
			Verb::ChangeLine => self.change_lines(count),
			Verb::DeleteToEnd | Verb::ChangeToEnd => {
				let len = self.line_len();
				if self.cursor_col >= len {
					return false
				}
				self.push_undo();
				self.yank_range_text(self.cursor_row, self.cursor_col, self.cursor_row, len, false);
				self.replace_range(self.cursor_row, self.cursor_col, self.cursor_row, len, "");
				if matches!(verb, Verb::DeleteToEnd) {
					self.cursor_col = self.normal_max_col(self.cursor_row);
				}
				true
			}
			Verb::DeleteToLineStart => {
				if self.cursor_col == 0 {
					return false
				}
				self.push_undo();
				self.replace_range(self.cursor_row, 0, self.cursor_row, self.cursor_col, "");
				true
			}
			Verb::DeleteMove(dir) => self.delete_move(*dir, count, false),
			Verb::ChangeMove(dir) => self.delete_move(*dir, count, true),
			Verb::DeleteInnerWord | Verb::ChangeInnerWord => {
				let Some((start, end)) = self.inner_word_range() else {
					return false
				};
				self.push_undo();
				self.yank_range_text(self.cursor_row, start, self.cursor_row, end + 1, false);
				self.replace_range(self.cursor_row, start, self.cursor_row, end + 1, "");
				if matches!(verb, Verb::DeleteInnerWord) {
					self.cursor_col = self.cursor_col.min(self.normal_max_col(self.cursor_row));
				}
				true
			}
			Verb::YankInnerWord => {
				let Some((start, end)) = self.inner_word_range() else {
					return false
				};
				self.yank_range_text(self.cursor_row, start, self.cursor_row, end + 1, false);
				false
			}
			Verb::DeleteSelection(kind) | Verb::ChangeSelection(kind) => {
				let change = matches!(verb, Verb::ChangeSelection(_));
				self.delete_selection(*kind, change)
			}
			Verb::YankSelection(kind) => {
				self.yank_selection(*kind);
				false
			}
			Verb::YankLine => {
				let end = (self.cursor_row + count).min(self.lines.len());
				let mut text = self.lines[self.cursor_row..end].join("\n");
				text.push('\n');
				self.clipboard = text;
				false
			}
			Verb::ToggleCase => self.toggle_case(count),
			Verb::ReplaceChar(ch) => self.replace_char(*ch),
			Verb::OpenLineBelow => {
				self.push_undo();
				let len = self.line_len();
				self.replace_range(self.cursor_row, len, self.cursor_row, len, "\n");
				true
			}
			Verb::OpenLineAbove => {
				self.push_undo();
				let row = self.cursor_row;
				self.replace_range(row, 0, row, 0, "\n");
				// The new empty line sits at the original row; pin the cursor there
				self.cursor_row = row;
				self.cursor_col = 0;
				true
			}
			Verb::Put(anchor) => self.put(*anchor, count),
			Verb::JoinLines => self.join_lines(count),
			Verb::Undo => {
				let mut any = false;
				for _ in 0..count {
					if !self.undo() {
						break
					}
					any = true;
				}
				any
			}
		}
	}

	/// Store a slice of the buffer in the clipboard. A trailing newline is
	/// what marks the content linewise for `put`.
	fn yank_range_text(&mut self, sr: usize, sc: usize, er: usize, ec: usize, linewise: bool) {
		let mut text = self.range_text(sr, sc, er, ec);
		if linewise && !text.ends_with('\n') {
			text.push('\n');
		}
		trace!("yanked {} bytes{}", text.len(), if linewise { " (linewise)" } else { "" });
		self.clipboard = text;
	}

	fn delete_back(&mut self) -> bool {
		if self.cursor_col > 0 {
			self.replace_range(self.cursor_row, self.cursor_col - 1, self.cursor_row, self.cursor_col, "");
			true
		} else if self.cursor_row > 0 {
			let prev = self.cursor_row - 1;
			let junction = self.line_len_at(prev);
			self.replace_range(prev, junction, self.cursor_row, 0, "");
			true
		} else {
			false
		}
	}
	fn delete_chars_forward(&mut self, count: usize, change: bool) -> bool {
		let len = self.line_len();
		if self.cursor_col >= len {
			return false
		}
		let end = (self.cursor_col + count).min(len);
		self.push_undo();
		self.yank_range_text(self.cursor_row, self.cursor_col, self.cursor_row, end, false);
		self.replace_range(self.cursor_row, self.cursor_col, self.cursor_row, end, "");
		if !change {
			self.cursor_col = self.cursor_col.min(self.normal_max_col(self.cursor_row));
		}
		true
	}
	fn delete_chars_backward(&mut self, count: usize) -> bool {
		if self.cursor_col == 0 {
			return false
		}
		let start = self.cursor_col.saturating_sub(count);
		self.push_undo();
		self.yank_range_text(self.cursor_row, start, self.cursor_row, self.cursor_col, false);
		self.replace_range(self.cursor_row, start, self.cursor_row, self.cursor_col, "");
		true
	}
	fn delete_word(&mut self, dir: Direction, count: usize, change: bool) -> bool {
		let (row, col) = (self.cursor_row, self.cursor_col);
		let (br, bc) = self.word_scan(To::Start, dir, count);
		let (sr, sc, er, ec) = match dir {
			Direction::Forward => (row, col, br, bc),
			Direction::Backward => (br, bc, row, col),
		};
		if (sr, sc) == (er, ec) {
			return false
		}
		self.push_undo();
		self.yank_range_text(sr, sc, er, ec, false);
		self.replace_range(sr, sc, er, ec, "");
		if !change {
			self.cursor_col = self.cursor_col.min(self.normal_max_col(self.cursor_row));
		}
		true
	}
	/// `de`, and the forward half of `cw` (which stops at the end of the
	/// word rather than eating the following whitespace).
	fn delete_word_end(&mut self, count: usize, change: bool) -> bool {
		let (row, col) = (self.cursor_row, self.cursor_col);
		let (er, ec) = self.word_scan(To::End, Direction::Forward, count);
		if (er, ec) < (row, col) {
			return false
		}
		let end = ec + 1;
		if self.range_text(row, col, er, end).is_empty() {
			return false
		}
		self.push_undo();
		self.yank_range_text(row, col, er, end, false);
		self.replace_range(row, col, er, end, "");
		if !change {
			self.cursor_col = self.cursor_col.min(self.normal_max_col(self.cursor_row));
		}
		true
	}
	fn delete_lines(&mut self, count: usize) -> bool {
		let row = self.cursor_row;
		let end = (row + count).min(self.lines.len());
		let mut yanked = self.lines[row..end].join("\n");
		yanked.push('\n');
		self.push_undo();
		self.clipboard = yanked;
		self.lines.drain(row..end);
		if self.lines.is_empty() {
			self.lines.push(String::new());
		}
		self.cursor_row = row.min(self.last_row());
		self.cursor_col = 0;
		self.preferred_col = None;
		true
	}
	fn change_lines(&mut self, count: usize) -> bool {
		let row = self.cursor_row;
		let end = (row + count).min(self.lines.len());
		let mut yanked = self.lines[row..end].join("\n");
		yanked.push('\n');
		self.push_undo();
		self.clipboard = yanked;
		self.lines.splice(row..end, [String::new()]);
		self.cursor_row = row;
		self.cursor_col = 0;
		self.preferred_col = None;
		true
	}
	fn delete_move(&mut self, dir: MoveDir, count: usize, change: bool) -> bool {
		match dir {
			MoveDir::Left => self.delete_chars_backward(count),
			MoveDir::Right => self.delete_chars_forward(count, change),
			MoveDir::Up => {
				let start = self.cursor_row.saturating_sub(count);
				if start == self.cursor_row {
					return false
				}
				let took = self.cursor_row - start;
				self.cursor_row = start;
				if change {
					self.change_lines(took + 1)
				} else {
					self.delete_lines(took + 1)
				}
			}
			MoveDir::Down => {
				if self.cursor_row == self.last_row() {
					return false
				}
				let take = (self.last_row() - self.cursor_row).min(count) + 1;
				if change {
					self.change_lines(take)
				} else {
					self.delete_lines(take)
				}
			}
		}
	}
	fn delete_selection(&mut self, kind: SelectKind, change: bool) -> bool {
		let Some(((sr, sc), (er, ec))) = self.selection_bounds() else {
			return false
		};
		match kind {
			SelectKind::Char => {
				let end = (ec + 1).min(self.line_len_at(er));
				self.push_undo();
				self.yank_range_text(sr, sc, er, end, false);
				self.replace_range(sr, sc, er, end, "");
				if !change {
					self.cursor_col = self.cursor_col.min(self.normal_max_col(self.cursor_row));
				}
			}
			SelectKind::Line => {
				self.cursor_row = sr;
				let count = er - sr + 1;
				if change {
					return self.change_lines(count)
				}
				return self.delete_lines(count)
			}
		}
		true
	}
	fn yank_selection(&mut self, kind: SelectKind) {
		let Some(((sr, sc), (er, ec))) = self.selection_bounds() else {
			return
		};
		match kind {
			SelectKind::Char => {
				let end = (ec + 1).min(self.line_len_at(er));
				self.yank_range_text(sr, sc, er, end, false);
			}
			SelectKind::Line => {
				let mut text = self.lines[sr..=er].join("\n");
				text.push('\n');
				self.clipboard = text;
			}
		}
		// The cursor collapses to the start of the selection, as in vim
		self.cursor_row = sr;
		self.cursor_col = match kind {
			SelectKind::Char => sc.min(self.normal_max_col(sr)),
			SelectKind::Line => 0,
		};
	}
	fn toggle_case(&mut self, count: usize) -> bool {
		let len = self.line_len();
		if self.cursor_col >= len {
			return false
		}
		let end = (self.cursor_col + count).min(len);
		let segment = chars::slice(self.line(), self.cursor_col, end);
		let flipped = segment
			.chars()
			.map(|c| {
				if c.is_uppercase() {
					c.to_lowercase().next().unwrap_or(c)
				} else if c.is_lowercase() {
					c.to_uppercase().next().unwrap_or(c)
				} else {
					c
				}
			})
			.collect::<String>();
		let changed = flipped != segment;
		if changed {
			let col = self.cursor_col;
			self.push_undo();
			self.replace_range(self.cursor_row, col, self.cursor_row, end, &flipped);
		}
		self.cursor_col = end.min(self.normal_max_col(self.cursor_row));
		changed
	}
	fn replace_char(&mut self, ch: char) -> bool {
		let len = self.line_len();
		if self.cursor_col >= len {
			return false
		}
		if chars::at(self.line(), self.cursor_col) == Some(ch) {
			return false
		}
		let col = self.cursor_col;
		let mut buf = [0u8; 4];
		let text = ch.encode_utf8(&mut buf).to_string();
		self.push_undo();
		self.replace_range(self.cursor_row, col, self.cursor_row, col + 1, &text);
		self.cursor_col = col;
		true
	}
	fn put(&mut self, anchor: Anchor, count: usize) -> bool {
		if self.clipboard.is_empty() {
			return false
		}
		let linewise = self.clipboard.ends_with('\n');
		if linewise {
			let body = self.clipboard.strip_suffix('\n').unwrap_or(&self.clipboard);
			let pasted = body.split('\n').map(String::from).collect::<Vec<_>>();
			let at = match anchor {
				Anchor::After => self.cursor_row + 1,
				Anchor::Before => self.cursor_row,
			};
			self.push_undo();
			let mut rows = Vec::with_capacity(pasted.len() * count);
			for _ in 0..count {
				rows.extend(pasted.iter().cloned());
			}
			self.lines.splice(at..at, rows);
			self.cursor_row = at;
			self.cursor_col = 0;
			self.preferred_col = None;
		} else {
			let text = self.clipboard.repeat(count);
			let col = match anchor {
				Anchor::After => (self.cursor_col + 1).min(self.line_len()),
				Anchor::Before => self.cursor_col,
			};
			self.push_undo();
			self.replace_range(self.cursor_row, col, self.cursor_row, col, &text);
			// Rest on the last pasted character
			self.cursor_col = self.cursor_col.saturating_sub(1).max(col);
		}
		true
	}
	fn join_lines(&mut self, count: usize) -> bool {
		if self.cursor_row == self.last_row() {
			return false
		}
		let joins = count.max(2) - 1;
		self.push_undo();
		for _ in 0..joins {
			if self.cursor_row == self.last_row() {
				break
			}
			let next = self.lines.remove(self.cursor_row + 1);
			let trimmed = next.trim_start();
			let line = &mut self.lines[self.cursor_row];
			let junction = chars::len(line);
			if !line.is_empty() && !trimmed.is_empty() {
				line.push(' ');
			}
			line.push_str(trimmed);
			self.cursor_col = junction;
		}
		self.preferred_col = None;
		true
	}
}
