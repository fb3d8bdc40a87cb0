//! The modal input controller.
//!
//! Raw `KeyEvent`s come in through `handle_key`; `MotionCmd`s and `VerbCmd`s
//! go out to `linebuf`. The controller owns the mode, the count accumulator,
//! the pending prefixes, the command-line sub-mode, and the repeat memory.
//!
//! Pending state is carried as orthogonal fields rather than extra modes.
//! Escape resets the whole set atomically.

use log::trace;

use crate::keys::{KeyCode as K, KeyEvent as E, ModKeys as M};
use crate::linebuf::LineBuf;
use crate::ports::{ViPorts, ViStyle};
use crate::vicmd::{Anchor, Dest, Direction, Motion, MotionCmd, MoveDir, SelectKind, Verb, VerbCmd, To};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
	Normal,
	Insert,
	Visual,
	VisualLine,
	Command,
}

impl Mode {
	pub fn as_str(self) -> &'static str {
		match self {
			Mode::Normal => "normal",
			Mode::Insert => "insert",
			Mode::Visual => "visual",
			Mode::VisualLine => "visual-line",
			Mode::Command => "command",
		}
	}
	pub fn is_visual(self) -> bool {
		matches!(self, Mode::Visual | Mode::VisualLine)
	}
}

/// An armed operator waiting for its motion or text object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PendingOp {
	G,
	Delete,
	Change,
	Yank,
}

/// Multi-key modifier sequences. Only Ctrl+X exists today.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Chord {
	CtrlX,
}

/// The vim input controller.
///
/// `handle_key` returns whether the key was consumed; unhandled keys belong
/// to the enclosing prompt (history, completion, submit and friends).
pub struct ViController {
	editor: LineBuf,
	ports: ViPorts,
	mode: Mode,
	enabled: bool,
	count: usize,
	command_buffer: String,
	pending_op: Option<PendingOp>,
	pending_chord: Option<Chord>,
	pending_replace: bool,
	pending_inner: bool,
	pending_find: Option<(Direction, Dest)>,
	last_find: Option<MotionCmd>,
	last_command: Option<VerbCmd>,
}

impl Default for ViController {
	fn default() -> Self {
		Self::new(ViPorts::default())
	}
}

impl ViController {
	pub fn new(ports: ViPorts) -> Self {
		Self {
			editor: LineBuf::new(),
			ports,
			mode: Mode::Insert,
			enabled: true,
			count: 0,
			command_buffer: String::new(),
			pending_op: None,
			pending_chord: None,
			pending_replace: false,
			pending_inner: false,
			pending_find: None,
			last_find: None,
			last_command: None,
		}
	}
	pub fn with_text(mut self, text: &str) -> Self {
		self.editor.set_text(text);
		self
	}

	pub fn editor(&self) -> &LineBuf {
		&self.editor
	}
	pub fn editor_mut(&mut self) -> &mut LineBuf {
		&mut self.editor
	}
	pub fn mode(&self) -> Mode {
		self.mode
	}
	pub fn count(&self) -> usize {
		self.count
	}
	pub fn command_buffer(&self) -> &str {
		&self.command_buffer
	}
	pub fn last_command(&self) -> Option<&VerbCmd> {
		self.last_command.as_ref()
	}
	pub fn last_find(&self) -> Option<&MotionCmd> {
		self.last_find.as_ref()
	}
	pub fn is_enabled(&self) -> bool {
		self.enabled
	}
	/// Toggle the whole controller. While disabled every key passes through.
	pub fn set_enabled(&mut self, enabled: bool) {
		self.enabled = enabled;
		if enabled {
			self.set_mode(Mode::Insert);
		}
		self.clear_pendings();
	}

	fn clear_pendings(&mut self) {
		self.count = 0;
		self.pending_op = None;
		self.pending_chord = None;
		self.pending_replace = false;
		self.pending_inner = false;
		self.pending_find = None;
	}

	fn set_mode(&mut self, mode: Mode) {
		if self.mode == mode {
			return
		}
		self.clear_pendings();
		if mode.is_visual() {
			if self.editor.selection_anchor().is_none() {
				self.editor.start_selection();
			}
		} else {
			self.editor.clear_selection();
		}
		self.mode = mode;
		self.ports.notify_mode(mode);
	}

	/// A count of 1 when unspecified; resets the accumulator.
	fn take_count(&mut self) -> usize {
		let count = self.count.max(1);
		self.count = 0;
		count
	}
	/// The raw accumulator (0 = unspecified); resets it.
	fn take_raw_count(&mut self) -> usize {
		std::mem::take(&mut self.count)
	}

	fn exec_motion(&mut self, cmd: MotionCmd) -> bool {
		self.editor.exec_motion(&cmd)
	}

	/// The one executor every mutation goes through, including `.` repeat,
	/// so insert-trailing verbs re-enter insert mode on replay too.
	fn exec_verb(&mut self, cmd: VerbCmd) -> bool {
		let changed = self.editor.exec_verb(&cmd);
		let enters_insert = cmd.1.enters_insert();
		if changed && cmd.1.is_repeatable() {
			self.last_command = Some(cmd);
		}
		if enters_insert {
			self.set_mode(Mode::Insert);
		}
		changed
	}

	/// Feed one key into the controller. Returns true if vim consumed it.
	pub fn handle_key(&mut self, key: E) -> bool {
		if !self.enabled {
			return false
		}
		if matches!(key.0, K::Null) {
			// Malformed input was already logged by the keys module
			return false
		}

		// Short-circuit prefixes, checked before any mode branching.
		if self.pending_replace {
			self.pending_replace = false;
			if let K::Char(ch) = key.0
				&& !key.1.intersects(M::CTRL | M::ALT)
			{
				self.exec_verb(VerbCmd(1, Verb::ReplaceChar(ch)));
			}
			self.count = 0;
			return true
		}
		if let Some((dir, dest)) = self.pending_find.take() {
			if let K::Char(ch) = key.0
				&& !key.1.intersects(M::CTRL | M::ALT)
			{
				let count = self.take_count();
				let cmd = MotionCmd(count, Motion::CharSearch(dir, dest, ch));
				if self.exec_motion(cmd.clone()) {
					self.last_find = Some(cmd);
				}
			} else {
				self.count = 0;
			}
			return true
		}
		if self.pending_chord.take().is_some() {
			if key == E(K::Char('E'), M::CTRL) {
				self.ports.open_editor();
			}
			// Anything else is swallowed; the chord clears regardless
			return true
		}
		if key == E(K::Char('X'), M::CTRL) {
			self.pending_chord = Some(Chord::CtrlX);
			return true
		}

		match self.mode {
			Mode::Insert => self.handle_insert_key(key),
			Mode::Command => self.handle_command_key(key),
			Mode::Normal | Mode::Visual | Mode::VisualLine => self.handle_normal_key(key),
		}
	}

	// ----- insert mode --------------------------------------------------

	fn handle_insert_key(&mut self, key: E) -> bool {
		if key.is_paste() {
			return match &key.0 {
				K::Char(c) => self.exec_verb(VerbCmd(1, Verb::InsertChar(*c))),
				K::Grapheme(g) => self.exec_verb(VerbCmd(1, Verb::Insert(g.to_string()))),
				K::Enter => self.exec_verb(VerbCmd(1, Verb::InsertChar('\n'))),
				K::Tab => self.exec_verb(VerbCmd(1, Verb::InsertChar('\t'))),
				_ => false,
			}
		}
		match key {
			E(K::Esc, M::NONE) => {
				self.clear_pendings();
				self.exec_motion(MotionCmd(1, Motion::BackwardCharInLine));
				self.set_mode(Mode::Normal);
				true
			}
			E(K::Char('W'), M::CTRL) => {
				self.editor.exec_verb(&VerbCmd(1, Verb::DeleteWord(Direction::Backward)));
				true
			}
			E(K::Char('U'), M::CTRL) => {
				self.editor.exec_verb(&VerbCmd(1, Verb::DeleteToLineStart));
				true
			}
			E(K::Backspace, M::NONE) => {
				self.editor.exec_verb(&VerbCmd(1, Verb::DeleteBack));
				true
			}
			E(K::Delete, M::NONE) => {
				self.editor.exec_verb(&VerbCmd(1, Verb::DeleteChar));
				true
			}
			E(K::Enter, M::NONE) => {
				let text = self.editor.text();
				if text.trim().is_empty() || !self.ports.has_submit() {
					// Upstream owns newline insertion and empty submits
					return false
				}
				self.ports.submit(&text);
				self.editor.clear();
				true
			}
			E(K::Left, M::NONE) => {
				self.exec_motion(MotionCmd(1, Motion::BackwardChar));
				true
			}
			E(K::Right, M::NONE) => {
				self.exec_motion(MotionCmd(1, Motion::ForwardChar));
				true
			}
			E(K::Home, M::NONE) => {
				self.exec_motion(MotionCmd(1, Motion::BeginningOfLine));
				true
			}
			E(K::End, M::NONE) => {
				self.editor.seek_eol_append();
				true
			}
			// Reserved for the enclosing prompt: completion, history,
			// clipboard image paste, shell-mode trigger
			E(K::Tab, M::NONE) | E(K::Up, M::NONE) | E(K::Down, M::NONE) => false,
			E(K::Char('R'), M::CTRL) | E(K::Char('V'), M::CTRL) => false,
			E(K::Char('!'), M::NONE) if self.editor.is_blank() => false,
			_ if key.is_insertable() => match key.0 {
				K::Char(c) => self.exec_verb(VerbCmd(1, Verb::InsertChar(c))),
				K::Grapheme(ref g) => self.exec_verb(VerbCmd(1, Verb::Insert(g.to_string()))),
				_ => false,
			},
			_ => false,
		}
	}

	// ----- command-line sub-mode ----------------------------------------

	fn handle_command_key(&mut self, key: E) -> bool {
		match key {
			E(K::Esc, M::NONE) => {
				self.command_buffer.clear();
				self.ports.notify_command_buffer("");
				self.set_mode(Mode::Normal);
				true
			}
			E(K::Backspace, M::NONE) => {
				self.command_buffer.pop();
				if self.command_buffer.is_empty() {
					self.ports.notify_command_buffer("");
					self.set_mode(Mode::Normal);
				} else {
					let buf = self.command_buffer.clone();
					self.ports.notify_command_buffer(&buf);
				}
				true
			}
			E(K::Enter, M::NONE) => {
				let buf = std::mem::take(&mut self.command_buffer);
				self.dispatch_command(&buf);
				self.ports.notify_command_buffer("");
				self.set_mode(Mode::Normal);
				true
			}
			_ if key.is_insertable() => {
				match key.0 {
					K::Char(c) => self.command_buffer.push(c),
					K::Grapheme(ref g) => self.command_buffer.push_str(g),
					_ => {}
				}
				let buf = self.command_buffer.clone();
				self.ports.notify_command_buffer(&buf);
				true
			}
			_ => true,
		}
	}

	fn dispatch_command(&mut self, buf: &str) {
		if let Some(rest) = buf.strip_prefix(':') {
			// Minimal ex stub; recognised commands terminate the mode and
			// leave any real behavior to the host
			match rest.trim() {
				"q" | "w" | "wq" => trace!("ex command {rest:?} accepted"),
				other => trace!("ex command {other:?} not recognised"),
			}
		} else if let Some(rest) = buf.strip_prefix('/') {
			self.exec_motion(MotionCmd(1, Motion::PatternSearch(rest.to_string(), Direction::Forward)));
		} else if let Some(rest) = buf.strip_prefix('?') {
			self.exec_motion(MotionCmd(1, Motion::PatternSearch(rest.to_string(), Direction::Backward)));
		}
	}

	// ----- normal and visual modes --------------------------------------

	fn handle_normal_key(&mut self, key: E) -> bool {
		match key {
			E(K::Esc, M::NONE) => {
				self.clear_pendings();
				if self.mode.is_visual() {
					self.set_mode(Mode::Normal);
				}
				true
			}
			E(K::Left, M::NONE) => self.dispatch_normal_char('h'),
			E(K::Down, M::NONE) => self.dispatch_normal_char('j'),
			E(K::Up, M::NONE) => self.dispatch_normal_char('k'),
			E(K::Right, M::NONE) => self.dispatch_normal_char('l'),
			E(K::Backspace, M::NONE) => {
				let count = self.take_count();
				self.pending_op = None;
				self.exec_motion(MotionCmd(count, Motion::BackwardChar));
				true
			}
			// The enclosing prompt decides what Enter means outside insert
			E(K::Enter, M::NONE) => false,
			E(K::Char(ch), M::NONE) => self.dispatch_normal_char(ch),
			_ => {
				self.clear_pendings();
				true
			}
		}
	}

	fn select_kind(&self) -> SelectKind {
		match self.mode {
			Mode::VisualLine => SelectKind::Line,
			_ => SelectKind::Char,
		}
	}

	/// Operator + h/j/k/l, or the bare motion when nothing is pending.
	fn compose_move(&mut self, dir: MoveDir) -> bool {
		let count = self.take_count();
		match self.pending_op.take() {
			Some(PendingOp::Delete) => {
				self.exec_verb(VerbCmd(count, Verb::DeleteMove(dir)));
			}
			Some(PendingOp::Change) => {
				self.exec_verb(VerbCmd(count, Verb::ChangeMove(dir)));
			}
			Some(_) => {}
			None => {
				let motion = match dir {
					MoveDir::Left => Motion::BackwardChar,
					MoveDir::Right => Motion::ForwardChar,
					MoveDir::Up => Motion::LineUp,
					MoveDir::Down => Motion::LineDown,
				};
				self.exec_motion(MotionCmd(count, motion));
			}
		}
		true
	}

	fn plain_motion(&mut self, motion: Motion) -> bool {
		let count = self.take_count();
		self.pending_op = None;
		self.exec_motion(MotionCmd(count, motion));
		true
	}

	fn dispatch_normal_char(&mut self, ch: char) -> bool {
		// Settings are read on every dispatch, never cached
		let style = self.ports.style();
		let bash_passthrough = style == ViStyle::Bash
			&& self.mode == Mode::Normal
			&& self.pending_op.is_none();

		// Count accumulation: 1-9 always, 0 only with a count in flight
		if let Some(digit) = ch.to_digit(10)
			&& (digit != 0 || self.count > 0)
		{
			self.count = self.count * 10 + digit as usize;
			return true
		}

		// An armed operator that saw `i` is waiting for the object selector
		if self.pending_inner {
			self.pending_inner = false;
			let op = self.pending_op.take();
			self.count = 0;
			if ch == 'w' {
				match op {
					Some(PendingOp::Delete) => self.exec_verb(VerbCmd(1, Verb::DeleteInnerWord)),
					Some(PendingOp::Change) => self.exec_verb(VerbCmd(1, Verb::ChangeInnerWord)),
					Some(PendingOp::Yank) => self.exec_verb(VerbCmd(1, Verb::YankInnerWord)),
					_ => false,
				};
			}
			return true
		}

		// `g` prefix: only `gg` is recognised
		if self.pending_op == Some(PendingOp::G) {
			self.pending_op = None;
			self.count = 0;
			if ch == 'g' {
				self.exec_motion(MotionCmd(1, Motion::BeginningOfBuffer));
			}
			return true
		}

		match ch {
			// Operators
			'd' => match self.pending_op.take() {
				Some(PendingOp::Delete) => {
					let count = self.take_count();
					self.exec_verb(VerbCmd(count, Verb::DeleteLine));
					true
				}
				Some(_) => {
					self.clear_pendings();
					true
				}
				None => {
					if self.mode.is_visual() {
						let kind = self.select_kind();
						self.count = 0;
						self.exec_verb(VerbCmd(1, Verb::DeleteSelection(kind)));
						self.set_mode(Mode::Normal);
					} else {
						self.pending_op = Some(PendingOp::Delete);
					}
					true
				}
			},
			'c' => match self.pending_op.take() {
				Some(PendingOp::Change) => {
					let count = self.take_count();
					self.exec_verb(VerbCmd(count, Verb::ChangeLine));
					true
				}
				Some(_) => {
					self.clear_pendings();
					true
				}
				None => {
					if self.mode.is_visual() {
						let kind = self.select_kind();
						self.count = 0;
						self.exec_verb(VerbCmd(1, Verb::ChangeSelection(kind)));
					} else {
						self.pending_op = Some(PendingOp::Change);
					}
					true
				}
			},
			'y' => match self.pending_op.take() {
				Some(PendingOp::Yank) => {
					let count = self.take_count();
					self.exec_verb(VerbCmd(count, Verb::YankLine));
					true
				}
				Some(_) => {
					self.clear_pendings();
					true
				}
				None => {
					if self.mode.is_visual() {
						let kind = self.select_kind();
						self.count = 0;
						self.exec_verb(VerbCmd(1, Verb::YankSelection(kind)));
						self.set_mode(Mode::Normal);
					} else {
						self.pending_op = Some(PendingOp::Yank);
					}
					true
				}
			},
			'g' => {
				if self.pending_op.is_none() {
					self.pending_op = Some(PendingOp::G);
				} else {
					self.clear_pendings();
				}
				true
			}

			// Motions, composing with an armed operator where one applies
			'h' => self.compose_move(MoveDir::Left),
			'l' => self.compose_move(MoveDir::Right),
			'j' if bash_passthrough => {
				self.count = 0;
				false
			}
			'k' if bash_passthrough => {
				self.count = 0;
				false
			}
			'j' => self.compose_move(MoveDir::Down),
			'k' => self.compose_move(MoveDir::Up),
			'w' | 'b' | 'e' => {
				let count = self.take_count();
				let (to, dir) = match ch {
					'w' => (To::Start, Direction::Forward),
					'b' => (To::Start, Direction::Backward),
					_ => (To::End, Direction::Forward),
				};
				match self.pending_op.take() {
					None => {
						self.exec_motion(MotionCmd(count, Motion::WordMotion(to, dir)));
					}
					Some(PendingOp::Delete) => {
						let verb = match ch {
							'w' => Verb::DeleteWord(Direction::Forward),
							'b' => Verb::DeleteWord(Direction::Backward),
							_ => Verb::DeleteWordEnd,
						};
						self.exec_verb(VerbCmd(count, verb));
					}
					Some(PendingOp::Change) => {
						let verb = match ch {
							'w' => Verb::ChangeWord(Direction::Forward),
							'b' => Verb::ChangeWord(Direction::Backward),
							_ => Verb::ChangeWordEnd,
						};
						self.exec_verb(VerbCmd(count, verb));
					}
					Some(_) => {}
				}
				true
			}
			'0' => match self.pending_op.take() {
				// Only reachable with count == 0; a trailing 0 in a count is
				// eaten by the digit branch above
				Some(PendingOp::Delete) => {
					self.count = 0;
					self.exec_verb(VerbCmd(1, Verb::DeleteToLineStart));
					true
				}
				Some(_) => {
					self.clear_pendings();
					true
				}
				None => self.plain_motion(Motion::BeginningOfLine),
			},
			'$' => match self.pending_op.take() {
				Some(PendingOp::Delete) => {
					self.count = 0;
					self.exec_verb(VerbCmd(1, Verb::DeleteToEnd));
					true
				}
				Some(PendingOp::Change) => {
					self.count = 0;
					self.exec_verb(VerbCmd(1, Verb::ChangeToEnd));
					true
				}
				Some(_) => {
					self.clear_pendings();
					true
				}
				None => self.plain_motion(Motion::EndOfLine),
			},
			'^' => self.plain_motion(Motion::FirstNonBlank),
			'%' => self.plain_motion(Motion::ToDelimMatch),
			'G' if bash_passthrough => {
				self.count = 0;
				false
			}
			'G' => {
				let count = self.take_raw_count();
				self.pending_op = None;
				if count > 0 {
					self.exec_motion(MotionCmd(count, Motion::ToLine));
				} else {
					self.exec_motion(MotionCmd(1, Motion::EndOfBuffer));
				}
				true
			}

			// Mode transitions
			'i' => {
				if self.pending_op.is_some() {
					// diw / ciw / yiw: wait for the object selector
					self.pending_inner = true;
					return true
				}
				if self.mode.is_visual() {
					self.clear_pendings();
					return true
				}
				self.count = 0;
				self.editor.push_undo();
				self.set_mode(Mode::Insert);
				true
			}
			'a' => {
				self.count = 0;
				self.pending_op = None;
				if self.mode.is_visual() {
					return true
				}
				self.editor.push_undo();
				self.editor.shift_cursor_append();
				self.set_mode(Mode::Insert);
				true
			}
			'A' => {
				self.count = 0;
				self.pending_op = None;
				self.editor.push_undo();
				self.editor.seek_eol_append();
				self.set_mode(Mode::Insert);
				true
			}
			'I' => {
				self.count = 0;
				self.pending_op = None;
				self.editor.push_undo();
				self.exec_motion(MotionCmd(1, Motion::FirstNonBlank));
				self.set_mode(Mode::Insert);
				true
			}
			'o' => {
				self.count = 0;
				self.pending_op = None;
				self.exec_verb(VerbCmd(1, Verb::OpenLineBelow));
				true
			}
			'O' => {
				self.count = 0;
				self.pending_op = None;
				self.exec_verb(VerbCmd(1, Verb::OpenLineAbove));
				true
			}
			'v' => {
				self.clear_pendings();
				match self.mode {
					Mode::Visual => self.set_mode(Mode::Normal),
					Mode::VisualLine => self.set_mode(Mode::Visual),
					_ => self.set_mode(Mode::Visual),
				}
				true
			}
			'V' => {
				self.clear_pendings();
				match self.mode {
					Mode::VisualLine => self.set_mode(Mode::Normal),
					_ => self.set_mode(Mode::VisualLine),
				}
				true
			}

			// Edits
			'x' => {
				let count = self.take_count();
				self.pending_op = None;
				if self.mode.is_visual() {
					let kind = self.select_kind();
					self.exec_verb(VerbCmd(1, Verb::DeleteSelection(kind)));
					self.set_mode(Mode::Normal);
				} else {
					self.exec_verb(VerbCmd(count, Verb::DeleteChar));
				}
				true
			}
			'X' => {
				let count = self.take_count();
				self.pending_op = None;
				self.exec_verb(VerbCmd(count, Verb::DeleteCharBefore));
				true
			}
			's' => {
				let count = self.take_count();
				self.pending_op = None;
				if self.mode.is_visual() {
					let kind = self.select_kind();
					self.exec_verb(VerbCmd(1, Verb::ChangeSelection(kind)));
				} else {
					self.exec_verb(VerbCmd(count, Verb::ChangeMove(MoveDir::Right)));
				}
				true
			}
			'S' => {
				let count = self.take_count();
				self.pending_op = None;
				self.exec_verb(VerbCmd(count, Verb::ChangeLine));
				true
			}
			'~' => {
				let count = self.take_count();
				self.pending_op = None;
				self.exec_verb(VerbCmd(count, Verb::ToggleCase));
				true
			}
			'r' => {
				self.count = 0;
				self.pending_op = None;
				self.pending_replace = true;
				true
			}
			'D' => {
				self.count = 0;
				self.pending_op = None;
				if self.mode.is_visual() {
					self.exec_verb(VerbCmd(1, Verb::DeleteSelection(SelectKind::Line)));
					self.set_mode(Mode::Normal);
				} else {
					self.exec_verb(VerbCmd(1, Verb::DeleteToEnd));
				}
				true
			}
			'C' => {
				self.count = 0;
				self.pending_op = None;
				if self.mode.is_visual() {
					self.exec_verb(VerbCmd(1, Verb::ChangeSelection(SelectKind::Line)));
				} else {
					self.exec_verb(VerbCmd(1, Verb::ChangeToEnd));
				}
				true
			}
			'Y' => {
				let count = self.take_count();
				self.pending_op = None;
				if self.mode.is_visual() {
					self.exec_verb(VerbCmd(1, Verb::YankSelection(SelectKind::Line)));
					self.set_mode(Mode::Normal);
				} else {
					self.exec_verb(VerbCmd(count, Verb::YankLine));
				}
				true
			}
			'J' => {
				let count = self.take_count();
				self.pending_op = None;
				self.exec_verb(VerbCmd(count, Verb::JoinLines));
				true
			}
			'p' => {
				let count = self.take_count();
				self.pending_op = None;
				self.exec_verb(VerbCmd(count, Verb::Put(Anchor::After)));
				true
			}
			'P' => {
				let count = self.take_count();
				self.pending_op = None;
				self.exec_verb(VerbCmd(count, Verb::Put(Anchor::Before)));
				true
			}
			'u' => {
				let count = self.take_count();
				self.pending_op = None;
				self.exec_verb(VerbCmd(count, Verb::Undo));
				true
			}

			// Search and find
			'n' => self.plain_motion(Motion::NextMatch),
			'N' => self.plain_motion(Motion::PrevMatch),
			'f' => self.arm_find(Direction::Forward, Dest::On),
			'F' => self.arm_find(Direction::Backward, Dest::On),
			't' => self.arm_find(Direction::Forward, Dest::Before),
			'T' => self.arm_find(Direction::Backward, Dest::Before),
			';' => {
				let count = self.take_count();
				self.pending_op = None;
				if let Some(MotionCmd(_, motion)) = self.last_find.clone() {
					self.exec_motion(MotionCmd(count, motion));
				}
				true
			}
			',' => {
				let count = self.take_count();
				self.pending_op = None;
				if let Some(inverted) = self.last_find.as_ref().and_then(|f| f.invert_char_search()) {
					self.exec_motion(MotionCmd(count, inverted.1));
				}
				true
			}

			// Repeat
			'.' => {
				let count = self.take_raw_count();
				self.pending_op = None;
				if let Some(mut cmd) = self.last_command.clone() {
					if count > 0 {
						cmd.0 = count;
					}
					self.exec_verb(cmd);
				}
				true
			}

			// Command-line sub-mode
			':' | '/' | '?' => {
				if bash_passthrough && (ch == '/' || ch == '?') {
					// History search wins in bash style
					self.count = 0;
					return false
				}
				self.count = 0;
				self.pending_op = None;
				if self.ports.command_mode_disabled() {
					self.editor.push_undo();
					self.set_mode(Mode::Insert);
					self.exec_verb(VerbCmd(1, Verb::InsertChar(ch)));
					return true
				}
				self.set_mode(Mode::Command);
				self.command_buffer.clear();
				self.command_buffer.push(ch);
				let buf = self.command_buffer.clone();
				self.ports.notify_command_buffer(&buf);
				true
			}

			_ => {
				self.clear_pendings();
				true
			}
		}
	}

	fn arm_find(&mut self, dir: Direction, dest: Dest) -> bool {
		// The count survives so `3fa` works once the target char arrives
		self.pending_op = None;
		self.pending_find = Some((dir, dest));
		true
	}
}
