//! The vocabulary of editing actions.
//!
//! Parsing happens in the `vimode` module; execution happens in `linebuf`.
//! This module just holds the enums. Splitting the two keeps every verb
//! testable without a controller in the loop.

/// A count, and a `Motion`
#[derive(Clone, Debug, PartialEq)]
pub struct MotionCmd(pub usize, pub Motion);

/// A count, and a `Verb`
#[derive(Clone, Debug, PartialEq)]
pub struct VerbCmd(pub usize, pub Verb);

impl MotionCmd {
	/// Flip the direction of a `CharSearch`. Used by `,`.
	pub fn invert_char_search(&self) -> Option<Self> {
		let MotionCmd(count, Motion::CharSearch(dir, dest, ch)) = self else {
			return None
		};
		Some(MotionCmd(*count, Motion::CharSearch(dir.flipped(), *dest, *ch)))
	}
}

/// Cursor motions.
///
/// Motions never touch the undo stack, the clipboard, or the text itself.
#[derive(Clone, Debug, PartialEq)]
pub enum Motion {
	/// `h`: wraps to the end of the previous line at column 0
	BackwardChar,
	/// `l`: wraps to the next line past the last character
	ForwardChar,
	/// Left one code point, clamped to the current line. Used when leaving
	/// insert mode.
	BackwardCharInLine,
	LineUp,
	LineDown,
	WordMotion(To, Direction),
	BeginningOfLine,
	EndOfLine,
	FirstNonBlank,
	BeginningOfBuffer,
	EndOfBuffer,
	/// The count is a 1-based line number, clamped into the buffer
	ToLine,
	ToDelimMatch,
	CharSearch(Direction, Dest, char),
	PatternSearch(String, Direction),
	NextMatch,
	PrevMatch,
}

/// Editing verbs.
///
/// Verbs push an undo snapshot iff they will change text. A verb that turns
/// out to be a no-op leaves the undo stack and `last_command` alone.
#[derive(Clone, Debug, PartialEq)]
pub enum Verb {
	InsertChar(char),
	Insert(String),
	/// Backspace: one code point before the cursor, joining lines at column 0
	DeleteBack,
	/// `x`, within the current line
	DeleteChar,
	/// `X`, within the current line
	DeleteCharBefore,
	DeleteWord(Direction),
	DeleteWordEnd,
	ChangeWord(Direction),
	ChangeWordEnd,
	DeleteLine,
	ChangeLine,
	/// `D`
	DeleteToEnd,
	/// `C`
	ChangeToEnd,
	/// Ctrl+U: column 0 up to the cursor
	DeleteToLineStart,
	DeleteMove(MoveDir),
	ChangeMove(MoveDir),
	DeleteInnerWord,
	ChangeInnerWord,
	YankInnerWord,
	DeleteSelection(SelectKind),
	ChangeSelection(SelectKind),
	YankSelection(SelectKind),
	YankLine,
	ToggleCase,
	ReplaceChar(char),
	OpenLineBelow,
	OpenLineAbove,
	Put(Anchor),
	JoinLines,
	Undo,
}

impl Verb {
	/// Verbs that `.` may replay.
	///
	/// Yanks never change text and selection verbs need an anchor that is gone
	/// by the time `.` runs, so neither is recorded.
	pub fn is_repeatable(&self) -> bool {
		matches!(self,
			Self::DeleteChar |
			Self::DeleteCharBefore |
			Self::DeleteWord(_) |
			Self::DeleteWordEnd |
			Self::ChangeWord(_) |
			Self::ChangeWordEnd |
			Self::DeleteLine |
			Self::ChangeLine |
			Self::DeleteToEnd |
			Self::ChangeToEnd |
			Self::DeleteToLineStart |
			Self::DeleteMove(_) |
			Self::ChangeMove(_) |
			Self::DeleteInnerWord |
			Self::ChangeInnerWord |
			Self::ToggleCase |
			Self::ReplaceChar(_) |
			Self::OpenLineBelow |
			Self::OpenLineAbove |
			Self::Put(_) |
			Self::JoinLines
		)
	}
	/// Verbs that leave the controller in insert mode once executed.
	pub fn enters_insert(&self) -> bool {
		matches!(self,
			Self::ChangeWord(_) |
			Self::ChangeWordEnd |
			Self::ChangeLine |
			Self::ChangeToEnd |
			Self::ChangeMove(_) |
			Self::ChangeInnerWord |
			Self::ChangeSelection(_) |
			Self::OpenLineBelow |
			Self::OpenLineAbove
		)
	}
}

/// Apply a verb before, or after the target
///
/// Used by `put` to choose which side of the cursor or line receives the text
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Anchor {
	After,
	Before,
}

/// Motion direction
#[derive(Default, Clone, Copy, Debug, Eq, PartialEq)]
pub enum Direction {
	#[default]
	Forward,
	Backward,
}

impl Direction {
	pub fn flipped(self) -> Self {
		match self {
			Self::Forward => Self::Backward,
			Self::Backward => Self::Forward,
		}
	}
}

/// Target destination for char search motions
///
/// `t` uses `Dest::Before`, `f` uses `Dest::On`
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Dest {
	On,
	Before,
}

/// Target destination for word motions
///
/// `w`/`b` move to the start of a word, `e` moves to the end
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum To {
	Start,
	End,
}

/// The kind of active selection a verb applies to
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SelectKind {
	Char,
	Line,
}

/// Directions for operator + h/j/k/l composites
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MoveDir {
	Left,
	Right,
	Up,
	Down,
}
