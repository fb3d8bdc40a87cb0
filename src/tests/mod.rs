use unicode_segmentation::UnicodeSegmentation;
use pretty_assertions::assert_eq;

use crate::keys::{KeyEvent, ModKeys};
use crate::vimode::{Mode, ViController};

pub mod linebuf;

/// Feed raw input one grapheme at a time. Control bytes work the way they
/// do on a terminal: `\x1b` is Escape, `\r` is Enter, `\x17` is Ctrl+W.
pub fn feed(ctl: &mut ViController, input: &str) {
	for g in input.graphemes(true) {
		ctl.handle_key(KeyEvent::new(g, ModKeys::NONE));
	}
}

/// A controller in normal mode with the cursor at the start of `text`.
pub fn editor_with(text: &str) -> ViController {
	let mut ctl = ViController::default().with_text(text);
	feed(&mut ctl, "\x1bgg");
	ctl
}

pub fn lines_of(ctl: &ViController) -> Vec<&str> {
	ctl.editor().lines().iter().map(|l| l.as_str()).collect()
}

// Integration tests:

#[test]
fn insert_then_escape() {
	let mut ctl = ViController::default();
	feed(&mut ctl, "\x1b");
	assert_eq!(ctl.mode(), Mode::Normal);

	feed(&mut ctl, "ihi\x1b");
	assert_eq!(lines_of(&ctl), vec!["hi"]);
	assert_eq!(ctl.editor().cursor(), (0, 1));
	assert_eq!(ctl.mode(), Mode::Normal);
}

#[test]
fn count_word_motion() {
	let mut ctl = editor_with("alpha beta gamma delta");
	feed(&mut ctl, "3w");
	assert_eq!(ctl.editor().cursor(), (0, 17));
}

#[test]
fn change_word() {
	let mut ctl = editor_with("alpha beta gamma delta");
	feed(&mut ctl, "cw");
	assert_eq!(ctl.mode(), Mode::Insert);
	feed(&mut ctl, "x\x1b");
	assert_eq!(lines_of(&ctl), vec!["x beta gamma delta"]);
	assert_eq!(ctl.editor().cursor(), (0, 0));
	assert_eq!(ctl.mode(), Mode::Normal);
}

#[test]
fn substitute_at_line_end() {
	let mut ctl = editor_with("ab");
	feed(&mut ctl, "$s");
	assert_eq!(ctl.mode(), Mode::Insert);
	// The insert cursor stays where the deleted char was, past the new end
	assert_eq!(ctl.editor().cursor(), (0, 1));
	feed(&mut ctl, "X\x1b");
	assert_eq!(lines_of(&ctl), vec!["aX"]);
	assert_eq!(ctl.editor().cursor(), (0, 1));

	feed(&mut ctl, "$cl");
	assert_eq!(ctl.mode(), Mode::Insert);
	feed(&mut ctl, "Y\x1b");
	assert_eq!(lines_of(&ctl), vec!["aY"]);
}

#[test]
fn linewise_yank_and_paste() {
	let mut ctl = editor_with("foo\nbar");
	feed(&mut ctl, "yyjp");
	assert_eq!(lines_of(&ctl), vec!["foo", "bar", "foo"]);
	assert_eq!(ctl.editor().cursor(), (2, 0));
}

#[test]
fn undo_a_change() {
	let mut ctl = editor_with("alpha beta gamma delta");
	feed(&mut ctl, "cwx\x1b");
	assert_eq!(lines_of(&ctl), vec!["x beta gamma delta"]);

	feed(&mut ctl, "u");
	assert_eq!(lines_of(&ctl), vec!["alpha beta gamma delta"]);
	assert_eq!(ctl.editor().cursor(), (0, 0));
}

#[test]
fn repeat_reenters_insert_mode() {
	let mut ctl = editor_with("alpha beta");
	feed(&mut ctl, "cwx\x1b");
	assert_eq!(lines_of(&ctl), vec!["x beta"]);

	feed(&mut ctl, "w.");
	assert_eq!(ctl.mode(), Mode::Insert);
	feed(&mut ctl, "y\x1b");
	assert_eq!(lines_of(&ctl), vec!["x y"]);
}

#[test]
fn visual_selection_delete() {
	let mut ctl = editor_with("hello world");
	feed(&mut ctl, "vllllx");
	assert_eq!(lines_of(&ctl), vec![" world"]);
	assert_eq!(ctl.mode(), Mode::Normal);
	assert_eq!(ctl.editor().selection_anchor(), None);
	assert_eq!(ctl.editor().clipboard(), "hello");
}

#[test]
fn visual_line_yank_is_linewise() {
	let mut ctl = editor_with("one\ntwo\nthree");
	feed(&mut ctl, "Vjy");
	assert_eq!(ctl.editor().clipboard(), "one\ntwo\n");
	assert_eq!(ctl.mode(), Mode::Normal);

	feed(&mut ctl, "Gp");
	assert_eq!(lines_of(&ctl), vec!["one", "two", "three", "one", "two"]);
}

#[test]
fn inner_word_composites() {
	let mut ctl = editor_with("foo bar baz");
	feed(&mut ctl, "5l");
	assert_eq!(ctl.editor().cursor(), (0, 5));

	feed(&mut ctl, "diw");
	assert_eq!(lines_of(&ctl), vec!["foo  baz"]);

	feed(&mut ctl, "u");
	assert_eq!(lines_of(&ctl), vec!["foo bar baz"]);

	feed(&mut ctl, "ciw");
	assert_eq!(ctl.mode(), Mode::Insert);
	feed(&mut ctl, "qux\x1b");
	assert_eq!(lines_of(&ctl), vec!["foo qux baz"]);
}
