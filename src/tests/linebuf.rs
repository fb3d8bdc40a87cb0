use pretty_assertions::assert_eq;

use crate::linebuf::LineBuf;
use crate::vicmd::{Anchor, Dest, Direction, Motion, MotionCmd, MoveDir, SelectKind, To, Verb, VerbCmd};

fn buf(text: &str) -> LineBuf {
	let mut buf = LineBuf::new().with_initial(text);
	buf.set_cursor(0, 0);
	buf
}

fn motion(buf: &mut LineBuf, count: usize, motion: Motion) -> bool {
	buf.exec_motion(&MotionCmd(count, motion))
}

fn verb(buf: &mut LineBuf, count: usize, verb: Verb) -> bool {
	buf.exec_verb(&VerbCmd(count, verb))
}

#[test]
fn fresh_buffer_is_a_single_empty_line() {
	let buf = LineBuf::new();
	assert_eq!(buf.lines(), &[String::new()]);
	assert_eq!(buf.cursor(), (0, 0));
	assert!(buf.is_blank());
}

#[test]
fn replace_range_splices_multiline_text() {
	let mut buf = buf("hello world");
	buf.replace_range(0, 5, 0, 5, " big\nbrave");
	assert_eq!(buf.lines(), &["hello big".to_string(), "brave world".to_string()]);
	// Cursor rests at the end of the inserted text
	assert_eq!(buf.cursor(), (1, 5));
}

#[test]
fn replace_range_preserves_nonempty_invariant() {
	let mut buf = buf("only");
	buf.replace_range(0, 0, 0, 4, "");
	assert_eq!(buf.lines(), &[String::new()]);
	assert_eq!(buf.cursor(), (0, 0));
}

#[test]
fn motion_left_wraps_to_previous_line() {
	let mut b = buf("abc\ndef");
	b.set_cursor(1, 0);
	motion(&mut b, 1, Motion::BackwardChar);
	assert_eq!(b.cursor(), (0, 2));
}

#[test]
fn motion_right_wraps_and_skips_combining_marks() {
	// a, e, combining acute, b
	let mut b = buf("ae\u{301}b");
	motion(&mut b, 1, Motion::ForwardChar);
	assert_eq!(b.cursor(), (0, 1));
	motion(&mut b, 1, Motion::ForwardChar);
	// The cursor never rests on the zero-width scalar
	assert_eq!(b.cursor(), (0, 3));
}

#[test]
fn vertical_motion_keeps_preferred_col() {
	let mut b = buf("alpha beta\nx\ngamma delta");
	b.set_cursor(0, 8);
	motion(&mut b, 1, Motion::LineDown);
	assert_eq!(b.cursor(), (1, 0));
	assert_eq!(b.preferred_col(), Some(8));
	motion(&mut b, 1, Motion::LineDown);
	assert_eq!(b.cursor(), (2, 8));
	motion(&mut b, 2, Motion::LineUp);
	assert_eq!(b.cursor(), (0, 8));
}

#[test]
fn preferred_col_resets_on_horizontal_motion() {
	let mut b = buf("alpha\nbet");
	b.set_cursor(0, 4);
	motion(&mut b, 1, Motion::LineDown);
	assert_eq!(b.preferred_col(), Some(4));
	motion(&mut b, 1, Motion::BackwardChar);
	assert_eq!(b.preferred_col(), None);
}

#[test]
fn word_motions_cross_lines() {
	let mut b = buf("foo bar\nbaz");
	motion(&mut b, 2, Motion::WordMotion(To::Start, Direction::Forward));
	assert_eq!(b.cursor(), (1, 0));
	motion(&mut b, 1, Motion::WordMotion(To::Start, Direction::Backward));
	assert_eq!(b.cursor(), (0, 4));
	motion(&mut b, 1, Motion::WordMotion(To::End, Direction::Forward));
	assert_eq!(b.cursor(), (0, 6));
}

#[test]
fn word_motion_treats_symbol_runs_as_words() {
	let mut b = buf("foo.bar");
	motion(&mut b, 1, Motion::WordMotion(To::Start, Direction::Forward));
	assert_eq!(b.cursor(), (0, 3));
	motion(&mut b, 1, Motion::WordMotion(To::Start, Direction::Forward));
	assert_eq!(b.cursor(), (0, 4));
}

#[test]
fn motions_never_touch_text_or_clipboard() {
	let mut b = buf("foo bar\nbaz");
	b.set_clipboard("held");
	for m in [
		Motion::ForwardChar,
		Motion::LineDown,
		Motion::WordMotion(To::Start, Direction::Forward),
		Motion::EndOfLine,
		Motion::EndOfBuffer,
		Motion::ToDelimMatch,
		Motion::CharSearch(Direction::Forward, Dest::On, 'z'),
	] {
		motion(&mut b, 1, m);
		assert_eq!(b.lines(), &["foo bar".to_string(), "baz".to_string()]);
		assert_eq!(b.clipboard(), "held");
		assert_eq!(b.undo_depth(), 0);
	}
}

#[test]
fn char_search_exclusive_stops_short() {
	let mut b = buf("abcdefc");
	motion(&mut b, 1, Motion::CharSearch(Direction::Forward, Dest::On, 'c'));
	assert_eq!(b.cursor(), (0, 2));
	motion(&mut b, 1, Motion::CharSearch(Direction::Forward, Dest::Before, 'c'));
	assert_eq!(b.cursor(), (0, 5));
	motion(&mut b, 1, Motion::CharSearch(Direction::Backward, Dest::Before, 'a'));
	assert_eq!(b.cursor(), (0, 1));
}

#[test]
fn char_search_missing_target_is_a_noop() {
	let mut b = buf("abc");
	assert!(!motion(&mut b, 1, Motion::CharSearch(Direction::Forward, Dest::On, 'z')));
	assert_eq!(b.cursor(), (0, 0));
}

#[test]
fn delim_match_forward_and_backward() {
	let mut b = buf("foo(bar[baz])");
	motion(&mut b, 1, Motion::ToDelimMatch);
	assert_eq!(b.cursor(), (0, 12));
	motion(&mut b, 1, Motion::ToDelimMatch);
	assert_eq!(b.cursor(), (0, 3));
}

#[test]
fn delim_match_crosses_lines() {
	let mut b = buf("{\n  a\n}");
	motion(&mut b, 1, Motion::ToDelimMatch);
	assert_eq!(b.cursor(), (2, 0));
}

#[test]
fn delim_match_without_bracket_is_a_noop() {
	let mut b = buf("plain text");
	assert!(!motion(&mut b, 1, Motion::ToDelimMatch));
	assert_eq!(b.cursor(), (0, 0));
}

#[test]
fn search_wraps_and_next_match_follows_direction() {
	let mut b = buf("foo bar foo bar");
	motion(&mut b, 1, Motion::PatternSearch("foo".into(), Direction::Forward));
	assert_eq!(b.cursor(), (0, 8));
	motion(&mut b, 1, Motion::NextMatch);
	assert_eq!(b.cursor(), (0, 0));
}

#[test]
fn prev_match_reverses_the_stored_direction() {
	let mut b = buf("foo bar foo bar");
	motion(&mut b, 1, Motion::PatternSearch("foo".into(), Direction::Forward));
	assert_eq!(b.cursor(), (0, 8));
	// The stored direction is forward, so this searches backward
	motion(&mut b, 1, Motion::PrevMatch);
	assert_eq!(b.cursor(), (0, 0));
	// And the stored direction is left intact for the next `n`
	motion(&mut b, 1, Motion::NextMatch);
	assert_eq!(b.cursor(), (0, 8));
}

#[test]
fn prev_match_after_backward_search_goes_forward() {
	let mut b = buf("abc abc abc");
	b.set_cursor(0, 10);
	motion(&mut b, 1, Motion::PatternSearch("abc".into(), Direction::Backward));
	assert_eq!(b.cursor(), (0, 8));
	motion(&mut b, 1, Motion::PrevMatch);
	// Reversed: forward from col 8 wraps over the end to col 0
	assert_eq!(b.cursor(), (0, 0));
}

#[test]
fn empty_search_is_a_noop() {
	let mut b = buf("foo");
	assert!(!motion(&mut b, 1, Motion::PatternSearch(String::new(), Direction::Forward)));
	assert!(b.last_search().is_none());
}

#[test]
fn delete_char_clamps_and_yanks() {
	let mut b = buf("abc");
	verb(&mut b, 10, Verb::DeleteChar);
	assert_eq!(b.lines(), &[String::new()]);
	assert_eq!(b.clipboard(), "abc");
}

#[test]
fn change_move_right_keeps_the_insert_column() {
	let mut b = buf("ab");
	b.set_cursor(0, 1);
	verb(&mut b, 1, Verb::ChangeMove(MoveDir::Right));
	assert_eq!(b.lines(), &["a".to_string()]);
	// No normal-mode clamp: typing resumes where the char was deleted
	assert_eq!(b.cursor(), (0, 1));

	// The delete flavor of the same span does clamp
	let mut b = buf("ab");
	b.set_cursor(0, 1);
	verb(&mut b, 1, Verb::DeleteMove(MoveDir::Right));
	assert_eq!(b.lines(), &["a".to_string()]);
	assert_eq!(b.cursor(), (0, 0));
}

#[test]
fn delete_char_at_line_end_is_a_noop() {
	let mut b = buf("");
	assert!(!verb(&mut b, 1, Verb::DeleteChar));
	assert_eq!(b.undo_depth(), 0);
}

#[test]
fn delete_line_keeps_the_buffer_nonempty() {
	let mut b = buf("only line");
	verb(&mut b, 1, Verb::DeleteLine);
	assert_eq!(b.lines(), &[String::new()]);
	assert_eq!(b.cursor(), (0, 0));
	assert_eq!(b.clipboard(), "only line\n");
}

#[test]
fn delete_line_count_overshoot_is_clamped() {
	let mut b = buf("a\nb\nc");
	b.set_cursor(1, 0);
	verb(&mut b, 10, Verb::DeleteLine);
	assert_eq!(b.lines(), &["a".to_string()]);
	assert_eq!(b.cursor(), (0, 0));
	assert_eq!(b.clipboard(), "b\nc\n");
}

#[test]
fn undo_restores_the_full_snapshot() {
	let mut b = buf("alpha beta");
	b.set_clipboard("before");
	b.set_cursor(0, 6);
	let lines = b.lines().to_vec();
	let cursor = b.cursor();

	verb(&mut b, 1, Verb::DeleteWord(Direction::Forward));
	assert_eq!(b.lines(), &["alpha ".to_string()]);
	assert_eq!(b.clipboard(), "beta");

	verb(&mut b, 1, Verb::Undo);
	assert_eq!(b.lines(), &lines);
	assert_eq!(b.cursor(), cursor);
	assert_eq!(b.clipboard(), "before");
}

#[test]
fn undo_on_empty_stack_is_a_noop() {
	let mut b = buf("text");
	assert!(!verb(&mut b, 1, Verb::Undo));
	assert_eq!(b.lines(), &["text".to_string()]);
}

#[test]
fn noop_mutations_push_nothing() {
	let mut b = buf("abc");
	b.set_cursor(0, 0);
	assert!(!verb(&mut b, 1, Verb::DeleteCharBefore));
	assert!(!verb(&mut b, 1, Verb::DeleteToLineStart));
	assert!(!verb(&mut b, 1, Verb::JoinLines));
	assert_eq!(b.undo_depth(), 0);
}

#[test]
fn toggle_case_twice_is_identity() {
	let mut b = buf("Hello, World");
	verb(&mut b, 12, Verb::ToggleCase);
	assert_eq!(b.lines(), &["hELLO, wORLD".to_string()]);
	b.set_cursor(0, 0);
	verb(&mut b, 12, Verb::ToggleCase);
	assert_eq!(b.lines(), &["Hello, World".to_string()]);
}

#[test]
fn toggle_case_advances_and_clamps_the_cursor() {
	let mut b = buf("ab");
	verb(&mut b, 5, Verb::ToggleCase);
	assert_eq!(b.lines(), &["AB".to_string()]);
	assert_eq!(b.cursor(), (0, 1));
}

#[test]
fn replace_char_is_a_noop_at_line_end() {
	let mut b = buf("");
	assert!(!verb(&mut b, 1, Verb::ReplaceChar('x')));

	let mut b = buf("abc");
	verb(&mut b, 1, Verb::ReplaceChar('z'));
	assert_eq!(b.lines(), &["zbc".to_string()]);
	assert_eq!(b.cursor(), (0, 0));
}

#[test]
fn open_line_above_pins_cursor_to_the_new_row() {
	let mut b = buf("one\ntwo");
	b.set_cursor(1, 2);
	verb(&mut b, 1, Verb::OpenLineAbove);
	assert_eq!(b.lines(), &["one".to_string(), String::new(), "two".to_string()]);
	assert_eq!(b.cursor(), (1, 0));
}

#[test]
fn open_line_below_lands_on_the_fresh_line() {
	let mut b = buf("one\ntwo");
	verb(&mut b, 1, Verb::OpenLineBelow);
	assert_eq!(b.lines(), &["one".to_string(), String::new(), "two".to_string()]);
	assert_eq!(b.cursor(), (1, 0));
}

#[test]
fn charwise_paste_lands_after_or_on_the_cursor() {
	let mut b = buf("ad");
	b.set_clipboard("bc");
	verb(&mut b, 1, Verb::Put(Anchor::After));
	assert_eq!(b.lines(), &["abcd".to_string()]);
	assert_eq!(b.cursor(), (0, 2));

	let mut b = buf("ad");
	b.set_clipboard("bc");
	verb(&mut b, 1, Verb::Put(Anchor::Before));
	assert_eq!(b.lines(), &["bcad".to_string()]);
}

#[test]
fn linewise_paste_inserts_whole_lines() {
	let mut b = buf("top\nbottom");
	b.set_clipboard("mid\n");
	verb(&mut b, 1, Verb::Put(Anchor::After));
	assert_eq!(b.lines(), &["top".to_string(), "mid".to_string(), "bottom".to_string()]);
	assert_eq!(b.cursor(), (1, 0));

	verb(&mut b, 1, Verb::Put(Anchor::Before));
	assert_eq!(
		b.lines(),
		&["top".to_string(), "mid".to_string(), "mid".to_string(), "bottom".to_string()]
	);
}

#[test]
fn paste_with_empty_clipboard_is_a_noop() {
	let mut b = buf("text");
	assert!(!verb(&mut b, 1, Verb::Put(Anchor::After)));
}

#[test]
fn yank_then_paste_reproduces_the_selection() {
	let mut b = buf("hello world");
	b.start_selection();
	b.set_cursor(0, 4);
	verb(&mut b, 1, Verb::YankSelection(SelectKind::Char));
	assert_eq!(b.clipboard(), "hello");
	assert_eq!(b.cursor(), (0, 0));

	verb(&mut b, 1, Verb::Put(Anchor::Before));
	assert_eq!(b.lines(), &["hellohello world".to_string()]);
}

#[test]
fn inner_word_range_is_cursor_position_independent() {
	let mut b = buf("foo  bar!baz");
	// Both columns of the whitespace run yield the same range
	for col in [3, 4] {
		b.set_cursor(0, col);
		assert_eq!(b.inner_word_range(), Some((3, 4)));
	}
	// And every column of a word run agrees
	for col in [5, 6, 7] {
		b.set_cursor(0, col);
		assert_eq!(b.inner_word_range(), Some((5, 7)));
	}
	// The bang is its own run, separated from the spaces by "bar"
	b.set_cursor(0, 8);
	assert_eq!(b.inner_word_range(), Some((8, 8)));
}

#[test]
fn inner_word_on_empty_line_is_none() {
	let b = buf("");
	assert_eq!(b.inner_word_range(), None);
}

#[test]
fn delete_to_line_start_behaves_like_ctrl_u() {
	let mut b = buf("prompt text");
	b.set_cursor(0, 7);
	verb(&mut b, 1, Verb::DeleteToLineStart);
	assert_eq!(b.lines(), &["text".to_string()]);
	assert_eq!(b.cursor(), (0, 0));
}

#[test]
fn join_lines_inserts_a_single_space() {
	let mut b = buf("foo\n   bar\nbaz");
	verb(&mut b, 1, Verb::JoinLines);
	assert_eq!(b.lines(), &["foo bar".to_string(), "baz".to_string()]);
	assert_eq!(b.cursor(), (0, 3));
}

#[test]
fn undo_stack_is_bounded() {
	let mut b = buf("");
	for _ in 0..150 {
		b.exec_verb(&VerbCmd(1, Verb::OpenLineBelow));
	}
	assert_eq!(b.undo_depth(), 100);
}

#[test]
fn delete_back_joins_lines_at_column_zero() {
	let mut b = buf("ab\ncd");
	b.set_cursor(1, 0);
	verb(&mut b, 1, Verb::DeleteBack);
	assert_eq!(b.lines(), &["abcd".to_string()]);
	assert_eq!(b.cursor(), (0, 2));
}
