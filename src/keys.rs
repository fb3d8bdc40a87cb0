//! Key events, normalized from raw terminal input.
//!
//! The controller never sees escape sequences or raw control bytes. Everything
//! is folded into a `KeyEvent` here first.

use std::sync::Arc;

use log::debug;
use unicode_segmentation::UnicodeSegmentation;

// Credit to Rustyline for the design ideas in this module
// https://github.com/kkawakam/rustyline
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct KeyEvent(pub KeyCode, pub ModKeys);

impl KeyEvent {
	/// Normalize a single raw grapheme into a key event.
	///
	/// C0 control bytes become Ctrl-chords, e.g. `\x17` is Ctrl+W. Input that
	/// does not describe a single key degrades to `KeyCode::Null`, which the
	/// controller treats as not-vim and passes through.
	pub fn new(raw: &str, mut mods: ModKeys) -> Self {
		use {KeyCode as K, KeyEvent as E, ModKeys as M};

		let mut graphemes = raw.graphemes(true);
		let Some(first) = graphemes.next() else {
			debug!("empty key input, treating as null key");
			return E(K::Null, mods)
		};
		if graphemes.next().is_some() {
			debug!("multi-grapheme key input {raw:?}, treating as null key");
			return E(K::Null, mods)
		}

		let mut chars = first.chars();
		let head = chars.next();
		let is_single_char = chars.next().is_none();

		match head {
			Some(c) if is_single_char && c.is_control() => match c {
				'\x08' | '\x7f' => E(K::Backspace, mods),
				'\x09' => {
					if mods.contains(M::SHIFT) {
						mods.remove(M::SHIFT);
						E(K::BackTab, mods)
					} else {
						E(K::Tab, mods)
					}
				}
				'\x0a' | '\x0d' => E(K::Enter, mods),
				'\x1b' => E(K::Esc, mods),
				c @ '\x00'..='\x1f' => {
					// The remaining C0 bytes are their chord letter minus 0x40
					let chord = ((c as u8) + 0x40) as char;
					E(K::Char(chord), mods | M::CTRL)
				}
				_ => {
					debug!("unrecognised control input {c:?}, treating as null key");
					E(K::Null, mods)
				}
			},
			Some(c) if is_single_char => {
				// Shift is already baked into the character itself
				mods.remove(M::SHIFT);
				E(K::Char(c), mods)
			}
			_ => {
				// Multi-scalar grapheme (emoji, base char + combining marks)
				mods.remove(M::SHIFT);
				E(K::Grapheme(Arc::from(first)), mods)
			}
		}
	}

	pub fn code(&self) -> &KeyCode {
		&self.0
	}

	pub fn mods(&self) -> ModKeys {
		self.1
	}

	/// True if this key would insert text when typed in insert mode:
	/// a plain character or grapheme without Ctrl/Alt chording.
	pub fn is_insertable(&self) -> bool {
		matches!(self.0, KeyCode::Char(_) | KeyCode::Grapheme(_))
			&& !self.1.intersects(ModKeys::CTRL | ModKeys::ALT)
	}

	/// True if this key arrived inside a bracketed paste.
	pub fn is_paste(&self) -> bool {
		self.1.contains(ModKeys::PASTE)
	}
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum KeyCode {
	Backspace,
	BackTab,
	Char(char),
	Grapheme(Arc<str>),
	Delete,
	Down,
	End,
	Enter,
	Esc,
	Home,
	Left,
	Null,
	Right,
	Tab,
	Up,
}

bitflags::bitflags! {
	#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
	pub struct ModKeys: u8 {
		/// Control modifier
		const CTRL = 1<<3;
		/// Escape or Alt modifier
		const ALT = 1<<2;
		/// Shift modifier
		const SHIFT = 1<<1;
		/// Delivered inside a bracketed paste
		const PASTE = 1<<0;

		/// No modifier
		const NONE = 0;
	}
}
