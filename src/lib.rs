//! `viline` is a Vim-flavored modal editing engine for interactive terminal
//! prompts.
//!
//! It brings operator-motion composites, counts, find/replace, undo, yank and
//! paste, visual selection and a `:`/`/`/`?` command line to a line-structured
//! input buffer, without owning the terminal: rendering, key decoding from
//! escape sequences, and submission all belong to the host.
//!
//! ### High-level structure:
//! 1. Raw input is normalized into [`keys::KeyEvent`]s
//! 2. The [`vimode::ViController`] state machine parses keystrokes into
//!    motions and verbs
//! 3. [`linebuf::LineBuf`] executes them against the buffer, with cursor
//!    arithmetic done entirely in Unicode code points
//!
//! A [`history::History`] navigator sits beside the controller at the prompt
//! level and walks previously submitted entries without losing the draft.

pub mod chars;
pub mod history;
pub mod keys;
pub mod linebuf;
pub mod ports;
pub mod vicmd;
pub mod vimode;
#[cfg(test)]
pub mod tests;

pub use history::History;
pub use keys::{KeyCode, KeyEvent, ModKeys};
pub use linebuf::LineBuf;
pub use ports::{DefaultSettings, ViPorts, ViSettings, ViStyle};
pub use vimode::{Mode, ViController};
