//! External collaborators, passed in as a small bundle of capabilities.
//!
//! The core never reaches for globals: submitting text, launching the
//! external editor, reading settings, and observing mode changes all go
//! through `ViPorts`. Hosts fill in what they need and leave the rest.

use crate::vimode::Mode;

/// Settings the controller consults on every dispatch. Never cached.
pub trait ViSettings {
	fn style(&self) -> ViStyle {
		ViStyle::Editor
	}
	/// When true, `:` `/` `?` insert themselves instead of entering the
	/// command-line sub-mode.
	fn disable_command_mode(&self) -> bool {
		false
	}
}

/// The two supported flavors of vim behavior.
///
/// `Bash` relaxes vertical motion: `j`, `k`, `G`, `/` and `?` yield to the
/// enclosing history navigator instead of moving within the buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ViStyle {
	#[default]
	Editor,
	Bash,
}

impl ViStyle {
	pub fn as_str(self) -> &'static str {
		match self {
			ViStyle::Editor => "vim-editor",
			ViStyle::Bash => "bash-vim",
		}
	}
	/// Parse a settings value. Unknown names fall back to the default.
	pub fn from_name(name: &str) -> Self {
		match name {
			"bash-vim" => ViStyle::Bash,
			_ => ViStyle::Editor,
		}
	}
}

/// The built-in settings: `vim-editor` style, command mode enabled.
#[derive(Default)]
pub struct DefaultSettings;

impl ViSettings for DefaultSettings {}

/// Capability bundle handed to the controller at construction.
pub struct ViPorts {
	/// Invoked on Enter in insert mode with non-blank text. Absent means the
	/// enclosing prompt owns Enter entirely.
	pub submit: Option<Box<dyn FnMut(&str)>>,
	/// One-shot launch of an external editor, fired by `Ctrl+X Ctrl+E`.
	/// Fire-and-forget: the controller neither awaits nor observes failure.
	pub open_editor: Option<Box<dyn FnMut()>>,
	pub settings: Box<dyn ViSettings>,
	pub on_mode_change: Option<Box<dyn FnMut(Mode)>>,
	pub on_command_buffer_change: Option<Box<dyn FnMut(&str)>>,
}

impl Default for ViPorts {
	fn default() -> Self {
		Self {
			submit: None,
			open_editor: None,
			settings: Box::new(DefaultSettings),
			on_mode_change: None,
			on_command_buffer_change: None,
		}
	}
}

impl ViPorts {
	pub fn new() -> Self {
		Self::default()
	}
	pub fn with_submit(mut self, f: impl FnMut(&str) + 'static) -> Self {
		self.submit = Some(Box::new(f));
		self
	}
	pub fn with_open_editor(mut self, f: impl FnMut() + 'static) -> Self {
		self.open_editor = Some(Box::new(f));
		self
	}
	pub fn with_settings(mut self, settings: impl ViSettings + 'static) -> Self {
		self.settings = Box::new(settings);
		self
	}
	pub fn with_mode_observer(mut self, f: impl FnMut(Mode) + 'static) -> Self {
		self.on_mode_change = Some(Box::new(f));
		self
	}
	pub fn with_command_buffer_observer(mut self, f: impl FnMut(&str) + 'static) -> Self {
		self.on_command_buffer_change = Some(Box::new(f));
		self
	}

	pub(crate) fn has_submit(&self) -> bool {
		self.submit.is_some()
	}
	pub(crate) fn submit(&mut self, text: &str) {
		if let Some(f) = self.submit.as_mut() {
			f(text);
		}
	}
	pub(crate) fn open_editor(&mut self) {
		if let Some(f) = self.open_editor.as_mut() {
			f();
		}
	}
	pub(crate) fn style(&self) -> ViStyle {
		self.settings.style()
	}
	pub(crate) fn command_mode_disabled(&self) -> bool {
		self.settings.disable_command_mode()
	}
	pub(crate) fn notify_mode(&mut self, mode: Mode) {
		if let Some(f) = self.on_mode_change.as_mut() {
			f(mode);
		}
	}
	pub(crate) fn notify_command_buffer(&mut self, text: &str) {
		if let Some(f) = self.on_command_buffer_change.as_mut() {
			f(text);
		}
	}
}
