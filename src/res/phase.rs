/// Sequential stages of a document conversion. There are no backward transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
	/// Nothing processed yet.
	Start,
	/// File prologue.
	Header,
	/// String pool.
	StringTable,
	/// External resource descriptors.
	ExternalTable,
	/// Internal resource descriptors.
	InternalTable,
	/// Materialised resource body.
	ResourceBody,
	/// Closing `RSRC` sentinel.
	TrailingSentinel,
	/// Conversion finished.
	Done,
}

impl Phase {
	/// Following phase; `Done` is terminal.
	pub fn next(self) -> Self {
		match self {
			Self::Start => Self::Header,
			Self::Header => Self::StringTable,
			Self::StringTable => Self::ExternalTable,
			Self::ExternalTable => Self::InternalTable,
			Self::InternalTable => Self::ResourceBody,
			Self::ResourceBody => Self::TrailingSentinel,
			Self::TrailingSentinel | Self::Done => Self::Done,
		}
	}

	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Start => "start",
			Self::Header => "header",
			Self::StringTable => "string_table",
			Self::ExternalTable => "external_table",
			Self::InternalTable => "internal_table",
			Self::ResourceBody => "resource_body",
			Self::TrailingSentinel => "trailing_sentinel",
			Self::Done => "done",
		}
	}
}

/// Tracks the current phase of one conversion call.
#[derive(Debug)]
pub(crate) struct PhaseTracker {
	current: Phase,
	trace: bool,
	direction: &'static str,
}

impl PhaseTracker {
	pub(crate) fn new(direction: &'static str, trace: bool) -> Self {
		Self {
			current: Phase::Start,
			trace,
			direction,
		}
	}

	pub(crate) fn current(&self) -> Phase {
		self.current
	}

	/// Step to the next phase, recording the byte offset it starts at.
	pub(crate) fn advance(&mut self, offset: usize) -> Phase {
		self.current = self.current.next();
		if self.trace {
			tracing::trace!(direction = self.direction, phase = self.current.as_str(), offset, "enter phase");
		}
		self.current
	}

	/// Step forward and assert the orchestrator landed on `expected`.
	pub(crate) fn enter(&mut self, expected: Phase, offset: usize) {
		let reached = self.advance(offset);
		debug_assert_eq!(reached, expected, "{} phases must run in order", self.direction);
	}
}
