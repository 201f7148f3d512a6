//! Output sinks for rendered reports.

// std
use std::io::Write;
// self
use crate::_prelude::*;

/// Width of the rule printed under every report title.
pub const RULE_WIDTH: usize = 80;

/// Accepts a titled, ordered block of human-readable lines.
pub trait ReportSink
where
	Self: Send + Sync,
{
	/// Publishes one report block.
	fn publish(&self, title: &str, lines: &[String]) -> Result<()>;
}

/// Renders a report block: blank line, title, rule, one line per item, blank line.
pub fn render(title: &str, lines: &[String]) -> String {
	let mut buf = String::with_capacity(RULE_WIDTH * 2 + lines.len() * 32);

	buf.push('\n');
	buf.push_str(title);
	buf.push('\n');
	buf.push_str(&"-".repeat(RULE_WIDTH));
	buf.push('\n');

	for line in lines {
		buf.push_str(line);
		buf.push('\n');
	}

	buf.push('\n');

	buf
}

/// Sink writing rendered blocks to any [`Write`] implementation.
///
/// Each block is rendered up front and written under the lock in one call, so reports from
/// concurrent jobs never interleave.
#[derive(Debug)]
pub struct WriterSink<W> {
	writer: Mutex<W>,
}
impl<W> WriterSink<W> {
	/// Wraps `writer`.
	pub fn new(writer: W) -> Self {
		Self { writer: Mutex::new(writer) }
	}

	/// Returns the wrapped writer.
	pub fn into_inner(self) -> W {
		self.writer.into_inner()
	}
}
impl<W> ReportSink for WriterSink<W>
where
	W: Send + Write,
{
	fn publish(&self, title: &str, lines: &[String]) -> Result<()> {
		let block = render(title, lines);
		let mut writer = self.writer.lock();

		writer.write_all(block.as_bytes()).and_then(|()| writer.flush()).map_err(Error::Output)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn render_frames_lines_with_title_and_rule() {
		let block = render("Top Posts (rust)", &["(3) - a".into(), "(1) - b".into()]);

		assert_eq!(block, format!("\nTop Posts (rust)\n{}\n(3) - a\n(1) - b\n\n", "-".repeat(80)));
	}

	#[test]
	fn writer_sink_appends_blocks() {
		let sink = WriterSink::new(Vec::new());

		sink.publish("One", &[]).expect("Vec writer should accept output.");
		sink.publish("Two", &["x".into()]).expect("Vec writer should accept output.");

		let out = String::from_utf8(sink.into_inner()).expect("Output should be UTF-8.");
		let rule = "-".repeat(RULE_WIDTH);

		assert_eq!(out, format!("\nOne\n{rule}\n\n\nTwo\n{rule}\nx\n\n"));
	}
}
