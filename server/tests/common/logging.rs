//! Capture of CEF audit events
//!
//! Installs a thread-local subscriber that keeps only the `cef` target, so
//! tests can check which audit events a request produced.

use std::io;
use std::sync::{Arc, Mutex};

use tracing::subscriber::DefaultGuard;
use tracing_subscriber::{EnvFilter, fmt::MakeWriter};

#[derive(Clone, Default)]
pub struct CefCapture(Arc<Mutex<Vec<u8>>>);

impl CefCapture {
	/// Captures audit events of the current thread until the guard is dropped
	pub fn install() -> (Self, DefaultGuard) {
		let capture = Self::default();
		let subscriber = tracing_subscriber::fmt()
			.with_writer(capture.clone())
			.with_env_filter(EnvFilter::new("cef=warn"))
			.with_ansi(false)
			.finish();
		let guard = tracing::subscriber::set_default(subscriber);
		(capture, guard)
	}

	/// Captured CEF lines, oldest first
	pub fn events(&self) -> Vec<String> {
		let buf = self.0.lock().expect("Capture lock poisoned");
		String::from_utf8_lossy(&buf)
			.lines()
			.filter_map(|line| line.find("CEF:0|").map(|start| line[start..].to_owned()))
			.collect()
	}
}

impl io::Write for CefCapture {
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		self.0.lock().expect("Capture lock poisoned").extend_from_slice(buf);
		Ok(buf.len())
	}

	fn flush(&mut self) -> io::Result<()> {
		Ok(())
	}
}

impl<'a> MakeWriter<'a> for CefCapture {
	type Writer = CefCapture;

	fn make_writer(&'a self) -> Self::Writer {
		self.clone()
	}
}

// vim: ts=4
