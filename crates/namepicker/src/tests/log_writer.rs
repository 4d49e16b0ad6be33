use std::{
  io,
  sync::{Arc, Mutex},
};

/// Collects every complete log line written to it.
#[derive(Clone, Debug, Default)]
pub(super) struct VecLogWriter {
  pending: Arc<Mutex<Vec<u8>>>,
  lines: Arc<Mutex<Vec<String>>>,
}

impl VecLogWriter {
  /// Lines containing every one of `needles`.
  pub(super) fn lines_with(&self, needles: &[&str]) -> Vec<String> {
    let lines = self.lines.lock().unwrap();

    lines.iter().filter(|line| needles.iter().all(|needle| line.contains(needle))).cloned().collect()
  }
}

impl io::Write for VecLogWriter {
  fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
    let mut pending = self.pending.lock().unwrap();

    pending.extend_from_slice(buf);

    while let Some(end) = pending.iter().position(|&b| b == b'\n') {
      let line = pending.drain(..=end).collect::<Vec<u8>>();

      self.lines.lock().unwrap().push(String::from_utf8_lossy(&line).trim_end().to_string());
    }

    Ok(buf.len())
  }

  fn flush(&mut self) -> io::Result<()> {
    Ok(())
  }
}
