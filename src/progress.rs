use ogc_core::gateways::progress::ProgressReporter;
use std::io::{self, Write};

const BAR_WIDTH: usize = 28;

/// Renders a single, continuously updated progress line.
#[derive(Debug)]
pub struct ProgressBar<W> {
    prefix: String,
    out: W,
}

impl ProgressBar<io::Stdout> {
    pub fn stdout(prefix: impl Into<String>) -> Self {
        Self::new(prefix, io::stdout())
    }
}

impl<W: Write> ProgressBar<W> {
    pub fn new(prefix: impl Into<String>, out: W) -> Self {
        let prefix = prefix.into();
        Self { prefix, out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

fn render(prefix: &str, current: usize, total: usize) -> String {
    let ratio = current as f64 / total as f64;
    let filled = ((BAR_WIDTH as f64 * ratio) as usize).min(BAR_WIDTH);
    let bar = format!("{}{}", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled));
    let pct = ratio * 100.0;
    format!("\r{prefix}: [{bar}] {current}/{total} ({pct:5.1}%)")
}

impl<W: Write> ProgressReporter for ProgressBar<W> {
    fn report(&mut self, current: usize, total: usize) {
        if total == 0 {
            return;
        }
        let mut line = render(&self.prefix, current, total);
        if current >= total {
            line.push('\n');
        }
        if let Err(err) = self
            .out
            .write_all(line.as_bytes())
            .and_then(|_| self.out.flush())
        {
            log::debug!("Unable to render progress: {err}");
        }
    }
}
