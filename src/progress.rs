use std::io::{self, IsTerminal, Write};
use std::time::{Duration, Instant};

/// Observer for a run. Reporting never influences resolution.
pub trait Progress {
    fn start(&mut self, total: usize);
    fn advance(&mut self, position: usize, current: &str);
    fn finish(&mut self);
}

/// Reports nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl Progress for Silent {
    fn start(&mut self, _total: usize) {}
    fn advance(&mut self, _position: usize, _current: &str) {}
    fn finish(&mut self) {}
}

const WIDTH: usize = 40;

/// A single line bar on stderr showing how far through the input we are and
/// the identifier being resolved. Cleared when the run finishes, leaving the
/// elapsed time behind.
#[derive(Debug)]
pub struct ProgressBar {
    total: usize,
    started: Option<Instant>,
    enabled: bool,
}

impl ProgressBar {
    /// Draws only when stderr is a terminal.
    pub fn stderr() -> Self {
        Self {
            total: 0,
            started: None,
            enabled: io::stderr().is_terminal(),
        }
    }

    fn draw(&self, position: usize, current: &str) {
        let filled = if self.total == 0 {
            WIDTH
        } else {
            position * WIDTH / self.total
        };
        let percent = if self.total == 0 {
            100
        } else {
            position * 100 / self.total
        };
        let mut stderr = io::stderr().lock();
        let _ = write!(
            stderr,
            "\r\x1b[2K{} {:>3}% [{}{}] ({}/{})",
            current,
            percent,
            "=".repeat(filled),
            " ".repeat(WIDTH - filled),
            position,
            self.total
        );
        let _ = stderr.flush();
    }
}

impl Progress for ProgressBar {
    fn start(&mut self, total: usize) {
        self.total = total;
        self.started = Some(Instant::now());
        if self.enabled {
            self.draw(0, "");
        }
    }

    fn advance(&mut self, position: usize, current: &str) {
        if self.enabled {
            self.draw(position.min(self.total), current);
        }
    }

    fn finish(&mut self) {
        if !self.enabled {
            return;
        }
        let elapsed = self
            .started
            .map(|started| started.elapsed())
            .unwrap_or(Duration::ZERO);
        let mut stderr = io::stderr().lock();
        let _ = writeln!(stderr, "\r\x1b[2K[{:.1}s]", elapsed.as_secs_f64());
        let _ = stderr.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_bar_is_inert() {
        let mut bar = ProgressBar {
            total: 0,
            started: None,
            enabled: false,
        };
        bar.start(3);
        bar.advance(5, "example.com");
        bar.finish();
        assert_eq!(bar.total, 3);
        assert!(bar.started.is_some());
    }
}
