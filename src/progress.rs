//! Progress bar display for installations

use indicatif::{ProgressBar, ProgressStyle};

/// Progress display over individually-installed packages
///
/// Hidden in debug mode so the installer's inherited output stream is not
/// interleaved with bar redraws.
pub struct ProgressDisplay {
    pb: ProgressBar,
}

impl ProgressDisplay {
    pub fn new(total: u64, hidden: bool) -> Self {
        let pb = if hidden || total == 0 {
            ProgressBar::hidden()
        } else {
            let style = ProgressStyle::default_bar()
                .template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-");
            let pb = ProgressBar::new(total);
            pb.set_style(style);
            pb
        };
        Self { pb }
    }

    /// Show the package currently being installed
    pub fn update(&self, identifier: &str) {
        self.pb.set_message(identifier.to_string());
    }

    pub fn inc(&self) {
        self.pb.inc(1);
    }

    pub fn finish(&self) {
        self.pb.finish_and_clear();
    }
}
