//! Progress reporting for archive runs

use colored::Colorize;
use harvest_application::ArchiveProgress;
use harvest_domain::{LoginStage, RecordId};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Reports progress with a spinner while logging in and discovering, then a
/// bar while invoices are retrieved
pub struct ProgressReporter {
    multi: MultiProgress,
    spinner: Mutex<Option<ProgressBar>>,
    bar: Mutex<Option<ProgressBar>>,
    found: AtomicUsize,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            spinner: Mutex::new(None),
            bar: Mutex::new(None),
            found: AtomicUsize::new(0),
        }
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    /// Update the spinner, creating it on first use
    fn spin(&self, prefix: &str, message: String) {
        let Ok(mut spinner) = self.spinner.lock() else {
            return;
        };
        let pb = spinner.get_or_insert_with(|| {
            let pb = self.multi.add(ProgressBar::new_spinner());
            pb.set_style(Self::spinner_style());
            pb.enable_steady_tick(Duration::from_millis(120));
            pb
        });
        pb.set_prefix(prefix.to_string());
        pb.set_message(message);
    }

    fn stage_message(stage: LoginStage) -> &'static str {
        match stage {
            LoginStage::Unknown => "Opening store...",
            LoginStage::CheckingExisting => "Checking for an existing session...",
            LoginStage::AlreadyAuthenticated => "Reusing existing session",
            LoginStage::AwaitingUsername => "Entering username...",
            LoginStage::AwaitingPassword => "Entering password...",
            LoginStage::AwaitingOneTimeCode => "Entering one-time code...",
            LoginStage::Authenticated => "Signed in",
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveProgress for ProgressReporter {
    fn on_login_stage(&self, stage: LoginStage) {
        self.spin("Login", Self::stage_message(stage).to_string());
    }

    fn on_order_group(&self, name: &str) {
        self.spin(
            "Discovery",
            format!("{} ({} new)", name, self.found.load(Ordering::Relaxed)),
        );
    }

    fn on_record_found(&self, id: &RecordId) {
        let found = self.found.fetch_add(1, Ordering::Relaxed) + 1;
        self.spin("Discovery", format!("{} ({} new)", id, found));
    }

    fn on_discovery_complete(&self, total: usize) {
        if let Ok(mut spinner) = self.spinner.lock() {
            if let Some(pb) = spinner.take() {
                pb.finish_with_message(format!("{} new invoice(s)", total.to_string().green()));
            }
        }
        if total == 0 {
            return;
        }

        let pb = self.multi.add(ProgressBar::new(total as u64));
        pb.set_style(Self::bar_style());
        pb.set_prefix("Retrieval");
        pb.set_message("Starting...");
        if let Ok(mut bar) = self.bar.lock() {
            *bar = Some(pb);
        }
    }

    fn on_record_start(&self, id: &RecordId) {
        if let Ok(bar) = self.bar.lock() {
            if let Some(pb) = bar.as_ref() {
                pb.set_message(id.to_string());
            }
        }
    }

    fn on_record_written(&self, id: &RecordId, _path: &Path) {
        let Ok(mut bar) = self.bar.lock() else {
            return;
        };
        if let Some(pb) = bar.as_ref() {
            pb.set_message(format!("{} {}", "v".green(), id));
            pb.inc(1);
            if pb.length().is_some_and(|len| pb.position() >= len) {
                pb.finish_with_message(format!("{}", "complete!".green()));
                *bar = None;
            }
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl ArchiveProgress for SimpleProgress {
    fn on_login_stage(&self, stage: LoginStage) {
        if matches!(
            stage,
            LoginStage::AlreadyAuthenticated | LoginStage::Authenticated
        ) {
            println!("{} {}", "->".cyan(), ProgressReporter::stage_message(stage).bold());
        }
    }

    fn on_order_group(&self, name: &str) {
        println!("{} Order group {}", "->".cyan(), name.bold());
    }

    fn on_discovery_complete(&self, total: usize) {
        println!("{} {} new invoice(s)", "->".cyan(), total.to_string().bold());
    }

    fn on_record_start(&self, _id: &RecordId) {}

    fn on_record_written(&self, _id: &RecordId, path: &Path) {
        println!("  {} {}", "v".green(), path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indicatif::ProgressDrawTarget;

    fn hidden_reporter() -> ProgressReporter {
        let reporter = ProgressReporter::new();
        reporter.multi.set_draw_target(ProgressDrawTarget::hidden());
        reporter
    }

    #[test]
    fn test_bar_tracks_written_records() {
        let reporter = hidden_reporter();
        let a = RecordId::parse("111-1").unwrap();
        let b = RecordId::parse("111-2").unwrap();

        reporter.on_login_stage(LoginStage::AlreadyAuthenticated);
        reporter.on_record_found(&a);
        reporter.on_record_found(&b);
        assert_eq!(reporter.found.load(Ordering::Relaxed), 2);

        reporter.on_discovery_complete(2);
        assert!(reporter.spinner.lock().unwrap().is_none());

        reporter.on_record_start(&a);
        reporter.on_record_written(&a, Path::new("/out/111-1.html"));
        let position = reporter.bar.lock().unwrap().as_ref().map(|pb| pb.position());
        assert_eq!(position, Some(1));

        reporter.on_record_written(&b, Path::new("/out/111-2.html"));
        assert!(reporter.bar.lock().unwrap().is_none());
    }

    #[test]
    fn test_empty_discovery_has_no_bar() {
        let reporter = hidden_reporter();
        reporter.on_discovery_complete(0);
        assert!(reporter.bar.lock().unwrap().is_none());
    }
}
