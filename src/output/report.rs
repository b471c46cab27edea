//! Feed run summaries

use crate::feed::FeedRunReport;
use crate::storage::RunRecord;
use std::fmt;

/// Formats the outcome of one feed run
pub fn format_run_report(report: &FeedRunReport) -> String {
    RunReport(report).to_string()
}

/// Formats recorded runs, one line each
pub fn format_runs(runs: &[RunRecord]) -> String {
    RunListing(runs).to_string()
}

struct RunReport<'a>(&'a FeedRunReport);

impl fmt::Display for RunReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        writeln!(f, "=== Feed Run ===")?;
        writeln!(f, "  Feed: {}", report.feed_url)?;
        writeln!(f, "  Site: {}", report.site_name)?;
        writeln!(f, "  Entries seen: {}", report.entries_seen)?;
        writeln!(f, "  Articles saved: {}", report.articles_saved)?;
        if report.articles_failed > 0 {
            writeln!(f, "  Articles failed: {}", report.articles_failed)?;
        }
        Ok(())
    }
}

struct RunListing<'a>(&'a [RunRecord]);

impl fmt::Display for RunListing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Recent Runs ({}) ===", self.0.len())?;

        for run in self.0 {
            writeln!(
                f,
                "  #{} {} [{}] {} {}/{} saved ({} failed)",
                run.id,
                run.started_at,
                run.status.to_db_string(),
                run.site_name,
                run.articles_saved,
                run.entries_seen,
                run.articles_failed
            )?;
        }

        Ok(())
    }
}

/// Prints the outcome of one feed run to stdout
pub fn print_run_report(report: &FeedRunReport) {
    print!("{}", format_run_report(report));
}

/// Prints recorded runs to stdout
pub fn print_runs(runs: &[RunRecord]) {
    print!("{}", format_runs(runs));
}
