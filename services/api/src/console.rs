use crate::infra::{import_roster, roster_path};
use callup::admission::report::{ReportData, ReportFormat, ReportSummary};
use callup::admission::{AllocationRequest, CallUpService, Verdict};
use callup::config::AppConfig;
use callup::error::AppError;
use callup::roster::RosterImport;
use clap::Args;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub(crate) struct SimulateArgs {
    /// Registration id of the candidate to look up
    #[arg(long)]
    pub(crate) registration_id: String,
    /// Number of seats to call up
    #[arg(long)]
    pub(crate) total_seats: u32,
    /// Leave candidates flagged sub judice out of the simulation
    #[arg(long)]
    pub(crate) exclude_sub_judice: bool,
    /// Roster file (CSV or JSON). Defaults to APP_ROSTER_PATH.
    #[arg(long)]
    pub(crate) roster: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Number of seats to call up
    #[arg(long)]
    pub(crate) total_seats: u32,
    /// Leave candidates flagged sub judice out of the list
    #[arg(long)]
    pub(crate) exclude_sub_judice: bool,
    /// Output format; inferred from --output when omitted, otherwise html
    #[arg(long)]
    pub(crate) format: Option<ReportFormat>,
    /// File to write. Defaults to a timestamped file under APP_REPORTS_DIR.
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    /// Roster file (CSV or JSON). Defaults to APP_ROSTER_PATH.
    #[arg(long)]
    pub(crate) roster: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct RosterArgs {
    /// Roster file (CSV or JSON). Defaults to APP_ROSTER_PATH.
    #[arg(long)]
    pub(crate) roster: Option<PathBuf>,
    /// Print every ingestion warning instead of the first few
    #[arg(long)]
    pub(crate) all_warnings: bool,
}

const WARNING_PREVIEW: usize = 5;

pub(crate) fn run_simulate(args: SimulateArgs) -> Result<(), AppError> {
    let SimulateArgs {
        registration_id,
        total_seats,
        exclude_sub_judice,
        roster,
    } = args;

    let config = AppConfig::load()?;
    let import = import_roster(&roster_path(&config, roster))?;
    let service = CallUpService::new(import.pool, &config.reports).without_report_persistence();

    let mut request = AllocationRequest::new(total_seats);
    if exclude_sub_judice {
        request = request.excluding_sub_judice();
    }
    let outcome = service.run_simulation(&registration_id, request)?;

    println!("Call-up simulation for {total_seats} seats");
    println!("{}", outcome.verdict.message());
    if let Verdict::Seated(record) = &outcome.verdict {
        let rank = record
            .rank_used
            .map(|rank| rank.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("- track: {} | rank used: {}", record.track_label, rank);
        if record.quota_eligible_on_general_merit {
            println!("- quota-eligible candidate admitted on general merit");
        }
    }
    print_summary(&outcome.report().summary);
    Ok(())
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs {
        total_seats,
        exclude_sub_judice,
        format,
        output,
        roster,
    } = args;

    let config = AppConfig::load()?;
    let import = import_roster(&roster_path(&config, roster))?;
    let service = CallUpService::new(import.pool, &config.reports).without_report_persistence();

    let mut request = AllocationRequest::new(total_seats);
    if exclude_sub_judice {
        request = request.excluding_sub_judice();
    }
    let summary = ReportData::project(&*service.simulate(request)?).summary;

    let format = format
        .or_else(|| output.as_deref().map(format_for_path))
        .unwrap_or_default();
    let document = service.fetch_report("cli", total_seats, format)?;

    let written = match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, &document.bytes)?;
            path
        }
        None => document.persist(&config.reports.output_dir)?,
    };

    println!("Call-up report for {total_seats} seats");
    print_summary(&summary);
    println!("Report written to {} ({})", written.display(), document.content_type());
    Ok(())
}

pub(crate) fn run_roster_check(args: RosterArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let path = roster_path(&config, args.roster);
    let import = import_roster(&path)?;
    print_import(&path, &import, args.all_warnings);
    Ok(())
}

fn format_for_path(path: &Path) -> ReportFormat {
    mime_guess::from_path(path)
        .iter()
        .find_map(|mime| match mime.essence_str() {
            "text/csv" => Some(ReportFormat::Csv),
            "application/pdf" => Some(ReportFormat::Pdf),
            _ => None,
        })
        .unwrap_or(ReportFormat::Html)
}

fn print_summary(summary: &ReportSummary) {
    println!(
        "- {} of {} seats filled | {} general ({} reallocated from quota) | {} quota",
        summary.total_seated,
        summary.requested_seats,
        summary.general_total,
        summary.reallocated,
        summary.quota_total
    );
    println!(
        "- quota-eligible seated: {} ({} on general merit, {} on the quota track)",
        summary.quota_eligible_seated,
        summary.quota_eligible_via_general,
        summary.quota_eligible_via_quota
    );
    if summary.unfilled_seats > 0 {
        println!(
            "- {} seats left unfilled: the candidate pool ran out",
            summary.unfilled_seats
        );
    }
}

fn print_import(path: &Path, import: &RosterImport, all_warnings: bool) {
    println!("Roster {}", path.display());
    println!(
        "- {} rows | {} candidates awaiting call-up | {} already called | {} duplicates",
        import.total_rows,
        import.pool.len(),
        import.skipped_called,
        import.skipped_duplicates
    );
    println!(
        "- {} quota-eligible | {} sub judice",
        import.pool.quota_eligible_count(),
        import.pool.sub_judice_count()
    );

    if import.warnings.is_empty() {
        return;
    }
    println!("Warnings ({}):", import.warnings.len());
    let shown = if all_warnings {
        import.warnings.len()
    } else {
        WARNING_PREVIEW
    };
    for warning in import.warnings.iter().take(shown) {
        println!(
            "  - row {} [{}]: {}",
            warning.row,
            warning.registration_id.as_deref().unwrap_or("-"),
            warning.message
        );
    }
    if import.warnings.len() > shown {
        println!("  ... {} more (use --all-warnings)", import.warnings.len() - shown);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_extension_selects_format() {
        assert_eq!(format_for_path(Path::new("out/list.csv")), ReportFormat::Csv);
        assert_eq!(format_for_path(Path::new("out/list.pdf")), ReportFormat::Pdf);
        assert_eq!(format_for_path(Path::new("out/list.html")), ReportFormat::Html);
        assert_eq!(format_for_path(Path::new("out/list")), ReportFormat::Html);
    }
}
