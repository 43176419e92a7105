use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use colored::*;
use efd::{
    core::config::{EfdConfig, DEFAULT_DATE_FORMAT},
    efd::{to_canonical_form, FilerType, ReportType, SearchCriteria, Session},
    utils::dirs,
    ProgressTracker,
};
use std::io::IsTerminal;
use std::path::PathBuf;
use structopt::StructOpt;

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DEFAULT_DATE_FORMAT)
        .map_err(|e| anyhow!("expected MM/DD/YYYY, got {}: {}", s, e))
}

#[derive(Debug, StructOpt)]
#[structopt(name = "efd-cli", about = "Download financial disclosure reports from the EFD search portal")]
struct Opt {
    /// First day of the submission range (MM/DD/YYYY)
    #[structopt(long, parse(try_from_str = parse_date))]
    start: NaiveDate,

    /// Last day of the submission range (MM/DD/YYYY)
    #[structopt(long, parse(try_from_str = parse_date))]
    end: NaiveDate,

    /// annual, extension, ptr, blind-trust or other
    #[structopt(long = "report-type", default_value = "ptr")]
    report_types: Vec<ReportType>,

    /// senator, candidate or former-senator
    #[structopt(long = "filer-type", default_value = "senator")]
    filer_types: Vec<FilerType>,

    #[structopt(long, default_value = "")]
    first_name: String,

    #[structopt(long, default_value = "")]
    last_name: String,

    /// Two-letter state code
    #[structopt(long, default_value = "")]
    state: String,

    /// Output directory; defaults to EFD_DATA_DIR or ./data
    #[structopt(long, parse(from_os_str))]
    data_dir: Option<PathBuf>,

    /// Re-download reports that are already cached
    #[structopt(long)]
    overwrite: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let opt = Opt::from_args();

    let mut config = EfdConfig::from_env()?;
    if let Some(data_dir) = opt.data_dir {
        config.data_dir = data_dir;
    }
    let data_dir = config.data_dir.clone();
    let page_size = config.page_size;

    let criteria = SearchCriteria::new(opt.start, opt.end)
        .first_name(opt.first_name)
        .last_name(opt.last_name)
        .state(opt.state)
        .filer_types(opt.filer_types)
        .report_types(opt.report_types);

    let mut session = Session::new(config)?;

    println!(
        "{} {} - {}",
        "Searching".cyan(),
        opt.start.format(DEFAULT_DATE_FORMAT),
        opt.end.format(DEFAULT_DATE_FORMAT)
    );
    let outcome = session.search_outcome(&criteria, page_size).await?;
    println!(
        "Found {} reports ({} rows skipped)",
        outcome.results.len().to_string().green(),
        outcome.dropped
    );

    let progress = ProgressTracker::new(
        outcome.results.len() as u64,
        "reports",
        std::io::stdout().is_terminal(),
    );

    let mut saved = 0;
    let mut skipped = 0;
    let mut failed = 0;

    for result in &outcome.results {
        progress.update_message(&result.report_id);

        if !opt.overwrite && dirs::report_exists(&data_dir, result) {
            skipped += 1;
            progress.increment(1);
            continue;
        }

        match session.handle_result(result).await {
            Ok(Some(handled)) => {
                let json = to_canonical_form(result, &handled.report)?;
                if dirs::save_report(&data_dir, result, &json, opt.overwrite)?.is_some() {
                    saved += 1;
                }
            }
            Ok(None) => {
                progress.println(&format!(
                    "{} {} ({} report)",
                    "Unsupported".yellow(),
                    result.file_url,
                    result.report_format
                ));
                skipped += 1;
            }
            Err(e) => {
                progress.println(&format!("{} {}: {}", "Failed".red(), result.file_url, e));
                failed += 1;
            }
        }

        progress.increment(1);
    }

    progress.finish();
    println!(
        "{} saved, {} skipped, {} failed",
        saved.to_string().green(),
        skipped.to_string().yellow(),
        failed.to_string().red()
    );

    Ok(())
}
