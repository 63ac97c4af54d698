use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use admission_core::access::{CredentialVerifier, SharedSecretVerifier};
use admission_core::config::AppConfig;
use admission_core::error::AppError;
use admission_core::telemetry;
use admission_core::workflows::admissions::report::rows_to_csv;
use admission_core::workflows::admissions::{
    AdmissionDesk, AdmissionDraft, ConsultantPerformance, DeliveryChannel, DocumentRenderer,
    FilterSelection, FilterState, HtmlFileRenderer, JsonFileRecordStore, RecordId,
    RecordStoreGateway, SaveOutcome, SimulatedDeliveryChannel, StatusField, YearMonth,
    validate_recipient,
};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "Admission Desk",
    about = "Track admission applications, consultant performance and reports",
    version
)]
struct Cli {
    /// Shared access password (falls back to ADMISSIONS_PASSWORD)
    #[arg(long, global = true)]
    password: Option<String>,
    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record a new application
    Submit(SubmitArgs),
    /// List applications with management totals
    List(FilterArgs),
    /// Change the admission or visa status of one application
    Status(StatusArgs),
    /// Rank consultants by success rate
    Consultants(FilterArgs),
    /// Generate the HTML report, optionally emailing it or exporting CSV
    Report(ReportArgs),
    /// Show recent months and how many applications each received
    Months(MonthsArgs),
}

#[derive(Args, Debug)]
struct SubmitArgs {
    #[arg(long, default_value = "")]
    student_name: String,
    #[arg(long, default_value = "")]
    program: String,
    #[arg(long, default_value = "")]
    email: String,
    #[arg(long, default_value = "")]
    address: String,
    #[arg(long, default_value = "")]
    school: String,
    #[arg(long, default_value = "")]
    consultant: String,
    /// Defaults to "Pending"
    #[arg(long, default_value = "")]
    admission_status: String,
    /// Defaults to "Documentation in progress"
    #[arg(long, default_value = "")]
    visa_status: String,
}

impl From<SubmitArgs> for AdmissionDraft {
    fn from(args: SubmitArgs) -> Self {
        AdmissionDraft {
            student_name: args.student_name,
            program_of_interest: args.program,
            email_address: args.email,
            home_address: args.address,
            school_name: args.school,
            consultant_name: args.consultant,
            admission_status: args.admission_status,
            visa_status: args.visa_status,
        }
    }
}

#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Calendar month in the reporting zone (YYYY-MM); takes precedence over a range
    #[arg(long)]
    month: Option<YearMonth>,
    /// First day of an inclusive range (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    from: Option<NaiveDate>,
    /// Last day of an inclusive range (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    to: Option<NaiveDate>,
}

impl FilterArgs {
    fn state(&self) -> FilterState {
        let mut state = FilterState::default();
        state.set_range_start(self.from);
        state.set_range_end(self.to);
        state.select_month(self.month);
        state
    }
}

#[derive(Args, Debug)]
struct StatusArgs {
    /// Application id, e.g. adm-000012
    id: String,
    #[arg(long, value_enum, default_value_t = FieldArg::Admission)]
    field: FieldArg,
    /// New status value
    value: String,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum FieldArg {
    Admission,
    Visa,
}

impl From<FieldArg> for StatusField {
    fn from(value: FieldArg) -> Self {
        match value {
            FieldArg::Admission => StatusField::AdmissionStatus,
            FieldArg::Visa => StatusField::VisaStatus,
        }
    }
}

#[derive(Args, Debug)]
struct ReportArgs {
    #[command(flatten)]
    filter: FilterArgs,
    /// Send the report summary to this address
    #[arg(long)]
    email: Option<String>,
    /// Also write the report table as CSV
    #[arg(long)]
    csv: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct MonthsArgs {
    #[arg(long, default_value_t = 12)]
    count: usize,
}

fn main() {
    if let Err(err) = run_cli() {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry, config.environment)?;

    let password = cli
        .password
        .clone()
        .or_else(|| env::var("ADMISSIONS_PASSWORD").ok());
    let verifier = SharedSecretVerifier::from_config(&config.access);
    authorize(&verifier, password.as_deref())?;

    let gateway = Arc::new(JsonFileRecordStore::new(&config.storage.store_path));
    let delivery = Arc::new(SimulatedDeliveryChannel::new(
        config.reporting.delivery_delay,
    ));
    let renderer = HtmlFileRenderer::new(&config.reporting.report_dir);
    let mut desk = AdmissionDesk::new(gateway, delivery, config.reporting.zone);

    info!(
        ?config.environment,
        store = %config.storage.store_path.display(),
        "admission desk ready"
    );

    let output = execute(cli.command, &mut desk, &renderer, Utc::now(), cli.json)?;
    print!("{output}");
    Ok(())
}

fn authorize(verifier: &dyn CredentialVerifier, password: Option<&str>) -> Result<(), AppError> {
    if verifier.verify_credentials(password.unwrap_or_default()) {
        Ok(())
    } else {
        warn!("access denied");
        Err(AppError::AccessDenied)
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

fn execute<G, D>(
    command: Command,
    desk: &mut AdmissionDesk<G, D>,
    renderer: &dyn DocumentRenderer,
    now: DateTime<Utc>,
    json: bool,
) -> Result<String, AppError>
where
    G: RecordStoreGateway + 'static,
    D: DeliveryChannel + 'static,
{
    match command {
        Command::Submit(args) => {
            let record = desk.submit(&args.into())?;
            if json {
                return Ok(format!("{}\n", serde_json::to_string_pretty(&record)?));
            }
            Ok(format!(
                "Application submitted successfully: {} ({})\n",
                record.id, record.student_name
            ))
        }
        Command::List(args) => {
            desk.load()?;
            render_list(desk, &args.state(), json)
        }
        Command::Status(args) => {
            desk.load()?;
            update_status(desk, args, json)
        }
        Command::Consultants(args) => {
            let filter = args.state();
            let performance = match filter.selection() {
                FilterSelection::Month { month } => desk.consultant_performance_for_month(month)?,
                _ => {
                    desk.load()?;
                    desk.consultant_performance(&filter)?
                }
            };
            render_consultants(&performance, json)
        }
        Command::Report(args) => {
            desk.load()?;
            generate_report(desk, args, renderer, now, json)
        }
        Command::Months(args) => {
            desk.load()?;
            render_months(desk, args.count, now, json)
        }
    }
}

fn render_list<G, D>(
    desk: &AdmissionDesk<G, D>,
    filter: &FilterState,
    json: bool,
) -> Result<String, AppError>
where
    G: RecordStoreGateway + 'static,
    D: DeliveryChannel + 'static,
{
    let records = desk.filtered(filter)?;
    let tally = desk.management_tally(filter)?;
    if json {
        let body = serde_json::json!({
            "period": filter.selection().period_label(),
            "tally": tally,
            "applications": records,
        });
        return Ok(format!("{}\n", serde_json::to_string_pretty(&body)?));
    }

    let mut out = String::new();
    writeln!(out, "Applications ({})", filter.selection().period_label())
        .expect("write header");
    if records.is_empty() {
        writeln!(out, "- none").expect("write empty marker");
    }
    for record in &records {
        writeln!(
            out,
            "- {} | {} | {} | {} | {} | {} | {}",
            record.id,
            record.created_on(),
            record.student_name,
            record.program_of_interest,
            record.consultant_name,
            record.admission_status,
            record.visa_status
        )
        .expect("write record line");
    }
    writeln!(
        out,
        "\nTotal {} | Accepted {} | Pending {} | Rejected {} | Under Review {} | Waitlisted {} | Other {}",
        tally.total,
        tally.accepted,
        tally.pending,
        tally.rejected,
        tally.under_review,
        tally.waitlisted,
        tally.other
    )
    .expect("write totals");
    writeln!(out, "Acceptance rate: {}%", tally.acceptance_rate_label())
        .expect("write acceptance rate");
    Ok(out)
}

fn update_status<G, D>(
    desk: &mut AdmissionDesk<G, D>,
    args: StatusArgs,
    json: bool,
) -> Result<String, AppError>
where
    G: RecordStoreGateway + 'static,
    D: DeliveryChannel + 'static,
{
    let id = RecordId(args.id);
    let field = StatusField::from(args.field);
    if !field.options().contains(&args.value.trim()) {
        warn!(value = %args.value, field = field.label(), "status value is not a standard option");
    }

    desk.begin_status_edit(&id, field)?;
    desk.set_status_draft(&args.value);
    let outcome = desk.save_status()?;
    if json {
        return Ok(format!("{}\n", serde_json::to_string_pretty(&outcome)?));
    }

    match outcome {
        SaveOutcome::Skipped => {
            desk.cancel_status_edit();
            Ok("Status unchanged: value was blank.\n".to_string())
        }
        SaveOutcome::Committed { id, field, value } => {
            Ok(format!("{} for {} set to '{}'\n", field.label(), id, value))
        }
    }
}

fn render_consultants(performance: &ConsultantPerformance, json: bool) -> Result<String, AppError> {
    if json {
        return Ok(format!("{}\n", serde_json::to_string_pretty(performance)?));
    }

    let mut out = String::new();
    let overview = &performance.overview;
    writeln!(out, "Consultant performance ({})", performance.period).expect("write header");
    writeln!(
        out,
        "{} consultants | {} students | {} accepted | {} pending | {} rejected | {}% success",
        overview.consultants,
        overview.students,
        overview.accepted,
        overview.pending,
        overview.rejected,
        overview.success_rate
    )
    .expect("write overview");

    if performance.is_empty() {
        writeln!(out, "No consultant data for this period.").expect("write empty marker");
        return Ok(out);
    }

    for ranked in &performance.rankings {
        let badge = ranked
            .podium
            .map(|podium| format!(" [{}]", podium.label()))
            .unwrap_or_default();
        let summary = &ranked.summary;
        writeln!(
            out,
            "#{}{} {}: {} students, {} accepted, {} pending, {} rejected, {} under review, {} waitlisted, {}% success",
            ranked.rank,
            badge,
            summary.name,
            summary.students,
            summary.accepted,
            summary.pending,
            summary.rejected,
            summary.under_review,
            summary.waitlisted,
            summary.success_rate
        )
        .expect("write ranking line");
    }
    Ok(out)
}

fn generate_report<G, D>(
    desk: &AdmissionDesk<G, D>,
    args: ReportArgs,
    renderer: &dyn DocumentRenderer,
    now: DateTime<Utc>,
    json: bool,
) -> Result<String, AppError>
where
    G: RecordStoreGateway + 'static,
    D: DeliveryChannel + 'static,
{
    if let Some(recipient) = args.email.as_deref() {
        validate_recipient(recipient)?;
    }

    let filter = args.filter.state();
    let path = desk.export_report(&filter, now, renderer)?;
    let document = desk.build_report(&filter, now)?;

    let mut out = String::new();
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&document.payload)?)
            .expect("write payload");
    } else {
        let summary = document.summary();
        writeln!(
            out,
            "Report {} ({}): {} applications, {}% acceptance rate",
            summary.report_id, summary.period, summary.total, summary.acceptance_rate
        )
        .expect("write summary");
        writeln!(out, "Saved to {}", path.display()).expect("write path");
    }

    if let Some(csv_path) = args.csv {
        let body = rows_to_csv(&document.payload.applications)?;
        fs::write(&csv_path, body)?;
        info!(path = %csv_path.display(), "report table exported as CSV");
        if !json {
            writeln!(out, "CSV written to {}", csv_path.display()).expect("write csv path");
        }
    }

    if let Some(recipient) = args.email {
        let summary = desk.email_report(&recipient, &filter, now)?;
        if !json {
            writeln!(
                out,
                "Report {} sent to {}",
                summary.report_id,
                recipient.trim()
            )
            .expect("write delivery note");
        }
    }
    Ok(out)
}

fn render_months<G, D>(
    desk: &AdmissionDesk<G, D>,
    count: usize,
    now: DateTime<Utc>,
    json: bool,
) -> Result<String, AppError>
where
    G: RecordStoreGateway + 'static,
    D: DeliveryChannel + 'static,
{
    let today = now.with_timezone(&desk.zone()).date_naive();
    let mut rows = Vec::new();
    for month in YearMonth::recent(today, count) {
        let mut filter = FilterState::default();
        filter.select_month(Some(month));
        let applications = desk.filtered(&filter)?.len();
        rows.push((month, applications));
    }

    if json {
        let body: Vec<_> = rows
            .iter()
            .map(|(month, applications)| {
                serde_json::json!({
                    "month": month.to_string(),
                    "label": month.long_label(),
                    "applications": applications,
                })
            })
            .collect();
        return Ok(format!("{}\n", serde_json::to_string_pretty(&body)?));
    }

    let mut out = String::new();
    for (month, applications) in rows {
        writeln!(out, "{}  {:<15} {}", month, month.long_label(), applications)
            .expect("write month line");
    }
    Ok(out)
}
