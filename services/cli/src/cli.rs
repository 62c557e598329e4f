use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use grantdesk::config::AppConfig;
use grantdesk::error::AppError;
use grantdesk::grants::{
    CallStatus, Currency, GrantId, GrantService, GrantType, JsonFileStore, Order,
    RequirementStatus, UsmStatus,
};
use grantdesk::telemetry;
use tracing::info;

use crate::commands;

#[derive(Parser, Debug)]
#[command(
    name = "grantdesk",
    about = "Track funding opportunities: filter, edit, and bulk-import grant records",
    version
)]
struct Cli {
    /// Store file to use instead of GRANTDESK_STORE / ./grants.json
    #[arg(long, global = true)]
    store: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List grants matching the given filters, sorted by deadline
    List(ListArgs),
    /// Add a single grant
    Add(GrantArgs),
    /// Replace every field of an existing grant
    Edit(EditArgs),
    /// Delete a grant after confirmation
    Delete(DeleteArgs),
    /// Bulk-import grants from a CSV file
    Import(ImportArgs),
    /// Write the CSV import template
    Template(TemplateArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ListArgs {
    /// Case-insensitive search across name, entity, and sector
    #[arg(long, default_value = "")]
    pub(crate) search: String,
    /// Geographic scope: Local, National, or International
    #[arg(long)]
    pub(crate) order: Option<Order>,
    #[arg(long = "type")]
    pub(crate) grant_type: Option<GrantType>,
    #[arg(long)]
    pub(crate) call_status: Option<CallStatus>,
    #[arg(long)]
    pub(crate) usm_status: Option<UsmStatus>,
    /// Inclusive lower bound on amount; non-numeric values are ignored
    #[arg(long)]
    pub(crate) min_amount: Option<String>,
    /// Inclusive upper bound on amount; non-numeric values are ignored
    #[arg(long)]
    pub(crate) max_amount: Option<String>,
    /// Earliest deadline to include (YYYY-MM-DD)
    #[arg(long, value_parser = commands::parse_date)]
    pub(crate) from: Option<NaiveDate>,
    /// Latest deadline to include (YYYY-MM-DD)
    #[arg(long, value_parser = commands::parse_date)]
    pub(crate) to: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub(crate) struct GrantArgs {
    #[arg(long)]
    pub(crate) name: String,
    /// Organization offering the funding
    #[arg(long)]
    pub(crate) entity: String,
    /// Application deadline (YYYY-MM-DD)
    #[arg(long, value_parser = commands::parse_date)]
    pub(crate) deadline: NaiveDate,
    #[arg(long, default_value_t = Order::default())]
    pub(crate) order: Order,
    #[arg(long = "type", default_value_t = GrantType::default())]
    pub(crate) grant_type: GrantType,
    #[arg(long, default_value = "")]
    pub(crate) sector: String,
    #[arg(long, default_value = "")]
    pub(crate) components: String,
    #[arg(long, default_value_t = 0.0)]
    pub(crate) amount: f64,
    #[arg(long, default_value_t = Currency::default())]
    pub(crate) currency: Currency,
    #[arg(long, default_value_t = RequirementStatus::default())]
    pub(crate) meets_requirements: RequirementStatus,
    #[arg(long, default_value = "")]
    pub(crate) missing_requirements: String,
    #[arg(long, default_value = "")]
    pub(crate) link: String,
    #[arg(long, default_value_t = CallStatus::default())]
    pub(crate) call_status: CallStatus,
    #[arg(long, default_value_t = UsmStatus::default())]
    pub(crate) usm_status: UsmStatus,
}

#[derive(Args, Debug)]
pub(crate) struct EditArgs {
    /// Id of the grant to replace
    pub(crate) id: GrantId,
    #[command(flatten)]
    pub(crate) fields: GrantArgs,
}

#[derive(Args, Debug)]
pub(crate) struct DeleteArgs {
    /// Id of the grant to delete
    pub(crate) id: GrantId,
    /// Skip the interactive confirmation prompt
    #[arg(long)]
    pub(crate) yes: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ImportArgs {
    /// CSV file matching the template schema
    pub(crate) file: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct TemplateArgs {
    /// Where to write the template
    #[arg(long, default_value = "grant_template.csv")]
    pub(crate) out: PathBuf,
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let store_path = cli.store.unwrap_or(config.store.path);
    info!(
        environment = ?config.environment,
        store = %store_path.display(),
        "grantdesk ready"
    );
    let service = GrantService::new(JsonFileStore::new(store_path));

    match cli.command {
        Command::List(args) => commands::run_list(&service, args),
        Command::Add(args) => commands::run_add(&service, args),
        Command::Edit(args) => commands::run_edit(&service, args),
        Command::Delete(args) => commands::run_delete(&service, args),
        Command::Import(args) => commands::run_import(&service, args),
        Command::Template(args) => commands::run_template(args),
    }
}
