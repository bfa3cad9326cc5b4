use std::path::PathBuf;

use pcodes::{AdminLevel, Status};

/// Village P-code register CLI
#[derive(clap::Parser, Debug)]
#[command(name = "pcodes", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// JSON config file with the table locations
    #[arg(short, long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Village register CSV (overrides the config)
    #[arg(long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub dataset: Option<PathBuf>,

    /// Staging CSV for records awaiting approval (overrides the config)
    #[arg(long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub staging: Option<PathBuf>,

    /// Rejected records CSV (overrides the config)
    #[arg(long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub rejected: Option<PathBuf>,

    /// Reference tables JSON with province and district P-codes
    #[arg(long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub reference: Option<PathBuf>,

    /// Date recorded on changes (YYYY-MM-DD), defaults to today
    #[arg(long, global = true)]
    pub date: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Print the next free code under a parent unit
    NextCode(NextCodeArgs),

    /// Add villages to an existing UC
    AddVillages(AddVillagesArgs),

    /// Add a new district, tehsil or UC together with its villages
    AddUnit(AddUnitArgs),

    /// Import villages from a CSV sheet
    Import(ImportArgs),

    /// Mark villages for deletion
    Delete(DeleteArgs),

    /// Approve staged villages into the register (admin only)
    Approve(ReviewArgs),

    /// Reject staged villages (admin only)
    Reject(ReviewArgs),

    /// List villages matching a filter
    List(ListArgs),

    /// Write one CSV per district
    Export(ExportArgs),

    /// List villages sharing exact coordinates
    Duplicates(OutputArgs),

    /// Check a coordinate pair
    Validate(ValidateArgs),

    /// Re-pad every code column of the register
    Normalize,
}

/// Parent levels that accept new child codes.
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParentLevel {
    Province,
    District,
    Tehsil,
    Uc,
}

impl From<ParentLevel> for AdminLevel {
    fn from(level: ParentLevel) -> Self {
        match level {
            ParentLevel::Province => AdminLevel::Province,
            ParentLevel::District => AdminLevel::District,
            ParentLevel::Tehsil => AdminLevel::Tehsil,
            ParentLevel::Uc => AdminLevel::Uc,
        }
    }
}

/// Levels that can be created with villages.
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum NewLevel {
    District,
    Tehsil,
    Uc,
}

impl From<NewLevel> for AdminLevel {
    fn from(level: NewLevel) -> Self {
        match level {
            NewLevel::District => AdminLevel::District,
            NewLevel::Tehsil => AdminLevel::Tehsil,
            NewLevel::Uc => AdminLevel::Uc,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusArg {
    Active,
    Pending,
    Approved,
    Rejected,
    MarkedForDeletion,
}

impl From<StatusArg> for Status {
    fn from(status: StatusArg) -> Self {
        match status {
            StatusArg::Active => Status::Active,
            StatusArg::Pending => Status::Pending,
            StatusArg::Approved => Status::Approved,
            StatusArg::Rejected => Status::Rejected,
            StatusArg::MarkedForDeletion => Status::MarkedForDeletion,
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct NextCodeArgs {
    /// Level of the parent unit
    #[arg(short, long, value_enum)]
    pub level: ParentLevel,

    /// Parent P-code, e.g. PK6 or PK60102012
    pub parent: String,
}

#[derive(clap::Args, Debug)]
pub struct VillageListArgs {
    /// Village names, comma or newline separated
    #[arg(short, long)]
    pub names: String,

    /// Latitudes in village order (optional)
    #[arg(long, default_value = "")]
    pub lat: String,

    /// Longitudes in village order (optional)
    #[arg(long, default_value = "")]
    pub lon: String,

    /// Send the villages to staging for approval
    #[arg(long)]
    pub stage: bool,
}

#[derive(clap::Args, Debug)]
pub struct AddVillagesArgs {
    /// UC P-code the villages belong to
    #[arg(long)]
    pub uc: String,

    #[command(flatten)]
    pub villages: VillageListArgs,
}

#[derive(clap::Args, Debug)]
pub struct AddUnitArgs {
    /// Highest new level; everything below it is created too
    #[arg(short, long, value_enum)]
    pub level: NewLevel,

    #[arg(long)]
    pub province: String,

    #[arg(long)]
    pub district: String,

    #[arg(long)]
    pub tehsil: String,

    #[arg(long)]
    pub uc: String,

    #[command(flatten)]
    pub villages: VillageListArgs,
}

#[derive(clap::Args, Debug)]
pub struct ImportArgs {
    /// CSV sheet with province, district, tehsil, uc, village_name, latitude, longitude
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub sheet: PathBuf,

    /// Send the villages to staging for approval
    #[arg(long)]
    pub stage: bool,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Village P-codes, comma or newline separated
    #[arg(required_unless_present = "file")]
    pub codes: Vec<String>,

    /// File with one village P-code per line
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub file: Option<PathBuf>,

    /// Justification recorded with the deletion
    #[arg(short, long, default_value = "")]
    pub reason: String,
}

#[derive(clap::Args, Debug)]
pub struct ReviewArgs {
    /// Village P-codes, comma or newline separated
    #[arg(required = true)]
    pub codes: Vec<String>,

    /// Admin user name
    #[arg(short, long)]
    pub username: String,

    /// Admin password
    #[arg(short, long)]
    pub password: String,
}

#[derive(clap::Args, Debug)]
pub struct OutputArgs {
    /// Write the rows to a CSV file instead of printing them
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    #[arg(long)]
    pub enumerator: Option<String>,

    #[arg(long)]
    pub province: Option<String>,

    #[arg(long)]
    pub district: Option<String>,

    #[arg(long)]
    pub tehsil: Option<String>,

    #[arg(long)]
    pub uc: Option<String>,

    #[arg(long, value_enum)]
    pub status: Option<StatusArg>,

    /// Village name substring (case-insensitive)
    #[arg(long)]
    pub village: Option<String>,

    /// Village P-code substring (case-insensitive)
    #[arg(long)]
    pub code: Option<String>,

    /// List staged records instead of the register
    #[arg(long)]
    pub pending: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(clap::Args, Debug)]
pub struct ExportArgs {
    /// Output directory, defaults to "./export"
    #[arg(value_hint = clap::ValueHint::DirPath)]
    pub dir: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct ValidateArgs {
    #[arg(allow_hyphen_values = true)]
    pub latitude: String,

    #[arg(allow_hyphen_values = true)]
    pub longitude: String,
}
