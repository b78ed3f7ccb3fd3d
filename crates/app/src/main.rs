use std::fmt;

use drill_core::model::{FeedbackPolicy, UserId};
use services::{AppServices, Clock};
use tracing_subscriber::EnvFilter;

mod play;
mod report;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingScenario,
    UnknownArg(String),
    InvalidUserId { raw: String },
    InvalidTiers { raw: String, reason: String },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingScenario => write!(f, "play requires a scenario id (see `list`)"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidUserId { raw } => write!(f, "invalid --user value: {raw}"),
            ArgsError::InvalidTiers { raw, reason } => {
                write!(f, "invalid --tiers value {raw}: {reason}")
            }
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cyberdrill list");
    eprintln!(
        "  cyberdrill play <scenario-id> [--db <sqlite_url>] [--user <uuid>] [--tiers <e,g,f>]"
    );
    eprintln!("  cyberdrill progress [--json] [--db <sqlite_url>] [--user <uuid>]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -v, --verbose   debug logging (RUST_LOG overrides)");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite://cyberdrill.sqlite3");
    eprintln!("  --user <generated>");
    eprintln!("  --tiers 90,75,60");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  CYBERDRILL_DB_URL, CYBERDRILL_USER_ID, CYBERDRILL_TIERS");
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    List,
    Play { scenario_id: String },
    Progress { json: bool },
}

struct Args {
    command: Command,
    db_url: String,
    user_id: Option<UserId>,
    policy: FeedbackPolicy,
    verbose: bool,
}

fn parse_user(raw: String) -> Result<UserId, ArgsError> {
    raw.trim()
        .parse()
        .map_err(|_| ArgsError::InvalidUserId { raw })
}

fn parse_tiers(raw: String) -> Result<FeedbackPolicy, ArgsError> {
    raw.parse().map_err(|e: drill_core::model::FeedbackPolicyError| {
        ArgsError::InvalidTiers {
            raw,
            reason: e.to_string(),
        }
    })
}

impl Args {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Option<Self>, ArgsError> {
        let mut db_url = std::env::var("CYBERDRILL_DB_URL")
            .ok()
            .map_or_else(|| "sqlite://cyberdrill.sqlite3".into(), normalize_sqlite_url);
        let mut user_id = std::env::var("CYBERDRILL_USER_ID")
            .ok()
            .map(parse_user)
            .transpose()?;
        let mut policy = std::env::var("CYBERDRILL_TIERS")
            .ok()
            .map(parse_tiers)
            .transpose()?
            .unwrap_or_default();
        let mut verbose = false;
        let mut json = false;
        let mut positional = Vec::new();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--user" => user_id = Some(parse_user(require_value(&mut args, "--user")?)?),
                "--tiers" => policy = parse_tiers(require_value(&mut args, "--tiers")?)?,
                "--json" => json = true,
                "-v" | "--verbose" => verbose = true,
                "--help" | "-h" => return Ok(None),
                flag if flag.starts_with('-') => return Err(ArgsError::UnknownArg(arg)),
                _ => positional.push(arg),
            }
        }

        let mut positional = positional.into_iter();
        let command = match positional.next().as_deref() {
            None | Some("list") => Command::List,
            Some("play") => Command::Play {
                scenario_id: positional.next().ok_or(ArgsError::MissingScenario)?,
            },
            Some("progress") => Command::Progress { json },
            Some(other) => return Err(ArgsError::UnknownArg(other.to_owned())),
        };
        if let Some(extra) = positional.next() {
            return Err(ArgsError::UnknownArg(extra));
        }

        Ok(Some(Self {
            command,
            db_url,
            user_id,
            policy,
            verbose,
        }))
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let parsed = match Args::parse(std::env::args().skip(1)) {
        Ok(Some(parsed)) => parsed,
        Ok(None) => {
            print_usage();
            return Ok(());
        }
        Err(e) => {
            eprintln!("{e}");
            print_usage();
            return Err(e.into());
        }
    };
    init_tracing(parsed.verbose);

    let user_id = parsed.user_id.unwrap_or_else(|| {
        let generated = UserId::generate();
        tracing::info!(user = %generated, "no learner id given; pass --user to keep progress");
        generated
    });

    // Open + migrate SQLite at startup. Keep this in the binary glue so core/services stay pure.
    prepare_sqlite_file(&parsed.db_url)?;
    let services =
        AppServices::new_sqlite(&parsed.db_url, Clock::default_clock(), user_id, parsed.policy)
            .await?;

    match parsed.command {
        Command::List => {
            report::print_catalog(&services.catalog());
            Ok(())
        }
        Command::Play { scenario_id } => play::run(&services, &scenario_id).await,
        Command::Progress { json } => {
            let progress = services.progress().progress().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&progress)?);
            } else {
                let history = services.progress().history(None, 5).await?;
                report::print_progress(user_id, &services.catalog(), &progress, &history);
            }
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
