use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use bindzone::{
    AppState,
    access::Requester,
    config::AppConfig,
    db::{self, user_repo},
    repository::ZoneRepository,
    zone::{RecordKind, RecordTemplate, UserId, ZoneTemplate},
};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, rename_all = "kebab-case")]
struct Cli {
    /// Path to the SQLite database file
    #[arg(long, value_name = "PATH", env = "BINDZONE_DB", default_value = "bindzone.sqlite3")]
    db_path: PathBuf,
    /// Store built zones even if they lack exactly one SOA record
    #[arg(long)]
    allow_incomplete: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage users owning templates and zones
    #[command(subcommand)]
    User(UserCommand),
    /// Manage zone templates
    #[command(subcommand)]
    Template(TemplateCommand),
    /// Build zones from templates
    #[command(subcommand)]
    Zone(ZoneCommand),
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    /// Register a user
    Add {
        login: String,
        /// Grant administrator rights
        #[arg(long)]
        admin: bool,
    },
    /// Grant (or with --revoke, remove) administrator rights
    Admin {
        login: String,
        #[arg(long)]
        revoke: bool,
    },
}

#[derive(Subcommand, Debug)]
enum TemplateCommand {
    /// Create an empty zone template
    Create {
        #[arg(long)]
        name: String,
        /// Default TTL in seconds for zones built from this template
        #[arg(long)]
        ttl: u32,
        /// Owning user; omit for a global template
        #[arg(long, value_name = "LOGIN")]
        owner: Option<String>,
    },
    /// Append a record template; %ZONE% in name or content becomes the zone name
    AddRecord(AddRecordArgs),
    /// List templates visible to a user (all templates when no user is given)
    List {
        #[arg(long = "as", value_name = "LOGIN")]
        requester: Option<String>,
        /// Only templates with exactly one SOA record
        #[arg(long)]
        with_soa: bool,
    },
    /// Print a template as JSON
    Show { name: String },
    /// Delete a template and its record templates
    Delete { name: String },
}

#[derive(Args, Debug)]
struct AddRecordArgs {
    /// Template to extend
    #[arg(long)]
    template: String,
    /// Record kind (SOA, NS, CNAME, A, AAAA, MX, TXT, SRV, PTR)
    #[arg(long)]
    kind: RecordKind,
    /// Name pattern
    #[arg(long, default_value = "%ZONE%")]
    name: String,
    /// Content pattern
    #[arg(long)]
    content: String,
    #[arg(long)]
    priority: Option<u16>,
    #[arg(long)]
    ttl: Option<u32>,
}

#[derive(Subcommand, Debug)]
enum ZoneCommand {
    /// Expand a template into a zone and store it
    Build {
        #[arg(long)]
        template: String,
        #[arg(long)]
        zone: String,
        /// Owning user of the new zone
        #[arg(long, value_name = "LOGIN")]
        owner: Option<String>,
        /// Print the zone without storing it
        #[arg(long)]
        dry_run: bool,
    },
    /// Print a stored zone as JSON
    Show { zone: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = AppConfig {
        db_path: cli.db_path.clone(),
        allow_incomplete: cli.allow_incomplete,
    };
    let state = init_state(config).await?;

    match cli.command {
        Command::User(cmd) => run_user(&state, cmd).await,
        Command::Template(cmd) => run_template(&state, cmd).await,
        Command::Zone(cmd) => run_zone(&state, cmd).await,
    }
}

async fn init_state(config: AppConfig) -> Result<AppState> {
    if let Some(parent) = config.db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create db directory {}", parent.display()))?;
    }

    let db = db::init_db(config.connect_options())
        .await
        .with_context(|| format!("failed to open database {}", config.db_path.display()))?;

    let state = AppState::new(config, db);
    info!(
        db = %state.config.db_path.display(),
        allow_incomplete = state.config.allow_incomplete,
        "opened database"
    );
    Ok(state)
}

async fn run_user(state: &AppState, cmd: UserCommand) -> Result<()> {
    match cmd {
        UserCommand::Add { login, admin } => {
            let login = login.trim();
            if login.is_empty() {
                bail!("login cannot be empty");
            }
            if user_repo::exists(&state.db, login).await? {
                bail!("user '{login}' already exists");
            }
            let id = user_repo::insert(&state.db, login, admin).await?;
            info!(login, id, admin, "added user");
        }
        UserCommand::Admin { login, revoke } => {
            let user = find_user(state, &login).await?;
            user_repo::set_admin(&state.db, user.id, !revoke).await?;
            info!(login = %user.login, admin = !revoke, "updated user");
        }
    }
    Ok(())
}

async fn run_template(state: &AppState, cmd: TemplateCommand) -> Result<()> {
    match cmd {
        TemplateCommand::Create { name, ttl, owner } => {
            let mut template = ZoneTemplate::new(name, ttl);
            template.user = resolve_owner(state, owner.as_deref()).await?;
            state.zones.create_template(template).await?;
        }
        TemplateCommand::AddRecord(args) => {
            let record = RecordTemplate {
                kind: args.kind,
                name: args.name,
                content: args.content,
                priority: args.priority,
                ttl: args.ttl,
            };
            let template = state.zones.add_record_template(&args.template, record).await?;
            if !template.has_soa() {
                eprintln!(
                    "note: template '{}' has {} SOA records; zones built from it will not validate",
                    template.name,
                    template.soa_count()
                );
            }
        }
        TemplateCommand::List {
            requester,
            with_soa,
        } => {
            let requester = match requester {
                Some(login) => Requester::from(&find_user(state, &login).await?),
                None => Requester::Admin,
            };
            let templates = if with_soa {
                state.zones.templates_with_soa(requester).await?
            } else {
                state.zones.templates_for(requester).await?
            };
            for t in templates {
                println!(
                    "{}\tttl={}\trecords={}\tsoa={}",
                    t.name,
                    t.ttl.map(|v| v.to_string()).unwrap_or_else(|| "-".into()),
                    t.record_templates.len(),
                    if t.has_soa() { "yes" } else { "no" },
                );
            }
        }
        TemplateCommand::Show { name } => print_json(&state.zones.template(&name).await?)?,
        TemplateCommand::Delete { name } => state.zones.delete_template(&name).await?,
    }
    Ok(())
}

async fn run_zone(state: &AppState, cmd: ZoneCommand) -> Result<()> {
    match cmd {
        ZoneCommand::Build {
            template,
            zone,
            owner,
            dry_run,
        } => {
            let owner = resolve_owner(state, owner.as_deref()).await?;
            let domain = if dry_run {
                state.zones.preview(&template, &zone, owner).await?
            } else {
                state.zones.provision(&template, &zone, owner).await?
            };
            print_json(&domain)?;
        }
        ZoneCommand::Show { zone } => {
            let domain = state
                .zones
                .repository()
                .find_domain_by_name(&zone)
                .await?
                .with_context(|| format!("zone '{zone}' not found"))?;
            print_json(&domain)?;
        }
    }
    Ok(())
}

async fn find_user(state: &AppState, login: &str) -> Result<user_repo::User> {
    user_repo::find_by_login(&state.db, login)
        .await?
        .with_context(|| format!("unknown user '{login}'"))
}

async fn resolve_owner(state: &AppState, login: Option<&str>) -> Result<Option<UserId>> {
    match login {
        Some(login) => Ok(Some(find_user(state, login).await?.id)),
        None => Ok(None),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn init_tracing() {
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}
