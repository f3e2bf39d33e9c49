//! CLI for projectrc.
//!
//! Runs the HTTP service or resolves repositories from the terminal,
//! printing JSON to stdout.

use clap::{Args, Parser, Subcommand};
use projectrc::server::{self, AppState, ServiceConfig, SyncJob};
use projectrc::{
    json_schema, list_projects, sync_listing, ConfigFormat, ConfigLookup, GitHubClient,
    GitHubError, NpmClient, RepositoryRef, ResolveError, Resolver, ResolverSettings, SyncError,
    SyncTarget,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// projectrc - resolve `.projectrc` files from GitHub repositories.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    options: Options,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct Options {
    /// GitHub Personal Access Token; required by every command except `schema`.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Account whose repositories carry their own config.
    #[arg(long, env = "PROJECTRC_ACCOUNT", default_value = "luxass")]
    account: String,

    /// Repository holding configs of other owners (`owner/repo`).
    #[arg(long, env = "PROJECTRC_REGISTRY")]
    registry: Option<RepositoryRef>,

    /// Folder inside `.github` of the registry repository.
    #[arg(long, env = "PROJECTRC_NAMESPACE", default_value = projectrc::resolver::DEFAULT_NAMESPACE)]
    namespace: String,

    /// Config generation to read (`json` or `toml`).
    #[arg(long, env = "PROJECTRC_FORMAT", default_value = "json")]
    format: ConfigFormat,

    /// Public URL of the service, used in README links.
    #[arg(long, env = "PROJECTRC_PUBLIC_URL", default_value = projectrc::resolver::DEFAULT_PUBLIC_URL)]
    public_url: String,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pretty: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP service.
    Serve(ServeArgs),

    /// Resolve a repository's projects.
    Resolve {
        /// Repository as `owner/repo`.
        repository: RepositoryRef,
    },

    /// Print a repository's validated config.
    Config {
        /// Repository as `owner/repo`.
        repository: RepositoryRef,
    },

    /// Print a repository's README.
    Readme {
        /// Repository as `owner/repo`.
        repository: RepositoryRef,

        /// README path inside the repository.
        #[arg(long)]
        path: Option<String>,
    },

    /// Print the config JSON Schema.
    Schema,

    /// Resolve every project of the token owner.
    Projects,

    /// Commit the projects listing.
    Sync(SyncArgs),
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Address to listen on.
    #[arg(long, env = "PROJECTRC_BIND", default_value = "127.0.0.1:3000")]
    bind: SocketAddr,

    /// Edge cache lifetime in seconds.
    #[arg(long, default_value_t = server::DEFAULT_CACHE_TTL)]
    cache_ttl: u64,

    /// Bearer token forcing fresh responses.
    #[arg(long, env = "REVALIDATE_TOKEN", hide_env_values = true)]
    revalidate_token: Option<String>,

    /// Alternative bearer token forcing fresh responses.
    #[arg(long, env = "ISR_BYPASS_TOKEN", hide_env_values = true)]
    isr_bypass_token: Option<String>,

    /// Bearer token required by `POST /cron/sync`.
    #[arg(long, env = "CRON_SECRET", hide_env_values = true)]
    cron_secret: Option<String>,

    #[command(flatten)]
    sync: SyncArgs,
}

#[derive(Args, Debug)]
struct SyncArgs {
    /// Token used to commit the listing.
    #[arg(long, env = "COMMIT_TOKEN", hide_env_values = true)]
    commit_token: Option<String>,

    /// Repository receiving the listing (`owner/repo`).
    #[arg(long, env = "PROJECTRC_SYNC_REPOSITORY")]
    sync_repository: Option<RepositoryRef>,

    /// Path of the listing file.
    #[arg(long, env = "PROJECTRC_SYNC_PATH", default_value = "projects.json")]
    sync_path: String,

    /// Branch to commit to; the default branch when unset.
    #[arg(long, env = "PROJECTRC_SYNC_BRANCH")]
    sync_branch: Option<String>,
}

/// Failures of a CLI run.
#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Usage(String),

    #[error("{failed} repositories failed to resolve")]
    ListingFailures { failed: usize },

    #[error(transparent)]
    GitHub(#[from] GitHubError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// 1 for missing resources and partial listings, 2 for everything else.
    fn exit_code(&self) -> u8 {
        match self {
            Self::NotFound(_) | Self::ListingFailures { .. } => 1,
            _ => 2,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    // octocrab needs a process-wide rustls provider.
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::from(0),
        Err(e) => {
            if e.exit_code() == 1 {
                error!("{e}");
            } else {
                error!(error = %e, "Critical failure");
            }
            ExitCode::from(e.exit_code())
        }
    }
}

/// Initializes tracing with environment filter support.
///
/// Logs go to stderr so stdout only carries JSON. The level is read from
/// `RUST_LOG` and defaults to `info`.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

fn build_resolver(options: &Options) -> Result<Resolver, CliError> {
    let token = options
        .token
        .clone()
        .ok_or_else(|| CliError::Usage("GITHUB_TOKEN or --token is required".to_string()))?;
    let github = GitHubClient::new(token)?;

    let mut settings = ResolverSettings::new(options.account.clone())
        .with_namespace(options.namespace.clone())
        .with_format(options.format)
        .with_public_url(options.public_url.clone());
    if let Some(registry) = &options.registry {
        settings = settings.with_registry(registry.clone());
    }

    Ok(Resolver::new(github, NpmClient::new(), settings))
}

fn build_sync_job(args: &SyncArgs) -> Result<Option<SyncJob>, CliError> {
    let (Some(token), Some(repository)) = (&args.commit_token, &args.sync_repository) else {
        return Ok(None);
    };

    let mut target = SyncTarget::new(repository.clone(), args.sync_path.clone());
    if let Some(branch) = &args.sync_branch {
        target = target.with_branch(branch.clone());
    }

    Ok(Some(SyncJob {
        committer: GitHubClient::new(token.clone())?,
        target,
    }))
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<(), CliError> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{rendered}");
    Ok(())
}

/// Main execution logic.
async fn run(cli: Cli) -> Result<(), CliError> {
    let pretty = cli.options.pretty;
    let options = &cli.options;

    match cli.command {
        Command::Serve(args) => {
            let config = ServiceConfig::default()
                .with_cache_ttl(args.cache_ttl)
                .with_revalidate_token(args.revalidate_token)
                .with_isr_bypass_token(args.isr_bypass_token)
                .with_cron_secret(args.cron_secret);

            let mut state = AppState::new(build_resolver(options)?, config);
            if let Some(job) = build_sync_job(&args.sync)? {
                state = state.with_sync(job);
            }

            server::serve(state, args.bind).await?;
        }
        Command::Resolve { repository } => {
            let resolved = build_resolver(options)?
                .resolve_projectrc(&repository.owner, &repository.name)
                .await?
                .ok_or_else(|| CliError::NotFound(format!("no projectrc found for {repository}")))?;
            print_json(&resolved, pretty)?;
        }
        Command::Config { repository } => {
            match build_resolver(options)?
                .resolve_config(&repository.owner, &repository.name)
                .await
            {
                ConfigLookup::Found(config) => print_json(&config, pretty)?,
                ConfigLookup::Invalid(report) => {
                    return Err(ResolveError::InvalidConfig(report).into())
                }
                ConfigLookup::NotFound => {
                    return Err(CliError::NotFound(format!(
                        "no projectrc found for {repository}"
                    )))
                }
            }
        }
        Command::Readme { repository, path } => {
            let document = build_resolver(options)?
                .get_readme(&repository.owner, &repository.name, path.as_deref())
                .await
                .ok_or_else(|| CliError::NotFound(format!("no README found for {repository}")))?;
            print_json(&document, pretty)?;
        }
        Command::Schema => print_json(&json_schema(), pretty)?,
        Command::Projects => {
            let listing = list_projects(&build_resolver(options)?).await?;
            print_json(&listing, pretty)?;
            if listing.summary.has_failures() {
                return Err(CliError::ListingFailures {
                    failed: listing.summary.failed,
                });
            }
        }
        Command::Sync(args) => {
            let job = build_sync_job(&args)?.ok_or_else(|| {
                CliError::Usage(
                    "sync needs COMMIT_TOKEN and PROJECTRC_SYNC_REPOSITORY".to_string(),
                )
            })?;
            let resolver = build_resolver(options)?;
            let outcome = sync_listing(&resolver, &job.committer, &job.target).await?;
            print_json(&outcome, pretty)?;
        }
    }

    Ok(())
}
