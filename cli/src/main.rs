//! ghauth: generate GitHub App JWTs, installation tokens and runner tokens
//!
//! Thin front end over ghauth-core. Reads private keys from disk, wires the
//! reqwest transport and the tracing subscriber, prints the token on stdout.
//! Uses a single-threaded tokio runtime (compatible with core's !Send async traits).

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context as _, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use ghauth_core::config::parse_installation_id;
use ghauth_core::platform::Environment;
use ghauth_core::{AuthError, Context, FallbackOrder, Options, TokenKind};

mod action;
mod platform;

use platform::{ProcessEnv, ReqwestHttpClient, SystemClock};

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Generate GitHub App, installation and self-hosted runner tokens
#[derive(Parser, Debug)]
#[command(name = "ghauth")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Turn on debug output
    #[arg(long, global = true)]
    debug: bool,

    /// GitHub API base URL (GitHub Enterprise Server)
    #[arg(long, global = true, env = "GHAUTH_API_URL")]
    api_url: Option<String>,

    /// HTTP timeout in seconds
    #[arg(
        long,
        global = true,
        env = "GHAUTH_HTTP_TIMEOUT_SECS",
        default_value_t = DEFAULT_HTTP_TIMEOUT_SECS
    )]
    http_timeout_secs: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create an app JWT
    App {
        /// Print an Authorization header value instead of the bare token
        #[arg(long)]
        authorization: bool,

        #[command(flatten)]
        app: AppArgs,
    },

    /// Create an installation token
    Installation {
        /// Print an Authorization header value instead of the bare token
        #[arg(long)]
        authorization: bool,

        #[command(flatten)]
        app: AppArgs,

        #[command(flatten)]
        target: TargetArgs,
    },

    /// Create a token to add self-hosted runners to a repo
    #[command(alias = "repoRunnerRegistration")]
    RepoRunnerRegistration(RunnerArgs),

    /// Create a token to add self-hosted runners to an org
    #[command(alias = "orgRunnerRegistration")]
    OrgRunnerRegistration(RunnerArgs),

    /// Create a token to add self-hosted runners to an enterprise
    #[command(alias = "entRunnerRegistration")]
    EntRunnerRegistration(RunnerArgs),

    /// Create a token to remove self-hosted runners from a repo
    #[command(alias = "repoRunnerRemove")]
    RepoRunnerRemove(RunnerArgs),

    /// Create a token to remove self-hosted runners from an org
    #[command(alias = "orgRunnerRemove")]
    OrgRunnerRemove(RunnerArgs),

    /// Create a token to remove self-hosted runners from an enterprise
    #[command(alias = "entRunnerRemove")]
    EntRunnerRemove(RunnerArgs),

    /// Run as a GitHub Actions step (inputs from INPUT_* variables)
    Action,
}

#[derive(Args, Debug, Default)]
struct AppArgs {
    /// App ID
    #[arg(short = 'a', long, env = "GHAUTH_APP_ID")]
    app_id: Option<String>,

    /// Path to the private key file for the app
    #[arg(short = 'k', long, env = "GHAUTH_PRIVATE_KEY_PATH")]
    private_key_path: Option<PathBuf>,

    /// Private key PEM for the app
    #[arg(
        long,
        env = "GHAUTH_PRIVATE_KEY",
        hide_env_values = true,
        conflicts_with = "private_key_path"
    )]
    private_key: Option<String>,
}

#[derive(Args, Debug, Default)]
struct TargetArgs {
    /// Installation ID for the app
    #[arg(short = 'i', long, env = "GHAUTH_INSTALLATION_ID")]
    installation_id: Option<String>,

    /// Organization name to act on
    #[arg(short = 'o', long, env = "GHAUTH_ORG_NAME")]
    org_name: Option<String>,

    /// Full name of the repository to act on
    #[arg(short = 'r', long, env = "GHAUTH_REPO_NAME")]
    repo_name: Option<String>,
}

#[derive(Args, Debug)]
struct RunnerArgs {
    #[command(flatten)]
    app: AppArgs,

    #[command(flatten)]
    target: TargetArgs,

    /// Enterprise slug to act on
    #[arg(short = 'e', long, env = "GHAUTH_ENTERPRISE_NAME")]
    enterprise_name: Option<String>,

    /// Personal access token to use for generation
    #[arg(short = 'p', long, env = "GHAUTH_PERSONAL_ACCESS_TOKEN", hide_env_values = true)]
    personal_access_token: Option<String>,

    /// Which authorization to try first
    #[arg(long, env = "GHAUTH_FALLBACK_ORDER", default_value_t = FallbackOrder::default())]
    fallback_order: FallbackOrder,
}

impl AppArgs {
    fn apply(self, opts: &mut Options) {
        opts.app_id = self.app_id;
        opts.private_key = self.private_key;
        opts.private_key_path = self.private_key_path;
    }
}

impl TargetArgs {
    fn apply(self, opts: &mut Options) -> Result<()> {
        opts.installation_id = self
            .installation_id
            .as_deref()
            .map(parse_installation_id)
            .transpose()?;
        opts.org_name = self.org_name;
        opts.repo_name = self.repo_name;
        Ok(())
    }
}

impl RunnerArgs {
    fn into_options(self) -> Result<Options> {
        let mut opts = Options {
            enterprise_name: self.enterprise_name,
            personal_access_token: self.personal_access_token,
            fallback_order: self.fallback_order,
            ..Default::default()
        };
        self.app.apply(&mut opts);
        self.target.apply(&mut opts)?;
        Ok(opts)
    }
}

/// What to mint, decided from the command line
enum Invocation {
    Mint {
        kind: TokenKind,
        opts: Options,
        as_authorization: bool,
    },
    Action,
}

impl Commands {
    fn into_invocation(self) -> Result<Invocation> {
        let (kind, opts, as_authorization) = match self {
            Commands::Action => return Ok(Invocation::Action),
            Commands::App { authorization, app } => {
                let mut opts = Options::default();
                app.apply(&mut opts);
                (TokenKind::App, opts, authorization)
            }
            Commands::Installation {
                authorization,
                app,
                target,
            } => {
                let mut opts = Options::default();
                app.apply(&mut opts);
                target.apply(&mut opts)?;
                (TokenKind::Installation, opts, authorization)
            }
            Commands::RepoRunnerRegistration(args) => {
                (TokenKind::RepoRunnerRegistration, args.into_options()?, false)
            }
            Commands::OrgRunnerRegistration(args) => {
                (TokenKind::OrgRunnerRegistration, args.into_options()?, false)
            }
            Commands::EntRunnerRegistration(args) => {
                (TokenKind::EntRunnerRegistration, args.into_options()?, false)
            }
            Commands::RepoRunnerRemove(args) => {
                (TokenKind::RepoRunnerRemove, args.into_options()?, false)
            }
            Commands::OrgRunnerRemove(args) => {
                (TokenKind::OrgRunnerRemove, args.into_options()?, false)
            }
            Commands::EntRunnerRemove(args) => {
                (TokenKind::EntRunnerRemove, args.into_options()?, false)
            }
        };

        Ok(Invocation::Mint {
            kind,
            opts,
            as_authorization,
        })
    }
}

/// Fill `private_key` from `private_key_path` when only the path was given
fn load_private_key(opts: &mut Options) -> Result<()> {
    if opts.private_key.is_some() {
        return Ok(());
    }
    if let Some(path) = &opts.private_key_path {
        tracing::debug!(path = %path.display(), "loading PEM");
        let pem = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read private key from {}", path.display()))?;
        opts.private_key = Some(pem);
    }
    Ok(())
}

fn init_tracing(debug: bool) {
    let default_filter = if debug {
        "ghauth=debug,ghauth_core=debug"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let debug = cli.debug;
    let is_action = matches!(cli.command, Commands::Action);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if is_action => {
            let _ = action::report_failure(&err.to_string(), &mut std::io::stdout());
            ExitCode::FAILURE
        }
        Err(err) => {
            if debug {
                eprintln!("{:?}", err);
            } else {
                eprintln!("ERROR: {}", err);
            }
            let code = err
                .downcast_ref::<AuthError>()
                .map(AuthError::exit_code)
                .unwrap_or(1);
            ExitCode::from(code as u8)
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let http = ReqwestHttpClient::new(Duration::from_secs(cli.http_timeout_secs))
        .context("failed to build HTTP client")?;
    let clock = SystemClock;
    let env = ProcessEnv;
    let is_action = matches!(cli.command, Commands::Action);

    let (kind, mut opts, as_authorization) = match cli.command.into_invocation()? {
        Invocation::Mint {
            kind,
            opts,
            as_authorization,
        } => (kind, opts, as_authorization),
        Invocation::Action => {
            let (request, opts) = action::read_inputs(&env)?;
            (request.kind, opts, request.as_authorization)
        }
    };
    if opts.api_url.is_none() {
        opts.api_url = cli.api_url;
    }
    load_private_key(&mut opts)?;

    let span = tracing::info_span!("ghauth", kind = %kind);
    let ctx = Context::new(&http, &clock, span);

    tracing::info!(parent: &ctx.span, "Generating token");
    let token = ghauth_core::mint(&ctx, kind, &opts, as_authorization).await?;

    if is_action {
        let output_file = env
            .get_var("GITHUB_OUTPUT")
            .filter(|path| !path.is_empty())
            .map(PathBuf::from);
        action::publish_token(&token, &mut std::io::stdout(), output_file.as_deref())
            .context("failed to publish step output")?;
    } else {
        println!("{}", token);
    }
    Ok(())
}
