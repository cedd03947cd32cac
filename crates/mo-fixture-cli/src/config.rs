//! Launcher configuration from arguments and environment.

use std::path::PathBuf;

use clap::Parser;

use mo_fixture_client::DEFAULT_ADDRESS;
use mo_fixture_core::{
    Credentials, RequestTemplate, Result, TlsParams, TopologyKind, DEFAULT_START_PORT,
};

use crate::selection::{select, Selection};

/// Login used with `auth` when `DB_USER` is unset.
const FALLBACK_LOGIN: &str = "user";
/// Password used with `auth` when `DB_PASSWORD` is unset.
const FALLBACK_PASSWORD: &str = "password";
/// Internal authentication key used with `auth`.
const AUTH_KEY: &str = "secret";

/// Launch a MongoDB deployment through mongo-orchestration.
#[derive(Parser, Debug)]
#[command(name = "mo-launch")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Topology and modifiers: single|repl|shard|shard3|shard4|mongos, auth, ssl|tls,
    /// a server version, and optionally a starting port.
    pub words: Vec<String>,

    /// mongo-orchestration address.
    #[arg(long, env = "MO_ADDRESS", default_value = DEFAULT_ADDRESS)]
    pub mo_address: String,

    /// First port handed to launched processes.
    #[arg(long, env = "MONGO_PORT", default_value_t = DEFAULT_START_PORT)]
    pub start_port: u16,

    /// Admin user created on the deployment.
    #[arg(long, env = "DB_USER", default_value = "")]
    pub db_user: String,

    /// Admin password.
    #[arg(long, env = "DB_PASSWORD", default_value = "", hide_env_values = true)]
    pub db_password: String,

    /// Directory holding `server.pem` and `ca.pem` for TLS deployments.
    #[arg(long, env = "MO_CERTS_DIR", default_value = "certificates")]
    pub certs_dir: PathBuf,

    /// Enable debug logging.
    #[arg(long, default_value = "false")]
    pub debug: bool,
}

/// Everything needed to launch one deployment.
#[derive(Debug, Clone)]
pub struct LaunchConfig {
    /// mongo-orchestration address.
    pub address: String,
    /// First port to hand out.
    pub start_port: u16,
    /// Deployment to launch.
    pub kind: TopologyKind,
    /// Keys merged into the create request.
    pub template: RequestTemplate,
}

impl LaunchConfig {
    /// Resolve arguments into a launch configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if no topology was named or the certificate
    /// directory is not valid UTF-8.
    pub fn from_args(args: &Args) -> Result<Self> {
        let selection = select(&args.words)?;
        let template = request_template(args, &selection)?;

        Ok(Self {
            address: args.mo_address.clone(),
            start_port: selection.port.unwrap_or(args.start_port),
            kind: selection.kind,
            template,
        })
    }
}

fn request_template(args: &Args, selection: &Selection) -> Result<RequestTemplate> {
    let mut template = RequestTemplate::default();

    if !args.db_user.is_empty() && !args.db_password.is_empty() {
        template.credentials = Some(Credentials::new(&args.db_user, &args.db_password));
    }

    if selection.auth {
        let login = non_empty(&args.db_user).unwrap_or(FALLBACK_LOGIN);
        let password = non_empty(&args.db_password).unwrap_or(FALLBACK_PASSWORD);
        template.credentials = Some(Credentials::new(login, password));
        template.auth_key = Some(AUTH_KEY.to_string());
    }

    if selection.tls {
        template.ssl_params = Some(TlsParams::from_dir(&args.certs_dir)?);
    }

    template.version = selection.version.map(str::to_string);
    Ok(template)
}

fn non_empty(value: &str) -> Option<&str> {
    (!value.is_empty()).then_some(value)
}
