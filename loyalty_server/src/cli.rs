use std::{env, env::VarError};

use clap::Parser;

/// Loyalty points backend: keeps uploaded orders in step with the accrual service.
///
/// Every option can also be given as an environment variable (shown in brackets), or in a `.env` file. Command line
/// arguments take precedence over the environment.
#[derive(Debug, Default, Parser)]
#[command(version, about)]
pub struct Arguments {
    /// The address the operations HTTP server listens on, e.g. `localhost:8081`
    #[arg(short = 'a', long = "address", env = "RUN_ADDRESS")]
    pub run_address: Option<String>,
    /// The base URL of the accrual service. `http://` is assumed if no scheme is given
    #[arg(short = 'r', long = "accrual-address", env = "ACCRUAL_SYSTEM_ADDRESS")]
    pub accrual_address: Option<String>,
    /// The database URL, e.g. `sqlite://data/loyalty.db`
    #[arg(short = 'd', long = "database-uri", env = "DATABASE_URI", hide_env_values = true)]
    pub database_uri: Option<String>,
    /// Print the current configuration environment and exit
    #[arg(long)]
    pub show_env: bool,
}

pub fn display_envs() {
    // Be explicit about which envars to print, so as to avoid accidentally exposing secrets
    const DISPLAY_ENVS: [&str; 9] = [
        "RUST_LOG",
        "RUN_ADDRESS",
        "ACCRUAL_SYSTEM_ADDRESS",
        "LPS_ACCRUAL_WORKERS",
        "LPS_DISCOVERY_INTERVAL_SECS",
        "LPS_PAUSE_COOLDOWN_SECS",
        "LPS_WORK_QUEUE_SIZE",
        "LPS_ACCRUAL_TIMEOUT_SECS",
        "LPS_RUN_MIGRATIONS",
    ];

    println!("Current environment values (EXCLUDING variables that contain secrets):");
    DISPLAY_ENVS.iter().for_each(|&name| {
        let val = match env::var(name) {
            Ok(s) => s,
            Err(VarError::NotPresent) => "Not set".into(),
            Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
        };
        println!("  {name:<35} {val:<15}");
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn short_flags() {
        let args = Arguments::try_parse_from([
            "loyalty_server",
            "-a",
            "0.0.0.0:9000",
            "-r",
            "accrual:8080",
            "-d",
            "sqlite://test.db",
        ])
        .unwrap();
        assert_eq!(args.run_address.as_deref(), Some("0.0.0.0:9000"));
        assert_eq!(args.accrual_address.as_deref(), Some("accrual:8080"));
        assert_eq!(args.database_uri.as_deref(), Some("sqlite://test.db"));
        assert!(!args.show_env);
    }

    #[test]
    fn show_env_flag() {
        let args = Arguments::try_parse_from(["loyalty_server", "--show-env"]).unwrap();
        assert!(args.show_env);
    }
}
