//! pzctl - operator tool for Prüfziffer V2 tokens
//!
//! Computes HCVs, issues tokens for cards in a reference database and verifies
//! tokens. Exit status: 0 on success, 1 if a token fails verification, 2 on
//! any error.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use pruefziffer::prelude::*;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::prelude::__tracing_subscriber_SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "pzctl")]
#[command(about = "Generate and verify Prüfziffer V2 tokens", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the HCV for a VB and street
    Hcv {
        /// Versicherungsbeginn, 8 characters (e.g. 20190212)
        #[arg(long)]
        vb: String,

        /// Street name
        #[arg(long, default_value = "")]
        street: String,
    },

    /// Generate a token for a card in the reference database
    Generate {
        /// Operator configuration (JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// Reference database (JSON)
        #[arg(long)]
        db: PathBuf,

        /// Card serial number
        #[arg(long)]
        iccsn: String,

        /// Operator code; required when more than one operator is configured
        #[arg(long, requires = "key_version")]
        operator: Option<char>,

        /// Key version of the operator secret
        #[arg(long, requires = "operator")]
        key_version: Option<u8>,
    },

    /// Verify a token
    Verify {
        /// Operator configuration (JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// Token to check
        #[arg(long)]
        token: String,

        /// Claimed KVNR
        #[arg(long)]
        kvnr: String,

        /// Expected HCV (hex)
        #[arg(long, conflicts_with_all = ["vb", "street"], required_unless_present = "vb")]
        hcv: Option<String>,

        /// Versicherungsbeginn used to recompute the HCV
        #[arg(long)]
        vb: Option<String>,

        /// Street used to recompute the HCV
        #[arg(long, requires = "vb")]
        street: Option<String>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Hcv { vb, street } => {
            let hcv = generate_hcv(&vb, &street)?;
            println!("{}", hcv);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Generate {
            config,
            db,
            iccsn,
            operator,
            key_version,
        } => {
            let config = load_config(&config)?;
            let db = ReferenceDb::from_json_file(&db)
                .with_context(|| format!("loading reference database {}", db.display()))?;
            let operator = select_operator(&config, operator, key_version)?;

            let generator = Generator::new(operator)?;
            let token = generator.generate_for_card(&db, &iccsn)?;
            println!("{}", token);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Verify {
            config,
            token,
            kvnr,
            hcv,
            vb,
            street,
        } => {
            let config = load_config(&config)?;
            let expected = expected_hcv(hcv.as_deref(), vb.as_deref(), street.as_deref())?;

            let verifier = Verifier::from_config(&config)?;
            let outcome = verifier.verify(&token, &kvnr, expected.as_bytes())?;
            println!("{}", outcome);
            debug!(success = outcome.is_success(), "Verification finished");
            Ok(if outcome.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            })
        }
    }
}

fn load_config(path: &Path) -> Result<PruefzifferConfig> {
    PruefzifferConfig::from_json_file(path)
        .with_context(|| format!("loading configuration {}", path.display()))
}

fn select_operator(
    config: &PruefzifferConfig,
    operator: Option<char>,
    key_version: Option<u8>,
) -> Result<&OperatorKeyConfig> {
    match (operator, key_version) {
        (Some(code), Some(version)) => Ok(config.operator(code, version)?),
        _ => match config.operators.as_slice() {
            [only] => Ok(only),
            [] => bail!("no operators configured"),
            _ => bail!("several operators configured; pass --operator and --key-version"),
        },
    }
}

fn expected_hcv(hcv: Option<&str>, vb: Option<&str>, street: Option<&str>) -> Result<Hcv> {
    match (hcv, vb) {
        (Some(hex), _) => Ok(Hcv::from_hex(hex)?),
        (None, Some(vb)) => Ok(generate_hcv(vb, street.unwrap_or(""))?),
        (None, None) => bail!("either --hcv or --vb is required"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    const SECRET_X: &str = "0101010101010101010101010101010101010101010101010101010101010101";
    const SECRET_Y: &str = "0202020202020202020202020202020202020202020202020202020202020202";

    fn config(entries: &[(&str, u8, &str)]) -> PruefzifferConfig {
        let operators: Vec<String> = entries
            .iter()
            .map(|(code, version, secret)| {
                format!(
                    r#"{{"operator_code": "{}", "key_version": {}, "shared_secret": "{}"}}"#,
                    code, version, secret
                )
            })
            .collect();
        let json = format!(r#"{{"operators": [{}]}}"#, operators.join(","));
        PruefzifferConfig::from_json_str(&json).unwrap()
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_select_single_operator() {
        let config = config(&[("X", 2, SECRET_X)]);
        let op = select_operator(&config, None, None).unwrap();
        assert_eq!(op.prefix().as_byte(), 0xDE);
    }

    #[test]
    fn test_select_requires_explicit_operator() {
        let config = config(&[("X", 2, SECRET_X), ("Y", 0, SECRET_Y)]);
        assert!(select_operator(&config, None, None).is_err());

        let op = select_operator(&config, Some('Y'), Some(0)).unwrap();
        assert_eq!(op.operator_code().as_char(), 'Y');
        assert!(select_operator(&config, Some('Z'), Some(0)).is_err());
    }

    #[test]
    fn test_expected_hcv_sources() {
        let from_hex = expected_hcv(Some("6545491d14"), None, None).unwrap();
        let computed = expected_hcv(None, Some("19981123"), Some("Berliner Straße")).unwrap();
        assert_eq!(from_hex, computed);
        assert!(expected_hcv(None, None, None).is_err());
    }

    #[test]
    fn test_verify_args() {
        let cli = Cli::try_parse_from([
            "pzctl", "verify", "-c", "cfg.json", "--token", "t", "--kvnr", "X123456789", "--hcv",
            "4885ee8394",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Verify { hcv: Some(_), .. }));

        let conflicting = Cli::try_parse_from([
            "pzctl", "verify", "-c", "cfg.json", "--token", "t", "--kvnr", "X123456789", "--hcv",
            "4885ee8394", "--vb", "20190212",
        ]);
        assert!(conflicting.is_err());
    }
}
