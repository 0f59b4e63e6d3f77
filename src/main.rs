//! `letsconfig`: create a Django settings file from a defaults module and
//! environment-provided inputs.
//!
//! ```sh
//! letsconfig /srv/mysite/settings.ini --defaults mysite.settings.base
//! letsconfig /srv/mysite/settings.ini --defaults base.toml --dry-run
//! letsconfig /srv/mysite/settings.ini --list-inputs
//! ```

use clap::{ArgAction, Parser};
use tracing_subscriber::EnvFilter;

use letsconfig::GenerateArgs;

#[derive(Parser, Debug)]
#[command(name = "letsconfig", version, about)]
struct Cli {
    /// More log output on stderr (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    #[command(flatten)]
    args: GenerateArgs,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("letsconfig={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let action = cli.args.action();
    let result = cli
        .args
        .builder()
        .and_then(|builder| builder.handle_and_print(&action));

    if let Err(e) = result {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
