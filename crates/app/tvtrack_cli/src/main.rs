// Import and re-export the `error` module
pub use self::error::{Error, Result};
mod error;

use clap::Parser;
use cli::{Cli, Commands};

mod cli;
mod logging;
mod verify;

fn main() -> Result<()> {
    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::init()?;

    let args = Cli::parse();

    match &args.command {
        Commands::Version => {
            println!("{} {}", env!("CARGO_PKG_NAME"), tvtrack_core::version());
        }
        Commands::Schema => {
            let schema = tvtrack_api::graphql::build_schema(&Default::default());
            print!("{}", schema.sdl());
        }
        Commands::Verify(verify_args) => {
            let user = verify::run(verify_args)?;
            println!("{}", serde_json::to_string_pretty(&user)?);
        }
    }

    Ok(())
}
