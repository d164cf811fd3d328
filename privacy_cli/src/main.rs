use clap::Parser;
use libprivacy::p256_shared;
use log::*;
use privacy_cli::commands::{compress, decompress, derive_address, derive_keys, open_commitment, render};
use privacy_cli::config::{CliCommand, Config, GlobalOptions};
use privacy_cli::settings::{default_settings_path, Settings};

fn main() {
    env_logger::init();
    let config: Config = Config::parse();
    let (global_options, command) = config.to_parts();

    match run(command, global_options) {
        Ok(output) => println!("{output}"),
        Err(err) => {
            eprintln!("** Error ** \n {err}");
            std::process::exit(1);
        }
    }
}

fn run(command: CliCommand, options: GlobalOptions) -> Result<String, anyhow::Error> {
    let path = options.config_file.unwrap_or_else(default_settings_path);
    let settings = Settings::load_or_default(Some(&path))?;
    let format = options.output.unwrap_or(settings.output);
    debug!("Output format: {format:?}");
    let curve = p256_shared();
    let output = match command {
        CliCommand::Keys { seed } => render(&derive_keys(curve, &seed, settings.show_secrets)?, format)?,
        CliCommand::Address { seed } => render(&derive_address(curve, &seed)?, format)?,
        CliCommand::Decompress { point } => render(&decompress(curve, &point)?, format)?,
        CliCommand::Commitment { commitment } => render(&open_commitment(curve, &commitment)?, format)?,
        CliCommand::Compress { x, y, tag } => render(&compress(curve, &x, &y, tag)?, format)?,
    };
    Ok(output)
}
