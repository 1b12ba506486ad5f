use clap::Parser;
use assert_tally::cli::commands::cmd_run;
use assert_tally::cli::config::{Cli, Commands, build_tally_config, load_config};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());

    // Resolve host debug mode: CLI flag > config
    let debug = cli.debug || config.debug;

    match cli.command {
        Commands::Run {
            plan,
            mode,
            format,
            output,
        } => {
            let tally_config =
                build_tally_config(&config, cli.verbosity, mode, cli.trace.as_deref());
            let format = format.unwrap_or_else(|| config.run.format.clone());
            let output = output.or_else(|| config.run.output.clone());

            let clean = cmd_run(&plan, tally_config, debug, &format, output.as_deref())?;
            if !clean {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
