use clap::Parser;
use form_autofill::cli::commands::{cmd_analyze, cmd_fill, cmd_match};
use form_autofill::cli::config::{Cli, Commands, build_traversal_config, load_config};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());

    match cli.command {
        Commands::Analyze { url, json } => {
            cmd_analyze(&url, json, cli.verbose)?;
        }
        Commands::Fill {
            url,
            data,
            max_steps,
            min_score,
            settle_ms,
            trace,
            json,
        } => {
            let traversal = build_traversal_config(&config, max_steps, min_score, settle_ms);
            let trace_path = trace.or(config.fill.trace.clone());
            let success = cmd_fill(
                &url,
                &data,
                traversal,
                trace_path.as_deref(),
                json,
                cli.verbose,
            )?;
            if !success {
                std::process::exit(1);
            }
        }
        Commands::Match {
            fields,
            data,
            min_score,
        } => {
            let floor = min_score.unwrap_or(config.fill.min_score);
            cmd_match(&fields, &data, floor)?;
        }
    }

    Ok(())
}
