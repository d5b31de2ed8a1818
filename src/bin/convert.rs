use anyhow::Context;
use clap::Parser;
use flatconv_core::{Config, Delimiter};
use flatconv_formats::{convert, ConvertOptions};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "convert",
    version,
    about = "Convert a TSV/CSV file with a header row into a JSON array"
)]
struct Cli {
    /// Delimited input file (UTF-8, first row is the header).
    input: PathBuf,
    /// JSON file to write.
    output: PathBuf,
    /// Field profile to apply (built in: titles, basics, reviews).
    #[arg(long)]
    profile: Option<String>,
    /// Override the profile's delimiter: tab or comma.
    #[arg(long)]
    delimiter: Option<Delimiter>,
    /// Config file layered over the built-in defaults.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Log filter for stderr output.
    #[arg(long, default_value = flatconv::DEFAULT_LOG_LEVEL)]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let cli: Cli = flatconv::parse_args();
    flatconv::init_logging(&cli.log_level);

    let config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    let profile_name = cli
        .profile
        .as_deref()
        .unwrap_or(&config.convert.default_profile);
    let profile = config.profile(profile_name)?;
    let spec = config.field_spec(profile_name)?;
    let delimiter = cli.delimiter.unwrap_or(profile.delimiter);

    tracing::info!(
        profile = profile_name,
        %delimiter,
        fields = spec.len(),
        input = %cli.input.display(),
        "converting"
    );

    let options = ConvertOptions::new(delimiter, spec).with_indent(config.convert.indent);
    let count = convert(&cli.input, &cli.output, &options)
        .with_context(|| format!("failed to convert {}", cli.input.display()))?;

    println!("Wrote {} records to {}", count, cli.output.display());
    Ok(())
}
