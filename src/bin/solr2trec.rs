use anyhow::Context;
use clap::Parser;
use flatconv_core::Config;
use flatconv_formats::trec::{self, SearchResponse, TrecFields};
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "solr2trec",
    version,
    about = "Convert Solr results to TREC format"
)]
struct Cli {
    /// Experiment or system identifier [default: run0].
    #[arg(long)]
    run_id: Option<String>,
    /// Solr response file [default: results/solr_results.json].
    #[arg(long)]
    input: Option<PathBuf>,
    /// Also write a qrels file marking every returned document relevant.
    #[arg(long)]
    qrels: Option<PathBuf>,
    /// Document id field [default: tconst].
    #[arg(long)]
    id_field: Option<String>,
    /// Score field [default: averageRating].
    #[arg(long)]
    score_field: Option<String>,
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
    let input = cli.input.unwrap_or(config.trec.input);
    let run_id = cli.run_id.unwrap_or(config.trec.run_id);
    let fields = TrecFields::new(
        cli.id_field.unwrap_or(config.trec.id_field),
        cli.score_field.unwrap_or(config.trec.score_field),
    );

    let response = SearchResponse::load(&input)?;
    tracing::info!(input = %input.display(), queries = response.len(), %run_id, "loaded response");

    // Build everything before writing so a malformed entry prints nothing.
    let lines = trec::to_run_lines(&response, &run_id, &fields)?;
    let qrels = match &cli.qrels {
        Some(_) => Some(trec::to_qrels(&response, &fields)?),
        None => None,
    };

    let stdout = std::io::stdout().lock();
    trec::write_lines(std::io::BufWriter::new(stdout), &lines)
        .context("failed to write run lines")?;

    if let (Some(path), Some(qrels)) = (&cli.qrels, qrels) {
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        trec::write_lines(&mut file, &qrels)
            .with_context(|| format!("failed to write {}", path.display()))?;
        file.flush()?;
        tracing::info!(path = %path.display(), lines = qrels.len(), "wrote qrels");
    }

    Ok(())
}
