use anyhow::Context;
use clap::Parser;
use jobsort_classifiers::{
    ensure_resources, ClassificationPipeline, KeywordTable, LinguisticResources, PipelineConfig,
};
use jobsort_cli::cli::{Cli, Commands};
use jobsort_cli::{file_document, filing_majors, render_batch, render_result};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = PipelineConfig::load(&cli.config)
        .with_context(|| format!("Invalid configuration {}", cli.config.display()))?;
    if let Some(keywords) = cli.keywords {
        config.keywords_path = keywords;
    }

    match cli.command {
        Commands::Classify {
            files,
            json,
            file_into,
            with_alternates,
            majors,
            toggle_contract,
        } => {
            let pipeline = ClassificationPipeline::from_config(&config)?;
            let chosen = majors
                .iter()
                .map(|name| pipeline.resolve_major(name).map(str::to_string))
                .collect::<Result<Vec<_>, _>>()
                .with_context(|| format!("Available majors: {}", pipeline.majors().join(", ")))?;
            let mut results = Vec::with_capacity(files.len());

            for file in &files {
                let mut result = pipeline.classify(file);
                if toggle_contract && !result.is_failure() {
                    result.contract_type = result.contract_type.toggled();
                }

                if !json {
                    print!("{}", render_result(&result));
                }

                if let Some(root) = &file_into {
                    let classifications = filing_majors(&result, &chosen, with_alternates);
                    if classifications.is_empty() {
                        warn!("Not filing {}: no major selected", file.display());
                    } else {
                        let outcome = file_document(file, root, result.contract_type, &classifications);
                        for target in &outcome.copied {
                            println!("  filed into:     {}", target.display());
                        }
                        for (target, err) in &outcome.failed {
                            eprintln!("  copy to {} failed: {}", target.display(), err);
                        }
                        for skipped in &outcome.skipped {
                            info!("{} names no degree, not filed", skipped);
                        }
                    }
                }

                results.push(result);
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            }
        }

        Commands::Batch { directory, json } => {
            let pipeline = ClassificationPipeline::from_config(&config)?;
            let report = pipeline.classify_directory(&directory)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", render_batch(&report));
            }
        }

        Commands::Majors => {
            let store = ensure_resources(&config.resources, config.lemmatizer)?;
            let normalizer = LinguisticResources::load(&store, config.lemmatizer)?.into_normalizer()?;
            let table = KeywordTable::load(&config.keywords_path, &normalizer)?;

            for (major, keywords) in table.iter() {
                println!("{} ({} keywords)", major, keywords.len());
            }
        }

        Commands::Resources => {
            let store = ensure_resources(&config.resources, config.lemmatizer)?;
            println!(
                "Linguistic resources ready in {}",
                store.corpora_dir().display()
            );
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        "jobsort=debug,jobsort_cli=debug,jobsort_classifiers=debug,jobsort_extract=debug"
    } else {
        "jobsort=info,jobsort_cli=info,jobsort_classifiers=info,jobsort_extract=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
