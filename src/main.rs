use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use tracing::{Level, info, warn};
use tracing_subscriber::EnvFilter;

use shredder::config::{Cli, DictionaryMode};
use shredder::{Pipeline, TsvDeck, write_deck, write_reports};
use shredder_dict::{Dictionary, LoadMode};
use shredder_tokenize::VibratoAnalyzer;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = cli.validate()?;
    let deck = TsvDeck::new(cli.deck_name.as_str())?;
    info!("reading scripts from {}", cli.input_dir.display());
    info!("writing results to {}", cli.output_dir.display());

    let start = Instant::now();
    let mode = match cli.dictionary_mode {
        DictionaryMode::Mmap => LoadMode::Mmap,
        DictionaryMode::Owned => LoadMode::Owned,
    };
    let dictionary = Dictionary::load_with_mode(&cli.dictionary, mode)?;
    info!(
        "dictionary loaded in {} ms ({} forms)",
        start.elapsed().as_millis(),
        dictionary.form_count()
    );

    let start = Instant::now();
    let analyzer = VibratoAnalyzer::load(&cli.tokenizer_dict)?;
    info!("tokenizer loaded in {} ms", start.elapsed().as_millis());

    let paths = shredder_subs::discover(&cli.input_dir)?;
    if paths.is_empty() {
        warn!("no .ass, .srt or .txt files in {}", cli.input_dir.display());
    }
    let mut documents = Vec::with_capacity(paths.len());
    for path in &paths {
        let document = shredder_subs::read_document(path)
            .with_context(|| format!("failed to load {}", path.display()))?;
        documents.push(document);
    }

    let start = Instant::now();
    let run = Pipeline::new(analyzer, &dictionary, config).run(documents);
    if run.skipped > 0 {
        warn!("{} malformed occurrences skipped", run.skipped);
    }
    let out = run.materialize(&config);
    info!("corpus built in {} ms", start.elapsed().as_millis());

    write_reports(&out.report, &cli.output_dir)?;
    write_deck(&deck, &out.flashcards, &cli.output_dir)?;
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let max_level = env_filter
        .max_level_hint()
        .and_then(|hint| hint.into_level())
        .unwrap_or(Level::INFO);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_level(true)
        .with_max_level(max_level)
        .init();
}
