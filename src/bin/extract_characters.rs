//! Stage 2: resolve character names for every preprocessed story.
//!
//! Usage:
//!   extract-characters [--input path] [--output path] [--config path] [--log-level level]
//!
//! Defaults to data/processed/stories_preprocessed.json →
//! data/processed/stories_with_characters.json.

use clap::Parser;
use storyprep::cli::{init_tracing, report_error, StageArgs};
use storyprep::config::{PREPROCESSED_STORIES, STORIES_WITH_CHARACTERS};
use storyprep::{run_stage, CharacterResolver};

#[derive(Parser)]
#[command(
    name = "extract-characters",
    version,
    about = "Add a sorted list of character names to every story record"
)]
struct Cli {
    #[command(flatten)]
    args: StageArgs,
}

fn run(args: &StageArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = args.load_config()?;
    let (input, output) = args.paths(
        &config.characters,
        PREPROCESSED_STORIES,
        STORIES_WITH_CHARACTERS,
    );

    let nlp = config.nlp.build()?;
    let resolver = CharacterResolver::new(nlp.recognizer());
    run_stage(&resolver, &input, &output)?;

    println!("Character extraction completed. Saved to {}", output.display());
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.args.log_level);

    if let Err(e) = run(&cli.args) {
        report_error(e.as_ref());
        std::process::exit(1);
    }
}
