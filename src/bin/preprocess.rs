//! Stage 1: split stories into sentences and extract quoted dialogue.
//!
//! Usage:
//!   preprocess [--input path] [--output path] [--config path] [--log-level level]
//!
//! Defaults to data/raw/stories.json → data/processed/stories_preprocessed.json.

use clap::Parser;
use storyprep::cli::{init_tracing, report_error, StageArgs};
use storyprep::config::{PREPROCESSED_STORIES, RAW_STORIES};
use storyprep::{run_stage, Segmenter};

#[derive(Parser)]
#[command(
    name = "preprocess",
    version,
    about = "Add sentences and dialogues to every story record"
)]
struct Cli {
    #[command(flatten)]
    args: StageArgs,
}

fn run(args: &StageArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = args.load_config()?;
    let (input, output) = args.paths(&config.preprocess, RAW_STORIES, PREPROCESSED_STORIES);

    let nlp = config.nlp.build()?;
    let segmenter = Segmenter::new(nlp.splitter());
    run_stage(&segmenter, &input, &output)?;

    println!("Processed dataset saved to {}", output.display());
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
