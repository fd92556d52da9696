use clap::Parser;
use color_eyre::eyre::Result;
use config::{Cli, Command, Settings};
use history::History;
use vocabulary::Vocabulary;

mod config;
mod constraints;
mod errors;
mod feedback;
mod game;
mod history;
mod interactive;
mod logging;
mod simulation;
mod stats;
mod tui;
mod vocabulary;
mod words;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    errors::install_hooks()?;
    let cli = Cli::parse();
    logging::init(cli.log_file.as_deref())?;

    let settings = Settings::load(&cli.setup)?;
    let vocabulary = Vocabulary::load(&settings.vocabulary_file, settings.word_length)?;
    let history = History::load(&settings.current_file, &settings.previous_file)?;
    println!(
        "Loaded {} words and {} previous games",
        vocabulary.len(),
        history.len()
    );

    match cli.command.unwrap_or_default() {
        Command::Play => {
            let line_length = settings.line_length;
            let mut app = interactive::App::new(settings, vocabulary, history);
            app.run().await?;

            let chart = app.history().tries_chart();
            println!("{}:", chart.title());
            for line in chart.lines(line_length.saturating_sub(9)) {
                println!("{line}");
            }
            Ok(())
        }
        Command::Simulate { limit } => simulation::run(&settings, &vocabulary, &history, limit),
    }
}
