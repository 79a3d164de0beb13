use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use buddy_agents::ReviewAnalyzer;
use buddy_ml::ReviewMlStack;
use buddy_observability::{init_tracing, AppMetrics};
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "buddy")]
#[command(about = "Travel Buddy review sentiment CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Analyze one review text.
    Analyze {
        text: String,
        #[arg(long)]
        aspects: bool,
    },
    /// Analyze a file of reviews, one per line.
    Batch {
        file: PathBuf,
        #[arg(long)]
        aspects: bool,
    },
    /// Detect the language of a text.
    DetectLanguage { text: String },
    /// Interactive analysis loop.
    Repl,
}

fn main() -> Result<()> {
    init_tracing("buddy_cli");
    let cli = Cli::parse();

    let analyzer = ReviewAnalyzer::new(ReviewMlStack::shared().clone(), AppMetrics::shared());

    match cli.command {
        Command::Analyze { text, aspects } => {
            let result = analyzer.analyze(&text, aspects)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Batch { file, aspects } => {
            let raw = fs::read_to_string(&file)
                .with_context(|| format!("failed reading reviews from {}", file.display()))?;
            let texts = raw
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(ToString::to_string)
                .collect::<Vec<_>>();

            let mut report = Vec::new();
            for (text, outcome) in texts.iter().zip(analyzer.analyze_batch(&texts, aspects)) {
                report.push(match outcome {
                    Ok(result) => serde_json::json!({ "text": text, "result": result }),
                    Err(error) => serde_json::json!({ "text": text, "error": error.to_string() }),
                });
            }
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::DetectLanguage { text } => {
            let prediction = analyzer.detect_language(&text);
            println!("{}", serde_json::to_string_pretty(&prediction)?);
        }
        Command::Repl => run_repl(analyzer)?,
    }

    Ok(())
}

fn run_repl(analyzer: ReviewAnalyzer) -> Result<()> {
    println!("Travel Buddy review mode. type 'exit' to quit.");

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }

        let review = line.trim();
        if review.eq_ignore_ascii_case("exit") || review.eq_ignore_ascii_case("quit") {
            break;
        }

        if review.is_empty() {
            continue;
        }

        match analyzer.analyze(review, true) {
            Ok(result) => println!("\n{}\n", serde_json::to_string_pretty(&result)?),
            Err(error) => println!("\nanalysis failed, try again ({error})\n"),
        }
    }

    Ok(())
}
