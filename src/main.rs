mod client;
mod log;
mod models;
mod parser;
mod prompt;
mod stats;

use std::io::{IsTerminal, Read};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use crate::client::{ClientError, ResearchClient};
use crate::log::{FeedbackRecord, LogEntry, SearchLog, SearchRecord, Verdict, DEFAULT_LOG_PATH};
use crate::models::Model;
use crate::parser::ResearchResult;

#[derive(Parser)]
#[command(
    name = "contact_scout",
    about = "Describe someone you met. The model searches the web and finds them."
)]
struct Cli {
    /// Path to the search log file
    #[arg(long, global = true, default_value = DEFAULT_LOG_PATH)]
    log: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Research a person from free-text notes
    Research {
        /// Notes describing the person (read from stdin when omitted)
        notes: Option<String>,
        /// Model to use
        #[arg(short, long, value_enum, default_value_t = Model::Haiku)]
        model: Model,
        /// Print the prompt sent to the model before searching
        #[arg(long)]
        show_prompt: bool,
    },
    /// Record whether a search found the right person
    Feedback {
        /// Search id printed by the research command
        search_id: String,
        /// Was this the right person?
        #[arg(value_enum)]
        correct: Verdict,
        /// What worked or didn't
        #[arg(short, long, default_value = "")]
        comment: String,
    },
    /// Accuracy statistics from the search log
    Stats,
    /// Most recent searches with their feedback
    Recent {
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "8")]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let search_log = SearchLog::open(&cli.log);

    match cli.command {
        Commands::Research {
            notes,
            model,
            show_prompt,
        } => run_research(&search_log, notes, model, show_prompt).await,
        Commands::Feedback {
            search_id,
            correct,
            comment,
        } => {
            let record = FeedbackRecord::new(&search_id, correct, &comment);
            search_log.append(&LogEntry::Feedback(record))?;
            println!("Feedback saved — thank you!");
            Ok(())
        }
        Commands::Stats => {
            let entries = search_log.load_all()?;
            let s = stats::compute_stats(&entries);
            println!("Searches: {}", s.total);
            println!("Rated:    {}", s.rated);
            println!("Correct:  {}", s.correct);
            println!("Partial:  {}", s.partial);
            println!("Wrong:    {}", s.wrong);
            Ok(())
        }
        Commands::Recent { limit } => {
            let entries = search_log.load_all()?;
            let rows = stats::recent(&entries, limit);
            if rows.is_empty() {
                println!("No searches logged yet.");
                return Ok(());
            }
            for row in rows {
                let badge = row.verdict.map(|v| v.badge()).unwrap_or("·");
                println!(
                    "{} {:<32} {:<10} {}",
                    badge,
                    truncate(&row.display, 32),
                    truncate(&row.confidence, 10),
                    row.id
                );
            }
            Ok(())
        }
    }
}

async fn run_research(
    search_log: &SearchLog,
    notes: Option<String>,
    model: Model,
    show_prompt: bool,
) -> anyhow::Result<()> {
    let narrative = match notes {
        Some(n) => n,
        None => read_narrative_from_stdin()?,
    };
    let narrative = narrative.trim().to_string();
    if narrative.is_empty() {
        println!("Describe who you met first.");
        return Ok(());
    }

    if show_prompt {
        println!("--- Prompt ---");
        println!("{}", prompt::build_prompt(&narrative));
        println!("--------------");
    }

    let client = ResearchClient::from_env()
        .map_err(|_| anyhow::anyhow!("Set the ANTHROPIC_API_KEY environment variable first"))?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    spinner.set_message("Searching the web… (usually 15–30 seconds)");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let response = client.research(&narrative, model).await;
    spinner.finish_and_clear();

    let response = match response {
        Ok(r) => r,
        Err(ClientError::Auth) => {
            anyhow::bail!("Invalid API key. Check ANTHROPIC_API_KEY.")
        }
        Err(ClientError::RateLimited { .. }) => {
            anyhow::bail!("Rate limit hit. Wait a moment and try again.")
        }
        Err(e) => anyhow::bail!("Error: {e}"),
    };

    let result = parser::parse_response(&response.text, response.input_tokens, response.output_tokens);
    let record = SearchRecord::new(&narrative, &result, model.id());
    let search_id = record.id.clone();
    search_log.append(&LogEntry::Search(record))?;

    print_profile_card(&result, model);
    println!();
    println!("Search id: {search_id}");
    println!("Rate it with: contact_scout feedback {search_id} <yes|partial|no> [--comment \"...\"]");
    Ok(())
}

fn read_narrative_from_stdin() -> anyhow::Result<String> {
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        println!("Who did you meet? (finish with Ctrl-D)");
    }
    let mut buf = String::new();
    stdin
        .lock()
        .read_to_string(&mut buf)
        .context("Failed to read notes from stdin")?;
    Ok(buf)
}

fn print_profile_card(result: &ResearchResult, model: Model) {
    let dot = match result.confidence.as_deref() {
        Some("High") => "🟢",
        Some("Medium") => "🟡",
        Some("Low") => "🔴",
        _ => "⚪",
    };

    println!("{}", "─".repeat(72));
    println!("📋 {}", result.name.as_deref().unwrap_or("Unknown"));
    println!(
        "Confidence: {} {}",
        dot,
        result.confidence.as_deref().unwrap_or("?")
    );

    if !result.links.is_empty() {
        println!();
        println!("Profiles found:");
        for link in &result.links {
            println!("  {:<12} {}", link.platform.label(), link.url);
        }
    }

    println!("{}", "─".repeat(72));
    println!("{}", result.profile.trim());

    if let (Some(input), Some(output)) = (result.input_tokens, result.output_tokens) {
        println!();
        println!(
            "Tokens: {} in / {} out — est. cost: ${:.3}",
            input,
            output,
            model.estimate_cost_usd(input, output)
        );
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}
