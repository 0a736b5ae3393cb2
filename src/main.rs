mod download;
mod fetcher;
mod parser;
mod query;
mod record;
mod settings;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};

use fetcher::{HttpFetcher, ProfileSource};
use record::FacultyRecord;
use settings::Settings;

const SEMINAR_SCHEDULE: &[&str] = &[
    "Seminar Schedule:",
    "1. Macroeconomics Seminar - Mondays at 10 AM",
    "2. Microeconomics Seminar - Wednesdays at 2 PM",
    "3. Econometrics Seminar - Fridays at 1 PM",
];

#[derive(Parser)]
#[command(name = "faculty_scraper", about = "Faculty directory profile scraper")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch one profile and print it
    FetchBio {
        slug: String,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Fetch every slug listed in a file into <slug>.txt files
    DownloadProfiles {
        input_file: PathBuf,
        output_directory: PathBuf,
        /// Max requests in flight (default: FACULTY_CONCURRENCY or 5)
        #[arg(short, long)]
        concurrency: Option<usize>,
    },
    /// Print saved profiles whose discipline mentions economics
    FetchAllEconomists {
        #[arg(required = true)]
        input_files: Vec<PathBuf>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the seminar schedule
    PrintSeminarSchedule,
    /// Find the saved profile with the longest bio
    FindMostVerboseBio {
        #[arg(required = true)]
        input_files: Vec<PathBuf>,
    },
    /// Print a sample faculty member and their greeting
    SayHello {
        department: String,
        years_at_yale: u32,
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

    let t0 = Instant::now();
    let cli = Cli::parse();
    let result = run(cli.command).await;

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {:.1}s", elapsed.as_secs_f64());
    }

    result
}

async fn run(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::FetchBio { slug, json } => {
            let settings = Settings::load()?;
            let fetcher = HttpFetcher::new(&settings.base_url, settings.timeout())?;
            let html = fetcher.fetch(&slug).await?;
            let record = parser::extract(&html);
            print_records(std::slice::from_ref(&record), json)
        }
        Commands::DownloadProfiles {
            input_file,
            output_directory,
            concurrency,
        } => {
            let slugs = download::read_slugs(&input_file)?;
            if slugs.is_empty() {
                println!("No slugs in {}.", input_file.display());
                return Ok(());
            }
            let settings = Settings::load()?;
            let concurrency = concurrency.unwrap_or(settings.concurrency);
            let fetcher = Arc::new(HttpFetcher::new(&settings.base_url, settings.timeout())?);

            println!("Downloading {} profiles ({} at a time)...", slugs.len(), concurrency);
            let stats = download::download_all(
                fetcher,
                slugs,
                &output_directory,
                concurrency,
                &download::TracingLogger,
            )
            .await?;
            println!(
                "Done: {} profiles ({} ok, {} errors).",
                stats.total, stats.ok, stats.errors
            );
            Ok(())
        }
        Commands::FetchAllEconomists { input_files, json } => {
            let records = parser::load_records(&input_files)?;
            let economists = query::find_economists(&records);
            if economists.is_empty() && !json {
                println!("No economists found.");
                return Ok(());
            }
            print_records(&economists, json)
        }
        Commands::PrintSeminarSchedule => {
            for line in SEMINAR_SCHEDULE {
                println!("{}", line);
            }
            Ok(())
        }
        Commands::FindMostVerboseBio { input_files } => {
            let records = parser::load_records(&input_files)?;
            print!("{}", verbose_report(&records)?);
            Ok(())
        }
        Commands::SayHello {
            department,
            years_at_yale,
        } => {
            let kyle = sample_faculty(&department, years_at_yale);
            println!("{}", kyle);
            println!("{}", kyle.greeting());
            Ok(())
        }
    }
}

fn print_records(records: &[FacultyRecord], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(records)?);
        return Ok(());
    }
    for (i, r) in records.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{}", r);
    }
    Ok(())
}

/// Every record, then the one with the wordiest bio.
fn verbose_report(records: &[FacultyRecord]) -> anyhow::Result<String> {
    let winner = query::most_verbose(records)
        .context("None of the input files held a profile")?;
    let mut out = String::new();
    for r in records {
        out.push_str(&format!("{}\n\n", r));
    }
    out.push_str(&format!(
        "Most verbose bio: {} with {} words.\n",
        winner.name,
        winner.word_count()
    ));
    Ok(out)
}

fn sample_faculty(department: &str, years: u32) -> FacultyRecord {
    let bio = format!(
        "An economist with a focus on macroeconomics who has been at Yale for {} years.",
        years
    );
    FacultyRecord::new("Kyle", bio, department)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn subcommand_names() {
        let cli = Cli::try_parse_from(["faculty_scraper", "download-profiles", "slugs.txt", "out", "-c", "3"]).unwrap();
        match cli.command {
            Commands::DownloadProfiles { concurrency, output_directory, .. } => {
                assert_eq!(concurrency, Some(3));
                assert_eq!(output_directory, PathBuf::from("out"));
            }
            _ => panic!("wrong subcommand"),
        }
        assert!(Cli::try_parse_from(["faculty_scraper", "find-most-verbose-bio"]).is_err());
        assert!(Cli::try_parse_from(["faculty_scraper", "print-seminar-schedule"]).is_ok());
    }

    #[test]
    fn verbose_report_lists_all_then_winner() {
        let records = vec![
            FacultyRecord::new("Ann", "one two", "Economics"),
            FacultyRecord::new("Bo", "one two three", "History"),
        ];
        let report = verbose_report(&records).unwrap();
        assert_eq!(
            report,
            "Name: Ann\nBio: one two\nDiscipline: Economics\n\n\
             Name: Bo\nBio: one two three\nDiscipline: History\n\n\
             Most verbose bio: Bo with 3 words.\n"
        );
        assert!(verbose_report(&[]).is_err());
    }

    #[tokio::test]
    async fn offline_commands_ignore_bad_settings() {
        std::env::set_var("FACULTY_CONCURRENCY", "lots");
        assert!(Settings::load().is_err());

        run(Commands::PrintSeminarSchedule).await.unwrap();
        run(Commands::FindMostVerboseBio {
            input_files: vec![PathBuf::from("tests/fixtures/judith-chevalier.html")],
        })
        .await
        .unwrap();
        run(Commands::SayHello {
            department: "Economics".into(),
            years_at_yale: 3,
        })
        .await
        .unwrap();

        std::env::remove_var("FACULTY_CONCURRENCY");
    }

    #[test]
    fn sample_mentions_years() {
        let k = sample_faculty("Economics", 7);
        assert_eq!(k.discipline, "Economics");
        assert!(k.biography.contains("for 7 years"));
        assert_eq!(SEMINAR_SCHEDULE.len(), 4);
    }
}
