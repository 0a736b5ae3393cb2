use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;

use crate::fetcher::ProfileSource;
use crate::parser;

pub const DEFAULT_CONCURRENCY: usize = 5;

/// Sink for per-slug batch messages.
pub trait Logger: Send + Sync {
    fn info(&self, msg: &str);
    fn error(&self, msg: &str);
}

/// Forwards to the global `tracing` subscriber.
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn info(&self, msg: &str) {
        tracing::info!("{}", msg);
    }

    fn error(&self, msg: &str) {
        tracing::error!("{}", msg);
    }
}

/// Download stats returned after completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadStats {
    pub total: usize,
    pub ok: usize,
    pub errors: usize,
}

/// One slug per line; surrounding whitespace trimmed, blank lines dropped.
pub fn read_slugs(path: &Path) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read slug list {}", path.display()))?;
    Ok(parse_slugs(&contents))
}

fn parse_slugs(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Fetch every slug with at most `concurrency` requests in flight and write
/// `<output_dir>/<slug>.txt` for each one that succeeds.
///
/// Per-slug failures are reported through `logger` and never abort the batch.
/// The only error returned is failure to create `output_dir`.
pub async fn download_all<S: ProfileSource>(
    source: Arc<S>,
    slugs: Vec<String>,
    output_dir: &Path,
    concurrency: usize,
    logger: &dyn Logger,
) -> Result<DownloadStats> {
    tokio::fs::create_dir_all(output_dir)
        .await
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let concurrency = concurrency.max(1);
    let semaphore = Arc::new(Semaphore::new(concurrency));
    let total = slugs.len();

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")?
            .progress_chars("=> "),
    );

    // Workers send outcomes, this loop reports them in completion order
    let (tx, mut rx) = tokio::sync::mpsc::channel::<(String, Result<PathBuf>)>(concurrency * 2);

    for slug in slugs {
        let source = Arc::clone(&source);
        let sem = Arc::clone(&semaphore);
        let tx = tx.clone();
        let dir = output_dir.to_path_buf();

        tokio::spawn(async move {
            let Ok(_permit) = sem.acquire_owned().await else {
                return;
            };
            // Inner task so a panic still reports back under this slug
            let job_slug = slug.clone();
            let job = tokio::spawn(async move {
                download_one(source.as_ref(), &job_slug, &dir).await
            });
            let outcome = match job.await {
                Ok(result) => result,
                Err(e) => Err(anyhow!("download task failed: {}", e)),
            };
            let _ = tx.send((slug, outcome)).await;
        });
    }

    // rx closes once every task has dropped its sender
    drop(tx);

    let mut ok = 0usize;
    let mut errors = 0usize;

    while let Some((slug, outcome)) = rx.recv().await {
        match outcome {
            Ok(path) => {
                ok += 1;
                pb.suspend(|| {
                    logger.info(&format!(
                        "Downloaded profile for {} to {}",
                        slug,
                        path.display()
                    ))
                });
            }
            Err(e) => {
                errors += 1;
                pb.suspend(|| logger.error(&format!("Error fetching profile for {}: {:#}", slug, e)));
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();
    Ok(DownloadStats { total, ok, errors })
}

async fn download_one<S: ProfileSource>(source: &S, slug: &str, dir: &Path) -> Result<PathBuf> {
    let html = source.fetch(slug).await?;
    let record = parser::extract(&html);
    let path = dir.join(format!("{}.txt", slug));
    tokio::fs::write(&path, record.to_text())
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

// ── Tests ──
