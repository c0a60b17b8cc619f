mod config;
mod lyrics;
mod snippets;
mod storage;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::io::Read;
use std::path::{Path, PathBuf};

use snippets::{BatchOutcome, Extractor, SnippetGuidance};

#[derive(Debug, Parser)]
#[command(
    name = "lyricsnip",
    version,
    about = "Pick graded lyric snippets for guess-the-song puzzles"
)]
struct Cli {
    /// Override config file path.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log extraction decisions to stderr.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Split lyrics into sections and print them as JSON.
    Sections {
        /// Lyrics file, or `-` for stdin.
        file: PathBuf,
    },
    /// Extract hard/medium/easy snippets from a lyrics file.
    Extract {
        /// Lyrics file, or `-` for stdin.
        file: PathBuf,
        /// JSON guidance; without it snippets are picked by section kind.
        #[arg(long)]
        guidance: Option<PathBuf>,
    },
    /// Report which guidances would fail, without extracting.
    Validate {
        /// Lyrics file, or `-` for stdin.
        file: PathBuf,
        #[arg(long)]
        guidance: PathBuf,
    },
    /// Fetch lyrics from LRCLIB, then extract snippets.
    Fetch {
        artist: String,
        title: String,
        #[arg(long)]
        guidance: Option<PathBuf>,
        /// Skip the local lyrics cache.
        #[arg(long)]
        no_cache: bool,
        /// Print the fetched lyrics instead of extracting.
        #[arg(long)]
        lyrics_only: bool,
    },
    /// Config file management.
    Config {
        #[command(subcommand)]
        cmd: ConfigCommand,
    },
    /// Lyrics cache management.
    Cache {
        #[command(subcommand)]
        cmd: CacheCommand,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigCommand {
    /// Print the config file location.
    Path,
    /// Print the effective config.
    Show,
    /// Overwrite the config file with defaults.
    Reset,
}

#[derive(Debug, Subcommand)]
enum CacheCommand {
    /// Remove every cached lyrics entry.
    Clear,
}

/// Either a bare guidance array or a song selection carrying one.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GuidanceFile {
    List(Vec<SnippetGuidance>),
    Song {
        #[serde(rename = "snippetGuidance")]
        snippet_guidance: Vec<SnippetGuidance>,
    },
}

impl GuidanceFile {
    fn into_list(self) -> Vec<SnippetGuidance> {
        match self {
            Self::List(list) => list,
            Self::Song { snippet_guidance } => snippet_guidance,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        })
        .init();

    let cfg = config::load(cli.config.as_deref()).context("load config")?;
    let extractor = Extractor::new(cfg.extract);

    match cli.command {
        Command::Sections { file } => {
            let sections = lyrics::sections::parse(&read_input(&file)?);
            println!("{}", serde_json::to_string_pretty(&sections)?);
        }
        Command::Extract { file, guidance } => {
            let text = read_input(&file)?;
            let guidance = guidance.as_deref().map(read_guidance).transpose()?;
            report(run_extraction(&extractor, &text, guidance.as_deref()))?;
        }
        Command::Validate { file, guidance } => {
            let sections = lyrics::sections::parse(&read_input(&file)?);
            let guidances = read_guidance(&guidance)?;
            let result = snippets::validate(&extractor, &sections, &guidances);
            println!("{}", serde_json::to_string_pretty(&result)?);
            if !result.valid {
                anyhow::bail!("{} guidance(s) cannot be extracted", result.missing.len());
            }
        }
        Command::Fetch {
            artist,
            title,
            guidance,
            no_cache,
            lyrics_only,
        } => {
            let guidance = guidance.as_deref().map(read_guidance).transpose()?;
            let client = lyrics::LrclibClient::new(&cfg.lrclib).context("create lrclib client")?;
            let cache = if no_cache {
                None
            } else {
                Some(storage::Storage::open(&cfg.paths.cache_db()).context("open lyrics cache")?)
            };

            let now = std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs() as i64)
                .unwrap_or(0);
            let text = lyrics::fetch_lyrics(&client, cache.as_ref(), &artist, &title, now)
                .await
                .with_context(|| format!("fetch lyrics for {artist} - {title}"))?
                .with_context(|| format!("no lyrics found for {artist} - {title}"))?;

            if lyrics_only {
                println!("{text}");
            } else {
                report(run_extraction(&extractor, &text, guidance.as_deref()))?;
            }
        }
        Command::Config { cmd } => match cmd {
            ConfigCommand::Path => {
                let path = match cli.config {
                    Some(p) => p,
                    None => config::default_config_path().context("default config path")?,
                };
                println!("{}", path.display());
            }
            ConfigCommand::Show => {
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
            ConfigCommand::Reset => {
                config::save(&config::defaults::defaults(), cli.config.as_deref())
                    .context("save config")?;
                println!("Reset config to defaults.");
            }
        },
        Command::Cache { cmd } => match cmd {
            CacheCommand::Clear => {
                let store =
                    storage::Storage::open(&cfg.paths.cache_db()).context("open lyrics cache")?;
                let n = store.clear_lyrics()?;
                println!("Removed {n} cached lyrics.");
            }
        },
    }

    Ok(())
}

/// Guided extraction when guidance is supplied, section-kind picking otherwise.
fn run_extraction(
    extractor: &Extractor,
    text: &str,
    guidance: Option<&[SnippetGuidance]>,
) -> BatchOutcome {
    let sections = lyrics::sections::parse(text);
    match guidance {
        Some(guidances) if !sections.is_empty() => {
            snippets::extract_all(extractor, &sections, guidances)
        }
        _ => snippets::extract_fallback(extractor.thresholds(), &sections),
    }
}

fn report(outcome: BatchOutcome) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    if !outcome.success {
        anyhow::bail!("snippet extraction failed: {}", outcome.errors.join("; "));
    }
    Ok(())
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("read stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
}

fn read_guidance(path: &Path) -> anyhow::Result<Vec<SnippetGuidance>> {
    let raw = read_input(path)?;
    let parsed: GuidanceFile =
        serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(parsed.into_list())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SONG: &str = "[Verse 1]
Is this the real life
Is this just fantasy
Caught in a landslide
No escape from reality

[Chorus]
Open your eyes
Look up to the skies and see

[Bridge]
I'm just a poor boy
I need no sympathy";

    #[test]
    fn test_guidance_file_shapes() {
        let list = r#"[{"difficulty":"easy","section":"chorus","lineRange":{"start":1,"end":2},"keywords":["eyes","skies","see"]}]"#;
        let parsed: GuidanceFile = serde_json::from_str(list).unwrap();
        assert_eq!(parsed.into_list().len(), 1);

        let song = r#"{"artist":"Queen","snippetGuidance":[{"difficulty":"hard","section":"bridge","lineRange":{"start":1,"end":2},"keywords":["poor","boy","sympathy"]}]}"#;
        let parsed: GuidanceFile = serde_json::from_str(song).unwrap();
        assert_eq!(parsed.into_list()[0].keywords.len(), 3);
    }

    #[test]
    fn test_run_extraction_without_guidance_uses_fallback() {
        let outcome = run_extraction(&Extractor::default(), SONG, None);
        assert!(outcome.success);
        assert_eq!(outcome.snippets[0].text, "I'm just a poor boy / I need no sympathy");
        assert_eq!(outcome.snippets[2].text, "Open your eyes / Look up to the skies and see");
    }

    #[test]
    fn test_run_extraction_with_guidance() {
        let raw = r#"[
            {"difficulty":"easy","section":"chorus","lineRange":{"start":1,"end":2},"keywords":["eyes","skies","see"]},
            {"difficulty":"hard","section":"bridge","lineRange":{"start":1,"end":2},"keywords":["poor","boy","sympathy"]},
            {"difficulty":"medium","section":"verse","verseNumber":1,"lineRange":{"start":3,"end":4},"keywords":["landslide","escape","reality"]}
        ]"#;
        let guidances: Vec<SnippetGuidance> = serde_json::from_str(raw).unwrap();
        let outcome = run_extraction(&Extractor::default(), SONG, Some(&guidances));
        assert!(outcome.success);
        assert_eq!(
            outcome.snippets[1].text,
            "Caught in a landslide / No escape from reality"
        );
    }

    #[test]
    fn test_run_extraction_empty_lyrics() {
        let outcome = run_extraction(&Extractor::default(), "  \n", None);
        assert!(!outcome.success);
        assert_eq!(outcome.errors, vec!["No sections available"]);
    }
}
