use anyhow::{bail, Context, Result};
use blogdex_core::related::{ranked_candidates, DEFAULT_LIMIT, MIN_STRONG_SCORE};
use blogdex_core::text::build_post_search_text;
use blogdex_core::{Category, Corpus, PostSummary, Source, Topic};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing_subscriber::{fmt, EnvFilter};
use walkdir::WalkDir;

/// Raw post record as exported by the content sync. `searchText` is computed
/// here, never trusted from the input.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPost {
    id: String,
    title: String,
    summary: String,
    published_date: String,
    #[serde(default)]
    updated_date: Option<String>,
    #[serde(default)]
    reading_time_min: u32,
    #[serde(default)]
    topics: Vec<Topic>,
    #[serde(default)]
    category: Option<Category>,
    #[serde(default)]
    source: Source,
    #[serde(default)]
    thumbnail: Option<String>,
    #[serde(default)]
    link: Option<String>,
}

#[derive(Debug, Serialize)]
struct MetaFile {
    num_posts: usize,
    locale: String,
    created_at: String,
    version: u32,
}

#[derive(Parser)]
#[command(name = "blogdex-indexer")]
#[command(about = "Build and audit per-locale post discovery indexes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build posts.<locale>.json from raw post records (JSON array or JSONL)
    Build {
        /// Input path (file or directory of .json/.jsonl files)
        #[arg(long)]
        input: String,
        /// Output data directory
        #[arg(long)]
        output: String,
        /// Locale the corpus belongs to
        #[arg(long, default_value = "en")]
        locale: String,
    },
    /// Report posts whose related-post list has no strong match
    AuditRelated {
        /// Data directory containing posts.<locale>.json
        #[arg(long)]
        index: String,
        #[arg(long, default_value = "en")]
        locale: String,
        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: usize,
        #[arg(long, default_value_t = MIN_STRONG_SCORE)]
        min_score: f64,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { input, output, locale } => build_corpus(&input, &output, &locale),
        Commands::AuditRelated { index, locale, limit, min_score } => {
            audit_related(&index, &locale, limit, min_score)
        }
    }
}

fn build_corpus(input: &str, output: &str, locale: &str) -> Result<()> {
    let input_path = Path::new(input);
    let out_dir = Path::new(output);
    fs::create_dir_all(out_dir)?;

    let mut files: Vec<PathBuf> = Vec::new();
    if input_path.is_dir() {
        for entry in WalkDir::new(input_path).into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();
            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            if path.is_file() && (ext == "json" || ext == "jsonl") {
                files.push(path.to_path_buf());
            }
        }
        files.sort();
    } else if input_path.is_file() {
        files.push(input_path.to_path_buf());
    } else {
        bail!("input path not found: {input}");
    }

    let mut posts: Vec<PostSummary> = Vec::new();
    for file in &files {
        for raw in read_raw_posts(file)? {
            posts.push(to_summary(raw));
        }
    }

    for post in &posts {
        if blogdex_core::dates::parse_ms(&post.published_date).is_none() {
            tracing::warn!(post_id = %post.id, date = %post.published_date, "unparseable published date");
        }
    }

    let index_file = out_dir.join(format!("posts.{locale}.json"));
    fs::write(&index_file, serde_json::to_string_pretty(&posts)?)
        .with_context(|| format!("writing {}", index_file.display()))?;

    let meta = MetaFile {
        num_posts: posts.len(),
        locale: locale.to_string(),
        created_at: OffsetDateTime::now_utc().format(&Rfc3339)?,
        version: 1,
    };
    fs::write(out_dir.join("meta.json"), serde_json::to_string_pretty(&meta)?)?;

    tracing::info!(locale, posts = posts.len(), output = %index_file.display(), "corpus built");
    Ok(())
}

/// A `.jsonl` file is one record per line; a `.json` file is either a single
/// record or an array of records.
fn read_raw_posts(path: &Path) -> Result<Vec<RawPost>> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    if ext == "jsonl" {
        let reader = BufReader::new(File::open(path)?);
        let mut records = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: RawPost = serde_json::from_str(&line)
                .with_context(|| format!("parsing record in {}", path.display()))?;
            records.push(record);
        }
        return Ok(records);
    }

    let raw = fs::read_to_string(path)?;
    let trimmed = raw.trim_start();
    if trimmed.starts_with('[') {
        let records: Vec<RawPost> = serde_json::from_str(&raw)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(records)
    } else {
        let record: RawPost = serde_json::from_str(&raw)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(vec![record])
    }
}

fn to_summary(raw: RawPost) -> PostSummary {
    let search_text = build_post_search_text(&raw.id, &raw.title, &raw.summary, &raw.topics);
    PostSummary {
        id: raw.id,
        title: raw.title,
        summary: raw.summary,
        search_text,
        published_date: raw.published_date,
        updated_date: raw.updated_date,
        reading_time_min: raw.reading_time_min,
        topics: raw.topics,
        category: raw.category,
        source: raw.source,
        thumbnail: raw.thumbnail,
        link: raw.link,
        published_ms: 0,
    }
}

/// Print posts that end up with zero strong related posts so the topic
/// taxonomy can be adjusted.
fn audit_related(index: &str, locale: &str, limit: usize, min_score: f64) -> Result<()> {
    let corpus = Corpus::load(Path::new(index), locale)?;
    let posts = corpus.posts();

    let mut without_strong: Vec<&str> = Vec::new();
    for post in posts {
        let strong = ranked_candidates(post, posts)
            .iter()
            .take(limit)
            .filter(|candidate| candidate.score >= min_score)
            .count();
        if strong == 0 {
            without_strong.push(&post.id);
        }
    }

    println!("locale={locale} posts={} min_score={min_score} limit={limit}", posts.len());
    println!("posts_with_no_strong_related={}", without_strong.len());
    for id in without_strong {
        println!("{id}");
    }
    Ok(())
}
