// Inherit lint configuration from lib.rs for consistency
#![allow(
    clippy::cast_possible_truncation,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::items_after_statements,
    clippy::too_many_lines,
    clippy::fn_params_excessive_bools,
    clippy::unnecessary_wraps
)]

use std::path::PathBuf;

use clap::Parser;
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use deckchunk::cli::commands::{Cli, Command};
use deckchunk::cli::output::{self, DeckPlan};
use deckchunk::config::{Config, UserSettings};
use deckchunk::ingest::{self, ExtractedDocument, Scanner};
use deckchunk::models::token_estimate::TokenEstimate;
use deckchunk::pipeline::filter::FilterVerdict;
use deckchunk::pipeline::sizer::{self, DroppedChunk, SentenceSource};
use deckchunk::pipeline::{budget, splitter, Pipeline, PipelineOutput};
use deckchunk::slides::{self, Slide, SlideOrigin};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}", output::format_error(&e));
        std::process::exit(1);
    }
}

/// Logs go to stderr; stdout carries only JSON.
fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::fmt::Display>> {
    let config = Config::from_cwd().map_err(map_err)?;
    let pretty = cli.pretty || config.settings.output.is_pretty();
    let ctx = Ctx { config, pretty };

    match cli.command {
        Command::Chunk {
            path,
            pages,
            no_budget,
            report,
        } => cmd_chunk(&ctx, &path, pages, no_budget, report),
        Command::Inspect { path } => cmd_inspect(&ctx, &path),
        Command::Budget { pages } => cmd_budget(&ctx, pages),
        Command::Batch { dir } => cmd_batch(&ctx, &dir),
        Command::Prompts { path, pages } => cmd_prompts(&ctx, &path, pages),
        Command::Slides {
            path,
            responses,
            pages,
        } => cmd_slides(&ctx, &path, responses.as_deref(), pages),
        Command::Config { init } => cmd_config(&ctx, init),
    }
}

type CmdResult = Result<(), Box<dyn std::fmt::Display>>;

fn map_err(e: impl std::fmt::Display + 'static) -> Box<dyn std::fmt::Display> {
    Box::new(e.to_string())
}

struct Ctx {
    config: Config,
    pretty: bool,
}

impl Ctx {
    fn print<T: Serialize>(&self, value: &T) {
        println!("{}", output::render(value, self.pretty));
    }

    fn pipeline(&self, apply_budget: bool) -> Pipeline {
        let mut settings = self.config.pipeline_settings();
        settings.apply_budget &= apply_budget;
        Pipeline::new(settings)
    }
}

/// A document read from disk together with the path it was named by.
struct Loaded {
    source: String,
    document: ExtractedDocument,
}

impl Loaded {
    fn page_count(&self, pages: Option<u32>) -> u32 {
        pages.unwrap_or(self.document.page_count)
    }
}

fn load(ctx: &Ctx, path: &str) -> Result<Loaded, Box<dyn std::fmt::Display>> {
    let full = ctx.config.resolve(path);
    let document = ingest::read_document(&full).map_err(map_err)?;
    Ok(Loaded {
        source: path.to_string(),
        document,
    })
}

fn chunk_document(
    ctx: &Ctx,
    loaded: &Loaded,
    pages: Option<u32>,
    apply_budget: bool,
) -> PipelineOutput {
    let page_count = loaded.page_count(pages);
    let out = ctx
        .pipeline(apply_budget)
        .run(&loaded.document.text, page_count);
    info!(
        source = %loaded.source,
        page_count,
        chunks = out.chunks.len(),
        truncated = out.report.truncated,
        "chunked document"
    );
    out
}

fn cmd_chunk(
    ctx: &Ctx,
    path: &str,
    pages: Option<u32>,
    no_budget: bool,
    report: bool,
) -> CmdResult {
    let loaded = load(ctx, path)?;
    let out = chunk_document(ctx, &loaded, pages, !no_budget);
    let tokens = TokenEstimate::for_document(&loaded.document.text, &out.chunks);
    let plan = DeckPlan {
        page_count: loaded.page_count(pages),
        cap: out.report.cap,
        report: report.then_some(out.report),
        chunks: out.chunks,
        tokens,
        sha256: loaded.document.sha256,
        source: loaded.source,
    };
    ctx.print(&plan);
    Ok(())
}

fn cmd_inspect(ctx: &Ctx, path: &str) -> CmdResult {
    #[derive(Serialize)]
    struct ParagraphView {
        index: usize,
        chars: usize,
        preview: String,
        verdict: FilterVerdict,
    }

    #[derive(Serialize)]
    struct InspectOutput {
        source: String,
        page_count: u32,
        paragraphs: Vec<ParagraphView>,
        chunk_drops: Vec<DroppedChunk>,
        tokenizers: Vec<SentenceSource>,
        chunks_sized: usize,
        chunks_merged: usize,
    }

    let loaded = load(ctx, path)?;
    let paragraphs = splitter::split_paragraphs_with_verdicts(&loaded.document.text)
        .into_iter()
        .enumerate()
        .map(|(index, (text, verdict))| ParagraphView {
            index,
            chars: text.chars().count(),
            preview: sizer::preview(&text),
            verdict,
        })
        .collect();
    let report = chunk_document(ctx, &loaded, None, false).report;

    ctx.print(&InspectOutput {
        page_count: loaded.document.page_count,
        source: loaded.source,
        paragraphs,
        chunk_drops: report.chunk_drops,
        tokenizers: report.tokenizers,
        chunks_sized: report.chunks_sized,
        chunks_merged: report.chunks_merged,
    });
    Ok(())
}

fn cmd_budget(ctx: &Ctx, pages: u32) -> CmdResult {
    #[derive(Serialize)]
    struct BudgetOutput {
        pages: u32,
        target: usize,
        cap: usize,
    }

    ctx.print(&BudgetOutput {
        pages,
        target: budget::target_count(pages),
        cap: budget::chunk_cap(pages, ctx.config.settings.budget.unknown_page_cap),
    });
    Ok(())
}

fn cmd_batch(ctx: &Ctx, dir: &str) -> CmdResult {
    #[derive(Serialize)]
    struct BatchEntry {
        source: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        sha256: Option<String>,
        page_count: u32,
        chunks: usize,
        truncated: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    }

    #[derive(Serialize)]
    struct BatchOutput {
        documents: Vec<BatchEntry>,
        total_chunks: usize,
        failed: usize,
    }

    let root: PathBuf = ctx.config.resolve(dir);
    let files = Scanner::new(root, &ctx.config).scan().map_err(map_err)?;

    let pipeline = ctx.pipeline(true);
    let documents: Vec<BatchEntry> = files
        .par_iter()
        .map(|file| match ingest::read_document(&file.path) {
            Ok(document) => {
                let out = pipeline.run(&document.text, document.page_count);
                info!(source = %file.relative_path, chunks = out.chunks.len(), "chunked document");
                BatchEntry {
                    source: file.relative_path.clone(),
                    sha256: Some(document.sha256),
                    page_count: document.page_count,
                    chunks: out.chunks.len(),
                    truncated: out.report.truncated,
                    error: None,
                }
            }
            Err(e) => {
                tracing::warn!(source = %file.relative_path, error = %e, "skipping document");
                BatchEntry {
                    source: file.relative_path.clone(),
                    sha256: None,
                    page_count: 0,
                    chunks: 0,
                    truncated: 0,
                    error: Some(e.to_string()),
                }
            }
        })
        .collect();

    ctx.print(&BatchOutput {
        total_chunks: documents.iter().map(|d| d.chunks).sum(),
        failed: documents.iter().filter(|d| d.error.is_some()).count(),
        documents,
    });
    Ok(())
}

fn cmd_prompts(ctx: &Ctx, path: &str, pages: Option<u32>) -> CmdResult {
    #[derive(Serialize)]
    struct PromptEntry {
        index: usize,
        slide_type: &'static str,
        topic: &'static str,
        prompt: String,
    }

    let loaded = load(ctx, path)?;
    let chunks = chunk_document(ctx, &loaded, pages, true).chunks;
    let prompts: Vec<PromptEntry> = chunks
        .iter()
        .enumerate()
        .map(|(index, chunk)| PromptEntry {
            index,
            slide_type: chunk.slide_type.as_str(),
            topic: chunk.topic.as_str(),
            prompt: slides::build_prompt(chunk),
        })
        .collect();
    ctx.print(&prompts);
    Ok(())
}

fn cmd_slides(ctx: &Ctx, path: &str, responses: Option<&str>, pages: Option<u32>) -> CmdResult {
    #[derive(Serialize)]
    struct SlidesOutput {
        source: String,
        slides: Vec<Slide>,
        from_model: usize,
        fallback: usize,
    }

    let responses: Vec<String> = match responses {
        Some(file) => {
            let raw = std::fs::read_to_string(ctx.config.resolve(file)).map_err(map_err)?;
            serde_json::from_str(&raw).map_err(map_err)?
        }
        None => Vec::new(),
    };

    let loaded = load(ctx, path)?;
    let chunks = chunk_document(ctx, &loaded, pages, true).chunks;
    let slides = slides::assemble(&chunks, &responses);
    let from_model = slides
        .iter()
        .filter(|s| s.origin == SlideOrigin::Model)
        .count();

    ctx.print(&SlidesOutput {
        fallback: slides.len() - from_model,
        from_model,
        source: loaded.source,
        slides,
    });
    Ok(())
}

fn cmd_config(ctx: &Ctx, init: bool) -> CmdResult {
    #[derive(Serialize)]
    struct InitOutput {
        written: String,
    }

    if !init {
        ctx.print(&ctx.config.settings);
        return Ok(());
    }

    if ctx.config.config_path.exists() {
        return Err(map_err(format!(
            "config already exists: {}",
            ctx.config.config_path.display()
        )));
    }
    let config = Config {
        settings: UserSettings::default(),
        ..ctx.config.clone()
    };
    config.save_settings().map_err(map_err)?;
    ctx.print(&InitOutput {
        written: config.relative_path(&config.config_path),
    });
    Ok(())
}
