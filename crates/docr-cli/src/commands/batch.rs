//! Batch scanning command for multiple document files.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use docr_core::document::{DocumentParser, RuleBasedParser};
use docr_core::models::config::DocrConfig;
use docr_core::models::document::{ExtractedFields, ScanReport};
use docr_core::ocr::{normalize_pages, normalize_text, DocOcrEngine};
use docr_core::pdf::{PdfExtractor, PdfProcessor, PdfType};

use super::config::load_effective;
use super::scan;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: scan::OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// Model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,
}

/// Outcome of scanning a single file: a report, or the error text.
struct ScanOutcome {
    path: PathBuf,
    outcome: Result<ScanReport, String>,
    elapsed_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let (config, _) = load_effective(config_path)?;

    let files = expand_inputs(&args.input, &config)?;

    println!("{} Scanning {} files", style("ℹ").blue(), files.len());

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let multi_progress = MultiProgress::new();
    let overall_pb = multi_progress.add(ProgressBar::new(files.len() as u64));
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("##-"),
    );

    let parser = RuleBasedParser::from_config(&config.extraction);
    let model_dir = scan::resolve_model_dir(args.model_dir.as_deref(), &config);

    // OCR engine is loaded on first use so text-only batches never touch
    // the model files
    let mut engine: Option<DocOcrEngine> = None;

    let mut results: Vec<ScanOutcome> = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();
        let scanned = scan_single(&path, &parser, &mut engine, &model_dir, &config);
        let elapsed_ms = file_start.elapsed().as_millis() as u64;

        let outcome = match scanned {
            Ok(report) => Ok(report),
            Err(e) if args.continue_on_error => {
                warn!("Failed to scan {}: {}", path.display(), e);
                Err(e.to_string())
            }
            Err(e) => {
                error!("Failed to scan {}: {}", path.display(), e);
                anyhow::bail!("Scanning failed: {}", e);
            }
        };

        results.push(ScanOutcome {
            path,
            outcome,
            elapsed_ms,
        });
        overall_pb.inc(1);
    }

    overall_pb.finish_with_message("done");

    if let Some(ref output_dir) = args.output_dir {
        write_report_files(&results, output_dir, args.format)?;
    }

    if args.summary {
        let summary_path = match &args.output_dir {
            Some(dir) => dir.join("summary.csv"),
            None => PathBuf::from("summary.csv"),
        };

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let ok_count = results.iter().filter(|r| r.outcome.is_ok()).count();
    let failed: Vec<_> = results
        .iter()
        .filter_map(|r| r.outcome.as_ref().err().map(|e| (&r.path, e)))
        .collect();

    println!();
    println!(
        "{} Scanned {} files in {:.1?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(ok_count).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for (path, error) in &failed {
            println!("  - {}: {}", path.display(), error);
        }
    }

    Ok(())
}

/// Expand a glob pattern into scannable files, dropping anything whose
/// extension is not on the ingest allow-list. Sorted for a stable scan
/// order.
fn expand_inputs(pattern: &str, config: &DocrConfig) -> anyhow::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = glob(pattern)?
        .filter_map(|entry| entry.ok())
        .filter(|path| {
            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            config.ingest.allows(ext)
        })
        .collect();
    files.sort();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", pattern);
    }

    Ok(files)
}

fn scan_single(
    path: &Path,
    parser: &RuleBasedParser,
    engine: &mut Option<DocOcrEngine>,
    model_dir: &Path,
    config: &DocrConfig,
) -> anyhow::Result<ScanReport> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let file_size = fs::metadata(path)?.len();
    if file_size > config.ingest.max_file_bytes() {
        anyhow::bail!("File exceeds the {} MB size limit", config.ingest.max_file_mb);
    }

    let text = match extension.as_str() {
        "pdf" => {
            let data = fs::read(path)?;
            let mut extractor = PdfExtractor::new().with_min_text_length(config.pdf.min_text_length);
            extractor.load(&data)?;

            // Hybrid PDFs take the embedded-text path here; the scan
            // command also carries the OCR fallback
            let text = match extractor.analyze() {
                PdfType::Text | PdfType::Hybrid => normalize_text(&extractor.extract_text()?),
                PdfType::Image => {
                    let engine = ensure_engine(engine, model_dir, config)?;
                    let pages = ocr_pdf_pages(&extractor, engine, config)?;
                    normalize_pages(&pages)
                }
                PdfType::Empty => anyhow::bail!("PDF appears to be empty"),
            };

            if text.is_empty() {
                anyhow::bail!("No text could be extracted from the PDF");
            }
            text
        }
        "txt" => normalize_text(&fs::read_to_string(path)?),
        _ => {
            let image = image::open(path)?;
            let engine = ensure_engine(engine, model_dir, config)?;

            let result = engine
                .process(&image)
                .map_err(|e| anyhow::anyhow!("OCR failed: {}", e))?;

            let text = normalize_text(&result.text);
            if text.is_empty() {
                anyhow::bail!("No text detected in image");
            }
            text
        }
    };

    let result = parser.parse(&text);
    Ok(result.into_report(config.ingest.snippet_len))
}

/// Load the OCR engine into `slot` on first use.
fn ensure_engine<'a>(
    slot: &'a mut Option<DocOcrEngine>,
    model_dir: &Path,
    config: &DocrConfig,
) -> anyhow::Result<&'a DocOcrEngine> {
    if slot.is_none() {
        debug!("Loading OCR models from {}", model_dir.display());
        *slot = Some(scan::load_engine(model_dir, config)?);
    }
    slot.as_ref()
        .ok_or_else(|| anyhow::anyhow!("OCR engine unavailable"))
}

/// OCR the embedded page images of a scanned PDF, one entry per page, up
/// to the configured page cap.
fn ocr_pdf_pages(
    extractor: &PdfExtractor,
    engine: &DocOcrEngine,
    config: &DocrConfig,
) -> anyhow::Result<Vec<String>> {
    let page_count = extractor.page_count().min(config.pdf.max_pages as u32);
    let mut pages = Vec::new();

    for page in 1..=page_count {
        let images = match extractor.page_images(page) {
            Ok(images) => images,
            Err(e) => {
                warn!("Failed to extract images from page {}: {}", page, e);
                continue;
            }
        };

        let mut page_text = Vec::new();
        for image in &images {
            match engine.process(image) {
                Ok(result) if !result.text.trim().is_empty() => page_text.push(result.text),
                Ok(_) => {}
                Err(e) => warn!("OCR failed on page {}: {}", page, e),
            }
        }
        pages.push(page_text.join("\n"));
    }

    Ok(pages)
}

/// One report file per successful scan, named after the input file.
fn write_report_files(
    results: &[ScanOutcome],
    output_dir: &Path,
    format: scan::OutputFormat,
) -> anyhow::Result<()> {
    for result in results {
        let Ok(report) = &result.outcome else { continue };

        let stem = result
            .path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("report");

        let target = output_dir.join(format!("{}.{}", stem, format.extension()));
        fs::write(&target, scan::format_report(report, format)?)?;
        debug!("Wrote report to {}", target.display());
    }

    Ok(())
}

/// The masked identifying number for a report, for the summary listing.
fn identifier(fields: &ExtractedFields) -> String {
    match fields {
        ExtractedFields::Aadhaar(f) => f.aadhaar_number_masked.clone().unwrap_or_default(),
        ExtractedFields::Pan(f) => f.pan_number.clone().unwrap_or_default(),
        ExtractedFields::BankStatement(f) => f.account_number_masked.clone().unwrap_or_default(),
        ExtractedFields::Empty {} => String::new(),
    }
}

fn write_summary(path: &Path, results: &[ScanOutcome]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "document_type",
        "identifier",
        "transactions",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        match &result.outcome {
            Ok(report) => {
                let transactions = match &report.extracted_fields {
                    ExtractedFields::BankStatement(f) => f.transactions.len().to_string(),
                    _ => String::new(),
                };

                wtr.write_record([
                    filename,
                    "success",
                    &report.document_type.to_string(),
                    &identifier(&report.extracted_fields),
                    &transactions,
                    &result.elapsed_ms.to_string(),
                    "",
                ])?;
            }
            Err(message) => {
                wtr.write_record([
                    filename,
                    "error",
                    "",
                    "",
                    "",
                    &result.elapsed_ms.to_string(),
                    message,
                ])?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}
