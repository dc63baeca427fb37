//! Scan command - classify a single document file and extract its fields.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use docr_core::document::rules::{format_amount, parse_amount};
use docr_core::document::{DocumentParser, RuleBasedParser};
use docr_core::models::config::{DocrConfig, ModelConfig};
use docr_core::models::document::{ExtractedFields, ScanReport, TransactionKind};
use docr_core::ocr::{normalize_pages, normalize_text, DocOcrEngine};
use docr_core::pdf::{PdfExtractor, PdfProcessor, PdfType};

use super::config::load_effective;

/// Arguments for the scan command.
#[derive(Args)]
pub struct ScanArgs {
    /// Input file (PDF, image, or text dump)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    /// Skip OCR and use only embedded PDF text
    #[arg(long)]
    text_only: bool,

    /// Print extraction warnings after the report
    #[arg(long)]
    show_warnings: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON report
    Json,
    /// CSV report
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    /// File extension for reports written in this format.
    pub(crate) fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: ScanArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let (config, _) = load_effective(config_path)?;

    // Check input file exists
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let extension = args
        .input
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    if !config.ingest.allows(&extension) {
        anyhow::bail!(
            "Unsupported file format: {:?} (accepted: {})",
            extension,
            config.ingest.allowed_extensions.join(", ")
        );
    }

    let file_size = fs::metadata(&args.input)?.len();
    if file_size > config.ingest.max_file_bytes() {
        anyhow::bail!(
            "File exceeds the {} MB size limit: {}",
            config.ingest.max_file_mb,
            args.input.display()
        );
    }

    info!("Scanning file: {}", args.input.display());

    // Create progress bar
    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")
            .unwrap()
            .progress_chars("##-"),
    );

    let text = match extension.as_str() {
        "pdf" => pdf_text(&args, &config, &pb)?,
        "txt" => {
            pb.set_message("Reading text...");
            pb.set_position(30);
            normalize_text(&fs::read_to_string(&args.input)?)
        }
        // Everything else on the allow-list is an image format
        _ => image_text(&args, &config, &pb)?,
    };

    pb.set_message("Extracting fields...");
    pb.set_position(70);

    let parser = RuleBasedParser::from_config(&config.extraction);
    let result = parser.parse(&text);

    pb.set_position(100);
    pb.finish_with_message("Done");

    let warnings = result.warnings.clone();
    let extraction_ms = result.processing_time_ms;
    let report = result.into_report(config.ingest.snippet_len);

    // Format output
    let output = format_report(&report, args.format)?;

    // Write output
    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.show_warnings && !warnings.is_empty() {
        eprintln!();
        eprintln!("{}", style("Warnings:").yellow());
        for warning in &warnings {
            eprintln!("  - {}", warning);
        }
    }

    debug!("Extraction took {}ms", extraction_ms);
    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Get normalized text from a PDF, preferring embedded text and falling
/// back to OCR on page images.
fn pdf_text(args: &ScanArgs, config: &DocrConfig, pb: &ProgressBar) -> anyhow::Result<String> {
    pb.set_message("Loading PDF...");
    pb.set_position(10);

    let data = fs::read(&args.input)?;
    let mut extractor = PdfExtractor::new().with_min_text_length(config.pdf.min_text_length);
    extractor.load(&data)?;

    debug!("PDF has {} pages", extractor.page_count());

    pb.set_message("Analyzing PDF...");
    pb.set_position(20);

    let pdf_type = extractor.analyze();
    debug!("PDF type: {:?}", pdf_type);

    let text = match pdf_type {
        // No page images to OCR; embedded text is the only source
        PdfType::Text => {
            pb.set_message("Extracting embedded text...");
            pb.set_position(40);
            normalize_text(&extractor.extract_text()?)
        }
        PdfType::Hybrid if config.pdf.prefer_embedded_text || args.text_only => {
            pb.set_message("Extracting embedded text...");
            pb.set_position(40);
            let embedded = extractor.extract_text()?;

            // A hybrid PDF may embed only a letterhead worth of text
            if embedded.len() < config.pdf.min_text_length && !args.text_only {
                warn!("Hybrid PDF has insufficient embedded text, falling back to OCR");
                match ocr_pdf(&extractor, args, config, pb) {
                    Ok(pages) => normalize_pages(&pages),
                    Err(e) => {
                        warn!("OCR fallback failed: {}", e);
                        normalize_text(&embedded)
                    }
                }
            } else {
                normalize_text(&embedded)
            }
        }
        PdfType::Image | PdfType::Hybrid if !args.text_only => {
            pb.set_message("Running OCR...");
            pb.set_position(40);

            let pages = ocr_pdf(&extractor, args, config, pb)?;
            normalize_pages(&pages)
        }
        PdfType::Empty => {
            anyhow::bail!("PDF appears to be empty");
        }
        _ => {
            anyhow::bail!("PDF is image-based but --text-only was set. Remove the flag to use OCR.");
        }
    };

    if text.is_empty() {
        anyhow::bail!("No text could be extracted from the PDF");
    }

    Ok(text)
}

/// OCR the embedded page images of a scanned PDF, one entry per page, up
/// to the configured page cap.
fn ocr_pdf(
    extractor: &PdfExtractor,
    args: &ScanArgs,
    config: &DocrConfig,
    pb: &ProgressBar,
) -> anyhow::Result<Vec<String>> {
    let model_dir = resolve_model_dir(args.model_dir.as_deref(), config);
    let engine = load_engine(&model_dir, config)?;

    pb.set_message("Extracting page images...");
    pb.set_position(45);

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

        pb.set_message(format!("OCR on page {}/{}", page, page_count));
        pb.set_position(45 + (u64::from(page) * 25) / u64::from(page_count));

        let mut page_text = Vec::new();
        for image in &images {
            match engine.process(image) {
                Ok(result) if !result.text.trim().is_empty() => page_text.push(result.text),
                Ok(_) => debug!("No text detected in an image on page {}", page),
                Err(e) => warn!("OCR failed on page {}: {}", page, e),
            }
        }
        pages.push(page_text.join("\n"));
    }

    if pages.iter().all(|p| p.trim().is_empty()) {
        anyhow::bail!("No text detected on any PDF page");
    }

    Ok(pages)
}

/// Get normalized text from an image file via OCR.
fn image_text(args: &ScanArgs, config: &DocrConfig, pb: &ProgressBar) -> anyhow::Result<String> {
    pb.set_message("Loading image...");
    pb.set_position(10);

    let image = image::open(&args.input)?;

    pb.set_message("Loading OCR models...");
    pb.set_position(30);

    let model_dir = resolve_model_dir(args.model_dir.as_deref(), config);
    let engine = load_engine(&model_dir, config)?;

    pb.set_message("Running OCR...");
    pb.set_position(45);

    let result = engine
        .process(&image)
        .map_err(|e| anyhow::anyhow!("OCR failed: {}", e))?;

    debug!(
        "OCR recognized {} lines in {}ms",
        result.lines.len(),
        result.processing_time_ms
    );

    let text = normalize_text(&result.text);
    if text.is_empty() {
        anyhow::bail!("No text detected in image");
    }

    Ok(text)
}

/// Resolve the model directory: the CLI flag wins over configuration.
pub(crate) fn resolve_model_dir(cli_dir: Option<&Path>, config: &DocrConfig) -> PathBuf {
    cli_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.models.model_dir.clone())
}

/// Load the OCR engine from `model_dir`, with a readable error when the
/// model files are not in place.
pub(crate) fn load_engine(model_dir: &Path, config: &DocrConfig) -> anyhow::Result<DocOcrEngine> {
    let models = ModelConfig {
        model_dir: model_dir.to_path_buf(),
        ..config.models.clone()
    };

    if !models.detection_path().exists() || !models.recognition_path().exists() {
        anyhow::bail!(
            "OCR models not found in {}.\n\n\
             Expected {}, {} and {}. Pass --model-dir or set models.model_dir in the config.",
            models.model_dir.display(),
            models.detection_model,
            models.recognition_model,
            models.dictionary,
        );
    }

    DocOcrEngine::from_model_config(&models, config.ocr.clone())
        .map_err(|e| anyhow::anyhow!("Failed to load OCR models: {}", e))
}

pub(crate) fn format_report(report: &ScanReport, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Csv => format_csv(report),
        OutputFormat::Text => format_text(report),
    }
}

fn format_csv(report: &ScanReport) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    // Statements dump their transaction ledger; every other type gets a
    // one-row field dump. Numbers stay masked here, the JSON report is the
    // place for the unmasked values
    if let ExtractedFields::BankStatement(f) = &report.extracted_fields {
        wtr.write_record(["date", "description", "amount", "type", "balance"])?;
        for txn in &f.transactions {
            let kind = txn.kind.map(|k| k.to_string()).unwrap_or_default();
            wtr.write_record([
                txn.date.as_str(),
                txn.description.as_str(),
                txn.amount.as_str(),
                kind.as_str(),
                txn.balance.as_str(),
            ])?;
        }
    } else {
        wtr.write_record([
            "document_type",
            "name",
            "dob",
            "gender",
            "aadhaar_number_masked",
            "pan_number",
            "father_name",
        ])?;

        let mut row = vec![String::new(); 7];
        row[0] = report.document_type.to_string();

        match &report.extracted_fields {
            ExtractedFields::Aadhaar(f) => {
                row[1] = f.name.clone().unwrap_or_default();
                row[2] = f.dob.clone().unwrap_or_default();
                row[3] = f.gender.clone().unwrap_or_default();
                row[4] = f.aadhaar_number_masked.clone().unwrap_or_default();
            }
            ExtractedFields::Pan(f) => {
                row[1] = f.name.clone().unwrap_or_default();
                row[2] = f.dob.clone().unwrap_or_default();
                row[5] = f.pan_number.clone().unwrap_or_default();
                row[6] = f.father_name.clone().unwrap_or_default();
            }
            _ => {}
        }

        wtr.write_record(&row)?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(report: &ScanReport) -> anyhow::Result<String> {
    let mut output = String::new();

    output.push_str(&format!("Document type: {}\n", report.document_type));
    output.push('\n');

    match &report.extracted_fields {
        ExtractedFields::Aadhaar(f) => {
            push_field(&mut output, "Name", f.name.as_deref());
            push_field(&mut output, "DOB", f.dob.as_deref());
            push_field(&mut output, "Gender", f.gender.as_deref());
            push_field(&mut output, "Number", f.aadhaar_number_masked.as_deref());
            push_field(&mut output, "Address", f.address.as_deref());
        }
        ExtractedFields::Pan(f) => {
            push_field(&mut output, "Name", f.name.as_deref());
            push_field(&mut output, "Father's name", f.father_name.as_deref());
            push_field(&mut output, "DOB", f.dob.as_deref());
            push_field(&mut output, "PAN", f.pan_number.as_deref());
        }
        ExtractedFields::BankStatement(f) => {
            push_field(&mut output, "Bank", f.bank_name.as_deref());
            push_field(&mut output, "Account", f.account_number_masked.as_deref());
            if let Some(period) = &f.statement_period {
                output.push_str(&format!("  Period: {} - {}\n", period.from, period.to));
            }

            if !f.transactions.is_empty() {
                output.push_str(&format!("\nTransactions ({}):\n", f.transactions.len()));
                for txn in &f.transactions {
                    let kind = txn.kind.map(|k| format!(" {}", k)).unwrap_or_default();
                    output.push_str(&format!(
                        "  {}  {}  {}{}  balance {}\n",
                        txn.date, txn.description, txn.amount, kind, txn.balance
                    ));
                }

                // Totals only cover tagged lines; untagged amounts carry no direction.
                let mut debits = Decimal::ZERO;
                let mut credits = Decimal::ZERO;
                for txn in &f.transactions {
                    if let (Some(kind), Some(amount)) = (txn.kind, parse_amount(&txn.amount)) {
                        match kind {
                            TransactionKind::Debit => debits += amount,
                            TransactionKind::Credit => credits += amount,
                        }
                    }
                }
                if !debits.is_zero() || !credits.is_zero() {
                    output.push_str(&format!("\n  Total debits:  {}\n", format_amount(debits)));
                    output.push_str(&format!("  Total credits: {}\n", format_amount(credits)));
                }
            }
        }
        ExtractedFields::Empty {} => {
            output.push_str("No fields extracted.\n");
        }
    }

    Ok(output)
}

fn push_field(output: &mut String, label: &str, value: Option<&str>) {
    if let Some(value) = value {
        output.push_str(&format!("  {}: {}\n", label, value));
    }
}
