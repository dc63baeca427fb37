//! End-to-end tests for the docr binary, driven through text dumps so
//! no OCR model files are needed.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

fn docr() -> Command {
    let mut cmd = Command::cargo_bin("docr").unwrap();
    // Commands fall back to the platform config dir; point it at the
    // build tmp dir so a developer's real config file cannot leak in.
    cmd.env("XDG_CONFIG_HOME", env!("CARGO_TARGET_TMPDIR"));
    cmd
}

/// One-page PDF with `line` set in Helvetica as its only content.
fn text_pdf(line: &str) -> Vec<u8> {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![72.into(), 720.into()]),
            Operation::new("Tj", vec![Object::string_literal(line)]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

#[test]
fn scan_pan_text_reports_pan_card() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("pan.txt");
    fs::write(
        &input,
        "INCOME TAX DEPARTMENT\nGOVT. OF INDIA\nNAME: AMIT SHARMA\n\
         FATHER'S NAME: RAJESH SHARMA\nDOB: 01/01/1990\nABCDE1234F\n",
    )
    .unwrap();

    docr()
        .arg("scan")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"document_type\": \"PAN_CARD\""))
        .stdout(predicate::str::contains("\"pan_number\": \"ABCDE1234F\""))
        .stdout(predicate::str::contains("\"name\": \"AMIT SHARMA\""));
}

#[test]
fn scan_normalizes_case_before_parsing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("lowercase.txt");
    fs::write(&input, "income tax department\nabcde1234f\n").unwrap();

    docr()
        .arg("scan")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"document_type\": \"PAN_CARD\""))
        .stdout(predicate::str::contains("\"pan_number\": \"ABCDE1234F\""));
}

#[test]
fn scan_aadhaar_text_masks_the_number() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("aadhaar.txt");
    fs::write(&input, "UIDAI\n1234 5678 9012\nDOB 02/02/1995\nMALE\n").unwrap();

    docr()
        .arg("scan")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"document_type\": \"AADHAAR_CARD\""))
        .stdout(predicate::str::contains(
            "\"aadhaar_number_masked\": \"XXXX XXXX 9012\"",
        ));
}

#[test]
fn scan_statement_text_format() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("statement.txt");
    fs::write(
        &input,
        "STATE BANK OF INDIA\nSTATEMENT PERIOD: 01/01/2023 TO 31/01/2023\n\
         ACCOUNT NUMBER: 000111222333\n01/01/2023 GROCERY STORE 500.00 4500.00\n\
         02/01/2023 SALARY JAN 50,000.00 CR 54,500.00\n",
    )
    .unwrap();

    docr()
        .arg("scan")
        .arg(&input)
        .arg("--format")
        .arg("text")
        .assert()
        .success()
        .stdout(predicate::str::contains("Document type: BANK_STATEMENT"))
        .stdout(predicate::str::contains("Bank: State Bank Of India"))
        .stdout(predicate::str::contains("Account: ********2333"))
        .stdout(predicate::str::contains("Period: 01/01/2023 - 31/01/2023"))
        .stdout(predicate::str::contains("Transactions (2):"))
        .stdout(predicate::str::contains("Total credits: 50,000.00"));
}

#[test]
fn scan_statement_csv_lists_transactions() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("statement.txt");
    fs::write(
        &input,
        "STATE BANK OF INDIA\nSTATEMENT PERIOD: 01/01/2023 TO 31/01/2023\n\
         ACCOUNT NUMBER: 000111222333\n01/01/2023 GROCERY STORE 500.00 4500.00\n\
         02/01/2023 SALARY JAN 50,000.00 CR 54,500.00\n",
    )
    .unwrap();

    docr()
        .arg("scan")
        .arg(&input)
        .arg("--format")
        .arg("csv")
        .assert()
        .success()
        .stdout(predicate::str::contains("date,description,amount,type,balance"))
        .stdout(predicate::str::contains("01/01/2023,GROCERY STORE,500.00,,4500.00"))
        .stdout(predicate::str::contains("SALARY JAN"))
        .stdout(predicate::str::contains("CREDIT"));
}

#[test]
fn scan_pan_csv_is_a_flat_row() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("pan.txt");
    fs::write(&input, "PERMANENT ACCOUNT NUMBER\nABCDE1234F\nDOB: 01/01/1990\n").unwrap();

    docr()
        .arg("scan")
        .arg(&input)
        .arg("--format")
        .arg("csv")
        .assert()
        .success()
        .stdout(predicate::str::contains("document_type,name,dob"))
        .stdout(predicate::str::contains("PAN_CARD"))
        .stdout(predicate::str::contains("ABCDE1234F"));
}

#[test]
fn scan_empty_input_reports_unknown() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("empty.txt");
    fs::write(&input, "").unwrap();

    docr()
        .arg("scan")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"document_type\": \"UNKNOWN\""))
        .stdout(predicate::str::contains("\"extracted_fields\": {}"));
}

#[test]
fn scan_writes_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("pan.txt");
    let output = dir.path().join("report.json");
    fs::write(&input, "PERMANENT ACCOUNT NUMBER\nABCDE1234F\n").unwrap();

    docr()
        .arg("scan")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Output written to"));

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(report["document_type"], "PAN_CARD");
    assert_eq!(report["extracted_fields"]["pan_number"], "ABCDE1234F");
}

#[test]
fn scan_rejects_unsupported_extension() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("doc.gif");
    fs::write(&input, "x").unwrap();

    docr()
        .arg("scan")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported file format"));
}

#[test]
fn scan_rejects_missing_file() {
    docr()
        .arg("scan")
        .arg("no-such-file.txt")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn scan_honors_config_size_limit() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("pan.txt");
    let config = dir.path().join("config.json");
    fs::write(&input, "ABCDE1234F\n").unwrap();
    fs::write(&config, r#"{"ingest": {"max_file_mb": 0}}"#).unwrap();

    docr()
        .arg("scan")
        .arg(&input)
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("size limit"));
}

#[test]
fn scan_reads_config_from_platform_dir() {
    let dir = tempfile::tempdir().unwrap();
    let config_home = dir.path().join("xdg");
    fs::create_dir_all(config_home.join("docr")).unwrap();
    fs::write(
        config_home.join("docr").join("config.json"),
        r#"{"ingest": {"allowed_extensions": ["pdf"]}}"#,
    )
    .unwrap();
    let input = dir.path().join("pan.txt");
    fs::write(&input, "PERMANENT ACCOUNT NUMBER\nABCDE1234F\n").unwrap();

    // Without --config, the file in the platform config dir governs
    docr()
        .env("XDG_CONFIG_HOME", &config_home)
        .arg("scan")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported file format"));
}

#[test]
fn scan_text_pdf_without_embedded_preference() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("pan.pdf");
    fs::write(
        &input,
        text_pdf("INCOME TAX DEPARTMENT PERMANENT ACCOUNT NUMBER CARD ABCDE1234F"),
    )
    .unwrap();
    let config = dir.path().join("config.json");
    fs::write(&config, r#"{"pdf": {"prefer_embedded_text": false}}"#).unwrap();

    // A text-layer PDF has nothing to OCR; it must still scan through
    // the embedded text when that layer is not the preferred source
    docr()
        .arg("scan")
        .arg(&input)
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("PAN_CARD"))
        .stdout(predicate::str::contains("ABCDE1234F"));
}

#[test]
fn batch_scans_text_dumps_and_writes_summary() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("a.txt"),
        "UIDAI\n1234 5678 9012\nDOB 02/02/1995\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("b.txt"),
        "PERMANENT ACCOUNT NUMBER\nABCDE1234F\n",
    )
    .unwrap();
    let out_dir = dir.path().join("out");

    docr()
        .arg("batch")
        .arg(format!("{}/*.txt", dir.path().display()))
        .arg("--output-dir")
        .arg(&out_dir)
        .arg("--summary")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 successful"));

    assert!(out_dir.join("a.json").exists());
    assert!(out_dir.join("b.json").exists());

    let summary = fs::read_to_string(out_dir.join("summary.csv")).unwrap();
    assert!(summary.contains("AADHAAR_CARD"));
    assert!(summary.contains("PAN_CARD"));
    assert!(summary.contains("XXXX XXXX 9012"));
    assert!(summary.contains("ABCDE1234F"));
}

#[test]
fn batch_continue_on_error_keeps_going() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("good.txt"),
        "PERMANENT ACCOUNT NUMBER\nABCDE1234F\n",
    )
    .unwrap();
    fs::write(dir.path().join("bad.pdf"), b"not a pdf").unwrap();

    docr()
        .arg("batch")
        .arg(format!("{}/*", dir.path().display()))
        .arg("--continue-on-error")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 successful, 1 failed"));
}

#[test]
fn batch_fails_fast_without_continue_flag() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("bad.pdf"), b"not a pdf").unwrap();

    docr()
        .arg("batch")
        .arg(format!("{}/*.pdf", dir.path().display()))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Scanning failed"));
}

#[test]
fn config_init_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");

    docr()
        .arg("config")
        .arg("init")
        .arg("--output")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration file"));

    let config: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(config["pdf"]["max_pages"], 3);
    assert_eq!(config["ingest"]["max_file_mb"], 10);

    // A second init without --force must refuse to overwrite
    docr()
        .arg("config")
        .arg("init")
        .arg("--output")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn config_show_prints_effective_settings() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{"ingest": {"max_file_mb": 7}}"#).unwrap();

    docr()
        .arg("config")
        .arg("show")
        .arg("--config")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"max_file_mb\": 7"))
        .stderr(predicate::str::contains("Settings from"));
}

#[test]
fn config_path_prints_location() {
    docr()
        .arg("config")
        .arg("path")
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration file:"));
}

#[test]
fn config_check_reports_model_status() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("det.onnx"), b"stub").unwrap();

    docr()
        .arg("config")
        .arg("check")
        .arg("--model-dir")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("det.onnx"))
        .stdout(predicate::str::contains("latin_rec.onnx"))
        .stdout(predicate::str::contains("missing"));
}
