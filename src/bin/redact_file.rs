use anyhow::{Context, Result};
use piishield::{DetectionOptions, HttpClassifier, Session};
use serde::Serialize;
use std::io::Read;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn parse_arg_value(args: &[String], key: &str) -> Option<String> {
    args.iter()
        .position(|a| a == key)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn has_flag(args: &[String], key: &str) -> bool {
    args.iter().any(|a| a == key)
}

fn preview(s: &str, max_chars: usize) -> String {
    let mut out: String = s.chars().take(max_chars).collect();
    if s.chars().count() > max_chars {
        out.push_str("...");
    }
    out.replace('\n', " ")
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!(
            "Usage:\n  cargo run --bin redact_file -- <path|-> [--classifier] [--out <json_path>]\n\nNotes:\n  - `-` reads from stdin.\n  - `--classifier` also runs the HTTP span classifier (PIISHIELD_CLASSIFIER_URL)."
        );
        return Ok(());
    }

    let path = args[1].clone();
    let use_classifier = has_flag(&args, "--classifier");
    let out_path = parse_arg_value(&args, "--out");

    let text = if path == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("read stdin failed")?;
        buf
    } else {
        std::fs::read_to_string(&path).with_context(|| format!("read file failed: {}", path))?
    };

    let options = DetectionOptions::default();
    let session = if use_classifier {
        Session::with_classifier(options, Arc::new(HttpClassifier::new()))
    } else {
        Session::new(options)
    };

    let result = session.redact(&text).await;

    println!("Input: {} chars ({} bytes)", text.chars().count(), text.len());
    println!("Classifier: {}", if use_classifier { "on" } else { "off" });
    println!("Spans: {}", result.applied_spans.len());
    for (i, span) in result.applied_spans.iter().enumerate() {
        println!(
            "[{:03}] bytes=[{},{}] {:<12} conf={:.2} src={:?}  {}",
            i,
            span.start,
            span.end,
            span.category,
            span.confidence,
            span.source,
            preview(&span.value, 60)
        );
    }
    println!();
    println!("{}", result.masked_text);

    if let Some(out_path) = out_path {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Output {
            file: String,
            classifier: bool,
            masked_text: String,
            spans: Vec<piishield::Span>,
            mappings: Vec<piishield::MappingEntry>,
        }

        let out = Output {
            file: path.clone(),
            classifier: use_classifier,
            masked_text: result.masked_text.clone(),
            spans: result.applied_spans.clone(),
            mappings: session.mappings(),
        };

        let json = serde_json::to_string_pretty(&out)?;
        std::fs::write(&out_path, json).with_context(|| format!("write out failed: {}", out_path))?;
        println!();
        println!("Wrote JSON: {}", out_path);
    }

    Ok(())
}
