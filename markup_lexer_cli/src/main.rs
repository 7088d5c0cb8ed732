//! # mlex
//!
//! Prints the token stream of HTML documents, with embedded CSS, JavaScript
//! and `${}` expressions lexed by their own languages.

mod args;
mod output;

use args::Args;
use clap::Parser;
use markup_lexer::config::runtime::parse_log_level;
use markup_lexer::document::MARKUP_EXTENSIONS;
use markup_lexer::logging::{self, LogFacadeLogger, LoggingService};
use markup_lexer::{
    log_error, log_info, Document, DocumentLoader, LexicalAnalyzer, RuntimeConfig, TokenStream,
};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use walkdir::WalkDir;

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(error) => {
            eprintln!("Error: {}", error);
            ExitCode::from(1)
        }
    }
}

/// Returns `false` when any document failed
fn run(args: &Args) -> Result<bool, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => RuntimeConfig::load(path)?,
        None => RuntimeConfig::default(),
    };
    apply_overrides(args, &mut config)?;
    init_logging(args, &config)?;

    let filter = args.kind.as_deref().map(Regex::new).transpose()?;
    let files = collect_files(&args.path)?;
    log_info!("Tokenizing documents", "count" => files.len());

    let loader = DocumentLoader::from_preferences(&config.document);
    let mut analyzer = LexicalAnalyzer::with_preferences(config.lexer.clone());
    let mut all_ok = true;

    for (document_id, path) in files.iter().enumerate() {
        let ok = logging::with_document_context(path.clone(), document_id, || {
            process_file(args, &loader, &mut analyzer, filter.as_ref(), path)
        });
        all_ok &= ok;
    }

    Ok(all_ok)
}

fn apply_overrides(args: &Args, config: &mut RuntimeConfig) -> Result<(), String> {
    if args.no_embedding {
        config.lexer.enable_embedding = false;
    }
    if args.no_expressions {
        config.lexer.recognize_expressions = false;
    }
    if args.case_sensitive {
        config.lexer.case_insensitive = false;
    }
    if let Some(level) = &args.log_level {
        config.logging.min_log_level =
            parse_log_level(level).ok_or_else(|| format!("unknown log level '{}'", level))?;
    }
    Ok(())
}

fn init_logging(args: &Args, config: &RuntimeConfig) -> Result<(), String> {
    if args.log_facade {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
            .init();
        log::debug!("forwarding markup_lexer events to the log facade");
        let level = config.logging.min_log_level.to_events_log_level();
        return logging::init_global_logging_with_service(Arc::new(LoggingService::new(
            Arc::new(LogFacadeLogger),
            level,
        )));
    }

    logging::config::init_runtime_preferences(config.logging.clone())?;
    logging::init_global_logging()
}

/// A single file as given, or every markup file below a directory
fn collect_files(path: &Path) -> Result<Vec<PathBuf>, String> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        return Err(format!(
            "input must be a markup file or directory: {}",
            path.display()
        ));
    }

    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_markup_file(path))
        .collect();
    files.sort();
    Ok(files)
}

fn is_markup_file(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| {
            MARKUP_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(extension))
        })
}

fn process_file(
    args: &Args,
    loader: &DocumentLoader,
    analyzer: &mut LexicalAnalyzer,
    filter: Option<&Regex>,
    path: &Path,
) -> bool {
    let name = path.display().to_string();
    let document = match loader.load(path) {
        Ok(document) => document,
        Err(error) => {
            eprintln!("{}: {}", name, error);
            return false;
        }
    };

    let stream = match tokenize(args, analyzer, &document) {
        Ok(stream) => stream,
        Err(error) => {
            log_error!(error.error_code(), "Tokenization failed", "document" => name.as_str());
            eprintln!("{}: {}", name, error);
            return false;
        }
    };

    if args.summary {
        if args.json {
            println!("{}", output::metrics_json(&name, analyzer.metrics()));
        } else {
            println!("{}", output::format_metrics(&name, analyzer.metrics()));
        }
    } else {
        print_tokens(args, filter, &name, &document, &stream);
    }

    if args.verify_resume {
        return verify(args, analyzer, &name, &document, &stream);
    }
    true
}

/// Whole document, or from the restart point at `--from`
fn tokenize(
    args: &Args,
    analyzer: &mut LexicalAnalyzer,
    document: &Document,
) -> Result<TokenStream, markup_lexer::LexerError> {
    let full = analyzer.tokenize(document)?;
    let Some(offset) = args.from else {
        return Ok(full);
    };
    match full.restart_point(offset, 0) {
        Some(token) => {
            analyzer.tokenize_range(document.text.clone(), token.start, document.len(), token.state)
        }
        None => Ok(full),
    }
}

fn print_tokens(
    args: &Args,
    filter: Option<&Regex>,
    name: &str,
    document: &Document,
    stream: &TokenStream,
) {
    let source: &str = &document.text;
    for token in stream
        .iter()
        .filter(|token| output::matches_filter(filter, token.kind))
    {
        if args.json {
            println!("{}", output::token_json(name, token, source));
        } else {
            println!("{}", output::format_token(token, source));
        }
    }
}

fn verify(
    args: &Args,
    analyzer: &mut LexicalAnalyzer,
    name: &str,
    document: &Document,
    stream: &TokenStream,
) -> bool {
    match analyzer.verify_resume(document.text.clone(), stream, args.window) {
        Ok(mismatches) if mismatches.is_empty() => {
            eprintln!("{}: resume verified for {} tokens", name, stream.len());
            true
        }
        Ok(mismatches) => {
            for mismatch in &mismatches {
                eprintln!("{}: {}", name, output::format_mismatch(mismatch));
            }
            false
        }
        Err(error) => {
            eprintln!("{}: {}", name, error);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_collect_files_filters_markup() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.html"), "<p>").unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("a.HTM"), "<p>").unwrap();

        let files = collect_files(dir.path()).unwrap();
        let names: Vec<String> = files
            .iter()
            .filter_map(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["b.html", "a.HTM"]);
    }

    #[test]
    fn test_collect_files_rejects_missing_path() {
        assert!(collect_files(Path::new("/definitely/not/here")).is_err());
    }

    #[test]
    fn test_overrides() {
        let args = Args::parse_from([
            "mlex",
            "a.html",
            "--no-embedding",
            "--case-sensitive",
            "--log-level",
            "debug",
        ]);
        let mut config = RuntimeConfig::default();
        apply_overrides(&args, &mut config).unwrap();
        assert!(!config.lexer.enable_embedding);
        assert!(!config.lexer.case_insensitive);
        assert!(config.lexer.recognize_expressions);

        let args = Args::parse_from(["mlex", "a.html", "--log-level", "loud"]);
        assert!(apply_overrides(&args, &mut config).is_err());
    }

    #[test]
    fn test_tokenize_from_offset_resumes_at_token_start() {
        let document = Document::from_text("<style>a{color:red}</style>");
        let mut analyzer = LexicalAnalyzer::new();
        let full = analyzer.tokenize(&document).unwrap();

        let args = Args::parse_from(["mlex", "x.html", "--from", "11"]);
        let resumed = tokenize(&args, &mut analyzer, &document).unwrap();
        let first = resumed.get(0).copied().unwrap();
        assert!(first.start <= 11);
        let index = full.token_index_at(first.start).unwrap();
        assert_eq!(resumed.tokens(), &full.tokens()[index..]);
    }
}
