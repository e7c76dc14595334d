//! DVR clock check — compare a DVR's on-screen clock with official time.
//!
//! Domains:
//!   - timestamp/  — OCR text → validated `TimestampRecord`
//!   - reference/  — official time from network providers, local fallback
//!   - difference  — signed offset and its display text
//!   - history     — bounded log of past comparisons
//!   - ocr/        — recognition engine seam and pre-parse heuristics
//!   - capture/    — the captured still and the single-flight gate
//!   - pipeline    — one comparison end to end
//!   - share       — verdict and share text
//!   - settings    — environment configuration
//!
//! `run()` is the one-shot command-line entry point used by the binary.

pub mod capture;
pub mod difference;
pub mod history;
pub mod ocr;
pub mod pipeline;
pub mod reference;
pub mod settings;
pub mod share;
pub mod timestamp;

use capture::CaptureSession;
use history::HistoryStore;
use pipeline::Checker;
use reference::ReferenceTimeResolver;
use settings::Settings;
use timestamp::TimeParser;

/// Entry point for `dvr-clock-check`.
///
/// ```text
/// dvr-clock-check [TEXT...]     check OCR text (stdin when no arguments)
/// dvr-clock-check history       list stored comparisons, newest first
/// dvr-clock-check clear-history empty the history store
/// ```
pub fn run() {
    // Load .env.local → .env from the working directory; first one found wins.
    'env_load: for env_file in [".env.local", ".env"] {
        let path = std::path::Path::new(env_file);
        if path.exists() {
            match dotenvy::from_path(path) {
                Ok(_) => eprintln!("[STARTUP] Loaded {}", path.display()),
                Err(e) => eprintln!("[STARTUP] Failed to load {}: {}", path.display(), e),
            }
            break 'env_load;
        }
    }

    env_logger::init();
    log::info!("[STARTUP] dvr-clock-check {}", env!("CARGO_PKG_VERSION"));

    let settings = settings::resolve_settings();
    let mut history = match &settings.history_file {
        Some(path) => HistoryStore::open(path),
        None => HistoryStore::in_memory(),
    };

    let args: Vec<String> = std::env::args().skip(1).collect();
    let code = match args.first().map(String::as_str) {
        Some("history") => {
            print_history(&history);
            0
        }
        Some("clear-history") => match history.clear() {
            Ok(()) => {
                println!("History cleared");
                0
            }
            Err(e) => {
                eprintln!("{}", e);
                1
            }
        },
        _ => check(&args, &settings, &mut history),
    };
    std::process::exit(code);
}

fn check(args: &[String], settings: &Settings, history: &mut HistoryStore) -> i32 {
    let text = if args.is_empty() {
        let mut buf = String::new();
        if let Err(e) = std::io::Read::read_to_string(&mut std::io::stdin(), &mut buf) {
            eprintln!("Failed to read stdin: {}", e);
            return 1;
        }
        buf
    } else {
        args.join(" ")
    };

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to start async runtime: {}", e);
            return 1;
        }
    };

    let resolver = ReferenceTimeResolver::from_catalogue(&settings.providers, settings.provider_timeout);
    log::info!("[TIME] Providers: {}", resolver.provider_ids().join(", "));
    let checker = Checker::new(TimeParser::new(settings.date_order), resolver, settings.ocr_timeout);
    let session = CaptureSession::new(text.into_bytes());

    let outcome = runtime.block_on(checker.check_capture(&ocr::TextPassthrough, session, history));
    match outcome {
        Ok(entry) => {
            println!("{}", share::verdict(&entry.difference));
            println!();
            println!("{}", share::share_text(&entry));
            0
        }
        Err(e) => {
            eprintln!("{}", e);
            1
        }
    }
}

fn print_history(history: &HistoryStore) {
    if history.is_empty() {
        println!("No comparisons yet");
        return;
    }
    for (i, entry) in history.list().iter().enumerate() {
        println!(
            "{:>2}. {}  DVR {}  ref {} ({})  {}",
            i + 1,
            entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
            share::format_record(&entry.record),
            share::format_clock(entry.reference.hour, entry.reference.minute, entry.reference.second),
            share::describe_source(&entry.reference),
            entry.difference.text
        );
    }
}
