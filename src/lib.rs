//! Klartext Kamera — photograph complex text, get it explained simply.
//!
//! Wires together:
//! - Login gate (auth/)
//! - Image input and the multimodal model call (image_input/, llm/)
//! - Output cleanup (postprocess/)
//! - Localized messages and read-aloud (i18n.rs, speech/)
//!
//! Usage:
//!   klartext analyze <image> [--style key-points|summary] [--lang de|en|fr|es|it|ru] [--speak]
//!   klartext gen-credentials <user> <pass> [iterations]

pub mod auth;
pub mod config;
pub mod i18n;
pub mod image_input;
pub mod llm;
pub mod postprocess;
pub mod speech;
pub mod state;

use std::io::{BufRead, Write};
use std::path::PathBuf;

use auth::{kdf, CredentialVerifier};
use config::AppConfig;
use image_input::ImageData;
use llm::{AnalysisRequest, GroqClient, OutputLanguage, TargetAudience};
use speech::{EspeakBackend, Speaker};
use state::AppState;

/// Entry point for the `klartext` binary.
pub fn run() {
    // Load .env before the logger so RUST_LOG set there applies.
    let _ = dotenvy::dotenv();
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    let code = match args.get(1).map(String::as_str) {
        Some("analyze") => run_analyze(&args[2..]),
        Some("gen-credentials") => run_gen_credentials(&args[2..]),
        _ => {
            print_usage();
            1
        }
    };

    std::process::exit(code);
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  klartext analyze <image> [--style key-points|summary] [--lang de|en|fr|es|it|ru] [--speak]");
    eprintln!("  klartext gen-credentials <user> <pass> [iterations]");
}

struct AnalyzeArgs {
    image: PathBuf,
    request: AnalysisRequest,
    speak: bool,
}

fn parse_analyze_args(args: &[String]) -> Result<AnalyzeArgs, String> {
    let mut image = None;
    let mut style = TargetAudience::KeyPoints;
    let mut language = OutputLanguage::German;
    let mut speak = false;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--style" => {
                let value = iter.next().ok_or("--style requires a value")?;
                style = TargetAudience::parse(value)
                    .ok_or_else(|| format!("Unknown style: {}", value))?;
            }
            "--lang" => {
                let value = iter.next().ok_or("--lang requires a value")?;
                language = OutputLanguage::parse(value)
                    .ok_or_else(|| format!("Unknown language: {}", value))?;
            }
            "--speak" => speak = true,
            flag if flag.starts_with("--") => return Err(format!("Unknown option: {}", flag)),
            path if image.is_none() => image = Some(PathBuf::from(path)),
            extra => return Err(format!("Unexpected argument: {}", extra)),
        }
    }

    Ok(AnalyzeArgs {
        image: image.ok_or("analyze requires an image path")?,
        request: AnalysisRequest::new(style, language),
        speak,
    })
}

fn run_analyze(args: &[String]) -> i32 {
    let args = match parse_analyze_args(args) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("{}", e);
            print_usage();
            return 1;
        }
    };

    let config = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            return 2;
        }
    };

    let mut speak = args.speak;
    let backend = match EspeakBackend::detect() {
        Ok(b) => b,
        Err(e) => {
            if speak {
                eprintln!("{}", i18n::Localizer::new(config.ui_language).t(e.message_key()));
                speak = false;
            }
            EspeakBackend::with_binary("espeak-ng")
        }
    };

    let mut state = AppState::new(
        CredentialVerifier::new(config.verifier.clone()),
        config.ui_language,
        Speaker::new(backend),
    );

    let image = match ImageData::from_path(&args.image) {
        Ok(i) => i,
        Err(e) => {
            log::error!("[IMAGE] {}", e);
            eprintln!("{}", state.localizer().t(e.message_key()));
            return 1;
        }
    };

    let client = match GroqClient::new(config.groq_api_key.as_deref(), config.model.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", state.localizer().t(e.message_key()));
            return 2;
        }
    };

    let (identifier, secret) = match read_login(state.localizer()) {
        Ok(pair) => pair,
        Err(e) => {
            eprintln!("Could not read login: {}", e);
            return 1;
        }
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Could not start runtime: {}", e);
            return 2;
        }
    };

    runtime.block_on(async move {
        if let Err(message) = state.login(&identifier, &secret).await {
            eprintln!("{}", message);
            return 1;
        }

        eprintln!("{}", state.localizer().t("analyzing"));
        let result = match state.analyze(&client, Some(&image), &args.request).await {
            Ok(r) => r,
            Err(message) => {
                eprintln!("{}", message);
                return 1;
            }
        };

        println!("{}", result);

        if speak {
            if let Err(message) = state.read_aloud(&result, args.request.output_language).await {
                eprintln!("{}", message);
                return 1;
            }
        }
        0
    })
}

/// Prompt for username and password on stderr, read them from stdin.
fn read_login(localizer: &i18n::Localizer) -> std::io::Result<(String, zeroize::Zeroizing<String>)> {
    let stdin = std::io::stdin();
    let mut input = stdin.lock();

    let mut read_field = |label: &str| -> std::io::Result<String> {
        eprint!("{}: ", label);
        std::io::stderr().flush()?;
        let mut line = String::new();
        input.read_line(&mut line)?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    };

    let identifier = read_field(localizer.t("username"))?;
    let secret = zeroize::Zeroizing::new(read_field(localizer.t("password"))?);
    Ok((identifier, secret))
}

fn run_gen_credentials(args: &[String]) -> i32 {
    let (identifier, secret) = match (args.first(), args.get(1)) {
        (Some(u), Some(p)) => (u, p),
        _ => {
            print_usage();
            return 1;
        }
    };

    let iterations = match args.get(2).map(|raw| raw.parse::<u32>()) {
        None => kdf::DEFAULT_ITERATIONS,
        Some(Ok(n)) => n,
        Some(Err(e)) => {
            eprintln!("Invalid iteration count: {}", e);
            return 1;
        }
    };

    let config = match auth::generate_config(identifier, secret, iterations) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            return 1;
        }
    };

    match serde_json::to_string_pretty(&config) {
        Ok(json) => {
            println!("{}", json);
            0
        }
        Err(e) => {
            eprintln!("{}", e);
            1
        }
    }
}
