use std::{env, path::PathBuf, process};

use anyhow::Result;
use dotenvy::dotenv;
use getopts::Options;

use scribe_cli::run::{format_stats, ollama, summarize_file, write_summary};
use scribe_core::{config::Settings, summarizer::dto::SummaryStyle};

fn print_usage(program: &str, opts: Options) {
    let brief = format!("Usage: {} -i FILE [OPTIONS]", program);
    print!("{}", opts.usage(&brief));
    println!("\nEnvironment variables:");
    println!("  OLLAMA_BASE_URL   Ollama server (default http://localhost:11434)");
    println!("  OLLAMA_MODEL      Model name (default llama3)");
    println!("  CHUNK_SIZE        Characters per chunk (default 4000)");
    println!("  CHUNK_OVERLAP     Characters shared by adjacent chunks (default 200)");
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let program = args[0].clone();

    let mut opts = Options::new();
    opts.optopt("i", "input", "Transcript file (.txt or .vtt)", "FILE");
    opts.optopt(
        "s",
        "style",
        "comprehensive, brief or key_points (default comprehensive)",
        "STYLE",
    );
    opts.optopt("o", "output", "Write the summary to FILE instead of stdout", "FILE");
    opts.optflag("", "health", "Check that the language model is reachable");
    opts.optflag("h", "help", "Show this help message");

    let matches = match opts.parse(&args[1..]) {
        Ok(m) => m,
        Err(f) => {
            eprintln!("Error parsing arguments: {}", f);
            print_usage(&program, opts);
            process::exit(1);
        }
    };

    if matches.opt_present("help") {
        print_usage(&program, opts);
        return Ok(());
    }

    let settings = Settings::from_env()?;
    let llm = ollama(&settings);

    if matches.opt_present("health") {
        match llm.health().await {
            Ok(()) => {
                println!("Model {} is available", settings.ollama_model);
                return Ok(());
            }
            Err(e) => {
                eprintln!("Health check failed: {}", e);
                process::exit(1);
            }
        }
    }

    let Some(input) = matches.opt_str("input").map(PathBuf::from) else {
        eprintln!("Error: an input file is required (-i FILE)");
        print_usage(&program, opts);
        process::exit(1);
    };

    let style = match matches.opt_str("style") {
        Some(raw) => raw.parse::<SummaryStyle>()?,
        None => SummaryStyle::default(),
    };
    let output = matches.opt_str("output").map(PathBuf::from);

    eprintln!("Summarizing {} ({} style)...", input.display(), style);

    let result = summarize_file(llm, &settings, &input, style).await?;

    write_summary(&result, output.as_deref())?;

    eprintln!("\n{}", format_stats(&result));

    Ok(())
}
