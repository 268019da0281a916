//! QR3K CLI binary.
//!
//! Packs browser games into QR-code-sized links.
//!
//! # Commands
//!
//! - `encode` - Encode game code into a payload, game link and QR link
//! - `decode` - Decode a payload or game link back to game code
//! - `compare` - Compare the current and legacy methods
//! - `check` - Report whether game code fits in a QR code
//! - `inspect` - Show byte counts after every pipeline stage

use std::io::{self, Read};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use qr3k::{Config, EncodeRequest, Encoder, LimitStatus, Method, Qr3kError, VERSION};

#[derive(Parser)]
#[command(name = "qr3k")]
#[command(version = VERSION)]
#[command(about = "QR3K - Pack small browser games into a QR code", long_about = None)]
struct Cli {
    /// Config file (default: <config dir>/qr3k/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode game code
    Encode {
        /// Game code (or - for stdin)
        input: Option<String>,

        /// Input file path
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Encoding method (current, legacy)
        #[arg(short, long, default_value = "current")]
        method: Method,

        /// Gzip level (1-9)
        #[arg(short, long)]
        level: Option<u32>,

        /// Output the full result as JSON
        #[arg(long)]
        json: bool,

        /// Show size statistics
        #[arg(short, long)]
        stats: bool,
    },

    /// Decode a payload or game link
    Decode {
        /// Base64 payload or game link (or - for stdin)
        input: Option<String>,

        /// Input file path
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Method that produced the payload (ignored for links)
        #[arg(short, long, default_value = "current")]
        method: Method,
    },

    /// Compare current and legacy encodings
    Compare {
        /// Game code (or - for stdin)
        input: Option<String>,

        /// Input file path
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check whether game code fits in a QR code
    Check {
        /// Game code (or - for stdin)
        input: Option<String>,

        /// Input file path
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Encoding method (current, legacy)
        #[arg(short, long, default_value = "current")]
        method: Method,
    },

    /// Show byte counts after each pipeline stage
    Inspect {
        /// Game code (or - for stdin)
        input: Option<String>,

        /// Input file path
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Encoding method (current, legacy)
        #[arg(short, long, default_value = "current")]
        method: Method,
    },
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    if let Err(err) = run(cli) {
        match err.downcast_ref::<Qr3kError>() {
            Some(qr3k_err) => eprintln!("Error: {}", qr3k_err.user_message()),
            None => eprintln!("Error: {err:#}"),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match cli.config {
        Some(path) => Config::from_file(path)?.merge(Config::from_env()?),
        None => Config::load()?,
    };
    let encoder = Encoder::from_config(&config)?;

    match cli.command {
        Commands::Encode {
            input,
            file,
            output,
            method,
            level,
            json,
            stats,
        } => cmd_encode(&encoder, input, file, output, method, level, json, stats),

        Commands::Decode {
            input,
            file,
            output,
            method,
        } => cmd_decode(&encoder, input, file, output, method),

        Commands::Compare { input, file, json } => cmd_compare(&encoder, input, file, json),

        Commands::Check {
            input,
            file,
            method,
        } => cmd_check(&encoder, input, file, method),

        Commands::Inspect {
            input,
            file,
            method,
        } => cmd_inspect(&encoder, input, file, method),
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_encode(
    encoder: &Encoder,
    input: Option<String>,
    file: Option<PathBuf>,
    output: Option<PathBuf>,
    method: Method,
    level: Option<u32>,
    json: bool,
    stats: bool,
) -> anyhow::Result<()> {
    let request = EncodeRequest {
        code: read_input(input, file)?,
        level,
        method,
    };
    let result = encoder.handle(&request)?;

    if json {
        write_output(output, &result.to_json()?)?;
    } else {
        write_output(output, &result.qr_url)?;
    }

    if stats {
        let size = &result.size;
        eprintln!();
        eprintln!("Encoding Statistics:");
        eprintln!("  Method:       {}", result.metadata.method);
        if let Some(level) = result.metadata.gzip_level {
            eprintln!("  Gzip level:   {level}");
        }
        eprintln!("  Content:      {}", result.metadata.content_kind);
        for (name, bytes) in size.checkpoints() {
            eprintln!("  {:<13} {bytes} bytes", format!("{}:", capitalize(name)));
        }
        eprintln!("  Total:        {} / {} bytes", size.total, size.limit);
        eprintln!("  Remaining:    {} bytes", size.remaining);
        if let (Some(ratio), Some(savings)) = (size.compression_ratio, size.savings) {
            eprintln!("  Saved:        {savings} bytes ({ratio:.1}%)");
        }
    }

    if let Some(warning) = result.size.warning() {
        eprintln!("Warning: {warning}");
    }

    Ok(())
}

fn cmd_decode(
    encoder: &Encoder,
    input: Option<String>,
    file: Option<PathBuf>,
    output: Option<PathBuf>,
    method: Method,
) -> anyhow::Result<()> {
    let content = read_input(input, file)?;
    let content = content.trim();

    let decoded = if content.starts_with("http://") || content.starts_with("https://") {
        encoder.decode_link(content)?
    } else {
        encoder.decode(content, method)?
    };

    write_output(output, &decoded)?;
    Ok(())
}

fn cmd_compare(
    encoder: &Encoder,
    input: Option<String>,
    file: Option<PathBuf>,
    json: bool,
) -> anyhow::Result<()> {
    let content = read_input(input, file)?;
    let cmp = encoder.compare(&content)?;

    if json {
        println!("{}", cmp.to_json()?);
        return Ok(());
    }

    println!("Raw size: {} bytes", cmp.raw);
    println!();
    println!("{:<18} {:>8} {:>10} {:>10}", "Method", "Total", "Remaining", "Status");
    println!("{}", "-".repeat(49));
    for method in Method::all() {
        let report = cmp.report(*method);
        println!(
            "{:<18} {:>8} {:>10} {:>10}",
            method.name(),
            report.total,
            report.remaining,
            status_label(report.status())
        );
    }
    println!();
    println!("Savings:      {} bytes", cmp.savings);
    println!("Improvement:  {}", cmp.improvement_display());
    println!("Recommended:  {}", cmp.recommended);

    Ok(())
}

fn cmd_check(
    encoder: &Encoder,
    input: Option<String>,
    file: Option<PathBuf>,
    method: Method,
) -> anyhow::Result<()> {
    let content = read_input(input, file)?;
    EncodeRequest::new(content.as_str()).validate()?;
    let report = encoder.measure(&content, method)?;

    println!(
        "{}: {} / {} bytes ({} remaining)",
        status_label(report.status()),
        report.total,
        report.limit,
        report.remaining
    );
    if let Some(warning) = report.warning() {
        println!("{warning}");
    }

    if report.is_over_limit {
        std::process::exit(2);
    }
    Ok(())
}

fn cmd_inspect(
    encoder: &Encoder,
    input: Option<String>,
    file: Option<PathBuf>,
    method: Method,
) -> anyhow::Result<()> {
    let content = read_input(input, file)?;
    let output = encoder.pipeline().run(&content, method)?;

    println!("Method: {method}");
    if let Some(level) = output.level {
        println!("Gzip level: {level}");
    }
    println!();
    println!("  {:<8} {:>8} bytes", "input", output.raw_bytes);
    for step in &output.trace {
        println!("  {:<8} {:>8} bytes", step.stage.name(), step.bytes);
    }

    Ok(())
}

// Helper functions

fn status_label(status: LimitStatus) -> &'static str {
    match status {
        LimitStatus::Ok => "OK",
        LimitStatus::Approaching => "NEAR LIMIT",
        LimitStatus::Over => "TOO LARGE",
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn read_input(input: Option<String>, file: Option<PathBuf>) -> anyhow::Result<String> {
    if let Some(path) = file {
        Ok(std::fs::read_to_string(path)?)
    } else if let Some(s) = input {
        if s == "-" {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        } else {
            Ok(s)
        }
    } else {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    }
}

fn write_output(output: Option<PathBuf>, content: &str) -> anyhow::Result<()> {
    if let Some(path) = output {
        std::fs::write(path, content)?;
    } else {
        println!("{content}");
    }
    Ok(())
}
