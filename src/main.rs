//! hanzi-cleaner CLI
//!
//! Command-line interface for the Mandarin text cleaner

use clap::{Args, Parser, Subcommand};
use hanzi_cleaner::{
    pipeline::PipelineStage,
    text::{BuiltinPinyin, TextNormalizer}, Cleaner, CleanerConfig, LatinCase,
    OutputAlphabet, PinyinSource, Result, RewriteStrategy,
};
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "hanzi-cleaner",
    about = "Convert Chinese/Latin/digit text into phonetic tokens for TTS",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct CleanerArgs {
    /// Configuration file path (YAML, or JSON with a .json extension)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output alphabet (pinyin, bopomofo, romaji)
    #[arg(short = 'a', long)]
    output_alphabet: Option<OutputAlphabet>,

    /// Spell out uppercase Latin letters too
    #[arg(long)]
    fold_case: bool,

    /// Use the small built-in pinyin table instead of the dictionary
    #[arg(long)]
    builtin_pinyin: bool,

    /// Scan literal tables with one combined matcher
    #[arg(long)]
    combined: bool,

    /// Named cleaner (chinese_cleaners, chinese_cleaners2, ...) used instead of the defaults
    #[arg(long, conflicts_with = "config")]
    cleaner_name: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean a single utterance
    Clean {
        /// Text to clean
        #[arg(short, long)]
        text: String,

        #[command(flatten)]
        cleaner: CleanerArgs,
    },

    /// Clean a text file, one output line per sentence
    CleanFile {
        /// Input text file
        #[arg(short, long)]
        input: PathBuf,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        cleaner: CleanerArgs,
    },

    /// Print the output of every pipeline stage
    Stages {
        /// Text to trace
        #[arg(short, long)]
        text: String,

        #[command(flatten)]
        cleaner: CleanerArgs,
    },

    /// Generate default configuration file
    InitConfig {
        /// Output path for config file
        #[arg(short, long, default_value = "cleaner.yaml")]
        output: PathBuf,
    },

    /// Show information about the system
    Info,

    /// Run benchmarks
    Benchmark {
        /// Number of iterations
        #[arg(short, long, default_value = "1000")]
        iterations: usize,
    },
}

fn build_cleaner(args: &CleanerArgs) -> Result<Cleaner> {
    let mut config = match &args.config {
        Some(path) if path.extension().map_or(false, |ext| ext == "json") => {
            CleanerConfig::load_json(path)?
        }
        Some(path) => CleanerConfig::load(path)?,
        None => match &args.cleaner_name {
            Some(name) => CleanerConfig::from_cleaner_name(name)?,
            None => CleanerConfig::default(),
        },
    };

    if let Some(output) = args.output_alphabet {
        config.output = output;
    }
    if args.fold_case {
        config.latin_case = LatinCase::FoldUppercase;
    }
    if args.builtin_pinyin {
        config.pinyin_source = PinyinSource::Builtin;
    }
    if args.combined {
        config.strategy = RewriteStrategy::Combined;
    }

    Cleaner::new(config)
}

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Clean { text, cleaner } => {
            let cleaner = build_cleaner(&cleaner)?;
            println!("{}", cleaner.clean(&text)?);
        }

        Commands::CleanFile {
            input,
            output,
            cleaner,
        } => {
            log::info!("Input file: {}", input.display());

            let text = std::fs::read(&input)?;
            let text = String::from_utf8(text)?;
            let cleaner = build_cleaner(&cleaner)?;
            let normalizer = TextNormalizer::new();

            let lines: Vec<String> = text
                .lines()
                .map(|line| normalizer.normalize_whitespace(line))
                .filter(|line| !line.is_empty())
                .collect();

            let mut sentences = Vec::new();
            for line in &lines {
                sentences.extend(normalizer.split_sentences(line));
            }
            log::info!("{} sentences from {} lines", sentences.len(), lines.len());

            let cleaned = cleaner.clean_many(sentences.as_slice())?;

            match output {
                Some(path) => {
                    let mut file = std::fs::File::create(&path)?;
                    for line in &cleaned {
                        writeln!(file, "{}", line)?;
                    }
                    println!("✓ Cleaned text written to: {}", path.display());
                }
                None => {
                    for line in &cleaned {
                        println!("{}", line);
                    }
                }
            }
        }

        Commands::Stages { text, cleaner } => {
            let cleaner = build_cleaner(&cleaner)?;
            let trace = cleaner.trace(&text)?;

            println!("{:<24} {:?}", "Input", trace.input);
            for (stage, value) in &trace.stages {
                println!("{:<24} {:?}", stage.name(), value);
            }
        }

        Commands::InitConfig { output } => {
            log::info!("Creating default configuration...");

            let config = CleanerConfig::default();
            config.save(&output)?;

            println!("✓ Configuration saved to: {}", output.display());
        }

        Commands::Info => {
            println!("hanzi-cleaner - Mandarin text cleaner for TTS");
            println!("==============================================");
            println!("Version: {}", hanzi_cleaner::VERSION);
            println!("Platform: {}", std::env::consts::OS);
            println!("Architecture: {}", std::env::consts::ARCH);
            println!();
            println!("Stages:");
            for stage in PipelineStage::all() {
                println!("  - {}", stage.name());
            }
            println!();
            println!("Output alphabets: pinyin, bopomofo, romaji");
            println!(
                "Cleaner names: chinese_cleaners, chinese_cleaners2, chinese_bopomofo, \
                 chinese_bopomofo_legacy"
            );
            println!(
                "Built-in pinyin table: {} characters",
                BuiltinPinyin::characters().len()
            );
            println!();
            println!("CPU Cores: {}", num_cpus::get());
            println!("Physical Cores: {}", num_cpus::get_physical());
        }

        Commands::Benchmark { iterations } => {
            log::info!("Running benchmarks ({} iterations)...", iterations);

            benchmark_cleaning(iterations)?;

            println!("✓ Benchmarks complete");
        }
    }

    Ok(())
}

fn benchmark_cleaning(iterations: usize) -> Result<()> {
    use std::time::Instant;

    println!("\nCleaning Benchmark");
    println!("------------------");

    let cleaner = Cleaner::new(CleanerConfig::default())?;

    let test_texts = vec![
        "你好世界，这是一个测试。",
        "中国人民站起来了！",
        "Mixed: abc 123 和中文。",
        "双雄会，光明在前。",
    ];

    let start = Instant::now();
    for _ in 0..iterations {
        for text in &test_texts {
            cleaner.clean(text)?;
        }
    }
    let elapsed = start.elapsed();

    let total_chars: usize = test_texts.iter().map(|t| t.chars().count()).sum();
    let per_iter = elapsed.as_secs_f32() / iterations.max(1) as f32;
    println!("  Texts: {}", test_texts.len());
    println!("  Total characters: {}", total_chars);
    println!("  Iterations: {}", iterations);
    println!("  Total time: {:.3}s", elapsed.as_secs_f32());
    println!("  Per iteration: {:.3}ms", per_iter * 1000.0);
    println!(
        "  Throughput: {:.0} chars/sec",
        (total_chars * iterations) as f32 / elapsed.as_secs_f32()
    );

    Ok(())
}
