use std::error::Error;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use show_booklet::provider::ShowProvider;
use show_booklet::{booklet, Config, JsonShowProvider};

/// Generates printable PDF booklets for the Rocky Mountain Shoe Show.
///
/// Show data is read from the JSON file named in the configuration; fonts
/// must be present under `assets/fonts` or provided via the
/// `SHOW_BOOKLET_FONTS_DIR` environment variable.
#[derive(Parser)]
#[command(author, version, about = "Trade-show booklet generator")]
struct Cli {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "show_booklet.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the shows available in the data file, newest first.
    #[command(name = "list")]
    List,

    /// Generate the booklet PDF for one show.
    #[command(name = "generate", aliases = ["gen"])]
    Generate {
        /// Identifier of the show, as printed by `list`.
        show: String,

        /// Output file path.
        #[arg(short, long, default_value = "booklet.pdf")]
        output: PathBuf,

        /// Overwrite the output file if it already exists.
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("Error: {}", err);
        print_error_sources(err.as_ref());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = Config::load_or_default(&cli.config)?;
    let provider = JsonShowProvider::open(&config.data_file)?;

    match cli.command {
        Commands::List => {
            for show in provider.list_shows()? {
                println!("{}\t{}", show.id, show.description);
            }
            Ok(())
        }
        Commands::Generate {
            show,
            output,
            force,
        } => {
            if output.exists() && !force {
                return Err(format!(
                    "{} already exists; pass --force to overwrite",
                    output.display()
                )
                .into());
            }
            generate_with_progress(&provider, &config, &show, &output)
        }
    }
}

/// Runs the generation on a worker thread while the main thread drives a
/// progress bar from the fractions reported by the pipeline.
fn generate_with_progress(
    provider: &JsonShowProvider,
    config: &Config,
    show_id: &str,
    output: &std::path::Path,
) -> Result<(), Box<dyn Error>> {
    let bar = ProgressBar::new(100);
    bar.set_style(
        ProgressStyle::with_template("{spinner} [{bar:40}] {percent}% {msg}")?.progress_chars("=> "),
    );
    bar.set_message("generating booklet");

    let (sender, receiver) = mpsc::channel::<f64>();
    let result = thread::scope(|scope| {
        let worker = scope.spawn(move || {
            booklet::generate(provider, config, show_id, output, |fraction| {
                let _ = sender.send(fraction);
            })
        });

        loop {
            match receiver.recv_timeout(Duration::from_millis(100)) {
                Ok(fraction) => bar.set_position((fraction * 100.0).round() as u64),
                Err(mpsc::RecvTimeoutError::Timeout) => {
                    if worker.is_finished() {
                        break;
                    }
                }
                Err(mpsc::RecvTimeoutError::Disconnected) => break,
            }
        }

        worker.join().expect("booklet worker panicked")
    });

    match result {
        Ok(()) => {
            bar.finish_with_message(format!("wrote {}", output.display()));
            Ok(())
        }
        Err(err) => {
            bar.abandon_with_message("failed");
            Err(Box::new(err) as Box<dyn Error>)
        }
    }
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}
