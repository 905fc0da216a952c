use rqual::cli::{self, Commands};
use rqual::commands::{handle_analyze, AnalyzeConfig};

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() {
    let cli = cli::parse_args();

    let result = match cli.command {
        Commands::Analyze {
            target,
            file,
            format,
            output,
            keep_clone,
            jobs,
            no_parallel,
            verbosity,
        } => {
            init_logging(verbosity);
            handle_analyze(AnalyzeConfig {
                target,
                single_file: file,
                format: format.into(),
                output,
                keep_clone,
                jobs,
                no_parallel,
            })
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
