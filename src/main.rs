use std::io;

use clap::{Command, CommandFactory, Parser};
use clap_complete::{generate, Generator};
use coursecat::cli::{output, Cli, CliResult, Session};
use coursecat::config::Settings;
use coursecat::domain::DIAGNOSTICS_TARGET;
use coursecat::exitcode;
use coursecat::infrastructure::ServiceContainer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
}

fn main() {
    let cli = Cli::parse();

    if let Some(generator) = cli.completions {
        let mut cmd = Cli::command();
        eprintln!("Generating completion file for {generator:?}...");
        print_completions(generator, &mut cmd);
        std::process::exit(exitcode::OK);
    }

    setup_logging(cli.debug);

    if let Err(e) = run(&cli) {
        let _ = output::error(&mut io::stderr(), &e);
        std::process::exit(e.exit_code());
    }
}

fn run(cli: &Cli) -> CliResult<()> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(source) = &cli.source {
        settings.source_path = source.clone();
    }
    if let Some(delimiter) = cli.delimiter {
        settings.delimiter = delimiter;
    }
    if cli.trace {
        settings.diagnostics = true;
    }
    tracing::debug!("settings: {:?}", settings);

    if cli.show_config {
        print!("{}", settings.to_toml()?);
        return Ok(());
    }

    let ServiceContainer {
        settings,
        catalog_service,
        ..
    } = ServiceContainer::new(settings)?;

    let stdin = io::stdin();
    let mut session = Session::new(catalog_service, &settings, stdin.lock(), io::stdout());
    if let Some(key) = &cli.lookup {
        session.load()?;
        session.find(key)?;
    }
    session.run()
}

fn setup_logging(verbosity: u8) {
    tracing::debug!("INIT: Attempting logger init from main.rs");

    let filter = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        3 => LevelFilter::TRACE,
        _ => {
            eprintln!("Don't be crazy, max is -d -d -d");
            LevelFilter::TRACE
        }
    };

    // Tree diagnostics get their own plain layer on stdout, next to the menu
    let noisy_modules = [DIAGNOSTICS_TARGET];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });
    let diagnostics_filter =
        filter_fn(|metadata| metadata.target() == DIAGNOSTICS_TARGET);

    // Create a subscriber with formatted output directed to stderr
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr) // Set writer first
        .with_target(true)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    let diagnostics_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .without_time()
        .with_target(false)
        .with_level(false)
        .with_filter(diagnostics_filter);

    // Apply filters to the layer
    let filtered_layer = fmt_layer.with_filter(filter).with_filter(module_filter);

    tracing_subscriber::registry()
        .with(filtered_layer)
        .with(diagnostics_layer)
        .init();

    // Log initial debug level
    match filter {
        LevelFilter::INFO => tracing::info!("Debug mode: info"),
        LevelFilter::DEBUG => tracing::debug!("Debug mode: debug"),
        LevelFilter::TRACE => tracing::debug!("Debug mode: trace"),
        _ => {}
    }
}
