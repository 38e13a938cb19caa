//! Application entry point and dispatch.

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info};

use dacviz_cli::compare::all_match;
use dacviz_cli::output::{timeline_json, write_to_file};
use dacviz_cli::render::matrix_lines;
use dacviz_cli::ui::print_header;
use dacviz_cli::{autoplay, compare, CliPresenter, DemoPresenter};
use dacviz_core::observers::LoggingObserver;
use dacviz_core::{Algorithm, DefaultFactory, Matrix, PlaybackController};
use dacviz_tui::TuiApp;

use crate::config::AppConfig;
use crate::errors::DemoError;
use crate::version::full_version;

/// Run the application.
pub fn run(config: &AppConfig) -> Result<()> {
    // Handle shell completion
    if let Some(shell) = config.completion {
        let mut cmd = <AppConfig as clap::CommandFactory>::command();
        dacviz_cli::completion::generate_completion(&mut cmd, shell, &mut io::stdout());
        return Ok(());
    }

    config.validate()?;
    let algorithms = config.algorithms()?;

    // Handle TUI mode
    if config.tui {
        return run_tui(config, &algorithms);
    }

    // CLI mode
    run_cli(config, &algorithms)
}

/// Random inputs shared by every selected algorithm.
fn inputs(config: &AppConfig) -> (Matrix, Matrix) {
    let mut rng = config.options(Algorithm::Naive).rng();
    let a = Matrix::random(config.size, config.max_entry, &mut rng);
    let b = Matrix::random(config.size, config.max_entry, &mut rng);
    (a, b)
}

fn run_cli(config: &AppConfig, algorithms: &[Algorithm]) -> Result<()> {
    let (a, b) = inputs(config);
    debug!(size = config.size, ?algorithms, seed = ?config.seed, "Inputs generated");

    let mut controllers = algorithms
        .iter()
        .map(|alg| PlaybackController::new(&a, &b, config.options(*alg)))
        .collect::<Result<Vec<_>, _>>()?;
    for controller in &controllers {
        controller.subscribe(Arc::new(LoggingObserver::new()));
    }

    let mut out = io::stdout();

    if config.json {
        let json = match controllers.as_slice() {
            [single] => timeline_json(single.timeline())?,
            all => {
                let timelines: Vec<_> = all.iter().map(PlaybackController::timeline).collect();
                serde_json::to_string_pretty(&timelines)?
            }
        };
        match &config.output {
            Some(path) => write_to_file(path, &json)?,
            None => writeln!(out, "{json}")?,
        }
        return Ok(());
    }

    let presenter = CliPresenter::new(config.verbose, config.quiet);
    if config.verbose && !config.quiet {
        print_header(&full_version());
    }

    for controller in &mut controllers {
        if !config.quiet {
            print_header(&format!(
                "{} {n}×{n}",
                controller.algorithm().title(),
                n = config.size
            ));
        }
        if config.autoplay {
            let report = autoplay(controller, &config.policy(), &presenter, &mut out)?;
            info!(
                algorithm = %controller.algorithm(),
                steps = report.steps,
                computed = report.computed,
                breakdowns = report.breakdowns,
                sub_demos = report.sub_demos,
                "Autoplay finished"
            );
        } else {
            presenter.present_step(controller, &mut out)?;
        }
        presenter.present_summary(controller.timeline(), &mut out)?;
    }

    if config.compare {
        let rows = compare(&a, &b, &DefaultFactory::new())?;
        presenter.present_comparison(&rows, &mut out)?;
        if !all_match(&rows) {
            return Err(DemoError::Mismatch.into());
        }
    }

    // Write the product to file if requested
    if let (Some(path), Some(first)) = (&config.output, controllers.first()) {
        let text = matrix_lines(first.timeline().result(), false).join("\n");
        write_to_file(path, &text)?;
    }

    Ok(())
}

fn run_tui(config: &AppConfig, algorithms: &[Algorithm]) -> Result<()> {
    let &[algorithm] = algorithms else {
        return Err(DemoError::Config(
            "the TUI shows one algorithm at a time; pick naive or strassen".into(),
        )
        .into());
    };

    let options = config.options(algorithm);
    let mut rng = options.rng();
    let controller = PlaybackController::generated(options, &mut rng)?;
    let mut app = TuiApp::new(controller, rng);

    // Run TUI event loop on the main thread
    app.run().map_err(|e| anyhow::anyhow!("TUI error: {e}"))?;

    if app.interrupted {
        return Err(DemoError::Interrupted.into());
    }
    Ok(())
}
