use clap::Parser;
use color_eyre::Result;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use msaview::{app::App, cli::Cli, headless, logging};
use std::io::stdout;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let _log_guard = if cli.debug {
        Some(logging::init_logging()?)
    } else {
        None
    };
    let options = cli.to_options()?;
    info!(
        file_path = ?options.file_path,
        initial_position = options.initial_position,
        headless = options.headless.is_some(),
        "startup options"
    );

    if let Some(headless_options) = &options.headless {
        let result = headless::run(&options, headless_options);
        if let Err(error_value) = &result {
            error!(error = ?error_value, "headless export failed");
        }
        return result;
    }

    info!("initialising terminal");
    let terminal = ratatui::init();
    if let Err(error_value) = execute!(stdout(), EnableMouseCapture) {
        error!(error = ?error_value, "failed to enable mouse capture");
        ratatui::restore();
        return Err(error_value.into());
    }
    info!("Loading msaview....");
    let app_result = App::new(options).run(terminal).await;
    match &app_result {
        Ok(()) => {}
        Err(error_value) => error!(error = ?error_value, "msaview exited with error"),
    }

    if let Err(error_value) = execute!(stdout(), DisableMouseCapture) {
        error!(error = ?error_value, "failed to disable mouse capture");
    }
    info!("restoring terminal");
    ratatui::restore();
    app_result
}
