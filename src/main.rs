mod app;
mod color;
mod config;
mod error;
mod field;
mod math;
mod particle;
mod quiz;
mod render;
mod state;
mod terminal;
mod transition;
mod ui;

use app::App;
use clap::Parser;
use config::Cli;
use error::AppError;
use log::info;
use quiz::source::DirectorySource;
use terminal::Terminal;

/// Main function
fn main() -> Result<(), AppError> {
    pretty_env_logger::init();
    let cli = Cli::parse();
    let field_config = cli.field_config()?;
    info!(
        "Starting with quiz {} from {}",
        cli.quiz_id,
        cli.data_dir.display()
    );

    let mut terminal = Terminal::open()?;
    let source = Box::new(DirectorySource::new(cli.data_dir.clone()));
    let mut app = App::new(&cli, field_config, source, Terminal::size());

    let result = app.run(&mut terminal);
    app.shutdown();
    drop(terminal);
    result
}
