use std::path::PathBuf;

use clap::Parser;
use env_logger::Env;
use log::info;

use crate::bot::Bot;
use crate::chart::SvgChartRenderer;
use crate::config::Config;
use crate::db::Database;
use crate::session::Sessions;

mod bot;
mod chart;
mod common;
mod config;
mod console;
mod db;
mod editor;
mod ledger;
mod money;
mod report;
mod session;
mod workflow;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
struct Cli {
    /// Config file path
    #[clap(long, default_value = "budgetbot.toml")]
    config: PathBuf,

    /// Database file path, overrides the config file
    #[clap(long)]
    database: Option<PathBuf>,

    /// Conversation id of this console session
    #[clap(long, default_value_t = 1)]
    chat_id: i64,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli: Cli = Cli::parse();
    let config = Config::load_from_file(&cli.config)?;

    let database_path = cli.database.unwrap_or_else(|| config.database_path());
    let db = Database::open(&database_path)?;
    info!("Unfinished entries expire after {} seconds", config.session_timeout().num_seconds());

    let mut bot = Bot::new(
        db,
        Sessions::new(config.session_timeout()),
        Box::new(SvgChartRenderer::default()),
        &config.greeting,
    );
    console::run(&mut bot, cli.chat_id, &config.chart_dir)
}
