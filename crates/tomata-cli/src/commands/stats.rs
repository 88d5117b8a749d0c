//! Statistics commands over the session ledger.

use clap::Subcommand;

use tomata_core::App;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's work statistics
    Today,
    /// All-time work statistics
    All,
    /// Per-day work totals for charting
    Daily {
        /// Number of trailing days
        #[arg(long, default_value = "7")]
        days: u32,
    },
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let app = App::open()?;

    match action {
        StatsAction::Today => {
            let stats = app.stats()?;
            let today = serde_json::json!({
                "today_pomodoros": stats.today_pomodoros,
                "today_work_secs": stats.today_work_secs,
            });
            println!("{}", serde_json::to_string_pretty(&today)?);
        }
        StatsAction::All => {
            let stats = app.stats()?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        StatsAction::Daily { days } => {
            let series = app.daily_focus(days)?;
            println!("{}", serde_json::to_string_pretty(&series)?);
        }
    }
    Ok(())
}
