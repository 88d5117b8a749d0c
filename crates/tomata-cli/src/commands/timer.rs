//! Timer commands.
//!
//! `run` drives the countdown in the foreground, one tick per wall-clock
//! second; everything else is a one-shot operation against the persisted
//! state. An in-flight countdown only exists inside a `run` process and
//! is never resumed by a later invocation.

use std::io::Write;
use std::time::Duration;

use clap::Subcommand;

use tomata_core::{App, Event, SettingsPatch, TimerMode, AUTO_START_DELAY_SECS};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run the countdown in the foreground
    Run {
        /// Stop after this many completed sessions (default: stop when
        /// auto-start does not chain into the next one)
        #[arg(long)]
        sessions: Option<u32>,
    },
    /// Print the current timer state as JSON
    Status,
    /// Switch mode: work, shortBreak or longBreak
    Switch {
        mode: String,
    },
    /// Reset to idle at the full configured duration
    Reset,
    /// Record one full session of the current mode immediately
    Complete,
    /// Update timer settings
    Set {
        /// Work session length in seconds
        #[arg(long)]
        work_duration: Option<u32>,
        /// Short break length in seconds
        #[arg(long)]
        short_break_duration: Option<u32>,
        /// Long break length in seconds
        #[arg(long)]
        long_break_duration: Option<u32>,
        /// Work sessions before a long break
        #[arg(long)]
        sessions_until_long_break: Option<u32>,
        /// Start breaks automatically after a work session
        #[arg(long)]
        auto_start_breaks: Option<bool>,
        /// Start work automatically after a break
        #[arg(long)]
        auto_start_work: Option<bool>,
        /// Play a sound on completion
        #[arg(long)]
        sound_enabled: Option<bool>,
        /// Show a desktop notification on completion
        #[arg(long)]
        notifications_enabled: Option<bool>,
    },
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = App::open()?;

    match action {
        TimerAction::Run { sessions } => run_countdown(&mut app, sessions)?,
        TimerAction::Status => {
            println!("{}", serde_json::to_string_pretty(&app.snapshot())?);
        }
        TimerAction::Switch { mode } => {
            let mode: TimerMode = mode.parse()?;
            match app.switch_mode(mode)? {
                Some(event) => println!("{}", serde_json::to_string_pretty(&event)?),
                None => println!("mode unchanged (a countdown is in flight)"),
            }
        }
        TimerAction::Reset => {
            if let Some(event) = app.reset_timer() {
                println!("{}", serde_json::to_string_pretty(&event)?);
            }
        }
        TimerAction::Complete => {
            // Start-and-finalize: credits a full session of the current
            // mode without waiting the wall-clock time out.
            app.start_timer();
            if let Some(event) = app.complete_timer()? {
                notify_completion(&app, &event);
                println!("{}", serde_json::to_string_pretty(&event)?);
            }
        }
        TimerAction::Set {
            work_duration,
            short_break_duration,
            long_break_duration,
            sessions_until_long_break,
            auto_start_breaks,
            auto_start_work,
            sound_enabled,
            notifications_enabled,
        } => {
            let patch = SettingsPatch {
                work_duration,
                short_break_duration,
                long_break_duration,
                sessions_until_long_break,
                auto_start_breaks,
                auto_start_work,
                sound_enabled,
                notifications_enabled,
            };
            let event = app.update_settings(&patch)?;
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
    }

    Ok(())
}

/// Foreground countdown loop: one engine tick per wall-clock second,
/// chaining into the next session while the auto-start policy says so.
fn run_countdown(app: &mut App, sessions: Option<u32>) -> Result<(), Box<dyn std::error::Error>> {
    let mut completed = 0u32;

    if let Some(event) = app.start_timer() {
        println!("{}", serde_json::to_string_pretty(&event)?);
    }

    loop {
        std::thread::sleep(Duration::from_secs(1));

        match app.tick()? {
            Some(event @ Event::SessionCompleted { .. }) => {
                println!();
                println!("{}", serde_json::to_string_pretty(&event)?);
                notify_completion(app, &event);

                completed += 1;
                if let Some(limit) = sessions {
                    if completed >= limit {
                        break;
                    }
                }

                let auto_start =
                    matches!(&event, Event::SessionCompleted { auto_start: true, .. });
                if !auto_start {
                    break;
                }
                std::thread::sleep(Duration::from_secs(AUTO_START_DELAY_SECS));
                if let Some(event) = app.start_timer() {
                    println!("{}", serde_json::to_string_pretty(&event)?);
                }
            }
            _ => {
                let engine = app.engine();
                print!(
                    "\r{} {}  ",
                    engine.mode(),
                    format_time(engine.remaining_secs())
                );
                std::io::stdout().flush().ok();
            }
        }
    }

    Ok(())
}

/// Desktop toast on completion, honoring the notifications toggle.
fn notify_completion(app: &App, event: &Event) {
    if !app.engine().settings().notifications_enabled {
        return;
    }
    let Event::SessionCompleted { session, .. } = event else {
        return;
    };
    let body = match session.mode {
        TimerMode::Work => "Focus session complete! Time for a break.",
        TimerMode::ShortBreak => "Break's over! Ready for the next focus session.",
        TimerMode::LongBreak => "Long break finished! Start a fresh cycle.",
    };
    let _ = notify_rust::Notification::new()
        .summary("tomata")
        .body(body)
        .show();
}

/// MM:SS, overflowing into minutes past 99 rather than truncating.
fn format_time(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
