use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

use crate::application::dtos::StreakDto;
use crate::presentation::state::AppState;
use readstreak_domain::progress::ProgressEntry;
use readstreak_domain::shared::{BookId, DomainError, SessionId, UserKey};
use readstreak_domain::streak::ThresholdPolicy;

/// Book id used when `log` is called without `--book`.
const UNSPECIFIED_BOOK: &str = "unspecified";

#[derive(Debug, Parser)]
#[command(name = "readstreak", version, about = "Daily reading streak tracker")]
pub struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// User key; omit for single-user mode
    #[arg(long, global = true)]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the stored streak record
    Show,
    /// Recompute the streak from the full history
    Rebuild {
        #[arg(long)]
        as_of: Option<NaiveDate>,
        /// Also turn tracking on
        #[arg(long)]
        enable: bool,
    },
    /// Fold today's reading into the streak
    Update,
    /// Set the daily page goal
    Threshold {
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// Turn streak tracking on
    Enable {
        #[arg(long, allow_hyphen_values = true)]
        threshold: Option<String>,
    },
    /// Turn streak tracking off
    Disable,
    /// Record pages read and update the streak
    Log {
        #[arg(long)]
        pages: u32,
        #[arg(long)]
        book: Option<String>,
        #[arg(long)]
        session: Option<String>,
        /// RFC 3339 timestamp, defaults to now
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },
    /// Per-day totals between two dates (inclusive)
    Activity {
        #[arg(long)]
        from: NaiveDate,
        #[arg(long)]
        to: NaiveDate,
    },
}

impl Cli {
    pub fn user_key(&self) -> UserKey {
        self.user
            .as_deref()
            .map(UserKey::from_string)
            .unwrap_or_else(UserKey::single_tenant)
    }

    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(readstreak_infrastructure::EngineConfig::default_path)
    }
}

/// Run one command and return its output as pretty JSON.
pub async fn execute(state: &AppState, user: &UserKey, command: Command) -> anyhow::Result<String> {
    let streaks = &state.streaks;

    let record = match command {
        Command::Show => streaks.get_streak(user).await?,
        Command::Rebuild { as_of, enable } => streaks.rebuild_streak(user, as_of, enable).await?,
        Command::Update => streaks.update_streaks(user).await?,
        Command::Threshold { value } => {
            let threshold = ThresholdPolicy::parse(&value).map_err(DomainError::from)?;
            streaks
                .set_threshold(user, f64::from(threshold.value()))
                .await?
        }
        Command::Enable { threshold } => {
            let threshold = threshold
                .as_deref()
                .map(ThresholdPolicy::parse)
                .transpose()
                .map_err(DomainError::from)?
                .map(|t| f64::from(t.value()));
            streaks.set_streak_enabled(user, true, threshold).await?
        }
        Command::Disable => streaks.set_streak_enabled(user, false, None).await?,
        Command::Log {
            pages,
            book,
            session,
            at,
        } => {
            let entry = ProgressEntry::new(
                BookId::from_string(book.as_deref().unwrap_or(UNSPECIFIED_BOOK)),
                session.as_deref().map(SessionId::from_string),
                pages,
                at.unwrap_or_else(Utc::now),
            );
            streaks.record_progress(user, entry).await?
        }
        Command::Activity { from, to } => {
            let rows = state.activity.daily_activity(user, from, to).await?;
            return to_json(&rows);
        }
    };

    to_json(&StreakDto::from(&record))
}

fn to_json<T: Serialize>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
