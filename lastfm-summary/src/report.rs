use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, TimeZone, Utc};

/// Number of artists listed in the log and in the message.
pub const TOP_N: usize = 20;

/// The reporting interval `[from, now)`. The end is not stored: it is read
/// from the clock when the label is rendered, right before sending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    from: DateTime<Local>,
}

impl ReportWindow {
    /// Starts the window at the first local instant of `date`, which is
    /// midnight unless a DST change skips it.
    pub fn starting(date: NaiveDate) -> Result<Self> {
        let from = start_of_day(&Local, date)
            .with_context(|| format!("Report start {date} does not exist in local time"))?;
        Ok(Self { from })
    }

    pub fn from(&self) -> DateTime<Local> {
        self.from
    }

    pub fn from_utc(&self) -> DateTime<Utc> {
        self.from.with_timezone(&Utc)
    }

    pub fn year(&self) -> i32 {
        self.from.year()
    }

    pub fn label(&self, now: DateTime<Local>) -> String {
        format!(
            "{} - {}",
            self.from.format("%Y-%m-%d"),
            now.format("%Y-%m-%d")
        )
    }
}

fn start_of_day<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> Option<DateTime<Tz>> {
    let midnight = date.and_hms_opt(0, 0, 0)?;
    (0..24 * 60)
        .map(|minutes| midnight + Duration::minutes(minutes))
        .take_while(|t| t.date() == date)
        .find_map(|t| tz.from_local_datetime(&t).earliest())
}
