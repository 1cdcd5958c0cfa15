use serde::{Deserialize, Serialize};
use vacancy_model::RoomSchedule;

/// A complete scrape of one site's availability calendar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcquiredCalendar {
    pub source: SourceInfo,
    /// One entry per day link discovered on the calendar, in calendar order.
    /// Days that failed to fetch or parse are absent.
    pub days: Vec<DayAvailability>,
}

/// Provenance information about the acquisition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceInfo {
    pub url: String,
    pub site: String,
    pub fetched_at: String,
}

/// One calendar day's reservation map: every room's full-day timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayAvailability {
    /// Date string as it appears in the site's day links, "YYYY/M/D".
    pub date: String,
    pub rooms: Vec<RoomSchedule>,
}

impl DayAvailability {
    /// Look up one room's timeline by name.
    pub fn room(&self, name: &str) -> Option<&RoomSchedule> {
        self.rooms.iter().find(|r| r.room == name)
    }
}

impl AcquiredCalendar {
    /// Generate a source.md provenance file.
    pub fn source_md(&self) -> String {
        format!(
            "# Source\n\n\
             - **Site:** {}\n\
             - **URL:** {}\n\
             - **Fetched:** {}\n\
             - **Days:** {}\n",
            self.source.site,
            self.source.url,
            self.source.fetched_at,
            self.days.len(),
        )
    }
}
