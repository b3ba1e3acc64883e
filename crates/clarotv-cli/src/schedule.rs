//! Schedule presenter.
//!
//! Turns an [`EpgResponse`] into display rows: one per channel, in
//! service order, each with its logo URL and programs in source order.

use clarotv_api::epg::EpgResponse;

/// One program line (`Título` / `Horário`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramEntry {
    /// Program title.
    pub title: String,
    /// Service-formatted time range.
    pub time: String,
}

/// One channel row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelRow {
    /// Channel name.
    pub name: String,
    /// Logo image URL.
    pub logo_url: String,
    /// Programs in source order.
    pub programs: Vec<ProgramEntry>,
    /// Whether the program table is shown.
    pub expanded: bool,
}

/// Rendered schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleView {
    /// Channel rows in service order.
    pub rows: Vec<ChannelRow>,
}

impl ScheduleView {
    /// Builds the view from a decoded response.
    ///
    /// No sorting, filtering, or deduplication is applied. Channels with
    /// no programs keep their row.
    #[must_use]
    pub fn from_response(response: &EpgResponse, image_base_url: &str) -> Self {
        let rows = response
            .channels
            .iter()
            .map(|channel| ChannelRow {
                name: channel.name.clone(),
                logo_url: channel.logo_url(image_base_url),
                programs: channel
                    .programs
                    .iter()
                    .map(|p| ProgramEntry {
                        title: p.title.clone(),
                        time: p.formatted_time.clone(),
                    })
                    .collect(),
                expanded: false,
            })
            .collect();
        Self { rows }
    }

    /// Number of channel rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` when the response had no channels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Total program entries across all rows.
    #[must_use]
    pub fn program_count(&self) -> usize {
        self.rows.iter().map(|r| r.programs.len()).sum()
    }

    /// Shows or hides the program table of row `index`.
    pub fn toggle(&mut self, index: usize) {
        if let Some(row) = self.rows.get_mut(index) {
            row.expanded = !row.expanded;
        }
    }
}

/// Writes the schedule as plain text through the log output.
pub fn log_schedule(view: &ScheduleView) {
    for row in &view.rows {
        tracing::info!("{}\t{}", row.name, row.logo_url);
        if row.programs.is_empty() {
            tracing::info!("\t(sem programação)");
            continue;
        }
        tracing::info!("\tTítulo\tHorário");
        for program in &row.programs {
            tracing::info!("\t{}\t{}", program.title, program.time);
        }
    }
    tracing::info!(
        "Total: {} channels, {} programs",
        view.len(),
        view.program_count()
    );
}
