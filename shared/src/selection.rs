use crate::catalog::{PeriodList, VisualizationKind};
use crate::error::DashboardError;

/// Which visualization and which period the dashboard shows.
///
/// Owned by exactly one `DashboardShell`. Transitions mutate in place and
/// rejected transitions leave the state untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionState {
    visualization_index: usize,
    visualization_count: usize,
    period: String,
    periods: PeriodList,
}

impl SelectionState {
    /// Starts at the first visualization and the most recent period.
    pub fn new(periods: PeriodList) -> Self {
        Self::with_visualization_count(periods, VisualizationKind::COUNT)
    }

    pub(crate) fn with_visualization_count(periods: PeriodList, visualization_count: usize) -> Self {
        Self {
            visualization_index: 0,
            visualization_count: visualization_count.max(1),
            period: periods.most_recent().to_string(),
            periods,
        }
    }

    pub fn visualization_index(&self) -> usize {
        self.visualization_index
    }

    pub fn visualization_count(&self) -> usize {
        self.visualization_count
    }

    pub fn visualization_kind(&self) -> VisualizationKind {
        VisualizationKind::from_index(self.visualization_index).unwrap_or(VisualizationKind::Trend)
    }

    pub fn period(&self) -> &str {
        &self.period
    }

    pub fn periods(&self) -> &PeriodList {
        &self.periods
    }

    /// Advances to the next visualization, wrapping after the last.
    pub fn next(&mut self) {
        self.visualization_index = (self.visualization_index + 1) % self.visualization_count;
    }

    /// Steps back to the previous visualization, wrapping before the first.
    pub fn previous(&mut self) {
        self.visualization_index =
            (self.visualization_index + self.visualization_count - 1) % self.visualization_count;
    }

    pub fn set_index(&mut self, index: usize) -> Result<(), DashboardError> {
        if index >= self.visualization_count {
            return Err(DashboardError::InvalidIndex {
                index,
                count: self.visualization_count,
            });
        }
        self.visualization_index = index;
        Ok(())
    }

    pub fn set_period(&mut self, period: &str) -> Result<(), DashboardError> {
        if !self.periods.contains(period) {
            return Err(DashboardError::UnknownPeriod(period.to_string()));
        }
        if self.period != period {
            self.period = period.to_string();
        }
        Ok(())
    }

    /// False at the last visualization; for the non-wrapping navigation UX.
    pub fn can_go_next(&self) -> bool {
        self.visualization_index + 1 < self.visualization_count
    }

    /// False at the first visualization; for the non-wrapping navigation UX.
    pub fn can_go_previous(&self) -> bool {
        self.visualization_index > 0
    }
}

/// A validated period choice over a period list, used for the table's
/// fiscal-year selector.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodCursor {
    period: String,
    periods: PeriodList,
}

impl PeriodCursor {
    pub fn new(periods: PeriodList, initial: &str) -> Result<Self, DashboardError> {
        if !periods.contains(initial) {
            return Err(DashboardError::UnknownPeriod(initial.to_string()));
        }
        Ok(Self {
            period: initial.to_string(),
            periods,
        })
    }

    pub fn period(&self) -> &str {
        &self.period
    }

    pub fn periods(&self) -> &PeriodList {
        &self.periods
    }

    pub fn set_period(&mut self, period: &str) -> Result<(), DashboardError> {
        if !self.periods.contains(period) {
            return Err(DashboardError::UnknownPeriod(period.to_string()));
        }
        self.period = period.to_string();
        Ok(())
    }
}
