//! Calendar marker aggregation
//!
//! Collapses the installation list into one marker per local calendar day:
//! a dot per installation, colored by status, plus a non-destructive
//! selection highlight for the day the user is viewing.

use std::collections::BTreeMap;

use chrono::{Local, NaiveDate};

use crate::domain::result::Result;
use crate::domain::{Installation, InstallationStatus};
use crate::theme::Theme;

use super::installation::InstallationService;

/// One dot on a calendar day, keyed by installation id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerDot {
    pub key: String,
    pub color: &'static str,
}

/// Everything the calendar renders for one day
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DayMarker {
    pub marked: bool,
    pub dots: Vec<MarkerDot>,
    pub selected: bool,
    pub selected_color: Option<&'static str>,
}

/// Status-to-color mapping derived from the active theme
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerPalette {
    pub pending: &'static str,
    pub completed: &'static str,
    pub cancelled: &'static str,
    pub selected: &'static str,
}

impl MarkerPalette {
    pub fn from_theme(theme: &Theme) -> Self {
        Self {
            pending: theme.warning,
            completed: theme.success,
            cancelled: theme.error,
            selected: theme.primary,
        }
    }

    pub fn color_for(&self, status: InstallationStatus) -> &'static str {
        match status {
            InstallationStatus::Pending => self.pending,
            InstallationStatus::Completed => self.completed,
            InstallationStatus::Cancelled => self.cancelled,
        }
    }
}

/// Group installations into per-day markers
///
/// Days are local calendar days of each installation's instant. Dot order
/// within a day follows the input order.
pub fn aggregate_markers(
    installations: &[Installation],
    palette: &MarkerPalette,
) -> BTreeMap<NaiveDate, DayMarker> {
    let mut markers: BTreeMap<NaiveDate, DayMarker> = BTreeMap::new();
    for installation in installations {
        let day = installation.date.with_timezone(&Local).date_naive();
        let marker = markers.entry(day).or_default();
        marker.marked = true;
        marker.dots.push(MarkerDot {
            key: installation.id.clone(),
            color: palette.color_for(installation.status),
        });
    }
    markers
}

/// Highlight the selected day without disturbing its dots
///
/// A selected day with no installations still gets a marked entry so the
/// highlight is visible.
pub fn apply_selection(
    markers: &mut BTreeMap<NaiveDate, DayMarker>,
    day: NaiveDate,
    palette: &MarkerPalette,
) {
    let marker = markers.entry(day).or_default();
    marker.marked = true;
    marker.selected = true;
    marker.selected_color = Some(palette.selected);
}

/// Service producing ready-to-render calendar markers
#[derive(Clone)]
pub struct CalendarService {
    installations: InstallationService,
}

impl CalendarService {
    pub fn new(installations: InstallationService) -> Self {
        Self { installations }
    }

    /// Markers for every installation, with an optional selected day
    pub fn markers(
        &self,
        selected: Option<NaiveDate>,
        theme: &Theme,
    ) -> Result<BTreeMap<NaiveDate, DayMarker>> {
        let palette = MarkerPalette::from_theme(theme);
        let installations = self.installations.get_all()?;
        let mut markers = aggregate_markers(&installations, &palette);
        if let Some(day) = selected {
            apply_selection(&mut markers, day, &palette);
        }
        Ok(markers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, NaiveTime, TimeZone, Utc};

    fn palette() -> MarkerPalette {
        MarkerPalette::from_theme(&Theme::light())
    }

    fn local_instant(day: NaiveDate, hour: u32) -> DateTime<Utc> {
        day.and_time(NaiveTime::from_hms_opt(hour, 0, 0).unwrap())
            .and_local_timezone(Local)
            .earliest()
            .unwrap()
            .with_timezone(&Utc)
    }

    fn installation(id: &str, date: DateTime<Utc>, status: InstallationStatus) -> Installation {
        Installation {
            id: id.to_string(),
            title: "t".to_string(),
            description: String::new(),
            date,
            address: String::new(),
            client: String::new(),
            phone: String::new(),
            status,
            created_by: "creator".to_string(),
            created_at: date,
        }
    }

    #[test]
    fn test_same_day_installations_share_a_marker() {
        let day = NaiveDate::from_ymd_opt(2026, 4, 2).unwrap();
        let input = vec![
            installation("a", local_instant(day, 9), InstallationStatus::Pending),
            installation("b", local_instant(day, 15), InstallationStatus::Completed),
        ];

        let markers = aggregate_markers(&input, &palette());
        assert_eq!(markers.len(), 1);
        let marker = &markers[&day];
        assert!(marker.marked);
        assert_eq!(marker.dots.len(), 2);
        assert_eq!(marker.dots[0].key, "a");
        assert_eq!(marker.dots[1].key, "b");
    }

    #[test]
    fn test_dot_colors_follow_status() {
        let day = NaiveDate::from_ymd_opt(2026, 4, 2).unwrap();
        let theme = Theme::light();
        let input = vec![
            installation("a", local_instant(day, 9), InstallationStatus::Pending),
            installation("b", local_instant(day, 10), InstallationStatus::Completed),
            installation("c", local_instant(day, 11), InstallationStatus::Cancelled),
        ];

        let markers = aggregate_markers(&input, &palette());
        let dots = &markers[&day].dots;
        assert_eq!(dots[0].color, theme.warning);
        assert_eq!(dots[1].color, theme.success);
        assert_eq!(dots[2].color, theme.error);
    }

    #[test]
    fn test_selection_preserves_existing_dots() {
        let day = NaiveDate::from_ymd_opt(2026, 4, 2).unwrap();
        let input = vec![installation(
            "a",
            local_instant(day, 9),
            InstallationStatus::Pending,
        )];

        let mut markers = aggregate_markers(&input, &palette());
        apply_selection(&mut markers, day, &palette());

        let marker = &markers[&day];
        assert_eq!(marker.dots.len(), 1);
        assert!(marker.selected);
        assert_eq!(marker.selected_color, Some(Theme::light().primary));
    }

    #[test]
    fn test_selecting_an_empty_day_creates_a_marker() {
        let day = NaiveDate::from_ymd_opt(2026, 4, 3).unwrap();
        let mut markers = BTreeMap::new();
        apply_selection(&mut markers, day, &palette());

        let marker = &markers[&day];
        assert!(marker.marked);
        assert!(marker.selected);
        assert!(marker.dots.is_empty());
    }

    #[test]
    fn test_installations_on_different_days_do_not_merge() {
        let day_a = NaiveDate::from_ymd_opt(2026, 4, 2).unwrap();
        let day_b = NaiveDate::from_ymd_opt(2026, 4, 3).unwrap();
        let input = vec![
            installation("a", local_instant(day_a, 23), InstallationStatus::Pending),
            installation("b", local_instant(day_b, 0), InstallationStatus::Pending),
        ];

        let markers = aggregate_markers(&input, &palette());
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[&day_a].dots.len(), 1);
        assert_eq!(markers[&day_b].dots.len(), 1);
    }
}
