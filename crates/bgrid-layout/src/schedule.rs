#![forbid(unsafe_code)]

//! Calendar mapping and the auto-scheduling tie-break.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Calendar settings for the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Date of day index 0.
    pub first_day: NaiveDate,
    /// Start time of the first slot on each day.
    pub first_game_time: NaiveTime,
    /// Hours between consecutive slots.
    pub slot_hours: u32,
    /// Fields in rotation order.
    pub fields: Vec<String>,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            first_day: NaiveDate::from_ymd_opt(2026, 6, 6).unwrap_or_default(),
            first_game_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
            slot_hours: 3,
            fields: vec!["Field #1".to_string(), "Field #2".to_string()],
        }
    }
}

impl ScheduleConfig {
    /// Date of a day index.
    #[must_use]
    pub fn date_for_day(&self, day: u32) -> Option<NaiveDate> {
        self.first_day
            .checked_add_signed(Duration::days(i64::from(day)))
    }

    /// Day index of a date; `None` before the first day.
    #[must_use]
    pub fn day_for_date(&self, date: NaiveDate) -> Option<u32> {
        u32::try_from((date - self.first_day).num_days()).ok()
    }

    #[must_use]
    pub fn first_slot(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.first_game_time)
    }

    #[must_use]
    pub fn first_field(&self) -> Option<&str> {
        self.fields.first().map(String::as_str)
    }

    /// Pick the slot for one more game on a day.
    ///
    /// With nothing scheduled the game takes the first field at the first
    /// slot. While fields are free at the latest time it takes the first
    /// free one; otherwise it opens the next slot on the first field.
    #[must_use]
    pub fn next_slot(&self, date: NaiveDate, latest: &LatestTime) -> ScheduledSlot {
        let first_field = self.first_field().map(str::to_string);
        let Some(max_time) = latest.max_time else {
            return ScheduledSlot {
                field: first_field,
                start_time: self.first_slot(date),
            };
        };

        if (latest.count as usize) < self.fields.len()
            && let Some(free) = self
                .fields
                .iter()
                .find(|field| !latest.fields_in_use.iter().any(|used| used == *field))
        {
            return ScheduledSlot {
                field: Some(free.clone()),
                start_time: max_time,
            };
        }

        ScheduledSlot {
            field: first_field,
            start_time: max_time + Duration::hours(i64::from(self.slot_hours)),
        }
    }
}

/// Latest scheduled time within one day band.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LatestTime {
    pub max_time: Option<NaiveDateTime>,
    /// Games starting at `max_time`.
    pub count: u32,
    /// Fields taken at `max_time`, in encounter order.
    pub fields_in_use: Vec<String>,
}

impl LatestTime {
    /// Fold one scheduled game into the running maximum.
    pub fn observe(&mut self, start_time: NaiveDateTime, field: Option<&str>) {
        match self.max_time {
            Some(max) if start_time < max => return,
            Some(max) if start_time == max => self.count += 1,
            _ => {
                self.max_time = Some(start_time);
                self.count = 1;
                self.fields_in_use.clear();
            }
        }
        if let Some(field) = field
            && !self.fields_in_use.iter().any(|used| used == field)
        {
            self.fields_in_use.push(field.to_string());
        }
    }
}

/// Field and start time chosen for a new game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledSlot {
    pub field: Option<String>,
    pub start_time: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 6, 6)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn empty_day_gets_first_field_and_slot() {
        let config = ScheduleConfig::default();
        let slot = config.next_slot(config.first_day, &LatestTime::default());
        assert_eq!(slot.field.as_deref(), Some("Field #1"));
        assert_eq!(slot.start_time, at(9));
    }

    #[test]
    fn free_field_shares_latest_time() {
        let config = ScheduleConfig::default();
        let mut latest = LatestTime::default();
        latest.observe(at(9), Some("Field #1"));
        let slot = config.next_slot(config.first_day, &latest);
        assert_eq!(slot.field.as_deref(), Some("Field #2"));
        assert_eq!(slot.start_time, at(9));
    }

    #[test]
    fn full_slot_advances_by_slot_hours() {
        let config = ScheduleConfig::default();
        let mut latest = LatestTime::default();
        latest.observe(at(9), Some("Field #1"));
        latest.observe(at(9), Some("Field #2"));
        let slot = config.next_slot(config.first_day, &latest);
        assert_eq!(slot.field.as_deref(), Some("Field #1"));
        assert_eq!(slot.start_time, at(12));
    }

    #[test]
    fn later_time_resets_the_count() {
        let mut latest = LatestTime::default();
        latest.observe(at(9), Some("Field #1"));
        latest.observe(at(9), Some("Field #2"));
        latest.observe(at(12), Some("Field #2"));
        latest.observe(at(6), Some("Field #1"));
        assert_eq!(latest.max_time, Some(at(12)));
        assert_eq!(latest.count, 1);
        assert_eq!(latest.fields_in_use, vec!["Field #2".to_string()]);
    }

    #[test]
    fn renamed_fields_in_use_still_advance() {
        let config = ScheduleConfig::default();
        let mut latest = LatestTime::default();
        latest.observe(at(9), Some("Ballfield"));
        let slot = config.next_slot(config.first_day, &latest);
        assert_eq!(slot.field.as_deref(), Some("Field #1"));
        assert_eq!(slot.start_time, at(9));
    }

    #[test]
    fn day_mapping_round_trips() {
        let config = ScheduleConfig::default();
        let date = config.date_for_day(3).unwrap();
        assert_eq!(config.day_for_date(date), Some(3));
        assert_eq!(config.day_for_date(config.first_day.pred_opt().unwrap()), None);
    }
}
