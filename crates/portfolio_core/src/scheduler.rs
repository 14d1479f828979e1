//! crates/portfolio_core/src/scheduler.rs
//!
//! Meeting bookings, persisted under the `meetings` key, checked against a
//! fixed weekly availability table. This is a static lookup by weekday; there
//! is no calendar or timezone handling.

use crate::collection::{LocalCollectionStore, Record};
use crate::domain::{Meeting, MeetingFormat, MeetingStatus, MeetingType};
use crate::ports::{KeyValueStore, PortError, PortResult};
use crate::validation::{max_chars, required, required_opt};
use chrono::{Datelike, Local, NaiveDate, NaiveTime, Timelike, Weekday};
use std::sync::Arc;

pub const MEETINGS_KEY: &str = "meetings";

pub const MAX_TOPIC_CHARS: usize = 500;

impl Record for Meeting {
    fn id(&self) -> u64 {
        self.id
    }
}

//=========================================================================================
// Availability
//=========================================================================================

/// Bookable hours for a weekday as `(first_hour, end_hour)`, end exclusive.
/// `None` means the day is closed.
pub fn available_hours(weekday: Weekday) -> Option<(u32, u32)> {
    match weekday {
        Weekday::Mon | Weekday::Tue | Weekday::Wed | Weekday::Thu | Weekday::Fri => {
            Some((10, 18))
        }
        Weekday::Sat => Some((11, 15)),
        Weekday::Sun => None,
    }
}

pub fn is_time_available(weekday: Weekday, hour: u32) -> bool {
    available_hours(weekday).is_some_and(|(start, end)| (start..end).contains(&hour))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayAvailability {
    pub weekday: Weekday,
    pub hours: Option<(u32, u32)>,
}

/// The whole week, Monday first.
pub fn weekly_availability() -> Vec<DayAvailability> {
    let mut day = Weekday::Mon;
    let mut week = Vec::with_capacity(7);
    for _ in 0..7 {
        week.push(DayAvailability {
            weekday: day,
            hours: available_hours(day),
        });
        day = day.succ();
    }
    week
}

//=========================================================================================
// Inputs
//=========================================================================================

/// The booking form. Every field is required.
#[derive(Debug, Clone, Default)]
pub struct MeetingRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub meeting_type: Option<MeetingType>,
    pub format: Option<MeetingFormat>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    /// Minutes.
    pub duration: Option<u32>,
    pub topic: String,
}

struct ValidBooking {
    name: String,
    email: String,
    phone: String,
    meeting_type: MeetingType,
    format: MeetingFormat,
    date: NaiveDate,
    time: NaiveTime,
    duration: u32,
    topic: String,
}

impl ValidBooking {
    fn check(request: MeetingRequest, today: NaiveDate) -> PortResult<Self> {
        let name = required("name", &request.name)?;
        let email = required("email", &request.email)?;
        let phone = required("phone", &request.phone)?;
        let meeting_type = required_opt("type", request.meeting_type)?;
        let format = required_opt("format", request.format)?;
        let date = required_opt("date", request.date)?;
        let time = required_opt("time", request.time)?;
        let duration = required_opt("duration", request.duration.filter(|d| *d > 0))?;
        let topic = required("topic", &request.topic)?;
        max_chars("topic", &topic, MAX_TOPIC_CHARS)?;

        if date < today {
            return Err(PortError::Validation(
                "date must not be in the past".to_string(),
            ));
        }
        if !is_time_available(date.weekday(), time.hour()) {
            return Err(PortError::Validation(
                "time is outside availability hours".to_string(),
            ));
        }

        Ok(Self {
            name,
            email,
            phone,
            meeting_type,
            format,
            date,
            time,
            duration,
            topic,
        })
    }

    fn apply_to(self, meeting: &mut Meeting) {
        meeting.name = self.name;
        meeting.email = self.email;
        meeting.phone = self.phone;
        meeting.meeting_type = self.meeting_type;
        meeting.format = self.format;
        meeting.date = self.date;
        meeting.time = self.time;
        meeting.duration = self.duration;
        meeting.topic = self.topic;
    }
}

//=========================================================================================
// The Scheduler
//=========================================================================================

pub struct MeetingScheduler {
    store: LocalCollectionStore<Meeting>,
}

impl MeetingScheduler {
    /// Opens the scheduler. A fresh scheduler has no bookings.
    pub fn open(backend: Arc<dyn KeyValueStore>) -> Self {
        Self::with_seed(backend, Vec::new)
    }

    pub fn with_seed<F>(backend: Arc<dyn KeyValueStore>, seed: F) -> Self
    where
        F: Fn() -> Vec<Meeting> + Send + Sync + 'static,
    {
        Self {
            store: LocalCollectionStore::open(MEETINGS_KEY, backend, seed),
        }
    }

    pub fn load(&mut self) -> &[Meeting] {
        self.store.load()
    }

    /// Newest first.
    pub fn list(&self) -> &[Meeting] {
        self.store.records()
    }

    pub fn get(&self, id: u64) -> PortResult<&Meeting> {
        self.store.get(id)
    }

    pub fn create(&mut self, request: MeetingRequest) -> PortResult<Meeting> {
        self.create_on(request, today())
    }

    /// Books a meeting, treating `today` as the current date.
    pub fn create_on(&mut self, request: MeetingRequest, today: NaiveDate) -> PortResult<Meeting> {
        let booking = ValidBooking::check(request, today)?;

        self.store.create(|id, created_at| Meeting {
            id,
            name: booking.name,
            email: booking.email,
            phone: booking.phone,
            meeting_type: booking.meeting_type,
            format: booking.format,
            date: booking.date,
            time: booking.time,
            duration: booking.duration,
            topic: booking.topic,
            created_at,
            status: MeetingStatus::Pending,
        })
    }

    pub fn update(&mut self, id: u64, request: MeetingRequest) -> PortResult<Meeting> {
        self.update_on(id, request, today())
    }

    /// Replaces the booking's form fields; id, creation time and status stay.
    pub fn update_on(
        &mut self,
        id: u64,
        request: MeetingRequest,
        today: NaiveDate,
    ) -> PortResult<Meeting> {
        self.store.get(id)?;
        let booking = ValidBooking::check(request, today)?;

        self.store.update(id, move |meeting, _| {
            booking.apply_to(meeting);
            Ok(())
        })
    }

    /// Cancels a booking.
    pub fn remove(&mut self, id: u64) -> PortResult<Meeting> {
        self.store.remove(id)
    }

    pub fn clear(&mut self) -> PortResult<()> {
        self.store.clear()
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekly_table_matches_opening_hours() {
        let week = weekly_availability();
        assert_eq!(week.len(), 7);
        assert_eq!(week[0].weekday, Weekday::Mon);
        assert_eq!(week[4].hours, Some((10, 18)));
        assert_eq!(week[5].hours, Some((11, 15)));
        assert_eq!(week[6].hours, None);
    }

    #[test]
    fn window_end_is_exclusive() {
        assert!(is_time_available(Weekday::Fri, 17));
        assert!(!is_time_available(Weekday::Fri, 18));
        assert!(is_time_available(Weekday::Sat, 14));
        assert!(!is_time_available(Weekday::Sat, 15));
        assert!(!is_time_available(Weekday::Sun, 12));
    }
}
