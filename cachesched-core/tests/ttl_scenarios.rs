use std::sync::Arc;
use std::thread;

use cachesched_core::{
    ClockReadError, Clock, DesiredState, Error, ExpirationSpread, FixedClock, Schedule, Scheduler,
    SwitchOverPoint,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use chrono_tz::Tz;

const DAY: i64 = 86_400;

fn p(s: &str) -> SwitchOverPoint {
    s.parse().unwrap()
}

// 2026-02-16 is a Monday.
fn utc_at(day_offset: u32, hour: u32, minute: u32) -> DateTime<Tz> {
    Utc.with_ymd_and_hms(2026, 2, 16 + day_offset, hour, minute, 0)
        .unwrap()
        .with_timezone(&Tz::UTC)
}

fn scheduler_at(now: DateTime<Tz>) -> Scheduler<FixedClock> {
    Scheduler::new(FixedClock::new(now))
}

fn office_hours() -> Schedule {
    Schedule::new()
        .stale_from(p("Mon 00:00"))
        .with_up_to_date_window(p("Mon 09:00"), p("Fri 17:00"))
}

#[test]
fn saturday_morning_waits_until_monday_nine() {
    let now = utc_at(5, 10, 0);
    let ttl = scheduler_at(now)
        .calculate_time_to_live(300, Some(&office_hours()), None)
        .unwrap();
    assert_eq!(ttl, 169_200);
}

#[test]
fn up_to_date_returns_default_ttl_regardless_of_spread() {
    let spread = ExpirationSpread::new(100, 1_000).unwrap();
    let scheduler = scheduler_at(utc_at(2, 12, 0))
        .set_schedule(office_hours())
        .set_expiration_spread(spread);
    for ttl in [0, 1, 60, 86_400] {
        assert_eq!(scheduler.calculate_time_to_live(ttl, None, None), Ok(ttl));
    }
}

#[test]
fn stale_ttl_matches_distance_to_switch_over() {
    let schedule = office_hours();
    // Every hour from Friday 17:00 up to Monday 08:00 is stale.
    let friday_close = utc_at(4, 17, 0);
    let monday_open = utc_at(7, 9, 0);
    let mut now = friday_close;
    while now < monday_open {
        assert_eq!(schedule.desired_state(&now).unwrap(), DesiredState::Stale);
        let ttl = scheduler_at(now).calculate_time_to_live(1, Some(&schedule), None).unwrap();
        assert!(ttl > 0);
        assert_eq!(ttl, (monday_open - now).num_seconds());
        now += Duration::hours(1);
    }
}

#[test]
fn sunday_night_window_wraps_into_monday() {
    let late_window = Schedule::new().with_up_to_date_window(p("Sun 23:00"), p("Mon 01:00"));

    let saturday_noon = utc_at(5, 12, 0);
    assert_eq!(
        scheduler_at(saturday_noon).calculate_time_to_live(60, Some(&late_window), None),
        Ok(DAY + 11 * 3_600)
    );

    let monday_half_past = utc_at(0, 0, 30);
    assert_eq!(late_window.desired_state(&monday_half_past).unwrap(), DesiredState::UpToDate);
    assert_eq!(
        scheduler_at(monday_half_past).calculate_time_to_live(60, Some(&late_window), None),
        Ok(60)
    );

    // Monday 01:00 just closed the window: wait for Sunday 23:00.
    let monday_one = utc_at(0, 1, 0);
    assert_eq!(
        scheduler_at(monday_one).calculate_time_to_live(60, Some(&late_window), None),
        Ok(6 * DAY + 22 * 3_600)
    );
}

#[test]
fn spread_stays_within_bounds_and_covers_range() {
    let now = utc_at(5, 10, 0);
    let spread = ExpirationSpread::new(0, 5).unwrap();
    let scheduler = scheduler_at(now).set_schedule(office_hours());

    let mut seen = std::collections::BTreeSet::new();
    for _ in 0..500 {
        let ttl = scheduler.calculate_time_to_live(300, None, Some(&spread)).unwrap();
        assert!((169_200..=169_205).contains(&ttl));
        seen.insert(ttl - 169_200);
    }
    assert_eq!(seen.into_iter().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4, 5]);
}

#[test]
fn clock_failure_during_stale_period_returns_default_ttl() {
    struct Flaky;
    impl Clock for Flaky {
        fn current_date_time(&self) -> Result<DateTime<Tz>, ClockReadError> {
            Err(ClockReadError("simulated".to_string()))
        }
    }
    let scheduler = Scheduler::new(Flaky);
    let spread = ExpirationSpread::new(10, 20).unwrap();
    assert_eq!(
        scheduler.calculate_time_to_live(777, Some(&office_hours()), Some(&spread)),
        Ok(777)
    );
}

#[test]
fn empty_schedule_always_errors() {
    let scheduler = scheduler_at(utc_at(5, 10, 0));
    let spread = ExpirationSpread::new(0, 1).unwrap();
    for ttl in [0, 60, 3_600] {
        assert_eq!(
            scheduler.calculate_time_to_live(ttl, Some(&Schedule::new()), Some(&spread)),
            Err(Error::EmptySchedule)
        );
    }
}

#[test]
fn local_time_zone_drives_the_week() {
    // Saturday 23:30 UTC is already Sunday 08:30 in Tokyo.
    let tokyo: Tz = "Asia/Tokyo".parse().unwrap();
    let now = Utc
        .with_ymd_and_hms(2026, 2, 21, 23, 30, 0)
        .unwrap()
        .with_timezone(&tokyo);
    let ttl = scheduler_at(now)
        .calculate_time_to_live(60, Some(&office_hours()), None)
        .unwrap();
    assert_eq!(ttl, DAY + 30 * 60);
}

#[test]
fn shared_scheduler_serves_many_threads() {
    let clock = Arc::new(FixedClock::new(utc_at(5, 10, 0)));
    let base = Arc::new(Scheduler::new(clock).set_schedule(office_hours()));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let scheduler = Arc::clone(&base);
            thread::spawn(move || {
                let spread = ExpirationSpread::new(i, i).unwrap();
                scheduler.set_expiration_spread(spread).calculate_time_to_live(60, None, None)
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), Ok(169_200 + i as i64));
    }
    assert!(base.expiration_spread().is_none());
}
