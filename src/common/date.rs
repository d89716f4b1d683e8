//! Conversions between chrono values and 1900-system serial numbers.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

pub(crate) const SECONDS_PER_DAY: f64 = 86_400.0;
const MILLIS_PER_DAY: u32 = 86_400_000;

// Days from 0001-01-01 (CE day 1) to 1899-12-30, the day before serial 1 in
// the 1900 system once the fictitious 1900-02-29 is accounted for.
const SERIAL_EPOCH_DAYS_FROM_CE: i32 = 693_594;

/// Serial number of a date (`1970-01-01 -> 25569`).
pub fn date_to_serial(date: NaiveDate) -> f64 {
    (date.num_days_from_ce() - SERIAL_EPOCH_DAYS_FROM_CE) as f64
}

/// Serial number of a date-time, with the time as the fractional day.
pub fn datetime_to_serial(dt: NaiveDateTime) -> f64 {
    let time = dt.time();
    let seconds =
        time.num_seconds_from_midnight() as f64 + time.nanosecond() as f64 / 1_000_000_000.0;
    date_to_serial(dt.date()) + seconds / SECONDS_PER_DAY
}

/// Date of a serial number; the fractional part is ignored.
pub fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() {
        return None;
    }
    let days = i32::try_from(serial.floor() as i64).ok()?;
    NaiveDate::from_num_days_from_ce_opt(SERIAL_EPOCH_DAYS_FROM_CE.checked_add(days)?)
}

/// Date-time of a serial number, rounded to the nearest millisecond.
pub fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    let date = serial_to_date(serial)?;
    let millis = ((serial - serial.floor()) * MILLIS_PER_DAY as f64).round() as u32;
    if millis >= MILLIS_PER_DAY {
        return Some(date.succ_opt()?.and_time(NaiveTime::MIN));
    }
    let time =
        NaiveTime::from_num_seconds_from_midnight_opt(millis / 1000, (millis % 1000) * 1_000_000)?;
    Some(date.and_time(time))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_serials() {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        assert_eq!(date_to_serial(epoch), 25569.0);
        assert_eq!(serial_to_date(25569.0), Some(epoch));

        let day = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(date_to_serial(day), 45366.0);
    }

    #[test]
    fn test_datetime_round_trip() {
        let dt = NaiveDate::from_ymd_opt(2023, 7, 4)
            .unwrap()
            .and_hms_opt(18, 30, 15)
            .unwrap();
        let serial = datetime_to_serial(dt);
        assert_eq!(serial_to_datetime(serial), Some(dt));
    }

    #[test]
    fn test_datetime_keeps_milliseconds() {
        let dt = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_milli_opt(3, 4, 5, 678)
            .unwrap();
        assert_eq!(serial_to_datetime(datetime_to_serial(dt)), Some(dt));

        let last = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_milli_opt(23, 59, 59, 999)
            .unwrap();
        assert_eq!(serial_to_datetime(datetime_to_serial(last)), Some(last));
        // Rounds up into the next day
        assert_eq!(
            serial_to_datetime(45293.999_999_999),
            NaiveDate::from_ymd_opt(2024, 1, 3).unwrap().and_hms_opt(0, 0, 0)
        );
    }

    #[test]
    fn test_rejects_non_finite() {
        assert_eq!(serial_to_date(f64::NAN), None);
        assert_eq!(serial_to_datetime(f64::INFINITY), None);
    }
}
