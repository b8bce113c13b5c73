// src/common/calendar.rs

use chrono::{
    DateTime, Datelike, Days, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone,
};

use crate::common::error::AppError;

/// Intervalo fechado `[start, end]` no fuso de referência.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval<Tz: TimeZone> {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

/// Volta `back` meses a partir de (ano, mês), atravessando a virada de ano.
pub fn shift_months(year: i32, month: u32, back: u32) -> (i32, u32) {
    let index = year * 12 + month as i32 - 1 - back as i32;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

// Converte um horário "de parede" para o fuso. Num buraco de horário de verão
// o relógio avança uma hora, como o Date do navegador faz.
fn resolve<Tz: TimeZone>(
    tz: &Tz,
    naive: NaiveDateTime,
    prefer_latest: bool,
) -> Result<DateTime<Tz>, AppError> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt),
        LocalResult::Ambiguous(earliest, latest) => Ok(if prefer_latest { latest } else { earliest }),
        LocalResult::None => tz
            .from_local_datetime(&(naive + TimeDelta::hours(1)))
            .earliest()
            .ok_or_else(|| AppError::InvalidDate(naive.to_string())),
    }
}

/// 00:00:00.000 do dia.
pub fn start_of_day<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> Result<DateTime<Tz>, AppError> {
    resolve(tz, date.and_time(NaiveTime::MIN), false)
}

/// 23:59:59.999 do dia.
pub fn end_of_day<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> Result<DateTime<Tz>, AppError> {
    let last_milli = NaiveTime::from_hms_milli_opt(23, 59, 59, 999)
        .ok_or_else(|| AppError::InvalidDate(format!("{date} 23:59:59.999")))?;
    resolve(tz, date.and_time(last_milli), true)
}

/// Mês civil que fica `back` meses antes do mês de `now`.
pub fn month_interval<Tz: TimeZone>(now: &DateTime<Tz>, back: u32) -> Result<Interval<Tz>, AppError> {
    let tz = now.timezone();
    let (year, month) = shift_months(now.year(), now.month(), back);
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };

    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| AppError::InvalidDate(format!("{year}-{month:02}-01")))?;
    // "Dia zero" do mês seguinte: o último dia do mês, qualquer que seja o tamanho
    let last = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .ok_or_else(|| AppError::InvalidDate(format!("{next_year}-{next_month:02}-00")))?;

    Ok(Interval {
        start: start_of_day(&tz, first)?,
        end: end_of_day(&tz, last)?,
    })
}

/// Semana (domingo a sábado) que fica `back` semanas antes da semana de `now`.
pub fn week_interval<Tz: TimeZone>(now: &DateTime<Tz>, back: u32) -> Result<Interval<Tz>, AppError> {
    let tz = now.timezone();
    let days_back = 7 * u64::from(back) + u64::from(now.weekday().num_days_from_sunday());

    let first = now
        .date_naive()
        .checked_sub_days(Days::new(days_back))
        .ok_or_else(|| AppError::InvalidDate(format!("{} - {days_back} dias", now.date_naive())))?;
    let last = first
        .checked_add_days(Days::new(6))
        .ok_or_else(|| AppError::InvalidDate(format!("{first} + 6 dias")))?;

    Ok(Interval {
        start: start_of_day(&tz, first)?,
        end: end_of_day(&tz, last)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn utc(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn shift_months_rolls_back_across_years() {
        assert_eq!(shift_months(2024, 3, 0), (2024, 3));
        assert_eq!(shift_months(2024, 1, 1), (2023, 12));
        assert_eq!(shift_months(2024, 2, 5), (2023, 9));
        assert_eq!(shift_months(2024, 1, 13), (2022, 12));
    }

    #[test]
    fn month_interval_covers_the_whole_leap_february() {
        let now = utc("2024-03-15T10:00:00Z");
        let feb = month_interval(&now, 1).unwrap();

        assert_eq!(feb.start, utc("2024-02-01T00:00:00Z"));
        assert_eq!(feb.end, utc("2024-02-29T23:59:59.999Z"));
    }

    #[test]
    fn month_interval_for_january_minus_one_is_previous_december() {
        let now = utc("2024-01-20T08:00:00Z");
        let dec = month_interval(&now, 1).unwrap();

        assert_eq!(dec.start, utc("2023-12-01T00:00:00Z"));
        assert_eq!(dec.end, utc("2023-12-31T23:59:59.999Z"));
    }

    #[test]
    fn consecutive_months_touch_without_overlap() {
        let now = utc("2024-03-15T10:00:00Z");
        for back in 0..5 {
            let newer = month_interval(&now, back).unwrap();
            let older = month_interval(&now, back + 1).unwrap();
            assert_eq!(newer.start - older.end, TimeDelta::milliseconds(1));
        }
    }

    #[test]
    fn week_interval_starts_on_sunday_at_midnight() {
        // 2024-03-15 é uma sexta-feira
        let now = utc("2024-03-15T18:30:00Z");
        let week = week_interval(&now, 0).unwrap();

        assert_eq!(week.start, utc("2024-03-10T00:00:00Z"));
        assert_eq!(week.end, utc("2024-03-16T23:59:59.999Z"));

        let older = week_interval(&now, 2).unwrap();
        assert_eq!(older.start, utc("2024-02-25T00:00:00Z"));
    }

    #[test]
    fn week_interval_spans_six_days_and_a_last_millisecond() {
        let expected = TimeDelta::days(6)
            + TimeDelta::hours(23)
            + TimeDelta::minutes(59)
            + TimeDelta::seconds(59)
            + TimeDelta::milliseconds(999);

        let now = utc("2024-01-03T00:00:01Z");
        for back in 0..6 {
            let week = week_interval(&now, back).unwrap();
            assert_eq!(week.end.clone() - week.start.clone(), expected);
        }
    }

    #[test]
    fn intervals_follow_the_local_calendar_of_now() {
        // 02:00 em UTC ainda é dia 31 em São Paulo (UTC-3)
        let tz = FixedOffset::west_opt(3 * 3600).unwrap();
        let now = utc("2024-04-01T02:00:00Z").with_timezone(&tz);

        let month = month_interval(&now, 0).unwrap();
        assert_eq!(month.start, utc("2024-03-01T03:00:00Z"));
        assert_eq!(month.end, utc("2024-04-01T02:59:59.999Z"));
    }
}
