//! Calendar and fiscal-calendar arithmetic.
//!
//! The fiscal year starts in October: October 2023 is fiscal month 1 of
//! fiscal year 2024, September 2023 is fiscal month 12 of fiscal year 2023.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::{ClientError, ClientResult};

const FISCAL_YEAR_START_MONTH: u32 = 10;

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    pub fn new(year: i32, month: u32) -> ClientResult<Self> {
        if !(1..=12).contains(&month) || !(1..=9999).contains(&year) {
            return Err(ClientError::invalid_period(year, month));
        }
        Ok(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub const fn year(self) -> i32 {
        self.year
    }

    pub const fn month(self) -> u32 {
        self.month
    }

    pub const fn fiscal_year(self) -> i32 {
        if self.month >= FISCAL_YEAR_START_MONTH {
            self.year + 1
        } else {
            self.year
        }
    }

    pub const fn fiscal_month(self) -> u32 {
        if self.month >= FISCAL_YEAR_START_MONTH {
            self.month - 9
        } else {
            self.month + 3
        }
    }

    pub const fn previous(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub fn month_name(self) -> &'static str {
        MONTH_NAMES[(self.month - 1) as usize]
    }

    pub fn last_day_of_month(self) -> u32 {
        days_in_month(self.year, self.month)
    }

    pub fn report_date(self) -> String {
        format!(
            "{:04}-{:02}-{:02}",
            self.year,
            self.month,
            self.last_day_of_month()
        )
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

pub fn resolve_period(year: Option<i32>, month: Option<u32>, today: NaiveDate) -> ClientResult<Period> {
    let fallback = Period::from_date(today);
    Period::new(
        year.unwrap_or(fallback.year),
        month.unwrap_or(fallback.month),
    )
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 31,
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}
