//! `cal` command: text calendars for a month or a whole year.

use super::context::Outcome;
use super::invoke::{Call, CommandBody, CommandError};
use super::parsing::Parsed;
use chrono::{Datelike, Local, Month, NaiveDate};

const WEEK_HEADER: &str = "Mo Tu We Th Fr Sa Su";
const WIDTH: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Month { year: i32, month: u32 },
    Year(i32),
}

pub struct Calendar {
    today: fn() -> NaiveDate,
}

impl Calendar {
    pub fn new() -> Self {
        Self {
            today: || Local::now().date_naive(),
        }
    }
}

impl Default for Calendar {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandBody for Calendar {
    fn run(&self, args: Parsed, _call: &mut Call<'_>) -> Result<Outcome, CommandError> {
        let tokens = args.into_words();
        let body = match select(&tokens, (self.today)())? {
            Selection::Month { year, month } => render_month(year, month)?,
            Selection::Year(year) => render_year(year)?,
        };
        Ok(Outcome::Text(body))
    }
}

fn not_understood(tokens: &[String]) -> CommandError {
    CommandError::Unparseable(tokens.join(" "))
}

fn parse_month(token: &str) -> Option<u32> {
    if let Ok(n) = token.parse::<u32>() {
        return (1..=12).contains(&n).then_some(n);
    }
    token.parse::<Month>().ok().map(|m| m.number_from_month())
}

/// Years as typed next to a month: two digits mean 20xx.
fn parse_year(token: &str) -> Option<i32> {
    let n = token.parse::<i32>().ok()?;
    match n {
        0..=99 => Some(2000 + n),
        1000..=9999 => Some(n),
        _ => None,
    }
}

/// A lone number: 13-31 reads as a day of month, which we cannot place.
fn parse_lone_year(token: &str) -> Option<i32> {
    let n = token.parse::<i32>().ok()?;
    match n {
        13..=31 => None,
        _ => parse_year(token),
    }
}

pub fn select(tokens: &[String], today: NaiveDate) -> Result<Selection, CommandError> {
    match tokens {
        [] => Ok(Selection::Month {
            year: today.year(),
            month: today.month(),
        }),
        [one] => {
            if let Some(month) = parse_month(one) {
                return Ok(Selection::Month {
                    year: today.year(),
                    month,
                });
            }
            parse_lone_year(one)
                .map(Selection::Year)
                .ok_or_else(|| not_understood(tokens))
        }
        [a, b] => {
            if let (Some(month), Some(year)) = (parse_month(a), parse_year(b)) {
                return Ok(Selection::Month { year, month });
            }
            if let (Some(year), Some(month)) = (parse_year(a), parse_month(b)) {
                return Ok(Selection::Month { year, month });
            }
            Err(not_understood(tokens))
        }
        _ => Err(not_understood(tokens)),
    }
}

fn month_lines(year: i32, month: u32, with_year: bool) -> Result<Vec<String>, CommandError> {
    let invalid = || CommandError::Unparseable(format!("{month} {year}"));
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(invalid)?;
    let days = next.signed_duration_since(first).num_days() as u32;

    let name = Month::try_from(month as u8).map_err(|_| invalid())?.name();
    let title = if with_year {
        format!("{name} {year}")
    } else {
        name.to_string()
    };

    let mut lines = vec![
        format!("{:^width$}", title, width = WIDTH).trim_end().to_string(),
        WEEK_HEADER.to_string(),
    ];
    let offset = first.weekday().num_days_from_monday() as usize;
    let mut cells: Vec<String> = vec!["  ".to_string(); offset];
    for day in 1..=days {
        cells.push(format!("{day:>2}"));
        if cells.len() == 7 {
            lines.push(cells.join(" "));
            cells.clear();
        }
    }
    if !cells.is_empty() {
        lines.push(cells.join(" "));
    }
    Ok(lines)
}

pub fn render_month(year: i32, month: u32) -> Result<String, CommandError> {
    Ok(month_lines(year, month, true)?.join("\n"))
}

pub fn render_year(year: i32) -> Result<String, CommandError> {
    let mut out = vec![format!("{:^width$}", year, width = WIDTH)
        .trim_end()
        .to_string()];
    for month in 1..=12 {
        out.push(String::new());
        out.extend(month_lines(year, month, false)?);
    }
    Ok(out.join("\n"))
}
