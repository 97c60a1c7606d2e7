//! Discovery of the season, year and month values present in a forest.
//!
//! Option lists are sorted with a three-tier policy applied to the whole list:
//!
//! 1. every value looks like `YYYY-M` / `YYYY-MM` with a valid month:
//!    chronological order;
//! 2. otherwise every value parses as a finite number: numeric order;
//! 3. otherwise lexicographic order ignoring case, ties broken by the raw
//!    bytes so the order stays total.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};

use crate::currency::month_name;
use crate::domain::{PeriodDimension, RecordNode};

/// Sorted, deduplicated period values per dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeriodIndex {
    pub seasons: Vec<String>,
    pub years: Vec<String>,
    pub months: Vec<String>,
}

impl PeriodIndex {
    pub fn build(forest: &[RecordNode]) -> Self {
        let mut seasons = BTreeSet::new();
        let mut years = BTreeSet::new();
        let mut months = BTreeSet::new();

        for node in forest {
            node.for_each_leaf(&mut |leaf| {
                let Some(period) = leaf.period.as_ref() else {
                    return;
                };
                for (field, bag) in [
                    (&period.season, &mut seasons),
                    (&period.year, &mut years),
                    (&period.month, &mut months),
                ] {
                    if let Some(value) = field {
                        bag.extend(value.values().iter().cloned());
                    }
                }
            });
        }

        Self {
            seasons: sort_period_values(seasons.into_iter().collect()),
            years: sort_period_values(years.into_iter().collect()),
            months: sort_period_values(months.into_iter().collect()),
        }
    }

    pub fn options(&self, dimension: PeriodDimension) -> &[String] {
        match dimension {
            PeriodDimension::Season => &self.seasons,
            PeriodDimension::Year => &self.years,
            PeriodDimension::Month => &self.months,
        }
    }

    /// First dimension with any discovered value, preferring season, then year,
    /// then month.
    pub fn first_available(&self) -> Option<PeriodDimension> {
        PeriodDimension::ALL
            .into_iter()
            .find(|dimension| !self.options(*dimension).is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.seasons.is_empty() && self.years.is_empty() && self.months.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SortTier {
    Chronological,
    Numeric,
    Lexicographic,
}

fn tier_for(values: &[String]) -> SortTier {
    if values.iter().all(|value| parse_year_month(value).is_some()) {
        SortTier::Chronological
    } else if values.iter().all(|value| parse_number(value).is_some()) {
        SortTier::Numeric
    } else {
        SortTier::Lexicographic
    }
}

/// Sorts period values using the list-level three-tier policy.
pub fn sort_period_values(mut values: Vec<String>) -> Vec<String> {
    match tier_for(&values) {
        SortTier::Chronological => values.sort_by_key(|value| parse_year_month(value)),
        SortTier::Numeric => values.sort_by(|a, b| {
            let (a, b) = (parse_number(a), parse_number(b));
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }),
        SortTier::Lexicographic => values.sort_by(|a, b| {
            a.to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b))
        }),
    }
    values
}

/// Parses `YYYY-M` or `YYYY-MM` into the first day of that month.
pub fn parse_year_month(value: &str) -> Option<NaiveDate> {
    let (year, month) = value.split_once('-')?;
    let well_formed = year.len() == 4
        && (1..=2).contains(&month.len())
        && year.bytes().all(|b| b.is_ascii_digit())
        && month.bytes().all(|b| b.is_ascii_digit());
    if !well_formed {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)
}

fn parse_number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Human label for a period option.
///
/// Month values shaped `YYYY-M` read as `março de 2025`, bare month numbers as
/// the month name. Everything else is shown verbatim.
pub fn option_label(dimension: PeriodDimension, value: &str) -> String {
    if dimension != PeriodDimension::Month {
        return value.to_string();
    }
    if let Some(date) = parse_year_month(value) {
        if let Some(name) = month_name(date.month()) {
            return format!("{name} de {}", date.year());
        }
    }
    if let Some(name) = value.trim().parse::<u32>().ok().and_then(month_name) {
        return name.to_string();
    }
    value.to_string()
}
