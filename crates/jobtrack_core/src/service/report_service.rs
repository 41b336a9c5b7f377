//! Query and reporting engine.
//!
//! # Responsibility
//! - Filtered listings over companies and events.
//! - Counts and percentage statistics over the company population.
//!
//! # Invariants
//! - Listings are ordered by `updated_at` ascending (oldest-modified
//!   first).
//! - Percentages are rounded to two decimals, trailing zeros trimmed to
//!   one decimal place, rendered with a `%` suffix.
//! - Zero-denominator percentages report `0.0%` rather than an undefined
//!   numeric value.

use crate::model::company::Company;
use crate::model::now_epoch_ms;
use crate::repo::company_repo::{CompanyFilter, CompanyRepository};
use crate::repo::event_repo::{EventFilter, EventRecord, EventRepository};
use crate::repo::{RepoError, RepoResult};

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Use-case service for listings, counts, and percentage reports.
pub struct ReportService<C: CompanyRepository, E: EventRepository> {
    companies: C,
    events: E,
}

impl<C: CompanyRepository, E: EventRepository> ReportService<C, E> {
    pub fn new(companies: C, events: E) -> Self {
        Self { companies, events }
    }

    /// Case-insensitive substring search; empty fragment lists all.
    pub fn find(&self, fragment: &str) -> RepoResult<Vec<Company>> {
        self.companies.search(fragment)
    }

    pub fn rejected(&self) -> RepoResult<Vec<Company>> {
        self.companies.list(CompanyFilter {
            rejected: Some(true),
            ..CompanyFilter::default()
        })
    }

    pub fn non_rejected(&self) -> RepoResult<Vec<Company>> {
        self.companies.list(CompanyFilter {
            rejected: Some(false),
            ..CompanyFilter::default()
        })
    }

    pub fn responded(&self) -> RepoResult<Vec<Company>> {
        self.companies.list(CompanyFilter {
            responded: Some(true),
            ..CompanyFilter::default()
        })
    }

    pub fn non_responded(&self) -> RepoResult<Vec<Company>> {
        self.companies.list(CompanyFilter {
            responded: Some(false),
            ..CompanyFilter::default()
        })
    }

    /// Companies that responded and have not (yet) rejected.
    pub fn responded_non_rejected(&self) -> RepoResult<Vec<Company>> {
        self.companies.list(CompanyFilter {
            rejected: Some(false),
            responded: Some(true),
        })
    }

    /// All events of the named company, `CompanyNotFound` when missing.
    pub fn company_events(&self, company_name: &str) -> RepoResult<Vec<EventRecord>> {
        let company = self
            .companies
            .find_by_name(company_name)?
            .ok_or_else(|| RepoError::CompanyNotFound(company_name.to_string()))?;
        let events = self.events.list_for_company(company.id)?;
        Ok(events
            .into_iter()
            .map(|event| EventRecord {
                event,
                company_name: company.name.clone(),
            })
            .collect())
    }

    /// Events flagged as responses, across all companies.
    pub fn responses(&self) -> RepoResult<Vec<EventRecord>> {
        self.events.list(EventFilter {
            is_response: Some(true),
            ..EventFilter::default()
        })
    }

    /// Events flagged as future appointments, across all companies.
    pub fn scheduled(&self) -> RepoResult<Vec<EventRecord>> {
        self.events.list(EventFilter {
            is_scheduled: Some(true),
            ..EventFilter::default()
        })
    }

    /// Total number of companies contacted.
    pub fn applied_count(&self) -> RepoResult<i64> {
        self.companies.count(CompanyFilter::default())
    }

    /// Companies created within the trailing 24 hours of now.
    pub fn last_day_applied_count(&self) -> RepoResult<i64> {
        self.last_day_applied_count_at(now_epoch_ms())
    }

    /// Trailing-24h count against a fixed reference instant.
    pub fn last_day_applied_count_at(&self, now_ms: i64) -> RepoResult<i64> {
        self.companies.count_created_between(now_ms - DAY_MS, now_ms)
    }

    /// Share of companies with `responded = true`, e.g. `"50.0%"`.
    pub fn responded_percentage(&self) -> RepoResult<String> {
        let responded = self.count_flagged(CompanyFilter {
            responded: Some(true),
            ..CompanyFilter::default()
        })?;
        let total = self.applied_count()?;
        Ok(format_percentage(responded, total))
    }

    /// Share of companies with `rejected = true`.
    pub fn rejected_percentage(&self) -> RepoResult<String> {
        let rejected = self.count_flagged(CompanyFilter {
            rejected: Some(true),
            ..CompanyFilter::default()
        })?;
        let total = self.applied_count()?;
        Ok(format_percentage(rejected, total))
    }

    /// Rejections as a share of companies that responded or rejected.
    pub fn responded_rejected_percentage(&self) -> RepoResult<String> {
        let rejected = self.count_flagged(CompanyFilter {
            rejected: Some(true),
            ..CompanyFilter::default()
        })?;
        let responded = self.count_flagged(CompanyFilter {
            responded: Some(true),
            ..CompanyFilter::default()
        })?;
        Ok(format_percentage(rejected, responded + rejected))
    }

    fn count_flagged(&self, filter: CompanyFilter) -> RepoResult<i64> {
        self.companies.count(filter)
    }
}

/// Formats `numerator / denominator` as a percentage string.
///
/// Rounds to two decimals, then trims trailing zeros down to one decimal
/// place: `50.0%`, `33.33%`, `12.5%`. A zero denominator reports `0.0%`.
pub fn format_percentage(numerator: i64, denominator: i64) -> String {
    if denominator == 0 {
        return "0.0%".to_string();
    }
    let value = (numerator as f64 / denominator as f64) * 100.0;
    let rounded = (value * 100.0).round() / 100.0;
    let mut text = format!("{rounded:.2}");
    while text.ends_with('0') && !text.ends_with(".0") {
        text.pop();
    }
    format!("{text}%")
}

#[cfg(test)]
mod tests {
    use super::format_percentage;

    #[test]
    fn whole_values_keep_one_decimal() {
        assert_eq!(format_percentage(1, 2), "50.0%");
        assert_eq!(format_percentage(2, 2), "100.0%");
        assert_eq!(format_percentage(0, 2), "0.0%");
    }

    #[test]
    fn fractional_values_round_to_two_decimals() {
        assert_eq!(format_percentage(1, 3), "33.33%");
        assert_eq!(format_percentage(2, 3), "66.67%");
        assert_eq!(format_percentage(1, 8), "12.5%");
    }

    #[test]
    fn zero_denominator_reports_zero() {
        assert_eq!(format_percentage(0, 0), "0.0%");
        assert_eq!(format_percentage(5, 0), "0.0%");
    }
}
