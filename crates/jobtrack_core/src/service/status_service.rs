//! Status engine: records interactions and maintains company flags.
//!
//! # Responsibility
//! - Create companies and their events; events are never created by any
//!   other path.
//! - Keep company `responded`/`rejected` flags consistent with recorded
//!   events.
//!
//! # Invariants
//! - Company flags are monotonic here; nothing resets them to false.
//! - A rejection event is never scheduled, whatever the caller answered.
//! - `record_rejection` unschedules every scheduled event of the company.
//! - `mark_unscheduled` touches only the one event; it deliberately does
//!   not cascade or change company flags (asymmetric with rejection).

use crate::model::company::Company;
use crate::model::event::{Event, EventId};
use crate::repo::company_repo::CompanyRepository;
use crate::repo::event_repo::{EventRecord, EventRepository};
use crate::repo::{RepoError, RepoResult};
use log::info;

/// Already-collected interactive answers for recording an event.
///
/// The shell collects these; the engine stays free of prompt I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventAnswers {
    pub content: String,
    pub is_response: bool,
    pub is_rejection: bool,
    /// Ignored when `is_rejection` is true.
    pub is_scheduled: bool,
}

/// Use-case service for status transitions.
pub struct StatusService<C: CompanyRepository, E: EventRepository> {
    companies: C,
    events: E,
}

impl<C: CompanyRepository, E: EventRepository> StatusService<C, E> {
    pub fn new(companies: C, events: E) -> Self {
        Self { companies, events }
    }

    /// Creates a new company with clear flags.
    pub fn add_company(&self, name: &str) -> RepoResult<Company> {
        let company = Company::new(name);
        self.companies.create(&company)?;
        info!("event=add_company module=status status=ok id={}", company.id);
        Ok(company)
    }

    /// Records one event against the named company and updates flags.
    ///
    /// # Contract
    /// - `CompanyNotFound` when no company matches the name exactly.
    /// - Validation failure on empty content, before any flag mutation.
    /// - A response answer sets `responded = true` on the company.
    /// - A rejection answer sets `rejected = true` and forces the event's
    ///   `is_scheduled` to false.
    pub fn record_event(&self, company_name: &str, answers: &EventAnswers) -> RepoResult<EventRecord> {
        let company = self.require_company(company_name)?;

        let mut event = Event::new(company.id, answers.content.clone());
        event.validate()?;

        if answers.is_response {
            event.is_response = true;
            self.companies.mark_responded(company.id)?;
        }
        event.is_scheduled = if answers.is_rejection {
            self.companies.mark_rejected(company.id)?;
            false
        } else {
            answers.is_scheduled
        };

        self.events.create(&event)?;
        info!(
            "event=record_event module=status status=ok company={} response={} scheduled={}",
            company.id, event.is_response, event.is_scheduled
        );
        Ok(EventRecord {
            event,
            company_name: company.name,
        })
    }

    /// Records a rejection: fixed-content event, cascade unschedule, flag.
    pub fn record_rejection(&self, company_name: &str) -> RepoResult<EventRecord> {
        let company = self.require_company(company_name)?;

        let event = Event::new(company.id, "rejected");
        self.events.create(&event)?;
        let unscheduled = self.events.unschedule_all(company.id)?;
        self.companies.mark_rejected(company.id)?;
        info!(
            "event=record_rejection module=status status=ok company={} unscheduled={unscheduled}",
            company.id
        );
        Ok(EventRecord {
            event,
            company_name: company.name,
        })
    }

    /// Marks one event as a future appointment.
    pub fn mark_scheduled(&self, id: EventId) -> RepoResult<()> {
        self.events.set_scheduled(id, true)
    }

    /// Clears the scheduled flag on one event (e.g. after it has passed).
    pub fn mark_unscheduled(&self, id: EventId) -> RepoResult<()> {
        self.events.set_scheduled(id, false)
    }

    fn require_company(&self, name: &str) -> RepoResult<Company> {
        self.companies
            .find_by_name(name)?
            .ok_or_else(|| RepoError::CompanyNotFound(name.to_string()))
    }
}
