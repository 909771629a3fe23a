//! Data access behind a trait so the dashboard never fakes backend work.
//!
//! [`DataGateway`] methods return boxed futures, which the dashboard wraps
//! in [`Command::perform`](prospect_core::Command::perform). [`MockGateway`]
//! serves generated records from memory after a configurable delay.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::records::{Company, Person};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GatewayError {
    #[error("no record with id {0}")]
    NotFound(u64),
    #[error("request rejected: {0}")]
    Rejected(String),
    #[error("backend unavailable")]
    Unavailable,
}

/// Outcome of a tracking check for a company domain.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackingReport {
    pub domain: String,
    pub installed: bool,
    pub events_last_day: u32,
}

pub trait DataGateway: Send + Sync {
    fn fetch_people(&self) -> BoxFuture<'static, Result<Vec<Person>, GatewayError>>;

    fn fetch_companies(&self) -> BoxFuture<'static, Result<Vec<Company>, GatewayError>>;

    /// Store an edited person and return the stored copy.
    fn save_person(&self, person: Person) -> BoxFuture<'static, Result<Person, GatewayError>>;

    /// Check whether the tracking snippet is live on `domain`.
    fn test_tracking(&self, domain: String)
        -> BoxFuture<'static, Result<TrackingReport, GatewayError>>;
}

/// In-memory gateway with an artificial response delay.
#[derive(Clone)]
pub struct MockGateway {
    people: Arc<Mutex<HashMap<u64, Person>>>,
    order: Arc<Vec<u64>>,
    companies: Arc<Vec<Company>>,
    latency: Duration,
    offline: bool,
}

impl MockGateway {
    pub fn new(people: Vec<Person>, companies: Vec<Company>) -> Self {
        let order = people.iter().map(|p| p.id).collect();
        let people = people.into_iter().map(|p| (p.id, p)).collect();
        Self {
            people: Arc::new(Mutex::new(people)),
            order: Arc::new(order),
            companies: Arc::new(companies),
            latency: Duration::ZERO,
            offline: false,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Every call fails with [`GatewayError::Unavailable`].
    pub fn offline(mut self) -> Self {
        self.offline = true;
        self
    }

    fn guard(&self) -> Result<(), GatewayError> {
        if self.offline {
            Err(GatewayError::Unavailable)
        } else {
            Ok(())
        }
    }

    async fn delay(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    async fn load_people(self) -> Result<Vec<Person>, GatewayError> {
        self.delay().await;
        self.guard()?;
        let people = self.people.lock().await;
        let rows: Vec<Person> = self
            .order
            .iter()
            .filter_map(|id| people.get(id).cloned())
            .collect();
        info!(count = rows.len(), "fetched people");
        Ok(rows)
    }

    async fn load_companies(self) -> Result<Vec<Company>, GatewayError> {
        self.delay().await;
        self.guard()?;
        info!(count = self.companies.len(), "fetched companies");
        Ok(self.companies.as_ref().clone())
    }

    async fn store_person(self, person: Person) -> Result<Person, GatewayError> {
        self.delay().await;
        self.guard()?;
        if person.name.trim().is_empty() {
            return Err(GatewayError::Rejected("name is required".into()));
        }
        let mut people = self.people.lock().await;
        let slot = people
            .get_mut(&person.id)
            .ok_or(GatewayError::NotFound(person.id))?;
        *slot = person.clone();
        debug!(id = person.id, "saved person");
        Ok(person)
    }

    async fn check_tracking(self, domain: String) -> Result<TrackingReport, GatewayError> {
        self.delay().await;
        self.guard()?;
        let domain = domain.trim().to_ascii_lowercase();
        if domain.is_empty() || !domain.contains('.') {
            return Err(GatewayError::Rejected(format!("invalid domain {domain:?}")));
        }
        // Canned answer, stable per domain.
        let events = domain.bytes().map(u32::from).sum::<u32>() % 500;
        debug!(%domain, events, "tracking checked");
        Ok(TrackingReport {
            domain,
            installed: true,
            events_last_day: events,
        })
    }
}

impl DataGateway for MockGateway {
    fn fetch_people(&self) -> BoxFuture<'static, Result<Vec<Person>, GatewayError>> {
        self.clone().load_people().boxed()
    }

    fn fetch_companies(&self) -> BoxFuture<'static, Result<Vec<Company>, GatewayError>> {
        self.clone().load_companies().boxed()
    }

    fn save_person(&self, person: Person) -> BoxFuture<'static, Result<Person, GatewayError>> {
        self.clone().store_person(person).boxed()
    }

    fn test_tracking(
        &self,
        domain: String,
    ) -> BoxFuture<'static, Result<TrackingReport, GatewayError>> {
        self.clone().check_tracking(domain).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records;

    fn gateway() -> MockGateway {
        MockGateway::new(records::people(10), records::companies(5))
    }

    #[tokio::test]
    async fn fetch_keeps_source_order() {
        let gw = gateway();
        let people = gw.fetch_people().await.unwrap();
        assert_eq!(people, records::people(10));
        assert_eq!(gw.fetch_companies().await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn save_updates_stored_copy() {
        let gw = gateway();
        let mut ada = records::people(1).remove(0);
        ada.title = "CEO".into();
        let saved = gw.save_person(ada.clone()).await.unwrap();
        assert_eq!(saved, ada);
        let people = gw.fetch_people().await.unwrap();
        assert_eq!(people[0].title, "CEO");
    }

    #[tokio::test]
    async fn save_unknown_or_blank_fails() {
        let gw = gateway();
        let mut ghost = records::people(1).remove(0);
        ghost.id = 999;
        assert_eq!(
            gw.save_person(ghost.clone()).await,
            Err(GatewayError::NotFound(999))
        );
        ghost.id = 1;
        ghost.name = "  ".into();
        assert!(matches!(
            gw.save_person(ghost).await,
            Err(GatewayError::Rejected(_))
        ));
    }

    #[tokio::test]
    async fn tracking_is_canned_per_domain() {
        let gw = gateway();
        let a = gw.test_tracking("Acme.com".into()).await.unwrap();
        let b = gw.test_tracking("acme.com".into()).await.unwrap();
        assert_eq!(a, b);
        assert!(a.installed);
        assert!(gw.test_tracking("nodot".into()).await.is_err());
    }

    #[tokio::test]
    async fn offline_fails_everything() {
        let gw = gateway().offline();
        assert_eq!(gw.fetch_people().await, Err(GatewayError::Unavailable));
        assert_eq!(
            gw.test_tracking("acme.com".into()).await,
            Err(GatewayError::Unavailable)
        );
    }

    #[tokio::test]
    async fn latency_delays_response() {
        let gw = gateway().with_latency(Duration::from_millis(20));
        let start = std::time::Instant::now();
        gw.fetch_companies().await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(20));
    }
}
