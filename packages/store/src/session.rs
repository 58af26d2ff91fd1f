//! # Tab session: which tabs are loaded, and whether they are still fresh
//!
//! Each tab moves `NotLoaded → Loading → Loaded` independently. A loaded tab is
//! served from memory on re-activation, so the remote fetch happens at most once
//! per tab per generation.
//!
//! The employee record carries a monotonic `generation` counter. A successful save
//! bumps it and stamps the affected tabs with the new value; a tab whose load
//! generation is older than its stamp is stale and is fetched again on its next
//! activation. [`InvalidationPolicy`] decides which tabs get stamped.

use serde::{Deserialize, Serialize};

use crate::error::FetchError;
use crate::models::{EmployeeId, RecordIdentity, Tab};

/// Which tabs a successful save marks stale.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InvalidationPolicy {
    /// Only the tab that was saved.
    #[default]
    ActiveTab,
    /// Every tab, for servers that recompute across tabs.
    AllTabs,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadState {
    NotLoaded,
    Loading { generation: u64 },
    Loaded { generation: u64 },
}

/// A fetch the caller must perform, then hand back to
/// [`TabSession::complete`] or [`TabSession::fail`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchTicket {
    pub employee_id: EmployeeId,
    pub tab: Tab,
    pub generation: u64,
    /// Session the ticket was issued by.
    pub epoch: u64,
}

impl FetchTicket {
    pub fn identity(&self) -> RecordIdentity {
        RecordIdentity {
            employee_id: self.employee_id,
            generation: self.generation,
        }
    }
}

/// Outcome of activating a tab.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Activation {
    /// Data must be fetched.
    Fetch(FetchTicket),
    /// A fetch for this tab is already in flight.
    Pending,
    /// Fresh data is already in memory.
    Cached,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TabSession {
    employee_id: EmployeeId,
    epoch: u64,
    generation: u64,
    policy: InvalidationPolicy,
    active: Tab,
    states: [LoadState; 6],
    stale_before: [u64; 6],
}

impl TabSession {
    pub fn new(employee_id: EmployeeId, policy: InvalidationPolicy) -> Self {
        Self {
            employee_id,
            epoch: 0,
            generation: 0,
            policy,
            active: Tab::Basic,
            states: [LoadState::NotLoaded; 6],
            stale_before: [0; 6],
        }
    }

    /// Stamp the session with an epoch. Tickets from other epochs are never
    /// accepted, even for the same employee.
    pub fn with_epoch(mut self, epoch: u64) -> Self {
        self.epoch = epoch;
        self
    }

    pub fn employee_id(&self) -> EmployeeId {
        self.employee_id
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn policy(&self) -> InvalidationPolicy {
        self.policy
    }

    pub fn active_tab(&self) -> Tab {
        self.active
    }

    pub fn state(&self, tab: Tab) -> LoadState {
        self.states[tab.index()]
    }

    /// Loaded at a generation no older than the tab's last invalidation.
    pub fn is_fresh(&self, tab: Tab) -> bool {
        matches!(
            self.state(tab),
            LoadState::Loaded { generation } if generation >= self.stale_before[tab.index()]
        )
    }

    pub fn is_loading(&self, tab: Tab) -> bool {
        matches!(self.state(tab), LoadState::Loading { .. })
    }

    /// Make `tab` the active tab and decide whether it needs a fetch.
    pub fn activate(&mut self, tab: Tab) -> Activation {
        self.active = tab;
        match self.state(tab) {
            LoadState::Loading { .. } => Activation::Pending,
            LoadState::Loaded { .. } if self.is_fresh(tab) => Activation::Cached,
            LoadState::Loaded { .. } | LoadState::NotLoaded => {
                self.states[tab.index()] = LoadState::Loading {
                    generation: self.generation,
                };
                tracing::debug!(
                    employee_id = self.employee_id,
                    tab = %tab,
                    generation = self.generation,
                    "loading tab"
                );
                Activation::Fetch(FetchTicket {
                    employee_id: self.employee_id,
                    tab,
                    generation: self.generation,
                    epoch: self.epoch,
                })
            }
        }
    }

    /// Record a finished fetch. Returns `false` for tickets that no longer match
    /// the in-flight load, whose data must then be ignored.
    pub fn complete(&mut self, ticket: &FetchTicket) -> bool {
        if !self.owns(ticket) {
            return false;
        }
        self.states[ticket.tab.index()] = LoadState::Loaded {
            generation: ticket.generation,
        };
        true
    }

    /// Record a failed fetch. The tab goes back to `NotLoaded`; no retry is
    /// scheduled.
    pub fn fail(&mut self, ticket: &FetchTicket, error: &FetchError) {
        tracing::warn!(
            employee_id = self.employee_id,
            tab = %ticket.tab,
            error = %error,
            "tab load failed"
        );
        if self.owns(ticket) {
            self.states[ticket.tab.index()] = LoadState::NotLoaded;
        }
    }

    /// Bump the generation after a successful save of `saved` and mark the
    /// tabs selected by the policy stale.
    pub fn invalidate_after_save(&mut self, saved: Tab) {
        self.generation += 1;
        match self.policy {
            InvalidationPolicy::ActiveTab => {
                self.stale_before[saved.index()] = self.generation;
            }
            InvalidationPolicy::AllTabs => {
                self.stale_before = [self.generation; 6];
            }
        }
    }

    fn owns(&self, ticket: &FetchTicket) -> bool {
        ticket.employee_id == self.employee_id
            && ticket.epoch == self.epoch
            && self.state(ticket.tab)
                == LoadState::Loading {
                    generation: ticket.generation,
                }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;

    fn fetch(session: &mut TabSession, tab: Tab) -> FetchTicket {
        match session.activate(tab) {
            Activation::Fetch(ticket) => ticket,
            other => panic!("expected fetch for {tab}, got {other:?}"),
        }
    }

    #[test]
    fn test_second_activation_is_cached() {
        let mut session = TabSession::new(1, InvalidationPolicy::ActiveTab);
        let ticket = fetch(&mut session, Tab::Basic);
        assert_eq!(session.activate(Tab::Basic), Activation::Pending);
        assert!(session.complete(&ticket));
        assert_eq!(session.activate(Tab::Basic), Activation::Cached);
        assert_eq!(session.activate(Tab::Basic), Activation::Cached);
        assert!(session.is_fresh(Tab::Basic));
    }

    #[test]
    fn test_tabs_are_independent() {
        let mut session = TabSession::new(1, InvalidationPolicy::ActiveTab);
        let basic = fetch(&mut session, Tab::Basic);
        session.complete(&basic);
        let salary = fetch(&mut session, Tab::Salary);
        assert_eq!(session.active_tab(), Tab::Salary);
        assert!(session.is_loading(Tab::Salary));
        assert!(session.is_fresh(Tab::Basic));
        assert_eq!(session.state(Tab::Leave), LoadState::NotLoaded);
        session.complete(&salary);
    }

    #[test]
    fn test_failed_fetch_leaves_tab_unloaded() {
        let mut session = TabSession::new(1, InvalidationPolicy::ActiveTab);
        let ticket = fetch(&mut session, Tab::Address);
        let error = FetchError {
            tab: Tab::Address,
            source: StoreError::Network("offline".to_string()),
        };
        session.fail(&ticket, &error);
        assert_eq!(session.state(Tab::Address), LoadState::NotLoaded);
        // Next activation tries again.
        assert!(matches!(session.activate(Tab::Address), Activation::Fetch(_)));
    }

    #[test]
    fn test_save_invalidates_only_saved_tab() {
        let mut session = TabSession::new(1, InvalidationPolicy::ActiveTab);
        for tab in [Tab::Basic, Tab::Salary] {
            let ticket = fetch(&mut session, tab);
            session.complete(&ticket);
        }
        session.invalidate_after_save(Tab::Salary);
        assert_eq!(session.generation(), 1);
        assert!(session.is_fresh(Tab::Basic));
        assert!(!session.is_fresh(Tab::Salary));
        let refetch = fetch(&mut session, Tab::Salary);
        assert_eq!(refetch.generation, 1);
        session.complete(&refetch);
        assert!(session.is_fresh(Tab::Salary));
        assert_eq!(session.activate(Tab::Basic), Activation::Cached);
    }

    #[test]
    fn test_all_tabs_policy() {
        let mut session = TabSession::new(1, InvalidationPolicy::AllTabs);
        for tab in [Tab::Basic, Tab::Leave] {
            let ticket = fetch(&mut session, tab);
            session.complete(&ticket);
        }
        session.invalidate_after_save(Tab::Salary);
        assert!(!session.is_fresh(Tab::Basic));
        assert!(!session.is_fresh(Tab::Leave));
    }

    #[test]
    fn test_fetch_started_before_save_is_stale_on_arrival() {
        let mut session = TabSession::new(1, InvalidationPolicy::AllTabs);
        let ticket = fetch(&mut session, Tab::Leave);
        session.invalidate_after_save(Tab::Basic);
        assert!(session.complete(&ticket));
        assert!(!session.is_fresh(Tab::Leave));
        assert!(matches!(session.activate(Tab::Leave), Activation::Fetch(_)));
    }

    #[test]
    fn test_foreign_ticket_is_ignored() {
        let mut session = TabSession::new(1, InvalidationPolicy::ActiveTab);
        let mut ticket = fetch(&mut session, Tab::Basic);
        ticket.employee_id = 2;
        assert!(!session.complete(&ticket));
        assert!(session.is_loading(Tab::Basic));
    }

    #[test]
    fn test_ticket_from_earlier_epoch_is_ignored() {
        let mut first = TabSession::new(1, InvalidationPolicy::ActiveTab);
        let late = fetch(&mut first, Tab::Basic);
        let mut reopened = TabSession::new(1, InvalidationPolicy::ActiveTab).with_epoch(first.epoch() + 1);
        let current = fetch(&mut reopened, Tab::Basic);
        assert_eq!((late.employee_id, late.generation), (current.employee_id, current.generation));
        assert!(!reopened.complete(&late));
        assert!(reopened.is_loading(Tab::Basic));
        assert!(reopened.complete(&current));
    }
}
