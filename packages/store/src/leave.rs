//! # Leave balances: additive delta protocol
//!
//! The leave tab never sends absolute balances. Each `+`/`-` click accumulates in a
//! row's `addon`/`subtract` counters, and saving sends one [`LeaveDelta`] per row. The
//! server applies `remaining += add; remaining -= subtract`, so edits from two
//! sessions compose instead of overwriting each other.
//!
//! Only one row carries a delta at a time: touching a different row zeroes every
//! other row's counters (see [`LeaveForm::increment`]).
//!
//! [`from_api_to_form`] is the read-side view: it buckets rows into the fixed
//! [`LeaveKey`] categories by matching the type label.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::LeaveBalance;

/// One entry of the leave update payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveDelta {
    pub id: u64,
    pub leave_balance_to_add: u32,
    pub leave_balance_to_subtract: u32,
}

impl LeaveDelta {
    pub fn net(&self) -> i64 {
        i64::from(self.leave_balance_to_add) - i64::from(self.leave_balance_to_subtract)
    }

    /// Apply this delta the way the server does.
    pub fn apply(&self, balance: &mut LeaveBalance) {
        balance.remaining += f64::from(self.leave_balance_to_add);
        balance.remaining -= f64::from(self.leave_balance_to_subtract);
    }
}

/// Map every row to its delta, positionally.
pub fn to_delta_payload(rows: &[LeaveBalance]) -> Vec<LeaveDelta> {
    rows.iter()
        .map(|row| LeaveDelta {
            id: row.id,
            leave_balance_to_add: row.addon,
            leave_balance_to_subtract: row.subtract,
        })
        .collect()
}

/// Leave categories shown on the summary, in matching order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveKey {
    Sick,
    Casual,
    Earned,
    Paternity,
    Sabbatical,
    LossOfPay,
}

impl LeaveKey {
    pub const ALL: [LeaveKey; 6] = [
        LeaveKey::Sick,
        LeaveKey::Casual,
        LeaveKey::Earned,
        LeaveKey::Paternity,
        LeaveKey::Sabbatical,
        LeaveKey::LossOfPay,
    ];

    fn patterns(self) -> &'static [&'static str] {
        match self {
            LeaveKey::Sick => &["sick"],
            LeaveKey::Casual => &["casual"],
            LeaveKey::Earned => &["earned"],
            LeaveKey::Paternity => &["paternity"],
            LeaveKey::Sabbatical => &["sabbatical"],
            LeaveKey::LossOfPay => &["lop", "without"],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LeaveKey::Sick => "Sick Leave",
            LeaveKey::Casual => "Casual Leave",
            LeaveKey::Earned => "Earned Leave",
            LeaveKey::Paternity => "Paternity Leave",
            LeaveKey::Sabbatical => "Sabbatical",
            LeaveKey::LossOfPay => "Leave Without Pay",
        }
    }

    /// Classify a leave type label; the first matching category wins.
    pub fn classify(label: &str) -> Option<LeaveKey> {
        let label = label.to_lowercase();
        LeaveKey::ALL
            .into_iter()
            .find(|key| key.patterns().iter().any(|p| label.contains(p)))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LeaveSummary {
    pub id: u64,
    pub available: f64,
    pub booked: f64,
    pub total: f64,
}

/// Bucket API rows by category. Rows matching no category are dropped; when two
/// rows land in the same category the later one wins.
pub fn from_api_to_form(rows: &[LeaveBalance]) -> BTreeMap<LeaveKey, LeaveSummary> {
    rows.iter()
        .filter_map(|row| {
            LeaveKey::classify(&row.leave_type).map(|key| {
                (
                    key,
                    LeaveSummary {
                        id: row.id,
                        available: row.remaining,
                        booked: row.used,
                        total: row.total_count,
                    },
                )
            })
        })
        .collect()
}

/// Editing state of the leave tab.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LeaveForm {
    rows: Vec<LeaveBalance>,
    active_row: Option<u64>,
    errors: BTreeMap<u64, String>,
}

impl LeaveForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the rows with freshly loaded balances; pending deltas are dropped.
    pub fn load(&mut self, rows: Vec<LeaveBalance>) {
        self.rows = rows
            .into_iter()
            .map(|row| LeaveBalance {
                addon: 0,
                subtract: 0,
                ..row
            })
            .collect();
        self.active_row = None;
        self.errors.clear();
    }

    pub fn rows(&self) -> &[LeaveBalance] {
        &self.rows
    }

    pub fn row(&self, id: u64) -> Option<&LeaveBalance> {
        self.rows.iter().find(|r| r.id == id)
    }

    pub fn active_row(&self) -> Option<u64> {
        self.active_row
    }

    pub fn error(&self, id: u64) -> Option<&str> {
        self.errors.get(&id).map(String::as_str)
    }

    pub fn has_changes(&self) -> bool {
        self.rows.iter().any(LeaveBalance::has_delta)
    }

    pub fn summary(&self) -> BTreeMap<LeaveKey, LeaveSummary> {
        from_api_to_form(&self.rows)
    }

    /// Add one day to a row. Returns `false` if the row does not exist.
    pub fn increment(&mut self, id: u64) -> bool {
        if !self.focus(id) {
            return false;
        }
        let Some(row) = self.rows.iter_mut().find(|r| r.id == id) else {
            return false;
        };
        if row.subtract > 0 {
            row.subtract -= 1;
        } else {
            row.addon += 1;
        }
        self.errors.remove(&id);
        true
    }

    /// Take one day from a row. Refuses (returns `false`) when the projected
    /// remaining balance would go below zero or the row does not exist.
    pub fn decrement(&mut self, id: u64) -> bool {
        if !self.can_decrement(id) || !self.focus(id) {
            return false;
        }
        let Some(row) = self.rows.iter_mut().find(|r| r.id == id) else {
            return false;
        };
        if row.addon > 0 {
            row.addon -= 1;
        } else {
            row.subtract += 1;
        }
        self.errors.remove(&id);
        true
    }

    /// Whether [`decrement`](Self::decrement) would be accepted for `id`.
    pub fn can_decrement(&self, id: u64) -> bool {
        self.row(id)
            .is_some_and(|row| row.addon > 0 || row.projected_remaining() >= 1.0)
    }

    /// Make `id` the active row, zeroing every other row's pending delta.
    fn focus(&mut self, id: u64) -> bool {
        if !self.rows.iter().any(|r| r.id == id) {
            return false;
        }
        if self.active_row != Some(id) {
            for row in self.rows.iter_mut().filter(|r| r.id != id) {
                row.addon = 0;
                row.subtract = 0;
            }
            self.active_row = Some(id);
        }
        true
    }

    /// Reject any row whose projected balance is negative.
    pub fn validate(&mut self) -> bool {
        self.errors = self
            .rows
            .iter()
            .filter(|row| row.projected_remaining() < 0.0)
            .map(|row| {
                (
                    row.id,
                    format!("{} cannot go below zero", row.leave_type),
                )
            })
            .collect();
        self.errors.is_empty()
    }

    pub fn payload(&self) -> Vec<LeaveDelta> {
        to_delta_payload(&self.rows)
    }

    /// Drop pending deltas and errors, keeping the loaded balances.
    pub fn reset(&mut self) {
        self.clear_deltas();
        self.errors.clear();
    }

    /// Drop pending deltas after a successful save.
    pub fn clear_deltas(&mut self) {
        for row in &mut self.rows {
            row.addon = 0;
            row.subtract = 0;
        }
        self.active_row = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<LeaveBalance> {
        vec![
            LeaveBalance::new(1, "Sick Leave", 12.0, 10.0, 2.0),
            LeaveBalance::new(2, "CASUAL", 8.0, 8.0, 0.0),
            LeaveBalance::new(3, "Earned Leave", 15.0, 1.0, 14.0),
        ]
    }

    #[test]
    fn test_delta_payload_entry() {
        let mut row = LeaveBalance::new(7, "Sick Leave", 10.0, 10.0, 0.0);
        row.addon = 2;
        row.subtract = 0;
        assert_eq!(
            to_delta_payload(&[row]),
            vec![LeaveDelta {
                id: 7,
                leave_balance_to_add: 2,
                leave_balance_to_subtract: 0
            }]
        );
    }

    #[test]
    fn test_delta_payload_is_positional_and_total() {
        let payload = to_delta_payload(&rows());
        assert_eq!(payload.iter().map(|d| d.id).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(payload.iter().all(|d| d.net() == 0));
        assert!(to_delta_payload(&[]).is_empty());
    }

    #[test]
    fn test_plus_then_minus_nets_to_zero() {
        let mut form = LeaveForm::new();
        form.load(rows());
        assert!(form.increment(1));
        assert!(form.decrement(1));
        let delta = &form.payload()[0];
        assert_eq!(delta.net(), 0);
        assert_eq!(delta.leave_balance_to_add, 0);
        assert_eq!(delta.leave_balance_to_subtract, 0);
        assert!(!form.has_changes());
    }

    #[test]
    fn test_minus_then_plus_nets_to_zero() {
        let mut form = LeaveForm::new();
        form.load(rows());
        assert!(form.decrement(2));
        assert!(form.decrement(2));
        assert!(form.increment(2));
        assert_eq!(form.row(2).unwrap().subtract, 1);
        assert_eq!(form.payload()[1].net(), -1);
    }

    // Single-active-row behaviour: moving to another row throws away the pending
    // delta on the previous one. Kept as observed; it may not be intended.
    #[test]
    fn test_editing_another_row_discards_pending_delta() {
        let mut form = LeaveForm::new();
        form.load(rows());
        form.increment(1);
        form.increment(1);
        assert_eq!(form.row(1).unwrap().addon, 2);
        form.decrement(2);
        assert_eq!(form.row(1).unwrap().addon, 0);
        assert_eq!(form.row(2).unwrap().subtract, 1);
        assert_eq!(form.active_row(), Some(2));
    }

    #[test]
    fn test_decrement_stops_at_zero() {
        let mut form = LeaveForm::new();
        form.load(rows());
        assert!(form.decrement(3));
        assert!(!form.decrement(3));
        assert_eq!(form.row(3).unwrap().projected_remaining(), 0.0);
        assert!(!form.increment(99));
    }

    #[test]
    fn test_refused_decrement_keeps_other_row_delta() {
        let mut form = LeaveForm::new();
        let mut input = rows();
        input[2].remaining = 0.0;
        form.load(input);
        form.increment(1);
        form.increment(1);
        assert!(!form.can_decrement(3));
        assert!(!form.decrement(3));
        assert_eq!(form.row(1).unwrap().addon, 2);
        assert_eq!(form.active_row(), Some(1));
        assert_eq!(form.row(3).unwrap().subtract, 0);
    }

    #[test]
    fn test_reset_drops_deltas_and_errors() {
        let mut form = LeaveForm::new();
        form.load(rows());
        form.decrement(2);
        form.errors.insert(2, "CASUAL cannot go below zero".to_string());
        form.reset();
        assert!(!form.has_changes());
        assert_eq!(form.error(2), None);
        assert_eq!(form.active_row(), None);
        assert_eq!(form.rows().len(), 3);
    }

    #[test]
    fn test_validate_rejects_negative_projection() {
        let mut balance = LeaveBalance::new(4, "Paternity", 5.0, 1.0, 4.0);
        balance.subtract = 3;
        let mut form = LeaveForm::new();
        form.rows = vec![balance];
        assert!(!form.validate());
        assert_eq!(form.error(4), Some("Paternity cannot go below zero"));
    }

    #[test]
    fn test_applied_delta_changes_only_remaining() {
        let mut form = LeaveForm::new();
        form.load(rows());
        form.decrement(1);
        form.decrement(1);
        let mut server = rows();
        for (delta, row) in form.payload().iter().zip(server.iter_mut()) {
            delta.apply(row);
        }
        assert_eq!(server[0].remaining, 8.0);
        assert_eq!(server[0].used, 2.0);
        assert_eq!(server[0].total_count, 12.0);
        assert_eq!(server[1].remaining, 8.0);
    }

    #[test]
    fn test_classification_order() {
        assert_eq!(LeaveKey::classify("Sick Leave"), Some(LeaveKey::Sick));
        assert_eq!(LeaveKey::classify("casual"), Some(LeaveKey::Casual));
        assert_eq!(LeaveKey::classify("LOP"), Some(LeaveKey::LossOfPay));
        assert_eq!(
            LeaveKey::classify("Leave Without Pay"),
            Some(LeaveKey::LossOfPay)
        );
        // "sick" is checked before "casual".
        assert_eq!(LeaveKey::classify("Casual/Sick"), Some(LeaveKey::Sick));
        assert_eq!(LeaveKey::classify("Maternity"), None);
    }

    #[test]
    fn test_from_api_to_form() {
        let mut input = rows();
        input.push(LeaveBalance::new(9, "Compensatory Off", 2.0, 2.0, 0.0));
        input.push(LeaveBalance::new(10, "Sabbatical", 30.0, 30.0, 0.0));
        let summary = from_api_to_form(&input);
        assert_eq!(summary.len(), 4);
        assert_eq!(
            summary[&LeaveKey::Sick],
            LeaveSummary {
                id: 1,
                available: 10.0,
                booked: 2.0,
                total: 12.0
            }
        );
        assert_eq!(summary[&LeaveKey::Sabbatical].id, 10);
        assert!(!summary.contains_key(&LeaveKey::Paternity));
    }

    #[test]
    fn test_load_drops_stale_deltas() {
        let mut stale = rows();
        stale[0].addon = 4;
        let mut form = LeaveForm::new();
        form.load(stale);
        assert!(!form.has_changes());
    }
}
