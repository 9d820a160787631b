//! Merged, dismissal-aware alert collection
//!
//! Holds the seed alerts that exist at startup plus alerts generated at
//! runtime, minus everything the operator dismissed. The visible view is
//! ordered by severity (critical first), stable for ties.

use crate::domain::types::{Alert, AlertId};
use rustc_hash::FxHashSet;
use tracing::debug;

pub struct AlertStore {
    seeded: Vec<Alert>,
    dynamic: Vec<Alert>,
    dismissed: FxHashSet<AlertId>,
}

impl AlertStore {
    pub fn new(seeded: Vec<Alert>) -> Self {
        Self { seeded, dynamic: Vec::new(), dismissed: FxHashSet::default() }
    }

    /// Append a generated alert, newest first within the dynamic set
    pub fn add(&mut self, alert: Alert) {
        self.dynamic.insert(0, alert);
    }

    /// Dismiss by id. Idempotent: unknown and already-dismissed ids are
    /// no-ops.
    pub fn dismiss(&mut self, id: &AlertId) {
        if self.dismissed.insert(id.clone()) {
            debug!(alert_id = %id, "alert_dismissed");
        }
    }

    /// Drop all generated alerts and all dismissals, so that the view
    /// returns to the untouched seed set. Invoked on lockdown engage.
    pub fn clear_dynamic(&mut self) {
        self.dynamic.clear();
        self.dismissed.clear();
    }

    /// Merged visible list: seeded then dynamic, minus dismissals,
    /// stable-sorted into severity order.
    pub fn visible(&self) -> Vec<Alert> {
        let mut alerts: Vec<Alert> = self
            .seeded
            .iter()
            .chain(self.dynamic.iter())
            .filter(|a| !self.dismissed.contains(&a.id))
            .cloned()
            .collect();
        alerts.sort_by_key(|a| a.severity.rank());
        alerts
    }

    pub fn visible_count(&self) -> usize {
        self.seeded
            .iter()
            .chain(self.dynamic.iter())
            .filter(|a| !self.dismissed.contains(&a.id))
            .count()
    }

    #[cfg(test)]
    pub fn dynamic_count(&self) -> usize {
        self.dynamic.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{AlertStatus, Severity};

    fn alert(id: &str, severity: Severity) -> Alert {
        Alert {
            id: AlertId(id.to_string()),
            severity,
            kind: "motion".to_string(),
            message: format!("alert {}", id),
            location: "Gallery 3".to_string(),
            camera: None,
            timestamp: "2 min ago".to_string(),
            status: AlertStatus::Active,
            auto_generated: false,
            created_at: 0,
        }
    }

    #[test]
    fn test_visible_orders_by_severity() {
        let mut store = AlertStore::new(vec![
            alert("a", Severity::Low),
            alert("b", Severity::Critical),
        ]);
        store.add(alert("c", Severity::Medium));
        store.add(alert("d", Severity::High));

        let severities: Vec<Severity> = store.visible().iter().map(|a| a.severity).collect();
        assert_eq!(
            severities,
            vec![Severity::Critical, Severity::High, Severity::Medium, Severity::Low]
        );
    }

    #[test]
    fn test_severity_sort_is_stable_for_ties() {
        let mut store = AlertStore::new(vec![
            alert("first", Severity::High),
            alert("second", Severity::High),
        ]);
        store.add(alert("third", Severity::High));

        let visible = store.visible();
        let ids: Vec<&str> = visible.iter().map(|a| a.id.0.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_dismiss_hides_alert() {
        let mut store = AlertStore::new(vec![alert("a", Severity::Low)]);
        store.add(alert("b", Severity::High));

        store.dismiss(&AlertId("b".to_string()));
        let visible = store.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id.0, "a");
    }

    #[test]
    fn test_dismiss_is_idempotent() {
        let mut store = AlertStore::new(vec![alert("a", Severity::Low)]);
        store.add(alert("b", Severity::High));

        store.dismiss(&AlertId("b".to_string()));
        let after_first = store.visible();
        store.dismiss(&AlertId("b".to_string()));
        store.dismiss(&AlertId("never-existed".to_string()));
        assert_eq!(store.visible(), after_first);
    }

    #[test]
    fn test_clear_dynamic_resets_to_seed_set() {
        let mut store = AlertStore::new(vec![alert("seed", Severity::Medium)]);
        store.add(alert("gen-1", Severity::High));
        store.add(alert("gen-2", Severity::High));
        store.dismiss(&AlertId("seed".to_string()));
        assert_eq!(store.visible().len(), 2);

        store.clear_dynamic();
        // Generated alerts gone, and the seed dismissal is forgotten too
        assert_eq!(store.dynamic_count(), 0);
        let visible = store.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id.0, "seed");
    }
}
