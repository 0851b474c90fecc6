use std::collections::BTreeSet;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::{
    object::PathClass,
    traits::{IdSource, LabelRegistry},
};

/// Sentinel ids drawn from the wall clock, strictly decreasing within a process
#[derive(Debug, Default)]
pub struct ClockIds {
    last: AtomicI64,
}

impl ClockIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdSource for ClockIds {
    fn next_sentinel(&self) -> i64 {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as i64)
            .unwrap_or(1)
            .max(1);
        let candidate = -nanos;
        let previous = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(candidate.min(last - 1))
            })
            .unwrap_or(0);
        candidate.min(previous - 1)
    }
}

/// Deterministic sentinels: -1, -2, -3, ...
#[derive(Debug)]
pub struct SequentialIds {
    next: AtomicI64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self { next: AtomicI64::new(-1) }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdSource for SequentialIds {
    fn next_sentinel(&self) -> i64 {
        self.next.fetch_sub(1, Ordering::SeqCst)
    }
}

/// Registry that ignores every label
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRegistry;

impl LabelRegistry for NoopRegistry {
    fn register_if_absent(&mut self, _labels: &[String]) {}
}

impl LabelRegistry for BTreeSet<String> {
    fn register_if_absent(&mut self, labels: &[String]) {
        self.extend(labels.iter().cloned());
    }
}

impl LabelRegistry for Vec<PathClass> {
    fn register_if_absent(&mut self, labels: &[String]) {
        if let Some(class) = PathClass::new(labels) {
            if !self.contains(&class) {
                self.push(class);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_ids_are_negative_and_unique() {
        let ids = ClockIds::new();
        let drawn: Vec<i64> = (0..1000).map(|_| ids.next_sentinel()).collect();
        assert!(drawn.iter().all(|&id| id < 0));
        assert!(drawn.windows(2).all(|w| w[1] < w[0]));
    }

    #[test]
    fn test_sequential_ids() {
        let ids = SequentialIds::new();
        assert_eq!(ids.next_sentinel(), -1);
        assert_eq!(ids.next_sentinel(), -2);
        assert_eq!(ids.next_sentinel(), -3);
    }

    #[test]
    fn test_class_registry_deduplicates() {
        let mut classes: Vec<PathClass> = Vec::new();
        let tumor = vec!["Tumor".to_string()];
        classes.register_if_absent(&tumor);
        classes.register_if_absent(&tumor);
        classes.register_if_absent(&["Tumor".to_string(), "Positive".to_string()]);
        classes.register_if_absent(&[]);
        assert_eq!(classes.len(), 2);
    }

    #[test]
    fn test_label_set_registry() {
        let mut labels = BTreeSet::new();
        labels.register_if_absent(&["Tumor".to_string(), "Positive".to_string()]);
        labels.register_if_absent(&["Tumor".to_string()]);
        assert_eq!(labels.len(), 2);
    }
}
