use std::collections::BTreeMap;

use uwds_common::{DomainStore, SituationId};

use crate::situation::{Situation, SituationKind};

/// The temporal store of a world.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    situations: BTreeMap<SituationId, Situation>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&Situation> {
        self.situations.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.situations.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.situations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.situations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Situation> {
        self.situations.values()
    }

    /// Situations covering `time`, ordered by start time then id.
    pub fn active_at(&self, time: f64) -> Vec<&Situation> {
        let mut active: Vec<&Situation> = self
            .situations
            .values()
            .filter(|s| s.is_active_at(time))
            .collect();
        active.sort_by(|a, b| a.start.total_cmp(&b.start).then_with(|| a.id.cmp(&b.id)));
        active
    }

    /// Situations without an end time.
    pub fn ongoing(&self) -> impl Iterator<Item = &Situation> {
        self.situations.values().filter(|s| s.is_ongoing())
    }

    pub fn of_kind(&self, kind: SituationKind) -> impl Iterator<Item = &Situation> {
        self.situations.values().filter(move |s| s.kind == kind)
    }
}

impl DomainStore for Timeline {
    type Entity = Situation;

    fn update(&mut self, situation: Situation) {
        self.situations.insert(situation.id.clone(), situation);
    }

    fn remove(&mut self, ids: &[SituationId]) {
        for id in ids {
            self.situations.remove(id);
        }
    }

    fn reset(&mut self) {
        self.situations.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Timeline {
        let mut timeline = Timeline::new();
        timeline.update(
            Situation::new("s1", SituationKind::Fact, 0.0)
                .with_description("cup on table")
                .ended_at(10.0),
        );
        timeline.update(Situation::new("s2", SituationKind::Action, 5.0).with_description("robot picks cup"));
        timeline.update(Situation::new("s3", SituationKind::Fact, 12.0).ended_at(20.0));
        timeline
    }

    #[test]
    fn update_is_upsert() {
        let mut timeline = sample();
        timeline.update(Situation::new("s1", SituationKind::Generic, 1.0));
        assert_eq!(timeline.len(), 3);
        let s1 = timeline.get("s1").unwrap();
        assert_eq!(s1.kind, SituationKind::Generic);
        assert!(s1.description.is_empty());
        assert!(s1.is_ongoing());
    }

    #[test]
    fn remove_twice_is_harmless() {
        let mut timeline = sample();
        let ids = [SituationId::from("s2")];
        timeline.remove(&ids);
        timeline.remove(&ids);
        assert!(!timeline.contains("s2"));
        assert_eq!(timeline.len(), 2);
    }

    #[test]
    fn active_at_respects_bounds() {
        let timeline = sample();
        let at = |t: f64| -> Vec<String> {
            timeline.active_at(t).iter().map(|s| s.id.to_string()).collect()
        };
        assert_eq!(at(7.0), vec!["s1", "s2"]);
        assert_eq!(at(10.0), vec!["s1", "s2"]);
        assert_eq!(at(11.0), vec!["s2"]);
        assert_eq!(at(15.0), vec!["s2", "s3"]);
        assert!(at(-1.0).is_empty());
    }

    #[test]
    fn ongoing_and_kind_filters() {
        let timeline = sample();
        let ongoing: Vec<&str> = timeline.ongoing().map(|s| s.id.as_str()).collect();
        assert_eq!(ongoing, vec!["s2"]);
        assert_eq!(timeline.of_kind(SituationKind::Fact).count(), 2);
        assert_eq!(timeline.of_kind(SituationKind::Generic).count(), 0);
    }

    #[test]
    fn reset_empties_timeline() {
        let mut timeline = sample();
        timeline.reset();
        assert!(timeline.is_empty());
        assert!(timeline.active_at(7.0).is_empty());
    }

    #[test]
    fn duration_of_closed_situation() {
        let timeline = sample();
        assert_eq!(timeline.get("s1").unwrap().duration(), Some(10.0));
        assert_eq!(timeline.get("s2").unwrap().duration(), None);
    }
}
