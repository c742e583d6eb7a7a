use serde::{Deserialize, Serialize};
use uwds_common::{Entity, Property, SituationId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SituationKind {
    #[default]
    Generic,
    /// A state of the world that holds over an interval ("cup is on table").
    Fact,
    /// Something an agent does ("robot picks cup").
    Action,
}

/// A time-bounded semantic event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Situation {
    pub id: SituationId,
    #[serde(default)]
    pub kind: SituationKind,
    #[serde(default)]
    pub description: String,
    /// In `[0, 1]`.
    #[serde(default = "full_confidence")]
    pub confidence: f32,
    /// Start time in seconds.
    #[serde(default)]
    pub start: f64,
    /// End time in seconds; `None` while the situation is still ongoing.
    #[serde(default)]
    pub end: Option<f64>,
    #[serde(default)]
    pub properties: Vec<Property>,
}

fn full_confidence() -> f32 {
    1.0
}

impl Situation {
    pub fn new(id: impl Into<SituationId>, kind: SituationKind, start: f64) -> Self {
        Self {
            id: id.into(),
            kind,
            description: String::new(),
            confidence: full_confidence(),
            start,
            end: None,
            properties: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn ended_at(mut self, end: f64) -> Self {
        self.end = Some(end);
        self
    }

    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    pub fn is_ongoing(&self) -> bool {
        self.end.is_none()
    }

    /// Whether `time` falls within `[start, end]`, open-ended while ongoing.
    pub fn is_active_at(&self, time: f64) -> bool {
        time >= self.start && self.end.is_none_or(|end| time <= end)
    }

    pub fn duration(&self) -> Option<f64> {
        self.end.map(|end| end - self.start)
    }
}

impl Entity for Situation {
    type Id = SituationId;

    fn id(&self) -> &SituationId {
        &self.id
    }
}
