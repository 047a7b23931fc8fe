use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// --- Raw input ---

/// One crawled page reference as it appears in a partition file:
/// `date \t title \t url`. Immutable once read; the same title text may
/// recur across different urls and dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub date: String,
    pub title: String,
    pub url: String,
}

// --- Fingerprint ---

/// Fast hash of a normalized title, used as the dedup key. Not
/// cryptographic; a collision reads as "already seen" and the colliding
/// title is skipped, never reprocessed.
pub fn fingerprint(normalized_title: &str) -> u64 {
    use std::hash::{Hash, Hasher};
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    normalized_title.hash(&mut hasher);
    hasher.finish()
}

// --- Classification verdicts ---

/// Score pair from the relevance stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelevanceVerdict {
    pub relevant: f64,
    #[serde(rename = "non-relevant")]
    pub non_relevant: f64,
}

impl RelevanceVerdict {
    /// Strictly positive verdict. A tie is not relevant.
    pub fn is_relevant(&self) -> bool {
        self.relevant > self.non_relevant
    }
}

/// Closed set of relation labels the relationship stage scores over.
/// Directional labels read ent1 → ent2 in title order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationLabel {
    Ent1SupportsEnt2,
    Ent2SupportsEnt1,
    Ent1OpposesEnt2,
    Ent2OpposesEnt1,
    BothAgree,
    BothDisagree,
    Other,
}

impl RelationLabel {
    pub const ALL: [RelationLabel; 7] = [
        RelationLabel::Ent1SupportsEnt2,
        RelationLabel::Ent2SupportsEnt1,
        RelationLabel::Ent1OpposesEnt2,
        RelationLabel::Ent2OpposesEnt1,
        RelationLabel::BothAgree,
        RelationLabel::BothDisagree,
        RelationLabel::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RelationLabel::Ent1SupportsEnt2 => "ent1_supports_ent2",
            RelationLabel::Ent2SupportsEnt1 => "ent2_supports_ent1",
            RelationLabel::Ent1OpposesEnt2 => "ent1_opposes_ent2",
            RelationLabel::Ent2OpposesEnt1 => "ent2_opposes_ent1",
            RelationLabel::BothAgree => "both_agree",
            RelationLabel::BothDisagree => "both_disagree",
            RelationLabel::Other => "other",
        }
    }
}

impl std::fmt::Display for RelationLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Structured payload from the relationship stage: the two entity surface
/// forms found in the title, their knowledge-base ids when linking
/// succeeded, and a score per relation label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipVerdict {
    #[serde(rename = "entity_1")]
    pub entity1: String,
    #[serde(rename = "entity_2")]
    pub entity2: String,
    #[serde(rename = "entity_1_wiki")]
    pub entity1_wiki: Option<String>,
    #[serde(rename = "entity_2_wiki")]
    pub entity2_wiki: Option<String>,
    /// label → score, keyed by `RelationLabel::as_str()`.
    #[serde(flatten)]
    pub scores: std::collections::HashMap<String, f64>,
}

impl RelationshipVerdict {
    /// Highest-scoring label from the closed set, if any known label was
    /// scored.
    pub fn top_label(&self) -> Option<RelationLabel> {
        RelationLabel::ALL
            .iter()
            .filter_map(|l| self.scores.get(l.as_str()).map(|s| (*l, *s)))
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(l, _)| l)
    }
}

// --- Ledger entry ---

/// One processed title: created once per distinct normalized title,
/// appended to the ledger, never updated. `relationship` is None when the
/// relevance verdict was negative or tied: the relationship stage was
/// never called for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedEntry {
    pub fingerprint: u64,
    pub record: RawRecord,
    pub normalized_title: String,
    pub relevance: RelevanceVerdict,
    pub relationship: Option<RelationshipVerdict>,
    pub processed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_deterministic() {
        let h1 = fingerprint("costa responde a passos");
        let h2 = fingerprint("costa responde a passos");
        assert_eq!(h1, h2);
    }

    #[test]
    fn fingerprint_different_inputs() {
        assert_ne!(fingerprint("costa"), fingerprint("passos"));
    }

    #[test]
    fn tie_is_not_relevant() {
        let v = RelevanceVerdict {
            relevant: 0.5,
            non_relevant: 0.5,
        };
        assert!(!v.is_relevant());
    }

    #[test]
    fn strict_majority_is_relevant() {
        let v = RelevanceVerdict {
            relevant: 0.9,
            non_relevant: 0.1,
        };
        assert!(v.is_relevant());
    }

    #[test]
    fn relevance_verdict_wire_field_names() {
        let v: RelevanceVerdict =
            serde_json::from_str(r#"{"relevant": 0.7, "non-relevant": 0.3}"#).unwrap();
        assert!(v.is_relevant());
        let json = serde_json::to_string(&v).unwrap();
        assert!(json.contains("non-relevant"));
    }

    #[test]
    fn relationship_top_label() {
        let v: RelationshipVerdict = serde_json::from_str(
            r#"{
                "ent1_opposes_ent2": 0.8,
                "ent1_supports_ent2": 0.1,
                "other": 0.1,
                "entity_1": "Costa",
                "entity_2": "Passos Coelho",
                "entity_1_wiki": "Q182367",
                "entity_2_wiki": null
            }"#,
        )
        .unwrap();
        assert_eq!(v.top_label(), Some(RelationLabel::Ent1OpposesEnt2));
        assert_eq!(v.entity1, "Costa");
        assert_eq!(v.entity2_wiki, None);
    }
}
