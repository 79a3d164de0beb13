use serde::{Deserialize, Serialize};

/// The eight aspect groups reviews are scored against.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Aspect {
    Accommodation,
    Dining,
    Transportation,
    Service,
    Location,
    Value,
    Cleanliness,
    Activities,
}

impl Aspect {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Accommodation => "accommodation",
            Self::Dining => "dining",
            Self::Transportation => "transportation",
            Self::Service => "service",
            Self::Location => "location",
            Self::Value => "value",
            Self::Cleanliness => "cleanliness",
            Self::Activities => "activities",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AspectGroup {
    pub aspect: Aspect,
    pub keywords: &'static [&'static str],
}

/// Fixed keyword table. The lists are intentionally narrow ("breakfast"
/// does not match dining, "overpriced" does not match value); they are part
/// of the scoring contract and must not be expanded ad hoc.
pub const ASPECT_GROUPS: &[AspectGroup] = &[
    AspectGroup {
        aspect: Aspect::Accommodation,
        keywords: &["hotel", "accommodation", "room"],
    },
    AspectGroup {
        aspect: Aspect::Dining,
        keywords: &["food", "restaurant", "dining"],
    },
    AspectGroup {
        aspect: Aspect::Transportation,
        keywords: &["transport", "travel", "flight"],
    },
    AspectGroup {
        aspect: Aspect::Service,
        keywords: &["service", "staff", "customer service"],
    },
    AspectGroup {
        aspect: Aspect::Location,
        keywords: &["location", "place", "destination"],
    },
    AspectGroup {
        aspect: Aspect::Value,
        keywords: &["price", "cost", "value"],
    },
    AspectGroup {
        aspect: Aspect::Cleanliness,
        keywords: &["cleanliness", "hygiene", "maintenance"],
    },
    AspectGroup {
        aspect: Aspect::Activities,
        keywords: &["activities", "entertainment", "attractions"],
    },
];

/// Aspects whose keywords occur in the segment (case-insensitive substring
/// match). A segment may match zero, one, or several groups.
pub fn matching_aspects(segment: &str) -> Vec<Aspect> {
    let lower = segment.to_lowercase();

    ASPECT_GROUPS
        .iter()
        .filter(|group| group.keywords.iter().any(|term| lower.contains(term)))
        .map(|group| group.aspect)
        .collect()
}
