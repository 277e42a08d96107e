use serde::Serialize;

use crate::assessment::RiskLevel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusBanner {
    pub title: &'static str,
    pub description: &'static str,
}

impl StatusBanner {
    pub fn for_level(level: RiskLevel) -> Self {
        match level {
            RiskLevel::Low => StatusBanner {
                title: "Healthy Environment",
                description: "All parameters are within optimal ranges.",
            },
            RiskLevel::Medium => StatusBanner {
                title: "Attention Required",
                description: "Some parameters need adjustment.",
            },
            RiskLevel::High => StatusBanner {
                title: "Immediate Action Required",
                description: "Critical parameters detected.",
            },
        }
    }

    /// Shown before the first successful refresh.
    pub fn unknown() -> Self {
        StatusBanner {
            title: "Status Unknown",
            description: "Unable to determine environment status.",
        }
    }
}

const MEDIUM_ACTIONS: &[&str] = &[
    "Monitor affected parameters more frequently",
    "Adjust environmental controls as needed",
    "Schedule maintenance check if issues persist",
];

const HIGH_ACTIONS: &[&str] = &[
    "Check ventilation system immediately",
    "Verify temperature control equipment",
    "Inspect for water leaks or humidity sources",
    "Consider temporary relocation if necessary",
];

/// Immediate actions listed under the issue list. Nothing to do when low.
pub fn recommended_actions(level: RiskLevel) -> &'static [&'static str] {
    match level {
        RiskLevel::Low => &[],
        RiskLevel::Medium => MEDIUM_ACTIONS,
        RiskLevel::High => HIGH_ACTIONS,
    }
}

const LOW_SUGGESTIONS: &[&str] = &[
    "Continue monitoring current conditions",
    "Maintain regular cleaning schedule",
    "Ensure proper ventilation",
];

const MEDIUM_SUGGESTIONS: &[&str] = &[
    "Increase ventilation rate",
    "Check water quality",
    "Monitor feed consumption",
    "Clean litter more frequently",
];

const HIGH_SUGGESTIONS: &[&str] = &[
    "Immediately improve ventilation",
    "Reduce stocking density if possible",
    "Check for water leaks",
    "Clean or replace litter",
    "Consider supplemental heating/cooling",
];

/// Longer-term husbandry suggestions for a level.
pub fn suggestions(level: RiskLevel) -> &'static [&'static str] {
    match level {
        RiskLevel::Low => LOW_SUGGESTIONS,
        RiskLevel::Medium => MEDIUM_SUGGESTIONS,
        RiskLevel::High => HIGH_SUGGESTIONS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_titles_per_level() {
        assert_eq!(StatusBanner::for_level(RiskLevel::Low).title, "Healthy Environment");
        assert_eq!(StatusBanner::for_level(RiskLevel::Medium).title, "Attention Required");
        assert_eq!(
            StatusBanner::for_level(RiskLevel::High).description,
            "Critical parameters detected."
        );
    }

    #[test]
    fn actions_only_when_not_low() {
        assert!(recommended_actions(RiskLevel::Low).is_empty());
        assert_eq!(recommended_actions(RiskLevel::Medium).len(), 3);
        assert_eq!(recommended_actions(RiskLevel::High).len(), 4);
        assert_eq!(
            recommended_actions(RiskLevel::High)[0],
            "Check ventilation system immediately"
        );
    }

    #[test]
    fn suggestions_grow_with_risk() {
        assert!(suggestions(RiskLevel::Low).len() < suggestions(RiskLevel::Medium).len());
        assert!(suggestions(RiskLevel::Medium).len() < suggestions(RiskLevel::High).len());
    }
}
