//! Points and reward tiers.

use super::catalog::{PRELIMINARY_STEPS, TIERS, Tier};
use super::profile::Profile;

/// One point per answered preliminary fact. Questionnaire answers do not
/// score.
pub fn points(profile: &Profile) -> u32 {
    PRELIMINARY_STEPS.iter().filter(|s| profile.has(s.key)).count() as u32
}

/// The highest tier whose threshold is at most `points`.
pub fn tier(points: u32) -> &'static Tier {
    TIERS
        .iter()
        .rev()
        .find(|t| t.points_required <= points)
        .unwrap_or(&TIERS[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::catalog::FieldKey;

    #[test]
    fn points_count_preliminary_fields_only() {
        let mut profile = Profile::new();
        assert_eq!(points(&profile), 0);
        profile.set(FieldKey::CompanyName, "Acme");
        profile.set(FieldKey::BusinessIdea, "bread");
        assert_eq!(points(&profile), 1);
        for step in &PRELIMINARY_STEPS {
            profile.set(step.key, "x");
        }
        assert_eq!(points(&profile), 6);
    }

    #[test]
    fn tier_thresholds() {
        assert_eq!(tier(0).id, "beginner");
        assert_eq!(tier(2).id, "beginner");
        assert_eq!(tier(3).id, "motivated_entrepreneur");
        assert_eq!(tier(5).id, "motivated_entrepreneur");
        assert_eq!(tier(6).id, "growing_entrepreneur");
        assert_eq!(tier(10).id, "experienced_business_professional");
        assert_eq!(tier(19).id, "experienced_business_professional");
        assert_eq!(tier(20).id, "master_entrepreneur");
        assert_eq!(tier(500).id, "master_entrepreneur");
    }

    #[test]
    fn tier_is_highest_reachable_for_every_point_value() {
        for p in 0..25 {
            let t = tier(p);
            assert!(t.points_required <= p);
            assert!(TIERS.iter().all(|other| {
                other.points_required > p || other.points_required <= t.points_required
            }));
        }
    }
}
