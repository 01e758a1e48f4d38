//! "What do I need next term?" projections.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TargetOutlook {
    /// Average needed across the upcoming credits. May be negative when
    /// the target is already secured, or above the scale when it is not
    /// reachable.
    pub required_gpa: f64,
    pub achievable: bool,
    pub already_secured: bool,
    pub resulting_credits: f64,
}

/// Solves `(current·cc + x·uc) / (cc + uc) = target` for `x`.
///
/// `max_points` is the profile's ceiling ([`CalculatorProfile::max_points`]),
/// so weighted profiles accept GPAs above the base scale. Returns `None` for
/// inputs no calculator row could produce: GPAs outside `0..=max_points`,
/// negative current credits, or no upcoming credits.
///
/// [`CalculatorProfile::max_points`]: crate::profile::CalculatorProfile::max_points
pub fn required_gpa(
    current_gpa: f64,
    current_credits: f64,
    target_gpa: f64,
    upcoming_credits: f64,
    max_points: f64,
) -> Option<TargetOutlook> {
    let in_scale = |gpa: f64| gpa.is_finite() && (0.0..=max_points).contains(&gpa);
    if !in_scale(current_gpa) || !in_scale(target_gpa) {
        return None;
    }
    if !current_credits.is_finite() || current_credits < 0.0 {
        return None;
    }
    if !upcoming_credits.is_finite() || upcoming_credits <= 0.0 {
        return None;
    }

    let resulting_credits = current_credits + upcoming_credits;
    let required = (target_gpa * resulting_credits - current_gpa * current_credits) / upcoming_credits;

    Some(TargetOutlook {
        required_gpa: required,
        achievable: required <= max_points + f64::EPSILON,
        already_secured: required <= 0.0,
        resulting_credits,
    })
}
