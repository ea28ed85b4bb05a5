//! Additive risk scoring model.

use crate::domain::{CurrentState, Deviations, RiskScores};

/// Calculator for the four bounded risk scores.
///
/// Each specific score is an additive model over non-negative
/// contribution terms; intermediate sums may exceed 100 and are clamped
/// only once at the end.
pub struct RiskScorer;

impl RiskScorer {
    /// Score a state snapshot against its normalized deviations.
    pub fn score(state: &CurrentState, deviations: &Deviations, night: bool) -> RiskScores {
        let fall = Self::fall_risk(state, deviations, night);
        let cognitive = Self::cognitive_risk(state, deviations, night);
        let loneliness = Self::loneliness_risk(state, deviations);

        RiskScores::from_components(fall, cognitive, loneliness)
    }

    fn fall_risk(state: &CurrentState, deviations: &Deviations, night: bool) -> f64 {
        let mut risk = (100.0 - state.mobility) * 0.35
            + state.restlessness * 0.20
            + if night { 18.0 } else { 0.0 }
            + deviations.mobility.max(0.0) * 5.0
            + deviations.restlessness.max(0.0) * 3.0;

        if state.use_wearables {
            risk += (state.heart_rate - 110.0).max(0.0) * 0.5;
            risk += (92.0 - state.spo2).max(0.0) * 3.0;
        }

        risk
    }

    fn cognitive_risk(state: &CurrentState, deviations: &Deviations, night: bool) -> f64 {
        state.speech_drift * 0.45
            + if night { state.restlessness * 0.25 } else { 0.0 }
            + deviations.speech.max(0.0) * 4.0
    }

    fn loneliness_risk(state: &CurrentState, deviations: &Deviations) -> f64 {
        let activity_proxy = state.mobility * 0.3 + (100.0 - state.restlessness) * 0.2;

        state.social_isolation * 0.50
            + (50.0 - activity_proxy).max(0.0) * 0.3
            + deviations.social.max(0.0) * 4.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UrgencyBand;

    fn nominal_state() -> CurrentState {
        CurrentState::default()
    }

    #[test]
    fn test_nominal_daytime_scores() {
        let state = nominal_state();
        let scores = RiskScorer::score(&state, &Deviations::default(), false);

        // (100-70)*0.35 + 25*0.20
        assert!((scores.fall - 15.5).abs() < 1e-9);
        // 20*0.45
        assert!((scores.cognitive - 9.0).abs() < 1e-9);
        // 30*0.50 + (50 - (70*0.3 + 75*0.2))*0.3
        assert!((scores.loneliness - 19.2).abs() < 1e-9);
        // 0.40*15.5 + 0.30*9.0 + 0.30*19.2
        assert!((scores.overall - 14.66).abs() < 1e-9);
        assert_eq!(scores.overall_band(), UrgencyBand::Low);
    }

    #[test]
    fn test_night_wearables_deviations_vector() {
        let state = CurrentState {
            time_of_day: 2.0,
            mobility: 30.0,
            restlessness: 60.0,
            speech_drift: 50.0,
            social_isolation: 55.0,
            use_wearables: true,
            heart_rate: 120.0,
            spo2: 90.0,
            staff_load: 40.0,
        };
        let deviations = Deviations {
            mobility: 2.0,
            restlessness: 1.0,
            speech: 1.5,
            social: 0.0,
        };

        let scores = RiskScorer::score(&state, &deviations, true);

        // 24.5 + 12 + 18 + 10 + 3 + 5 + 6
        assert!((scores.fall - 78.5).abs() < 1e-9);
        // 22.5 + 15 + 6
        assert!((scores.cognitive - 43.5).abs() < 1e-9);
        // 27.5 + (50 - 17)*0.3
        assert!((scores.loneliness - 37.4).abs() < 1e-9);
        assert!((scores.overall - 55.67).abs() < 1e-9);
    }

    #[test]
    fn test_negative_deviations_contribute_nothing() {
        let state = nominal_state();
        let deviations = Deviations {
            mobility: -3.0,
            restlessness: -2.0,
            speech: -1.0,
            social: -4.0,
        };

        let with_neg = RiskScorer::score(&state, &deviations, false);
        let without = RiskScorer::score(&state, &Deviations::default(), false);
        assert_eq!(with_neg, without);
    }

    #[test]
    fn test_wearable_terms_gated_on_flag() {
        let mut state = nominal_state();
        state.heart_rate = 140.0;
        state.spo2 = 85.0;

        let off = RiskScorer::score(&state, &Deviations::default(), false);
        state.use_wearables = true;
        let on = RiskScorer::score(&state, &Deviations::default(), false);

        assert!(on.fall > off.fall);
    }

    #[test]
    fn test_scores_always_bounded() {
        let extremes = [0.0, 50.0, 100.0];
        for &mobility in &extremes {
            for &restlessness in &extremes {
                for &speech in &extremes {
                    for &social in &extremes {
                        for night in [false, true] {
                            let state = CurrentState {
                                time_of_day: if night { 2.0 } else { 14.0 },
                                mobility,
                                restlessness,
                                speech_drift: speech,
                                social_isolation: social,
                                use_wearables: true,
                                heart_rate: 140.0,
                                spo2: 85.0,
                                staff_load: 100.0,
                            };
                            let deviations = Deviations {
                                mobility: 10.0,
                                restlessness: 10.0,
                                speech: 10.0,
                                social: 10.0,
                            };
                            let scores = RiskScorer::score(&state, &deviations, night);
                            for value in [
                                scores.fall,
                                scores.cognitive,
                                scores.loneliness,
                                scores.overall,
                            ] {
                                assert!((0.0..=100.0).contains(&value));
                            }
                        }
                    }
                }
            }
        }
    }
}
