//! Expected points from expected goals.
//!
//! Each side's goal count is modelled as an independent Poisson variable with
//! the side's xG as its mean, truncated at `max_goals`. The probability mass
//! beyond the truncation is dropped rather than renormalized, so the points
//! of one match sum to slightly less than the untruncated value.

use fbviz_common::{FbvizError, Result};
use serde::Serialize;
use statrs::distribution::{Discrete, Poisson};

/// Default truncation of the goal distribution.
pub const DEFAULT_MAX_GOALS: u32 = 5;

/// Win/draw/loss probabilities of one match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OutcomeProbabilities {
    /// Home win: sum of the strictly lower triangle of the score matrix.
    pub home_win: f64,
    /// Draw: sum of the diagonal.
    pub draw: f64,
    /// Away win: sum of the strictly upper triangle.
    pub away_win: f64,
}

/// Expected points of both sides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExpectedPoints {
    /// Home side.
    pub home: f64,
    /// Away side.
    pub away: f64,
}

impl ExpectedPoints {
    /// Points shared out by the match.
    pub fn total(self) -> f64 {
        self.home + self.away
    }
}

/// Poisson probabilities of 0..=`max_goals` goals for a mean of `xg`.
pub fn truncated_goal_pmf(xg: f64, max_goals: u32) -> Result<Vec<f64>> {
    if !xg.is_finite() || xg < 0.0 {
        return Err(FbvizError::validation_field(
            format!("xG must be a non-negative number, got {xg}"),
            "xg",
        ));
    }

    // A zero mean is a point mass at zero goals.
    if xg == 0.0 {
        let mut pmf = vec![0.0; max_goals as usize + 1];
        pmf[0] = 1.0;
        return Ok(pmf);
    }

    let poisson = Poisson::new(xg).map_err(|_| {
        FbvizError::validation_field(format!("Invalid Poisson mean {xg}"), "xg")
    })?;
    Ok((0..=u64::from(max_goals)).map(|k| poisson.pmf(k)).collect())
}

/// Outcome probabilities from the outer product of both goal distributions.
pub fn outcome_probabilities(home_xg: f64, away_xg: f64, max_goals: u32) -> Result<OutcomeProbabilities> {
    let home = truncated_goal_pmf(home_xg, max_goals)?;
    let away = truncated_goal_pmf(away_xg, max_goals)?;

    let mut outcome = OutcomeProbabilities {
        home_win: 0.0,
        draw: 0.0,
        away_win: 0.0,
    };
    for (home_goals, p_home) in home.iter().enumerate() {
        for (away_goals, p_away) in away.iter().enumerate() {
            let p = p_home * p_away;
            match home_goals.cmp(&away_goals) {
                std::cmp::Ordering::Greater => outcome.home_win += p,
                std::cmp::Ordering::Equal => outcome.draw += p,
                std::cmp::Ordering::Less => outcome.away_win += p,
            }
        }
    }
    Ok(outcome)
}

/// Expected points with 3 for a win and 1 for a draw.
pub fn expected_points(home_xg: f64, away_xg: f64, max_goals: u32) -> Result<ExpectedPoints> {
    let p = outcome_probabilities(home_xg, away_xg, max_goals)?;
    Ok(ExpectedPoints {
        home: 3.0 * p.home_win + p.draw,
        away: 3.0 * p.away_win + p.draw,
    })
}
