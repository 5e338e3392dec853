//! Match clock and score bookkeeping
//!
//! Owns the "is play active" gate and receives points from the engine.

use serde::{Deserialize, Serialize};

use crate::consts::{MATCH_DURATION_SECS, TARGET_SCORE};
use crate::sim::ScoreSink;

/// Where the match stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    Active,
    Paused,
    Won,
    Lost,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchSession {
    duration: f32,
    target_score: u32,
    time_remaining: f32,
    score: u32,
    phase: MatchPhase,
}

impl Default for MatchSession {
    fn default() -> Self {
        Self::new(MATCH_DURATION_SECS, TARGET_SCORE)
    }
}

impl MatchSession {
    /// Fresh match, already running
    pub fn new(duration: f32, target_score: u32) -> Self {
        Self {
            duration,
            target_score,
            time_remaining: duration,
            score: 0,
            phase: MatchPhase::Active,
        }
    }

    /// Start over with a full clock and no points
    pub fn restart(&mut self) {
        self.time_remaining = self.duration;
        self.score = 0;
        self.phase = MatchPhase::Active;
    }

    pub fn is_play_active(&self) -> bool {
        self.phase == MatchPhase::Active
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn time_remaining(&self) -> f32 {
        self.time_remaining
    }

    pub fn pause(&mut self) {
        if self.phase == MatchPhase::Active {
            self.phase = MatchPhase::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.phase == MatchPhase::Paused {
            self.phase = MatchPhase::Active;
        }
    }

    /// Run the clock; the match is lost when it reaches zero
    pub fn tick(&mut self, dt: f32) {
        if self.phase != MatchPhase::Active {
            return;
        }
        self.time_remaining -= dt;
        if self.time_remaining <= 0.0 {
            self.time_remaining = 0.0;
            self.phase = MatchPhase::Lost;
            log::info!("Time's up, final score {}", self.score);
        }
    }

    /// Bank points; reaching the target wins the match
    pub fn add_score(&mut self, points: u32) {
        if self.phase != MatchPhase::Active {
            return;
        }
        self.score = self.score.saturating_add(points);
        if self.score >= self.target_score {
            self.phase = MatchPhase::Won;
            log::info!("All fixed, match won with {} points", self.score);
        }
    }

    /// `Time: MM:SS`
    pub fn timer_label(&self) -> String {
        let secs = self.time_remaining.max(0.0);
        let minutes = (secs / 60.0).floor() as u32;
        let seconds = (secs % 60.0).floor() as u32;
        format!("Time: {minutes:02}:{seconds:02}")
    }

    /// `Fixed: N/T`
    pub fn score_label(&self) -> String {
        format!("Fixed: {}/{}", self.score, self.target_score)
    }
}

impl ScoreSink for MatchSession {
    fn report_score(&mut self, points: u32) {
        self.add_score(points);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_runs_out() {
        let mut session = MatchSession::new(1.0, 10);
        session.tick(0.6);
        assert!(session.is_play_active());
        session.tick(0.6);
        assert_eq!(session.phase(), MatchPhase::Lost);
        assert_eq!(session.time_remaining(), 0.0);
        assert!(!session.is_play_active());
    }

    #[test]
    fn test_target_score_wins() {
        let mut session = MatchSession::new(120.0, 3);
        session.report_score(2);
        assert!(session.is_play_active());
        session.report_score(1);
        assert_eq!(session.phase(), MatchPhase::Won);
        // Late points after the match ends are ignored
        session.report_score(5);
        assert_eq!(session.score(), 3);
    }

    #[test]
    fn test_pause_freezes_clock() {
        let mut session = MatchSession::default();
        session.pause();
        session.tick(50.0);
        assert_eq!(session.time_remaining(), 120.0);
        session.resume();
        session.tick(0.5);
        assert_eq!(session.time_remaining(), 119.5);
    }

    #[test]
    fn test_huge_points_saturate() {
        let mut session = MatchSession::new(60.0, 10);
        session.add_score(5);
        session.add_score(u32::MAX);
        assert_eq!(session.score(), u32::MAX);
        assert_eq!(session.phase(), MatchPhase::Won);
    }

    #[test]
    fn test_labels() {
        let mut session = MatchSession::default();
        assert_eq!(session.timer_label(), "Time: 02:00");
        session.tick(45.5);
        assert_eq!(session.timer_label(), "Time: 01:14");
        session.add_score(4);
        assert_eq!(session.score_label(), "Fixed: 4/10");
        session.restart();
        assert_eq!(session.score(), 0);
    }
}
