//! Turn phases and steps

use serde::{Deserialize, Serialize};
use std::fmt;

/// Major phases of a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Beginning,
    Main1,
    Combat,
    Main2,
    Ending,
}

/// Specific steps within phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Step {
    // Beginning Phase
    Untap,
    Upkeep,
    Draw,

    // Both main phases
    Main,

    // Combat Phase
    BeginCombat,
    DeclareAttackers,
    DeclareBlockers,
    CombatDamage,
    EndCombat,

    // Ending Phase
    EndStep,
    Cleanup,
}

impl Phase {
    /// Phases in turn order
    pub const ORDER: [Phase; 5] = [
        Phase::Beginning,
        Phase::Main1,
        Phase::Combat,
        Phase::Main2,
        Phase::Ending,
    ];

    /// The fixed step sequence of this phase
    pub fn steps(&self) -> &'static [Step] {
        match self {
            Phase::Beginning => &[Step::Untap, Step::Upkeep, Step::Draw],
            Phase::Main1 | Phase::Main2 => &[Step::Main],
            Phase::Combat => &[
                Step::BeginCombat,
                Step::DeclareAttackers,
                Step::DeclareBlockers,
                Step::CombatDamage,
                Step::EndCombat,
            ],
            Phase::Ending => &[Step::EndStep, Step::Cleanup],
        }
    }

    pub fn first_step(&self) -> Step {
        self.steps()[0]
    }

    /// The following phase, `None` after Ending
    pub fn next(&self) -> Option<Phase> {
        match self {
            Phase::Beginning => Some(Phase::Main1),
            Phase::Main1 => Some(Phase::Combat),
            Phase::Combat => Some(Phase::Main2),
            Phase::Main2 => Some(Phase::Ending),
            Phase::Ending => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Phase::Beginning => "Beginning",
            Phase::Main1 => "Main 1",
            Phase::Combat => "Combat",
            Phase::Main2 => "Main 2",
            Phase::Ending => "Ending",
        }
    }
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::Untap => "Untap",
            Step::Upkeep => "Upkeep",
            Step::Draw => "Draw",
            Step::Main => "Main",
            Step::BeginCombat => "Beginning of Combat",
            Step::DeclareAttackers => "Declare Attackers",
            Step::DeclareBlockers => "Declare Blockers",
            Step::CombatDamage => "Combat Damage",
            Step::EndCombat => "End of Combat",
            Step::EndStep => "End",
            Step::Cleanup => "Cleanup",
        }
    }
}

/// The current (phase, step) pair
///
/// Every transition is total: there is no invalid state and nothing is ever rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TurnPhase {
    pub phase: Phase,
    pub step: Step,
}

impl TurnPhase {
    /// Start of turn: (Beginning, Untap)
    pub const START: TurnPhase = TurnPhase {
        phase: Phase::Beginning,
        step: Step::Untap,
    };

    /// (Ending, End step)
    pub const END: TurnPhase = TurnPhase {
        phase: Phase::Ending,
        step: Step::EndStep,
    };

    pub fn new() -> Self {
        Self::START
    }

    /// Every (phase, step) pair of one turn, in order
    pub fn cycle() -> impl Iterator<Item = TurnPhase> {
        Phase::ORDER.into_iter().flat_map(|phase| {
            phase
                .steps()
                .iter()
                .map(move |&step| TurnPhase { phase, step })
        })
    }

    /// Advance to the next step, rolling into the next phase and wrapping after Cleanup
    pub fn advance_step(&mut self) {
        let steps = self.phase.steps();
        let next_in_phase = steps
            .iter()
            .position(|&s| s == self.step)
            .and_then(|idx| steps.get(idx + 1))
            .copied();

        *self = match (next_in_phase, self.phase.next()) {
            (Some(step), _) => TurnPhase {
                phase: self.phase,
                step,
            },
            (None, Some(phase)) => TurnPhase {
                phase,
                step: phase.first_step(),
            },
            (None, None) => Self::START,
        };
    }

    /// Jump straight to the end step
    pub fn skip_to_end(&mut self) {
        *self = Self::END;
    }

    /// Reset to the start of a new turn
    pub fn pass_to_next_turn(&mut self) {
        *self = Self::START;
    }

    pub fn is_turn_start(&self) -> bool {
        *self == Self::START
    }
}

impl Default for TurnPhase {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TurnPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.phase.name(), self.step.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let turn = TurnPhase::new();
        assert_eq!(turn.phase, Phase::Beginning);
        assert_eq!(turn.step, Step::Untap);
        assert!(turn.is_turn_start());
    }

    #[test]
    fn test_three_advances_reach_main_one() {
        let mut turn = TurnPhase::new();
        for _ in 0..3 {
            turn.advance_step();
        }
        assert_eq!(
            turn,
            TurnPhase {
                phase: Phase::Main1,
                step: Step::Main
            }
        );
    }

    #[test]
    fn test_cycle_covers_every_pair_once() {
        let cycle: Vec<_> = TurnPhase::cycle().collect();
        assert_eq!(cycle.len(), 12);
        assert_eq!(cycle[0], TurnPhase::START);
        assert_eq!(cycle[cycle.len() - 1].step, Step::Cleanup);

        let mut turn = TurnPhase::new();
        for expected in &cycle {
            assert_eq!(&turn, expected);
            turn.advance_step();
        }
        assert_eq!(turn, TurnPhase::START);
    }

    #[test]
    fn test_main_step_in_both_main_phases() {
        let mut turn = TurnPhase {
            phase: Phase::Main2,
            step: Step::Main,
        };
        turn.advance_step();
        assert_eq!(turn, TurnPhase::END);
    }

    #[test]
    fn test_skip_and_pass() {
        let mut turn = TurnPhase::new();
        turn.advance_step();
        turn.skip_to_end();
        assert_eq!(turn, TurnPhase::END);

        turn.advance_step();
        assert_eq!(turn.step, Step::Cleanup);
        turn.pass_to_next_turn();
        assert!(turn.is_turn_start());
    }

    #[test]
    fn test_display() {
        assert_eq!(TurnPhase::START.to_string(), "Beginning / Untap");
        assert_eq!(Phase::Combat.first_step(), Step::BeginCombat);
    }
}
