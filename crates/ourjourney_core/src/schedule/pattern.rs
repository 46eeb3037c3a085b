//! Fixed 14-day custody pattern.
//!
//! Week 1 is spelled out; week 2 is its inversion, so whoever has a given
//! day in week 1 never has it in week 2.

use crate::model::custody::Party;

/// Pattern entry for one position of a cycle week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayPattern {
    pub custody: Party,
    /// `(dropoff, pickup)` for split days, `None` for whole overnight days.
    pub exchange: Option<(Party, Party)>,
}

impl DayPattern {
    const fn overnight(custody: Party) -> Self {
        Self {
            custody,
            exchange: None,
        }
    }

    const fn split(custody: Party, dropoff: Party, pickup: Party) -> Self {
        Self {
            custody,
            exchange: Some((dropoff, pickup)),
        }
    }

    /// Swaps every party in this entry.
    pub fn inverted(self) -> Self {
        Self {
            custody: self.custody.other(),
            exchange: self
                .exchange
                .map(|(dropoff, pickup)| (dropoff.other(), pickup.other())),
        }
    }

    pub fn is_overnight(self) -> bool {
        self.exchange.is_none()
    }

    /// `(from, to)` when custody changes hands during the day.
    pub fn handoff(self) -> Option<(Party, Party)> {
        self.exchange.filter(|(dropoff, pickup)| dropoff != pickup)
    }
}

// Index 0 is the epoch weekday (Sunday).
const WEEK_ONE: [DayPattern; 7] = [
    DayPattern::overnight(Party::You),
    DayPattern::split(Party::Mom, Party::You, Party::Mom),
    DayPattern::split(Party::Mom, Party::Mom, Party::Mom),
    DayPattern::split(Party::You, Party::Mom, Party::You),
    DayPattern::split(Party::You, Party::You, Party::You),
    DayPattern::split(Party::Mom, Party::You, Party::Mom),
    DayPattern::overnight(Party::Mom),
];

/// Looks up the pattern for a cycle position in `0..14`.
pub(crate) fn pattern_at(cycle_position: u8) -> DayPattern {
    let entry = WEEK_ONE[usize::from(cycle_position % 7)];
    if cycle_position < 7 {
        entry
    } else {
        entry.inverted()
    }
}

#[cfg(test)]
mod tests {
    use super::{pattern_at, Party};

    #[test]
    fn week_two_inverts_week_one() {
        for position in 0..7u8 {
            let first = pattern_at(position);
            let second = pattern_at(position + 7);
            assert_ne!(first.custody, second.custody, "position {position}");
            assert_eq!(first.is_overnight(), second.is_overnight());
            assert_eq!(
                second.handoff(),
                first
                    .handoff()
                    .map(|(from, to)| (from.other(), to.other()))
            );
        }
    }

    #[test]
    fn week_two_matches_expected_holders() {
        let holders = (7..14u8).map(|p| pattern_at(p).custody).collect::<Vec<_>>();
        assert_eq!(
            holders,
            vec![
                Party::Mom,
                Party::You,
                Party::You,
                Party::Mom,
                Party::Mom,
                Party::You,
                Party::You,
            ]
        );
    }

    #[test]
    fn same_party_exchange_is_not_a_handoff() {
        // Tuesday of week 1: mom drops off and picks up.
        assert_eq!(pattern_at(2).handoff(), None);
        assert_eq!(pattern_at(1).handoff(), Some((Party::You, Party::Mom)));
        assert_eq!(pattern_at(8).handoff(), Some((Party::Mom, Party::You)));
    }
}
