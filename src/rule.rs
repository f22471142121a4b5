use ca_rules::ParseLife;
use std::fmt::{Debug, Formatter, Result as DebugResult};

/// A totalistic Life-like rule.
///
/// `rule_table[(state << 4) | count]` is the next state of a cell
/// in state `state` with `count` live neighbors.
#[derive(Clone, PartialEq, Eq)]
pub(crate) struct Rule {
    rule_table: [u8; 1 << 5],
}

impl Debug for Rule {
    fn fmt(&self, f: &mut Formatter<'_>) -> DebugResult {
        let b = (0..=8).filter(|&n| self.next_state(0, n) == 1);
        let s = (0..=8).filter(|&n| self.next_state(1, n) == 1);
        f.debug_struct("Rule")
            .field("b", &b.collect::<Vec<_>>())
            .field("s", &s.collect::<Vec<_>>())
            .finish()
    }
}

impl Rule {
    /// Conway's Game of Life, B3/S23.
    pub(crate) fn conway() -> Self {
        Rule::from_bs(vec![3], vec![2, 3])
    }

    pub(crate) const fn next_state(&self, state: u8, count: u8) -> u8 {
        self.rule_table[((state as usize) << 4) | count as usize]
    }
}

impl Default for Rule {
    fn default() -> Self {
        Rule::conway()
    }
}

impl ParseLife for Rule {
    fn from_bs(b: Vec<u8>, s: Vec<u8>) -> Self {
        let mut rule_table = [0; 1 << 5];
        b.into_iter()
            .map(|n| n as usize)
            .chain(s.into_iter().map(|n| 0x10 | n as usize))
            .for_each(|n| rule_table[n] = 1);
        Rule { rule_table }
    }
}
