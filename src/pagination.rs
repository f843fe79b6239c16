// ABOUTME: Pagination controller for the cardpost application
// ABOUTME: Tracks which card is on screen and derives navigation state from it

use crate::preview::SectionFlags;
use log::debug;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Prev,
    Next,
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "prev" | "previous" => Ok(Direction::Prev),
            "next" => Ok(Direction::Next),
            other => Err(format!("Unknown direction: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaginationState {
    #[default]
    Empty,
    Viewing(usize),
}

/// Navigation controls derived from the pagination state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavState {
    pub current: usize,
    pub count: usize,
    pub prev_disabled: bool,
    pub next_disabled: bool,
    pub indicator: String,
}

impl fmt::Display for NavState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.indicator)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Paginator {
    state: PaginationState,
    count: usize,
}

impl Paginator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PaginationState {
        self.state
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn current(&self) -> Option<usize> {
        match self.state {
            PaginationState::Empty => None,
            PaginationState::Viewing(i) => Some(i),
        }
    }

    /// Start over on a freshly split document
    pub fn reset(&mut self, count: usize) {
        self.count = count;
        self.state = if count == 0 {
            PaginationState::Empty
        } else {
            PaginationState::Viewing(0)
        };
        debug!("Pagination reset to {:?} of {}", self.state, count);
    }

    /// Move one card; a move past either end leaves the state as it is.
    /// Returns true when the current card changed.
    pub fn navigate(&mut self, direction: Direction) -> bool {
        let PaginationState::Viewing(i) = self.state else {
            return false;
        };
        let next = match direction {
            Direction::Prev if i > 0 => i - 1,
            Direction::Next if i + 1 < self.count => i + 1,
            _ => return false,
        };
        self.state = PaginationState::Viewing(next);
        true
    }

    /// Jump straight to a card, clamped to the last one
    pub fn go_to(&mut self, index: usize) {
        if self.count > 0 {
            self.state = PaginationState::Viewing(index.min(self.count - 1));
        }
    }

    pub fn nav_state(&self) -> NavState {
        match self.state {
            PaginationState::Empty => NavState {
                current: 0,
                count: 0,
                prev_disabled: true,
                next_disabled: true,
                indicator: "0/0".to_string(),
            },
            PaginationState::Viewing(i) => NavState {
                current: i,
                count: self.count,
                prev_disabled: i == 0,
                next_disabled: i + 1 >= self.count,
                indicator: format!("{}/{}", i + 1, self.count),
            },
        }
    }

    /// Mark exactly the current section active
    pub fn apply(&self, flags: &mut [SectionFlags]) {
        let current = self.current();
        for (i, flag) in flags.iter_mut().enumerate() {
            flag.active = Some(i) == current;
        }
    }
}
