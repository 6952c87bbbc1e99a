/// Heading of the snake, listed in clockwise order starting from Right
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Right,
    Down,
    Left,
    Up,
}

impl Direction {
    /// All headings in clockwise order
    pub const CLOCKWISE: [Direction; 4] = [
        Direction::Right,
        Direction::Down,
        Direction::Left,
        Direction::Up,
    ];

    /// Position of this heading in the clockwise ordering
    pub fn clockwise_index(&self) -> usize {
        match self {
            Direction::Right => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Up => 3,
        }
    }

    /// Heading after a 90-degree clockwise rotation
    pub fn clockwise(&self) -> Direction {
        Self::CLOCKWISE[(self.clockwise_index() + 1) % 4]
    }

    /// Heading after a 90-degree counter-clockwise rotation
    pub fn counter_clockwise(&self) -> Direction {
        Self::CLOCKWISE[(self.clockwise_index() + 3) % 4]
    }

    /// Returns the delta (dx, dy) for moving in this direction
    ///
    /// The y axis grows downwards.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Action relative to the snake's current heading
///
/// The discrete encoding used by the agent is 0 = straight, 1 = turn right
/// (clockwise), 2 = turn left (counter-clockwise).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelativeAction {
    Straight,
    TurnRight,
    TurnLeft,
}

impl RelativeAction {
    /// Number of discrete actions
    pub const COUNT: usize = 3;

    /// Decode a discrete action index
    ///
    /// Returns `None` for indices outside `0..3`.
    pub fn from_index(idx: usize) -> Option<Self> {
        match idx {
            0 => Some(RelativeAction::Straight),
            1 => Some(RelativeAction::TurnRight),
            2 => Some(RelativeAction::TurnLeft),
            _ => None,
        }
    }

    /// Discrete index of this action
    pub fn index(&self) -> usize {
        match self {
            RelativeAction::Straight => 0,
            RelativeAction::TurnRight => 1,
            RelativeAction::TurnLeft => 2,
        }
    }

    /// Heading that results from applying this action to `heading`
    pub fn apply(&self, heading: Direction) -> Direction {
        match self {
            RelativeAction::Straight => heading,
            RelativeAction::TurnRight => heading.clockwise(),
            RelativeAction::TurnLeft => heading.counter_clockwise(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_straight_keeps_heading() {
        for heading in Direction::CLOCKWISE {
            assert_eq!(RelativeAction::Straight.apply(heading), heading);
        }
    }

    #[test]
    fn test_clockwise_rotation() {
        assert_eq!(Direction::Right.clockwise(), Direction::Down);
        assert_eq!(Direction::Down.clockwise(), Direction::Left);
        assert_eq!(Direction::Left.clockwise(), Direction::Up);
        assert_eq!(Direction::Up.clockwise(), Direction::Right);
    }

    #[test]
    fn test_counter_clockwise_rotation() {
        assert_eq!(Direction::Right.counter_clockwise(), Direction::Up);
        assert_eq!(Direction::Up.counter_clockwise(), Direction::Left);
        assert_eq!(Direction::Left.counter_clockwise(), Direction::Down);
        assert_eq!(Direction::Down.counter_clockwise(), Direction::Right);
    }

    #[test]
    fn test_turns_are_inverse() {
        for heading in Direction::CLOCKWISE {
            let turned = RelativeAction::TurnRight.apply(heading);
            assert_eq!(RelativeAction::TurnLeft.apply(turned), heading);
        }
    }

    #[test]
    fn test_direction_delta() {
        assert_eq!(Direction::Up.delta(), (0, -1));
        assert_eq!(Direction::Down.delta(), (0, 1));
        assert_eq!(Direction::Left.delta(), (-1, 0));
        assert_eq!(Direction::Right.delta(), (1, 0));
    }

    #[test]
    fn test_action_index_mapping() {
        for idx in 0..RelativeAction::COUNT {
            let action = RelativeAction::from_index(idx).unwrap();
            assert_eq!(action.index(), idx);
        }
        assert_eq!(RelativeAction::from_index(3), None);
    }
}
