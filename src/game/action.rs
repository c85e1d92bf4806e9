use super::vector::GridPos;

/// Axis-aligned direction the snake can move in
///
/// `Up`/`Down` travel along y, `Forward`/`Back` along z (forward is -z, away
/// from a viewer looking down the z axis).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    Forward,
    Back,
}

/// Coordinate axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
        Direction::Forward,
        Direction::Back,
    ];

    /// Returns true if turning from self to other would be a 180-degree turn
    pub fn is_opposite(&self, other: Direction) -> bool {
        self.axis() == other.axis() && *self != other
    }

    /// Returns the unit cell offset for moving in this direction
    pub fn delta(&self) -> GridPos {
        match self {
            Direction::Up => GridPos::new(0, 1, 0),
            Direction::Down => GridPos::new(0, -1, 0),
            Direction::Left => GridPos::new(-1, 0, 0),
            Direction::Right => GridPos::new(1, 0, 0),
            Direction::Forward => GridPos::new(0, 0, -1),
            Direction::Back => GridPos::new(0, 0, 1),
        }
    }

    pub fn axis(&self) -> Axis {
        match self {
            Direction::Left | Direction::Right => Axis::X,
            Direction::Up | Direction::Down => Axis::Y,
            Direction::Forward | Direction::Back => Axis::Z,
        }
    }

    /// Whether the direction stays on the x/y plane
    pub fn is_planar(&self) -> bool {
        self.axis() != Axis::Z
    }

    /// Parse a unit axis vector; anything else is not a direction
    pub fn from_vector(v: GridPos) -> Option<Direction> {
        Direction::ALL.into_iter().find(|d| d.delta() == v)
    }
}
