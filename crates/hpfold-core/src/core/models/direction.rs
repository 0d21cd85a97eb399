use super::vector::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectionError {
    #[error("Invalid direction value: {0} (expected one of ±1, ±2, ±3)")]
    InvalidValue(i64),
    #[error("Could not parse direction from '{0}'")]
    Unparsable(String),
    #[error("Invalid dimensionality: {0} (expected 2 or 3)")]
    InvalidDimensionality(String),
}

/// A unit lattice step, encoded by the signed axis number it moves along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
#[repr(i8)]
pub enum Direction {
    Backward = -3,
    Down = -2,
    Left = -1,
    Right = 1,
    Up = 2,
    Forward = 3,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::Backward,
        Direction::Down,
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Forward,
    ];

    pub fn value(self) -> i8 {
        self as i8
    }

    pub fn reverse(self) -> Self {
        match self {
            Direction::Backward => Direction::Forward,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Up => Direction::Down,
            Direction::Forward => Direction::Backward,
        }
    }

    pub fn delta(self) -> Vec3 {
        match self {
            Direction::Backward => Vec3::new(0, 0, -1),
            Direction::Down => Vec3::new(0, -1, 0),
            Direction::Left => Vec3::new(-1, 0, 0),
            Direction::Right => Vec3::new(1, 0, 0),
            Direction::Up => Vec3::new(0, 1, 0),
            Direction::Forward => Vec3::new(0, 0, 1),
        }
    }

    /// Zero-based axis index: 0 for x, 1 for y, 2 for z.
    pub fn axis(self) -> usize {
        (self.value().unsigned_abs() - 1) as usize
    }
}

impl TryFrom<i8> for Direction {
    type Error = DirectionError;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -3 => Ok(Direction::Backward),
            -2 => Ok(Direction::Down),
            -1 => Ok(Direction::Left),
            1 => Ok(Direction::Right),
            2 => Ok(Direction::Up),
            3 => Ok(Direction::Forward),
            other => Err(DirectionError::InvalidValue(other as i64)),
        }
    }
}

impl From<Direction> for i8 {
    fn from(direction: Direction) -> Self {
        direction.value()
    }
}

impl FromStr for Direction {
    type Err = DirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let value: i64 = trimmed
            .parse()
            .map_err(|_| DirectionError::Unparsable(trimmed.to_string()))?;
        i8::try_from(value)
            .map_err(|_| DirectionError::InvalidValue(value))
            .and_then(Direction::try_from)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Parses an order written as integers separated by commas and/or whitespace.
pub fn parse_order(s: &str) -> Result<Vec<Direction>, DirectionError> {
    s.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(str::parse)
        .collect()
}

/// Formats an order as comma-separated integers, the inverse of [`parse_order`].
pub fn format_order(order: &[Direction]) -> String {
    order
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Dimensionality {
    #[default]
    Two,
    Three,
}

impl Dimensionality {
    const TWO_D: [Direction; 4] = [
        Direction::Down,
        Direction::Left,
        Direction::Right,
        Direction::Up,
    ];

    /// The direction set available on this lattice, in ascending value order.
    pub fn directions(self) -> &'static [Direction] {
        match self {
            Dimensionality::Two => &Self::TWO_D,
            Dimensionality::Three => &Direction::ALL,
        }
    }

    pub fn rank(self) -> u8 {
        match self {
            Dimensionality::Two => 2,
            Dimensionality::Three => 3,
        }
    }

    /// The smallest lattice an order fits on.
    pub fn of_order(order: &[Direction]) -> Self {
        if order.iter().any(|d| d.axis() == 2) {
            Dimensionality::Three
        } else {
            Dimensionality::Two
        }
    }
}

impl TryFrom<u8> for Dimensionality {
    type Error = DirectionError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(Dimensionality::Two),
            3 => Ok(Dimensionality::Three),
            other => Err(DirectionError::InvalidDimensionality(other.to_string())),
        }
    }
}

impl From<Dimensionality> for u8 {
    fn from(dimensions: Dimensionality) -> Self {
        dimensions.rank()
    }
}

impl FromStr for Dimensionality {
    type Err = DirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "2" | "2d" => Ok(Dimensionality::Two),
            "3" | "3d" => Ok(Dimensionality::Three),
            other => Err(DirectionError::InvalidDimensionality(other.to_string())),
        }
    }
}

impl fmt::Display for Dimensionality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}D", self.rank())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reverse_negates_value_and_delta() {
        for direction in Direction::ALL {
            assert_eq!(direction.reverse().value(), -direction.value());
            assert_eq!(direction.reverse().delta(), -direction.delta());
            assert_eq!(direction.reverse().reverse(), direction);
        }
    }

    #[test]
    fn deltas_are_unit_steps_on_the_matching_axis() {
        for direction in Direction::ALL {
            let delta = direction.delta();
            assert_eq!(delta.len_sq(), 1);
            let components = [delta.x, delta.y, delta.z];
            assert_ne!(components[direction.axis()], 0);
        }
        assert_eq!(Direction::Right.delta(), Vec3::new(1, 0, 0));
        assert_eq!(Direction::Up.delta(), Vec3::new(0, 1, 0));
        assert_eq!(Direction::Forward.delta(), Vec3::new(0, 0, 1));
    }

    #[test]
    fn integer_conversion_round_trips() {
        for direction in Direction::ALL {
            assert_eq!(Direction::try_from(direction.value()), Ok(direction));
        }
        assert_eq!(
            Direction::try_from(0),
            Err(DirectionError::InvalidValue(0))
        );
        assert_eq!(
            Direction::try_from(4),
            Err(DirectionError::InvalidValue(4))
        );
    }

    #[test]
    fn parse_order_accepts_commas_and_whitespace() {
        let order = parse_order("-1, 2 1,-3").unwrap();
        assert_eq!(
            order,
            vec![
                Direction::Left,
                Direction::Up,
                Direction::Right,
                Direction::Backward
            ]
        );
        assert_eq!(format_order(&order), "-1,2,1,-3");
    }

    #[test]
    fn parse_order_rejects_invalid_tokens() {
        assert!(matches!(
            parse_order("1,x"),
            Err(DirectionError::Unparsable(token)) if token == "x"
        ));
        assert_eq!(
            parse_order("1,200"),
            Err(DirectionError::InvalidValue(200))
        );
    }

    #[test]
    fn dimensionality_selects_direction_sets() {
        assert_eq!(Dimensionality::Two.directions().len(), 4);
        assert_eq!(Dimensionality::Three.directions().len(), 6);
        assert!(
            Dimensionality::Two
                .directions()
                .iter()
                .all(|d| d.axis() < 2)
        );
        assert_eq!(
            Dimensionality::of_order(&[Direction::Up, Direction::Left]),
            Dimensionality::Two
        );
        assert_eq!(
            Dimensionality::of_order(&[Direction::Up, Direction::Backward]),
            Dimensionality::Three
        );
        assert_eq!(Dimensionality::of_order(&[]), Dimensionality::Two);
    }

    #[test]
    fn dimensionality_parses_from_text() {
        assert_eq!("2".parse::<Dimensionality>(), Ok(Dimensionality::Two));
        assert_eq!("3D".parse::<Dimensionality>(), Ok(Dimensionality::Three));
        assert!("4".parse::<Dimensionality>().is_err());
        assert_eq!(Dimensionality::Three.to_string(), "3D");
    }
}
