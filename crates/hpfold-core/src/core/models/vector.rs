use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// An integer lattice point or displacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Vec3 {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0, 0, 0);

    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub fn abs(self) -> Self {
        Self::new(self.x.abs(), self.y.abs(), self.z.abs())
    }

    pub fn abs_diff(self, other: Self) -> Self {
        (self - other).abs()
    }

    pub fn len_sq(self) -> i64 {
        let (x, y, z) = (self.x as i64, self.y as i64, self.z as i64);
        x * x + y * y + z * z
    }

    pub fn eq_components(self, other: Self) -> (bool, bool, bool) {
        (self.x == other.x, self.y == other.y, self.z == other.z)
    }

    pub fn sum_components(self) -> i32 {
        self.x + self.y + self.z
    }

    pub fn manhattan(self, other: Self) -> i32 {
        self.abs_diff(other).sum_components()
    }

    pub fn is_lattice_neighbour(self, other: Self) -> bool {
        self.manhattan(other) == 1
    }

    /// Area spanned by this vector read as a bounding-box delta (`x * y`).
    pub fn area(self) -> i64 {
        self.x as i64 * self.y as i64
    }

    /// Volume spanned by this vector read as a bounding-box delta (`x * y * z`).
    pub fn volume(self) -> i64 {
        self.area() * self.z as i64
    }

    pub fn component_min(self, other: Self) -> Self {
        Self::new(
            self.x.min(other.x),
            self.y.min(other.y),
            self.z.min(other.z),
        )
    }

    pub fn component_max(self, other: Self) -> Self {
        Self::new(
            self.x.max(other.x),
            self.y.max(other.y),
            self.z.max(other.z),
        )
    }
}

/// Returns the lower and upper corners of the axis-aligned box enclosing `points`.
pub fn bounding_box<I>(points: I) -> Option<(Vec3, Vec3)>
where
    I: IntoIterator<Item = Vec3>,
{
    points.into_iter().fold(None, |acc, p| match acc {
        None => Some((p, p)),
        Some((lo, hi)) => Some((lo.component_min(p), hi.component_max(p))),
    })
}

/// Per-axis extent (upper corner minus lower corner) of the points, zero when empty.
pub fn extent<I>(points: I) -> Vec3
where
    I: IntoIterator<Item = Vec3>,
{
    bounding_box(points)
        .map(|(lo, hi)| hi - lo)
        .unwrap_or_default()
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Vec3) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl SubAssign for Vec3 {
    fn sub_assign(&mut self, rhs: Vec3) {
        self.x -= rhs.x;
        self.y -= rhs.y;
        self.z -= rhs.z;
    }
}

impl Neg for Vec3 {
    type Output = Vec3;

    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}
