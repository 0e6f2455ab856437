//! Core geometry types: Point, Size, Padding, Rectangle.
//!
//! These are the pixel-space value types used throughout gadgetry for placing,
//! sizing and insetting gadgets. Every type carries an explicit *is-set* flag:
//! `Default` produces an unset value, while every constructor produces a set
//! one. Zero is a perfectly valid layout value, so "unset" and "zero" must stay
//! distinguishable.
//!
//! Equality, hashing and ordering only look at the coordinate fields, compared
//! lexicographically in declaration order. The flag is metadata.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Sub};

// ---------------------------------------------------------------------------
// Point
// ---------------------------------------------------------------------------

/// A position in pixels.
#[derive(Copy, Clone, Debug, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
    set: bool,
}

impl Point {
    /// Create a new, set point.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y, set: true }
    }

    /// The origin, explicitly set.
    #[inline]
    pub const fn zero() -> Self {
        Self::new(0, 0)
    }

    /// Whether this point has been assigned a concrete value.
    #[inline]
    pub const fn is_set(self) -> bool {
        self.set
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        (self.x, self.y) == (other.x, other.y)
    }
}

impl Eq for Point {}

impl Hash for Point {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.x, self.y).hash(state);
    }
}

impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Point {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.x, self.y).cmp(&(other.x, other.y))
    }
}

impl Add for Point {
    type Output = Point;
    #[inline]
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    #[inline]
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Translate a point by a size.
impl Add<Size> for Point {
    type Output = Point;
    #[inline]
    fn add(self, rhs: Size) -> Point {
        Point::new(self.x + rhs.width, self.y + rhs.height)
    }
}

impl Sub<Size> for Point {
    type Output = Point;
    #[inline]
    fn sub(self, rhs: Size) -> Point {
        Point::new(self.x - rhs.width, self.y - rhs.height)
    }
}

// ---------------------------------------------------------------------------
// Size
// ---------------------------------------------------------------------------

/// A non-negative extent in pixels.
#[derive(Copy, Clone, Debug, Default)]
pub struct Size {
    pub width: i32,
    pub height: i32,
    set: bool,
}

impl Size {
    /// Create a new, set size. Negative components are clamped to zero.
    #[inline]
    pub const fn new(width: i32, height: i32) -> Self {
        Self {
            width: if width > 0 { width } else { 0 },
            height: if height > 0 { height } else { 0 },
            set: true,
        }
    }

    /// A zero size, explicitly set.
    #[inline]
    pub const fn zero() -> Self {
        Self::new(0, 0)
    }

    /// Whether this size has been assigned a concrete value.
    #[inline]
    pub const fn is_set(self) -> bool {
        self.set
    }

    /// Whether either dimension is zero.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Total area (width * height).
    #[inline]
    pub const fn area(self) -> i32 {
        self.width * self.height
    }

    /// Swap width and height.
    #[inline]
    pub const fn transpose(self) -> Size {
        Size::new(self.height, self.width)
    }

    /// Component-wise minimum.
    #[inline]
    pub fn component_min(self, other: Size) -> Size {
        Size::new(self.width.min(other.width), self.height.min(other.height))
    }

    /// Component-wise maximum.
    #[inline]
    pub fn component_max(self, other: Size) -> Size {
        Size::new(self.width.max(other.width), self.height.max(other.height))
    }

    /// Whether this size exceeds `other` on either axis.
    #[inline]
    pub const fn exceeds(self, other: Size) -> bool {
        self.width > other.width || self.height > other.height
    }
}

impl PartialEq for Size {
    fn eq(&self, other: &Self) -> bool {
        (self.width, self.height) == (other.width, other.height)
    }
}

impl Eq for Size {}

impl Hash for Size {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.width, self.height).hash(state);
    }
}

impl PartialOrd for Size {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Size {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.width, self.height).cmp(&(other.width, other.height))
    }
}

impl Add for Size {
    type Output = Size;
    #[inline]
    fn add(self, rhs: Size) -> Size {
        Size::new(self.width + rhs.width, self.height + rhs.height)
    }
}

/// Subtraction saturates at zero on each axis.
impl Sub for Size {
    type Output = Size;
    #[inline]
    fn sub(self, rhs: Size) -> Size {
        Size::new(self.width - rhs.width, self.height - rhs.height)
    }
}

/// Grow a size by the total horizontal and vertical extent of a padding.
impl Add<Padding> for Size {
    type Output = Size;
    #[inline]
    fn add(self, rhs: Padding) -> Size {
        Size::new(self.width + rhs.width(), self.height + rhs.height())
    }
}

impl Sub<Padding> for Size {
    type Output = Size;
    #[inline]
    fn sub(self, rhs: Padding) -> Size {
        Size::new(self.width - rhs.width(), self.height - rhs.height())
    }
}

// ---------------------------------------------------------------------------
// Padding
// ---------------------------------------------------------------------------

/// Insets on the four sides of a rectangle.
#[derive(Copy, Clone, Debug, Default)]
pub struct Padding {
    pub top: i32,
    pub bottom: i32,
    pub left: i32,
    pub right: i32,
    set: bool,
}

impl Padding {
    /// Create padding with explicit values for each side.
    #[inline]
    pub const fn new(top: i32, bottom: i32, left: i32, right: i32) -> Self {
        Self { top, bottom, left, right, set: true }
    }

    /// Zero padding, explicitly set.
    #[inline]
    pub const fn zero() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// All four sides set to the same value.
    #[inline]
    pub const fn all(value: i32) -> Self {
        Self::new(value, value, value, value)
    }

    /// Symmetric padding: `vertical` for top/bottom, `horizontal` for left/right.
    #[inline]
    pub const fn symmetric(vertical: i32, horizontal: i32) -> Self {
        Self::new(vertical, vertical, horizontal, horizontal)
    }

    /// Whether this padding has been assigned a concrete value.
    #[inline]
    pub const fn is_set(self) -> bool {
        self.set
    }

    /// Total horizontal extent: `left + right`.
    #[inline]
    pub const fn width(self) -> i32 {
        self.left + self.right
    }

    /// Total vertical extent: `top + bottom`.
    #[inline]
    pub const fn height(self) -> i32 {
        self.top + self.bottom
    }

    /// The top-left inset as a point.
    #[inline]
    pub const fn origin(self) -> Point {
        Point::new(self.left, self.top)
    }
}

impl PartialEq for Padding {
    fn eq(&self, other: &Self) -> bool {
        (self.top, self.bottom, self.left, self.right)
            == (other.top, other.bottom, other.left, other.right)
    }
}

impl Eq for Padding {}

impl Hash for Padding {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.top, self.bottom, self.left, self.right).hash(state);
    }
}

impl PartialOrd for Padding {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Padding {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.top, self.bottom, self.left, self.right)
            .cmp(&(other.top, other.bottom, other.left, other.right))
    }
}

impl Add for Padding {
    type Output = Padding;
    #[inline]
    fn add(self, rhs: Padding) -> Padding {
        Padding::new(
            self.top + rhs.top,
            self.bottom + rhs.bottom,
            self.left + rhs.left,
            self.right + rhs.right,
        )
    }
}

// ---------------------------------------------------------------------------
// Rectangle
// ---------------------------------------------------------------------------

/// A rectangle defined by its top-left point and size.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rectangle {
    pub point: Point,
    pub size: Size,
}

impl Rectangle {
    /// Create a rectangle from a point and a size.
    #[inline]
    pub const fn new(point: Point, size: Size) -> Self {
        Self { point, size }
    }

    /// Shorthand for `Rectangle::new(Point::new(x, y), Size::new(w, h))`.
    #[inline]
    pub const fn from_xywh(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::new(Point::new(x, y), Size::new(width, height))
    }

    /// A rectangle of the given size at the origin.
    #[inline]
    pub const fn from_size(size: Size) -> Self {
        Self::new(Point::zero(), size)
    }

    /// The explicit empty rectangle: zero size at the origin.
    #[inline]
    pub const fn empty() -> Self {
        Self::new(Point::zero(), Size::zero())
    }

    /// Whether both point and size have been assigned.
    #[inline]
    pub const fn is_set(self) -> bool {
        self.point.is_set() && self.size.is_set()
    }

    /// Whether the rectangle covers no pixels.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.size.is_empty()
    }

    /// The right edge (exclusive).
    #[inline]
    pub const fn right(self) -> i32 {
        self.point.x + self.size.width
    }

    /// The bottom edge (exclusive).
    #[inline]
    pub const fn bottom(self) -> i32 {
        self.point.y + self.size.height
    }

    /// Whether `p` lies inside this rectangle.
    #[inline]
    pub const fn contains_point(self, p: Point) -> bool {
        p.x >= self.point.x && p.x < self.right() && p.y >= self.point.y && p.y < self.bottom()
    }

    /// Whether `other` lies entirely inside this rectangle.
    #[inline]
    pub const fn contains_rectangle(self, other: Rectangle) -> bool {
        other.point.x >= self.point.x
            && other.point.y >= self.point.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Compute the intersection of two rectangles.
    ///
    /// Returns [`Rectangle::empty`] if they do not overlap.
    pub fn intersection(self, other: Rectangle) -> Rectangle {
        let x1 = self.point.x.max(other.point.x);
        let y1 = self.point.y.max(other.point.y);
        let x2 = self.right().min(other.right());
        let y2 = self.bottom().min(other.bottom());

        if x2 <= x1 || y2 <= y1 {
            Rectangle::empty()
        } else {
            Rectangle::from_xywh(x1, y1, x2 - x1, y2 - y1)
        }
    }

    /// Move the rectangle by a point offset.
    #[inline]
    pub fn translate(self, offset: Point) -> Rectangle {
        Rectangle::new(self.point + offset, self.size)
    }

    /// Expand outward by the given padding.
    #[inline]
    pub fn grow(self, padding: Padding) -> Rectangle {
        Rectangle::new(
            Point::new(self.point.x - padding.left, self.point.y - padding.top),
            self.size + padding,
        )
    }

    /// Contract inward by the given padding. The size is clamped at zero.
    #[inline]
    pub fn shrink(self, padding: Padding) -> Rectangle {
        Rectangle::new(self.point + padding.origin(), self.size - padding)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
