//! Deterministic Q16.16 fixed-point arithmetic.
//!
//! Every numeric quantity that participates in the simulation is stored as a
//! [`Fixed`] value. All operations are pure integer computations performed in
//! 64-bit intermediates and narrowed back to 32 bits with saturation, so the
//! results are identical on every platform. Multiplication and division use
//! arithmetic shifts and integer division as their single rounding rule.
//!
//! Turret balance tables are authored in a coarser Q14 scale
//! (`16_384 == 1.0`). [`Fixed::from_q14`] and [`Fixed::to_q14`] are the only
//! conversion points between the two scales.

use std::{
    fmt,
    ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign},
};

use serde::{Deserialize, Serialize};

/// Number of fractional bits carried by [`Fixed`].
pub const FRACTION_BITS: u32 = 16;

/// Number of fractional bits carried by the alternate turret table scale.
pub const Q14_FRACTION_BITS: u32 = 14;

/// Raw value representing `1.0` in the alternate turret table scale.
pub const Q14_ONE: i32 = 1 << Q14_FRACTION_BITS;

const SCALE_SHIFT: u32 = FRACTION_BITS - Q14_FRACTION_BITS;

/// Signed Q16.16 fixed-point number.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Fixed(i32);

impl Fixed {
    /// The value `0.0`.
    pub const ZERO: Self = Self(0);
    /// The value `1.0`.
    pub const ONE: Self = Self(1 << FRACTION_BITS);
    /// The value `0.5`.
    pub const HALF: Self = Self(1 << (FRACTION_BITS - 1));
    /// Largest representable value.
    pub const MAX: Self = Self(i32::MAX);
    /// Smallest representable value.
    pub const MIN: Self = Self(i32::MIN);

    /// Wraps a raw Q16.16 integer.
    #[must_use]
    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    /// Raw Q16.16 integer backing the value.
    #[must_use]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Converts a whole number, saturating when it exceeds the representable range.
    #[must_use]
    pub const fn from_int(value: i32) -> Self {
        saturate((value as i64) << FRACTION_BITS)
    }

    /// Builds `numerator / denominator` without touching floating point.
    ///
    /// A zero denominator follows the same saturation rule as [`Fixed::div`].
    #[must_use]
    pub const fn from_ratio(numerator: i32, denominator: i32) -> Self {
        if denominator == 0 {
            return if numerator >= 0 { Self::MAX } else { Self::MIN };
        }
        saturate(((numerator as i64) << FRACTION_BITS) / denominator as i64)
    }

    /// Converts basis points (`10_000 == 1.0`).
    #[must_use]
    pub const fn from_bps(bps: i32) -> Self {
        Self::from_ratio(bps, 10_000)
    }

    /// Converts a raw value expressed in the Q14 turret table scale.
    #[must_use]
    pub const fn from_q14(raw: i32) -> Self {
        saturate((raw as i64) << SCALE_SHIFT)
    }

    /// Converts to the Q14 turret table scale, truncating the two lowest bits.
    #[must_use]
    pub const fn to_q14(self) -> i32 {
        self.0 >> SCALE_SHIFT
    }

    /// Integer part of the value, rounded toward negative infinity.
    #[must_use]
    pub const fn to_int(self) -> i32 {
        self.0 >> FRACTION_BITS
    }

    /// Integer part of the value clamped into the `u32` range.
    #[must_use]
    pub const fn to_ticks(self) -> u32 {
        if self.0 <= 0 {
            0
        } else {
            (self.0 >> FRACTION_BITS) as u32
        }
    }

    /// Reports whether the value equals zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Reports whether the value is strictly greater than zero.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Reports whether the value is strictly below zero.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Absolute value, saturating at [`Fixed::MAX`].
    #[must_use]
    pub const fn abs(self) -> Self {
        Self(self.0.saturating_abs())
    }

    /// Fixed-point multiplication: `(a * b) >> 16` in 64-bit precision.
    #[must_use]
    pub const fn mul(self, rhs: Self) -> Self {
        saturate((self.0 as i64 * rhs.0 as i64) >> FRACTION_BITS)
    }

    /// Fixed-point division: `(a << 16) / b` in 64-bit precision.
    ///
    /// Division by zero saturates to [`Fixed::MAX`] for non-negative
    /// numerators and [`Fixed::MIN`] otherwise.
    #[must_use]
    pub const fn div(self, rhs: Self) -> Self {
        if rhs.0 == 0 {
            return if self.0 >= 0 { Self::MAX } else { Self::MIN };
        }
        saturate(((self.0 as i64) << FRACTION_BITS) / rhs.0 as i64)
    }

    /// Square root computed with integer Newton iteration on the raw value.
    ///
    /// The integer root of the raw value is scaled by `2^8`, which keeps the
    /// result in Q16.16 at a resolution of `1/256`. Non-positive inputs yield
    /// zero.
    #[must_use]
    pub const fn sqrt(self) -> Self {
        if self.0 <= 0 {
            return Self::ZERO;
        }
        let value = self.0 as i64;
        let mut x = value;
        let mut y = (x + 1) >> 1;
        while y < x {
            x = y;
            y = (x + value / x) >> 1;
        }
        saturate(x << (FRACTION_BITS / 2))
    }

    /// Saturating addition.
    #[must_use]
    pub const fn saturating_add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }

    /// Saturating subtraction.
    #[must_use]
    pub const fn saturating_sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }

    /// Multiplies by a whole number with saturation.
    #[must_use]
    pub const fn mul_int(self, rhs: i32) -> Self {
        saturate(self.0 as i64 * rhs as i64)
    }

    /// Divides by a whole number, truncating toward zero.
    #[must_use]
    pub const fn div_int(self, rhs: i32) -> Self {
        if rhs == 0 {
            return if self.0 >= 0 { Self::MAX } else { Self::MIN };
        }
        saturate(self.0 as i64 / rhs as i64)
    }

    /// `1 + self`, the form used by bonus multipliers.
    #[must_use]
    pub const fn one_plus(self) -> Self {
        Self::ONE.saturating_add(self)
    }

    /// `1 - self`, the form used by penalties and slows.
    #[must_use]
    pub const fn one_minus(self) -> Self {
        Self::ONE.saturating_sub(self)
    }
}

const fn saturate(value: i64) -> Fixed {
    if value > i32::MAX as i64 {
        Fixed(i32::MAX)
    } else if value < i32::MIN as i64 {
        Fixed(i32::MIN)
    } else {
        Fixed(value as i32)
    }
}

impl Add for Fixed {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.saturating_add(rhs)
    }
}

impl AddAssign for Fixed {
    fn add_assign(&mut self, rhs: Self) {
        *self = self.saturating_add(rhs);
    }
}

impl Sub for Fixed {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self.saturating_sub(rhs)
    }
}

impl SubAssign for Fixed {
    fn sub_assign(&mut self, rhs: Self) {
        *self = self.saturating_sub(rhs);
    }
}

impl Mul for Fixed {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Fixed::mul(self, rhs)
    }
}

impl Div for Fixed {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        Fixed::div(self, rhs)
    }
}

impl Neg for Fixed {
    type Output = Self;

    fn neg(self) -> Self {
        Self(self.0.saturating_neg())
    }
}

impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let raw = i64::from(self.0);
        let sign = if raw < 0 { "-" } else { "" };
        let magnitude = raw.unsigned_abs();
        let whole = magnitude >> FRACTION_BITS;
        let fraction = ((magnitude & 0xffff) * 10_000) >> FRACTION_BITS;
        write!(f, "{sign}{whole}.{fraction:04}")
    }
}

/// Two-dimensional vector of [`Fixed`] components.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FixedVec2 {
    /// Horizontal component.
    pub x: Fixed,
    /// Vertical component.
    pub y: Fixed,
}

impl FixedVec2 {
    /// The zero vector.
    pub const ZERO: Self = Self {
        x: Fixed::ZERO,
        y: Fixed::ZERO,
    };

    /// Creates a vector from its components.
    #[must_use]
    pub const fn new(x: Fixed, y: Fixed) -> Self {
        Self { x, y }
    }

    /// Creates a vector from whole-number components.
    #[must_use]
    pub const fn from_ints(x: i32, y: i32) -> Self {
        Self::new(Fixed::from_int(x), Fixed::from_int(y))
    }

    /// Squared length of the vector.
    #[must_use]
    pub fn length_sq(self) -> Fixed {
        self.x * self.x + self.y * self.y
    }

    /// Length of the vector.
    #[must_use]
    pub fn length(self) -> Fixed {
        self.length_sq().sqrt()
    }

    /// Squared distance between two points.
    #[must_use]
    pub fn distance_sq(self, other: Self) -> Fixed {
        (other - self).length_sq()
    }

    /// Distance between two points.
    #[must_use]
    pub fn distance(self, other: Self) -> Fixed {
        self.distance_sq(other).sqrt()
    }

    /// Unit vector pointing in the same direction, or zero for a zero vector.
    #[must_use]
    pub fn normalize(self) -> Self {
        let length = self.length();
        if length.is_zero() {
            return Self::ZERO;
        }
        Self::new(self.x / length, self.y / length)
    }

    /// Multiplies both components by a scalar.
    #[must_use]
    pub fn scale(self, factor: Fixed) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    /// Shortens the vector to `max` when it is longer, preserving direction.
    #[must_use]
    pub fn clamp_length(self, max: Fixed) -> Self {
        if !max.is_positive() {
            return Self::ZERO;
        }
        if self.length_sq() <= max * max {
            return self;
        }
        self.normalize().scale(max)
    }

    /// Reports whether both components equal zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.x.is_zero() && self.y.is_zero()
    }
}

impl Add for FixedVec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for FixedVec2 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for FixedVec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for FixedVec2 {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Neg for FixedVec2 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}
