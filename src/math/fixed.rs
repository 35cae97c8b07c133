//! 16.16 signed fixed-point arithmetic
//!
//! The depth buffer and the fixed-point scanline back-end both run on this
//! representation.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Number of fractional bits.
pub const FRACBITS: i32 = 16;
/// One full unit (1.0) in fixed-point.
pub const FRACUNIT: i32 = 1 << FRACBITS;

/// 16.16 fixed-point scalar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Fixed(pub i32);

impl Fixed {
    pub const ZERO: Fixed = Fixed(0);
    pub const ONE: Fixed = Fixed(FRACUNIT);

    pub fn from_f32(v: f32) -> Fixed {
        Fixed((v * FRACUNIT as f32) as i32)
    }

    pub fn from_i32(v: i32) -> Fixed {
        Fixed(v << FRACBITS)
    }

    pub fn to_f32(self) -> f32 {
        self.0 as f32 / FRACUNIT as f32
    }

    /// Integer part (arithmetic shift, rounds toward negative infinity).
    pub fn to_i32(self) -> i32 {
        self.0 >> FRACBITS
    }

    /// Round up to the next whole unit boundary.
    pub fn ceil(self) -> Fixed {
        Fixed((self.0 + (FRACUNIT - 1)) & !(FRACUNIT - 1))
    }

    pub fn abs(self) -> Fixed {
        Fixed(self.0.abs())
    }

    pub fn mul(self, other: Fixed) -> Fixed {
        Fixed(((self.0 as i64 * other.0 as i64) >> FRACBITS) as i32)
    }

    /// Division, saturating to the extremes on overflow.
    pub fn div(self, other: Fixed) -> Fixed {
        if (self.0.abs() >> 14) >= other.0.abs() {
            if (self.0 ^ other.0) < 0 {
                Fixed(i32::MIN)
            } else {
                Fixed(i32::MAX)
            }
        } else {
            Fixed((((self.0 as i64) << FRACBITS) / other.0 as i64) as i32)
        }
    }

    /// Linear interpolation between `start` and `end` at parameter `r`.
    pub fn lerp(start: Fixed, end: Fixed, r: Fixed) -> Fixed {
        start.mul(Fixed(FRACUNIT - r.0)) + end.mul(r)
    }
}

impl Add for Fixed {
    type Output = Fixed;
    fn add(self, other: Fixed) -> Fixed {
        Fixed(self.0 + other.0)
    }
}

impl AddAssign for Fixed {
    fn add_assign(&mut self, other: Fixed) {
        self.0 += other.0;
    }
}

impl Sub for Fixed {
    type Output = Fixed;
    fn sub(self, other: Fixed) -> Fixed {
        Fixed(self.0 - other.0)
    }
}

impl SubAssign for Fixed {
    fn sub_assign(&mut self, other: Fixed) {
        self.0 -= other.0;
    }
}

impl Neg for Fixed {
    type Output = Fixed;
    fn neg(self) -> Fixed {
        Fixed(-self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mul_and_div_roundtrip() {
        let a = Fixed::from_f32(12.5);
        let b = Fixed::from_f32(2.0);
        assert_eq!(a.mul(b), Fixed::from_f32(25.0));
        assert_eq!(a.div(b), Fixed::from_f32(6.25));
    }

    #[test]
    fn div_saturates_on_overflow() {
        let big = Fixed::from_i32(30000);
        let tiny = Fixed(1);
        assert_eq!(big.div(tiny), Fixed(i32::MAX));
        assert_eq!((-big).div(tiny), Fixed(i32::MIN));
    }

    #[test]
    fn lerp_endpoints_are_exact() {
        let a = Fixed::from_f32(-3.5);
        let b = Fixed::from_f32(10.25);
        assert_eq!(Fixed::lerp(a, b, Fixed::ZERO), a);
        assert_eq!(Fixed::lerp(a, b, Fixed::ONE), b);
    }

    #[test]
    fn ceil_rounds_to_next_unit() {
        assert_eq!(Fixed::from_f32(1.25).ceil(), Fixed::from_i32(2));
        assert_eq!(Fixed::from_i32(3).ceil(), Fixed::from_i32(3));
        assert_eq!(Fixed::from_f32(-0.5).ceil(), Fixed::ZERO);
    }

    #[test]
    fn shift_truncation_wraps_like_the_span_loop() {
        // negative texel coordinates wrap through the u16 cast
        let u = Fixed::from_f32(-0.0833).to_i32();
        assert_eq!(u, -1);
        assert_eq!((u as u16) % 2, 1);
    }
}
