//! Physical quantities used to describe acquisition geometry.
//!
//! Lengths are stored in millimetres, angles in radians.

pub mod todo;

pub use uom;
pub use uom::si::Quantity;

pub mod mmps {

  pub mod f32 {
    use uom::{ISQ, system, si::Quantity};
    ISQ!(uom::si, f32, (millimeter, kilogram, picosecond, ampere, kelvin, mole, candela));

    /// The full circle constant (τ) Equal to 2π.
    pub const TWOPI: Angle = Angle {
        dimension: std::marker::PhantomData,
        units: std::marker::PhantomData,
        value: std::f32::consts::TAU,
    };
  }

}

pub use mmps::f32::{Angle, Length, TWOPI};

mod units {
  pub use uom::si::{length::{millimeter, centimeter},
                    angle ::{radian, degree, revolution},
  };
}

// Making values from float literals seems to be very long-winded, so provide
// some pithily-named convenience constructors.

/// Generate a function called NAME which returns QUANTITY by interpreting its
/// argument as UNIT
///
/// wrap!(NAME QUANTITY UNIT);
macro_rules! wrap {
  ($name:ident $quantity:ident $unit:ident ) => {
    pub fn $name(x: f32) -> $quantity { $quantity::new::<units::$unit>(x) }
  };
}

wrap!(mm     Length  millimeter);
wrap!(cm     Length  centimeter);
wrap!(radian Angle       radian);
wrap!(degree Angle       degree);
wrap!(turn   Angle   revolution);

// Reverse direction of the above.
pub fn mm_    (x: Length) -> f32 { x.get::<units::millimeter>() }
pub fn radian_(x: Angle ) -> f32 { x.get::<units::radian    >() }
pub fn degree_(x: Angle ) -> f32 { x.get::<units::degree    >() }
pub fn turn_  (x: Angle ) -> f32 { x.get::<units::revolution>() }

#[macro_export]
macro_rules! in_base_unit {
  ($value:expr) => {
    $crate::Quantity {
      dimension: std::marker::PhantomData,
      units: std::marker::PhantomData,
      value: $value,
    }
  };
}

#[macro_export]
macro_rules! assert_uom_eq {
  ($unit:ident, $lhs:expr, $rhs:expr, $algo:ident <= $tol:expr) => {
    float_eq::assert_float_eq!($lhs.get::<$unit>(), $rhs.get::<$unit>(), $algo <= $tol)
  };
}

#[cfg(test)]
mod tests {
  use super::*;
  use rstest::rstest;

  #[test]
  fn lengths_sum_across_units() {
    let v = vec![mm(1.0), cm(1.0)];
    let total: Length = v.into_iter().sum();
    use units::millimeter;
    assert_uom_eq!(millimeter, total, mm(11.0), ulps <= 1);
  }

  #[test]
  fn base_unit_is_millimetre() {
    let l: Length = in_base_unit!(2.5);
    assert_eq!(mm_(l), 2.5);
  }

  #[rstest(/**/ degrees,  radians,
           case(   0.0,  0.0),
           case(  90.0,  std::f32::consts::FRAC_PI_2),
           case( 180.0,  std::f32::consts::PI),
           case( 360.0,  std::f32::consts::TAU),
  )]
  fn degrees_to_radians(degrees: f32, radians: f32) {
    float_eq::assert_float_eq!(radian_(degree(degrees)), radians, ulps <= 2);
  }

  #[test]
  fn full_turn_is_twopi() {
    float_eq::assert_float_eq!(radian_(turn(1.0)), radian_(TWOPI), ulps <= 1);
  }

  #[test]
  fn parse_quantities_from_strings() {
    let l: Length = "12 mm".parse().unwrap();
    let a: Angle  = "0.5 °".parse().unwrap();
    assert_eq!(mm_(l), 12.0);
    float_eq::assert_float_eq!(degree_(a), 0.5, ulps <= 2);
  }
}
