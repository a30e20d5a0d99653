//! Elliptic curve groups over the three coordinate fields.
//!
//! G1 lives on y^2 = x^3 + 4 over [Fq], G2 on the twisted curve
//! y^2 = x^3 + 4(1 + i) over [Fq2], and the pairing works on the curve
//! y^2 = x^3 + 4 over [Fq12] that both map into. The group law is shared
//! across the three through [CoordField]; the point at infinity is a distinct
//! enum variant rather than a coordinate sentinel, so no affine pair is ever
//! ambiguous.

use std::fmt::Debug;

use lazy_static::lazy_static;
use num_bigint::BigUint;

use crate::{
    arith::{Fq, Scalar},
    consts::BLS_MODULUS,
    errors::KzgError,
    extension::{Fq2, Fq12},
};

/// Field operations the group law needs, implemented by [Fq], [Fq2] and
/// [Fq12]. `curve_b` is the constant term of the curve equation over that
/// field.
pub trait CoordField: Clone + PartialEq + Eq + Debug {
    fn zero() -> Self;
    fn one() -> Self;
    fn is_zero(&self) -> bool;
    fn add(&self, rhs: &Self) -> Self;
    fn sub(&self, rhs: &Self) -> Self;
    fn mul(&self, rhs: &Self) -> Self;
    fn neg(&self) -> Self;
    fn mul_u64(&self, k: u64) -> Self;
    fn inverse(&self) -> Result<Self, KzgError>;
    fn curve_b() -> Self;

    fn square(&self) -> Self {
        self.mul(self)
    }

    fn div(&self, rhs: &Self) -> Result<Self, KzgError> {
        Ok(self.mul(&rhs.inverse()?))
    }
}

impl CoordField for Fq {
    fn zero() -> Self {
        Fq::zero()
    }
    fn one() -> Self {
        Fq::one()
    }
    fn is_zero(&self) -> bool {
        Fq::is_zero(self)
    }
    fn add(&self, rhs: &Self) -> Self {
        Fq::add(self, rhs)
    }
    fn sub(&self, rhs: &Self) -> Self {
        Fq::sub(self, rhs)
    }
    fn mul(&self, rhs: &Self) -> Self {
        Fq::mul(self, rhs)
    }
    fn neg(&self) -> Self {
        Fq::neg(self)
    }
    fn mul_u64(&self, k: u64) -> Self {
        Fq::mul_u64(self, k)
    }
    fn inverse(&self) -> Result<Self, KzgError> {
        Fq::inverse(self)
    }
    fn curve_b() -> Self {
        Fq::from_u64(4)
    }
}

impl CoordField for Fq2 {
    fn zero() -> Self {
        Fq2::zero()
    }
    fn one() -> Self {
        Fq2::one()
    }
    fn is_zero(&self) -> bool {
        Fq2::is_zero(self)
    }
    fn add(&self, rhs: &Self) -> Self {
        Fq2::add(self, rhs)
    }
    fn sub(&self, rhs: &Self) -> Self {
        Fq2::sub(self, rhs)
    }
    fn mul(&self, rhs: &Self) -> Self {
        Fq2::mul(self, rhs)
    }
    fn neg(&self) -> Self {
        Fq2::neg(self)
    }
    fn mul_u64(&self, k: u64) -> Self {
        Fq2::mul_u64(self, k)
    }
    fn inverse(&self) -> Result<Self, KzgError> {
        Fq2::inverse(self)
    }
    fn curve_b() -> Self {
        // The twisted curve constant 4(1 + i).
        Fq2::from_u64s(4, 4)
    }
}

impl CoordField for Fq12 {
    fn zero() -> Self {
        Fq12::zero()
    }
    fn one() -> Self {
        Fq12::one()
    }
    fn is_zero(&self) -> bool {
        Fq12::is_zero(self)
    }
    fn add(&self, rhs: &Self) -> Self {
        Fq12::add(self, rhs)
    }
    fn sub(&self, rhs: &Self) -> Self {
        Fq12::sub(self, rhs)
    }
    fn mul(&self, rhs: &Self) -> Self {
        Fq12::mul(self, rhs)
    }
    fn neg(&self) -> Self {
        Fq12::neg(self)
    }
    fn mul_u64(&self, k: u64) -> Self {
        Fq12::mul_u64(self, k)
    }
    fn inverse(&self) -> Result<Self, KzgError> {
        Fq12::inverse(self)
    }
    fn curve_b() -> Self {
        Fq12::one().mul_u64(4)
    }
}

/// A point on a short Weierstrass curve over F, in affine coordinates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Point<F: CoordField> {
    Infinity,
    Affine { x: F, y: F },
}

pub type G1Point = Point<Fq>;
pub type G2Point = Point<Fq2>;
pub type G12Point = Point<Fq12>;

impl<F: CoordField> Point<F> {
    pub fn affine(x: F, y: F) -> Self {
        Point::Affine { x, y }
    }

    pub fn is_infinity(&self) -> bool {
        matches!(self, Point::Infinity)
    }

    /// Checks the curve equation y^2 - x^3 == b; the point at infinity is
    /// valid by convention.
    pub fn is_valid_point(&self) -> bool {
        match self {
            Point::Infinity => true,
            Point::Affine { x, y } => {
                let x_cubed = x.square().mul(x);
                y.square().sub(&x_cubed) == F::curve_b()
            }
        }
    }

    pub fn neg(&self) -> Self {
        match self {
            Point::Infinity => Point::Infinity,
            Point::Affine { x, y } => Point::Affine {
                x: x.clone(),
                y: y.neg(),
            },
        }
    }

    /// Tangent-line doubling. Doubling the point at infinity yields infinity.
    pub fn double(&self) -> Result<Self, KzgError> {
        match self {
            Point::Infinity => Ok(Point::Infinity),
            Point::Affine { x, y } => {
                // m = 3x^2 / 2y
                let m = x.square().mul_u64(3).div(&y.mul_u64(2))?;
                let new_x = m.square().sub(&x.mul_u64(2));
                let new_y = m.mul(&x.sub(&new_x)).sub(y);
                Ok(Point::Affine { x: new_x, y: new_y })
            }
        }
    }

    pub fn add(&self, rhs: &Self) -> Result<Self, KzgError> {
        let (x1, y1, x2, y2) = match (self, rhs) {
            (Point::Infinity, _) => return Ok(rhs.clone()),
            (_, Point::Infinity) => return Ok(self.clone()),
            (Point::Affine { x: x1, y: y1 }, Point::Affine { x: x2, y: y2 }) => (x1, y1, x2, y2),
        };

        if x1 == x2 && y1 == y2 {
            return self.double();
        }
        if x1 == x2 {
            // Same x, distinct y: the points are mutual inverses.
            return Ok(Point::Infinity);
        }

        // m = (y2 - y1) / (x2 - x1)
        let m = y2.sub(y1).div(&x2.sub(x1))?;
        let new_x = m.square().sub(x1).sub(x2);
        let new_y = m.mul(&x1.sub(&new_x)).sub(y1);
        Ok(Point::Affine { x: new_x, y: new_y })
    }

    /// Iterative double-and-add over the bits of k, least significant first.
    ///
    /// Multiplies by k as given, with no order reduction, so it can be used
    /// to test subgroup membership by multiplying by the group order itself.
    pub fn scalar_mul(&self, k: &BigUint) -> Result<Self, KzgError> {
        let mut result = Point::Infinity;
        let mut addend = self.clone();
        for bit in 0..k.bits() {
            if k.bit(bit) {
                result = result.add(&addend)?;
            }
            addend = addend.double()?;
        }
        Ok(result)
    }

    /// Scalar multiplication for points known to lie in the prime-order
    /// subgroup. For k past the halfway mark it multiplies by r - k and
    /// negates instead, halving the worst-case exponent width.
    pub fn scalar_mul_subgroup(&self, k: &Scalar) -> Result<Self, KzgError> {
        let order: &BigUint = &BLS_MODULUS;
        if k.as_biguint() * 2u32 >= *order {
            let reduced = order - k.as_biguint();
            Ok(self.scalar_mul(&reduced)?.neg())
        } else {
            self.scalar_mul(k.as_biguint())
        }
    }

    /// True iff the point is a non-identity element of the order-r subgroup.
    pub fn subgroup_check(&self) -> Result<bool, KzgError> {
        if self.is_infinity() {
            return Ok(false);
        }
        Ok(self.scalar_mul(&BLS_MODULUS)?.is_infinity())
    }
}

lazy_static! {
    /// Generator of the G1 subgroup.
    pub static ref G1_GENERATOR: G1Point = Point::affine(
        Fq::new(
            BigUint::parse_bytes(
                b"3685416753713387016781088315183077757961620795782546409894578378688607592378376318836054947676345821548104185464507",
                10,
            )
            .expect("valid generator coordinate"),
        ),
        Fq::new(
            BigUint::parse_bytes(
                b"1339506544944476473020471379941921221584933875938349620426543736416511423956333506472724655353366534992391756441569",
                10,
            )
            .expect("valid generator coordinate"),
        ),
    );

    /// Generator of the G2 subgroup on the twisted curve.
    pub static ref G2_GENERATOR: G2Point = Point::affine(
        Fq2::new(
            Fq::new(
                BigUint::parse_bytes(
                    b"352701069587466618187139116011060144890029952792775240219908644239793785735715026873347600343865175952761926303160",
                    10,
                )
                .expect("valid generator coordinate"),
            ),
            Fq::new(
                BigUint::parse_bytes(
                    b"3059144344244213709971259814753781636986470325476647558659373206291635324768958432433509563104347017837885763365758",
                    10,
                )
                .expect("valid generator coordinate"),
            ),
        ),
        Fq2::new(
            Fq::new(
                BigUint::parse_bytes(
                    b"1985150602287291935568054521177171638300868978215655730859378665066344726373823718423869104263333984641494340347905",
                    10,
                )
                .expect("valid generator coordinate"),
            ),
            Fq::new(
                BigUint::parse_bytes(
                    b"927553665492332455747201965776037880757740193453592970025027978793976877002675564980949289727957565575433344219582",
                    10,
                )
                .expect("valid generator coordinate"),
            ),
        ),
    );

    /// Inverse of w^2, used to untwist x-coordinates.
    static ref W2_INV: Fq12 = Fq12::w()
        .square()
        .inverse()
        .expect("w^2 is a unit");

    /// Inverse of w^3, used to untwist y-coordinates.
    static ref W3_INV: Fq12 = Fq12::w()
        .square()
        .mul(&Fq12::w())
        .inverse()
        .expect("w^3 is a unit");
}

/// Maps a G2 point into its Fq12 representation for the pairing.
///
/// Each Fq2 coordinate c0 + c1*i lands in Fq12 slots 0 and 6 as
/// (c0 - c1, c1), then x is divided by w^2 and y by w^3. The slot assignment
/// and the subtraction are fixed by the field isomorphism between
/// Fq[i]/(i^2 + 1) and the subring of Fq12 generated by w^6.
pub fn twist(point: &G2Point) -> G12Point {
    let (x, y) = match point {
        Point::Infinity => return Point::Infinity,
        Point::Affine { x, y } => (x, y),
    };

    let embed = |c: &Fq2| -> Fq12 {
        let mut out = Fq12::zero();
        out.set_coeff(0, c.real().sub(c.imag()));
        out.set_coeff(6, c.imag().clone());
        out
    };

    Point::Affine {
        x: embed(x).mul(&W2_INV),
        y: embed(y).mul(&W3_INV),
    }
}

/// Embeds a G1 point into Fq12 coordinates, where it meets twisted G2 points
/// inside the Miller loop.
pub fn g1_to_g12(point: &G1Point) -> G12Point {
    match point {
        Point::Infinity => Point::Infinity,
        Point::Affine { x, y } => {
            let embed = |c: &Fq| -> Fq12 {
                let mut out = Fq12::zero();
                out.set_coeff(0, c.clone());
                out
            };
            Point::Affine {
                x: embed(x),
                y: embed(y),
            }
        }
    }
}
