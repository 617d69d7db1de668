//! Rank tags for arrays.
//!
//! Every [`NdArray`](crate::NdArray) carries a rank tag type parameter. The
//! fixed-rank tags [`D1`] to [`D4`] let common low-rank cases be indexed with
//! arrays (`[usize; N]`) so that the index length is checked at compile time.
//! [`DN`] is the dynamic-rank tag, which accepts any rank including zero and
//! checks index lengths at runtime.

use std::fmt::Debug;
use std::hash::Hash;

use smallvec::SmallVec;

/// Trait implemented by the rank tags.
pub trait Dimension:
    Copy + Clone + Debug + Default + PartialEq + Eq + Hash + Send + Sync + 'static
{
    /// Number of axes for fixed-rank tags, or `None` for [`DN`].
    const NDIM: Option<usize>;

    /// Type used to index a single element of an array with this rank.
    type Index<'a>: AsRef<[usize]> + Clone + Debug;

    /// Return true if an array with `ndim` axes can carry this tag.
    fn accepts(ndim: usize) -> bool {
        Self::NDIM.map(|n| n == ndim).unwrap_or(true)
    }
}

/// Rank tag for one-dimensional arrays (vectors).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct D1;

/// Rank tag for two-dimensional arrays (matrices).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct D2;

/// Rank tag for three-dimensional arrays.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct D3;

/// Rank tag for four-dimensional arrays.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct D4;

/// Rank tag for arrays whose rank is only known at runtime.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct DN;

macro_rules! impl_fixed_dimension {
    ($dim:ident, $ndim:literal) => {
        impl Dimension for $dim {
            const NDIM: Option<usize> = Some($ndim);
            type Index<'a> = [usize; $ndim];
        }
    };
}

impl_fixed_dimension!(D1, 1);
impl_fixed_dimension!(D2, 2);
impl_fixed_dimension!(D3, 3);
impl_fixed_dimension!(D4, 4);

impl Dimension for DN {
    const NDIM: Option<usize> = None;
    type Index<'a> = &'a [usize];
}

/// Rank tags from which an axis can be removed, eg. by indexing into it.
pub trait RemoveAxis: Dimension {
    /// Tag of the array produced by removing one axis.
    type Smaller: Dimension;
}

impl RemoveAxis for D2 {
    type Smaller = D1;
}

impl RemoveAxis for D3 {
    type Smaller = D2;
}

impl RemoveAxis for D4 {
    type Smaller = D3;
}

impl RemoveAxis for DN {
    type Smaller = DN;
}

/// Rank tags to which an axis can be added.
pub trait InsertAxis: Dimension {
    /// Tag of the array produced by inserting one axis.
    type Larger: Dimension;
}

impl InsertAxis for D1 {
    type Larger = D2;
}

impl InsertAxis for D2 {
    type Larger = D3;
}

impl InsertAxis for D3 {
    type Larger = D4;
}

impl InsertAxis for D4 {
    type Larger = DN;
}

impl InsertAxis for DN {
    type Larger = DN;
}

/// Storage for shapes, which avoids allocating for arrays of rank <= 4.
pub type Shape = SmallVec<[usize; 4]>;

/// Conversion of a shape argument into a runtime shape with a rank tag.
///
/// Fixed-size arrays of length 1 to 4 produce the matching fixed-rank tag,
/// while slices and `Vec`s produce [`DN`].
pub trait IntoShape {
    type Dim: Dimension;

    fn into_shape(self) -> Shape;
}

macro_rules! impl_into_shape {
    ($dim:ident, $ndim:literal) => {
        impl IntoShape for [usize; $ndim] {
            type Dim = $dim;

            fn into_shape(self) -> Shape {
                SmallVec::from_slice(&self)
            }
        }
    };
}

impl_into_shape!(D1, 1);
impl_into_shape!(D2, 2);
impl_into_shape!(D3, 3);
impl_into_shape!(D4, 4);

impl IntoShape for &[usize] {
    type Dim = DN;

    fn into_shape(self) -> Shape {
        SmallVec::from_slice(self)
    }
}

impl<const N: usize> IntoShape for &[usize; N] {
    type Dim = DN;

    fn into_shape(self) -> Shape {
        SmallVec::from_slice(self)
    }
}

impl IntoShape for Vec<usize> {
    type Dim = DN;

    fn into_shape(self) -> Shape {
        SmallVec::from_vec(self)
    }
}

impl IntoShape for Shape {
    type Dim = DN;

    fn into_shape(self) -> Shape {
        self
    }
}
