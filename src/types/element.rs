//! Element types that may be stored in a series.
//!
//! - [`Element`] is the bound every series value type satisfies.
//! - [`DType`] is the runtime tag for an element type, used when a foreign
//!   system needs to pick a storage class (see [`crate::interop`]).
//!
//! Notes
//! -----
//! - Numeric operations add their own bounds (`PartialOrd` for comparisons,
//!   `num_traits::Float` for resampling); `Element` itself is deliberately
//!   minimal so that boolean and complex series are first-class.
use num_complex::{Complex32, Complex64};
use std::fmt;

/// Runtime tag naming the storage type of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    Bool,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    Complex64,
    Complex128,
}

impl DType {
    /// Canonical lower-case name (`"float64"`, `"complex128"`, ...).
    pub fn name(self) -> &'static str {
        match self {
            DType::Bool => "bool",
            DType::UInt8 => "uint8",
            DType::UInt16 => "uint16",
            DType::UInt32 => "uint32",
            DType::UInt64 => "uint64",
            DType::Int16 => "int16",
            DType::Int32 => "int32",
            DType::Int64 => "int64",
            DType::Float32 => "float32",
            DType::Float64 => "float64",
            DType::Complex64 => "complex64",
            DType::Complex128 => "complex128",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value type that can be held by a [`Series`](crate::types::Series).
///
/// `zero()` is the default fill value used when padding gaps and when
/// building empty instances.
pub trait Element:
    Copy + PartialEq + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// Runtime tag for this element type.
    const DTYPE: DType;

    /// Additive identity (or `false` for booleans).
    fn zero() -> Self;
}

macro_rules! impl_element {
    ($($ty:ty => $dtype:ident, $zero:expr);* $(;)?) => {
        $(
            impl Element for $ty {
                const DTYPE: DType = DType::$dtype;

                #[inline]
                fn zero() -> Self {
                    $zero
                }
            }
        )*
    };
}

impl_element! {
    bool => Bool, false;
    u8 => UInt8, 0;
    u16 => UInt16, 0;
    u32 => UInt32, 0;
    u64 => UInt64, 0;
    i16 => Int16, 0;
    i32 => Int32, 0;
    i64 => Int64, 0;
    f32 => Float32, 0.0;
    f64 => Float64, 0.0;
    Complex32 => Complex64, Complex32::new(0.0, 0.0);
    Complex64 => Complex128, Complex64::new(0.0, 0.0);
}
