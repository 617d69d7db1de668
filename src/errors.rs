//! Error types reported by engines and the functions which dispatch to them.

use std::error::Error;
use std::fmt;
use std::fmt::Display;

use ndkit_array::{ArrayError, DataType};

use crate::engine::EngineType;
use crate::value::CastError;

/// Possible reasons why a math, linear algebra or statistics operation may
/// fail.
#[derive(Clone, Debug, PartialEq)]
pub enum OpError {
    /// An input has an invalid shape, axis or element type.
    Array(ArrayError),

    /// Converting a result to the requested element type or rank failed.
    CastFailed(CastError),

    /// The operation does not support inputs with this element type. For
    /// example, ordering-based reductions on complex arrays.
    UnsupportedType(DataType),

    /// An input has a value that is incorrect.
    InvalidValue(&'static str),

    /// A matrix which must be invertible is singular.
    SingularMatrix,

    /// A numerical routine failed, for example because an iteration did not
    /// converge.
    NumericFailure(&'static str),

    /// No engine is registered for the requested type.
    EngineNotFound(EngineType),

    /// The default engine can't be changed because it has already been
    /// resolved.
    DefaultEngineAlreadyResolved,
}

impl Display for OpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpError::Array(err) => write!(f, "{}", err),
            OpError::CastFailed(err) => write!(f, "{}", err),
            OpError::UnsupportedType(dtype) => {
                write!(f, "operation does not support elements of type {}", dtype)
            }
            OpError::InvalidValue(details) => write!(f, "input has invalid value: {}", details),
            OpError::SingularMatrix => write!(f, "matrix is singular"),
            OpError::NumericFailure(details) => write!(f, "numeric failure: {}", details),
            OpError::EngineNotFound(engine_type) => {
                write!(f, "no engine registered for type \"{}\"", engine_type)
            }
            OpError::DefaultEngineAlreadyResolved => {
                write!(f, "default engine has already been resolved")
            }
        }
    }
}

impl Error for OpError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            OpError::Array(err) => Some(err),
            OpError::CastFailed(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ArrayError> for OpError {
    fn from(val: ArrayError) -> OpError {
        OpError::Array(val)
    }
}

impl From<CastError> for OpError {
    fn from(val: CastError) -> OpError {
        OpError::CastFailed(val)
    }
}

#[cfg(test)]
mod tests {
    use ndkit_array::{ArrayError, DataType};

    use super::OpError;
    use crate::engine::EngineType;

    #[test]
    fn test_display() {
        let err: OpError = ArrayError::InvalidAxis { axis: 3, ndim: 2 }.into();
        assert_eq!(err.to_string(), "axis 3 is invalid for array with 2 axes");

        let err = OpError::EngineNotFound(EngineType::new("native"));
        assert_eq!(err.to_string(), "no engine registered for type \"native\"");

        let err = OpError::UnsupportedType(DataType::ComplexFloat64);
        assert_eq!(
            err.to_string(),
            "operation does not support elements of type c64"
        );
    }
}
