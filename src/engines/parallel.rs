use crate::engine::{Engine, EngineType, LinAlg, LinAlgEx, Math, MathEx, Norm, Statistics};
use crate::errors::OpError;
use crate::number::FloatElement;
use crate::threading::thread_pool;
use crate::value::{Scalar, Value};

use super::pure::{dot_typed, map_float, mean_typed, sum_typed, Exec, PureEngine};
use super::{promote, type_mismatch};

/// Minimum number of elements in an input before work is split across
/// threads.
const MIN_PARALLEL_SIZE: usize = 4096;

/// Engine which runs reductions, products and element-wise functions on
/// large inputs in the ndkit [thread pool](crate::threading::thread_pool).
///
/// Operations without a parallel implementation, and operations on small
/// inputs, are evaluated by [`PureEngine`].
#[derive(Debug, Default)]
pub struct ParallelEngine {
    pure: PureEngine,
}

impl ParallelEngine {
    pub fn new() -> ParallelEngine {
        ParallelEngine {
            pure: PureEngine::new(),
        }
    }

    fn exec_for(&self, size: usize) -> Exec {
        if size >= MIN_PARALLEL_SIZE {
            Exec::Parallel
        } else {
            Exec::Sequential
        }
    }

    /// Apply an element-wise function, promoting integer inputs to floats.
    fn map_float_value(
        &self,
        a: &Value,
        f32_fn: fn(f32) -> f32,
        f64_fn: fn(f64) -> f64,
        c32_fn: fn(num_complex::Complex32) -> num_complex::Complex32,
        c64_fn: fn(num_complex::Complex64) -> num_complex::Complex64,
    ) -> Result<Value, OpError> {
        let a = promote(a)?;
        let exec = self.exec_for(a.size());
        thread_pool().run(|| match &a {
            Value::Float32(array) => map_float(array, f32_fn, exec),
            Value::Float64(array) => map_float(array, f64_fn, exec),
            Value::ComplexFloat32(array) => map_float(array, c32_fn, exec),
            Value::ComplexFloat64(array) => map_float(array, c64_fn, exec),
            other => Err(OpError::UnsupportedType(other.dtype())),
        })
    }
}

impl Engine for ParallelEngine {
    fn engine_type(&self) -> EngineType {
        EngineType::PARALLEL
    }

    fn math(&self) -> &dyn Math {
        self
    }

    fn linalg(&self) -> &dyn LinAlg {
        self
    }

    fn stat(&self) -> &dyn Statistics {
        self
    }
}

impl Math for ParallelEngine {
    fn arg_max(&self, a: &Value) -> Result<usize, OpError> {
        self.pure.arg_max(a)
    }

    fn arg_min(&self, a: &Value) -> Result<usize, OpError> {
        self.pure.arg_min(a)
    }

    fn arg_max_axis(&self, a: &Value, axis: usize) -> Result<Value, OpError> {
        self.pure.arg_max_axis(a, axis)
    }

    fn arg_min_axis(&self, a: &Value, axis: usize) -> Result<Value, OpError> {
        self.pure.arg_min_axis(a, axis)
    }

    fn max(&self, a: &Value) -> Result<Scalar, OpError> {
        self.pure.max(a)
    }

    fn min(&self, a: &Value) -> Result<Scalar, OpError> {
        self.pure.min(a)
    }

    fn max_axis(&self, a: &Value, axis: usize) -> Result<Value, OpError> {
        self.pure.max_axis(a, axis)
    }

    fn min_axis(&self, a: &Value, axis: usize) -> Result<Value, OpError> {
        self.pure.min_axis(a, axis)
    }

    fn sum(&self, a: &Value) -> Result<Scalar, OpError> {
        let exec = self.exec_for(a.size());
        if exec == Exec::Sequential {
            return self.pure.sum(a);
        }
        thread_pool().run(|| dispatch_all!(a, array => Ok(sum_typed(array, exec))))
    }

    fn sum_axis(&self, a: &Value, axis: usize) -> Result<Value, OpError> {
        self.pure.sum_axis(a, axis)
    }

    fn cum_sum(&self, a: &Value, axis: Option<usize>) -> Result<Value, OpError> {
        self.pure.cum_sum(a, axis)
    }

    fn math_ex(&self) -> &dyn MathEx {
        self
    }
}

impl MathEx for ParallelEngine {
    fn exp(&self, a: &Value) -> Result<Value, OpError> {
        self.map_float_value(
            a,
            FloatElement::exp,
            FloatElement::exp,
            FloatElement::exp,
            FloatElement::exp,
        )
    }

    fn log(&self, a: &Value) -> Result<Value, OpError> {
        self.map_float_value(
            a,
            FloatElement::ln,
            FloatElement::ln,
            FloatElement::ln,
            FloatElement::ln,
        )
    }

    fn sin(&self, a: &Value) -> Result<Value, OpError> {
        self.map_float_value(
            a,
            FloatElement::sin,
            FloatElement::sin,
            FloatElement::sin,
            FloatElement::sin,
        )
    }

    fn cos(&self, a: &Value) -> Result<Value, OpError> {
        self.map_float_value(
            a,
            FloatElement::cos,
            FloatElement::cos,
            FloatElement::cos,
            FloatElement::cos,
        )
    }
}

impl LinAlg for ParallelEngine {
    fn dot(&self, a: &Value, b: &Value) -> Result<Value, OpError> {
        let exec = self.exec_for(a.size().max(b.size()));
        if exec == Exec::Sequential {
            return self.pure.dot(a, b);
        }
        thread_pool().run(|| dispatch_pair!(a, b, (x, y) => dot_typed(x, y, exec)))
    }

    fn inv(&self, a: &Value) -> Result<Value, OpError> {
        self.pure.inv(a)
    }

    fn pow(&self, a: &Value, n: u32) -> Result<Value, OpError> {
        self.pure.pow(a, n)
    }

    fn norm(&self, a: &Value, norm: Norm) -> Result<f64, OpError> {
        self.pure.norm(a, norm)
    }

    fn linalg_ex(&self) -> &dyn LinAlgEx {
        self.pure.linalg_ex()
    }
}

impl Statistics for ParallelEngine {
    fn median(&self, a: &Value) -> Result<f64, OpError> {
        self.pure.median(a)
    }

    fn average(&self, a: &Value, weights: Option<&Value>) -> Result<Scalar, OpError> {
        match weights {
            Some(weights) => self.pure.average(a, Some(weights)),
            None => self.mean(a),
        }
    }

    fn mean(&self, a: &Value) -> Result<Scalar, OpError> {
        let a = promote(a)?;
        let exec = self.exec_for(a.size());
        if exec == Exec::Sequential {
            return self.pure.mean(&a);
        }
        thread_pool().run(|| dispatch_float!(&a, array => mean_typed(array, exec)))
    }

    fn mean_axis(&self, a: &Value, axis: usize) -> Result<Value, OpError> {
        self.pure.mean_axis(a, axis)
    }
}
