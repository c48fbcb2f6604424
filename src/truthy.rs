//! Coercion of probe outcomes to strict booleans.

use serde_json::Value;

/// Anything a probe may return. Flags only ever store the coerced `bool`.
pub trait Truthy {
    fn truthy(&self) -> bool;
}

impl Truthy for bool {
    fn truthy(&self) -> bool {
        *self
    }
}

/// A probe that returns nothing reads as unsupported.
impl Truthy for () {
    fn truthy(&self) -> bool {
        false
    }
}

impl<T: Truthy> Truthy for Option<T> {
    fn truthy(&self) -> bool {
        self.as_ref().is_some_and(Truthy::truthy)
    }
}

impl<T: Truthy, E> Truthy for Result<T, E> {
    fn truthy(&self) -> bool {
        self.as_ref().is_ok_and(Truthy::truthy)
    }
}

impl<T: Truthy + ?Sized> Truthy for &T {
    fn truthy(&self) -> bool {
        (**self).truthy()
    }
}

impl<T: Truthy + ?Sized> Truthy for Box<T> {
    fn truthy(&self) -> bool {
        (**self).truthy()
    }
}

impl Truthy for str {
    fn truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl Truthy for String {
    fn truthy(&self) -> bool {
        !self.is_empty()
    }
}

macro_rules! truthy_int {
    ($($ty:ty),*) => {
        $(impl Truthy for $ty {
            fn truthy(&self) -> bool {
                *self != 0
            }
        })*
    };
}

truthy_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl Truthy for f32 {
    fn truthy(&self) -> bool {
        *self != 0.0 && !self.is_nan()
    }
}

impl Truthy for f64 {
    fn truthy(&self) -> bool {
        *self != 0.0 && !self.is_nan()
    }
}

/// JavaScript truthiness: objects and arrays are truthy even when empty.
impl Truthy for Value {
    fn truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(value) => *value,
            Value::Number(number) => number.as_f64().is_some_and(|n| n.truthy()),
            Value::String(text) => !text.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_values_follow_script_truthiness() {
        assert!(!json!(null).truthy());
        assert!(!json!(0).truthy());
        assert!(!json!("").truthy());
        assert!(json!("not a boolean").truthy());
        assert!(json!([]).truthy());
        assert!(json!({}).truthy());
        assert!(json!(-1.5).truthy());
    }

    #[test]
    fn rust_values_coerce() {
        assert!(!().truthy());
        assert!(!None::<bool>.truthy());
        assert!(Some("x").truthy());
        assert!(!Ok::<_, ()>(0u8).truthy());
        assert!(!Err::<bool, _>("boom").truthy());
        assert!(!f64::NAN.truthy());
        assert!(7i64.truthy());
    }
}
