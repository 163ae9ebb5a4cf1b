//! Tuning parameters read from environment variables.
//!
//! A parameter is read once, on first access. If the variable is unset or holds a value that
//! can not be parsed, the default is used.
//!
//! ```
//! use aries_grounding::config::EnvParam;
//! static DEPTH: EnvParam<u32> = EnvParam::new("ARIES_GROUNDING_DOC_DEPTH", "3");
//!
//! assert_eq!(DEPTH.get(), 3);
//! ```

use std::str::FromStr;

use once_cell::sync::OnceCell;

/// File to which the operators of the delete relaxation are written.
pub static OPERATORS_FILE: EnvParam<String> =
    EnvParam::new("ARIES_GROUNDING_OPERATORS_FILE", "operators_relaxation_heuristic.txt");

/// Operators with more preconditions are only checked for exact duplicates when removing
/// dominated operators (the check is exponential in the number of preconditions).
pub static MAX_PRECONDITIONS_TO_TEST: EnvParam<usize> =
    EnvParam::new("ARIES_GROUNDING_MAX_PRECONDITIONS_TO_TEST", "5");

pub struct EnvParam<T> {
    value: OnceCell<T>,
    var: &'static str,
    default: &'static str,
}

impl<T> EnvParam<T> {
    pub const fn new(var: &'static str, default: &'static str) -> Self {
        EnvParam {
            value: OnceCell::new(),
            var,
            default,
        }
    }

    pub fn name(&self) -> &'static str {
        self.var
    }
}

impl<T: FromStr> EnvParam<T> {
    fn read_default(&self) -> T {
        match T::from_str(self.default) {
            Ok(value) => value,
            Err(_) => panic!("[config] {}: invalid default value \"{}\".", self.var, self.default),
        }
    }

    fn read(&self) -> T {
        match std::env::var(self.var) {
            Ok(text) => match T::from_str(&text) {
                Ok(value) => value,
                Err(_) => {
                    tracing::warn!(
                        "could not parse \"{}\" for environment variable {}, using default \"{}\"",
                        text,
                        self.var,
                        self.default
                    );
                    self.read_default()
                }
            },
            Err(std::env::VarError::NotPresent) => self.read_default(),
            Err(err) => {
                tracing::warn!("{}: {}, using default \"{}\"", self.var, err, self.default);
                self.read_default()
            }
        }
    }

    /// Value of the parameter, read from the environment on first access.
    ///
    /// # Panic
    /// Panics if the default value can not be parsed.
    pub fn get_ref(&self) -> &T {
        self.value.get_or_init(|| self.read())
    }

    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.get_ref().clone()
    }
}
