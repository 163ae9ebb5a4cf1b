use std::fmt::Debug;

use derive_more::derive::Display;

use crate::Sym;

/// Typed parameter of a schema or of a quantified effect, e.g. `?t - truck`
#[derive(Clone, Display, PartialEq, Eq)]
#[display("{name}")]
pub struct Param {
    pub name: Sym,
    pub tpe: Sym,
}

impl Debug for Param {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.name, self.tpe)
    }
}

impl Param {
    pub fn new(name: impl Into<Sym>, tpe: impl Into<Sym>) -> Self {
        Self {
            name: name.into(),
            tpe: tpe.into(),
        }
    }

    pub fn name(&self) -> &Sym {
        &self.name
    }
    pub fn tpe(&self) -> &Sym {
        &self.tpe
    }
}

/// Zips parameters with the leading arguments of a reachable atom.
/// Extra arguments (payload appended by the model generator) are ignored.
pub(crate) fn bind<'a>(params: &[Param], args: impl IntoIterator<Item = &'a Sym>) -> crate::Binding {
    params
        .iter()
        .zip(args)
        .map(|(p, arg)| (p.name.clone(), arg.clone()))
        .collect()
}
