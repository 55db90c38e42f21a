//! Per-column quantile lookup for the clip step.
//!
//! A column's quantiles come from its selection dimension when the engine
//! has one, and from the column's own data otherwise. Both the World
//! manager and the expression cache resolve quantiles through here, so
//! re-clipping the unclipped tables always reproduces the clipped ones.

use std::collections::HashMap;

use cellview_frame::{Frame, quantile_sorted, sorted_values};
use cellview_model::names::{
    diffexp_dimension, obs_annotation_dimension, user_defined_dimension,
};

use crate::selection::SelectionEngine;

#[derive(Debug, Clone, Copy)]
enum Family {
    Obs,
    Var,
}

enum Resolved {
    Dimension(String),
    Local(Vec<f64>),
}

pub(crate) struct QuantileSource<'a, E> {
    engine: &'a E,
    frame: &'a Frame,
    family: Family,
    resolved: HashMap<String, Resolved>,
}

impl<'a, E: SelectionEngine> QuantileSource<'a, E> {
    /// Quantiles for observation annotation columns (`obs/<field>`).
    pub(crate) fn obs(engine: &'a E, frame: &'a Frame) -> Self {
        Self::new(engine, frame, Family::Obs)
    }

    /// Quantiles for expression columns (`diffexp/<gene>`, then
    /// `userGene/<gene>`).
    pub(crate) fn var(engine: &'a E, frame: &'a Frame) -> Self {
        Self::new(engine, frame, Family::Var)
    }

    fn new(engine: &'a E, frame: &'a Frame, family: Family) -> Self {
        Self {
            engine,
            frame,
            family,
            resolved: HashMap::new(),
        }
    }

    /// Value of quantile `q` for column `label`; NaN when unknown.
    pub(crate) fn quantile(&mut self, label: &str, q: f64) -> f64 {
        if !self.resolved.contains_key(label) {
            let resolved = self.resolve(label);
            self.resolved.insert(label.to_string(), resolved);
        }
        match self.resolved.get(label) {
            Some(Resolved::Dimension(name)) => self.engine.quantile(name, q).unwrap_or(f64::NAN),
            Some(Resolved::Local(sorted)) => quantile_sorted(sorted, q).unwrap_or(f64::NAN),
            None => f64::NAN,
        }
    }

    fn resolve(&self, label: &str) -> Resolved {
        let candidates = match self.family {
            Family::Obs => vec![obs_annotation_dimension(label)],
            Family::Var => vec![diffexp_dimension(label), user_defined_dimension(label)],
        };
        if let Some(name) = candidates
            .into_iter()
            .find(|name| self.engine.has_dimension(name))
        {
            return Resolved::Dimension(name);
        }
        tracing::debug!(
            column = label,
            "no selection dimension for column, using its own data quantiles"
        );
        let sorted = self
            .frame
            .col(label)
            .ok()
            .and_then(|series| sorted_values(series).ok())
            .unwrap_or_default();
        Resolved::Local(sorted)
    }
}
