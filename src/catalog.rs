//! Prize catalog: the fixed, ordered list of prize names and the default
//! (tiered) weight of each. The bundled catalog ships in `data/prizes.json`
//! and is parsed once per process.
use crate::error::CatalogError;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One catalog entry as written in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrizeDef {
    pub name: String,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    names: Vec<String>,
    weights: Vec<f64>,
}

static BUNDLED: Lazy<Catalog> = Lazy::new(|| {
    let json = include_str!("../data/prizes.json");
    Catalog::from_json(json).expect("Failed to parse bundled prizes.json")
});

impl Catalog {
    /// The catalog compiled into the binary.
    pub fn bundled() -> &'static Catalog {
        &BUNDLED
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let defs: Vec<PrizeDef> = serde_json::from_str(json)?;
        Self::from_defs(defs)
    }

    /// Build a catalog, rejecting empty lists, blank or repeated names and
    /// weights that are negative or not finite.
    pub fn from_defs(defs: Vec<PrizeDef>) -> Result<Self, CatalogError> {
        if defs.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut names: Vec<String> = Vec::with_capacity(defs.len());
        let mut weights = Vec::with_capacity(defs.len());
        for (index, def) in defs.into_iter().enumerate() {
            let name = def.name.trim().to_string();
            if name.is_empty() {
                return Err(CatalogError::BlankName { index });
            }
            if names.contains(&name) {
                return Err(CatalogError::DuplicateName { name });
            }
            if !def.weight.is_finite() || def.weight < 0.0 {
                return Err(CatalogError::InvalidWeight {
                    name,
                    weight: def.weight,
                });
            }
            names.push(name);
            weights.push(def.weight);
        }

        Ok(Self { names, weights })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn default_weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// A constructed catalog is never empty.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn defs(&self) -> Vec<PrizeDef> {
        self.names
            .iter()
            .zip(&self.weights)
            .map(|(name, &weight)| PrizeDef {
                name: name.clone(),
                weight,
            })
            .collect()
    }

    /// Probability that a single draw from the full catalog lands on each
    /// prize. Untiered draws, and tiered draws whose weights are all zero,
    /// are uniform. `weights` must already be validated against this catalog.
    pub fn odds(&self, weights: Option<&[f64]>, tiered: bool) -> Vec<(&str, f64)> {
        let weights = weights.unwrap_or(&self.weights);
        let total: f64 = weights.iter().sum();
        let uniform = 1.0 / self.names.len() as f64;

        self.names
            .iter()
            .zip(weights)
            .map(|(name, &w)| {
                let p = if tiered && total > 0.0 { w / total } else { uniform };
                (name.as_str(), p)
            })
            .collect()
    }

    /// Display adapter printing one `name: pct%` line per prize.
    pub fn odds_table(&self, tiered: bool) -> impl fmt::Display + '_ {
        OddsTable {
            catalog: self,
            tiered,
        }
    }
}

struct OddsTable<'a> {
    catalog: &'a Catalog,
    tiered: bool,
}

impl fmt::Display for OddsTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mode = if self.tiered { "tiered" } else { "uniform" };
        writeln!(f, "{} prizes ({mode} draw)", self.catalog.len())?;
        for ((name, p), weight) in self
            .catalog
            .odds(None, self.tiered)
            .into_iter()
            .zip(self.catalog.default_weights())
        {
            if self.tiered {
                writeln!(f, "\t({weight}) {name}: {:.1}%", p * 100.0)?;
            } else {
                writeln!(f, "\t{name}: {:.1}%", p * 100.0)?;
            }
        }
        Ok(())
    }
}
