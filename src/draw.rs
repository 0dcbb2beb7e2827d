//! The prize draw: uniform or weighted ("tiered") selection, with or
//! without replacement ("unique").
//!
//! Requests are validated in full before a generator is created, so a
//! rejected request consumes no randomness and returns no partial result.
use crate::catalog::Catalog;
use crate::error::DrawError;
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Most prizes a single draw will produce.
pub const MAX_QUANTITY: i64 = 1_000_000;

/// Parameters of one draw.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRequest {
    pub quantity: i64,
    pub unique: bool,
    pub seed: Option<u64>,
    pub tiered: bool,
    /// Replaces the catalog's default weights, position for position.
    pub weights: Option<Vec<f64>>,
}

impl Default for DrawRequest {
    fn default() -> Self {
        Self {
            quantity: 1,
            unique: false,
            seed: None,
            tiered: true,
            weights: None,
        }
    }
}

impl DrawRequest {
    pub fn new(quantity: i64) -> Self {
        Self {
            quantity,
            ..Self::default()
        }
    }

    pub fn unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn tiered(mut self, tiered: bool) -> Self {
        self.tiered = tiered;
        self
    }

    pub fn weights(mut self, weights: Vec<f64>) -> Self {
        self.weights = Some(weights);
        self
    }
}

/// Draw from the bundled catalog.
pub fn draw_prizes(request: &DrawRequest) -> Result<Vec<String>, DrawError> {
    Catalog::bundled().draw(request)
}

impl Catalog {
    /// Draw with a generator built from the request: seeded when a seed is
    /// given, from OS entropy otherwise.
    pub fn draw(&self, request: &DrawRequest) -> Result<Vec<String>, DrawError> {
        let amount = self.validate(request)?;
        let mut rng = match request.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Ok(self.sample(request, amount, &mut rng))
    }

    /// Same as [`Catalog::draw`] but with a caller-owned generator; the
    /// request's `seed` is ignored.
    pub fn draw_with_rng<R: Rng + ?Sized>(
        &self,
        request: &DrawRequest,
        rng: &mut R,
    ) -> Result<Vec<String>, DrawError> {
        let amount = self.validate(request)?;
        Ok(self.sample(request, amount, rng))
    }

    /// Checks quantity and weights; returns the quantity as a count.
    fn validate(&self, request: &DrawRequest) -> Result<usize, DrawError> {
        let quantity = request.quantity;
        if quantity < 1 {
            return Err(DrawError::InvalidQuantity {
                quantity,
                reason: "quantity must be at least 1".to_string(),
            });
        }
        if quantity > MAX_QUANTITY {
            return Err(DrawError::InvalidQuantity {
                quantity,
                reason: format!(
                    "quantity {quantity} is too large; at most {MAX_QUANTITY} per draw"
                ),
            });
        }
        let amount = usize::try_from(quantity).map_err(|_| DrawError::InvalidQuantity {
            quantity,
            reason: format!("quantity {quantity} is too large"),
        })?;
        if request.unique && amount > self.len() {
            return Err(DrawError::InvalidQuantity {
                quantity,
                reason: format!(
                    "quantity must be <= {} when drawing unique prizes",
                    self.len()
                ),
            });
        }
        if let Some(weights) = &request.weights {
            validate_weights(weights, self.len())?;
        }
        Ok(amount)
    }

    fn sample<R: Rng + ?Sized>(
        &self,
        request: &DrawRequest,
        amount: usize,
        rng: &mut R,
    ) -> Vec<String> {
        let weights = request.weights.as_deref().unwrap_or(self.default_weights());
        let names = self.names();

        match (request.unique, request.tiered) {
            (false, false) => uniform_sample_with_replacement(names, amount, rng),
            (false, true) => weighted_sample_with_replacement(names, weights, amount, rng),
            (true, false) => {
                let mut pool = names.to_vec();
                let (drawn, _) = pool.partial_shuffle(rng, amount);
                drawn.to_vec()
            }
            (true, true) => weighted_sample_without_replacement(names, weights, amount, rng),
        }
    }
}

/// Weights must line up with the catalog and be finite and non-negative.
pub fn validate_weights(weights: &[f64], catalog_len: usize) -> Result<(), DrawError> {
    if weights.len() != catalog_len {
        return Err(DrawError::InvalidWeights {
            reason: format!(
                "expected {catalog_len} weights, one per prize, got {}",
                weights.len()
            ),
        });
    }
    if let Some((index, w)) = weights
        .iter()
        .enumerate()
        .find(|(_, w)| !w.is_finite() || **w < 0.0)
    {
        return Err(DrawError::InvalidWeights {
            reason: format!("weight #{} is {w}; weights must be finite and >= 0", index + 1),
        });
    }
    Ok(())
}

/// Independent draws, each landing on `names[i]` with probability
/// `weights[i] / sum(weights)`. All-zero weights fall back to uniform.
fn weighted_sample_with_replacement<R: Rng + ?Sized>(
    names: &[String],
    weights: &[f64],
    amount: usize,
    rng: &mut R,
) -> Vec<String> {
    match WeightedIndex::new(weights.iter().copied()) {
        Ok(dist) => (0..amount)
            .map(|_| names[dist.sample(rng)].clone())
            .collect(),
        Err(_) => uniform_sample_with_replacement(names, amount, rng),
    }
}

/// `names` must not be empty.
fn uniform_sample_with_replacement<R: Rng + ?Sized>(
    names: &[String],
    amount: usize,
    rng: &mut R,
) -> Vec<String> {
    (0..amount)
        .map(|_| names[rng.gen_range(0..names.len())].clone())
        .collect()
}

/// Draws `amount` distinct names, each step picking from the remaining pool
/// by cumulative weight and then removing the pick. When the remaining
/// weight is exhausted the step picks uniformly from what is left.
///
/// `amount` must not exceed `names.len()`.
fn weighted_sample_without_replacement<R: Rng + ?Sized>(
    names: &[String],
    weights: &[f64],
    amount: usize,
    rng: &mut R,
) -> Vec<String> {
    let mut pool: Vec<(&String, f64)> = names.iter().zip(weights.iter().copied()).collect();
    let mut drawn = Vec::with_capacity(amount);

    for _ in 0..amount {
        if pool.is_empty() {
            break;
        }
        let total: f64 = pool.iter().map(|&(_, w)| w).sum();
        let idx = if total <= 0.0 {
            rng.gen_range(0..pool.len())
        } else {
            let r = rng.gen::<f64>() * total;
            let mut cumulative = 0.0;
            pool.iter()
                .position(|&(_, w)| {
                    cumulative += w;
                    w > 0.0 && r <= cumulative
                })
                .unwrap_or(pool.len() - 1)
        };
        let (name, _) = pool.remove(idx);
        drawn.push(name.clone());
    }

    drawn
}

/// Count of each drawn prize, in catalog order, omitting prizes not drawn.
pub fn tally(prizes: &[String], catalog: &Catalog) -> Vec<(String, usize)> {
    catalog
        .names()
        .iter()
        .filter_map(|name| {
            let count = prizes.iter().filter(|p| *p == name).count();
            (count > 0).then(|| (name.clone(), count))
        })
        .collect()
}
