use eframe::egui::{Vec2, vec2};

use crate::error::LayoutError;

/// Projects an ordered set of equal-length vectors to one 2D point each.
///
/// Implementations see the whole current set on every call. The returned points
/// are in projection units; callers normalize them before mapping to pixels.
pub trait Reducer: Send {
    fn name(&self) -> &'static str;

    fn project(&self, vectors: &[&[f32]]) -> Result<Vec<Vec2>, LayoutError>;
}

const VARIANCE_EPSILON: f64 = 1e-12;

/// Batch principal component analysis onto the top two axes.
///
/// Axes come from power iteration on the implicit covariance `Σ c·cᵀ / n`, so
/// memory stays at `n × d` even for wide embeddings. The basis is recomputed
/// from scratch on every call and may rotate or flip between calls.
#[derive(Clone, Copy, Debug)]
pub struct PcaReducer {
    pub max_iterations: usize,
    pub tolerance: f64,
}

impl Default for PcaReducer {
    fn default() -> Self {
        Self {
            max_iterations: 256,
            tolerance: 1e-10,
        }
    }
}

impl Reducer for PcaReducer {
    fn name(&self) -> &'static str {
        "pca"
    }

    fn project(&self, vectors: &[&[f32]]) -> Result<Vec<Vec2>, LayoutError> {
        let Some(first) = vectors.first() else {
            return Err(LayoutError::InsufficientData);
        };

        let dim = first.len();
        if let Some(bad) = vectors.iter().find(|vector| vector.len() != dim) {
            return Err(LayoutError::DimensionMismatch {
                expected: dim,
                actual: bad.len(),
            });
        }

        let n = vectors.len();
        if n == 1 {
            return Ok(vec![Vec2::ZERO]);
        }

        let mut mean = vec![0.0_f64; dim];
        let mut scale = 0.0_f64;
        for vector in vectors {
            for (sum, &value) in mean.iter_mut().zip(vector.iter()) {
                let value = f64::from(value);
                *sum += value;
                scale += value * value;
            }
        }
        for value in &mut mean {
            *value /= n as f64;
        }
        scale /= n as f64;

        let centered = vectors
            .iter()
            .map(|vector| {
                vector
                    .iter()
                    .zip(&mean)
                    .map(|(&value, &center)| f64::from(value) - center)
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();

        let total_variance = centered.iter().map(|row| dot(row, row)).sum::<f64>() / n as f64;
        let floor = VARIANCE_EPSILON * scale.max(f64::MIN_POSITIVE);
        if total_variance <= floor {
            return Ok(vec![Vec2::ZERO; n]);
        }

        let mut axes: Vec<Vec<f64>> = Vec::with_capacity(2);
        while axes.len() < 2 {
            match self.principal_axis(&centered, &axes, floor) {
                Some(axis) => axes.push(axis),
                None => break,
            }
        }

        let points = centered
            .iter()
            .map(|row| {
                let x = axes.first().map_or(0.0, |axis| dot(row, axis));
                let y = axes.get(1).map_or(0.0, |axis| dot(row, axis));
                vec2(x as f32, y as f32)
            })
            .collect();
        Ok(points)
    }
}

impl PcaReducer {
    /// Dominant direction of `centered` orthogonal to every axis in `previous`,
    /// or `None` when the remaining variance is below `floor`.
    fn principal_axis(
        &self,
        centered: &[Vec<f64>],
        previous: &[Vec<f64>],
        floor: f64,
    ) -> Option<Vec<f64>> {
        let mut axis = seed_direction(centered, previous, floor)?;

        for _ in 0..self.max_iterations {
            let mut next = covariance_times(centered, &axis);
            orthogonalize(&mut next, previous);

            let eigenvalue = dot(&next, &next).sqrt();
            if eigenvalue <= floor {
                return None;
            }
            for value in &mut next {
                *value /= eigenvalue;
            }

            let delta = next
                .iter()
                .zip(&axis)
                .map(|(a, b)| (a - b) * (a - b))
                .sum::<f64>()
                .sqrt();
            axis = next;
            if delta < self.tolerance {
                break;
            }
        }

        orient(&mut axis);
        Some(axis)
    }
}

/// Starts the iteration from the data row with the largest residual after
/// removing `previous` axes. Starting inside the data span avoids seeds that
/// are orthogonal to every principal direction.
fn seed_direction(centered: &[Vec<f64>], previous: &[Vec<f64>], floor: f64) -> Option<Vec<f64>> {
    let mut best: Option<(f64, Vec<f64>)> = None;
    for row in centered {
        let mut residual = row.clone();
        orthogonalize(&mut residual, previous);
        let norm_sq = dot(&residual, &residual);
        if best.as_ref().is_none_or(|(best_norm, _)| norm_sq > *best_norm) {
            best = Some((norm_sq, residual));
        }
    }

    let (norm_sq, mut seed) = best?;
    if norm_sq <= floor {
        return None;
    }

    let norm = norm_sq.sqrt();
    for value in &mut seed {
        *value /= norm;
    }
    Some(seed)
}

fn covariance_times(centered: &[Vec<f64>], axis: &[f64]) -> Vec<f64> {
    let mut out = vec![0.0; axis.len()];
    for row in centered {
        let score = dot(row, axis);
        for (acc, value) in out.iter_mut().zip(row) {
            *acc += value * score;
        }
    }
    let n = centered.len() as f64;
    for value in &mut out {
        *value /= n;
    }
    out
}

fn orthogonalize(vector: &mut [f64], axes: &[Vec<f64>]) {
    for axis in axes {
        let overlap = dot(vector, axis);
        for (value, component) in vector.iter_mut().zip(axis) {
            *value -= overlap * component;
        }
    }
}

/// Fixes the sign so the largest-magnitude component is positive.
fn orient(axis: &mut [f64]) {
    let pivot = axis
        .iter()
        .copied()
        .fold(0.0_f64, |best, value| if value.abs() > best.abs() { value } else { best });
    if pivot < 0.0 {
        for value in axis.iter_mut() {
            *value = -*value;
        }
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
