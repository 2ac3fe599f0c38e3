//! D4 symmetry group operations and training-set augmentation

use std::{collections::HashSet, hash::Hash};

use serde::{Deserialize, Serialize};

use super::board::{BoardState, CELLS};
use crate::Result;

/// D4 symmetry transformation (dihedral group of the square)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct D4Transform {
    /// Rotation in degrees (0, 90, 180, 270)
    pub rotation: u16,
    /// Whether to apply reflection
    pub reflection: bool,
}

impl D4Transform {
    /// Create identity transform
    pub fn identity() -> Self {
        D4Transform {
            rotation: 0,
            reflection: false,
        }
    }

    /// Get all 8 D4 transforms, identity first
    pub fn all() -> [D4Transform; 8] {
        let mut transforms = [D4Transform::identity(); 8];
        for (i, rotation) in [0, 90, 180, 270].into_iter().enumerate() {
            transforms[2 * i] = D4Transform {
                rotation,
                reflection: false,
            };
            transforms[2 * i + 1] = D4Transform {
                rotation,
                reflection: true,
            };
        }
        transforms
    }

    pub fn is_identity(&self) -> bool {
        *self == D4Transform::identity()
    }

    /// Apply transform to a position (0-8)
    pub fn transform_position(&self, pos: usize) -> usize {
        let (mut row, mut col) = (pos / 3, pos % 3);

        // Mirror across the vertical axis, then rotate clockwise.
        if self.reflection {
            col = 2 - col;
        }

        for _ in 0..(self.rotation / 90) {
            let new_row = col;
            let new_col = 2 - row;
            row = new_row;
            col = new_col;
        }

        row * 3 + col
    }

    /// Apply transform to any nine-cell grid
    pub fn apply<T: Copy>(&self, cells: &[T; CELLS]) -> [T; CELLS] {
        let mut transformed = *cells;
        for (idx, &value) in cells.iter().enumerate() {
            transformed[self.transform_position(idx)] = value;
        }
        transformed
    }

    /// Get the inverse transform
    pub fn inverse(&self) -> D4Transform {
        if self.reflection {
            // Reflect-then-rotate elements are all involutions.
            *self
        } else {
            D4Transform {
                rotation: (360 - self.rotation) % 360,
                reflection: false,
            }
        }
    }

    /// The transform equivalent to applying `self` and then `other`
    pub fn then(&self, other: &D4Transform) -> D4Transform {
        let probe: [usize; CELLS] = std::array::from_fn(|i| i);
        let target = other.apply(&self.apply(&probe));
        D4Transform::all()
            .into_iter()
            .find(|t| t.apply(&probe) == target)
            .unwrap_or_else(D4Transform::identity)
    }
}

impl BoardState {
    /// Apply a D4 transform to the board.
    ///
    /// Status and turn are invariant under symmetry, so the transformed board
    /// keeps both.
    pub fn transform(&self, t: &D4Transform) -> Result<Self> {
        self.remap(t.apply(self.cells()))
    }
}

/// Every distinct image of `cells` under the D4 group, starting with `cells` itself
pub fn orbit<T: Copy + Eq + Hash>(cells: &[T; CELLS]) -> Vec<[T; CELLS]> {
    let mut seen = HashSet::with_capacity(8);
    D4Transform::all()
        .iter()
        .map(|t| t.apply(cells))
        .filter(|image| seen.insert(*image))
        .collect()
}

/// Expand labelled grids with all their symmetric images.
///
/// The input rows come first in their original order (duplicates dropped),
/// followed by newly generated images. A row is a duplicate when both its
/// cells and its label match an earlier row. The result never exceeds eight
/// times the input, and expanding an already closed set adds nothing.
pub fn expand_symmetries<T, L>(samples: &[([T; CELLS], L)]) -> Vec<([T; CELLS], L)>
where
    T: Copy + Eq + Hash,
    L: Copy + Eq + Hash,
{
    let mut seen: HashSet<([T; CELLS], L)> = HashSet::with_capacity(samples.len() * 8);
    let mut expanded = Vec::with_capacity(samples.len() * 8);

    for sample in samples {
        if seen.insert(*sample) {
            expanded.push(*sample);
        }
    }

    for &(cells, label) in samples {
        for transform in D4Transform::all().iter().filter(|t| !t.is_identity()) {
            let image = (transform.apply(&cells), label);
            if seen.insert(image) {
                expanded.push(image);
            }
        }
    }

    expanded
}
