// SPDX-License-Identifier: MIT
//
// Copyright (c) 2025 Alexandre Severino
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

use crate::error::MeshError;

/// Largest minimum angle, in degrees, for which refinement is known to
/// terminate in practice without a Steiner point budget.
pub const RELIABLE_MIN_ANGLE: f64 = 34.0;

/// Steiner points a single refinement run may insert when the minimum angle
/// exceeds [`RELIABLE_MIN_ANGLE`] and no budget was given.
pub const FALLBACK_STEINER_POINTS: usize = 10_000;

/// Options controlling how a mesh is built and refined.
///
/// ```
/// use trimesh2d::MeshOptions;
///
/// let options = MeshOptions::new()
///     .with_min_angle(20.0)
///     .with_max_area(0.5)
///     .with_max_steiner_points(10_000);
/// assert!(options.quality_requested());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MeshOptions {
    /// Maintain constraint-edge records. Forced on when segments, holes or
    /// quality bounds are present.
    pub track_constraints: bool,
    /// Honor per-triangle area constraints (set through regions).
    pub variable_area: bool,
    /// Minimum angle in degrees, `0 <= θ < 60`.
    pub min_angle: Option<f64>,
    /// Global maximum triangle area.
    pub max_area: Option<f64>,
    /// Cap on Steiner points over the mesh's lifetime. `None` is unbounded
    /// unless `min_angle` exceeds [`RELIABLE_MIN_ANGLE`], in which case each
    /// refinement run stops after [`FALLBACK_STEINER_POINTS`].
    pub max_steiner_points: Option<usize>,
    /// Remove the triangles reachable from the hull without crossing a
    /// segment. Off by default, so the full convex hull is kept.
    pub carve_concavities: bool,
    /// Seed of the random restarts of point location.
    pub seed: u64,
}

impl Default for MeshOptions {
    fn default() -> Self {
        Self {
            track_constraints: true,
            variable_area: false,
            min_angle: None,
            max_area: None,
            max_steiner_points: None,
            carve_concavities: false,
            seed: 0x5eed,
        }
    }
}

impl MeshOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_track_constraints(mut self, track: bool) -> Self {
        self.track_constraints = track;
        self
    }

    pub fn with_variable_area(mut self, variable_area: bool) -> Self {
        self.variable_area = variable_area;
        self
    }

    pub fn with_min_angle(mut self, degrees: f64) -> Self {
        self.min_angle = Some(degrees);
        self
    }

    pub fn with_max_area(mut self, max_area: f64) -> Self {
        self.max_area = Some(max_area);
        self
    }

    pub fn with_max_steiner_points(mut self, max: usize) -> Self {
        self.max_steiner_points = Some(max);
        self
    }

    pub fn with_carve_concavities(mut self, carve: bool) -> Self {
        self.carve_concavities = carve;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Whether [`crate::Mesh::build`] runs the refinement driver.
    pub fn quality_requested(&self) -> bool {
        self.min_angle.is_some_and(|a| a > 0.0) || self.max_area.is_some() || self.variable_area
    }

    /// Total Steiner point count at which a refinement run starting with
    /// `inserted` points stops.
    pub(crate) fn steiner_limit(&self, inserted: usize) -> Option<usize> {
        match self.max_steiner_points {
            Some(max) => Some(max),
            None if self.min_angle.is_some_and(|a| a > RELIABLE_MIN_ANGLE) => {
                Some(inserted + FALLBACK_STEINER_POINTS)
            }
            None => None,
        }
    }

    pub fn validate(&self) -> Result<(), MeshError> {
        if let Some(angle) = self.min_angle {
            if !(0.0..60.0).contains(&angle) {
                return Err(MeshError::invalid(format!(
                    "minimum angle must lie in [0, 60) degrees, got {angle}"
                )));
            }
        }
        if let Some(area) = self.max_area {
            if !(area > 0.0) || !area.is_finite() {
                return Err(MeshError::invalid(format!(
                    "maximum area must be positive, got {area}"
                )));
            }
        }
        Ok(())
    }
}
