use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::foundation::core::{ColorMatrix, Region, Rgba};
use crate::foundation::error::{RasterError, RasterResult};
use crate::ops::elementwise::ElementwiseOp;
use crate::policy::overflow::OverflowPolicy;
use crate::raster::buffer::PixelBuffer;

/// Declarative sequence of buffer edits, usually loaded from JSON.
///
/// ```json
/// { "overflow": "wrap",
///   "steps": [ { "op": "fill", "x": -1, "y": 0, "w": 2, "h": 2, "color": "#ff000080" },
///              { "op": "combine", "with": "mask", "combine": "multiply", "x": 0, "y": 0, "w": 8, "h": 8 } ] }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EditPlan {
    /// Overflow policy set before the first step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overflow: Option<OverflowPolicy>,
    /// Steps in execution order.
    pub steps: Vec<EditStep>,
}

/// One step of an [`EditPlan`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditStep {
    /// Switch the overflow policy by name.
    SetOverflowMode {
        /// Policy name or alias.
        mode: String,
    },
    /// Write one pixel at a virtual coordinate.
    SetPixel {
        /// Virtual x.
        x: i64,
        /// Virtual y.
        y: i64,
        /// Color to write.
        color: Rgba,
    },
    /// Fill a region.
    Fill {
        /// Target region.
        #[serde(flatten)]
        region: Region,
        /// Fill color.
        color: Rgba,
    },
    /// Apply a color matrix to a region.
    ApplyMatrix {
        /// Target region.
        #[serde(flatten)]
        region: Region,
        /// Row-major 4x4 matrix.
        matrix: ColorMatrix,
    },
    /// Combine a region with a named operand buffer.
    Combine {
        /// Operand name.
        with: String,
        /// Operator.
        combine: ElementwiseOp,
        /// Target region.
        #[serde(flatten)]
        region: Region,
    },
    /// Revert to the current backup.
    Restore,
    /// Mark the buffer for re-upload.
    Update,
}

impl EditStep {
    fn kind(&self) -> &'static str {
        match self {
            Self::SetOverflowMode { .. } => "set_overflow_mode",
            Self::SetPixel { .. } => "set_pixel",
            Self::Fill { .. } => "fill",
            Self::ApplyMatrix { .. } => "apply_matrix",
            Self::Combine { .. } => "combine",
            Self::Restore => "restore",
            Self::Update => "update",
        }
    }
}

/// Outcome of [`EditPlan::apply`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlanReport {
    /// Steps executed.
    pub steps: usize,
    /// Distinct pixels written by each region step, summed over steps, plus one per `set_pixel`.
    pub pixels_written: u64,
}

impl EditPlan {
    /// Parse a plan from JSON text.
    pub fn from_json_str(s: &str) -> RasterResult<Self> {
        serde_json::from_str(s).map_err(|e| RasterError::validation(format!("edit plan: {e}")))
    }

    /// Read and parse a plan file.
    pub fn from_path(path: impl AsRef<Path>) -> RasterResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read edit plan {}", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Names of operand buffers referenced by `combine` steps.
    pub fn operand_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .steps
            .iter()
            .filter_map(|s| match s {
                EditStep::Combine { with, .. } => Some(with.as_str()),
                _ => None,
            })
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Run every step against `target`.
    ///
    /// Each step is atomic; a failing step leaves the buffer as the previous step left it and the
    /// error names the step.
    #[tracing::instrument(level = "debug", skip_all, fields(texture = %target.name(), steps = self.steps.len()))]
    pub fn apply(
        &self,
        target: &mut PixelBuffer,
        operands: &BTreeMap<String, PixelBuffer>,
    ) -> RasterResult<PlanReport> {
        if let Some(policy) = self.overflow {
            target.set_overflow_policy(policy);
        }

        let mut report = PlanReport::default();
        for (i, step) in self.steps.iter().enumerate() {
            let written =
                run_step(step, target, operands).map_err(|cause| RasterError::PlanStepFailed {
                    index: i,
                    kind: step.kind(),
                    cause: Box::new(cause),
                })?;
            report.steps += 1;
            report.pixels_written += written;
        }
        Ok(report)
    }
}

fn run_step(
    step: &EditStep,
    target: &mut PixelBuffer,
    operands: &BTreeMap<String, PixelBuffer>,
) -> RasterResult<u64> {
    match step {
        EditStep::SetOverflowMode { mode } => {
            target.set_overflow_mode(mode)?;
            Ok(0)
        }
        EditStep::SetPixel { x, y, color } => {
            target.set_pixel(*x, *y, *color)?;
            Ok(1)
        }
        EditStep::Fill { region, color } => target.editor().fill(*region, *color),
        EditStep::ApplyMatrix { region, matrix } => target.editor().apply_matrix(*region, matrix),
        EditStep::Combine {
            with,
            combine,
            region,
        } => {
            let other = operands.get(with).ok_or_else(|| {
                RasterError::validation(format!("unknown operand texture \"{with}\""))
            })?;
            target.editor().combine(other, *region, *combine)
        }
        EditStep::Restore => {
            target.restore();
            Ok(0)
        }
        EditStep::Update => {
            target.mark_updated();
            Ok(0)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/plan/edit.rs"]
mod tests;
