use std::time::Instant;

use pixel_engine::{EngineError, Operation, Process, Raster};

use crate::error::AppError;
use crate::models::{AppConfig, StepConfig};

/// Ordered list of engine operations run one after another
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pipeline {
    steps: Vec<Operation>,
}

impl Pipeline {
    pub fn new(steps: Vec<Operation>) -> Self {
        Self { steps }
    }

    /// Build from config steps, validating every step before any pixel is
    /// touched
    pub fn from_steps(steps: &[StepConfig]) -> Result<Self, AppError> {
        let steps = steps
            .iter()
            .enumerate()
            .map(|(index, step)| {
                step.to_operation()
                    .and_then(|op| validate(&op).map(|()| op))
                    .map_err(|e| step_error(index, step.op(), e))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { steps })
    }

    /// Build from a named preset
    pub fn from_preset(config: &AppConfig, name: &str) -> Result<Self, AppError> {
        let pipeline = Self::from_steps(config.preset(name)?)?;
        tracing::debug!(preset = name, steps = pipeline.len(), "Built pipeline");
        Ok(pipeline)
    }

    pub fn steps(&self) -> &[Operation] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Append a step
    pub fn push(&mut self, op: impl Into<Operation>) {
        self.steps.push(op.into());
    }

    /// Run every step in order; each step reads the previous step's output
    pub fn run(&self, raster: &Raster) -> Result<Raster, AppError> {
        let mut current = raster.clone();
        for (index, op) in self.steps.iter().enumerate() {
            let start = Instant::now();
            current = op
                .process(&current)
                .map_err(|e| step_error(index, op.name(), e))?;
            tracing::debug!(
                step = index,
                op = op.name(),
                width = current.width(),
                height = current.height(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Step finished"
            );
        }
        Ok(current)
    }
}

fn validate(op: &Operation) -> Result<(), EngineError> {
    match op {
        Operation::Quantize(params) => params.validate(),
        Operation::Dither(params) => params.validate(),
        Operation::Threshold(params) => params.validate(),
        Operation::Curves(_) => Ok(()),
    }
}

fn step_error(index: usize, op: &'static str, e: EngineError) -> AppError {
    AppError::StepFailed {
        index,
        op,
        message: e.to_string(),
    }
}
