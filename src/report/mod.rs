// src/report/mod.rs

//! Report Batch Driver.
//!
//! For a requested set of scenarios × metrics × measures, launches one
//! external reporting invocation per combination through the job runner's
//! single slot, sequentially, and accumulates the produced artifact names.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::config::ReportSection;
use crate::errors::{Result, ScenrunError};
use crate::runner::JobRunner;

/// Extension of the image artifacts the reporting tool produces.
pub const IMAGE_EXT: &str = "jpeg";

/// Result of one batch: echoes of the inputs plus the artifact names, in
/// invocation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportBatch {
    pub scenarios: Vec<String>,
    pub metrics: Vec<String>,
    pub images: Vec<String>,
}

/// Sequential driver for the external reporting executable.
#[derive(Debug)]
pub struct ReportDriver {
    runner: Arc<JobRunner>,
    command: String,
    args: Vec<String>,
    log: PathBuf,
}

impl ReportDriver {
    /// Build a driver from the validated config, resolving the report log
    /// against `workdir`. Invocations share `runner`'s single slot, so a
    /// report can never overlap a simulation run.
    pub fn new(workdir: &Path, report: &ReportSection, runner: Arc<JobRunner>) -> Self {
        Self {
            runner,
            command: report.command.clone(),
            args: report.args.clone(),
            log: workdir.join(&report.log),
        }
    }

    /// Run one reporting invocation per metric × measure combination
    /// (metrics outer, measures inner), blocking on each before the next.
    ///
    /// Output is appended to the shared report log, which is never
    /// truncated. A metric without a `_` separator or an empty scenario set
    /// aborts the batch.
    pub async fn run_reports(
        &self,
        scenarios: &[String],
        metrics: &[String],
        measures: &[String],
    ) -> Result<ReportBatch> {
        if scenarios.is_empty() {
            return Err(ScenrunError::EmptyScenarioSet);
        }

        let scenarios_comma = scenarios.join(",");
        let scenarios_dash = scenarios.join("-");

        let mut images = Vec::new();
        for metric in metrics {
            let (aspect, category) = split_metric(metric)?;

            for measure in measures {
                let image = format!("{scenarios_dash}_{category}_{aspect}_{measure}.{IMAGE_EXT}");

                let mut args = self.args.clone();
                args.extend([
                    "-s".to_string(),
                    scenarios_comma.clone(),
                    "-p".to_string(),
                    category.to_string(),
                    "-a".to_string(),
                    aspect.to_string(),
                    "-m".to_string(),
                    measure.clone(),
                ]);

                debug!(metric = %metric, measure = %measure, image = %image, "running report");
                self.runner
                    .run_to_log(&self.command, &args, &self.log, false)
                    .await?;

                images.push(image);
            }
        }

        Ok(ReportBatch {
            scenarios: scenarios.to_vec(),
            metrics: metrics.to_vec(),
            images,
        })
    }
}

/// Split a metric identifier into its aspect (part 0) and category (part 1).
fn split_metric(metric: &str) -> Result<(&str, &str)> {
    let mut parts = metric.split('_');
    match (parts.next(), parts.next()) {
        (Some(aspect), Some(category)) => Ok((aspect, category)),
        _ => Err(ScenrunError::MalformedMetric(metric.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_aspect_and_category() {
        assert_eq!(split_metric("p_x").unwrap(), ("p", "x"));
        // Extra separators belong to the category-side tail and are ignored.
        assert_eq!(split_metric("p_x_y").unwrap(), ("p", "x"));
    }

    #[test]
    fn missing_separator_is_malformed() {
        assert!(matches!(
            split_metric("plain"),
            Err(ScenrunError::MalformedMetric(_))
        ));
    }
}
