//! FILENAME: app/src/explorer.rs
//! PURPOSE: The full pipeline, Loader -> Normalizer -> Aggregator -> Index.
//! CONTEXT: Built once at startup. After `build` returns, the explorer is
//! read-only and can be shared between threads behind an `Arc`.

use std::io::Read;
use std::path::Path;

use log::{info, warn};

use crosstab_engine::{build_summary, CrosstabIndex, SummaryTable, TableView};
use engine::{Dataset, NormalizationReport, Normalizer, RawDataset};
use persistence::{load_csv, load_reader};

use crate::config::{DefectPolicy, SurveyConfig};
use crate::error::AppError;
use crate::presentation::ChartSpec;

pub struct SurveyExplorer {
    config: SurveyConfig,
    dataset: Dataset,
    report: NormalizationReport,
    index: CrosstabIndex,
    summaries: Vec<SummaryTable>,
}

impl SurveyExplorer {
    /// Runs every stage over CSV bytes from `source`. Any configuration
    /// error aborts; data defects are handled per `config.defect_policy`.
    pub fn build<R: Read>(config: SurveyConfig, source: R) -> Result<Self, AppError> {
        let raw = load_reader(source, &config.loader)?;
        Self::from_raw(config, &raw)
    }

    pub fn from_path(config: SurveyConfig, path: impl AsRef<Path>) -> Result<Self, AppError> {
        let raw = load_csv(path.as_ref(), &config.loader)?;
        Self::from_raw(config, &raw)
    }

    /// Runs the stages after loading over an already loaded dataset.
    pub fn from_raw(config: SurveyConfig, raw: &RawDataset) -> Result<Self, AppError> {
        let normalizer = Normalizer::new(config.normalizer.clone())?;
        let (dataset, report) = normalizer.normalize(raw)?;

        if !report.is_clean() {
            match config.defect_policy {
                DefectPolicy::Warn => warn!(
                    "Continuing with {} data defect(s) treated as missing",
                    report.len()
                ),
                DefectPolicy::Reject => {
                    return Err(AppError::DefectsRejected {
                        count: report.len(),
                    })
                }
            }
        }

        let index = CrosstabIndex::build(&dataset, &config.aggregations)?;
        let summaries = config
            .summaries
            .iter()
            .map(|spec| build_summary(&dataset, spec))
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            "Survey explorer ready: {} records, {} tables, {} summaries",
            dataset.len(),
            index.len(),
            summaries.len()
        );

        Ok(SurveyExplorer {
            config,
            dataset,
            report,
            index,
            summaries,
        })
    }

    /// The table for `(x, group)` with `x` on the column axis.
    pub fn resolve(&self, x: &str, group: &str) -> Result<TableView<'_>, AppError> {
        Ok(self.index.resolve(x, group)?)
    }

    /// The resolved view packaged for a grouped bar chart.
    pub fn chart(&self, x: &str, group: &str) -> Result<ChartSpec, AppError> {
        let view = self.resolve(x, group)?;
        Ok(ChartSpec::for_view(&view))
    }

    pub fn config(&self) -> &SurveyConfig {
        &self.config
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn report(&self) -> &NormalizationReport {
        &self.report
    }

    pub fn index(&self) -> &CrosstabIndex {
        &self.index
    }

    /// Summary tables in configuration order.
    pub fn summaries(&self) -> &[SummaryTable] {
        &self.summaries
    }

    /// The summary grouped by exactly `group_by`, if one was configured.
    pub fn summary(&self, group_by: &[&str]) -> Option<&SummaryTable> {
        self.summaries.iter().find(|s| {
            s.group_by.len() == group_by.len()
                && s.group_by.iter().zip(group_by).all(|(a, b)| a == b)
        })
    }
}
