//! FILENAME: app/src/config.rs
//! PURPOSE: Survey configuration - loader, normalizer, aggregations and summaries.
//! CONTEXT: `SurveyConfig::default()` is the GSS 2018 extract. Any part can be
//! overridden from a JSON file; missing sections fall back to the defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crosstab_engine::{AggregationSpec, SummarySpec};
use engine::{CategoricalSpec, Derivation, DerivedSpec, NormalizerConfig, NumericSpec};
use persistence::{ColumnSpec, LoaderConfig};

use crate::error::AppError;

// ============================================================================
// FIELD NAMES
// ============================================================================

/// Attitude questions offered on the x axis, in dropdown order.
pub const ATTITUDE_FIELDS: [&str; 6] = [
    "satjob",
    "relationship",
    "male_breadwinner",
    "men_bettersuited",
    "child_suffer",
    "men_overwork",
];

/// Fields offered for grouping, in dropdown order.
pub const GROUP_FIELDS: [&str; 3] = ["sex", "region", "edu_cat"];

const NULL_TOKENS: [&str; 7] = [
    "IAP",
    "IAP,DK,NA,uncodeable",
    "NOT SURE",
    "DK",
    "IAP, DK, NA, uncodeable",
    ".a",
    "CAN'T CHOOSE",
];

const REGIONS: [&str; 9] = [
    "south atlantic",
    "e. nor. central",
    "pacific",
    "w. sou. central",
    "middle atlantic",
    "mountain",
    "e. sou. central",
    "w. nor. central",
    "new england",
];

const AGREE_4: [&str; 4] = ["Strongly disagree", "Disagree", "Agree", "Strongly agree"];

const AGREE_4_CODES: [(&str, &str); 4] = [
    ("strongly disagree", "Strongly disagree"),
    ("disagree", "Disagree"),
    ("agree", "Agree"),
    ("strongly agree", "Strongly agree"),
];

const PRESTIGE_LABELS: [&str; 6] = [
    "Very low",
    "Low",
    "Lower-average",
    "Upper-average",
    "High",
    "Very high",
];

// ============================================================================
// DEFECT POLICY
// ============================================================================

/// What to do when normalization reports data defects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefectPolicy {
    /// Log each distinct defect and keep going with the cells as missing.
    #[default]
    Warn,
    /// Refuse to build if any defect was found.
    Reject,
}

// ============================================================================
// SURVEY CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurveyConfig {
    pub loader: LoaderConfig,
    pub normalizer: NormalizerConfig,
    /// Each entry is `[column field, row field]`.
    pub aggregations: Vec<AggregationSpec>,
    pub summaries: Vec<SummarySpec>,
    pub defect_policy: DefectPolicy,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        SurveyConfig {
            loader: gss_loader(),
            normalizer: gss_normalizer(),
            aggregations: gss_aggregations(),
            summaries: gss_summaries(),
            defect_policy: DefectPolicy::Warn,
        }
    }
}

impl SurveyConfig {
    pub fn from_json_str(json: &str) -> Result<Self, AppError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let text = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    pub fn to_json_pretty(&self) -> Result<String, AppError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn gss_loader() -> LoaderConfig {
    let columns = [
        ("id", "id"),
        ("wtss", "weight"),
        ("sex", "sex"),
        ("educ", "education"),
        ("region", "region"),
        ("age", "age"),
        ("coninc", "income"),
        ("prestg10", "job_prestige"),
        ("mapres10", "mother_job_prestige"),
        ("papres10", "father_job_prestige"),
        ("sei10", "socioeconomic_index"),
        ("satjob", "satjob"),
        ("fechld", "relationship"),
        ("fefam", "male_breadwinner"),
        ("fepol", "men_bettersuited"),
        ("fepresch", "child_suffer"),
        ("meovrwrk", "men_overwork"),
    ]
    .iter()
    .map(|(source, name)| ColumnSpec::new(*source, *name))
    .collect();
    LoaderConfig::new(columns).with_null_tokens(&NULL_TOKENS)
}

fn gss_normalizer() -> NormalizerConfig {
    let numeric = [
        "weight",
        "education",
        "income",
        "job_prestige",
        "mother_job_prestige",
        "father_job_prestige",
        "socioeconomic_index",
    ]
    .iter()
    .map(|name| NumericSpec::new(*name))
    .chain(std::iter::once(
        NumericSpec::new("age").with_sentinel("89 or older", 89.0),
    ))
    .collect();

    let agree_4 = |name: &str| CategoricalSpec::new(name, &AGREE_4).with_codes(&AGREE_4_CODES);

    let categorical = vec![
        CategoricalSpec::new("sex", &["Male", "Female"])
            .with_codes(&[("male", "Male"), ("female", "Female")]),
        CategoricalSpec::new("region", &REGIONS),
        CategoricalSpec::new(
            "satjob",
            &[
                "Very dissatisfied",
                "A little dissatisfied",
                "Moderately satisfied",
                "Very satisfied",
            ],
        )
        .with_codes(&[
            ("very dissatisfied", "Very dissatisfied"),
            ("a little dissat", "A little dissatisfied"),
            ("mod. satisfied", "Moderately satisfied"),
            ("very satisfied", "Very satisfied"),
        ]),
        agree_4("relationship"),
        agree_4("male_breadwinner"),
        CategoricalSpec::new("men_bettersuited", &["Disagree", "Agree"])
            .with_codes(&[("disagree", "Disagree"), ("agree", "Agree")]),
        agree_4("child_suffer"),
        CategoricalSpec::new(
            "men_overwork",
            &[
                "Strongly disagree",
                "Disagree",
                "Neither agree nor disagree",
                "Agree",
                "Strongly agree",
            ],
        )
        .with_codes(&[
            ("strongly disagree", "Strongly disagree"),
            ("disagree", "Disagree"),
            ("neither agree nor disagree", "Neither agree nor disagree"),
            ("agree", "Agree"),
            ("strongly agree", "Strongly agree"),
        ]),
    ];

    let derived = vec![
        DerivedSpec {
            name: "edu_cat".to_string(),
            source: "education".to_string(),
            labels: (0..=20).map(|years| years.to_string()).collect(),
            derivation: Derivation::IntegerLabel,
        },
        DerivedSpec {
            name: "prestige_category".to_string(),
            source: "job_prestige".to_string(),
            labels: PRESTIGE_LABELS.iter().map(|l| l.to_string()).collect(),
            derivation: Derivation::Bins {
                edges: vec![15.0, 26.0, 37.0, 48.0, 59.0, 70.0, 81.0],
            },
        },
    ];

    NormalizerConfig {
        numeric,
        categorical,
        derived,
    }
}

/// Every grouping field against every attitude field, grouping field first.
fn gss_aggregations() -> Vec<AggregationSpec> {
    GROUP_FIELDS
        .iter()
        .flat_map(|group| {
            ATTITUDE_FIELDS
                .iter()
                .map(move |x| AggregationSpec::new(*group, *x))
        })
        .collect()
}

fn gss_summaries() -> Vec<SummarySpec> {
    vec![
        SummarySpec::new(
            &["sex"],
            &["income", "job_prestige", "socioeconomic_index", "education"],
        ),
        SummarySpec::new(&["prestige_category", "sex"], &["income"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = SurveyConfig::default();
        config.loader.validate().unwrap();
        config.normalizer.validate().unwrap();
        assert_eq!(config.loader.columns.len(), 17);
        assert_eq!(config.loader.null_tokens.len(), 7);
        assert_eq!(config.aggregations.len(), 18);
        assert_eq!(config.summaries.len(), 2);
    }

    #[test]
    fn test_aggregations_put_group_first() {
        let config = SurveyConfig::default();
        assert_eq!(config.aggregations[0], AggregationSpec::new("sex", "satjob"));
        assert_eq!(
            config.aggregations[17],
            AggregationSpec::new("edu_cat", "men_overwork")
        );
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = SurveyConfig::from_json_str(
            r#"{"aggregations": [["sex", "satjob"]], "defect_policy": "reject"}"#,
        )
        .unwrap();
        assert_eq!(config.aggregations, vec![AggregationSpec::new("sex", "satjob")]);
        assert_eq!(config.defect_policy, DefectPolicy::Reject);
        assert_eq!(config.normalizer, SurveyConfig::default().normalizer);
    }

    #[test]
    fn test_json_round_trip() {
        let config = SurveyConfig::default();
        let json = config.to_json_pretty().unwrap();
        assert_eq!(SurveyConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        assert!(matches!(
            SurveyConfig::from_json_str("{\"aggregations\": 3}"),
            Err(AppError::Config(_))
        ));
    }
}
