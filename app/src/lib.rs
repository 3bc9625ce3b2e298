//! FILENAME: app/src/lib.rs
//! PURPOSE: GSS survey explorer - configuration, pipeline and chart metadata.
//! CONTEXT: The binary in main.rs is a thin CLI over `SurveyExplorer`.

pub mod config;
pub mod error;
pub mod explorer;
pub mod logging;
pub mod presentation;
pub mod text;

pub use config::{DefectPolicy, SurveyConfig, ATTITUDE_FIELDS, GROUP_FIELDS};
pub use error::AppError;
pub use explorer::SurveyExplorer;
pub use logging::init_logging;
pub use presentation::{
    color_for, group_options, hover_label_for, title_for, x_options, ChartSpec, FieldOption,
    LegendEntry,
};
