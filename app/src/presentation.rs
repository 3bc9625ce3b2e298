//! FILENAME: app/src/presentation.rs
//! PURPOSE: Chart-facing metadata - colors, titles, hover labels, dropdown options.
//! CONTEXT: Nothing here renders. `ChartSpec` is the data a grouped bar chart
//! front end needs for one resolved `(x, group)` view.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crosstab_engine::{Series, TableView};

use crate::config::{ATTITUDE_FIELDS, GROUP_FIELDS};

/// Maximum characters per title line.
pub const TITLE_WRAP_WIDTH: usize = 80;

/// Color used for a group label with no palette entry.
pub const FALLBACK_COLOR: &str = "#98999A";

const PROMPT_RESPONSE: &str = "GSS prompt response";

const CHILD_SUFFER_PROMPT: &str =
    "GSS prompt: \"A preschool child is likely to suffer if his or her mother works.\"";

// ============================================================================
// LOOKUP TABLES
// ============================================================================

/// Group label -> bar color. Sex, region and years of education share one
/// palette; their labels do not collide.
static PALETTE: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut colors = HashMap::from([
        ("Female", "#fde725"),
        ("Male", "#21918c"),
        ("south atlantic", "#fde725"),
        ("e. nor. central", "#c2df23"),
        ("pacific", "#86d549"),
        ("w. sou. central", "#52c569"),
        ("middle atlantic", "#2ab07f"),
        ("mountain", "#1e9b8a"),
        ("e. sou. central", "#25858e"),
        ("w. nor. central", "#2d708e"),
        ("new england", "#38588c"),
    ]);
    let education = [
        ("0", "#443983"),
        ("1", "#404688"),
        ("2", "#3b528b"),
        ("3", "#365d8d"),
        ("4", "#31688e"),
        ("5", "#2c728e"),
        ("6", "#287c8e"),
        ("7", "#24868e"),
        ("8", "#21918c"),
        ("9", "#1f9a8a"),
        ("10", "#20a486"),
        ("11", "#28ae80"),
        ("12", "#35b779"),
        ("13", "#48c16e"),
        ("14", "#5ec962"),
        ("15", "#75d054"),
        ("16", "#90d743"),
        ("17", "#addc30"),
        ("18", "#c8e020"),
        ("19", "#e5e419"),
        ("20", "#fde725"),
    ];
    colors.extend(education);
    colors
});

static TITLES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (
            "satjob",
            "GSS prompt: \"On the whole, how satisfied are you with the work you do?\"",
        ),
        ("relationship", CHILD_SUFFER_PROMPT),
        (
            "male_breadwinner",
            "GSS prompt: \"It is much better for everyone involved if the man is the achiever outside the home and the woman takes care of the home and family.\"",
        ),
        (
            "men_bettersuited",
            "GSS prompt: \"Most men are better suited emotionally for politics than are most women.\"",
        ),
        ("child_suffer", CHILD_SUFFER_PROMPT),
        (
            "men_overwork",
            "GSS prompt: \"Family life often suffers because men concentrate too much on their work.\"",
        ),
        ("sex", "Sex"),
        ("region", "Region of residence"),
        ("edu_cat", "Years of education"),
        ("size", "Size"),
        ("income", "Income"),
        ("job_prestige", "Job prestige rating"),
    ])
});

// ============================================================================
// FIELD METADATA
// ============================================================================

/// Color of a group label.
pub fn color_for(label: &str) -> &'static str {
    PALETTE.get(label).copied().unwrap_or(FALLBACK_COLOR)
}

/// Display title of a field; unknown fields are shown by name.
pub fn title_for(field: &str) -> &str {
    TITLES.get(field).copied().unwrap_or(field)
}

/// Short axis/hover label of a field.
pub fn hover_label_for(field: &str) -> &str {
    if ATTITUDE_FIELDS.contains(&field) {
        PROMPT_RESPONSE
    } else {
        title_for(field)
    }
}

/// A dropdown entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    pub value: String,
    pub label: String,
}

fn options(fields: &[&str]) -> Vec<FieldOption> {
    fields
        .iter()
        .map(|f| FieldOption {
            value: f.to_string(),
            label: f.to_string(),
        })
        .collect()
}

/// Fields selectable on the x axis.
pub fn x_options() -> Vec<FieldOption> {
    options(&ATTITUDE_FIELDS)
}

/// Fields selectable for grouping.
pub fn group_options() -> Vec<FieldOption> {
    options(&GROUP_FIELDS)
}

/// Greedy word wrap; a word longer than `width` gets a line of its own.
pub fn wrap_title(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

// ============================================================================
// CHART SPEC
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: String,
}

/// Everything a grouped bar chart needs for one view: x categories on the
/// horizontal axis, one colored series per group label, counts as bar height.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub x_field: String,
    pub group_field: String,
    pub title_lines: Vec<String>,
    pub x_hover_label: String,
    pub group_hover_label: String,
    pub y_label: String,
    pub x_labels: Vec<String>,
    pub legend: Vec<LegendEntry>,
    pub series: Vec<Series>,
}

impl ChartSpec {
    pub fn for_view(view: &TableView<'_>) -> Self {
        let legend = view
            .group_labels()
            .iter()
            .map(|label| LegendEntry {
                label: label.clone(),
                color: color_for(label).to_string(),
            })
            .collect();

        ChartSpec {
            x_field: view.x_field().to_string(),
            group_field: view.group_field().to_string(),
            title_lines: wrap_title(title_for(view.x_field()), TITLE_WRAP_WIDTH),
            x_hover_label: hover_label_for(view.x_field()).to_string(),
            group_hover_label: hover_label_for(view.group_field()).to_string(),
            y_label: title_for("size").to_string(),
            x_labels: view.x_labels().to_vec(),
            legend,
            series: view.series(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette() {
        assert_eq!(color_for("Male"), "#21918c");
        assert_eq!(color_for("new england"), "#38588c");
        assert_eq!(color_for("0"), "#443983");
        assert_eq!(color_for("20"), "#fde725");
        assert_eq!(color_for("Martian"), FALLBACK_COLOR);
    }

    #[test]
    fn test_titles_and_hover_labels() {
        assert_eq!(title_for("relationship"), title_for("child_suffer"));
        assert_eq!(title_for("edu_cat"), "Years of education");
        assert_eq!(title_for("weight"), "weight");
        assert_eq!(hover_label_for("men_overwork"), "GSS prompt response");
        assert_eq!(hover_label_for("region"), "Region of residence");
    }

    #[test]
    fn test_dropdown_options() {
        let x: Vec<String> = x_options().into_iter().map(|o| o.value).collect();
        assert_eq!(x.len(), 6);
        assert_eq!(x[0], "satjob");
        assert_eq!(group_options().len(), 3);
    }

    #[test]
    fn test_wrap_title() {
        let lines = wrap_title(title_for("male_breadwinner"), TITLE_WRAP_WIDTH);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.chars().count() <= TITLE_WRAP_WIDTH));
        assert_eq!(lines.join(" "), title_for("male_breadwinner"));

        assert_eq!(wrap_title("Sex", 80), vec!["Sex".to_string()]);
        assert!(wrap_title("", 80).is_empty());
    }
}
