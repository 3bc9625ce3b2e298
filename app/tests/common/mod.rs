//! FILENAME: tests/common/mod.rs
//! Fixtures for survey explorer integration tests. Rows use the raw GSS
//! column names and codes, exactly as they appear in the source extract.

#![allow(dead_code)]

use std::io::Write;

use app_lib::{SurveyConfig, SurveyExplorer};
use tempfile::NamedTempFile;

pub const HEADER: &str = "id,year,wtss,sex,educ,region,age,coninc,prestg10,mapres10,papres10,sei10,satjob,fechld,fefam,fepol,fepresch,meovrwrk";

/// Six respondents. Covers null tokens, an empty cell, the top-coded age
/// and a column (`year`) outside the whitelist.
pub const ROWS: [&str; 6] = [
    "1,2018,1.0,male,14,pacific,43,31200,47,53,45,61.5,very satisfied,agree,agree,disagree,agree,agree",
    "2,2018,0.9,female,10,new england,89 or older,,22,IAP,DK,24.2,mod. satisfied,strongly disagree,strongly disagree,agree,disagree,neither agree nor disagree",
    "3,2018,1.1,male,16,pacific,29,96000,65,47,.a,75.0,a little dissat,disagree,agree,agree,strongly agree,disagree",
    "4,2018,1.0,female,12,south atlantic,55,42000,40,iap,IAP,40.1,very satisfied,\"IAP,DK,NA,uncodeable\",disagree,CAN'T CHOOSE,disagree,strongly agree",
    "5,2018,0.8,female,20,middle atlantic,61,120000,72,70,60,80.3,very dissatisfied,agree,agree,disagree,agree,agree",
    "6,2018,1.2,male,12,south atlantic,37,22000,30,IAP,35,30.0,mod. satisfied,strongly agree,DK,agree,strongly agree,strongly disagree",
];

/// Joins a header and rows into CSV text.
pub fn csv_of(header: &str, rows: &[&str]) -> String {
    let mut text = String::from(header);
    for row in rows {
        text.push('\n');
        text.push_str(row);
    }
    text.push('\n');
    text
}

pub fn fixture_csv() -> String {
    csv_of(HEADER, &ROWS)
}

/// Builds an explorer with the default GSS configuration over `csv`.
pub fn explorer_from(csv: &str) -> SurveyExplorer {
    SurveyExplorer::build(SurveyConfig::default(), csv.as_bytes()).unwrap()
}

pub fn fixture_explorer() -> SurveyExplorer {
    explorer_from(&fixture_csv())
}

/// Writes `contents` to a temporary file that lives as long as the handle.
pub fn temp_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// A fixture row with one raw GSS column replaced.
pub fn row_with(row: &str, column: &str, value: &str) -> String {
    let position = HEADER.split(',').position(|c| c == column).unwrap();
    row.split(',')
        .enumerate()
        .map(|(i, cell)| if i == position { value } else { cell })
        .collect::<Vec<_>>()
        .join(",")
}
