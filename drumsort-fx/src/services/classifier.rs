//! Classify mode
//!
//! Reads a feature table back into typed records and hands it to classifier
//! strategies through a `fit` / `predict` contract. Tree and ensemble
//! strategies live outside this crate; [`MajorityLabel`] is the built-in
//! baseline.

use crate::error::TableError;
use crate::models::{FeatureRecord, CHUNK_COUNT};
use crate::services::table_writer::{table_header, COLUMN_COUNT};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

/// Seed for the train/test shuffle
pub const SPLIT_SEED: u64 = 44_111_342;

/// Share of rows used for training
pub const TRAIN_FRACTION: f64 = 0.6;

/// Feature table loaded into memory
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureTable {
    pub rows: Vec<FeatureRecord>,
}

impl FeatureTable {
    pub fn new(rows: Vec<FeatureRecord>) -> Self {
        Self { rows }
    }

    /// Load a table from a file
    pub fn read_csv(path: &Path) -> Result<Self, TableError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Load a table from any reader, checking the header exactly
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, TableError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let header = csv_reader.headers()?.clone();
        let expected = table_header();
        if header.len() != expected.len() || header.iter().zip(expected.iter()).any(|(a, b)| a != b) {
            return Err(TableError::Header(header.iter().collect::<Vec<_>>().join(",")));
        }

        let mut rows = Vec::new();
        for result in csv_reader.records() {
            let record = result?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            rows.push(parse_row(&record, line)?);
        }

        Ok(Self { rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row count per label
    pub fn label_counts(&self) -> BTreeMap<String, usize> {
        tally(self.rows.iter().map(|r| r.label.as_str()))
    }

    /// Seeded shuffle, then split into (train, test)
    ///
    /// The train side gets `floor(len * train_fraction)` rows.
    pub fn train_test_split(&self, train_fraction: f64, seed: u64) -> (FeatureTable, FeatureTable) {
        let mut rows = self.rows.clone();
        let mut rng = StdRng::seed_from_u64(seed);
        rows.shuffle(&mut rng);

        let cut = ((rows.len() as f64) * train_fraction.clamp(0.0, 1.0)).floor() as usize;
        let test = rows.split_off(cut);
        (FeatureTable::new(rows), FeatureTable::new(test))
    }
}

fn parse_row(record: &csv::StringRecord, line: u64) -> Result<FeatureRecord, TableError> {
    let malformed = |reason: String| TableError::MalformedRow { line, reason };

    if record.len() != COLUMN_COUNT {
        return Err(malformed(format!(
            "expected {} fields, found {}",
            COLUMN_COUNT,
            record.len()
        )));
    }

    let length_ms = record[0]
        .trim()
        .parse::<u64>()
        .map_err(|e| malformed(format!("Length {:?}: {}", &record[0], e)))?;

    let mut pitch = [0.0; CHUNK_COUNT];
    let mut rms = [0.0; CHUNK_COUNT];
    for i in 0..CHUNK_COUNT {
        pitch[i] = parse_float(record, 1 + i).map_err(&malformed)?;
        rms[i] = parse_float(record, 1 + CHUNK_COUNT + i).map_err(&malformed)?;
    }

    let label = record[COLUMN_COUNT - 1].to_string();
    if label.is_empty() {
        return Err(malformed("empty Type".to_string()));
    }

    Ok(FeatureRecord {
        length_ms,
        pitch,
        rms,
        label,
    })
}

fn parse_float(record: &csv::StringRecord, index: usize) -> Result<f64, String> {
    let field = &record[index];
    let value = field
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("column {} {:?}: {}", index, field, e))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("column {} is not finite", index))
    }
}

fn tally<'a>(labels: impl Iterator<Item = &'a str>) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for label in labels {
        *counts.entry(label.to_string()).or_insert(0) += 1;
    }
    counts
}

/// A model produced by [`Classifier::fit`]
pub trait TrainedModel: Send {
    /// One predicted label per row, in row order
    fn predict(&self, table: &FeatureTable) -> Vec<String>;
}

/// A classification strategy
pub trait Classifier {
    /// Display name
    fn name(&self) -> &str;

    /// Train on `table`
    fn fit(&self, table: &FeatureTable) -> Result<Box<dyn TrainedModel>, TableError>;
}

/// Baseline: always predicts the most frequent training label
///
/// Ties go to the label that sorts first.
#[derive(Debug, Clone, Copy, Default)]
pub struct MajorityLabel;

struct ConstantModel {
    label: String,
}

impl TrainedModel for ConstantModel {
    fn predict(&self, table: &FeatureTable) -> Vec<String> {
        vec![self.label.clone(); table.len()]
    }
}

impl Classifier for MajorityLabel {
    fn name(&self) -> &str {
        "MajorityLabel"
    }

    fn fit(&self, table: &FeatureTable) -> Result<Box<dyn TrainedModel>, TableError> {
        let counts = table.label_counts();
        let label = counts
            .iter()
            .fold(None::<(&String, usize)>, |best, (label, &count)| match best {
                Some((_, best_count)) if best_count >= count => best,
                _ => Some((label, count)),
            })
            .map(|(label, _)| label.clone())
            .ok_or(TableError::Empty)?;
        Ok(Box::new(ConstantModel { label }))
    }
}

/// Predictions of one classifier on the test split
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierReport {
    pub classifier: String,
    pub train_rows: usize,
    pub test_rows: usize,
    /// Predicted label → row count
    pub predictions: BTreeMap<String, usize>,
}

/// Split `table`, fit every classifier on the train side and predict the test side
pub fn run_classifiers(
    table: &FeatureTable,
    classifiers: &[Box<dyn Classifier>],
) -> Result<Vec<ClassifierReport>, TableError> {
    if table.is_empty() {
        return Err(TableError::Empty);
    }

    let (train, test) = table.train_test_split(TRAIN_FRACTION, SPLIT_SEED);
    tracing::info!(
        train_rows = train.len(),
        test_rows = test.len(),
        "Feature table split"
    );

    let mut reports = Vec::with_capacity(classifiers.len());
    for classifier in classifiers {
        let model = classifier.fit(&train)?;
        let predicted = model.predict(&test);
        reports.push(ClassifierReport {
            classifier: classifier.name().to_string(),
            train_rows: train.len(),
            test_rows: test.len(),
            predictions: tally(predicted.iter().map(String::as_str)),
        });
    }
    Ok(reports)
}
