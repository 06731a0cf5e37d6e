//! Feature table read back through a plain CSV reader

mod helpers;

use drumsort_fx::features::FeatureAssembler;
use drumsort_fx::services::table_writer::table_header;
use drumsort_fx::services::{FeatureTable, TableWriter};
use drumsort_fx::{FeatureRecord, CHUNK_COUNT};
use helpers::{write_tone, ToneConfig};
use tempfile::TempDir;

fn extracted_records(dir: &std::path::Path) -> Vec<FeatureRecord> {
    let mut assembler = FeatureAssembler::default();
    [(220.0, 0.3, "Kick"), (880.0, 0.45, "Hat"), (523.25, 0.6, "Tom, floor")]
        .iter()
        .enumerate()
        .map(|(i, (frequency, seconds, label))| {
            let path = dir.join(format!("tone_{}.wav", i));
            write_tone(
                &path,
                &ToneConfig {
                    frequency: *frequency,
                    duration_seconds: *seconds,
                    amplitude: 0.3 + 0.1 * i as f64,
                    ..ToneConfig::default()
                },
            )
            .unwrap();
            assembler.extract_file(&path, label).unwrap()
        })
        .collect()
}

#[test]
fn test_standard_reader_reproduces_records() {
    let temp_dir = TempDir::new().unwrap();
    let records = extracted_records(temp_dir.path());
    let output = temp_dir.path().join("result.csv");

    let mut writer = TableWriter::create(&output).unwrap();
    for record in &records {
        writer.write_record(record).unwrap();
    }
    writer.finish().unwrap();

    let mut reader = csv::Reader::from_path(&output).unwrap();
    let header: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(header, table_header());

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), records.len());

    for (row, record) in rows.iter().zip(records.iter()) {
        assert_eq!(row[0].parse::<u64>().unwrap(), record.length_ms);
        for i in 0..CHUNK_COUNT {
            let pitch: f64 = row[1 + i].parse().unwrap();
            let rms: f64 = row[1 + CHUNK_COUNT + i].parse().unwrap();
            assert!((pitch - record.pitch[i]).abs() <= 1e-6, "pitch {}", i);
            assert!((rms - record.rms[i]).abs() <= 1e-6, "rms {}", i);
        }
        assert_eq!(&row[2 * CHUNK_COUNT + 1], record.label);
    }
}

#[test]
fn test_feature_table_reads_extracted_output() {
    let temp_dir = TempDir::new().unwrap();
    let records = extracted_records(temp_dir.path());
    let output = temp_dir.path().join("result.csv");

    let mut writer = TableWriter::create(&output).unwrap();
    for record in &records {
        writer.write_record(record).unwrap();
    }
    writer.finish().unwrap();

    let table = FeatureTable::read_csv(&output).unwrap();
    let labels: Vec<&str> = table.rows.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, vec!["Kick", "Hat", "Tom, floor"]);
    assert_eq!(table.rows[2].length_ms, records[2].length_ms);
}
