use std::collections::BTreeSet;
use std::path::Path;

use log::{debug, info};

use crate::config::ALL_SELECTOR;
use crate::error::DatasetError;
use crate::models::{StudentRecord, Subject};

const MAX_SCORE: u8 = 100;

/// The built-in table the dashboard renders when no CSV is supplied.
pub fn sample_dataset() -> Vec<StudentRecord> {
    let rows = [
        ("Amit", "10A", 78, 82, 75, "B", "Jan"),
        ("Riya", "10A", 85, 88, 80, "A", "Jan"),
        ("Suresh", "10B", 67, 70, 72, "C", "Feb"),
        ("Neha", "10B", 90, 92, 85, "A", "Feb"),
        ("Rahul", "10A", 88, 85, 90, "A", "Mar"),
        ("Pooja", "10C", 72, 75, 78, "B", "Mar"),
        ("Karan", "10C", 81, 79, 83, "B", "Apr"),
        ("Sneha", "10B", 95, 93, 88, "A", "Apr"),
    ];

    rows.iter()
        .enumerate()
        .map(
            |(index, (name, class, maths, science, english, grade, month))| StudentRecord {
                name: name.to_string(),
                class: class.to_string(),
                maths: *maths,
                science: *science,
                english: *english,
                grade: grade.to_string(),
                month: month.to_string(),
                profile: format!("https://i.pravatar.cc/100?img={}", index + 1),
            },
        )
        .collect()
}

/// Read a headered CSV dataset (`student,class,maths,science,english,grade,month,profile`).
pub fn load_csv(path: &Path) -> Result<Vec<StudentRecord>, DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;
    let mut records = Vec::new();

    for result in reader.deserialize::<StudentRecord>() {
        let record = result?;
        validate_record(&record)?;
        records.push(record);
    }

    if records.is_empty() {
        return Err(DatasetError::Empty);
    }

    info!("Loaded {} students from {}", records.len(), path.display());
    Ok(records)
}

pub fn write_csv(records: &[StudentRecord], path: &Path) -> Result<(), DatasetError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    debug!("Wrote {} students to {}", records.len(), path.display());
    Ok(())
}

fn validate_record(record: &StudentRecord) -> Result<(), DatasetError> {
    // A class named like the sentinel could never be selected on its own.
    if record.class == ALL_SELECTOR {
        return Err(DatasetError::ReservedClass {
            student: record.name.clone(),
            class: record.class.clone(),
        });
    }

    for subject in Subject::ALL {
        let score = record.score(subject);
        if score > MAX_SCORE {
            return Err(DatasetError::ScoreOutOfRange {
                student: record.name.clone(),
                subject: subject.label(),
                score,
            });
        }
    }
    Ok(())
}

/// Selector choices: the "All" sentinel followed by the sorted distinct classes.
///
/// Always computed from the unfiltered dataset so every class stays selectable.
pub fn class_options(records: &[StudentRecord]) -> Vec<String> {
    let classes: BTreeSet<&str> = records.iter().map(|r| r.class.as_str()).collect();

    std::iter::once(ALL_SELECTOR.to_string())
        .chain(classes.into_iter().map(str::to_string))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{filter_records, ClassSelector};
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn sample_has_eight_students_in_source_order() {
        let records = sample_dataset();
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Amit", "Riya", "Suresh", "Neha", "Rahul", "Pooja", "Karan", "Sneha"]
        );
        assert_eq!(records[7].profile, "https://i.pravatar.cc/100?img=8");
    }

    #[test]
    fn options_are_sentinel_then_sorted_classes() {
        let options = class_options(&sample_dataset());
        assert_eq!(options, vec!["All", "10A", "10B", "10C"]);
    }

    #[test]
    fn seed_file_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("students.csv");

        write_csv(&sample_dataset(), &path).unwrap();
        let loaded = load_csv(&path).unwrap();

        assert_eq!(loaded, sample_dataset());
    }

    #[test]
    fn rejects_scores_above_one_hundred() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "student,class,maths,science,english,grade,month,profile").unwrap();
        writeln!(file, "Avery,11A,101,80,80,A,May,https://example.com/a.png").unwrap();

        let err = load_csv(file.path()).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::ScoreOutOfRange { subject: "Maths", score: 101, .. }
        ));
    }

    #[test]
    fn padded_fields_load_trimmed_and_every_option_selects() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "student, class, maths, science, english, grade, month, profile").unwrap();
        writeln!(file, "Avery, 10A , 70, 80, 90, B , Jan, https://example.com/a.png").unwrap();
        writeln!(file, " Jules,10B,60 ,65,70,C,Feb,https://example.com/j.png").unwrap();

        let records = load_csv(file.path()).unwrap();
        assert_eq!(records[0].class, "10A");
        assert_eq!(records[1].name, "Jules");

        let options = class_options(&records);
        assert_eq!(options, vec!["All", "10A", "10B"]);
        for option in options.iter().skip(1) {
            let selector: ClassSelector = option.parse().unwrap();
            assert_eq!(filter_records(&records, &selector).len(), 1, "class {option}");
        }
    }

    #[test]
    fn rejects_class_named_like_the_sentinel() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "student,class,maths,science,english,grade,month,profile").unwrap();
        writeln!(file, "Avery,10A,70,80,90,B,Jan,https://example.com/a.png").unwrap();
        writeln!(file, "Jules,All,60,65,70,C,Feb,https://example.com/j.png").unwrap();

        let err = load_csv(file.path()).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::ReservedClass { ref student, ref class }
                if student == "Jules" && class == "All"
        ));
    }

    #[test]
    fn header_only_file_is_empty() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "student,class,maths,science,english,grade,month,profile").unwrap();

        assert!(matches!(load_csv(file.path()), Err(DatasetError::Empty)));
    }
}
