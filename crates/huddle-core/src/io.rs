//! Student source and group sink
//!
//! Students are read from JSON (an array of `{id, primary, secondary}`
//! objects) or CSV (header `id,primary,secondary`). A missing or empty
//! secondary interest falls back to the primary. Plans are written back out
//! as JSON (groups, ungrouped students and stats) or as flat CSV rows.

use crate::stats::PlanStats;
use crate::student::{Group, Plan, Student};
use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

/// Input formats understood by [`read_students`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudentFormat {
    Json,
    Csv,
}

impl StudentFormat {
    /// Pick a format from the file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("csv") => Ok(Self::Csv),
            Some(other) => anyhow::bail!("Unsupported student file format: .{other}"),
            None => anyhow::bail!(
                "Cannot determine student file format for {} (expected .json or .csv)",
                path.display()
            ),
        }
    }
}

#[derive(Debug, Deserialize)]
struct StudentRecord {
    id: String,
    primary: String,
    #[serde(default)]
    secondary: Option<String>,
}

impl From<StudentRecord> for Student {
    fn from(record: StudentRecord) -> Self {
        let secondary = record
            .secondary
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| record.primary.clone());
        Student::new(record.id, record.primary, secondary)
    }
}

/// Load students from a `.json` or `.csv` file
pub fn read_students(path: &Path) -> Result<Vec<Student>> {
    let format = StudentFormat::from_path(path)?;
    let file = File::open(path)
        .with_context(|| format!("Failed to open student file: {}", path.display()))?;
    let reader = BufReader::new(file);

    let students = match format {
        StudentFormat::Json => read_students_json(reader),
        StudentFormat::Csv => read_students_csv(reader),
    }
    .with_context(|| format!("Failed to load students from {}", path.display()))?;

    tracing::debug!(count = students.len(), path = %path.display(), "loaded students");
    Ok(students)
}

pub fn read_students_json<R: Read>(reader: R) -> Result<Vec<Student>> {
    let records: Vec<StudentRecord> =
        serde_json::from_reader(reader).context("Failed to parse student JSON")?;
    Ok(records.into_iter().map(Student::from).collect())
}

pub fn read_students_csv<R: Read>(reader: R) -> Result<Vec<Student>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut students = Vec::new();
    for (line, result) in reader.deserialize().enumerate() {
        let record: StudentRecord =
            result.with_context(|| format!("Failed to parse CSV row {}", line + 1))?;
        students.push(record.into());
    }
    Ok(students)
}

#[derive(Serialize)]
struct PlanReport<'p, 'a> {
    groups: &'p [Group<'a>],
    ungrouped: &'p [&'a Student],
    stats: PlanStats,
}

/// Write the plan as pretty-printed JSON
pub fn write_plan_json<W: Write>(writer: W, plan: &Plan<'_>) -> Result<()> {
    let report = PlanReport {
        groups: plan.groups(),
        ungrouped: plan.ungrouped(),
        stats: PlanStats::from_plan(plan),
    };
    serde_json::to_writer_pretty(writer, &report).context("Failed to write plan JSON")?;
    Ok(())
}

/// Write one CSV row per placed student: `group,interest,id,primary,secondary`.
///
/// Groups are numbered from 1 in plan order.
pub fn write_plan_csv<W: Write>(writer: W, plan: &Plan<'_>) -> Result<()> {
    let mut writer = WriterBuilder::new().from_writer(writer);
    writer.write_record(["group", "interest", "id", "primary", "secondary"])?;

    for (index, group) in plan.groups().iter().enumerate() {
        let number = (index + 1).to_string();
        for student in group.members() {
            writer.write_record([
                number.as_str(),
                group.interest(),
                student.id.as_str(),
                student.primary.as_str(),
                student.secondary.as_str(),
            ])?;
        }
    }

    writer.flush().context("Failed to flush plan CSV")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trial::{regroup_with_options, TrialOptions};
    use std::io::Cursor;
    use tempfile::TempDir;

    #[test]
    fn test_read_json() {
        let json = r#"[
            {"id": "1", "primary": "chess", "secondary": "go"},
            {"id": "2", "primary": "go"}
        ]"#;
        let students = read_students_json(Cursor::new(json)).unwrap();
        assert_eq!(students[0], Student::new("1", "chess", "go"));
        assert_eq!(students[1], Student::new("2", "go", "go"));
    }

    #[test]
    fn test_read_csv_with_blank_secondary() {
        let csv = "id,primary,secondary\n1, chess ,go\n2,go,\n3,art\n";
        let students = read_students_csv(Cursor::new(csv)).unwrap();
        assert_eq!(
            students,
            vec![
                Student::new("1", "chess", "go"),
                Student::new("2", "go", "go"),
                Student::new("3", "art", "art"),
            ]
        );
    }

    #[test]
    fn test_read_csv_missing_column_fails() {
        let csv = "id,secondary\n1,go\n";
        assert!(read_students_csv(Cursor::new(csv)).is_err());
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            StudentFormat::from_path(Path::new("a/b.JSON")).unwrap(),
            StudentFormat::Json
        );
        assert_eq!(
            StudentFormat::from_path(Path::new("roster.csv")).unwrap(),
            StudentFormat::Csv
        );
        assert!(StudentFormat::from_path(Path::new("roster.xlsx")).is_err());
        assert!(StudentFormat::from_path(Path::new("roster")).is_err());
    }

    #[test]
    fn test_missing_file_fails_fast() {
        let dir = TempDir::new().unwrap();
        let err = read_students(&dir.path().join("nobody.json")).unwrap_err();
        assert!(err.to_string().contains("nobody.json"));
    }

    #[test]
    fn test_read_from_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("roster.csv");
        std::fs::write(&path, "id,primary,secondary\na,x,y\nb,y,x\n").unwrap();
        let students = read_students(&path).unwrap();
        assert_eq!(students.len(), 2);
        assert_eq!(students[1].secondary, "x");
    }

    fn sample_plan_students() -> Vec<Student> {
        let mut students: Vec<Student> = (0..5)
            .map(|i| Student::new(format!("a{i}"), "a", "a"))
            .collect();
        students.push(Student::new("z", "z", "z"));
        students
    }

    #[test]
    fn test_write_json() {
        let students = sample_plan_students();
        let options = TrialOptions::default().with_seed(0).with_trials(1);
        let plan = regroup_with_options(&students, &options).unwrap();

        let mut out = Vec::new();
        write_plan_json(&mut out, &plan).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(value["groups"][0]["interest"], "a");
        assert_eq!(value["groups"][0]["members"].as_array().unwrap().len(), 5);
        assert_eq!(value["ungrouped"][0]["id"], "z");
        assert_eq!(value["stats"]["ungrouped"], 1);
        assert_eq!(value["stats"]["total_students"], 6);
    }

    #[test]
    fn test_write_csv() {
        let students = sample_plan_students();
        let options = TrialOptions::default().with_seed(0).with_trials(1);
        let plan = regroup_with_options(&students, &options).unwrap();

        let mut out = Vec::new();
        write_plan_csv(&mut out, &plan).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "group,interest,id,primary,secondary");
        assert_eq!(lines.len(), 6);
        // Popped from the tail, so the last student comes first
        assert_eq!(lines[1], "1,a,a4,a,a");
    }
}
