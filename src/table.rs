//! Tabular rendering of listed records, one view per tab.

use serde::Serialize;

use crate::models::{AppointmentListing, Doctor, Patient};
use crate::selection::SelectionOption;

/// A record that can be shown as one table row.
pub trait TableRow {
    const COLUMNS: &'static [&'static str];
    fn cells(&self) -> Vec<String>;
}

impl TableRow for Patient {
    const COLUMNS: &'static [&'static str] = &["ID", "Name", "Age", "Gender", "Contact"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.age.to_string(),
            self.gender.clone(),
            self.contact.clone(),
        ]
    }
}

impl TableRow for Doctor {
    const COLUMNS: &'static [&'static str] = &["ID", "Name", "Specialization", "Contact"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.specialization.clone(),
            self.contact.clone(),
        ]
    }
}

impl TableRow for AppointmentListing {
    const COLUMNS: &'static [&'static str] = &["ID", "Patient", "Doctor", "Date & Time", "Remarks"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.patient_name.clone(),
            self.doctor_name.clone(),
            self.display_time(),
            self.remarks.clone().unwrap_or_default(),
        ]
    }
}

impl TableRow for SelectionOption {
    const COLUMNS: &'static [&'static str] = &["Option"];

    fn cells(&self) -> Vec<String> {
        vec![self.to_string()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableView {
    pub columns: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
}

impl TableView {
    pub fn from_rows<T: TableRow>(rows: &[T]) -> Self {
        Self {
            columns: T::COLUMNS.to_vec(),
            rows: rows.iter().map(TableRow::cells).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Left-aligned columns separated by two spaces, with a rule under the header.
    pub fn render(&self) -> String {
        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.chars().count()).collect();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();

        let mut out = format_line(self.columns.iter().copied(), &widths);
        out.push_str(&format_line(rule.iter().map(String::as_str), &widths));
        if self.rows.is_empty() {
            out.push_str("(no rows)\n");
        }
        for row in &self.rows {
            out.push_str(&format_line(row.iter().map(String::as_str), &widths));
        }
        out
    }
}

fn format_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let mut line = cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string();
    line.push('\n');
    line
}
