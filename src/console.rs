//! Line-oriented front end: each input line is split shell-style and parsed
//! into one [`DeskCommand`].
//!
//! ```text
//! patient add Alice 30 F 555-1
//! doctor add "Dr. Smith" Cardiology 555-2
//! appointment add "1 - Alice" "1 - Dr. Smith" "2024-06-01 09:30" checkup
//! appointment list
//! ```

use std::io::{self, BufRead, Write};

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};

use crate::commands::{dispatch, DeskCommand};
use crate::desk_state::DeskState;
use crate::forms::{AppointmentForm, DoctorForm, PatientForm};
use crate::selection::{EntityKind, SelectionOption, SelectionRegistry};
use crate::table::TableView;

/// One line typed at the desk. The first word names the command.
#[derive(Debug, Parser)]
#[command(multicall = true, help_template = "{all-args}")]
struct DeskLine {
    #[command(subcommand)]
    command: LineCommand,
}

#[derive(Debug, Subcommand)]
enum LineCommand {
    /// Add, list or delete patients
    Patient {
        #[command(subcommand)]
        action: PatientAction,
    },
    /// Add, list or delete doctors
    Doctor {
        #[command(subcommand)]
        action: DoctorAction,
    },
    /// Book, list or cancel appointments
    Appointment {
        #[command(subcommand)]
        action: AppointmentAction,
    },
    /// Show the patient and doctor choices offered for booking
    Options,
    /// Leave the desk
    #[command(alias = "exit")]
    Quit,
}

// Text fields default to empty so the form, not the parser, reports what is
// missing.
#[derive(Debug, Subcommand)]
enum PatientAction {
    /// Add a patient
    Add {
        #[arg(default_value = "")]
        name: String,
        #[arg(default_value = "", allow_hyphen_values = true)]
        age: String,
        #[arg(default_value = "")]
        gender: String,
        #[arg(default_value = "")]
        contact: String,
    },
    /// List patients by id
    List,
    /// Delete a patient by id
    Delete { id: Option<i64> },
}

#[derive(Debug, Subcommand)]
enum DoctorAction {
    /// Add a doctor
    Add {
        #[arg(default_value = "")]
        name: String,
        #[arg(default_value = "")]
        specialization: String,
        #[arg(default_value = "")]
        contact: String,
    },
    /// List doctors by id
    List,
    /// Delete a doctor by id
    Delete { id: Option<i64> },
}

#[derive(Debug, Subcommand)]
enum AppointmentAction {
    /// Book an appointment; patient and doctor take an option such as "1 - Alice" or a bare id
    Add {
        #[arg(default_value = "")]
        patient: String,
        #[arg(default_value = "")]
        doctor: String,
        #[arg(default_value = "", value_name = "YYYY-MM-DD HH:MM")]
        date_time: String,
        #[arg(default_value = "")]
        remarks: String,
    },
    /// List appointments by date
    List,
    /// Cancel an appointment by id
    Delete { id: Option<i64> },
}

#[derive(Debug)]
pub enum ConsoleAction {
    Run(DeskCommand),
    ShowOptions,
    Help(String),
    Quit,
    Nothing,
}

/// Read commands until `quit` or end of input, writing every result to `output`.
pub fn run<R: BufRead, W: Write>(state: &mut DeskState, input: R, output: &mut W) -> io::Result<()> {
    writeln!(output, "Clinic Desk ready. Type 'help' for commands.")?;
    for line in input.lines() {
        let line = line?;
        match parse_line(&line, state.registry()) {
            Ok(ConsoleAction::Run(command)) => match dispatch(state, command) {
                Ok(response) => {
                    if let Some(message) = &response.message {
                        writeln!(output, "{message}")?;
                    }
                    for warning in &response.warnings {
                        writeln!(output, "Warning: {warning}")?;
                    }
                    write!(output, "{}", response.table.render())?;
                }
                Err(message) => writeln!(output, "{message}")?,
            },
            Ok(ConsoleAction::ShowOptions) => {
                for kind in [EntityKind::Patient, EntityKind::Doctor] {
                    let table = TableView::from_rows(state.registry().options(kind));
                    writeln!(output, "{} options:", kind.as_str())?;
                    write!(output, "{}", table.render())?;
                }
            }
            Ok(ConsoleAction::Help(text)) => writeln!(output, "{text}")?,
            Ok(ConsoleAction::Quit) => break,
            Ok(ConsoleAction::Nothing) => {}
            Err(message) => writeln!(output, "{message}")?,
        }
        output.flush()?;
    }
    Ok(())
}

/// Parse one input line. Patient and doctor references in `appointment add`
/// are resolved against the registry so the command carries typed options.
pub fn parse_line(line: &str, registry: &SelectionRegistry) -> Result<ConsoleAction, String> {
    let args = shlex::split(line).ok_or("Malformed input. Please check quoting.")?;
    if args.is_empty() {
        return Ok(ConsoleAction::Nothing);
    }

    let parsed = match DeskLine::try_parse_from(args) {
        Ok(parsed) => parsed,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            return Ok(ConsoleAction::Help(e.to_string().trim_end().to_string()));
        }
        Err(e) => return Err(e.to_string().trim_end().to_string()),
    };

    let command = match parsed.command {
        LineCommand::Options => return Ok(ConsoleAction::ShowOptions),
        LineCommand::Quit => return Ok(ConsoleAction::Quit),
        LineCommand::Patient { action } => match action {
            PatientAction::Add {
                name,
                age,
                gender,
                contact,
            } => DeskCommand::AddPatient(PatientForm {
                name,
                age,
                gender,
                contact,
            }),
            PatientAction::List => DeskCommand::ListPatients,
            PatientAction::Delete { id } => DeskCommand::DeletePatient(id),
        },
        LineCommand::Doctor { action } => match action {
            DoctorAction::Add {
                name,
                specialization,
                contact,
            } => DeskCommand::AddDoctor(DoctorForm {
                name,
                specialization,
                contact,
            }),
            DoctorAction::List => DeskCommand::ListDoctors,
            DoctorAction::Delete { id } => DeskCommand::DeleteDoctor(id),
        },
        LineCommand::Appointment { action } => match action {
            AppointmentAction::Add {
                patient,
                doctor,
                date_time,
                remarks,
            } => DeskCommand::AddAppointment(AppointmentForm {
                patient: select(registry, EntityKind::Patient, &patient)?,
                doctor: select(registry, EntityKind::Doctor, &doctor)?,
                date_time,
                remarks,
            }),
            AppointmentAction::List => DeskCommand::ListAppointments,
            AppointmentAction::Delete { id } => DeskCommand::DeleteAppointment(id),
        },
    };
    Ok(ConsoleAction::Run(command))
}

/// Resolve a typed reference. While booking is blocked, resolution is
/// skipped so the form reports the missing records instead.
fn select(
    registry: &SelectionRegistry,
    kind: EntityKind,
    text: &str,
) -> Result<Option<SelectionOption>, String> {
    let text = text.trim();
    if text.is_empty() || registry.ensure_bookable().is_err() {
        return Ok(None);
    }
    registry
        .resolve(kind, text)
        .map(Some)
        .map_err(|e| e.to_string())
}
