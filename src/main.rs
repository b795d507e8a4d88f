use std::process::ExitCode;

fn main() -> ExitCode {
    match clinic_desk_lib::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
