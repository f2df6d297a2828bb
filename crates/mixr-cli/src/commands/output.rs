use anyhow::Result;
use mixr_application::{CommandResult, MixrApp};
use std::process::ExitCode;

/// Prints a result and maps `success` to the exit code.
pub fn emit(result: &CommandResult, json: bool) -> Result<ExitCode> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else if result.success {
        println!("{}", result.message);
    } else {
        eprintln!("error: {}", result.message);
    }

    Ok(if result.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

pub async fn doctor(app: &MixrApp, json: bool) -> Result<ExitCode> {
    let statuses = app.engine.check_tools().await;
    let all_available = statuses.iter().all(|s| s.available);

    if json {
        println!("{}", serde_json::to_string_pretty(&statuses)?);
    } else {
        for status in &statuses {
            let mark = if status.available { "ok" } else { "missing" };
            println!("{:<10} {}", status.name, mark);
        }
        println!("config:    {}", app.paths.config_file().display());
        println!("data:      {}", app.paths.data_dir().display());
    }

    Ok(if all_available {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
