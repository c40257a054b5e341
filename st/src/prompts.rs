//! Interactive prompts for values not given on the command line.

use orbit::Error;

fn prompt_error(e: dialoguer::Error) -> Error {
    Error::Credentials(format!("prompt failed: {}", e))
}

pub fn prompt_input(prompt_message: &str, cli_arg_value: Option<String>) -> orbit::Result<String> {
    match cli_arg_value {
        Some(value) => Ok(value),
        None => dialoguer::Input::<String>::new()
            .with_prompt(prompt_message)
            .interact_text()
            .map_err(prompt_error),
    }
}

/// Hidden input, asked twice when `confirm` is set.
pub fn prompt_secret(
    prompt_message: &str,
    cli_arg_value: Option<String>,
    confirm: bool,
) -> orbit::Result<String> {
    if let Some(value) = cli_arg_value {
        return Ok(value);
    }

    let mut password = dialoguer::Password::new().with_prompt(prompt_message);
    if confirm {
        password = password.with_confirmation("Repeat to confirm", "Values do not match");
    }
    password.interact().map_err(prompt_error)
}
