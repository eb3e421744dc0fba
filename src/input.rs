use std::io::{self, BufRead, Write};

use crate::location::LocationQuery;

/// Ask for city, state and country. A blank city skips the remaining
/// prompts and selects the default location.
pub fn prompt_location<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> io::Result<Option<LocationQuery>> {
    writeln!(output, "\nEnter location details (press Enter for the default location):")?;

    let city = ask(input, output, "City: ")?;
    if city.is_empty() {
        return Ok(None);
    }
    let state = ask(input, output, "State (optional, press Enter to skip): ")?;
    let country = ask(input, output, "Country (optional, press Enter for USA): ")?;

    Ok(LocationQuery::new(&city, Some(&state), Some(&country)))
}

fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> io::Result<String> {
    write!(output, "{}", prompt)?;
    output.flush()?;

    let mut line = String::new();
    // EOF reads as a blank answer.
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}
