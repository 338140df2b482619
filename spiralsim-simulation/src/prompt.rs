//! Interactive entry of the user tunable parameters.

use crate::config::{Bounds, GalaxyConfig};
use crate::error::ConfigError;
use std::fmt::Display;
use std::io::{BufRead, Write};
use std::str::FromStr;

/// Asks for the point count, maximum radius, inward speed and rotation speed.
///
/// Invalid answers are reported on `output` and asked again, an empty answer
/// keeps the value from `base`.
pub fn prompt_config<R, W>(
    input: &mut R,
    output: &mut W,
    base: GalaxyConfig,
) -> Result<GalaxyConfig, ConfigError>
where
    R: BufRead,
    W: Write,
{
    let mut config = base;
    config.count = ask(input, output, "Number of points", GalaxyConfig::COUNT, base.count)?;
    config.max_radius = ask(
        input,
        output,
        "Galaxy radius",
        GalaxyConfig::MAX_RADIUS,
        base.max_radius,
    )?;
    config.speed = ask(input, output, "Inward speed", GalaxyConfig::SPEED, base.speed)?;
    config.base_rotation_speed = ask(
        input,
        output,
        "Rotation speed",
        GalaxyConfig::BASE_ROTATION_SPEED,
        base.base_rotation_speed,
    )?;

    config.validate()?;
    Ok(config)
}

fn ask<T, R, W>(
    input: &mut R,
    output: &mut W,
    label: &str,
    bounds: Bounds<T>,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr + PartialOrd + Copy + Display,
    R: BufRead,
    W: Write,
{
    let mut line = String::new();
    loop {
        write!(output, "{} [{} - {}] ({}): ", label, bounds.min, bounds.max, default)?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Err(ConfigError::InputClosed);
        }
        let answer = line.trim();
        if answer.is_empty() {
            return Ok(default);
        }

        let parsed = answer
            .parse::<T>()
            .map_err(|_| ConfigError::NotANumber {
                field: bounds.field,
                input: answer.to_owned(),
            })
            .and_then(|value| bounds.check(value));
        match parsed {
            Ok(value) => return Ok(value),
            Err(err) => writeln!(output, "{}, try again", err)?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run(answers: &str) -> (Result<GalaxyConfig, ConfigError>, String) {
        let mut output = Vec::new();
        let result = prompt_config(
            &mut Cursor::new(answers.as_bytes()),
            &mut output,
            GalaxyConfig::default(),
        );
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn accepts_values_in_range() {
        let (result, _) = run("8000\n300\n0.05\n0.001\n");
        let config = result.unwrap();
        assert_eq!(config.count, 8000);
        assert_eq!(config.max_radius, 300.0);
        assert_eq!(config.speed, 0.05);
        assert_eq!(config.base_rotation_speed, 0.001);
        assert_eq!(config.num_arms, 5);
    }

    #[test]
    fn empty_answers_keep_defaults() {
        let (result, _) = run("\n\n\n\n");
        assert_eq!(result.unwrap(), GalaxyConfig::default());
    }

    #[test]
    fn reprompts_on_bad_input() {
        let (result, output) = run("lots\n100\n30000\n451\n450\n0.1\n 0.099 \n0.007\n");
        let config = result.unwrap();
        assert_eq!(config.count, 30000);
        assert_eq!(config.max_radius, 450.0);
        assert_eq!(config.speed, 0.099);
        assert_eq!(config.base_rotation_speed, 0.007);

        assert!(output.contains("'lots' is not a number"));
        assert!(output.contains("count must be between 5000 and 30000, got 100"));
        assert!(output.contains("max_radius must be between 300 and 450, got 451"));
        assert!(output.contains("speed must be between 0.035 and 0.099, got 0.1,"));
        assert_eq!(output.matches("try again").count(), 4);
    }

    #[test]
    fn closed_input_is_an_error() {
        let (result, _) = run("10000\n");
        assert!(matches!(result, Err(ConfigError::InputClosed)));
    }
}
