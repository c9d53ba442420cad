//! Listening drill: a number is voiced and the user types its digits.

use std::ops::RangeInclusive;

use anyhow::{ensure, Result};
use rand::Rng;

use crate::traits::{Console, ReadOutcome, Speaker};

/// Settings for a listening drill.
#[derive(Debug, Clone)]
pub struct ListeningConfig {
    /// Language the numbers are voiced in.
    pub language: String,
    /// Inclusive range numbers are drawn from.
    pub range: RangeInclusive<i64>,
}

impl Default for ListeningConfig {
    fn default() -> Self {
        Self {
            language: "de".to_string(),
            range: 0..=100,
        }
    }
}

/// Voice random numbers until input ends. Each number is repeated until
/// typed correctly. Returns how many numbers were recognised.
pub fn run_listening<R: Rng>(
    config: &ListeningConfig,
    console: &mut dyn Console,
    speaker: &dyn Speaker,
    rng: &mut R,
) -> Result<u64> {
    ensure!(
        config.range.start() <= config.range.end(),
        "empty number range {}..={}",
        config.range.start(),
        config.range.end()
    );

    let mut recognised = 0u64;
    loop {
        let number = rng.random_range(config.range.clone());
        let expected = number.to_string();

        loop {
            speaker.speak(&expected, &config.language);
            match console.read_line()? {
                ReadOutcome::EndOfInput => {
                    console.write_line("")?;
                    console.write_line(&format!("Numbers recognised: {recognised}"))?;
                    return Ok(recognised);
                }
                ReadOutcome::Line(line) if line.trim() == expected => {
                    console.write_line("CORRECT")?;
                    recognised += 1;
                    break;
                }
                ReadOutcome::Line(_) => console.write_line("Wrong")?,
            }
        }
    }
}
