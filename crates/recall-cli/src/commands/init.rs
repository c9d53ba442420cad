//! The `recall init` command.

use std::path::Path;

use anyhow::{Context, Result};

pub fn execute() -> Result<()> {
    write_if_absent(Path::new("recall.toml"), SAMPLE_CONFIG)?;

    std::fs::create_dir_all("banks").context("failed to create banks/")?;
    write_if_absent(Path::new("banks/example.json"), EXAMPLE_BANK)?;

    println!("\nNext steps:");
    println!("  1. Edit recall.toml to pick a speech backend");
    println!("  2. Run: recall validate banks/example.json");
    println!("  3. Run: recall drill banks/example.json");

    Ok(())
}

fn write_if_absent(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# recall configuration

# smart: weak questions come up more often; random: uniform
default_mode = "smart"
# language the questions are read out in
prompt_language = "en"
show_stats = false
# stats_dir = "/home/me/.local/share/recall"

[speech]
enabled = true
# say (macOS), espeak (espeak-ng), or none
backend = "say"
"#;

const EXAMPLE_BANK: &str = r#"{
  "language": "es",
  "questions": {
    "hello": "hola",
    "goodbye": "adiós",
    "thank you": "gracias",
    "the child (m)": "el niño",
    "Yo (?) cansado (estar)": "estoy",
    "good morning": "buenos días"
  }
}
"#;
