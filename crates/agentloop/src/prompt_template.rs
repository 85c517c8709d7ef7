use chrono::Local;
use include_dir::{include_dir, Dir};
use serde::Serialize;
use tera::{Context, Error as TeraError, Tera};

static PROMPTS_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/src/prompts");

pub fn load_prompt<T: Serialize>(template: &str, context_data: &T) -> Result<String, TeraError> {
    let mut tera = Tera::default();
    tera.add_raw_template("inline_template", template)?;
    let context = Context::from_serialize(context_data)?;
    let rendered = tera.render("inline_template", &context)?;
    Ok(rendered)
}

/// A prompt bundled with the crate
pub fn bundled_prompt(name: &str) -> Result<String, TeraError> {
    PROMPTS_DIR
        .get_file(name)
        .and_then(|file| file.contents_utf8())
        .map(str::to_string)
        .ok_or_else(|| TeraError::msg(format!("Prompt template '{}' not found", name)))
}

#[derive(Debug, Clone, Serialize)]
struct SystemContext {
    os: &'static str,
    arch: &'static str,
    cwd: String,
    date: String,
    instructions: String,
}

/// The system string sent with every request: an environment banner followed by
/// the base instructions (the bundled ones unless `instructions` is given)
pub fn system_prompt(instructions: Option<&str>) -> Result<String, TeraError> {
    let instructions = match instructions {
        Some(text) => text.to_string(),
        None => bundled_prompt("instructions.md")?,
    };
    let cwd = std::env::current_dir()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    let context = SystemContext {
        os: std::env::consts::OS,
        arch: std::env::consts::ARCH,
        cwd,
        date: Local::now().format("%Y-%m-%d").to_string(),
        instructions: instructions.trim().to_string(),
    };
    load_prompt(&bundled_prompt("system.md")?, &context)
}
