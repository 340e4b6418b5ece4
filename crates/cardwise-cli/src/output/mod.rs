mod catalog_text;
mod error_text;
mod json;
mod mode;
mod pairs_text;
mod rank_text;
mod table;

use std::io;

use cardwise_engine::{EngineError, SuccessEnvelope};

pub use mode::{OutputMode, mode_for_command};

pub fn print_success(success: &SuccessEnvelope, mode: OutputMode) -> io::Result<()> {
    let body = match mode {
        OutputMode::Text => render_text_success(success)?,
        OutputMode::Json => json::render_success_json(success)?,
    };
    println!("{body}");
    Ok(())
}

pub fn print_failure(error: &EngineError, mode: OutputMode) -> io::Result<()> {
    let body = match mode {
        OutputMode::Json => json::render_error_json(error)?,
        OutputMode::Text => error_text::render_error(error),
    };
    println!("{body}");
    Ok(())
}

fn render_text_success(success: &SuccessEnvelope) -> io::Result<String> {
    match success.command.as_str() {
        "rank" | "demo rank" => rank_text::render_rank(&success.data),
        "pairs" | "demo pairs" => pairs_text::render_pairs(&success.data),
        "breakdown" => rank_text::render_breakdown(&success.data),
        "catalog list" => catalog_text::render_catalog_list(&success.data),
        "catalog show" => catalog_text::render_catalog_show(&success.data),
        _ => Err(io::Error::other(format!(
            "unsupported text output command `{}`",
            success.command
        ))),
    }
}
