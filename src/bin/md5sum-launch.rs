//! md5sum-launch: build and run a pipeline from a launch line.
//!
//! ```text
//! md5sum-launch filesrc location=video.ts ! md5sum silent=true ! nullsink
//! RUST_LOG=md5sum=info md5sum-launch datasrc data=abc ! md5sum ! nullsink
//! ```

use anyhow::{Context, Result, bail};
use md5sum::pipeline::Pipeline;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let description = std::env::args()
        .skip(1)
        .map(|arg| requote(&arg))
        .collect::<Vec<_>>()
        .join(" ");
    if description.trim().is_empty() {
        bail!("usage: md5sum-launch <element> [prop=value ...] ! ... ! <sink>");
    }

    let mut pipeline = Pipeline::parse(&description)
        .with_context(|| format!("invalid pipeline: {description}"))?
        .with_name("launch");

    tracing::info!(elements = ?pipeline.element_names(), "running pipeline");
    let stats = pipeline.run().context("pipeline failed")?;
    tracing::info!(
        buffers = stats.buffers_out,
        bytes = stats.bytes_out,
        dropped = stats.buffers_dropped,
        "pipeline finished"
    );

    Ok(())
}

/// Restore the quotes the shell stripped from `key=value with spaces`.
fn requote(arg: &str) -> String {
    match arg.split_once('=') {
        Some((key, value)) if value.contains(char::is_whitespace) && !value.contains('"') => {
            format!("{key}=\"{value}\"")
        }
        _ => arg.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requote() {
        assert_eq!(requote("data=hello world"), "data=\"hello world\"");
        assert_eq!(requote("silent=true"), "silent=true");
        assert_eq!(requote("!"), "!");
    }
}
