//! Tracing subscriber setup. Logs go to stderr so reports on stdout stay
//! machine-readable.

use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Map `-v` occurrences to a filter directive.
fn level_for(verbosity: u8) -> &'static str
{
    match verbosity
    {
        0 => "twinscan=warn",
        1 => "twinscan=debug",
        _ => "twinscan=trace",
    }
}

/// Install the global subscriber. `TWINSCAN_LOG` overrides the verbosity.
pub fn init_tracing(
    verbosity: u8,
    log_json: bool,
) -> Result<()>
{
    let filter = EnvFilter::try_from_env("TWINSCAN_LOG").unwrap_or_else(|_| EnvFilter::new(level_for(verbosity)));
    let registry = tracing_subscriber::registry().with(filter);

    if log_json
    {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .try_init()
            .map_err(|e| anyhow!("failed to install JSON log subscriber: {e}"))?;
    }
    else
    {
        registry
            .with(
                fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .map_err(|e| anyhow!("failed to install log subscriber: {e}"))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn verbosity_maps_to_levels()
    {
        assert_eq!(level_for(0), "twinscan=warn");
        assert_eq!(level_for(1), "twinscan=debug");
        assert_eq!(level_for(5), "twinscan=trace");
    }
}
