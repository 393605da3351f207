use time::macros::format_description;
use time::UtcOffset;
use tracing_subscriber::fmt::time::OffsetTime;
use tracing_subscriber::EnvFilter;

pub fn setup_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "error" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // The local offset cannot always be determined once threads exist
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    let timer = OffsetTime::new(
        offset,
        format_description!("[hour]:[minute]:[second].[subsecond digits:3]"),
    );

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(timer)
        .with_writer(std::io::stderr)
        .init();
}

pub fn format_number(num: usize) -> String {
    num.to_string()
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect::<Vec<_>>()
        .join(",")
}

pub fn validate_args(args: &crate::args::Args) -> anyhow::Result<()> {
    if args.init {
        return Ok(());
    }

    match args.pages {
        None => anyhow::bail!("--pages is required"),
        Some(0) => anyhow::bail!("--pages must be greater than 0"),
        Some(_) => {}
    }

    if args.words == 0 {
        anyhow::bail!("--words must be greater than 0");
    }

    if let Some(workers) = args.workers {
        if workers == 0 {
            anyhow::bail!("--workers must be greater than 0");
        }
    }

    if args.timeout == 0 {
        anyhow::bail!("--timeout must be greater than 0");
    }

    Ok(())
}
