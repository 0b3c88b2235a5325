use env_logger::fmt::style::AnsiColor;
use log::LevelFilter;
use std::io::Write;

/// Initializes the global logger. `--debug` switches to the debug level with millisecond
/// timestamps, `RUST_LOG` can still override the filter.
pub fn setup_logging(verbose: bool) {
    let mut builder = logger_builder(verbose);

    // Overwrite the defaults from env
    builder.parse_default_env();
    builder.init();
}

fn logger_builder(verbose: bool) -> env_logger::Builder {
    let mut builder = env_logger::Builder::default();
    builder.filter_level(if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    });

    if verbose {
        builder.format_timestamp_millis();
    } else {
        // Shortened format
        // <time> <level> <message>
        builder.format(|buf, record| {
            let level_style = buf.default_level_style(record.level()).bold();
            let time_style = AnsiColor::BrightBlack.on_default();
            writeln!(
                buf,
                "{time_style}{}{time_style:#} {level_style}{}{level_style:#} {}",
                buf.timestamp_seconds(),
                record.level(),
                record.args()
            )
        });
    }
    builder
}
