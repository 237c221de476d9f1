//! Logging infrastructure using `log` + `log4rs`.

mod consts;

pub use consts::*;

use crate::infrastructure::config::LoggingConfig;
use log::LevelFilter;
use log4rs::{
    append::{
        console::{ConsoleAppender, Target},
        rolling_file::{
            policy::compound::{roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger, CompoundPolicy},
            RollingFileAppender,
        },
    },
    config::{Appender, Logger, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

const CONSOLE_APPENDER: &str = "stderr";
const LOG_FILE_APPENDER: &str = "log_file";
const ERR_LOG_FILE_APPENDER: &str = "err_log_file";

/// Initialize the global logger with optional file output.
///
/// # Arguments
/// - `log_dir`: Optional directory for log files. If `None`, only console output is used.
/// - `filters`: Filter expression (e.g. `"info"`, `"keyunlock_core=debug"`, `"root=info"`).
///
/// # Filtering Strategy (Whitelist)
/// - Root level defaults to OFF
/// - `keyunlock_core` is logged at the requested app level (default INFO)
/// - `<crate>=<level>` opts a third party crate in; `root=<level>` opts all of them in
///
/// Notes:
/// - The logger is global; repeated calls are ignored.
/// - Console output goes to stderr.
/// - A file appender that cannot be created is skipped with a message on stderr.
pub fn init_logger(log_dir: Option<&str>, filters: &str) {
    let Some(config) = build_config(log_dir, filters) else {
        return;
    };
    let _ = log4rs::init_config(config);
}

/// Initialize the global logger from the `[logging]` config section.
pub fn init_logger_from_config(config: &LoggingConfig) {
    init_logger(config.log_dir.as_deref(), &config.filters);
}

fn build_config(log_dir: Option<&str>, filters: &str) -> Option<Config> {
    let app_level = parse_app_level(filters);
    let root_level = parse_root_override(filters).unwrap_or(LevelFilter::Off);
    let module_levels = parse_module_levels(filters);

    let use_ansi = std::io::stderr().is_terminal();
    let console_pattern = if use_ansi { LOG_LINE_PATTERN_COLORED } else { LOG_LINE_PATTERN };

    let console = ConsoleAppender::builder().target(Target::Stderr).encoder(Box::new(PatternEncoder::new(console_pattern))).build();

    let mut config_builder = Config::builder().appender(Appender::builder().build(CONSOLE_APPENDER, Box::new(console)));

    let mut root_appenders: Vec<&str> = vec![CONSOLE_APPENDER];

    if let Some(dir) = log_dir.map(str::trim).filter(|s| !s.is_empty()) {
        let dir = Path::new(dir);
        match rolling_appender(dir, LOG_FILE_NAME) {
            Ok(appender) => {
                config_builder = config_builder.appender(Appender::builder().build(LOG_FILE_APPENDER, Box::new(appender)));
                root_appenders.push(LOG_FILE_APPENDER);
            }
            Err(err) => eprintln!("log file appender disabled: {err}"),
        }

        match rolling_appender(dir, ERR_LOG_FILE_NAME) {
            Ok(appender) => {
                config_builder = config_builder.appender(
                    Appender::builder()
                        .filter(Box::new(ThresholdFilter::new(LevelFilter::Warn)))
                        .build(ERR_LOG_FILE_APPENDER, Box::new(appender)),
                );
                root_appenders.push(ERR_LOG_FILE_APPENDER);
            }
            Err(err) => eprintln!("error log file appender disabled: {err}"),
        }
    }

    let appender_names: Vec<String> = root_appenders.iter().map(|name| (*name).to_string()).collect();

    for crate_name in WHITELISTED_CRATES {
        if !module_levels.iter().any(|(m, _)| m == *crate_name) {
            config_builder = config_builder
                .logger(Logger::builder().appenders(appender_names.clone()).additive(false).build(*crate_name, app_level));
        }
    }

    // User-specified module levels override the whitelist.
    for (module, level) in &module_levels {
        config_builder =
            config_builder.logger(Logger::builder().appenders(appender_names.clone()).additive(false).build(module, *level));
    }

    match config_builder.build(Root::builder().appenders(root_appenders).build(root_level)) {
        Ok(config) => Some(config),
        Err(err) => {
            eprintln!("invalid logger configuration: {err}");
            None
        }
    }
}

fn rolling_appender(dir: &Path, file_name: &str) -> Result<RollingFileAppender, Box<dyn std::error::Error + Send + Sync>> {
    let log_path = dir.join(file_name);
    let archive_pattern: PathBuf = dir.join(format!("{file_name}.{{}}.gz"));
    let archive_pattern = archive_pattern.to_str().ok_or("log directory is not valid UTF-8")?;

    let roller = FixedWindowRoller::builder().base(1).build(archive_pattern, LOG_FILE_MAX_ROLLS)?;
    let trigger = SizeTrigger::new(LOG_FILE_MAX_SIZE);
    let policy = CompoundPolicy::new(Box::new(trigger), Box::new(roller));

    Ok(RollingFileAppender::builder().encoder(Box::new(PatternEncoder::new(LOG_LINE_PATTERN))).build(log_path, Box::new(policy))?)
}

fn parse_app_level(filters: &str) -> LevelFilter {
    for part in filters.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        if !part.contains('=') {
            if let Ok(level) = part.parse() {
                return level;
            }
        }
    }
    LevelFilter::Info
}

fn parse_root_override(filters: &str) -> Option<LevelFilter> {
    filters.split(',').filter_map(|part| part.trim().split_once('=')).find_map(|(module, level)| {
        if module.trim() != "root" {
            return None;
        }
        level.trim().parse().ok()
    })
}

fn parse_module_levels(filters: &str) -> Vec<(String, LevelFilter)> {
    let mut result = Vec::new();
    for part in filters.split(',') {
        let Some((module, level_str)) = part.trim().split_once('=') else {
            continue;
        };
        let module = module.trim();
        let level_str = level_str.trim();
        if module.is_empty() || level_str.is_empty() || module == "root" {
            continue;
        }
        if let Ok(level) = level_str.parse() {
            result.push((module.to_string(), level));
        }
    }
    result
}
