mod audit_log;
mod config_loading;
mod prompter;
mod sweeper;
