mod cli_pipeline;
mod error_handling;
mod report;
mod source_window;
