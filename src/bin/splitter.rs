// Copyright 2024
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Command line front-end for splitting and merging files.
//!
//! ```bash
//! splitter split /data backup.tar 1048576
//! splitter merge /data backup.tar
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use log::{info, LevelFilter};

use splitter::constants::DEFAULT_MAX_PART_SIZE;
use splitter::{merge_files, split_file, SplitOutcome};

#[derive(Parser)]
#[command(
    name = "splitter",
    version,
    about = "Split a file into numbered parts or merge the parts back"
)]
struct Cli {
    /// Most verbose level of log messages to print (RUST_LOG overrides it)
    #[arg(long, value_enum, global = true, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Split <FILE_PATH>/<FILE_NAME> into <FILE_NAME>.0, <FILE_NAME>.1, ...
    Split {
        /// Directory containing the file
        file_path: PathBuf,

        /// Name of the file to split
        file_name: String,

        /// Maximum size of a part in bytes; values <= 0 select the default of 49 MiB
        #[arg(allow_negative_numbers = true)]
        max_bytes_per_part: Option<i64>,
    },

    /// Merge <FILE_NAME>.0, <FILE_NAME>.1, ... into <FILE_PATH>/<FILE_NAME>
    Merge {
        /// Directory containing the parts
        file_path: PathBuf,

        /// Name shared by the parts, without the index
        file_name: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn max_part_size(requested: Option<i64>) -> u64 {
    match requested {
        Some(size) if size > 0 => size as u64,
        _ => DEFAULT_MAX_PART_SIZE,
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level.into())
        .parse_default_env()
        .target(env_logger::Target::Stdout)
        .init();

    let result = match cli.command {
        Command::Split {
            file_path,
            file_name,
            max_bytes_per_part,
        } => {
            info!("Split file path: {} name: {}", file_path.display(), file_name);
            split_file(&file_path, &file_name, max_part_size(max_bytes_per_part)).map(|outcome| {
                match outcome {
                    SplitOutcome::Unchanged { source_len } => info!(
                        "{} ({} bytes) fits into a single part, nothing to do",
                        file_name, source_len
                    ),
                    SplitOutcome::Split { parts, .. } => info!("Wrote {} parts", parts.len()),
                }
            })
        }
        Command::Merge {
            file_path,
            file_name,
        } => {
            info!("Merge file path: {} name: {}", file_path.display(), file_name);
            merge_files(&file_path, &file_name, true).map(|_| ())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
