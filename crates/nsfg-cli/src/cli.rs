//! CLI argument definitions for the NSFG checker.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use nsfg_cli::check::CheckPlan;
use nsfg_model::{
    CheckOptions, DEFAULT_EXPECTED_PREGNUM_ONE, DEFAULT_EXPECTED_ROWS, DEFAULT_PREGNANCY_DAT,
    DEFAULT_PREGNANCY_DCT, DEFAULT_RESPONDENT_DAT, DEFAULT_RESPONDENT_DCT, DatasetSource,
    MissingCasePolicy,
};

#[derive(Parser)]
#[command(
    name = "nsfg",
    version,
    about = "Check the NSFG 2002 respondent and pregnancy files",
    long_about = "Decode the NSFG 2002 female respondent and pregnancy files from their \
                  Stata dictionaries and check that they agree.\n\n\
                  Without a subcommand, runs `check`.",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub check: CheckArgs,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Load both files and run the consistency checks (the default).
    Check(CheckArgs),

    /// Print the column layout parsed from a Stata dictionary.
    Layout(LayoutArgs),
}

#[derive(Args, Clone)]
pub struct CheckArgs {
    /// Directory that relative dictionary and data paths are resolved against.
    #[arg(long = "data-dir", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Respondent Stata dictionary.
    #[arg(long = "resp-dct", value_name = "PATH", default_value = DEFAULT_RESPONDENT_DCT)]
    pub resp_dct: PathBuf,

    /// Respondent fixed-width data (gzip detected automatically).
    #[arg(long = "resp-dat", value_name = "PATH", default_value = DEFAULT_RESPONDENT_DAT)]
    pub resp_dat: PathBuf,

    /// Pregnancy Stata dictionary.
    #[arg(long = "preg-dct", value_name = "PATH", default_value = DEFAULT_PREGNANCY_DCT)]
    pub preg_dct: PathBuf,

    /// Pregnancy fixed-width data (gzip detected automatically).
    #[arg(long = "preg-dat", value_name = "PATH", default_value = DEFAULT_PREGNANCY_DAT)]
    pub preg_dat: PathBuf,

    /// Decode at most this many respondent rows. The pregnancy file is always read in full.
    #[arg(long = "max-rows", value_name = "N")]
    pub max_rows: Option<usize>,

    /// Expected number of respondent rows.
    #[arg(long = "expected-rows", value_name = "N", default_value_t = DEFAULT_EXPECTED_ROWS)]
    pub expected_rows: usize,

    /// Expected number of respondents with pregnum == 1.
    #[arg(
        long = "expected-pregnum-one",
        value_name = "N",
        default_value_t = DEFAULT_EXPECTED_PREGNUM_ONE
    )]
    pub expected_pregnum_one: usize,

    /// What to do with a respondent that has no pregnancy rows.
    #[arg(long = "missing-case", value_enum, default_value = "fail")]
    pub missing_case: MissingCaseArg,
}

impl CheckArgs {
    pub fn plan(&self) -> CheckPlan {
        let plan = CheckPlan {
            respondents: DatasetSource::new(&self.resp_dct, &self.resp_dat),
            pregnancies: DatasetSource::new(&self.preg_dct, &self.preg_dat),
            options: CheckOptions {
                expected_rows: self.expected_rows,
                expected_pregnum_one: self.expected_pregnum_one,
                missing_case: self.missing_case.into(),
            },
        }
        .with_max_rows(self.max_rows);
        match &self.data_dir {
            Some(dir) => plan.with_data_dir(dir),
            None => plan,
        }
    }
}

#[derive(Args)]
pub struct LayoutArgs {
    /// Stata dictionary (.dct) to describe.
    #[arg(value_name = "DCT")]
    pub dictionary: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum MissingCaseArg {
    /// Stop with an error.
    Fail,
    /// Count the respondent as having no pregnancies.
    Zero,
}

impl From<MissingCaseArg> for MissingCasePolicy {
    fn from(arg: MissingCaseArg) -> Self {
        match arg {
            MissingCaseArg::Fail => Self::Fail,
            MissingCaseArg::Zero => Self::TreatAsZero,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
