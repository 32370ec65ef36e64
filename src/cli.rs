use std::error::Error;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum, error::ErrorKind};

use crate::config::{DatasetConfig, DownloadConfig, PoseSource};
use crate::constants;
use crate::errors::DatasetError;
use crate::ingestion::{ingest_split, write_jsonl};
use crate::source::DatasetBuilder;
use crate::source::datasets::{self, AslCitizen};
use crate::splits::SplitLabel;
use crate::transport::{DownloadManager, HttpDownloadManager, MirrorDownloadManager};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SplitArg {
    Train,
    Validation,
    Test,
}

impl From<SplitArg> for SplitLabel {
    fn from(value: SplitArg) -> Self {
        match value {
            SplitArg::Train => SplitLabel::Train,
            SplitArg::Validation => SplitLabel::Validation,
            SplitArg::Test => SplitLabel::Test,
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "sign-datasets",
    disable_help_subcommand = true,
    about = "Inspect and prepare sign-language datasets",
    after_help = "The download cache is resolved from --cache-dir, then SIGN_DATASETS_CACHE_DIR, then ./.sign_datasets_cache."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print dataset metadata and feature schema as JSON.
    Info(DatasetArgs),
    /// Generate one split and write it as JSON lines.
    Prepare {
        #[command(flatten)]
        dataset: DatasetArgs,
        #[arg(long, value_enum, default_value = "train", help = "Split to generate")]
        split: SplitArg,
        #[arg(long, value_name = "PATH", help = "Output file (stdout when omitted)")]
        out: Option<PathBuf>,
        #[arg(long, value_name = "DIR", help = "Download cache directory")]
        cache_dir: Option<PathBuf>,
        #[arg(
            long = "mirror",
            value_name = "URL=PATH",
            value_parser = parse_mirror_arg,
            help = "Serve URL from a local file or directory instead of downloading; repeat as needed"
        )]
        mirrors: Vec<(String, PathBuf)>,
    },
}

#[derive(Debug, clap::Args)]
struct DatasetArgs {
    #[arg(value_name = "DATASET", help = "Dataset name (asl_citizen, how2sign)")]
    name: String,
    #[arg(long, help = "Attach video clip paths")]
    include_video: Option<bool>,
    #[arg(long, value_name = "SOURCE", help = "Pose pack: holistic, openpose, or none")]
    pose: Option<String>,
    #[arg(long, help = "Target frame rate (defaults to the capture rate)")]
    fps: Option<f32>,
    #[arg(long, value_name = "DIR", help = "Directory holding pose header files")]
    pose_header_dir: Option<PathBuf>,
    #[arg(long, value_name = "DIR", help = "Local manifest directory (asl_citizen)")]
    manifest_dir: Option<PathBuf>,
}

impl DatasetArgs {
    fn config(&self) -> Result<DatasetConfig, DatasetError> {
        let mut config = datasets::default_config(&self.name)?;
        if let Some(include_video) = self.include_video {
            config.include_video = include_video;
        }
        if let Some(pose) = &self.pose {
            config.include_pose = PoseSource::parse_optional(pose)?;
        }
        if self.fps.is_some() {
            config.fps = self.fps;
        }
        if let Some(dir) = &self.pose_header_dir {
            config.pose_header_dir = dir.clone();
        }
        Ok(config)
    }

    fn builder(&self) -> Result<Box<dyn DatasetBuilder>, DatasetError> {
        let config = self.config()?;
        match (&self.manifest_dir, self.name.as_str()) {
            (Some(dir), constants::asl_citizen::NAME) => {
                Ok(Box::new(AslCitizen::new(config).with_manifest_dir(dir)))
            }
            (Some(_), other) => Err(DatasetError::Configuration(format!(
                "--manifest-dir is not supported by '{other}'"
            ))),
            (None, name) => datasets::builder_for(name, config),
        }
    }
}

fn parse_mirror_arg(raw: &str) -> Result<(String, PathBuf), String> {
    let (url, path) = raw
        .rsplit_once('=')
        .ok_or_else(|| "--mirror expects URL=PATH".to_string())?;
    if url.trim().is_empty() || path.trim().is_empty() {
        return Err("--mirror expects a non-empty URL and PATH".to_string());
    }
    Ok((url.trim().to_string(), PathBuf::from(path.trim())))
}

fn parse_cli<I>(args: I) -> Result<Option<Cli>, Box<dyn Error>>
where
    I: IntoIterator<Item = String>,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => Ok(Some(cli)),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                err.print()?;
                Ok(None)
            }
            _ => Err(err.into()),
        },
    }
}

/// Entry point of the `sign-datasets` binary.
pub fn run<I>(args_iter: I) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
{
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init();

    let Some(cli) = parse_cli(std::iter::once("sign-datasets".to_string()).chain(args_iter))?
    else {
        return Ok(());
    };

    match cli.command {
        Command::Info(args) => {
            let info = args.builder()?.info()?;
            let stdout = io::stdout();
            let mut out = stdout.lock();
            serde_json::to_writer_pretty(&mut out, &info)?;
            writeln!(out)?;
        }
        Command::Prepare {
            dataset,
            split,
            out,
            cache_dir,
            mirrors,
        } => {
            let builder = dataset.builder()?;
            let info = builder.info()?;
            let download_config = cache_dir
                .map(DownloadConfig::new)
                .unwrap_or_else(DownloadConfig::from_env);
            let downloads: Box<dyn DownloadManager> = if mirrors.is_empty() {
                Box::new(HttpDownloadManager::new(download_config))
            } else {
                let mut mirror = MirrorDownloadManager::new(download_config.extract_dir);
                for (url, path) in mirrors {
                    mirror.insert(url, path);
                }
                Box::new(mirror)
            };

            let wanted: SplitLabel = split.into();
            let generator = builder
                .split_generators(downloads.as_ref())?
                .into_iter()
                .find(|generator| generator.split == wanted)
                .ok_or_else(|| {
                    DatasetError::Configuration(format!(
                        "{} has no '{}' split",
                        builder.name(),
                        wanted
                    ))
                })?;
            let ingested = ingest_split(&info, &generator)?;
            let written = match out {
                Some(path) => write_jsonl(&ingested, BufWriter::new(File::create(&path)?))?,
                None => write_jsonl(&ingested, io::stdout().lock())?,
            };
            eprintln!("Wrote {written} {wanted} examples of {}", builder.name());
        }
    }
    Ok(())
}
