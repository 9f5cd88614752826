//! Conversion of SVG files and directories of frames.

use crate::error::{ElementError, SourceError, SourceResult};
use crate::format::{canvas_size, Container, Frame, Image, Sequence};
use crate::options::Options;
use crate::scene::SceneInfo;
use crate::svg::convert_str;
use crate::Command;

use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::string::String;
use std::vec::Vec;

/// A single image and what went wrong while building it.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub image: Image,
    pub errors: Vec<ElementError>,
    /// a command was dropped because of an invalid point
    pub failed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SequenceConversion {
    pub sequence: Sequence,
    /// sources that failed, in frame order
    pub failed: Vec<PathBuf>,
}

fn read_source(path: &Path) -> SourceResult<String> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => SourceError::NotFound(path.into()),
        _ => SourceError::Io(e),
    })
}

fn check_options(options: &Options) -> SourceResult<()> {
    match options.is_consistent() {
        true => Ok(()),
        false => Err(SourceError::PreciseUnsupported),
    }
}

/// Converts one SVG file.
///
/// A scene left without commands is an error: `InvalidPoints` when
/// invalid points dropped them, `EmptyScene` otherwise. When some commands
/// survive, a dropped command only sets `failed`, so that the caller decides
/// what to do with the rest of the image.
pub fn convert_image(path: &Path, options: &Options) -> SourceResult<Conversion> {
    check_options(options)?;
    let text = read_source(path)?;
    let (info, walk) = convert_str(&text, None, options)?;

    if walk.commands.is_empty() {
        return Err(match walk.failed {
            true => SourceError::InvalidPoints,
            false => SourceError::EmptyScene,
        });
    }

    Ok(Conversion {
        image: Image {
            size: canvas_size(info.size),
            commands: walk.commands,
        },
        errors: walk.errors,
        failed: walk.failed,
    })
}

/// Directory holding the frames of a sequence; a file stands for the
/// directory it is in.
pub fn frame_directory(path: &Path) -> SourceResult<&Path> {
    if path.is_dir() {
        return Ok(path);
    }

    match path.parent() {
        Some(parent) if path.is_file() => match parent.as_os_str().is_empty() {
            true => Ok(Path::new(".")),
            false => Ok(parent),
        },
        _ => Err(SourceError::NotFound(path.into())),
    }
}

/// `.svg` files of a directory, sorted by name.
pub fn frame_sources(path: &Path) -> SourceResult<Vec<PathBuf>> {
    let dir = frame_directory(path)?;
    let mut sources = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension() == Some(OsStr::new("svg")) {
            sources.push(path);
        }
    }
    sources.sort();
    Ok(sources)
}

/// Converts every frame of a directory.
///
/// Canvas size and placement come from the first frame. Sources that
/// cannot be read or parsed are reported and left out; frames that lost a
/// command to an invalid point are reported but kept.
pub fn convert_sequence(dir: &Path, options: &Options) -> SourceResult<SequenceConversion> {
    check_options(options)?;
    let sources = frame_sources(dir)?;

    let mut info: Option<SceneInfo> = None;
    let mut frames = Vec::with_capacity(sources.len());
    let mut failed = Vec::new();

    for source in sources {
        let converted = read_source(&source).and_then(|text| Ok(convert_str(&text, info, options)?));
        match converted {
            Ok((frame_info, walk)) => {
                if info.is_none() {
                    info = Some(frame_info);
                }
                if walk.failed {
                    failed.push(source);
                }
                frames.push(Frame {
                    duration: options.frame_duration,
                    commands: walk.commands,
                });
            }
            Err(e) => {
                log::warn!("Skipping frame {}: {}", source.display(), e);
                failed.push(source);
            }
        }
    }

    let info = info.ok_or(SourceError::EmptyScene)?;
    Ok(SequenceConversion {
        sequence: Sequence {
            size: canvas_size(info.size),
            play_count: options.play_count,
            frames,
        },
        failed,
    })
}

pub fn log_commands(commands: &[Command]) {
    for command in commands {
        log::info!("{}", command);
    }
}

pub fn log_frames(frames: &[Frame]) {
    for (i, frame) in frames.iter().enumerate() {
        log::info!("Frame {}:", i + 1);
        log_commands(&frame.commands);
    }
}

/// One conversion from the file system to a PDC file.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    /// SVG file, or directory of frames when `sequence` is set
    pub source: PathBuf,
    pub sequence: bool,
    /// defaults to the source name with a `.pdc` extension
    pub output: Option<PathBuf>,
    pub options: Options,
    /// list the produced commands
    pub verbose: bool,
}

impl Job {
    pub fn image(source: impl Into<PathBuf>, options: Options) -> Self {
        Self {
            source: source.into(),
            sequence: false,
            output: None,
            options,
            verbose: false,
        }
    }

    pub fn sequence(source: impl Into<PathBuf>, options: Options) -> Self {
        Self {
            sequence: true,
            ..Self::image(source, options)
        }
    }

    pub fn with_output(self, output: impl Into<PathBuf>) -> Self {
        Self {
            output: Some(output.into()),
            ..self
        }
    }

    /// `<stem>.pdc` next to an image, `<dir>/<dir name>.pdc` for a sequence.
    pub fn output_path(&self) -> PathBuf {
        if let Some(output) = &self.output {
            return output.clone();
        }

        match self.sequence {
            true => {
                let dir = frame_directory(&self.source).unwrap_or(&self.source);
                let dir = match dir == Path::new(".") {
                    true => std::env::current_dir().unwrap_or_else(|_| dir.into()),
                    false => dir.into(),
                };
                let mut name = dir.file_name().unwrap_or(OsStr::new("sequence")).to_os_string();
                name.push(".pdc");
                dir.join(name)
            }
            false => self.source.with_extension("pdc"),
        }
    }

    /// Converts and writes the container; returns the sources that failed.
    ///
    /// Nothing is written for an empty scene, for an image that lost a
    /// command to an invalid point, nor for a container that cannot be
    /// encoded.
    pub fn run(&self) -> SourceResult<Vec<PathBuf>> {
        let (container, failed) = match self.sequence {
            true => {
                let conversion = convert_sequence(&self.source, &self.options)?;
                if self.verbose {
                    log_frames(&conversion.sequence.frames);
                }
                (Container::Sequence(conversion.sequence), conversion.failed)
            }
            false => {
                let conversion = convert_image(&self.source, &self.options)?;
                if self.verbose {
                    log_commands(&conversion.image.commands);
                }
                if conversion.failed {
                    return Err(SourceError::InvalidPoints);
                }
                (Container::Image(conversion.image), Vec::new())
            }
        };

        let bytes = container.serialize(self.options.scheme)?;
        let output = self.output_path();
        File::create(&output)?.write_all(&bytes)?;
        log::debug!("Wrote {} bytes to {}", bytes.len(), output.display());

        for source in &failed {
            log::warn!("Errors in {}", source.display());
        }
        Ok(failed)
    }
}
