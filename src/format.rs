use crate::command::Command;
use crate::error::{EncodingError, EncodingResult, ParsingError, ParsingResult};
use crate::options::TypeScheme;
use crate::Float;

#[allow(unused_imports)]
use num_traits::real::Real;

use vek::vec::Extent2;

use alloc::vec::Vec;

use ParsingError::*;

pub const IMAGE_MAGIC: [u8; 4] = *b"PDCI";
pub const SEQUENCE_MAGIC: [u8; 4] = *b"PDCS";
pub const DRAW_COMMAND_VERSION: u8 = 1;

/// magic word + payload length
const FILE_HEADER_SIZE: usize = 8;
/// version, reserved, width, height
const HEADER_SIZE: usize = 6;
const QUAD: usize = 4;
const WORD: usize = 2;

pub type Size = Extent2<i16>;

/// Rounds a viewBox extent to whole device pixels.
pub fn canvas_size(size: Extent2<Float>) -> Size {
    let round = |v: Float| v.round().clamp(i16::MIN as Float, i16::MAX as Float) as i16;
    Size::new(round(size.w), round(size.h))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub size: Size,
    pub commands: Vec<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// milliseconds
    pub duration: u16,
    pub commands: Vec<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    pub size: Size,
    pub play_count: u16,
    pub frames: Vec<Frame>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Container {
    Image(Image),
    Sequence(Sequence),
}

fn commands_size(commands: &[Command]) -> usize {
    commands.iter().fold(WORD, |a, c| a + c.size())
}

fn write_header(output: &mut Vec<u8>, size: Size) {
    output.push(DRAW_COMMAND_VERSION);
    output.push(0);
    output.extend_from_slice(&size.w.to_le_bytes());
    output.extend_from_slice(&size.h.to_le_bytes());
}

fn count(len: usize, error: EncodingError) -> EncodingResult<[u8; 2]> {
    u16::try_from(len).map(u16::to_le_bytes).map_err(|_| error)
}

fn write_commands(output: &mut Vec<u8>, commands: &[Command], scheme: TypeScheme) -> EncodingResult<()> {
    output.extend_from_slice(&count(commands.len(), EncodingError::TooManyCommands)?);
    for command in commands {
        command.serialize(scheme, output)?;
    }
    Ok(())
}

fn write_file_header(output: &mut Vec<u8>, magic: [u8; 4], payload: usize) -> EncodingResult<()> {
    let payload = u32::try_from(payload).map_err(|_| EncodingError::PayloadTooLarge)?;
    output.extend_from_slice(&magic);
    output.extend_from_slice(&payload.to_le_bytes());
    Ok(())
}

impl Frame {
    pub fn size(&self) -> usize {
        WORD + commands_size(&self.commands)
    }

    pub fn serialize(&self, scheme: TypeScheme, output: &mut Vec<u8>) -> EncodingResult<()> {
        output.extend_from_slice(&self.duration.to_le_bytes());
        write_commands(output, &self.commands, scheme)
    }
}

impl Image {
    fn payload_size(&self) -> usize {
        HEADER_SIZE + commands_size(&self.commands)
    }

    pub fn file_size(&self) -> usize {
        FILE_HEADER_SIZE + self.payload_size()
    }

    pub fn serialize(&self, scheme: TypeScheme) -> EncodingResult<Vec<u8>> {
        let mut output = Vec::new();
        write_file_header(&mut output, IMAGE_MAGIC, self.payload_size())?;
        write_header(&mut output, self.size);
        write_commands(&mut output, &self.commands, scheme)?;
        Ok(output)
    }
}

impl Sequence {
    fn payload_size(&self) -> usize {
        HEADER_SIZE + 2 * WORD + self.frames.iter().map(Frame::size).sum::<usize>()
    }

    pub fn file_size(&self) -> usize {
        FILE_HEADER_SIZE + self.payload_size()
    }

    pub fn serialize(&self, scheme: TypeScheme) -> EncodingResult<Vec<u8>> {
        let frame_count = count(self.frames.len(), EncodingError::TooManyFrames)?;
        let mut output = Vec::new();
        write_file_header(&mut output, SEQUENCE_MAGIC, self.payload_size())?;
        write_header(&mut output, self.size);
        output.extend_from_slice(&self.play_count.to_le_bytes());
        output.extend_from_slice(&frame_count);
        for frame in &self.frames {
            frame.serialize(scheme, &mut output)?;
        }
        Ok(output)
    }
}

impl Container {
    pub fn serialize(&self, scheme: TypeScheme) -> EncodingResult<Vec<u8>> {
        match self {
            Container::Image(image) => image.serialize(scheme),
            Container::Sequence(sequence) => sequence.serialize(scheme),
        }
    }

    /// Reads a whole container; commands are decoded with `scheme`.
    pub fn parse(bytes: &[u8], scheme: TypeScheme) -> ParsingResult<Self> {
        let mut i = 0;
        let i = &mut i;

        let magic = slice(bytes, i, QUAD)?;
        let is_image = match magic {
            m if m == IMAGE_MAGIC => true,
            m if m == SEQUENCE_MAGIC => false,
            _ => return Err(NotAPdcFile),
        };

        let payload_len = read_u32(bytes, i)? as usize;
        let payload = slice(bytes, i, payload_len)?;
        if *i != bytes.len() {
            return Err(ExcessBytes);
        }

        let mut j = 0;
        let j = &mut j;

        let version = read_u8(payload, j)?;
        if version != DRAW_COMMAND_VERSION {
            return Err(UnsupportedVersion);
        }
        let _reserved = read_u8(payload, j)?;
        let size = Size::new(read_i16(payload, j)?, read_i16(payload, j)?);

        let container = match is_image {
            true => Container::Image(Image {
                size,
                commands: read_commands(payload, j, scheme)?,
            }),
            false => {
                let play_count = read_u16(payload, j)?;
                let frame_count = read_u16(payload, j)? as usize;
                let mut frames = Vec::with_capacity(frame_count);
                for _ in 0..frame_count {
                    let duration = read_u16(payload, j)?;
                    frames.push(Frame {
                        duration,
                        commands: read_commands(payload, j, scheme)?,
                    });
                }
                Container::Sequence(Sequence {
                    size,
                    play_count,
                    frames,
                })
            }
        };

        match *j == payload.len() {
            true => Ok(container),
            false => Err(ExcessBytes),
        }
    }
}

fn read_commands(bytes: &[u8], i: &mut usize, scheme: TypeScheme) -> ParsingResult<Vec<Command>> {
    let count = read_u16(bytes, i)? as usize;
    let mut commands = Vec::with_capacity(count);
    for _ in 0..count {
        commands.push(Command::parse(bytes, i, scheme)?);
    }
    Ok(commands)
}

fn slice<'a>(bytes: &'a [u8], i: &mut usize, len: usize) -> ParsingResult<&'a [u8]> {
    let pos = *i;
    *i += len;
    match bytes.get(pos..*i) {
        Some(bytes) => Ok(bytes),
        None => Err(TooShort),
    }
}

fn read_array<const N: usize>(bytes: &[u8], i: &mut usize) -> ParsingResult<[u8; N]> {
    slice(bytes, i, N)?.try_into().map_err(|_| TooShort)
}

pub(crate) fn read_u8(bytes: &[u8], i: &mut usize) -> ParsingResult<u8> {
    Ok(read_array::<1>(bytes, i)?[0])
}

pub(crate) fn read_u16(bytes: &[u8], i: &mut usize) -> ParsingResult<u16> {
    read_array(bytes, i).map(u16::from_le_bytes)
}

pub(crate) fn read_i16(bytes: &[u8], i: &mut usize) -> ParsingResult<i16> {
    read_array(bytes, i).map(i16::from_le_bytes)
}

fn read_u32(bytes: &[u8], i: &mut usize) -> ParsingResult<u32> {
    read_array(bytes, i).map(u32::from_le_bytes)
}

#[cfg(feature = "std")]
mod dump {
    use super::Container;
    use crate::options::TypeScheme;
    use std::io::{Error, ErrorKind, Result as IoResult, Write};

    impl Container {
        /// Writes the whole container in one call; nothing is written when
        /// it cannot be encoded.
        pub fn dump<T: Write>(&self, scheme: TypeScheme, dst: &mut T) -> IoResult<usize> {
            let bytes = self.serialize(scheme).map_err(|e| Error::new(ErrorKind::InvalidInput, e))?;
            dst.write_all(&bytes)?;
            Ok(bytes.len())
        }
    }
}
