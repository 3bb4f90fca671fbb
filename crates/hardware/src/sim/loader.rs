//! Program Image Loader.
//!
//! This module parses the line-oriented hex image format. It performs:
//! 1. **Address directives:** A line `@<hex>` sets the current load address.
//! 2. **Data lines:** Any other non-empty line is whitespace-separated hex bytes,
//!    stored consecutively from the current address.
//! 3. **Sources:** Images come from any buffered reader, a string or a file path
//!    (the CLI maps `-` to standard input).

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::common::error::{SimError, SimResult};

/// A contiguous run of bytes starting at `base`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Segment {
    /// Load address of the first byte.
    pub base: u32,
    /// Bytes in address order.
    pub bytes: Vec<u8>,
}

/// A parsed program image, in the order the segments appeared.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProgramImage {
    /// Address-contiguous segments.
    pub segments: Vec<Segment>,
}

impl ProgramImage {
    /// Parses an image from a buffered reader.
    ///
    /// # Errors
    ///
    /// [`SimError::ImageParse`] for a bad address or byte token, [`SimError::Io`]
    /// if the reader fails.
    pub fn parse<R: BufRead>(reader: R) -> SimResult<Self> {
        let mut image = Self::default();
        let mut addr: u32 = 0;
        let mut open = false;

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = idx + 1;
            let text = line.trim();
            if text.is_empty() {
                continue;
            }

            if let Some(hex) = text.strip_prefix('@') {
                addr = u32::from_str_radix(hex.trim(), 16).map_err(|e| SimError::ImageParse {
                    line: line_no,
                    message: format!("bad address `{hex}`: {e}"),
                })?;
                open = false;
                continue;
            }

            for token in text.split_whitespace() {
                let byte = u8::from_str_radix(token, 16).map_err(|e| SimError::ImageParse {
                    line: line_no,
                    message: format!("bad byte `{token}`: {e}"),
                })?;
                if !open {
                    image.segments.push(Segment {
                        base: addr,
                        bytes: Vec::new(),
                    });
                    open = true;
                }
                if let Some(segment) = image.segments.last_mut() {
                    segment.bytes.push(byte);
                }
                addr = addr.wrapping_add(1);
            }
        }

        Ok(image)
    }

    /// Parses an image held in memory.
    pub fn from_text(text: &str) -> SimResult<Self> {
        Self::parse(text.as_bytes())
    }

    /// Reads and parses an image file.
    pub fn from_file(path: impl AsRef<Path>) -> SimResult<Self> {
        let file = File::open(path)?;
        Self::parse(BufReader::new(file))
    }

    /// Total number of bytes across all segments.
    pub fn len(&self) -> usize {
        self.segments.iter().map(|s| s.bytes.len()).sum()
    }

    /// True if the image holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates `(address, byte)` pairs in image order.
    pub fn bytes(&self) -> impl Iterator<Item = (u32, u8)> + '_ {
        self.segments.iter().flat_map(|segment| {
            segment
                .bytes
                .iter()
                .enumerate()
                .map(move |(i, &b)| (segment.base.wrapping_add(i as u32), b))
        })
    }
}
