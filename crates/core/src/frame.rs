// SPDX-FileCopyrightText: © 2025 FrameKit Contributors
//
// SPDX-License-Identifier: MPL-2.0

//! Opaque frame handles.
//!
//! Pixel storage belongs to the frame allocator, not to the scheduling core.
//! A [`Frame`] is a cheap, reference-counted handle: cloning it never copies
//! pixel data, and remap filters pass frames through untouched.

use bytes::Bytes;
use std::sync::Arc;

use crate::types::VideoFormat;

/// Properties attached to a frame by the node that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameProps {
    /// Name of the source node that created the frame.
    pub origin: Arc<str>,
    /// Index of the frame within its source.
    pub origin_index: usize,
}

/// A produced video frame.
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub format: Option<VideoFormat>,
    pub data: Bytes,
    pub props: FrameProps,
}

impl Frame {
    pub fn new(
        width: u32,
        height: u32,
        format: Option<VideoFormat>,
        data: Bytes,
        props: FrameProps,
    ) -> Self {
        Self { width, height, format, data, props }
    }

    /// Returns true if both handles share the same backing storage.
    pub fn shares_data(&self, other: &Self) -> bool {
        self.data.as_ptr() == other.data.as_ptr() && self.data.len() == other.data.len()
    }

    /// Short `origin[index]` description, handy in logs and assertions.
    pub fn origin(&self) -> (&str, usize) {
        (&self.props.origin, self.props.origin_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_shares_storage() {
        let frame = Frame::new(
            4,
            2,
            Some(VideoFormat::GRAY8),
            Bytes::from(vec![0u8; 8]),
            FrameProps { origin: Arc::from("src"), origin_index: 3 },
        );
        let copy = frame.clone();
        assert!(frame.shares_data(&copy));
        assert_eq!(copy.origin(), ("src", 3));
    }
}
