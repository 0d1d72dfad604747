// SPDX-FileCopyrightText: © 2025 FrameKit Contributors
//
// SPDX-License-Identifier: MPL-2.0

//! Stream metadata types.
//!
//! - [`VideoFormat`]: opaque pixel format tag, compared for equality only
//! - [`StreamInfo`]: dimensions, format, length and frame rate of a node's output
//!
//! A `num_frames` of zero is the "unknown length" sentinel. It is carried
//! through every merge and remap unchanged unless a filter explicitly fixes
//! the length.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Color family of a [`VideoFormat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorFamily {
    Gray,
    Rgb,
    Yuv,
    /// Packed 32-bit BGR kept for interop with legacy hosts.
    CompatBgr32,
    /// Packed YUY2 kept for interop with legacy hosts.
    CompatYuy2,
}

/// How samples are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SampleType {
    Integer,
    Float,
}

/// Opaque pixel format tag.
///
/// Filters in this crate never look inside a format; they only compare
/// formats for equality and ask whether a format is a compat one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VideoFormat {
    pub color_family: ColorFamily,
    pub sample_type: SampleType,
    pub bits_per_sample: u8,
    pub sub_sampling_w: u8,
    pub sub_sampling_h: u8,
}

impl VideoFormat {
    pub const GRAY8: Self = Self::integer(ColorFamily::Gray, 8, 0, 0);
    pub const GRAY16: Self = Self::integer(ColorFamily::Gray, 16, 0, 0);
    pub const YUV420P8: Self = Self::integer(ColorFamily::Yuv, 8, 1, 1);
    pub const YUV422P8: Self = Self::integer(ColorFamily::Yuv, 8, 1, 0);
    pub const YUV444P8: Self = Self::integer(ColorFamily::Yuv, 8, 0, 0);
    pub const YUV420P10: Self = Self::integer(ColorFamily::Yuv, 10, 1, 1);
    pub const RGB24: Self = Self::integer(ColorFamily::Rgb, 8, 0, 0);
    pub const RGBS: Self = Self {
        color_family: ColorFamily::Rgb,
        sample_type: SampleType::Float,
        bits_per_sample: 32,
        sub_sampling_w: 0,
        sub_sampling_h: 0,
    };
    pub const COMPAT_BGR32: Self = Self::integer(ColorFamily::CompatBgr32, 32, 0, 0);
    pub const COMPAT_YUY2: Self = Self::integer(ColorFamily::CompatYuy2, 16, 1, 0);

    const fn integer(
        color_family: ColorFamily,
        bits_per_sample: u8,
        sub_sampling_w: u8,
        sub_sampling_h: u8,
    ) -> Self {
        Self {
            color_family,
            sample_type: SampleType::Integer,
            bits_per_sample,
            sub_sampling_w,
            sub_sampling_h,
        }
    }

    /// Returns true for the packed compat formats, which never merge safely.
    pub const fn is_compat(&self) -> bool {
        matches!(self.color_family, ColorFamily::CompatBgr32 | ColorFamily::CompatYuy2)
    }

    /// Looks up one of the preset formats by its conventional name.
    pub fn from_name(name: &str) -> Option<Self> {
        let format = match name {
            "Gray8" => Self::GRAY8,
            "Gray16" => Self::GRAY16,
            "YUV420P8" => Self::YUV420P8,
            "YUV422P8" => Self::YUV422P8,
            "YUV444P8" => Self::YUV444P8,
            "YUV420P10" => Self::YUV420P10,
            "RGB24" => Self::RGB24,
            "RGBS" => Self::RGBS,
            "CompatBGR32" => Self::COMPAT_BGR32,
            "CompatYUY2" => Self::COMPAT_YUY2,
            _ => return None,
        };
        Some(format)
    }
}

impl fmt::Display for VideoFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?}/{:?}/{}bit/{}x{}",
            self.color_family,
            self.sample_type,
            self.bits_per_sample,
            self.sub_sampling_w,
            self.sub_sampling_h
        )
    }
}

/// Metadata describing the output stream of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamInfo {
    /// Frame width, 0 when inputs disagree.
    pub width: u32,
    /// Frame height, 0 when inputs disagree.
    pub height: u32,
    /// Pixel format, `None` when unknown or inputs disagree.
    pub format: Option<VideoFormat>,
    /// Number of frames, 0 when unknown/unbounded.
    pub num_frames: usize,
    pub fps_num: i64,
    pub fps_den: i64,
}

impl StreamInfo {
    /// Returns the frame count, or `None` for unknown-length streams.
    pub const fn frame_count(&self) -> Option<usize> {
        if self.num_frames == 0 {
            None
        } else {
            Some(self.num_frames)
        }
    }

    pub const fn has_known_length(&self) -> bool {
        self.num_frames != 0
    }

    /// Whether this stream uses a compat format.
    pub fn is_compat(&self) -> bool {
        self.format.is_some_and(|f| f.is_compat())
    }

    /// Same frame shape: width, height and format all equal.
    pub fn is_same_format(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height && self.format == other.format
    }
}

impl Default for StreamInfo {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            format: Some(VideoFormat::GRAY8),
            num_frames: 0,
            fps_num: 24,
            fps_den: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_count_sentinel() {
        let info = StreamInfo { num_frames: 0, ..StreamInfo::default() };
        assert_eq!(info.frame_count(), None);
        assert!(!info.has_known_length());

        let info = StreamInfo { num_frames: 12, ..StreamInfo::default() };
        assert_eq!(info.frame_count(), Some(12));
    }

    #[test]
    fn test_same_format_ignores_length_and_rate() {
        let a = StreamInfo { num_frames: 10, fps_num: 30, ..StreamInfo::default() };
        let b = StreamInfo { num_frames: 3, fps_num: 25, ..StreamInfo::default() };
        assert!(a.is_same_format(&b));

        let c = StreamInfo { format: Some(VideoFormat::YUV420P8), ..a };
        assert!(!a.is_same_format(&c));
    }

    #[test]
    fn test_compat_formats() {
        assert!(VideoFormat::COMPAT_BGR32.is_compat());
        assert!(VideoFormat::COMPAT_YUY2.is_compat());
        assert!(!VideoFormat::YUV420P8.is_compat());

        let info = StreamInfo { format: None, ..StreamInfo::default() };
        assert!(!info.is_compat());
    }

    #[test]
    fn test_format_from_name() {
        assert_eq!(VideoFormat::from_name("YUV420P8"), Some(VideoFormat::YUV420P8));
        assert_eq!(VideoFormat::from_name("CompatYUY2"), Some(VideoFormat::COMPAT_YUY2));
        assert_eq!(VideoFormat::from_name("NV12"), None);
    }
}
