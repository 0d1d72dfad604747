// SPDX-FileCopyrightText: © 2025 FrameKit Contributors
//
// SPDX-License-Identifier: MPL-2.0

use bytes::Bytes;
use framekit_core::{
    frame_index, ActivationReason, ArgMap, Filter, Frame, FrameContext, FrameData, FrameKitError,
    FrameProps, NodeFlags, NodeRef, ParamSpec, Result, StreamInfo, VideoFormat,
};
use std::sync::Arc;

pub const NAME: &str = "BlankClip";

/// Length used when `length` is not given.
pub const DEFAULT_LENGTH: usize = 240;

pub fn params() -> Vec<ParamSpec> {
    vec![
        ParamSpec::int("width").optional(),
        ParamSpec::int("height").optional(),
        ParamSpec::data("format").optional(),
        ParamSpec::int("length").optional(),
        ParamSpec::int("fpsnum").optional(),
        ParamSpec::int("fpsden").optional(),
        ParamSpec::data("name").optional(),
    ]
}

/// A source of zeroed frames.
///
/// Every frame shares one zeroed plane and records the clip name and its own
/// frame number in its properties, so downstream index arithmetic can be
/// checked by looking at where a frame came from.
///
/// Like any source it opts in to caching, so clips built through the
/// registry sit behind a cache.
pub struct BlankClip {
    info: StreamInfo,
    origin: Arc<str>,
    plane: Bytes,
}

impl BlankClip {
    pub fn new(info: StreamInfo, origin: &str) -> Self {
        let bytes_per_sample =
            info.format.map_or(1, |f| usize::from(f.bits_per_sample.div_ceil(8)));
        let size = usize::try_from(u64::from(info.width) * u64::from(info.height))
            .unwrap_or_default()
            .saturating_mul(bytes_per_sample);
        Self { info, origin: Arc::from(origin), plane: Bytes::from(vec![0u8; size]) }
    }

    fn check_range(&self, n: usize) -> Result<()> {
        match self.info.frame_count() {
            Some(len) if n >= len => Err(FrameKitError::runtime(format!(
                "{NAME}: frame {n} requested from '{}' which has {len} frames",
                self.origin
            ))),
            _ => Ok(()),
        }
    }
}

fn dimension(args: &ArgMap, key: &str, default: u32) -> Result<u32> {
    match args.get_int(key)? {
        None => Ok(default),
        Some(value) => u32::try_from(value)
            .ok()
            .filter(|v| *v > 0)
            .ok_or_else(|| FrameKitError::configuration(format!("{NAME}: invalid {key}"))),
    }
}

/// Constructor used by the registry.
///
/// # Errors
///
/// Returns `FrameKitError::Configuration` for non-positive dimensions, an
/// unknown format name, a negative length or an invalid frame rate.
pub fn create(args: &ArgMap) -> Result<NodeRef> {
    let defaults = StreamInfo::default();

    let width = dimension(args, "width", defaults.width)?;
    let height = dimension(args, "height", defaults.height)?;

    let format = match args.get_data("format")? {
        Some(name) => Some(VideoFormat::from_name(name).ok_or_else(|| {
            FrameKitError::configuration(format!("{NAME}: unknown format '{name}'"))
        })?),
        None => defaults.format,
    };

    let num_frames = match args.get_int("length")? {
        Some(length) => frame_index(length, "BlankClip: invalid length specified")?,
        None => DEFAULT_LENGTH,
    };

    let fps_num = args.get_int("fpsnum")?.unwrap_or(defaults.fps_num);
    let fps_den = args.get_int("fpsden")?.unwrap_or(defaults.fps_den);
    if fps_num < 0 || fps_den < 1 {
        return Err(FrameKitError::configuration("BlankClip: invalid framerate specified"));
    }

    let origin = args.get_data("name")?.unwrap_or(NAME);
    let info = StreamInfo { width, height, format, num_frames, fps_num, fps_den };
    Ok(NodeRef::new(BlankClip::new(info, origin), args.clone()))
}

impl Filter for BlankClip {
    fn name(&self) -> &str {
        NAME
    }

    fn stream_info(&self) -> StreamInfo {
        self.info
    }

    fn flags(&self) -> NodeFlags {
        NodeFlags::NONE
    }

    fn dependencies(&self) -> Vec<NodeRef> {
        Vec::new()
    }

    fn get_frame(
        &self,
        n: usize,
        reason: ActivationReason,
        _frame_data: &mut FrameData,
        _ctx: &mut FrameContext,
    ) -> Result<Option<Frame>> {
        self.check_range(n)?;
        match reason {
            ActivationReason::Initial => Ok(None),
            ActivationReason::AllFramesReady => Ok(Some(Frame::new(
                self.info.width,
                self.info.height,
                self.info.format,
                self.plane.clone(),
                FrameProps { origin: self.origin.clone(), origin_index: n },
            ))),
        }
    }
}
