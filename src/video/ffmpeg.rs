//! FFmpeg decoding to RGB frames and JPEG output through `image`

use crate::error::GeotagError;
use crate::video::{FrameSource, FrameWriter};
use crate::Result;
use anyhow::Context;
use ffmpeg_next::format::{self, Pixel};
use ffmpeg_next::media::Type;
use ffmpeg_next::software::scaling;
use ffmpeg_next::util::frame::video::Video;
use image::RgbImage;
use std::path::Path;

fn video_error(msg: String) -> anyhow::Error {
    GeotagError::Video(msg).into()
}

/// Decodes the best video stream of a file into `RgbImage` frames
pub struct FfmpegFrameSource {
    input: format::context::Input,
    decoder: ffmpeg_next::decoder::Video,
    scaler: scaling::Context,
    stream_index: usize,
    frame_rate: f64,
    frame_count: Option<u64>,
    flushed: bool,
}

impl FfmpegFrameSource {
    pub fn open(path: &Path) -> Result<Self> {
        ffmpeg_next::init().map_err(|e| video_error(format!("FFmpeg init failed: {e}")))?;

        let input = format::input(&path)
            .with_context(|| format!("Failed to open video file: {:?}", path))?;
        let stream = input
            .streams()
            .best(Type::Video)
            .ok_or_else(|| video_error(format!("No video stream in {:?}", path)))?;
        let stream_index = stream.index();

        let frame_rate = f64::from(stream.avg_frame_rate());
        if !frame_rate.is_finite() || frame_rate <= 0.0 {
            return Err(video_error(format!(
                "Unknown frame rate in {:?}",
                path
            )));
        }
        let frame_count = u64::try_from(stream.frames()).ok().filter(|&n| n > 0);

        let context = ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())?;
        let decoder = context.decoder().video()?;
        let scaler = scaling::Context::get(
            decoder.format(),
            decoder.width(),
            decoder.height(),
            Pixel::RGB24,
            decoder.width(),
            decoder.height(),
            scaling::Flags::BILINEAR,
        )?;

        Ok(Self {
            input,
            decoder,
            scaler,
            stream_index,
            frame_rate,
            frame_count,
            flushed: false,
        })
    }

    fn to_image(&mut self, decoded: &Video) -> Result<RgbImage> {
        let mut rgb = Video::empty();
        self.scaler.run(decoded, &mut rgb)?;

        let width = rgb.width() as usize;
        let height = rgb.height() as usize;
        let stride = rgb.stride(0);
        let data = rgb.data(0);
        let mut pixels = Vec::with_capacity(width * height * 3);
        for row in 0..height {
            let start = row * stride;
            pixels.extend_from_slice(&data[start..start + width * 3]);
        }

        RgbImage::from_raw(width as u32, height as u32, pixels)
            .ok_or_else(|| video_error("Decoded frame has unexpected size".to_string()))
    }
}

impl FrameSource for FfmpegFrameSource {
    type Frame = RgbImage;

    fn frame_rate(&self) -> f64 {
        self.frame_rate
    }

    fn frame_count(&self) -> Option<u64> {
        self.frame_count
    }

    fn next_frame(&mut self) -> Result<Option<RgbImage>> {
        loop {
            let mut decoded = Video::empty();
            if self.decoder.receive_frame(&mut decoded).is_ok() {
                return self.to_image(&decoded).map(Some);
            }
            if self.flushed {
                return Ok(None);
            }

            let mut packet = ffmpeg_next::Packet::empty();
            match packet.read(&mut self.input) {
                Ok(()) => {
                    if packet.stream() == self.stream_index {
                        self.decoder.send_packet(&packet)?;
                    }
                }
                Err(ffmpeg_next::Error::Eof) => {
                    self.decoder.send_eof()?;
                    self.flushed = true;
                }
                Err(e) => return Err(video_error(format!("Failed to read packet: {e}"))),
            }
        }
    }
}

/// Writes frames as JPEG files
#[derive(Debug, Default)]
pub struct JpegFrameWriter;

impl FrameWriter<RgbImage> for JpegFrameWriter {
    fn write_frame(&mut self, frame: &RgbImage, path: &Path) -> Result<()> {
        frame
            .save_with_format(path, image::ImageFormat::Jpeg)
            .with_context(|| format!("Failed to write image: {:?}", path))
    }
}
