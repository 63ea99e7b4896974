//! Watermark source selection.
//!
//! A submission carries a `video_type` discriminator plus exactly one of:
//! a preset corner token (the service keeps a built-in mask per corner),
//! or an explicit region in source pixels.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rect::PixelRect;

/// Error for unrecognized wire tokens.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseTokenError {
    #[error("unknown video type: {0}")]
    VideoType(String),

    #[error("unknown watermark location: {0}")]
    WatermarkLocation(String),
}

/// Kind of video being cleaned, as the service spells it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum VideoType {
    /// RenderForest export (fixed overlay, no region selection needed)
    Renderforest,
    /// CapCut export (corner watermark, preset or user-selected region)
    #[default]
    Capcut,
}

impl VideoType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoType::Renderforest => "renderforest",
            VideoType::Capcut => "capcut",
        }
    }
}

impl fmt::Display for VideoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for VideoType {
    type Err = ParseTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "renderforest" => Ok(VideoType::Renderforest),
            "capcut" => Ok(VideoType::Capcut),
            other => Err(ParseTokenError::VideoType(other.to_string())),
        }
    }
}

/// Preset watermark corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum WatermarkLocation {
    #[default]
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl WatermarkLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            WatermarkLocation::TopLeft => "top_left",
            WatermarkLocation::TopRight => "top_right",
            WatermarkLocation::BottomLeft => "bottom_left",
            WatermarkLocation::BottomRight => "bottom_right",
        }
    }
}

impl fmt::Display for WatermarkLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for WatermarkLocation {
    type Err = ParseTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top_left" => Ok(WatermarkLocation::TopLeft),
            "top_right" => Ok(WatermarkLocation::TopRight),
            "bottom_left" => Ok(WatermarkLocation::BottomLeft),
            "bottom_right" => Ok(WatermarkLocation::BottomRight),
            other => Err(ParseTokenError::WatermarkLocation(other.to_string())),
        }
    }
}

/// What accompanies a submission: a preset corner or an explicit region.
///
/// The two variants are mutually exclusive in every request; a submission
/// never carries both a location token and region coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum WatermarkSource {
    /// Use the service's built-in mask for a known corner.
    Preset(WatermarkLocation),
    /// Inpaint an explicit user-selected region, in source pixels.
    Region(PixelRect),
}
