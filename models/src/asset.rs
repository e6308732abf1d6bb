use serde::{Deserialize, Serialize};

use std::fmt;

/// The channel asset a request produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetKind {
    Logo,
    Banner,
    Thumbnail,
    Description,
    Intro,
    About,
}

/// What the remote capability hands back for a kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Image,
    Text,
    Video,
}

impl AssetKind {
    pub const ALL: [AssetKind; 6] = [
        AssetKind::Logo,
        AssetKind::Banner,
        AssetKind::Thumbnail,
        AssetKind::Description,
        AssetKind::Intro,
        AssetKind::About,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Logo => "Logo",
            AssetKind::Banner => "Banner",
            AssetKind::Thumbnail => "Thumbnail",
            AssetKind::Description => "Description",
            AssetKind::Intro => "Intro",
            AssetKind::About => "About",
        }
    }

    /// Lowercase form used in file names.
    pub fn slug(&self) -> &'static str {
        match self {
            AssetKind::Logo => "logo",
            AssetKind::Banner => "banner",
            AssetKind::Thumbnail => "thumbnail",
            AssetKind::Description => "description",
            AssetKind::Intro => "intro",
            AssetKind::About => "about",
        }
    }

    pub fn output(&self) -> OutputKind {
        match self {
            AssetKind::Logo | AssetKind::Banner | AssetKind::Thumbnail => OutputKind::Image,
            AssetKind::Description | AssetKind::About => OutputKind::Text,
            AssetKind::Intro => OutputKind::Video,
        }
    }

    /// Whether the remote runs this kind as a long-running operation that
    /// has to be polled.
    pub fn is_async(&self) -> bool {
        self.output() == OutputKind::Video
    }

    /// Extension used when the artifact's mime type says nothing better.
    pub fn default_extension(&self) -> &'static str {
        match self.output() {
            OutputKind::Image => "png",
            OutputKind::Text => "txt",
            OutputKind::Video => "mp4",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "16:9")]
    Widescreen,
}

impl AspectRatio {
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Widescreen => "16:9",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VideoResolution {
    #[serde(rename = "720p")]
    P720,
    #[serde(rename = "1080p")]
    P1080,
}

impl VideoResolution {
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoResolution::P720 => "720p",
            VideoResolution::P1080 => "1080p",
        }
    }
}

/// Target pixel dimensions of an image asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetSize {
    pub width: u32,
    pub height: u32,
    pub aspect_ratio: AspectRatio,
}

impl AssetSize {
    pub const fn new(width: u32, height: u32, aspect_ratio: AspectRatio) -> Self {
        Self {
            width,
            height,
            aspect_ratio,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for AssetSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

pub const LOGO_SIZE: AssetSize = AssetSize::new(800, 800, AspectRatio::Square);

// Banners are displayed at 2560x1440; 16:9 is what the generator accepts.
pub const BANNER_SIZE: AssetSize = AssetSize::new(2560, 1440, AspectRatio::Widescreen);

pub const THUMBNAIL_SIZE: AssetSize = AssetSize::new(1280, 720, AspectRatio::Widescreen);
