//! Embeddable media wrapper and URL resolution
//!
//! Copyright (c) 2025 Recast Team
//! Licensed under the Apache-2.0 license

use crate::markup::escape_markup;
use serde::{Serialize, Serializer};
use std::fmt;
use url::Url;

/// What a media URL resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMedia {
    pub provider: String,
    pub width: u32,
    pub height: u32,
    /// Canonical embeddable URL
    pub url: String,
    pub html: String,
}

/// Maps a source URL to its embeddable form
///
/// Returning `None` means the URL is not recognised; the embed keeps its source
/// URL and exposes no provider data.
pub trait MediaResolver: Send + Sync {
    fn resolve(&self, url: &str) -> Option<ResolvedMedia>;
}

/// Built-in resolver for YouTube and Vimeo links
#[derive(Debug, Clone, Copy, Default)]
pub struct ProviderResolver;

impl ProviderResolver {
    fn youtube_id(url: &Url) -> Option<String> {
        let host = url.host_str()?.trim_start_matches("www.").trim_start_matches("m.");
        let id = match host {
            "youtu.be" => url.path_segments()?.next().map(str::to_string),
            "youtube.com" | "youtube-nocookie.com" => {
                let mut segments = url.path_segments()?;
                match segments.next()? {
                    "watch" => url
                        .query_pairs()
                        .find(|(key, _)| *key == "v")
                        .map(|(_, id)| id.into_owned()),
                    "embed" | "shorts" | "v" => segments.next().map(str::to_string),
                    _ => None,
                }
            }
            _ => None,
        };
        id.filter(|id| !id.is_empty())
    }

    fn vimeo_id(url: &Url) -> Option<String> {
        let host = url.host_str()?.trim_start_matches("www.");
        if host != "vimeo.com" && host != "player.vimeo.com" {
            return None;
        }
        url.path_segments()?
            .find(|segment| !segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit()))
            .map(str::to_string)
    }

    fn iframe(src: &str, width: u32, height: u32) -> String {
        format!(
            r#"<iframe allowFullscreen="1" frameborder="0" height="{height}" scrolling="no" src="{}" width="{width}"></iframe>"#,
            escape_markup(src)
        )
    }

    fn media(provider: &str, url: String, width: u32, height: u32) -> ResolvedMedia {
        ResolvedMedia {
            provider: provider.to_string(),
            width,
            height,
            html: Self::iframe(&url, width, height),
            url,
        }
    }
}

impl MediaResolver for ProviderResolver {
    fn resolve(&self, source: &str) -> Option<ResolvedMedia> {
        let url = Url::parse(source.trim()).ok()?;

        if let Some(id) = Self::youtube_id(&url) {
            let embed = format!("https://www.youtube.com/embed/{id}?rel=0");
            return Some(Self::media("youtube", embed, 560, 314));
        }
        if let Some(id) = Self::vimeo_id(&url) {
            let embed = format!("https://player.vimeo.com/video/{id}");
            return Some(Self::media("vimeo", embed, 640, 360));
        }
        None
    }
}

/// A media URL and whatever the resolver made of it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaEmbed {
    value: String,
    media: Option<ResolvedMedia>,
}

impl MediaEmbed {
    pub fn new(value: impl Into<String>, resolver: &dyn MediaResolver) -> Self {
        let value = value.into();
        let media = resolver.resolve(&value);
        Self { value, media }
    }

    /// The source URL as supplied
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn media(&self) -> Option<&ResolvedMedia> {
        self.media.as_ref()
    }

    pub fn provider(&self) -> Option<&str> {
        self.media.as_ref().map(|m| m.provider.as_str())
    }

    pub fn width(&self) -> Option<u32> {
        self.media.as_ref().map(|m| m.width)
    }

    pub fn height(&self) -> Option<u32> {
        self.media.as_ref().map(|m| m.height)
    }

    pub fn url(&self) -> Option<&str> {
        self.media.as_ref().map(|m| m.url.as_str())
    }

    pub fn html(&self) -> Option<&str> {
        self.media.as_ref().map(|m| m.html.as_str())
    }
}

impl fmt::Display for MediaEmbed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl Serialize for MediaEmbed {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.value)
    }
}
