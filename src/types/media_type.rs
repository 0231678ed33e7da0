//! Shared media categories and the fixed-size flag set over them.

use std::ops::BitOr;

use serde::{Deserialize, Serialize};

use crate::types::error::{MediaError, MediaResult};

/// A category of shared media browsable inside a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum SharedMediaType {
    Photo = 0,
    Video = 1,
    MusicFile = 2,
    File = 3,
    VoiceFile = 4,
    Link = 5,
    ChatPhoto = 6,
    RoundVoiceFile = 7,
    Gif = 8,
    RoundFile = 9,
}

impl SharedMediaType {
    /// Number of media types.
    pub const COUNT: usize = 10;

    /// Every media type, ordered by index.
    pub const ALL: [SharedMediaType; Self::COUNT] = [
        Self::Photo,
        Self::Video,
        Self::MusicFile,
        Self::File,
        Self::VoiceFile,
        Self::Link,
        Self::ChatPhoto,
        Self::RoundVoiceFile,
        Self::Gif,
        Self::RoundFile,
    ];

    /// Convert a u8 value to a media type, returning None for invalid values.
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }

    /// Position of this type in per-conversation arrays.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Return a human-readable name for this media type.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Photo => "photo",
            Self::Video => "video",
            Self::MusicFile => "music_file",
            Self::File => "file",
            Self::VoiceFile => "voice_file",
            Self::Link => "link",
            Self::ChatPhoto => "chat_photo",
            Self::RoundVoiceFile => "round_voice_file",
            Self::Gif => "gif",
            Self::RoundFile => "round_file",
        }
    }

    /// Parse a media type from its name.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase().replace('-', "_");
        Self::ALL.iter().copied().find(|t| t.name() == name)
    }

    /// Parse a media type name, reporting unknown names as an error.
    pub fn parse(name: &str) -> MediaResult<Self> {
        Self::from_name(name).ok_or_else(|| MediaError::UnknownType(name.to_string()))
    }
}

impl std::fmt::Display for SharedMediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl TryFrom<u8> for SharedMediaType {
    type Error = MediaError;

    fn try_from(value: u8) -> MediaResult<Self> {
        Self::from_u8(value).ok_or(MediaError::InvalidTypeIndex(value))
    }
}

/// Set of media types one message belongs to. A GIF, for example, is
/// counted both as `Gif` and as `File`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "Vec<SharedMediaType>", from = "Vec<SharedMediaType>")]
pub struct SharedMediaTypesMask {
    bits: u16,
}

impl SharedMediaTypesMask {
    pub const fn empty() -> Self {
        Self { bits: 0 }
    }

    pub const fn all() -> Self {
        Self {
            bits: (1 << SharedMediaType::COUNT) - 1,
        }
    }

    pub const fn single(media_type: SharedMediaType) -> Self {
        Self {
            bits: 1 << media_type as u16,
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, media_type: SharedMediaType) -> Self {
        self.set(media_type);
        self
    }

    pub fn set(&mut self, media_type: SharedMediaType) {
        self.bits |= 1 << media_type as u16;
    }

    pub fn contains(&self, media_type: SharedMediaType) -> bool {
        self.bits & (1 << media_type as u16) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Types in the mask, ascending by index.
    pub fn iter(&self) -> impl Iterator<Item = SharedMediaType> + '_ {
        SharedMediaType::ALL
            .iter()
            .copied()
            .filter(move |t| self.contains(*t))
    }

    /// Parse a comma-separated list of type names, e.g. `"gif,file"`.
    pub fn parse(names: &str) -> MediaResult<Self> {
        names
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(SharedMediaType::parse)
            .collect()
    }
}

impl From<SharedMediaType> for SharedMediaTypesMask {
    fn from(media_type: SharedMediaType) -> Self {
        Self::single(media_type)
    }
}

impl FromIterator<SharedMediaType> for SharedMediaTypesMask {
    fn from_iter<I: IntoIterator<Item = SharedMediaType>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), Self::with)
    }
}

impl BitOr for SharedMediaTypesMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self {
            bits: self.bits | rhs.bits,
        }
    }
}

impl BitOr<SharedMediaType> for SharedMediaTypesMask {
    type Output = Self;

    fn bitor(self, rhs: SharedMediaType) -> Self {
        self.with(rhs)
    }
}

impl From<Vec<SharedMediaType>> for SharedMediaTypesMask {
    fn from(types: Vec<SharedMediaType>) -> Self {
        types.into_iter().collect()
    }
}

impl From<SharedMediaTypesMask> for Vec<SharedMediaType> {
    fn from(mask: SharedMediaTypesMask) -> Self {
        mask.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_index_roundtrip() {
        for val in 0u8..SharedMediaType::COUNT as u8 {
            let t = SharedMediaType::from_u8(val).unwrap();
            assert_eq!(t as u8, val);
            assert_eq!(t.index(), val as usize);
        }
        assert!(SharedMediaType::from_u8(10).is_none());
        assert!(SharedMediaType::try_from(200u8).is_err());
    }

    #[test]
    fn names_parse_back() {
        for t in SharedMediaType::ALL {
            assert_eq!(SharedMediaType::from_name(t.name()), Some(t));
        }
        assert_eq!(
            SharedMediaType::from_name("Round-Voice-File"),
            Some(SharedMediaType::RoundVoiceFile)
        );
        assert!(SharedMediaType::from_name("sticker").is_none());
    }

    #[test]
    fn mask_iterates_in_index_order() {
        let mask = SharedMediaTypesMask::single(SharedMediaType::Gif) | SharedMediaType::File;
        assert_eq!(mask.len(), 2);
        let types: Vec<_> = mask.iter().collect();
        assert_eq!(types, vec![SharedMediaType::File, SharedMediaType::Gif]);
        assert!(!mask.contains(SharedMediaType::Photo));
    }

    #[test]
    fn mask_all_covers_every_type() {
        let all = SharedMediaTypesMask::all();
        assert_eq!(all.len(), SharedMediaType::COUNT);
        assert!(SharedMediaType::ALL.iter().all(|t| all.contains(*t)));
        assert!(SharedMediaTypesMask::empty().is_empty());
    }

    #[test]
    fn mask_parse_names() {
        let mask = SharedMediaTypesMask::parse("photo, video").unwrap();
        assert!(mask.contains(SharedMediaType::Photo));
        assert!(mask.contains(SharedMediaType::Video));
        assert!(SharedMediaTypesMask::parse("photo,nope").is_err());
    }

    #[test]
    fn mask_serializes_as_list() {
        let mask = SharedMediaTypesMask::single(SharedMediaType::Link);
        let json = serde_json::to_string(&mask).unwrap();
        assert_eq!(json, r#"["link"]"#);
        let back: SharedMediaTypesMask = serde_json::from_str(&json).unwrap();
        assert_eq!(back, mask);
    }
}
