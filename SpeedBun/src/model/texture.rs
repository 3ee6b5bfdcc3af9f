use serde::{Deserialize, Serialize};

/// A named pack of textures, either embedded or streamed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TexturePack {
    pub version: u32,
    pub name: String,
    pub pipeline_path: String,
    pub pipeline_path_hash: u32,
    pub infos: Vec<TextureInfo>,
    pub stream_entries: Vec<TextureStreamEntry>,
}

impl TexturePack {
    /// Find a texture by the hash of its name.
    #[must_use]
    pub fn find(&self, name_hash: u32) -> Option<&TextureInfo> {
        self.infos.iter().find(|t| t.name_hash == name_hash)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextureInfo {
    pub name: String,
    pub name_hash: u32,
    pub class_hash: u32,
    pub parent_image_hash: Option<u32>,
    #[serde(skip)]
    pub palette: Vec<u8>,
    pub palette_offset: i32,
    pub palette_size: i32,
    #[serde(skip)]
    pub data: Vec<u8>,
    pub data_offset: i32,
    pub data_size: i32,
    pub base_image_size: i32,
    pub width: i16,
    pub height: i16,
    pub width_shift: u8,
    pub height_shift: u8,
    pub data_compression: u8,
    pub palette_compression: u8,
    pub palette_count: i16,
    pub mipmap_count: u8,
    pub tileable_uv: u8,
    pub bias_level: u8,
    pub render_order: u8,
    pub scroll_type: u8,
    pub flags_used: bool,
    pub apply_alpha_sort: bool,
    pub alpha_usage_type: u8,
    pub alpha_blend_type: u8,
    pub flags: u8,
    pub scroll_timestep: i16,
    pub scroll_speed_s: i16,
    pub scroll_speed_t: i16,
    pub offset_s: i16,
    pub offset_t: i16,
    pub scale_s: i16,
    pub scale_t: i16,
}

/// Location of a streamed texture's data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureStreamEntry {
    pub hash: u32,
    pub data_offset: i32,
    pub compressed_data_size: i32,
    pub decompressed_data_size: i32,
}
