//! Draw batch descriptor and render-state enums

/// Topology of the vertices in a batch. Every draw is emitted as a triangle list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    #[default]
    Triangles,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RgbCombine {
    /// Iterated vertex RGB modulated by the texture
    #[default]
    ColorMultipliedByTexture,
    /// Constant color register only
    ConstantColor,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AlphaCombine {
    #[default]
    One,
    FromColor,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AlphaBlend {
    #[default]
    Opaque,
    SrcAlphaInvSrcAlpha,
    Additive,
    Multiplicative,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FilterMode {
    #[default]
    Point,
    Bilinear,
}

/// Coarse classification of what a texture depicts.
///
/// Used by surface id assignment and by motion prediction to decide which
/// vertices are world content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TextureCategory {
    #[default]
    Unknown,
    UserInterface,
    Player,
    TitleScreen,
    MousePointer,
    Font,
    LoadingScreen,
    Floor,
    Wall,
}

/// Symbolic identity of the game routine that issued a draw
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum GameAddress {
    #[default]
    Unknown,
    DrawFloor,
    DrawWall1,
    DrawWall2,
    DrawShadow,
    DrawDynamic,
    DrawLine,
}

impl GameAddress {
    /// Floor and wall tiles are drawn as a grid and share one surface
    pub fn is_world_tile(self) -> bool {
        matches!(
            self,
            GameAddress::DrawFloor | GameAddress::DrawWall1 | GameAddress::DrawWall2
        )
    }
}

/// Where the backend placed a texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureCacheLocation {
    pub atlas: u32,
    pub index: u32,
}

/// One draw's worth of vertices and the render state they share
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Batch {
    pub primitive: PrimitiveType,

    // Texture identity
    pub texture_start_address: u32,
    pub texture_hash: u64,
    pub texture_width: u16,
    pub texture_height: u16,
    /// `None` until the backend has resolved the texture; a batch without a
    /// location is not drawable
    pub location: Option<TextureCacheLocation>,
    pub palette_index: u16,

    // Render state
    pub rgb_combine: RgbCombine,
    pub alpha_combine: AlphaCombine,
    pub alpha_blend: AlphaBlend,
    pub filter_mode: FilterMode,
    pub chroma_key: bool,

    pub category: TextureCategory,
    pub game_address: GameAddress,

    pub start_vertex: u32,
    pub vertex_count: u32,
}

impl Batch {
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.location.is_some()
    }

    /// Cache identity class used to pick the backend's texture atlas
    #[inline]
    pub fn texture_cache_class(&self) -> (u16, u16) {
        (self.texture_width, self.texture_height)
    }

    #[inline]
    pub fn end_vertex(&self) -> u32 {
        self.start_vertex + self.vertex_count
    }

    /// Whether `next` can be appended to `self` as one draw submission
    pub fn can_merge_with(&self, next: &Batch, max_vertices: u32) -> bool {
        self.texture_cache_class() == next.texture_cache_class()
            && self.location.map(|l| l.atlas) == next.location.map(|l| l.atlas)
            && self.alpha_blend == next.alpha_blend
            && self.filter_mode == next.filter_mode
            && self.end_vertex() == next.start_vertex
            && self.vertex_count + next.vertex_count <= max_vertices
    }
}
