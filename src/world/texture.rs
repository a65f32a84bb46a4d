// Format-agnostic repository of textures decoded by the asset loader.
// The renderer and world logic interact through `TextureId` only.

use std::collections::HashMap;

/// Runtime handle for a texture in this bank.
///
/// *Guaranteed* to remain stable for the lifetime of the bank.
pub type TextureId = u16;

/// `TextureId` whose pixels are the checkerboard fallback.
/// Always = 0 because `TextureBank::new()` inserts it first.
pub const NO_TEXTURE: TextureId = 0;

/// Square, power-of-two, 32-bit **ARGB** (0xAARRGGBB) texture in row-major
/// order, plus an optional chain of half-size copies for mip-mapping.
///
/// The power-of-two edge lets the rasterizers address texels with shifts:
/// `pixels[u + (v << size_bits)]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    pub name: String,
    size_bits: u32,
    pixels: Vec<u32>,
    half: Option<Box<Texture>>,
}

/// Convenience checkerboard 8×8 (dark/light grey).
impl Default for Texture {
    fn default() -> Self {
        const LIGHT: u32 = 0xFF_A0A0A0;
        const DARK: u32 = 0xFF_505050;
        let mut pix = vec![0u32; 8 * 8];
        for y in 0..8 {
            for x in 0..8 {
                pix[y * 8 + x] = if (x ^ y) & 1 == 0 { LIGHT } else { DARK };
            }
        }
        Texture {
            name: "CHECKER".to_string(),
            size_bits: 3,
            pixels: pix,
            half: None,
        }
    }
}

/// Things that can go wrong when using the bank.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextureError {
    /// Attempted to insert a second texture with an existing name.
    #[error("texture name `{0}` already present in bank")]
    Duplicate(String),

    /// Requested ID is outside `0 .. bank.len()`.
    #[error("texture id {0} out of range")]
    BadId(TextureId),

    /// Edge length is zero or not a power of two.
    #[error("texture `{name}` size {size} is not a power of two")]
    NotPowerOfTwo { name: String, size: usize },

    /// Pixel buffer does not hold `size * size` texels.
    #[error("texture `{name}` has {got} pixels, expected {expected}")]
    PixelCount {
        name: String,
        got: usize,
        expected: usize,
    },
}

impl Texture {
    /// Wrap a decoded `size × size` pixel buffer.
    pub fn new<S: Into<String>>(
        name: S,
        size: usize,
        pixels: Vec<u32>,
    ) -> Result<Self, TextureError> {
        let name = name.into();
        if !size.is_power_of_two() {
            return Err(TextureError::NotPowerOfTwo { name, size });
        }
        if pixels.len() != size * size {
            return Err(TextureError::PixelCount {
                name,
                got: pixels.len(),
                expected: size * size,
            });
        }
        Ok(Self {
            name,
            size_bits: size.trailing_zeros(),
            pixels,
            half: None,
        })
    }

    /// Texture filled with one colour.
    pub fn solid<S: Into<String>>(name: S, size_bits: u32, argb: u32) -> Self {
        let size = 1usize << size_bits;
        Self {
            name: name.into(),
            size_bits,
            pixels: vec![argb; size * size],
            half: None,
        }
    }

    /// Build the whole mip chain down to 1×1 with a 2×2 box filter.
    pub fn with_mipmaps(mut self) -> Self {
        self.half = self.downsample().map(|h| Box::new(h.with_mipmaps()));
        self
    }

    fn downsample(&self) -> Option<Texture> {
        if self.size_bits == 0 {
            return None;
        }
        let src = self.size();
        let dst = src / 2;
        let mut pixels = Vec::with_capacity(dst * dst);
        for y in 0..dst {
            for x in 0..dst {
                let quad = [
                    self.pixels[(2 * y) * src + 2 * x],
                    self.pixels[(2 * y) * src + 2 * x + 1],
                    self.pixels[(2 * y + 1) * src + 2 * x],
                    self.pixels[(2 * y + 1) * src + 2 * x + 1],
                ];
                pixels.push(average_argb(&quad));
            }
        }
        Some(Texture {
            name: self.name.clone(),
            size_bits: self.size_bits - 1,
            pixels,
            half: None,
        })
    }

    /*──────────────────────── accessors ─────────────────────────*/

    #[inline(always)]
    pub fn size(&self) -> usize {
        1 << self.size_bits
    }

    #[inline(always)]
    pub fn size_bits(&self) -> u32 {
        self.size_bits
    }

    #[inline(always)]
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    #[inline(always)]
    pub fn half_size(&self) -> Option<&Texture> {
        self.half.as_deref()
    }

    /// Smallest mip whose edge still covers `dst_size` pixels.
    #[inline]
    pub fn mip_for(&self, dst_size: i32) -> &Texture {
        let mut tex = self;
        while dst_size < tex.size() as i32 {
            match tex.half_size() {
                Some(h) => tex = h,
                None => break,
            }
        }
        tex
    }
}

fn average_argb(quad: &[u32; 4]) -> u32 {
    let channel = |shift: u32| -> u32 {
        let sum: u32 = quad.iter().map(|&p| (p >> shift) & 0xFF).sum();
        ((sum + 2) / 4) << shift
    };
    channel(24) | channel(16) | channel(8) | channel(0)
}

/// Arbitrary-size ARGB picture, used for the panoramic background.
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    pub w: usize,
    pub h: usize,
    pub pixels: Vec<u32>,
}

impl Image {
    pub fn new(w: usize, h: usize, pixels: Vec<u32>) -> Self {
        debug_assert_eq!(pixels.len(), w * h);
        Self { w, h, pixels }
    }

    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Nearest-neighbour rescale so the image is `height` rows tall,
    /// keeping the aspect ratio.
    pub fn scaled_to_height(&self, height: usize) -> Image {
        if self.is_empty() || height == 0 {
            return Image::new(0, 0, Vec::new());
        }
        if height == self.h {
            return self.clone();
        }
        let w = (self.w * height / self.h).max(1);
        let mut pixels = Vec::with_capacity(w * height);
        for y in 0..height {
            let sy = y * self.h / height;
            let row = &self.pixels[sy * self.w..][..self.w];
            pixels.extend((0..w).map(|x| row[x * self.w / w]));
        }
        Image::new(w, height, pixels)
    }
}

/// A format-agnostic cache of textures.
///
/// * Does **not** know about PNG or any file format; decoding is the loader's job.
/// * Stores exactly one copy of every name.
/// * ID **0** is always the “missing” checkerboard.
///
/// **Thread-safety:** access `TextureBank` from a single thread or wrap it
/// in `RwLock`; the struct itself is not `Sync`.
pub struct TextureBank {
    by_name: HashMap<String, TextureId>,
    data: Vec<Texture>,
}

impl TextureBank {
    // ---------------------------------------------------------------------
    // Constructors
    // ---------------------------------------------------------------------

    /// Create an empty bank with a mandatory *missing* texture used as
    /// fallback.  The texture is inserted under the fixed name `"MISSING"`
    /// and obtains the handle **0**.
    pub fn new(missing_tex: Texture) -> Self {
        let mut by_name = HashMap::new();
        by_name.insert("MISSING".into(), NO_TEXTURE);
        Self {
            by_name,
            data: vec![missing_tex],
        }
    }

    pub fn default_with_checker() -> Self {
        Self::new(Texture::default())
    }

    // ---------------------------------------------------------------------
    // Query helpers
    // ---------------------------------------------------------------------

    /// Number of textures stored (including the “missing” one).
    pub fn len(&self) -> usize {
        self.data.len()
    }
    pub fn is_empty(&self) -> bool {
        self.data.len() == 1
    } // only checker

    /// Obtain the id for a *loaded* texture by name.
    /// Returns `None` if the name is unknown.
    pub fn id(&self, name: &str) -> Option<TextureId> {
        self.by_name.get(name).copied()
    }

    pub fn contains(&self, id: TextureId) -> bool {
        (id as usize) < self.data.len()
    }

    /// Borrow a texture by id, with bounds-checking.
    pub fn texture(&self, id: TextureId) -> Result<&Texture, TextureError> {
        self.data.get(id as usize).ok_or(TextureError::BadId(id))
    }

    /// Per-frame lookup: unknown ids draw as the checkerboard.
    #[inline]
    pub fn texture_or_missing(&self, id: TextureId) -> &Texture {
        self.data
            .get(id as usize)
            .unwrap_or(&self.data[NO_TEXTURE as usize])
    }

    // ---------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------

    /// Insert a texture under `name`.
    ///
    /// * Returns the newly assigned `TextureId`.
    /// * Fails if the name already exists (`Duplicate`).
    pub fn insert<S: Into<String>>(
        &mut self,
        name: S,
        tex: Texture,
    ) -> Result<TextureId, TextureError> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(TextureError::Duplicate(name));
        }
        let id = self.data.len() as TextureId;
        self.data.push(tex);
        self.by_name.insert(name, id);
        Ok(id)
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    fn dummy_tex(color: u32) -> Texture {
        Texture::solid("Dummy", 1, color)
    }

    #[test]
    fn insert_and_lookup() {
        let mut bank = TextureBank::default_with_checker();
        let red = bank.insert("RED", dummy_tex(0xFF_FF0000)).unwrap();
        let blue = bank.insert("BLUE", dummy_tex(0xFF_0000FF)).unwrap();

        assert_ne!(red, NO_TEXTURE);
        assert_ne!(blue, red);
        assert_eq!(bank.id("RED"), Some(red));
        assert_eq!(bank.id("BLUE"), Some(blue));
        assert_eq!(bank.id("NOPE"), None);

        assert_eq!(bank.texture(red).unwrap().pixels()[0], 0xFF_FF0000);
        assert_eq!(bank.texture(blue).unwrap().pixels()[0], 0xFF_0000FF);
    }

    #[test]
    fn duplicate_name_rejected() {
        let mut bank = TextureBank::default_with_checker();
        bank.insert("WOOD", dummy_tex(1)).unwrap();
        let err = bank.insert("WOOD", dummy_tex(2)).unwrap_err();
        assert_eq!(err, TextureError::Duplicate("WOOD".into()));
        // texture count still 2 (checker + first WOOD)
        assert_eq!(bank.len(), 2);
    }

    #[test]
    fn bad_id_guard() {
        let bank = TextureBank::default_with_checker();
        let bad = TextureId::MAX;
        assert_eq!(bank.texture(bad).unwrap_err(), TextureError::BadId(bad));
        assert_eq!(bank.texture_or_missing(bad).name, "CHECKER");
    }

    #[test]
    fn rejects_non_power_of_two() {
        let err = Texture::new("ODD", 6, vec![0; 36]).unwrap_err();
        assert!(matches!(err, TextureError::NotPowerOfTwo { size: 6, .. }));
        let err = Texture::new("SHORT", 4, vec![0; 15]).unwrap_err();
        assert!(matches!(err, TextureError::PixelCount { got: 15, .. }));
        assert_eq!(Texture::new("OK", 4, vec![0; 16]).unwrap().size_bits(), 2);
    }

    #[test]
    fn mip_chain_halves_to_one_texel() {
        let tex = Texture::solid("WALL", 3, 0xFF_204080).with_mipmaps();
        let mut sizes = vec![tex.size()];
        let mut cur = &tex;
        while let Some(h) = cur.half_size() {
            sizes.push(h.size());
            cur = h;
        }
        assert_eq!(sizes, vec![8, 4, 2, 1]);
        assert_eq!(cur.pixels(), &[0xFF_204080]);
    }

    #[test]
    fn mip_selection_covers_destination() {
        let tex = Texture::solid("WALL", 6, 0xFF_FFFFFF).with_mipmaps();
        assert_eq!(tex.mip_for(100).size(), 64);
        assert_eq!(tex.mip_for(64).size(), 64);
        assert_eq!(tex.mip_for(40).size(), 32);
        assert_eq!(tex.mip_for(0).size(), 1);
        // without a chain the base level is used
        let plain = Texture::solid("PLAIN", 6, 0);
        assert_eq!(plain.mip_for(3).size(), 64);
    }

    #[test]
    fn box_filter_averages_channels() {
        let px = vec![0xFF_000000, 0xFF_FFFFFF, 0x00_000000, 0x00_FFFFFF];
        let tex = Texture::new("MIX", 2, px).unwrap().with_mipmaps();
        let half = tex.half_size().unwrap();
        assert_eq!(half.pixels(), &[0x80_808080]);
    }

    #[test]
    fn image_rescale_keeps_aspect() {
        let img = Image::new(4, 2, (0..8).collect());
        let big = img.scaled_to_height(4);
        assert_eq!((big.w, big.h), (8, 4));
        assert_eq!(big.pixels[0], 0);
        assert_eq!(big.pixels[8 * 3 + 7], 7);
        assert!(Image::new(0, 0, vec![]).scaled_to_height(10).is_empty());
    }
}
