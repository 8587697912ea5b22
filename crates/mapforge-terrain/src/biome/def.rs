//! Biome definition: describes the properties of a single biome type.

use mapforge_config::TileId;

/// The fixed set of biomes, ordered from sea floor to peaks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Biome {
    Ocean,
    Beach,
    Grassland,
    Forest,
    Rocky,
    Mountain,
    Snow,
}

impl Biome {
    /// Every biome, in table order.
    pub const ALL: [Biome; 7] = [
        Biome::Ocean,
        Biome::Beach,
        Biome::Grassland,
        Biome::Forest,
        Biome::Rocky,
        Biome::Mountain,
        Biome::Snow,
    ];

    /// Upper-case table name (e.g. `"FOREST"`).
    pub fn name(self) -> &'static str {
        match self {
            Biome::Ocean => "OCEAN",
            Biome::Beach => "BEACH",
            Biome::Grassland => "GRASSLAND",
            Biome::Forest => "FOREST",
            Biome::Rocky => "ROCKY",
            Biome::Mountain => "MOUNTAIN",
            Biome::Snow => "SNOW",
        }
    }

    /// Position in [`Biome::ALL`].
    pub fn ordinal(self) -> usize {
        self as usize
    }
}

/// Kinds of clutter a biome can host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DecorationTag {
    Trees,
    Shrubs,
    Rocks,
}

/// Full descriptor for a biome type.
#[derive(Clone, Debug, PartialEq)]
pub struct BiomeDef {
    pub biome: Biome,
    /// Upper-case biome name.
    pub name: &'static str,
    /// Reference elevation of the biome's band, in `[-1, 1]`.
    pub height: f64,
    /// Reference moisture of the biome, in `[0, 1]`.
    pub moisture: f64,
    /// Ground tile painted for this biome.
    pub tile: TileId,
    /// Clutter kinds eligible in this biome.
    pub decorations: &'static [DecorationTag],
}

impl BiomeDef {
    pub fn has_decoration(&self, tag: DecorationTag) -> bool {
        self.decorations.contains(&tag)
    }
}
