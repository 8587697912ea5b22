//! Biome table: maps [`Biome`] to its [`BiomeDef`], built once from the tile table.

use mapforge_config::{TileId, TileTable};

use super::{Biome, BiomeDef, DecorationTag};

/// Immutable lookup from every [`Biome`] to its definition.
#[derive(Clone, Debug)]
pub struct BiomeTable {
    defs: [BiomeDef; 7],
    tiles: TileTable,
}

impl BiomeTable {
    /// Build the table, resolving each biome's ground tile from `tiles`.
    pub fn new(tiles: &TileTable) -> Self {
        fn def(
            biome: Biome,
            height: f64,
            moisture: f64,
            tile: TileId,
            decorations: &'static [DecorationTag],
        ) -> BiomeDef {
            BiomeDef {
                biome,
                name: biome.name(),
                height,
                moisture,
                tile,
                decorations,
            }
        }

        let defs = [
            def(Biome::Ocean, -0.5, 0.5, tiles.water, &[]),
            def(Biome::Beach, -0.1, 0.3, tiles.sand, &[]),
            def(Biome::Grassland, 0.1, 0.4, tiles.grass, &[]),
            def(
                Biome::Forest,
                0.2,
                0.6,
                tiles.grass,
                &[DecorationTag::Trees, DecorationTag::Shrubs],
            ),
            def(Biome::Rocky, 0.5, 0.3, tiles.gravel, &[DecorationTag::Rocks]),
            def(Biome::Mountain, 0.7, 0.2, tiles.mountain, &[]),
            def(Biome::Snow, 0.8, 0.4, tiles.snow, &[]),
        ];

        Self {
            defs,
            tiles: tiles.clone(),
        }
    }

    /// Returns the definition for the given biome.
    pub fn get(&self, biome: Biome) -> &BiomeDef {
        &self.defs[biome.ordinal()]
    }

    /// The tile table the definitions were resolved against.
    pub fn tiles(&self) -> &TileTable {
        &self.tiles
    }

    pub fn iter(&self) -> impl Iterator<Item = &BiomeDef> {
        self.defs.iter()
    }
}
