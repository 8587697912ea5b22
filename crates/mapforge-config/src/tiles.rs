//! Tile identifiers supplied by the map editor's item table.

use serde::{Deserialize, Serialize};

/// Opaque tile identifier. Generators only ever compare and copy these.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(pub u16);

/// The named ground tiles the terrain generators read and write.
///
/// The ids are owned by the external item table; the defaults match the stock
/// item set and can be overridden from `config.ron`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TileTable {
    /// Open water (ocean, rivers, lakes).
    pub water: TileId,
    /// Beach and lake-shore sand.
    pub sand: TileId,
    /// Grass ground.
    pub grass: TileId,
    /// Loose gravel (cave floors, weathered ruins).
    pub gravel: TileId,
    /// Solid mountain rock.
    pub mountain: TileId,
    /// Snow cover on high peaks.
    pub snow: TileId,
    /// Worked stone (ruin walls, eroded cave walls).
    pub stone: TileId,
}

impl Default for TileTable {
    fn default() -> Self {
        Self {
            water: TileId(4608),
            sand: TileId(231),
            grass: TileId(4526),
            gravel: TileId(4837),
            mountain: TileId(919),
            snow: TileId(670),
            stone: TileId(1284),
        }
    }
}

impl TileTable {
    /// Returns `true` if every named tile has a distinct id.
    ///
    /// Generators compare tiles by id, so two names sharing an id would make
    /// e.g. "grass" indistinguishable from "sand".
    pub fn is_unambiguous(&self) -> bool {
        let ids = [
            self.water,
            self.sand,
            self.grass,
            self.gravel,
            self.mountain,
            self.snow,
            self.stone,
        ];
        ids.iter()
            .enumerate()
            .all(|(i, id)| !ids[i + 1..].contains(id))
    }
}
