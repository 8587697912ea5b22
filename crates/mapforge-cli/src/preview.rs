//! ASCII rendering of a generated map for quick inspection in a terminal.

use mapforge_terrain::{GeneratedMap, Grid, TileId, TileTable};

/// Widest preview printed; larger maps are sampled down.
pub const MAX_COLUMNS: usize = 120;

fn tile_glyph(tile: TileId, tiles: &TileTable) -> char {
    match tile {
        t if t == tiles.water => '~',
        t if t == tiles.sand => '.',
        t if t == tiles.grass => ',',
        t if t == tiles.gravel => ':',
        t if t == tiles.mountain => '^',
        t if t == tiles.snow => '*',
        t if t == tiles.stone => '#',
        _ => '?',
    }
}

/// Render one glyph per sampled cell; trees show as `T`, other clutter as `o`.
pub fn render<D>(map: &GeneratedMap<D>, tiles: &TileTable, max_columns: usize) -> String {
    let step = map.tiles.width().div_ceil(max_columns.max(1));
    let mut out = String::new();

    for y in (0..map.tiles.height()).step_by(step) {
        for x in (0..map.tiles.width()).step_by(step) {
            out.push(glyph_at(map, tiles, x, y));
        }
        out.push('\n');
    }
    out
}

fn glyph_at<D>(map: &GeneratedMap<D>, tiles: &TileTable, x: usize, y: usize) -> char {
    if has_item(map.forest.as_ref(), x, y) {
        'T'
    } else if has_item(Some(&map.decorations), x, y) {
        'o'
    } else {
        tile_glyph(map.tiles[(x, y)], tiles)
    }
}

fn has_item<D>(layer: Option<&Grid<Option<D>>>, x: usize, y: usize) -> bool {
    layer
        .and_then(|grid| grid.get(x, y))
        .is_some_and(Option::is_some)
}
