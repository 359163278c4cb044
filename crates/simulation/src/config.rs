/// Default city dimensions, in tiles.
pub const GRID_WIDTH: usize = 256;
pub const GRID_HEIGHT: usize = 256;

/// Side length of one zone sector, in tiles. Edge sectors are clipped when
/// the grid is not an exact multiple of this.
pub const SECTOR_SIZE: usize = 16;

/// How many sectors have their presence flags and desirability refreshed per
/// FixedUpdate tick. The round-robin cursor spreads the full-grid scan across
/// `sector_count / SECTORS_PER_TICK` ticks.
pub const SECTORS_PER_TICK: usize = 8;
