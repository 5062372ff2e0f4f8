//! Unit tests for fow-core primitives.

#[cfg(test)]
mod ids {
    use crate::{AgentId, ProfileId, TileIndex, ZoneId};

    #[test]
    fn index_roundtrip() {
        let id = AgentId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(AgentId::from_index(42), Some(id));
    }

    #[test]
    fn from_index_refuses_the_reserved_value() {
        assert_eq!(ProfileId::from_index(u16::MAX as usize), None);
        assert_eq!(ProfileId::from_index(70_000), None);
        assert_eq!(ProfileId::from_index(3), Some(ProfileId(3)));
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(AgentId::INVALID.0, u32::MAX);
        assert_eq!(TileIndex::INVALID.0, u32::MAX);
        assert_eq!(ProfileId::INVALID.0, u16::MAX);
        assert_eq!(ZoneId::INVALID.0, u32::MAX);
    }

    #[test]
    fn tile_zero_is_valid() {
        assert!(TileIndex(0).is_valid());
        assert!(!TileIndex::INVALID.is_valid());
        assert_eq!(TileIndex::default(), TileIndex::INVALID);
    }

    #[test]
    fn display() {
        assert_eq!(AgentId(7).to_string(), "AgentId(7)");
        assert_eq!(TileIndex(3).to_string(), "TileIndex(3)");
        assert_eq!(ZoneId::INVALID.to_string(), "ZoneId(invalid)");
    }
}

#[cfg(test)]
mod grid {
    use crate::{GridDims, TileCoord, TileIndex};

    #[test]
    fn rejects_degenerate_grids() {
        assert!(GridDims::new(0, 10).is_err());
        assert!(GridDims::new(10, 0).is_err());
        assert!(GridDims::new(u32::MAX / 2, 4).is_err());
        assert!(GridDims::new((1 << 24) + 1, 1).is_err());
        assert!(GridDims::new(65_535, 65_535).is_ok());
    }

    #[test]
    fn row_major_indexing() {
        let dims = GridDims::new(10, 4).unwrap();
        assert_eq!(dims.tile_count(), 40);
        assert_eq!(dims.index_of(TileCoord::new(0, 0)), TileIndex(0));
        assert_eq!(dims.index_of(TileCoord::new(3, 2)), TileIndex(23));
        assert_eq!(dims.coord_of(TileIndex(23)), Some(TileCoord::new(3, 2)));
        assert_eq!(dims.coord_of(TileIndex(40)), None);
        assert_eq!(dims.coord_of(TileIndex::INVALID), None);
    }

    #[test]
    fn clamping_never_leaves_the_grid() {
        let dims = GridDims::new(5, 3).unwrap();
        assert_eq!(dims.clamp(TileCoord::new(-4, 1)), TileCoord::new(0, 1));
        assert_eq!(dims.clamp(TileCoord::new(9, -2)), TileCoord::new(4, 0));
        assert_eq!(dims.clamp(TileCoord::new(7, 7)), TileCoord::new(4, 2));
        // Index of an out-of-range coordinate is the index of its clamp.
        assert_eq!(dims.index_of(TileCoord::new(100, 100)), TileIndex(14));
        assert_eq!(dims.index_of(TileCoord::new(-1, -1)), TileIndex(0));
    }

    #[test]
    fn contains() {
        let dims = GridDims::new(5, 3).unwrap();
        assert!(dims.contains(TileCoord::new(0, 0)));
        assert!(dims.contains(TileCoord::new(4, 2)));
        assert!(!dims.contains(TileCoord::new(5, 2)));
        assert!(!dims.contains(TileCoord::new(-1, 0)));
    }

    #[test]
    fn distance_sq() {
        let a = TileCoord::new(5, 5);
        assert_eq!(a.distance_sq(TileCoord::new(8, 5)), 9);
        assert_eq!(a.distance_sq(TileCoord::new(3, 4)), 5);
    }
}

#[cfg(test)]
mod terrain {
    use crate::terrain::obstructs_view;
    use crate::{GridSnapshot, Occupancy, Terrain, TileCoord, TileGrid};

    #[test]
    fn obstruction_classes() {
        assert!(!obstructs_view(Terrain::Open, Occupancy::None));
        assert!(!obstructs_view(Terrain::Open, Occupancy::Unit));
        assert!(obstructs_view(Terrain::Open, Occupancy::Resource));
        assert!(obstructs_view(Terrain::Open, Occupancy::Building));
        assert!(obstructs_view(Terrain::Wall, Occupancy::None));
    }

    #[test]
    fn tile_grid_lookup() {
        let mut grid = TileGrid::new(4, 4).unwrap();
        grid.wall(TileCoord::new(1, 2));
        grid.set_occupancy(TileCoord::new(3, 0), Occupancy::Building);
        grid.set_terrain(TileCoord::new(9, 9), Terrain::Wall); // ignored

        let dims = grid.dims();
        assert_eq!(grid.terrain(dims.index_of(TileCoord::new(1, 2))), Terrain::Wall);
        assert!(grid.obstructs(dims.index_of(TileCoord::new(3, 0))));
        assert!(!grid.obstructs(dims.index_of(TileCoord::new(0, 0))));
        assert!(!grid.obstructs(dims.index_of(TileCoord::new(3, 3))));
    }

    #[test]
    fn display() {
        assert_eq!(Terrain::Wall.to_string(), "wall");
        assert_eq!(Occupancy::Resource.to_string(), "resource");
    }
}

#[cfg(test)]
mod config {
    use crate::FowConfig;

    #[test]
    fn defaults() {
        let cfg = FowConfig::default();
        assert_eq!(cfg.batch_size, 8);
        assert_eq!(cfg.slot_padding, 50);
        assert_eq!(cfg.snapshot_padding, 10);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_zero_batch() {
        let cfg = FowConfig { batch_size: 0, ..FowConfig::default() };
        assert!(cfg.validate().is_err());
        let cfg = FowConfig { num_threads: Some(0), ..FowConfig::default() };
        assert!(cfg.validate().is_err());
    }
}
