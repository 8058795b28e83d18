//! Sparse block world served through [`reach_core::GridOracle`].
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use glam::DVec3;

use reach_core::{AgentId, Facing, GridError, GridOracle, GridPos, SelectionBox};

/// Edge length of a chunk, the unit in which regions are loaded.
pub const CHUNK_SIZE: i32 = 16;

/// Thickness of a door slab, in cells.
const DOOR_THICKNESS: f64 = 3.0 / 16.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChunkPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl ChunkPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub fn containing(cell: GridPos) -> Self {
        Self::new(
            cell.x.div_euclid(CHUNK_SIZE),
            cell.y.div_euclid(CHUNK_SIZE),
            cell.z.div_euclid(CHUNK_SIZE),
        )
    }
}

/// What occupies a cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Block {
    Solid,
    Door(Door),
}

impl Block {
    pub fn as_door(&self) -> Option<&Door> {
        match self {
            Block::Door(door) => Some(door),
            Block::Solid => None,
        }
    }

    pub fn selection_boxes(&self) -> Vec<SelectionBox> {
        match self {
            Block::Solid => vec![SelectionBox::FULL],
            Block::Door(door) => door.selection_boxes(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Door {
    pub kind: DoorKind,
    pub open: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DoorKind {
    /// Swinging door whose slab sits on the `facing` edge of its cell. A door
    /// locked to an agent only opens for that agent.
    Hinged {
        facing: Facing,
        locked_to: Option<AgentId>,
    },
    /// Door driven by a block behavior; only some variants open by hand.
    Sliding { hand_openable: bool },
}

impl Door {
    pub const fn hinged(facing: Facing) -> Self {
        Self {
            kind: DoorKind::Hinged {
                facing,
                locked_to: None,
            },
            open: false,
        }
    }

    pub const fn locked(facing: Facing, owner: AgentId) -> Self {
        Self {
            kind: DoorKind::Hinged {
                facing,
                locked_to: Some(owner),
            },
            open: false,
        }
    }

    pub const fn sliding(hand_openable: bool) -> Self {
        Self {
            kind: DoorKind::Sliding { hand_openable },
            open: false,
        }
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    /// Hinged doors expose a thin slab along their current edge; an open
    /// door has swung a quarter turn. Sliding doors use the cell center.
    pub fn selection_boxes(&self) -> Vec<SelectionBox> {
        match self.kind {
            DoorKind::Hinged { facing, .. } => {
                let edge = if self.open { quarter_turn(facing) } else { facing };
                vec![slab(edge)]
            }
            DoorKind::Sliding { .. } => Vec::new(),
        }
    }
}

fn quarter_turn(facing: Facing) -> Facing {
    match facing {
        Facing::North => Facing::East,
        Facing::East => Facing::South,
        Facing::South => Facing::West,
        Facing::West => Facing::North,
        vertical => vertical,
    }
}

fn slab(edge: Facing) -> SelectionBox {
    let far = 1.0 - DOOR_THICKNESS;
    let (min, max) = match edge {
        Facing::North => (DVec3::ZERO, DVec3::new(1.0, 1.0, DOOR_THICKNESS)),
        Facing::South => (DVec3::new(0.0, 0.0, far), DVec3::ONE),
        Facing::West => (DVec3::ZERO, DVec3::new(DOOR_THICKNESS, 1.0, 1.0)),
        Facing::East => (DVec3::new(far, 0.0, 0.0), DVec3::ONE),
        Facing::Down => (DVec3::ZERO, DVec3::new(1.0, DOOR_THICKNESS, 1.0)),
        Facing::Up => (DVec3::new(0.0, far, 0.0), DVec3::ONE),
    };
    SelectionBox::new(min, max)
}

/// In-memory block store with explicit chunk loading.
///
/// Reads from chunks that were never loaded fail with `GridError::Unloaded`
/// instead of reporting an empty cell.
#[derive(Clone, Debug, Default)]
pub struct BlockGrid {
    blocks: HashMap<GridPos, Block>,
    loaded: HashSet<ChunkPos>,
}

impl BlockGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_chunk(&mut self, chunk: ChunkPos) {
        self.loaded.insert(chunk);
    }

    pub fn unload_chunk(&mut self, chunk: ChunkPos) {
        self.loaded.remove(&chunk);
        self.blocks.retain(|cell, _| ChunkPos::containing(*cell) != chunk);
    }

    /// Loads every chunk within `chunks` chunks of the one containing `center`.
    pub fn load_around(&mut self, center: GridPos, chunks: i32) {
        let origin = ChunkPos::containing(center);
        for x in -chunks..=chunks {
            for y in -chunks..=chunks {
                for z in -chunks..=chunks {
                    self.load_chunk(ChunkPos::new(origin.x + x, origin.y + y, origin.z + z));
                }
            }
        }
    }

    pub fn is_loaded(&self, cell: GridPos) -> bool {
        self.loaded.contains(&ChunkPos::containing(cell))
    }

    /// Places `block`, loading its chunk if needed. Returns the previous block.
    pub fn set(&mut self, cell: GridPos, block: Block) -> Option<Block> {
        self.load_chunk(ChunkPos::containing(cell));
        self.blocks.insert(cell, block)
    }

    #[must_use]
    pub fn with(mut self, cell: GridPos, block: Block) -> Self {
        self.set(cell, block);
        self
    }

    pub fn remove(&mut self, cell: GridPos) -> Option<Block> {
        self.blocks.remove(&cell)
    }

    pub fn get(&self, cell: GridPos) -> Option<&Block> {
        self.blocks.get(&cell)
    }

    pub fn get_mut(&mut self, cell: GridPos) -> Option<&mut Block> {
        self.blocks.get_mut(&cell)
    }
}

impl GridOracle for BlockGrid {
    type Feature = Block;

    fn feature_at(&self, position: GridPos) -> Result<Option<Block>, GridError> {
        if !self.is_loaded(position) {
            return Err(GridError::Unloaded(position));
        }
        Ok(self.get(position).cloned())
    }

    fn selection_boxes(&self, feature: &Block, _position: GridPos) -> Result<Vec<SelectionBox>, GridError> {
        Ok(feature.selection_boxes())
    }
}

/// Cloneable handle to a [`BlockGrid`] shared between readers and the effect.
#[derive(Clone, Debug, Default)]
pub struct SharedGrid(Arc<RwLock<BlockGrid>>);

impl SharedGrid {
    pub fn new(grid: BlockGrid) -> Self {
        Self(Arc::new(RwLock::new(grid)))
    }

    /// # Errors
    ///
    /// Returns `GridError::Unavailable` if a writer panicked while holding the lock.
    pub fn read(&self) -> Result<RwLockReadGuard<'_, BlockGrid>, GridError> {
        self.0
            .read()
            .map_err(|_| GridError::Unavailable("grid lock poisoned".into()))
    }

    /// # Errors
    ///
    /// Returns `GridError::Unavailable` if a writer panicked while holding the lock.
    pub fn write(&self) -> Result<RwLockWriteGuard<'_, BlockGrid>, GridError> {
        self.0
            .write()
            .map_err(|_| GridError::Unavailable("grid lock poisoned".into()))
    }

    /// Snapshot of the block at `cell`, ignoring load state.
    pub fn block(&self, cell: GridPos) -> Option<Block> {
        self.read().ok()?.get(cell).cloned()
    }
}

impl GridOracle for SharedGrid {
    type Feature = Block;

    fn feature_at(&self, position: GridPos) -> Result<Option<Block>, GridError> {
        self.read()?.feature_at(position)
    }

    fn selection_boxes(&self, feature: &Block, position: GridPos) -> Result<Vec<SelectionBox>, GridError> {
        self.read()?.selection_boxes(feature, position)
    }
}
