use crate::grid::ExpandedGrid;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reservation status of one room for one time slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SlotStatus {
    Available,
    /// Occupied, with the number of slots (including this one) before the
    /// reservation ends.
    Occupied { remaining: u32 },
}

impl SlotStatus {
    /// Build from a grid cell value: 0 = available, anything else occupied.
    pub fn from_code(code: u32) -> Self {
        if code == 0 {
            SlotStatus::Available
        } else {
            SlotStatus::Occupied { remaining: code }
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, SlotStatus::Available)
    }
}

/// One (status, time-label) pair in a room's daily timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub time: String,
    pub status: SlotStatus,
}

/// A single room's full-day timeline, in time order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSchedule {
    pub room: String,
    pub slots: Vec<TimeSlot>,
}

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("extracted {rooms} rooms but the grid has {columns} columns")]
    DimensionMismatch { rooms: usize, columns: usize },

    #[error("grid has {rows} rows but {slots} time labels")]
    SlotCountMismatch { rows: usize, slots: usize },

    #[error("grid row {row} has {found} columns, expected {expected}")]
    RaggedGrid {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Turn a per-slot grid into per-room timelines.
///
/// Transposes the grid so each column becomes one room's day, zips it with
/// the time labels, and associates it with the room name at the same column
/// index.
pub fn aggregate(
    grid: &ExpandedGrid,
    rooms: &[String],
    times: &[String],
) -> Result<Vec<RoomSchedule>, ScheduleError> {
    let columns = grid.first().map(|row| row.len()).unwrap_or(0);
    if rooms.len() != columns {
        return Err(ScheduleError::DimensionMismatch {
            rooms: rooms.len(),
            columns,
        });
    }
    if grid.len() != times.len() {
        return Err(ScheduleError::SlotCountMismatch {
            rows: grid.len(),
            slots: times.len(),
        });
    }
    // Reconstruction guarantees rectangularity, but a caller-built grid may
    // not honor it.
    for (row_idx, row) in grid.iter().enumerate() {
        if row.len() != columns {
            return Err(ScheduleError::RaggedGrid {
                row: row_idx,
                expected: columns,
                found: row.len(),
            });
        }
    }

    Ok(rooms
        .iter()
        .enumerate()
        .map(|(col, room)| RoomSchedule {
            room: room.clone(),
            slots: grid
                .iter()
                .zip(times)
                .map(|(row, time)| TimeSlot {
                    time: time.clone(),
                    status: SlotStatus::from_code(row[col]),
                })
                .collect(),
        })
        .collect())
}
