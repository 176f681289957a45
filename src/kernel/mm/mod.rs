// src/kernel/mm/mod.rs

//! Paged memory with global LRU frame replacement.
//!
//! The frame table has a fixed `ram_bytes / page_size` slots. A single
//! LRU order covers every frame, free ones included: the order starts
//! as `[0, 1, .., F-1]`, so a cold machine fills frames in ascending
//! index order, and freed frames go back to the front so they are the
//! next to be handed out.
//!
//! Pages appear in frames on first access; there is no backing store
//! and eviction needs no write-back.

use std::collections::VecDeque;

use crate::kernel::process::ProcessId;

/// One occupied frame as reported by memory-usage queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryItem {
    pub page_number: u64,
    pub frame_number: u64,
    pub pid: ProcessId,
}

/// Frame table plus the global LRU order over it
#[derive(Debug)]
pub struct MemoryManager {
    page_size: u64,
    /// Occupant `(pid, page)` per frame index, `None` when free.
    frames: Vec<Option<(ProcessId, u64)>>,
    /// Frame indices, least-recently-used first.
    lru: VecDeque<usize>,
}

impl MemoryManager {
    /// Build a frame table of `ram_bytes / page_size` frames.
    ///
    /// The caller validates that the division yields at least one
    /// frame.
    #[must_use]
    pub fn new(ram_bytes: u64, page_size: u64) -> Self {
        let frame_count = (ram_bytes / page_size) as usize;
        Self {
            page_size,
            frames: vec![None; frame_count],
            lru: (0..frame_count).collect(),
        }
    }

    /// Number of frames in the table
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Page a logical address falls in
    #[must_use]
    pub const fn page_number(&self, address: u64) -> u64 {
        address / self.page_size
    }

    /// Make sure `(pid, page)` is resident.
    ///
    /// A hit only refreshes the pair's position in the LRU order. On a
    /// miss the least-recently-used frame is taken over, evicting its
    /// previous occupant. The match is on the full `(pid, page)` pair;
    /// address spaces are disjoint, so the same page number from two
    /// processes names two different pages.
    pub fn access(&mut self, pid: ProcessId, page: u64) {
        if let Some(frame) = self.frames.iter().position(|&o| o == Some((pid, page))) {
            self.touch(frame);
            return;
        }

        let Some(victim) = self.lru.pop_front() else {
            return; // the frame table is never empty, see `new`
        };
        if let Some((old_pid, old_page)) = self.frames[victim] {
            log::trace!("mm: frame {victim} evicts page {old_page} of {old_pid}");
        }
        self.lru.push_back(victim);
        self.frames[victim] = Some((pid, page));
        log::trace!("mm: frame {victim} now holds page {page} of {pid}");
    }

    /// Release every frame a process owns.
    ///
    /// Freed frames move to the front of the LRU order so the next
    /// allocations pick them up first, lowest frame index first.
    pub fn free_by_pid(&mut self, pid: ProcessId) {
        for frame in (0..self.frames.len()).rev() {
            if matches!(self.frames[frame], Some((p, _)) if p == pid) {
                self.frames[frame] = None;
                self.lru.retain(|&f| f != frame);
                self.lru.push_front(frame);
                log::trace!("mm: frame {frame} freed from {pid}");
            }
        }
    }

    /// Occupied frames in ascending frame-index order
    #[must_use]
    pub fn usage(&self) -> Vec<MemoryItem> {
        self.frames
            .iter()
            .enumerate()
            .filter_map(|(frame, occupant)| {
                occupant.map(|(pid, page)| MemoryItem {
                    page_number: page,
                    frame_number: frame as u64,
                    pid,
                })
            })
            .collect()
    }

    /// Move a frame to the most-recently-used end
    fn touch(&mut self, frame: usize) {
        self.lru.retain(|&f| f != frame);
        self.lru.push_back(frame);
    }
}
