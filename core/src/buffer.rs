//! Fixed-capacity per-frame arenas and the batch accumulator
//!
//! All storage is reserved up front and reset every frame, so steady-state
//! frames never allocate. Writes that would exceed capacity are rejected
//! whole, leaving previously accumulated data untouched.

use glidebridge_shared::OffsetF;
use tracing::debug;

use crate::batch::Batch;
use crate::error::{CoreError, CoreResult};
use crate::vertex::Vertex;

/// A `Vec` that never grows past the capacity it was created with
#[derive(Debug)]
pub struct FixedBuffer<T> {
    what: &'static str,
    items: Vec<T>,
    capacity: usize,
}

impl<T: Copy> FixedBuffer<T> {
    pub fn new(what: &'static str, capacity: usize) -> Self {
        Self {
            what,
            items: Vec::with_capacity(capacity),
            capacity,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.capacity - self.items.len()
    }

    fn check(&self, requested: usize) -> CoreResult<()> {
        if requested > self.remaining() {
            return Err(CoreError::CapacityExceeded {
                what: self.what,
                len: self.items.len(),
                requested,
                capacity: self.capacity,
            });
        }
        Ok(())
    }

    pub fn push(&mut self, item: T) -> CoreResult<()> {
        self.check(1)?;
        self.items.push(item);
        Ok(())
    }

    /// Append all of `items`, or none of them
    pub fn extend_from_slice(&mut self, items: &[T]) -> CoreResult<()> {
        self.check(items.len())?;
        self.items.extend_from_slice(items);
        Ok(())
    }

    pub fn truncate(&mut self, len: usize) {
        self.items.truncate(len);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.items
    }

    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }
}

/// Accumulates the frame's vertices and batches in emission order.
///
/// A draw opens a batch with [`begin_batch`](Self::begin_batch), emits its
/// vertices, then [`commit_batch`](Self::commit_batch)es it. At frame end
/// [`merge_and_flush`](Self::merge_and_flush) coalesces neighbouring
/// compatible batches into draw submissions.
#[derive(Debug)]
pub struct BatchAccumulator {
    vertices: FixedBuffer<Vertex>,
    batches: FixedBuffer<Batch>,
    pending: Option<Batch>,
}

impl BatchAccumulator {
    pub fn new(max_vertices: usize, max_batches: usize) -> Self {
        Self {
            vertices: FixedBuffer::new("vertices", max_vertices),
            batches: FixedBuffer::new("batches", max_batches),
            pending: None,
        }
    }

    /// Open a batch carrying `state`; its vertex range starts at the current end
    pub fn begin_batch(&mut self, state: Batch) {
        self.pending = Some(Batch {
            start_vertex: self.vertices.len() as u32,
            vertex_count: 0,
            ..state
        });
    }

    /// Append vertices to the open batch.
    ///
    /// On overflow the open batch is abandoned and everything it emitted so
    /// far is rolled back.
    pub fn emit_vertices(&mut self, vertices: &[Vertex]) -> CoreResult<()> {
        if let Err(e) = self.vertices.extend_from_slice(vertices) {
            self.abandon_batch();
            return Err(e);
        }
        if let Some(pending) = self.pending.as_mut() {
            pending.vertex_count += vertices.len() as u32;
        }
        Ok(())
    }

    /// Close the open batch. Empty batches are discarded.
    pub fn commit_batch(&mut self) -> CoreResult<Option<&Batch>> {
        let Some(batch) = self.pending.take() else {
            return Ok(None);
        };
        if batch.vertex_count == 0 {
            return Ok(None);
        }
        if let Err(e) = self.batches.push(batch) {
            self.vertices.truncate(batch.start_vertex as usize);
            return Err(e);
        }
        Ok(self.batches.last())
    }

    /// Drop the open batch and its vertices
    pub fn abandon_batch(&mut self) {
        if let Some(batch) = self.pending.take() {
            self.vertices.truncate(batch.start_vertex as usize);
        }
    }

    /// Open, fill and commit a batch in one step
    pub fn push_batch(&mut self, state: Batch, vertices: &[Vertex]) -> CoreResult<()> {
        self.begin_batch(state);
        self.emit_vertices(vertices)?;
        self.commit_batch()?;
        Ok(())
    }

    pub fn vertices(&self) -> &[Vertex] {
        self.vertices.as_slice()
    }

    pub fn vertices_mut(&mut self) -> &mut [Vertex] {
        self.vertices.as_mut_slice()
    }

    pub fn batches(&self) -> &[Batch] {
        self.batches.as_slice()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn batch_count(&self) -> usize {
        self.batches.len()
    }

    /// Shift every vertex of the batches selected by `pred`.
    ///
    /// `pred` sees each batch with its first vertex. Returns the number of
    /// vertices moved.
    pub fn offset_batches(&mut self, delta: OffsetF, mut pred: impl FnMut(&Batch, &Vertex) -> bool) -> usize {
        let vertices = self.vertices.as_mut_slice();
        let mut moved = 0;
        for batch in self.batches.as_slice() {
            let range = batch.start_vertex as usize..batch.end_vertex() as usize;
            let Some(batch_vertices) = vertices.get_mut(range) else {
                continue;
            };
            let Some(first) = batch_vertices.first() else {
                continue;
            };
            if !pred(batch, first) {
                continue;
            }
            for v in batch_vertices.iter_mut() {
                v.add_offset(delta);
            }
            moved += batch_vertices.len();
        }
        moved
    }

    /// Reset for the next frame
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.batches.clear();
        self.pending = None;
    }

    /// Coalesce committed batches and hand each resulting draw to `submit`.
    ///
    /// Single greedy pass in emission order; draw order is preserved exactly.
    /// Batches without a texture location are skipped. Returns the number of
    /// submissions.
    pub fn merge_and_flush(&self, max_vertices_per_draw: u32, mut submit: impl FnMut(&Batch)) -> u32 {
        let mut merged: Option<Batch> = None;
        let mut draws = 0;

        for batch in self.batches.as_slice() {
            if !batch.is_valid() {
                debug!(
                    hash = format_args!("{:016x}", batch.texture_hash),
                    "skipping batch without texture location"
                );
                continue;
            }

            if let Some(m) = merged.as_mut() {
                if m.can_merge_with(batch, max_vertices_per_draw) {
                    m.vertex_count += batch.vertex_count;
                    continue;
                }
                submit(m);
                draws += 1;
            }
            merged = Some(*batch);
        }

        if let Some(m) = merged {
            submit(&m);
            draws += 1;
        }

        draws
    }
}
