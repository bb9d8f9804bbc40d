//! Draw-call handlers
//!
//! Every draw snapshots the scratch render state into a [`Batch`], resolves
//! its texture through the backend, assembles vertices into the staging
//! buffer and commits them as one batch. A draw whose texture cannot be
//! resolved is dropped.

use tracing::debug;

use glidebridge_shared::{OffsetF, SURFACE_ID_USER_INTERFACE, WHITE_PALETTE_INDEX, math::normalize_to};

use super::GlideContext;
use crate::backend::{GameIntrospector, GraphicsBackend};
use crate::batch::{Batch, GameAddress, TextureCategory};
use crate::error::{CoreError, CoreResult};
use crate::glide::PrimitiveMode;
use crate::motion::build_streak;
use crate::profiler::ProfCategory;
use crate::vertex::{GAME_VERTEX_STRIDE, GameVertex, Vertex};

/// How a committed draw gets its surface id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SurfaceAssignment {
    /// Ask the surface tracker
    Tracked,
    /// Already stamped on the staged vertices
    Preset,
}

impl<B: GraphicsBackend, G: GameIntrospector> GlideContext<B, G> {
    pub fn draw_point(&mut self, point: &GameVertex) {
        let _timer = self.profiler.timer(ProfCategory::Draw);

        let Some(mut batch) = self.resolve_batch(self.scratch_batch) else {
            return;
        };
        batch.game_address = GameAddress::Unknown;

        self.assembler.prepare(&batch, self.glide.constant_color);
        let mut v0 = self.assembler.assemble(point, self.glide.st_shift);
        v0.set_surface_id(self.surface_ids.current_surface_id());

        let mut v1 = v0;
        v1.add_offset(OffsetF::new(1.0, 0.0));
        let mut v2 = v0;
        v2.add_offset(OffsetF::new(1.0, 1.0));

        self.staging.clear();
        self.staging.extend_from_slice(&[v0, v1, v2]);
        self.commit_staged("draw_point", batch, SurfaceAssignment::Tracked);
    }

    /// Draw a line as a thin quad, or as a stretched streak while the game
    /// is drawing weather particles.
    pub fn draw_line(&mut self, from: &GameVertex, to: &GameVertex) {
        let _timer = self.profiler.timer(ProfCategory::Draw);

        let mut state = self.scratch_batch;
        state.palette_index = WHITE_PALETTE_INDEX as u16;
        let Some(mut batch) = self.resolve_batch(state) else {
            return;
        };
        batch.game_address = GameAddress::DrawLine;
        batch.category = TextureCategory::UserInterface;

        self.assembler.prepare(&batch, self.glide.constant_color);
        // Texcoord and color come from the end point
        let mut template = self.assembler.assemble(to, self.glide.st_shift);
        template.set_surface_id(SURFACE_ID_USER_INTERFACE);

        let start = OffsetF::new(from.x, from.y);
        let end = OffsetF::new(to.x, to.y);

        self.staging.clear();
        match self.weather_particle.filter(|_| self.prediction_enabled()) {
            Some(raw_index) => {
                let _timer = self.profiler.timer(ProfCategory::MotionPrediction);
                let streak = self.weather_streak(template, raw_index, start, end);
                self.staging.extend_from_slice(&streak);
            }
            None => {
                let widening = normalize_to(OffsetF::new(end.y - start.y, end.x - start.x), 0.5);
                let corner = |p: OffsetF| {
                    let mut v = template;
                    v.set_position(p);
                    v
                };
                let v0 = corner(OffsetF::new(end.x + widening.x, end.y - widening.y));
                let v1 = corner(OffsetF::new(start.x + widening.x, start.y - widening.y));
                let v2 = corner(OffsetF::new(end.x - widening.x, end.y + widening.y));
                let v3 = corner(OffsetF::new(start.x - widening.x, start.y + widening.y));
                self.staging.extend_from_slice(&[v0, v1, v2, v1, v3, v2]);
            }
        }

        self.commit_staged("draw_line", batch, SurfaceAssignment::Preset);
    }

    fn weather_streak(&mut self, template: Vertex, raw_index: u32, start: OffsetF, end: OffsetF) -> [Vertex; 12] {
        let act = self.introspector.current_act();
        let key = self.weather.resolve_particle_key(raw_index);

        let offset = self.weather.get_offset(key, start);
        let start = start + offset;
        let end = end + offset;

        let delta = end - start;
        let dir = self
            .weather
            .smooth_direction(delta.normalize_or_zero(), self.config.motion.direction_blend);

        build_streak(template, start, delta.length(), dir, act)
    }

    /// Triangle strip or fan from individually addressed vertices
    pub fn draw_vertex_array(&mut self, mode: u32, vertices: &[GameVertex], call_site: u32) {
        let _timer = self.profiler.timer(ProfCategory::Draw);

        let Some(mode) = PrimitiveMode::from_glide(mode) else {
            self.contract_violation("draw_vertex_array", CoreError::UnsupportedPrimitive(mode));
            return;
        };
        if vertices.len() < 3 {
            self.contract_violation("draw_vertex_array", CoreError::TooFewVertices(vertices.len()));
            return;
        }

        let Some(batch) = self.prepare_batch(call_site) else {
            return;
        };

        self.assembler.prepare(&batch, self.glide.constant_color);
        let st_shift = self.glide.st_shift;
        let assembler = &self.assembler;
        let assembled = vertices.iter().map(|v| assembler.assemble(v, st_shift));

        self.staging.clear();
        triangulate(mode, assembled, &mut self.staging);
        self.commit_staged("draw_vertex_array", batch, SurfaceAssignment::Tracked);
    }

    /// Four-vertex fan read from a packed vertex buffer.
    ///
    /// `data` holds `count` records `stride` bytes apart. Only the game's own
    /// record layout is accepted.
    pub fn draw_vertex_array_contiguous(&mut self, mode: u32, count: u32, data: &[u8], stride: usize, call_site: u32) {
        let _timer = self.profiler.timer(ProfCategory::Draw);

        if let Err(err) = check_contiguous(mode, count, data.len(), stride) {
            self.contract_violation("draw_vertex_array_contiguous", err);
            return;
        }

        let Some(batch) = self.prepare_batch(call_site) else {
            return;
        };

        self.assembler.prepare(&batch, self.glide.constant_color);
        let st_shift = self.glide.st_shift;
        let quad: [Vertex; 4] = std::array::from_fn(|i| {
            let record: GameVertex = bytemuck::pod_read_unaligned(&data[i * stride..i * stride + GAME_VERTEX_STRIDE]);
            self.assembler.assemble(&record, st_shift)
        });

        self.staging.clear();
        self.staging
            .extend_from_slice(&[quad[0], quad[1], quad[2], quad[3], quad[0], quad[2]]);
        self.commit_staged("draw_vertex_array_contiguous", batch, SurfaceAssignment::Tracked);
    }

    /// Snapshot the scratch state for a triangle draw identified by its call site
    fn prepare_batch(&mut self, call_site: u32) -> Option<Batch> {
        let mut batch = self.resolve_batch(self.scratch_batch)?;
        let address = self.introspector.identify_call_site(call_site);
        batch.game_address = address;
        batch.category = self.introspector.refine_category(batch.category, address);
        Some(batch)
    }

    /// Look up `state`'s texture in the backend cache
    fn resolve_batch(&mut self, mut state: Batch) -> Option<Batch> {
        let pixels = match self.glide.source_range(
            0,
            state.texture_start_address,
            state.texture_width as u32,
            state.texture_height as u32,
        ) {
            Ok(range) => &self.glide.tmu_memory()[range],
            Err(_) => &[][..],
        };

        match self.backend.update_texture(&state, pixels) {
            Some(location) => {
                state.location = Some(location);
                Some(state)
            }
            None => {
                debug!(hash = state.texture_hash, "texture not resident, draw dropped");
                None
            }
        }
    }

    /// Commit the staged vertices as `batch`, all or nothing
    fn commit_staged(&mut self, op: &'static str, batch: Batch, surface: SurfaceAssignment) {
        if let Err(err) = self.try_commit_staged(batch, surface) {
            self.contract_violation(op, err);
        }
    }

    fn try_commit_staged(&mut self, batch: Batch, surface: SurfaceAssignment) -> CoreResult<()> {
        let start = self.accumulator.vertex_count();
        self.accumulator.begin_batch(batch);
        self.accumulator.emit_vertices(&self.staging)?;

        if surface == SurfaceAssignment::Tracked {
            let state = self.game_state.state();
            let vertices = &mut self.accumulator.vertices_mut()[start..];
            self.surface_ids
                .update_batch_surface_id(&batch, state, self.game_size, vertices);
        }

        self.accumulator.commit_batch()?;
        Ok(())
    }
}

fn check_contiguous(mode: u32, count: u32, len: usize, stride: usize) -> CoreResult<()> {
    if PrimitiveMode::from_glide(mode) != Some(PrimitiveMode::TriangleFan) {
        return Err(CoreError::UnsupportedPrimitive(mode));
    }
    if count != 4 {
        return Err(CoreError::TooFewVertices(count as usize));
    }
    if stride != GAME_VERTEX_STRIDE {
        return Err(CoreError::BadVertexStride {
            expected: GAME_VERTEX_STRIDE,
            actual: stride,
        });
    }
    if len < 3 * stride + GAME_VERTEX_STRIDE {
        return Err(CoreError::TooFewVertices(len / stride));
    }
    Ok(())
}

/// Expand a strip or fan into a triangle list, 3 * (n - 2) vertices
fn triangulate(mode: PrimitiveMode, mut vertices: impl Iterator<Item = Vertex>, out: &mut Vec<Vertex>) {
    let (Some(a), Some(b)) = (vertices.next(), vertices.next()) else {
        return;
    };
    let (mut first, mut prev) = (a, b);

    for v in vertices {
        out.extend_from_slice(&[first, prev, v]);
        match mode {
            PrimitiveMode::TriangleFan => prev = v,
            PrimitiveMode::TriangleStrip => {
                first = prev;
                prev = v;
            }
        }
    }
}
